use anyhow::Result;
use clap::{crate_version, App, AppSettings, Arg, ArgMatches, SubCommand};
use spacetraveling::build::{build_post, build_site};
use spacetraveling::client::PrismicClient;
use spacetraveling::config::Config;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let output = Arg::with_name("output")
        .short("o")
        .long("output")
        .value_name("DIR")
        .default_value("_output")
        .help("The directory to write the site into");

    let matches = App::new("spacetraveling")
        .version(crate_version!())
        .about("Renders a blog from a headless content API into static HTML")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("build")
                .about("Builds the index and every published post")
                .arg(output.clone()),
        )
        .subcommand(
            SubCommand::with_name("post")
                .about("Renders a single post that was published after the last build")
                .arg(output)
                .arg(
                    Arg::with_name("slug")
                        .required(true)
                        .help("The slug of the post to render"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        ("build", Some(matches)) => {
            let config = config(matches)?;
            build_site(&config, &PrismicClient::connect(&config.api_endpoint)?)?;
        }
        ("post", Some(matches)) => {
            let config = config(matches)?;
            let slug = matches.value_of("slug").unwrap_or_default();
            build_post(&config, &PrismicClient::connect(&config.api_endpoint)?, slug)?;
        }
        _ => unreachable!("a subcommand is required"),
    }
    Ok(())
}

fn config(matches: &ArgMatches) -> Result<Config> {
    let output = Path::new(matches.value_of("output").unwrap_or("_output"));
    Config::from_directory(&std::env::current_dir()?, output)
}

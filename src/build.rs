//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output static site: loading the listing page by page
//! ([`crate::pagination`]), enumerating and normalizing every post
//! ([`crate::paths`], [`crate::detail`]), rendering index and post pages
//! ([`crate::write`]), and copying the theme's static directory into the
//! static output directory. [`build_post`] renders a single post on demand.

use crate::client::{self, ContentClient};
use crate::config::Config;
use crate::date::FormatError;
use crate::detail::normalize_detail;
use crate::listing::normalize_listing;
use crate::pagination::{AccumulatedListing, Session};
use crate::paths::static_paths;
use crate::write::{Error as WriteError, Writer};
use gtmpl::Template;
use log::{debug, info};
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use walkdir::WalkDir;

/// The page size used when enumerating posts; the largest the API allows.
const STATIC_PATHS_PAGE_SIZE: usize = 100;

/// Builds the site from a [`Config`] object, fetching content through
/// `client`.
pub fn build_site<C: ContentClient>(config: &Config, client: &C) -> Result<()> {
    // Parse the template files.
    let index_template = parse_template(config.index_template.iter())?;
    let posts_template = parse_template(config.posts_template.iter())?;

    // Fetch everything before touching the output directories so that a
    // failed fetch leaves the previous build in place.
    let snapshots = load_listing(client, &config.document_type, config.index_page_size)?;
    let mut posts = Vec::new();
    for uid in static_paths(client, &config.document_type, STATIC_PATHS_PAGE_SIZE)? {
        debug!("fetching post `{}`", uid);
        let post = normalize_detail(client.fetch_by_uid(&config.document_type, &uid)?)?;
        posts.push((uid, post));
    }

    rmdir(&config.posts_output_directory)?;
    rmdir(&config.index_output_directory)?;
    rmdir(&config.static_output_directory)?;

    let writer = writer(config, &index_template, &posts_template);
    let snapshots: Vec<&AccumulatedListing> = snapshots.iter().map(Rc::as_ref).collect();
    writer.write_index(&snapshots)?;
    info!("wrote {} index pages", snapshots.len());

    for (uid, post) in &posts {
        writer.write_post(uid, post)?;
    }
    info!("wrote {} post pages", posts.len());

    copy_dir(
        &config.static_source_directory,
        &config.static_output_directory,
    )?;

    // copy /pages/index.html to /index.html
    std::fs::copy(
        config.index_output_directory.join("index.html"),
        config.root_output_directory.join("index.html"),
    )?;

    Ok(())
}

/// Renders the post with slug `uid` into the posts output directory without
/// rebuilding anything else, for posts published after the last build.
/// Returns the path of the written page.
pub fn build_post<C: ContentClient>(config: &Config, client: &C, uid: &str) -> Result<PathBuf> {
    let index_template = Template::default();
    let posts_template = parse_template(config.posts_template.iter())?;
    let post = normalize_detail(client.fetch_by_uid(&config.document_type, uid)?)?;
    let path = writer(config, &index_template, &posts_template).write_post(uid, &post)?;
    info!("wrote {}", path.display());
    Ok(path)
}

fn writer<'a>(
    config: &'a Config,
    index_template: &'a Template,
    posts_template: &'a Template,
) -> Writer<'a> {
    Writer {
        posts_template,
        index_template,
        index_base_url: &config.index_url,
        index_output_directory: &config.index_output_directory,
        posts_base_url: &config.posts_url,
        posts_output_directory: &config.posts_output_directory,
        home_page: &config.home_page,
        static_url: &config.static_url,
        site_title: &config.title,
    }
}

/// Loads the first listing page and then "loads more" until the cursor runs
/// out, returning every snapshot along the way. A failed load ends the
/// listing early; the snapshots loaded so far are still returned.
fn load_listing<C: ContentClient>(
    client: &C,
    doc_type: &str,
    page_size: usize,
) -> Result<Vec<Rc<AccumulatedListing>>> {
    let first = normalize_listing(client.fetch_by_type(doc_type, page_size)?)?;
    let mut session = Session::new(AccumulatedListing::new(first));
    let mut snapshots = vec![Rc::clone(session.listing())];
    let mut visited = HashSet::new();
    while let Some(cursor) = session.listing().next_page() {
        if !visited.insert(cursor.to_owned()) {
            break;
        }
        match session.load_more(client) {
            Ok(listing) => snapshots.push(Rc::clone(listing)),
            // the session has already reported the failure
            Err(_) => break,
        }
    }
    Ok(snapshots)
}

/// Copies the contents of `src` into `dst`. A missing `src` is not an error:
/// themes without static assets are fine.
fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    if !src.is_dir() {
        debug!("no static directory at {}", src.display());
        return Ok(());
    }
    for result in WalkDir::new(src) {
        let entry = result?;
        let target = match entry.path().strip_prefix(src) {
            Ok(relative) => dst.join(relative),
            Err(_) => continue,
        };
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

// Loads the template file contents, concatenates them, and parses the result
// into a template.
fn parse_template<P: AsRef<Path>>(template_files: impl Iterator<Item = P>) -> Result<Template> {
    let mut contents = String::new();
    for template_file in template_files {
        use std::io::Read;
        let template_file = template_file.as_ref();
        File::open(&template_file)
            .map_err(|e| Error::OpenTemplateFile {
                path: template_file.to_owned(),
                err: e,
            })?
            .read_to_string(&mut contents)?;
        contents.push(' ');
    }

    let mut template = Template::default();
    template.parse(&contents).map_err(Error::ParseTemplate)?;
    Ok(template)
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during fetching,
/// normalizing, writing, cleaning output directories, parsing template files,
/// and other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors fetching content.
    Client(client::Error),

    /// Returned for unparseable publication dates.
    Format(FormatError),

    /// Returned for errors writing pages to disk.
    Write(WriteError),

    /// Returned for I/O problems while cleaning output directories.
    Clean { path: PathBuf, err: std::io::Error },

    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate(String),

    /// Returned for errors walking the static directory.
    WalkDir(walkdir::Error),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Client(err) => err.fmt(f),
            Error::Format(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Clean { path, err } => {
                write!(f, "Cleaning directory '{}': {}", path.display(), err)
            }
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Client(err) => Some(err),
            Error::Format(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Clean { path: _, err } => Some(err),
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate(_) => None,
            Error::WalkDir(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<client::Error> for Error {
    /// Converts [`client::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: client::Error) -> Error {
        Error::Client(err)
    }
}

impl From<FormatError> for Error {
    /// Converts [`FormatError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: FormatError) -> Error {
        Error::Format(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts [`walkdir::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

fn rmdir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(x) => Ok(x),
        Err(e) => match e.kind() {
            std::io::ErrorKind::NotFound => Ok(()),
            _ => Err(Error::Clean {
                path: dir.to_owned(),
                err: e,
            }),
        },
    }
}

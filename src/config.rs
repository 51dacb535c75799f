//! Loads the project configuration (`spacetraveling.yaml`) and the theme
//! configuration (`theme/theme.yaml`) into a [`Config`].

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

const PROJECT_FILE: &str = "spacetraveling.yaml";

/// Overrides `api_endpoint` from the project file.
pub const ENDPOINT_VARIABLE: &str = "PRISMIC_API_ENDPOINT";

#[derive(Deserialize)]
struct PageSize(usize);

impl Default for PageSize {
    fn default() -> Self {
        PageSize(1)
    }
}

#[derive(Deserialize)]
struct Project {
    site_root: Url,

    #[serde(default)]
    api_endpoint: Option<Url>,

    #[serde(default = "default_document_type")]
    document_type: String,

    #[serde(default)]
    index_page_size: PageSize,

    #[serde(default = "default_title")]
    title: String,
}

fn default_document_type() -> String {
    String::from("posts")
}

fn default_title() -> String {
    String::from("spacetraveling")
}

#[derive(Deserialize)]
struct Theme {
    index_template: Vec<PathBuf>,
    posts_template: Vec<PathBuf>,
}

/// Everything a build needs to know: where the content comes from, how it's
/// templated, and where the output goes.
pub struct Config {
    pub title: String,
    pub api_endpoint: Url,
    pub document_type: String,
    pub index_page_size: usize,
    pub home_page: Url,
    pub index_url: Url,
    pub posts_url: Url,
    pub static_url: Url,
    pub index_template: Vec<PathBuf>,
    pub posts_template: Vec<PathBuf>,
    pub static_source_directory: PathBuf,
    pub root_output_directory: PathBuf,
    pub index_output_directory: PathBuf,
    pub posts_output_directory: PathBuf,
    pub static_output_directory: PathBuf,
}

impl Config {
    /// Searches `dir` and its ancestors for `spacetraveling.yaml` and loads
    /// the first one found.
    pub fn from_directory(dir: &Path, output_directory: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            Config::from_project_file(&path, output_directory)
                .with_context(|| format!("Loading configuration `{}`", path.display()))
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent, output_directory),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }

    /// Loads the project file at `path` and the theme next to it. The API
    /// endpoint may be overridden by the `PRISMIC_API_ENDPOINT` environment
    /// variable.
    pub fn from_project_file(path: &Path, output_directory: &Path) -> Result<Config> {
        let project: Project = serde_yaml::from_reader(open(path, "project")?)?;
        let project_root = path.parent().ok_or_else(|| {
            anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )
        })?;
        let theme_dir = project_root.join("theme");
        let theme: Theme =
            serde_yaml::from_reader(open(&theme_dir.join("theme.yaml"), "theme")?)?;
        let endpoint = std::env::var(ENDPOINT_VARIABLE).ok();
        Config::new(project, theme, &theme_dir, output_directory, endpoint)
    }

    fn new(
        project: Project,
        theme: Theme,
        theme_dir: &Path,
        output_directory: &Path,
        endpoint_override: Option<String>,
    ) -> Result<Config> {
        let api_endpoint = match endpoint_override.filter(|e| !e.is_empty()) {
            Some(endpoint) => Url::parse(&endpoint)
                .with_context(|| format!("Parsing `{}`", ENDPOINT_VARIABLE))?,
            None => project.api_endpoint.ok_or_else(|| {
                anyhow!(
                    "No API endpoint: set `api_endpoint` or `{}`",
                    ENDPOINT_VARIABLE
                )
            })?,
        };

        let site_root = with_trailing_slash(project.site_root);
        Ok(Config {
            title: project.title,
            api_endpoint,
            document_type: project.document_type,
            index_page_size: project.index_page_size.0.max(1),
            index_url: site_root.join("pages/")?,
            posts_url: site_root.join("posts/")?,
            static_url: site_root.join("static/")?,
            home_page: site_root,
            index_template: theme
                .index_template
                .iter()
                .map(|relpath| theme_dir.join(relpath))
                .collect(),
            posts_template: theme
                .posts_template
                .iter()
                .map(|relpath| theme_dir.join(relpath))
                .collect(),
            static_source_directory: theme_dir.join("static"),
            root_output_directory: output_directory.to_owned(),
            index_output_directory: output_directory.join("pages"),
            posts_output_directory: output_directory.join("posts"),
            static_output_directory: output_directory.join("static"),
        })
    }
}

// `Url::join` treats the last segment as a file unless the path ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn open(path: &Path, kind: &str) -> Result<File> {
    File::open(path).map_err(|e| anyhow!("Opening {} file `{}`: {}", kind, path.display(), e))
}

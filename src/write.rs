use crate::detail::PostDetail;
use crate::pagination::AccumulatedListing;
use crate::value::{detail_to_value, summary_to_value, url_to_value};
use gtmpl::{Template, Value};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use url::Url;

/// Responsible for templating and writing index and post pages to disk.
pub struct Writer<'a> {
    /// The template for post pages.
    pub posts_template: &'a Template,

    /// The template for index pages.
    pub index_template: &'a Template,

    /// The base URL for index pages. The first index page is located at
    /// `{index_base_url}/index.html`, the following ones at
    /// `{index_base_url}/1.html`, `{index_base_url}/2.html`, etc. This should
    /// end in a trailing slash.
    pub index_base_url: &'a Url,

    /// The directory in which the index HTML files will be written.
    pub index_output_directory: &'a Path,

    /// The base URL for post pages (`{posts_base_url}/{slug}.html`). This
    /// should end in a trailing slash.
    pub posts_base_url: &'a Url,

    /// The directory in which the post HTML files will be written.
    pub posts_output_directory: &'a Path,

    /// The URL for the site's home page. This is made available to both post
    /// and index templates, typically as the destination for the header link.
    pub home_page: &'a Url,

    /// The URL for the static assets. This is made available to both post and
    /// index templates, typically for the theme's stylesheet and logo.
    pub static_url: &'a Url,

    /// The site title, made available to both templates as `site_title`.
    pub site_title: &'a str,
}

impl Writer<'_> {
    /// Takes a single [`Page`], templates it, and writes it to disk.
    fn write_page(&self, page: &Page) -> Result<()> {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("item".to_owned(), page.item.clone());
        m.insert("next".to_owned(), url_to_value(page.next.as_ref()));
        m.insert(
            "home_page".to_owned(),
            Value::String(self.home_page.to_string()),
        );
        m.insert(
            "static_url".to_owned(),
            Value::String(self.static_url.to_string()),
        );
        m.insert(
            "site_title".to_owned(),
            Value::String(self.site_title.to_owned()),
        );

        if let Some(dir) = page.file_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        page.template.execute(
            &mut std::fs::File::create(&page.file_path)?,
            &gtmpl::Context::from(Value::Object(m))?,
        )?;
        Ok(())
    }

    /// Writes one index page per listing snapshot. Page `i` shows snapshot
    /// `i` and links to page `i + 1` as its "load more" target, but only if
    /// the snapshot still has a cursor and the following snapshot exists.
    pub fn write_index(&self, snapshots: &[&AccumulatedListing]) -> Result<()> {
        for (i, listing) in snapshots.iter().enumerate() {
            let posts = listing
                .results()
                .iter()
                .map(|summary| -> Result<Value> {
                    let url = match &summary.uid {
                        Some(uid) => Some(self.post_url(uid)?),
                        None => None,
                    };
                    Ok(summary_to_value(summary, url.as_ref())?)
                })
                .collect::<Result<Vec<Value>>>()?;

            let mut item: HashMap<String, Value> = HashMap::new();
            item.insert("posts".to_owned(), Value::Array(posts));

            self.write_page(&Page {
                item: Value::Object(item),
                file_path: self.index_output_directory.join(index_file_name(i)),
                next: match listing.has_more() && i + 1 < snapshots.len() {
                    false => None,
                    true => Some(self.index_base_url.join(&index_file_name(i + 1))?),
                },
                template: self.index_template,
            })?;
        }
        Ok(())
    }

    /// Writes the page for the post with slug `uid` and returns its path.
    pub fn write_post(&self, uid: &str, post: &PostDetail) -> Result<PathBuf> {
        let file_path = self.posts_output_directory.join(post_file_name(uid));
        self.write_page(&Page {
            item: detail_to_value(post)?,
            file_path: file_path.clone(),
            next: None,
            template: self.posts_template,
        })?;
        Ok(file_path)
    }

    /// The URL for the post with slug `uid`.
    pub fn post_url(&self, uid: &str) -> Result<Url> {
        Ok(self.posts_base_url.join(&post_file_name(uid))?)
    }
}

/// The file name for a post's page. Slugs are slugified again so that no
/// slug can escape the posts directory.
pub fn post_file_name(uid: &str) -> String {
    format!("{}.html", slug::slugify(uid))
}

fn index_file_name(i: usize) -> String {
    match i > 0 {
        false => String::from("index.html"),
        true => format!("{}.html", i),
    }
}

/// An object representing an output HTML file.
struct Page<'a> {
    /// The main item for the page.
    item: Value,

    /// The target location on disk for the output file.
    file_path: PathBuf,

    /// The URL for the next page, if any.
    next: Option<Url>,

    /// The template with which the page will be rendered.
    template: &'a Template,
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),

    /// An error building page URLs.
    UrlParse(url::ParseError),

    /// An error writing the output files.
    Io(io::Error),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts a [`url::ParseError`] into an [`Error`]. This allows us to use
    /// the `?` operator when joining URLs.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::UrlParse(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::listing::{PostPage, PostSummary};

    fn summary(uid: &str) -> PostSummary {
        PostSummary {
            uid: Some(uid.to_owned()),
            date: Some(String::from("19 Abr 2021")),
            title: format!("Title {}", uid),
            subtitle: String::from("Subtitle"),
            author: String::from("Author"),
        }
    }

    fn template(source: &str) -> Template {
        let mut template = Template::default();
        // the test templates are valid
        template.parse(source).unwrap();
        template
    }

    struct Fixture {
        dir: tempfile::TempDir,
        index_template: Template,
        posts_template: Template,
        index_url: Url,
        posts_url: Url,
        home_page: Url,
        static_url: Url,
    }

    impl Fixture {
        fn new() -> std::result::Result<Fixture, Box<dyn std::error::Error>> {
            Ok(Fixture {
                dir: tempfile::tempdir()?,
                index_template: template(
                    "{{range .item.posts}}[{{.title}}|{{.url}}]{{end}}{{if .next}}more:{{.next}}{{end}}",
                ),
                posts_template: template(
                    "{{.item.title}} {{.item.date}} {{.item.reading_time}} min{{range .item.content}} {{.heading}}:{{.body}}{{end}}",
                ),
                index_url: Url::parse("https://example.org/pages/")?,
                posts_url: Url::parse("https://example.org/posts/")?,
                home_page: Url::parse("https://example.org/")?,
                static_url: Url::parse("https://example.org/static/")?,
            })
        }

        fn writer(&self) -> Writer {
            Writer {
                posts_template: &self.posts_template,
                index_template: &self.index_template,
                index_base_url: &self.index_url,
                index_output_directory: self.dir.path(),
                posts_base_url: &self.posts_url,
                posts_output_directory: self.dir.path(),
                home_page: &self.home_page,
                static_url: &self.static_url,
                site_title: "spacetraveling",
            }
        }

        fn read(&self, file_name: &str) -> io::Result<String> {
            std::fs::read_to_string(self.dir.path().join(file_name))
        }
    }

    #[test]
    fn test_write_index() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let fixture = Fixture::new()?;
        let first = AccumulatedListing::new(PostPage {
            next_page: Some(String::from("/p2")),
            results: vec![summary("a")],
        });
        let second = first.append_page(PostPage {
            next_page: None,
            results: vec![summary("b")],
        });
        fixture.writer().write_index(&[&first, &second])?;

        assert_eq!(
            "[Title a|https://example.org/posts/a.html]more:https://example.org/pages/1.html",
            fixture.read("index.html")?
        );
        assert_eq!(
            "[Title a|https://example.org/posts/a.html][Title b|https://example.org/posts/b.html]",
            fixture.read("1.html")?
        );
        Ok(())
    }

    #[test]
    fn test_write_index_without_following_snapshot(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let fixture = Fixture::new()?;
        let first = AccumulatedListing::new(PostPage {
            next_page: Some(String::from("/p2")),
            results: vec![summary("a")],
        });
        fixture.writer().write_index(&[&first])?;
        assert_eq!(
            "[Title a|https://example.org/posts/a.html]",
            fixture.read("index.html")?
        );
        Ok(())
    }

    #[test]
    fn test_write_post() -> std::result::Result<(), Box<dyn std::error::Error>> {
        use crate::content::{BodyFragment, ContentBlock};

        let fixture = Fixture::new()?;
        let path = fixture.writer().write_post(
            "como-utilizar-hooks",
            &PostDetail {
                date: Some(String::from("19 Abr 2021")),
                title: String::from("Hooks"),
                banner: String::new(),
                author: String::from("Joseph"),
                content: vec![ContentBlock {
                    heading: String::from("Intro"),
                    body: vec![BodyFragment::new("paragraph", "Hello")],
                }],
                reading_time: 1,
            },
        )?;

        assert_eq!(fixture.dir.path().join("como-utilizar-hooks.html"), path);
        assert_eq!(
            "Hooks 19 Abr 2021 1 min Intro:<p>Hello</p>",
            fixture.read("como-utilizar-hooks.html")?
        );
        Ok(())
    }

    #[test]
    fn test_post_file_name_is_slugified() {
        assert_eq!("etc-passwd.html", post_file_name("../etc/passwd"));
        assert_eq!("como-utilizar-hooks.html", post_file_name("como-utilizar-hooks"));
    }
}

//! Defines the [`ContentClient`] trait through which posts are fetched and
//! [`PrismicClient`], its implementation over a Prismic-style REST API.

use crate::content::{RawPost, RawPostPage};
use log::debug;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use url::Url;

/// A source of post documents.
pub trait ContentClient {
    /// Fetches the first page of documents of type `doc_type`.
    fn fetch_by_type(&self, doc_type: &str, page_size: usize) -> Result<RawPostPage>;

    /// Fetches the document of type `doc_type` whose slug is `uid`.
    fn fetch_by_uid(&self, doc_type: &str, uid: &str) -> Result<RawPost>;

    /// Fetches the page a previous response pointed to. The cursor is used
    /// verbatim.
    fn fetch_page(&self, cursor: &str) -> Result<RawPostPage>;
}

/// Talks to a Prismic-style API. Every query is pinned to the master ref
/// that was current when the client connected.
pub struct PrismicClient {
    http: Client,
    endpoint: Url,
    master_ref: String,
}

impl PrismicClient {
    /// Connects to the API rooted at `endpoint` (e.g.,
    /// `https://blog.cdn.prismic.io/api/v2`) and looks up the master ref.
    pub fn connect(endpoint: &Url) -> Result<PrismicClient> {
        let http = Client::builder()
            .user_agent(concat!("spacetraveling/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let api: Api = get(&http, endpoint.clone())?;
        let master_ref = api
            .refs
            .into_iter()
            .find(|r| r.is_master_ref)
            .ok_or(Error::MissingMasterRef)?
            .reference;
        debug!("connected to {} at ref {}", endpoint, master_ref);
        Ok(PrismicClient {
            http,
            endpoint: endpoint.clone(),
            master_ref,
        })
    }

    fn search(&self, query: &str, page_size: Option<usize>) -> Result<RawPostPage> {
        get(
            &self.http,
            search_url(&self.endpoint, &self.master_ref, query, page_size)?,
        )
    }
}

impl ContentClient for PrismicClient {
    fn fetch_by_type(&self, doc_type: &str, page_size: usize) -> Result<RawPostPage> {
        self.search(&type_query(doc_type), Some(page_size))
    }

    fn fetch_by_uid(&self, doc_type: &str, uid: &str) -> Result<RawPost> {
        self.search(&uid_query(doc_type, uid), None)?
            .results
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound {
                doc_type: doc_type.to_owned(),
                uid: uid.to_owned(),
            })
    }

    fn fetch_page(&self, cursor: &str) -> Result<RawPostPage> {
        // `join` returns absolute cursors unchanged.
        get(&self.http, self.endpoint.join(cursor)?)
    }
}

fn get<T: DeserializeOwned>(http: &Client, url: Url) -> Result<T> {
    debug!("GET {}", url);
    let response = http.get(url.clone()).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Status {
            url: url.to_string(),
            status,
        });
    }
    decode(url.as_str(), &response.text()?)
}

fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|err| Error::Decode {
        url: url.to_owned(),
        err,
    })
}

/// Builds the URL for a document search against `endpoint`.
fn search_url(
    endpoint: &Url,
    master_ref: &str,
    query: &str,
    page_size: Option<usize>,
) -> Result<Url> {
    let base = format!("{}/documents/search", endpoint.as_str().trim_end_matches('/'));
    let mut params = vec![("ref", master_ref.to_owned()), ("q", query.to_owned())];
    if let Some(page_size) = page_size {
        params.push(("pageSize", page_size.to_string()));
    }
    Ok(Url::parse_with_params(&base, &params)?)
}

fn type_query(doc_type: &str) -> String {
    format!("[[at(document.type,\"{}\")]]", doc_type)
}

fn uid_query(doc_type: &str, uid: &str) -> String {
    format!("[[at(my.{}.uid,\"{}\")]]", doc_type, escape_query_string(uid))
}

// Backslash-escapes the characters that would end a query string literal.
fn escape_query_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// The parts of the API root document we care about.
#[derive(Deserialize)]
struct Api {
    refs: Vec<Ref>,
}

#[derive(Deserialize)]
struct Ref {
    #[serde(rename = "ref")]
    reference: String,

    #[serde(default, rename = "isMasterRef")]
    is_master_ref: bool,
}

/// The result of a content API call.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a failed content API call.
#[derive(Debug)]
pub enum Error {
    /// Returned when the request couldn't be sent or its body couldn't be
    /// read.
    Http(reqwest::Error),

    /// Returned when a response body isn't the expected document.
    Decode { url: String, err: serde_json::Error },

    /// Returned when the API answers with a non-success status.
    Status { url: String, status: StatusCode },

    /// Returned when no document has the requested slug.
    NotFound { doc_type: String, uid: String },

    /// Returned when the API root lists no master ref.
    MissingMasterRef,

    /// Returned when a request URL can't be built.
    UrlParse(url::ParseError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Http(err) => err.fmt(f),
            Error::Decode { url, err } => write!(f, "decoding `{}`: {}", url, err),
            Error::Status { url, status } => {
                write!(f, "fetching `{}`: {}", url, status)
            }
            Error::NotFound { doc_type, uid } => {
                write!(f, "no `{}` document with uid `{}`", doc_type, uid)
            }
            Error::MissingMasterRef => write!(f, "the API has no master ref"),
            Error::UrlParse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(err) => Some(err),
            Error::Decode { err, .. } => Some(err),
            Error::Status { .. } => None,
            Error::NotFound { .. } => None,
            Error::MissingMasterRef => None,
            Error::UrlParse(err) => Some(err),
        }
    }
}

impl From<reqwest::Error> for Error {
    /// Converts a [`reqwest::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator on requests.
    fn from(err: reqwest::Error) -> Error {
        Error::Http(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts a [`url::ParseError`] into an [`Error`]. This allows us to
    /// use the `?` operator when building request URLs.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

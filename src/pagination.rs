//! The "load more" accumulator. An [`AccumulatedListing`] is an immutable
//! snapshot of every summary loaded so far; loading another page produces a
//! new snapshot and never touches the old one. A [`Session`] holds the latest
//! snapshot for a view.

use crate::client::{self, ContentClient};
use crate::content::RawPostPage;
use crate::date::FormatError;
use crate::listing::{normalize_listing, PostPage, PostSummary};
use log::{debug, warn};
use std::fmt;
use std::rc::Rc;

/// Every summary loaded so far, in load order, plus the cursor for the next
/// page. Summaries are never reordered or deduplicated.
#[derive(Clone, Debug, PartialEq)]
pub struct AccumulatedListing {
    results: Vec<PostSummary>,
    next_page: Option<String>,
}

impl AccumulatedListing {
    /// Starts a listing from its first page.
    pub fn new(first: PostPage) -> AccumulatedListing {
        AccumulatedListing {
            results: first.results,
            next_page: non_empty(first.next_page),
        }
    }

    pub fn results(&self) -> &[PostSummary] {
        &self.results
    }

    pub fn next_page(&self) -> Option<&str> {
        self.next_page.as_deref()
    }

    /// Whether "load more" may be offered at all.
    pub fn has_more(&self) -> bool {
        self.next_page.is_some()
    }

    /// Returns a new listing with `page`'s summaries after the current ones.
    /// The cursor is replaced by `page`'s; an empty one ends the listing.
    pub fn append_page(&self, page: PostPage) -> AccumulatedListing {
        let mut results = Vec::with_capacity(self.results.len() + page.results.len());
        results.extend_from_slice(&self.results);
        results.extend(page.results);
        AccumulatedListing {
            results,
            next_page: non_empty(page.next_page),
        }
    }

    /// Normalizes `raw` and appends it. On failure `self` is left as it was.
    pub fn append_raw(&self, raw: RawPostPage) -> Result<AccumulatedListing, FormatError> {
        Ok(self.append_page(normalize_listing(raw)?))
    }

    /// Fetches the page behind the current cursor and appends it. Fails with
    /// [`LoadError::Exhausted`] if there is no cursor.
    pub fn load_more<C: ContentClient>(&self, client: &C) -> Result<AccumulatedListing> {
        let cursor = self.next_page().ok_or(LoadError::Exhausted)?;
        debug!("loading more posts from {}", cursor);
        let raw = client.fetch_page(cursor)?;
        Ok(self.append_raw(raw)?)
    }
}

fn non_empty(cursor: Option<String>) -> Option<String> {
    cursor.filter(|cursor| !cursor.is_empty())
}

/// Holds the latest snapshot of a listing. Loading takes `&mut self`, so a
/// second load can't start while one is in flight.
#[derive(Debug)]
pub struct Session {
    listing: Rc<AccumulatedListing>,
}

impl Session {
    pub fn new(listing: AccumulatedListing) -> Session {
        Session {
            listing: Rc::new(listing),
        }
    }

    /// The snapshot to display.
    pub fn listing(&self) -> &Rc<AccumulatedListing> {
        &self.listing
    }

    /// Loads the next page. On success the session moves to the new
    /// snapshot; on failure it keeps the current one and the reason is
    /// returned for the view to report.
    pub fn load_more<C: ContentClient>(&mut self, client: &C) -> Result<&Rc<AccumulatedListing>> {
        match self.listing.load_more(client) {
            Ok(listing) => {
                self.listing = Rc::new(listing);
                Ok(&self.listing)
            }
            Err(err) => {
                warn!("loading more posts: {}", err);
                Err(err)
            }
        }
    }
}

/// The result of a "load more" action.
pub type Result<T> = std::result::Result<T, LoadError>;

/// Why a "load more" action failed.
#[derive(Debug)]
pub enum LoadError {
    /// Returned when the listing has no next page.
    Exhausted,

    /// Returned when the next page couldn't be fetched.
    Fetch(client::Error),

    /// Returned when the next page contained an unparseable date.
    Format(FormatError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LoadError::Exhausted => write!(f, "there are no more posts to load"),
            LoadError::Fetch(err) => err.fmt(f),
            LoadError::Format(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Exhausted => None,
            LoadError::Fetch(err) => Some(err),
            LoadError::Format(err) => Some(err),
        }
    }
}

impl From<client::Error> for LoadError {
    fn from(err: client::Error) -> LoadError {
        LoadError::Fetch(err)
    }
}

impl From<FormatError> for LoadError {
    fn from(err: FormatError) -> LoadError {
        LoadError::Format(err)
    }
}

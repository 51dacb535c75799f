//! The library code for the `spacetraveling` static blog generator. Posts
//! live in a headless content API; the generator fetches them and renders
//! them to HTML. The architecture can be generally broken down into three
//! steps:
//!
//! 1. Fetching raw documents from the content API ([`crate::client`])
//! 2. Normalizing them into the shapes the pages show ([`crate::listing`],
//!    [`crate::pagination`], [`crate::detail`])
//! 3. Templating the normalized posts and writing them to disk
//!    ([`crate::write`])
//!
//! The index mirrors a "load more" button: the first index page shows the
//! first listing page, and each following index page shows everything the
//! previous one did plus one more listing page. Every post also gets its own
//! page, with a reading-time estimate ([`crate::reading_time`]).

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod client;
pub mod config;
pub mod content;
pub mod date;
pub mod detail;
pub mod listing;
pub mod pagination;
pub mod paths;
pub mod reading_time;
pub mod richtext;
pub mod value;
pub mod write;

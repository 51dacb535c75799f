//! Defines [`PostDetail`], the normalized form of a single post page.

use crate::content::{ContentBlock, RawPost};
use crate::date::{format_publication_date, FormatError};
use crate::reading_time::estimate_minutes;

#[derive(Clone, Debug, PartialEq)]
pub struct PostDetail {
    pub date: Option<String>,
    pub title: String,
    pub banner: String,
    pub author: String,

    /// The content blocks exactly as the API returned them. Body fragments
    /// are rendered to HTML only when the page is templated.
    pub content: Vec<ContentBlock>,

    /// Estimated reading time in minutes.
    pub reading_time: usize,
}

/// Normalizes a raw post for its own page. Fails only if the publication date
/// can't be parsed.
pub fn normalize_detail(raw: RawPost) -> Result<PostDetail, FormatError> {
    let date = format_publication_date(raw.first_publication_date.as_deref())?;
    let data = raw.data;
    Ok(PostDetail {
        date,
        reading_time: estimate_minutes(&data.content),
        title: data.title,
        banner: data.banner.url,
        author: data.author,
        content: data.content,
    })
}

//! Defines [`PostSummary`] and [`PostPage`] and the transformation from a raw
//! listing page into them.

use crate::content::{RawPost, RawPostPage};
use crate::date::{format_publication_date, FormatError};

/// The fields of a post shown on the index: everything but the content.
#[derive(Clone, Debug, PartialEq)]
pub struct PostSummary {
    /// The post's slug, used to address its page.
    pub uid: Option<String>,

    /// The formatted publication date, absent for unpublished documents.
    pub date: Option<String>,

    pub title: String,
    pub subtitle: String,
    pub author: String,
}

impl PostSummary {
    /// Summarizes a single raw post. Fails only if the publication date can't
    /// be parsed.
    pub fn from_raw(post: &RawPost) -> Result<PostSummary, FormatError> {
        Ok(PostSummary {
            uid: post.uid.clone(),
            date: format_publication_date(post.first_publication_date.as_deref())?,
            title: post.data.title.clone(),
            subtitle: post.data.subtitle.clone(),
            author: post.data.author.clone(),
        })
    }
}

/// A normalized listing page.
#[derive(Clone, Debug, PartialEq)]
pub struct PostPage {
    /// The cursor for the following page, if there is one.
    pub next_page: Option<String>,

    /// The summaries in server order.
    pub results: Vec<PostSummary>,
}

/// Normalizes a raw listing page. Order and count are preserved; the first
/// unparseable publication date fails the whole page. An empty cursor means
/// there is no next page.
pub fn normalize_listing(raw: RawPostPage) -> Result<PostPage, FormatError> {
    Ok(PostPage {
        results: raw
            .results
            .iter()
            .map(PostSummary::from_raw)
            .collect::<Result<Vec<PostSummary>, FormatError>>()?,
        next_page: raw.next_page.filter(|cursor| !cursor.is_empty()),
    })
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::content::{Banner, RawPostData};

    pub(crate) fn raw_post(uid: &str, date: Option<&str>) -> RawPost {
        RawPost {
            uid: Some(uid.to_owned()),
            first_publication_date: date.map(str::to_owned),
            data: RawPostData {
                title: format!("Title {}", uid),
                subtitle: format!("Subtitle {}", uid),
                author: format!("Author {}", uid),
                banner: Banner::default(),
                content: Vec::new(),
            },
        }
    }

    pub(crate) fn raw_page(next_page: Option<&str>, uids: &[&str]) -> RawPostPage {
        RawPostPage {
            next_page: next_page.map(str::to_owned),
            results: uids
                .iter()
                .map(|uid| raw_post(uid, Some("2021-04-19T00:00:00Z")))
                .collect(),
        }
    }

    #[test]
    fn test_normalize_listing() -> Result<(), FormatError> {
        let page = normalize_listing(raw_page(Some("/p2"), &["a"]))?;
        assert_eq!(
            PostPage {
                next_page: Some(String::from("/p2")),
                results: vec![PostSummary {
                    uid: Some(String::from("a")),
                    date: Some(String::from("19 Abr 2021")),
                    title: String::from("Title a"),
                    subtitle: String::from("Subtitle a"),
                    author: String::from("Author a"),
                }],
            },
            page
        );
        Ok(())
    }

    #[test]
    fn test_normalize_listing_preserves_order() -> Result<(), FormatError> {
        let uids = ["c", "a", "b", "a"];
        let page = normalize_listing(raw_page(None, &uids))?;
        assert_eq!(uids.len(), page.results.len());
        for (uid, summary) in uids.iter().zip(page.results.iter()) {
            assert_eq!(Some(*uid), summary.uid.as_deref());
        }
        Ok(())
    }

    #[test]
    fn test_normalize_listing_empty_cursor() -> Result<(), FormatError> {
        let page = normalize_listing(raw_page(Some(""), &["a"]))?;
        assert_eq!(None, page.next_page);
        assert_eq!(1, page.results.len());
        Ok(())
    }

    #[test]
    fn test_normalize_listing_without_date() -> Result<(), FormatError> {
        let mut raw = raw_page(None, &[]);
        raw.results.push(raw_post("draft", None));
        let page = normalize_listing(raw)?;
        assert_eq!(None, page.results[0].date);
        Ok(())
    }

    #[test]
    fn test_normalize_listing_invalid_date() {
        let mut raw = raw_page(None, &["a"]);
        raw.results.push(raw_post("b", Some("not a date")));
        assert!(normalize_listing(raw).is_err());
    }
}

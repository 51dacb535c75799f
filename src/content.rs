//! Schemas for the documents returned by the content API. These are trusted
//! verbatim: beyond the required fields listed on each type, nothing is
//! validated.

use serde::{Deserialize, Deserializer, Serialize};

/// A page of documents from a typed or cursor query.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RawPostPage {
    /// The cursor (a fully-qualified URL) for the following page. `null` and
    /// the empty string both deserialize to `None`.
    #[serde(default, deserialize_with = "deserialize_cursor")]
    pub next_page: Option<String>,

    /// The documents on this page, in server order. Required: a body without
    /// it is not a listing page.
    pub results: Vec<RawPost>,
}

/// A single post document.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RawPost {
    /// The post's slug. Documents created before a UID field was added to
    /// the type don't have one.
    #[serde(default)]
    pub uid: Option<String>,

    /// The ISO-8601 publication timestamp; `null` for unpublished previews.
    #[serde(default)]
    pub first_publication_date: Option<String>,

    pub data: RawPostData,
}

/// The custom fields of a post document. `title` and `author` are required;
/// the rest default to empty because listing queries and detail queries
/// don't always need them.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RawPostData {
    pub title: String,

    #[serde(default)]
    pub subtitle: String,

    pub author: String,

    #[serde(default)]
    pub banner: Banner,

    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Banner {
    #[serde(default)]
    pub url: String,
}

/// A section of a post: a heading followed by rich-text body fragments.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ContentBlock {
    #[serde(default)]
    pub heading: String,

    #[serde(default)]
    pub body: Vec<BodyFragment>,
}

/// A rich-text fragment (paragraph, heading, list item, image, ...). See
/// [`crate::richtext`] for how each kind is rendered.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct BodyFragment {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub spans: Vec<Span>,

    /// Image source, for `image` fragments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Image alt text, for `image` fragments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,

    /// Embedded markup, for `embed` fragments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oembed: Option<Embed>,
}

impl BodyFragment {
    /// Creates a plain fragment of kind `kind` with no spans.
    pub fn new(kind: &str, text: &str) -> BodyFragment {
        BodyFragment {
            kind: kind.to_owned(),
            text: text.to_owned(),
            spans: Vec::new(),
            url: None,
            alt: None,
            oembed: None,
        }
    }
}

/// Inline formatting over the character range `start..end` of a fragment's
/// text.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,

    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<SpanData>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct SpanData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Embed {
    #[serde(default)]
    pub html: String,
}

fn deserialize_cursor<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_deserialize_search_response() -> serde_json::Result<()> {
        let page: RawPostPage = serde_json::from_str(
            r#"{
                "page": 1,
                "results_per_page": 1,
                "next_page": "https://blog.cdn.prismic.io/api/v2/documents/search?page=2",
                "results": [{
                    "id": "YF1gOBIAACMAzZ0N",
                    "uid": "como-utilizar-hooks",
                    "type": "posts",
                    "first_publication_date": "2021-03-25T19:25:28+0000",
                    "data": {
                        "title": "Como utilizar Hooks",
                        "subtitle": "Pensando em sincronização em vez de ciclos de vida",
                        "author": "Joseph Oliveira"
                    }
                }]
            }"#,
        )?;

        assert_eq!(
            Some("https://blog.cdn.prismic.io/api/v2/documents/search?page=2"),
            page.next_page.as_deref()
        );
        assert_eq!(1, page.results.len());
        let post = &page.results[0];
        assert_eq!(Some("como-utilizar-hooks"), post.uid.as_deref());
        assert_eq!("Joseph Oliveira", post.data.author);
        assert!(post.data.content.is_empty());
        Ok(())
    }

    #[test]
    fn test_deserialize_last_page() -> serde_json::Result<()> {
        let page: RawPostPage =
            serde_json::from_str(r#"{"next_page": null, "results": []}"#)?;
        assert_eq!(None, page.next_page);

        let page: RawPostPage =
            serde_json::from_str(r#"{"next_page": "", "results": []}"#)?;
        assert_eq!(None, page.next_page);
        Ok(())
    }

    #[test]
    fn test_page_without_results_is_rejected() {
        let result: serde_json::Result<RawPostPage> =
            serde_json::from_str(r#"{"refs": [], "types": {"posts": "Posts"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_content_blocks() -> serde_json::Result<()> {
        let post: RawPost = serde_json::from_str(
            r#"{
                "uid": "a",
                "first_publication_date": null,
                "data": {
                    "title": "A",
                    "author": "Someone",
                    "banner": {"url": "https://images.example.org/a.png"},
                    "content": [{
                        "heading": "Intro",
                        "body": [{
                            "type": "paragraph",
                            "text": "Read the docs",
                            "spans": [{
                                "start": 9,
                                "end": 13,
                                "type": "hyperlink",
                                "data": {"link_type": "Web", "url": "https://example.org"}
                            }]
                        }]
                    }]
                }
            }"#,
        )?;

        assert_eq!(None, post.first_publication_date);
        assert_eq!("https://images.example.org/a.png", post.data.banner.url);
        let fragment = &post.data.content[0].body[0];
        assert_eq!("paragraph", fragment.kind);
        assert_eq!(
            Some("https://example.org"),
            fragment.spans[0].data.as_ref().and_then(|d| d.url.as_deref())
        );
        Ok(())
    }

    #[test]
    fn test_missing_title_is_rejected() {
        let result: serde_json::Result<RawPost> =
            serde_json::from_str(r#"{"data": {"author": "Someone"}}"#);
        assert!(result.is_err());
    }
}

//! Conversions from normalized posts into template [`Value`]s. Plain-text
//! fields are HTML-escaped here since templates insert values verbatim.

use crate::detail::PostDetail;
use crate::listing::PostSummary;
use crate::richtext;
use gtmpl_value::Value;
use pulldown_cmark::escape::escape_html;
use std::collections::HashMap;
use std::io;
use url::Url;

/// Converts a summary into an object with fields `url`, `date`, `title`,
/// `subtitle`, and `author`. `url` is nil for posts without a slug.
pub fn summary_to_value(summary: &PostSummary, url: Option<&Url>) -> io::Result<Value> {
    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("url".to_owned(), url_to_value(url));
    m.insert("date".to_owned(), optional_text(summary.date.as_deref())?);
    m.insert("title".to_owned(), text(&summary.title)?);
    m.insert("subtitle".to_owned(), text(&summary.subtitle)?);
    m.insert("author".to_owned(), text(&summary.author)?);
    Ok(Value::Object(m))
}

/// Converts a post into an object with fields `title`, `banner`, `author`,
/// `date`, `reading_time`, and `content`. Each element of `content` has a
/// `heading` and the rendered `body` HTML.
pub fn detail_to_value(detail: &PostDetail) -> io::Result<Value> {
    let content = detail
        .content
        .iter()
        .map(|block| -> io::Result<Value> {
            let mut m: HashMap<String, Value> = HashMap::new();
            m.insert("heading".to_owned(), text(&block.heading)?);
            m.insert("body".to_owned(), Value::String(richtext::as_html(&block.body)?));
            Ok(Value::Object(m))
        })
        .collect::<io::Result<Vec<Value>>>()?;

    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("title".to_owned(), text(&detail.title)?);
    m.insert("banner".to_owned(), text(&detail.banner)?);
    m.insert("author".to_owned(), text(&detail.author)?);
    m.insert("date".to_owned(), optional_text(detail.date.as_deref())?);
    m.insert(
        "reading_time".to_owned(),
        Value::from(detail.reading_time as u64),
    );
    m.insert("content".to_owned(), Value::Array(content));
    Ok(Value::Object(m))
}

pub fn url_to_value(url: Option<&Url>) -> Value {
    match url {
        Some(url) => Value::String(url.to_string()),
        None => Value::Nil,
    }
}

fn text(s: &str) -> io::Result<Value> {
    let mut escaped = String::with_capacity(s.len());
    escape_html(&mut escaped, s)?;
    Ok(Value::String(escaped))
}

fn optional_text(s: Option<&str>) -> io::Result<Value> {
    match s {
        Some(s) => text(s),
        None => Ok(Value::Nil),
    }
}

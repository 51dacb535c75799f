//! Renders rich-text [`BodyFragment`]s into HTML. Fragments map onto block
//! elements one-to-one except list items: consecutive `list-item` and
//! `o-list-item` fragments are wrapped in a single `<ul>` or `<ol>`.
//!
//! Spans are character ranges over a fragment's text. They are rendered as a
//! stack: a span that ends while a later-opened span is still open closes that
//! span too, and the survivor is reopened right after.

use crate::content::{BodyFragment, Span};
use pulldown_cmark::escape::{escape_href, escape_html, StrWrite};
use std::io;

/// Renders `fragments` into a new string.
pub fn as_html(fragments: &[BodyFragment]) -> io::Result<String> {
    let mut html = String::new();
    push_html(&mut html, fragments)?;
    Ok(html)
}

/// Renders `fragments`, writing the result into `w`.
pub fn push_html<W: StrWrite>(w: &mut W, fragments: &[BodyFragment]) -> io::Result<()> {
    let mut list: Option<&str> = None;
    for fragment in fragments {
        let wanted = match fragment.kind.as_str() {
            "list-item" => Some("ul"),
            "o-list-item" => Some("ol"),
            _ => None,
        };
        if list != wanted {
            if let Some(tag) = list {
                write!(w, "</{}>", tag)?;
            }
            if let Some(tag) = wanted {
                write!(w, "<{}>", tag)?;
            }
            list = wanted;
        }
        push_fragment(w, fragment)?;
    }
    if let Some(tag) = list {
        write!(w, "</{}>", tag)?;
    }
    Ok(())
}

fn push_fragment<W: StrWrite>(w: &mut W, fragment: &BodyFragment) -> io::Result<()> {
    let tag = match fragment.kind.as_str() {
        "image" => return push_image(w, fragment),
        "embed" => {
            w.write_str("<div data-oembed>")?;
            if let Some(embed) = &fragment.oembed {
                w.write_str(&embed.html)?;
            }
            return w.write_str("</div>");
        }
        "heading1" => "h1",
        "heading2" => "h2",
        "heading3" => "h3",
        "heading4" => "h4",
        "heading5" => "h5",
        "heading6" => "h6",
        "preformatted" => "pre",
        "list-item" | "o-list-item" => "li",
        _ => "p",
    };
    write!(w, "<{}>", tag)?;
    push_spans(w, &fragment.text, &fragment.spans)?;
    write!(w, "</{}>", tag)
}

fn push_image<W: StrWrite>(w: &mut W, fragment: &BodyFragment) -> io::Result<()> {
    w.write_str("<p class=\"block-img\"><img src=\"")?;
    escape_href(&mut *w, fragment.url.as_deref().unwrap_or_default())?;
    w.write_str("\" alt=\"")?;
    escape_html(&mut *w, fragment.alt.as_deref().unwrap_or_default())?;
    w.write_str("\" /></p>")
}

fn push_spans<W: StrWrite>(w: &mut W, text: &str, spans: &[Span]) -> io::Result<()> {
    let chars: Vec<char> = text.chars().collect();

    // Outer spans first so that they end up lower on the stack.
    let mut spans: Vec<&Span> = spans
        .iter()
        .filter(|s| s.start < s.end && s.end <= chars.len())
        .collect();
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut open: Vec<&Span> = Vec::new();
    let mut next = 0;
    let mut pending = String::new();
    for pos in 0..=chars.len() {
        if open.iter().any(|s| s.end == pos) {
            push_text(w, &pending)?;
            pending.clear();

            let mut reopen = Vec::new();
            while let Some(span) = open.pop() {
                close_span(w, span)?;
                if span.end != pos {
                    reopen.push(span);
                }
                if !open.iter().any(|s| s.end == pos) {
                    break;
                }
            }
            while let Some(span) = reopen.pop() {
                open_span(w, span)?;
                open.push(span);
            }
        }

        while next < spans.len() && spans[next].start == pos {
            push_text(w, &pending)?;
            pending.clear();
            open_span(w, spans[next])?;
            open.push(spans[next]);
            next += 1;
        }

        if let Some(c) = chars.get(pos) {
            pending.push(*c);
        }
    }
    push_text(w, &pending)
}

fn push_text<W: StrWrite>(w: &mut W, text: &str) -> io::Result<()> {
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            w.write_str("<br />")?;
        }
        escape_html(&mut *w, line)?;
    }
    Ok(())
}

fn open_span<W: StrWrite>(w: &mut W, span: &Span) -> io::Result<()> {
    let data = span.data.as_ref();
    match span.kind.as_str() {
        "strong" => w.write_str("<strong>"),
        "em" => w.write_str("<em>"),
        "hyperlink" => {
            w.write_str("<a href=\"")?;
            escape_href(&mut *w, data.and_then(|d| d.url.as_deref()).unwrap_or_default())?;
            w.write_str("\">")
        }
        "label" => {
            w.write_str("<span class=\"")?;
            escape_html(&mut *w, data.and_then(|d| d.label.as_deref()).unwrap_or_default())?;
            w.write_str("\">")
        }
        _ => w.write_str("<span>"),
    }
}

fn close_span<W: StrWrite>(w: &mut W, span: &Span) -> io::Result<()> {
    match span.kind.as_str() {
        "strong" => w.write_str("</strong>"),
        "em" => w.write_str("</em>"),
        "hyperlink" => w.write_str("</a>"),
        _ => w.write_str("</span>"),
    }
}

//! Enumerates the slugs of every published post so that each one gets a page
//! at build time. Posts published afterwards are rendered on demand (see
//! [`crate::build::build_post`]).

use crate::client::{ContentClient, Result};
use log::{debug, warn};
use std::collections::HashSet;

/// Returns the slug of every document of type `doc_type`, following cursors
/// until the last page. Documents without a slug are skipped. A cursor that
/// was already visited ends the walk.
pub fn static_paths<C: ContentClient>(
    client: &C,
    doc_type: &str,
    page_size: usize,
) -> Result<Vec<String>> {
    let mut slugs = Vec::new();
    let mut visited = HashSet::new();
    let mut page = client.fetch_by_type(doc_type, page_size)?;
    loop {
        for post in page.results {
            match post.uid {
                Some(uid) => slugs.push(uid),
                None => warn!("skipping a `{}` document without a uid", doc_type),
            }
        }
        match page.next_page {
            Some(cursor) if visited.insert(cursor.clone()) => {
                debug!("enumerating paths from {}", cursor);
                page = client.fetch_page(&cursor)?;
            }
            Some(cursor) => {
                warn!("cursor `{}` was already visited", cursor);
                break;
            }
            None => break,
        }
    }
    Ok(slugs)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::client::test::MemoryClient;
    use crate::client::Error;
    use crate::listing::test::raw_page;

    #[test]
    fn test_static_paths_follows_cursors() -> Result<()> {
        let mut client = MemoryClient::default();
        client.first_page = Some(raw_page(Some("/p2"), &["a", "b"]));
        client
            .pages
            .insert(String::from("/p2"), raw_page(None, &["c"]));

        assert_eq!(vec!["a", "b", "c"], static_paths(&client, "posts", 20)?);
        Ok(())
    }

    #[test]
    fn test_static_paths_skips_documents_without_uid() -> Result<()> {
        let mut page = raw_page(None, &["a", "b"]);
        page.results[0].uid = None;
        let client = MemoryClient {
            first_page: Some(page),
            ..MemoryClient::default()
        };

        assert_eq!(vec!["b"], static_paths(&client, "posts", 20)?);
        Ok(())
    }

    #[test]
    fn test_static_paths_stops_on_cursor_cycle() -> Result<()> {
        let mut client = MemoryClient::default();
        client.first_page = Some(raw_page(Some("/p2"), &["a"]));
        client
            .pages
            .insert(String::from("/p2"), raw_page(Some("/p2"), &["b"]));

        assert_eq!(vec!["a", "b"], static_paths(&client, "posts", 20)?);
        assert_eq!(2, client.requests.get());
        Ok(())
    }

    #[test]
    fn test_static_paths_propagates_fetch_errors() {
        let mut client = MemoryClient::default();
        client.first_page = Some(raw_page(Some("/missing"), &["a"]));
        assert!(matches!(
            static_paths(&client, "posts", 20),
            Err(Error::Status { .. })
        ));
    }
}

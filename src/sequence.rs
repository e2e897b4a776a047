//! Lazily-populated, possibly paginated sequences of related resources.
//!
//! A [`RelatedSequence`] backs a list-valued relation. Each slot is either a
//! link that has not been followed yet or a fully resolved [`Resource`];
//! indexed access resolves a pending slot in place exactly once, so repeated
//! access never re-fetches. When the sequence was built from a paginated
//! collection it also carries the collection's `next` link, and iteration
//! transparently requests further pages as it walks past the known items.
//!
//! Random-index access never triggers pagination; only iteration does. To
//! keep that network side effect visible in the API, iteration happens
//! through an explicit [`Cursor`] and [`RelatedSequence::try_next`] rather
//! than `Iterator`: the suspension point is an ordinary `.await` at the call
//! site. Cursors are cheap, restartable positions; any number of them can
//! walk the same sequence, sharing its slot cache, so items fetched through
//! one cursor are hits for every other.
//!
//! # Example
//!
//! ```rust,ignore
//! use hal_client::HalClient;
//!
//! let client = HalClient::new();
//! let mut collection = client.get("http://api.example.com/devices").await?;
//! let sequence = collection.rel("items", &client).await?.as_sequence_mut().unwrap();
//!
//! let mut cursor = sequence.cursor();
//! while let Some(device) = sequence.try_next(&mut cursor, &client).await? {
//!     println!("{:?}", device.field_str("name"));
//! }
//! ```

use crate::client::HalClient;
use crate::error::Error;
use crate::link::{Link, LinkValue};
use crate::resource::{Resource, ITEMS_REL, NEXT_REL};

/// One position in a sequence: an unfollowed link or a resolved resource.
#[derive(Debug, Clone, PartialEq)]
enum Slot {
    /// The item is known only as a link; it resolves on first access.
    Pending(Link),
    /// The item has been resolved (fetched, server-inlined, or appended).
    Ready(Resource),
}

/// An ordered, lazily-resolved, possibly paginated sequence of resources.
///
/// The sequence grows by appending newly fetched pages and never shrinks.
/// [`RelatedSequence::len`] counts only the currently known items and never
/// fetches.
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedSequence {
    items: Vec<Slot>,
    /// Link to the next page; `None` once the final page has been consumed
    /// or if the source was never paginated.
    next_page: Option<Link>,
}

impl RelatedSequence {
    /// Builds a sequence of unresolved links, optionally paginated.
    pub(crate) fn new(links: Vec<Link>, next_page: Option<Link>) -> Self {
        Self {
            items: links.into_iter().map(Slot::Pending).collect(),
            next_page,
        }
    }

    /// Builds a fully resolved, unpaginated sequence (server-inlined
    /// `_embedded` arrays).
    pub(crate) fn from_resources(resources: Vec<Resource>) -> Self {
        Self {
            items: resources.into_iter().map(Slot::Ready).collect(),
            next_page: None,
        }
    }

    /// Returns the number of currently known items.
    ///
    /// Pre-pagination items only; never triggers a fetch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no items are currently known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns true if a next page is available.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.next_page.is_some()
    }

    /// Appends a fully resolved resource to the end of the known items.
    pub fn append(&mut self, resource: Resource) {
        self.items.push(Slot::Ready(resource));
    }

    /// Returns the item at `index`, resolving it first if it is still a
    /// link.
    ///
    /// A pending slot is fetched and rewritten in place exactly once;
    /// afterwards access is a cache hit. A failed fetch leaves the slot
    /// pending, so calling again retries cleanly. Never triggers pagination,
    /// even at the last known index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] past the known items; transport,
    /// decode, and document errors from the fetch propagate unchanged.
    pub async fn at(&mut self, index: usize, client: &HalClient) -> Result<&Resource, Error> {
        let pending_href = match self.items.get(index) {
            None => {
                return Err(Error::IndexOutOfBounds {
                    index,
                    len: self.items.len(),
                })
            }
            Some(Slot::Pending(link)) => Some(link.href().to_owned()),
            Some(Slot::Ready(_)) => None,
        };

        if let Some(href) = pending_href {
            tracing::debug!(index, href = %href, "item is an unresolved link, fetching");
            let resource = client.get(&href).await?;
            self.items[index] = Slot::Ready(resource);
        }

        match &self.items[index] {
            Slot::Ready(resource) => Ok(resource),
            // the slot was either ready or rewritten above
            Slot::Pending(_) => unreachable!("pending slot survived resolution"),
        }
    }

    /// Fetches the next page and appends its items.
    ///
    /// The page document's `items` links are appended as pending slots (a
    /// page without an `items` relation contributes nothing), and the
    /// sequence's next-page link is replaced by the page's own `next` link,
    /// or cleared if the page has none. Does nothing when no next page is
    /// available.
    ///
    /// # Errors
    ///
    /// Transport, decode, and document errors propagate unchanged; on
    /// failure nothing is appended and the next-page link is kept, so
    /// calling again retries cleanly.
    pub async fn advance_page(&mut self, client: &HalClient) -> Result<(), Error> {
        let href = match &self.next_page {
            Some(link) => link.href().to_owned(),
            None => return Ok(()),
        };

        tracing::debug!(href = %href, "requesting next page");
        let page = client.get(&href).await?;

        self.next_page = page.link(NEXT_REL).and_then(LinkValue::as_single).cloned();
        match page.link(ITEMS_REL) {
            Some(LinkValue::Many(links)) => {
                self.items.extend(links.iter().cloned().map(Slot::Pending));
            }
            Some(LinkValue::Single(link)) => self.items.push(Slot::Pending(link.clone())),
            None => {}
        }

        Ok(())
    }

    /// Returns a fresh cursor positioned at index 0.
    ///
    /// Cursors are independent of each other and of the sequence; restart an
    /// iteration by taking a new cursor.
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        Cursor { index: 0 }
    }

    /// Yields the next item for `cursor`, or `None` at the end of the
    /// sequence.
    ///
    /// At the end of the known items this requests the next page exactly
    /// once if one is available, then yields from the extended sequence; if
    /// no page is available (or the page was empty) the iteration
    /// terminates and no further network access is attempted for it. The
    /// cursor only advances past an item that resolved successfully, so a
    /// failed step can simply be retried.
    ///
    /// # Errors
    ///
    /// Transport, decode, and document errors from resolving the item or
    /// fetching the page propagate unchanged.
    pub async fn try_next(
        &mut self,
        cursor: &mut Cursor,
        client: &HalClient,
    ) -> Result<Option<&Resource>, Error> {
        if cursor.index >= self.items.len() {
            if !self.has_next_page() {
                return Ok(None);
            }
            tracing::debug!("end of known items reached, requesting next page");
            self.advance_page(client).await?;
            if cursor.index >= self.items.len() {
                return Ok(None);
            }
        }

        let resource = self.at(cursor.index, client).await?;
        cursor.index += 1;
        Ok(Some(resource))
    }
}

/// A restartable iteration position over a [`RelatedSequence`].
///
/// Holds only an index: cursors on the same sequence are independent
/// positions over one shared item cache, so items fetched while walking one
/// cursor are cache hits for every other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    index: usize,
}

impl Cursor {
    /// Returns the index of the next item this cursor will yield.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.index
    }
}

// Verify sequence types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RelatedSequence>();
    assert_send_sync::<Cursor>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ready(name: &str) -> Resource {
        Resource::from_value(json!({ "name": name })).unwrap()
    }

    fn links(hrefs: &[&str]) -> Vec<Link> {
        hrefs.iter().map(|href| Link::new(*href).unwrap()).collect()
    }

    #[test]
    fn test_len_counts_known_items_only() {
        let sequence = RelatedSequence::new(
            links(&["/a", "/b"]),
            Some(Link::new("/p2").unwrap()),
        );
        assert_eq!(sequence.len(), 2);
        assert!(!sequence.is_empty());
        assert!(sequence.has_next_page());
    }

    #[test]
    fn test_from_resources_is_unpaginated() {
        let sequence = RelatedSequence::from_resources(vec![ready("a")]);
        assert_eq!(sequence.len(), 1);
        assert!(!sequence.has_next_page());
    }

    #[test]
    fn test_append_grows_known_items() {
        let mut sequence = RelatedSequence::from_resources(vec![]);
        assert!(sequence.is_empty());
        sequence.append(ready("new"));
        assert_eq!(sequence.len(), 1);
    }

    #[tokio::test]
    async fn test_at_returns_ready_items_without_network() {
        let client = HalClient::new();
        let mut sequence = RelatedSequence::from_resources(vec![ready("a"), ready("b")]);

        let item = sequence.at(1, &client).await.unwrap();
        assert_eq!(item.field_str("name"), Some("b"));
    }

    #[tokio::test]
    async fn test_at_out_of_bounds_is_an_error() {
        let client = HalClient::new();
        let mut sequence = RelatedSequence::from_resources(vec![ready("a")]);

        let result = sequence.at(3, &client).await;
        match result {
            Err(Error::IndexOutOfBounds { index, len }) => {
                assert_eq!(index, 3);
                assert_eq!(len, 1);
            }
            other => panic!("expected IndexOutOfBounds, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_advance_page_without_next_is_a_no_op() {
        let client = HalClient::new();
        let mut sequence = RelatedSequence::from_resources(vec![ready("a")]);

        sequence.advance_page(&client).await.unwrap();
        assert_eq!(sequence.len(), 1);
    }

    #[tokio::test]
    async fn test_cursor_walks_ready_items_and_terminates() {
        let client = HalClient::new();
        let mut sequence = RelatedSequence::from_resources(vec![ready("a"), ready("b")]);

        let mut cursor = sequence.cursor();
        let mut names = Vec::new();
        while let Some(item) = sequence.try_next(&mut cursor, &client).await.unwrap() {
            names.push(item.field_str("name").unwrap().to_owned());
        }
        assert_eq!(names, vec!["a", "b"]);

        // Terminal: further steps keep yielding None.
        assert!(sequence.try_next(&mut cursor, &client).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cursors_are_independent_and_restartable() {
        let client = HalClient::new();
        let mut sequence = RelatedSequence::from_resources(vec![ready("a"), ready("b")]);

        let mut first = sequence.cursor();
        let _ = sequence.try_next(&mut first, &client).await.unwrap();
        assert_eq!(first.position(), 1);

        let mut second = sequence.cursor();
        assert_eq!(second.position(), 0);
        let item = sequence.try_next(&mut second, &client).await.unwrap().unwrap();
        assert_eq!(item.field_str("name"), Some("a"));
    }

    #[tokio::test]
    async fn test_empty_unpaginated_sequence_yields_empty_iteration() {
        let client = HalClient::new();
        let mut sequence = RelatedSequence::from_resources(vec![]);

        let mut cursor = sequence.cursor();
        assert!(sequence.try_next(&mut cursor, &client).await.unwrap().is_none());
    }
}

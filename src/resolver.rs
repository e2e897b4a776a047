//! Lazy relation resolution.
//!
//! Every [`Resource`] carries a cache of resolved relations, keyed by
//! relation name. [`Resource::rel`] is the single entry point: it consults
//! the cache first, fetches a single-valued link on a miss, or materializes
//! a [`RelatedSequence`] for a list-valued link. Whatever the path, the
//! result lands in the cache, so a relation is fetched at most once per
//! resource lifetime. That is an invariant of the model, not just an
//! optimization: once cached, a relation's value is final.
//!
//! Cache mutation goes through `&mut self`, which makes the single-writer
//! discipline a compile-time property. Sharing a resource across threads
//! requires an external lock around resolution; the core provides none.
//!
//! # Example
//!
//! ```rust,ignore
//! use hal_client::{HalClient, Related};
//!
//! let client = HalClient::new();
//! let mut device = client.get("http://api.example.com/devices/7").await?;
//!
//! // First access fetches; second access is a cache hit.
//! let site = device.rel("site", &client).await?;
//! if let Related::One(site) = site {
//!     println!("site: {:?}", site.field_str("name"));
//! }
//! ```

use crate::client::HalClient;
use crate::error::Error;
use crate::link::LinkValue;
use crate::resource::{Resource, ITEMS_REL, NEXT_REL};
use crate::sequence::RelatedSequence;

/// A resolved relation: the values stored in a resource's embedded cache.
#[derive(Debug, Clone, PartialEq)]
pub enum Related {
    /// The relation resolved to a single resource.
    One(Resource),
    /// The relation resolved to an ordered, lazily-fetched sequence.
    Many(RelatedSequence),
}

impl Related {
    /// Returns the resource if this relation is single-valued.
    #[must_use]
    pub const fn as_resource(&self) -> Option<&Resource> {
        match self {
            Self::One(resource) => Some(resource),
            Self::Many(_) => None,
        }
    }

    /// Returns the resource mutably if this relation is single-valued.
    ///
    /// Needed to resolve further relations on the related resource, since
    /// resolution populates its own cache.
    pub fn as_resource_mut(&mut self) -> Option<&mut Resource> {
        match self {
            Self::One(resource) => Some(resource),
            Self::Many(_) => None,
        }
    }

    /// Returns the sequence if this relation is list-valued.
    #[must_use]
    pub const fn as_sequence(&self) -> Option<&RelatedSequence> {
        match self {
            Self::One(_) => None,
            Self::Many(sequence) => Some(sequence),
        }
    }

    /// Returns the sequence mutably if this relation is list-valued.
    ///
    /// Indexed access and iteration resolve pending links in place, so they
    /// need the sequence mutably.
    pub fn as_sequence_mut(&mut self) -> Option<&mut RelatedSequence> {
        match self {
            Self::One(_) => None,
            Self::Many(sequence) => Some(sequence),
        }
    }
}

impl Resource {
    /// Resolves a relation by name, fetching over the network only on a
    /// cache miss.
    ///
    /// The algorithm:
    ///
    /// 1. A name present in the embedded cache returns the cached value with
    ///    no network access.
    /// 2. Otherwise the document's links are consulted. A single-valued link
    ///    is fetched, wrapped in a [`Resource`], and cached. A list-valued
    ///    link becomes a [`RelatedSequence`] seeded with the links; when the
    ///    relation is the conventional `items` and the document also carries
    ///    a single `next` link, the sequence starts paginated. Building the
    ///    sequence itself issues no requests.
    ///
    /// A failed fetch caches nothing, so calling again retries cleanly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownRelation`] if the name is in neither the
    /// cache nor the links; transport, decode, and document errors from the
    /// fetch propagate unchanged.
    pub async fn rel(&mut self, name: &str, client: &HalClient) -> Result<&mut Related, Error> {
        if !self.embedded.contains_key(name) {
            tracing::debug!(rel = name, "relation not embedded, checking links");
            let related = match self.links.get(name) {
                None => {
                    return Err(Error::UnknownRelation {
                        rel: name.to_string(),
                    })
                }
                Some(LinkValue::Single(link)) => {
                    let resource = client.get(link.href()).await?;
                    Related::One(resource)
                }
                Some(LinkValue::Many(links)) => {
                    let next_page = if name == ITEMS_REL {
                        self.links.get(NEXT_REL).and_then(LinkValue::as_single).cloned()
                    } else {
                        None
                    };
                    Related::Many(RelatedSequence::new(links.clone(), next_page))
                }
            };
            self.embedded.insert(name.to_string(), related);
        }

        self.embedded.get_mut(name).ok_or_else(|| Error::UnknownRelation {
            rel: name.to_string(),
        })
    }

    /// Returns true if the relation is resolvable, via either the embedded
    /// cache or the document's links. Performs no fetch.
    #[must_use]
    pub fn has_rel(&self, name: &str) -> bool {
        self.embedded.contains_key(name) || self.links.contains_key(name)
    }
}

// Verify Related is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Related>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resource(value: serde_json::Value) -> Resource {
        Resource::from_value(value).unwrap()
    }

    #[test]
    fn test_has_rel_sees_links_and_embedded_without_fetching() {
        let resource = resource(json!({
            "_links": { "site": { "href": "/sites/1" } },
            "_embedded": { "owner": { "name": "ops" } }
        }));

        assert!(resource.has_rel("site"));
        assert!(resource.has_rel("owner"));
        assert!(!resource.has_rel("missingRel"));
    }

    #[tokio::test]
    async fn test_unknown_relation_errors_without_network() {
        // No server exists; an unknown rel must fail before any request.
        let client = HalClient::new();
        let mut resource = resource(json!({ "_links": {} }));

        let result = resource.rel("missingRel", &client).await;
        match result {
            Err(Error::UnknownRelation { rel }) => assert_eq!(rel, "missingRel"),
            other => panic!("expected UnknownRelation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_embedded_relation_resolves_without_network() {
        let client = HalClient::new();
        let mut resource = resource(json!({
            "_links": { "owner": { "href": "http://nowhere.invalid/owner" } },
            "_embedded": { "owner": { "name": "ops" } }
        }));

        // The link points nowhere routable; the embedded value must win.
        let related = resource.rel("owner", &client).await.unwrap();
        let owner = related.as_resource().unwrap();
        assert_eq!(owner.field_str("name"), Some("ops"));
    }

    #[tokio::test]
    async fn test_list_relation_builds_sequence_without_network() {
        let client = HalClient::new();
        let mut resource = resource(json!({
            "_links": {
                "items": [
                    { "href": "http://nowhere.invalid/a" },
                    { "href": "http://nowhere.invalid/b" }
                ]
            }
        }));

        let sequence = resource
            .rel("items", &client)
            .await
            .unwrap()
            .as_sequence()
            .unwrap();
        assert_eq!(sequence.len(), 2);
        assert!(!sequence.has_next_page());
    }

    #[tokio::test]
    async fn test_items_relation_picks_up_sibling_next_link() {
        let client = HalClient::new();
        let mut resource = resource(json!({
            "_links": {
                "next": { "href": "/p2" },
                "items": [{ "href": "/a" }]
            }
        }));

        let sequence = resource
            .rel("items", &client)
            .await
            .unwrap()
            .as_sequence()
            .unwrap();
        assert_eq!(sequence.len(), 1);
        assert!(sequence.has_next_page());
    }

    #[tokio::test]
    async fn test_non_items_list_relation_never_paginates() {
        let client = HalClient::new();
        let mut resource = resource(json!({
            "_links": {
                "next": { "href": "/p2" },
                "history": [{ "href": "/h1" }]
            }
        }));

        let sequence = resource
            .rel("history", &client)
            .await
            .unwrap()
            .as_sequence()
            .unwrap();
        assert!(!sequence.has_next_page());
    }

    #[tokio::test]
    async fn test_resolved_list_relation_is_cached() {
        let client = HalClient::new();
        let mut resource = resource(json!({
            "_links": { "items": [{ "href": "/a" }] }
        }));

        let _ = resource.rel("items", &client).await.unwrap();
        assert!(resource.embedded.contains_key("items"));

        // Second resolution returns the same cached sequence.
        let sequence = resource
            .rel("items", &client)
            .await
            .unwrap()
            .as_sequence()
            .unwrap();
        assert_eq!(sequence.len(), 1);
    }

    #[test]
    fn test_related_accessors_discriminate_variants() {
        let one = Related::One(resource(json!({ "name": "x" })));
        assert!(one.as_resource().is_some());
        assert!(one.as_sequence().is_none());

        let many = Related::Many(RelatedSequence::from_resources(vec![]));
        assert!(many.as_sequence().is_some());
        assert!(many.as_resource().is_none());
    }
}

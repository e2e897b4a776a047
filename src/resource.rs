//! HAL resources: decoded documents with typed links and a resolution cache.
//!
//! A [`Resource`] wraps a decoded JSON object. Its top-level keys become
//! plain fields; the reserved `_links` key is parsed into validated link
//! descriptors; the reserved `_embedded` key, when a server inlines related
//! resources to save round trips, is honored as pre-cached content. The same
//! cache is later populated by the relation resolver, so server-inlined and
//! client-fetched relations are indistinguishable to callers.
//!
//! Resources are immutable in shape once constructed: only the resolver (and
//! [`Resource::create`]) add to the embedded cache, and nothing is ever
//! removed from it.
//!
//! # Example
//!
//! ```rust
//! use hal_client::Resource;
//!
//! let resource = Resource::from_value(serde_json::json!({
//!     "name": "thermostat",
//!     "reading": 21.5,
//!     "_links": {
//!         "self": { "href": "/devices/7" },
//!         "site": { "href": "/sites/2" }
//!     }
//! }))
//! .unwrap();
//!
//! assert_eq!(resource.field_str("name"), Some("thermostat"));
//! assert_eq!(resource.field_f64("reading"), Some(21.5));
//! assert_eq!(resource.self_href(), Some("/devices/7"));
//! assert!(resource.has_rel("site"));
//! ```

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::client::HalClient;
use crate::error::Error;
use crate::link::{json_type_name, LinkValue};
use crate::resolver::Related;
use crate::sequence::RelatedSequence;

/// Reserved document key holding link descriptors.
pub const LINKS_KEY: &str = "_links";
/// Reserved document key holding server-inlined related resources.
pub const EMBEDDED_KEY: &str = "_embedded";
/// Conventional relation name for the members of a collection resource.
pub const ITEMS_REL: &str = "items";
/// Conventional relation name for the next page of a paginated collection.
pub const NEXT_REL: &str = "next";
/// Conventional relation name for the POST target that adds collection members.
pub const CREATE_FORM_REL: &str = "createForm";
/// Conventional relation name for a resource's own URL.
pub const SELF_REL: &str = "self";

/// A HAL resource: fields, typed links, and an embedded-relation cache.
///
/// Most of the time resources are not built directly but fetched with
/// [`HalClient::get`] or produced by relation resolution. Construction from
/// an already-decoded JSON object (e.g. a sub-document of a parent's
/// `_embedded` section) uses [`Resource::from_value`] and follows the same
/// parsing rules without a network call.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    /// Document fields, with the reserved keys removed.
    pub(crate) fields: Map<String, Value>,
    /// Parsed link descriptors by relation name.
    pub(crate) links: HashMap<String, LinkValue>,
    /// Resolved relations by name. Populated from `_embedded` at parse time
    /// and by the resolver afterwards; a name present here is never
    /// re-fetched.
    pub(crate) embedded: HashMap<String, Related>,
}

impl Resource {
    /// Constructs a resource from a decoded JSON document.
    ///
    /// Top-level keys become fields; `_links` parses into validated
    /// descriptors; `_embedded` parses recursively into pre-cached
    /// relations, where an array value becomes a fully-resolved
    /// [`RelatedSequence`] and an object value a single resource. The
    /// reserved keys are excluded from the field map so structural keys can
    /// never shadow user data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDocument`] if the value (or a reserved
    /// section) is not the required JSON shape, or [`Error::MalformedLink`]
    /// if any link descriptor lacks a usable `href`. Validation is
    /// exhaustive and fails at parse time, not on first use.
    pub fn from_value(value: Value) -> Result<Self, Error> {
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                return Err(Error::InvalidDocument {
                    reason: format!(
                        "expected a JSON object at the document root, got {}",
                        json_type_name(&other)
                    ),
                })
            }
        };

        let links = match map.remove(LINKS_KEY) {
            None => HashMap::new(),
            Some(Value::Object(link_map)) => {
                let mut links = HashMap::with_capacity(link_map.len());
                for (rel, descriptor) in &link_map {
                    links.insert(rel.clone(), LinkValue::from_value(descriptor)?);
                }
                links
            }
            Some(other) => {
                return Err(Error::InvalidDocument {
                    reason: format!(
                        "`{LINKS_KEY}` must be a JSON object, got {}",
                        json_type_name(&other)
                    ),
                })
            }
        };

        let embedded = match map.remove(EMBEDDED_KEY) {
            None => HashMap::new(),
            Some(Value::Object(embedded_map)) => {
                let mut embedded = HashMap::with_capacity(embedded_map.len());
                for (rel, value) in embedded_map {
                    let related = match value {
                        Value::Array(entries) => {
                            let resources = entries
                                .into_iter()
                                .map(Self::from_value)
                                .collect::<Result<Vec<_>, _>>()?;
                            Related::Many(RelatedSequence::from_resources(resources))
                        }
                        other => Related::One(Self::from_value(other)?),
                    };
                    embedded.insert(rel, related);
                }
                embedded
            }
            Some(other) => {
                return Err(Error::InvalidDocument {
                    reason: format!(
                        "`{EMBEDDED_KEY}` must be a JSON object, got {}",
                        json_type_name(&other)
                    ),
                })
            }
        };

        Ok(Self {
            fields: map,
            links,
            embedded,
        })
    }

    /// Returns the raw field map (reserved keys excluded).
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns a field as a string slice, if present and a string.
    #[must_use]
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    /// Returns a field as an `i64`, if present and an integer.
    #[must_use]
    pub fn field_i64(&self, name: &str) -> Option<i64> {
        self.field(name).and_then(Value::as_i64)
    }

    /// Returns a field as an `f64`, if present and a number.
    #[must_use]
    pub fn field_f64(&self, name: &str) -> Option<f64> {
        self.field(name).and_then(Value::as_f64)
    }

    /// Returns a field as a `bool`, if present and a boolean.
    #[must_use]
    pub fn field_bool(&self, name: &str) -> Option<bool> {
        self.field(name).and_then(Value::as_bool)
    }

    /// Returns the parsed link descriptors by relation name.
    #[must_use]
    pub const fn links(&self) -> &HashMap<String, LinkValue> {
        &self.links
    }

    /// Returns the link descriptor for a relation, if the document carries
    /// one.
    #[must_use]
    pub fn link(&self, rel: &str) -> Option<&LinkValue> {
        self.links.get(rel)
    }

    /// Returns the href of the conventional `self` link, if present and
    /// single-valued.
    #[must_use]
    pub fn self_href(&self) -> Option<&str> {
        self.links
            .get(SELF_REL)
            .and_then(LinkValue::as_single)
            .map(crate::link::Link::href)
    }

    /// Posts a new member to this collection resource.
    ///
    /// Treats this resource as a collection: the payload is JSON-encoded and
    /// POSTed to the resource's `createForm` link, and the response document
    /// is decoded into the newly created resource. If this resource already
    /// has a resolved `items` sequence, the new resource is appended to it
    /// so the in-memory collection stays consistent without a re-fetch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCapability`] if the resource has no
    /// single-valued `createForm` link; transport and decode errors propagate
    /// unchanged. On failure nothing is appended to the `items` sequence.
    pub async fn create<T: Serialize + ?Sized>(
        &mut self,
        client: &HalClient,
        payload: &T,
    ) -> Result<Self, Error> {
        let href = match self.links.get(CREATE_FORM_REL).and_then(LinkValue::as_single) {
            Some(link) => link.href().to_owned(),
            None => {
                return Err(Error::MissingCapability {
                    rel: CREATE_FORM_REL.to_string(),
                })
            }
        };

        tracing::debug!(href = %href, "posting new resource to create form");
        let body = client.post_json(&href, payload).await?;
        let resource = Self::from_value(body)?;

        if let Some(Related::Many(sequence)) = self.embedded.get_mut(ITEMS_REL) {
            sequence.append(resource.clone());
        }

        Ok(resource)
    }
}

// Verify Resource is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Resource>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reserved_keys_are_excluded_from_fields() {
        let resource = Resource::from_value(json!({
            "name": "site-1",
            "_links": { "self": { "href": "/sites/1" } },
            "_embedded": {}
        }))
        .unwrap();

        assert_eq!(resource.field_str("name"), Some("site-1"));
        assert!(resource.field(LINKS_KEY).is_none());
        assert!(resource.field(EMBEDDED_KEY).is_none());
    }

    #[test]
    fn test_typed_field_accessors() {
        let resource = Resource::from_value(json!({
            "name": "thermostat",
            "channels": 4,
            "reading": 21.5,
            "active": true
        }))
        .unwrap();

        assert_eq!(resource.field_str("name"), Some("thermostat"));
        assert_eq!(resource.field_i64("channels"), Some(4));
        assert_eq!(resource.field_f64("reading"), Some(21.5));
        assert_eq!(resource.field_bool("active"), Some(true));
        assert!(resource.field("absent").is_none());
        assert!(resource.field_str("channels").is_none(), "wrong type is None");
    }

    #[test]
    fn test_links_parse_into_single_and_many() {
        let resource = Resource::from_value(json!({
            "_links": {
                "self": { "href": "/collections/5" },
                "items": [
                    { "href": "/items/1" },
                    { "href": "/items/2" }
                ]
            }
        }))
        .unwrap();

        assert!(resource.link("self").unwrap().as_single().is_some());
        assert_eq!(
            resource.link("items").unwrap().as_many().map(<[_]>::len),
            Some(2)
        );
        assert_eq!(resource.self_href(), Some("/collections/5"));
    }

    #[test]
    fn test_malformed_link_fails_document_construction() {
        let result = Resource::from_value(json!({
            "_links": { "broken": { "title": "no href" } }
        }));
        assert!(matches!(result, Err(Error::MalformedLink { .. })));
    }

    #[test]
    fn test_non_object_document_is_invalid() {
        let result = Resource::from_value(json!([1, 2, 3]));
        match result {
            Err(Error::InvalidDocument { reason }) => assert!(reason.contains("array")),
            other => panic!("expected InvalidDocument, got {other:?}"),
        }
    }

    #[test]
    fn test_non_object_links_section_is_invalid() {
        let result = Resource::from_value(json!({ "_links": [] }));
        assert!(matches!(result, Err(Error::InvalidDocument { .. })));
    }

    #[test]
    fn test_non_object_embedded_section_is_invalid() {
        let result = Resource::from_value(json!({ "_embedded": 3 }));
        assert!(matches!(result, Err(Error::InvalidDocument { .. })));
    }

    #[test]
    fn test_embedded_object_is_precached_as_single_resource() {
        let resource = Resource::from_value(json!({
            "_embedded": {
                "site": { "name": "rooftop" }
            }
        }))
        .unwrap();

        let related = resource.embedded.get("site").unwrap();
        let site = related.as_resource().unwrap();
        assert_eq!(site.field_str("name"), Some("rooftop"));
    }

    #[test]
    fn test_embedded_array_is_precached_as_resolved_sequence() {
        let resource = Resource::from_value(json!({
            "_embedded": {
                "items": [
                    { "name": "a" },
                    { "name": "b" }
                ]
            }
        }))
        .unwrap();

        let sequence = resource.embedded.get("items").unwrap().as_sequence().unwrap();
        assert_eq!(sequence.len(), 2);
        assert!(!sequence.has_next_page());
    }

    #[test]
    fn test_embedded_resources_are_parsed_recursively() {
        let result = Resource::from_value(json!({
            "_embedded": {
                "site": {
                    "_links": { "broken": {} }
                }
            }
        }));
        assert!(matches!(result, Err(Error::MalformedLink { .. })));
    }

    #[test]
    fn test_document_without_reserved_keys_has_no_links_or_embedded() {
        let resource = Resource::from_value(json!({ "just": "data" })).unwrap();
        assert!(resource.links().is_empty());
        assert!(resource.embedded.is_empty());
    }
}

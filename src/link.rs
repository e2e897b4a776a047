//! Link descriptors for HAL documents.
//!
//! A HAL document's `_links` section maps relation names to either a single
//! link object or an array of link objects. This module provides the
//! validated [`Link`] type for a single descriptor and the [`LinkValue`]
//! tagged variant that makes the one-or-many polymorphism explicit, so
//! callers match on the shape instead of inspecting JSON at runtime.
//!
//! # Fail-Fast Validation
//!
//! Links validate on construction: a descriptor without a non-empty string
//! `href` fails with [`Error::MalformedLink`] when the document is parsed,
//! never later when the link is first followed.
//!
//! # Example
//!
//! ```rust
//! use hal_client::{Link, LinkValue};
//!
//! let link = Link::from_value(&serde_json::json!({
//!     "href": "/sensors/1",
//!     "title": "Temperature"
//! }))
//! .unwrap();
//!
//! assert_eq!(link.href(), "/sensors/1");
//! assert_eq!(link.get("title"), Some(&serde_json::json!("Temperature")));
//!
//! let many = LinkValue::from_value(&serde_json::json!([
//!     { "href": "/sensors/1" },
//!     { "href": "/sensors/2" }
//! ]))
//! .unwrap();
//! assert!(matches!(many, LinkValue::Many(ref links) if links.len() == 2));
//! ```

use serde_json::{Map, Value};

use crate::error::Error;

/// The required key of every link descriptor.
const HREF_KEY: &str = "href";

/// Returns a short name for a JSON value's type, for error messages.
pub(crate) const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A validated link to a related resource.
///
/// A link always has a non-empty `href`; any additional metadata fields from
/// the source descriptor (`title`, `type`, `templated`, server extensions)
/// are carried through verbatim and available via [`Link::get`].
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    /// The target URL. Guaranteed non-empty.
    href: String,
    /// Metadata fields other than `href`, carried through from the source.
    extra: Map<String, Value>,
}

impl Link {
    /// Creates a link from an href with no extra metadata.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedLink`] if `href` is empty.
    pub fn new(href: impl Into<String>) -> Result<Self, Error> {
        let href = href.into();
        if href.is_empty() {
            return Err(Error::MalformedLink {
                descriptor: r#"{"href":""}"#.to_string(),
            });
        }
        Ok(Self {
            href,
            extra: Map::new(),
        })
    }

    /// Parses a link descriptor from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedLink`] if the value is not a JSON object,
    /// has no `href` key, or its `href` is not a non-empty string. The error
    /// carries the offending descriptor so the bad document is identifiable.
    pub fn from_value(value: &Value) -> Result<Self, Error> {
        let malformed = || Error::MalformedLink {
            descriptor: value.to_string(),
        };

        let map = value.as_object().ok_or_else(malformed)?;
        let href = match map.get(HREF_KEY).and_then(Value::as_str) {
            Some(href) if !href.is_empty() => href.to_owned(),
            _ => return Err(malformed()),
        };

        let extra = map
            .iter()
            .filter(|(key, _)| key.as_str() != HREF_KEY)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self { href, extra })
    }

    /// Returns the target URL of this link.
    #[must_use]
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Returns a metadata field carried through from the source descriptor.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }

    /// Returns all metadata fields other than `href`.
    #[must_use]
    pub const fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

/// The value of a relation in a document's `_links` section: one link or an
/// ordered list of links.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkValue {
    /// The relation targets a single resource.
    Single(Link),
    /// The relation targets an ordered list of resources.
    Many(Vec<Link>),
}

impl LinkValue {
    /// Parses a relation value: a JSON array becomes [`LinkValue::Many`],
    /// anything else is parsed as a single descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedLink`] if any descriptor is invalid. The
    /// whole value fails if any member fails.
    pub fn from_value(value: &Value) -> Result<Self, Error> {
        match value {
            Value::Array(entries) => entries
                .iter()
                .map(Link::from_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Many),
            other => Link::from_value(other).map(Self::Single),
        }
    }

    /// Returns the link if this relation is single-valued.
    #[must_use]
    pub const fn as_single(&self) -> Option<&Link> {
        match self {
            Self::Single(link) => Some(link),
            Self::Many(_) => None,
        }
    }

    /// Returns the links if this relation is list-valued.
    #[must_use]
    pub fn as_many(&self) -> Option<&[Link]> {
        match self {
            Self::Single(_) => None,
            Self::Many(links) => Some(links),
        }
    }
}

// Verify link types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Link>();
    assert_send_sync::<LinkValue>();
};

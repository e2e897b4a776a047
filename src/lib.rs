//! # hal-client
//!
//! A lazy HAL+JSON hypermedia client: resources are JSON documents enriched
//! with typed links to related resources, and this crate lets callers walk
//! those relationships as if they were already-loaded object graphs,
//! fetching over the network only when necessary.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`Resource`]: an immutable-shape wrapper around a decoded document,
//!   with typed field accessors and validated links
//! - [`Link`] and [`LinkValue`]: fail-fast link descriptors, one-or-many
//! - Lazy relation resolution via [`Resource::rel`], backed by a per-resource
//!   cache that honors server-inlined `_embedded` content
//! - [`RelatedSequence`] and [`Cursor`]: lazily-resolved, transparently
//!   paginated sequences with explicit, restartable iteration
//! - [`HalClient`]: the reqwest-backed transport, mapping connection
//!   failures and HTTP error statuses onto a single [`Error`] taxonomy
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hal_client::HalClient;
//!
//! let client = HalClient::new();
//!
//! // Fetch the API root and follow a relation. The first access fetches;
//! // every later access of the same relation is a cache hit.
//! let mut root = client.get("http://api.example.com/").await?;
//! let devices = root.rel("devices", &client).await?;
//! ```
//!
//! ## Walking a Paginated Collection
//!
//! ```rust,ignore
//! let mut collection = client.get("http://api.example.com/devices").await?;
//! let items = collection.rel("items", &client).await?.as_sequence_mut().unwrap();
//!
//! let mut cursor = items.cursor();
//! while let Some(device) = items.try_next(&mut cursor, &client).await? {
//!     println!("{:?}", device.field_str("name"));
//! }
//! ```
//!
//! Stepping past the last known item requests the collection's next page
//! (the conventional `items` relation paired with a sibling `next` link)
//! and keeps going until the server stops supplying one. Random access with
//! [`RelatedSequence::at`] never paginates.
//!
//! ## Creating Collection Members
//!
//! ```rust,ignore
//! let created = collection
//!     .create(&client, &serde_json::json!({ "name": "new-device" }))
//!     .await?;
//! ```
//!
//! [`Resource::create`] POSTs to the collection's `createForm` link and, if
//! the `items` relation is already resolved, appends the new resource to it
//! so the in-memory view stays consistent without a re-fetch.
//!
//! ## Parsing Without a Network
//!
//! ```rust
//! use hal_client::Resource;
//!
//! let doc = serde_json::json!({
//!     "name": "rooftop",
//!     "_links": { "self": { "href": "/sites/1" } },
//!     "_embedded": { "owner": { "name": "ops" } }
//! });
//!
//! let site = Resource::from_value(doc).unwrap();
//! assert_eq!(site.field_str("name"), Some("rooftop"));
//! assert!(site.has_rel("owner")); // embedded content is pre-cached
//! ```
//!
//! ## Design Principles
//!
//! - **At most one fetch per relation**: once resolved, a relation's value
//!   is final for the lifetime of its resource
//! - **Fail-fast validation**: link descriptors validate when a document is
//!   parsed, never on first use
//! - **No hidden I/O**: every operation that may touch the network is
//!   `async`; iteration advances through an explicit cursor
//! - **No retries, no recovery**: every error surfaces to the immediate
//!   caller, and a failed fetch never leaves a partially updated cache
//! - **Single-writer caches**: resolution takes `&mut Resource`; sharing
//!   across threads requires external synchronization

pub mod client;
pub mod error;
pub mod link;
pub mod resolver;
pub mod resource;
pub mod sequence;

// Re-export public types at crate root for convenience
pub use client::{HalClient, CLIENT_VERSION};
pub use error::Error;
pub use link::{Link, LinkValue};
pub use resolver::Related;
pub use resource::{
    Resource, CREATE_FORM_REL, EMBEDDED_KEY, ITEMS_REL, LINKS_KEY, NEXT_REL, SELF_REL,
};
pub use sequence::{Cursor, RelatedSequence};

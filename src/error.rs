//! Error types for the HAL client.
//!
//! This module contains the single error taxonomy used throughout the crate.
//! All fallible operations return `Result<T, Error>`, and every error is
//! surfaced to the immediate caller: nothing is swallowed or retried
//! internally, and a failed fetch never leaves a partially updated cache
//! behind.
//!
//! # Error Handling
//!
//! - Transport-level failures (DNS, connect, TLS) map to [`Error::Connection`].
//! - HTTP responses with a status of 400 or above map to [`Error::Remote`],
//!   carrying the response body verbatim.
//! - Structural problems in a document are raised at parse time, before any
//!   use: a link descriptor without a usable `href` is a
//!   [`Error::MalformedLink`], and a document section of the wrong JSON shape
//!   is an [`Error::InvalidDocument`].
//!
//! # Example
//!
//! ```rust
//! use hal_client::{Error, Link};
//!
//! let result = Link::from_value(&serde_json::json!({ "title": "no href" }));
//! assert!(matches!(result, Err(Error::MalformedLink { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur while fetching, parsing, or resolving HAL resources.
///
/// Each variant provides a clear, actionable message. Variants carrying the
/// offending input (a status code, a relation name, a link descriptor) keep
/// it available for pattern matching at the call site.
#[derive(Debug, Error)]
pub enum Error {
    /// The transport could not reach the server (DNS, connect, TLS, timeout).
    ///
    /// Connection failures are never retried by the client; connection and
    /// timeout policy belongs to the underlying `reqwest::Client`.
    #[error("Connection failure: {0}")]
    Connection(#[from] reqwest::Error),

    /// The server responded with an error status (400 or above).
    ///
    /// The response body is surfaced verbatim; no local recovery is
    /// attempted.
    #[error("Server responded with status {status}: {body}")]
    Remote {
        /// The HTTP status code of the response.
        status: u16,
        /// The raw response body.
        body: String,
    },

    /// The response body was not valid JSON.
    #[error("Failed to decode response body as JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// A document, or one of its reserved sections, was not the JSON shape
    /// HAL requires.
    #[error("Invalid HAL document: {reason}")]
    InvalidDocument {
        /// What was wrong with the document.
        reason: String,
    },

    /// A link descriptor lacked a required, non-empty `href` field.
    ///
    /// Raised when the descriptor is parsed, before any use, so the failure
    /// surfaces where the bad document was decoded rather than deep inside an
    /// unrelated call path.
    #[error("Missing required href field in link: {descriptor}")]
    MalformedLink {
        /// The offending link descriptor, serialized as JSON.
        descriptor: String,
    },

    /// A requested relation exists in neither the embedded cache nor the
    /// document's links.
    #[error("Unknown relation '{rel}': not present in _embedded or _links")]
    UnknownRelation {
        /// The relation name that was requested.
        rel: String,
    },

    /// An operation requires a link the resource does not carry (for
    /// example, `create` on a resource without a `createForm` link).
    #[error("Resource has no '{rel}' link, so the requested operation is not supported")]
    MissingCapability {
        /// The relation name of the missing link.
        rel: String,
    },

    /// A sequence index was past the currently known items.
    ///
    /// Random-index access never triggers pagination; use a cursor to walk
    /// past the known items.
    #[error("Index {index} is out of bounds for a sequence of {len} known items")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The number of currently known items.
        len: usize,
    },
}

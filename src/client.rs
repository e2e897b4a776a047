//! HTTP client for HAL+JSON APIs.
//!
//! This module provides the [`HalClient`] type, the transport collaborator
//! used by every resolving operation in the crate. It wraps a
//! `reqwest::Client` and maps transport outcomes onto the crate's error
//! taxonomy:
//!
//! - a request that cannot reach the server becomes [`Error::Connection`];
//! - a response with status 400 or above becomes [`Error::Remote`] carrying
//!   the body verbatim;
//! - any status below 400 is success, and the body is decoded as JSON.
//!
//! The client performs exactly one request per call. There is no retry
//! logic; timeout and connection policy belong to the `reqwest::Client` it
//! wraps, which callers can supply via [`HalClient::with_client`].

use serde::Serialize;
use serde_json::Value;

use crate::error::Error;
use crate::resource::Resource;

/// Crate version from Cargo.toml, used in the default User-Agent.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP transport for fetching and creating HAL resources.
///
/// # Thread Safety
///
/// `HalClient` is `Send + Sync` and cheap to share by reference. Note that
/// the resources it produces are not internally synchronized; see the crate
/// docs for the single-writer cache discipline.
///
/// # Example
///
/// ```rust,ignore
/// use hal_client::HalClient;
///
/// let client = HalClient::new();
/// let root = client.get("http://api.example.com/").await?;
/// ```
#[derive(Debug)]
pub struct HalClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
}

// Verify HalClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HalClient>();
};

impl Default for HalClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HalClient {
    /// Creates a client with the crate's default configuration: rustls TLS
    /// and a `hal-client v{version}` User-Agent.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS
    /// initialization failure).
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .user_agent(format!("hal-client v{CLIENT_VERSION}"))
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }

    /// Creates a client around an existing `reqwest::Client`.
    ///
    /// Use this to control timeouts, proxies, or default headers; the HAL
    /// core defines no connection policy of its own.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Performs a GET request and decodes the response into a [`Resource`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] on transport failure, [`Error::Remote`]
    /// for a status of 400 or above, [`Error::Decode`] if the body is not
    /// valid JSON, and [`Error::InvalidDocument`] / [`Error::MalformedLink`]
    /// if the body is not a well-formed HAL document.
    pub async fn get(&self, href: &str) -> Result<Resource, Error> {
        let body = self.get_json(href).await?;
        Resource::from_value(body)
    }

    /// Performs a GET request and returns the decoded JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`], [`Error::Remote`], or [`Error::Decode`]
    /// as for [`HalClient::get`].
    pub async fn get_json(&self, href: &str) -> Result<Value, Error> {
        tracing::debug!(href, "HTTP GET");
        let response = self
            .client
            .get(href)
            .send()
            .await
            .map_err(Error::Connection)?;
        Self::decode(response).await
    }

    /// Performs a POST request with a JSON-encoded payload and returns the
    /// decoded JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`], [`Error::Remote`], or [`Error::Decode`]
    /// as for [`HalClient::get`].
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        href: &str,
        payload: &T,
    ) -> Result<Value, Error> {
        tracing::debug!(href, "HTTP POST");
        let response = self
            .client
            .post(href)
            .json(payload)
            .send()
            .await
            .map_err(Error::Connection)?;
        Self::decode(response).await
    }

    /// Maps a response onto the error taxonomy and decodes its body.
    ///
    /// An empty success body decodes as an empty JSON object, so endpoints
    /// that respond `204 No Content` still produce a usable document.
    async fn decode(response: reqwest::Response) -> Result<Value, Error> {
        let status = response.status().as_u16();
        let body = response.text().await.map_err(Error::Connection)?;

        if status >= 400 {
            return Err(Error::Remote { status, body });
        }

        tracing::debug!(status, bytes = body.len(), "received response");
        if body.is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HalClient>();
    }

    #[test]
    fn test_default_matches_new() {
        // Both construct without panicking; configuration is internal.
        let _ = HalClient::new();
        let _ = HalClient::default();
    }

    #[test]
    fn test_with_client_accepts_custom_reqwest_client() {
        let custom = reqwest::Client::builder()
            .build()
            .expect("client should build");
        let _ = HalClient::with_client(custom);
    }
}

//! Process-wide shared client.
//!
//! Prefer building an `HttpClient` at startup and passing it to services.
//! This accessor exists for call sites that have no such handle.

use once_cell::sync::OnceCell;

use crate::client::HttpClient;
use crate::error::ApiError;

static CLIENT: OnceCell<HttpClient> = OnceCell::new();

/// The shared client, built from `get_env()` on first successful call.
///
/// Concurrent first calls construct at most one instance. Configuration
/// errors are returned and not cached.
pub fn api_client() -> Result<&'static HttpClient, ApiError> {
    CLIENT.get_or_try_init(|| {
        tracing::debug!("initializing shared api client");
        HttpClient::from_env()
    })
}

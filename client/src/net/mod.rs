//! Networking modules for the remote auth service and the geographic directory.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` talks to the auth backend, `geo` to the public georef directory,
//! `error` normalizes every failure into one shape, `cookies` keeps the auth
//! session cookie across restarts, and `types` defines the request/response
//! DTOs shared by both.

pub mod api;
pub mod cookies;
pub mod error;
pub mod geo;
pub mod types;

pub use api::{AuthApi, HttpAuthClient};
pub use cookies::PersistentCookieJar;
pub use error::ApiError;
pub use geo::{GeoApi, HttpGeoClient};

use std::sync::Arc;

use crate::config::HttpTimeouts;

/// Build the shared `reqwest` client. The cookie store carries the session
/// cookie set by `/login` into later requests such as `/logout`; with a
/// `jar` it also outlives the process.
pub(crate) fn build_http_client(
    timeouts: HttpTimeouts,
    jar: Option<Arc<PersistentCookieJar>>,
) -> Result<reqwest::Client, ApiError> {
    let mut builder = match jar {
        Some(jar) => reqwest::Client::builder().cookie_provider(jar),
        None => reqwest::Client::builder().cookie_store(true),
    };
    if let Some(timeout) = timeouts.request {
        builder = builder.timeout(timeout);
    }
    if let Some(timeout) = timeouts.connect {
        builder = builder.connect_timeout(timeout);
    }
    builder.build().map_err(|e| ApiError::HttpClientBuild(e.to_string()))
}

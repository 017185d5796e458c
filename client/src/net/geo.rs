//! Read-only lookups against the public georef directory.
//!
//! Both lookups treat a payload without the expected list field as an empty
//! result. Only transport failures and unparsable bodies are errors.

#[cfg(test)]
#[path = "geo_test.rs"]
mod geo_test;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;
use super::types::{Locality, Province};
use crate::config::HttpTimeouts;

/// Upper bound on localities requested per province.
pub const LOCALITY_LIMIT: u32 = 500;

#[async_trait]
pub trait GeoApi: Send + Sync {
    /// All provinces.
    async fn provinces(&self) -> Result<Vec<Province>, ApiError>;

    /// Localities in the province named `province`. Blank names yield an
    /// empty list.
    async fn localities(&self, province: &str) -> Result<Vec<Locality>, ApiError>;
}

pub struct HttpGeoClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpGeoClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeouts: HttpTimeouts) -> Result<Self, ApiError> {
        let http = super::build_http_client(timeouts, None)?;
        Ok(Self { http, base_url: base_url.into() })
    }

    async fn get_text(&self, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        response.text().await.map_err(|e| ApiError::Transport(e.to_string()))
    }
}

#[async_trait]
impl GeoApi for HttpGeoClient {
    async fn provinces(&self) -> Result<Vec<Province>, ApiError> {
        let url = format!("{}/provincias", self.base_url.trim_end_matches('/'));
        tracing::debug!(%url, "geo request");
        let body = self.get_text(self.http.get(&url)).await?;
        parse_list(&body, "provincias")
    }

    async fn localities(&self, province: &str) -> Result<Vec<Locality>, ApiError> {
        let province = province.trim();
        if province.is_empty() {
            return Ok(Vec::new());
        }
        let url = format!("{}/localidades", self.base_url.trim_end_matches('/'));
        tracing::debug!(%url, province, "geo request");
        let limit = LOCALITY_LIMIT.to_string();
        let request = self
            .http
            .get(&url)
            .query(&[("provincia", province), ("max", limit.as_str())]);
        let body = self.get_text(request).await?;
        parse_list(&body, "localidades")
    }
}

/// Decode `body[field]` as a list. A missing or non-array field is an empty
/// list; a body that is not JSON, or list entries of the wrong shape, are
/// transport errors.
pub(crate) fn parse_list<T: DeserializeOwned>(body: &str, field: &str) -> Result<Vec<T>, ApiError> {
    let payload: Value =
        serde_json::from_str(body).map_err(|e| ApiError::Transport(format!("invalid JSON body: {e}")))?;
    match payload.get(field) {
        Some(items @ Value::Array(_)) => serde_json::from_value(items.clone())
            .map_err(|e| ApiError::Transport(format!("unexpected `{field}` entries: {e}"))),
        _ => Ok(Vec::new()),
    }
}

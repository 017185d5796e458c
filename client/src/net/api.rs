//! REST calls against the ClimaGuard auth service.
//!
//! Every call is a JSON `POST` to the configured base URL. Responses are read
//! as JSON whatever the status and run through
//! [`interpret_response`](super::error::interpret_response), so callers only
//! ever see a payload or an [`ApiError`].
//!
//! ERROR HANDLING
//! ==============
//! No retries. Timeouts apply only when configured. A failure is returned
//! once and the screen shows it; the user retries by hand.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::cookies::PersistentCookieJar;
use super::error::{ApiError, interpret_response};
use super::types::{LoginRequest, RegisterRequest, ResendVerificationRequest, VerifyEmailRequest};
use crate::config::HttpTimeouts;

pub const REGISTER_FALLBACK: &str = "Error inesperado al registrar";
pub const LOGIN_FALLBACK: &str = "Error al iniciar sesión";
pub const LOGOUT_FALLBACK: &str = "Error al cerrar sesión";
pub const VERIFY_FALLBACK: &str = "Verificación fallida";
pub const RESEND_FALLBACK: &str = "No se pudo reenviar el código";

/// The five auth intents the screens need.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /register`. On success the caller moves on to email verification.
    async fn register(&self, request: &RegisterRequest) -> Result<Value, ApiError>;

    /// `POST /login`. On success the caller activates the session.
    async fn login(&self, request: &LoginRequest) -> Result<Value, ApiError>;

    /// `POST /logout`, no body.
    async fn logout(&self) -> Result<Value, ApiError>;

    /// `POST /verify-email` with the 6-digit code.
    async fn verify_email(&self, email: &str, code: &str) -> Result<Value, ApiError>;

    /// `POST /resend-verification-email`.
    async fn resend_verification_email(&self, email: &str) -> Result<Value, ApiError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct HttpAuthClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthClient {
    /// Build a client for `base_url` (no trailing slash) whose cookies live
    /// only as long as the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeouts: HttpTimeouts) -> Result<Self, ApiError> {
        let http = super::build_http_client(timeouts, None)?;
        Ok(Self { http, base_url: base_url.into() })
    }

    /// Build a client that keeps its cookies in `jar`, so a session cookie
    /// from `/login` is still sent by a later process.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn with_cookie_jar(
        base_url: impl Into<String>,
        timeouts: HttpTimeouts,
        jar: Arc<PersistentCookieJar>,
    ) -> Result<Self, ApiError> {
        let http = super::build_http_client(timeouts, Some(jar))?;
        Ok(Self { http, base_url: base_url.into() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B>(&self, path: &str, body: Option<&B>, fallback: &str) -> Result<Value, ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = endpoint(&self.base_url, path);
        tracing::debug!(%url, "auth request");

        let mut request = self.http.post(&url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        interpret_response(status, &text, fallback)
    }
}

#[async_trait]
impl AuthApi for HttpAuthClient {
    async fn register(&self, request: &RegisterRequest) -> Result<Value, ApiError> {
        self.post("/register", Some(request), REGISTER_FALLBACK).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<Value, ApiError> {
        self.post("/login", Some(request), LOGIN_FALLBACK).await
    }

    async fn logout(&self) -> Result<Value, ApiError> {
        self.post::<Value>("/logout", None, LOGOUT_FALLBACK).await
    }

    async fn verify_email(&self, email: &str, code: &str) -> Result<Value, ApiError> {
        let body = VerifyEmailRequest { email: email.to_owned(), code: code.to_owned() };
        self.post("/verify-email", Some(&body), VERIFY_FALLBACK).await
    }

    async fn resend_verification_email(&self, email: &str) -> Result<Value, ApiError> {
        let body = ResendVerificationRequest { email: email.to_owned() };
        self.post("/resend-verification-email", Some(&body), RESEND_FALLBACK).await
    }
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

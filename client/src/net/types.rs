//! Request and response DTOs for the auth service and the georef directory.
//!
//! DESIGN
//! ======
//! Field names on the wire follow the services (`nombre`, `provincia`); the
//! Rust side uses English names and maps them with serde renames.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

// =============================================================================
// AUTH REQUESTS
// =============================================================================

/// Body of `POST /register`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub province: String,
    pub city: String,
    pub password: String,
}

/// Body of `POST /login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /verify-email`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VerifyEmailRequest {
    pub email: String,
    pub code: String,
}

/// Body of `POST /resend-verification-email`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResendVerificationRequest {
    pub email: String,
}

// =============================================================================
// GEO REFERENCE DATA
// =============================================================================

/// A province as listed by `GET /provincias`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Province {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
}

/// The province a locality belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvinceRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "nombre")]
    pub name: String,
}

/// A locality as listed by `GET /localidades`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locality {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "provincia")]
    pub province: ProvinceRef,
}

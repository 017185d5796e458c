//! In-crate fakes for the storage and network ports.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::net::types::{Locality, LoginRequest, Province, ProvinceRef, RegisterRequest};
use crate::net::{ApiError, AuthApi, GeoApi};
use crate::state::storage::{SecureStore, StorageError};

// =============================================================================
// STORAGE
// =============================================================================

/// Store whose every operation fails with `Unavailable`.
#[derive(Default)]
pub struct FailingStore;

impl SecureStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("keystore offline".to_owned()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("keystore offline".to_owned()))
    }

    fn delete(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("keystore offline".to_owned()))
    }
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthCall {
    Register(RegisterRequest),
    Login(LoginRequest),
    Logout,
    VerifyEmail { email: String, code: String },
    Resend { email: String },
}

/// Records every call; answers `{}` unless a response was queued with `respond`.
#[derive(Default)]
pub struct FakeAuthApi {
    calls: Mutex<Vec<AuthCall>>,
    responses: Mutex<HashMap<&'static str, Result<Value, ApiError>>>,
}

impl FakeAuthApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer operation `op` (`"register"`, `"login"`, ...) with `result`.
    pub fn respond(self, op: &'static str, result: Result<Value, ApiError>) -> Self {
        self.responses.lock().unwrap().insert(op, result);
        self
    }

    pub fn calls(&self) -> Vec<AuthCall> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, op: &'static str, call: AuthCall) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push(call);
        self.responses.lock().unwrap().get(op).cloned().unwrap_or_else(|| Ok(json!({})))
    }
}

#[async_trait]
impl AuthApi for FakeAuthApi {
    async fn register(&self, request: &RegisterRequest) -> Result<Value, ApiError> {
        self.answer("register", AuthCall::Register(request.clone()))
    }

    async fn login(&self, request: &LoginRequest) -> Result<Value, ApiError> {
        self.answer("login", AuthCall::Login(request.clone()))
    }

    async fn logout(&self) -> Result<Value, ApiError> {
        self.answer("logout", AuthCall::Logout)
    }

    async fn verify_email(&self, email: &str, code: &str) -> Result<Value, ApiError> {
        self.answer("verify_email", AuthCall::VerifyEmail { email: email.to_owned(), code: code.to_owned() })
    }

    async fn resend_verification_email(&self, email: &str) -> Result<Value, ApiError> {
        self.answer("resend", AuthCall::Resend { email: email.to_owned() })
    }
}

pub fn rejected(messages: &[&str]) -> ApiError {
    ApiError::Rejected { status: 400, messages: messages.iter().map(|m| (*m).to_owned()).collect() }
}

// =============================================================================
// GEO
// =============================================================================

/// Serves fixed provinces and per-province localities.
#[derive(Default)]
pub struct FakeGeoApi {
    pub provinces: Option<Result<Vec<Province>, ApiError>>,
    pub localities: HashMap<String, Result<Vec<Locality>, ApiError>>,
}

impl FakeGeoApi {
    pub fn with_provinces(names: &[&str]) -> Self {
        let provinces = names
            .iter()
            .enumerate()
            .map(|(i, name)| Province { id: format!("{i:02}"), name: (*name).to_owned() })
            .collect();
        Self { provinces: Some(Ok(provinces)), localities: HashMap::new() }
    }

    pub fn with_localities(mut self, province: &str, names: &[&str]) -> Self {
        self.localities.insert(province.to_owned(), Ok(names.iter().map(|n| locality(province, n)).collect()));
        self
    }
}

pub fn locality(province: &str, name: &str) -> Locality {
    Locality { id: None, name: name.to_owned(), province: ProvinceRef { id: None, name: province.to_owned() } }
}

#[async_trait]
impl GeoApi for FakeGeoApi {
    async fn provinces(&self) -> Result<Vec<Province>, ApiError> {
        self.provinces.clone().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn localities(&self, province: &str) -> Result<Vec<Locality>, ApiError> {
        self.localities.get(province).cloned().unwrap_or_else(|| Ok(Vec::new()))
    }
}

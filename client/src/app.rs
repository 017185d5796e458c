//! Application root: builds the session store, navigation gate and network
//! clients once and hands them to whoever renders the screens.
//!
//! SYSTEM CONTEXT
//! ==============
//! This replaces an ambient global session context. Everything that needs
//! the session or a client receives it from here.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::net::{ApiError, AuthApi, GeoApi, HttpAuthClient, HttpGeoClient, PersistentCookieJar};
use crate::state::nav::{GateState, NavigationGate};
use crate::state::session::SessionStore;
use crate::state::storage::{FileSecureStore, SecureStore};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The data directory for the secure store could not be prepared.
    #[error("cannot open secure storage: {0}")]
    Storage(#[from] std::io::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}

pub struct App {
    session: Arc<SessionStore>,
    gate: NavigationGate,
    auth: Arc<dyn AuthApi>,
    geo: Arc<dyn GeoApi>,
}

impl App {
    /// Wire the production adapters from `config`. The auth client's cookies
    /// are kept next to the session marker and dropped on sign-out.
    ///
    /// # Errors
    ///
    /// Returns an error if the secure store directory or an HTTP client
    /// cannot be created.
    pub fn from_config(config: &ClientConfig) -> Result<Self, AppError> {
        let storage: Arc<dyn SecureStore> = Arc::new(FileSecureStore::open_in(&config.data_dir)?);
        let jar = Arc::new(PersistentCookieJar::load(storage.clone()));
        let auth = HttpAuthClient::with_cookie_jar(config.auth_base_url.clone(), config.timeouts, jar.clone())?;
        let geo = HttpGeoClient::new(config.geo_base_url.clone(), config.timeouts)?;
        let session = SessionStore::new(storage).with_bound(jar);
        Ok(Self::assemble(session, Arc::new(auth), Arc::new(geo)))
    }

    /// Wire arbitrary adapters. The gate starts `Undetermined`; call
    /// [`App::start`] to resolve it.
    #[must_use]
    pub fn new(storage: Arc<dyn SecureStore>, auth: Arc<dyn AuthApi>, geo: Arc<dyn GeoApi>) -> Self {
        Self::assemble(SessionStore::new(storage), auth, geo)
    }

    fn assemble(session: SessionStore, auth: Arc<dyn AuthApi>, geo: Arc<dyn GeoApi>) -> Self {
        let session = Arc::new(session);
        let gate = NavigationGate::new(session.subscribe());
        Self { session, gate, auth, geo }
    }

    /// Read the persisted session and settle the gate on the matching tree.
    pub fn start(&mut self) -> GateState {
        self.session.initialize();
        self.gate.refresh();
        self.gate.state()
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    #[must_use]
    pub fn gate(&self) -> &NavigationGate {
        &self.gate
    }

    pub fn gate_mut(&mut self) -> &mut NavigationGate {
        &mut self.gate
    }

    #[must_use]
    pub fn auth(&self) -> &dyn AuthApi {
        self.auth.as_ref()
    }

    #[must_use]
    pub fn geo(&self) -> &dyn GeoApi {
        self.geo.as_ref()
    }
}

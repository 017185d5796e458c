//! Signed-in session flag, persisted as a marker in the secure store.
//!
//! SYSTEM CONTEXT
//! ==============
//! The app root owns one `SessionStore` and hands it to the screens that sign
//! in and out. The navigation gate never touches it directly; it holds a
//! `watch` receiver from [`SessionStore::subscribe`] and re-evaluates on
//! every change.
//!
//! TRADE-OFFS
//! ==========
//! Mutations update the in-memory flag first and persist second. A failed
//! write leaves the flag as set for the rest of the process and returns the
//! error, so the caller can tell the user the session will not survive a
//! restart. There is no rollback.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use tokio::sync::watch;

use super::storage::{SecureStore, StorageError};

/// Key the marker is stored under.
pub const SESSION_KEY: &str = "session";
/// Marker value meaning "signed in".
pub const SESSION_ACTIVE: &str = "active";

/// State that belongs to one signed-in session and is discarded with it,
/// such as the auth service's cookies.
pub trait SessionBound: Send + Sync {
    /// Forget everything held for the session, in memory and on disk.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the saved copy could not be removed.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Published session status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionStatus {
    /// `initialize` has not run yet.
    #[default]
    Unknown,
    Active,
    Inactive,
}

impl SessionStatus {
    #[must_use]
    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

pub struct SessionStore {
    storage: Arc<dyn SecureStore>,
    status: watch::Sender<SessionStatus>,
    bound: Vec<Arc<dyn SessionBound>>,
}

impl SessionStore {
    #[must_use]
    pub fn new(storage: Arc<dyn SecureStore>) -> Self {
        let (status, _) = watch::channel(SessionStatus::Unknown);
        Self { storage, status, bound: Vec::new() }
    }

    /// Clear `state` whenever the session is signed out.
    #[must_use]
    pub fn with_bound(mut self, state: Arc<dyn SessionBound>) -> Self {
        self.bound.push(state);
        self
    }

    /// Load the persisted marker and publish the initial status.
    ///
    /// Never fails: an unreadable store is logged and treated as signed out.
    pub fn initialize(&self) -> bool {
        let active = match self.storage.get(SESSION_KEY) {
            Ok(marker) => marker.as_deref() == Some(SESSION_ACTIVE),
            Err(e) => {
                tracing::warn!(error = %e, "session marker unreadable; starting signed out");
                false
            }
        };
        self.publish(active);
        active
    }

    /// Mark the session active and persist the marker.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the marker could not be written. The
    /// in-memory flag stays active regardless.
    pub fn login(&self) -> Result<(), StorageError> {
        self.publish(true);
        self.storage.set(SESSION_KEY, SESSION_ACTIVE).inspect_err(|e| {
            tracing::warn!(error = %e, "session marker not persisted; session lasts until exit");
        })
    }

    /// Mark the session inactive, remove the marker and clear every
    /// session-bound state. Safe to call when already signed out.
    ///
    /// # Errors
    ///
    /// Returns the first storage error hit while removing the marker or the
    /// bound state. Every removal is still attempted, and the in-memory flag
    /// stays inactive regardless.
    pub fn logout(&self) -> Result<(), StorageError> {
        self.publish(false);
        let mut result = self.storage.delete(SESSION_KEY).inspect_err(|e| {
            tracing::warn!(error = %e, "session marker not removed; next start may resume the session");
        });
        for state in &self.bound {
            if let Err(e) = state.clear() {
                tracing::warn!(error = %e, "session state not cleared");
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }

    /// In-memory flag. Does not touch storage.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status().is_active()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    /// Receiver notified on every `initialize`, `login` and `logout`.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    fn publish(&self, active: bool) {
        let next = if active { SessionStatus::Active } else { SessionStatus::Inactive };
        self.status.send_replace(next);
    }
}

//! Cookie jar for the auth service that survives restarts.
//!
//! SYSTEM CONTEXT
//! ==============
//! The auth backend keeps its session in a cookie set by `/login` and
//! required by `/logout`. The CLI runs one process per command, so an
//! in-memory jar would lose that cookie between `login` and `logout`. This
//! jar mirrors every change into the secure store under [`COOKIE_KEY`] and
//! reloads it on startup.
//!
//! TRADE-OFFS
//! ==========
//! The jar is attached to the auth client only, which talks to a single
//! origin. Cookies are kept by name without domain or path scoping, and
//! `Expires` is not interpreted. A cookie is dropped when the server sends it
//! with an empty value or `Max-Age` of zero or less, or when the session is
//! signed out.

#[cfg(test)]
#[path = "cookies_test.rs"]
mod cookies_test;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use reqwest::Url;
use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;

use crate::state::session::SessionBound;
use crate::state::storage::{SecureStore, StorageError};

/// Secure-store key holding the serialized jar.
pub const COOKIE_KEY: &str = "cookies";

pub struct PersistentCookieJar {
    storage: Arc<dyn SecureStore>,
    cookies: Mutex<BTreeMap<String, String>>,
}

impl PersistentCookieJar {
    /// Load the jar saved in `storage`. A missing or unreadable jar starts
    /// empty.
    #[must_use]
    pub fn load(storage: Arc<dyn SecureStore>) -> Self {
        let cookies = match storage.get(COOKIE_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "saved cookies unreadable; starting with an empty jar");
                BTreeMap::new()
            }),
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(error = %e, "saved cookies unavailable; starting with an empty jar");
                BTreeMap::new()
            }
        };
        Self { storage, cookies: Mutex::new(cookies) }
    }

    /// Cookie names currently held.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.cookies.lock().map(|c| c.keys().cloned().collect()).unwrap_or_default()
    }

    fn persist(&self, cookies: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if cookies.is_empty() {
            return self.storage.delete(COOKIE_KEY);
        }
        let raw = serde_json::to_string(cookies).map_err(|e| StorageError::Other(e.to_string()))?;
        self.storage.set(COOKIE_KEY, &raw)
    }
}

impl SessionBound for PersistentCookieJar {
    fn clear(&self) -> Result<(), StorageError> {
        if let Ok(mut cookies) = self.cookies.lock() {
            cookies.clear();
        }
        self.storage.delete(COOKIE_KEY)
    }
}

impl CookieStore for PersistentCookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, _url: &Url) {
        let Ok(mut cookies) = self.cookies.lock() else {
            tracing::warn!("cookie jar lock poisoned; ignoring Set-Cookie");
            return;
        };
        let mut changed = false;
        for header in cookie_headers {
            let Some(update) = header.to_str().ok().and_then(parse_set_cookie) else {
                continue;
            };
            changed |= match update {
                CookieUpdate::Set { name, value } => cookies.insert(name, value.clone()).as_ref() != Some(&value),
                CookieUpdate::Remove { name } => cookies.remove(&name).is_some(),
            };
        }
        if changed {
            if let Err(e) = self.persist(&cookies) {
                tracing::warn!(error = %e, "cookies not persisted; they last until exit");
            }
        }
    }

    fn cookies(&self, _url: &Url) -> Option<HeaderValue> {
        let cookies = self.cookies.lock().ok()?;
        if cookies.is_empty() {
            return None;
        }
        let header = cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        HeaderValue::from_str(&header).ok()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum CookieUpdate {
    Set { name: String, value: String },
    Remove { name: String },
}

/// Read one `Set-Cookie` header. Returns `None` for headers without a
/// `name=value` pair.
pub(crate) fn parse_set_cookie(header: &str) -> Option<CookieUpdate> {
    let mut parts = header.split(';');
    let (name, value) = parts.next()?.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let value = value.trim().trim_matches('"');

    let expired = parts.any(|attr| {
        attr.split_once('=').is_some_and(|(key, age)| {
            key.trim().eq_ignore_ascii_case("max-age") && age.trim().parse::<i64>().is_ok_and(|age| age <= 0)
        })
    });

    if expired || value.is_empty() {
        Some(CookieUpdate::Remove { name: name.to_owned() })
    } else {
        Some(CookieUpdate::Set { name: name.to_owned(), value: value.to_owned() })
    }
}

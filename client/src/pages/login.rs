//! Login screen: email + password sign-in.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use super::{Alert, Outcome, SESSION_NOT_SAVED};
use crate::net::AuthApi;
use crate::net::types::LoginRequest;
use crate::state::session::SessionStore;

pub const MISSING_CREDENTIALS: &str = "Ingresa tu correo y contraseña";

/// Trim both fields and require them to be non-empty.
pub(crate) fn validate_login_input(email: &str, password: &str) -> Result<LoginRequest, &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(MISSING_CREDENTIALS);
    }
    Ok(LoginRequest { email: email.to_owned(), password: password.to_owned() })
}

#[derive(Clone, Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    /// Whether the password is masked.
    pub secure_entry: bool,
}

impl LoginForm {
    #[must_use]
    pub fn new() -> Self {
        Self { secure_entry: true, ..Self::default() }
    }

    pub fn toggle_secure_entry(&mut self) {
        self.secure_entry = !self.secure_entry;
    }

    /// Sign in. On success the session store flips to active, which the
    /// navigation gate picks up; no route is returned.
    pub async fn submit(&mut self, api: &dyn AuthApi, session: &SessionStore) -> Outcome {
        let request = match validate_login_input(&self.email, &self.password) {
            Ok(request) => request,
            Err(message) => return Outcome::alert(Alert::error(message)),
        };

        match api.login(&request).await {
            Ok(_) => {
                self.password.clear();
                match session.login() {
                    Ok(()) => Outcome::default(),
                    Err(_) => Outcome::alert(Alert::warning(SESSION_NOT_SAVED)),
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "login failed");
                Outcome::alert(Alert::from(&e))
            }
        }
    }
}

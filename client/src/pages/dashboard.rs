//! Dashboard: the signed-in landing screen. For now it only offers logout.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use super::{Alert, Outcome, SESSION_NOT_SAVED};
use crate::net::{ApiError, AuthApi};
use crate::state::session::SessionStore;

pub const TITLE: &str = "Inicio";

/// Shown when the service no longer recognized the session being closed.
pub const SESSION_ALREADY_CLOSED: &str = "Tu sesión ya había expirado.";

/// Status the auth service answers with when the request carries no live
/// session.
const UNAUTHORIZED: u16 = 401;

/// Sign out remotely, then clear the local session. A failed remote call
/// leaves the session active so the user can retry, except a 401: the
/// service holds no session any more, so the local one is cleared too.
pub async fn logout(api: &dyn AuthApi, session: &SessionStore) -> Outcome {
    let notice = match api.logout().await {
        Ok(_) => None,
        Err(ApiError::Rejected { status: UNAUTHORIZED, .. }) => {
            tracing::info!("session already closed by the service; signing out locally");
            Some(Alert::warning(SESSION_ALREADY_CLOSED))
        }
        Err(e) => {
            tracing::debug!(error = %e, "logout failed");
            return Outcome::alert(Alert::from(&e));
        }
    };
    match session.logout() {
        Ok(()) => Outcome { alert: notice, navigate: None },
        Err(_) => Outcome::alert(Alert::warning(SESSION_NOT_SAVED)),
    }
}

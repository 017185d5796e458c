//! Headless screen controllers.
//!
//! ARCHITECTURE
//! ============
//! Each controller owns a screen's transient form state, calls the network
//! ports, and reports back an [`Outcome`]: an optional alert to show and an
//! optional route to navigate to. Drawing the screen is the renderer's job.

pub mod dashboard;
pub mod login;
pub mod register;
pub mod verify_email;

use crate::net::ApiError;
use crate::state::nav::AuthRoute;

pub const TITLE_ERROR: &str = "Error";
pub const TITLE_SUCCESS: &str = "Éxito";
pub const TITLE_WARNING: &str = "Aviso";

/// Shown when a session change could not be written to the device.
pub const SESSION_NOT_SAVED: &str = "La sesión no se pudo guardar en este dispositivo.";

/// A dismissable message for the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    pub title: &'static str,
    pub message: String,
}

impl Alert {
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self { title: TITLE_ERROR, message: message.into() }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self { title: TITLE_SUCCESS, message: message.into() }
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self { title: TITLE_WARNING, message: message.into() }
    }
}

impl From<&ApiError> for Alert {
    fn from(err: &ApiError) -> Self {
        Self::error(err.user_message())
    }
}

/// What a screen action asks the renderer to do next.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub alert: Option<Alert>,
    pub navigate: Option<AuthRoute>,
}

impl Outcome {
    #[must_use]
    pub fn alert(alert: Alert) -> Self {
        Self { alert: Some(alert), navigate: None }
    }

    #[must_use]
    pub fn alert_then(alert: Alert, route: AuthRoute) -> Self {
        Self { alert: Some(alert), navigate: Some(route) }
    }
}

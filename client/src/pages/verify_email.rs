//! Email verification screen: six single-digit cells plus a resend action.

#[cfg(test)]
#[path = "verify_email_test.rs"]
mod verify_email_test;

use super::{Alert, Outcome};
use crate::net::AuthApi;
use crate::state::nav::AuthRoute;

pub const CODE_LEN: usize = 6;

pub const INCOMPLETE_CODE: &str = "Por favor ingresa el código completo de 6 dígitos";
pub const VERIFIED: &str = "Correo verificado correctamente.";
pub const CODE_RESENT: &str = "Te enviamos un nuevo código.";

#[derive(Clone, Debug)]
pub struct VerifyEmailPage {
    email: String,
    digits: [Option<char>; CODE_LEN],
    focused: usize,
}

impl VerifyEmailPage {
    /// Open the screen for the address carried by the `VerifyEmail` route.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self { email: email.into(), digits: [None; CODE_LEN], focused: 0 }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Index of the cell that has input focus.
    #[must_use]
    pub fn focused(&self) -> usize {
        self.focused
    }

    #[must_use]
    pub fn digits(&self) -> &[Option<char>; CODE_LEN] {
        &self.digits
    }

    /// The digits entered so far, left to right.
    #[must_use]
    pub fn code(&self) -> String {
        self.digits.iter().flatten().collect()
    }

    /// Handle text typed into cell `index`. Only the first ASCII digit is
    /// kept. A filled cell moves focus right; a cleared cell moves it left.
    pub fn change_digit(&mut self, index: usize, text: &str) {
        if index >= CODE_LEN {
            return;
        }
        let digit = text.chars().find(char::is_ascii_digit);
        self.digits[index] = digit;
        self.focused = match digit {
            Some(_) if index + 1 < CODE_LEN => index + 1,
            None if index > 0 => index - 1,
            _ => index,
        };
    }

    /// Backspace on an empty cell moves focus to the previous one.
    pub fn backspace(&mut self, index: usize) {
        if index < CODE_LEN && index > 0 && self.digits[index].is_none() {
            self.focused = index - 1;
        }
    }

    /// Fill cells from a whole code string, one character per cell.
    pub fn enter_code(&mut self, code: &str) {
        for (index, ch) in code.chars().take(CODE_LEN).enumerate() {
            self.change_digit(index, &ch.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.digits = [None; CODE_LEN];
        self.focused = 0;
    }

    /// Verify the entered code. Incomplete codes never reach the network.
    /// On success the cells are cleared and the user is sent to login.
    pub async fn submit(&mut self, api: &dyn AuthApi) -> Outcome {
        let code = self.code();
        if code.len() != CODE_LEN {
            return Outcome::alert(Alert::error(INCOMPLETE_CODE));
        }

        match api.verify_email(&self.email, &code).await {
            Ok(_) => {
                self.clear();
                Outcome::alert_then(Alert::success(VERIFIED), AuthRoute::Login)
            }
            Err(e) => {
                tracing::debug!(error = %e, "email verification failed");
                Outcome::alert(Alert::from(&e))
            }
        }
    }

    /// Ask the service to email a fresh code.
    pub async fn resend(&self, api: &dyn AuthApi) -> Outcome {
        match api.resend_verification_email(&self.email).await {
            Ok(_) => Outcome::alert(Alert::success(CODE_RESENT)),
            Err(e) => Outcome::alert(Alert::from(&e)),
        }
    }
}

use super::*;
use std::sync::Arc;

use crate::net::ApiError;
use crate::state::storage::MemorySecureStore;
use crate::test_support::{AuthCall, FailingStore, FakeAuthApi, rejected};

fn form(email: &str, password: &str) -> LoginForm {
    LoginForm { email: email.to_owned(), password: password.to_owned(), ..LoginForm::new() }
}

fn session() -> SessionStore {
    let store = SessionStore::new(Arc::new(MemorySecureStore::new()));
    store.initialize();
    store
}

#[test]
fn validate_login_input_trims_email() {
    assert_eq!(
        validate_login_input("  a@b.com ", "pw"),
        Ok(LoginRequest { email: "a@b.com".to_owned(), password: "pw".to_owned() })
    );
}

#[test]
fn validate_login_input_requires_both_fields() {
    assert_eq!(validate_login_input("", "pw"), Err(MISSING_CREDENTIALS));
    assert_eq!(validate_login_input("a@b.com", ""), Err(MISSING_CREDENTIALS));
}

#[test]
fn new_form_masks_password() {
    let mut form = LoginForm::new();
    assert!(form.secure_entry);
    form.toggle_secure_entry();
    assert!(!form.secure_entry);
}

#[tokio::test]
async fn submit_success_activates_session() {
    let api = FakeAuthApi::new();
    let session = session();
    let mut form = form("a@b.com", "pw");

    let outcome = form.submit(&api, &session).await;

    assert_eq!(outcome, Outcome::default());
    assert!(session.is_authenticated());
    assert_eq!(
        api.calls(),
        vec![AuthCall::Login(LoginRequest { email: "a@b.com".into(), password: "pw".into() })]
    );
    assert!(form.password.is_empty());
}

#[tokio::test]
async fn submit_rejection_shows_single_message() {
    let api = FakeAuthApi::new().respond("login", Err(rejected(&["bad"])));
    let session = session();

    let outcome = form("a@b.com", "pw").submit(&api, &session).await;

    assert_eq!(outcome.alert, Some(Alert::error("bad")));
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn submit_transport_error_shows_generic_message() {
    let api = FakeAuthApi::new().respond("login", Err(ApiError::Transport("refused".into())));
    let session = session();

    let outcome = form("a@b.com", "pw").submit(&api, &session).await;

    assert_eq!(outcome.alert, Some(Alert::error(crate::net::error::TRANSPORT_MESSAGE)));
}

#[tokio::test]
async fn submit_with_blank_fields_skips_request() {
    let api = FakeAuthApi::new();
    let session = session();

    let outcome = form(" ", "").submit(&api, &session).await;

    assert_eq!(outcome.alert, Some(Alert::error(MISSING_CREDENTIALS)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn submit_with_unwritable_store_warns_but_stays_signed_in() {
    let api = FakeAuthApi::new();
    let session = SessionStore::new(Arc::new(FailingStore));
    session.initialize();

    let outcome = form("a@b.com", "pw").submit(&api, &session).await;

    assert_eq!(outcome.alert, Some(Alert::warning(SESSION_NOT_SAVED)));
    assert!(session.is_authenticated());
}

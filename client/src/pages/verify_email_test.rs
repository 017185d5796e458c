use super::*;
use crate::test_support::{AuthCall, FakeAuthApi, rejected};

// =============================================================
// Digit cells
// =============================================================

#[test]
fn typing_keeps_first_digit_and_advances_focus() {
    let mut page = VerifyEmailPage::new("a@b.com");
    page.change_digit(0, "x7y8");
    assert_eq!(page.digits()[0], Some('7'));
    assert_eq!(page.focused(), 1);
}

#[test]
fn non_numeric_input_clears_cell_and_moves_back() {
    let mut page = VerifyEmailPage::new("a@b.com");
    page.change_digit(2, "5");
    page.change_digit(2, "a");
    assert_eq!(page.digits()[2], None);
    assert_eq!(page.focused(), 1);
}

#[test]
fn last_cell_keeps_focus() {
    let mut page = VerifyEmailPage::new("a@b.com");
    page.change_digit(5, "9");
    assert_eq!(page.focused(), 5);
}

#[test]
fn out_of_range_cell_is_ignored() {
    let mut page = VerifyEmailPage::new("a@b.com");
    page.change_digit(6, "1");
    assert_eq!(page.code(), "");
}

#[test]
fn backspace_on_empty_cell_moves_back() {
    let mut page = VerifyEmailPage::new("a@b.com");
    page.change_digit(0, "1");
    page.backspace(1);
    assert_eq!(page.focused(), 0);

    page.change_digit(1, "2");
    page.backspace(1);
    assert_eq!(page.focused(), 2, "filled cell keeps focus where typing left it");
}

#[test]
fn enter_code_fills_cells() {
    let mut page = VerifyEmailPage::new("a@b.com");
    page.enter_code("123456789");
    assert_eq!(page.code(), "123456");
}

// =============================================================
// Submit / resend
// =============================================================

#[tokio::test]
async fn six_digits_call_verify_exactly_once() {
    let api = FakeAuthApi::new();
    let mut page = VerifyEmailPage::new("a@b.com");
    for (i, d) in ["1", "2", "3", "4", "5", "6"].iter().enumerate() {
        page.change_digit(i, d);
    }

    let outcome = page.submit(&api).await;

    assert_eq!(api.calls(), vec![AuthCall::VerifyEmail { email: "a@b.com".into(), code: "123456".into() }]);
    assert_eq!(outcome, Outcome::alert_then(Alert::success(VERIFIED), AuthRoute::Login));
    assert_eq!(page.code(), "");
}

#[tokio::test]
async fn incomplete_code_skips_request() {
    let api = FakeAuthApi::new();
    let mut page = VerifyEmailPage::new("a@b.com");
    page.enter_code("123");

    let outcome = page.submit(&api).await;

    assert_eq!(outcome, Outcome::alert(Alert::error(INCOMPLETE_CODE)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn rejected_code_keeps_digits_for_correction() {
    let api = FakeAuthApi::new().respond("verify_email", Err(rejected(&["Código inválido"])));
    let mut page = VerifyEmailPage::new("a@b.com");
    page.enter_code("654321");

    let outcome = page.submit(&api).await;

    assert_eq!(outcome, Outcome::alert(Alert::error("Código inválido")));
    assert_eq!(page.code(), "654321");
}

#[tokio::test]
async fn resend_requests_new_code_for_same_email() {
    let api = FakeAuthApi::new();
    let page = VerifyEmailPage::new("a@b.com");

    let outcome = page.resend(&api).await;

    assert_eq!(outcome, Outcome::alert(Alert::success(CODE_RESENT)));
    assert_eq!(api.calls(), vec![AuthCall::Resend { email: "a@b.com".into() }]);
}

#[tokio::test]
async fn resend_failure_uses_service_fallback() {
    let api = FakeAuthApi::new().respond("resend", Err(rejected(&[crate::net::api::RESEND_FALLBACK])));
    let page = VerifyEmailPage::new("a@b.com");

    let outcome = page.resend(&api).await;

    assert_eq!(outcome, Outcome::alert(Alert::error("No se pudo reenviar el código")));
}

use super::*;
use crate::test_support::{AuthCall, FakeGeoApi, FakeAuthApi, locality, rejected};

fn filled_page() -> RegisterPage {
    let mut page = RegisterPage::new();
    page.draft = RegisterDraft {
        name: "Ana".to_owned(),
        email: "ana@example.com".to_owned(),
        province: "Córdoba".to_owned(),
        city: "Alta Gracia".to_owned(),
        password: "secret".to_owned(),
    };
    page
}

// =============================================================
// Draft validation
// =============================================================

#[test]
fn validate_requires_every_field() {
    let mut draft = filled_page().draft;
    assert!(draft.validate().is_ok());
    draft.city = "  ".to_owned();
    assert_eq!(draft.validate(), Err(MISSING_FIELDS));
}

#[test]
fn validate_trims_text_fields() {
    let mut draft = filled_page().draft;
    draft.email = "  ana@example.com ".to_owned();
    assert_eq!(draft.validate().unwrap().email, "ana@example.com");
}

// =============================================================
// Geo lookups
// =============================================================

#[tokio::test]
async fn load_provinces_fills_list() {
    let geo = FakeGeoApi::with_provinces(&["Buenos Aires", "Córdoba"]);
    let mut page = RegisterPage::new();
    assert_eq!(page.load_provinces(&geo).await, None);
    assert_eq!(page.provinces().len(), 2);
}

#[tokio::test]
async fn load_provinces_failure_alerts() {
    let geo = FakeGeoApi { provinces: Some(Err(ApiError::Transport("down".into()))), ..FakeGeoApi::default() };
    let mut page = RegisterPage::new();
    assert_eq!(page.load_provinces(&geo).await, Some(Alert::error(PROVINCES_FAILED)));
}

#[tokio::test]
async fn choose_province_loads_localities_and_clears_city() {
    let geo = FakeGeoApi::with_provinces(&["Córdoba"]).with_localities("Córdoba", &["Alta Gracia", "Jesús María"]);
    let mut page = filled_page();

    assert_eq!(page.choose_province(&geo, "Córdoba").await, None);

    assert_eq!(page.draft.province, "Córdoba");
    assert!(page.draft.city.is_empty());
    assert_eq!(page.localities().len(), 2);
}

#[tokio::test]
async fn typed_names_resolve_to_listed_spelling() {
    let geo = FakeGeoApi::with_provinces(&["Buenos Aires", "Córdoba"]).with_localities("Córdoba", &["Alta Gracia"]);
    let mut page = RegisterPage::new();
    page.load_provinces(&geo).await;

    let province = page.province_named("  córdoba ").expect("listed").name.clone();
    assert_eq!(province, "Córdoba");
    assert!(page.province_named("Atlántida").is_none());

    page.choose_province(&geo, &province).await;
    assert_eq!(page.locality_named("ALTA GRACIA").map(|l| l.name.as_str()), Some("Alta Gracia"));
    assert!(page.locality_named("Ushuaia").is_none());
}

#[tokio::test]
async fn unknown_or_blank_province_yields_empty_localities() {
    let geo = FakeGeoApi::default();
    let mut page = RegisterPage::new();
    assert_eq!(page.choose_province(&geo, "Atlántida").await, None);
    assert!(page.localities().is_empty());
    assert_eq!(page.choose_province(&geo, "").await, None);
    assert!(page.localities().is_empty());
}

#[test]
fn stale_locality_response_is_dropped() {
    let mut page = RegisterPage::new();
    let first = page.select_province("Buenos Aires");
    let second = page.select_province("Córdoba");

    assert_eq!(page.apply_localities(&second, Ok(vec![locality("Córdoba", "Alta Gracia")])), None);
    assert_eq!(page.apply_localities(&first, Ok(vec![locality("Buenos Aires", "Tandil")])), None);

    assert_eq!(page.localities().len(), 1);
    assert_eq!(page.localities()[0].name, "Alta Gracia");
}

#[test]
fn stale_locality_failure_does_not_alert() {
    let mut page = RegisterPage::new();
    let first = page.select_province("Buenos Aires");
    let _second = page.select_province("Córdoba");
    assert_eq!(page.apply_localities(&first, Err(ApiError::Transport("late".into()))), None);
}

#[test]
fn current_locality_failure_alerts() {
    let mut page = RegisterPage::new();
    let ticket = page.select_province("Córdoba");
    assert_eq!(ticket.province(), "Córdoba");
    assert_eq!(
        page.apply_localities(&ticket, Err(ApiError::Transport("down".into()))),
        Some(Alert::error(LOCALITIES_FAILED))
    );
}

// =============================================================
// Submit
// =============================================================

#[tokio::test]
async fn submit_success_navigates_to_verification_with_email() {
    let api = FakeAuthApi::new();
    let mut page = filled_page();

    let outcome = page.submit(&api).await;

    assert_eq!(outcome.alert, Some(Alert::success(REGISTERED)));
    assert_eq!(outcome.navigate, Some(AuthRoute::VerifyEmail { email: "ana@example.com".to_owned() }));
    assert_eq!(page.draft, RegisterDraft::default());
    assert!(matches!(&api.calls()[..], [AuthCall::Register(req)] if req.city == "Alta Gracia"));
}

#[tokio::test]
async fn submit_rejection_keeps_all_messages_in_order() {
    let api = FakeAuthApi::new().respond("register", Err(rejected(&["a", "b"])));
    let mut page = filled_page();

    let outcome = page.submit(&api).await;

    assert_eq!(outcome.alert, Some(Alert::error("a\nb")));
    assert_eq!(outcome.navigate, None);
    assert_eq!(page.draft.name, "Ana");
}

#[tokio::test]
async fn submit_incomplete_draft_skips_request() {
    let api = FakeAuthApi::new();
    let mut page = RegisterPage::new();

    let outcome = page.submit(&api).await;

    assert_eq!(outcome.alert, Some(Alert::error(MISSING_FIELDS)));
    assert!(api.calls().is_empty());
}

//! Registration screen: account form with province/locality pickers.
//!
//! DESIGN
//! ======
//! Locality lists are fetched whenever the province changes. Each request is
//! tagged with a [`LocalityTicket`]; a response is applied only if its ticket
//! still matches the current selection, so a slow answer for a province the
//! user already moved away from is dropped instead of overwriting the list.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use super::{Alert, Outcome};
use crate::net::types::{Locality, Province, RegisterRequest};
use crate::net::{ApiError, AuthApi, GeoApi};
use crate::state::nav::AuthRoute;

pub const MISSING_FIELDS: &str = "Todos los campos son obligatorios";
pub const REGISTERED: &str = "Registro exitoso. Verificá tu correo.";
pub const PROVINCES_FAILED: &str = "No se pudieron cargar las provincias";
pub const LOCALITIES_FAILED: &str = "No se pudieron cargar las localidades";

/// Form fields while the user fills them in. Never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterDraft {
    pub name: String,
    pub email: String,
    pub province: String,
    pub city: String,
    pub password: String,
}

impl RegisterDraft {
    /// Require every field, trimming all but the password.
    pub(crate) fn validate(&self) -> Result<RegisterRequest, &'static str> {
        let request = RegisterRequest {
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            province: self.province.trim().to_owned(),
            city: self.city.trim().to_owned(),
            password: self.password.clone(),
        };
        let any_missing = [&request.name, &request.email, &request.province, &request.city, &request.password]
            .iter()
            .any(|field| field.is_empty());
        if any_missing { Err(MISSING_FIELDS) } else { Ok(request) }
    }
}

/// Identifies one locality request by the selection it was issued for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalityTicket {
    seq: u64,
    province: String,
}

impl LocalityTicket {
    #[must_use]
    pub fn province(&self) -> &str {
        &self.province
    }
}

#[derive(Clone, Debug, Default)]
pub struct RegisterPage {
    pub draft: RegisterDraft,
    pub secure_entry: bool,
    provinces: Vec<Province>,
    localities: Vec<Locality>,
    selection_seq: u64,
}

impl RegisterPage {
    #[must_use]
    pub fn new() -> Self {
        Self { secure_entry: true, ..Self::default() }
    }

    #[must_use]
    pub fn provinces(&self) -> &[Province] {
        &self.provinces
    }

    #[must_use]
    pub fn localities(&self) -> &[Locality] {
        &self.localities
    }

    /// The loaded province whose name matches `name`, ignoring case and
    /// surrounding spaces.
    #[must_use]
    pub fn province_named(&self, name: &str) -> Option<&Province> {
        let wanted = name.trim().to_lowercase();
        self.provinces.iter().find(|p| p.name.to_lowercase() == wanted)
    }

    /// The loaded locality whose name matches `name`, ignoring case and
    /// surrounding spaces.
    #[must_use]
    pub fn locality_named(&self, name: &str) -> Option<&Locality> {
        let wanted = name.trim().to_lowercase();
        self.localities.iter().find(|l| l.name.to_lowercase() == wanted)
    }

    /// Fetch the province list. Called when the screen opens.
    pub async fn load_provinces(&mut self, geo: &dyn GeoApi) -> Option<Alert> {
        match geo.provinces().await {
            Ok(provinces) => {
                self.provinces = provinces;
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "province lookup failed");
                Some(Alert::error(PROVINCES_FAILED))
            }
        }
    }

    /// Select `province`, clearing the city and any stale locality list.
    /// Returns the ticket the follow-up locality request must carry.
    pub fn select_province(&mut self, province: &str) -> LocalityTicket {
        self.selection_seq += 1;
        self.draft.province = province.to_owned();
        self.draft.city.clear();
        self.localities.clear();
        LocalityTicket { seq: self.selection_seq, province: province.to_owned() }
    }

    /// Fetch localities for a ticket. Does not touch page state, so it can run
    /// while the user keeps editing.
    ///
    /// # Errors
    ///
    /// Propagates the geo client's transport errors.
    pub async fn fetch_localities(geo: &dyn GeoApi, ticket: &LocalityTicket) -> Result<Vec<Locality>, ApiError> {
        if ticket.province.trim().is_empty() {
            return Ok(Vec::new());
        }
        geo.localities(&ticket.province).await
    }

    /// Apply a locality response. Stale tickets are dropped silently.
    pub fn apply_localities(&mut self, ticket: &LocalityTicket, result: Result<Vec<Locality>, ApiError>) -> Option<Alert> {
        if ticket.seq != self.selection_seq {
            tracing::debug!(province = %ticket.province, "dropping stale locality response");
            return None;
        }
        match result {
            Ok(localities) => {
                self.localities = localities;
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, province = %ticket.province, "locality lookup failed");
                Some(Alert::error(LOCALITIES_FAILED))
            }
        }
    }

    /// Select a province and load its localities in one step.
    pub async fn choose_province(&mut self, geo: &dyn GeoApi, province: &str) -> Option<Alert> {
        let ticket = self.select_province(province);
        let result = Self::fetch_localities(geo, &ticket).await;
        self.apply_localities(&ticket, result)
    }

    pub fn select_city(&mut self, city: &str) {
        self.draft.city = city.to_owned();
    }

    pub fn toggle_secure_entry(&mut self) {
        self.secure_entry = !self.secure_entry;
    }

    /// Submit the draft. On success the draft is discarded and the user is
    /// sent to email verification with the submitted address.
    pub async fn submit(&mut self, api: &dyn AuthApi) -> Outcome {
        let request = match self.draft.validate() {
            Ok(request) => request,
            Err(message) => return Outcome::alert(Alert::error(message)),
        };

        match api.register(&request).await {
            Ok(_) => {
                self.draft = RegisterDraft::default();
                Outcome::alert_then(Alert::success(REGISTERED), AuthRoute::VerifyEmail { email: request.email })
            }
            Err(e) => {
                tracing::debug!(error = %e, "registration failed");
                Outcome::alert(Alert::from(&e))
            }
        }
    }
}

//! Settings panel (administrators only).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use crate::components::{Chrome, Page};
use crate::filters;
use crate::models::{BackupFrequency, FieldError, Settings, SettingsForm};
use crate::state::AppState;

/// Build the settings router.
pub fn router() -> Router<AppState> {
    Router::new().route("/settings", get(settings_page).post(save_settings))
}

/// A backup frequency option.
#[derive(Debug, Clone)]
pub struct FrequencyOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Settings page template.
#[derive(Template, WebTemplate)]
#[template(path = "settings/index.html")]
pub struct SettingsTemplate {
    pub chrome: Chrome,
    pub company_name: String,
    pub admin_email: String,
    pub low_stock_threshold: String,
    pub auto_reorder_enabled: bool,
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub frequencies: Vec<FrequencyOption>,
    pub errors: Vec<FieldError>,
    pub notice: Option<&'static str>,
}

impl SettingsTemplate {
    fn new(chrome: Chrome, settings: &Settings) -> Self {
        Self {
            chrome,
            company_name: settings.company_name.clone(),
            admin_email: settings.admin_email.to_string(),
            low_stock_threshold: settings.low_stock_threshold.to_string(),
            auto_reorder_enabled: settings.auto_reorder_enabled,
            email_notifications: settings.email_notifications,
            push_notifications: settings.push_notifications,
            frequencies: frequency_options(settings.backup_frequency.as_str()),
            errors: Vec::new(),
            notice: None,
        }
    }

    /// Echo a rejected submission back into the form.
    fn from_form(chrome: Chrome, form: &SettingsForm, errors: Vec<FieldError>) -> Self {
        Self {
            chrome,
            company_name: form.company_name.clone(),
            admin_email: form.admin_email.clone(),
            low_stock_threshold: form.low_stock_threshold.clone(),
            auto_reorder_enabled: form.auto_reorder_enabled.is_some(),
            email_notifications: form.email_notifications.is_some(),
            push_notifications: form.push_notifications.is_some(),
            frequencies: frequency_options(&form.backup_frequency),
            errors,
            notice: None,
        }
    }

    /// Message for `field`, if it failed validation.
    #[must_use]
    pub fn error_for(&self, field: &str) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }
}

fn frequency_options(selected: &str) -> Vec<FrequencyOption> {
    BackupFrequency::ALL
        .iter()
        .map(|f| FrequencyOption {
            value: f.as_str(),
            label: f.label(),
            selected: f.as_str() == selected,
        })
        .collect()
}

/// Query parameters for the settings page.
#[derive(Debug, Default, Deserialize)]
pub struct SettingsQuery {
    pub notice: Option<String>,
}

/// Settings panel.
///
/// GET /settings
#[instrument(skip(page, state))]
async fn settings_page(
    page: Page,
    State(state): State<AppState>,
    Query(query): Query<SettingsQuery>,
) -> SettingsTemplate {
    let settings = state.store().settings.read().await;
    let mut template = SettingsTemplate::new(page.chrome, &settings);
    if query.notice.as_deref() == Some("saved") {
        template.notice = Some("Settings saved successfully!");
    }
    template
}

/// Save settings.
///
/// POST /settings
#[instrument(skip(page, state, form))]
async fn save_settings(
    page: Page,
    State(state): State<AppState>,
    Form(form): Form<SettingsForm>,
) -> Response {
    match form.validate() {
        Ok(settings) => {
            tracing::info!(
                company = %settings.company_name,
                threshold = settings.low_stock_threshold,
                backup = settings.backup_frequency.as_str(),
                "Settings saved"
            );
            *state.store().settings.write().await = settings;
            Redirect::to("/settings?notice=saved").into_response()
        }
        Err(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            SettingsTemplate::from_form(page.chrome, &form, errors),
        )
            .into_response(),
    }
}

//! System settings edited on the settings panel.

use serde::{Deserialize, Serialize};

use stockroom_core::Email;

use super::product::FieldError;

/// How often backups run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupFrequency {
    Hourly,
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl BackupFrequency {
    pub const ALL: [Self; 4] = [Self::Hourly, Self::Daily, Self::Weekly, Self::Monthly];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Hourly => "Hourly",
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
        }
    }
}

impl std::str::FromStr for BackupFrequency {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|f| f.as_str() == s).ok_or(())
    }
}

/// Console-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub company_name: String,
    pub admin_email: Email,
    pub low_stock_threshold: u32,
    pub auto_reorder_enabled: bool,
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub backup_frequency: BackupFrequency,
}

/// Settings form as posted by the browser.
///
/// Unchecked checkboxes are simply absent from the form body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub admin_email: String,
    #[serde(default)]
    pub low_stock_threshold: String,
    pub auto_reorder_enabled: Option<String>,
    pub email_notifications: Option<String>,
    pub push_notifications: Option<String>,
    #[serde(default)]
    pub backup_frequency: String,
}

impl SettingsForm {
    /// Validate into a complete [`Settings`] value.
    ///
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn validate(&self) -> Result<Settings, Vec<FieldError>> {
        let mut errors = Vec::new();

        let company_name = self.company_name.trim().to_string();
        if company_name.is_empty() {
            errors.push(FieldError::new("company_name", "Company name is required"));
        }
        let admin_email = Email::parse(&self.admin_email)
            .map_err(|_| {
                errors.push(FieldError::new(
                    "admin_email",
                    "Please enter a valid email address",
                ));
            })
            .ok();
        let low_stock_threshold = self
            .low_stock_threshold
            .trim()
            .parse::<u32>()
            .map_err(|_| {
                errors.push(FieldError::new(
                    "low_stock_threshold",
                    "Threshold must be a whole number",
                ));
            })
            .ok();
        let backup_frequency = self
            .backup_frequency
            .parse::<BackupFrequency>()
            .map_err(|()| {
                errors.push(FieldError::new(
                    "backup_frequency",
                    "Please select a backup frequency",
                ));
            })
            .ok();

        match (admin_email, low_stock_threshold, backup_frequency) {
            (Some(admin_email), Some(low_stock_threshold), Some(backup_frequency))
                if errors.is_empty() =>
            {
                Ok(Settings {
                    company_name,
                    admin_email,
                    low_stock_threshold,
                    auto_reorder_enabled: self.auto_reorder_enabled.is_some(),
                    email_notifications: self.email_notifications.is_some(),
                    push_notifications: self.push_notifications.is_some(),
                    backup_frequency,
                })
            }
            _ => Err(errors),
        }
    }
}

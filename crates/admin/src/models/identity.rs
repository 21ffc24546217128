//! Console user identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{Email, Role, UserId};

use super::product::FieldError;

/// A console user record.
///
/// Held in the session slot once authenticated, and listed on the users page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique user ID.
    pub id: UserId,
    /// Login email.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Permission level.
    pub role: Role,
    /// Optional avatar image reference.
    pub avatar: Option<String>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// Most recent successful sign-in.
    pub last_login: Option<DateTime<Utc>>,
}

impl Identity {
    /// Uppercased first letter of the display name, for avatar bubbles.
    #[must_use]
    pub fn initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}

/// Validated fields for creating or updating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub name: String,
    pub email: Email,
    pub role: Role,
}

/// Raw user form as submitted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

impl UserForm {
    /// Validate the form, collecting every failing field.
    ///
    /// # Errors
    ///
    /// Returns all field errors when any field is missing or malformed.
    pub fn validate(&self) -> Result<UserDraft, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = self.name.trim().to_string();
        if name.is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        }
        let email = Email::parse(&self.email)
            .map_err(|_| {
                errors.push(FieldError::new(
                    "email",
                    "Please enter a valid email address",
                ));
            })
            .ok();
        let role = self
            .role
            .parse::<Role>()
            .map_err(|_| errors.push(FieldError::new("role", "Please select a role")))
            .ok();

        match (email, role) {
            (Some(email), Some(role)) if errors.is_empty() => Ok(UserDraft { name, email, role }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_is_uppercased() {
        let identity = Identity {
            id: UserId::new(1),
            email: Email::parse("jo@inventory.com").unwrap(),
            name: "jo".to_string(),
            role: Role::Cashier,
            avatar: None,
            created_at: Utc::now(),
            last_login: None,
        };
        assert_eq!(identity.initial(), "J");
    }

    #[test]
    fn test_user_form_requires_role() {
        let form = UserForm {
            name: "Sam".to_string(),
            email: "sam@inventory.com".to_string(),
            role: String::new(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors, vec![FieldError::new("role", "Please select a role")]);
    }

    #[test]
    fn test_user_form_valid() {
        let form = UserForm {
            name: " Sam ".to_string(),
            email: "Sam@Inventory.com".to_string(),
            role: "assistant".to_string(),
        };
        let draft = form.validate().unwrap();
        assert_eq!(draft.name, "Sam");
        assert_eq!(draft.email.as_str(), "sam@inventory.com");
        assert_eq!(draft.role, Role::Assistant);
    }
}

//! `access`: show the navigation decision for a role and path.

use std::io::Write;

use chrono::Utc;
use stockroom_admin::services::{DestinationRegistry, Resolution};
use stockroom_admin::store::seed;
use stockroom_core::Role;

use super::CliError;

/// Print how `path` resolves for a demo account with `role`, or for an
/// anonymous caller when `role` is `None`.
///
/// # Errors
///
/// Returns an error for an unknown role or if output fails.
pub fn run(out: &mut impl Write, role: Option<&str>, path: &str) -> Result<(), CliError> {
    let identity = match role {
        Some(role) => {
            let role: Role = role.parse()?;
            let account = seed::users(Utc::now())
                .into_iter()
                .find(|u| u.role == role)
                .ok_or(CliError::NoAccount(role))?;
            Some(account)
        }
        None => None,
    };

    let registry = DestinationRegistry::standard();
    let who = identity
        .as_ref()
        .map_or("anonymous", |identity| identity.role.label());
    let decision = describe(&registry.resolve(path, identity.as_ref()));
    writeln!(out, "{who} -> {path}: {decision}")?;
    Ok(())
}

fn describe(resolution: &Resolution) -> String {
    match resolution {
        Resolution::Render(destination) => format!("render {}", destination.label()),
        Resolution::Login {
            return_to: Some(path),
        } => format!("login (return to {path})"),
        Resolution::Login { return_to: None } => "login".to_string(),
        Resolution::Forbidden { destination } => format!("forbidden ({})", destination.label()),
        Resolution::Redirect(to) => format!("redirect to {to}"),
        Resolution::NotFound => "not found".to_string(),
    }
}

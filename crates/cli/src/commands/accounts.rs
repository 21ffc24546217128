//! `accounts`: list the demo accounts.

use std::io::Write;

use chrono::Utc;
use stockroom_admin::store::seed;

use super::CliError;

/// Print one line per demo account: email and role.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn run(out: &mut impl Write) -> Result<(), CliError> {
    for account in seed::users(Utc::now()) {
        writeln!(out, "{:<28} {}", account.email.as_str(), account.role.label())?;
    }
    Ok(())
}

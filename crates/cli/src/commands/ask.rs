//! `ask`: run an utterance through the responder.

use std::io::Write;

use stockroom_admin::config::AdminConfig;
use stockroom_admin::services::{PendingReply, Responder, ThinkingDelay};

use super::CliError;

/// Print the reply for `utterance`, optionally after the configured delay.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or output fails.
pub async fn run(out: &mut impl Write, utterance: &str, think: bool) -> Result<(), CliError> {
    let responder = Responder::standard();
    let reply = if think {
        let config = AdminConfig::from_env()?;
        let delay = ThinkingDelay {
            min: config.reply_delay.min,
            max: config.reply_delay.max,
        }
        .sample();
        tracing::debug!(?delay, "thinking");
        PendingReply::spawn(responder, utterance.to_string(), delay)
            .wait()
            .await
            .unwrap_or_else(|| responder.respond(utterance))
    } else {
        responder.respond(utterance)
    };
    writeln!(out, "{reply}")?;
    Ok(())
}

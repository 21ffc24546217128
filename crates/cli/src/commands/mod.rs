//! Subcommand implementations.
//!
//! Each command writes to the given writer so tests can capture output.

use thiserror::Error;

pub mod access;
pub mod accounts;
pub mod ask;

/// Errors a command can fail with.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Role(#[from] stockroom_core::RoleError),

    #[error(transparent)]
    Config(#[from] stockroom_admin::config::ConfigError),

    #[error("no demo account has role {0}")]
    NoAccount(stockroom_core::Role),

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

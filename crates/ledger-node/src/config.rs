//! Node configuration.

use crate::Args;
use ledger_consensus::ValidationPolicy;
use std::path::PathBuf;
use tracing::Level;

/// Resolved node configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Path of the ledger store. Taken from `DATABASE_URL` or the
    /// `--database-url` flag.
    pub database_url: PathBuf,
    /// HTTP bind address.
    pub bind_address: String,
    /// Log level.
    pub log_level: Level,
    /// Validation policy knobs.
    pub policy: ValidationPolicy,
}

impl NodeConfig {
    /// Build the configuration from parsed CLI arguments.
    pub fn from_args(args: &Args) -> Self {
        Self {
            database_url: args.database_url.clone(),
            bind_address: args.bind.clone(),
            log_level: crate::parse_log_level(&args.log_level),
            policy: ValidationPolicy {
                reject_negative_values: args.reject_negative_values,
            },
        }
    }
}

//! Service identity and status reporting.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_STATUS_MESSAGE;

fn default_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_status_message() -> String {
    DEFAULT_STATUS_MESSAGE.to_string()
}

/// Service section of the configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Name reported in logs and by the status operation
    #[serde(default = "default_name")]
    pub name: String,

    /// Message returned by the status operation
    #[serde(default = "default_status_message")]
    pub status_message: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            status_message: default_status_message(),
        }
    }
}

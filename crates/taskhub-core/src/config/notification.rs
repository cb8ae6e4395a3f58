//! Notification query configuration.

use serde::{Deserialize, Serialize};

/// Page-size bounds for the notification history API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Page size used when the client does not send `limit`.
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    /// Upper bound applied to client-supplied `limit`.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_page_size() -> u64 {
    50
}

fn default_max_page_size() -> u64 {
    100
}

//! Share link and access log configuration.

use serde::{Deserialize, Serialize};

/// Share creation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Public origin used to build share URLs (`{base}/share/{token}`).
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Horizon used for the `never` duration preset, in days.
    #[serde(default = "default_never_days")]
    pub never_expires_after_days: i64,
    /// Maximum number of documents in one share.
    #[serde(default = "default_max_documents")]
    pub max_documents: usize,
    /// Maximum number of recipients on one share.
    #[serde(default = "default_max_recipients")]
    pub max_recipients: usize,
    /// Maximum length of the free-text message.
    #[serde(default = "default_max_message")]
    pub max_message_length: usize,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            public_base_url: default_public_base_url(),
            never_expires_after_days: default_never_days(),
            max_documents: default_max_documents(),
            max_recipients: default_max_recipients(),
            max_message_length: default_max_message(),
        }
    }
}

/// Access log writer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessLogConfig {
    /// Capacity of the in-process queue between request handlers and the
    /// writer task.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Attempts per entry before it is dropped.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base backoff between attempts, doubled each retry.
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,
}

impl Default for AccessLogConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff(),
        }
    }
}

fn default_public_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_never_days() -> i64 {
    3650
}

fn default_max_documents() -> usize {
    200
}

fn default_max_recipients() -> usize {
    50
}

fn default_max_message() -> usize {
    2000
}

fn default_queue_capacity() -> usize {
    4096
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_backoff() -> u64 {
    100
}

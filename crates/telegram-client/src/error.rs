//! Error types for the Telegram client.

use thiserror::Error;

/// Errors that can occur when talking to the Telegram Bot API.
#[derive(Debug, Error)]
pub enum BotApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API returned `ok: false`.
    #[error("API error {code}: {description}")]
    Api { code: i32, description: String },

    /// Transport-level failure with a non-JSON body.
    #[error("Connection failed: {0}")]
    Connection(String),
}

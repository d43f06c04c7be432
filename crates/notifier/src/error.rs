//! Error types for notification dispatch.

use thiserror::Error;

/// Errors that can occur when pushing messages to the channel.
#[derive(Debug, Error)]
pub enum NotifierError {
    /// Outbound send to the messaging platform failed.
    #[error("send failed: {0}")]
    SendFailed(String),
}

//! Telegram Bot API client library.
//!
//! This crate provides a thin typed client for the Telegram Bot HTTP API.
//! It supports:
//!
//! - Sending and editing messages with inline or reply keyboards
//! - Answering callback queries (button presses)
//! - Sending location markers
//! - Receiving updates via long polling
//!
//! # Example
//!
//! ```no_run
//! use telegram_client::{BotClient, BotConfig};
//!
//! # async fn example() -> Result<(), telegram_client::BotApiError> {
//! // Connect (verifies the token via getMe)
//! let config = BotConfig::new("123456:ABC-token");
//! let client = BotClient::connect(config).await?;
//!
//! // Send a message
//! let message = client.send_text(12345, "Hello!").await?;
//! println!("Sent message {}", message.message_id);
//!
//! // Long-poll for updates
//! let updates = client.get_updates(0, 30).await?;
//! for update in updates {
//!     println!("Update {}", update.update_id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::BotClient;
pub use config::BotConfig;
pub use error::BotApiError;
pub use types::*;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

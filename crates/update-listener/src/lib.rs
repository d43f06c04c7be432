//! Inbound update ingestion for the order bot.
//!
//! This crate owns the continuously running consumer that long-polls the
//! channel for inbound events and routes each one to a handler exactly
//! once per loop pass: operator control presses (status advances,
//! language changes) and chat messages (the start command and the small
//! button vocabulary). Per-conversation language state lives here too.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use notifier::{Channel, Notifier};
//! use order_store::Database;
//! use telegram_client::{BotClient, BotConfig};
//! use update_listener::{HandlerConfig, SessionStore, UpdateHandler, UpdateListener};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = BotClient::connect(BotConfig::new("123456:ABC-token")).await?;
//! let store = Database::connect("sqlite:orders.db?mode=rwc").await?;
//! store.migrate().await?;
//!
//! let channel: Arc<dyn Channel> = Arc::new(client.clone());
//! let sessions = Arc::new(SessionStore::new());
//! let notifier = Notifier::new(channel.clone(), 555);
//! let handler = UpdateHandler::new(
//!     channel,
//!     store,
//!     sessions,
//!     notifier,
//!     HandlerConfig { operator_chat_id: 555, webapp_url: None },
//! );
//!
//! let listener = UpdateListener::new(client, handler);
//! let stop = listener.stop_handle();
//! tokio::spawn(async move {
//!     tokio::signal::ctrl_c().await.ok();
//!     stop.stop();
//! });
//! listener.run().await;
//! # Ok(())
//! # }
//! ```

pub mod event;
pub mod handler;
pub mod listener;
pub mod session;

pub use event::{classify, ActionPayload, InboundEvent, PayloadError};
pub use handler::{HandlerConfig, HandlerError, UpdateHandler};
pub use listener::{ListenerConfig, StopHandle, UpdateListener, UpdateSource};
pub use session::SessionStore;

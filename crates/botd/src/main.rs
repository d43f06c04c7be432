//! Order bot daemon.
//!
//! Wires the order store, the Telegram client, the notifier and the
//! update listener together, then polls until Ctrl+C.
//!
//! Configuration via .env file or environment variables:
//!   BOT_TOKEN         - Bot API token (required)
//!   OPERATOR_CHAT_ID  - chat id of the operator conversation (required)
//!   DATABASE_URL      - SQLite URL (default: sqlite:orders.db?mode=rwc)
//!   WEBAPP_URL        - storefront web-app URL (optional)
//!   TELEGRAM_API_ROOT - alternative Bot API server (optional)

use std::env;
use std::sync::Arc;

use tracing::info;

use notifier::{Channel, Notifier};
use order_store::Database;
use telegram_client::{BotClient, BotConfig};
use update_listener::{HandlerConfig, SessionStore, UpdateHandler, UpdateListener};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (searches current dir and parents)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let token = env::var("BOT_TOKEN").map_err(|_| "BOT_TOKEN is not set")?;
    let operator_chat_id: i64 = env::var("OPERATOR_CHAT_ID")
        .map_err(|_| "OPERATOR_CHAT_ID is not set")?
        .parse()
        .map_err(|_| "OPERATOR_CHAT_ID must be a numeric chat id")?;
    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:orders.db?mode=rwc".to_string());
    let webapp_url = env::var("WEBAPP_URL").ok().filter(|url| !url.is_empty());

    let store = Database::connect(&database_url).await?;
    store.migrate().await?;

    let config = match env::var("TELEGRAM_API_ROOT") {
        Ok(api_root) => BotConfig::with_api_root(api_root, token),
        Err(_) => BotConfig::new(token),
    };
    let client = BotClient::connect(config).await?;

    let channel: Arc<dyn Channel> = Arc::new(client.clone());
    let sessions = Arc::new(SessionStore::new());
    let notifier = Notifier::new(channel.clone(), operator_chat_id);
    let handler = UpdateHandler::new(
        channel,
        store,
        sessions,
        notifier,
        HandlerConfig {
            operator_chat_id,
            webapp_url,
        },
    );

    let listener = UpdateListener::new(client, handler);
    let stop = listener.stop_handle();
    let polling = tokio::spawn(listener.run());

    tokio::signal::ctrl_c().await?;
    info!("Ctrl+C received, stopping update listener");
    stop.stop();

    let cursor = polling.await?;
    info!("Stopped at update cursor {}", cursor);

    Ok(())
}

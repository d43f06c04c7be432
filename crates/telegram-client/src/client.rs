//! Telegram Bot API HTTP client.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::BotConfig;
use crate::error::BotApiError;
use crate::types::{
    AnswerCallbackQueryParams, EditMessageTextParams, Message, SendLocationParams,
    SendMessageParams, Update, User,
};

/// Default timeout for plain API requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Extra headroom added to a long poll's own timeout. The HTTP request
/// must outlive the server-side wait or every empty poll reports an
/// error.
const LONG_POLL_HEADROOM: Duration = Duration::from_secs(10);

/// Response envelope returned by every Bot API method.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    error_code: Option<i32>,
    description: Option<String>,
}

/// Parameters for the `getUpdates` method.
#[derive(Debug, Serialize)]
struct GetUpdatesParams {
    offset: i64,
    timeout: u64,
}

/// Parameters for the `deleteWebhook` method.
#[derive(Debug, Serialize)]
struct DeleteWebhookParams {
    drop_pending_updates: bool,
}

/// Client for communicating with the Telegram Bot API.
#[derive(Clone)]
pub struct BotClient {
    http: Client,
    config: BotConfig,
    connected: Arc<AtomicBool>,
}

impl BotClient {
    /// Connect to the Bot API and verify the token.
    pub async fn connect(config: BotConfig) -> Result<Self, BotApiError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(BotApiError::Http)?;

        let client = Self {
            http,
            config,
            connected: Arc::new(AtomicBool::new(false)),
        };

        let me = client.get_me().await?;
        client.connected.store(true, Ordering::SeqCst);
        info!(
            "Connected to Telegram Bot API as @{}",
            me.username.as_deref().unwrap_or("<unnamed>")
        );

        Ok(client)
    }

    /// Check if the last token verification succeeded.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Get the bot's own account.
    pub async fn get_me(&self) -> Result<User, BotApiError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Send a message.
    pub async fn send_message(&self, params: SendMessageParams) -> Result<Message, BotApiError> {
        self.call("sendMessage", &params).await
    }

    /// Send a plain text message to a chat.
    pub async fn send_text(&self, chat_id: i64, text: &str) -> Result<Message, BotApiError> {
        self.send_message(SendMessageParams::text(chat_id, text)).await
    }

    /// Edit the text and keyboard of a previously sent message.
    pub async fn edit_message_text(
        &self,
        params: EditMessageTextParams,
    ) -> Result<(), BotApiError> {
        // The API returns the edited Message; nothing downstream needs it.
        let _: serde_json::Value = self.call("editMessageText", &params).await?;
        Ok(())
    }

    /// Acknowledge a callback query, optionally with a notification.
    pub async fn answer_callback_query(
        &self,
        params: AnswerCallbackQueryParams,
    ) -> Result<(), BotApiError> {
        let _: bool = self.call("answerCallbackQuery", &params).await?;
        Ok(())
    }

    /// Send a location marker to a chat.
    pub async fn send_location(
        &self,
        chat_id: i64,
        latitude: f64,
        longitude: f64,
    ) -> Result<Message, BotApiError> {
        let params = SendLocationParams {
            chat_id,
            latitude,
            longitude,
        };
        self.call("sendLocation", &params).await
    }

    /// Long-poll for updates starting at `offset`.
    ///
    /// Blocks for up to `timeout_secs` on the server side; returns an
    /// empty batch when the wait expires without traffic.
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, BotApiError> {
        let params = GetUpdatesParams {
            offset,
            timeout: timeout_secs,
        };
        let timeout = Duration::from_secs(timeout_secs) + LONG_POLL_HEADROOM;
        self.call_with_timeout("getUpdates", &params, timeout).await
    }

    /// Remove an installed webhook so long polling can take over.
    pub async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<bool, BotApiError> {
        let params = DeleteWebhookParams {
            drop_pending_updates,
        };
        self.call("deleteWebhook", &params).await
    }

    /// Get the configuration.
    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Make a Bot API call with the default request timeout.
    async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: &P,
    ) -> Result<R, BotApiError> {
        self.call_with_timeout(method, params, REQUEST_TIMEOUT).await
    }

    /// Make a Bot API call with an explicit request timeout.
    async fn call_with_timeout<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: &P,
        timeout: Duration,
    ) -> Result<R, BotApiError> {
        let url = self.config.method_url(method);
        debug!("Bot API call: {}", method);

        let response = self
            .http
            .post(&url)
            .timeout(timeout)
            .json(params)
            .send()
            .await
            .map_err(BotApiError::Http)?;

        let status = response.status();
        let body = response.text().await.map_err(BotApiError::Http)?;

        // The API reports failures inside the JSON envelope, even on
        // non-2xx statuses.
        let envelope: ApiResponse<R> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) => {
                if status.is_success() {
                    return Err(BotApiError::Json(e));
                }
                return Err(BotApiError::Connection(format!("HTTP {}: {}", status, body)));
            }
        };

        if !envelope.ok {
            return Err(BotApiError::Api {
                code: envelope.error_code.unwrap_or(-1),
                description: envelope
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            });
        }

        envelope.result.ok_or_else(|| BotApiError::Api {
            code: -1,
            description: "No result in response".to_string(),
        })
    }
}

impl std::fmt::Debug for BotClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotClient")
            .field("config", &self.config)
            .field("connected", &self.is_connected())
            .finish()
    }
}

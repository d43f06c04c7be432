//! Outbound channel trait and implementations.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use telegram_client::{
    AnswerCallbackQueryParams, BotClient, EditMessageTextParams, InlineKeyboardMarkup,
    ReplyMarkup, SendMessageParams,
};

use crate::error::NotifierError;

/// Address of a message that was sent over the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    /// Conversation the message lives in.
    pub chat_id: i64,
    /// Message identifier within that conversation.
    pub message_id: i64,
}

/// Trait for the channel's send/edit/acknowledge primitives.
///
/// Abstracted to support different transports (Telegram, tests, etc.)
#[async_trait]
pub trait Channel: Send + Sync {
    /// Send a plain text message, optionally with a keyboard.
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<ReplyMarkup>,
    ) -> Result<MessageRef, NotifierError>;

    /// Send a Markdown-formatted message, optionally with a keyboard.
    async fn send_markdown(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<ReplyMarkup>,
    ) -> Result<MessageRef, NotifierError>;

    /// Edit a previously sent message in place. An empty keyboard strips
    /// the message of its controls.
    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<(), NotifierError>;

    /// Acknowledge an action press, optionally with a notification.
    /// `urgent` escalates the notification to an alert dialog.
    async fn answer_action(
        &self,
        action_id: &str,
        text: Option<&str>,
        urgent: bool,
    ) -> Result<(), NotifierError>;

    /// Send a location marker.
    async fn send_location(
        &self,
        chat_id: i64,
        latitude: f64,
        longitude: f64,
    ) -> Result<(), NotifierError>;
}

fn send_failed(e: telegram_client::BotApiError) -> NotifierError {
    NotifierError::SendFailed(e.to_string())
}

#[async_trait]
impl Channel for BotClient {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<ReplyMarkup>,
    ) -> Result<MessageRef, NotifierError> {
        let mut params = SendMessageParams::text(chat_id, text);
        params.reply_markup = markup;
        let message = BotClient::send_message(self, params).await.map_err(send_failed)?;
        Ok(MessageRef {
            chat_id,
            message_id: message.message_id,
        })
    }

    async fn send_markdown(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<ReplyMarkup>,
    ) -> Result<MessageRef, NotifierError> {
        let mut params = SendMessageParams::text(chat_id, text).markdown();
        params.reply_markup = markup;
        let message = BotClient::send_message(self, params).await.map_err(send_failed)?;
        Ok(MessageRef {
            chat_id,
            message_id: message.message_id,
        })
    }

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<(), NotifierError> {
        let params = EditMessageTextParams::new(chat_id, message_id, text)
            .markdown()
            .with_keyboard(keyboard);
        self.edit_message_text(params).await.map_err(send_failed)
    }

    async fn answer_action(
        &self,
        action_id: &str,
        text: Option<&str>,
        urgent: bool,
    ) -> Result<(), NotifierError> {
        let mut params = AnswerCallbackQueryParams::ack(action_id);
        if let Some(text) = text {
            params = params.with_text(text);
        }
        if urgent {
            params = params.alert();
        }
        self.answer_callback_query(params).await.map_err(send_failed)
    }

    async fn send_location(
        &self,
        chat_id: i64,
        latitude: f64,
        longitude: f64,
    ) -> Result<(), NotifierError> {
        BotClient::send_location(self, chat_id, latitude, longitude)
            .await
            .map(|_| ())
            .map_err(send_failed)
    }
}

/// A no-op channel for wiring tests that discards everything.
#[derive(Debug, Clone, Default)]
pub struct NoOpChannel;

#[async_trait]
impl Channel for NoOpChannel {
    async fn send_message(
        &self,
        chat_id: i64,
        _text: &str,
        _markup: Option<ReplyMarkup>,
    ) -> Result<MessageRef, NotifierError> {
        Ok(MessageRef {
            chat_id,
            message_id: 0,
        })
    }

    async fn send_markdown(
        &self,
        chat_id: i64,
        _text: &str,
        _markup: Option<ReplyMarkup>,
    ) -> Result<MessageRef, NotifierError> {
        Ok(MessageRef {
            chat_id,
            message_id: 0,
        })
    }

    async fn edit_message(
        &self,
        _chat_id: i64,
        _message_id: i64,
        _text: &str,
        _keyboard: InlineKeyboardMarkup,
    ) -> Result<(), NotifierError> {
        Ok(())
    }

    async fn answer_action(
        &self,
        _action_id: &str,
        _text: Option<&str>,
        _urgent: bool,
    ) -> Result<(), NotifierError> {
        Ok(())
    }

    async fn send_location(
        &self,
        _chat_id: i64,
        _latitude: f64,
        _longitude: f64,
    ) -> Result<(), NotifierError> {
        Ok(())
    }
}

/// A sent message captured by [`RecordingChannel`].
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
    pub markup: Option<ReplyMarkup>,
    pub markdown: bool,
}

/// An edit captured by [`RecordingChannel`].
#[derive(Debug, Clone, PartialEq)]
pub struct EditedMessage {
    pub chat_id: i64,
    pub message_id: i64,
    pub text: String,
    pub keyboard: InlineKeyboardMarkup,
}

/// An action acknowledgment captured by [`RecordingChannel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionAnswer {
    pub action_id: String,
    pub text: Option<String>,
    pub urgent: bool,
}

#[derive(Debug, Default)]
struct Recorded {
    sent: Vec<SentMessage>,
    edits: Vec<EditedMessage>,
    answers: Vec<ActionAnswer>,
    locations: Vec<(i64, f64, f64)>,
}

/// A channel double that records every operation, for tests.
///
/// Message ids are handed out from a counter so callers can follow a
/// control message through dispatch and reconciliation. `set_failing`
/// makes every subsequent operation fail, to exercise the
/// swallow-and-log paths.
#[derive(Debug, Clone, Default)]
pub struct RecordingChannel {
    recorded: Arc<Mutex<Recorded>>,
    next_message_id: Arc<AtomicI64>,
    failing: Arc<AtomicBool>,
}

impl RecordingChannel {
    /// Create an empty recording channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), NotifierError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(NotifierError::SendFailed("recording channel set to fail".to_string()))
        } else {
            Ok(())
        }
    }

    /// All sent messages, in order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.recorded.lock().unwrap().sent.clone()
    }

    /// All edits, in order.
    pub fn edits(&self) -> Vec<EditedMessage> {
        self.recorded.lock().unwrap().edits.clone()
    }

    /// All action acknowledgments, in order.
    pub fn answers(&self) -> Vec<ActionAnswer> {
        self.recorded.lock().unwrap().answers.clone()
    }

    /// All location markers, in order.
    pub fn locations(&self) -> Vec<(i64, f64, f64)> {
        self.recorded.lock().unwrap().locations.clone()
    }

    fn record_send(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<ReplyMarkup>,
        markdown: bool,
    ) -> Result<MessageRef, NotifierError> {
        self.check()?;
        let message_id = self.next_message_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.recorded.lock().unwrap().sent.push(SentMessage {
            chat_id,
            text: text.to_string(),
            markup,
            markdown,
        });
        Ok(MessageRef {
            chat_id,
            message_id,
        })
    }
}

#[async_trait]
impl Channel for RecordingChannel {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<ReplyMarkup>,
    ) -> Result<MessageRef, NotifierError> {
        self.record_send(chat_id, text, markup, false)
    }

    async fn send_markdown(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<ReplyMarkup>,
    ) -> Result<MessageRef, NotifierError> {
        self.record_send(chat_id, text, markup, true)
    }

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<(), NotifierError> {
        self.check()?;
        self.recorded.lock().unwrap().edits.push(EditedMessage {
            chat_id,
            message_id,
            text: text.to_string(),
            keyboard,
        });
        Ok(())
    }

    async fn answer_action(
        &self,
        action_id: &str,
        text: Option<&str>,
        urgent: bool,
    ) -> Result<(), NotifierError> {
        self.check()?;
        self.recorded.lock().unwrap().answers.push(ActionAnswer {
            action_id: action_id.to_string(),
            text: text.map(str::to_string),
            urgent,
        });
        Ok(())
    }

    async fn send_location(
        &self,
        chat_id: i64,
        latitude: f64,
        longitude: f64,
    ) -> Result<(), NotifierError> {
        self.check()?;
        self.recorded
            .lock()
            .unwrap()
            .locations
            .push((chat_id, latitude, longitude));
        Ok(())
    }
}

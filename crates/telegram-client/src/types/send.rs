//! Outbound parameter types for the Telegram Bot API.

use serde::{Deserialize, Serialize};

/// Parameters for the `sendMessage` method.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageParams {
    /// Target chat.
    pub chat_id: i64,

    /// The message text.
    pub text: String,

    /// Text formatting mode (e.g., "Markdown").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<String>,

    /// Keyboard attached to the message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyMarkup>,
}

impl SendMessageParams {
    /// Create new send params for a plain text message.
    pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            parse_mode: None,
            reply_markup: None,
        }
    }

    /// Enable Markdown formatting.
    pub fn markdown(mut self) -> Self {
        self.parse_mode = Some("Markdown".to_string());
        self
    }

    /// Attach a reply markup.
    pub fn with_markup(mut self, markup: impl Into<ReplyMarkup>) -> Self {
        self.reply_markup = Some(markup.into());
        self
    }
}

/// Parameters for the `editMessageText` method.
#[derive(Debug, Clone, Serialize)]
pub struct EditMessageTextParams {
    /// Chat of the message to edit.
    pub chat_id: i64,

    /// Identifier of the message to edit.
    pub message_id: i64,

    /// New message text.
    pub text: String,

    /// Text formatting mode (e.g., "Markdown").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<String>,

    /// New inline keyboard. An empty keyboard removes all buttons.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl EditMessageTextParams {
    /// Create new edit params for a message.
    pub fn new(chat_id: i64, message_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            message_id,
            text: text.into(),
            parse_mode: None,
            reply_markup: None,
        }
    }

    /// Enable Markdown formatting.
    pub fn markdown(mut self) -> Self {
        self.parse_mode = Some("Markdown".to_string());
        self
    }

    /// Set the inline keyboard.
    pub fn with_keyboard(mut self, keyboard: InlineKeyboardMarkup) -> Self {
        self.reply_markup = Some(keyboard);
        self
    }
}

/// Parameters for the `answerCallbackQuery` method.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerCallbackQueryParams {
    /// The callback query being acknowledged.
    pub callback_query_id: String,

    /// Notification text shown to the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Show an alert dialog instead of a toast notification.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub show_alert: bool,
}

impl AnswerCallbackQueryParams {
    /// Acknowledge a callback query without any notification.
    pub fn ack(callback_query_id: impl Into<String>) -> Self {
        Self {
            callback_query_id: callback_query_id.into(),
            text: None,
            show_alert: false,
        }
    }

    /// Set the notification text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Escalate the notification to an alert dialog.
    pub fn alert(mut self) -> Self {
        self.show_alert = true;
        self
    }
}

/// Parameters for the `sendLocation` method.
#[derive(Debug, Clone, Serialize)]
pub struct SendLocationParams {
    /// Target chat.
    pub chat_id: i64,
    /// Latitude of the location.
    pub latitude: f64,
    /// Longitude of the location.
    pub longitude: f64,
}

/// Reply markup attached to an outbound message.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReplyMarkup {
    /// Inline keyboard shown under the message.
    Inline(InlineKeyboardMarkup),
    /// Persistent reply keyboard shown instead of the system keyboard.
    Keyboard(ReplyKeyboardMarkup),
}

impl From<InlineKeyboardMarkup> for ReplyMarkup {
    fn from(keyboard: InlineKeyboardMarkup) -> Self {
        ReplyMarkup::Inline(keyboard)
    }
}

impl From<ReplyKeyboardMarkup> for ReplyMarkup {
    fn from(keyboard: ReplyKeyboardMarkup) -> Self {
        ReplyMarkup::Keyboard(keyboard)
    }
}

/// An inline keyboard: rows of pressable buttons under a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InlineKeyboardMarkup {
    /// Button rows.
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    /// Create a keyboard from button rows.
    pub fn new(rows: Vec<Vec<InlineKeyboardButton>>) -> Self {
        Self {
            inline_keyboard: rows,
        }
    }

    /// A keyboard with no buttons. Editing a message to this keyboard
    /// removes its controls.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the keyboard has no buttons.
    pub fn is_empty(&self) -> bool {
        self.inline_keyboard.is_empty()
    }
}

/// A single inline keyboard button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineKeyboardButton {
    /// Button caption.
    pub text: String,

    /// Payload delivered back in a callback query when pressed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,

    /// Web app opened when pressed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_app: Option<WebAppInfo>,
}

impl InlineKeyboardButton {
    /// Create a button that sends a callback payload when pressed.
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: Some(data.into()),
            web_app: None,
        }
    }

    /// Create a button that opens a web app when pressed.
    pub fn web_app(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: None,
            web_app: Some(WebAppInfo { url: url.into() }),
        }
    }
}

/// A persistent reply keyboard.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplyKeyboardMarkup {
    /// Button rows.
    pub keyboard: Vec<Vec<KeyboardButton>>,

    /// Shrink the keyboard to fit its buttons.
    pub resize_keyboard: bool,

    /// Hide the keyboard after one use.
    pub one_time_keyboard: bool,
}

impl ReplyKeyboardMarkup {
    /// Create a resized, persistent keyboard from button rows.
    pub fn persistent(rows: Vec<Vec<KeyboardButton>>) -> Self {
        Self {
            keyboard: rows,
            resize_keyboard: true,
            one_time_keyboard: false,
        }
    }
}

/// A single reply keyboard button.
#[derive(Debug, Clone, Serialize)]
pub struct KeyboardButton {
    /// Button caption, sent back as a plain message when pressed.
    pub text: String,

    /// Web app opened when pressed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_app: Option<WebAppInfo>,
}

impl KeyboardButton {
    /// Create a plain text button.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            web_app: None,
        }
    }

    /// Create a button that opens a web app.
    pub fn web_app(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            web_app: Some(WebAppInfo { url: url.into() }),
        }
    }
}

/// A web app reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebAppInfo {
    /// URL of the web app.
    pub url: String,
}

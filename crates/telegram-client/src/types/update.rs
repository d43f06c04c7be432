//! Inbound update types from the Telegram Bot API.

use serde::{Deserialize, Serialize};

/// An incoming update delivered by `getUpdates`.
///
/// Exactly one of the optional payloads is set per update. Update ids are
/// strictly increasing, which is what makes them usable as a delivery
/// cursor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    /// Monotonically increasing update identifier.
    pub update_id: i64,

    /// A chat message sent to the bot.
    #[serde(default)]
    pub message: Option<Message>,

    /// An inline keyboard button press.
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

/// A chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Message identifier, unique within the chat.
    pub message_id: i64,

    /// Sender of the message.
    #[serde(default)]
    pub from: Option<User>,

    /// The chat the message belongs to.
    pub chat: Chat,

    /// Unix timestamp of the message.
    #[serde(default)]
    pub date: i64,

    /// Text content, if this is a text message.
    #[serde(default)]
    pub text: Option<String>,
}

/// A chat (private conversation, for this bot's purposes).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    /// Chat identifier.
    pub id: i64,

    /// First name, for private chats.
    #[serde(default)]
    pub first_name: Option<String>,

    /// Username, if set.
    #[serde(default)]
    pub username: Option<String>,
}

/// A Telegram user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User identifier.
    pub id: i64,

    /// Whether this user is a bot.
    #[serde(default)]
    pub is_bot: bool,

    /// First name.
    #[serde(default)]
    pub first_name: String,

    /// Username, if set.
    #[serde(default)]
    pub username: Option<String>,
}

/// An inline keyboard button press.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackQuery {
    /// Unique query identifier, used to acknowledge the press.
    pub id: String,

    /// The user who pressed the button.
    pub from: User,

    /// The message the pressed button was attached to.
    #[serde(default)]
    pub message: Option<Message>,

    /// Payload of the pressed button.
    #[serde(default)]
    pub data: Option<String>,
}

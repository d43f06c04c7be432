//! Wire types for the Telegram Bot API.

pub mod send;
pub mod update;

pub use send::{
    AnswerCallbackQueryParams, EditMessageTextParams, InlineKeyboardButton, InlineKeyboardMarkup,
    KeyboardButton, ReplyKeyboardMarkup, ReplyMarkup, SendLocationParams, SendMessageParams,
    WebAppInfo,
};
pub use update::{CallbackQuery, Chat, Message, Update, User};

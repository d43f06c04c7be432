//! Inbound event classification and action payload parsing.

use notifier::Lang;
use order_flow::OrderStatus;
use telegram_client::Update;

/// An inbound event the bot acts on.
///
/// Updates carry exactly one of these shapes; everything else (edits,
/// reactions, non-text messages) is dropped at classification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// Someone pressed an inline control.
    ActionPress {
        /// Identifier used to acknowledge the press.
        action_id: String,
        /// Conversation the press came from.
        chat_id: i64,
        /// The message the pressed control was attached to.
        message_id: Option<i64>,
        /// Raw control payload.
        data: String,
    },

    /// Someone sent a text message.
    ChatMessage {
        /// Conversation the message came from.
        chat_id: i64,
        /// Sender's display name.
        sender_name: String,
        /// Message text.
        text: String,
    },
}

/// Classify an update into an event, or `None` for shapes the bot
/// ignores.
pub fn classify(update: &Update) -> Option<InboundEvent> {
    if let Some(query) = &update.callback_query {
        let chat_id = query
            .message
            .as_ref()
            .map(|message| message.chat.id)
            .unwrap_or(query.from.id);
        return Some(InboundEvent::ActionPress {
            action_id: query.id.clone(),
            chat_id,
            message_id: query.message.as_ref().map(|message| message.message_id),
            data: query.data.clone().unwrap_or_default(),
        });
    }

    if let Some(message) = &update.message {
        let text = message.text.clone()?;
        return Some(InboundEvent::ChatMessage {
            chat_id: message.chat.id,
            sender_name: message
                .from
                .as_ref()
                .map(|user| user.first_name.clone())
                .unwrap_or_default(),
            text,
        });
    }

    None
}

/// A decoded action-control payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPayload {
    /// `set_lang_<code>`
    SetLanguage(Lang),
    /// `setstatus:<orderId>:<targetStatus>`
    SetStatus {
        order_id: i64,
        status: OrderStatus,
    },
}

/// Why a payload failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    /// `set_lang_` payload with a code outside the supported set.
    #[error("unsupported language code: {0}")]
    UnknownLanguage(String),

    /// `setstatus:` payload with a missing/zero order id or an
    /// unrecognized status.
    #[error("malformed status payload: {0}")]
    MalformedStatus(String),

    /// Neither of the two known payload shapes.
    #[error("unrecognized payload: {0}")]
    Unrecognized(String),
}

impl ActionPayload {
    /// Decode one of the two control-payload shapes.
    pub fn parse(data: &str) -> Result<ActionPayload, PayloadError> {
        if let Some(code) = data.strip_prefix("set_lang_") {
            return Lang::from_code(code)
                .map(ActionPayload::SetLanguage)
                .ok_or_else(|| PayloadError::UnknownLanguage(code.to_string()));
        }

        if data.starts_with("setstatus:") {
            let malformed = || PayloadError::MalformedStatus(data.to_string());

            let mut parts = data.splitn(3, ':');
            parts.next(); // "setstatus"
            let order_id: i64 = parts
                .next()
                .and_then(|part| part.parse().ok())
                .ok_or_else(malformed)?;
            if order_id == 0 {
                return Err(malformed());
            }
            let status: OrderStatus = parts
                .next()
                .and_then(|part| part.parse().ok())
                .ok_or_else(malformed)?;

            return Ok(ActionPayload::SetStatus { order_id, status });
        }

        Err(PayloadError::Unrecognized(data.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use telegram_client::{CallbackQuery, Chat, Message, User};

    fn message_update(update_id: i64, chat_id: i64, text: Option<&str>) -> Update {
        Update {
            update_id,
            message: Some(Message {
                message_id: 1,
                from: Some(User {
                    id: chat_id,
                    is_bot: false,
                    first_name: "Aziz".to_string(),
                    username: None,
                }),
                chat: Chat {
                    id: chat_id,
                    first_name: Some("Aziz".to_string()),
                    username: None,
                },
                date: 1700000000,
                text: text.map(str::to_string),
            }),
            callback_query: None,
        }
    }

    fn callback_update(update_id: i64, chat_id: i64, data: &str) -> Update {
        Update {
            update_id,
            message: None,
            callback_query: Some(CallbackQuery {
                id: format!("cbq-{update_id}"),
                from: User {
                    id: chat_id,
                    is_bot: false,
                    first_name: "Op".to_string(),
                    username: None,
                },
                message: Some(Message {
                    message_id: 42,
                    from: None,
                    chat: Chat {
                        id: chat_id,
                        first_name: None,
                        username: None,
                    },
                    date: 1700000000,
                    text: None,
                }),
                data: Some(data.to_string()),
            }),
        }
    }

    #[test]
    fn test_classify_text_message() {
        let event = classify(&message_update(1, 100, Some("/start"))).unwrap();
        assert_eq!(
            event,
            InboundEvent::ChatMessage {
                chat_id: 100,
                sender_name: "Aziz".to_string(),
                text: "/start".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_action_press() {
        let event = classify(&callback_update(2, 555, "setstatus:1:preparing")).unwrap();
        assert_eq!(
            event,
            InboundEvent::ActionPress {
                action_id: "cbq-2".to_string(),
                chat_id: 555,
                message_id: Some(42),
                data: "setstatus:1:preparing".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_drops_textless_message() {
        assert!(classify(&message_update(3, 100, None)).is_none());
    }

    #[test]
    fn test_classify_drops_empty_update() {
        let update = Update {
            update_id: 4,
            message: None,
            callback_query: None,
        };
        assert!(classify(&update).is_none());
    }

    #[test]
    fn test_parse_set_language() {
        assert_eq!(
            ActionPayload::parse("set_lang_uz"),
            Ok(ActionPayload::SetLanguage(Lang::Uz))
        );
        assert_eq!(
            ActionPayload::parse("set_lang_de"),
            Err(PayloadError::UnknownLanguage("de".to_string()))
        );
    }

    #[test]
    fn test_parse_set_status() {
        assert_eq!(
            ActionPayload::parse("setstatus:17:out_for_delivery"),
            Ok(ActionPayload::SetStatus {
                order_id: 17,
                status: OrderStatus::OutForDelivery,
            })
        );
    }

    #[test]
    fn test_parse_malformed_status_payloads() {
        for data in [
            "setstatus:",
            "setstatus:17",
            "setstatus:abc:preparing",
            "setstatus:0:preparing",
            "setstatus:17:shipped",
        ] {
            assert!(
                matches!(
                    ActionPayload::parse(data),
                    Err(PayloadError::MalformedStatus(_))
                ),
                "expected malformed: {data}"
            );
        }
    }

    #[test]
    fn test_parse_unrecognized_payload() {
        assert!(matches!(
            ActionPayload::parse("something_else"),
            Err(PayloadError::Unrecognized(_))
        ));
    }
}

//! Per-conversation language sessions.

use std::collections::HashMap;

use tokio::sync::RwLock;

use notifier::Lang;

/// In-memory map of conversation id to selected display language.
///
/// Sessions are created lazily on the first language selection and live
/// for the lifetime of the process only; a restart resets everyone to
/// the default language. Injected by reference into the handlers so a
/// persistent implementation can replace it without touching call
/// sites.
#[derive(Debug, Default)]
pub struct SessionStore {
    langs: RwLock<HashMap<i64, Lang>>,
}

impl SessionStore {
    /// Create an empty session store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The language selected by a conversation, or the default.
    pub async fn get(&self, chat_id: i64) -> Lang {
        self.langs
            .read()
            .await
            .get(&chat_id)
            .copied()
            .unwrap_or_default()
    }

    /// Select a language for a conversation.
    pub async fn set(&self, chat_id: i64, lang: Lang) {
        self.langs.write().await.insert(chat_id, lang);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_defaults_to_russian() {
        let sessions = SessionStore::new();
        assert_eq!(sessions.get(100).await, Lang::Ru);
    }

    #[tokio::test]
    async fn test_one_language_per_conversation() {
        let sessions = SessionStore::new();
        sessions.set(100, Lang::Uz).await;
        sessions.set(200, Lang::En).await;
        sessions.set(100, Lang::En).await;

        assert_eq!(sessions.get(100).await, Lang::En);
        assert_eq!(sessions.get(200).await, Lang::En);
        assert_eq!(sessions.get(300).await, Lang::Ru);
    }
}

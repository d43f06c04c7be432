//! Configuration types for the Telegram client.

/// Configuration for connecting to the Telegram Bot API.
#[derive(Clone)]
pub struct BotConfig {
    /// Base URL of the Bot API server (e.g., "https://api.telegram.org").
    pub api_root: String,
    /// The bot token issued by BotFather.
    pub token: String,
}

impl BotConfig {
    /// Create a new configuration with the given bot token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_root: "https://api.telegram.org".to_string(),
            token: token.into(),
        }
    }

    /// Create a configuration against a non-default API server
    /// (e.g., a local Bot API instance).
    pub fn with_api_root(api_root: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_root: api_root.into(),
            token: token.into(),
        }
    }

    /// Get the endpoint URL for a Bot API method.
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_root, self.token, method)
    }
}

// The token is a credential; keep it out of Debug output.
impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("api_root", &self.api_root)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_url() {
        let config = BotConfig::new("123:abc");
        assert_eq!(
            config.method_url("sendMessage"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = BotConfig::new("123:secret");
        let output = format!("{:?}", config);
        assert!(!output.contains("secret"));
    }
}

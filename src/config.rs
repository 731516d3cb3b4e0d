use std::env;

const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_url: String,
}

impl Config {
    /// Reads configuration from the environment. `.env` is loaded by the
    /// caller beforehand.
    pub fn from_env() -> Self {
        let server_url =
            env::var("RC_CHAT_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        Self::new(server_url)
    }

    pub fn new(server_url: impl Into<String>) -> Self {
        let server_url = server_url.into().trim_end_matches('/').to_string();
        Self { server_url }
    }

    pub fn chat_endpoint(&self) -> String {
        format!("{}/chat", self.server_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_built_from_base_url() {
        let config = Config::new("http://localhost:8000");
        assert_eq!(config.chat_endpoint(), "http://localhost:8000/chat");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = Config::new("https://chat.example.com/");
        assert_eq!(config.chat_endpoint(), "https://chat.example.com/chat");
    }
}

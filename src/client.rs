use crate::config::Config;
use crate::identity::Identity;
use crate::models::{ChatRequest, ChatResponse, Error, Result};

pub struct ChatClient {
    client: reqwest::Client,
    chat_url: String,
}

impl ChatClient {
    /// Builds the HTTP client. No request timeout is set: a request either
    /// settles or hangs, and a hang keeps the prompt suspended until the
    /// server answers.
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .pool_idle_timeout(std::time::Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            chat_url: config.chat_endpoint(),
        }
    }

    /// Posts one message and returns the trusted markup reply.
    ///
    /// The HTTP status is not consulted: error replies carry a JSON body
    /// with a truthy `error` field whatever the status line says, and a
    /// body that fails to decode counts as a transport failure.
    pub async fn send_message(&self, message: &str, identity: &Identity) -> Result<String> {
        let request = ChatRequest {
            message: message.to_string(),
            user_id: identity.user_id.clone(),
            session_id: identity.session_id.clone(),
        };

        let reply = self
            .client
            .post(&self.chat_url)
            .json(&request)
            .send()
            .await?
            .json::<ChatResponse>()
            .await?;

        if reply.is_error() {
            let detail = reply.error.map(|e| e.to_string()).unwrap_or_default();
            return Err(Error::Server(detail));
        }

        reply
            .response
            .ok_or_else(|| Error::Server("reply carried no response field".to_string()))
    }
}

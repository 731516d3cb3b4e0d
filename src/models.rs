use rustyline::error::ReadlineError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /chat`.
#[derive(Debug, Serialize, Clone)]
pub struct ChatRequest {
    pub message: String,
    pub user_id: String,
    pub session_id: String,
}

/// Reply from `/chat`. The server either answers with `response` (trusted
/// markup) or reports a failure through `error`; any extra fields are
/// ignored.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl ChatResponse {
    pub fn is_error(&self) -> bool {
        self.error.as_ref().map_or(false, is_truthy)
    }
}

/// The service flags failures with any truthy `error` value, so truthiness
/// here follows its dynamic-language rules.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// Error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("server error: {0}")]
    Server(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
    #[error("terminal error: {0}")]
    Terminal(#[from] clearscreen::Error),
    #[error("readline error: {0}")]
    Readline(String),
}

impl From<ReadlineError> for Error {
    fn from(err: ReadlineError) -> Self {
        Error::Readline(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truthiness_follows_js_rules() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("No message provided")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn response_with_falsy_error_is_not_an_error() {
        let reply: ChatResponse =
            serde_json::from_value(json!({ "response": "hi", "error": false })).unwrap();
        assert!(!reply.is_error());
        assert_eq!(reply.response.as_deref(), Some("hi"));
    }

    #[test]
    fn error_body_is_detected() {
        let reply: ChatResponse =
            serde_json::from_value(json!({ "error": "Internal Processing Error" })).unwrap();
        assert!(reply.is_error());
        assert!(reply.response.is_none());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let reply: ChatResponse = serde_json::from_value(json!({
            "response": "<b>Hi</b>",
            "raw_response": "**Hi**",
            "user_id": "u",
            "session_id": "s"
        }))
        .unwrap();
        assert!(!reply.is_error());
        assert_eq!(reply.response.as_deref(), Some("<b>Hi</b>"));
    }
}

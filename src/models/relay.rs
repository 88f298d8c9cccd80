//! Relay request and response bodies

use serde::{Deserialize, Serialize};

/// Body accepted by `POST /ask`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: Option<String>,
}

impl AskRequest {
    /// The question exactly as sent, if present and non-empty
    pub fn question(&self) -> Option<&str> {
        self.question
            .as_deref()
            .filter(|question| !question.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AskResponse {
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

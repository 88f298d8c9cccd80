//! Gemini API data models
//!
//! Request and response structures for the `generateContent` method. Response
//! fields are optional throughout so partial payloads still decode; the answer
//! is reached through an explicit `Option` chain.

use serde::{Deserialize, Serialize};

/// Body of a `generateContent` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Build a single-turn request whose only part is `question`
    pub fn from_question(question: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(question.into()),
                }],
            }],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Body of a `generateContent` response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
    #[serde(default)]
    pub error: Option<UpstreamError>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Error object the API reports in-band
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// The `error` member of a response, which is not always an object
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UpstreamError {
    Detailed(ApiError),
    Other(serde_json::Value),
}

impl UpstreamError {
    /// Whether the value signals a failure; `false`, `0` and `""` do not
    pub fn is_reported(&self) -> bool {
        match self {
            UpstreamError::Detailed(_) => true,
            UpstreamError::Other(value) => match value {
                serde_json::Value::Null => false,
                serde_json::Value::Bool(flag) => *flag,
                serde_json::Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
                serde_json::Value::String(text) => !text.is_empty(),
                serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
            },
        }
    }

    /// Message to surface to callers
    pub fn message_or<'a>(&'a self, default: &'a str) -> &'a str {
        match self {
            UpstreamError::Detailed(error) => error.message_or(default),
            UpstreamError::Other(_) => default,
        }
    }

    pub fn code(&self) -> Option<u16> {
        match self {
            UpstreamError::Detailed(error) => error.code,
            UpstreamError::Other(_) => None,
        }
    }

    pub fn status(&self) -> Option<&str> {
        match self {
            UpstreamError::Detailed(error) => error.status.as_deref(),
            UpstreamError::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, if present and non-empty
    pub fn answer_text(&self) -> Option<&str> {
        self.candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
            .filter(|text| !text.is_empty())
    }

    /// The upstream error, if the payload reports one
    pub fn reported_error(&self) -> Option<&UpstreamError> {
        self.error.as_ref().filter(|error| error.is_reported())
    }

    /// Finish reason of the first candidate, useful when no text came back
    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates.as_ref()?.first()?.finish_reason.as_deref()
    }
}

impl ApiError {
    /// Message to surface to callers
    pub fn message_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.message
            .as_deref()
            .filter(|message| !message.is_empty())
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let request = GenerateContentRequest::from_question("What is 6 x 7?");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"contents": [{"parts": [{"text": "What is 6 x 7?"}]}]})
        );
    }

    #[test]
    fn test_answer_text_from_full_response() {
        let response = parse(json!({
            "candidates": [{
                "content": {"parts": [{"text": "42"}, {"text": "ignored"}], "role": "model"},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 5, "candidatesTokenCount": 1, "totalTokenCount": 6}
        }));
        assert_eq!(response.answer_text(), Some("42"));
        assert_eq!(response.finish_reason(), Some("STOP"));
    }

    #[test]
    fn test_answer_text_missing_at_each_step() {
        assert_eq!(parse(json!({})).answer_text(), None);
        assert_eq!(parse(json!({"candidates": null})).answer_text(), None);
        assert_eq!(parse(json!({"candidates": []})).answer_text(), None);
        assert_eq!(parse(json!({"candidates": [{}]})).answer_text(), None);
        assert_eq!(parse(json!({"candidates": [{"content": {}}]})).answer_text(), None);
        assert_eq!(
            parse(json!({"candidates": [{"content": {"parts": [{}]}}]})).answer_text(),
            None
        );
    }

    #[test]
    fn test_empty_text_is_not_an_answer() {
        let response = parse(json!({"candidates": [{"content": {"parts": [{"text": ""}]}}]}));
        assert_eq!(response.answer_text(), None);
    }

    #[test]
    fn test_error_payload() {
        let response = parse(json!({
            "error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}
        }));
        let error = response.reported_error().unwrap();
        assert_eq!(error.code(), Some(400));
        assert_eq!(error.status(), Some("INVALID_ARGUMENT"));
        assert_eq!(error.message_or("unknown"), "API key not valid.");
    }

    #[test]
    fn test_error_without_message_uses_default() {
        let response = parse(json!({"error": {"code": 500}}));
        assert_eq!(response.reported_error().unwrap().message_or("unknown"), "unknown");
    }

    #[test]
    fn test_non_object_error_is_still_reported() {
        for error in [json!("quota exhausted"), json!(true), json!(1), json!([1])] {
            let response = parse(json!({ "error": error }));
            let reported = response.reported_error().expect("error reported");
            assert_eq!(reported.message_or("unknown"), "unknown");
        }
    }

    #[test]
    fn test_falsy_error_is_ignored() {
        for error in [json!(null), json!(false), json!(0), json!("")] {
            let response = parse(json!({
                "error": error,
                "candidates": [{"content": {"parts": [{"text": "42"}]}}]
            }));
            assert!(response.reported_error().is_none());
            assert_eq!(response.answer_text(), Some("42"));
        }
    }
}

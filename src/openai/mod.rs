//! OpenAI chat-completions client over reqwest.

pub mod retry;

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::OpenAiError;
use crate::prompt::clean_suggestion;

use self::retry::retry_with_backoff;

/// A single chat message in the request payload.
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Request body for POST /chat/completions.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Client for the OpenAI chat-completions endpoint.
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    /// Build a client from the resolved configuration.
    pub fn new(config: &Config) -> Result<Self, OpenAiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(OpenAiError::Network)?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        })
    }

    /// Ask the model for a completion, retrying transient failures.
    pub async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, OpenAiError> {
        retry_with_backoff(
            || self.complete_once(prompt, temperature),
            |e| OpenAiError::RetriesExhausted(Box::new(e)),
        )
        .await
    }

    /// Ask the model for a single-line suggestion.
    ///
    /// Like [`complete`](Self::complete), but the raw completion is cleaned
    /// (backticks and fences dropped, first line kept) inside the retry, so
    /// a completion that cleans down to nothing is re-asked like any other
    /// empty response.
    pub async fn suggest(&self, prompt: &str, temperature: f32) -> Result<String, OpenAiError> {
        retry_with_backoff(
            || async move {
                let raw = self.complete_once(prompt, temperature).await?;
                clean_suggestion(&raw).ok_or(OpenAiError::EmptyResponse)
            },
            |e| OpenAiError::RetriesExhausted(Box::new(e)),
        )
        .await
    }

    /// Single request/response round trip with the prompt as one user message.
    async fn complete_once(&self, prompt: &str, temperature: f32) -> Result<String, OpenAiError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            temperature,
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key)).map_err(|_| {
                OpenAiError::ParseFailed("API key contains invalid header characters".to_string())
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self
            .http
            .post(&url)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(OpenAiError::Network)?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::TOO_MANY_REQUESTS => return Err(OpenAiError::RateLimited),
            StatusCode::UNAUTHORIZED => return Err(OpenAiError::AuthFailed),
            status => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "could not read error response".to_string());
                let excerpt: String = body.chars().take(500).collect();
                return Err(OpenAiError::Api {
                    status: status.as_u16(),
                    body: excerpt,
                });
            }
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| OpenAiError::ParseFailed(e.to_string()))?;

        let content = parsed
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or(OpenAiError::EmptyResponse)?;

        debug!("OpenAI completion: {} chars", content.len());

        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_serializes_expected_shape() {
        let body = ChatRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatMessage {
                role: "user",
                content: "hello".to_string(),
            }],
            temperature: 0.3,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
        assert!((json["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_chat_response_deserializes() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": "feat: add login"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("feat: add login")
        );
    }

    #[test]
    fn test_chat_response_tolerates_null_content() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }
}

//! OpenAI-compatible chat-completions client
//!
//! Speaks the `/chat/completions` wire format used by Groq (the default
//! endpoint), OpenAI, OpenRouter, and self-hosted gateways.

use async_trait::async_trait;
use maya_core::session::Message;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::base::{ChatProvider, Completion, ProviderError, ProviderResult};

/// Groq's OpenAI-compatible endpoint
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Chat completion request format
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

/// Role and content, as the API expects them
#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat completion response format
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct Usage {
    #[serde(default)]
    prompt_tokens: i64,
    #[serde(default)]
    completion_tokens: i64,
    #[serde(default)]
    total_tokens: i64,
}

/// OpenAI-compatible provider client
pub struct OpenAiCompatClient {
    client: Client,
    api_base: String,
    api_key: Option<String>,
    default_model: String,
    extra_headers: HashMap<String, String>,
}

impl OpenAiCompatClient {
    /// Create a new client. The API base defaults to Groq's endpoint.
    pub fn new(
        api_key: Option<String>,
        api_base: Option<String>,
        default_model: String,
        extra_headers: Option<HashMap<String, String>>,
    ) -> Self {
        let api_base = api_base
            .filter(|base| !base.trim().is_empty())
            .unwrap_or_else(|| GROQ_API_BASE.to_string());

        Self {
            client: Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
            default_model,
            extra_headers: extra_headers.unwrap_or_default(),
        }
    }

    fn apply_headers(&self, mut req_builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(api_key) = &self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        for (key, value) in &self.extra_headers {
            req_builder = req_builder.header(key, value);
        }

        req_builder
    }

    fn parse_response(response: ChatCompletionResponse) -> ProviderResult<Completion> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse("No choices in response".to_string()))?;

        let content = choice.message.content.ok_or_else(|| {
            ProviderError::InvalidResponse("No content in response message".to_string())
        })?;

        let mut usage = HashMap::new();
        usage.insert("prompt_tokens".to_string(), response.usage.prompt_tokens);
        usage.insert(
            "completion_tokens".to_string(),
            response.usage.completion_tokens,
        );
        usage.insert("total_tokens".to_string(), response.usage.total_tokens);

        Ok(Completion {
            content,
            finish_reason: choice.finish_reason.unwrap_or_else(|| "stop".to_string()),
            usage,
        })
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatClient {
    async fn complete(
        &self,
        messages: &[Message],
        model: Option<&str>,
        max_tokens: u32,
        temperature: f32,
    ) -> ProviderResult<Completion> {
        let model = model.unwrap_or(&self.default_model);
        let request = ChatCompletionRequest {
            model,
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            max_tokens,
            temperature,
        };

        let url = format!("{}/chat/completions", self.api_base);
        debug!(model, url = %url, messages = messages.len(), "sending completion request");

        let response = self
            .apply_headers(self.client.post(&url))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(format!("{}: {}", status, body)));
        }

        let parsed: ChatCompletionResponse = response.json().await?;
        Self::parse_response(parsed)
    }

    fn default_model(&self) -> String {
        self.default_model.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maya_core::session::Role;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn context() -> Vec<Message> {
        vec![
            Message::system("You are MAYA."),
            Message::user("hello there"),
        ]
    }

    #[test]
    fn test_parse_response_extracts_content_and_usage() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{
                "message": {"content": "hi!"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
        }))
        .unwrap();

        let completion = OpenAiCompatClient::parse_response(response).unwrap();
        assert_eq!(completion.content, "hi!");
        assert_eq!(completion.finish_reason, "stop");
        assert_eq!(completion.usage["total_tokens"], 15);
    }

    #[test]
    fn test_parse_response_rejects_empty_choices() {
        let response: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": []})).unwrap();
        let err = OpenAiCompatClient::parse_response(response).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_complete_round_trip() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": {"role": "assistant", "content": "Hello from MAYA"},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 10, "completion_tokens": 4, "total_tokens": 14}
            })))
            .mount(&server)
            .await;

        let client = OpenAiCompatClient::new(
            Some("test-key".to_string()),
            Some(server.uri()),
            "llama-3.3-70b-versatile".to_string(),
            None,
        );

        let completion = client
            .complete(&context(), None, 2000, 0.7)
            .await
            .unwrap();
        assert_eq!(completion.content, "Hello from MAYA");
        assert_eq!(completion.usage["completion_tokens"], 4);
    }

    #[tokio::test]
    async fn test_complete_surfaces_api_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(429).set_body_string("{\"error\":\"rate limit exceeded\"}"),
            )
            .mount(&server)
            .await;

        let client = OpenAiCompatClient::new(
            None,
            Some(server.uri()),
            "llama-3.3-70b-versatile".to_string(),
            None,
        );

        let err = client
            .complete(&[Message::new(Role::User, "hi")], None, 100, 0.7)
            .await
            .unwrap_err();
        match err {
            ProviderError::Api(msg) => {
                assert!(msg.contains("429"));
                assert!(msg.contains("rate limit"));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }
}

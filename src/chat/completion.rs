// ABOUTME: Completion service boundary — the trait the orchestrator calls, plus an HTTP client.
// ABOUTME: The client speaks the OpenAI-compatible /chat/completions protocol (Groq by default).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::LlmConfig;
use crate::error::ChatError;
use crate::secret::ApiKey;
use crate::session::{Role, Turn};

/// Token accounting reported with a completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// One outbound request: the full message sequence plus the model to run it on.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Turn>,
}

/// A successful assistant reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub usage: Usage,
}

/// Anything that can turn a message sequence into one assistant reply.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ChatError>;
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: Role,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// HTTP client for OpenAI-compatible chat-completion endpoints.
pub struct OpenAiCompatClient {
    client: Client,
    base_url: String,
    api_key: ApiKey,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl OpenAiCompatClient {
    /// Build a client from config. The timeout covers the whole request.
    pub fn new(config: &LlmConfig, api_key: ApiKey) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionService for OpenAiCompatClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ChatError> {
        let body = ChatCompletionRequest {
            model: &request.model,
            messages: request
                .messages
                .iter()
                .map(|t| WireMessage {
                    role: t.role,
                    content: &t.text,
                })
                .collect(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "sending chat completion"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(self.api_key.expose())
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(classify_transport_error)?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or(text);
            warn!(%status, "completion service returned an error");
            return Err(ChatError::ServiceError(format!("{}: {}", status, detail)));
        }

        parse_completion(&text)
    }
}

/// Map a reqwest failure to the unavailable/error split.
fn classify_transport_error(err: reqwest::Error) -> ChatError {
    if err.is_timeout() {
        ChatError::ServiceUnavailable("request timed out".to_string())
    } else if err.is_connect() || err.is_request() {
        ChatError::ServiceUnavailable(err.to_string())
    } else {
        ChatError::ServiceError(err.to_string())
    }
}

/// Decode a success body into a completion, rejecting empty replies.
fn parse_completion(body: &str) -> Result<Completion, ChatError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| ChatError::ServiceError(format!("malformed response: {}", e)))?;

    let text = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ChatError::ServiceError("empty reply".to_string()));
    }

    Ok(Completion {
        text,
        usage: parsed.usage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(base_url: String) -> LlmConfig {
        LlmConfig {
            base_url,
            timeout_seconds: 5,
            ..Default::default()
        }
    }

    fn test_key() -> ApiKey {
        ApiKey::validate("TEST_KEY", Some("gsk_test_key_1234")).unwrap()
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "llama-3.1-8b-instant".to_string(),
            messages: vec![Turn::system("be helpful"), Turn::user("hello")],
        }
    }

    #[test]
    fn parse_completion_reads_first_choice() {
        let body = r#"{
            "choices": [{"message": {"role": "assistant", "content": "hi there"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
        }"#;
        let completion = parse_completion(body).unwrap();
        assert_eq!(completion.text, "hi there");
        assert_eq!(completion.usage.total_tokens, 15);
    }

    #[test]
    fn parse_completion_without_usage() {
        let body = r#"{"choices": [{"message": {"content": "ok"}}]}"#;
        let completion = parse_completion(body).unwrap();
        assert_eq!(completion.usage, Usage::default());
    }

    #[test]
    fn parse_completion_rejects_empty_choices() {
        let err = parse_completion(r#"{"choices": []}"#).unwrap_err();
        assert_eq!(err, ChatError::ServiceError("empty reply".to_string()));
    }

    #[test]
    fn parse_completion_rejects_blank_content() {
        let body = r#"{"choices": [{"message": {"content": "   "}}]}"#;
        assert!(matches!(
            parse_completion(body),
            Err(ChatError::ServiceError(_))
        ));
    }

    #[test]
    fn parse_completion_rejects_garbage() {
        let err = parse_completion("<html>bad gateway</html>").unwrap_err();
        match err {
            ChatError::ServiceError(msg) => assert!(msg.contains("malformed")),
            other => panic!("expected ServiceError, got {:?}", other),
        }
    }

    #[test]
    fn request_body_uses_wire_roles() {
        let body = ChatCompletionRequest {
            model: "m",
            messages: vec![
                WireMessage {
                    role: Role::System,
                    content: "s",
                },
                WireMessage {
                    role: Role::User,
                    content: "u",
                },
            ],
            max_tokens: None,
            temperature: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "m",
                "messages": [
                    {"role": "system", "content": "s"},
                    {"role": "user", "content": "u"}
                ]
            })
        );
    }

    #[tokio::test]
    async fn client_posts_history_and_returns_reply() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer gsk_test_key_1234")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "llama-3.1-8b-instant",
                "messages": [
                    {"role": "system", "content": "be helpful"},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"role":"assistant","content":"hi there"}}],
                    "usage":{"prompt_tokens":9,"completion_tokens":2,"total_tokens":11}}"#,
            )
            .create_async()
            .await;

        let client = OpenAiCompatClient::new(&test_config(server.url()), test_key()).unwrap();
        let completion = client.complete(&request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(completion.text, "hi there");
        assert_eq!(completion.usage.prompt_tokens, 9);
    }

    #[tokio::test]
    async fn error_status_is_service_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":{"message":"Invalid API Key"}}"#)
            .create_async()
            .await;

        let client = OpenAiCompatClient::new(&test_config(server.url()), test_key()).unwrap();
        let err = client.complete(&request()).await.unwrap_err();
        match err {
            ChatError::ServiceError(msg) => {
                assert!(msg.contains("401"));
                assert!(msg.contains("Invalid API Key"));
            }
            other => panic!("expected ServiceError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_service_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = OpenAiCompatClient::new(&test_config(server.url()), test_key()).unwrap();
        let err = client.complete(&request()).await.unwrap_err();
        assert_eq!(err.tag(), "ServiceError");
    }

    #[tokio::test]
    async fn unreachable_host_is_service_unavailable() {
        // Bind then drop a listener so the port is known to be closed.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let config = test_config(format!("http://127.0.0.1:{}", port));
        let client = OpenAiCompatClient::new(&config, test_key()).unwrap();
        let err = client.complete(&request()).await.unwrap_err();
        assert_eq!(err.tag(), "ServiceUnavailable");
    }

    #[tokio::test]
    async fn silent_server_times_out_as_service_unavailable() {
        // Accept connections but never write a response.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let config = LlmConfig {
            base_url: format!("http://{}", addr),
            timeout_seconds: 1,
            ..Default::default()
        };
        let client = OpenAiCompatClient::new(&config, test_key()).unwrap();
        let err = client.complete(&request()).await.unwrap_err();

        assert_eq!(err.tag(), "ServiceUnavailable");
        assert_eq!(
            err,
            ChatError::ServiceUnavailable("request timed out".to_string())
        );
        server.abort();
    }

    #[tokio::test]
    async fn overloaded_status_is_service_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(503)
            .with_body(r#"{"error":{"message":"overloaded"}}"#)
            .create_async()
            .await;

        let client = OpenAiCompatClient::new(&test_config(server.url()), test_key()).unwrap();
        let err = client.complete(&request()).await.unwrap_err();
        match err {
            ChatError::ServiceError(msg) => {
                assert!(msg.contains("503"));
                assert!(msg.contains("overloaded"));
            }
            other => panic!("expected ServiceError, got {:?}", other),
        }
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let client =
            OpenAiCompatClient::new(&test_config("http://host/v1/".to_string()), test_key())
                .unwrap();
        assert_eq!(client.endpoint(), "http://host/v1/chat/completions");
    }
}

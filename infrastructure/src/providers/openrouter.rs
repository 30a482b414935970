//! OpenRouter completion provider
//!
//! Talks to the OpenAI-compatible `/chat/completions` endpoint and maps HTTP
//! failures onto [`ProviderError`] so the application layer can tell
//! transient failures from fatal ones.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use swarm_application::{
    ChatMessage, Completion, CompletionProvider, CompletionRequest, MessageRole, ProviderError,
    Usage,
};
use tracing::debug;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// OpenRouter chat completions over HTTP.
#[derive(Debug, Clone)]
pub struct OpenRouterProvider {
    http: Client,
    api_key: String,
    base_url: String,
}

impl OpenRouterProvider {
    /// Create a provider with the given request timeout.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Connection(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ProviderError> {
        let body = ChatRequest::from_request(request);
        debug!(
            "POST {} model={} messages={}",
            self.endpoint(),
            body.model,
            body.messages.len()
        );

        let start = Instant::now();
        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", "https://codeswarm.dev")
            .header("X-Title", "CodeSwarm")
            .json(&body)
            .send()
            .await
            .map_err(from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after);
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "(no body)".to_string());
            return Err(error_for_status(status, retry_after, message, request));
        }

        let text = response.text().await.map_err(from_transport)?;
        let latency_ms = start.elapsed().as_millis() as u64;
        parse_completion(&text, latency_ms)
    }
}

// ==================== Wire format ====================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

impl<'a> ChatRequest<'a> {
    fn from_request(request: &'a CompletionRequest) -> Self {
        Self {
            model: request.model.openrouter_id(),
            messages: request.messages.iter().map(WireMessage::from_message).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: MessageRole,
    content: WireContent<'a>,
}

impl<'a> WireMessage<'a> {
    /// Messages with an image use the multi-part content form.
    fn from_message(message: &'a ChatMessage) -> Self {
        let content = match &message.image {
            None => WireContent::Text(&message.content),
            Some(image) => WireContent::Parts(vec![
                ContentPart::Text {
                    text: &message.content,
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image.data_url(),
                    },
                },
            ]),
        };
        Self {
            role: message.role,
            content,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WireContent<'a> {
    Text(&'a str),
    Parts(Vec<ContentPart<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<WireUsage>,
    /// OpenRouter reports some upstream failures with a 200 status.
    #[serde(default)]
    error: Option<WireError>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct WireError {
    #[serde(default)]
    code: Option<u16>,
    message: String,
}

// ==================== Error mapping ====================

fn from_transport(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else if e.is_decode() {
        ProviderError::InvalidResponse(e.to_string())
    } else {
        ProviderError::Connection(e.to_string())
    }
}

/// Seconds form only; HTTP-date values are ignored.
fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

fn error_for_status(
    status: StatusCode,
    retry_after: Option<Duration>,
    message: String,
    request: &CompletionRequest,
) -> ProviderError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited { retry_after },
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ProviderError::Timeout,
        StatusCode::NOT_FOUND => ProviderError::ModelNotAvailable(format!(
            "{}: {}",
            request.model.openrouter_id(),
            message
        )),
        s if s.is_server_error() => ProviderError::Server {
            status: s.as_u16(),
        },
        s => ProviderError::Api {
            status: s.as_u16(),
            message,
        },
    }
}

fn parse_completion(body: &str, latency_ms: u64) -> Result<Completion, ProviderError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::InvalidResponse(format!("failed to parse response: {e}")))?;

    if let Some(error) = response.error {
        return Err(match error.code {
            Some(429) => ProviderError::RateLimited { retry_after: None },
            Some(status) if status >= 500 => ProviderError::Server { status },
            status => ProviderError::Api {
                status: status.unwrap_or(200),
                message: error.message,
            },
        });
    }

    let text = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::InvalidResponse("response has no choices".to_string()))?
        .message
        .content
        .unwrap_or_default();

    let usage = response
        .usage
        .map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
        })
        .unwrap_or_default();

    Ok(Completion {
        text,
        usage,
        latency_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarm_application::ImageAttachment;
    use swarm_domain::Model;

    fn request(model: Model) -> CompletionRequest {
        CompletionRequest {
            model,
            messages: vec![
                ChatMessage::system("You are an architect."),
                ChatMessage::user("Design a todo app."),
            ],
            temperature: 0.7,
            max_tokens: 4000,
        }
    }

    #[test]
    fn test_request_body_uses_openrouter_ids() {
        let req = request(Model::ClaudeSonnet45);
        let json = serde_json::to_value(ChatRequest::from_request(&req)).unwrap();
        assert_eq!(json["model"], "anthropic/claude-sonnet-4.5");
        assert_eq!(json["max_tokens"], 4000);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Design a todo app.");
        // f32 precision: 0.7f32 round-trips through JSON as ~0.699999988
        let temp = json["temperature"].as_f64().unwrap();
        assert!((temp - 0.7).abs() < 0.001);
    }

    #[test]
    fn test_image_message_uses_content_parts() {
        let mut req = request(Model::Gpt5);
        req.messages[1] = ChatMessage::user("What is in this mockup?")
            .with_image(Some(ImageAttachment::new("image/png", "aGVsbG8=")));

        let json = serde_json::to_value(ChatRequest::from_request(&req)).unwrap();
        let parts = json["messages"][1]["content"].as_array().unwrap();
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[0]["text"], "What is in this mockup?");
        assert_eq!(parts[1]["type"], "image_url");
        assert_eq!(
            parts[1]["image_url"]["url"],
            "data:image/png;base64,aGVsbG8="
        );
    }

    #[test]
    fn test_parse_completion() {
        let body = r#"{
            "choices": [{"message": {"role": "assistant", "content": "```python\nprint(1)\n```"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 34, "total_tokens": 46}
        }"#;
        let completion = parse_completion(body, 250).unwrap();
        assert_eq!(completion.text, "```python\nprint(1)\n```");
        assert_eq!(completion.usage.total(), 46);
        assert_eq!(completion.latency_ms, 250);
    }

    #[test]
    fn test_null_content_is_empty_text() {
        let body = r#"{"choices": [{"message": {"content": null}}]}"#;
        let completion = parse_completion(body, 0).unwrap();
        assert!(completion.text.is_empty());
        assert_eq!(completion.usage, Usage::default());
    }

    #[test]
    fn test_missing_choices_is_invalid_response() {
        let err = parse_completion(r#"{"choices": []}"#, 0).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
        let err = parse_completion("not json", 0).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[test]
    fn test_embedded_error_is_classified() {
        let body = r#"{"error": {"code": 502, "message": "upstream overloaded"}}"#;
        let err = parse_completion(body, 0).unwrap_err();
        assert_eq!(err, ProviderError::Server { status: 502 });
        assert!(err.is_transient());

        let body = r#"{"error": {"code": 400, "message": "context too long"}}"#;
        let err = parse_completion(body, 0).unwrap_err();
        assert!(matches!(err, ProviderError::Api { status: 400, .. }));
    }

    #[test]
    fn test_status_mapping() {
        let req = request(Model::Grok4);
        let hint = Some(Duration::from_secs(5));

        assert_eq!(
            error_for_status(StatusCode::TOO_MANY_REQUESTS, hint, String::new(), &req),
            ProviderError::RateLimited { retry_after: hint }
        );
        assert_eq!(
            error_for_status(StatusCode::BAD_GATEWAY, None, String::new(), &req),
            ProviderError::Server { status: 502 }
        );
        assert_eq!(
            error_for_status(StatusCode::GATEWAY_TIMEOUT, None, String::new(), &req),
            ProviderError::Timeout
        );
        assert!(matches!(
            error_for_status(StatusCode::NOT_FOUND, None, "no such model".into(), &req),
            ProviderError::ModelNotAvailable(msg) if msg.starts_with("x-ai/grok-4")
        ));
        let err = error_for_status(StatusCode::UNAUTHORIZED, None, "bad key".into(), &req);
        assert!(!err.is_transient());
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn test_parse_retry_after() {
        assert_eq!(parse_retry_after("30"), Some(Duration::from_secs(30)));
        assert_eq!(parse_retry_after(" 2 "), Some(Duration::from_secs(2)));
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let provider = OpenRouterProvider::new(
            "sk-test",
            "https://openrouter.ai/api/v1/",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            provider.endpoint(),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }
}

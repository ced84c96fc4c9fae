//! Native Ollama provider implementation.
//!
//! Uses Ollama's `/api/generate` endpoint directly rather than the
//! OpenAI-compatible `/v1` shim:
//! - System messages become the top-level `system` field
//! - Remaining messages are joined into a single `prompt`
//! - `stream: false`, so one JSON object comes back per request
//! - Sampling options travel in the `options` object

use crate::http::{self, DEFAULT_TIMEOUT};
use async_trait::async_trait;
use querywright_core::error::ProviderError;
use querywright_core::message::{Message, Role};
use querywright_core::provider::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Native Ollama generate-API provider.
pub struct OllamaProvider {
    name: String,
    base_url: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    /// Create a provider pointed at `base_url` (defaults to the local daemon).
    pub fn new(base_url: Option<&str>) -> Self {
        Self {
            name: "ollama".into(),
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            client: http::build_client(DEFAULT_TIMEOUT),
        }
    }

    /// Replace the HTTP timeout applied to every request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = http::build_client(timeout);
        self
    }

    /// Split messages into the `system` field and the flat `prompt`.
    fn split_prompt(messages: &[Message]) -> (Option<String>, String) {
        let mut system_parts: Vec<&str> = Vec::new();
        let mut prompt_parts: Vec<&str> = Vec::new();

        for msg in messages {
            match msg.role {
                Role::System => system_parts.push(&msg.content),
                Role::User | Role::Assistant => prompt_parts.push(&msg.content),
            }
        }

        let system = if system_parts.is_empty() {
            None
        } else {
            Some(system_parts.join("\n\n"))
        };

        (system, prompt_parts.join("\n\n"))
    }

    fn to_api_request(request: &ProviderRequest) -> GenerateRequest {
        let (system, prompt) = Self::split_prompt(&request.messages);
        GenerateRequest {
            model: request.model.clone(),
            prompt,
            system,
            stream: false,
            options: GenerateOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
                stop: request.stop.clone(),
            },
        }
    }
}

#[async_trait]
impl querywright_core::Provider for OllamaProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = Self::to_api_request(&request);

        debug!(provider = %self.name, model = %request.model, "Sending generate request");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(http::send_error)?;

        let response = http::check_status(&self.name, response).await?;
        let api_response: GenerateResponse = http::json_body(response).await?;

        if let Some(error) = api_response.error {
            return Err(ProviderError::ApiError {
                status_code: 200,
                message: error,
            });
        }

        let usage = match (api_response.prompt_eval_count, api_response.eval_count) {
            (Some(p), Some(c)) => Some(Usage {
                prompt_tokens: p,
                completion_tokens: c,
                total_tokens: p + c,
            }),
            _ => None,
        };

        let text = api_response.response.ok_or_else(|| {
            ProviderError::MalformedResponse("missing response text".into())
        })?;

        Ok(ProviderResponse {
            message: Message::assistant(text),
            usage,
            model: api_response.model.unwrap_or(request.model),
        })
    }
}

// --- Ollama API types (internal) ---

#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, routing::post};
    use querywright_core::Provider;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn request(text: &str) -> ProviderRequest {
        ProviderRequest {
            model: "mistral".into(),
            messages: vec![Message::system("schema"), Message::user(text)],
            temperature: 0.1,
            max_tokens: Some(128),
            stop: vec![],
        }
    }

    #[test]
    fn default_base_url() {
        let provider = OllamaProvider::new(None);
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.base_url, "http://localhost:11434");
    }

    #[test]
    fn system_messages_split_out() {
        let (system, prompt) = OllamaProvider::split_prompt(&[
            Message::system("You are a GraphQL generator"),
            Message::user("User Query: list events"),
        ]);
        assert_eq!(system.as_deref(), Some("You are a GraphQL generator"));
        assert_eq!(prompt, "User Query: list events");
    }

    #[test]
    fn api_request_shape() {
        let body = serde_json::to_value(OllamaProvider::to_api_request(&request("hi"))).unwrap();
        assert_eq!(body["stream"], false);
        assert_eq!(body["system"], "schema");
        assert_eq!(body["options"]["num_predict"], 128);
        assert!(body["options"].get("stop").is_none());
    }

    #[tokio::test]
    async fn completes_against_generate_endpoint() {
        let app = Router::new().route(
            "/api/generate",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["model"], "mistral");
                Json(serde_json::json!({
                    "model": "mistral",
                    "response": "query { getEvents { Name } }",
                    "done": true,
                    "prompt_eval_count": 40,
                    "eval_count": 9
                }))
            }),
        );
        let base = serve(app).await;

        let provider = OllamaProvider::new(Some(&base));
        let resp = provider.complete(request("list events")).await.unwrap();
        assert_eq!(resp.message.content, "query { getEvents { Name } }");
        assert_eq!(resp.usage.unwrap().total_tokens, 49);
    }

    #[tokio::test]
    async fn missing_model_maps_to_model_not_found() {
        let app = Router::new().route(
            "/api/generate",
            post(|| async {
                (
                    axum::http::StatusCode::NOT_FOUND,
                    r#"{"error":"model 'mistral' not found"}"#,
                )
            }),
        );
        let base = serve(app).await;

        let err = OllamaProvider::new(Some(&base))
            .complete(request("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::ModelNotFound(ref m) if m.contains("mistral")));
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let app = Router::new().route(
            "/api/generate",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "{}"
            }),
        );
        let base = serve(app).await;

        let err = OllamaProvider::new(Some(&base))
            .with_timeout(Duration::from_millis(200))
            .complete(request("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Timeout(_)));
    }

    #[tokio::test]
    async fn garbage_body_is_malformed_response() {
        let app = Router::new().route("/api/generate", post(|| async { "not json" }));
        let base = serve(app).await;

        let err = OllamaProvider::new(Some(&base))
            .complete(request("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn missing_response_text_is_malformed_response() {
        let app = Router::new().route(
            "/api/generate",
            post(|| async { Json(serde_json::json!({"model": "mistral", "done": true})) }),
        );
        let base = serve(app).await;

        let err = OllamaProvider::new(Some(&base))
            .complete(request("list events"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, ProviderError::MalformedResponse(ref m) if m == "missing response text")
        );
    }
}

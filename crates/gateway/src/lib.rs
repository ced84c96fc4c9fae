//! HTTP API gateway for querywright.
//!
//! Exposes the translation pipeline as a small JSON API:
//!
//! - `POST /api/llm/query`: translate one utterance (with optional history)
//! - `GET /api/llm/health`, `GET /health`: liveness
//!
//! Built on Axum. The [`Translator`] is built once at startup and shared
//! through router state.

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use querywright_config::{AppConfig, GatewayConfig};
use querywright_core::message::{ConversationTurn, Role};
use querywright_translator::{FailureKind, TranslateRequest, TranslateResponse, Translator};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

const SERVICE_NAME: &str = "LLM Query Generator";

/// Shared application state for the gateway.
#[derive(Clone)]
pub struct GatewayState {
    pub translator: Arc<Translator>,
}

/// Build the Axum router with all gateway routes.
///
/// Layers applied:
/// - CORS (configured origins, any origin when none are configured)
/// - Request body size limit (1 MB)
/// - HTTP trace logging
pub fn build_router(translator: Arc<Translator>, gateway: &GatewayConfig) -> Router {
    Router::new()
        .route("/api/llm/query", post(query_handler))
        .route("/api/llm/health", get(health_handler))
        .route("/health", get(health_handler))
        .with_state(GatewayState { translator })
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors_layer(&gateway.cors_origins))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let translator = Arc::new(Translator::from_config(&config)?);
    info!(
        provider = %translator.generator().provider_name(),
        model = %translator.generator().model(),
        history_window = translator.history_window(),
        "Translator ready"
    );

    let app = build_router(translator, &config.gateway);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Wire types ---

/// Body of `POST /api/llm/query`.
#[derive(Debug, Default, Deserialize)]
pub struct QueryRequest {
    #[serde(default, alias = "utterance")]
    pub query: Option<String>,

    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// One prior chat turn as a browser client sends it.
///
/// Chat frontends often label the speaker `type` rather than `role`, and
/// may send non-string content (e.g. a previous result object).
#[derive(Debug, Deserialize)]
pub struct HistoryEntry {
    #[serde(default, alias = "type")]
    pub role: String,

    #[serde(default)]
    pub content: serde_json::Value,
}

impl From<HistoryEntry> for ConversationTurn {
    fn from(entry: HistoryEntry) -> Self {
        let content = match entry.content {
            serde_json::Value::String(s) => s,
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        };
        ConversationTurn::new(Role::from_label(&entry.role), content)
    }
}

impl From<QueryRequest> for TranslateRequest {
    fn from(body: QueryRequest) -> Self {
        TranslateRequest::new(body.query.unwrap_or_default())
            .with_history(body.history.into_iter().map(Into::into).collect())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

// --- Handlers ---

async fn query_handler(
    State(state): State<GatewayState>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected malformed request body");
            let error = ErrorBody {
                success: false,
                error: format!("Invalid request body: {}", rejection.body_text()),
            };
            return (StatusCode::BAD_REQUEST, Json(error)).into_response();
        }
    };

    let response = state.translator.translate(body.into()).await;
    (status_for(&response), Json(response)).into_response()
}

fn status_for(response: &TranslateResponse) -> StatusCode {
    match response.failure_kind() {
        None => StatusCode::OK,
        Some(FailureKind::Validation) => StatusCode::BAD_REQUEST,
        Some(FailureKind::Generation) => StatusCode::BAD_GATEWAY,
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use querywright_core::error::ProviderError;
    use querywright_core::message::Message;
    use querywright_core::provider::{Provider, ProviderRequest, ProviderResponse};
    use querywright_translator::GenerationClient;
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Answers every call with the same outcome and remembers the last prompt.
    struct FixedProvider {
        outcome: Result<String, ProviderError>,
        last_prompt: Mutex<Option<String>>,
    }

    impl FixedProvider {
        fn new(outcome: Result<String, ProviderError>) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                last_prompt: Mutex::new(None),
            })
        }
    }

    #[async_trait::async_trait]
    impl Provider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn complete(
            &self,
            request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            let prompt = request.messages.last().map(|m| m.content.clone());
            *self.last_prompt.lock().unwrap() = prompt;
            self.outcome.clone().map(|text| ProviderResponse {
                message: Message::assistant(text),
                usage: None,
                model: "fixed-model".into(),
            })
        }
    }

    fn app(provider: Arc<FixedProvider>) -> Router {
        let translator = Translator::new(GenerationClient::new(provider, "mistral"));
        build_router(Arc::new(translator), &GatewayConfig::default())
    }

    async fn post_json(app: Router, body: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method("POST")
            .uri("/api/llm/query")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_endpoints() {
        for uri in ["/health", "/api/llm/health"] {
            let app = app(FixedProvider::new(Ok(String::new())));
            let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let response = app.oneshot(req).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);

            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(json["status"], "healthy");
            assert_eq!(json["service"], "LLM Query Generator");
        }
    }

    #[tokio::test]
    async fn query_success() {
        let provider = FixedProvider::new(Ok("```graphql\nquery { getEvents { Name } ```".into()));
        let (status, json) = post_json(app(provider), r#"{"query": "list events"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["graphql_query"], "query { getEvents { Name } }");
        assert_eq!(json["original_query"], "list events");
    }

    #[tokio::test]
    async fn missing_query_is_bad_request() {
        for body in [r#"{}"#, r#"{"query": "   "}"#] {
            let provider = FixedProvider::new(Ok("unused".into()));
            let (status, json) = post_json(app(provider.clone()), body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json, serde_json::json!({"success": false, "error": "No query provided"}));
            assert!(provider.last_prompt.lock().unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let provider = FixedProvider::new(Ok("unused".into()));
        let (status, json) = post_json(app(provider), "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().starts_with("Invalid request body"));
    }

    #[tokio::test]
    async fn generation_failure_is_bad_gateway() {
        let provider = FixedProvider::new(Err(ProviderError::Network("connection refused".into())));
        let (status, json) = post_json(app(provider), r#"{"query": "list admins"}"#).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["success"], false);
        assert!(
            json["error"]
                .as_str()
                .unwrap()
                .starts_with("Error generating GraphQL query:")
        );
    }

    #[tokio::test]
    async fn history_with_type_labels_is_folded() {
        let provider = FixedProvider::new(Ok("NEED_INFO: Please provide Time".into()));
        let body = r#"{
            "utterance": "June 5th 2025",
            "history": [
                {"type": "user", "content": "Create an event called Gala"},
                {"type": "llm", "content": {"graphql_query": "NEED_INFO: Please provide Date"}}
            ]
        }"#;
        let (status, json) = post_json(app(provider.clone()), body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["graphql_query"], "NEED_INFO: Please provide Time");
        assert_eq!(json["result"]["kind"], "needs_info");

        let prompt = provider.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.starts_with("User Query: Create an event called Gala June 5th 2025"));
    }

    #[test]
    fn history_entry_content_stringified() {
        let entry: HistoryEntry =
            serde_json::from_str(r#"{"role": "assistant", "content": {"a": 1}}"#).unwrap();
        let turn = ConversationTurn::from(entry);
        assert_eq!(turn.role, Role::Assistant);
        assert_eq!(turn.content, r#"{"a":1}"#);
    }

    #[tokio::test]
    async fn cors_preflight_allowed() {
        let app = app(FixedProvider::new(Ok(String::new())));
        let req = Request::builder()
            .method("OPTIONS")
            .uri("/api/llm/query")
            .header("origin", "http://localhost:3000")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            HeaderValue::from_static("*")
        );
    }
}

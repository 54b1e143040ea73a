//! HTTP surface: `POST /ai/ask` and `GET /client/api/health`.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use gateway::{ToolCatalog, ToolInvoker};
use runtime::{FAILURE_MESSAGE, LlmBackend, QueryFailure, QueryOrchestrator};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

impl HealthStatus {
    fn from_probe(healthy: bool) -> Self {
        let (status, message) = if healthy {
            ("OK", "MCP Gateway is responding")
        } else {
            ("Error", "MCP Gateway is not responding")
        };
        Self {
            status: status.to_string(),
            message: message.to_string(),
        }
    }
}

type Shared<G, B> = Arc<QueryOrchestrator<G, B>>;

/// Build the application router around `orchestrator`.
pub fn router<G, B>(orchestrator: QueryOrchestrator<G, B>) -> Router
where
    G: ToolCatalog + ToolInvoker + 'static,
    B: LlmBackend + 'static,
{
    Router::new()
        .route("/ai/ask", post(ask::<G, B>))
        .route("/client/api/health", get(health::<G, B>))
        .with_state(Arc::new(orchestrator))
}

/// Serve `router` on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, router: Router) -> std::io::Result<()> {
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await
}

async fn ask<G, B>(
    State(orchestrator): State<Shared<G, B>>,
    body: Result<Json<AskRequest>, JsonRejection>,
) -> Response
where
    G: ToolCatalog + ToolInvoker,
    B: LlmBackend,
{
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let failure = QueryFailure {
                error: FAILURE_MESSAGE.to_string(),
                message: rejection.body_text(),
            };
            return (StatusCode::BAD_REQUEST, Json(failure)).into_response();
        }
    };

    match orchestrator.handle(&request.query).await {
        Ok(envelope) => Json(envelope).into_response(),
        Err(e) => {
            error!(error = %e, query = %request.query, "query failed");
            (StatusCode::BAD_REQUEST, Json(QueryFailure::from(&e))).into_response()
        }
    }
}

async fn health<G, B>(State(orchestrator): State<Shared<G, B>>) -> Json<HealthStatus>
where
    G: ToolCatalog + ToolInvoker,
    B: LlmBackend,
{
    Json(HealthStatus::from_probe(
        orchestrator.gateway().is_healthy().await,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateway::{Tool, ToolParameter};
    use runtime::Interpreter;
    use runtime::llm::{ChatRequest, ChatResponse, LlmError};
    use serde_json::{Map, Value, json};

    struct FakeGateway {
        up: bool,
    }

    impl ToolCatalog for FakeGateway {
        async fn list_tools(&self) -> gateway::Result<Vec<Tool>> {
            if !self.up {
                return Err(gateway::Error::Unavailable("connection refused".into()));
            }
            Ok(vec![
                Tool::new("calculator", "Basic arithmetic")
                    .with_parameter(ToolParameter::new("a", "number", "a").required()),
            ])
        }

        async fn get_tool(&self, name: &str) -> gateway::Result<Tool> {
            Err(gateway::Error::ToolNotFound(name.to_string()))
        }

        async fn is_healthy(&self) -> bool {
            self.up
        }
    }

    impl ToolInvoker for FakeGateway {
        async fn invoke(&self, _: &str, _: &Map<String, Value>) -> gateway::Result<Value> {
            Ok(json!({"result": 5}))
        }
    }

    struct NoModel;

    impl LlmBackend for NoModel {
        async fn chat(&self, _: ChatRequest<'_>) -> Result<ChatResponse, LlmError> {
            Err(LlmError::Config("unused".into()))
        }
    }

    async fn spawn(up: bool) -> String {
        let orchestrator =
            QueryOrchestrator::new(FakeGateway { up }, Interpreter::<NoModel>::simulated());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router(orchestrator)).await.unwrap() });
        format!("http://{addr}")
    }

    async fn ask(base: &str, body: Value) -> (reqwest::StatusCode, Value) {
        let response = reqwest::Client::new()
            .post(format!("{base}/ai/ask"))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }

    #[tokio::test]
    async fn ask_returns_envelope() {
        let base = spawn(true).await;
        let (status, body) = ask(&base, json!({"query": "add 2 and 3"})).await;

        assert_eq!(status, reqwest::StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "query": "add 2 and 3",
                "tool": "calculator",
                "parameters": {},
                "result": {"result": 5},
                "explanation": "Simulated interpretation of query: add 2 and 3"
            })
        );
    }

    #[tokio::test]
    async fn ask_failure_is_uniform_bad_request() {
        let base = spawn(false).await;
        let (status, body) = ask(&base, json!({"query": "add 2 and 3"})).await;

        assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Could not process your query");
        assert!(body["message"].as_str().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn missing_query_is_bad_request() {
        let base = spawn(true).await;
        let (status, body) = ask(&base, json!({})).await;

        assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Could not process your query");
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let base = spawn(true).await;
        let response = reqwest::Client::new()
            .post(format!("{base}/ai/ask"))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Could not process your query");
    }

    #[tokio::test]
    async fn health_reflects_gateway() {
        for (up, expected) in [
            (true, HealthStatus::from_probe(true)),
            (false, HealthStatus::from_probe(false)),
        ] {
            let base = spawn(up).await;
            let status: HealthStatus = reqwest::get(format!("{base}/client/api/health"))
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn health_messages() {
        assert_eq!(HealthStatus::from_probe(true).status, "OK");
        assert_eq!(
            HealthStatus::from_probe(false).message,
            "MCP Gateway is not responding"
        );
    }
}

//! REST API server for the real-estate query agent
//!
//! Thin HTTP front end over `RealEstateAgent::handle_query`; every front end
//! (HTTP, CLI, tests) drives the pipeline through that same entry point.

use axum::{extract::State, http::StatusCode, routing::{get, post}, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::router::RealEstateAgent;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub response: Option<String>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success(response: String) -> Self {
        Self {
            success: true,
            response: Some(response),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Clone)]
pub struct ApiState {
    pub agent: Arc<RealEstateAgent>,
}

async fn health(State(state): State<ApiState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "gateway_ready": state.agent.gateway_ready(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn chat(
    State(state): State<ApiState>,
    Json(req): Json<ChatRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    if req.query.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Missing 'query' in request data".into())),
        );
    }

    info!("Received chat request: {}", req.query);
    // handle_query is total; there is no error path to surface here.
    let reply = state.agent.handle_query(&req.query).await;

    (StatusCode::OK, Json(ApiResponse::success(reply)))
}

pub fn create_router(agent: Arc<RealEstateAgent>) -> Router {
    let state = ApiState { agent };

    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

pub async fn start_server(
    agent: Arc<RealEstateAgent>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(agent);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MockPlacesLookup, MockPropertyStore};
    use crate::testutil::StaticGateway;

    fn test_state() -> ApiState {
        let agent = RealEstateAgent::new(
            Arc::new(StaticGateway::new("GREETING")),
            Arc::new(MockPropertyStore::new()),
            Arc::new(MockPlacesLookup::new()),
        );
        ApiState {
            agent: Arc::new(agent),
        }
    }

    #[tokio::test]
    async fn test_chat_rejects_empty_query() {
        let (status, Json(body)) = chat(
            State(test_state()),
            Json(ChatRequest {
                query: "   ".to_string(),
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.success);
        assert!(body.error.is_some());
    }

    #[tokio::test]
    async fn test_chat_returns_reply() {
        let (status, Json(body)) = chat(
            State(test_state()),
            Json(ChatRequest {
                query: "Hello there!".to_string(),
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.success);
        assert_eq!(
            body.response.as_deref(),
            Some(crate::prompts::GREETING_REPLY)
        );
    }
}

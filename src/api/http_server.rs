use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::ApiError;
use crate::pipeline::NlpPipeline;

#[derive(Clone)]
struct AppState {
    pipeline: Arc<NlpPipeline>,
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub topic: String,
}

#[derive(Debug, Serialize)]
pub struct EntitiesResponse {
    pub entities: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SentimentResponse {
    pub sentiment: String,
}

/// Build the service router over a constructed pipeline
pub fn build_router(pipeline: Arc<NlpPipeline>) -> Router {
    let state = AppState { pipeline };

    Router::new()
        .route("/health", get(health_handler))
        .route("/summarize", post(summarize_handler))
        .route("/classify", post(classify_handler))
        .route("/entities", post(entities_handler))
        .route("/sentiment", post(sentiment_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the API until `shutdown` resolves, then return for the final
/// store snapshot in `main`
pub async fn start_server(
    addr: SocketAddr,
    pipeline: Arc<NlpPipeline>,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(pipeline);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let records = state.pipeline.store().len().await;
    Json(json!({
        "status": "ok",
        "records": records,
    }))
}

async fn summarize_handler(
    State(state): State<AppState>,
    Json(request): Json<TextRequest>,
) -> Result<Json<SummarizeResponse>, ApiErrorResponse> {
    let summary = state
        .pipeline
        .summarize(&request.text)
        .await
        .map_err(|e| ApiErrorResponse(e.into()))?;

    Ok(Json(SummarizeResponse { summary }))
}

async fn classify_handler(
    State(state): State<AppState>,
    Json(request): Json<TextRequest>,
) -> Result<Json<ClassifyResponse>, ApiErrorResponse> {
    let topic = state
        .pipeline
        .classify(&request.text)
        .await
        .map_err(|e| ApiErrorResponse(e.into()))?;

    Ok(Json(ClassifyResponse { topic }))
}

async fn entities_handler(
    State(state): State<AppState>,
    Json(request): Json<TextRequest>,
) -> Result<Json<EntitiesResponse>, ApiErrorResponse> {
    let entities = state
        .pipeline
        .extract_entities(&request.text)
        .await
        .map_err(|e| ApiErrorResponse(e.into()))?;

    Ok(Json(EntitiesResponse { entities }))
}

async fn sentiment_handler(
    State(state): State<AppState>,
    Json(request): Json<TextRequest>,
) -> Result<Json<SentimentResponse>, ApiErrorResponse> {
    let sentiment = state
        .pipeline
        .analyze_sentiment(&request.text)
        .await
        .map_err(|e| ApiErrorResponse(e.into()))?;

    Ok(Json(SentimentResponse { sentiment }))
}

// Error response wrapper
pub struct ApiErrorResponse(pub ApiError);

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(self.0.to_response())).into_response()
    }
}

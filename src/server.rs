//! HTTP API
//!
//! Exposes the analysis pipeline and advisory generation over a small JSON
//! API. The analyzer is behind a mutex because its memoization caches need
//! exclusive access.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::advisor::Advisor;
use crate::analysis::Analyzer;
use crate::error::AdvisorError;
use crate::types::{AdvisoryResponse, ComprehensiveAnalysis, Timeframe};

/// State shared across handlers
pub struct AppState {
    pub analyzer: Mutex<Analyzer>,
    pub advisor: Advisor,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn error_response(e: AdvisorError) -> ApiError {
    let status = match &e {
        AdvisorError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        AdvisorError::NoData(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorBody {
            error: e.to_string(),
        }),
    )
}

/// Health check
async fn health_check() -> &'static str {
    "OK"
}

#[derive(Debug, Deserialize)]
struct AnalysisParams {
    timeframe: Option<String>,
}

/// Comprehensive analysis for a crop
async fn get_analysis(
    State(state): State<Arc<AppState>>,
    Path(crop): Path<String>,
    Query(params): Query<AnalysisParams>,
) -> Result<Json<ComprehensiveAnalysis>, ApiError> {
    let timeframe = params
        .timeframe
        .as_deref()
        .map(Timeframe::parse)
        .unwrap_or_default();

    let mut analyzer = state.analyzer.lock().await;
    let analysis = analyzer
        .comprehensive(&crop, timeframe)
        .map_err(error_response)?;
    Ok(Json(analysis))
}

#[derive(Debug, Deserialize)]
struct AdviseRequest {
    crop: String,
    timeframe: Option<String>,
    query: String,
    #[serde(default)]
    force_refresh: bool,
}

/// Generate (or replay from cache) an advisory for a crop and question
async fn post_advise(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AdviseRequest>,
) -> Result<Json<AdvisoryResponse>, ApiError> {
    let timeframe = request
        .timeframe
        .as_deref()
        .map(Timeframe::parse)
        .unwrap_or_default();

    let analysis = {
        let mut analyzer = state.analyzer.lock().await;
        analyzer
            .comprehensive(&request.crop, timeframe)
            .map_err(error_response)?
    };

    let response = state
        .advisor
        .get_advisory(&analysis, &request.query, request.force_refresh)
        .await;
    Ok(Json(response))
}

/// Regenerate the datasets backing a crop
async fn post_refresh(
    State(state): State<Arc<AppState>>,
    Path(crop): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut analyzer = state.analyzer.lock().await;
    analyzer.refresh_data(&crop).map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/analysis/{crop}", get(get_analysis))
        .route("/advise", post(post_advise))
        .route("/refresh/{crop}", post(post_refresh))
        .with_state(state)
}

/// Bind and serve until shutdown
pub async fn start_server(state: Arc<AppState>, port: u16) -> crate::error::Result<()> {
    let app = create_router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("API server starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

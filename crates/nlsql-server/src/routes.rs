//! HTTP surface: request/response schemas, handlers, status mapping

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use nlsql_core::{PipelineError, QueryPipeline};

pub struct AppState {
    pub pipeline: QueryPipeline,
}

#[derive(Debug, Deserialize)]
pub struct NlQueryRequest {
    pub db_path: PathBuf,
    pub question: String,
    #[serde(default = "default_dialect")]
    pub dialect: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_dialect() -> String {
    "sqlite".to_string()
}

fn default_max_tokens() -> u32 {
    512
}

#[derive(Debug, Serialize)]
pub struct NlQueryResponse {
    pub sql: String,
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
    pub row_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/nl-query", post(nl_query))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn nl_query(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NlQueryRequest>,
) -> Result<Json<NlQueryResponse>, ApiError> {
    tracing::info!(db = %req.db_path.display(), question = %req.question, "nl-query request");

    let outcome = state
        .pipeline
        .run(&req.db_path, &req.question, &req.dialect, req.max_tokens)
        .await?;

    Ok(Json(NlQueryResponse {
        columns: outcome.result.columns.clone(),
        rows: outcome.result.rows_as_objects(),
        row_count: outcome.result.row_count,
        sql: outcome.sql,
        summary: outcome.summary,
    }))
}

/// Wrapper mapping pipeline failures to HTTP responses.
pub struct ApiError(PipelineError);

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        ApiError(err)
    }
}

/// Caller mistakes (bad path, bad SQL, forbidden statement) are 400s, a
/// failing model endpoint is a 502, everything else is on us.
fn status_for(err: &PipelineError) -> StatusCode {
    match err {
        PipelineError::NotFound(_)
        | PipelineError::Query { .. }
        | PipelineError::ForbiddenStatement(_) => StatusCode::BAD_REQUEST,
        PipelineError::Upstream(_) => StatusCode::BAD_GATEWAY,
        PipelineError::Configuration(_)
        | PipelineError::Connection(_)
        | PipelineError::Extraction(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        tracing::error!(%status, error = %self.0, "request failed");
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

//! Response envelopes and error mapping.
//!
//! | error kind      | status |
//! |-----------------|--------|
//! | `BadRequest`    | 400    |
//! | `NotFound`      | 404    |
//! | `Upstream`      | 502    |
//! | `Configuration` | 500    |
//!
//! Error bodies are `{"error": "<message>"}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::{BuildInfo, HolonetError};
use crate::types::Record;

/// Paginated list of upstream resources.
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse {
    pub resource: String,
    /// Upstream total, or the number of results when upstream omits it.
    pub count: u64,
    pub page: usize,
    /// Number of records in `results`.
    pub page_size: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<Record>,
    pub meta: Meta,
}

/// What the request asked for.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Meta {
    pub sort: Option<String>,
    pub order: Option<String>,
    pub filters_applied: Map<String, Value>,
    pub included: Vec<String>,
}

/// Characters appearing in one film.
#[derive(Debug, Clone, Serialize)]
pub struct FilmCharactersResponse {
    pub film_id: u64,
    pub film_title: Option<String>,
    /// Total characters before pagination.
    pub count: usize,
    pub page: usize,
    /// Number of records in `results`.
    pub page_size: usize,
    pub results: Vec<Record>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: String,
    pub build: BuildInfo,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// HTTP status for an error kind.
pub fn status_for(err: &HolonetError) -> StatusCode {
    match err {
        HolonetError::BadRequest(_) => StatusCode::BAD_REQUEST,
        HolonetError::NotFound(_) => StatusCode::NOT_FOUND,
        HolonetError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        HolonetError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn client_message(err: &HolonetError) -> String {
    match err {
        HolonetError::BadRequest(msg) => msg.clone(),
        HolonetError::NotFound(what) => format!("Upstream resource not found: {what}"),
        HolonetError::Upstream { message, .. } => message.clone(),
        HolonetError::Configuration(_) => "internal configuration error".to_string(),
    }
}

impl IntoResponse for HolonetError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status.is_server_error() {
            warn!(status = status.as_u16(), error = %self, "request failed");
        }
        let body = ErrorBody {
            error: client_message(&self),
        };
        (status, Json(body)).into_response()
    }
}

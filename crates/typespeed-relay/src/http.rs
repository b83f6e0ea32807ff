//! The single metric handler.
//!
//! Every method lands here. `OPTIONS` is answered as a bare preflight without
//! touching the store; everything else reads the cached value.

use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use typespeed_core::METRIC_KEY;

use crate::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct MetricBody {
    pub wpm: String,
}

pub async fn metric(State(state): State<AppState>, method: Method) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    match state.store().get(METRIC_KEY).await {
        Ok(wpm) => Json(MetricBody { wpm }).into_response(),
        Err(e) => {
            tracing::warn!(kind = e.kind().as_str(), error = %e, "metric read failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

//! Versioned API mounted under `API_V1_STR`.

pub mod openapi;

use crate::state::AppState;
use axum::Router;
use axum::routing::get;

/// Routes served under the versioned prefix
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi::openapi_json))
}

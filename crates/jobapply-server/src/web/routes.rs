use crate::error::AppError;
use crate::state::AppState;
use crate::web::templates::LANDING_TEMPLATE;
use crate::{API_MESSAGE, SERVICE_NAME, SERVICE_VERSION};
use axum::Json;
use axum::extract::State;
use axum::response::Html;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiInfo {
    pub message: String,
    pub version: String,
    pub status: String,
    pub docs: String,
    pub openapi: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Landing page rendered from `landing.html`
pub async fn landing_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let mut context = tera::Context::new();
    context.insert("project_name", &state.config.project_name);
    context.insert("environment", &state.config.environment);
    context.insert("version", SERVICE_VERSION);

    Ok(Html(state.templates.render(LANDING_TEMPLATE, &context)?))
}

pub async fn api_root(State(state): State<AppState>) -> Json<ApiInfo> {
    Json(ApiInfo {
        message: API_MESSAGE.to_string(),
        version: SERVICE_VERSION.to_string(),
        status: "running".to_string(),
        docs: "/docs".to_string(),
        openapi: state.config.openapi_url(),
    })
}

/// Liveness probe
///
/// Only says the process is serving requests. It deliberately does not look at
/// the database or any other dependency.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: SERVICE_VERSION.to_string(),
    })
}

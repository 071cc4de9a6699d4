//! Interactive API documentation pages.

use crate::error::AppError;
use crate::state::AppState;
use crate::web::templates::{REDOC_TEMPLATE, SWAGGER_TEMPLATE};
use axum::extract::State;
use axum::response::Html;

fn render(state: &AppState, template: &str) -> Result<Html<String>, AppError> {
    let mut context = tera::Context::new();
    context.insert("title", &state.config.project_name);
    context.insert("openapi_url", &state.config.openapi_url());

    Ok(Html(state.templates.render(template, &context)?))
}

pub async fn swagger_ui(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render(&state, SWAGGER_TEMPLATE)
}

pub async fn redoc(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render(&state, REDOC_TEMPLATE)
}

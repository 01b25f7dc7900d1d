use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use super::render::RenderPlan;
use super::schema::Form;
use super::service::FormService;
use super::submission::Submission;
use super::values::FormValues;
use crate::error::AppError;

pub const SCHEMA_ROUTE: &str = "/api/v1/forms/job-application";
pub const RENDER_ROUTE: &str = "/api/v1/forms/job-application/render";
pub const VALIDATE_ROUTE: &str = "/api/v1/forms/job-application/validate";

/// Router exposing the form definition, its render plan, and submission validation.
pub fn form_router(service: Arc<FormService>) -> Router {
    Router::new()
        .route(SCHEMA_ROUTE, get(schema_handler))
        .route(RENDER_ROUTE, post(render_handler))
        .route(VALIDATE_ROUTE, post(validate_handler))
        .with_state(service)
}

/// Body returned when every shown field passed validation.
#[derive(Debug, Clone, Serialize)]
pub struct AcceptedSubmission {
    pub valid: bool,
    pub submission: Submission,
}

pub(crate) async fn schema_handler(State(service): State<Arc<FormService>>) -> Json<Form> {
    Json(service.schema().clone())
}

/// Malformed bodies surface as [`AppError::Values`] (400); 422 is left to failed validation.
fn parse_values(body: &Bytes) -> Result<FormValues, AppError> {
    Ok(serde_json::from_slice(body)?)
}

pub(crate) async fn render_handler(
    State(service): State<Arc<FormService>>,
    body: Bytes,
) -> Result<Json<RenderPlan>, AppError> {
    let values = parse_values(&body)?;
    Ok(Json(service.render(&values)))
}

pub(crate) async fn validate_handler(
    State(service): State<Arc<FormService>>,
    body: Bytes,
) -> Result<Json<AcceptedSubmission>, AppError> {
    let values = parse_values(&body)?;
    let submission = service.submit(&values)?;
    Ok(Json(AcceptedSubmission {
        valid: true,
        submission,
    }))
}

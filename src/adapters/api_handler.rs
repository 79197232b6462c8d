//! JSON API handlers
//!
//! Every endpoint answers with the [`ApiResponse`] envelope, except the render
//! endpoint which returns an HTML fragment on success.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::adapters::form_service::FormService;
use crate::adapters::form_store::FormSummary;
use crate::analytics::AnalyticsReport;
use crate::domain::{FormError, FormResponse, FormSchema};
use crate::render::RenderMode;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<FormService>,
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Serialize)]
pub struct CreatedForm {
    pub form_id: String,
    pub form: FormSchema,
}

#[derive(Deserialize)]
pub struct CreateFormRequest {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Deserialize)]
pub struct RenderQuery {
    #[serde(default)]
    pub mode: RenderMode,
}

fn error_response<T: Serialize>(err: &FormError) -> (StatusCode, Json<ApiResponse<T>>) {
    (err.status_code(), Json(ApiResponse::error(err.to_string())))
}

// ============================================================================
// Forms
// ============================================================================

/// GET /api/forms - List forms in creation order
pub async fn list_forms(State(state): State<ApiState>) -> impl IntoResponse {
    let forms: Vec<FormSummary> = state.service.list_forms().await;
    Json(ApiResponse::success(forms))
}

/// POST /api/forms - Generate and store a form from a prompt
pub async fn create_form(
    State(state): State<ApiState>,
    Json(request): Json<CreateFormRequest>,
) -> impl IntoResponse {
    match state.service.create_form(&request.prompt).await {
        Ok((form_id, form)) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(CreatedForm {
                form_id,
                form: form.as_ref().clone().into(),
            })),
        ),
        Err(e) => error_response(&e),
    }
}

/// GET /api/forms/:id - Form definition in wire shape
pub async fn get_form(
    State(state): State<ApiState>,
    Path(form_id): Path<String>,
) -> impl IntoResponse {
    match state.service.get_form(&form_id).await {
        Ok(form) => (
            StatusCode::OK,
            Json(ApiResponse::success(FormSchema::from(form.as_ref().clone()))),
        ),
        Err(e) => error_response(&e),
    }
}

/// GET /api/forms/:id/render - HTML fragment of the form
pub async fn render_form(
    State(state): State<ApiState>,
    Path(form_id): Path<String>,
    Query(query): Query<RenderQuery>,
) -> Response {
    match state.service.render_form(&form_id, query.mode).await {
        Ok(element) => Html(element.to_html()).into_response(),
        Err(e) => error_response::<()>(&e).into_response(),
    }
}

// ============================================================================
// Responses
// ============================================================================

/// POST /api/forms/:id/responses - Record a submission
pub async fn submit_response(
    State(state): State<ApiState>,
    Path(form_id): Path<String>,
    Json(data): Json<BTreeMap<String, String>>,
) -> impl IntoResponse {
    match state.service.submit_response(&form_id, data).await {
        Ok(response) => (StatusCode::CREATED, Json(ApiResponse::success(response))),
        Err(e) => error_response::<FormResponse>(&e),
    }
}

/// GET /api/forms/:id/responses - All submissions, oldest first
pub async fn list_responses(
    State(state): State<ApiState>,
    Path(form_id): Path<String>,
) -> impl IntoResponse {
    match state.service.responses(&form_id).await {
        Ok(responses) => (StatusCode::OK, Json(ApiResponse::success(responses))),
        Err(e) => error_response(&e),
    }
}

/// GET /api/forms/:id/analytics - Per-field summary of the submissions
pub async fn get_analytics(
    State(state): State<ApiState>,
    Path(form_id): Path<String>,
) -> impl IntoResponse {
    match state.service.get_analytics(&form_id).await {
        Ok(report) => (StatusCode::OK, Json(ApiResponse::success(report))),
        Err(e) => error_response::<AnalyticsReport>(&e),
    }
}

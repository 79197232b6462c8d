//! Server-rendered HTML pages

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::adapters::form_service::FormService;
use crate::domain::FormError;
use crate::render::pages::{FORM_NOT_FOUND, GENERATION_FAILED};
use crate::render::{PageRenderer, RenderMode};

#[derive(Clone)]
pub struct WebState {
    pub service: Arc<FormService>,
    pub pages: Arc<PageRenderer>,
}

#[derive(Deserialize)]
pub struct GenerateFormInput {
    #[serde(default)]
    pub prompt: String,
}

fn page(status: StatusCode, rendered: tera::Result<String>) -> Response {
    match rendered {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render page: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

fn error_page(state: &WebState, err: &FormError) -> Response {
    let heading = match err {
        FormError::NotFound(_) => FORM_NOT_FOUND,
        FormError::EmptyPrompt | FormError::Generation(_) => GENERATION_FAILED,
    };
    page(err.status_code(), state.pages.message(heading))
}

/// GET /
pub async fn home(State(state): State<WebState>) -> Response {
    let forms = state.service.list_forms().await;
    page(StatusCode::OK, state.pages.home(&forms))
}

/// GET /create-form
pub async fn create_form_page(State(state): State<WebState>) -> Response {
    page(StatusCode::OK, state.pages.create_form())
}

/// POST /generate-form
pub async fn generate_form(
    State(state): State<WebState>,
    Form(input): Form<GenerateFormInput>,
) -> Response {
    let form_id = match state.service.create_form(&input.prompt).await {
        Ok((form_id, _)) => form_id,
        Err(e) => return error_page(&state, &e),
    };

    match state.service.render_form(&form_id, RenderMode::Preview).await {
        Ok(preview) => page(StatusCode::OK, state.pages.generated(&form_id, &preview)),
        Err(e) => error_page(&state, &e),
    }
}

/// GET /share/:id
pub async fn share_form(State(state): State<WebState>, Path(form_id): Path<String>) -> Response {
    match state.service.render_form(&form_id, RenderMode::Editable).await {
        Ok(form) => page(StatusCode::OK, state.pages.share(&form)),
        Err(e) => error_page(&state, &e),
    }
}

/// POST /submit/:id
pub async fn submit_form(
    State(state): State<WebState>,
    Path(form_id): Path<String>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Response {
    match state.service.submit_response(&form_id, fields).await {
        Ok(response) => page(StatusCode::OK, state.pages.submitted(&response)),
        Err(e) => error_page(&state, &e),
    }
}

/// GET /analytics/:id
pub async fn show_analytics(State(state): State<WebState>, Path(form_id): Path<String>) -> Response {
    match state.service.get_analytics(&form_id).await {
        Ok(report) => page(StatusCode::OK, state.pages.analytics(&report)),
        Err(e) => error_page(&state, &e),
    }
}

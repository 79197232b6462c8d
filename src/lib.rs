//! # Formsmith - prompt-to-form web app
//!
//! Formsmith asks a language model for a form definition, renders it as a
//! shareable HTML form, stores submissions in memory and summarizes them per
//! field.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use formsmith::config::Settings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::new()?;
//!     let generator = formsmith::adapters::generator::create_generator(&settings.generator)?;
//!     let app = formsmith::build_app(&settings, generator)?;
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Layout
//!
//! - **Domain**: form model, validation, responses and the generator port
//! - **Render**: markup tree, form renderer and page templates
//! - **Analytics**: per-field aggregation of responses
//! - **Adapters**: store, service, generator backends and HTTP handlers
//! - **Config**: layered configuration and validation

pub mod adapters;
pub mod analytics;
pub mod cli;
pub mod config;
pub mod domain;
pub mod render;

use crate::adapters::api_handler::{self, ApiState};
use crate::adapters::form_service::FormService;
use crate::adapters::form_store::FormStore;
use crate::adapters::health_handler::HealthHandler;
use crate::adapters::metrics_handler::{MetricsCollector, MetricsHandler};
use crate::adapters::rate_limit::{self, SharedRateLimiter};
use crate::adapters::web_handler::{self, WebState};
use crate::domain::SchemaGenerator;
use crate::render::PageRenderer;
use axum::{
    handler::Handler,
    routing::{get, post, MethodRouter},
    Router,
};
use std::sync::Arc;

/// Wrap a generation handler in the rate limiter when one is configured.
///
/// Only the POST is limited; methods chained afterwards are not.
fn limited<H, T, S>(handler: H, limiter: &Option<SharedRateLimiter>) -> MethodRouter<S>
where
    H: Handler<T, S>,
    T: 'static,
    S: Clone + Send + Sync + 'static,
{
    let route = post(handler);
    match limiter {
        Some(limiter) => route.layer(axum::middleware::from_fn_with_state(
            limiter.clone(),
            rate_limit::rate_limit_middleware,
        )),
        None => route,
    }
}

/// Creates the Axum application router with all endpoints configured.
///
/// # Arguments
///
/// * `service` - Form operations shared by the HTML pages and the JSON API
/// * `pages` - Page template renderer
/// * `health_handler` - Health check handler
/// * `metrics_handler` - Metrics collection handler
/// * `limiter` - Rate limiter for the two generation routes
pub fn create_app(
    service: Arc<FormService>,
    pages: Arc<PageRenderer>,
    health_handler: Arc<HealthHandler>,
    metrics_handler: Arc<MetricsHandler>,
    limiter: Option<SharedRateLimiter>,
) -> Router {
    let operational_router = Router::new()
        .route("/health", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.health().await }
            }
        }))
        .route("/health/ready", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.ready().await }
            }
        }))
        .route("/health/live", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.live().await }
            }
        }))
        .route("/metrics", get({
            let handler = metrics_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.metrics().await }
            }
        }));

    let web_state = WebState {
        service: service.clone(),
        pages,
    };
    let web_router = Router::new()
        .route("/", get(web_handler::home))
        .route("/create-form", get(web_handler::create_form_page))
        .route("/generate-form", limited(web_handler::generate_form, &limiter))
        .route("/share/:form_id", get(web_handler::share_form))
        .route("/submit/:form_id", post(web_handler::submit_form))
        .route("/analytics/:form_id", get(web_handler::show_analytics))
        .with_state(web_state);

    let api_state = ApiState { service };
    let api_router = Router::new()
        .route(
            "/forms",
            limited(api_handler::create_form, &limiter).get(api_handler::list_forms),
        )
        .route("/forms/:form_id", get(api_handler::get_form))
        .route("/forms/:form_id/render", get(api_handler::render_form))
        .route(
            "/forms/:form_id/responses",
            get(api_handler::list_responses).post(api_handler::submit_response),
        )
        .route("/forms/:form_id/analytics", get(api_handler::get_analytics))
        .with_state(api_state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        );

    operational_router
        .merge(web_router)
        .nest("/api", api_router)
}

/// Wire the service, handlers and router from settings and a generator
pub fn build_app(
    settings: &config::Settings,
    generator: Arc<dyn SchemaGenerator>,
) -> anyhow::Result<Router> {
    let metrics = Arc::new(MetricsCollector::new()?);
    let store = Arc::new(FormStore::new());
    let service = Arc::new(FormService::new(generator, store, metrics.clone()));
    let pages = Arc::new(PageRenderer::new()?);

    let health_handler = Arc::new(HealthHandler::new(service.clone()));
    let metrics_handler = Arc::new(MetricsHandler::new(metrics));
    let limiter = rate_limit::limiter_from_config(settings.rate_limit.as_ref());
    if limiter.is_some() {
        tracing::info!("Rate limiting enabled for form generation");
    }

    Ok(create_app(service, pages, health_handler, metrics_handler, limiter))
}

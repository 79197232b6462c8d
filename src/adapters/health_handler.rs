use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::adapters::form_service::FormService;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthChecks {
    pub generator: String,
    pub store: String,
}

pub struct HealthHandler {
    service: Arc<FormService>,
    start_time: std::time::Instant,
}

impl HealthHandler {
    pub fn new(service: Arc<FormService>) -> Self {
        Self {
            service,
            start_time: std::time::Instant::now(),
        }
    }

    /// Basic health check - returns 200 if server is running
    pub async fn health(&self) -> impl IntoResponse {
        let status = HealthStatus {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            checks: HealthChecks {
                generator: self.service.generator_name().to_string(),
                store: "ok".to_string(),
            },
        };

        (StatusCode::OK, Json(status))
    }

    /// Readiness check - ready once a schema generator is wired in
    pub async fn ready(&self) -> impl IntoResponse {
        let generator = self.service.generator_name();

        if generator.is_empty() {
            (StatusCode::SERVICE_UNAVAILABLE, Json(serde_json::json!({
                "status": "not_ready",
                "message": "No schema generator configured"
            })))
        } else {
            (StatusCode::OK, Json(serde_json::json!({
                "status": "ready",
                "generator": generator,
                "forms": self.service.store().form_count().await,
            })))
        }
    }

    /// Liveness check - returns 200 if server is alive
    pub async fn live(&self) -> impl IntoResponse {
        (StatusCode::OK, Json(serde_json::json!({
            "status": "alive",
            "message": "Server is alive"
        })))
    }
}

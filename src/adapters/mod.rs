pub mod api_handler;
pub mod form_service;
pub mod form_store;
pub mod generator;
pub mod health_handler;
pub mod metrics_handler;
pub mod rate_limit;
pub mod web_handler;

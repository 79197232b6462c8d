use formsmith::adapters::generator::StaticSchemaGenerator;
use formsmith::config::{GeneratorConfig, RateLimitConfig, ServerSettings, Settings};
use formsmith::domain::{FieldSchema, FormSchema};
use std::net::SocketAddr;
use std::sync::Arc;

pub struct TestServer {
    pub addr: SocketAddr,
    pub base_url: String,
}

/// Schema served by the test generator
pub fn contact_schema() -> FormSchema {
    FormSchema {
        title: "Contact".to_string(),
        fields: vec![
            FieldSchema::new("Name", "text", "name").required(),
            FieldSchema::new("Age", "number", "age"),
            FieldSchema::new("Topic", "select", "topic")
                .with_options(&[("Sales", "sales"), ("Support", "support")]),
        ],
    }
}

impl TestServer {
    pub async fn new() -> Self {
        Self::with_rate_limit(None).await
    }

    pub async fn with_rate_limit(rate_limit: Option<RateLimitConfig>) -> Self {
        let settings = Settings {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 0, // Random port
            },
            generator: GeneratorConfig::default(),
            rate_limit,
        };
        let generator = Arc::new(StaticSchemaGenerator::new(contact_schema()));

        let app = formsmith::build_app(&settings, generator).unwrap();

        // Start server on random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to be ready
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestServer { addr, base_url }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

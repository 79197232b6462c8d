//! Generator that always answers with one schema loaded up front

use async_trait::async_trait;
use std::path::Path;

use crate::domain::{FormSchema, GenerationError, SchemaGenerator};

pub struct StaticSchemaGenerator {
    schema: FormSchema,
}

impl StaticSchemaGenerator {
    pub fn new(schema: FormSchema) -> Self {
        Self { schema }
    }

    /// Load a schema from a `.json`, `.yaml` or `.yml` file
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read form file {}: {}", path.display(), e))?;

        let schema: FormSchema = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            _ => anyhow::bail!(
                "Unsupported form file format: {} (expected .json, .yaml or .yml)",
                path.display()
            ),
        };

        tracing::info!(path = %path.display(), fields = schema.fields.len(), "Loaded static form schema");
        Ok(Self::new(schema))
    }
}

#[async_trait]
impl SchemaGenerator for StaticSchemaGenerator {
    fn name(&self) -> &str {
        "static"
    }

    async fn generate(&self, prompt: &str) -> Result<FormSchema, GenerationError> {
        let mut schema = self.schema.clone();
        if schema.title.trim().is_empty() {
            schema.title = prompt.to_string();
        }
        Ok(schema)
    }
}

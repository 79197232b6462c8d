//! Schema generator backends

pub mod openai;
pub mod static_file;

pub use openai::OpenAiGenerator;
pub use static_file::StaticSchemaGenerator;

use std::sync::Arc;

use crate::config::{GeneratorConfig, GeneratorProvider};
use crate::domain::SchemaGenerator;

/// Build the generator selected by configuration
pub fn create_generator(config: &GeneratorConfig) -> anyhow::Result<Arc<dyn SchemaGenerator>> {
    let generator: Arc<dyn SchemaGenerator> = match config.provider {
        GeneratorProvider::OpenAI => {
            let generator = OpenAiGenerator::new(config)?;
            tracing::info!(model = generator.model(), "Using OpenAI schema generator");
            Arc::new(generator)
        }
        GeneratorProvider::Static => {
            let path = config
                .form_file
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("The static provider requires generator.form_file"))?;
            Arc::new(StaticSchemaGenerator::from_file(path)?)
        }
    };
    Ok(generator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_static_provider_from_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("form.json");
        fs::write(&path, r#"{"title": "T", "fields": []}"#).unwrap();

        let config = GeneratorConfig {
            provider: GeneratorProvider::Static,
            form_file: Some(path),
            ..GeneratorConfig::default()
        };
        let generator = create_generator(&config).unwrap();
        assert_eq!(generator.name(), "static");
    }

    #[test]
    fn test_static_provider_missing_file() {
        let config = GeneratorConfig {
            provider: GeneratorProvider::Static,
            ..GeneratorConfig::default()
        };
        assert!(create_generator(&config).is_err());
    }
}

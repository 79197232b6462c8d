use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod validator;

use crate::cli::Cli;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini-2024-07-18";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub rate_limit: Option<RateLimitConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub requests_per_second: u32,
    pub burst_size: u32,
}

/// Backend used to turn prompts into form schemas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorProvider {
    #[serde(rename = "openai")]
    #[value(name = "openai")]
    OpenAI,
    /// Serve one schema loaded from `form_file`
    Static,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneratorConfig {
    pub provider: GeneratorProvider,
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Override for the API endpoint (proxies, Azure-compatible gateways)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// JSON or YAML schema for the static provider, relative to the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_file: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: GeneratorProvider::OpenAI,
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            base_url: None,
            system_prompt: None,
            temperature: None,
            form_file: None,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, anyhow::Error> {
        Self::from_root(".")
    }

    /// Create settings from CLI arguments (includes config file and CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let root = cli
            .config
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut settings = Self::load(&cli.config)?;

        // CLI > env vars > config file
        settings.apply_cli_overrides(cli);
        settings.resolve_paths(root);
        settings.validate()?;

        Ok(settings)
    }

    pub fn from_root(root: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let root = root.as_ref();
        let mut settings = Self::load(&root.join("formsmith"))?;
        settings.resolve_paths(root);
        settings.validate()?;
        Ok(settings)
    }

    fn load(path: &Path) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("generator.provider", "openai")?
            .set_default("generator.model", DEFAULT_MODEL)?
            .set_default("generator.api_key_env", DEFAULT_API_KEY_ENV)?
            .build()?;

        Ok(s.try_deserialize()?)
    }

    /// Apply CLI argument overrides to settings
    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(provider) = cli.provider {
            self.generator.provider = provider;
        }
        if let Some(model) = &cli.model {
            self.generator.model = model.clone();
        }
        if let Some(form_file) = &cli.form_file {
            // CLI paths are relative to the working directory
            self.generator.form_file = Some(
                std::env::current_dir()
                    .map(|cwd| cwd.join(form_file))
                    .unwrap_or_else(|_| form_file.clone()),
            );
        }
    }

    fn resolve_paths(&mut self, root: &Path) {
        if let Some(form_file) = &self.generator.form_file {
            if form_file.is_relative() {
                self.generator.form_file = Some(root.join(form_file));
            }
        }
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        validator::ConfigValidator::validate(self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })
    }

    /// Rate limit settings when limiting is switched on
    pub fn active_rate_limit(&self) -> Option<&RateLimitConfig> {
        self.rate_limit.as_ref().filter(|r| r.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_config_file() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::from_root(dir.path()).unwrap();

        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.generator.provider, GeneratorProvider::OpenAI);
        assert_eq!(settings.generator.model, DEFAULT_MODEL);
        assert_eq!(settings.generator.api_key_env, "OPENAI_API_KEY");
        assert!(settings.rate_limit.is_none());
    }

    #[test]
    fn test_form_file_resolved_against_config_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("formsmith.toml"),
            r#"
[generator]
provider = "static"
form_file = "forms/contact.yaml"
"#,
        )
        .unwrap();

        let settings = Settings::from_root(dir.path()).unwrap();
        assert_eq!(settings.generator.provider, GeneratorProvider::Static);
        assert_eq!(
            settings.generator.form_file,
            Some(dir.path().join("forms/contact.yaml"))
        );
        // Unset keys keep their defaults
        assert_eq!(settings.generator.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("custom.toml");
        fs::write(
            &config_path,
            r#"
[server]
host = "0.0.0.0"
port = 8080

[generator]
model = "from-file"
"#,
        )
        .unwrap();

        let cli = Cli::parse_from([
            "formsmith",
            "--config",
            config_path.to_str().unwrap(),
            "--port",
            "9090",
            "--model",
            "from-cli",
        ]);
        let settings = Settings::new_with_cli(&cli).unwrap();

        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.generator.model, "from-cli");
    }

    #[test]
    fn test_active_rate_limit() {
        let mut settings = Settings {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            generator: GeneratorConfig::default(),
            rate_limit: Some(RateLimitConfig {
                enabled: false,
                requests_per_second: 1,
                burst_size: 1,
            }),
        };
        assert!(settings.active_rate_limit().is_none());

        if let Some(r) = settings.rate_limit.as_mut() {
            r.enabled = true;
        }
        assert_eq!(settings.active_rate_limit().map(|r| r.burst_size), Some(1));
    }
}

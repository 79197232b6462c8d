use clap::Parser;
use std::path::PathBuf;

use crate::config::GeneratorProvider;

/// Formsmith - generate shareable web forms from a prompt
#[derive(Parser, Debug, Clone)]
#[command(name = "formsmith", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "FORMSMITH_CONFIG", default_value = "formsmith.toml")]
    pub config: PathBuf,

    /// Server host address
    #[arg(long, env = "FORMSMITH_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "FORMSMITH_PORT")]
    pub port: Option<u16>,

    /// Schema generator backend
    #[arg(long, env = "FORMSMITH_PROVIDER", value_enum)]
    pub provider: Option<GeneratorProvider>,

    /// Model name sent to the generator
    #[arg(long, env = "FORMSMITH_MODEL")]
    pub model: Option<String>,

    /// Form schema file served by the static provider
    #[arg(long, env = "FORMSMITH_FORM_FILE")]
    pub form_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["formsmith"]);
        assert_eq!(cli.config, PathBuf::from("formsmith.toml"));
        assert!(cli.host.is_none());
        assert!(cli.port.is_none());
        assert!(cli.provider.is_none());
        assert!(cli.form_file.is_none());
    }

    #[test]
    fn test_cli_with_args() {
        let cli = Cli::parse_from([
            "formsmith",
            "--config",
            "custom.toml",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--provider",
            "static",
            "--model",
            "gpt-4o",
            "--form-file",
            "demos/contact.json",
        ]);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert_eq!(cli.host, Some("0.0.0.0".to_string()));
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.provider, Some(GeneratorProvider::Static));
        assert_eq!(cli.model, Some("gpt-4o".to_string()));
        assert_eq!(cli.form_file, Some(PathBuf::from("demos/contact.json")));
    }

    #[test]
    fn test_openai_provider_name() {
        let cli = Cli::parse_from(["formsmith", "--provider", "openai"]);
        assert_eq!(cli.provider, Some(GeneratorProvider::OpenAI));
    }
}

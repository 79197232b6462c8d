//! OpenAI schema generator using structured outputs

use async_trait::async_trait;
use schemars::gen::SchemaSettings;
use serde::Deserialize;
use serde_json::{json, Value};
use std::env;

use crate::config::GeneratorConfig;
use crate::domain::{FormSchema, GenerationError, SchemaGenerator};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful dynamic html form creator. You will be provided with a dynamic form requirement, \
and your goal will be to output form fields.\nFor each field, just provide the correct configuration.";

/// Name of the structured output format sent with every request
const RESPONSE_FORMAT_NAME: &str = "dynamic_form";

/// JSON schema of [`FormSchema`], with every subschema inlined
pub fn form_json_schema() -> Value {
    let schema = SchemaSettings::draft07()
        .with(|s| {
            s.inline_subschemas = true;
            s.meta_schema = None;
        })
        .into_generator()
        .into_root_schema_for::<FormSchema>();
    serde_json::to_value(schema).unwrap_or_default()
}

pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    system_prompt: String,
    temperature: Option<f32>,
}

impl OpenAiGenerator {
    /// Create a generator from configuration, reading the key from the configured env var
    pub fn new(config: &GeneratorConfig) -> Result<Self, GenerationError> {
        let api_key = env::var(&config.api_key_env).map_err(|_| {
            GenerationError::Authentication(format!(
                "Environment variable {} not set",
                config.api_key_env
            ))
        })?;
        Ok(Self::with_api_key(config, api_key))
    }

    pub fn with_api_key(config: &GeneratorConfig, api_key: impl Into<String>) -> Self {
        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url,
            model: config.model.clone(),
            system_prompt: config
                .system_prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            temperature: config.temperature,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the request body for the chat completions endpoint
    fn build_request_body(&self, prompt: &str) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": self.system_prompt},
                {"role": "user", "content": prompt},
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": RESPONSE_FORMAT_NAME,
                    "schema": form_json_schema(),
                },
            },
        });

        if let Some(temp) = self.temperature {
            body["temperature"] = json!(temp);
        }

        body
    }

    fn parse_response(&self, response: &OpenAiResponse) -> Result<FormSchema, GenerationError> {
        let choice = response
            .choices
            .first()
            .ok_or_else(|| GenerationError::Parse("No choices in response".to_string()))?;

        if let Some(refusal) = &choice.message.refusal {
            return Err(GenerationError::Refused(refusal.clone()));
        }

        let content = choice
            .message
            .content
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| GenerationError::Parse("Response has no content".to_string()))?;

        serde_json::from_str(content)
            .map_err(|e| GenerationError::Parse(format!("Content is not a form schema: {}", e)))
    }
}

#[async_trait]
impl SchemaGenerator for OpenAiGenerator {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, prompt: &str) -> Result<FormSchema, GenerationError> {
        let body = self.build_request_body(prompt);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let openai_response: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Parse(format!("Failed to parse response: {}", e)))?;

        self.parse_response(&openai_response)
    }
}

// OpenAI API response types

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

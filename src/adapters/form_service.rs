use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::adapters::form_store::{FormStore, FormSummary};
use crate::adapters::metrics_handler::MetricsCollector;
use crate::analytics::{self, AnalyticsReport};
use crate::domain::{Form, FormError, FormResponse, FormResult, GenerationError, SchemaGenerator};
use crate::render::{self, Element, RenderMode};

/// Boundary operations over the generator and the form store
pub struct FormService {
    generator: Arc<dyn SchemaGenerator>,
    store: Arc<FormStore>,
    metrics: Arc<MetricsCollector>,
}

impl FormService {
    pub fn new(
        generator: Arc<dyn SchemaGenerator>,
        store: Arc<FormStore>,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            generator,
            store,
            metrics,
        }
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    pub fn store(&self) -> &Arc<FormStore> {
        &self.store
    }

    /// Generate a form from a prompt, validate it and store it.
    ///
    /// Nothing is stored when generation or validation fails.
    pub async fn create_form(&self, prompt: &str) -> FormResult<(String, Arc<Form>)> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(FormError::EmptyPrompt);
        }

        debug!(generator = self.generator.name(), "Generating form");
        let timer = self.metrics.generation_duration.start_timer();
        let generated = self.generator.generate(prompt).await;
        timer.observe_duration();

        let form = match generated.and_then(|schema| Form::try_from(schema).map_err(GenerationError::from)) {
            Ok(form) => form,
            Err(e) => {
                warn!(generator = self.generator.name(), "Form generation failed: {}", e);
                self.metrics
                    .generation_failures
                    .with_label_values(&[e.reason()])
                    .inc();
                return Err(e.into());
            }
        };

        let (form_id, form) = self.store.insert_form(form).await;
        self.metrics.forms_generated.inc();
        info!(form_id = %form_id, title = form.title(), fields = form.fields().len(), "Form created");

        Ok((form_id, form))
    }

    pub async fn get_form(&self, form_id: &str) -> FormResult<Arc<Form>> {
        self.store
            .get_form(form_id)
            .await
            .ok_or_else(|| FormError::NotFound(form_id.to_string()))
    }

    pub async fn render_form(&self, form_id: &str, mode: RenderMode) -> FormResult<Element> {
        let form = self.get_form(form_id).await?;
        Ok(render::render_form(form_id, &form, mode))
    }

    /// Record a submission. Later pairs win when a key repeats.
    pub async fn submit_response<I>(&self, form_id: &str, raw: I) -> FormResult<FormResponse>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let data: BTreeMap<String, String> = raw.into_iter().collect();
        let response = self.store.append_response(form_id, data).await?;
        self.metrics.responses_submitted.inc();
        info!(form_id = %form_id, response_id = %response.response_id, "Response recorded");
        Ok(response)
    }

    pub async fn responses(&self, form_id: &str) -> FormResult<Vec<FormResponse>> {
        self.store
            .responses(form_id)
            .await
            .ok_or_else(|| FormError::NotFound(form_id.to_string()))
    }

    pub async fn get_analytics(&self, form_id: &str) -> FormResult<AnalyticsReport> {
        let (form, responses) = self
            .store
            .form_with_responses(form_id)
            .await
            .ok_or_else(|| FormError::NotFound(form_id.to_string()))?;
        debug!(form_id = %form_id, responses = responses.len(), "Aggregating analytics");
        Ok(analytics::aggregate(&form, &responses))
    }

    pub async fn list_forms(&self) -> Vec<FormSummary> {
        self.store.list_forms().await
    }
}

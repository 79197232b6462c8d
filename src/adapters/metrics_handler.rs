use prometheus::{Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder};
use std::sync::Arc;

pub struct MetricsCollector {
    registry: Registry,

    // Generation metrics
    pub forms_generated: Counter,
    pub generation_failures: CounterVec,
    pub generation_duration: Histogram,

    // Submission metrics
    pub responses_submitted: Counter,
}

impl MetricsCollector {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let forms_generated = Counter::new(
            "formsmith_forms_generated_total",
            "Total number of forms generated and stored",
        )?;
        registry.register(Box::new(forms_generated.clone()))?;

        let generation_failures = CounterVec::new(
            Opts::new("formsmith_generation_failures_total", "Total failed form generations"),
            &["reason"],
        )?;
        registry.register(Box::new(generation_failures.clone()))?;

        let generation_duration = Histogram::with_opts(HistogramOpts::new(
            "formsmith_generation_duration_seconds",
            "Time spent waiting for the schema generator",
        ))?;
        registry.register(Box::new(generation_duration.clone()))?;

        let responses_submitted = Counter::new(
            "formsmith_responses_submitted_total",
            "Total number of form submissions accepted",
        )?;
        registry.register(Box::new(responses_submitted.clone()))?;

        Ok(Self {
            registry,
            forms_generated,
            generation_failures,
            generation_duration,
            responses_submitted,
        })
    }

    pub fn encode(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

pub struct MetricsHandler {
    collector: Arc<MetricsCollector>,
}

impl MetricsHandler {
    pub fn new(collector: Arc<MetricsCollector>) -> Self {
        Self { collector }
    }

    pub async fn metrics(&self) -> String {
        self.collector.encode().unwrap_or_else(|e| {
            tracing::error!("Failed to encode metrics: {}", e);
            String::from("# Error encoding metrics\n")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collector_creation() {
        let collector = MetricsCollector::new();
        assert!(collector.is_ok());
    }

    #[test]
    fn test_metrics_encoding() {
        let collector = MetricsCollector::new().unwrap();

        collector.forms_generated.inc();
        collector.generation_failures.with_label_values(&["parse"]).inc();

        let metrics_text = collector.encode().unwrap();
        assert!(metrics_text.contains("formsmith_forms_generated_total 1"));
        assert!(metrics_text.contains("formsmith_generation_failures_total{reason=\"parse\"} 1"));
    }

    #[tokio::test]
    async fn test_metrics_handler() {
        let collector = Arc::new(MetricsCollector::new().unwrap());
        let handler = MetricsHandler::new(collector.clone());

        collector.responses_submitted.inc();

        let metrics = handler.metrics().await;
        assert!(metrics.contains("formsmith_responses_submitted_total"));
    }
}

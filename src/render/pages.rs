//! Full HTML pages, rendered from Tera templates embedded in the binary

use rust_embed::RustEmbed;
use serde::Serialize;
use tera::{Context, Tera};

use super::markup::Element;
use crate::adapters::form_store::FormSummary;
use crate::analytics::{AnalyticsReport, FieldSummary, OptionCount};
use crate::domain::FormResponse;

#[derive(RustEmbed)]
#[folder = "templates"]
struct Templates;

pub const GENERATION_FAILED: &str = "Error generating form. Please try again.";
pub const FORM_NOT_FOUND: &str = "Form not found";

/// Analytics section as the template sees it
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum SectionView<'a> {
    Responses {
        label: &'a str,
        values: &'a [String],
    },
    Statistics {
        label: &'a str,
        average: String,
        min: &'a str,
        max: &'a str,
        skipped: usize,
    },
    Distribution {
        label: &'a str,
        counts: &'a [OptionCount],
    },
}

pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    pub fn new() -> anyhow::Result<Self> {
        let mut sources = Vec::new();
        for name in Templates::iter() {
            let file = Templates::get(&name)
                .ok_or_else(|| anyhow::anyhow!("Embedded template {} disappeared", name))?;
            let source = String::from_utf8(file.data.into_owned())?;
            sources.push((name.to_string(), source));
        }

        let mut tera = Tera::default();
        tera.add_raw_templates(sources)?;
        Ok(Self { tera })
    }

    pub fn home(&self, forms: &[FormSummary]) -> tera::Result<String> {
        let mut context = Context::new();
        context.insert("forms", forms);
        self.tera.render("home.html", &context)
    }

    pub fn create_form(&self) -> tera::Result<String> {
        self.tera.render("create.html", &Context::new())
    }

    /// Confirmation shown after generation, with a preview and the share link
    pub fn generated(&self, form_id: &str, preview: &Element) -> tera::Result<String> {
        let mut context = Context::new();
        context.insert("form_id", form_id);
        context.insert("form_html", &preview.to_html());
        self.tera.render("generated.html", &context)
    }

    pub fn share(&self, form: &Element) -> tera::Result<String> {
        let mut context = Context::new();
        context.insert("form_html", &form.to_html());
        self.tera.render("share.html", &context)
    }

    pub fn submitted(&self, response: &FormResponse) -> tera::Result<String> {
        let mut context = Context::new();
        context.insert("data", &response.data);
        self.tera.render("submitted.html", &context)
    }

    pub fn analytics(&self, report: &AnalyticsReport) -> tera::Result<String> {
        let sections: Vec<SectionView<'_>> = report
            .fields
            .iter()
            .map(|field| match &field.summary {
                FieldSummary::Responses { values } => SectionView::Responses {
                    label: &field.label,
                    values,
                },
                FieldSummary::Statistics(stats) => SectionView::Statistics {
                    label: &field.label,
                    average: stats.display_average(field.field_type),
                    min: stats.display_min(),
                    max: stats.display_max(),
                    skipped: stats.skipped,
                },
                FieldSummary::Distribution { counts } => SectionView::Distribution {
                    label: &field.label,
                    counts,
                },
            })
            .collect();

        let mut context = Context::new();
        context.insert("title", &report.title);
        context.insert("total_responses", &report.total_responses);
        context.insert("sections", &sections);
        self.tera.render("analytics.html", &context)
    }

    /// Page with a single heading, used for errors
    pub fn message(&self, heading: &str) -> tera::Result<String> {
        let mut context = Context::new();
        context.insert("heading", heading);
        self.tera.render("message.html", &context)
    }
}

//! Renders a [`Form`] as a markup tree

use serde::{Deserialize, Serialize};

use super::markup::Element;
use crate::domain::{Field, FieldKind, FieldOption, Form};

/// Whether the rendered form can be submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Wrapped in a `<form>` posting to the submission endpoint
    #[default]
    Editable,
    /// Read-only container with no submit action
    Preview,
}

/// Path that accepts submissions for a form
pub fn submission_path(form_id: &str) -> String {
    format!("/submit/{}", form_id)
}

pub fn render_form(form_id: &str, form: &Form, mode: RenderMode) -> Element {
    let fields = form.fields().iter().map(render_field);

    let body = match mode {
        RenderMode::Editable => Element::new("form")
            .attr("method", "post")
            .attr("action", submission_path(form_id))
            .children(fields)
            .child(
                Element::new("button")
                    .attr("type", "submit")
                    .attr("style", "margin-top: 20px;")
                    .text("Submit"),
            ),
        RenderMode::Preview => Element::new("div")
            .attr("class", "preview-form")
            .children(fields),
    };

    Element::new("div")
        .attr("class", "container")
        .child(Element::new("h1").text(form.title()))
        .child(body)
}

fn render_field(field: &Field) -> Element {
    let wrapper = Element::new("div").attr("style", "margin-bottom: 15px;");

    match &field.kind {
        FieldKind::Text { placeholder } => wrapper
            .child(label_for(field))
            .child(input(field, "text").attr_opt("placeholder", placeholder.as_deref())),
        FieldKind::Number => wrapper.child(label_for(field)).child(input(field, "number")),
        FieldKind::Date => wrapper.child(label_for(field)).child(input(field, "date")),
        FieldKind::Select { options } => wrapper.child(label_for(field)).child(
            Element::new("select")
                .attr("name", &field.name)
                .attr("id", &field.name)
                .flag("required", field.required)
                .children(options.iter().map(|o| {
                    Element::new("option").attr("value", &o.value).text(&o.label)
                })),
        ),
        // Checkboxes are independent, so `required` would force every box
        FieldKind::Checkbox { options } => wrapper
            .child(Element::new("label").text(&field.label))
            .child(
                Element::new("div")
                    .children(options.iter().map(|o| choice(field, o, "checkbox", false))),
            ),
        FieldKind::Radio { options } => wrapper
            .child(Element::new("label").text(&field.label))
            .child(
                Element::new("div")
                    .children(options.iter().map(|o| choice(field, o, "radio", field.required))),
            ),
        FieldKind::Textarea { placeholder } => wrapper.child(label_for(field)).child(
            Element::new("textarea")
                .attr("name", &field.name)
                .attr("id", &field.name)
                .attr_opt("placeholder", placeholder.as_deref())
                .flag("required", field.required),
        ),
    }
}

fn label_for(field: &Field) -> Element {
    Element::new("label").attr("for", &field.name).text(&field.label)
}

fn input(field: &Field, input_type: &str) -> Element {
    Element::new("input")
        .attr("type", input_type)
        .attr("name", &field.name)
        .attr("id", &field.name)
        .flag("required", field.required)
}

fn choice(field: &Field, option: &FieldOption, input_type: &str, required: bool) -> Element {
    let id = format!("{}_{}", field.name, option.value);
    Element::new("div")
        .child(
            Element::new("input")
                .attr("type", input_type)
                .attr("name", &field.name)
                .attr("value", &option.value)
                .attr("id", id.clone())
                .flag("required", required),
        )
        .child(Element::new("label").attr("for", id).text(&option.label))
}

//! Form schema model
//!
//! Two shapes live here:
//! - [`FormSchema`] / [`FieldSchema`]: the flat wire shape exchanged with the
//!   schema generator and the JSON API (`type`, `placeholder`, `options`)
//! - [`Form`] / [`Field`]: the validated model, where [`FieldKind`] only
//!   carries options for the option-bearing kinds
//!
//! A `Form` can only be obtained by validating a `FormSchema`, including when
//! it is deserialized.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Kind of input a field collects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Radio,
    Checkbox,
    Select,
    Textarea,
}

impl FieldType {
    pub const ALL: [FieldType; 7] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Date,
        FieldType::Radio,
        FieldType::Checkbox,
        FieldType::Select,
        FieldType::Textarea,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Select => "select",
            FieldType::Textarea => "textarea",
        }
    }

    /// Whether fields of this type must declare options
    pub fn has_options(&self) -> bool {
        matches!(self, FieldType::Radio | FieldType::Checkbox | FieldType::Select)
    }

    /// Whether a placeholder is honored for this type
    pub fn has_placeholder(&self) -> bool {
        matches!(self, FieldType::Text | FieldType::Textarea)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown field type: {0}")]
pub struct UnknownFieldType(pub String);

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownFieldType(s.to_string()))
    }
}

/// A selectable choice of a radio, checkbox or select field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldOption {
    /// Unique label for the option
    pub label: String,
    /// Unique value for the option
    pub value: String,
}

impl FieldOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Dynamic form definition as produced by the generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormSchema {
    /// Title of the form
    pub title: String,
    /// List of fields
    pub fields: Vec<FieldSchema>,
}

/// A single form field in wire shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldSchema {
    /// Title of the field
    pub label: String,
    /// Type of the field
    #[serde(rename = "type")]
    #[schemars(with = "FieldType")]
    pub field_type: String,
    /// Unique name to access the field
    pub name: String,
    /// Whether the field is required
    #[serde(default)]
    pub required: bool,
    /// Placeholder for the field. Only applicable for the types text and textarea
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Options for the field. Only applicable for the types radio, checkbox and select
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
}

impl FieldSchema {
    pub fn new(label: impl Into<String>, field_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            field_type: field_type.into(),
            name: name.into(),
            required: false,
            placeholder: None,
            options: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Attach options given as `(label, value)` pairs
    pub fn with_options(mut self, options: &[(&str, &str)]) -> Self {
        self.options = Some(
            options
                .iter()
                .map(|(label, value)| FieldOption::new(*label, *value))
                .collect(),
        );
        self
    }

    fn into_field(self) -> Result<Field, Vec<SchemaViolation>> {
        let field_type: FieldType = self.field_type.parse().map_err(|_| {
            vec![SchemaViolation::UnknownFieldType {
                field: self.name.clone(),
                type_name: self.field_type.clone(),
            }]
        })?;

        // An empty list carries nothing, so it counts as absent
        let options = self.options.filter(|o| !o.is_empty());

        if !field_type.has_options() && options.is_some() {
            return Err(vec![SchemaViolation::UnexpectedOptions {
                field: self.name,
                field_type,
            }]);
        }

        let kind = match field_type {
            FieldType::Text => FieldKind::Text {
                placeholder: self.placeholder,
            },
            FieldType::Textarea => FieldKind::Textarea {
                placeholder: self.placeholder,
            },
            FieldType::Number => FieldKind::Number,
            FieldType::Date => FieldKind::Date,
            FieldType::Radio => FieldKind::Radio {
                options: checked_options(&self.name, field_type, options)?,
            },
            FieldType::Checkbox => FieldKind::Checkbox {
                options: checked_options(&self.name, field_type, options)?,
            },
            FieldType::Select => FieldKind::Select {
                options: checked_options(&self.name, field_type, options)?,
            },
        };

        Ok(Field {
            label: self.label,
            name: self.name,
            required: self.required,
            kind,
        })
    }
}

fn checked_options(
    field: &str,
    field_type: FieldType,
    options: Option<Vec<FieldOption>>,
) -> Result<Vec<FieldOption>, Vec<SchemaViolation>> {
    let options = options.ok_or_else(|| {
        vec![SchemaViolation::MissingOptions {
            field: field.to_string(),
            field_type,
        }]
    })?;

    let mut seen = HashSet::new();
    let duplicates: Vec<SchemaViolation> = options
        .iter()
        .filter(|o| !seen.insert(o.value.as_str()))
        .map(|o| SchemaViolation::DuplicateOptionValue {
            field: field.to_string(),
            value: o.value.clone(),
        })
        .collect();

    if duplicates.is_empty() {
        Ok(options)
    } else {
        Err(duplicates)
    }
}

/// A way in which a generated schema breaks the form invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("field at position {index} has an empty name")]
    EmptyFieldName { index: usize },

    #[error("field name '{name}' is used more than once")]
    DuplicateFieldName { name: String },

    #[error("field '{field}' has unknown type '{type_name}'")]
    UnknownFieldType { field: String, type_name: String },

    #[error("field '{field}' of type {field_type} requires at least one option")]
    MissingOptions { field: String, field_type: FieldType },

    #[error("field '{field}' of type {field_type} does not accept options")]
    UnexpectedOptions { field: String, field_type: FieldType },

    #[error("field '{field}' declares option value '{value}' more than once")]
    DuplicateOptionValue { field: String, value: String },
}

/// Every violation found while validating one schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaErrors(pub Vec<SchemaViolation>);

impl SchemaErrors {
    pub fn violations(&self) -> &[SchemaViolation] {
        &self.0
    }
}

impl fmt::Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|v| v.to_string()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for SchemaErrors {}

/// Validated field payload, one variant per field type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text { placeholder: Option<String> },
    Number,
    Date,
    Radio { options: Vec<FieldOption> },
    Checkbox { options: Vec<FieldOption> },
    Select { options: Vec<FieldOption> },
    Textarea { placeholder: Option<String> },
}

impl FieldKind {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldKind::Text { .. } => FieldType::Text,
            FieldKind::Number => FieldType::Number,
            FieldKind::Date => FieldType::Date,
            FieldKind::Radio { .. } => FieldType::Radio,
            FieldKind::Checkbox { .. } => FieldType::Checkbox,
            FieldKind::Select { .. } => FieldType::Select,
            FieldKind::Textarea { .. } => FieldType::Textarea,
        }
    }

    /// Declared options; empty for kinds without options
    pub fn options(&self) -> &[FieldOption] {
        match self {
            FieldKind::Radio { options }
            | FieldKind::Checkbox { options }
            | FieldKind::Select { options } => options.as_slice(),
            FieldKind::Text { .. } | FieldKind::Number | FieldKind::Date | FieldKind::Textarea { .. } => &[],
        }
    }

    pub fn placeholder(&self) -> Option<&str> {
        match self {
            FieldKind::Text { placeholder } | FieldKind::Textarea { placeholder } => placeholder.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: String,
    pub name: String,
    pub required: bool,
    pub kind: FieldKind,
}

impl Field {
    pub fn field_type(&self) -> FieldType {
        self.kind.field_type()
    }

    pub fn options(&self) -> &[FieldOption] {
        self.kind.options()
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.kind.placeholder()
    }
}

impl From<Field> for FieldSchema {
    fn from(field: Field) -> Self {
        let field_type = field.field_type().as_str().to_string();
        let (placeholder, options) = match field.kind {
            FieldKind::Text { placeholder } | FieldKind::Textarea { placeholder } => (placeholder, None),
            FieldKind::Radio { options }
            | FieldKind::Checkbox { options }
            | FieldKind::Select { options } => (None, Some(options)),
            FieldKind::Number | FieldKind::Date => (None, None),
        };

        Self {
            label: field.label,
            field_type,
            name: field.name,
            required: field.required,
            placeholder,
            options,
        }
    }
}

/// A validated, immutable form definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FormSchema", into = "FormSchema")]
pub struct Form {
    title: String,
    fields: Vec<Field>,
}

impl Form {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl TryFrom<FormSchema> for Form {
    type Error = SchemaErrors;

    fn try_from(schema: FormSchema) -> Result<Self, Self::Error> {
        let mut violations = Vec::new();
        let mut seen_names = HashSet::new();
        let mut fields = Vec::with_capacity(schema.fields.len());

        for (index, raw) in schema.fields.into_iter().enumerate() {
            if raw.name.trim().is_empty() {
                violations.push(SchemaViolation::EmptyFieldName { index });
            } else if !seen_names.insert(raw.name.clone()) {
                violations.push(SchemaViolation::DuplicateFieldName {
                    name: raw.name.clone(),
                });
            }

            match raw.into_field() {
                Ok(field) => fields.push(field),
                Err(mut field_violations) => violations.append(&mut field_violations),
            }
        }

        if violations.is_empty() {
            Ok(Form {
                title: schema.title,
                fields,
            })
        } else {
            Err(SchemaErrors(violations))
        }
    }
}

impl From<Form> for FormSchema {
    fn from(form: Form) -> Self {
        Self {
            title: form.title,
            fields: form.fields.into_iter().map(FieldSchema::from).collect(),
        }
    }
}

//! Per-field summaries of collected responses
//!
//! [`aggregate`] is pure: it reads the form and the responses and builds a
//! fresh [`AnalyticsReport`].
//!
//! Number and date fields share one statistics path and differ only in how a
//! submitted string is converted. Values that fail conversion are skipped and
//! counted in [`NumericStats::skipped`], so one malformed answer never hides
//! the rest of the report.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{Field, FieldKind, FieldOption, FieldType, Form, FormResponse};

/// Shown in place of a minimum or maximum when there is nothing to compare
pub const NOT_APPLICABLE: &str = "N/A";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub title: String,
    pub total_responses: usize,
    pub fields: Vec<FieldReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldReport {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub summary: FieldSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldSummary {
    /// Every answer in response order, empties included
    Responses { values: Vec<String> },
    Statistics(NumericStats),
    /// One count per declared option, in declared order
    Distribution { counts: Vec<OptionCount> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericStats {
    /// Values that converted successfully
    pub count: usize,
    /// Mean of converted values; `0` when there are none. For dates this is a
    /// day ordinal, see [`NumericStats::display_average`].
    pub average: f64,
    /// Original text of the smallest converted value
    pub min: Option<String>,
    /// Original text of the largest converted value
    pub max: Option<String>,
    /// Non-empty values that could not be converted
    pub skipped: usize,
}

impl NumericStats {
    pub fn display_min(&self) -> &str {
        self.min.as_deref().unwrap_or(NOT_APPLICABLE)
    }

    pub fn display_max(&self) -> &str {
        self.max.as_deref().unwrap_or(NOT_APPLICABLE)
    }

    /// Average formatted for the field type; date averages read as a date
    pub fn display_average(&self, field_type: FieldType) -> String {
        if self.count == 0 {
            return "0".to_string();
        }
        match field_type {
            FieldType::Date => ordinal_to_date(self.average)
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_else(|| self.average.to_string()),
            _ => self.average.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionCount {
    pub label: String,
    pub value: String,
    pub count: usize,
}

/// A submitted value that does not convert to the field's numeric domain
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("value '{value}' in field '{field}' is not a valid {expected}")]
pub struct ConversionError {
    pub field: String,
    pub value: String,
    pub expected: FieldType,
}

pub fn aggregate(form: &Form, responses: &[FormResponse]) -> AnalyticsReport {
    let fields = form
        .fields()
        .iter()
        .map(|field| {
            let values: Vec<&str> = responses.iter().map(|r| r.value(&field.name)).collect();
            FieldReport {
                name: field.name.clone(),
                label: field.label.clone(),
                field_type: field.field_type(),
                summary: summarize(field, &values),
            }
        })
        .collect();

    AnalyticsReport {
        title: form.title().to_string(),
        total_responses: responses.len(),
        fields,
    }
}

fn summarize(field: &Field, values: &[&str]) -> FieldSummary {
    match &field.kind {
        FieldKind::Text { .. } | FieldKind::Textarea { .. } => FieldSummary::Responses {
            values: values.iter().map(|v| v.to_string()).collect(),
        },
        FieldKind::Number => FieldSummary::Statistics(numeric_stats(field, values, parse_number)),
        FieldKind::Date => FieldSummary::Statistics(numeric_stats(field, values, parse_date)),
        FieldKind::Radio { options }
        | FieldKind::Checkbox { options }
        | FieldKind::Select { options } => FieldSummary::Distribution {
            counts: count_options(options, values),
        },
    }
}

fn numeric_stats(field: &Field, values: &[&str], parse: fn(&str) -> Option<f64>) -> NumericStats {
    let mut converted: Vec<(f64, &str)> = Vec::new();
    let mut skipped = 0;

    for value in values.iter().copied().filter(|v| !v.is_empty()) {
        match convert(field, value, parse) {
            Ok(n) => converted.push((n, value)),
            Err(e) => {
                tracing::warn!("Skipping value in analytics: {}", e);
                skipped += 1;
            }
        }
    }

    if converted.is_empty() {
        return NumericStats {
            count: 0,
            average: 0.0,
            min: None,
            max: None,
            skipped,
        };
    }

    let sum: f64 = converted.iter().map(|(n, _)| n).sum();
    let average = sum / converted.len() as f64;
    let min = converted
        .iter()
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, s)| s.to_string());
    let max = converted
        .iter()
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, s)| s.to_string());

    NumericStats {
        count: converted.len(),
        average,
        min,
        max,
        skipped,
    }
}

fn convert(field: &Field, value: &str, parse: fn(&str) -> Option<f64>) -> Result<f64, ConversionError> {
    parse(value).ok_or_else(|| ConversionError {
        field: field.name.clone(),
        value: value.to_string(),
        expected: field.field_type(),
    })
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_date(value: &str) -> Option<f64> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .ok()
        .map(|d| d.num_days_from_ce() as f64)
}

fn ordinal_to_date(ordinal: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(ordinal.round() as i32)
}

fn count_options(options: &[FieldOption], values: &[&str]) -> Vec<OptionCount> {
    options
        .iter()
        .map(|option| OptionCount {
            label: option.label.clone(),
            value: option.value.clone(),
            count: values.iter().filter(|v| **v == option.value).count(),
        })
        .collect()
}

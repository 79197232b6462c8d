use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One submission of a form
///
/// `data` is keyed by field name. Keys that do not match a field are kept but
/// ignored by analytics; fields that were left unanswered are simply absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormResponse {
    pub response_id: String,
    pub form_id: String,
    pub data: BTreeMap<String, String>,
    pub timestamp: DateTime<Utc>,
}

impl FormResponse {
    pub fn new(form_id: impl Into<String>, data: BTreeMap<String, String>) -> Self {
        Self {
            response_id: uuid::Uuid::new_v4().to_string(),
            form_id: form_id.into(),
            data,
            timestamp: Utc::now(),
        }
    }

    /// Submitted value for a field, or the empty string when unanswered
    pub fn value(&self, name: &str) -> &str {
        self.data.get(name).map(String::as_str).unwrap_or("")
    }
}

//! In-memory storage for forms and their submissions
//!
//! Nothing is persisted: everything is lost when the process exits.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{Form, FormError, FormResponse, FormResult};

struct FormEntry {
    form: Arc<Form>,
    created_at: DateTime<Utc>,
    responses: RwLock<Vec<FormResponse>>,
}

#[derive(Default)]
struct Catalog {
    entries: HashMap<String, Arc<FormEntry>>,
    /// Form ids in creation order
    order: Vec<String>,
}

/// Listing entry for a stored form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSummary {
    pub form_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub response_count: usize,
}

/// Owns every form and its append-only response list.
///
/// The catalog lock is only held long enough to look up an entry; each form's
/// responses sit behind their own lock so a submission is appended as a
/// whole or not at all.
#[derive(Clone, Default)]
pub struct FormStore {
    catalog: Arc<RwLock<Catalog>>,
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new form under a freshly generated id
    pub async fn insert_form(&self, form: Form) -> (String, Arc<Form>) {
        let form = Arc::new(form);
        let entry = Arc::new(FormEntry {
            form: form.clone(),
            created_at: Utc::now(),
            responses: RwLock::new(Vec::new()),
        });

        let mut catalog = self.catalog.write().await;
        let mut form_id = uuid::Uuid::new_v4().to_string();
        while catalog.entries.contains_key(&form_id) {
            form_id = uuid::Uuid::new_v4().to_string();
        }
        catalog.entries.insert(form_id.clone(), entry);
        catalog.order.push(form_id.clone());

        (form_id, form)
    }

    pub async fn get_form(&self, form_id: &str) -> Option<Arc<Form>> {
        self.entry(form_id).await.map(|e| e.form.clone())
    }

    pub async fn contains(&self, form_id: &str) -> bool {
        self.catalog.read().await.entries.contains_key(form_id)
    }

    pub async fn list_forms(&self) -> Vec<FormSummary> {
        let entries: Vec<(String, Arc<FormEntry>)> = {
            let catalog = self.catalog.read().await;
            catalog
                .order
                .iter()
                .filter_map(|id| catalog.entries.get(id).map(|e| (id.clone(), e.clone())))
                .collect()
        };

        let mut summaries = Vec::with_capacity(entries.len());
        for (form_id, entry) in entries {
            summaries.push(FormSummary {
                form_id,
                title: entry.form.title().to_string(),
                created_at: entry.created_at,
                response_count: entry.responses.read().await.len(),
            });
        }
        summaries
    }

    /// Append a submission to an existing form
    pub async fn append_response(
        &self,
        form_id: &str,
        data: BTreeMap<String, String>,
    ) -> FormResult<FormResponse> {
        let entry = self
            .entry(form_id)
            .await
            .ok_or_else(|| FormError::NotFound(form_id.to_string()))?;

        let response = FormResponse::new(form_id, data);
        entry.responses.write().await.push(response.clone());
        Ok(response)
    }

    /// Snapshot of a form together with its responses
    pub async fn form_with_responses(&self, form_id: &str) -> Option<(Arc<Form>, Vec<FormResponse>)> {
        let entry = self.entry(form_id).await?;
        let responses = entry.responses.read().await.clone();
        Some((entry.form.clone(), responses))
    }

    pub async fn responses(&self, form_id: &str) -> Option<Vec<FormResponse>> {
        self.form_with_responses(form_id).await.map(|(_, r)| r)
    }

    pub async fn form_count(&self) -> usize {
        self.catalog.read().await.entries.len()
    }

    pub async fn response_count(&self) -> usize {
        let entries: Vec<Arc<FormEntry>> = self.catalog.read().await.entries.values().cloned().collect();
        let mut total = 0;
        for entry in entries {
            total += entry.responses.read().await.len();
        }
        total
    }

    async fn entry(&self, form_id: &str) -> Option<Arc<FormEntry>> {
        self.catalog.read().await.entries.get(form_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldSchema, FormSchema};

    fn sample_form(title: &str) -> Form {
        Form::try_from(FormSchema {
            title: title.to_string(),
            fields: vec![FieldSchema::new("Name", "text", "name")],
        })
        .unwrap()
    }

    fn data(value: &str) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert("name".to_string(), value.to_string());
        map
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = FormStore::new();
        let (id, form) = store.insert_form(sample_form("First")).await;

        assert!(store.contains(&id).await);
        assert_eq!(store.get_form(&id).await.unwrap().title(), form.title());
        assert!(store.get_form("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_list_preserves_creation_order() {
        let store = FormStore::new();
        let (a, _) = store.insert_form(sample_form("A")).await;
        let (b, _) = store.insert_form(sample_form("B")).await;
        store.append_response(&b, data("x")).await.unwrap();

        let listed = store.list_forms().await;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].form_id, a);
        assert_eq!(listed[0].title, "A");
        assert_eq!(listed[0].response_count, 0);
        assert_eq!(listed[1].form_id, b);
        assert_eq!(listed[1].response_count, 1);
    }

    #[tokio::test]
    async fn test_append_to_unknown_form_is_not_found() {
        let store = FormStore::new();
        store.insert_form(sample_form("A")).await;

        let result = store.append_response("nope", data("x")).await;
        assert!(matches!(result, Err(FormError::NotFound(id)) if id == "nope"));
        assert_eq!(store.response_count().await, 0);
        assert!(store.responses("nope").await.is_none());
    }

    #[tokio::test]
    async fn test_responses_are_appended_in_order() {
        let store = FormStore::new();
        let (id, _) = store.insert_form(sample_form("A")).await;
        let first = store.append_response(&id, data("one")).await.unwrap();
        store.append_response(&id, data("two")).await.unwrap();

        let responses = store.responses(&id).await.unwrap();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].response_id, first.response_id);
        assert_eq!(responses[1].value("name"), "two");
        assert_eq!(responses[0].form_id, id);
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_all_kept() {
        let store = FormStore::new();
        let (id, _) = store.insert_form(sample_form("Busy")).await;

        let mut handles = Vec::new();
        for i in 0..50 {
            let store = store.clone();
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                store.append_response(&id, data(&i.to_string())).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let responses = store.responses(&id).await.unwrap();
        assert_eq!(responses.len(), 50);
        assert!(responses.iter().all(|r| r.data.len() == 1));
        assert_eq!(store.response_count().await, 50);
        assert_eq!(store.form_count().await, 1);
    }
}

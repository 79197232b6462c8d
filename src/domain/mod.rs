use async_trait::async_trait;

pub mod error;
pub mod form;
pub mod response;

pub use error::{FormError, FormResult, GenerationError};
pub use form::{
    Field, FieldKind, FieldOption, FieldSchema, FieldType, Form, FormSchema, SchemaErrors,
    SchemaViolation,
};
pub use response::FormResponse;

/// Turns a natural-language prompt into a form schema.
///
/// Implementations return the raw schema; callers validate it into a
/// [`Form`] before storing it.
#[async_trait]
pub trait SchemaGenerator: Send + Sync {
    /// Name of the backing provider
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<FormSchema, GenerationError>;
}

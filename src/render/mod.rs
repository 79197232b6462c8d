//! HTML output: the markup tree, the form renderer and the page templates

pub mod form;
pub mod markup;
pub mod pages;

pub use form::{render_form, submission_path, RenderMode};
pub use markup::{escape_html, Element, Node};
pub use pages::PageRenderer;

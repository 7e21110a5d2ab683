//! Seam between request handlers and whatever turns data into HTML.

use thiserror::Error;

/// Failure to produce a page from a template and its data bag.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("unknown template '{0}'")]
    UnknownTemplate(String),

    #[error("template '{template}' is missing field '{field}'")]
    MissingField {
        template: &'static str,
        field: &'static str,
    },
}

/// Renders a named template with a JSON data bag into an HTML document.
pub trait ViewRenderer: Send + Sync {
    fn render(&self, template: &str, data: &serde_json::Value) -> Result<String, RenderError>;
}

//! Rendering errors

use css_inline::InlineError;
use thiserror::Error;

/// Errors raised while turning parsed sections into an HTML document
#[derive(Debug, Error)]
pub enum RenderError {
    /// The HTML template could not be rendered
    #[error("could not render email template: {0}")]
    Template(#[from] askama::Error),

    /// Styles could not be inlined into the document
    #[error("could not inline email styles: {0}")]
    Inline(#[from] InlineError),
}

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading, rendering or rewriting a DOCX package.
#[derive(Error, Debug)]
pub enum DocxError {
    #[error("Template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    #[error("Invalid document package: {0}")]
    Package(#[from] zip::result::ZipError),

    #[error("Document part '{0}' is missing")]
    MissingPart(String),

    #[error("Document part '{0}' is not valid UTF-8")]
    Encoding(String),

    #[error("Template syntax error in '{part}': {message}")]
    TemplateSyntax { part: String, message: String },

    #[error("Template rendering failed in '{part}': {message}")]
    Render { part: String, message: String },

    #[error("Logo image could not be embedded: {0}")]
    Image(String),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DocxError {
    /// True for failures caused by the logo rather than the template.
    pub fn is_image_error(&self) -> bool {
        matches!(self, DocxError::Image(_))
    }
}

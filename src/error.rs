// src/error.rs
use crate::storage::StorageError;
use agenda_docx::DocxError;
use agenda_traits::SearchError;
use std::path::PathBuf;
use thiserror::Error;

/// A comprehensive error type for agenda generation.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    #[error("Rendering failed: {0}")]
    Render(DocxError),

    #[error("Logo search failed: {0}")]
    Search(#[from] SearchError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to write output: {0}")]
    Output(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// True when the caller sent something unusable, as opposed to a failure
    /// on our side.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PipelineError::InvalidInput(_) | PipelineError::Search(SearchError::MissingCompany)
        )
    }
}

impl From<DocxError> for PipelineError {
    fn from(e: DocxError) -> Self {
        match e {
            DocxError::TemplateNotFound(path) => PipelineError::TemplateNotFound(path),
            other => PipelineError::Render(other),
        }
    }
}

/// For parsing request bodies. Serializing results uses
/// [`PipelineError::Output`] instead.
impl From<serde_json::Error> for PipelineError {
    fn from(e: serde_json::Error) -> Self {
        PipelineError::InvalidInput(e.to_string())
    }
}

impl From<config::ConfigError> for PipelineError {
    fn from(e: config::ConfigError) -> Self {
        PipelineError::Config(e.to_string())
    }
}

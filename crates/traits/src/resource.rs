//! ResourceProvider trait for abstracting where logo bytes come from.
//!
//! The pipeline only ever asks for "the bytes behind this location"; whether
//! that is a local file, a URL or a test fixture is up to the provider.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Error type for resource loading operations.
#[derive(Error, Debug, Clone)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to load resource '{location}': {message}")]
    LoadFailed { location: String, message: String },

    #[error("Resource '{location}' is not supported by {provider}")]
    Unsupported {
        location: String,
        provider: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ResourceError {
    fn from(err: std::io::Error) -> Self {
        ResourceError::Io(err.to_string())
    }
}

/// Shared resource data type (reference-counted bytes).
pub type SharedResourceData = Arc<Vec<u8>>;

/// Loads raw bytes for a location.
///
/// # Implementations
///
/// - `FilesystemResourceProvider` (agenda-resource): paths under a base directory
/// - `HttpResourceProvider` (agenda-resource, feature `remote`): http(s) URLs
/// - [`InMemoryResourceProvider`]: pre-populated map, used in tests
pub trait ResourceProvider: Send + Sync + Debug {
    /// Load the bytes stored at `location`.
    fn load(&self, location: &str) -> Result<SharedResourceData, ResourceError>;

    /// Human-readable provider name for log lines.
    fn name(&self) -> &'static str;
}

/// A resource provider backed by a map, keyed by the exact location string.
#[derive(Debug, Default)]
pub struct InMemoryResourceProvider {
    resources: RwLock<HashMap<String, SharedResourceData>>,
}

impl InMemoryResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for fixtures.
    pub fn with_resource(self, location: impl Into<String>, data: Vec<u8>) -> Self {
        // A freshly built provider has no other lock holders.
        let _ = self.insert(location, data);
        self
    }

    /// Stores `data` under `location`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::LoadFailed` if the internal lock is poisoned.
    pub fn insert(&self, location: impl Into<String>, data: Vec<u8>) -> Result<(), ResourceError> {
        let location = location.into();
        let mut resources = self.resources.write().map_err(|_| ResourceError::LoadFailed {
            location: location.clone(),
            message: "resource store lock poisoned".to_string(),
        })?;
        resources.insert(location, Arc::new(data));
        Ok(())
    }
}

impl ResourceProvider for InMemoryResourceProvider {
    fn load(&self, location: &str) -> Result<SharedResourceData, ResourceError> {
        let resources = self.resources.read().map_err(|_| ResourceError::LoadFailed {
            location: location.to_string(),
            message: "resource store lock poisoned".to_string(),
        })?;
        resources
            .get(location)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(location.to_string()))
    }

    fn name(&self) -> &'static str {
        "InMemoryResourceProvider"
    }
}

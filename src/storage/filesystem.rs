use crate::storage::backend::{BlobStorage, StorageError, StoredDocument, end_of_day};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem-based storage backend
#[derive(Debug)]
pub struct FilesystemBlobStorage {
    base_path: PathBuf,
    base_url: Option<String>,
}

impl FilesystemBlobStorage {
    pub fn new(base_path: PathBuf) -> Result<Self, StorageError> {
        // Create storage directory if it doesn't exist
        fs::create_dir_all(&base_path).map_err(|source| StorageError::Init {
            path: base_path.clone(),
            source,
        })?;
        Ok(Self {
            base_path,
            base_url: None,
        })
    }

    /// Public prefix for links. Without one, links are `file://` URLs.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    fn file_path(&self, name: &str) -> PathBuf {
        // Only the final component is used, so names cannot leave the store.
        let file_name = Path::new(name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "agenda.docx".to_string());
        self.base_path.join(file_name)
    }
}

impl BlobStorage for FilesystemBlobStorage {
    fn upload(&self, name: &str, source: &Path) -> Result<StoredDocument, StorageError> {
        let dest = self.file_path(name);
        fs::copy(source, &dest).map_err(|e| StorageError::Upload {
            name: name.to_string(),
            message: format!("Failed to copy file to storage: {e}"),
        })?;

        let expires_at = end_of_day(Utc::now());
        let location = match &self.base_url {
            Some(base) => format!("{}/{}", base, name_of(&dest)),
            None => format!("file://{}", dest.display()),
        };
        let url = format!("{}?expires={}", location, expires_at.timestamp());
        log::info!("Stored {} at {}", name, dest.display());

        Ok(StoredDocument {
            name: name_of(&dest),
            url,
            expires_at,
        })
    }

    fn name(&self) -> &'static str {
        "FilesystemBlobStorage"
    }
}

fn name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

use chrono::{DateTime, NaiveTime, Utc};
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create storage at '{}': {source}", .path.display())]
    Init {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to upload '{name}': {message}")]
    Upload { name: String, message: String },
}

/// A stored copy of a generated agenda and the link it can be fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub name: String,
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

/// Storage backend for generated agendas.
pub trait BlobStorage: Send + Sync + Debug {
    /// Stores the file at `source` under `name` and returns a time-limited
    /// link to it.
    fn upload(&self, name: &str, source: &Path) -> Result<StoredDocument, StorageError>;

    /// Backend name for log lines.
    fn name(&self) -> &'static str;
}

/// Links stay valid until the last second of the day they were issued, in UTC.
pub fn end_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    NaiveTime::from_hms_opt(23, 59, 59)
        .map(|time| now.date_naive().and_time(time).and_utc())
        .unwrap_or(now)
}

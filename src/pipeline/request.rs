//! Request and result types of the agenda pipeline.

use crate::error::PipelineError;
use crate::storage::StoredDocument;
use agenda_docx::StripOutcome;
use agenda_types::{AgendaRecord, ResolvedLogo};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Logo bytes sent along with a request, e.g. from a form upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl LogoUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Reads a local image, guessing the content type from its extension.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let bytes = fs::read(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let content_type = match extension.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            _ => "application/octet-stream",
        };
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "logo".to_string());
        Ok(Self::new(file_name, content_type, bytes))
    }

    /// Only non-empty `image/*` uploads are used.
    pub fn is_usable(&self) -> bool {
        !self.bytes.is_empty() && self.content_type.trim().to_ascii_lowercase().starts_with("image/")
    }
}

/// One agenda to generate.
#[derive(Debug, Clone, Default)]
pub struct AgendaRequest {
    pub record: AgendaRecord,
    pub upload: Option<LogoUpload>,
    /// Pins the output path instead of deriving it from the record.
    pub output_path: Option<PathBuf>,
}

impl AgendaRequest {
    pub fn new(record: AgendaRecord) -> Self {
        Self {
            record,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        Ok(Self::new(AgendaRecord::from_json(json)?))
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, PipelineError> {
        Ok(Self::new(AgendaRecord::from_slice(bytes)?))
    }

    pub fn with_upload(mut self, upload: LogoUpload) -> Self {
        self.upload = Some(upload);
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }
}

/// Where the finished document went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    File,
    Link(StoredDocument),
}

/// A generated agenda. The file stays on disk until [`discard`] is called.
///
/// [`discard`]: GeneratedAgenda::discard
#[derive(Debug, Clone)]
pub struct GeneratedAgenda {
    pub path: PathBuf,
    /// Download name to offer clients.
    pub attachment_name: String,
    pub logo: ResolvedLogo,
    /// Rendering with the logo failed and the document was rendered without it.
    pub logo_dropped: bool,
    /// `None` when post-processing failed and was skipped.
    pub table: Option<StripOutcome>,
    pub delivery: Delivery,
}

impl GeneratedAgenda {
    pub fn link(&self) -> Option<&StoredDocument> {
        match &self.delivery {
            Delivery::Link(stored) => Some(stored),
            Delivery::File => None,
        }
    }

    /// Deletes the generated file, e.g. once it has been served.
    pub fn discard(self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

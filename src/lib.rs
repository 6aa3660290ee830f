//! Meeting agenda documents from JSON records and DOCX templates.

pub mod error;
pub mod pipeline;
pub mod storage;

pub use error::PipelineError;
pub use pipeline::{
    AgendaConfig, AgendaPipeline, AgendaRequest, Delivery, DeliveryMode, GeneratedAgenda,
    LogoUpload, PipelineBuilder,
};
pub use storage::{BlobStorage, FilesystemBlobStorage, StorageError, StoredDocument};

pub use agenda_docx::{StripOutcome, write_default_template};
pub use agenda_types::{AgendaItem, AgendaRecord, Attendee, ResolvedLogo};

pub mod backend;
pub mod filesystem;

pub use backend::{BlobStorage, StorageError, StoredDocument, end_of_day};
pub use filesystem::FilesystemBlobStorage;

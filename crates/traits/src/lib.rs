pub mod resource;
pub mod search;

pub use resource::{InMemoryResourceProvider, ResourceError, ResourceProvider, SharedResourceData};
pub use search::{LogoSearch, LogoSuggestions, MAX_ALTERNATES, SearchError};

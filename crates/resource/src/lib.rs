//! Resource providers and logo lookup for the agenda builder.
//!
//! ## Available Providers
//!
//! - [`FilesystemResourceProvider`]: Loads logos from the local filesystem
//! - [`HttpResourceProvider`]: Fetches remote logos (feature `remote`)
//! - [`InMemoryResourceProvider`]: Pre-populated storage, re-exported from agenda-traits
//!
//! ## Logo lookup
//!
//! - [`LogoResolver`]: exact path, fuzzy filename match or remote reference
//! - [`MockLogoSearch`]: canned search results for offline use

mod filesystem;
#[cfg(feature = "remote")]
mod http;
pub mod logo;
mod search;

pub use filesystem::FilesystemResourceProvider;
#[cfg(feature = "remote")]
pub use http::HttpResourceProvider;
pub use logo::{LogoResolver, load_logo};
pub use search::MockLogoSearch;

pub use agenda_traits::InMemoryResourceProvider;

//! Logo search capability.
//!
//! Given a free-text company name, a search returns a best-guess logo URL and
//! a handful of alternates. Callers treat every failure as "no logo".

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Upper bound on the alternates a search may return.
pub const MAX_ALTERNATES: usize = 4;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Company name is required")]
    MissingCompany,

    #[error("Logo search backend failed: {0}")]
    Backend(String),
}

/// Result of a successful search, serialized the way clients expect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoSuggestions {
    pub logo_url: String,
    pub thumbnail_url: String,
    pub additional_results: Vec<String>,
}

impl LogoSuggestions {
    /// Builds suggestions, keeping at most [`MAX_ALTERNATES`] alternates.
    pub fn new(
        logo_url: impl Into<String>,
        thumbnail_url: impl Into<String>,
        alternates: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            logo_url: logo_url.into(),
            thumbnail_url: thumbnail_url.into(),
            additional_results: alternates.into_iter().take(MAX_ALTERNATES).collect(),
        }
    }
}

/// A pluggable image-search backend.
pub trait LogoSearch: Send + Sync + Debug {
    fn find_logo(&self, company: &str) -> Result<LogoSuggestions, SearchError>;

    fn name(&self) -> &'static str;
}

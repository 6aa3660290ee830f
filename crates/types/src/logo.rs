use std::fmt;
use std::path::PathBuf;

/// The outcome of logo lookup, handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResolvedLogo {
    /// No usable logo; the placeholder renders blank.
    #[default]
    Absent,
    /// An image file on the local filesystem.
    Local(PathBuf),
    /// An image that still has to be fetched by the caller.
    Remote(String),
}

impl ResolvedLogo {
    pub fn is_absent(&self) -> bool {
        matches!(self, ResolvedLogo::Absent)
    }
}

impl fmt::Display for ResolvedLogo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedLogo::Absent => f.write_str("<no logo>"),
            ResolvedLogo::Local(path) => write!(f, "{}", path.display()),
            ResolvedLogo::Remote(url) => f.write_str(url),
        }
    }
}

/// Raw logo bytes ready to be embedded into a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoImage {
    /// Display name, used for the embedded picture's description.
    pub name: String,
    pub bytes: Vec<u8>,
}

impl LogoImage {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Returns true if the hint looks like an absolute http(s) URL.
pub fn is_remote_hint(hint: &str) -> bool {
    let lower = hint.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

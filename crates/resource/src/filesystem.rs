//! Filesystem-based resource provider.
//!
//! In restricted mode every resolved path must stay inside the base
//! directory or one of the extra allowed roots, which blocks hints like
//! `../../../etc/passwd` coming from request data. Unrestricted mode accepts
//! any readable path and is only used for staged logo uploads.

use agenda_traits::{ResourceError, ResourceProvider, SharedResourceData};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

#[derive(Debug)]
pub struct FilesystemResourceProvider {
    base_path: PathBuf,
    /// Canonicalized directories a restricted provider may read from.
    /// Directories that do not exist yet are left out.
    allowed_roots: Vec<PathBuf>,
    restricted: bool,
}

impl FilesystemResourceProvider {
    /// Provider that only serves files below `base_path`.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        let base = base_path.as_ref().to_path_buf();
        Self {
            allowed_roots: base.canonicalize().into_iter().collect(),
            base_path: base,
            restricted: true,
        }
    }

    /// Provider that resolves relative paths against `base_path` but accepts
    /// any location.
    pub fn unrestricted<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            allowed_roots: Vec::new(),
            restricted: false,
        }
    }

    /// Also serves files below `root` (e.g. a configured logo directory
    /// outside the base).
    pub fn with_allowed_root<P: AsRef<Path>>(mut self, root: P) -> Self {
        if let Ok(canonical) = root.as_ref().canonicalize()
            && !self.allowed_roots.contains(&canonical)
        {
            self.allowed_roots.push(canonical);
        }
        self
    }

    /// Resolves `location` against the base, or `None` if it escapes every
    /// allowed root.
    fn resolve(&self, location: &str) -> Option<PathBuf> {
        let full_path = self.base_path.join(location);
        if !self.restricted {
            return Some(full_path);
        }

        if let Ok(canonical) = full_path.canonicalize() {
            return self
                .allowed_roots
                .iter()
                .any(|root| canonical.starts_with(root))
                .then_some(canonical);
        }

        // Nothing to canonicalize (missing file): reject anything that could
        // climb out of the base once it appears.
        let candidate = Path::new(location);
        if candidate.is_absolute()
            || candidate
                .components()
                .any(|c| matches!(c, Component::ParentDir))
        {
            return None;
        }
        Some(full_path)
    }
}

impl ResourceProvider for FilesystemResourceProvider {
    fn load(&self, location: &str) -> Result<SharedResourceData, ResourceError> {
        let full_path = self.resolve(location).ok_or_else(|| {
            ResourceError::NotFound(format!("{location} (outside {})", self.base_path.display()))
        })?;

        std::fs::read(&full_path).map(Arc::new).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResourceError::NotFound(location.to_string())
            } else {
                ResourceError::LoadFailed {
                    location: location.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    fn name(&self) -> &'static str {
        "FilesystemResourceProvider"
    }
}

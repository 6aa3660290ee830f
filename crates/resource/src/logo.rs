//! Logo resolution: turn a loose hint into a usable image reference.
//!
//! Resolution order:
//! 1. empty hint → absent
//! 2. http(s) URL → remote reference, no filesystem access
//! 3. an existing file → that exact file
//! 4. fuzzy match of the hint's base name against image files in the
//!    candidate directories

use agenda_traits::ResourceProvider;
use agenda_types::{LogoImage, ResolvedLogo, is_remote_hint};
use log::{debug, info, warn};
use similar::TextDiff;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Minimum similarity a candidate needs to be accepted.
pub const SIMILARITY_THRESHOLD: f64 = 0.6;

/// Image extensions considered during the fuzzy scan. Matching is
/// case-sensitive.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Name of the subdirectory searched in addition to the base directory.
pub const LOGO_SUBDIR: &str = "logos";

#[derive(Debug, Clone)]
pub struct LogoResolver {
    base_dir: PathBuf,
    search_dirs: Vec<PathBuf>,
    threshold: f64,
}

impl LogoResolver {
    /// Resolver rooted at `base_dir`, scanning `base_dir` and `base_dir/logos`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let search_dirs = vec![base_dir.clone(), base_dir.join(LOGO_SUBDIR)];
        Self {
            base_dir,
            search_dirs,
            threshold: SIMILARITY_THRESHOLD,
        }
    }

    /// Replaces the directories scanned by the fuzzy match, in scan order.
    pub fn with_search_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.search_dirs = dirs;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Resolves `hint` to a logo reference. Never fails; the worst case is
    /// [`ResolvedLogo::Absent`].
    pub fn resolve(&self, hint: &str) -> ResolvedLogo {
        let hint = hint.trim();
        if hint.is_empty() {
            return ResolvedLogo::Absent;
        }
        if is_remote_hint(hint) {
            debug!("Logo hint '{}' is a remote reference", hint);
            return ResolvedLogo::Remote(hint.to_string());
        }

        let exact = self.base_dir.join(hint);
        if exact.is_file() {
            debug!("Logo hint '{}' matched an existing file", hint);
            return ResolvedLogo::Local(exact);
        }

        match self.fuzzy_match(hint) {
            Some((path, score)) => {
                info!(
                    "Fuzzy matched logo '{}' to {} (similarity {:.2})",
                    hint,
                    path.display(),
                    score
                );
                ResolvedLogo::Local(path)
            }
            None => {
                warn!("No logo found for hint '{}'", hint);
                ResolvedLogo::Absent
            }
        }
    }

    /// Best candidate at or above the threshold. The first candidate in scan
    /// order wins a tie.
    fn fuzzy_match(&self, hint: &str) -> Option<(PathBuf, f64)> {
        let target = base_name(Path::new(hint))?;
        let mut best: Option<(PathBuf, f64)> = None;

        for candidate in self.candidates() {
            let Some(name) = base_name(&candidate) else {
                continue;
            };
            let score = similarity(&target, &name);
            if score < self.threshold {
                continue;
            }
            if best.as_ref().is_none_or(|(_, top)| score > *top) {
                best = Some((candidate, score));
            }
        }
        best
    }

    /// Image files directly inside the search directories. Missing or
    /// unreadable directories are skipped.
    fn candidates(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.search_dirs.iter().flat_map(|dir| {
            WalkDir::new(dir)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_file())
                .map(walkdir::DirEntry::into_path)
                .filter(|path| has_image_extension(path))
        })
    }
}

/// Matching-subsequence ratio `2 * matches / (len(a) + len(b))`, compared
/// character by character and case-sensitively. 1.0 for identical names.
pub fn similarity(a: &str, b: &str) -> f64 {
    f64::from(TextDiff::from_chars(a, b).ratio())
}

fn base_name(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext))
}

/// Loads the bytes behind a resolved logo.
///
/// Local references go through `local`, remote ones through `remote`. Any
/// failure is logged and yields `None`, so a broken logo never stops a
/// document from being generated.
pub fn load_logo(
    resolved: &ResolvedLogo,
    local: &dyn ResourceProvider,
    remote: Option<&dyn ResourceProvider>,
) -> Option<LogoImage> {
    let (location, provider) = match resolved {
        ResolvedLogo::Absent => return None,
        ResolvedLogo::Local(path) => (path.to_string_lossy().into_owned(), local),
        ResolvedLogo::Remote(url) => match remote {
            Some(provider) => (url.clone(), provider),
            None => {
                warn!("Remote logo {} ignored: no remote provider configured", url);
                return None;
            }
        },
    };

    match provider.load(&location) {
        Ok(bytes) if bytes.is_empty() => {
            warn!("Logo {} is empty, continuing without logo", location);
            None
        }
        Ok(bytes) => {
            debug!("Loaded {} logo bytes from {} via {}", bytes.len(), location, provider.name());
            Some(LogoImage::new(display_name(&location), bytes.to_vec()))
        }
        Err(e) => {
            warn!("Failed to load logo {}: {}", location, e);
            None
        }
    }
}

fn display_name(location: &str) -> String {
    let trimmed = location.split(['?', '#']).next().unwrap_or(location);
    trimmed
        .rsplit(['/', '\\'])
        .find(|segment| !segment.is_empty())
        .unwrap_or("logo")
        .to_string()
}

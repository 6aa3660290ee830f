//! Runtime configuration, loaded once at startup.
//!
//! Sources are layered in order: built-in defaults, an optional TOML file,
//! then `AGENDA__*` environment variables (`AGENDA__LOGO__SEARCH_ENABLED=true`).

use agenda_resource::logo::SIMILARITY_THRESHOLD;
use agenda_docx::DEFAULT_LOGO_WIDTH_MM;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "AGENDA";

/// Directories searched, in order, for the default template.
pub const TEMPLATE_DIRS: [&str; 3] = ["templates", "src/templates", "assets/templates"];

/// How a finished agenda is handed back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Leave the document in the output directory.
    #[default]
    File,
    /// Copy it to blob storage and return a time-limited link.
    Blob,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgendaConfig {
    /// Root for every relative path below.
    pub base_dir: PathBuf,
    /// Explicit template. When unset the template is discovered under
    /// [`TEMPLATE_DIRS`].
    pub template_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    /// Name outputs `agenda_{timestamp}_{hex}.docx` instead of after the record.
    pub unique_output_names: bool,
    /// Where uploaded logos are staged. Defaults to the system temp directory.
    pub temp_dir: Option<PathBuf>,
    pub delivery: DeliveryMode,
    pub logo: LogoConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoConfig {
    /// Directories scanned for fuzzy matches. Empty means the base directory
    /// and its `logos` subdirectory.
    pub search_dirs: Vec<PathBuf>,
    pub similarity_threshold: f64,
    pub width_mm: f64,
    /// Ask the logo search backend when a record names no logo.
    pub search_enabled: bool,
    /// Fetch logos referenced by URL.
    pub remote_fetch: bool,
    pub http_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: PathBuf,
    pub base_url: Option<String>,
}

impl Default for AgendaConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            template_path: None,
            output_dir: PathBuf::from("output"),
            unique_output_names: false,
            temp_dir: None,
            delivery: DeliveryMode::default(),
            logo: LogoConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            search_dirs: Vec::new(),
            similarity_threshold: SIMILARITY_THRESHOLD,
            width_mm: DEFAULT_LOGO_WIDTH_MM,
            search_enabled: false,
            remote_fetch: true,
            http_timeout_secs: 10,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("storage"),
            base_url: None,
        }
    }
}

impl AgendaConfig {
    /// Loads configuration from defaults, `file` (if given) and the
    /// environment.
    pub fn load(file: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(file) = file {
            builder = builder.add_source(config::File::from(file).required(true));
        }

        // Always layer environment variables on top
        builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"));

        let config: Self = builder.build()?.try_deserialize()?;
        log::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// `path` relative to the base directory, or unchanged when absolute.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.output_dir)
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.resolve(&self.storage.path)
    }

    /// Where uploaded logos are staged: `temp_dir`, or the system temp dir.
    pub fn upload_dir(&self) -> PathBuf {
        match &self.temp_dir {
            Some(dir) => self.resolve(dir),
            None => std::env::temp_dir(),
        }
    }

    pub fn logo_search_dirs(&self) -> Vec<PathBuf> {
        self.logo
            .search_dirs
            .iter()
            .map(|dir| self.resolve(dir))
            .collect()
    }

    /// The configured template, or the first default-named template found
    /// under [`TEMPLATE_DIRS`]. When none exists the first candidate is
    /// returned so the error names a concrete path.
    pub fn template_path(&self) -> PathBuf {
        if let Some(path) = &self.template_path {
            return self.resolve(path);
        }
        let candidates: Vec<PathBuf> = TEMPLATE_DIRS
            .iter()
            .map(|dir| {
                self.base_dir
                    .join(dir)
                    .join(agenda_docx::DEFAULT_TEMPLATE_NAME)
            })
            .collect();
        match candidates.iter().find(|path| path.is_file()) {
            Some(found) => found.clone(),
            None => {
                log::warn!(
                    "No {} found under {}",
                    agenda_docx::DEFAULT_TEMPLATE_NAME,
                    self.base_dir.display()
                );
                candidates[0].clone()
            }
        }
    }
}

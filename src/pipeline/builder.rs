// src/pipeline/builder.rs
use super::config::{AgendaConfig, DeliveryMode};
use super::orchestrator::AgendaPipeline;
use crate::error::PipelineError;
use crate::storage::{BlobStorage, FilesystemBlobStorage};
use agenda_docx::TemplateRenderer;
use agenda_resource::{FilesystemResourceProvider, LogoResolver, MockLogoSearch};
use agenda_traits::{LogoSearch, ResourceProvider};
use std::path::PathBuf;

/// A builder for creating an `AgendaPipeline`.
///
/// Capabilities not supplied explicitly are created from the configuration:
/// an HTTP provider for remote logos (feature `remote`), the mock logo search
/// when search is enabled, and filesystem storage for blob delivery.
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    config: AgendaConfig,
    template_path: Option<PathBuf>,
    remote: Option<Box<dyn ResourceProvider>>,
    search: Option<Box<dyn LogoSearch>>,
    storage: Option<Box<dyn BlobStorage>>,
}

impl PipelineBuilder {
    /// Creates a new `PipelineBuilder` with default settings.
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_config(mut self, config: AgendaConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses this template instead of the configured or discovered one.
    pub fn with_template_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = Some(path.into());
        self
    }

    /// Fetches remote logos through `provider`.
    pub fn with_remote_provider(mut self, provider: Box<dyn ResourceProvider>) -> Self {
        self.remote = Some(provider);
        self
    }

    /// Searches logos with `search`. Search is only consulted when enabled in
    /// the configuration.
    pub fn with_logo_search(mut self, search: Box<dyn LogoSearch>) -> Self {
        self.search = Some(search);
        self
    }

    pub fn with_blob_storage(mut self, storage: Box<dyn BlobStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Consumes the builder and creates the `AgendaPipeline`.
    pub fn build(self) -> Result<AgendaPipeline, PipelineError> {
        let config = self.config;
        let template_path = self
            .template_path
            .unwrap_or_else(|| config.template_path());

        let renderer = TemplateRenderer::new().with_logo_width_mm(config.logo.width_mm);

        let mut resolver = LogoResolver::new(&config.base_dir)
            .with_threshold(config.logo.similarity_threshold);
        // Record hints may only read below the base and the logo directories.
        let mut local = FilesystemResourceProvider::new(&config.base_dir);
        let search_dirs = config.logo_search_dirs();
        if !search_dirs.is_empty() {
            for dir in &search_dirs {
                local = local.with_allowed_root(dir);
            }
            resolver = resolver.with_search_dirs(search_dirs);
        }
        let uploads = FilesystemResourceProvider::unrestricted(config.upload_dir());

        let remote = match self.remote {
            Some(remote) => Some(remote),
            None if config.logo.remote_fetch => default_remote_provider(&config)?,
            None => None,
        };

        let search = match self.search {
            Some(search) => Some(search),
            None if config.logo.search_enabled => {
                Some(Box::new(MockLogoSearch) as Box<dyn LogoSearch>)
            }
            None => None,
        };

        let storage = match (self.storage, config.delivery) {
            (Some(storage), _) => Some(storage),
            (None, DeliveryMode::Blob) => {
                let mut storage = FilesystemBlobStorage::new(config.storage_dir())?;
                if let Some(base_url) = &config.storage.base_url {
                    storage = storage.with_base_url(base_url.clone());
                }
                Some(Box::new(storage) as Box<dyn BlobStorage>)
            }
            (None, DeliveryMode::File) => None,
        };

        log::info!(
            "Agenda pipeline ready: template {}, delivery {:?}, logo search {}",
            template_path.display(),
            config.delivery,
            search.as_ref().map_or("off", |s| s.name())
        );

        Ok(AgendaPipeline {
            local,
            uploads,
            config,
            template_path,
            renderer,
            resolver,
            remote,
            search,
            storage,
        })
    }
}

#[cfg(feature = "remote")]
fn default_remote_provider(
    config: &AgendaConfig,
) -> Result<Option<Box<dyn ResourceProvider>>, PipelineError> {
    let timeout = std::time::Duration::from_secs(config.logo.http_timeout_secs);
    let provider = agenda_resource::HttpResourceProvider::new(timeout)
        .map_err(|e| PipelineError::Config(format!("HTTP client: {e}")))?;
    Ok(Some(Box::new(provider)))
}

#[cfg(not(feature = "remote"))]
fn default_remote_provider(
    _config: &AgendaConfig,
) -> Result<Option<Box<dyn ResourceProvider>>, PipelineError> {
    log::debug!("Built without the `remote` feature; URL logos are skipped");
    Ok(None)
}

// src/pipeline/orchestrator.rs
use super::config::{AgendaConfig, DeliveryMode};
use super::request::{AgendaRequest, Delivery, GeneratedAgenda, LogoUpload};
use crate::error::PipelineError;
use crate::storage::BlobStorage;
use agenda_docx::{StripOutcome, TemplateRenderer, strip_leading_column};
use agenda_resource::{FilesystemResourceProvider, LogoResolver, MockLogoSearch, load_logo};
use agenda_traits::{LogoSearch, LogoSuggestions, ResourceProvider};
use agenda_types::{AgendaRecord, LogoImage, ResolvedLogo, agenda_file_name, attachment_file_name};
use chrono::Utc;
use log::{debug, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

/// Generates agenda documents: resolve logo, render, post-process, deliver.
///
/// Holds no per-request state; one pipeline serves any number of requests.
#[derive(Debug)]
pub struct AgendaPipeline {
    pub(super) config: AgendaConfig,
    pub(super) template_path: PathBuf,
    pub(super) renderer: TemplateRenderer,
    pub(super) resolver: LogoResolver,
    /// Restricted to the base and logo directories; serves record hints.
    pub(super) local: FilesystemResourceProvider,
    /// Serves staged uploads from the temp directory.
    pub(super) uploads: FilesystemResourceProvider,
    pub(super) remote: Option<Box<dyn ResourceProvider>>,
    pub(super) search: Option<Box<dyn LogoSearch>>,
    pub(super) storage: Option<Box<dyn BlobStorage>>,
}

impl AgendaPipeline {
    pub fn config(&self) -> &AgendaConfig {
        &self.config
    }

    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    pub fn has_logo_search(&self) -> bool {
        self.search.is_some()
    }

    /// Generates one agenda.
    ///
    /// Logo problems never fail a request: an unusable logo is dropped with
    /// a warning, and a render that fails with a logo is retried once
    /// without it. Post-processing failures are logged and skipped.
    pub fn generate(&self, request: AgendaRequest) -> Result<GeneratedAgenda, PipelineError> {
        let start = Instant::now();
        let AgendaRequest {
            record,
            upload,
            output_path,
        } = request;

        // The staged upload is deleted when this handle drops at the end of
        // the request.
        let staged = upload.as_ref().and_then(|upload| self.stage_upload(upload));
        let resolved = self.resolve_logo(&record, staged.as_ref());
        let local = if staged.is_some() {
            &self.uploads
        } else {
            &self.local
        };
        let logo = load_logo(&resolved, local, self.remote.as_deref());

        let output_path = output_path.unwrap_or_else(|| self.output_path_for(&record));
        let logo_dropped = self.render_with_fallback(&record, logo.as_ref(), &output_path)?;
        drop(staged);

        let table = match strip_leading_column(&output_path) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!(
                    "Post-processing {} failed, keeping unstripped document: {}",
                    output_path.display(),
                    e
                );
                None
            }
        };
        if let Some(StripOutcome::NoQualifyingTable) = table {
            debug!("No agenda table found in {}", output_path.display());
        }

        let delivery = self.deliver(&output_path)?;
        info!(
            "Generated agenda {} in {:.2?}",
            output_path.display(),
            start.elapsed()
        );

        Ok(GeneratedAgenda {
            attachment_name: attachment_file_name(&record),
            path: output_path,
            logo: resolved,
            logo_dropped,
            table,
            delivery,
        })
    }

    /// Parses a JSON record and generates its agenda.
    pub fn generate_from_json(&self, json: &str) -> Result<GeneratedAgenda, PipelineError> {
        self.generate(AgendaRequest::from_json(json)?)
    }

    /// Looks up logo suggestions for a company, using the mock backend when
    /// none is configured.
    pub fn find_logo(&self, company: &str) -> Result<LogoSuggestions, PipelineError> {
        let result = match &self.search {
            Some(search) => search.find_logo(company),
            None => MockLogoSearch.find_logo(company),
        };
        Ok(result?)
    }

    /// Logo precedence: upload, then the record's `logo_url` / `logo` hint,
    /// then (if enabled) a search by customer name.
    pub fn resolve_logo(&self, record: &AgendaRecord, staged: Option<&NamedTempFile>) -> ResolvedLogo {
        if let Some(file) = staged {
            return ResolvedLogo::Local(file.path().to_path_buf());
        }
        if let Some(hint) = record.logo_hint() {
            let resolved = self.resolver.resolve(hint);
            debug!("Logo hint '{}' resolved to {}", hint, resolved);
            return resolved;
        }
        match &self.search {
            Some(search) if !record.customer.trim().is_empty() => {
                match search.find_logo(&record.customer) {
                    Ok(found) => {
                        debug!("{} suggested {}", search.name(), found.logo_url);
                        ResolvedLogo::Remote(found.logo_url)
                    }
                    Err(e) => {
                        warn!("Logo search for '{}' failed: {}", record.customer, e);
                        ResolvedLogo::Absent
                    }
                }
            }
            _ => ResolvedLogo::Absent,
        }
    }

    fn stage_upload(&self, upload: &LogoUpload) -> Option<NamedTempFile> {
        if !upload.is_usable() {
            warn!(
                "Ignoring uploaded logo '{}' ({}, {} bytes)",
                upload.file_name,
                upload.content_type,
                upload.bytes.len()
            );
            return None;
        }

        let suffix = Path::new(&upload.file_name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let dir = self.config.upload_dir();

        let staged = tempfile::Builder::new()
            .prefix("logo_")
            .suffix(&suffix)
            .tempfile_in(&dir)
            .and_then(|mut file| {
                file.write_all(&upload.bytes)?;
                file.flush()?;
                Ok(file)
            });
        match staged {
            Ok(file) => {
                debug!("Staged uploaded logo at {}", file.path().display());
                Some(file)
            }
            Err(e) => {
                warn!("Could not stage uploaded logo in {}: {}", dir.display(), e);
                None
            }
        }
    }

    /// Renders, retrying once without the logo if rendering with it fails.
    /// Returns whether the logo had to be dropped.
    fn render_with_fallback(
        &self,
        record: &AgendaRecord,
        logo: Option<&LogoImage>,
        output_path: &Path,
    ) -> Result<bool, PipelineError> {
        match self
            .renderer
            .render(record, &self.template_path, logo, output_path)
        {
            Ok(_) => Ok(false),
            Err(e) if logo.is_some() => {
                warn!("Rendering with logo failed, retrying without logo: {}", e);
                self.renderer
                    .render(record, &self.template_path, None, output_path)?;
                Ok(true)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn output_path_for(&self, record: &AgendaRecord) -> PathBuf {
        let name = if self.config.unique_output_names {
            unique_output_name()
        } else {
            agenda_file_name(record)
        };
        self.config.output_dir().join(name)
    }

    fn deliver(&self, output_path: &Path) -> Result<Delivery, PipelineError> {
        match (self.config.delivery, &self.storage) {
            (DeliveryMode::File, _) => Ok(Delivery::File),
            (DeliveryMode::Blob, Some(storage)) => {
                let name = output_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(unique_output_name);
                let stored = storage.upload(&name, output_path)?;
                info!("Uploaded {} via {}", stored.name, storage.name());
                Ok(Delivery::Link(stored))
            }
            (DeliveryMode::Blob, None) => Err(PipelineError::Config(
                "blob delivery selected but no storage is configured".to_string(),
            )),
        }
    }
}

/// `agenda_{YYYYmmdd_HHMMSS}_{8 hex digits}.docx`
pub fn unique_output_name() -> String {
    format!(
        "agenda_{}_{:08x}.docx",
        Utc::now().format("%Y%m%d_%H%M%S"),
        rand::random::<u32>()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineBuilder;
    use agenda_traits::SearchError;

    #[derive(Debug)]
    struct FailingSearch;

    impl LogoSearch for FailingSearch {
        fn find_logo(&self, _company: &str) -> Result<LogoSuggestions, SearchError> {
            Err(SearchError::Backend("quota exceeded".into()))
        }

        fn name(&self) -> &'static str {
            "FailingSearch"
        }
    }

    fn pipeline(base: &Path, search: Option<Box<dyn LogoSearch>>) -> AgendaPipeline {
        let mut config = AgendaConfig {
            base_dir: base.to_path_buf(),
            ..AgendaConfig::default()
        };
        config.logo.remote_fetch = false;
        config.logo.search_enabled = search.is_some();
        let mut builder = PipelineBuilder::new().with_config(config);
        if let Some(search) = search {
            builder = builder.with_logo_search(search);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_unique_output_name_shape() {
        let name = unique_output_name();
        assert!(name.starts_with("agenda_"));
        assert!(name.ends_with(".docx"));
        // agenda_ + 15 timestamp chars + _ + 8 hex + .docx
        assert_eq!(name.len(), 7 + 15 + 1 + 8 + 5);
        assert_ne!(unique_output_name(), unique_output_name());
    }

    #[test]
    fn test_logo_url_beats_logo_and_search() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(dir.path(), Some(Box::new(MockLogoSearch)));
        let record = AgendaRecord {
            customer: "Microsoft".into(),
            logo: Some("acme.png".into()),
            logo_url: Some("https://cdn.example.com/chosen.png".into()),
            ..AgendaRecord::default()
        };
        assert_eq!(
            pipeline.resolve_logo(&record, None),
            ResolvedLogo::Remote("https://cdn.example.com/chosen.png".into())
        );
    }

    #[test]
    fn test_search_used_only_without_hint() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(dir.path(), Some(Box::new(MockLogoSearch)));
        let record = AgendaRecord {
            customer: "Microsoft".into(),
            ..AgendaRecord::default()
        };
        match pipeline.resolve_logo(&record, None) {
            ResolvedLogo::Remote(url) => assert!(url.contains("Microsoft_logo")),
            other => panic!("expected remote logo, got {other:?}"),
        }
    }

    #[test]
    fn test_search_failure_degrades_to_no_logo() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(dir.path(), Some(Box::new(FailingSearch)));
        let record = AgendaRecord {
            customer: "Acme".into(),
            ..AgendaRecord::default()
        };
        assert!(pipeline.resolve_logo(&record, None).is_absent());
    }

    #[test]
    fn test_upload_wins_over_hint() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(dir.path(), None);
        let upload = LogoUpload::new("brand.png", "image/png", vec![1, 2, 3]);
        let staged = pipeline.stage_upload(&upload).unwrap();
        let record = AgendaRecord {
            logo_url: Some("https://cdn.example.com/x.png".into()),
            ..AgendaRecord::default()
        };

        let resolved = pipeline.resolve_logo(&record, Some(&staged));
        assert_eq!(resolved, ResolvedLogo::Local(staged.path().to_path_buf()));
        assert!(staged.path().to_string_lossy().ends_with(".png"));

        let path = staged.path().to_path_buf();
        drop(staged);
        assert!(!path.exists());
    }

    #[test]
    fn test_non_image_upload_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(dir.path(), None);
        let upload = LogoUpload::new("notes.txt", "text/plain", b"hello".to_vec());
        assert!(pipeline.stage_upload(&upload).is_none());
    }

    #[test]
    fn test_find_logo_without_backend_uses_mock() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(dir.path(), None);
        assert!(pipeline.find_logo("apple").unwrap().logo_url.contains("Apple"));
        assert!(matches!(
            pipeline.find_logo(""),
            Err(PipelineError::Search(SearchError::MissingCompany))
        ));
    }
}

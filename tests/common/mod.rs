pub mod docx_assertions;
pub mod fixtures;

use agenda_builder::{AgendaConfig, AgendaPipeline, PipelineBuilder, PipelineError};
use agenda_docx::{DOCUMENT_PART, DocxPackage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around a generated DOCX with helper methods
pub struct GeneratedDocx {
    pub path: PathBuf,
    pub package: DocxPackage,
}

impl GeneratedDocx {
    pub fn open(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            path: path.to_path_buf(),
            package: DocxPackage::open(path)?,
        })
    }

    pub fn document_xml(&self) -> String {
        self.package.xml_part(DOCUMENT_PART).unwrap_or_default()
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.package.has_part(name)
    }
}

/// A scratch base directory holding the bundled template under `templates/`.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = tempfile::tempdir().expect("temp dir");
        agenda_builder::write_default_template(
            &dir.path()
                .join("templates")
                .join(agenda_docx::DEFAULT_TEMPLATE_NAME),
        )
        .expect("default template");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Configuration rooted at the workspace, with network access disabled.
    pub fn config(&self) -> AgendaConfig {
        let mut config = AgendaConfig {
            base_dir: self.path().to_path_buf(),
            ..AgendaConfig::default()
        };
        config.logo.remote_fetch = false;
        config
    }

    pub fn pipeline(&self) -> AgendaPipeline {
        self.pipeline_with(self.config())
            .expect("pipeline should build")
    }

    pub fn pipeline_with(&self, config: AgendaConfig) -> Result<AgendaPipeline, PipelineError> {
        PipelineBuilder::new().with_config(config).build()
    }

    /// Writes `bytes` at `relative` inside the workspace.
    pub fn write_file(&self, relative: &str, bytes: &[u8]) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("parent dir");
        }
        fs::write(&path, bytes).expect("write fixture");
        path
    }
}

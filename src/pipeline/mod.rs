//! Agenda generation pipeline orchestration.
//!
//! - [`PipelineBuilder`]: fluent builder wiring configuration and capabilities
//! - [`AgendaPipeline`]: resolve logo, render, post-process, deliver
//! - [`AgendaConfig`]: layered configuration (defaults, TOML, environment)
//!
//! # Example
//!
//! ```ignore
//! use agenda_builder::{AgendaConfig, PipelineBuilder};
//!
//! let pipeline = PipelineBuilder::new()
//!     .with_config(AgendaConfig::load(None)?)
//!     .build()?;
//!
//! let agenda = pipeline.generate_from_json(&std::fs::read_to_string("data.json")?)?;
//! println!("{}", agenda.path.display());
//! ```

mod builder;
pub mod config;
mod orchestrator;
pub mod request;

pub use builder::PipelineBuilder;
pub use config::{AgendaConfig, DeliveryMode, LogoConfig, StorageConfig};
pub use orchestrator::{AgendaPipeline, unique_output_name};
pub use request::{AgendaRequest, Delivery, GeneratedAgenda, LogoUpload};

//! Fills a DOCX template with an agenda record.

use crate::error::DocxError;
use crate::inline_image::{EmbeddedImage, InlineImage, embed_image};
use crate::package::{DOCUMENT_PART, DocxPackage};
use crate::preprocess::preprocess;
use agenda_types::{AgendaRecord, LogoImage};
use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderErrorReason,
};
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Display width of an embedded logo.
pub const DEFAULT_LOGO_WIDTH_MM: f64 = 50.0;

/// Context key the logo is rendered from.
pub const LOGO_KEY: &str = "logo";

/// `{{image logo}}`: emits an inline picture for an image context value and
/// nothing for anything else (the empty string used when no logo exists).
fn image_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let param = h
        .param(0)
        .ok_or(RenderErrorReason::ParamNotFoundForIndex("image", 0))?;
    if let Value::Object(_) = param.value() {
        let image: InlineImage = serde_json::from_value(param.value().clone())
            .map_err(|e| RenderErrorReason::Other(format!("invalid image value: {e}")))?;
        out.write(&image.to_run_xml())?;
    }
    Ok(())
}

fn escape_xml(text: &str) -> String {
    quick_xml::escape::escape(text).into_owned()
}

/// Renders agenda templates. Stateless apart from layout settings, so one
/// renderer can serve any number of requests.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    logo_width_mm: f64,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self {
            logo_width_mm: DEFAULT_LOGO_WIDTH_MM,
        }
    }
}

impl TemplateRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logo_width_mm(mut self, width_mm: f64) -> Self {
        self.logo_width_mm = width_mm;
        self
    }

    /// Renders `template_path` with `record` and writes the result to
    /// `output_path`, replacing any existing file.
    ///
    /// Nothing is written unless rendering succeeds.
    pub fn render(
        &self,
        record: &AgendaRecord,
        template_path: &Path,
        logo: Option<&LogoImage>,
        output_path: &Path,
    ) -> Result<PathBuf, DocxError> {
        if !template_path.is_file() {
            return Err(DocxError::TemplateNotFound(template_path.to_path_buf()));
        }
        let package = DocxPackage::open(template_path)?;
        let rendered = self.render_package(package, record, logo)?;

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        rendered.save(output_path)?;
        info!(
            "Rendered agenda for '{}' to {}",
            record.customer,
            output_path.display()
        );
        Ok(output_path.to_path_buf())
    }

    /// Renders an in-memory package.
    pub fn render_package(
        &self,
        mut package: DocxPackage,
        record: &AgendaRecord,
        logo: Option<&LogoImage>,
    ) -> Result<DocxPackage, DocxError> {
        let context = build_context(record)?;
        // Media is added only once a part actually places the logo.
        let mut embedded: Option<EmbeddedImage> = None;

        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(escape_xml);
        registry.register_helper("image", Box::new(image_helper));

        let mut drawing_id = 1;
        for part in template_parts(&package) {
            let xml = preprocess(&package.xml_part(&part)?);
            if !xml.contains("{{") {
                continue;
            }

            let mut part_context = context.clone();
            if let Some(logo) = logo.filter(|_| xml.contains("{{image")) {
                let image = match embedded.take() {
                    Some(image) => image,
                    None => embed_image(&mut package, logo, self.logo_width_mm)?,
                };
                let value = link_logo(&mut package, &image, &part, drawing_id)?;
                embedded = Some(image);
                drawing_id += 1;
                set_logo(&mut part_context, value);
            }

            registry
                .register_template_string(&part, &xml)
                .map_err(|e| DocxError::TemplateSyntax {
                    part: part.clone(),
                    message: e.to_string(),
                })?;
            let rendered = registry
                .render(&part, &part_context)
                .map_err(|e| DocxError::Render {
                    part: part.clone(),
                    message: e.to_string(),
                })?;
            debug!("Rendered part {} ({} bytes)", part, rendered.len());
            package.set_part(&part, rendered);
        }
        Ok(package)
    }
}

/// The Handlebars context for a record: every field of the record, with the
/// logo slot set to an empty string.
pub fn build_context(record: &AgendaRecord) -> Result<Value, DocxError> {
    let mut context = serde_json::to_value(record).map_err(|e| DocxError::Render {
        part: DOCUMENT_PART.to_string(),
        message: e.to_string(),
    })?;
    set_logo(&mut context, Value::String(String::new()));
    Ok(context)
}

fn set_logo(context: &mut Value, value: Value) {
    if let Value::Object(map) = context {
        map.insert(LOGO_KEY.to_string(), value);
    }
}

fn link_logo(
    package: &mut DocxPackage,
    image: &EmbeddedImage,
    part: &str,
    drawing_id: u32,
) -> Result<Value, DocxError> {
    let inline = image.link_from(package, part, drawing_id)?;
    serde_json::to_value(inline).map_err(|e| DocxError::Render {
        part: part.to_string(),
        message: e.to_string(),
    })
}

/// Parts that may hold placeholders: the main document, headers and footers.
fn template_parts(package: &DocxPackage) -> Vec<String> {
    package
        .part_names()
        .filter(|name| is_template_part(name))
        .map(str::to_string)
        .collect()
}

fn is_template_part(name: &str) -> bool {
    if name == DOCUMENT_PART {
        return true;
    }
    name.strip_prefix("word/")
        .and_then(|file| file.strip_suffix(".xml"))
        .is_some_and(|stem| {
            ["header", "footer"].iter().any(|kind| {
                stem.strip_prefix(kind)
                    .is_some_and(|n| n.chars().all(|c| c.is_ascii_digit()))
            })
        })
}

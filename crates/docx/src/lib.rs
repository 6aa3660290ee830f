//! DOCX support for the agenda builder: package I/O, template rendering with
//! Handlebars, inline logo images and agenda table post-processing.

pub mod default_template;
pub mod error;
pub mod inline_image;
pub mod package;
pub mod preprocess;
pub mod render;
pub mod table;

#[cfg(test)]
mod test_support;

pub use default_template::{DEFAULT_TEMPLATE_NAME, default_template_package, write_default_template};
pub use error::DocxError;
pub use inline_image::{EMU_PER_MM, EmbeddedImage, InlineImage, embed_image};
pub use package::{DOCUMENT_PART, DocxPackage};
pub use render::{DEFAULT_LOGO_WIDTH_MM, TemplateRenderer, build_context};
pub use table::{
    AGENDA_TABLE_CAPTION, STRIPPED_COLUMN_WIDTHS, StripOutcome, strip_document_xml,
    strip_leading_column, strip_package,
};

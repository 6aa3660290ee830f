//! Inline pictures: adding image media to a package and rendering the
//! `<w:drawing>` run that shows it.

use crate::error::DocxError;
use crate::package::{DocxPackage, IMAGE_RELATIONSHIP, relative_target};
use agenda_types::LogoImage;
use image::{ImageFormat, ImageReader};
use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// English Metric Units per millimetre.
pub const EMU_PER_MM: f64 = 36_000.0;

/// An image stored in the package's media folder, not yet referenced by any
/// part.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedImage {
    /// Package part name, e.g. `word/media/logo1.png`.
    pub media_part: String,
    pub name: String,
    pub width_emu: u64,
    pub height_emu: u64,
}

impl EmbeddedImage {
    /// Links the image from `source_part` and returns the context value the
    /// `image` helper renders.
    pub fn link_from(
        &self,
        package: &mut DocxPackage,
        source_part: &str,
        drawing_id: u32,
    ) -> Result<InlineImage, DocxError> {
        let target = relative_target(source_part, &self.media_part);
        let rel_id = package.add_relationship(source_part, IMAGE_RELATIONSHIP, &target)?;
        Ok(InlineImage {
            rel_id,
            drawing_id,
            name: self.name.clone(),
            width_emu: self.width_emu,
            height_emu: self.height_emu,
        })
    }
}

/// Everything needed to emit one inline picture. Serialized into the
/// template context under the image's key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineImage {
    pub rel_id: String,
    pub drawing_id: u32,
    pub name: String,
    pub width_emu: u64,
    pub height_emu: u64,
}

impl InlineImage {
    /// The run markup for this picture. It closes the text run the
    /// placeholder lives in and reopens an empty one afterwards.
    pub fn to_run_xml(&self) -> String {
        let name = escape(self.name.as_str());
        format!(
            concat!(
                r#"</w:t></w:r><w:r><w:drawing>"#,
                r#"<wp:inline distT="0" distB="0" distL="0" distR="0">"#,
                r#"<wp:extent cx="{cx}" cy="{cy}"/>"#,
                r#"<wp:docPr id="{id}" name="Picture {id}" descr="{name}"/>"#,
                r#"<wp:cNvGraphicFramePr><a:graphicFrameLocks xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" noChangeAspect="1"/></wp:cNvGraphicFramePr>"#,
                r#"<a:graphic xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">"#,
                r#"<a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
                r#"<pic:pic xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
                r#"<pic:nvPicPr><pic:cNvPr id="0" name="{name}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
                r#"<pic:blipFill><a:blip r:embed="{rel}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
                r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
                r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr>"#,
                r#"</pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r>"#,
                r#"<w:r><w:t xml:space="preserve">"#
            ),
            cx = self.width_emu,
            cy = self.height_emu,
            id = self.drawing_id,
            name = name,
            rel = self.rel_id,
        )
    }
}

/// Stores `logo` under `word/media/` and computes its size for the given
/// display width, keeping the aspect ratio.
///
/// Only png, jpeg and gif are accepted; anything else, or bytes that fail to
/// decode, is a [`DocxError::Image`].
pub fn embed_image(
    package: &mut DocxPackage,
    logo: &LogoImage,
    width_mm: f64,
) -> Result<EmbeddedImage, DocxError> {
    let format = image::guess_format(&logo.bytes)
        .map_err(|e| DocxError::Image(format!("{}: {}", logo.name, e)))?;
    let (extension, content_type) = match format {
        ImageFormat::Png => ("png", "image/png"),
        ImageFormat::Jpeg => ("jpeg", "image/jpeg"),
        ImageFormat::Gif => ("gif", "image/gif"),
        other => {
            return Err(DocxError::Image(format!(
                "{}: unsupported image format {:?}",
                logo.name, other
            )));
        }
    };

    let (width_px, height_px) = ImageReader::with_format(Cursor::new(&logo.bytes), format)
        .into_dimensions()
        .map_err(|e| DocxError::Image(format!("{}: {}", logo.name, e)))?;
    if width_px == 0 || height_px == 0 {
        return Err(DocxError::Image(format!("{}: image has no pixels", logo.name)));
    }

    let width_emu = (width_mm * EMU_PER_MM).round() as u64;
    let height_emu = width_emu * u64::from(height_px) / u64::from(width_px);

    let media_part = (1..)
        .map(|n| format!("word/media/logo{n}.{extension}"))
        .find(|name| !package.has_part(name))
        .unwrap_or_else(|| format!("word/media/logo.{extension}"));
    package.set_part(&media_part, logo.bytes.clone());
    package.ensure_default_content_type(extension, content_type)?;

    log::debug!(
        "Embedded logo {} as {} ({}x{} px)",
        logo.name,
        media_part,
        width_px,
        height_px
    );
    Ok(EmbeddedImage {
        media_part,
        name: logo.name.clone(),
        width_emu,
        height_emu,
    })
}

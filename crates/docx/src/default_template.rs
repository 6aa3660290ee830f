//! The agenda template bundled with the crate.
//!
//! Generated in code rather than shipped as a binary so the markup stays
//! reviewable. Layout: a heading table with the logo, title, customer and
//! date; the summary; primary and supporting attendees; and the agenda table
//! (marker, time, topic/owner, description) tagged with the `agenda` caption.

use crate::error::DocxError;
use crate::package::{CONTENT_TYPES_PART, DOCUMENT_PART, DocxPackage};
use crate::table::AGENDA_TABLE_CAPTION;
use std::fs;
use std::path::Path;

/// File name the template is looked up under.
pub const DEFAULT_TEMPLATE_NAME: &str = "DATE-CUST-TOPICAgenda.docx";

/// Namespace declarations for WordprocessingML parts. The renderer's inline
/// images rely on the `r` and `wp` prefixes being bound here.
pub const DOCUMENT_NAMESPACES: &str = concat!(
    r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" "#,
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture""#
);

const CONTENT_TYPES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"</Types>"#
);

const PACKAGE_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"</Relationships>"#
);

const DOCUMENT_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"></Relationships>"#
);

/// Agenda table grid before the marker column is stripped, in twips.
const AGENDA_GRID: [u32; 4] = [720, 1440, 3600, 4320];

/// Builds the bundled template in memory.
pub fn default_template_package() -> DocxPackage {
    let mut package = DocxPackage::default();
    package.set_part(CONTENT_TYPES_PART, CONTENT_TYPES);
    package.set_part("_rels/.rels", PACKAGE_RELS);
    package.set_part(DOCUMENT_PART, wrap_body(&default_body()));
    package.set_part("word/_rels/document.xml.rels", DOCUMENT_RELS);
    package
}

/// Writes the bundled template to `path`, creating parent directories.
pub fn write_default_template(path: &Path) -> Result<(), DocxError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    default_template_package().save(path)?;
    log::info!("Wrote default agenda template to {}", path.display());
    Ok(())
}

/// Wraps body content into a complete `word/document.xml`.
pub fn wrap_body(body: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\n",
            r#"<w:document {}><w:body>{}"#,
            r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/>"#,
            r#"<w:pgMar w:top="1080" w:right="1080" w:bottom="1080" w:left="1080" w:header="708" w:footer="708" w:gutter="0"/>"#,
            r#"</w:sectPr></w:body></w:document>"#
        ),
        DOCUMENT_NAMESPACES, body
    )
}

fn default_body() -> String {
    let mut body = String::new();
    body.push_str(&heading_table());
    body.push_str(&paragraph(&[run("{{summary}}", false)]));
    body.push_str(&attendee_section("Primary attendees", "primaries"));
    body.push_str(&attendee_section("Supporting attendees", "supporting"));
    body.push_str(&paragraph(&[run("Agenda", true)]));
    body.push_str(&agenda_table());
    body.push_str(&paragraph(&[]));
    body
}

fn heading_table() -> String {
    let logo_cell = cell(2880, &[paragraph(&[run("{{image logo}}", false)])]);
    let title_cell = cell(
        7200,
        &[
            paragraph(&[run("{{title}}", true)]),
            paragraph(&[run("{{customer}}", false)]),
            paragraph(&[run("{{date}}", false)]),
        ],
    );
    format!(
        concat!(
            r#"<w:tbl><w:tblPr><w:tblW w:w="10080" w:type="dxa"/></w:tblPr>"#,
            r#"<w:tblGrid><w:gridCol w:w="2880"/><w:gridCol w:w="7200"/></w:tblGrid>"#,
            "<w:tr>{}{}</w:tr></w:tbl>"
        ),
        logo_cell, title_cell
    )
}

fn attendee_section(heading: &str, list: &str) -> String {
    [
        paragraph(&[run(heading, true)]),
        paragraph(&[run(&format!("{{{{p:#each {list}}}}}"), false)]),
        paragraph(&[run("{{name}}", true), run(", {{role}}", false)]),
        paragraph(&[run("{{p:/each}}", false)]),
    ]
    .concat()
}

fn agenda_table() -> String {
    let grid: String = AGENDA_GRID
        .iter()
        .map(|w| format!(r#"<w:gridCol w:w="{w}"/>"#))
        .collect();
    let header = row(&[
        vec![paragraph(&[])],
        vec![paragraph(&[run("Time", true)])],
        vec![paragraph(&[run("Topic", true)])],
        vec![paragraph(&[run("Description", true)])],
    ]);
    let open = row(&[vec![paragraph(&[run("{{tr:#each agenda_items}}", false)])]]);
    let item = row(&[
        vec![paragraph(&[run("\u{2022}", false)])],
        vec![paragraph(&[run("{{time}}", false)])],
        vec![
            paragraph(&[run("{{topic}}", true)]),
            paragraph(&[run("{{owner}}", false)]),
        ],
        vec![paragraph(&[run("{{description}}", false)])],
    ]);
    let close = row(&[vec![paragraph(&[run("{{tr:/each}}", false)])]]);

    format!(
        concat!(
            r#"<w:tbl><w:tblPr><w:tblW w:w="10080" w:type="dxa"/>"#,
            r#"<w:tblBorders><w:insideH w:val="single" w:sz="4" w:space="0" w:color="auto"/></w:tblBorders>"#,
            r#"<w:tblCaption w:val="{}"/></w:tblPr>"#,
            "<w:tblGrid>{}</w:tblGrid>{}{}{}{}</w:tbl>"
        ),
        AGENDA_TABLE_CAPTION, grid, header, open, item, close
    )
}

/// A row whose cells take the agenda grid widths in order.
fn row(cells: &[Vec<String>]) -> String {
    let cells: String = cells
        .iter()
        .zip(AGENDA_GRID)
        .map(|(paragraphs, width)| cell(width, paragraphs))
        .collect();
    format!("<w:tr>{cells}</w:tr>")
}

fn cell(width: u32, paragraphs: &[String]) -> String {
    format!(
        r#"<w:tc><w:tcPr><w:tcW w:w="{width}" w:type="dxa"/></w:tcPr>{}</w:tc>"#,
        paragraphs.concat()
    )
}

fn paragraph(runs: &[String]) -> String {
    format!("<w:p>{}</w:p>", runs.concat())
}

fn run(text: &str, bold: bool) -> String {
    let props = if bold { "<w:rPr><w:b/></w:rPr>" } else { "" };
    format!(r#"<w:r>{props}<w:t xml:space="preserve">{text}</w:t></w:r>"#)
}

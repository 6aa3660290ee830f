//! Fixtures shared by the unit tests of this crate.

use crate::default_template::{default_template_package, wrap_body};
use crate::package::{DOCUMENT_PART, DocxPackage};
use agenda_types::{AgendaItem, AgendaRecord, Attendee};
use image::{ImageFormat, RgbImage};
use std::io::Cursor;

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    RgbImage::new(width, height)
        .write_to(&mut bytes, ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

pub fn sample_record() -> AgendaRecord {
    AgendaRecord {
        customer: "Acme".into(),
        date: "2024-01-01".into(),
        title: "Kickoff".into(),
        summary: "Project kickoff".into(),
        primaries: vec![Attendee {
            name: "Alice".into(),
            role: "PM".into(),
        }],
        supporting: vec![Attendee {
            name: "Bob".into(),
            role: "Engineer".into(),
        }],
        agenda_items: vec![
            AgendaItem {
                time: "09:00".into(),
                owner: "Alice".into(),
                topic: "Intro".into(),
                description: "Welcome".into(),
            },
            AgendaItem {
                time: "10:00".into(),
                owner: "Bob".into(),
                topic: "Wrap-up".into(),
                description: "Next steps".into(),
            },
        ],
        ..AgendaRecord::default()
    }
}

/// The bundled template with its document body replaced.
pub fn package_with_document(body: &str) -> DocxPackage {
    let mut package = default_template_package();
    package.set_part(DOCUMENT_PART, wrap_body(body));
    package
}

/// A table with one text cell per entry, each cell carrying a width, and a
/// grid as wide as the widest row.
pub fn table_xml<R: AsRef<[&'static str]>>(caption: Option<&str>, rows: &[R]) -> String {
    const WIDTHS: [u32; 4] = [720, 1440, 3600, 4320];
    let columns = rows.iter().map(|r| r.as_ref().len()).max().unwrap_or(0);
    let grid: String = WIDTHS
        .iter()
        .cycle()
        .take(columns)
        .map(|w| format!(r#"<w:gridCol w:w="{w}"/>"#))
        .collect();
    let caption = caption
        .map(|c| format!(r#"<w:tblCaption w:val="{c}"/>"#))
        .unwrap_or_default();
    let body: String = rows
        .iter()
        .map(|r| {
            let cells: String = r
                .as_ref()
                .iter()
                .zip(WIDTHS.iter().cycle())
                .map(|(text, w)| {
                    format!(
                        r#"<w:tc><w:tcPr><w:tcW w:w="{w}" w:type="dxa"/></w:tcPr><w:p><w:r><w:t>{text}</w:t></w:r></w:p></w:tc>"#
                    )
                })
                .collect();
            format!("<w:tr>{cells}</w:tr>")
        })
        .collect();
    format!("<w:tbl><w:tblPr>{caption}</w:tblPr><w:tblGrid>{grid}</w:tblGrid>{body}</w:tbl>")
}

use agenda_docx::default_template::{default_template_package, wrap_body};
use agenda_docx::{DOCUMENT_PART, DocxPackage};
use image::{ImageFormat, RgbImage};
use serde_json::{Value, json};
use std::io::Cursor;

/// The record used by most end-to-end tests.
pub fn sample_record() -> Value {
    json!({
        "customer": "Acme",
        "date": "2024-01-01",
        "title": "Kickoff",
        "summary": "Project kickoff with the Acme team",
        "primaries": [
            { "name": "Alice Smith", "role": "Project Manager" }
        ],
        "supporting": [
            { "name": "Bob Jones", "role": "Engineer" },
            { "name": "Carol White", "role": "Designer" }
        ],
        "agenda_items": [
            { "time": "09:00", "owner": "Alice Smith", "topic": "Introductions", "description": "Meet the team" },
            { "time": "10:00", "owner": "Bob Jones", "topic": "Architecture", "description": "Walk through the design" }
        ]
    })
}

/// `sample_record` with some fields replaced.
pub fn record_with(overrides: Value) -> String {
    let mut record = sample_record();
    if let (Some(target), Some(extra)) = (record.as_object_mut(), overrides.as_object()) {
        for (key, value) in extra {
            target.insert(key.clone(), value.clone());
        }
    }
    record.to_string()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]))
        .write_to(&mut bytes, ImageFormat::Png)
        .expect("encode png");
    bytes.into_inner()
}

/// A template whose document body is `body`.
pub fn template_with_body(body: &str) -> DocxPackage {
    let mut package = default_template_package();
    package.set_part(DOCUMENT_PART, wrap_body(body));
    package
}

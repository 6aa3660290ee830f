//! Reading and writing the zip container behind a `.docx` file.
//!
//! Entries are kept in archive order and held fully in memory; agenda
//! templates are small.

use crate::error::DocxError;
use regex::Regex;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;
use std::sync::LazyLock;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const DOCUMENT_PART: &str = "word/document.xml";
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
pub const IMAGE_RELATIONSHIP: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

const EMPTY_RELATIONSHIPS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"></Relationships>"#
);

static RELATIONSHIP_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"Id="rId(\d+)""#).expect("valid regex"));

#[derive(Debug, Clone)]
struct PackageEntry {
    name: String,
    data: Vec<u8>,
}

/// An opened DOCX package.
#[derive(Debug, Clone, Default)]
pub struct DocxPackage {
    entries: Vec<PackageEntry>,
}

impl DocxPackage {
    /// Opens a package from disk and checks that it has a main document part.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DocxError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocxError> {
        Self::from_reader(Cursor::new(bytes))
    }

    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self, DocxError> {
        let mut archive = ZipArchive::new(reader)?;
        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            entries.push(PackageEntry { name, data });
        }

        let package = Self { entries };
        if package.part(DOCUMENT_PART).is_none() {
            return Err(DocxError::MissingPart(DOCUMENT_PART.to_string()));
        }
        Ok(package)
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.data.as_slice())
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.part(name).is_some()
    }

    /// Returns an XML part as text.
    pub fn xml_part(&self, name: &str) -> Result<String, DocxError> {
        let data = self
            .part(name)
            .ok_or_else(|| DocxError::MissingPart(name.to_string()))?;
        String::from_utf8(data.to_vec()).map_err(|_| DocxError::Encoding(name.to_string()))
    }

    /// Inserts or replaces a part. New parts are appended after existing ones.
    pub fn set_part(&mut self, name: &str, data: impl Into<Vec<u8>>) {
        let data = data.into();
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.data = data,
            None => self.entries.push(PackageEntry {
                name: name.to_string(),
                data,
            }),
        }
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Writes the package to `path`, replacing any existing file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), DocxError> {
        let file = File::create(path.as_ref())?;
        self.write_to(file)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DocxError> {
        Ok(self.write_to(Cursor::new(Vec::new()))?.into_inner())
    }

    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<W, DocxError> {
        let mut zip = ZipWriter::new(writer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for entry in &self.entries {
            zip.start_file(entry.name.as_str(), options)?;
            zip.write_all(&entry.data)?;
        }
        Ok(zip.finish()?)
    }

    /// Adds a relationship from `source_part` to `target` and returns its id.
    ///
    /// The relationships part is created when the source has none yet.
    pub fn add_relationship(
        &mut self,
        source_part: &str,
        rel_type: &str,
        target: &str,
    ) -> Result<String, DocxError> {
        let rels_name = rels_part_name(source_part);
        let rels = if self.has_part(&rels_name) {
            self.xml_part(&rels_name)?
        } else {
            EMPTY_RELATIONSHIPS.to_string()
        };

        let next_id = RELATIONSHIP_ID
            .captures_iter(&rels)
            .filter_map(|caps| caps[1].parse::<u32>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        let rel_id = format!("rId{next_id}");
        let relationship = format!(
            r#"<Relationship Id="{rel_id}" Type="{rel_type}" Target="{}"/>"#,
            quick_xml::escape::escape(target)
        );

        let updated = insert_before_close(&rels, "</Relationships>", &relationship)
            .ok_or_else(|| DocxError::Xml(format!("'{rels_name}' has no </Relationships>")))?;
        self.set_part(&rels_name, updated);
        Ok(rel_id)
    }

    /// Registers a default content type for a file extension if the package
    /// does not declare one yet.
    pub fn ensure_default_content_type(
        &mut self,
        extension: &str,
        content_type: &str,
    ) -> Result<(), DocxError> {
        let types = self.xml_part(CONTENT_TYPES_PART)?;
        let declared = types
            .to_ascii_lowercase()
            .contains(&format!(r#"extension="{}""#, extension.to_ascii_lowercase()));
        if declared {
            return Ok(());
        }

        let default = format!(r#"<Default Extension="{extension}" ContentType="{content_type}"/>"#);
        let updated = insert_before_close(&types, "</Types>", &default)
            .ok_or_else(|| DocxError::Xml(format!("'{CONTENT_TYPES_PART}' has no </Types>")))?;
        self.set_part(CONTENT_TYPES_PART, updated);
        Ok(())
    }
}

/// `word/document.xml` → `word/_rels/document.xml.rels`
pub fn rels_part_name(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None => format!("_rels/{part}.rels"),
    }
}

/// Target of `target_part` as seen from a relationship owned by `source_part`.
pub fn relative_target(source_part: &str, target_part: &str) -> String {
    let dir = source_part.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
    match target_part.strip_prefix(dir).and_then(|rest| rest.strip_prefix('/')) {
        Some(relative) if !dir.is_empty() => relative.to_string(),
        _ => format!("/{target_part}"),
    }
}

fn insert_before_close(xml: &str, closing_tag: &str, fragment: &str) -> Option<String> {
    let at = xml.rfind(closing_tag)?;
    let mut updated = String::with_capacity(xml.len() + fragment.len());
    updated.push_str(&xml[..at]);
    updated.push_str(fragment);
    updated.push_str(&xml[at..]);
    Some(updated)
}

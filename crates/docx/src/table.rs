//! Agenda table post-processing: drops the leading marker column and fixes
//! the widths of the remaining columns.
//!
//! The document is scanned once with `quick-xml`, recording the byte span of
//! every table, row, cell, cell width and grid column. Edits are then spliced
//! into the original text back to front, so untouched markup is preserved
//! byte for byte.

use crate::error::DocxError;
use crate::package::{DOCUMENT_PART, DocxPackage};
use log::{debug, info};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event as XmlEvent};
use std::ops::Range;
use std::path::Path;

/// Caption (`<w:tblCaption w:val="agenda"/>`) marking the table to strip.
pub const AGENDA_TABLE_CAPTION: &str = "agenda";

/// Widths, in twips, applied to the three columns left after stripping.
pub const STRIPPED_COLUMN_WIDTHS: [u32; 3] = [1440, 3600, 5040];

/// Rows with fewer cells than this are left alone.
pub const MIN_CELLS_TO_STRIP: usize = 4;

/// What a strip pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripOutcome {
    /// The table at `table_index` (document order) lost its first column in
    /// `rows` rows.
    Stripped { table_index: usize, rows: usize },
    /// No tagged table and no table with more than one row.
    NoQualifyingTable,
    /// The target table has no row with enough cells.
    AlreadyNarrow,
}

impl StripOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, StripOutcome::Stripped { .. })
    }
}

/// Strips the agenda table of the document at `path`, rewriting the file
/// only when something changed.
pub fn strip_leading_column(path: &Path) -> Result<StripOutcome, DocxError> {
    let mut package = DocxPackage::open(path)?;
    let outcome = strip_package(&mut package)?;
    if outcome.changed() {
        package.save(path)?;
        info!("Stripped leading agenda column in {}", path.display());
    } else {
        debug!("Left {} untouched: {:?}", path.display(), outcome);
    }
    Ok(outcome)
}

pub fn strip_package(package: &mut DocxPackage) -> Result<StripOutcome, DocxError> {
    let xml = package.xml_part(DOCUMENT_PART)?;
    let (updated, outcome) = strip_document_xml(&xml)?;
    if outcome.changed() {
        package.set_part(DOCUMENT_PART, updated);
    }
    Ok(outcome)
}

/// Works on the text of `word/document.xml`. The returned text equals the
/// input unless the outcome is [`StripOutcome::Stripped`].
pub fn strip_document_xml(xml: &str) -> Result<(String, StripOutcome), DocxError> {
    let tables = scan_tables(xml)?;
    let Some(table_index) = select_target(&tables) else {
        return Ok((xml.to_string(), StripOutcome::NoQualifyingTable));
    };
    let table = &tables[table_index];

    let mut edits: Vec<(Range<usize>, String)> = Vec::new();
    let mut rows = 0;
    for row in table.rows.iter().filter(|row| row.cells.len() >= MIN_CELLS_TO_STRIP) {
        edits.push((row.cells[0].span.clone(), String::new()));
        for (cell, width) in row.cells[1..].iter().zip(STRIPPED_COLUMN_WIDTHS) {
            edits.push(cell.width_edit(width));
        }
        rows += 1;
    }
    if rows == 0 {
        return Ok((xml.to_string(), StripOutcome::AlreadyNarrow));
    }

    if table.grid_cols.len() >= MIN_CELLS_TO_STRIP {
        edits.push((table.grid_cols[0].clone(), String::new()));
        for (span, width) in table.grid_cols[1..].iter().zip(STRIPPED_COLUMN_WIDTHS) {
            edits.push((span.clone(), format!(r#"<w:gridCol w:w="{width}"/>"#)));
        }
    }

    let mut updated = xml.to_string();
    edits.sort_by(|a, b| b.0.start.cmp(&a.0.start));
    for (span, replacement) in edits {
        updated.replace_range(span, &replacement);
    }
    debug!("Stripped table #{} ({} rows)", table_index, rows);
    Ok((updated, StripOutcome::Stripped { table_index, rows }))
}

/// Tagged table first, otherwise the first table with more than one row.
fn select_target(tables: &[TableScan]) -> Option<usize> {
    tables
        .iter()
        .position(|table| table.tagged)
        .or_else(|| tables.iter().position(|table| table.rows.len() > 1))
}

#[derive(Debug, Default)]
struct TableScan {
    tagged: bool,
    rows: Vec<RowScan>,
    grid_cols: Vec<Range<usize>>,
    open_cells: usize,
}

#[derive(Debug, Default)]
struct RowScan {
    cells: Vec<CellScan>,
}

#[derive(Debug)]
struct CellScan {
    span: Range<usize>,
    /// End of the `<w:tc …>` start tag.
    open_end: usize,
    props: Option<CellProps>,
    width: Option<Range<usize>>,
    self_closing: bool,
}

#[derive(Debug)]
enum CellProps {
    /// `<w:tcPr>` start tag ending at this offset.
    Open(usize),
    /// Self-closing `<w:tcPr/>` at this span.
    Empty(Range<usize>),
}

impl CellScan {
    fn width_edit(&self, width: u32) -> (Range<usize>, String) {
        let tc_w = format!(r#"<w:tcW w:w="{width}" w:type="dxa"/>"#);
        if self.self_closing {
            return (
                self.span.clone(),
                format!("<w:tc><w:tcPr>{tc_w}</w:tcPr><w:p/></w:tc>"),
            );
        }
        match (&self.width, &self.props) {
            (Some(span), _) => (span.clone(), tc_w),
            (None, Some(CellProps::Open(at))) => (*at..*at, tc_w),
            (None, Some(CellProps::Empty(span))) => {
                (span.clone(), format!("<w:tcPr>{tc_w}</w:tcPr>"))
            }
            (None, None) => (
                self.open_end..self.open_end,
                format!("<w:tcPr>{tc_w}</w:tcPr>"),
            ),
        }
    }
}

/// Element being closed, so spans can be completed on `End`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Open {
    Table,
    Cell,
    Width(usize),
    GridCol(usize),
    Other,
}

fn scan_tables(xml: &str) -> Result<Vec<TableScan>, DocxError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();

    let mut tables: Vec<TableScan> = Vec::new();
    // Indices into `tables` of the tables currently open, innermost last.
    let mut table_stack: Vec<usize> = Vec::new();
    let mut element_stack: Vec<Open> = Vec::new();

    loop {
        let start = reader.buffer_position() as usize;
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| DocxError::Xml(format!("{DOCUMENT_PART} at byte {start}: {e}")))?;
        let end = reader.buffer_position() as usize;
        let current = table_stack.last().copied();

        match event {
            XmlEvent::Start(e) => {
                let open = match (e.name().as_ref(), current) {
                    (b"w:tbl", _) => {
                        tables.push(TableScan::default());
                        table_stack.push(tables.len() - 1);
                        Open::Table
                    }
                    (b"w:tr", Some(t)) => {
                        tables[t].rows.push(RowScan::default());
                        Open::Other
                    }
                    (b"w:tc", Some(t)) if open_cell(&mut tables[t], start..end, false) => {
                        Open::Cell
                    }
                    (b"w:tcPr", Some(t)) => {
                        if let Some(cell) = current_cell(&mut tables[t]) {
                            cell.props.get_or_insert(CellProps::Open(end));
                        }
                        Open::Other
                    }
                    (b"w:tcW", Some(_)) => Open::Width(start),
                    (b"w:gridCol", Some(_)) => Open::GridCol(start),
                    (b"w:tblCaption", Some(t)) => {
                        tables[t].tagged |= is_agenda_caption(&e);
                        Open::Other
                    }
                    _ => Open::Other,
                };
                element_stack.push(open);
            }
            XmlEvent::Empty(e) => match (e.name().as_ref(), current) {
                (b"w:tc", Some(t)) => {
                    open_cell(&mut tables[t], start..end, true);
                }
                (b"w:tcPr", Some(t)) => {
                    if let Some(cell) = current_cell(&mut tables[t]) {
                        cell.props.get_or_insert(CellProps::Empty(start..end));
                    }
                }
                (b"w:tcW", Some(t)) => set_cell_width(&mut tables[t], start..end),
                (b"w:gridCol", Some(t)) => tables[t].grid_cols.push(start..end),
                (b"w:tblCaption", Some(t)) => tables[t].tagged |= is_agenda_caption(&e),
                _ => {}
            },
            XmlEvent::End(_) => match element_stack.pop() {
                Some(Open::Table) => {
                    table_stack.pop();
                }
                Some(Open::Cell) => {
                    if let Some(t) = current {
                        if let Some(cell) = current_cell(&mut tables[t]) {
                            cell.span.end = end;
                        }
                        tables[t].open_cells -= 1;
                    }
                }
                Some(Open::Width(from)) => {
                    if let Some(t) = current {
                        set_cell_width(&mut tables[t], from..end);
                    }
                }
                Some(Open::GridCol(from)) => {
                    if let Some(t) = current {
                        tables[t].grid_cols.push(from..end);
                    }
                }
                Some(Open::Other) | None => {}
            },
            XmlEvent::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(tables)
}

/// Records a cell in the last row. Returns false for a cell outside any row,
/// which is ignored. Only cells with content stay open.
fn open_cell(table: &mut TableScan, span: Range<usize>, self_closing: bool) -> bool {
    let Some(row) = table.rows.last_mut() else {
        return false;
    };
    row.cells.push(CellScan {
        open_end: span.end,
        span,
        props: None,
        width: None,
        self_closing,
    });
    if !self_closing {
        table.open_cells += 1;
    }
    true
}

/// The innermost open cell of `table`, if any.
fn current_cell(table: &mut TableScan) -> Option<&mut CellScan> {
    if table.open_cells == 0 {
        return None;
    }
    table.rows.last_mut().and_then(|row| row.cells.last_mut())
}

fn set_cell_width(table: &mut TableScan, span: Range<usize>) {
    if let Some(cell) = current_cell(table) {
        cell.width.get_or_insert(span);
    }
}

fn is_agenda_caption(element: &BytesStart) -> bool {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"w:val")
        .is_some_and(|attr| {
            String::from_utf8_lossy(&attr.value)
                .trim()
                .eq_ignore_ascii_case(AGENDA_TABLE_CAPTION)
        })
}

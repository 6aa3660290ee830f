/// Concatenated text of every `<w:t>` run, with markup removed.
pub fn extract_text(xml: &str) -> String {
    let mut text = String::new();
    let mut in_tag = false;
    for c in xml.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text
}

/// Number of cells in each row of the `index`-th table (document order,
/// tables not nested).
pub fn table_cell_counts(xml: &str, index: usize) -> Vec<usize> {
    let Some(table) = xml.split("<w:tbl>").nth(index + 1) else {
        return Vec::new();
    };
    let table = table.split("</w:tbl>").next().unwrap_or_default();
    table
        .split("</w:tr>")
        .filter(|row| row.contains("<w:tr"))
        .map(|row| row.matches("<w:tc>").count())
        .collect()
}

/// The `w:w` values of the `index`-th table's grid.
pub fn grid_widths(xml: &str, index: usize) -> Vec<String> {
    let Some(table) = xml.split("<w:tbl>").nth(index + 1) else {
        return Vec::new();
    };
    table
        .split("<w:gridCol w:w=\"")
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .map(str::to_string)
        .collect()
}

/// Assert that a generated document contains specific text
#[macro_export]
macro_rules! assert_docx_contains_text {
    ($docx:expr, $text:expr) => {
        let extracted = $crate::common::docx_assertions::extract_text(&$docx.document_xml());
        assert!(
            extracted.contains($text),
            "Document should contain '{}', but extracted text was:\n{}",
            $text,
            extracted
        );
    };
}

/// Assert that a generated document does NOT contain specific text
#[macro_export]
macro_rules! assert_docx_not_contains_text {
    ($docx:expr, $text:expr) => {
        let extracted = $crate::common::docx_assertions::extract_text(&$docx.document_xml());
        assert!(
            !extracted.contains($text),
            "Document should NOT contain '{}', but it was found in:\n{}",
            $text,
            extracted
        );
    };
}

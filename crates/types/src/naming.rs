//! File names derived from an agenda record.

use crate::record::AgendaRecord;

/// Suffix shared by every generated agenda document.
pub const AGENDA_SUFFIX: &str = "Agenda.docx";

/// Deterministic output name: `{date}-{customer}-{title}Agenda.docx`.
///
/// Spaces become underscores. Path separators are replaced as well so the
/// name can never escape the output directory. Blank fields fall back to
/// `DATE`, `CUST` and `TOPIC`.
pub fn agenda_file_name(record: &AgendaRecord) -> String {
    format!(
        "{}-{}-{}{}",
        name_part(&record.date, "DATE"),
        name_part(&record.customer, "CUST"),
        name_part(&record.title, "TOPIC"),
        AGENDA_SUFFIX
    )
}

/// Download name offered to a client: `{date}-{customer}Agenda.docx`, with
/// anything other than alphanumerics, spaces, `-` and `_` replaced by `_`.
pub fn attachment_file_name(record: &AgendaRecord) -> String {
    format!(
        "{}-{}{}",
        sanitize(or_default(&record.date, "DATE")),
        sanitize(or_default(&record.customer, "Customer")),
        AGENDA_SUFFIX
    )
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() { fallback } else { value }
}

fn name_part(value: &str, fallback: &str) -> String {
    or_default(value, fallback)
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect()
}

fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

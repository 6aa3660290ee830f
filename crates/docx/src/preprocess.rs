//! Cleans WordprocessingML so placeholders reach Handlebars intact.
//!
//! Word happily splits `{{customer}}` over several runs (spell checking,
//! formatting changes, revision marks). Before rendering we
//! - glue doubled braces that were split by markup,
//! - drop every XML tag inside a `{{ … }}` span,
//! - unescape XML entities and straighten smart quotes inside the span,
//! - collapse structural directives (`{{tr:…}}`, `{{p:…}}`) so that the
//!   whole table row or paragraph holding them is replaced by the bare tag.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static SPLIT_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(?:<[^>]*>)+\{").expect("valid regex"));
static SPLIT_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\}(?:<[^>]*>)+\}").expect("valid regex"));
static TAG_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{\{.*?\}\}").expect("valid regex"));
static XML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// A directive scope and the element it swallows.
#[derive(Debug, Clone, Copy)]
struct Scope {
    prefix: &'static str,
    element: &'static str,
}

/// Rows first: a row directive usually sits inside a paragraph, and the row
/// must win over the paragraph.
const SCOPES: [Scope; 2] = [
    Scope {
        prefix: "tr",
        element: "w:tr",
    },
    Scope {
        prefix: "p",
        element: "w:p",
    },
];

/// Runs the full cleanup over one XML part.
pub fn preprocess(xml: &str) -> String {
    let merged = merge_split_tags(xml);
    SCOPES
        .iter()
        .fold(merged, |xml, scope| collapse_directives(&xml, *scope))
}

fn merge_split_tags(xml: &str) -> String {
    let xml = SPLIT_OPEN.replace_all(xml, "{{");
    let xml = SPLIT_CLOSE.replace_all(&xml, "}}");
    TAG_SPAN
        .replace_all(&xml, |caps: &Captures| clean_tag(&caps[0]))
        .into_owned()
}

fn clean_tag(tag: &str) -> String {
    let stripped = XML_TAG.replace_all(tag, "");
    let unescaped = quick_xml::escape::unescape(&stripped)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| stripped.to_string());
    unescaped
        .replace(['\u{201c}', '\u{201d}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'")
}

/// Replaces every element holding a `{{<prefix>:…}}` directive with the
/// plain Handlebars tag. A directive outside any such element is still
/// rewritten to a plain tag so it cannot leak into the output.
fn collapse_directives(xml: &str, scope: Scope) -> String {
    let marker = format!("{{{{{}:", scope.prefix);
    let closing = format!("</{}>", scope.element);
    let mut xml = xml.to_string();

    while let Some(marker_at) = xml.find(&marker) {
        let inner_start = marker_at + marker.len();
        let Some(inner_len) = xml[inner_start..].find("}}") else {
            break;
        };
        let inner_end = inner_start + inner_len;
        let tag = format!("{{{{{}}}}}", xml[inner_start..inner_end].trim());
        let tag_end = inner_end + 2;

        let element_start = find_element_start(&xml[..marker_at], scope.element);
        let element_end = xml[tag_end..]
            .find(&closing)
            .map(|offset| tag_end + offset + closing.len());

        let (start, end) = match (element_start, element_end) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                log::warn!("Directive {} is not inside a <{}>", tag, scope.element);
                (marker_at, tag_end)
            }
        };
        xml.replace_range(start..end, &tag);
    }
    xml
}

/// Byte offset of the last opening `<element` tag in `prefix`, skipping
/// elements that merely share the prefix (`<w:pPr>` for `<w:p>`).
fn find_element_start(prefix: &str, element: &str) -> Option<usize> {
    let open = format!("<{element}");
    prefix.rmatch_indices(&open).map(|(at, _)| at).find(|&at| {
        matches!(
            prefix.as_bytes().get(at + open.len()),
            Some(b' ' | b'>' | b'/' | b'\t' | b'\n' | b'\r')
        )
    })
}

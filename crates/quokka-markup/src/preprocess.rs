//! Pre-parse rewriting of raw markup.
//!
//! Ending tags hold free-form HTML that the strict parser would reject, so
//! their content is wrapped in a CDATA section first. Named HTML entities
//! are then rewritten to numeric references everywhere except inside CDATA,
//! leaving author content in ending tags byte-for-byte intact.

use crate::entities::replace_entities;

/// Tags whose content is opaque embedded HTML, CSS or text.
pub const ENDING_TAGS: &[&str] = &[
    "mj-text",
    "mj-button",
    "mj-table",
    "mj-raw",
    "mj-navbar-link",
    "mj-accordion-title",
    "mj-accordion-text",
    "mj-style",
    "mj-html-attribute",
];

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// True when `tag` is one of [`ENDING_TAGS`].
#[must_use]
pub fn is_ending_tag(tag: &str) -> bool {
    ENDING_TAGS.contains(&tag)
}

/// Wrap ending-tag content in CDATA, then replace entities outside CDATA.
#[must_use]
pub fn preprocess(source: &str) -> String {
    if source.is_empty() {
        return String::new();
    }
    let wrapped = wrap_ending_tags(source);
    replace_entities_outside_cdata(&wrapped)
}

/// A matched `<tag ...>content</tag>` block, as byte offsets into the source.
struct EndingBlock<'a> {
    tag: &'a str,
    /// End of the opening tag (one past `>`).
    content_start: usize,
    /// Start of the closing tag.
    content_end: usize,
    /// One past the closing tag's `>`.
    end: usize,
}

fn wrap_ending_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 64);
    let mut copied = 0;
    let mut search = 0;
    while let Some(offset) = input[search..].find('<') {
        let start = search + offset;
        let Some(block) = match_ending_block(input, start) else {
            search = start + 1;
            continue;
        };
        let content = &input[block.content_start..block.content_end];
        if content.is_empty() || content.trim().starts_with(CDATA_OPEN) {
            search = block.end;
            continue;
        }
        out.push_str(&input[copied..block.content_start]);
        out.push_str(CDATA_OPEN);
        out.push_str(&content.replace(CDATA_CLOSE, "]]]]><![CDATA[>"));
        out.push_str(CDATA_CLOSE);
        out.push_str(&input[block.content_end..block.end]);
        tracing::trace!(tag = block.tag, "wrapped ending tag content in CDATA");
        copied = block.end;
        search = block.end;
    }
    out.push_str(&input[copied..]);
    out
}

/// Match an ending-tag block whose `<` is at `start`.
///
/// The opening tag must not be self-closing; the content runs to the first
/// `</tag>` (whitespace allowed before `>`).
fn match_ending_block(input: &str, start: usize) -> Option<EndingBlock<'_>> {
    let after_lt = &input[start + 1..];
    let tag = ENDING_TAGS.iter().copied().find(|tag| {
        after_lt.starts_with(tag)
            && after_lt[tag.len()..]
                .chars()
                .next()
                .is_some_and(|c| c == '>' || c.is_ascii_whitespace())
    })?;

    let open_end = start + 1 + after_lt.find('>')?;
    if input[..open_end].ends_with('/') {
        return None;
    }
    let content_start = open_end + 1;

    let closing = format!("</{tag}");
    let mut from = content_start;
    while let Some(offset) = input[from..].find(&closing) {
        let close_start = from + offset;
        let rest = &input[close_start + closing.len()..];
        let trimmed = rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
        if trimmed.starts_with('>') {
            let end = input.len() - trimmed.len() + 1;
            return Some(EndingBlock {
                tag,
                content_start,
                content_end: close_start,
                end,
            });
        }
        from = close_start + closing.len();
    }
    None
}

fn replace_entities_outside_cdata(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(open) = rest.find(CDATA_OPEN) {
        out.push_str(&replace_entities(&rest[..open]));
        let section = &rest[open..];
        let Some(close) = section.find(CDATA_CLOSE) else {
            // Unterminated CDATA is left for the parser to report.
            out.push_str(section);
            return out;
        };
        let end = close + CDATA_CLOSE.len();
        out.push_str(&section[..end]);
        rest = &section[end..];
    }
    out.push_str(&replace_entities(rest));
    out
}

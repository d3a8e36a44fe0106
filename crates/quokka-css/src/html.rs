//! A tolerant element scanner for rendered HTML.
//!
//! The inliner never re-serializes the document. It scans the HTML into an
//! element-only [`DomTree`] for selector matching and remembers, per
//! element, the byte span of its opening tag and of its `style` value, so
//! edits can be spliced into the original text and everything else
//! (comments, Outlook conditionals, whitespace) survives byte for byte.
//!
//! Scanning follows a loose subset of
//! [§ 13.2 Parsing HTML documents](https://html.spec.whatwg.org/multipage/parsing.html):
//! tag and attribute names are lowercased, void elements never take
//! children, `style` and `script` contents are skipped as raw text, and a
//! closing tag implicitly closes anything still open inside it.

use std::ops::Range;

use quokka_dom::{AttributesMap, DomTree, NodeId};

/// [§ 13.1.2 Void elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// [§ 13.1.2 Raw text elements](https://html.spec.whatwg.org/multipage/syntax.html#raw-text-elements)
const RAW_TEXT_ELEMENTS: [&str; 2] = ["style", "script"];

/// Where an element's opening tag sits in the scanned HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpan {
    /// Byte offset of the `<`.
    pub start: usize,
    /// Byte offset just past the `>`.
    pub end: usize,
    /// Byte range of the quoted `style` value, quotes excluded.
    pub style: Option<Range<usize>>,
}

impl TagSpan {
    /// Where new attributes go: before the `>`, or before the `/` (and any
    /// spaces ahead of it) of a self-closing tag.
    #[must_use]
    pub fn attribute_insertion_point(&self, html: &str) -> usize {
        let bytes = html.as_bytes();
        let mut pos = self.end.saturating_sub(1);
        if pos > 0 && bytes.get(pos - 1) == Some(&b'/') {
            pos -= 1;
            while pos > self.start && bytes[pos - 1] == b' ' {
                pos -= 1;
            }
        }
        pos
    }
}

/// Element tree of a scanned HTML string plus the tag spans.
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    tree: DomTree,
    spans: Vec<Option<TagSpan>>,
}

impl HtmlDocument {
    /// Scan `html`. Never fails; malformed markup yields a partial tree.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        let mut scanner = Scanner {
            html,
            bytes: html.as_bytes(),
            doc: Self {
                tree: DomTree::new(),
                spans: Vec::new(),
            },
            stack: vec![NodeId::ROOT],
        };
        scanner.run();
        scanner.doc
    }

    /// The element tree. The root is the `#document` node.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Mutable tree access, for updating attributes before a rebuild.
    pub const fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Span of an element's opening tag.
    #[must_use]
    pub fn span(&self, id: NodeId) -> Option<&TagSpan> {
        self.spans.get(id.0).and_then(Option::as_ref)
    }

    /// All elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.tree
            .descendants(self.tree.root())
            .filter(|&id| self.tree.as_element(id).is_some())
    }

    fn add_element(
        &mut self,
        parent: NodeId,
        tag: &str,
        attrs: AttributesMap,
        span: TagSpan,
    ) -> NodeId {
        let id = self.tree.create_element(tag, attrs);
        self.tree.append_child(parent, id);
        if self.spans.len() <= id.0 {
            self.spans.resize(id.0 + 1, None);
        }
        self.spans[id.0] = Some(span);
        id
    }
}

struct Scanner<'a> {
    html: &'a str,
    bytes: &'a [u8],
    doc: HtmlDocument,
    stack: Vec<NodeId>,
}

impl Scanner<'_> {
    fn run(&mut self) {
        let mut pos = 0;
        while let Some(offset) = self.html[pos..].find('<') {
            pos += offset;
            match self.skip_special(pos) {
                None => break,
                Some(next) if next > pos => pos = next,
                Some(_) if self.bytes.get(pos + 1) == Some(&b'/') => pos = self.closing_tag(pos),
                Some(_) => pos = self.opening_tag(pos),
            }
            if pos >= self.html.len() {
                break;
            }
        }
    }

    /// Skip a comment, doctype, CDATA section or processing instruction at
    /// `pos`. `Some(pos)` if there is none; `None` if one is unterminated.
    fn skip_special(&self, pos: usize) -> Option<usize> {
        let rest = &self.html[pos..];
        let skip_past = |open: usize, close: &str| {
            rest[open..].find(close).map(|i| pos + open + i + close.len())
        };
        if rest.starts_with("<!--") {
            skip_past(4, "-->")
        } else if starts_with_ignore_case(rest, "<!doctype") {
            skip_past(0, ">")
        } else if rest.starts_with("<![CDATA[") {
            skip_past(9, "]]>")
        } else if rest.starts_with("<?") {
            skip_past(0, "?>")
        } else {
            Some(pos)
        }
    }

    fn closing_tag(&mut self, pos: usize) -> usize {
        let Some(close) = self.html[pos..].find('>').map(|i| pos + i) else {
            return self.html.len();
        };
        let name = self.html[pos + 2..close].trim().to_ascii_lowercase();
        self.pop_until(&name);
        close + 1
    }

    fn opening_tag(&mut self, pos: usize) -> usize {
        let Some(gt) = self.find_tag_end(pos) else {
            return self.html.len();
        };
        let self_closing = gt > pos + 1 && self.bytes[gt - 1] == b'/';
        let content_end = if self_closing { gt - 1 } else { gt };

        let content = &self.html[pos + 1..content_end];
        let name_len = content
            .find(|c: char| c.is_ascii_whitespace())
            .unwrap_or(content.len());
        let tag = content[..name_len].to_ascii_lowercase();
        if tag.is_empty() || tag.starts_with('!') {
            return gt + 1;
        }

        let (attrs, style) = self.attributes(pos + 1 + name_len, content_end);
        let span = TagSpan {
            start: pos,
            end: gt + 1,
            style,
        };
        let parent = self.stack.last().copied().unwrap_or(NodeId::ROOT);
        let id = self.doc.add_element(parent, &tag, attrs, span);

        if self_closing || VOID_ELEMENTS.contains(&tag.as_str()) {
            return gt + 1;
        }
        self.stack.push(id);

        if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
            let close_tag = format!("</{tag}");
            let close_end = find_ignore_case(self.html, &close_tag, gt + 1)
                .and_then(|close| self.html[close..].find('>').map(|end| close + end));
            if let Some(close_end) = close_end {
                self.pop_until(&tag);
                return close_end + 1;
            }
        }
        gt + 1
    }

    /// Index of the `>` ending the tag opened at `start`, ignoring any
    /// inside quoted attribute values.
    fn find_tag_end(&self, start: usize) -> Option<usize> {
        let mut quote: Option<u8> = None;
        for (i, &b) in self.bytes.iter().enumerate().skip(start + 1) {
            match (quote, b) {
                (Some(q), _) if b == q => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(b),
                (None, b'>') => return Some(i),
                _ => {}
            }
        }
        None
    }

    /// Parse attributes in `html[from..to]`, returning them with the byte
    /// range of a quoted `style` value.
    fn attributes(&self, from: usize, to: usize) -> (AttributesMap, Option<Range<usize>>) {
        let bytes = self.bytes;
        let mut attrs = AttributesMap::new();
        let mut style = None;
        let mut pos = from;
        let skip_ws = |mut p: usize| {
            while p < to && bytes[p].is_ascii_whitespace() {
                p += 1;
            }
            p
        };

        loop {
            pos = skip_ws(pos);
            if pos >= to {
                break;
            }

            let name_start = pos;
            while pos < to
                && !matches!(bytes[pos], b'=' | b'/')
                && !bytes[pos].is_ascii_whitespace()
            {
                pos += 1;
            }
            if pos == name_start {
                pos += 1;
                continue;
            }
            let name = self.html[name_start..pos].to_ascii_lowercase();

            pos = skip_ws(pos);
            if pos >= to || bytes[pos] != b'=' {
                let _ = attrs.insert(name, "");
                continue;
            }
            pos = skip_ws(pos + 1);
            if pos >= to {
                let _ = attrs.insert(name, "");
                continue;
            }

            let value = match bytes[pos] {
                quote @ (b'"' | b'\'') => {
                    let value_start = pos + 1;
                    let value_end = self.html[value_start..to]
                        .bytes()
                        .position(|b| b == quote)
                        .map_or(to, |i| value_start + i);
                    if name == "style" {
                        style = Some(value_start..value_end);
                    }
                    pos = (value_end + 1).min(to);
                    &self.html[value_start..value_end]
                }
                _ => {
                    let value_start = pos;
                    while pos < to && !bytes[pos].is_ascii_whitespace() && bytes[pos] != b'>' {
                        pos += 1;
                    }
                    &self.html[value_start..pos]
                }
            };
            let _ = attrs.insert(name, value);
        }
        (attrs, style)
    }

    /// Close `tag`, implicitly closing anything opened inside it. A closing
    /// tag with no open element of that name is ignored.
    fn pop_until(&mut self, tag: &str) {
        let tree = &self.doc.tree;
        let Some(index) = self
            .stack
            .iter()
            .skip(1)
            .rposition(|&id| tree.tag_name(id) == Some(tag))
        else {
            return;
        };
        self.stack.truncate(index + 1);
    }
}

fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack
        .as_bytes()
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
}

/// Byte offset of the first ASCII-case-insensitive `needle` at or after `from`.
fn find_ignore_case(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let needle = needle.as_bytes();
    haystack
        .as_bytes()
        .get(from..)?
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
        .map(|i| from + i)
}

/// Result of [`extract_styles`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleExtraction {
    /// The HTML with every complete `<style>` element removed.
    pub html: String,
    /// Trimmed non-empty contents of the removed elements, each followed by
    /// a newline.
    pub css: String,
}

/// Remove `<style>` elements from `html`, collecting their CSS.
///
/// An unterminated `<style>` is left in place along with everything after it.
#[must_use]
pub fn extract_styles(html: &str) -> StyleExtraction {
    let mut out = StyleExtraction {
        html: String::with_capacity(html.len()),
        css: String::new(),
    };
    let mut pos = 0;

    while pos < html.len() {
        let block = find_ignore_case(html, "<style", pos).and_then(|start| {
            let open_end = start + html[start..].find('>')?;
            let close = find_ignore_case(html, "</style", open_end + 1)?;
            let close_end = close + html[close..].find('>')?;
            Some((start, open_end, close, close_end))
        });
        let Some((start, open_end, close, close_end)) = block else {
            out.html.push_str(&html[pos..]);
            break;
        };

        out.html.push_str(&html[pos..start]);
        let css = html[open_end + 1..close].trim();
        if !css.is_empty() {
            out.css.push_str(css);
            out.css.push('\n');
        }
        pos = close_end + 1;
    }
    out
}

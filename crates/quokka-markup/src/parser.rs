//! Strict markup parser.
//!
//! Runs on preprocessed source and builds a [`DomTree`]. The grammar is the
//! XML subset templates use: elements with quoted attributes, text, CDATA
//! sections, comments and processing instructions. Only XML's five named
//! entities and numeric references are understood; everything else is a
//! parse failure with line and column.
//!
//! Parsing is iterative over an explicit open-element stack, so the nesting
//! ceiling is enforced as a validation failure rather than by the call stack.

use quokka_common::{Error, Result};
use quokka_dom::{AttributesMap, DomTree, NodeId, NodeType};

use crate::document::MjmlDocument;
use crate::preprocess::preprocess;

/// Default ceiling on element nesting below the root.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 100;

/// The only accepted top-level tag.
pub const ROOT_TAG: &str = "mjml";

/// Preprocess and parse `source` with the default nesting ceiling.
///
/// # Errors
///
/// See [`parse_with_depth`].
pub fn parse(source: &str) -> Result<MjmlDocument> {
    parse_with_depth(source, DEFAULT_MAX_NESTING_DEPTH)
}

/// Preprocess and parse `source`.
///
/// # Errors
///
/// Returns a parse error for blank input, malformed markup or a root other
/// than `<mjml>`, and a validation error when elements nest deeper than
/// `max_depth` below the root.
pub fn parse_with_depth(source: &str, max_depth: usize) -> Result<MjmlDocument> {
    if source.trim().is_empty() {
        return Err(Error::parse("MJML source cannot be null or empty"));
    }
    let preprocessed = preprocess(source);
    Parser::new(&preprocessed, max_depth).parse_document()
}

/// Parser state over one preprocessed source string.
struct Parser<'a> {
    src: &'a str,
    pos: usize,
    max_depth: usize,
}

/// A parsed start tag, already allocated in the tree.
struct StartTag {
    id: NodeId,
    name: String,
    self_closing: bool,
}

impl<'a> Parser<'a> {
    const fn new(src: &'a str, max_depth: usize) -> Self {
        Self {
            src,
            pos: 0,
            max_depth,
        }
    }

    fn parse_document(mut self) -> Result<MjmlDocument> {
        let mut tree = DomTree::new();
        self.skip_misc(true)?;
        if self.eof() {
            return Err(self.error("Premature end of file."));
        }
        if !self.at("<") || self.at("</") {
            return Err(self.error("Content is not allowed in prolog."));
        }

        let root = self.parse_start_tag(&mut tree)?;
        if root.name != ROOT_TAG {
            return Err(Error::parse(format!(
                "Root element must be <{ROOT_TAG}>, found <{}>",
                root.name
            )));
        }
        tree.append_child(NodeId::ROOT, root.id);

        let mut stack: Vec<(NodeId, String)> = Vec::new();
        if !root.self_closing {
            stack.push((root.id, root.name));
        }
        while let Some((current, _)) = stack.last() {
            let current = *current;
            if self.eof() {
                return Err(self.error(
                    "XML document structures must start and end within the same entity.",
                ));
            }
            if self.at("</") {
                let name = self.parse_end_tag()?;
                let Some((_, open)) = stack.pop() else {
                    break;
                };
                if name != open {
                    return Err(self.error(format!(
                        "The element type \"{open}\" must be terminated by the matching end-tag \"</{open}>\"."
                    )));
                }
            } else if self.at("<!--") {
                let text = self.parse_comment()?;
                let id = tree.alloc(NodeType::Comment(text));
                tree.append_child(current, id);
            } else if self.at("<![CDATA[") {
                let text = self.parse_cdata()?;
                let id = tree.alloc(NodeType::CData(text));
                tree.append_child(current, id);
            } else if self.at("<?") {
                self.skip_processing_instruction()?;
            } else if self.at("<!") {
                return Err(self.error("The markup in the document following the root element must be well-formed."));
            } else if self.at("<") {
                let depth = stack.len();
                if depth > self.max_depth {
                    return Err(Error::Validation(format!(
                        "Maximum nesting depth exceeded ({})",
                        self.max_depth
                    )));
                }
                let tag = self.parse_start_tag(&mut tree)?;
                tree.append_child(current, tag.id);
                if !tag.self_closing {
                    stack.push((tag.id, tag.name));
                }
            } else {
                let text = self.parse_text()?;
                if !text.trim_ascii().is_empty() {
                    let id = tree.alloc(NodeType::Text(text));
                    tree.append_child(current, id);
                }
            }
        }

        self.skip_misc(false)?;
        if !self.eof() {
            return Err(self.error("Content is not allowed in trailing section."));
        }
        Ok(MjmlDocument::new(tree, root.id))
    }

    // ===== Low-level cursor =====

    fn eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start_matches(is_xml_whitespace);
        self.pos += rest.len() - trimmed.len();
    }

    fn expect(&mut self, c: char) -> Result<()> {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            Ok(())
        } else {
            Err(self.error(format!("Expected '{c}'.")))
        }
    }

    /// Advance past the next `terminator`, returning the text before it.
    fn take_until(&mut self, terminator: &str, what: &str) -> Result<&'a str> {
        let rest = self.rest();
        let Some(end) = rest.find(terminator) else {
            self.pos = self.src.len();
            return Err(self.error(format!("Unterminated {what}.")));
        };
        self.pos += end + terminator.len();
        Ok(&rest[..end])
    }

    fn error(&self, detail: impl AsRef<str>) -> Error {
        let consumed = &self.src[..self.pos.min(self.src.len())];
        let line = consumed.matches('\n').count() + 1;
        let column = consumed
            .rfind('\n')
            .map_or(consumed, |nl| &consumed[nl + 1..])
            .chars()
            .count()
            + 1;
        Error::parse_at(
            format!("Failed to parse MJML: {}", detail.as_ref()),
            line,
            column,
        )
    }

    // ===== Grammar =====

    /// Whitespace, comments and processing instructions outside the root.
    /// A doctype is accepted only in the prolog.
    fn skip_misc(&mut self, prolog: bool) -> Result<()> {
        loop {
            self.skip_whitespace();
            if self.at("<?") {
                self.skip_processing_instruction()?;
            } else if self.at("<!--") {
                let _ = self.parse_comment()?;
            } else if prolog && self.at("<!DOCTYPE") {
                let _ = self.take_until(">", "document type declaration")?;
            } else {
                return Ok(());
            }
        }
    }

    fn skip_processing_instruction(&mut self) -> Result<()> {
        let _ = self.take_until("?>", "processing instruction")?;
        Ok(())
    }

    fn parse_comment(&mut self) -> Result<String> {
        self.pos += "<!--".len();
        let text = self.take_until("-->", "comment")?;
        Ok(text.to_string())
    }

    fn parse_cdata(&mut self) -> Result<String> {
        self.pos += "<![CDATA[".len();
        let text = self.take_until("]]>", "CDATA section")?;
        Ok(text.to_string())
    }

    fn parse_name(&mut self) -> Result<String> {
        let rest = self.rest();
        let mut chars = rest.char_indices();
        match chars.next() {
            Some((_, c)) if is_name_start(c) => {}
            _ => return Err(self.error("Expected an element or attribute name.")),
        }
        let end = chars
            .find(|&(_, c)| !is_name_char(c))
            .map_or(rest.len(), |(i, _)| i);
        self.pos += end;
        Ok(rest[..end].to_string())
    }

    fn parse_start_tag(&mut self, tree: &mut DomTree) -> Result<StartTag> {
        self.expect('<')?;
        let name = self.parse_name()?;
        let mut attrs = AttributesMap::new();
        loop {
            let before = self.pos;
            self.skip_whitespace();
            if self.at("/>") {
                self.pos += 2;
                let id = tree.create_element(&name, attrs);
                return Ok(StartTag {
                    id,
                    name,
                    self_closing: true,
                });
            }
            if self.at(">") {
                self.pos += 1;
                let id = tree.create_element(&name, attrs);
                return Ok(StartTag {
                    id,
                    name,
                    self_closing: false,
                });
            }
            if self.eof() || self.pos == before {
                return Err(self.error(format!(
                    "Element type \"{name}\" must be followed by either attribute specifications, \">\" or \"/>\"."
                )));
            }
            let attr_name = self.parse_name()?;
            self.skip_whitespace();
            self.expect('=')?;
            self.skip_whitespace();
            let value = self.parse_attribute_value()?;
            if attrs.contains_key(&attr_name) {
                return Err(self.error(format!(
                    "Attribute \"{attr_name}\" was already specified for element \"{name}\"."
                )));
            }
            let _ = attrs.insert(attr_name, value);
        }
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.peek() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.error("Open quote is expected for attribute value.")),
        };
        self.pos += 1;
        let rest = self.rest();
        let Some(end) = rest.find(quote) else {
            self.pos = self.src.len();
            return Err(self.error("Unterminated attribute value."));
        };
        let raw = &rest[..end];
        if let Some(lt) = raw.find('<') {
            self.pos += lt;
            return Err(self.error(
                "The value of attribute must not contain the '<' character.",
            ));
        }
        let decoded = self.decode_references(raw)?;
        self.pos += end + 1;
        // Attribute value normalization: literal whitespace characters become spaces.
        Ok(decoded.replace(['\t', '\n', '\r'], " "))
    }

    fn parse_end_tag(&mut self) -> Result<String> {
        self.pos += 2;
        let name = self.parse_name()?;
        self.skip_whitespace();
        self.expect('>')?;
        Ok(name)
    }

    fn parse_text(&mut self) -> Result<String> {
        let rest = self.rest();
        let end = rest.find('<').unwrap_or(rest.len());
        let raw = &rest[..end];
        if let Some(bad) = raw.find("]]>") {
            self.pos += bad;
            return Err(self.error(
                "The character sequence \"]]>\" must not appear in content unless used to mark the end of a CDATA section.",
            ));
        }
        let text = self.decode_references(raw)?;
        self.pos += end;
        Ok(text)
    }

    /// Decode XML's five named entities and numeric character references.
    fn decode_references(&self, raw: &str) -> Result<String> {
        if !raw.contains('&') {
            return Ok(raw.to_string());
        }
        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;
        while let Some(amp) = rest.find('&') {
            out.push_str(&rest[..amp]);
            let after = &rest[amp + 1..];
            let Some(semi) = after.find(';') else {
                return Err(self.error(
                    "The entity name must immediately follow the '&' in the entity reference.",
                ));
            };
            let name = &after[..semi];
            let decoded = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => name.strip_prefix('#').and_then(decode_numeric),
            };
            match decoded {
                Some(c) => out.push(c),
                None if name.starts_with('#') => {
                    return Err(self.error(format!(
                        "Invalid character reference \"&{name};\"."
                    )));
                }
                None => {
                    return Err(self.error(format!(
                        "The entity \"{name}\" was referenced, but not declared."
                    )));
                }
            }
            rest = &after[semi + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

fn decode_numeric(reference: &str) -> Option<char> {
    let code = match reference.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => reference.parse::<u32>().ok()?,
    };
    char::from_u32(code).filter(|&c| c != '\0')
}

const fn is_xml_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == ':'
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-' || c == '.'
}

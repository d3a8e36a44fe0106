//! Stylesheet parsing for the inliner.
//!
//! This is deliberately not a full [CSS Syntax](https://www.w3.org/TR/css-syntax-3/)
//! parser: it splits a stylesheet into style rules and block at-rules, keeps
//! quoted strings and parentheses intact, and drops whatever it cannot
//! structure. Block at-rules that only make sense in a `<style>` element
//! (`@media`, `@font-face`, keyframes) are kept verbatim so the inliner can
//! put them back.

use std::fmt;

/// [§ 5.3.4 Parse a declaration](https://www.w3.org/TR/css-syntax-3/#parse-declaration)
///
/// One `property: value` pair. The property is lowercased; the value keeps
/// its original text minus any `!important` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Lowercased property name.
    pub property: String,
    /// Trimmed value without the importance flag.
    pub value: String,
    /// Whether the value carried `!important`.
    pub important: bool,
}

impl Declaration {
    /// Parse `prop: value [!important]`. Returns `None` when there is no
    /// colon, no property or no value.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let (property, value) = text.split_once(':')?;
        let property = property.trim().to_ascii_lowercase();
        if property.is_empty() {
            return None;
        }

        let mut value = value.trim();
        let mut important = false;
        // "red !important" and "red ! important"
        let bang = value
            .rfind('!')
            .filter(|&bang| value[bang + 1..].trim().eq_ignore_ascii_case("important"));
        if let Some(bang) = bang {
            important = true;
            value = value[..bang].trim_end();
        }

        if value.is_empty() {
            return None;
        }
        Some(Self {
            property,
            value: value.to_string(),
            important,
        })
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.property, self.value)?;
        if self.important {
            f.write_str(" !important")?;
        }
        Ok(())
    }
}

/// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
///
/// A selector list with its declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Raw selector text, trimmed.
    pub selector_text: String,
    /// Declarations in source order.
    pub declarations: Vec<Declaration>,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{ ", self.selector_text)?;
        for (i, declaration) in self.declarations.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{declaration};")?;
        }
        f.write_str(" }")
    }
}

/// A parsed stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    /// Style rules with at least one declaration, in source order.
    pub rules: Vec<Rule>,
    /// Block at-rules kept verbatim (`@media ... { ... }`).
    pub preserved_at_rules: Vec<String>,
}

/// Whether an at-rule block survives inlining as-is.
fn is_preserved_at_rule(name: &str) -> bool {
    matches!(name, "media" | "keyframes" | "font-face")
        || name.starts_with("-webkit-keyframes")
        || name.starts_with("-moz-keyframes")
}

/// Parse a stylesheet. Never fails; malformed tails are dropped.
#[must_use]
pub fn parse_stylesheet(css: &str) -> Stylesheet {
    let mut sheet = Stylesheet::default();
    let css = strip_comments(css);
    let mut pos = 0;

    while pos < css.len() {
        let rest = &css[pos..];
        let trimmed = rest.trim_start();
        pos += rest.len() - trimmed.len();
        if trimmed.is_empty() {
            break;
        }
        pos = if trimmed.starts_with('@') {
            parse_at_rule(&css, pos, &mut sheet)
        } else {
            parse_rule(&css, pos, &mut sheet)
        };
    }

    tracing::trace!(
        rules = sheet.rules.len(),
        at_rules = sheet.preserved_at_rules.len(),
        "parsed stylesheet"
    );
    sheet
}

/// Remove `/* ... */` comments. An unterminated comment swallows the rest.
fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Parse the at-rule starting at `pos` (on the `@`), returning the position
/// after it.
fn parse_at_rule(css: &str, pos: usize, sheet: &mut Stylesheet) -> usize {
    let name_start = pos + 1;
    let name_len = css[name_start..]
        .find(|c: char| c.is_whitespace() || c == '{' || c == ';')
        .unwrap_or(css.len() - name_start);
    let name = css[name_start..name_start + name_len].to_ascii_lowercase();
    let after_name = name_start + name_len;

    if is_preserved_at_rule(&name) {
        let Some(open) = css[after_name..].find('{').map(|i| after_name + i) else {
            return css.len();
        };
        let Some(close) = find_matching_brace(css, open) else {
            return css.len();
        };
        sheet
            .preserved_at_rules
            .push(css[pos..=close].trim().to_string());
        return close + 1;
    }

    // Statement at-rules (@import, @charset) are irrelevant to inlining.
    css[pos..].find(';').map_or(css.len(), |semi| pos + semi + 1)
}

/// Parse the style rule starting at `pos`, returning the position after it.
fn parse_rule(css: &str, pos: usize, sheet: &mut Stylesheet) -> usize {
    let Some(open) = css[pos..].find('{').map(|i| pos + i) else {
        return css.len();
    };
    let selector_text = css[pos..open].trim();
    if selector_text.is_empty() {
        return open + 1;
    }
    let Some(close) = find_matching_brace(css, open) else {
        return css.len();
    };

    let declarations = parse_declarations(&css[open + 1..close]);
    if !declarations.is_empty() {
        sheet.rules.push(Rule {
            selector_text: selector_text.to_string(),
            declarations,
        });
    }
    close + 1
}

/// Parse a declaration block body (`a: b; c: d`), skipping invalid entries.
#[must_use]
pub fn parse_declarations(body: &str) -> Vec<Declaration> {
    split_declarations(body)
        .filter_map(Declaration::parse)
        .collect()
}

/// Split on `;` outside quotes and parentheses, yielding non-empty trimmed
/// parts. `url(a;b)` and `"a;b"` stay whole.
pub(crate) fn split_declarations(body: &str) -> impl Iterator<Item = &str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in body.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts.into_iter().map(str::trim).filter(|p| !p.is_empty())
}

/// Index of the `}` closing the `{` at `open`, skipping quoted strings.
fn find_matching_brace(css: &str, open: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut quote: Option<char> = None;
    for (i, c) in css[open + 1..].char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '{') => depth += 1,
            (None, '}') => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + 1 + i);
                }
            }
            _ => {}
        }
    }
    None
}

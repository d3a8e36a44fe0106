//! Escaping helpers for generated HTML and CSS.

use std::borrow::Cow;

/// Escape a value for use inside a double-quoted HTML attribute.
///
/// `&`, `"`, `'`, `<` and `>` become character references. Values without
/// any of them are returned borrowed.
#[must_use]
pub fn escape_attribute_value(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '"', '\'', '<', '>']) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 16);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escape a URL for use inside a CSS `url("...")` or `@import` string.
///
/// Backslash, both quote characters and parentheses are backslash-escaped.
#[must_use]
pub fn escape_css_url(url: &str) -> Cow<'_, str> {
    if !url.contains(['\\', '"', '\'', '(', ')']) {
        return Cow::Borrowed(url);
    }
    let mut out = String::with_capacity(url.len() + 16);
    for c in url.chars() {
        if matches!(c, '\\' | '"' | '\'' | '(' | ')') {
            out.push('\\');
        }
        out.push(c);
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_attribute_value() {
        assert_eq!(
            escape_attribute_value(r#"a&b "c" <d> 'e'"#),
            "a&amp;b &quot;c&quot; &lt;d&gt; &#39;e&#39;"
        );
        assert!(matches!(escape_attribute_value("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_css_url() {
        assert_eq!(
            escape_css_url(r#"https://x.test/a(1)"b"\c"#),
            r#"https://x.test/a\(1\)\"b\"\\c"#
        );
        assert!(matches!(escape_css_url("https://fonts.test/x"), Cow::Borrowed(_)));
    }
}

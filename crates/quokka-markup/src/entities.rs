//! HTML named character references rewritten as numeric references.
//!
//! The strict parser only knows XML's five predefined entities, so every
//! HTML name an author may use outside ending-tag blocks is rewritten to its
//! `&#N;` form before parsing. Names not in the table, including the XML
//! five, are left alone.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Longest distance from `&` to `;` still treated as a reference.
const MAX_REFERENCE_SPAN: usize = 12;

/// Entity name (without `&` and `;`) to code point.
static NAMED_ENTITIES: LazyLock<HashMap<&'static str, u32>> = LazyLock::new(|| {
    let mut table = HashMap::from([
        // Typographic
        ("ndash", 8211),
        ("mdash", 8212),
        ("lsquo", 8216),
        ("rsquo", 8217),
        ("sbquo", 8218),
        ("ldquo", 8220),
        ("rdquo", 8221),
        ("bdquo", 8222),
        ("dagger", 8224),
        ("Dagger", 8225),
        ("bull", 8226),
        ("hellip", 8230),
        ("permil", 8240),
        ("prime", 8242),
        ("Prime", 8243),
        ("lsaquo", 8249),
        ("rsaquo", 8250),
        ("oline", 8254),
        ("euro", 8364),
        ("trade", 8482),
        // Arrows
        ("larr", 8592),
        ("uarr", 8593),
        ("rarr", 8594),
        ("darr", 8595),
        ("harr", 8596),
        // Spacing and symbols
        ("fnof", 402),
        ("circ", 710),
        ("tilde", 732),
        ("ensp", 8194),
        ("emsp", 8195),
        ("thinsp", 8201),
        ("zwnj", 8204),
        ("zwj", 8205),
        ("lrm", 8206),
        ("rlm", 8207),
    ]);
    // Latin-1 supplement, U+00A0 to U+00FF in code point order
    let latin1 = [
        "nbsp", "iexcl", "cent", "pound", "curren", "yen", "brvbar", "sect", "uml", "copy",
        "ordf", "laquo", "not", "shy", "reg", "macr", "deg", "plusmn", "sup2", "sup3", "acute",
        "micro", "para", "middot", "cedil", "sup1", "ordm", "raquo", "frac14", "frac12",
        "frac34", "iquest", "Agrave", "Aacute", "Acirc", "Atilde", "Auml", "Aring", "AElig",
        "Ccedil", "Egrave", "Eacute", "Ecirc", "Euml", "Igrave", "Iacute", "Icirc", "Iuml",
        "ETH", "Ntilde", "Ograve", "Oacute", "Ocirc", "Otilde", "Ouml", "times", "Oslash",
        "Ugrave", "Uacute", "Ucirc", "Uuml", "Yacute", "THORN", "szlig", "agrave", "aacute",
        "acirc", "atilde", "auml", "aring", "aelig", "ccedil", "egrave", "eacute", "ecirc",
        "euml", "igrave", "iacute", "icirc", "iuml", "eth", "ntilde", "ograve", "oacute",
        "ocirc", "otilde", "ouml", "divide", "oslash", "ugrave", "uacute", "ucirc", "uuml",
        "yacute", "thorn", "yuml",
    ];
    for (code, name) in (160..).zip(latin1) {
        let _ = table.insert(name, code);
    }
    table
});

/// Code point for an HTML entity name, e.g. `"nbsp"` gives `160`.
#[must_use]
pub fn lookup(name: &str) -> Option<u32> {
    NAMED_ENTITIES.get(name).copied()
}

/// Replace known named references in `input` with numeric ones.
///
/// A `&` with no `;` within reach, or with an unknown name, is copied through
/// unchanged.
#[must_use]
pub fn replace_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let replaced = after
            .find(';')
            .filter(|&semi| semi + 1 <= MAX_REFERENCE_SPAN)
            .and_then(|semi| lookup(&after[..semi]).map(|code| (semi, code)));
        match replaced {
            Some((semi, code)) => {
                out.push_str(&format!("&#{code};"));
                rest = &after[semi + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_table_is_aligned() {
        assert_eq!(lookup("nbsp"), Some(160));
        assert_eq!(lookup("copy"), Some(169));
        assert_eq!(lookup("eacute"), Some(233));
        assert_eq!(lookup("yuml"), Some(255));
    }

    #[test]
    fn test_replace_known_entities() {
        assert_eq!(
            replace_entities("Caf&eacute; &mdash; &euro;5&nbsp;"),
            "Caf&#233; &#8212; &#8364;5&#160;"
        );
    }

    #[test]
    fn test_xml_entities_untouched() {
        assert_eq!(replace_entities("a &amp; b &lt; c"), "a &amp; b &lt; c");
    }

    #[test]
    fn test_unknown_and_unterminated() {
        assert_eq!(replace_entities("&bogus; & &copy"), "&bogus; & &copy");
        assert_eq!(replace_entities("&averyveryverylongname;"), "&averyveryverylongname;");
    }
}

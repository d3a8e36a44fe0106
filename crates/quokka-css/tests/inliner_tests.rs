//! Integration tests for moving stylesheet rules into `style` attributes.

use quokka_css::{inline, inline_additional_only};

fn opening_tag<'a>(html: &'a str, tag: &str) -> &'a str {
    let start = html.find(&format!("<{tag}")).unwrap();
    let end = start + html[start..].find('>').unwrap() + 1;
    &html[start..end]
}

#[test]
fn test_inlines_class_rule_and_removes_style_element() {
    let html = "<html><head><style>.red { color: red; }</style></head>\
                <body><div class=\"red\">Hello</div></body></html>";
    let result = inline(html, None);

    assert_eq!(
        opening_tag(&result, "div"),
        "<div class=\"red\" style=\"color: red;\">"
    );
    assert!(!result.contains("<style"));
}

#[test]
fn test_type_rule_only_touches_matching_elements() {
    let html = "<html><head><style>p { font-size: 14px }</style></head>\
                <body><p>Hello</p><div>World</div></body></html>";
    let result = inline(html, None);

    assert_eq!(opening_tag(&result, "p"), "<p style=\"font-size: 14px;\">");
    assert_eq!(opening_tag(&result, "div"), "<div>");
}

#[test]
fn test_merges_with_existing_inline_style() {
    let html = "<head><style>.bold { font-weight: bold; color: blue }</style></head>\
                <body><div class=\"bold\" style=\"color:red\">Hello</div></body>";
    let result = inline(html, None);

    // The stylesheet value replaces the inline one in place; new
    // properties are appended.
    assert!(result.contains("style=\"color: blue; font-weight: bold;\""));
}

#[test]
fn test_existing_important_inline_value_survives() {
    let html = "<body><div class=\"x\" style=\"color: red !important\">Hi</div></body>";
    let result = inline_additional_only(html, ".x { color: blue }");
    assert!(result.contains("style=\"color: red !important;\""));
}

#[test]
fn test_id_beats_class_beats_type() {
    let html = "<head><style>\
                #unique { color: green }\
                .special { color: blue; margin: 1px }\
                div { color: red; margin: 2px; padding: 3px }\
                </style></head>\
                <body><div id=\"unique\" class=\"special\">Hello</div></body>";
    let result = inline(html, None);

    assert!(result.contains("style=\"color: green; margin: 1px; padding: 3px;\""));
}

#[test]
fn test_important_type_rule_beats_plain_id_rule() {
    let html = "<head><style>\
                div { color: red !important }\
                #unique { color: green }\
                </style></head>\
                <body><div id=\"unique\">Hello</div></body>";
    let result = inline(html, None);

    assert!(result.contains("style=\"color: red !important;\""));
}

#[test]
fn test_source_order_breaks_specificity_ties() {
    let html = "<head><style>.a { color: red } .b { color: blue }</style></head>\
                <body><p class=\"b a\">x</p></body>";
    assert!(inline(html, None).contains("style=\"color: blue;\""));
}

#[test]
fn test_selector_list_uses_best_matching_member() {
    // `p, #x` matches through `#x`, so it outranks the later `.c` rule.
    let html = "<head><style>p, #x { color: red } .c { color: blue }</style></head>\
                <body><p id=\"x\" class=\"c\">x</p></body>";
    assert!(inline(html, None).contains("style=\"color: red;\""));
}

#[test]
fn test_pseudo_rules_and_media_queries_stay_in_head() {
    let html = "<html><head><style>\
                a { color: blue; }\
                a:hover { color: red; }\
                @media (max-width: 600px) { a { color: green; } }\
                </style></head><body><a href=\"#\">Link</a></body></html>";
    let result = inline(html, None);

    assert_eq!(opening_tag(&result, "a"), "<a href=\"#\" style=\"color: blue;\">");
    let head = &result[..result.find("</head>").unwrap()];
    assert!(head.contains("<style type=\"text/css\">"));
    assert!(head.contains("a:hover { color:red; }"));
    assert!(head.contains("@media (max-width: 600px) { a { color: green; } }"));
}

#[test]
fn test_descendant_rule() {
    let html = "<head><style>.container p { margin: 0; }</style></head>\
                <body><div class=\"container\"><p>Inside</p></div><p>Outside</p></body>";
    let result = inline(html, None);

    assert_eq!(result.matches("style=\"margin: 0;\"").count(), 1);
    assert!(result.contains("<p>Outside</p>"));
}

#[test]
fn test_additional_css_is_inlined() {
    let html = "<html><head></head><body><div class=\"custom\">Hello</div></body></html>";
    let result = inline(html, Some(".custom { background: yellow; }"));
    assert!(result.contains("style=\"background: yellow;\""));
}

#[test]
fn test_self_closing_and_unquoted_tags() {
    let html = "<body><img class=x src=a.png /><br></body>";
    let result = inline_additional_only(html, ".x { border: 0 } br { clear: both }");
    assert_eq!(
        result,
        "<body><img class=x src=a.png style=\"border: 0;\" /><br style=\"clear: both;\"></body>"
    );
}

#[test]
fn test_quotes_in_values_are_escaped() {
    let html = "<body><p>x</p></body>";
    let result = inline_additional_only(html, "p { font-family: \"Open Sans\", Arial }");
    assert!(result.contains("style=\"font-family: &quot;Open Sans&quot;, Arial;\""));
}

#[test]
fn test_additional_only_keeps_style_elements_and_unmatched_markup() {
    let html = "<html><head><style>.a { color: red }</style></head>\
                <!-- note --><body><!--[if mso]><table><![endif]--><p class=\"a\">x</p></body></html>";
    let result = inline_additional_only(html, "p { margin: 0 } a:hover { color: blue }");

    assert_eq!(
        result,
        "<html><head><style>.a { color: red }</style></head>\
         <!-- note --><body><!--[if mso]><table><![endif]--><p class=\"a\" style=\"margin: 0;\">x</p></body></html>"
    );
}

#[test]
fn test_no_css_returns_input() {
    let html = "<body><p>x</p></body>";
    assert_eq!(inline(html, None), html);
    assert_eq!(inline_additional_only(html, "  "), html);
    assert_eq!(inline_additional_only(html, "span { color: red }"), html);
    assert_eq!(inline("", Some("p { color: red }")), "");
}

#[test]
fn test_style_in_raw_text_is_not_matched() {
    let html = "<body><script>var p = '<p>';</script><p>x</p></body>";
    let result = inline_additional_only(html, "p { color: red }");
    assert_eq!(result.matches("style=").count(), 1);
    assert!(result.contains("var p = '<p>';"));
}

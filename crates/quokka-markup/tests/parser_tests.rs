//! Integration tests for preprocessing and strict parsing.

use quokka_common::ErrorKind;
use quokka_dom::NodeType;
use quokka_markup::{parse, parse_with_depth};

fn nested(depth: usize) -> String {
    let mut src = String::from("<mjml>");
    for _ in 0..depth {
        src.push_str("<mj-wrapper>");
    }
    for _ in 0..depth {
        src.push_str("</mj-wrapper>");
    }
    src.push_str("</mjml>");
    src
}

#[test]
fn test_parse_head_and_body() {
    let doc = parse(
        r#"<?xml version="1.0"?>
        <mjml>
          <mj-head><mj-title>Hello</mj-title></mj-head>
          <mj-body width="500px"><mj-section /></mj-body>
        </mjml>"#,
    )
    .unwrap();
    let tree = doc.tree();
    let head = doc.head().unwrap();
    let body = doc.body().unwrap();
    assert_eq!(tree.attribute(body, "width"), Some("500px"));
    let title = tree.first_child_by_tag(head, "mj-title").unwrap();
    assert_eq!(tree.inner_html(title), "Hello");
}

#[test]
fn test_blank_source_is_parse_error() {
    let err = parse("   \n ").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert_eq!(err.to_string(), "MJML source cannot be null or empty");
}

#[test]
fn test_wrong_root_is_parse_error() {
    let err = parse("<html><body/></html>").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert_eq!(err.to_string(), "Root element must be <mjml>, found <html>");
}

#[test]
fn test_two_roots_rejected() {
    let err = parse("<mjml></mjml><mjml></mjml>").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn test_unclosed_element_is_parse_error() {
    let err = parse("<mjml><mj-body>").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn test_nesting_at_ceiling_succeeds() {
    assert!(parse_with_depth(&nested(5), 5).is_ok());
}

#[test]
fn test_nesting_past_ceiling_is_validation_error() {
    let err = parse_with_depth(&nested(6), 5).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.to_string(), "Maximum nesting depth exceeded (5)");
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    let err = parse(&nested(50_000)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_ending_tag_content_survives_verbatim() {
    let doc = parse(
        "<mjml><mj-body><mj-text>Fish &amp; Chips < 5 > 3 &copy; <br></mj-text></mj-body></mjml>",
    )
    .unwrap();
    let tree = doc.tree();
    let body = doc.body().unwrap();
    let text = tree.first_child_by_tag(body, "mj-text").unwrap();
    assert_eq!(
        tree.inner_html(text),
        "Fish &amp; Chips < 5 > 3 &copy; <br>"
    );
}

#[test]
fn test_entities_outside_ending_tags_decode() {
    let doc = parse("<mjml><mj-head><mj-title>Caf&eacute; &amp; Bar&nbsp;</mj-title></mj-head></mjml>")
        .unwrap();
    let tree = doc.tree();
    let title = tree.first_child_by_tag(doc.head().unwrap(), "mj-title").unwrap();
    assert_eq!(tree.inner_html(title), "Café & Bar\u{a0}");
}

#[test]
fn test_attributes_keep_order() {
    let doc = parse(r#"<mjml><mj-body><mj-image src="a.png" width="100px" alt="x" /></mj-body></mjml>"#)
        .unwrap();
    let tree = doc.tree();
    let image = tree.first_child_by_tag(doc.body().unwrap(), "mj-image").unwrap();
    let names: Vec<_> = tree
        .as_element(image)
        .unwrap()
        .attrs
        .iter()
        .map(|(k, _)| k)
        .collect();
    assert_eq!(names, ["src", "width", "alt"]);
}

#[test]
fn test_comments_and_whitespace() {
    let doc = parse("<mjml>\n  <!-- keep me -->\n  <mj-body>   </mj-body>\n</mjml>").unwrap();
    let tree = doc.tree();
    let children = tree.children(doc.root());
    assert_eq!(children.len(), 2);
    assert!(matches!(
        &tree.get(children[0]).unwrap().node_type,
        NodeType::Comment(text) if text == " keep me "
    ));
    assert!(tree.children(doc.body().unwrap()).is_empty());
}

#[test]
fn test_duplicate_attribute_rejected() {
    let err = parse(r#"<mjml><mj-body a="1" a="2"></mj-body></mjml>"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

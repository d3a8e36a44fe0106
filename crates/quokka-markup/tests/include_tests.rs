//! Integration tests for `mj-include` expansion.

use std::sync::Mutex;

use quokka_common::{Error, ErrorKind, Result};
use quokka_markup::include::resolvers::MapResolver;
use quokka_markup::{IncludeExpander, IncludeLimits, MjmlDocument, ResolverContext, parse};

fn expand_with(resolver: &MapResolver, source: &str, limits: IncludeLimits) -> Result<MjmlDocument> {
    let mut doc = parse(source)?;
    IncludeExpander::new(resolver, limits)?.expand(&mut doc)?;
    Ok(doc)
}

fn expand(resolver: &MapResolver, source: &str) -> Result<MjmlDocument> {
    expand_with(resolver, source, IncludeLimits::default())
}

fn body_tags(doc: &MjmlDocument) -> Vec<String> {
    let tree = doc.tree();
    tree.children(doc.body().unwrap())
        .iter()
        .map(|&c| tree.node_name(c).to_string())
        .collect()
}

#[test]
fn test_fragment_include_splices_in_place() {
    let resolver = MapResolver::new().with(
        "header.mjml",
        "<mj-section><mj-column><mj-text>Hi</mj-text></mj-column></mj-section><mj-spacer />",
    );
    let doc = expand(
        &resolver,
        r#"<mjml><mj-body><mj-divider /><mj-include path="header.mjml" /><mj-image /></mj-body></mjml>"#,
    )
    .unwrap();
    assert_eq!(
        body_tags(&doc),
        ["mj-divider", "mj-section", "mj-spacer", "mj-image"]
    );
    let tree = doc.tree();
    let section = tree.children(doc.body().unwrap())[1];
    assert_eq!(tree.parent(section), doc.body());
}

#[test]
fn test_full_document_include_uses_head_under_head() {
    let resolver = MapResolver::new().with(
        "shared.mjml",
        "<mjml><mj-head><mj-title>T</mj-title></mj-head><mj-body><mj-text>B</mj-text></mj-body></mjml>",
    );
    let doc = expand(
        &resolver,
        r#"<mjml><mj-head><mj-include path="shared.mjml" /></mj-head><mj-body><mj-include path="shared.mjml" /></mj-body></mjml>"#,
    )
    .unwrap();
    let tree = doc.tree();
    assert!(tree.first_child_by_tag(doc.head().unwrap(), "mj-title").is_some());
    assert_eq!(body_tags(&doc), ["mj-text"]);
}

#[test]
fn test_html_and_css_includes() {
    let resolver = MapResolver::new()
        .with("banner.html", "<div>&nbsp;raw</div>")
        .with("theme.css", ".a { color: red; }");
    let doc = expand(
        &resolver,
        r#"<mjml><mj-head><mj-include path="theme.css" type="css" css-inline="inline" /><mj-include path="theme.css" type="css" /></mj-head><mj-body><mj-include path="banner.html" type="html" /></mj-body></mjml>"#,
    )
    .unwrap();
    let tree = doc.tree();
    let head = doc.head().unwrap();
    let styles: Vec<_> = tree.children_by_tag(head, "mj-style").collect();
    assert_eq!(styles.len(), 2);
    assert_eq!(tree.attribute(styles[0], "inline"), Some("inline"));
    assert_eq!(tree.attribute(styles[1], "inline"), None);
    assert_eq!(tree.inner_html(styles[0]), ".a { color: red; }");

    let raw = tree.first_child_by_tag(doc.body().unwrap(), "mj-raw").unwrap();
    assert_eq!(tree.inner_html(raw), "<div>&nbsp;raw</div>");
}

#[test]
fn test_unparseable_fragment_falls_back_to_raw() {
    let resolver = MapResolver::new().with("broken.mjml", "<p>unclosed <b>tags");
    let doc = expand(
        &resolver,
        r#"<mjml><mj-body><mj-include path="broken.mjml" /></mj-body></mjml>"#,
    )
    .unwrap();
    assert_eq!(body_tags(&doc), ["mj-raw"]);
    let tree = doc.tree();
    let raw = tree.children(doc.body().unwrap())[0];
    assert_eq!(tree.inner_html(raw), "<p>unclosed <b>tags");
}

#[test]
fn test_nested_include_error_inside_fragment_propagates() {
    let resolver = MapResolver::new().with("outer.mjml", r#"<mj-include path="missing.mjml" />"#);
    let err = expand(
        &resolver,
        r#"<mjml><mj-body><mj-include path="outer.mjml" /></mj-body></mjml>"#,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Include);
    assert!(err.to_string().contains("missing.mjml"));
}

#[test]
fn test_cycle_is_include_error() {
    let resolver = MapResolver::new()
        .with("a.mjml", r#"<mj-include path="b.mjml" />"#)
        .with("b.mjml", r#"<mj-include path="a.mjml" />"#);
    let err = expand(
        &resolver,
        r#"<mjml><mj-body><mj-include path="a.mjml" /></mj-body></mjml>"#,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Include);
    assert_eq!(err.to_string(), "Circular include detected for path: a.mjml");
}

#[test]
fn test_same_include_twice_as_siblings_is_not_a_cycle() {
    let resolver = MapResolver::new().with("s.mjml", "<mj-spacer />");
    let doc = expand(
        &resolver,
        r#"<mjml><mj-body><mj-include path="s.mjml" /><mj-include path="s.mjml" /></mj-body></mjml>"#,
    )
    .unwrap();
    assert_eq!(body_tags(&doc), ["mj-spacer", "mj-spacer"]);
}

/// `l0` includes `l1` includes ... includes `l{n-1}`, which is plain content.
fn chain_resolver(n: usize) -> MapResolver {
    (0..n)
        .map(|i| {
            let content = if i + 1 == n {
                "<mj-spacer />".to_string()
            } else {
                format!(r#"<mj-include path="l{}" />"#, i + 1)
            };
            (format!("l{i}"), content)
        })
        .collect()
}

#[test]
fn test_include_chain_at_depth_ceiling_succeeds() {
    let limits = IncludeLimits {
        max_include_depth: 3,
        ..IncludeLimits::default()
    };
    let doc = expand_with(
        &chain_resolver(3),
        r#"<mjml><mj-body><mj-include path="l0" /></mj-body></mjml>"#,
        limits,
    )
    .unwrap();
    assert_eq!(body_tags(&doc), ["mj-spacer"]);
}

#[test]
fn test_include_chain_past_depth_ceiling_fails() {
    let limits = IncludeLimits {
        max_include_depth: 3,
        ..IncludeLimits::default()
    };
    let err = expand_with(
        &chain_resolver(4),
        r#"<mjml><mj-body><mj-include path="l0" /></mj-body></mjml>"#,
        limits,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Include);
    assert!(err.to_string().starts_with("Maximum include depth exceeded (3)"));
}

#[test]
fn test_missing_path_and_unknown_type() {
    let resolver = MapResolver::new().with("x", "<mj-spacer />");
    let err = expand(&resolver, "<mjml><mj-body><mj-include /></mj-body></mjml>").unwrap_err();
    assert_eq!(err.to_string(), "mj-include requires a 'path' attribute");

    let err = expand(
        &resolver,
        r#"<mjml><mj-body><mj-include path="x" type="pdf" /></mj-body></mjml>"#,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Unknown mj-include type: pdf");
}

#[test]
fn test_oversized_include_is_validation_error() {
    let resolver = MapResolver::new().with("big", "<mj-spacer />".repeat(10));
    let limits = IncludeLimits {
        max_input_size: 20,
        ..IncludeLimits::default()
    };
    let err = expand_with(
        &resolver,
        r#"<mjml><mj-body><mj-include path="big" /></mj-body></mjml>"#,
        limits,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_resolver_sees_including_path() {
    let seen = Mutex::new(Vec::new());
    let resolver = |path: &str, context: &ResolverContext| -> Result<String> {
        seen.lock()
            .unwrap()
            .push((path.to_string(), context.including_path.clone(), context.depth));
        match path {
            "outer" => Ok(r#"<mj-include path="inner" />"#.to_string()),
            "inner" => Ok("<mj-spacer />".to_string()),
            _ => Err(Error::include("unexpected")),
        }
    };
    let mut doc = parse(r#"<mjml><mj-body><mj-include path="outer" /></mj-body></mjml>"#).unwrap();
    IncludeExpander::new(&resolver, IncludeLimits::default())
        .unwrap()
        .expand(&mut doc)
        .unwrap();
    let seen = seen.into_inner().unwrap();
    assert_eq!(
        seen,
        [
            ("outer".to_string(), None, 0),
            ("inner".to_string(), Some("outer".to_string()), 1),
        ]
    );
}

#[test]
fn test_zero_include_depth_rejected() {
    let resolver = MapResolver::new();
    let limits = IncludeLimits {
        max_include_depth: 0,
        ..IncludeLimits::default()
    };
    let err = IncludeExpander::new(&resolver, limits).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

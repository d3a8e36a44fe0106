//! Compile tests for `mj-include` through the configured resolver.

use std::fs;
use std::sync::Arc;

use quokka_common::ErrorKind;
use quokka_compiler::resolvers::{FileSystemResolver, MapResolver};
use quokka_compiler::{Compiler, Configuration, ContentResolver};

fn compiler_with(resolver: Arc<dyn ContentResolver>) -> Compiler {
    let config = Configuration::builder().resolver(resolver).build().unwrap();
    Compiler::new(config).unwrap()
}

#[test]
fn test_included_section_is_rendered() {
    let resolver = MapResolver::new().with(
        "footer.mjml",
        "<mj-section><mj-column><mj-text>Footer text</mj-text></mj-column></mj-section>",
    );
    let output = compiler_with(Arc::new(resolver))
        .compile(r#"<mjml><mj-body><mj-include path="footer.mjml" /></mj-body></mjml>"#)
        .unwrap();
    assert!(output.html.contains("Footer text"));
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_included_css_is_inlined() {
    let resolver = MapResolver::new().with("theme.css", ".note { color: blue; }");
    let output = compiler_with(Arc::new(resolver))
        .compile(
            r#"<mjml><mj-head><mj-include path="theme.css" type="css" css-inline="inline" /></mj-head>
            <mj-body><mj-section><mj-column><mj-text css-class="note">Hi</mj-text>
            </mj-column></mj-section></mj-body></mjml>"#,
        )
        .unwrap();
    assert!(output.html.contains("color: blue;"));
}

#[test]
fn test_circular_include_fails() {
    let resolver = MapResolver::new()
        .with("a.mjml", r#"<mj-include path="b.mjml" />"#)
        .with("b.mjml", r#"<mj-include path="a.mjml" />"#);
    let err = compiler_with(Arc::new(resolver))
        .compile(r#"<mjml><mj-body><mj-include path="a.mjml" /></mj-body></mjml>"#)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Include);
}

#[test]
fn test_include_depth_ceiling() {
    let resolver = MapResolver::new()
        .with("one.mjml", r#"<mj-include path="two.mjml" />"#)
        .with("two.mjml", "<mj-spacer />");
    let source = r#"<mjml><mj-body><mj-include path="one.mjml" /></mj-body></mjml>"#;

    let at_ceiling = Configuration::builder()
        .resolver(Arc::new(resolver.clone()))
        .max_include_depth(2)
        .build()
        .unwrap();
    assert!(Compiler::new(at_ceiling).unwrap().compile(source).is_ok());

    let below = Configuration::builder()
        .resolver(Arc::new(resolver))
        .max_include_depth(1)
        .build()
        .unwrap();
    let err = Compiler::new(below).unwrap().compile(source).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Include);
}

#[test]
fn test_filesystem_include() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("hero.mjml"),
        "<mj-section><mj-column><mj-text>From disk</mj-text></mj-column></mj-section>",
    )
    .unwrap();
    let resolver = FileSystemResolver::new(dir.path()).unwrap();
    let output = compiler_with(Arc::new(resolver))
        .compile(r#"<mjml><mj-body><mj-include path="hero.mjml" /></mj-body></mjml>"#)
        .unwrap();
    assert!(output.html.contains("From disk"));
}

#[test]
fn test_missing_resolver_leaves_include_with_diagnostic() {
    let output = Compiler::new(Configuration::default())
        .unwrap()
        .compile(r#"<mjml><mj-body><mj-include path="nowhere.mjml" /></mj-body></mjml>"#)
        .unwrap();
    assert!(
        output
            .diagnostics
            .iter()
            .any(|d| d.message == "Unresolved mj-include remains in tree: nowhere.mjml")
    );
}

//! End-to-end compile tests.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use quokka_common::ErrorKind;
use quokka_compiler::{CompileOutput, Compiler, Configuration};

fn compile(source: &str) -> CompileOutput {
    Compiler::new(Configuration::default())
        .unwrap()
        .compile(source)
        .unwrap()
}

fn body(content: &str) -> String {
    format!("<mjml><mj-body>{content}</mj-body></mjml>")
}

fn column(content: &str) -> String {
    body(&format!("<mj-section><mj-column>{content}</mj-column></mj-section>"))
}

#[test]
fn test_minimal_document() {
    let output = compile(&column("<mj-text>Hello</mj-text>"));
    assert!(output.html.starts_with("<!doctype html>\n<html lang=\"und\" dir=\"auto\""));
    assert!(output.html.contains(">Hello</div>"));
    assert!(output.html.contains("aria-roledescription=\"email\""));
    assert!(output.html.ends_with("</body>\n\n</html>\n"));
    assert!(output.title.is_empty());
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_unknown_tag_is_skipped() {
    let output = compile(&column(
        "<mj-text>Before</mj-text><mj-sparkle>x</mj-sparkle><mj-text>After</mj-text>",
    ));
    assert!(output.html.contains("Before"));
    assert!(output.html.contains("After"));
    assert!(!output.html.contains("mj-sparkle"));
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].message, "Unknown MJML tag: mj-sparkle");
}

#[test]
fn test_non_breaking_space_survives_text_normalisation() {
    let output = compile(&column(
        "<mj-text>\u{a0}</mj-text><mj-text> Price:\u{a0}5 </mj-text>",
    ));
    assert!(output.html.contains(">\u{a0}</div>"));
    assert!(output.html.contains(">Price:\u{a0}5</div>"));
}

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_unknown_tags_log_a_warning() {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let output = tracing::subscriber::with_default(subscriber, || {
        compile(
            "<mjml><mj-head><mj-glitter /></mj-head>\
             <mj-body><mj-section><mj-column><mj-sparkle>x</mj-sparkle></mj-column>\
             </mj-section></mj-body></mjml>",
        )
    });
    assert_eq!(output.diagnostics.len(), 2);

    let logged = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
    assert!(logged.contains("WARN"));
    assert!(logged.contains("unknown MJML tag in mj-head"));
    assert!(logged.contains("mj-glitter"));
    assert!(logged.contains("unknown MJML tag in mj-body"));
    assert!(logged.contains("mj-sparkle"));
}

#[test]
fn test_ending_tag_content_is_verbatim() {
    let output = compile(&column("<mj-text>Tom & Jerry, a < b > c</mj-text>"));
    assert!(output.html.contains("Tom & Jerry, a < b > c"));
    assert!(!output.html.contains("&amp;amp;"));
}

#[test]
fn test_head_metadata() {
    let output = compile(
        "<mjml><mj-head><mj-title>Welcome</mj-title><mj-preview>Read me</mj-preview>\
         <!-- keep me --></mj-head><mj-body></mj-body></mjml>",
    );
    assert_eq!(output.title, "Welcome");
    assert_eq!(output.preview_text, "Read me");
    assert!(output.html.contains("<title>Welcome</title>"));
    assert!(output.html.contains("overflow:hidden;\">Read me</div>"));
    assert!(output.html.contains("  <!-- keep me -->\n</head>"));
    assert!(output.html.contains("aria-label=\"Welcome\""));
}

#[test]
fn test_columns_register_media_queries() {
    let output = compile(&body(
        "<mj-section><mj-column><mj-text>A</mj-text></mj-column>\
         <mj-column width=\"150px\"><mj-text>B</mj-text></mj-column></mj-section>",
    ));
    assert!(output.html.contains("class=\"mj-column-per-50 mj-outlook-group-fix\""));
    assert!(output.html.contains("class=\"mj-column-px-150 mj-outlook-group-fix\""));
    assert!(output.html.contains("@media only screen and (min-width:480px)"));
    assert!(output.html.contains(".mj-column-per-50 {\n        width: 50% !important;"));
    assert!(output.html.contains(".moz-text-html .mj-column-px-150 {"));
}

#[test]
fn test_breakpoint_and_attributes_cascade() {
    let output = compile(
        "<mjml><mj-head><mj-breakpoint width=\"320px\" />\
         <mj-attributes><mj-all font-family=\"Arial\" /><mj-text color=\"#abc\" />\
         <mj-class name=\"big\" font-size=\"30px\" /></mj-attributes></mj-head>\
         <mj-body><mj-section><mj-column><mj-text mj-class=\"big\">Hi</mj-text>\
         </mj-column></mj-section></mj-body></mjml>",
    );
    assert!(output.html.contains("(min-width:320px)"));
    assert!(output.html.contains("font-family:Arial;font-size:30px;"));
    assert!(output.html.contains("color:#aabbcc;"));
}

#[test]
fn test_default_font_is_linked_when_used() {
    let output = compile(&column("<mj-text font-family=\"Lato, sans-serif\">Hi</mj-text>"));
    assert!(output.html.contains(
        "<link href=\"https://fonts.googleapis.com/css?family=Lato:300,400,500,700\" rel=\"stylesheet\""
    ));
    assert!(!output.html.contains("family=Ubuntu"));
}

#[test]
fn test_font_with_bad_href_is_skipped() {
    let output = compile(
        "<mjml><mj-head><mj-font name=\"Evil\" href=\"javascript:x\" /></mj-head>\
         <mj-body></mj-body></mjml>",
    );
    assert!(
        output
            .diagnostics
            .iter()
            .any(|d| d.message.contains("must start with http:// or https://"))
    );
}

#[test]
fn test_inline_style_is_applied() {
    let output = compile(
        "<mjml><mj-head><mj-style inline=\"inline\">.red { color: red; }</mj-style></mj-head>\
         <mj-body><mj-section><mj-column><mj-text css-class=\"red\">Hi</mj-text>\
         </mj-column></mj-section></mj-body></mjml>",
    );
    assert!(output.html.contains("class=\"red\" style=\""));
    assert!(output.html.contains("color: red;"));
    assert!(!output.html.contains(" />"));
}

#[test]
fn test_plain_style_goes_to_head() {
    let output = compile(
        "<mjml><mj-head><mj-style>.a {\ncolor: red;\n}</mj-style></mj-head>\
         <mj-body></mj-body></mjml>",
    );
    assert!(output.html.contains("  <style type=\"text/css\">\n    .a {\n      color: red;\n    }\n\n  </style>\n"));
}

#[test]
fn test_html_attributes_are_spliced() {
    let output = compile(
        "<mjml><mj-head><mj-html-attributes><mj-selector path=\".cta td\">\
         <mj-html-attribute name=\"data-id\">42</mj-html-attribute></mj-selector>\
         </mj-html-attributes></mj-head><mj-body><mj-section><mj-column>\
         <mj-button css-class=\"cta\" href=\"https://example.com\">Go</mj-button>\
         </mj-column></mj-section></mj-body></mjml>",
    );
    assert!(output.html.contains("data-id=\"42\""));
}

#[test]
fn test_dangerous_href_is_neutralised() {
    let output = compile(&column("<mj-button href=\"javascript:alert(1)\">Go</mj-button>"));
    assert!(output.html.contains("<a href=\"#\""));
    assert!(!output.html.contains("javascript:"));
}

#[test]
fn test_raw_file_start() {
    let output = compile(&body("<mj-raw position=\"file-start\">{% if x %}</mj-raw>"));
    assert!(output.html.starts_with("{% if x %}\n<!doctype html>"));
}

#[test]
fn test_adjacent_sections_merge_conditionals() {
    let output = compile(&body(
        "<mj-section><mj-column><mj-text>A</mj-text></mj-column></mj-section>\
         <mj-section><mj-column><mj-text>B</mj-text></mj-column></mj-section>",
    ));
    assert!(output.html.contains("<!--[if mso | IE]></td></tr></table><table align=\"center\""));
}

#[test]
fn test_malformed_input_is_parse_error() {
    let err = Compiler::new(Configuration::default())
        .unwrap()
        .compile("<mjml><mj-body>")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn test_body_width_and_background() {
    let output = compile(
        "<mjml><mj-body width=\"500px\" background-color=\"#f0f0f0\"><mj-section>\
         <mj-column><mj-image src=\"https://example.com/a.png\" /></mj-column>\
         </mj-section></mj-body></mjml>",
    );
    assert!(output.html.contains("<body style=\"word-spacing:normal;background-color:#f0f0f0;\">"));
    assert!(output.html.contains("max-width:500px;"));
    // 500 minus the image's 25px side padding.
    assert!(output.html.contains("width=\"450\""));
}

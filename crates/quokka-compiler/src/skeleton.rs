//! The HTML document wrapped around the rendered body.

use std::fmt::Write as _;

use quokka_common::escape::{escape_attribute_value, escape_css_url};
use quokka_core::DocumentContext;

use crate::config::Configuration;

const MSO_PIXELS_PER_INCH: u32 = 96;

/// Widest viewport the fluid-image rules apply to.
const FLUID_MOBILE_MAX_WIDTH: u32 = 479;

const RESET_CSS: &str = "    #outlook a {
      padding: 0;
    }

    body {
      margin: 0;
      padding: 0;
      -webkit-text-size-adjust: 100%;
      -ms-text-size-adjust: 100%;
    }

    table,
    td {
      border-collapse: collapse;
      mso-table-lspace: 0pt;
      mso-table-rspace: 0pt;
    }

    img {
      border: 0;
      height: auto;
      line-height: 100%;
      outline: none;
      text-decoration: none;
      -ms-interpolation-mode: bicubic;
    }

    p {
      display: block;
      margin: 13px 0;
    }

";

const FLUID_MOBILE_CSS: &str = "      table.mj-full-width-mobile {
        width: 100% !important;
      }

      td.mj-full-width-mobile {
        width: auto !important;
      }
    }

";

const PREVIEW_STYLE: &str = "display:none;font-size:1px;color:#ffffff;line-height:1px;max-height:0px;max-width:0px;opacity:0;overflow:hidden;";

/// Assemble the full document around `body`.
pub(crate) fn assemble(body: &str, document: &DocumentContext, config: &Configuration) -> String {
    let metadata = &document.metadata;
    let mut html = String::with_capacity(body.len() + 4096);

    for content in metadata.file_start_content() {
        html.push_str(content);
        html.push('\n');
    }

    let _ = write!(
        html,
        "<!doctype html>\n<html lang=\"{}\" dir=\"{}\" xmlns=\"http://www.w3.org/1999/xhtml\" \
         xmlns:v=\"urn:schemas-microsoft-com:vml\" xmlns:o=\"urn:schemas-microsoft-com:office:office\">\n\n",
        escape_attribute_value(config.language()),
        config.direction()
    );

    html.push_str("<head>\n");
    let _ = writeln!(html, "  <title>{}</title>", escape_attribute_value(metadata.title()));
    html.push_str("  <!--[if !mso]><!-->\n");
    html.push_str("  <meta http-equiv=\"X-UA-Compatible\" content=\"IE=edge\">\n");
    html.push_str("  <!--<![endif]-->\n");
    html.push_str("  <meta http-equiv=\"Content-Type\" content=\"text/html; charset=UTF-8\">\n");
    html.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("  <style type=\"text/css\">\n");
    html.push_str(RESET_CSS);
    html.push_str("  </style>\n");

    html.push_str("  <!--[if mso]>\n    <noscript>\n    <xml>\n    <o:OfficeDocumentSettings>\n");
    html.push_str("      <o:AllowPNG/>\n");
    let _ = writeln!(html, "      <o:PixelsPerInch>{MSO_PIXELS_PER_INCH}</o:PixelsPerInch>");
    html.push_str("    </o:OfficeDocumentSettings>\n    </xml>\n    </noscript>\n    <![endif]-->\n");
    html.push_str("  <!--[if lte mso 11]>\n    <style type=\"text/css\">\n");
    html.push_str("      .mj-outlook-group-fix { width:100% !important; }\n");
    html.push_str("    </style>\n    <![endif]-->\n");

    push_fonts(&mut html, document);
    push_media_queries(&mut html, document);

    let styles = &document.styles;
    let fluid = styles.fluid_on_mobile_used();
    if fluid || !styles.component_styles().is_empty() {
        html.push_str("  <style type=\"text/css\">\n");
        if fluid {
            let _ = writeln!(html, "    @media only screen and (max-width:{FLUID_MOBILE_MAX_WIDTH}px) {{");
            html.push_str(FLUID_MOBILE_CSS);
        }
        for css in styles.component_styles() {
            html.push_str(&reformat_css(css));
        }
        html.push_str("  </style>\n");
    }

    for css in styles.styles() {
        html.push_str("  <style type=\"text/css\">\n");
        html.push_str(&reformat_css(css));
        html.push_str("  </style>\n");
    }

    for comment in metadata.head_comments() {
        let _ = writeln!(html, "  <!-- {} -->", comment.replace("--", ""));
    }
    for raw in metadata.head_raw() {
        html.push_str(raw);
        html.push('\n');
    }
    html.push_str("</head>\n\n");

    html.push_str("<body style=\"word-spacing:normal;");
    let background = metadata.body_background_color();
    if !background.is_empty() {
        let _ = write!(html, "background-color:{};", escape_attribute_value(background));
    }
    html.push_str("\">\n");
    if !metadata.preview_text().is_empty() {
        let _ = writeln!(
            html,
            "  <div style=\"{PREVIEW_STYLE}\">{}</div>",
            escape_attribute_value(metadata.preview_text())
        );
    }
    html.push_str(body);
    html.push_str("</body>\n\n</html>\n");
    html
}

fn push_fonts(html: &mut String, document: &DocumentContext) {
    let fonts = document.styles.fonts();
    if fonts.is_empty() {
        return;
    }
    html.push_str("  <!--[if !mso]><!-->\n");
    for font in fonts {
        let _ = writeln!(
            html,
            "  <link href=\"{}\" rel=\"stylesheet\" type=\"text/css\">",
            escape_attribute_value(&font.href)
        );
    }
    html.push_str("  <style type=\"text/css\">\n");
    for font in fonts {
        let _ = writeln!(html, "    @import url(\"{}\");", escape_css_url(&font.href));
    }
    html.push_str("\n  </style>\n  <!--<![endif]-->\n");
}

fn push_media_queries(html: &mut String, document: &DocumentContext) {
    let queries = document.styles.media_queries();
    if queries.is_empty() {
        return;
    }
    let breakpoint = document.metadata.breakpoint();

    html.push_str("  <style type=\"text/css\">\n");
    let _ = writeln!(html, "    @media only screen and (min-width:{breakpoint}) {{");
    for (index, query) in queries.iter().enumerate() {
        let width = format!("{}{}", query.width_value, query.width_unit);
        let _ = writeln!(html, "      .{} {{", query.class_name);
        let _ = writeln!(html, "        width: {width} !important;");
        let _ = writeln!(html, "        max-width: {width};");
        html.push_str("      }\n");
        if index + 1 < queries.len() {
            html.push('\n');
        }
    }
    html.push_str("    }\n\n  </style>\n");

    let _ = writeln!(html, "  <style media=\"screen and (min-width:{breakpoint})\">");
    for (index, query) in queries.iter().enumerate() {
        let width = format!("{}{}", query.width_value, query.width_unit);
        let _ = writeln!(html, "    .moz-text-html .{} {{", query.class_name);
        let _ = writeln!(html, "      width: {width} !important;");
        let _ = writeln!(html, "      max-width: {width};");
        html.push_str("    }\n");
        if index + 1 < queries.len() {
            html.push('\n');
        }
    }
    html.push_str("\n  </style>\n");
}

/// Re-indent a stylesheet: four spaces, plus two per open brace.
fn reformat_css(css: &str) -> String {
    let mut out = String::with_capacity(css.len() + 64);
    let mut depth = 0usize;
    for line in css.split('\n') {
        let line = line.trim();
        if line.is_empty() {
            out.push('\n');
            continue;
        }
        if line.starts_with('}') {
            depth = depth.saturating_sub(1);
        }
        out.push_str("    ");
        out.push_str(&"  ".repeat(depth));
        out.push_str(line);
        out.push('\n');
        if line.ends_with('{') {
            depth += 1;
        }
    }
    out.push('\n');
    out
}

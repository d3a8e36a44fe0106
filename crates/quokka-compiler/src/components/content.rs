//! Leaf content components: text, image, button, divider, spacer, table
//! and raw passthrough.

use quokka_core::{Cascade, RenderContext};
use quokka_css::values::{parse_px, parse_shorthand, to_pixels};
use quokka_dom::NodeId;

use super::body::box_model;
use super::style::{MSO_END, MSO_START, StyleBuilder, is_visible_border};
use super::{BodyRenderer, BuiltinComponent};

const DEFAULT_FONT_FAMILY: &str = "Ubuntu, Helvetica, Arial, sans-serif";

pub(crate) const TEXT_DEFAULTS: &[(&str, &str)] = &[
    ("align", "left"),
    ("color", "#000000"),
    ("container-background-color", ""),
    ("font-family", DEFAULT_FONT_FAMILY),
    ("font-size", "13px"),
    ("font-style", ""),
    ("font-weight", ""),
    ("height", ""),
    ("letter-spacing", ""),
    ("line-height", "1"),
    ("padding", "10px 25px"),
    ("padding-bottom", ""),
    ("padding-left", ""),
    ("padding-right", ""),
    ("padding-top", ""),
    ("text-decoration", ""),
    ("text-transform", ""),
];

pub(crate) const IMAGE_DEFAULTS: &[(&str, &str)] = &[
    ("align", "center"),
    ("alt", ""),
    ("border", "0"),
    ("border-radius", ""),
    ("container-background-color", ""),
    ("fluid-on-mobile", ""),
    ("height", "auto"),
    ("href", ""),
    ("padding", "10px 25px"),
    ("sizes", ""),
    ("src", ""),
    ("srcset", ""),
    ("target", "_blank"),
    ("title", ""),
    ("width", ""),
];

pub(crate) const BUTTON_DEFAULTS: &[(&str, &str)] = &[
    ("align", "center"),
    ("background-color", "#414141"),
    ("border", "none"),
    ("border-bottom", ""),
    ("border-left", ""),
    ("border-radius", "3px"),
    ("border-right", ""),
    ("border-top", ""),
    ("color", "#ffffff"),
    ("container-background-color", ""),
    ("font-family", DEFAULT_FONT_FAMILY),
    ("font-size", "13px"),
    ("font-style", ""),
    ("font-weight", "normal"),
    ("height", ""),
    ("href", "#"),
    ("inner-padding", "10px 25px"),
    ("letter-spacing", ""),
    ("line-height", "120%"),
    ("padding", "10px 25px"),
    ("rel", ""),
    ("target", "_blank"),
    ("text-align", ""),
    ("text-decoration", "none"),
    ("text-transform", "none"),
    ("vertical-align", "middle"),
    ("width", ""),
];

pub(crate) const DIVIDER_DEFAULTS: &[(&str, &str)] = &[
    ("align", "center"),
    ("border-color", "#000000"),
    ("border-style", "solid"),
    ("border-width", "4px"),
    ("container-background-color", ""),
    ("padding", "10px 25px"),
    ("width", "100%"),
];

pub(crate) const SPACER_DEFAULTS: &[(&str, &str)] = &[
    ("container-background-color", ""),
    ("height", "0px"),
    ("padding", ""),
    ("vertical-align", ""),
];

pub(crate) const TABLE_DEFAULTS: &[(&str, &str)] = &[
    ("align", "left"),
    ("border", "none"),
    ("cellpadding", "0"),
    ("cellspacing", "0"),
    ("color", "#000000"),
    ("container-background-color", ""),
    ("font-family", DEFAULT_FONT_FAMILY),
    ("font-size", "13px"),
    ("line-height", "22px"),
    ("padding", "10px 25px"),
    ("table-layout", "auto"),
    ("width", "100%"),
];

pub(crate) const RAW_DEFAULTS: &[(&str, &str)] = &[("position", "")];

const INDENT: &str = "                        ";

const BLOCK_TAGS: &[&str] = &[
    "ul", "ol", "p", "div", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "table", "pre",
];

/// Collapse each ASCII whitespace run to one space without trimming the
/// ends. Non-breaking spaces are content and survive.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_ascii_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

fn tag_name(tag: &str) -> String {
    tag.trim_start_matches('<')
        .trim_start_matches('/')
        .chars()
        .take_while(|c| !matches!(c, ' ' | '>' | '/' | '\t' | '\n'))
        .collect::<String>()
        .to_ascii_lowercase()
}

fn is_block_tag(name: &str) -> bool {
    BLOCK_TAGS.contains(&name) || matches!(name, "li" | "br")
}

fn contains_block_element(html: &str) -> bool {
    let lower = html.to_ascii_lowercase();
    BLOCK_TAGS.iter().any(|tag| lower.contains(&format!("<{tag}")))
}

/// Collapse whitespace inside text runs. A whitespace-only run after a
/// block boundary becomes a newline.
fn collapse_inline_whitespace(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    let mut after_block = false;
    while !rest.is_empty() {
        if rest.starts_with('<') {
            let Some(end) = rest.find('>') else {
                out.push_str(rest);
                break;
            };
            let tag = &rest[..=end];
            out.push_str(tag);
            after_block = is_block_tag(&tag_name(tag));
            rest = &rest[end + 1..];
        } else {
            let next = rest.find('<').unwrap_or(rest.len());
            let collapsed = collapse_whitespace(&rest[..next]);
            let blank = collapsed.trim_ascii().is_empty();
            if after_block && blank {
                out.push('\n');
            } else {
                out.push_str(&collapsed);
            }
            if !blank {
                after_block = false;
            }
            rest = &rest[next..];
        }
    }
    out
}

/// Normalise `mj-text` content. Plain text collapses to one line; markup
/// with block elements is framed by newlines so the closing `</div>` sits
/// on its own line.
fn text_content(inner: &str) -> String {
    let trimmed = inner.trim_ascii();
    if trimmed.is_empty() {
        return String::new();
    }
    if !trimmed.contains('<') {
        return collapse_whitespace(inner).trim_ascii().to_string();
    }
    if contains_block_element(trimmed) {
        return format!("\n{}\n", collapse_inline_whitespace(trimmed));
    }
    let collapsed = collapse_inline_whitespace(trimmed);
    if collapsed.contains('\n') {
        collapsed + "\n"
    } else {
        collapsed
    }
}

fn horizontal_padding(attrs: &Cascade<'_>) -> f64 {
    let model = box_model(attrs, false);
    model.padding.left + model.padding.right
}

impl BodyRenderer<'_> {
    pub(super) fn render_text(&self, node: NodeId) -> String {
        let attrs = self.attrs(node, BuiltinComponent::Text);
        let mut style = StyleBuilder::new();
        let _ = style
            .set("font-family", attrs.get_or("font-family", ""))
            .set("font-size", attrs.get_or("font-size", ""))
            .set("font-style", attrs.get_or("font-style", ""))
            .set("font-weight", attrs.get_or("font-weight", ""))
            .set("letter-spacing", attrs.get_or("letter-spacing", ""))
            .set("line-height", attrs.get_or("line-height", ""))
            .set("text-align", attrs.get_or("align", ""))
            .set("text-decoration", attrs.get_or("text-decoration", ""))
            .set("text-transform", attrs.get_or("text-transform", ""))
            .set("color", attrs.get_or("color", ""))
            .set_opt("height", attrs.non_empty("height"));

        let content = text_content(&self.tree().inner_html(node));
        let close = if content.ends_with('\n') {
            format!("{INDENT}</div>")
        } else {
            "</div>".to_string()
        };
        format!("{INDENT}<div style=\"{}\">{content}{close}", style.finish())
    }

    pub(super) fn render_image(&mut self, node: NodeId, context: &RenderContext) -> String {
        let attrs = self.attrs(node, BuiltinComponent::Image);
        let available = context.container_width() - horizontal_padding(&attrs);
        let width = attrs
            .non_empty("width")
            .map_or(available, |declared| {
                to_pixels(&declared, context.container_width()).min(available)
            });
        #[allow(clippy::cast_possible_truncation)]
        let width = width as i64;
        let height = attrs.get_or("height", "auto");

        let mut style = StyleBuilder::new();
        let _ = style
            .set("border", attrs.get_or("border", "0"))
            .set_opt("border-radius", attrs.non_empty("border-radius"))
            .set("display", "block")
            .set("outline", "none")
            .set("text-decoration", "none")
            .set("height", height.clone())
            .set("width", "100%")
            .set("font-size", "13px");

        let mut img = format!(
            "<img alt=\"{}\" src=\"{}\"",
            self.escape(&attrs.get_or("alt", "")),
            self.escape(&attrs.get_or("src", ""))
        );
        if let Some(srcset) = attrs.non_empty("srcset") {
            img.push_str(&format!(" srcset=\"{}\"", self.escape(&srcset.replace(", ", ",\n"))));
        }
        if let Some(sizes) = attrs.non_empty("sizes") {
            img.push_str(&format!(" sizes=\"{}\"", self.escape(&sizes)));
        }
        img.push_str(&format!(" style=\"{}\"", style.finish()));
        let title = attrs.non_empty("title");
        if let Some(title) = &title {
            img.push_str(&format!(" title=\"{}\"", self.escape(title)));
        }
        img.push_str(&format!(" width=\"{width}\" height=\"{}\" />", self.escape(&height)));

        let fluid = attrs.get("fluid-on-mobile").as_deref() == Some("true");
        if fluid {
            self.mark_fluid_on_mobile();
        }
        let fluid_class = if fluid {
            " class=\"mj-full-width-mobile\""
        } else {
            ""
        };

        let mut html = format!(
            "{INDENT}<table border=\"0\" cellpadding=\"0\" cellspacing=\"0\" role=\"presentation\" style=\"border-collapse:collapse;border-spacing:0px;\"{fluid_class}>\n"
        );
        html.push_str(&format!("{INDENT}  <tbody>\n{INDENT}    <tr>\n"));
        html.push_str(&format!("{INDENT}      <td style=\"width:{width}px;\"{fluid_class}>\n"));
        if let Some(href) = attrs.non_empty("href") {
            html.push_str(&format!(
                "{INDENT}        <a href=\"{}\" target=\"{}\"",
                self.href(&href),
                self.escape(&attrs.get_or("target", "_blank"))
            ));
            if let Some(title) = &title {
                html.push_str(&format!(" title=\"{}\"", self.escape(title)));
            }
            html.push_str(&format!(">\n{INDENT}          {img}\n{INDENT}        </a>\n"));
        } else {
            html.push_str(&format!("{INDENT}        {img}\n"));
        }
        html.push_str(&format!(
            "{INDENT}      </td>\n{INDENT}    </tr>\n{INDENT}  </tbody>\n{INDENT}</table>"
        ));
        html
    }

    pub(super) fn render_button(&self, node: NodeId, context: &RenderContext) -> String {
        let attrs = self.attrs(node, BuiltinComponent::Button);
        let background = attrs.get_or("background-color", "#414141");
        let radius = attrs.get_or("border-radius", "3px");
        let inner_padding = attrs.get_or("inner-padding", "10px 25px");
        let font_style = attrs.non_empty("font-style");

        let mut td = StyleBuilder::new();
        let _ = td.set("border", attrs.get_or("border", "none"));
        for name in ["border-bottom", "border-left", "border-right", "border-top"] {
            let value = attrs.get_or(name, "");
            if is_visible_border(&value) {
                let _ = td.set(name, value);
            }
        }
        let _ = td
            .set("border-radius", radius.clone())
            .set("cursor", "auto")
            .set_opt("font-style", font_style.clone())
            .set("mso-padding-alt", inner_padding.clone())
            .set("background", background.clone());

        let width = attrs.non_empty("width");
        let mut anchor = StyleBuilder::new();
        let _ = anchor.set("display", "inline-block");
        if let Some(width) = width.as_deref().filter(|w| !w.ends_with('%')) {
            let padding = parse_shorthand(&inner_padding);
            let inner = to_pixels(width, context.container_width()) - padding.left - padding.right;
            #[allow(clippy::cast_possible_truncation)]
            let inner = inner as i64;
            let _ = anchor.set("width", format!("{inner}px"));
        }
        let _ = anchor
            .set("background", background.clone())
            .set("color", attrs.get_or("color", "#ffffff"))
            .set("font-family", attrs.get_or("font-family", DEFAULT_FONT_FAMILY))
            .set("font-size", attrs.get_or("font-size", "13px"))
            .set_opt("font-style", font_style)
            .set("font-weight", attrs.get_or("font-weight", "normal"))
            .set("line-height", attrs.get_or("line-height", "120%"))
            .set_opt("letter-spacing", attrs.non_empty("letter-spacing"))
            .set("margin", "0")
            .set("text-decoration", attrs.get_or("text-decoration", "none"))
            .set("text-transform", attrs.get_or("text-transform", "none"))
            .set("padding", inner_padding)
            .set("mso-padding-alt", "0px")
            .set("border-radius", radius);

        let mut outer = StyleBuilder::new();
        let _ = outer
            .set("border-collapse", "separate")
            .set_opt("width", width)
            .set("line-height", "100%");

        let mut html = format!(
            "{INDENT}<table border=\"0\" cellpadding=\"0\" cellspacing=\"0\" role=\"presentation\" style=\"{}\">\n",
            outer.finish()
        );
        html.push_str(&format!("{INDENT}  <tbody>\n{INDENT}    <tr>\n"));
        html.push_str(&format!(
            "{INDENT}      <td align=\"center\" bgcolor=\"{}\" role=\"presentation\" style=\"{}\" valign=\"{}\">\n",
            self.escape(&background),
            td.finish(),
            self.escape(&attrs.get_or("vertical-align", "middle"))
        ));
        html.push_str(&format!(
            "{INDENT}        <a href=\"{}\"",
            self.href(&attrs.get_or("href", "#"))
        ));
        if let Some(rel) = attrs.non_empty("rel") {
            html.push_str(&format!(" rel=\"{}\"", self.escape(&rel)));
        }
        let label = collapse_whitespace(&self.tree().inner_html(node));
        html.push_str(&format!(
            " style=\"{}\" target=\"{}\"> {} </a>\n",
            anchor.finish(),
            self.escape(&attrs.get_or("target", "_blank")),
            label.trim()
        ));
        html.push_str(&format!(
            "{INDENT}      </td>\n{INDENT}    </tr>\n{INDENT}  </tbody>\n{INDENT}</table>"
        ));
        html
    }

    pub(super) fn render_divider(&self, node: NodeId, context: &RenderContext) -> String {
        let attrs = self.attrs(node, BuiltinComponent::Divider);
        let border_top = format!(
            "{} {} {}",
            attrs.get_or("border-style", "solid"),
            attrs.get_or("border-width", "4px"),
            attrs.get_or("border-color", "#000000")
        );
        let width = attrs.get_or("width", "100%");
        let align = attrs.get_or("align", "center");
        let margin = match align.as_str() {
            "left" => "0px",
            "right" => "0px 0px 0px auto",
            _ => "0px auto",
        };

        let padding = parse_shorthand(&attrs.get_or("padding", ""));
        let side = |name: &str, shorthand: f64| {
            attrs
                .non_empty(name)
                .map_or(shorthand, |value| parse_px(&value, 0.0))
        };
        let available =
            context.container_width() - side("padding-left", padding.left) - side("padding-right", padding.right);
        let mso_width = width.strip_suffix('%').map_or_else(
            || to_pixels(&width, context.container_width()),
            |pct| available * parse_px(pct, 100.0) / 100.0,
        );
        #[allow(clippy::cast_possible_truncation)]
        let mso_width = mso_width as i64;

        let style = |width: String| {
            let mut style = StyleBuilder::new();
            let _ = style
                .set("border-top", border_top.clone())
                .set("font-size", "1px")
                .set("margin", margin)
                .set("width", width);
            style.finish()
        };

        let mut html = format!("{INDENT}<p style=\"{}\">\n{INDENT}</p>\n", style(width.clone()));
        html.push_str(&format!(
            "{INDENT}{MSO_START}<table align=\"{}\" border=\"0\" cellpadding=\"0\" cellspacing=\"0\" style=\"{}\" role=\"presentation\" width=\"{mso_width}px\" ><tr><td style=\"height:0;line-height:0;\"> &nbsp;\n</td></tr></table>{MSO_END}",
            self.escape(&align),
            style(format!("{mso_width}px"))
        ));
        html
    }

    pub(super) fn render_spacer(&self, node: NodeId) -> String {
        let height = self
            .attrs(node, BuiltinComponent::Spacer)
            .get_or("height", "0px");
        let mut style = StyleBuilder::new();
        let _ = style.set("height", height.clone()).set("line-height", height);
        format!("{INDENT}<div style=\"{}\">&#8202;</div>", style.finish())
    }

    pub(super) fn render_table(&self, node: NodeId) -> String {
        let attrs = self.attrs(node, BuiltinComponent::Table);
        let width = attrs.get_or("width", "100%");
        let mut style = StyleBuilder::new();
        let _ = style
            .set("color", attrs.get_or("color", "#000000"))
            .set("font-family", attrs.get_or("font-family", DEFAULT_FONT_FAMILY))
            .set("font-size", attrs.get_or("font-size", "13px"))
            .set("line-height", attrs.get_or("line-height", "22px"))
            .set("table-layout", attrs.get_or("table-layout", "auto"))
            .set("width", width.clone())
            .set("border", attrs.get_or("border", "none"));
        format!(
            "<table cellpadding=\"{}\" cellspacing=\"{}\" width=\"{}\" border=\"0\" style=\"{}\">\n{}</table>\n",
            self.escape(&attrs.get_or("cellpadding", "0")),
            self.escape(&attrs.get_or("cellspacing", "0")),
            self.escape(&width),
            style.finish(),
            self.tree().inner_html(node)
        )
    }

    /// Raw markup passes through. `position="file-start"` moves it ahead of
    /// the doctype instead.
    pub(super) fn render_raw(&mut self, node: NodeId) -> String {
        let content = self.tree().inner_html(node);
        let position = self.attrs(node, BuiltinComponent::Raw).get_or("position", "");
        if position == "file-start" {
            self.add_file_start(content);
            return String::new();
        }
        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_collapses_to_one_line() {
        assert_eq!(text_content("\n   Hello\n   world  \n"), "Hello world");
        assert_eq!(text_content("  \n "), "");
    }

    #[test]
    fn test_block_content_is_framed_by_newlines() {
        assert_eq!(
            text_content("<p>One   two</p>\n    <p>Three</p>"),
            "\n<p>One two</p>\n<p>Three</p>\n"
        );
    }

    #[test]
    fn test_inline_markup_keeps_single_line() {
        assert_eq!(text_content("Hi <b>there</b>   friend"), "Hi <b>there</b> friend");
        assert_eq!(text_content("a<br/>\n  b"), "a<br/> b");
    }

    #[test]
    fn test_blank_run_after_break_becomes_newline() {
        assert_eq!(text_content("a<br/>\n  <br/>b"), "a<br/>\n<br/>b\n");
    }

    #[test]
    fn test_non_breaking_space_is_content() {
        assert_eq!(text_content("\u{a0}"), "\u{a0}");
        assert_eq!(text_content(" Price:\u{a0}5 "), "Price:\u{a0}5");
        assert_eq!(text_content("<b>\u{a0}</b>"), "<b>\u{a0}</b>");
        assert_eq!(collapse_whitespace("a \u{a0} b"), "a \u{a0} b");
    }

    #[test]
    fn test_tag_name_extraction() {
        assert_eq!(tag_name("<P class=\"x\">"), "p");
        assert_eq!(tag_name("</div>"), "div");
        assert_eq!(tag_name("<br/>"), "br");
    }
}

//! `mj-section` and `mj-wrapper`: full-row containers.
//!
//! Both render in one of two shells. The normal shell is a centred
//! `max-width` div, shadowed for Outlook by a fixed-width table. The
//! full-width shell stretches a real table across the viewport and centres
//! the content inside it. A section inside a wrapper drops its own shell
//! and background.

use quokka_common::Result;
use quokka_core::{Cascade, RenderContext};
use quokka_css::values::format_px_width;
use quokka_css::{DistributionPolicy, column_pixel_widths, column_width_specs};
use quokka_dom::NodeId;

use super::BodyRenderer;
use super::BuiltinComponent;
use super::body::box_model;
use super::style::{
    MSO_END, MSO_START, MSO_TABLE_CLOSE, MSO_TD_STYLE, StyleBuilder, is_visible_border,
    mso_table_opening,
};
use super::vml::{Background, normalize_position, section_rect, wrapper_rect};

pub(crate) const SECTION_DEFAULTS: &[(&str, &str)] = &[
    ("background-color", ""),
    ("background-position", "top center"),
    ("background-position-x", ""),
    ("background-position-y", ""),
    ("background-repeat", "repeat"),
    ("background-size", "auto"),
    ("background-url", ""),
    ("border", "none"),
    ("border-bottom", ""),
    ("border-left", ""),
    ("border-radius", ""),
    ("border-right", ""),
    ("border-top", ""),
    ("direction", "ltr"),
    ("full-width", ""),
    ("padding", "20px 0"),
    ("text-align", "center"),
    ("text-padding", "4px 4px 4px 0"),
];

pub(crate) const WRAPPER_DEFAULTS: &[(&str, &str)] = &[
    ("background-color", ""),
    ("background-position", "top center"),
    ("background-position-x", ""),
    ("background-position-y", ""),
    ("background-repeat", "repeat"),
    ("background-size", "auto"),
    ("background-url", ""),
    ("border", "none"),
    ("border-bottom", ""),
    ("border-left", ""),
    ("border-radius", ""),
    ("border-right", ""),
    ("border-top", ""),
    ("full-width", ""),
    ("padding", "20px 0"),
    ("text-align", "center"),
];

const SIDE_BORDERS: [&str; 5] = [
    "border",
    "border-bottom",
    "border-left",
    "border-right",
    "border-top",
];

const EMPTY_COLUMN_TABLE: &str = "              <!--[if mso | IE]><table role=\"presentation\" border=\"0\" cellpadding=\"0\" cellspacing=\"0\"><tr></tr></table><![endif]-->\n";

const PRESENTATION_TABLE: &str =
    "<table role=\"presentation\" border=\"0\" cellpadding=\"0\" cellspacing=\"0\">";

/// Which container is being rendered. Sections style every border side
/// and honour `padding-*`; wrappers only style the shorthand border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Section,
    Wrapper,
}

fn background(attrs: &Cascade<'_>) -> Background {
    Background {
        color: attrs.get_or("background-color", ""),
        url: attrs.get_or("background-url", ""),
        position: normalize_position(
            &attrs.get_or("background-position", "top center"),
            &attrs.get_or("background-position-x", ""),
            &attrs.get_or("background-position-y", ""),
        ),
        size: attrs.get_or("background-size", "auto"),
        repeat: attrs.get_or("background-repeat", "repeat"),
    }
}

fn is_full_width(attrs: &Cascade<'_>) -> bool {
    attrs.get("full-width").as_deref() == Some("full-width")
}

fn inner_td_style(attrs: &Cascade<'_>, container: Container) -> String {
    let mut style = StyleBuilder::new();
    let borders: &[&'static str] = match container {
        Container::Section => &SIDE_BORDERS,
        Container::Wrapper => &SIDE_BORDERS[..1],
    };
    for &name in borders {
        let value = attrs.get_or(name, "");
        if is_visible_border(&value) {
            let _ = style.set(name, value);
        }
    }
    let _ = style
        .set_opt("border-radius", attrs.non_empty("border-radius"))
        .set("direction", attrs.get_or("direction", "ltr"))
        .set("font-size", "0px")
        .set_opt("padding", attrs.non_empty("padding"));
    if container == Container::Section {
        let _ = style
            .set_opt("padding-bottom", attrs.non_empty("padding-bottom"))
            .set_opt("padding-left", attrs.non_empty("padding-left"))
            .set_opt("padding-right", attrs.non_empty("padding-right"))
            .set_opt("padding-top", attrs.non_empty("padding-top"));
    }
    let _ = style.set("text-align", attrs.get_or("text-align", "center"));
    style.finish()
}

fn background_color_style(style: &mut StyleBuilder, color: &str) {
    let _ = style.set("background", color).set("background-color", color);
}

impl BodyRenderer<'_> {
    pub(super) fn render_section(&mut self, node: NodeId, context: &RenderContext) -> Result<String> {
        let attrs = self.attrs(node, BuiltinComponent::Section);
        if context.inside_wrapper() {
            return self.render_section_in_wrapper(&attrs, context);
        }
        let columns = self.render_columns(&attrs, context)?;
        if is_full_width(&attrs) {
            return Ok(self.full_width_shell(&attrs, Container::Section, &columns));
        }
        let rect = self.background_rect(&attrs, Container::Section, &format!(
            "{}px",
            self.document().metadata.container_width()
        ));
        Ok(self.normal_shell(&attrs, Container::Section, rect, &columns))
    }

    fn render_section_in_wrapper(
        &mut self,
        attrs: &Cascade<'_>,
        context: &RenderContext,
    ) -> Result<String> {
        #[allow(clippy::cast_possible_truncation)]
        let width = context.container_width() as i64;
        let mut html = format!("              <div style=\"margin:0px auto;max-width:{width}px;\">\n");
        html.push_str("                <table align=\"center\" border=\"0\" cellpadding=\"0\" cellspacing=\"0\" role=\"presentation\" style=\"width:100%;\">\n");
        html.push_str("                  <tbody>\n                    <tr>\n");
        html.push_str(&format!(
            "                      <td style=\"{}\">\n",
            inner_td_style(attrs, Container::Section)
        ));
        html.push_str(&self.render_columns(attrs, context)?);
        html.push_str("                      </td>\n                    </tr>\n                  </tbody>\n                </table>\n              </div>\n");
        Ok(html)
    }

    /// Columns and groups of a section, side by side in one Outlook row.
    fn render_columns(&mut self, attrs: &Cascade<'_>, context: &RenderContext) -> Result<String> {
        let tree = self.tree();
        let columns: Vec<NodeId> = tree
            .element_children(attrs.node())
            .filter(|&child| matches!(tree.tag_name(child), Some("mj-column" | "mj-group")))
            .collect();
        if columns.is_empty() {
            return Ok(EMPTY_COLUMN_TABLE.to_string());
        }

        let model = box_model(attrs, true);
        let content_width = context.container_width() - model.horizontal_spacing();
        let declared: Vec<Option<String>> = columns
            .iter()
            .map(|&column| self.column_width(column))
            .collect();
        let declared: Vec<Option<&str>> = declared.iter().map(Option::as_deref).collect();
        let widths = column_pixel_widths(&declared, content_width, DistributionPolicy::EqualPercentage);
        let specs = column_width_specs(&declared);
        let class = self.escape(&attrs.get_or("css-class", "")).into_owned();

        let mut html = format!("              {MSO_START}{PRESENTATION_TABLE}<tr>");
        for (index, &column) in columns.iter().enumerate() {
            let is_group = tree.tag_name(column) == Some("mj-group");
            let vertical_align = if is_group {
                String::new()
            } else {
                let align = self.attrs(column, BuiltinComponent::Column).get_or("vertical-align", "top");
                format!("vertical-align:{align};")
            };
            html.push_str(&format!(
                "<td class=\"{class}\" style=\"{vertical_align}width:{}px;\" >{MSO_END}\n",
                format_px_width(widths[index])
            ));
            let column_context = context
                .with_column_width(widths[index], specs[index].clone())
                .with_position(index, columns.len());
            html.push_str(&self.render_node(column, &column_context)?);
            html.push_str(&format!("              {MSO_START}</td>"));
        }
        html.push_str(&format!("</tr></table>{MSO_END}\n"));
        Ok(html)
    }

    /// The cascade-resolved `width` of a column or group.
    pub(super) fn column_width(&self, node: NodeId) -> Option<String> {
        let component = match self.tree().tag_name(node) {
            Some("mj-group") => BuiltinComponent::Group,
            _ => BuiltinComponent::Column,
        };
        self.attrs(node, component).non_empty("width")
    }

    fn background_rect(&self, attrs: &Cascade<'_>, container: Container, width_style: &str) -> Option<String> {
        let background = background(attrs);
        if background.url.is_empty() {
            return None;
        }
        Some(match container {
            Container::Section => section_rect(width_style, &background),
            Container::Wrapper => wrapper_rect(width_style, &background),
        })
    }

    fn normal_shell(
        &self,
        attrs: &Cascade<'_>,
        container: Container,
        rect: Option<String>,
        content: &str,
    ) -> String {
        let width = self.document().metadata.container_width();
        let background = background(attrs);
        let color = self.escape(&background.color).into_owned();
        let class = self.escape(&attrs.get_or("css-class", "")).into_owned();
        let radius = attrs.get_or("border-radius", "");

        let mut html = format!(
            "    {MSO_START}{}",
            mso_table_opening(width, &class, Some(color.as_str()))
        );
        let indent = if let Some(rect) = &rect {
            let mut div = StyleBuilder::new();
            let _ = div
                .set("background", background.css())
                .set("background-position", background.position.clone())
                .set("background-repeat", background.repeat.clone())
                .set("background-size", background.size.clone())
                .set("margin", "0px auto")
                .set("max-width", format!("{width}px"));
            let mut table = StyleBuilder::new();
            let _ = table
                .set("background", background.css())
                .set("background-position", background.position.clone())
                .set("background-repeat", background.repeat.clone())
                .set("background-size", background.size.clone())
                .set("width", "100%");
            html.push_str(rect);
            html.push_str(&format!("{MSO_END}\n    <div style=\"{}\">\n", div.finish()));
            html.push_str("      <div style=\"line-height:0;font-size:0;\">\n");
            html.push_str(&format!(
                "        <table align=\"center\" background=\"{}\" border=\"0\" cellpadding=\"0\" cellspacing=\"0\" role=\"presentation\" style=\"{}\">\n",
                self.escape(&background.url),
                table.finish()
            ));
            "          "
        } else {
            let mut div = StyleBuilder::new();
            if !background.color.is_empty() {
                background_color_style(&mut div, &background.color);
            }
            let _ = div
                .set("margin", "0px auto")
                .set("max-width", format!("{width}px"));
            if !radius.is_empty() {
                let _ = div.set("border-radius", radius.clone()).set("overflow", "hidden");
            }
            let mut table = StyleBuilder::new();
            if !background.color.is_empty() {
                background_color_style(&mut table, &background.color);
            }
            let _ = table.set("width", "100%");
            if !radius.is_empty() {
                let _ = table.set("border-collapse", "separate");
            }
            html.push_str(&format!("{MSO_END}\n    <div style=\"{}\">\n", div.finish()));
            html.push_str(&format!(
                "      <table align=\"center\" border=\"0\" cellpadding=\"0\" cellspacing=\"0\" role=\"presentation\" style=\"{}\">\n",
                table.finish()
            ));
            "        "
        };

        html.push_str(&format!("{indent}<tbody>\n{indent}  <tr>\n"));
        html.push_str(&format!(
            "{indent}    <td style=\"{}\">\n",
            inner_td_style(attrs, container)
        ));
        html.push_str(content);
        html.push_str(&format!("{indent}    </td>\n{indent}  </tr>\n{indent}</tbody>\n"));

        if rect.is_some() {
            html.push_str("        </table>\n      </div>\n    </div>\n");
            html.push_str(&format!(
                "    {MSO_START}</v:textbox></v:rect>{MSO_TABLE_CLOSE}{MSO_END}\n"
            ));
        } else {
            html.push_str("      </table>\n    </div>\n");
            html.push_str(&format!("    {MSO_START}{MSO_TABLE_CLOSE}{MSO_END}\n"));
        }
        html
    }

    fn full_width_shell(&self, attrs: &Cascade<'_>, container: Container, content: &str) -> String {
        let width = self.document().metadata.container_width();
        let background = background(attrs);
        let color = self.escape(&background.color).into_owned();
        let class = self.escape(&attrs.get_or("css-class", "")).into_owned();
        // Wrappers keep the image on the outer table only.
        let rect = if container == Container::Section {
            self.background_rect(attrs, container, "mso-width-percent:1000;")
        } else {
            None
        };

        let mut outer = StyleBuilder::new();
        let mut html = String::from("    <table align=\"center\" ");
        if rect.is_some() {
            html.push_str(&format!("background=\"{}\" ", self.escape(&background.url)));
            let _ = outer
                .set("background", background.css())
                .set("background-position", background.position.clone())
                .set("background-repeat", background.repeat.clone())
                .set("background-size", background.size.clone())
                .set("width", "100%");
        } else {
            if !background.color.is_empty() {
                background_color_style(&mut outer, &background.color);
            }
            let _ = outer.set("width", "100%");
        }
        html.push_str(&format!(
            "border=\"0\" cellpadding=\"0\" cellspacing=\"0\" role=\"presentation\" style=\"{}\">\n",
            outer.finish()
        ));
        html.push_str("      <tbody>\n        <tr>\n          <td>\n");
        html.push_str(&format!(
            "            {MSO_START}{}{}{MSO_END}\n",
            rect.as_deref().unwrap_or_default(),
            mso_table_opening(width, &class, Some(color.as_str()))
        ));
        html.push_str(&format!("            <div style=\"margin:0px auto;max-width:{width}px;\">\n"));
        let indent = if rect.is_some() {
            html.push_str("              <div style=\"line-height:0;font-size:0;\">\n");
            "                "
        } else {
            "              "
        };
        html.push_str(&format!(
            "{indent}<table align=\"center\" border=\"0\" cellpadding=\"0\" cellspacing=\"0\" role=\"presentation\" style=\"width:100%;\">\n"
        ));
        html.push_str(&format!("{indent}  <tbody>\n{indent}    <tr>\n"));
        html.push_str(&format!(
            "{indent}      <td style=\"{}\">\n",
            inner_td_style(attrs, container)
        ));
        html.push_str(content);
        html.push_str(&format!(
            "{indent}      </td>\n{indent}    </tr>\n{indent}  </tbody>\n{indent}</table>\n"
        ));
        if rect.is_some() {
            html.push_str("              </div>\n");
        }
        html.push_str("            </div>\n");
        if rect.is_some() {
            html.push_str(&format!(
                "            {MSO_START}{MSO_TABLE_CLOSE}</v:textbox></v:rect>{MSO_END}\n"
            ));
        } else {
            html.push_str(&format!("            {MSO_START}{MSO_TABLE_CLOSE}{MSO_END}\n"));
        }
        html.push_str("          </td>\n        </tr>\n      </tbody>\n    </table>\n");
        html
    }

    pub(super) fn render_wrapper(&mut self, node: NodeId, context: &RenderContext) -> Result<String> {
        let attrs = self.attrs(node, BuiltinComponent::Wrapper);
        let content = self.render_wrapped_children(&attrs, context)?;
        if is_full_width(&attrs) {
            return Ok(self.full_width_shell(&attrs, Container::Wrapper, &content));
        }
        let rect = self.background_rect(&attrs, Container::Wrapper, &format!(
            "{}px",
            self.document().metadata.container_width()
        ));
        Ok(self.normal_shell(&attrs, Container::Wrapper, rect, &content))
    }

    /// Every child of a wrapper gets its own Outlook row at the wrapper's
    /// inner width.
    fn render_wrapped_children(
        &mut self,
        attrs: &Cascade<'_>,
        context: &RenderContext,
    ) -> Result<String> {
        let children: Vec<NodeId> = self.tree().element_children(attrs.node()).collect();
        if children.is_empty() {
            return Ok(format!(
                "              {MSO_START}<table role=\"presentation\" border=\"0\" cellpadding=\"0\" cellspacing=\"0\"></table>{MSO_END}\n"
            ));
        }

        let width = self.document().metadata.container_width();
        let model = box_model(attrs, true);
        #[allow(clippy::cast_possible_truncation)]
        let inner = (f64::from(width) - model.horizontal_spacing()) as i64;
        let row_open = format!(
            "<tr><td class=\"\" width=\"{width}px\" ><table align=\"center\" border=\"0\" cellpadding=\"0\" cellspacing=\"0\" class=\"\" role=\"presentation\" style=\"width:{inner}px;\" width=\"{inner}\" ><tr><td style=\"{MSO_TD_STYLE}\">{MSO_END}\n"
        );

        let mut html = format!("              {MSO_START}{PRESENTATION_TABLE}{row_open}");
        #[allow(clippy::cast_precision_loss)]
        let child_context = context.with_width(inner as f64).with_inside_wrapper(true);
        for (index, &child) in children.iter().enumerate() {
            let item = child_context.with_position(index, children.len());
            html.push_str(&self.render_node(child, &item)?);
            if index + 1 < children.len() {
                html.push_str(&format!("              {MSO_START}</td></tr></table></td></tr>{row_open}"));
            } else {
                html.push_str(&format!(
                    "              {MSO_START}</td></tr></table></td></tr></table>{MSO_END}\n"
                ));
            }
        }
        Ok(html)
    }
}

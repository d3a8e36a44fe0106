//! `mj-column` and `mj-group`.

use quokka_common::Result;
use quokka_core::{Cascade, RenderContext};
use quokka_css::values::format_int;
use quokka_css::{DistributionPolicy, column_pixel_widths, column_width_specs};
use quokka_dom::NodeId;

use super::body::box_model;
use super::style::{MSO_END, MSO_START, StyleBuilder, is_visible_border, responsive_class};
use super::{BodyRenderer, BuiltinComponent, ComponentKind};

pub(crate) const COLUMN_DEFAULTS: &[(&str, &str)] = &[
    ("background-color", ""),
    ("border", "none"),
    ("border-bottom", ""),
    ("border-left", ""),
    ("border-radius", ""),
    ("border-right", ""),
    ("border-top", ""),
    ("direction", "ltr"),
    ("inner-background-color", ""),
    ("inner-border", ""),
    ("inner-border-bottom", ""),
    ("inner-border-left", ""),
    ("inner-border-radius", ""),
    ("inner-border-right", ""),
    ("inner-border-top", ""),
    ("padding", ""),
    ("padding-bottom", ""),
    ("padding-left", ""),
    ("padding-right", ""),
    ("padding-top", ""),
    ("vertical-align", "top"),
    ("width", ""),
];

pub(crate) const GROUP_DEFAULTS: &[(&str, &str)] = &[
    ("background-color", ""),
    ("direction", "ltr"),
    ("vertical-align", "top"),
    ("width", ""),
];

const PADDINGS: [&str; 5] = [
    "padding",
    "padding-bottom",
    "padding-left",
    "padding-right",
    "padding-top",
];

const BORDERS: [&str; 5] = [
    "border",
    "border-bottom",
    "border-left",
    "border-right",
    "border-top",
];

const INNER_BORDERS: [(&str, &str); 5] = [
    ("inner-border", "border"),
    ("inner-border-bottom", "border-bottom"),
    ("inner-border-left", "border-left"),
    ("inner-border-right", "border-right"),
    ("inner-border-top", "border-top"),
];

fn add_borders(style: &mut StyleBuilder, attrs: &Cascade<'_>) {
    for name in BORDERS {
        let value = attrs.get_or(name, "");
        if is_visible_border(&value) {
            let _ = style.set(name, value);
        }
    }
}

/// Outer table of a column without padding, or the padded cell of one with.
fn column_box_style(attrs: &Cascade<'_>, with_padding: bool) -> String {
    let mut style = StyleBuilder::new();
    let _ = style.set_opt("background-color", attrs.non_empty("background-color"));
    add_borders(&mut style, attrs);
    let radius = attrs.non_empty("border-radius");
    let separate = radius.is_some();
    let _ = style
        .set_opt("border-radius", radius)
        .set("vertical-align", attrs.get_or("vertical-align", "top"));
    if separate {
        let _ = style.set("border-collapse", "separate");
    }
    if with_padding {
        for name in PADDINGS {
            let _ = style.set_opt(name, attrs.non_empty(name));
        }
    }
    style.finish()
}

fn inner_table_style(attrs: &Cascade<'_>) -> String {
    let mut style = StyleBuilder::new();
    let _ = style.set_opt("background-color", attrs.non_empty("inner-background-color"));
    for (name, property) in INNER_BORDERS {
        let value = attrs.get_or(name, "");
        if is_visible_border(&value) {
            let _ = style.set(property, value);
        }
    }
    if let Some(radius) = attrs.non_empty("inner-border-radius") {
        let _ = style.set("border-radius", radius).set("border-collapse", "separate");
    }
    style.finish()
}

/// The cell a column wraps around each content child.
fn content_td_style(attrs: &Cascade<'_>) -> String {
    let mut style = StyleBuilder::new();
    let _ = style
        .set_opt("background", attrs.non_empty("container-background-color"))
        .set("font-size", "0px");
    for name in PADDINGS {
        let _ = style.set_opt(name, attrs.non_empty(name));
    }
    let _ = style.set("word-break", "break-word");
    style.finish()
}

impl BodyRenderer<'_> {
    pub(super) fn render_column(&mut self, node: NodeId, context: &RenderContext) -> Result<String> {
        let attrs = self.attrs(node, BuiltinComponent::Column);
        let spec = context.column_width_spec();
        let class = responsive_class(spec);

        let width = match spec {
            Some(spec) if context.inside_group() && !spec.ends_with("px") => format!("{spec}%"),
            _ => "100%".to_string(),
        };
        let mut outer = StyleBuilder::new();
        let _ = outer
            .set("font-size", "0px")
            .set("text-align", "left")
            .set("direction", attrs.get_or("direction", "ltr"))
            .set("display", "inline-block")
            .set("vertical-align", attrs.get_or("vertical-align", "top"))
            .set("width", width);

        let mut html = format!(
            "              <div class=\"{class} mj-outlook-group-fix\" style=\"{}\">\n",
            outer.finish()
        );
        let gutter = PADDINGS.iter().any(|name| attrs.non_empty(name).is_some());
        if gutter {
            let separate = if attrs.non_empty("border-radius").is_some() {
                " style=\"border-collapse:separate;\""
            } else {
                ""
            };
            html.push_str(&format!(
                "                <table border=\"0\" cellpadding=\"0\" cellspacing=\"0\" role=\"presentation\" width=\"100%\"{separate}>\n"
            ));
            html.push_str("                  <tbody>\n                    <tr>\n");
            html.push_str(&format!(
                "                      <td style=\"{}\">\n",
                column_box_style(&attrs, true)
            ));
            html.push_str(&format!(
                "                        <table border=\"0\" cellpadding=\"0\" cellspacing=\"0\" role=\"presentation\" style=\"{}\" width=\"100%\">\n",
                inner_table_style(&attrs)
            ));
            html.push_str("                          <tbody>\n");
            html.push_str(&self.render_column_content(&attrs, context, true)?);
            html.push_str("                          </tbody>\n                        </table>\n");
            html.push_str("                      </td>\n                    </tr>\n                  </tbody>\n                </table>\n");
        } else {
            html.push_str(&format!(
                "                <table border=\"0\" cellpadding=\"0\" cellspacing=\"0\" role=\"presentation\" style=\"{}\" width=\"100%\">\n",
                column_box_style(&attrs, false)
            ));
            html.push_str("                  <tbody>\n");
            html.push_str(&self.render_column_content(&attrs, context, false)?);
            html.push_str("                  </tbody>\n                </table>\n");
        }
        html.push_str("              </div>\n");

        self.register_media_query(&class, spec);
        Ok(html)
    }

    /// One table row per content child. `mj-raw` is emitted bare.
    fn render_column_content(
        &mut self,
        attrs: &Cascade<'_>,
        context: &RenderContext,
        nested: bool,
    ) -> Result<String> {
        let (tr_indent, td_indent) = if nested {
            ("                            ", "                              ")
        } else {
            ("                    ", "                      ")
        };
        let width = context.container_width() - box_model(attrs, false).horizontal_spacing();
        let content_context = context.with_width(width);

        let tree = self.tree();
        let registry = self.registry();
        let children: Vec<NodeId> = tree.element_children(attrs.node()).collect();
        let mut html = String::new();
        for (index, &child) in children.iter().enumerate() {
            let item = content_context.with_position(index, children.len());
            let child_attrs = match tree.tag_name(child).and_then(|tag| registry.lookup(tag)) {
                Some(ComponentKind::Builtin(BuiltinComponent::Raw)) => {
                    html.push_str(&self.render_node(child, &item)?);
                    continue;
                }
                Some(ComponentKind::Builtin(component)) => self.attrs(child, component),
                Some(ComponentKind::Custom(_)) => self.custom_attrs(child),
                None => {
                    // Reports the unknown tag.
                    let _ = self.render_node(child, &item)?;
                    continue;
                }
            };

            html.push_str(&format!("{tr_indent}<tr>\n{td_indent}<td"));
            if let Some(align) = child_attrs.non_empty("align") {
                html.push_str(&format!(" align=\"{}\"", self.escape(&align)));
            }
            if let Some(class) = child_attrs.non_empty("css-class") {
                html.push_str(&format!(" class=\"{}\"", self.escape(&class)));
            }
            html.push_str(&format!(" style=\"{}\">\n", content_td_style(&child_attrs)));
            html.push_str(&self.render_node(child, &item)?);
            html.push_str(&format!("\n{td_indent}</td>\n{tr_indent}</tr>\n"));
        }
        Ok(html)
    }

    pub(super) fn render_group(&mut self, node: NodeId, context: &RenderContext) -> Result<String> {
        let attrs = self.attrs(node, BuiltinComponent::Group);
        let spec = context.column_width_spec();
        let class = responsive_class(spec);

        let mut outer = StyleBuilder::new();
        let _ = outer
            .set("font-size", "0")
            .set("line-height", "0")
            .set("text-align", "left")
            .set("display", "inline-block")
            .set("width", "100%")
            .set("direction", attrs.get_or("direction", "ltr"))
            .set_opt("background-color", attrs.non_empty("background-color"));
        let mut html = format!(
            "              <div class=\"{class} mj-outlook-group-fix\" style=\"{}\">\n",
            outer.finish()
        );
        html.push_str(&format!(
            "                {MSO_START}<table border=\"0\" cellpadding=\"0\" cellspacing=\"0\" role=\"presentation\" ><tr>"
        ));

        let tree = self.tree();
        let columns: Vec<NodeId> = tree.children_by_tag(node, "mj-column").collect();
        let declared: Vec<Option<String>> =
            columns.iter().map(|&column| self.column_width(column)).collect();
        let declared: Vec<Option<&str>> = declared.iter().map(Option::as_deref).collect();
        let widths = column_pixel_widths(
            &declared,
            context.container_width(),
            DistributionPolicy::EqualRemainder,
        );
        let specs = column_width_specs(&declared);

        for (index, &column) in columns.iter().enumerate() {
            html.push_str(&format!(
                "<td style=\"vertical-align:top;width:{}px;\" >{MSO_END}\n",
                format_int(widths[index])
            ));
            let column_context = context
                .with_column_width(widths[index], specs[index].clone())
                .with_position(index, columns.len())
                .with_inside_group(true);
            html.push_str(&self.render_node(column, &column_context)?);
            html.push_str(&format!("                {MSO_START}</td>"));
        }
        html.push_str(&format!("</tr></table>{MSO_END}\n"));
        html.push_str("              </div>\n");

        self.register_media_query(&class, spec);
        Ok(html)
    }
}

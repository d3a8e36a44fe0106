//! Background images for Outlook, which ignores CSS backgrounds and needs a
//! VML rectangle filled with the image instead.

use quokka_common::escape::{escape_attribute_value, escape_css_url};

/// Resolved background attributes of a section or wrapper.
#[derive(Debug, Clone)]
pub(super) struct Background {
    pub color: String,
    pub url: String,
    /// Normalised `"x y"` position.
    pub position: String,
    pub size: String,
    pub repeat: String,
}

impl Background {
    /// The `background` shorthand: `[color ]url('u') position / size repeat`.
    pub(super) fn css(&self) -> String {
        let color = if self.color.is_empty() {
            String::new()
        } else {
            format!("{} ", self.color)
        };
        format!(
            "{color}url('{}') {} / {} {}",
            escape_css_url(&self.url),
            self.position,
            self.size,
            self.repeat
        )
    }
}

/// Normalise a `background-position` to `"x y"` order. Explicit x and y
/// values win when both are set.
pub(super) fn normalize_position(position: &str, x: &str, y: &str) -> String {
    if !x.is_empty() && !y.is_empty() {
        return format!("{x} {y}");
    }
    let parts: Vec<&str> = position.split_whitespace().collect();
    match parts.as_slice() {
        [] => "center top".to_string(),
        [single] => format!("{single} center"),
        [first, second, ..] => {
            let vertical = matches!(*first, "top" | "bottom");
            let horizontal = matches!(*second, "left" | "right" | "center");
            if vertical && horizontal {
                format!("{second} {first}")
            } else {
                format!("{first} {second}")
            }
        }
    }
}

fn position_percent(value: &str, horizontal: bool) -> f64 {
    let fallback = if horizontal { 50.0 } else { 0.0 };
    match value {
        "left" | "top" => 0.0,
        "right" | "bottom" => 100.0,
        "center" => 50.0,
        other => other
            .strip_suffix('%')
            .and_then(|pct| pct.trim().parse().ok())
            .unwrap_or(fallback),
    }
}

/// Whole numbers print without a fraction.
#[allow(clippy::cast_possible_truncation)]
fn format_coordinate(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        (value as i64).to_string()
    } else {
        value.to_string()
    }
}

fn axis_fraction(value: &str) -> &'static str {
    match value {
        "left" | "top" => "0",
        "right" | "bottom" => "1",
        _ => "0.5",
    }
}

fn rect_style(width_style: &str) -> String {
    if width_style.contains("mso-width-percent") {
        width_style.to_string()
    } else {
        format!("width:{width_style};")
    }
}

fn fill_color(color: &str) -> String {
    if color.is_empty() {
        String::new()
    } else {
        format!(" color=\"{}\"", escape_attribute_value(color))
    }
}

const TEXTBOX: &str = "<v:textbox style=\"mso-fit-shape-to-text:true\" inset=\"0,0,0,0\">";

/// Opening `<v:rect><v:fill/><v:textbox>` for a section background.
///
/// Auto-sized images are anchored top centre. Otherwise the CSS position
/// maps to VML origin and position, shifted by half for non-repeating frames.
pub(super) fn section_rect(width_style: &str, background: &Background) -> String {
    let mut parts = background.position.split_whitespace();
    let x = position_percent(parts.next().unwrap_or("center"), true);
    let y = position_percent(parts.next().unwrap_or("top"), false);
    let no_repeat = background.repeat == "no-repeat";

    let (fill_type, ox, oy) = if background.size == "auto" {
        ("tile", 0.5, 0.0)
    } else if no_repeat {
        ("frame", (x - 50.0) / 100.0, (y - 50.0) / 100.0)
    } else {
        ("tile", x / 100.0, y / 100.0)
    };
    let coordinates = format!("{}, {}", format_coordinate(ox), format_coordinate(oy));

    let size = match background.size.as_str() {
        "auto" => String::new(),
        "cover" => " size=\"1,1\" aspect=\"atleast\"".to_string(),
        "contain" => " size=\"1,1\" aspect=\"atmost\"".to_string(),
        other => {
            let values: Vec<&str> = other.split_whitespace().collect();
            if values.len() == 1 {
                format!(" size=\"{}\" aspect=\"atmost\"", escape_attribute_value(other))
            } else {
                format!(" size=\"{}\"", escape_attribute_value(&values.join(",")))
            }
        }
    };

    format!(
        "<v:rect style=\"{}\" xmlns:v=\"urn:schemas-microsoft-com:vml\" fill=\"true\" stroke=\"false\">\
         <v:fill origin=\"{coordinates}\" position=\"{coordinates}\" src=\"{}\"{} type=\"{fill_type}\"{size} />{TEXTBOX}",
        rect_style(width_style),
        escape_attribute_value(&background.url),
        fill_color(&background.color),
    )
}

/// Opening `<v:rect>` for a wrapper background. Always tiled, anchored at
/// the keyword position.
pub(super) fn wrapper_rect(width_style: &str, background: &Background) -> String {
    let mut parts = background.position.split_whitespace();
    let origin = format!(
        "{}, {}",
        axis_fraction(parts.next().unwrap_or("center")),
        axis_fraction(parts.next().unwrap_or("top"))
    );
    let size = match background.size.as_str() {
        "auto" => String::new(),
        "cover" => " size=\"1,1\" aspect=\"atleast\"".to_string(),
        "contain" => " size=\"1,1\" aspect=\"atmost\"".to_string(),
        other => format!(" size=\"{}\"", escape_attribute_value(&other.trim().replace(' ', ","))),
    };
    format!(
        "<v:rect style=\"{}\" xmlns:v=\"urn:schemas-microsoft-com:vml\" fill=\"true\" stroke=\"false\">\
         <v:fill origin=\"{origin}\" position=\"{origin}\" src=\"{}\"{} type=\"tile\"{size} />{TEXTBOX}",
        rect_style(width_style),
        escape_attribute_value(&background.url),
        fill_color(&background.color),
    )
}

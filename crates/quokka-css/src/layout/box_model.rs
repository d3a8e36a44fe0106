//! Box model for padding and side borders.
//!
//! [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)

use crate::values::{EdgeSizes, parse_px, parse_shorthand};

/// [§ 3. The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
///
/// "Each box has a content area and optional surrounding padding, border,
/// and margin areas."
///
/// Only the parts that narrow the content area are tracked: four padding
/// edges and the left and right border widths. All values are pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxModel {
    /// Padding on each edge.
    pub padding: EdgeSizes,
    /// Width of the left border.
    pub border_left: f64,
    /// Width of the right border.
    pub border_right: f64,
}

impl BoxModel {
    /// Build from the cascade-resolved `padding`, `border`, `border-left` and
    /// `border-right` attribute values.
    ///
    /// The `border` shorthand only applies when neither side border
    /// contributes a width.
    #[must_use]
    pub fn from_attributes(
        padding: Option<&str>,
        border: Option<&str>,
        border_left: Option<&str>,
        border_right: Option<&str>,
    ) -> Self {
        let padding = padding.map(parse_shorthand).unwrap_or_default();
        let mut left = border_width(border_left);
        let mut right = border_width(border_right);

        if left == 0.0 && right == 0.0 {
            let shorthand = border_width(border);
            left = shorthand;
            right = shorthand;
        }

        Self {
            padding,
            border_left: left,
            border_right: right,
        }
    }

    /// Space taken out of the container width: both horizontal paddings and
    /// both side borders.
    #[must_use]
    pub fn horizontal_spacing(&self) -> f64 {
        self.padding.left + self.padding.right + self.border_left + self.border_right
    }

    /// Top plus bottom padding.
    #[must_use]
    pub fn vertical_spacing(&self) -> f64 {
        self.padding.top + self.padding.bottom
    }
}

/// Width of a border shorthand such as `"2px solid #000"`: its first token.
fn border_width(border: Option<&str>) -> f64 {
    match border.map(str::trim) {
        None | Some("" | "none") => 0.0,
        Some(value) => value
            .split_whitespace()
            .next()
            .map_or(0.0, |width| parse_px(width, 0.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_borders_win_over_shorthand() {
        let model = BoxModel::from_attributes(
            Some("10px 20px"),
            Some("5px solid red"),
            Some("1px solid red"),
            None,
        );
        assert!((model.border_left - 1.0).abs() < f64::EPSILON);
        assert!(model.border_right.abs() < f64::EPSILON);
        assert!((model.horizontal_spacing() - 41.0).abs() < f64::EPSILON);
        assert!((model.vertical_spacing() - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shorthand_used_when_sides_absent() {
        let model = BoxModel::from_attributes(None, Some("3px dashed"), None, Some("none"));
        assert!((model.horizontal_spacing() - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_none_border_is_zero() {
        let model = BoxModel::from_attributes(Some("4px"), Some("none"), None, None);
        assert!((model.horizontal_spacing() - 8.0).abs() < f64::EPSILON);
    }
}

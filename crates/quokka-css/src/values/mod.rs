//! CSS length parsing per [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/),
//! restricted to what email layout needs.
//!
//! Email markup only ever carries absolute pixels, percentages of the
//! container and bare numbers (treated as pixels). Every parser here is
//! total: malformed input resolves to a caller-supplied default, never an
//! error, because author markup is routinely sloppy about units.
//!
//! ```text
//!   "25%"  --to_pixels(_, 600)-->  150.0
//!   "20px" --parse_px(_, 0)----->   20.0
//!   "10px 20px 30px" --parse_shorthand--> {10, 20, 30, 20}
//! ```

/// Edge sizes for padding-like shorthands.
///
/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeSizes {
    /// Top edge size.
    pub top: f64,
    /// Right edge size.
    pub right: f64,
    /// Bottom edge size.
    pub bottom: f64,
    /// Left edge size.
    pub left: f64,
}

impl EdgeSizes {
    /// The same size on all four edges.
    #[must_use]
    pub const fn uniform(size: f64) -> Self {
        Self {
            top: size,
            right: size,
            bottom: size,
            left: size,
        }
    }
}

/// Parse a finite number, `None` for anything else.
fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Resolve a length to pixels.
///
/// Percentages resolve against `container_width`; `px` and unitless
/// numbers are taken as pixels. Empty or unparseable input is 0.
#[must_use]
pub fn to_pixels(value: &str, container_width: f64) -> f64 {
    let value = value.trim();
    if let Some(percent) = value.strip_suffix('%') {
        return parse_number(percent).map_or(0.0, |pct| container_width * pct / 100.0);
    }
    let number = value.strip_suffix("px").unwrap_or(value);
    parse_number(number).unwrap_or(0.0)
}

/// Parse a pixel length, falling back to `default` when empty or invalid.
#[must_use]
pub fn parse_px(value: &str, default: f64) -> f64 {
    let value = value.trim();
    if value.is_empty() {
        return default;
    }
    let number = value.strip_suffix("px").unwrap_or(value);
    parse_number(number).unwrap_or_else(|| {
        tracing::trace!(value, default, "unparseable pixel value");
        default
    })
}

/// [§ 3.2 Padding shorthand](https://www.w3.org/TR/css-box-3/#padding-shorthand)
///
/// "If there is only one component value, it applies to all sides. If there
/// are two values, the top and bottom are set to the first value and the
/// right and left are set to the second. If there are three values, the top
/// is set to the first value, the left and right are set to the second, and
/// the bottom is set to the third. If there are four values they apply to
/// the top, right, bottom, and left, respectively."
///
/// Tokens past the fourth are ignored; unparseable tokens count as 0.
#[must_use]
pub fn parse_shorthand(value: &str) -> EdgeSizes {
    let parts: Vec<f64> = value
        .split_whitespace()
        .map(|part| parse_px(part, 0.0))
        .collect();
    match parts.as_slice() {
        [] => EdgeSizes::default(),
        [all] => EdgeSizes::uniform(*all),
        [vertical, horizontal] => EdgeSizes {
            top: *vertical,
            right: *horizontal,
            bottom: *vertical,
            left: *horizontal,
        },
        [top, horizontal, bottom] => EdgeSizes {
            top: *top,
            right: *horizontal,
            bottom: *bottom,
            left: *horizontal,
        },
        [top, right, bottom, left, ..] => EdgeSizes {
            top: *top,
            right: *right,
            bottom: *bottom,
            left: *left,
        },
    }
}

/// Integer pixel parse (`"12px"`, `" 12 "`), falling back to `default`.
/// Fractional values are invalid here.
#[must_use]
pub fn parse_pixels(value: &str, default: i64) -> i64 {
    let stripped = value.replace("px", "");
    stripped.trim().parse().unwrap_or(default)
}

/// Truncate to a whole number: `12.7` → `"12"`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_int(value: f64) -> String {
    (value as i64).to_string()
}

/// Whole numbers print without decimals, anything else at full precision:
/// `50.0` → `"50"`, `33.5` → `"33.5"`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_px_width(width: f64) -> String {
    if width.is_finite() && width.fract() == 0.0 {
        (width as i64).to_string()
    } else {
        width.to_string()
    }
}

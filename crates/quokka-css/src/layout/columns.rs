//! Sibling column width distribution.

use crate::values::{format_px_width, parse_px};

/// How columns without an explicit width share the container.
///
/// The right policy depends on the structure the columns are rendered in,
/// so callers pick it; it is never inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionPolicy {
    /// Every auto column gets `100 / count` percent of the total, where
    /// `count` includes the explicit columns. Used when each column is an
    /// independent sibling cell.
    EqualPercentage,
    /// Auto columns split whatever the explicit columns leave over. Used
    /// when columns share one fixed-width parent.
    EqualRemainder,
}

/// A column's declared width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnWidth {
    /// No width given.
    Auto,
    /// A percentage of the container.
    Percent(f64),
    /// Absolute pixels. `"0px"` is a real zero, not auto.
    Pixels(f64),
}

impl ColumnWidth {
    /// Classify a `width` attribute value. Missing or blank is [`Self::Auto`].
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Self::Auto,
            Some(value) => value.strip_suffix('%').map_or_else(
                || Self::Pixels(parse_px(value, 0.0)),
                |percent| Self::Percent(parse_px(percent, 0.0)),
            ),
        }
    }

    /// Pixels for an explicit width, `None` for auto.
    fn resolve(self, total: f64) -> Option<f64> {
        match self {
            Self::Auto => None,
            Self::Percent(pct) => Some(total * pct / 100.0),
            Self::Pixels(px) => Some(px),
        }
    }
}

/// Pixel width of each column given the `width` attribute of each sibling.
///
/// Explicit widths resolve directly; auto columns split under `policy`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn column_pixel_widths(
    widths: &[Option<&str>],
    total: f64,
    policy: DistributionPolicy,
) -> Vec<f64> {
    let resolved: Vec<Option<f64>> = widths
        .iter()
        .map(|&width| ColumnWidth::parse(width).resolve(total))
        .collect();

    let auto_count = resolved.iter().filter(|w| w.is_none()).count();
    if auto_count == 0 {
        return resolved.into_iter().flatten().collect();
    }

    let used: f64 = resolved.iter().flatten().sum();
    let auto_width = match policy {
        DistributionPolicy::EqualPercentage => (100.0 / widths.len() as f64) * total / 100.0,
        DistributionPolicy::EqualRemainder => (total - used) / auto_count as f64,
    };

    resolved
        .into_iter()
        .map(|width| width.unwrap_or(auto_width))
        .collect()
}

/// Responsive width spec of each column, as used in `mj-column-per-*` and
/// `mj-column-px-*` class names.
///
/// A percentage yields its number (`"25%"` → `"25"`), any other explicit
/// width is kept verbatim (`"150px"`), and auto columns get
/// `100 / count` formatted without a trailing `.0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn column_width_specs(widths: &[Option<&str>]) -> Vec<String> {
    let auto_spec = format_px_width(100.0 / widths.len().max(1) as f64);
    widths
        .iter()
        .map(|width| match width.map(str::trim) {
            None | Some("") => auto_spec.clone(),
            Some(value) => value
                .strip_suffix('%')
                .map_or(value, str::trim)
                .to_string(),
        })
        .collect()
}

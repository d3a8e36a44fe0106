//! Integration tests for length shorthands, the box model and column widths.

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use quokka_css::values::{EdgeSizes, parse_shorthand, to_pixels};
use quokka_css::{BoxModel, DistributionPolicy, column_pixel_widths, column_width_specs};

fn edges(top: f64, right: f64, bottom: f64, left: f64) -> EdgeSizes {
    EdgeSizes {
        top,
        right,
        bottom,
        left,
    }
}

#[test]
fn test_shorthand_forms() {
    assert_eq!(parse_shorthand("10px"), EdgeSizes::uniform(10.0));
    assert_eq!(parse_shorthand("10px 20px"), edges(10.0, 20.0, 10.0, 20.0));
    assert_eq!(
        parse_shorthand("10px 20px 30px"),
        edges(10.0, 20.0, 30.0, 20.0)
    );
    assert_eq!(
        parse_shorthand(" 1px  2px 3px 4px "),
        edges(1.0, 2.0, 3.0, 4.0)
    );
    assert_eq!(parse_shorthand(""), EdgeSizes::uniform(0.0));
    assert_eq!(parse_shorthand("1 2 3 4 5"), edges(1.0, 2.0, 3.0, 4.0));
}

#[quickcheck]
fn prop_shorthand_follows_css_rule(values: Vec<u16>) -> TestResult {
    if values.is_empty() || values.len() > 4 {
        return TestResult::discard();
    }
    let text = values
        .iter()
        .map(|v| format!("{v}px"))
        .collect::<Vec<_>>()
        .join(" ");
    let v: Vec<f64> = values.iter().copied().map(f64::from).collect();
    let expected = match v.as_slice() {
        [all] => edges(*all, *all, *all, *all),
        [vertical, horizontal] => edges(*vertical, *horizontal, *vertical, *horizontal),
        [top, horizontal, bottom] => edges(*top, *horizontal, *bottom, *horizontal),
        [top, right, bottom, left] => edges(*top, *right, *bottom, *left),
        _ => unreachable!(),
    };
    TestResult::from_bool(parse_shorthand(&text) == expected)
}

#[test]
fn test_lengths_resolve_against_container() {
    assert!((to_pixels("50%", 600.0) - 300.0).abs() < f64::EPSILON);
    assert!((to_pixels("25px", 600.0) - 25.0).abs() < f64::EPSILON);
    assert!((to_pixels("25", 600.0) - 25.0).abs() < f64::EPSILON);
    assert!(to_pixels("wide", 600.0).abs() < f64::EPSILON);
}

#[test]
fn test_box_model_spacing() {
    let model = BoxModel::from_attributes(
        Some("10px 20px"),
        Some("2px solid #000"),
        None,
        None,
    );
    assert!((model.horizontal_spacing() - 44.0).abs() < f64::EPSILON);
    assert!((model.vertical_spacing() - 20.0).abs() < f64::EPSILON);

    let sided = BoxModel::from_attributes(
        Some("0 5px"),
        Some("9px solid red"),
        Some("1px solid red"),
        Some("none"),
    );
    assert!((sided.horizontal_spacing() - 11.0).abs() < f64::EPSILON);
}

#[test]
fn test_equal_percentage_ignores_explicit_widths() {
    let widths = column_pixel_widths(
        &[Some("200px"), None, None],
        600.0,
        DistributionPolicy::EqualPercentage,
    );
    assert!((widths[0] - 200.0).abs() < 1e-9);
    assert!((widths[1] - 200.0).abs() < 1e-9);
    assert!((widths[2] - 200.0).abs() < 1e-9);
}

#[test]
fn test_equal_remainder_splits_what_is_left() {
    let widths = column_pixel_widths(
        &[Some("25%"), Some("0px"), None, None],
        600.0,
        DistributionPolicy::EqualRemainder,
    );
    assert_eq!(widths.len(), 4);
    assert!((widths[0] - 150.0).abs() < 1e-9);
    assert!(widths[1].abs() < 1e-9);
    assert!((widths[2] - 225.0).abs() < 1e-9);
    assert!((widths[3] - 225.0).abs() < 1e-9);
}

#[quickcheck]
#[allow(clippy::cast_precision_loss)]
fn prop_equal_remainder_sums_to_total(columns: Vec<Option<u8>>, total: u16) -> TestResult {
    if columns.is_empty() || columns.iter().all(Option::is_some) || total == 0 {
        return TestResult::discard();
    }
    let total = f64::from(total);
    let count = columns.len();
    // Keep explicit widths within the available space.
    let per_column = total / count as f64;
    let explicit: Vec<Option<String>> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            column.map(|w| {
                if i % 2 == 0 {
                    format!("{}px", (f64::from(w) / 255.0 * per_column).floor())
                } else {
                    format!("{}%", f64::from(w) / 255.0 * 100.0 / count as f64)
                }
            })
        })
        .collect();
    let refs: Vec<Option<&str>> = explicit.iter().map(Option::as_deref).collect();

    let widths = column_pixel_widths(&refs, total, DistributionPolicy::EqualRemainder);
    let sum: f64 = widths.iter().sum();
    TestResult::from_bool((sum - total).abs() < 1e-6 * total.max(1.0))
}

#[test]
fn test_zero_width_column_is_explicit() {
    let widths = column_pixel_widths(
        &[Some("0px"), None],
        500.0,
        DistributionPolicy::EqualRemainder,
    );
    assert!(widths[0].abs() < f64::EPSILON);
    assert!((widths[1] - 500.0).abs() < f64::EPSILON);
}

#[test]
fn test_width_specs() {
    assert_eq!(
        column_width_specs(&[None, None, None]),
        ["33.333333333333336", "33.333333333333336", "33.333333333333336"]
    );
    assert_eq!(column_width_specs(&[None, None]), ["50", "50"]);
    assert_eq!(
        column_width_specs(&[Some("25%"), Some("150px"), None]),
        ["25", "150px", "33.333333333333336"]
    );
}

//! Horizontal layout math for email tables.
//!
//! Email clients lay out nested tables, not boxes, so the only layout this
//! crate performs is horizontal: how much width a box's padding and borders
//! eat ([`BoxModel`]), and how sibling columns split a parent's width
//! ([`column_pixel_widths`], [`column_width_specs`]).

mod box_model;
mod columns;

pub use box_model::BoxModel;
pub use columns::{ColumnWidth, DistributionPolicy, column_pixel_widths, column_width_specs};

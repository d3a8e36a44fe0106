//! Per-subtree rendering state.

use std::cell::Cell;
use std::rc::Rc;

/// What a component knows about where it is rendered.
///
/// Parents derive a new context for each child with the `with_*` methods
/// instead of mutating a shared one, so sibling subtrees never see each
/// other's changes. All contexts derived from one root share its unique-id
/// counter.
#[derive(Debug, Clone)]
pub struct RenderContext {
    container_width: f64,
    column_width_spec: Option<String>,
    index: usize,
    first: bool,
    last: bool,
    inside_wrapper: bool,
    inside_group: bool,
    ids: Rc<Cell<usize>>,
}

impl RenderContext {
    /// Root context for a body of `container_width` pixels, with a fresh
    /// id counter.
    #[must_use]
    pub fn new(container_width: f64) -> Self {
        Self {
            container_width,
            column_width_spec: None,
            index: 0,
            first: true,
            last: true,
            inside_wrapper: false,
            inside_group: false,
            ids: Rc::new(Cell::new(0)),
        }
    }

    /// Available width in pixels.
    #[must_use]
    pub const fn container_width(&self) -> f64 {
        self.container_width
    }

    /// Responsive width spec assigned by the parent section or group,
    /// e.g. `"50"` or `"150px"`.
    #[must_use]
    pub fn column_width_spec(&self) -> Option<&str> {
        self.column_width_spec.as_deref()
    }

    /// Position among the parent's children.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Whether this is the parent's first child.
    #[must_use]
    pub const fn is_first(&self) -> bool {
        self.first
    }

    /// Whether this is the parent's last child.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.last
    }

    /// Whether an `mj-wrapper` encloses this subtree.
    #[must_use]
    pub const fn inside_wrapper(&self) -> bool {
        self.inside_wrapper
    }

    /// Whether an `mj-group` encloses this subtree.
    #[must_use]
    pub const fn inside_group(&self) -> bool {
        self.inside_group
    }

    /// `"{prefix}-{n}"` with `n` unique within this compile.
    #[must_use]
    pub fn next_unique_id(&self, prefix: &str) -> String {
        let n = self.ids.get();
        self.ids.set(n + 1);
        format!("{prefix}-{n}")
    }

    /// Same context with a different available width.
    #[must_use]
    pub fn with_width(&self, width: f64) -> Self {
        Self {
            container_width: width,
            ..self.clone()
        }
    }

    /// Context for a column: its pixel width and responsive spec.
    #[must_use]
    pub fn with_column_width(&self, width: f64, spec: impl Into<String>) -> Self {
        Self {
            container_width: width,
            column_width_spec: Some(spec.into()),
            ..self.clone()
        }
    }

    /// Context for the child at `index` of `count` siblings.
    #[must_use]
    pub fn with_position(&self, index: usize, count: usize) -> Self {
        Self {
            index,
            first: index == 0,
            last: index + 1 == count,
            ..self.clone()
        }
    }

    /// Context marked as inside (or outside) a wrapper.
    #[must_use]
    pub fn with_inside_wrapper(&self, inside: bool) -> Self {
        Self {
            inside_wrapper: inside,
            ..self.clone()
        }
    }

    /// Context marked as inside (or outside) a group.
    #[must_use]
    pub fn with_inside_group(&self, inside: bool) -> Self {
        Self {
            inside_group: inside,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_contexts_share_ids_not_state() {
        let root = RenderContext::new(600.0);
        let child = root.with_width(300.0).with_position(1, 3);
        assert!((root.container_width() - 600.0).abs() < f64::EPSILON);
        assert!(!child.is_first() && !child.is_last());
        assert_eq!(child.index(), 1);

        assert_eq!(root.next_unique_id("carousel"), "carousel-0");
        assert_eq!(child.next_unique_id("carousel"), "carousel-1");
        assert_eq!(RenderContext::new(600.0).next_unique_id("x"), "x-0");
    }

    #[test]
    fn test_column_width_sets_spec() {
        let column = RenderContext::new(600.0).with_column_width(200.0, "33.3");
        assert_eq!(column.column_width_spec(), Some("33.3"));
        assert!(column.with_inside_group(true).inside_group());
        assert!(!column.inside_wrapper());
    }
}

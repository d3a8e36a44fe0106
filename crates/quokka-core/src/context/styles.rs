//! Fonts, stylesheets and media queries collected during a compile.

use std::collections::{HashMap, HashSet};

/// A web font link.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontDef {
    /// Family name, e.g. `Roboto`.
    pub name: String,
    /// Stylesheet URL.
    pub href: String,
}

/// A responsive width rule for one column class.
///
/// Renders as `.{class_name} { width:{width_value}{width_unit} !important; max-width:... }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaQuery {
    /// Column class, e.g. `mj-column-per-50`.
    pub class_name: String,
    /// Width number, or the full `"150px"` for pixel columns.
    pub width_value: String,
    /// `%`, or empty when `width_value` carries its own unit.
    pub width_unit: String,
}

/// Collected styles, in registration order and free of duplicates where
/// noted.
#[derive(Debug, Clone, Default)]
pub struct StyleContext {
    fonts: Vec<FontDef>,
    font_url_overrides: HashMap<String, String>,
    styles: Vec<String>,
    component_styles: Vec<String>,
    inline_styles: Vec<String>,
    media_queries: Vec<MediaQuery>,
    registered_style_keys: HashSet<String>,
    fluid_on_mobile_used: bool,
}

impl StyleContext {
    /// Register a font link. A repeat of the same name and href is ignored.
    pub fn add_font(&mut self, name: &str, href: &str) {
        let font = FontDef {
            name: name.to_string(),
            href: href.to_string(),
        };
        if !self.fonts.contains(&font) {
            self.fonts.push(font);
        }
    }

    /// Registered fonts in order.
    #[must_use]
    pub fn fonts(&self) -> &[FontDef] {
        &self.fonts
    }

    /// Whether a font named `name` is registered.
    #[must_use]
    pub fn has_font(&self, name: &str) -> bool {
        self.fonts.iter().any(|f| f.name == name)
    }

    /// Remember that `mj-font` declared `name` at `href`.
    pub fn register_font_override(&mut self, name: &str, href: &str) {
        let _ = self
            .font_url_overrides
            .insert(name.to_string(), href.to_string());
    }

    /// The `mj-font` URL declared for `name`, if any.
    #[must_use]
    pub fn font_url_override(&self, name: &str) -> Option<&str> {
        self.font_url_overrides.get(name).map(String::as_str)
    }

    /// All `mj-font` declarations.
    #[must_use]
    pub const fn font_url_overrides(&self) -> &HashMap<String, String> {
        &self.font_url_overrides
    }

    /// Add an `mj-style` block. Blank CSS is ignored.
    pub fn add_style(&mut self, css: &str) {
        if !css.trim().is_empty() {
            self.styles.push(css.to_string());
        }
    }

    /// Add `css` unless `key` was already registered. Returns whether it
    /// was added.
    pub fn add_style_once(&mut self, key: &str, css: &str) -> bool {
        if !self.registered_style_keys.insert(key.to_string()) {
            return false;
        }
        self.add_style(css);
        true
    }

    /// `mj-style` blocks in order.
    #[must_use]
    pub fn styles(&self) -> &[String] {
        &self.styles
    }

    /// Add CSS a component needs in the head. Blank CSS is ignored.
    pub fn add_component_style(&mut self, css: &str) {
        if !css.trim().is_empty() {
            self.component_styles.push(css.to_string());
        }
    }

    /// Component CSS in order.
    #[must_use]
    pub fn component_styles(&self) -> &[String] {
        &self.component_styles
    }

    /// Add CSS to be inlined after rendering. Blank CSS is ignored.
    pub fn add_inline_style(&mut self, css: &str) {
        if !css.trim().is_empty() {
            self.inline_styles.push(css.to_string());
        }
    }

    /// CSS flagged for inlining, in order.
    #[must_use]
    pub fn inline_styles(&self) -> &[String] {
        &self.inline_styles
    }

    /// Register a responsive width rule. Duplicates are ignored.
    pub fn add_media_query(&mut self, class_name: &str, width_value: &str, width_unit: &str) {
        let query = MediaQuery {
            class_name: class_name.to_string(),
            width_value: width_value.to_string(),
            width_unit: width_unit.to_string(),
        };
        if !self.media_queries.contains(&query) {
            self.media_queries.push(query);
        }
    }

    /// Responsive width rules in registration order.
    #[must_use]
    pub fn media_queries(&self) -> &[MediaQuery] {
        &self.media_queries
    }

    /// Whether an image asked for full width on mobile.
    #[must_use]
    pub const fn fluid_on_mobile_used(&self) -> bool {
        self.fluid_on_mobile_used
    }

    /// Record that an image asked for full width on mobile.
    pub const fn set_fluid_on_mobile_used(&mut self, used: bool) {
        self.fluid_on_mobile_used = used;
    }
}

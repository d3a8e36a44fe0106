//! Document metadata.

use quokka_css::values::parse_pixels;

use crate::{DEFAULT_BREAKPOINT, DEFAULT_CONTAINER_WIDTH};

/// Title, preview text, breakpoint and other document-level values.
#[derive(Debug, Clone)]
pub struct MetadataContext {
    title: String,
    preview_text: String,
    breakpoint: String,
    container_width: u32,
    body_background_color: String,
    head_comments: Vec<String>,
    file_start_content: Vec<String>,
    head_raw: Vec<String>,
}

impl Default for MetadataContext {
    fn default() -> Self {
        Self {
            title: String::new(),
            preview_text: String::new(),
            breakpoint: DEFAULT_BREAKPOINT.to_string(),
            container_width: DEFAULT_CONTAINER_WIDTH,
            body_background_color: String::new(),
            head_comments: Vec::new(),
            file_start_content: Vec::new(),
            head_raw: Vec::new(),
        }
    }
}

impl MetadataContext {
    /// The `mj-title` text, empty when unset.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Replace the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// The `mj-preview` text, empty when unset.
    #[must_use]
    pub fn preview_text(&self) -> &str {
        &self.preview_text
    }

    /// Replace the preview text.
    pub fn set_preview_text(&mut self, preview: impl Into<String>) {
        self.preview_text = preview.into();
    }

    /// The breakpoint as written, `480px` by default.
    #[must_use]
    pub fn breakpoint(&self) -> &str {
        &self.breakpoint
    }

    /// The breakpoint in whole pixels.
    #[must_use]
    pub fn breakpoint_px(&self) -> i64 {
        parse_pixels(&self.breakpoint, 480)
    }

    /// Replace the breakpoint. Empty values are ignored.
    pub fn set_breakpoint(&mut self, breakpoint: &str) {
        let breakpoint = breakpoint.trim();
        if !breakpoint.is_empty() {
            self.breakpoint = breakpoint.to_string();
        }
    }

    /// Body width in pixels.
    #[must_use]
    pub const fn container_width(&self) -> u32 {
        self.container_width
    }

    /// Replace the body width.
    pub const fn set_container_width(&mut self, width: u32) {
        self.container_width = width;
    }

    /// `mj-body` background colour, empty when unset.
    #[must_use]
    pub fn body_background_color(&self) -> &str {
        &self.body_background_color
    }

    /// Replace the body background colour.
    pub fn set_body_background_color(&mut self, color: impl Into<String>) {
        self.body_background_color = color.into();
    }

    /// Record a comment found in the head.
    pub fn add_head_comment(&mut self, comment: impl Into<String>) {
        self.head_comments.push(comment.into());
    }

    /// Head comments in document order.
    #[must_use]
    pub fn head_comments(&self) -> &[String] {
        &self.head_comments
    }

    /// Record content emitted before the doctype. Empty content is ignored.
    pub fn add_file_start_content(&mut self, content: &str) {
        if !content.is_empty() {
            self.file_start_content.push(content.to_string());
        }
    }

    /// Content emitted before the doctype, in document order.
    #[must_use]
    pub fn file_start_content(&self) -> &[String] {
        &self.file_start_content
    }

    /// Record `mj-raw` markup found in the head. Blank markup is ignored.
    pub fn add_head_raw(&mut self, markup: &str) {
        if !markup.trim().is_empty() {
            self.head_raw.push(markup.to_string());
        }
    }

    /// Raw head markup, emitted at the end of `<head>`.
    #[must_use]
    pub fn head_raw(&self) -> &[String] {
        &self.head_raw
    }
}

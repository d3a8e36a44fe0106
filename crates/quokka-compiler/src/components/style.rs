//! Inline style and Outlook conditional helpers shared by body components.

/// Cell style for Outlook-only wrapper tables.
pub(super) const MSO_TD_STYLE: &str = "line-height:0px;font-size:0px;mso-line-height-rule:exactly;";

/// Opens an Outlook-only conditional block.
pub(super) const MSO_START: &str = "<!--[if mso | IE]>";

/// Closes an Outlook-only conditional block.
pub(super) const MSO_END: &str = "<![endif]-->";

/// Closes an Outlook-only wrapper table.
pub(super) const MSO_TABLE_CLOSE: &str = "</td></tr></table>";

/// An ordered `property:value;` list. Empty values are dropped; setting a
/// property again keeps its first position.
#[derive(Debug, Default)]
pub(super) struct StyleBuilder {
    entries: Vec<(&'static str, String)>,
}

impl StyleBuilder {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn set(&mut self, property: &'static str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        match self.entries.iter_mut().find(|(p, _)| *p == property) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((property, value)),
        }
        self
    }

    pub(super) fn set_opt(&mut self, property: &'static str, value: Option<String>) -> &mut Self {
        if let Some(value) = value {
            let _ = self.set(property, value);
        }
        self
    }

    pub(super) fn finish(&self) -> String {
        self.entries
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(property, value)| format!("{property}:{value};"))
            .collect()
    }
}

/// Opening of the fixed-width table Outlook renders instead of a
/// `max-width` div.
pub(super) fn mso_table_opening(width: u32, css_class: &str, bgcolor: Option<&str>) -> String {
    let class = if css_class.is_empty() {
        String::new()
    } else {
        format!("{css_class}-outlook")
    };
    let bgcolor = bgcolor
        .filter(|c| !c.is_empty())
        .map(|c| format!("bgcolor=\"{c}\" "))
        .unwrap_or_default();
    format!(
        "<table align=\"center\" border=\"0\" cellpadding=\"0\" cellspacing=\"0\" class=\"{class}\" \
         role=\"presentation\" style=\"width:{width}px;\" width=\"{width}\" {bgcolor}><tr><td style=\"{MSO_TD_STYLE}\">"
    )
}

/// Responsive class for a column width spec: `mj-column-per-33-3` or
/// `mj-column-px-150`.
pub(super) fn responsive_class(spec: Option<&str>) -> String {
    let spec = spec.unwrap_or("100");
    spec.strip_suffix("px").map_or_else(
        || format!("mj-column-per-{}", spec.replace('.', "-")),
        |px| format!("mj-column-px-{px}"),
    )
}

/// The `(value, unit)` pair registered as a media query for `spec`.
pub(super) fn media_query_width(spec: Option<&str>) -> (String, &'static str) {
    match spec {
        Some(px) if px.ends_with("px") => (px.to_string(), ""),
        Some(pct) => (pct.to_string(), "%"),
        None => ("100".to_string(), "%"),
    }
}

/// Whether a border value draws anything.
pub(super) fn is_visible_border(value: &str) -> bool {
    !value.is_empty() && value != "none"
}

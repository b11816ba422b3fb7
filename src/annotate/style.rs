//! Highlight marker element

use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};

/// How the active fragment is marked in HTML output.
///
/// The marker is an inline element carrying a class, a data attribute and an
/// inline background tint with rounded padding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HighlightStyle {
    pub tag: String,
    pub class_name: String,
    pub background: String,
    pub padding: String,
    pub border_radius: String,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            tag: "span".to_string(),
            class_name: "readalong-active".to_string(),
            background: "rgba(253, 224, 71, 0.45)".to_string(),
            padding: "0 0.15em".to_string(),
            border_radius: "0.25em".to_string(),
        }
    }
}

impl HighlightStyle {
    /// Inline CSS applied to the marker.
    pub fn inline_css(&self) -> String {
        format!(
            "background-color: {}; padding: {}; border-radius: {};",
            self.background, self.padding, self.border_radius
        )
    }

    pub fn open_tag(&self) -> String {
        format!(
            "<{} class=\"{}\" data-readalong-active=\"true\" style=\"{}\">",
            self.tag_name(),
            escape(&self.class_name),
            escape(&self.inline_css())
        )
    }

    pub fn close_tag(&self) -> String {
        format!("</{}>", self.tag_name())
    }

    /// Wrap already-escaped markup in the marker element.
    pub fn wrap(&self, content: &str) -> String {
        let mut out = self.open_tag();
        out.push_str(content);
        out.push_str(&self.close_tag());
        out
    }

    pub fn is_valid_tag(tag: &str) -> bool {
        !tag.is_empty()
            && tag.starts_with(|c: char| c.is_ascii_alphabetic())
            && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    }

    // An unusable tag name would corrupt the markup; use a span instead
    fn tag_name(&self) -> &str {
        if Self::is_valid_tag(&self.tag) {
            &self.tag
        } else {
            "span"
        }
    }
}

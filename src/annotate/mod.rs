//! # Annotate Module
//!
//! Mark the active unit in a text block.
//!
//! ## Purpose
//! Given the source text (HTML or plain) and an active index from the timing
//! module, produce output that is identical to the source except that one
//! word (or one block) is wrapped in a highlight marker.
//!
//! The annotator is a pure function of `(source, active index)`. It always
//! starts from the clean source, never from its previous output, so it can
//! run on every animation frame without nesting markers, and running it with
//! no active index gives back the source unchanged.
//!
//! ## Sub-modules
//! - `html` - fragment walker shared by word and block granularity
//! - `plain` - flat token arrays for plain text
//! - `style` - the marker element
//!
//! ## Fallbacks
//! - No active index, or empty input: the input is returned as is
//! - Headless rendering (no document to draw into): the input is returned as is
//! - Markup the tokenizer cannot follow: the input is returned as is, with a
//!   warning logged
//!
//! The annotator does not sanitize; callers pass markup that is already safe.

mod html;
mod plain;
mod style;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::HighlightError;
use crate::timing::{Granularity, Units};

pub use plain::{plain_units, render_tokens, units_from_tokens, AnnotatedToken};
pub use style::HighlightStyle;

use html::Document;

/// Where annotated output ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderEnvironment {
    /// A live document that shows the highlight
    #[default]
    Interactive,
    /// Server-side or offline rendering; highlighting is skipped
    Headless,
}

/// Annotation settings for one text block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Annotator {
    pub granularity: Granularity,
    pub locale: Option<String>,
    pub style: HighlightStyle,
    pub environment: RenderEnvironment,
}

impl Annotator {
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            ..Self::default()
        }
    }

    pub fn with_locale(mut self, locale: Option<String>) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_style(mut self, style: HighlightStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_environment(mut self, environment: RenderEnvironment) -> Self {
        self.environment = environment;
        self
    }

    /// Units of an HTML block. Markup that cannot be tokenized has none.
    pub fn html_units(&self, markup: &str) -> Units {
        match Document::parse(markup, self.locale.as_deref()) {
            Ok(document) => document.units(self.granularity),
            Err(e) => {
                warn!(error = %e, "markup could not be tokenized; nothing to highlight");
                Units::default()
            }
        }
    }

    /// Units of a plain-text block.
    pub fn plain_units(&self, text: &str) -> Units {
        plain_units(text, self.granularity, self.locale.as_deref())
    }

    /// Mark unit `active` in `markup`.
    ///
    /// # Example
    /// ```rust
    /// use readalong::annotate::{Annotator, RenderEnvironment};
    /// use readalong::Granularity;
    ///
    /// let annotator = Annotator::new(Granularity::Word);
    /// let markup = "<p>Hello <em>world</em></p>";
    ///
    /// let marked = annotator.annotate_html(markup, Some(2));
    /// assert!(marked.starts_with("<p>Hello <em><span class=\"readalong-active\""));
    /// assert!(marked.ends_with(">world</span></em></p>"));
    ///
    /// assert_eq!(annotator.annotate_html(markup, None), markup);
    ///
    /// let headless = annotator.with_environment(RenderEnvironment::Headless);
    /// assert_eq!(headless.annotate_html(markup, Some(2)), markup);
    /// ```
    pub fn annotate_html(&self, markup: &str, active: Option<usize>) -> String {
        let Some(active) = active else {
            return markup.to_string();
        };
        if markup.is_empty() {
            return String::new();
        }
        if self.environment == RenderEnvironment::Headless {
            debug!(error = %HighlightError::RenderEnvironmentUnavailable, "returning markup unannotated");
            return markup.to_string();
        }

        match Document::parse(markup, self.locale.as_deref()) {
            Ok(document) => document.render(active, self.granularity, &self.style),
            Err(e) => {
                warn!(error = %e, "markup could not be tokenized; returning it unannotated");
                markup.to_string()
            }
        }
    }

    /// Split plain text into tokens with unit `active` flagged.
    pub fn annotate_plain(&self, text: &str, active: Option<usize>) -> Vec<AnnotatedToken> {
        self.render_units(&self.plain_units(text), active)
    }

    /// Flag unit `active` in already-built plain-text units.
    pub fn render_units(&self, units: &Units, active: Option<usize>) -> Vec<AnnotatedToken> {
        let active = match self.environment {
            RenderEnvironment::Interactive => active,
            RenderEnvironment::Headless => None,
        };
        render_tokens(units, active)
    }
}

/// Mark word `active` in `markup` with the default style.
pub fn annotate(markup: &str, active: Option<usize>) -> String {
    Annotator::default().annotate_html(markup, active)
}

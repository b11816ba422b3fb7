//! # Configuration
//!
//! Engine settings loaded from YAML.
//!
//! ```yaml
//! granularity: block
//! locale: en-US
//! estimator: sentence
//! cache-capacity: 64
//! weights:
//!   sentence-pause: 3.0
//!   clause-pause: 1.5
//! style:
//!   tag: mark
//!   background: "#fde047"
//! ```
//!
//! Every field is optional. Values are checked once, when the file is read,
//! so the engine itself never sees an unusable setting.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::annotate::{Annotator, HighlightStyle};
use crate::error::HighlightError;
use crate::segment::Locale;
use crate::timing::Granularity;
use crate::weight::{Estimator, WeightConfig};

/// Raw configuration for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
struct RawConfig {
    granularity: Option<String>,
    locale: Option<String>,
    estimator: Option<String>,
    weights: Option<WeightConfig>,
    style: Option<HighlightStyle>,
    cache_capacity: Option<usize>,
}

/// Validated engine settings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HighlightConfig {
    pub granularity: Granularity,
    pub locale: Option<String>,
    pub estimator: Estimator,
    pub weights: WeightConfig,
    pub style: HighlightStyle,
    /// Bound for the token cache; `None` is unbounded
    pub cache_capacity: Option<usize>,
}

impl HighlightConfig {
    /// Parse a YAML document.
    ///
    /// # Example
    /// ```rust
    /// use readalong::config::HighlightConfig;
    /// use readalong::Granularity;
    ///
    /// let config = HighlightConfig::from_yaml("granularity: block\nlocale: ja").unwrap();
    /// assert_eq!(config.granularity, Granularity::Block);
    /// assert_eq!(config.locale.as_deref(), Some("ja"));
    ///
    /// assert!(HighlightConfig::from_yaml("granularity: sentence").is_err());
    /// ```
    pub fn from_yaml(content: &str) -> Result<Self, HighlightError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|e| HighlightError::Config(e.to_string()))?;

        let granularity = match raw.granularity.as_deref() {
            Some(g) => parse_granularity(g)?,
            None => Granularity::default(),
        };

        let estimator = match raw.estimator.as_deref() {
            Some(e) => parse_estimator(e)?,
            None => Estimator::default(),
        };

        if let Some(locale) = &raw.locale {
            Locale::parse(locale)
                .map_err(|_| HighlightError::Config(format!("Invalid locale: {}", locale)))?;
        }

        let weights = raw.weights.unwrap_or_default();
        validate_weights(&weights)?;

        let style = raw.style.unwrap_or_default();
        if !HighlightStyle::is_valid_tag(&style.tag) {
            return Err(HighlightError::Config(format!(
                "Invalid marker tag: {}",
                style.tag
            )));
        }

        Ok(Self {
            granularity,
            locale: raw.locale,
            estimator,
            weights,
            style,
            cache_capacity: raw.cache_capacity,
        })
    }

    /// Read and parse a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HighlightError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            HighlightError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// An annotator carrying this configuration's granularity, locale and
    /// marker style.
    pub fn annotator(&self) -> Annotator {
        Annotator::new(self.granularity)
            .with_locale(self.locale.clone())
            .with_style(self.style.clone())
    }
}

fn parse_granularity(value: &str) -> Result<Granularity, HighlightError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "word" => Ok(Granularity::Word),
        "block" | "paragraph" => Ok(Granularity::Block),
        _ => Err(HighlightError::Config(format!("Invalid granularity: {}", value))),
    }
}

fn parse_estimator(value: &str) -> Result<Estimator, HighlightError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "token" => Ok(Estimator::Token),
        "sentence" => Ok(Estimator::Sentence),
        _ => Err(HighlightError::Config(format!("Invalid estimator: {}", value))),
    }
}

fn validate_weights(weights: &WeightConfig) -> Result<(), HighlightError> {
    let values = [
        ("sentence-pause", weights.sentence_pause),
        ("clause-pause", weights.clause_pause),
        ("long-word-bonus", weights.long_word_bonus),
        ("very-long-word-bonus", weights.very_long_word_bonus),
    ];
    for (name, value) in values {
        if !value.is_finite() || value < 0.0 {
            return Err(HighlightError::Config(format!(
                "{} must be a non-negative number, got {}",
                name, value
            )));
        }
    }
    if weights.very_long_word_threshold < weights.long_word_threshold {
        return Err(HighlightError::Config(
            "very-long-word-threshold must not be below long-word-threshold".to_string(),
        ));
    }
    Ok(())
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::collect::global_variables::DEFAULT_ENCODING;

/// Thousands separator used in the metric column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThousandsSeparator {
    /// "1.234,5" -> 1234.5
    Period,
    /// Only the decimal comma is converted; "12.5" stays 12.5
    #[default]
    None,
}

impl ThousandsSeparator {
    pub fn as_char(self) -> Option<char> {
        match self {
            ThousandsSeparator::Period => Some('.'),
            ThousandsSeparator::None => None,
        }
    }
}

/// Order of the colors the colormap interpolates through, from min to max
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorOrder {
    #[default]
    GreenYellowRed,
    RedYellowGreen,
}

impl ColorOrder {
    /// Color names, lowest value first
    pub fn colors(self) -> [&'static str; 3] {
        match self {
            ColorOrder::GreenYellowRed => ["green", "yellow", "red"],
            ColorOrder::RedYellowGreen => ["red", "yellow", "green"],
        }
    }
}

/// Pipeline configuration
/// One struct replaces the per-variant copies of the dashboard script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// encoding_rs label of the statistics CSV
    pub encoding: String,
    pub thousands_separator: ThousandsSeparator,
    /// Drop municipalities whose 2022 value is exactly 0
    pub exclude_zero: bool,
    pub color_order: ColorOrder,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            encoding: DEFAULT_ENCODING.to_string(),
            thousands_separator: ThousandsSeparator::None,
            exclude_zero: true,
            color_order: ColorOrder::GreenYellowRed,
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file; missing keys take their default
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse pipeline config JSON")
    }

    /// Resolve the configured label to an encoding_rs encoding
    pub fn resolve_encoding(&self) -> Result<&'static encoding_rs::Encoding> {
        encoding_rs::Encoding::for_label(self.encoding.trim().as_bytes())
            .with_context(|| format!("Unknown CSV encoding label: {}", self.encoding))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.encoding, "latin1");
        assert_eq!(config.thousands_separator, ThousandsSeparator::None);
        assert!(config.exclude_zero);
        assert_eq!(config.color_order, ColorOrder::GreenYellowRed);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            PipelineConfig::from_json_str(r#"{"exclude_zero": false, "color_order": "red-yellow-green"}"#)
                .unwrap();
        assert!(!config.exclude_zero);
        assert_eq!(config.color_order, ColorOrder::RedYellowGreen);
        assert_eq!(config.thousands_separator, ThousandsSeparator::None);
        assert_eq!(config.encoding, "latin1");
    }

    #[test]
    fn test_thousands_separator_from_json() {
        let config = PipelineConfig::from_json_str(r#"{"thousands_separator": "period"}"#).unwrap();
        assert_eq!(config.thousands_separator, ThousandsSeparator::Period);
        assert!(PipelineConfig::from_json_str(r#"{"thousands_separator": ","}"#).is_err());
    }

    #[test]
    fn test_resolve_encoding() {
        let config = PipelineConfig::default();
        assert_eq!(config.resolve_encoding().unwrap(), encoding_rs::WINDOWS_1252);

        let config = PipelineConfig {
            encoding: "utf-8".to_string(),
            ..PipelineConfig::default()
        };
        assert_eq!(config.resolve_encoding().unwrap(), encoding_rs::UTF_8);

        let config = PipelineConfig {
            encoding: "not-an-encoding".to_string(),
            ..PipelineConfig::default()
        };
        assert!(config.resolve_encoding().is_err());
    }

    #[test]
    fn test_color_order() {
        assert_eq!(ColorOrder::GreenYellowRed.colors(), ["green", "yellow", "red"]);
        assert_eq!(ColorOrder::RedYellowGreen.colors(), ["red", "yellow", "green"]);
    }
}

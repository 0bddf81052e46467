//! Tuning knobs for snippet matching and highlight appearance
//!
//! Both structs load from environment variables with defaults:
//! - HIGHLIGHT_MIN_PART_LENGTH: shortest comma-separated part worth searching (default 3)
//! - HIGHLIGHT_MIN_WINDOW_SIZE: smallest sliding-window phrase, in words (default 4)
//! - HIGHLIGHT_DELIMITER_SPLIT: "true"/"false", enables the comma-split strategy (default true)
//! - HIGHLIGHT_COLOR: hex color of highlight annotations (default "#FFFF00")
//! - HIGHLIGHT_OPACITY: annotation opacity in 0.0..=1.0 (default 0.4)

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Comma-separated parts shorter than this (in characters) are skipped
    pub min_part_length: usize,
    /// Sliding-window phrases never shrink below this many words
    pub min_window_size: usize,
    /// Whether the delimiter-split strategy runs between exact and sliding-window
    pub delimiter_split: bool,
    pub delimiter: char,
}

impl MatchConfig {
    pub const DEFAULT_MIN_PART_LENGTH: usize = 3;
    pub const DEFAULT_MIN_WINDOW_SIZE: usize = 4;

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, falling back to defaults for missing keys
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            min_part_length: parse_var(&lookup, "HIGHLIGHT_MIN_PART_LENGTH")?
                .unwrap_or(defaults.min_part_length),
            min_window_size: parse_var(&lookup, "HIGHLIGHT_MIN_WINDOW_SIZE")?
                .unwrap_or(defaults.min_window_size),
            delimiter_split: parse_var(&lookup, "HIGHLIGHT_DELIMITER_SPLIT")?
                .unwrap_or(defaults.delimiter_split),
            delimiter: defaults.delimiter,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_part_length == 0 {
            bail!("min_part_length must be at least 1");
        }
        if self.min_window_size == 0 {
            bail!("min_window_size must be at least 1");
        }
        if self.delimiter.is_whitespace() {
            bail!("delimiter must not be whitespace");
        }
        Ok(())
    }

    /// Matching without the delimiter-split step
    pub fn without_delimiter_split(mut self) -> Self {
        self.delimiter_split = false;
        self
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_part_length: Self::DEFAULT_MIN_PART_LENGTH,
            min_window_size: Self::DEFAULT_MIN_WINDOW_SIZE,
            delimiter_split: true,
            delimiter: ',',
        }
    }
}

/// Appearance of the highlight annotations written into the output PDF
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightStyle {
    pub color: String,
    pub opacity: f64,
}

impl HighlightStyle {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let style = Self {
            color: lookup("HIGHLIGHT_COLOR").unwrap_or(defaults.color),
            opacity: parse_var(&lookup, "HIGHLIGHT_OPACITY")?.unwrap_or(defaults.opacity),
        };
        if !(0.0..=1.0).contains(&style.opacity) {
            bail!("HIGHLIGHT_OPACITY must be between 0 and 1, got {}", style.opacity);
        }
        Ok(style)
    }

    /// Parse the hex color (e.g. "#FF0000" or "FF0000") to RGB floats in 0-1.
    /// Malformed colors fall back to yellow.
    pub fn rgb(&self) -> (f32, f32, f32) {
        let hex = self.color.trim_start_matches('#');
        if hex.len() == 6 && hex.is_ascii() {
            let channel = |range: std::ops::Range<usize>| {
                u8::from_str_radix(&hex[range], 16).map(|v| v as f32 / 255.0)
            };
            if let (Ok(r), Ok(g), Ok(b)) = (channel(0..2), channel(2..4), channel(4..6)) {
                return (r, g, b);
            }
        }
        (1.0, 1.0, 0.0)
    }
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            color: "#FFFF00".to_string(),
            opacity: 0.4,
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow!("Invalid {}={:?}: {}", key, raw, e)),
    }
}

// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use url::Url;

use crate::process::ColumnLayout;

pub const DEFAULT_INPUT: &str = "data/original_data.csv";
pub const DEFAULT_OUTPUT: &str = "data/card_data.csv";
pub const DEFAULT_EXPANSIONS: &str = "data/expansions.json";
pub const DEFAULT_SOURCE_URL: &str = "https://whatsinstandard.com/";

/// Run settings. Every field has a default, so a settings file only needs
/// the keys it changes.
///
/// ```yaml
/// input: dumps/cards.csv
/// columns:
///   name: 49
///   code: 66
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Wide card dump (CSV with a header row).
    pub input: PathBuf,
    /// Deduplicated `"name",year` card table.
    pub output: PathBuf,
    /// `{ "<year>": ["<code>", ...] }` expansion table.
    pub expansions: PathBuf,
    /// Page listing the sets currently legal in Standard.
    pub source_url: String,
    pub columns: ColumnLayout,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            expansions: PathBuf::from(DEFAULT_EXPANSIONS),
            source_url: DEFAULT_SOURCE_URL.to_string(),
            columns: ColumnLayout::default(),
        }
    }
}

impl Settings {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        // an empty document deserializes to unit, not to a map
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).context("parsing settings YAML")
    }

    /// Defaults, or the YAML file at `path` layered over them.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
        Self::from_yaml_str(&text).with_context(|| format!("loading settings from {:?}", path))
    }

    pub fn source_url(&self) -> Result<Url> {
        Url::parse(&self.source_url)
            .with_context(|| format!("parsing source URL {:?}", self.source_url))
    }
}

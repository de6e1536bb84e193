use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::value::{SortKey, SortOrder};

/// Application configuration.
///
/// Every field is optional; command-line flags win over these values.
///
/// Example YAML:
/// ```yaml
/// data: /home/me/fpl/season.json
/// window:
///   start: 1
///   end: 10
/// outlier_z: 1.5
/// sort: ppm
/// order: descending
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path to the season snapshot JSON
    #[serde(default)]
    pub data: Option<PathBuf>,

    /// Default gameweek window (inclusive)
    #[serde(default)]
    pub window: Option<WindowConfig>,

    /// Z-score at which a gameweek is marked as a high outlier (default: 1.5)
    #[serde(default)]
    pub outlier_z: Option<f64>,

    /// Default sort column for the value table
    #[serde(default)]
    pub sort: Option<SortKey>,

    #[serde(default)]
    pub order: Option<SortOrder>,
}

/// Either bound may be left out; the missing side comes from the season data.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WindowConfig {
    #[serde(default)]
    pub start: Option<u32>,
    #[serde(default)]
    pub end: Option<u32>,
}

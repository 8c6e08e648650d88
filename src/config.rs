//! Cleaning options.
//!
//! Defaults describe the property listing export: rating columns are the
//! ones whose name contains `rating`, the free-text field is `Description`,
//! and `guests`, `beds`, `bathrooms` and `bedrooms` fall back to `1`.
//! Options can be read from a YAML file and then overridden from the
//! command line.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

pub const DEFAULT_RATING_MARKER: &str = "rating";
pub const DEFAULT_DESCRIPTION_COLUMN: &str = "Description";
pub const DEFAULT_FEATURE_COLUMNS: &[&str] = &["guests", "beds", "bathrooms", "bedrooms"];
pub const DEFAULT_FEATURE_VALUE: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanOptions {
    /// Substring identifying rating columns.
    pub rating_marker: String,
    pub description_column: String,
    /// Columns whose missing values are replaced by `default_value`.
    pub default_columns: Vec<String>,
    pub default_value: f64,
}

impl Default for CleanOptions {
    fn default() -> Self {
        CleanOptions {
            rating_marker: DEFAULT_RATING_MARKER.to_string(),
            description_column: DEFAULT_DESCRIPTION_COLUMN.to_string(),
            default_columns: DEFAULT_FEATURE_COLUMNS
                .iter()
                .map(|name| name.to_string())
                .collect(),
            default_value: DEFAULT_FEATURE_VALUE,
        }
    }
}

impl CleanOptions {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening config file {path:?}"))?;
        let options: CleanOptions = serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("Parsing config YAML {path:?}"))?;
        options.validate()?;
        Ok(options)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Creating config file {path:?}"))?;
        serde_yaml::to_writer(file, self).context("Writing config YAML")
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.rating_marker.is_empty(),
            "rating_marker must not be empty"
        );
        ensure!(
            !self.description_column.is_empty(),
            "description_column must not be empty"
        );
        ensure!(
            self.default_value.is_finite(),
            "default_value must be a finite number"
        );
        Ok(())
    }
}

//! Field configuration: reads `fields.toml` and falls back to defaults.

use crate::error::FieldResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Settings shared by every field instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Maximum characters shown in a table cell before truncation.
    #[serde(default = "default_cell_truncation_length")]
    pub cell_truncation_length: usize,
    /// Name of the host's entries relation, joined as `e`.
    #[serde(default = "default_entries_table")]
    pub entries_table: String,
}

fn default_cell_truncation_length() -> usize {
    75
}

fn default_entries_table() -> String {
    "entries".to_string()
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            cell_truncation_length: default_cell_truncation_length(),
            entries_table: default_entries_table(),
        }
    }
}

/// Raw TOML structure matching the `fields.toml` format.
#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    fields: Option<FieldConfig>,
}

impl FieldConfig {
    /// Parses a `[fields]` table from TOML text.
    pub fn from_toml_str(contents: &str) -> FieldResult<Self> {
        let file: ConfigFile = toml::from_str(contents)?;
        Ok(file.fields.unwrap_or_default())
    }

    /// Loads configuration from a path. A missing, unreadable or invalid
    /// file yields the defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No field config at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded field config from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse field config {:?}: {}. Using defaults.", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read field config {:?}: {}", path, e);
                Self::default()
            }
        }
    }
}

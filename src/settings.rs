//! Converter settings persistence.
//!
//! Settings are plain JSON. Every field has a serde default, so a partial
//! file (or no file at all) still yields a complete configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConvertError;
use crate::output::WriteMode;

/// Settings for one conversion run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConvertSettings {
    /// Settings file version for migration support
    #[serde(default = "default_version")]
    pub version: u32,
    /// Directory scanned for input files
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    /// Glob pattern, relative to `input_dir`
    #[serde(default = "default_pattern")]
    pub pattern: String,
    /// Directory holding the combined CSV, created on demand
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// File name of the combined CSV
    #[serde(default = "default_output_file")]
    pub output_file: String,
    /// Append to an existing destination instead of truncating it
    #[serde(default)]
    pub append: bool,
    /// Log and skip unreadable inputs instead of aborting the run
    #[serde(default)]
    pub skip_unreadable: bool,
}

fn default_version() -> u32 {
    1
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_pattern() -> String {
    "*.gsd".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_output_file() -> String {
    "combined_data.csv".to_string()
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            input_dir: default_input_dir(),
            pattern: default_pattern(),
            output_dir: default_output_dir(),
            output_file: default_output_file(),
            append: false,
            skip_unreadable: false,
        }
    }
}

impl ConvertSettings {
    /// Get the config directory path for gsdconv
    pub fn get_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gsdconv"))
    }

    /// Get the path to the default settings JSON file
    pub fn get_settings_path() -> Option<PathBuf> {
        Self::get_config_dir().map(|p| p.join("settings.json"))
    }

    /// Full path of the combined CSV
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file)
    }

    pub fn write_mode(&self) -> WriteMode {
        if self.append {
            WriteMode::Append
        } else {
            WriteMode::Truncate
        }
    }

    /// Load settings from the default location, falling back to defaults
    /// when the file is missing or unreadable
    pub fn load() -> Self {
        let path = match Self::get_settings_path() {
            Some(p) => p,
            None => return Self::default(),
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring settings file: {}", e);
                Self::default()
            }
        }
    }

    /// Load settings from an explicit file
    pub fn load_from(path: &Path) -> Result<Self, ConvertError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConvertError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<PathBuf, ConvertError> {
        let path = Self::get_settings_path().ok_or(ConvertError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save settings as pretty JSON, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), ConvertError> {
        let io_err = |source| ConvertError::SettingsIo {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(io_err)?;

        Ok(())
    }
}

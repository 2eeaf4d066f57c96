//! Archive configuration (`archive.toml`)
//!
//! Holds the protocol version used by the resource helpers and the default
//! behavior of the text and record readers. Every field has a default, so a
//! partial or empty file is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ArchiveError, Result};

/// Archive configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Protocol version written to and expected from streams (default: 1)
    #[serde(default = "default_version")]
    pub version: u32,
    /// Text codec settings
    #[serde(default)]
    pub text: TextConfig,
    /// Record codec settings
    #[serde(default)]
    pub record: RecordConfig,
}

/// Text codec configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextConfig {
    /// Validate delimiters and keywords while reading (default: true)
    #[serde(default = "default_true")]
    pub strict: bool,
}

/// Record playback configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordConfig {
    /// Initial playback speed multiplier (default: 1.0, range: 0.1-10.0)
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Snap the playback clock to the first entry on open (default: true)
    #[serde(default = "default_true")]
    pub skip_to_first: bool,
}

fn default_version() -> u32 {
    1
}
fn default_true() -> bool {
    true
}
fn default_speed() -> f32 {
    1.0
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            text: TextConfig::default(),
            record: RecordConfig::default(),
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            strict: default_true(),
        }
    }
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            skip_to_first: default_true(),
        }
    }
}

impl ArchiveConfig {
    /// Parse a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ArchiveError::Config(e.to_string()))
    }

    /// Render as a TOML document
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ArchiveError::Config(e.to_string()))
    }

    /// Load from a file, returning defaults if the file does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ArchiveError::Io(e)),
        }
    }

    /// Write to a file, creating parent directories as needed
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

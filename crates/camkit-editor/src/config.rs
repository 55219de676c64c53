//! Editor configuration
//!
//! Loaded from and saved to JSON or TOML, chosen by file extension.

use camkit_core::{Error, Result, Units};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::snap::SnapOptions;
use crate::tools::drill::DrillArrayParams;
use crate::tools::MultiSelectKey;

/// Drawing and selection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingSettings {
    /// Segments used to approximate a full circle
    pub circle_steps: usize,
    /// Pick distance for selection clicks
    pub selection_tolerance: f64,
    /// Simplification tolerance for shape store keys; 0 keeps every vertex
    pub index_tolerance: f64,
    /// Modifier that toggles shapes in and out of the selection
    pub multi_select: MultiSelectKey,
    pub draw_color: String,
    pub selection_color: String,
    pub utility_color: String,
}

impl Default for DrawingSettings {
    fn default() -> Self {
        Self {
            circle_steps: 128,
            selection_tolerance: 0.05,
            index_tolerance: 0.0,
            multi_select: MultiSelectKey::Control,
            draw_color: "#FF0000".to_string(),
            selection_color: "#0000FF".to_string(),
            utility_color: "#000000".to_string(),
        }
    }
}

/// Drill editing defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrillSettings {
    pub array: DrillArrayParams,
    /// Diameter proposed for a new tool
    pub new_tool_diameter: f64,
}

impl Default for DrillSettings {
    fn default() -> Self {
        Self {
            array: DrillArrayParams::default(),
            new_tool_diameter: 1.0,
        }
    }
}

/// Complete editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EditorConfig {
    pub units: Units,
    pub snap: SnapOptions,
    pub drawing: DrawingSettings,
    pub drill: DrillSettings,
}

impl EditorConfig {
    /// Default config file location (`<config dir>/camkit/editor.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("camkit").join("editor.toml"))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match extension(path).as_str() {
            "json" => serde_json::from_str(&content)?,
            "toml" => toml::from_str(&content)?,
            other => {
                return Err(Error::UnsupportedFormat {
                    extension: other.to_string(),
                })
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "no editor config, using defaults");
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = match extension(path).as_str() {
            "json" => serde_json::to_string_pretty(self)?,
            "toml" => toml::to_string_pretty(self)?,
            other => {
                return Err(Error::UnsupportedFormat {
                    extension: other.to_string(),
                })
            }
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.drawing.circle_steps < 3 {
            return Err(Error::InvalidConfig(
                "Circle steps must be at least 3".to_string(),
            ));
        }
        if self.snap.grid_x < 0.0 || self.snap.grid_y < 0.0 {
            return Err(Error::InvalidConfig(
                "Grid spacing must not be negative".to_string(),
            ));
        }
        if self.snap.snap_max < 0.0 {
            return Err(Error::InvalidConfig(
                "Snap distance must not be negative".to_string(),
            ));
        }
        if self.drawing.selection_tolerance < 0.0 || self.drawing.index_tolerance < 0.0 {
            return Err(Error::InvalidConfig(
                "Tolerances must not be negative".to_string(),
            ));
        }
        if self.drill.array.size == 0 {
            return Err(Error::InvalidConfig(
                "Drill array size must be > 0".to_string(),
            ));
        }
        if self.drill.new_tool_diameter <= 0.0 {
            return Err(Error::InvalidConfig(
                "Tool diameter must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase()
}

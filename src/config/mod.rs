//! Configuration file support for vecdraw.
//!
//! This module handles loading and validating the default drawing state from the
//! configuration file located at `~/.config/vecdraw/config.toml`. Settings cover
//! the surface size and background, the initial pen, brush and font, and the
//! text colors.
//!
//! If no config file exists, the built-in defaults are used.

pub mod enums;
pub mod types;

// Re-export commonly used types at module level
pub use enums::ColorSpec;
pub use types::{BrushConfig, FontConfig, PenConfig, SurfaceConfig, TextConfig};

use crate::util::clamp_in_place;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Largest accepted surface side, in pixels.
pub const MAX_SURFACE_SIZE: u32 = 16384;

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// Every section and field has a default and may be omitted.
///
/// # Example TOML
/// ```toml
/// [surface]
/// width = 800
/// height = 600
/// background = "white"
///
/// [pen]
/// color = [200, 30, 30]
/// width = 2.0
/// style = "long-dash"
///
/// [brush]
/// color = "light blue"
/// style = "cross-hatch"
///
/// [font]
/// size = 24.0
/// family = "roman"
/// weight = "bold"
///
/// [text]
/// mode = "solid"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Surface size and background color
    #[serde(default)]
    pub surface: SurfaceConfig,

    /// Initial pen
    #[serde(default)]
    pub pen: PenConfig,

    /// Initial brush
    #[serde(default)]
    pub brush: BrushConfig,

    /// Initial font
    #[serde(default)]
    pub font: FontConfig,

    /// Text colors and background mode
    #[serde(default)]
    pub text: TextConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `surface.width`, `surface.height`: 1 - 16384
    /// - `pen.width`: 0.0 - 255.0
    /// - `font.size`: 1.0 - 1024.0
    pub fn validate_and_clamp(&mut self) {
        // Surface size: 1 - 16384
        for (name, value) in [
            ("width", &mut self.surface.width),
            ("height", &mut self.surface.height),
        ] {
            if !(1..=MAX_SURFACE_SIZE).contains(&*value) {
                warn!(
                    "Invalid surface {} {}, clamping to 1-{} range",
                    name, value, MAX_SURFACE_SIZE
                );
                *value = (*value).clamp(1, MAX_SURFACE_SIZE);
            }
        }

        // Pen width: 0.0 - 255.0
        let width = self.pen.width;
        if clamp_in_place(&mut self.pen.width, 0.0, 255.0) {
            warn!("Invalid pen width {:.1}, clamping to 0.0-255.0 range", width);
        }

        // Font size: 1.0 - 1024.0
        let size = self.font.size;
        if clamp_in_place(&mut self.font.size, 1.0, 1024.0) {
            warn!("Invalid font size {:.1}, clamping to 1.0-1024.0 range", size);
        }

        if self.font.face.as_deref().is_some_and(|f| f.trim().is_empty()) {
            warn!("Empty font face, using the '{}' family", self.font.family);
            self.font.face = None;
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/vecdraw/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("vecdraw");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates the configuration file at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        // Validate and clamp values to acceptable ranges
        config.validate_and_clamp();

        info!("Loaded config from {}", path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Saves the configuration to the default location.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created, the config cannot be
    /// serialized, or the file cannot be written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    /// Serializes the config to TOML at `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, config_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// JSON schema of the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{BrushStyle, FontWeight, PenStyle, TextMode};

    #[test]
    fn empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.surface.width, 500);
        assert_eq!(config.surface.height, 500);
        assert_eq!(config.pen.width, 1.0);
        assert_eq!(config.pen.style, PenStyle::Solid);
        assert_eq!(config.brush.style, BrushStyle::Solid);
        assert_eq!(config.font.size, 18.0);
        assert_eq!(config.text.mode, TextMode::Transparent);
    }

    #[test]
    fn keywords_and_colors_parse() {
        let config: Config = toml::from_str(
            r#"
            [pen]
            color = [10, 20, 30]
            style = "long-dash"
            cap = "butt"

            [brush]
            color = "light blue"
            style = "cross-hatch"

            [font]
            weight = "bold"
            face = "DejaVu Sans"

            [text]
            mode = "solid"
            "#,
        )
        .unwrap();
        assert_eq!(config.pen.color, ColorSpec::Rgb([10, 20, 30]));
        assert_eq!(config.pen.style, PenStyle::LongDash);
        assert_eq!(config.brush.style, BrushStyle::CrossHatch);
        assert_eq!(config.font.weight, FontWeight::Bold);
        assert_eq!(config.font.face.as_deref(), Some("DejaVu Sans"));
        assert_eq!(config.text.mode, TextMode::Solid);
    }

    #[test]
    fn unknown_keyword_is_a_parse_error() {
        assert!(toml::from_str::<Config>("[pen]\nstyle = \"wavy\"\n").is_err());
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let mut config = Config::default();
        config.surface.width = 0;
        config.surface.height = 100_000;
        config.pen.width = 300.0;
        config.font.size = 0.5;
        config.font.face = Some("  ".into());
        config.validate_and_clamp();
        assert_eq!(config.surface.width, 1);
        assert_eq!(config.surface.height, MAX_SURFACE_SIZE);
        assert_eq!(config.pen.width, 255.0);
        assert_eq!(config.font.size, 1.0);
        assert!(config.font.face.is_none());
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.surface.width = 320;
        config.pen.style = PenStyle::Dot;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.surface.width, 320);
        assert_eq!(loaded.pen.style, PenStyle::Dot);
    }

    #[test]
    fn schema_names_every_section() {
        let schema = serde_json::to_value(Config::json_schema()).unwrap();
        let properties = &schema["properties"];
        for section in ["surface", "pen", "brush", "font", "text"] {
            assert!(properties.get(section).is_some(), "missing {section}");
        }
    }
}

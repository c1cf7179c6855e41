//! Configuration handling for sketch-overlay
//!
//! Defines the fixed drawing palette and provides loading/saving of
//! the TOML configuration file. Colors are RGBA; the canvas converts
//! them to its own byte order.

use crate::draw::{rgba_to_pixel, Palette};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// Appearance of the sketch surface and its strokes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SketchConfig {
    /// Surface fill, RGBA.
    pub background_color: [u8; 4],
    /// Stroke color, RGBA.
    pub stroke_color: [u8; 4],
    /// Pen width in backing pixels.
    pub stroke_width: u32,
    /// Color of the static center marker, RGBA.
    pub marker_color: [u8; 4],
    /// Radius of the static center marker in backing pixels.
    pub marker_radius: u32,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            background_color: [255, 255, 255, 255],
            stroke_color: [0, 0, 0, 255],
            stroke_width: 2,
            marker_color: [153, 153, 153, 255],
            marker_radius: 10,
        }
    }
}

impl SketchConfig {
    /// Get the path to the configuration file
    pub fn get_config_path() -> PathBuf {
        let config_dir = if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("sketch-overlay")
        } else {
            PathBuf::from(".config/sketch-overlay")
        };

        config_dir.join("config.toml")
    }

    /// Load configuration from file, creating a default one if missing
    pub fn load_from_file() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = Self::get_config_path();

        match fs::read_to_string(&config_path) {
            Ok(content) => {
                let config: Self = toml::from_str(&content)?;
                Ok(config)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let default_config = Self::default();
                default_config.save_to_file()?;
                Ok(default_config)
            }
            Err(e) => Err(Box::new(e)),
        }
    }

    /// Save configuration to file
    pub fn save_to_file(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_path = Self::get_config_path();

        if let Some(parent) = config_path.parent() {
            if !Path::exists(parent) {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(config_path, content)?;

        Ok(())
    }

    /// Resolve the canvas palette from the configured RGBA colors.
    pub fn palette(&self) -> Palette {
        Palette {
            background: rgba_to_pixel(self.background_color),
            stroke: rgba_to_pixel(self.stroke_color),
            stroke_width: self.stroke_width.max(1),
            marker: rgba_to_pixel(self.marker_color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse_back_from_toml() {
        let config = SketchConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: SketchConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.stroke_width, config.stroke_width);
        assert_eq!(parsed.background_color, config.background_color);
    }

    #[test]
    fn palette_never_has_zero_pen_width() {
        let config = SketchConfig {
            stroke_width: 0,
            ..Default::default()
        };
        assert_eq!(config.palette().stroke_width, 1);
    }
}

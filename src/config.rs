use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default glyph for the three-dot indicator.
pub const DEFAULT_GLYPH: &str = "\u{2022}";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a finite positive number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must be a finite non-negative number, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("backdrop_opacity must be within 0.0..=1.0, got {0}")]
    Opacity(f32),
}

/// Styling and timing of the dot-wave overlay.
/// Stored in the platform config directory (`$XDG_CONFIG_HOME/dotwave/` or `%APPDATA%\dotwave\`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Glyphs shown when no sequence is supplied at attach time.
    pub symbols: Vec<String>,
    /// Glyph font size in logical units.
    pub font_size: f32,
    /// Glyph width per character, as a fraction of `font_size`.
    pub glyph_advance: f32,
    /// Glyph height, as a fraction of `font_size`.
    pub glyph_line_height: f32,
    /// Horizontal gap between adjacent glyphs.
    pub glyph_gap: f32,
    /// Glyph colour, RGBA.
    pub glyph_color: [u8; 4],
    pub panel_width: f32,
    pub panel_height: f32,
    /// Fill of the panel behind the glyphs, RGBA.
    pub panel_tint: [u8; 4],
    /// Corner radius shared by the backdrop and the panel.
    pub corner_radius: f32,
    /// Fill of the full-size backdrop, RGB (alpha comes from `backdrop_opacity`).
    pub backdrop_tint: [u8; 3],
    /// Backdrop alpha (0.0–1.0).
    pub backdrop_opacity: f32,
    /// Gaussian sigma of the backdrop blur. 0 disables the blur.
    pub blur_sigma: f32,
    /// How far each glyph rises at the top of its bob.
    pub wave_offset: f32,
    /// Seconds for one rise (the fall takes as long again).
    pub cycle_duration: f64,
    /// Start delay per glyph index, as a fraction of `cycle_duration`.
    pub stagger_factor: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            symbols: vec![DEFAULT_GLYPH.to_string(); 3],
            font_size: 70.0,
            glyph_advance: 0.5,
            glyph_line_height: 1.2,
            glyph_gap: 2.0,
            glyph_color: [255, 255, 255, 255],
            panel_width: 140.0,
            panel_height: 60.0,
            panel_tint: [255, 255, 255, 128],
            corner_radius: 10.0,
            backdrop_tint: [0, 0, 0],
            backdrop_opacity: 0.9,
            blur_sigma: 12.0,
            wave_offset: 14.0,
            cycle_duration: 0.6,
            stagger_factor: 0.3,
        }
    }
}

impl OverlayConfig {
    /// Load config from `config.json` in the platform config directory, or return defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Load config from `path`. Falls back to defaults when the file does not
    /// parse or fails `validate()`; a missing file is created with defaults.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Self>(&contents) {
                Ok(config) => match config.validate() {
                    Ok(()) => {
                        log::info!("Loaded config from {}", path.display());
                        config
                    }
                    Err(e) => {
                        log::warn!("Invalid config in {}: {}, using defaults", path.display(), e);
                        Self::default()
                    }
                },
                Err(e) => {
                    log::warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!(
                    "No config file at {}, using defaults. Creating default config.",
                    path.display()
                );
                let config = Self::default();
                config.save_to(path);
                config
            }
        }
    }

    /// Save current config to `config.json`.
    pub fn save(&self) {
        self.save_to(&config_path());
    }

    pub fn save_to(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    log::warn!("Failed to write config to {}: {}", path.display(), e);
                }
            }
            Err(e) => {
                log::warn!("Failed to serialize config: {}", e);
            }
        }
    }

    /// Replace the default symbol row. Returns `false` when nothing changed.
    pub fn remember_symbols(&mut self, symbols: &[String]) -> bool {
        if self.symbols == symbols {
            return false;
        }
        self.symbols = symbols.to_vec();
        true
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("font_size", self.font_size as f64),
            ("glyph_advance", self.glyph_advance as f64),
            ("glyph_line_height", self.glyph_line_height as f64),
            ("panel_width", self.panel_width as f64),
            ("panel_height", self.panel_height as f64),
            ("cycle_duration", self.cycle_duration),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let non_negative = [
            ("glyph_gap", self.glyph_gap as f64),
            ("corner_radius", self.corner_radius as f64),
            ("blur_sigma", self.blur_sigma as f64),
            ("wave_offset", self.wave_offset as f64),
            ("stagger_factor", self.stagger_factor),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if !(0.0..=1.0).contains(&self.backdrop_opacity) {
            return Err(ConfigError::Opacity(self.backdrop_opacity));
        }
        Ok(())
    }

    /// Backdrop colour with `backdrop_opacity` folded into the alpha channel.
    pub fn backdrop_rgba(&self) -> [u8; 4] {
        let [r, g, b] = self.backdrop_tint;
        let a = (self.backdrop_opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        [r, g, b, a]
    }
}

fn config_path() -> PathBuf {
    let dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dotwave");
    if !dir.exists() {
        std::fs::create_dir_all(&dir).ok();
    }
    dir.join("config.json")
}

//! Game settings and preferences
//!
//! Persisted as JSON next to the binary, separately from the high score.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Terminal glyph presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GlyphPreset {
    /// Plain ASCII, for terminals without good box-drawing fonts
    Ascii,
    #[default]
    Unicode,
}

impl GlyphPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            GlyphPreset::Ascii => "Ascii",
            GlyphPreset::Unicode => "Unicode",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ascii" => Some(GlyphPreset::Ascii),
            "unicode" | "utf8" => Some(GlyphPreset::Unicode),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Glyph set used by the terminal renderer
    pub glyphs: GlyphPreset,

    // === Visual Effects ===
    /// Particle bursts on pickups and captures
    pub particles: bool,

    // === Frame pacing ===
    /// Render frame cap in frames per second
    pub fps_cap: u32,

    // === Accessibility ===
    /// High contrast mode (drops the dimmed wall shading)
    pub high_contrast: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            glyphs: GlyphPreset::Unicode,
            particles: true,
            fps_cap: 60,
            high_contrast: false,
        }
    }
}

impl Settings {
    /// Settings file next to the working directory
    pub const FILE_NAME: &'static str = "settings.json";

    /// Load settings from the default file
    pub fn load() -> Self {
        Self::load_from(Path::new(Self::FILE_NAME))
    }

    /// Save settings to the default file
    pub fn save(&self) {
        self.save_to(Path::new(Self::FILE_NAME));
    }

    /// Load from a specific path; any failure falls back to defaults
    pub fn load_from(path: &Path) -> Self {
        if let Ok(json) = fs::read_to_string(path)
            && let Ok(settings) = serde_json::from_str(&json)
        {
            log::info!("Loaded settings from {}", path.display());
            return settings;
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save to a specific path
    pub fn save_to(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(err) = fs::write(path, json) {
                    log::warn!("Failed to save settings: {err}");
                } else {
                    log::info!("Settings saved");
                }
            }
            Err(err) => log::warn!("Failed to serialize settings: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!(GlyphPreset::from_str("ascii"), Some(GlyphPreset::Ascii));
        assert_eq!(GlyphPreset::from_str("ASCII"), Some(GlyphPreset::Ascii));
        assert_eq!(GlyphPreset::from_str("unicode"), Some(GlyphPreset::Unicode));
        assert_eq!(GlyphPreset::from_str("blocky"), None);
    }

    #[test]
    fn test_missing_file_defaults() {
        let settings = Settings::load_from(Path::new("does-not-exist.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_corrupt_file_defaults() {
        let path = temp_path("pellet-chase-settings-corrupt");
        fs::write(&path, "not json at all").unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings, Settings::default());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_round_trip() {
        let path = temp_path("pellet-chase-settings-roundtrip");
        let settings = Settings {
            glyphs: GlyphPreset::Ascii,
            particles: false,
            fps_cap: 30,
            high_contrast: true,
        };

        settings.save_to(&path);
        assert_eq!(Settings::load_from(&path), settings);

        let _ = fs::remove_file(&path);
    }
}

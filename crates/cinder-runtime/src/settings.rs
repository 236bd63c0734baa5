//! Persisted configuration
//!
//! Input bindings and the video configuration round-trip through one TOML
//! file. Loaded at startup when present, saved on explicit request.

use crate::input::InputBindings;
use crate::video::VideoConfig;
use cinder_core::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub bindings: InputBindings,
    #[serde(default)]
    pub video: VideoConfig,
}

impl Settings {
    /// Per-user settings path, e.g. `~/.config/cinder/settings.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cinder").join("settings.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputBinding, InputSlot};
    use cinder_core::IntSize;
    use winit::keyboard::KeyCode;

    #[test]
    fn settings_round_trip() {
        let dir = std::env::temp_dir().join("cinder_settings_test");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("settings.toml");

        let mut settings = Settings::default();
        settings
            .bindings
            .set(InputSlot::Action, InputBinding::Key(KeyCode::Enter));
        settings.video.size = IntSize::new(1920, 1080);
        settings.video.fullscreen = true;
        settings.save(&path).expect("save failed");

        let loaded = Settings::load(&path).expect("load failed");
        assert_eq!(
            loaded.bindings.get(InputSlot::Action),
            InputBinding::Key(KeyCode::Enter)
        );
        assert_eq!(
            loaded.bindings.get(InputSlot::Left),
            settings.bindings.get(InputSlot::Left)
        );
        assert_eq!(loaded.video.size, IntSize::new(1920, 1080));
        assert!(loaded.video.fullscreen);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("cinder_settings_missing.toml");
        assert!(Settings::load(&path).is_err());
    }
}

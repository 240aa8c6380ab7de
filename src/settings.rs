//! Game settings and preferences
//!
//! Persisted in LocalStorage, separate from match history.

use serde::{Deserialize, Serialize};

use crate::input::KeyBindings;
use crate::sim::{SimConfig, Variant};

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Rule set the next game is played with
    pub variant: Variant,
    #[serde(default)]
    pub bindings: KeyBindings,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Background music volume (0.0 - 1.0)
    #[serde(default = "default_music_volume")]
    pub music_volume: f32,
    pub muted: bool,
    /// Mute when window loses focus
    pub mute_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: Variant::Classic,
            bindings: KeyBindings::default(),
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: default_music_volume(),
            muted: false,
            mute_on_blur: true,
        }
    }
}

fn default_music_volume() -> f32 {
    0.3
}

impl Settings {
    /// Pick a variant by name, returns false for an unknown name
    pub fn select_variant(&mut self, name: &str) -> bool {
        match Variant::from_str(name) {
            Some(variant) => {
                self.variant = variant;
                true
            }
            None => {
                log::warn!("Unknown variant '{}', keeping {}", name, self.variant.as_str());
                false
            }
        }
    }

    /// Switch to the next variant and return it
    pub fn cycle_variant(&mut self) -> Variant {
        self.variant = self.variant.next();
        self.variant
    }

    /// Simulation constants for the chosen variant
    pub fn sim_config(&self) -> SimConfig {
        self.variant.config().sanitized()
    }

    /// Effective sound effect volume (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Effective music volume (0 when muted)
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "road_rivals_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_config_follows_variant() {
        let mut settings = Settings::default();
        assert!(settings.select_variant("remix"));
        assert_eq!(settings.sim_config(), Variant::Remix.config());

        assert!(!settings.select_variant("turbo"));
        assert_eq!(settings.variant, Variant::Remix);

        assert_eq!(settings.cycle_variant(), Variant::Classic);
        assert_eq!(settings.sim_config(), SimConfig::default());
    }

    #[test]
    fn test_variant_choice_survives_json() {
        let mut settings = Settings::default();
        settings.cycle_variant();
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.variant, Variant::Remix);
    }

    #[test]
    fn test_effective_volume() {
        let mut settings = Settings::default();
        assert!((settings.effective_volume() - 0.8).abs() < 1e-6);
        assert!((settings.effective_music_volume() - 0.24).abs() < 1e-6);
        settings.muted = true;
        assert_eq!(settings.effective_volume(), 0.0);
        assert_eq!(settings.effective_music_volume(), 0.0);
    }

    #[test]
    fn test_missing_bindings_default_on_load() {
        let json = r#"{"variant":"Remix","master_volume":0.5,"sfx_volume":1.0,"muted":false,"mute_on_blur":true}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.variant, Variant::Remix);
        assert_eq!(settings.bindings, KeyBindings::default());
        assert_eq!(settings.music_volume, 0.3);
    }
}

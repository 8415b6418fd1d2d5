//! Game settings and preferences
//!
//! Persisted separately from the best score in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_STARTING_TILES, MAX_STARTING_TILES, MIN_STARTING_TILES};

/// Game preferences, chosen on the menu screen before a session starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Number of tiles seeded onto a fresh grid (1-4)
    pub starting_tiles: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            starting_tiles: DEFAULT_STARTING_TILES,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "wasm_2048_settings";

    /// Starting tile count, clamped to the supported range.
    pub fn effective_starting_tiles(&self) -> u8 {
        self.starting_tiles.clamp(MIN_STARTING_TILES, MAX_STARTING_TILES)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
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
    fn starting_tiles_clamp_to_supported_range() {
        let low = Settings { starting_tiles: 0 };
        assert_eq!(low.effective_starting_tiles(), 1);
        let high = Settings { starting_tiles: 12 };
        assert_eq!(high.effective_starting_tiles(), 4);
        assert_eq!(Settings::default().effective_starting_tiles(), 2);
    }
}

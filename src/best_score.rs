//! Persisted best score
//!
//! A single integer in LocalStorage, read once at startup and written
//! through whenever the running score first exceeds it. A missing or
//! unparsable stored value reads as 0.

/// Best score across games, monotonically non-decreasing.
#[derive(Debug, Clone, Default)]
pub struct BestScore {
    value: u32,
}

impl BestScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "wasm_2048_best_score";

    /// Start from zero, ignoring any persisted value.
    pub fn new() -> Self {
        Self { value: 0 }
    }

    /// Current best.
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Record a score; persists and returns true if it beats the best.
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.value {
            return false;
        }
        self.value = score;
        self.save();
        true
    }

    /// Load the best score from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(raw)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(value) = raw.parse::<u32>() {
                    log::info!("Loaded best score: {}", value);
                    return Self { value };
                }
            }
        }

        log::info!("No stored best score, starting at 0");
        Self::new()
    }

    /// Save the best score to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let _ = storage.set_item(Self::STORAGE_KEY, &self.value.to_string());
            log::info!("Best score saved: {}", self.value);
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_only_improves() {
        let mut best = BestScore::new();
        assert!(best.record(100));
        assert_eq!(best.value(), 100);
        assert!(!best.record(100));
        assert!(!best.record(40));
        assert_eq!(best.value(), 100);
        assert!(best.record(101));
        assert_eq!(best.value(), 101);
    }
}

//! Game settings and preferences
//!
//! Persisted as one JSON record in the key-value store. Fields missing from
//! the stored record take their defaults; a record that does not parse is
//! replaced by the defaults.

use serde::{Deserialize, Serialize};

use crate::platform::KeyValueStore;

/// Game settings/preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Sound effects
    pub sound_on: bool,
    /// Screen shake on bumper hits
    pub shake_on: bool,
    /// Low-effects mode (cheaper visuals)
    pub low_fx: bool,
    /// Debug overlay
    pub debug_on: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_on: true,
            shake_on: true,
            low_fx: false,
            debug_on: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "pinball-settings";

    /// Effective screen shake (low-effects mode suppresses it)
    pub fn effective_shake(&self) -> bool {
        self.shake_on && !self.low_fx
    }

    /// Load settings from the store
    pub fn load(store: &impl KeyValueStore) -> Self {
        let Some(json) = store.get(Self::STORAGE_KEY) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings
            }
            Err(e) => {
                log::debug!("Stored settings unreadable ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to the store
    pub fn save(&self, store: &mut impl KeyValueStore) {
        if let Ok(json) = serde_json::to_string(self) {
            store.set(Self::STORAGE_KEY, &json);
            log::info!("Settings saved");
        }
    }
}

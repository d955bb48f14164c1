//! High score record
//!
//! A single best-score scalar persisted in the key-value store.

use crate::platform::KeyValueStore;

/// Best score seen across sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "pinball-high-score";

    pub fn new(best: u64) -> Self {
        Self { best }
    }

    /// Raise the record to `score` if it beats it.
    /// Returns true if the record changed
    pub fn record(&mut self, score: u64) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Load from the store; a missing or non-numeric value reads as zero
    pub fn load(store: &impl KeyValueStore) -> Self {
        let best = store
            .get(Self::STORAGE_KEY)
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v > 0.0)
            .map(|v| v as u64)
            .unwrap_or(0);
        log::info!("High score: {}", best);
        Self { best }
    }

    /// Save to the store
    pub fn save(&self, store: &mut impl KeyValueStore) {
        store.set(Self::STORAGE_KEY, &self.best.to_string());
        log::debug!("High score saved ({})", self.best);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    #[test]
    fn test_round_trip() {
        let mut store = MemoryStore::new();
        HighScore::new(12345).save(&mut store);
        assert_eq!(HighScore::load(&store).best, 12345);
    }

    #[test]
    fn test_missing_and_garbage_read_as_zero() {
        let mut store = MemoryStore::new();
        assert_eq!(HighScore::load(&store).best, 0);
        store.set(HighScore::STORAGE_KEY, "lots");
        assert_eq!(HighScore::load(&store).best, 0);
    }

    #[test]
    fn test_record_only_raises() {
        let mut high = HighScore::new(500);
        assert!(!high.record(400));
        assert_eq!(high.best, 500);
        assert!(high.record(900));
        assert_eq!(high.best, 900);
        assert!(!high.record(900));
    }
}

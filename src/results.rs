//! Match outcomes and history
//!
//! Persisted to LocalStorage, keeps the most recent 10 matches plus tallies.

use serde::{Deserialize, Serialize};

use crate::sim::PlayerId;

/// Maximum number of matches to keep
pub const MAX_HISTORY: usize = 10;

/// How a finished match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Winner(PlayerId),
    /// Equal lives at game end, including both running out in the same crash
    Draw,
}

impl MatchOutcome {
    /// The player with strictly more lives wins
    pub fn from_lives(lives: [u32; 2]) -> Self {
        let [blue, red] = lives;
        if blue > red {
            MatchOutcome::Winner(PlayerId::Blue)
        } else if red > blue {
            MatchOutcome::Winner(PlayerId::Red)
        } else {
            MatchOutcome::Draw
        }
    }

    /// Banner text for the end screen
    pub fn message(&self) -> &'static str {
        match self {
            MatchOutcome::Winner(PlayerId::Blue) => "Blue Wins!",
            MatchOutcome::Winner(PlayerId::Red) => "Red Wins!",
            MatchOutcome::Draw => "Draw!",
        }
    }
}

/// A single finished match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub outcome: MatchOutcome,
    /// Level reached
    pub level: u32,
    /// Lives left at the end, Blue then Red
    pub lives: [u32; 2],
    /// Unix timestamp (ms) when finished
    pub timestamp: f64,
}

/// Recent matches and all-time tallies
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MatchHistory {
    /// Newest first
    pub recent: Vec<MatchRecord>,
    pub blue_wins: u32,
    pub red_wins: u32,
    pub draws: u32,
}

impl MatchHistory {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "road_rivals_history";

    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished match
    pub fn record(&mut self, outcome: MatchOutcome, level: u32, lives: [u32; 2], timestamp: f64) {
        match outcome {
            MatchOutcome::Winner(PlayerId::Blue) => self.blue_wins += 1,
            MatchOutcome::Winner(PlayerId::Red) => self.red_wins += 1,
            MatchOutcome::Draw => self.draws += 1,
        }
        self.recent.insert(
            0,
            MatchRecord {
                outcome,
                level,
                lives,
                timestamp,
            },
        );
        self.recent.truncate(MAX_HISTORY);
    }

    pub fn total(&self) -> u32 {
        self.blue_wins + self.red_wins + self.draws
    }

    /// Highest level reached in the kept matches
    pub fn best_level(&self) -> Option<u32> {
        self.recent.iter().map(|r| r.level).max()
    }

    /// One-line summary for the end screen
    pub fn summary(&self) -> String {
        let mut text = format!(
            "Blue {} - Red {} (draws {})",
            self.blue_wins, self.red_wins, self.draws
        );
        if let Some(level) = self.best_level() {
            text.push_str(&format!(", best level {}", level));
        }
        text
    }

    /// Load history from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<MatchHistory>(&json) {
                    Ok(history) => {
                        log::info!("Loaded {} past matches", history.total());
                        return history;
                    }
                    Err(e) => log::warn!("Discarding unreadable match history: {}", e),
                }
            }
        }

        log::info!("No match history found, starting fresh");
        Self::new()
    }

    /// Save history to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Failed to save match history");
                }
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
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
    fn test_outcome_from_lives() {
        assert_eq!(MatchOutcome::from_lives([2, 0]), MatchOutcome::Winner(PlayerId::Blue));
        assert_eq!(MatchOutcome::from_lives([0, 1]), MatchOutcome::Winner(PlayerId::Red));
        assert_eq!(MatchOutcome::from_lives([0, 0]), MatchOutcome::Draw);
        assert_eq!(MatchOutcome::from_lives([2, 2]), MatchOutcome::Draw);
    }

    #[test]
    fn test_history_tallies_and_truncates() {
        let mut history = MatchHistory::new();
        for i in 0..12 {
            let outcome = if i % 3 == 0 {
                MatchOutcome::Draw
            } else {
                MatchOutcome::Winner(PlayerId::Red)
            };
            history.record(outcome, i + 1, [0, 0], i as f64);
        }

        assert_eq!(history.total(), 12);
        assert_eq!(history.draws, 4);
        assert_eq!(history.red_wins, 8);
        assert_eq!(history.recent.len(), MAX_HISTORY);
        // Newest first
        assert_eq!(history.recent[0].level, 12);
        assert_eq!(history.best_level(), Some(12));
        assert_eq!(history.summary(), "Blue 0 - Red 8 (draws 4), best level 12");
        assert_eq!(MatchHistory::new().summary(), "Blue 0 - Red 0 (draws 0)");
    }

    #[test]
    fn test_history_json_roundtrip() {
        let mut history = MatchHistory::new();
        history.record(MatchOutcome::Winner(PlayerId::Blue), 3, [1, 0], 1000.0);
        let json = serde_json::to_string(&history).unwrap();
        let back: MatchHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(back.blue_wins, 1);
        assert_eq!(back.recent[0].outcome, MatchOutcome::Winner(PlayerId::Blue));
    }
}

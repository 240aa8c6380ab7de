//! Keyboard state and bindings
//!
//! Key events land in `KeyState` whenever the browser fires them; the game
//! loop turns the held keys into a `TickInput` once per tick.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::sim::{Controls, PlayerId, TickInput};

/// Keys currently held down, by lower-cased key name
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<String>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: &str) {
        self.held.insert(key.to_lowercase());
    }

    pub fn release(&mut self, key: &str) {
        self.held.remove(&key.to_lowercase());
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(&key.to_lowercase())
    }

    /// Drop everything (window lost focus, keyup events will never arrive)
    pub fn clear(&mut self) {
        self.held.clear();
    }
}

/// Four direction keys for one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionKeys {
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
}

impl DirectionKeys {
    pub fn new(up: &str, down: &str, left: &str, right: &str) -> Self {
        Self {
            up: up.to_lowercase(),
            down: down.to_lowercase(),
            left: left.to_lowercase(),
            right: right.to_lowercase(),
        }
    }

    fn read(&self, keys: &KeyState) -> Controls {
        Controls {
            up: keys.is_held(&self.up),
            down: keys.is_held(&self.down),
            left: keys.is_held(&self.left),
            right: keys.is_held(&self.right),
        }
    }

    fn contains(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        [&self.up, &self.down, &self.left, &self.right]
            .into_iter()
            .any(|k| *k == key)
    }
}

/// Key layout for both players
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    /// Blue then Red
    pub players: [DirectionKeys; 2],
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            players: [
                DirectionKeys::new("w", "s", "a", "d"),
                DirectionKeys::new("ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight"),
            ],
        }
    }
}

impl KeyBindings {
    /// Input for the next tick from the currently held keys
    pub fn snapshot(&self, keys: &KeyState) -> TickInput {
        TickInput {
            players: PlayerId::ALL.map(|id| self.players[id.index()].read(keys)),
        }
    }

    /// True if the key drives a car (the host suppresses page scrolling for these)
    pub fn is_bound(&self, key: &str) -> bool {
        self.players.iter().any(|p| p.contains(key))
    }
}

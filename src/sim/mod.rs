//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick, distances in pixels per tick
//! - Seeded RNG only
//! - Stable iteration order (Blue before Red, traffic in spawn order)
//! - No rendering or platform dependencies

pub mod config;
pub mod geometry;
pub mod state;
pub mod tick;

pub use config::{LaneAlign, SimConfig, Variant};
pub use geometry::{LaneGeometry, Rect};
pub use state::{CrashCause, GameEvent, GamePhase, GameState, Player, PlayerId, TrafficCar};
pub use tick::{Controls, TickInput, reset_round, resize, restart, restart_with_config, tick};

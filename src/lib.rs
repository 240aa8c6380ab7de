//! Road Rivals - a two-player lane racing game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, traffic, collisions, levels)
//! - `input`: Held-key tracking and per-player key bindings
//! - `results`: Match outcome and persisted history
//! - `settings`: Player preferences
//! - `audio`: Sound effects for simulation events

pub mod audio;
pub mod input;
pub mod results;
pub mod settings;
pub mod sim;

pub use input::{KeyBindings, KeyState};
pub use results::{MatchHistory, MatchOutcome};
pub use settings::Settings;

/// Host loop constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the rate the per-tick constants are tuned for)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest frame gap fed to the accumulator (tab switches, breakpoints)
    pub const MAX_FRAME_DT: f32 = 0.1;
}

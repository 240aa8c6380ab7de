//! Tunable simulation constants
//!
//! Every variant of the game is the same simulator with a different
//! `SimConfig`. Presets live in `Variant`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How a traffic car is placed horizontally inside its lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LaneAlign {
    /// Left edge of the entity on the lane's left edge
    #[default]
    LeftEdge,
    /// Entity centered in the lane
    Center,
}

/// Named configuration presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Variant {
    #[default]
    Classic,
    Remix,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Classic, Variant::Remix];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "Classic",
            Variant::Remix => "Remix",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Variant::Classic),
            "remix" => Some(Variant::Remix),
            _ => None,
        }
    }

    /// Following preset, wrapping around
    pub fn next(&self) -> Self {
        match self {
            Variant::Classic => Variant::Remix,
            Variant::Remix => Variant::Classic,
        }
    }

    /// Configuration for this preset
    pub fn config(&self) -> SimConfig {
        match self {
            Variant::Classic => SimConfig::default(),
            Variant::Remix => SimConfig {
                player_size: Vec2::new(60.0, 100.0),
                traffic_size: Vec2::new(60.0, 100.0),
                traffic_align: LaneAlign::Center,
                spawn_offset: 180.0,
                base_speed: 5.0,
                speed_increment: 1.5,
                traffic_growth: 2,
                initial_spread: 3000.0,
                ..SimConfig::default()
            },
        }
    }
}

/// All constants the simulator reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Number of lanes on the track
    pub lane_count: u32,
    /// Fraction of the viewport width taken by the road
    pub track_width_fraction: f32,
    pub player_size: Vec2,
    pub traffic_size: Vec2,
    /// Traffic placement within its lane; players always spawn lane-centered
    pub traffic_align: LaneAlign,
    /// Pixels moved per tick per held direction
    pub player_step: f32,
    /// Player spawn y is this far above the viewport bottom
    pub spawn_offset: f32,
    /// Scroll speed at level 1 (pixels per tick)
    pub base_speed: f32,
    /// Added to speed on each level up
    pub speed_increment: f32,
    /// Traffic moves at speed + bias so it always closes on the players
    pub traffic_speed_bias: f32,
    pub base_traffic_count: u32,
    /// Extra traffic cars per level
    pub traffic_growth: u32,
    /// Fresh traffic spawns with y in [-initial_spread, 0)
    pub initial_spread: f32,
    /// Respawned traffic lands at y in (-respawn_depth - respawn_margin, -respawn_margin]
    pub respawn_depth: f32,
    pub respawn_margin: f32,
    /// Scroll-adjusted y both players must get below to advance a level
    pub finish_threshold: f32,
    /// Horizontal push applied to each player when they touch
    pub bump_offset: f32,
    pub starting_lives: u32,
    /// Number of distinct traffic sprites the renderer can pick from
    pub traffic_skins: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            lane_count: 4,
            track_width_fraction: 1.0 / 2.5,
            player_size: Vec2::new(50.0, 90.0),
            traffic_size: Vec2::new(50.0, 90.0),
            traffic_align: LaneAlign::LeftEdge,
            player_step: 8.0,
            spawn_offset: 150.0,
            base_speed: 6.0,
            speed_increment: 2.0,
            traffic_speed_bias: 3.0,
            base_traffic_count: 5,
            traffic_growth: 1,
            initial_spread: 2000.0,
            respawn_depth: 2000.0,
            respawn_margin: 200.0,
            finish_threshold: -4000.0,
            bump_offset: 20.0,
            starting_lives: 3,
            traffic_skins: 2,
        }
    }
}

impl SimConfig {
    /// Minimum lanes: players spawn in lanes 1 and 2
    pub const MIN_LANES: u32 = 3;

    /// Traffic car count for a level
    pub fn traffic_count(&self, level: u32) -> usize {
        (self.base_traffic_count + level * self.traffic_growth) as usize
    }

    /// Clamp values the simulator cannot work with, logging each correction
    pub fn sanitized(mut self) -> Self {
        if self.lane_count < Self::MIN_LANES {
            log::warn!("lane_count {} too small, using {}", self.lane_count, Self::MIN_LANES);
            self.lane_count = Self::MIN_LANES;
        }
        if !(self.track_width_fraction > 0.0 && self.track_width_fraction <= 1.0) {
            log::warn!("track_width_fraction {} out of range, using 0.4", self.track_width_fraction);
            self.track_width_fraction = 0.4;
        }
        if self.player_size.min_element() <= 0.0 {
            log::warn!("player_size {:?} invalid, using default", self.player_size);
            self.player_size = SimConfig::default().player_size;
        }
        if self.traffic_size.min_element() <= 0.0 {
            log::warn!("traffic_size {:?} invalid, using default", self.traffic_size);
            self.traffic_size = SimConfig::default().traffic_size;
        }
        if self.base_speed <= 0.0 {
            log::warn!("base_speed {} must be positive, using default", self.base_speed);
            self.base_speed = SimConfig::default().base_speed;
        }
        if self.speed_increment <= 0.0 {
            log::warn!("speed_increment {} must be positive, using default", self.speed_increment);
            self.speed_increment = SimConfig::default().speed_increment;
        }
        if self.starting_lives == 0 {
            log::warn!("starting_lives must be at least 1");
            self.starting_lives = 1;
        }
        self.traffic_skins = self.traffic_skins.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_parse() {
        assert_eq!(Variant::from_str("REMIX"), Some(Variant::Remix));
        assert_eq!(Variant::from_str("classic"), Some(Variant::Classic));
        assert_eq!(Variant::from_str("turbo"), None);
        for v in Variant::ALL {
            assert_eq!(Variant::from_str(v.as_str()), Some(v));
        }
    }

    #[test]
    fn test_variant_next_cycles() {
        assert_eq!(Variant::Classic.next(), Variant::Remix);
        assert_eq!(Variant::Remix.next().next(), Variant::Remix);
    }

    #[test]
    fn test_traffic_count_formula() {
        let classic = Variant::Classic.config();
        assert_eq!(classic.traffic_count(1), 6);
        assert_eq!(classic.traffic_count(4), 9);

        let remix = Variant::Remix.config();
        assert_eq!(remix.traffic_count(1), 7);
        assert_eq!(remix.traffic_count(3), 11);
    }

    #[test]
    fn test_sanitized_clamps() {
        let config = SimConfig {
            lane_count: 1,
            base_speed: -3.0,
            starting_lives: 0,
            traffic_skins: 0,
            ..SimConfig::default()
        }
        .sanitized();

        assert_eq!(config.lane_count, SimConfig::MIN_LANES);
        assert_eq!(config.base_speed, 6.0);
        assert_eq!(config.starting_lives, 1);
        assert_eq!(config.traffic_skins, 1);
    }

    #[test]
    fn test_presets_are_already_sane() {
        for v in Variant::ALL {
            assert_eq!(v.config(), v.config().sanitized());
        }
    }
}

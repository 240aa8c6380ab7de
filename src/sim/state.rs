//! Game state and core simulation types
//!
//! Everything the tick reads or writes lives in `GameState`, which the host
//! owns and hands to `tick` each frame.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::config::{LaneAlign, SimConfig};
use super::geometry::{LaneGeometry, Rect};
use crate::results::MatchOutcome;

/// Current phase of the round sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Rounds are being played
    Running,
    /// A player ran out of lives; only a restart leaves this phase
    GameOver,
}

/// The two racers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    Blue,
    Red,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::Blue, PlayerId::Red];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            PlayerId::Blue => 0,
            PlayerId::Red => 1,
        }
    }

    /// Lane the player spawns in
    #[inline]
    pub fn spawn_lane(self) -> u32 {
        match self {
            PlayerId::Blue => 1,
            PlayerId::Red => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlayerId::Blue => "Blue",
            PlayerId::Red => "Red",
        }
    }
}

/// A player's car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub rect: Rect,
}

/// A traffic car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficCar {
    pub id: u32,
    /// Lane index in [0, lane_count)
    pub lane: u32,
    pub rect: Rect,
    /// Sprite index, meaningless to the simulation
    pub skin: u8,
}

/// Why a player lost a life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrashCause {
    /// Hit a traffic car
    Traffic { car_id: u32 },
    /// Left the road or fell off the bottom of the screen
    OffRoad,
}

/// Events emitted by a tick for the host to present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    LifeLost { player: PlayerId, cause: CrashCause },
    /// Players touched and were pushed apart
    PlayersBumped,
    /// Players back at spawn, traffic regenerated
    RoundReset,
    LevelUp { level: u32, speed: f32 },
    /// Current scoreboard, sent after every change to level or lives
    ScoreChanged { level: u32, lives: [u32; 2] },
    GameOver { outcome: MatchOutcome },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub config: SimConfig,
    pub geometry: LaneGeometry,
    pub level: u32,
    /// Scroll speed in pixels per tick
    pub speed: f32,
    /// Remaining lives, indexed by `PlayerId::index`
    pub lives: [u32; 2],
    pub phase: GamePhase,
    /// Background offset, wraps at viewport height
    pub scroll: f32,
    /// Road travelled this round, never wraps
    pub distance: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Blue then Red
    pub players: [Player; 2],
    pub traffic: Vec<TrafficCar>,
    /// Next traffic car ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, config: SimConfig, width: f32, height: f32) -> Self {
        let config = config.sanitized();
        let geometry = LaneGeometry::new(width, height, &config);
        let players = PlayerId::ALL.map(|id| Player {
            id,
            rect: Rect::new(Vec2::ZERO, config.player_size),
        });
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            level: 1,
            speed: config.base_speed,
            lives: [config.starting_lives; 2],
            phase: GamePhase::Running,
            scroll: 0.0,
            distance: 0.0,
            time_ticks: 0,
            players,
            traffic: Vec::new(),
            next_id: 1,
            config,
            geometry,
        };
        state.place_players();
        state.generate_traffic();
        state
    }

    pub fn is_finished(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.index()]
    }

    pub fn lives_of(&self, id: PlayerId) -> u32 {
        self.lives[id.index()]
    }

    /// Screen y of the finish line for the current scroll position
    pub fn finish_line_y(&self) -> f32 {
        self.config.finish_threshold + self.distance
    }

    /// Spawn position for a player, centered in its spawn lane
    pub fn spawn_position(&self, id: PlayerId) -> Vec2 {
        let x = self
            .geometry
            .lane_x(id.spawn_lane(), self.config.player_size.x, LaneAlign::Center);
        let y = self.geometry.height() - self.config.spawn_offset;
        Vec2::new(x, y)
    }

    /// Put both players back at their spawn coordinates
    pub fn place_players(&mut self) {
        for id in PlayerId::ALL {
            let pos = self.spawn_position(id);
            self.player_mut(id).rect.pos = pos;
        }
    }

    /// Replace the traffic set with a fresh one sized for the current level
    pub fn generate_traffic(&mut self) {
        let count = self.config.traffic_count(self.level);
        self.traffic.clear();
        for _ in 0..count {
            let y = -self.rng.random::<f32>() * self.config.initial_spread;
            let car = self.spawn_traffic_car(y);
            self.traffic.push(car);
        }
    }

    fn spawn_traffic_car(&mut self, y: f32) -> TrafficCar {
        let lane = self.rng.random_range(0..self.geometry.lane_count);
        let skin = self.rng.random_range(0..self.config.traffic_skins.max(1));
        let x = self
            .geometry
            .lane_x(lane, self.config.traffic_size.x, self.config.traffic_align);
        let id = self.next_id;
        self.next_id += 1;
        TrafficCar {
            id,
            lane,
            rect: Rect::new(Vec2::new(x, y), self.config.traffic_size),
            skin,
        }
    }

    /// Send a car that scrolled past the bottom back above the screen in a new lane
    pub fn respawn_traffic(&mut self, index: usize) {
        let depth = self.rng.random::<f32>() * self.config.respawn_depth;
        let lane = self.rng.random_range(0..self.geometry.lane_count);
        let skin = self.rng.random_range(0..self.config.traffic_skins.max(1));
        let x = self
            .geometry
            .lane_x(lane, self.config.traffic_size.x, self.config.traffic_align);
        let car = &mut self.traffic[index];
        car.lane = lane;
        car.skin = skin;
        car.rect.pos = Vec2::new(x, -depth - self.config.respawn_margin);
    }

    /// Recompute lane geometry after a viewport change and re-derive positions
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.geometry = LaneGeometry::new(width, height, &self.config);
        if self.scroll >= height {
            self.scroll = 0.0;
        }
        self.place_players();
        let (size, align) = (self.config.traffic_size.x, self.config.traffic_align);
        for car in &mut self.traffic {
            car.rect.pos.x = self.geometry.lane_x(car.lane, size, align);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::config::Variant;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(7, SimConfig::default(), 800.0, 600.0);
        assert_eq!(state.level, 1);
        assert_eq!(state.speed, 6.0);
        assert_eq!(state.lives, [3, 3]);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.traffic.len(), 6);
        assert_eq!(state.player(PlayerId::Blue).rect.pos, Vec2::new(335.0, 450.0));
        assert_eq!(state.player(PlayerId::Red).rect.pos, Vec2::new(415.0, 450.0));
    }

    #[test]
    fn test_traffic_spawns_above_screen_in_lanes() {
        let state = GameState::new(42, Variant::Remix.config(), 1000.0, 700.0);
        for car in &state.traffic {
            assert!(car.lane < state.geometry.lane_count);
            assert!(car.rect.pos.y <= 0.0 && car.rect.pos.y > -3000.0);
            let expected = state.geometry.lane_x(car.lane, car.rect.size.x, state.config.traffic_align);
            assert_eq!(car.rect.pos.x, expected);
            assert!(car.skin < state.config.traffic_skins);
        }
    }

    #[test]
    fn test_players_spawn_lane_centered() {
        for variant in Variant::ALL {
            let state = GameState::new(5, variant.config(), 1200.0, 900.0);
            let geo = state.geometry;
            for id in PlayerId::ALL {
                let lane = id.spawn_lane() as f32;
                let expected_x = geo.road_x + geo.lane_width * lane + geo.lane_width / 2.0
                    - state.config.player_size.x / 2.0;
                let expected_y = 900.0 - state.config.spawn_offset;
                assert_eq!(state.player(id).rect.pos, Vec2::new(expected_x, expected_y));
            }
        }
    }

    #[test]
    fn test_new_sanitizes_config() {
        let config = SimConfig {
            lane_count: 2,
            ..SimConfig::default()
        };
        let mut state = GameState::new(5, config, 800.0, 600.0);
        assert_eq!(state.geometry.lane_count, SimConfig::MIN_LANES);
        for id in PlayerId::ALL {
            let rect = state.player(id).rect;
            assert!(!state.geometry.out_of_bounds(&rect));
        }

        // No off-road crash on an idle first tick
        let events = crate::sim::tick(&mut state, &crate::sim::TickInput::default());
        assert!(!events.iter().any(|e| matches!(e, GameEvent::LifeLost { .. })));
        assert_eq!(state.lives, [3, 3]);
    }

    #[test]
    fn test_respawn_lands_above_margin() {
        let mut state = GameState::new(3, SimConfig::default(), 800.0, 600.0);
        for _ in 0..50 {
            state.respawn_traffic(0);
            let car = &state.traffic[0];
            assert!(car.rect.pos.y <= -200.0);
            assert!(car.rect.pos.y > -2200.0);
            assert!(car.lane < 4);
        }
    }

    #[test]
    fn test_set_viewport_rederives_positions() {
        let mut state = GameState::new(9, SimConfig::default(), 800.0, 600.0);
        state.player_mut(PlayerId::Blue).rect.pos = Vec2::new(0.0, 0.0);
        state.scroll = 550.0;

        state.set_viewport(1000.0, 500.0);

        assert_eq!(state.geometry.road_x, 300.0);
        assert_eq!(state.scroll, 0.0);
        assert_eq!(state.player(PlayerId::Blue).rect.pos, state.spawn_position(PlayerId::Blue));
        for car in &state.traffic {
            assert_eq!(car.rect.pos.x, 300.0 + 100.0 * car.lane as f32);
        }
    }
}

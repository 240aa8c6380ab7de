//! Per-frame simulation step
//!
//! Order within a tick matters for reproducibility:
//! scroll, player movement, traffic, collisions, road bounds, level check.

use super::config::SimConfig;
use super::geometry::Rect;
use super::state::{CrashCause, GameEvent, GamePhase, GameState, PlayerId};
use crate::results::MatchOutcome;

/// Directions held by one player this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Input snapshot for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Blue then Red
    pub players: [Controls; 2],
}

impl TickInput {
    pub fn for_player(&self, id: PlayerId) -> Controls {
        self.players[id.index()]
    }
}

/// Advance the game state by one tick, returning what happened
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase == GamePhase::GameOver {
        return events;
    }

    state.time_ticks += 1;

    // Background scroll (cosmetic) and round distance
    state.scroll += state.speed;
    if state.scroll >= state.geometry.height() {
        state.scroll = 0.0;
    }
    state.distance += state.speed;

    let step = state.config.player_step;
    for id in PlayerId::ALL {
        let controls = input.for_player(id);
        let pos = &mut state.player_mut(id).rect.pos;
        if controls.up {
            pos.y -= step;
        }
        if controls.down {
            pos.y += step;
        }
        if controls.left {
            pos.x -= step;
        }
        if controls.right {
            pos.x += step;
        }
    }

    let traffic_speed = state.speed + state.config.traffic_speed_bias;
    let height = state.geometry.height();
    for i in 0..state.traffic.len() {
        state.traffic[i].rect.pos.y += traffic_speed;
        if state.traffic[i].rect.pos.y > height {
            state.respawn_traffic(i);
        }
    }

    if let Some((player, car_id)) = find_traffic_hit(state) {
        crash(state, player, CrashCause::Traffic { car_id }, &mut events);
        return events;
    }

    let [blue, red] = &mut state.players;
    if blue.rect.overlaps(&red.rect) {
        bump_apart(&mut blue.rect, &mut red.rect, state.config.bump_offset);
        events.push(GameEvent::PlayersBumped);
    }

    for id in PlayerId::ALL {
        if state.geometry.out_of_bounds(&state.player(id).rect) {
            crash(state, id, CrashCause::OffRoad, &mut events);
            return events;
        }
    }

    if crossed_finish(state) {
        level_up(state, &mut events);
    }

    events
}

/// First player/traffic overlap, Blue checked before Red
fn find_traffic_hit(state: &GameState) -> Option<(PlayerId, u32)> {
    PlayerId::ALL.into_iter().find_map(|id| {
        let rect = &state.player(id).rect;
        state
            .traffic
            .iter()
            .find(|car| rect.overlaps(&car.rect))
            .map(|car| (id, car.id))
    })
}

/// Push two touching cars apart along x; the one further left moves left
fn bump_apart(blue: &mut Rect, red: &mut Rect, offset: f32) {
    let (left, right) = if blue.pos.x <= red.pos.x {
        (blue, red)
    } else {
        (red, blue)
    };
    left.pos.x -= offset;
    right.pos.x += offset;
}

/// Both players are past the finish line in this tick
fn crossed_finish(state: &GameState) -> bool {
    let threshold = state.config.finish_threshold;
    state
        .players
        .iter()
        .all(|p| p.rect.pos.y - state.distance < threshold)
}

fn crash(state: &mut GameState, player: PlayerId, cause: CrashCause, events: &mut Vec<GameEvent>) {
    let lives = &mut state.lives[player.index()];
    *lives = lives.saturating_sub(1);
    log::debug!(
        "{} crashed ({:?}) on tick {}, {} lives left",
        player.as_str(),
        cause,
        state.time_ticks,
        *lives
    );
    events.push(GameEvent::LifeLost { player, cause });
    events.push(score_event(state));
    reset_round(state, events);
}

fn level_up(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.level += 1;
    state.speed += state.config.speed_increment;
    log::info!("Level {} reached, speed {}", state.level, state.speed);
    events.push(GameEvent::LevelUp {
        level: state.level,
        speed: state.speed,
    });
    events.push(score_event(state));
    reset_round(state, events);
}

/// Players back to spawn, traffic regenerated; ends the game if anyone is out of lives
pub fn reset_round(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.place_players();
    state.generate_traffic();
    state.distance = 0.0;
    events.push(GameEvent::RoundReset);

    if state.lives.contains(&0) {
        let outcome = MatchOutcome::from_lives(state.lives);
        state.phase = GamePhase::GameOver;
        log::info!(
            "Game over at level {}: {} (lives {:?})",
            state.level,
            outcome.message(),
            state.lives
        );
        events.push(GameEvent::GameOver { outcome });
    }
}

/// Back to level 1 with full lives and base speed
pub fn restart(state: &mut GameState, seed: u64) -> Vec<GameEvent> {
    let config = state.config.clone();
    restart_with_config(state, seed, config)
}

/// Restart under a different rule set, keeping the viewport
pub fn restart_with_config(
    state: &mut GameState,
    seed: u64,
    config: SimConfig,
) -> Vec<GameEvent> {
    let geometry = state.geometry;
    *state = GameState::new(seed, config, geometry.width(), geometry.height());
    log::info!("Game restarted with seed: {}", seed);
    vec![score_event(state)]
}

/// Apply a viewport change between ticks
pub fn resize(state: &mut GameState, width: f32, height: f32) {
    state.set_viewport(width, height);
    log::debug!(
        "Viewport {}x{}, road at x={} width {}",
        width,
        height,
        state.geometry.road_x,
        state.geometry.road_width
    );
}

fn score_event(state: &GameState) -> GameEvent {
    GameEvent::ScoreChanged {
        level: state.level,
        lives: state.lives,
    }
}

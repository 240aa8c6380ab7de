//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! The simulation never plays sounds itself; the host maps each
//! `GameEvent` to a `SoundEffect`.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Car hit traffic or left the road
    Crash,
    /// Players rubbed against each other
    Bump,
    /// Both players crossed the finish line
    LevelUp,
    /// Match over
    GameOver,
}

impl SoundEffect {
    /// Sound for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::LifeLost { .. } => Some(SoundEffect::Crash),
            GameEvent::PlayersBumped => Some(SoundEffect::Bump),
            GameEvent::LevelUp { .. } => Some(SoundEffect::LevelUp),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::RoundReset | GameEvent::ScoreChanged { .. } => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;

    /// Level of the background drone relative to the music volume
    const DRONE_LEVEL: f32 = 0.15;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
        music_volume: f32,
        /// Looping background drone, created on the first user gesture
        music: Option<(OscillatorNode, GainNode)>,
        /// Set while the window is blurred and mute-on-blur is on
        suspended: bool,
    }

    impl AudioManager {
        pub fn new(volume: f32, music_volume: f32) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: volume.clamp(0.0, 1.0),
                music_volume: music_volume.clamp(0.0, 1.0),
                music: None,
                suspended: false,
            }
        }

        pub fn set_suspended(&mut self, suspended: bool) {
            self.suspended = suspended;
            self.apply_music_gain();
        }

        /// Start the background drone if it is not already running
        pub fn start_music(&mut self) {
            if self.music.is_some() || self.music_volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            // Low fifth, slightly detuned so it beats slowly
            let Some((root, gain)) = self.create_osc(ctx, 55.0, OscillatorType::Triangle) else {
                return;
            };
            let Some(fifth) = ctx.create_oscillator().ok() else {
                return;
            };
            fifth.set_type(OscillatorType::Sine);
            fifth.frequency().set_value(82.8);
            fifth.connect_with_audio_node(&gain).ok();

            gain.gain().set_value(0.0);
            root.start().ok();
            fifth.start().ok();
            self.music = Some((root, gain));
            self.apply_music_gain();
            log::info!("Background music started");
        }

        fn apply_music_gain(&self) {
            let (Some(ctx), Some((_, gain))) = (&self.ctx, &self.music) else {
                return;
            };
            let target = if self.suspended {
                0.0
            } else {
                self.music_volume * DRONE_LEVEL
            };
            gain.gain()
                .set_target_at_time(target, ctx.current_time(), 0.2)
                .ok();
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            if self.suspended || self.volume <= 0.0 {
                return;
            }
            let vol = self.volume;

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Crash => self.play_crash(ctx, vol),
                SoundEffect::Bump => self.play_bump(ctx, vol),
                SoundEffect::LevelUp => self.play_level_up(ctx, vol),
                SoundEffect::GameOver => self.play_game_over(ctx, vol),
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Crash - falling sawtooth crunch
        fn play_crash(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                .ok();
            osc.frequency().set_value_at_time(220.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(40.0, t + 0.35)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.4).ok();
        }

        /// Bump - short low thud
        fn play_bump(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Level up - rising arpeggio
        fn play_level_up(&self, ctx: &AudioContext, vol: f32) {
            let t0 = ctx.current_time();
            for (i, freq) in [523.25_f32, 659.25, 783.99, 1046.5].into_iter().enumerate() {
                let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Triangle) else {
                    return;
                };
                let t = t0 + i as f64 * 0.08;
                gain.gain().set_value_at_time(0.0, t0).ok();
                gain.gain().set_value_at_time(vol * 0.35, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.25).ok();
            }
        }

        /// Game over - slow descending tones
        fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
            let t0 = ctx.current_time();
            for (i, freq) in [392.0_f32, 311.13, 261.63].into_iter().enumerate() {
                let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Square) else {
                    return;
                };
                let t = t0 + i as f64 * 0.3;
                gain.gain().set_value_at_time(0.0, t0).ok();
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.28)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.3).ok();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::MatchOutcome;
    use crate::sim::{CrashCause, PlayerId};

    #[test]
    fn test_event_sounds() {
        let crash = GameEvent::LifeLost {
            player: PlayerId::Red,
            cause: CrashCause::OffRoad,
        };
        assert_eq!(SoundEffect::for_event(&crash), Some(SoundEffect::Crash));
        assert_eq!(
            SoundEffect::for_event(&GameEvent::GameOver {
                outcome: MatchOutcome::Draw
            }),
            Some(SoundEffect::GameOver)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::RoundReset), None);
        assert_eq!(
            SoundEffect::for_event(&GameEvent::ScoreChanged {
                level: 1,
                lives: [3, 3]
            }),
            None
        );
    }
}

//! Session state for the crossing game
//!
//! The single owned record of life, score and difficulty for a session.
//! Only the world mutates it, on the simulation thread.

use super::collaborators::OutcomeKey;
use super::difficulty::DifficultyTier;
use super::pedestrian::PedestrianKind;

/// Session-wide progress and round flags
#[derive(Debug, Clone)]
pub struct SessionState {
    pub tier: DifficultyTier,

    /// Pedestrians the current round may still spawn. A spawn budget, not a
    /// live count: removing a live pedestrian never touches it.
    pub pedestrians_to_spawn: u32,

    pub life: i32,
    pub score: u32,
    pub high_score: u32,

    pub round_active: bool,
    pub input_blocked: bool,
    /// Guards against triggering difficulty-up twice in a round
    pub escalating: bool,
    pub game_over: bool,
    /// Banner picked when the game ended
    pub outcome: Option<OutcomeKey>,

    pub pedestrians_spawned: usize,
    pub pedestrians_crossed: usize,
    pub pedestrians_hit: usize,
    pub vehicles_spawned: usize,
    pub vehicle_spawns_skipped: usize,

    /// Session time in seconds, pauses included
    pub time: f32,
}

impl SessionState {
    pub fn new(tier: DifficultyTier, high_score: u32) -> Self {
        Self {
            tier,
            pedestrians_to_spawn: 0,
            life: 0,
            score: 0,
            high_score,
            round_active: false,
            input_blocked: true,
            escalating: false,
            game_over: false,
            outcome: None,
            pedestrians_spawned: 0,
            pedestrians_crossed: 0,
            pedestrians_hit: 0,
            vehicles_spawned: 0,
            vehicle_spawns_skipped: 0,
            time: 0.0,
        }
    }

    /// Change life by `delta`, refusing changes that would go below zero
    pub fn update_life(&mut self, delta: i32) -> bool {
        if self.life + delta < 0 {
            return false;
        }
        self.life += delta;
        true
    }

    /// Add score unless the game is already over
    pub fn add_score(&mut self, amount: u32) -> bool {
        if self.game_over {
            return false;
        }
        self.score += amount;
        true
    }

    /// Points for an unhit crossing of `kind` at the current tier
    pub fn crossing_points(&self, kind: PedestrianKind) -> u32 {
        kind.profile().score * self.tier.score_multiplier()
    }

    pub fn is_new_record(&self) -> bool {
        self.score > self.high_score
    }

    pub fn update(&mut self, delta_secs: f32) {
        self.time += delta_secs;
    }

    /// Get a summary string for display
    pub fn summary(&self) -> String {
        format!(
            "Tier: {} | Life: {} | Score: {} (best {}) | To spawn: {} | Time: {:.1}s",
            self.tier.index(),
            self.life,
            self.score,
            self.high_score,
            self.pedestrians_to_spawn,
            self.time
        )
    }
}

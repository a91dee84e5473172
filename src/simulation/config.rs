//! Simulation configuration

use super::difficulty::{DifficultyTable, DifficultyTier};
use super::error::ConfigError;
use super::spawner::{pedestrian_pool, VehicleRoster};

/// Seconds HUD messages (get ready, difficulty up, new record) stay up
pub const MESSAGE_DURATION: f32 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub difficulty: DifficultyTable,
    pub message_duration: f32,
    /// Add the next tier's life bonus to the remaining life on difficulty-up
    /// instead of resetting life to it
    pub carry_life_on_escalation: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            difficulty: DifficultyTable::default(),
            message_duration: MESSAGE_DURATION,
            carry_life_on_escalation: true,
        }
    }
}

impl SimConfig {
    /// Check every tier can drive a full round
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.difficulty.validate()?;

        if self.message_duration < 0.0 || self.message_duration.is_nan() {
            return Err(ConfigError::NegativeValue {
                table: "message_duration",
                tier: 0,
                value: self.message_duration,
            });
        }

        for index in 0..self.difficulty.tier_count() {
            let tier = self.difficulty.tier(index)?;
            if pedestrian_pool(tier).is_empty() {
                return Err(ConfigError::EmptyPedestrianSet { tier: index });
            }
            VehicleRoster::for_tier(&self.difficulty, tier)?;
        }
        Ok(())
    }

    /// Validate the configuration and resolve a starting tier
    pub fn resolve_tier(&self, index: usize) -> Result<DifficultyTier, ConfigError> {
        self.validate()?;
        self.difficulty.tier(index)
    }
}

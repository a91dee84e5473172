//! Difficulty tiers and their per-tier parameter tables

use super::error::ConfigError;

/// Tier from which Grandma and Grandpa join the spawn pool
pub const ELDERLY_UNLOCK_TIER: usize = 2;

/// Tier from which the sports car joins the vehicle pool
pub const SPORTSCAR_UNLOCK_TIER: usize = 2;

/// Ordinal difficulty level. Only constructible for tiers the table covers,
/// so indexing the table with it cannot go out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DifficultyTier(usize);

impl DifficultyTier {
    /// The lowest tier, present in every valid table
    pub const BASE: DifficultyTier = DifficultyTier(0);

    pub fn index(self) -> usize {
        self.0
    }

    /// Score multiplier applied to crossings at this tier
    pub fn score_multiplier(self) -> u32 {
        self.0 as u32 + 1
    }
}

/// Signal durations for one tier, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SignalTimings {
    pub car_green: f32,
    pub transition: f32,
    pub pedestrian_green: f32,
    pub blink_warning: f32,
}

impl SignalTimings {
    /// Seconds of solid pedestrian green before the blink warning starts
    pub fn green_then_blink_split(&self) -> f32 {
        self.pedestrian_green - self.blink_warning
    }

    pub fn cycle_length(&self) -> f32 {
        self.car_green + self.pedestrian_green + 2.0 * self.transition
    }
}

/// Parallel per-tier tables. All tables must have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyTable {
    pub pedestrian_spawn_interval: Vec<f32>,
    pub vehicle_spawn_interval: Vec<f32>,
    pub pedestrian_quota: Vec<u32>,
    pub car_green: Vec<f32>,
    pub light_transition: Vec<f32>,
    pub pedestrian_green: Vec<f32>,
    pub blink_warning: Vec<f32>,
    pub life_bonus: Vec<i32>,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            pedestrian_spawn_interval: vec![4.0, 3.0, 2.0, 1.0, 0.5, 0.2],
            vehicle_spawn_interval: vec![6.0, 5.0, 4.0, 3.0, 2.0, 1.0],
            pedestrian_quota: vec![10, 20, 30, 50, 80, 666],
            car_green: vec![3.0, 5.0, 7.0, 8.0, 9.0, 10.0],
            light_transition: vec![4.0, 3.0, 2.0, 2.0, 2.0, 0.0],
            pedestrian_green: vec![10.0, 7.0, 6.0, 5.0, 4.0, 0.0],
            blink_warning: vec![3.0, 3.0, 3.0, 2.0, 1.0, 0.0],
            life_bonus: vec![5, 5, 5, 5, 5, 0],
        }
    }
}

impl DifficultyTable {
    pub fn tier_count(&self) -> usize {
        self.pedestrian_spawn_interval.len()
    }

    pub fn max_tier(&self) -> DifficultyTier {
        DifficultyTier(self.tier_count().saturating_sub(1))
    }

    /// Look up a tier, rejecting indices the tables do not cover
    pub fn tier(&self, index: usize) -> Result<DifficultyTier, ConfigError> {
        if index >= self.tier_count() {
            return Err(ConfigError::TierOutOfRange {
                tier: index,
                tiers: self.tier_count(),
            });
        }
        Ok(DifficultyTier(index))
    }

    /// Tier after `tier`, or None at the top
    pub fn next_tier(&self, tier: DifficultyTier) -> Option<DifficultyTier> {
        self.tier(tier.0 + 1).ok()
    }

    pub fn is_max(&self, tier: DifficultyTier) -> bool {
        tier >= self.max_tier()
    }

    pub fn pedestrian_spawn_interval(&self, tier: DifficultyTier) -> f32 {
        self.pedestrian_spawn_interval[tier.0]
    }

    pub fn vehicle_spawn_interval(&self, tier: DifficultyTier) -> f32 {
        self.vehicle_spawn_interval[tier.0]
    }

    pub fn pedestrian_quota(&self, tier: DifficultyTier) -> u32 {
        self.pedestrian_quota[tier.0]
    }

    pub fn life_bonus(&self, tier: DifficultyTier) -> i32 {
        self.life_bonus[tier.0]
    }

    pub fn signal_timings(&self, tier: DifficultyTier) -> SignalTimings {
        SignalTimings {
            car_green: self.car_green[tier.0],
            transition: self.light_transition[tier.0],
            pedestrian_green: self.pedestrian_green[tier.0],
            blink_warning: self.blink_warning[tier.0],
        }
    }

    /// Check table shapes and value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        let expected = self.tier_count();
        if expected == 0 {
            return Err(ConfigError::NoTiers);
        }

        let lengths = [
            ("vehicle_spawn_interval", self.vehicle_spawn_interval.len()),
            ("pedestrian_quota", self.pedestrian_quota.len()),
            ("car_green", self.car_green.len()),
            ("light_transition", self.light_transition.len()),
            ("pedestrian_green", self.pedestrian_green.len()),
            ("blink_warning", self.blink_warning.len()),
            ("life_bonus", self.life_bonus.len()),
        ];
        for (table, found) in lengths {
            if found != expected {
                return Err(ConfigError::TableLengthMismatch {
                    table,
                    expected,
                    found,
                });
            }
        }

        let durations: [(&'static str, &[f32]); 4] = [
            ("car_green", &self.car_green),
            ("light_transition", &self.light_transition),
            ("pedestrian_green", &self.pedestrian_green),
            ("blink_warning", &self.blink_warning),
        ];
        for (table, values) in durations {
            for (tier, &value) in values.iter().enumerate() {
                if value < 0.0 || value.is_nan() {
                    return Err(ConfigError::NegativeValue { table, tier, value });
                }
            }
        }

        let intervals: [(&'static str, &[f32]); 2] = [
            ("pedestrian_spawn_interval", &self.pedestrian_spawn_interval),
            ("vehicle_spawn_interval", &self.vehicle_spawn_interval),
        ];
        for (table, values) in intervals {
            for (tier, &value) in values.iter().enumerate() {
                if value <= 0.0 || value.is_nan() {
                    return Err(ConfigError::NonPositiveInterval { table, tier, value });
                }
            }
        }

        for (tier, &bonus) in self.life_bonus.iter().enumerate() {
            if bonus < 0 {
                return Err(ConfigError::NegativeValue {
                    table: "life_bonus",
                    tier,
                    value: bonus as f32,
                });
            }
        }

        for tier in 0..expected {
            let timings = self.signal_timings(DifficultyTier(tier));
            if timings.blink_warning > timings.pedestrian_green {
                return Err(ConfigError::BlinkLongerThanGreen {
                    tier,
                    blink: timings.blink_warning,
                    green: timings.pedestrian_green,
                });
            }
            if timings.cycle_length() <= 0.0 {
                return Err(ConfigError::StalledSignalCycle { tier });
            }
        }

        Ok(())
    }
}

//! Configuration errors
//!
//! These are programming errors in the difficulty setup. They are reported
//! once, when a round starts, and never during a running round.

/// A difficulty configuration that cannot drive a round
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("difficulty tier {tier} is out of range (configured tiers: {tiers})")]
    TierOutOfRange { tier: usize, tiers: usize },

    #[error("difficulty table has no tiers")]
    NoTiers,

    #[error("table `{table}` has {found} entries, expected {expected}")]
    TableLengthMismatch {
        table: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("table `{table}` has negative value {value} at tier {tier}")]
    NegativeValue {
        table: &'static str,
        tier: usize,
        value: f32,
    },

    #[error("table `{table}` needs a positive interval at tier {tier}, got {value}")]
    NonPositiveInterval {
        table: &'static str,
        tier: usize,
        value: f32,
    },

    #[error("blink warning ({blink}s) is longer than pedestrian green ({green}s) at tier {tier}")]
    BlinkLongerThanGreen { tier: usize, blink: f32, green: f32 },

    #[error("signal cycle at tier {tier} has zero total length")]
    StalledSignalCycle { tier: usize },

    #[error("no vehicle kind can spawn at tier {tier}")]
    EmptyVehicleSet { tier: usize },

    #[error("no pedestrian kind can spawn at tier {tier}")]
    EmptyPedestrianSet { tier: usize },

    #[error("a session cannot start at tier {tier}: its life bonus is zero")]
    NoStartingLife { tier: usize },
}

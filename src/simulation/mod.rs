//! Standalone crossing simulation module
//!
//! This module contains the core game logic: the frame clock and its timer
//! queues, pedestrians, vehicles, the traffic signal, spawners and the
//! session flow. It has no rendering dependencies and can be driven from a
//! console loop or tests.

mod clock;
mod collaborators;
mod config;
mod difficulty;
mod error;
mod events;
mod game_state;
mod pedestrian;
mod spawner;
mod traffic_signal;
mod types;
mod vehicle;
mod world;

// Re-export public types for external use
pub use clock::{Clock, PedestrianTimer, TimerEvent, TimerId, TimerKind};
pub use collaborators::{
    AssetCatalog, AudioSink, Collaborators, FullCatalog, LogPresentation, MemorySettings, MessageKey,
    NullAudio, OutcomeKey, Presentation, Settings, SettingsStore, SfxCue, SoundHandle,
};
pub use config::{SimConfig, MESSAGE_DURATION};
pub use difficulty::{DifficultyTable, DifficultyTier, SignalTimings, ELDERLY_UNLOCK_TIER, SPORTSCAR_UNLOCK_TIER};
pub use error::ConfigError;
pub use events::SimEvent;
pub use game_state::SessionState;
pub use pedestrian::{
    Flight, PedestrianChange, PedestrianKind, PedestrianProfile, PedestrianState, PedestrianUpdateResult,
    SimPedestrian, TapOutcome, COLLISION_ROTATION_FACTOR, DOUBLE_TAP_WINDOW, FLIGHT_DRIFT_RANGE, FLIGHT_LIFT,
    FLIGHT_MAX_SCALE, FLIGHT_SCALE_RATE, IDLE_DURATION_SECS, IDLE_MAX_X, IDLE_MIN_X, IDLE_WAIT_SECS,
    MAX_FLIGHT_TIME, SCREAM_DELAY, SPRINT_DURATION, SPRINT_MULTIPLIER,
};
pub use spawner::{
    is_slot_occupied, pedestrian_pool, EntitySpawner, PedestrianSpawn, RosterEntry, VehicleRoster, VehicleSpawn,
    VehicleSpawnAttempt,
};
pub use traffic_signal::{SignalPhase, TrafficSignal};
pub use types::{
    PedestrianId, Position, Rect, SimId, VehicleId, PEDESTRIAN_HALF_HEIGHT, PEDESTRIAN_HALF_WIDTH,
    PEDESTRIAN_LEFT_SLOTS, PEDESTRIAN_MAX_X, PEDESTRIAN_MAX_Y, PEDESTRIAN_MIN_X, PEDESTRIAN_MIN_Y,
    PEDESTRIAN_RIGHT_SIDE_X, PEDESTRIAN_RIGHT_SLOTS, PEDESTRIAN_TAP_HALF_HEIGHT, PEDESTRIAN_TAP_HALF_WIDTH,
    SENSOR_RANGE, STOP_LINE, VEHICLE_DESPAWN_Y, VEHICLE_SLOTS, VEHICLE_SPAWN_SEPARATION,
};
pub use vehicle::{
    PitchCurve, SensorProbe, SimVehicle, VehicleKind, VehicleSpec, VehicleUpdateResult, PROBE_COUNT,
};
pub use world::SimWorld;

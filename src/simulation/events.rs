//! Notifications published by the simulation
//!
//! The world appends these to an outbox every tick; HUD, light displays and
//! other presentation layers drain and react to them.

use super::collaborators::OutcomeKey;
use super::pedestrian::PedestrianKind;
use super::traffic_signal::SignalPhase;
use super::types::{PedestrianId, Position, VehicleId};
use super::vehicle::VehicleKind;

#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    RoundStarted { tier: usize },
    InputUnblocked,
    RoundTornDown,

    PhaseChanged { phase: SignalPhase },
    /// Pedestrian light turned green (true) or red (false)
    PedestrianLight { green: bool },
    /// Solid pedestrian green is over, the light starts blinking
    PedestrianLightBlink,

    PedestrianSpawned { id: PedestrianId, kind: PedestrianKind },
    PedestrianStopped { id: PedestrianId },
    PedestrianSprinting { id: PedestrianId },
    PedestrianIdling { id: PedestrianId },
    PedestrianResumed { id: PedestrianId },
    PedestrianHit { id: PedestrianId, vehicle: VehicleId },
    PedestrianScored { id: PedestrianId, points: u32 },
    PedestrianDespawned { id: PedestrianId },

    VehicleSpawned { id: VehicleId, kind: VehicleKind },
    VehicleSpawnSkipped { slot: Position },
    VehicleDespawned { id: VehicleId },

    LifeChanged { life: i32 },
    DifficultyUp { from: usize, to: usize },
    GameOver {
        score: u32,
        new_record: bool,
        outcome: OutcomeKey,
    },
}

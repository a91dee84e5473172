//! Spawn loops for pedestrians and vehicles
//!
//! The pedestrian loop spends a finite quota, the vehicle loop runs until
//! the round is torn down. Both wait on pausable timers between iterations.

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::seq::IndexedRandom;
use rand::Rng;
use strum::IntoEnumIterator;

use super::clock::{Clock, TimerEvent, TimerId, TimerKind};
use super::difficulty::{DifficultyTable, DifficultyTier, ELDERLY_UNLOCK_TIER, SPORTSCAR_UNLOCK_TIER};
use super::error::ConfigError;
use super::pedestrian::PedestrianKind;
use super::types::{Position, PEDESTRIAN_LEFT_SLOTS, PEDESTRIAN_RIGHT_SLOTS, VEHICLE_SLOTS, VEHICLE_SPAWN_SEPARATION};
use super::vehicle::VehicleKind;

/// One entry of the weighted vehicle pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterEntry {
    Fixed(VehicleKind),
    /// Resolved by rotating through the bus variants
    BusRotation,
}

/// Weighted vehicle pool for one tier
#[derive(Debug, Clone)]
pub struct VehicleRoster {
    entries: Vec<(RosterEntry, u32)>,
    index: WeightedIndex<u32>,
}

impl VehicleRoster {
    /// Every non-bus kind and the bus slot weigh the same. The sports car
    /// unlocks at its tier and is the only vehicle at the top tier.
    pub fn for_tier(table: &DifficultyTable, tier: DifficultyTier) -> Result<Self, ConfigError> {
        let entries: Vec<(RosterEntry, u32)> = if table.is_max(tier) && tier.index() >= SPORTSCAR_UNLOCK_TIER {
            vec![(RosterEntry::Fixed(VehicleKind::Sportscar), 1)]
        } else {
            VehicleKind::iter()
                .filter(|kind| !kind.is_bus())
                .filter(|kind| *kind != VehicleKind::Sportscar || tier.index() >= SPORTSCAR_UNLOCK_TIER)
                .map(|kind| (RosterEntry::Fixed(kind), 1))
                .chain(std::iter::once((RosterEntry::BusRotation, 1)))
                .collect()
        };
        Self::from_entries(entries, tier)
    }

    pub fn from_entries(entries: Vec<(RosterEntry, u32)>, tier: DifficultyTier) -> Result<Self, ConfigError> {
        let index = WeightedIndex::new(entries.iter().map(|(_, weight)| *weight))
            .map_err(|_| ConfigError::EmptyVehicleSet { tier: tier.index() })?;
        Ok(Self { entries, index })
    }

    pub fn entries(&self) -> &[(RosterEntry, u32)] {
        &self.entries
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> RosterEntry {
        self.entries[self.index.sample(rng)].0
    }
}

/// Pedestrian kinds that can spawn at `tier`
pub fn pedestrian_pool(tier: DifficultyTier) -> Vec<PedestrianKind> {
    PedestrianKind::iter()
        .filter(|kind| !kind.is_elderly() || tier.index() >= ELDERLY_UNLOCK_TIER)
        .collect()
}

/// A pedestrian the world should create
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PedestrianSpawn {
    pub kind: PedestrianKind,
    pub position: Position,
}

/// A vehicle the world should create
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleSpawn {
    pub kind: VehicleKind,
    pub position: Position,
}

/// Outcome of one vehicle loop iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VehicleSpawnAttempt {
    Spawn(VehicleSpawn),
    /// A live vehicle is too close to the chosen slot
    SlotOccupied(Position),
    Stopped,
}

/// The round's two spawn loops
#[derive(Debug, Clone)]
pub struct EntitySpawner {
    tier: DifficultyTier,
    pedestrian_interval: f32,
    vehicle_interval: f32,
    pedestrian_pool: Vec<PedestrianKind>,
    roster: VehicleRoster,
    bus_index: usize,
    pedestrian_timer: Option<TimerId>,
    vehicle_timer: Option<TimerId>,
    running: bool,
}

impl EntitySpawner {
    pub fn new(table: &DifficultyTable, tier: DifficultyTier) -> Result<Self, ConfigError> {
        let pedestrian_pool = pedestrian_pool(tier);
        if pedestrian_pool.is_empty() {
            return Err(ConfigError::EmptyPedestrianSet { tier: tier.index() });
        }

        Ok(Self {
            tier,
            pedestrian_interval: table.pedestrian_spawn_interval(tier),
            vehicle_interval: table.vehicle_spawn_interval(tier),
            pedestrian_pool,
            roster: VehicleRoster::for_tier(table, tier)?,
            bus_index: 0,
            pedestrian_timer: None,
            vehicle_timer: None,
            running: false,
        })
    }

    pub fn tier(&self) -> DifficultyTier {
        self.tier
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn roster(&self) -> &VehicleRoster {
        &self.roster
    }

    /// Kick off both loops; the first iterations run on the next unpaused tick
    pub fn start(&mut self, clock: &mut Clock, remaining_pedestrians: u32) {
        self.stop(clock);
        self.running = true;
        if remaining_pedestrians > 0 {
            self.pedestrian_timer = Some(clock.schedule(TimerKind::Pausable, 0.0, TimerEvent::SpawnPedestrian));
        }
        self.vehicle_timer = Some(clock.schedule(TimerKind::Pausable, 0.0, TimerEvent::SpawnVehicle));
    }

    pub fn stop(&mut self, clock: &mut Clock) {
        clock.cancel_slot(&mut self.pedestrian_timer);
        clock.cancel_slot(&mut self.vehicle_timer);
        self.running = false;
    }

    /// One pedestrian loop iteration: pick a kind and slot, spend one unit of
    /// quota and wait for the next iteration while quota remains.
    pub fn next_pedestrian<R: Rng + ?Sized>(
        &mut self,
        remaining: &mut u32,
        clock: &mut Clock,
        rng: &mut R,
    ) -> Option<PedestrianSpawn> {
        self.pedestrian_timer = None;
        if !self.running || *remaining == 0 {
            return None;
        }

        let kind = self.choose_pedestrian(rng);
        let position = self.choose_pedestrian_slot(rng);
        *remaining -= 1;

        if *remaining > 0 {
            self.pedestrian_timer = Some(clock.schedule(
                TimerKind::Pausable,
                self.pedestrian_interval,
                TimerEvent::SpawnPedestrian,
            ));
        }
        Some(PedestrianSpawn { kind, position })
    }

    /// One vehicle loop iteration. `is_occupied` reports whether a live
    /// vehicle sits too close to a slot; occupied slots skip this iteration.
    pub fn next_vehicle<R: Rng + ?Sized>(
        &mut self,
        clock: &mut Clock,
        rng: &mut R,
        is_occupied: impl Fn(Position) -> bool,
    ) -> VehicleSpawnAttempt {
        self.vehicle_timer = None;
        if !self.running {
            return VehicleSpawnAttempt::Stopped;
        }

        self.vehicle_timer = Some(clock.schedule(
            TimerKind::Pausable,
            self.vehicle_interval,
            TimerEvent::SpawnVehicle,
        ));

        let kind = self.choose_vehicle(rng);
        let position = self.choose_vehicle_slot(rng);
        if is_occupied(position) {
            return VehicleSpawnAttempt::SlotOccupied(position);
        }
        VehicleSpawnAttempt::Spawn(VehicleSpawn { kind, position })
    }

    pub fn choose_pedestrian<R: Rng + ?Sized>(&self, rng: &mut R) -> PedestrianKind {
        self.pedestrian_pool
            .choose(rng)
            .copied()
            .unwrap_or(PedestrianKind::Woman)
    }

    pub fn choose_pedestrian_slot<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        let slot = rng.random_range(0..PEDESTRIAN_LEFT_SLOTS.len() + PEDESTRIAN_RIGHT_SLOTS.len());
        match PEDESTRIAN_LEFT_SLOTS.get(slot) {
            Some(position) => *position,
            None => PEDESTRIAN_RIGHT_SLOTS[slot - PEDESTRIAN_LEFT_SLOTS.len()],
        }
    }

    pub fn choose_vehicle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> VehicleKind {
        match self.roster.sample(rng) {
            RosterEntry::Fixed(kind) => kind,
            RosterEntry::BusRotation => self.next_bus(),
        }
    }

    /// Next bus variant in strict rotation
    pub fn next_bus(&mut self) -> VehicleKind {
        let bus = VehicleKind::BUSES[self.bus_index];
        self.bus_index = (self.bus_index + 1) % VehicleKind::BUSES.len();
        bus
    }

    pub fn choose_vehicle_slot<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        *VEHICLE_SLOTS.choose(rng).unwrap_or(&VEHICLE_SLOTS[0])
    }
}

/// Whether any of `vehicle_positions` is within the spawn separation of `slot`
pub fn is_slot_occupied(slot: Position, mut vehicle_positions: impl Iterator<Item = Position>) -> bool {
    vehicle_positions.any(|position| position.distance(&slot) < VEHICLE_SPAWN_SEPARATION)
}

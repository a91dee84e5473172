//! Main simulation world that ties everything together
//!
//! Owns the clock, every live entity, the signal, the spawners and the
//! session record. Collaborators outside the core (settings, HUD, audio,
//! assets) are reached only through the traits in `collaborators`.

use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{BTreeMap, HashMap};

use super::clock::{Clock, PedestrianTimer, TimerEvent, TimerKind};
use super::collaborators::{Collaborators, MessageKey, OutcomeKey, SfxCue, SoundHandle};
use super::config::SimConfig;
use super::difficulty::{DifficultyTier, SignalTimings};
use super::error::ConfigError;
use super::events::SimEvent;
use super::game_state::SessionState;
use super::pedestrian::{
    PedestrianChange, PedestrianKind, PedestrianState, PedestrianUpdateResult, SimPedestrian, TapOutcome,
};
use super::spawner::{is_slot_occupied, EntitySpawner, VehicleSpawnAttempt};
use super::traffic_signal::TrafficSignal;
use super::types::{PedestrianId, Position, Rect, SimId, VehicleId, STOP_LINE};
use super::vehicle::{SimVehicle, VehicleKind, VehicleUpdateResult};

/// The main simulation world
pub struct SimWorld {
    pub config: SimConfig,

    /// Live pedestrians, flying ones included
    pub pedestrians: BTreeMap<PedestrianId, SimPedestrian>,

    /// Live vehicles
    pub vehicles: BTreeMap<VehicleId, SimVehicle>,

    pub session: SessionState,

    pub signal: TrafficSignal,

    clock: Clock,
    spawner: Option<EntitySpawner>,
    collaborators: Collaborators,

    /// Engine loops keyed by the vehicle they belong to
    engine_sounds: HashMap<VehicleId, SoundHandle>,

    /// Outbox drained by presentation layers
    events: Vec<SimEvent>,

    /// Next ID to assign
    next_id: usize,

    rng: StdRng,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new(SimConfig::default(), Collaborators::default())
    }
}

impl SimWorld {
    fn new_internal(config: SimConfig, collaborators: Collaborators, rng: StdRng) -> Self {
        Self {
            config,
            pedestrians: BTreeMap::new(),
            vehicles: BTreeMap::new(),
            session: SessionState::new(DifficultyTier::BASE, 0),
            signal: TrafficSignal::new(SignalTimings::default()),
            clock: Clock::new(),
            spawner: None,
            collaborators,
            engine_sounds: HashMap::new(),
            events: Vec::new(),
            next_id: 0,
            rng,
        }
    }

    pub fn new(config: SimConfig, collaborators: Collaborators) -> Self {
        Self::new_internal(config, collaborators, StdRng::from_rng(&mut rand::rng()))
    }

    /// Create a new SimWorld with a seeded RNG for reproducible simulations
    pub fn new_with_seed(seed: u64, config: SimConfig, collaborators: Collaborators) -> Self {
        Self::new_internal(config, collaborators, StdRng::seed_from_u64(seed))
    }

    fn next_sim_id(&mut self) -> SimId {
        let id = SimId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn spawner(&self) -> Option<&EntitySpawner> {
        self.spawner.as_ref()
    }

    pub fn pedestrian(&self, id: PedestrianId) -> Option<&SimPedestrian> {
        self.pedestrians.get(&id)
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&SimVehicle> {
        self.vehicles.get(&id)
    }

    /// Events published since the last drain, oldest first
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Time base for taps: real time, so double taps work behind a pause too
    pub fn input_time(&self) -> f32 {
        self.clock.elapsed()
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.clock.is_paused() != paused {
            info!("Simulation {}", if paused { "paused" } else { "resumed" });
        }
        self.clock.set_paused(paused);
    }

    /// Load persisted settings and start the first round at the saved tier
    pub fn start_session(&mut self) -> Result<(), ConfigError> {
        let settings = self.collaborators.settings.load_settings();
        self.session.high_score = settings.high_score;
        info!(
            "Session starting at tier {} (best score {})",
            settings.difficulty_start_tier, settings.high_score
        );
        self.start_round(settings.difficulty_start_tier)
    }

    /// Start a fresh round at `tier`: score reset, life set to the tier's bonus.
    /// Tiers without a life bonus can only be reached by escalation.
    pub fn start_round(&mut self, tier: usize) -> Result<(), ConfigError> {
        let tier = self.config.resolve_tier(tier)?;
        if self.config.difficulty.life_bonus(tier) <= 0 {
            return Err(ConfigError::NoStartingLife { tier: tier.index() });
        }
        let spawner = EntitySpawner::new(&self.config.difficulty, tier)?;

        self.teardown_round();
        self.session = SessionState::new(tier, self.session.high_score);
        self.session.life = self.config.difficulty.life_bonus(tier);
        self.begin_round(tier, spawner);
        Ok(())
    }

    fn begin_round(&mut self, tier: DifficultyTier, spawner: EntitySpawner) {
        let quota = self.config.difficulty.pedestrian_quota(tier);
        self.session.tier = tier;
        self.session.pedestrians_to_spawn = quota;
        self.session.round_active = true;
        self.session.input_blocked = true;
        self.session.escalating = false;
        self.session.game_over = false;

        self.signal = TrafficSignal::new(self.config.difficulty.signal_timings(tier));
        self.signal.start(&mut self.clock);
        self.spawner = Some(spawner);

        info!(
            "Round started: tier {}, {} pedestrians, life {}",
            tier.index(),
            quota,
            self.session.life
        );
        self.events.push(SimEvent::RoundStarted { tier: tier.index() });
        self.events.push(SimEvent::LifeChanged { life: self.session.life });

        let wait = self.show_message(MessageKey::GetReady, Some(quota));
        self.clock
            .schedule(TimerKind::PauseImmune, wait, TimerEvent::GetReadyFinished);
    }

    /// Drop every entity, timer and engine loop of the current round
    pub fn teardown_round(&mut self) {
        if let Some(spawner) = self.spawner.as_mut() {
            spawner.stop(&mut self.clock);
        }
        self.spawner = None;
        self.signal.stop(&mut self.clock);
        self.clock.clear();

        for (_, handle) in self.engine_sounds.drain() {
            self.collaborators.audio.stop(handle);
        }
        self.pedestrians.clear();
        self.vehicles.clear();

        if self.session.round_active {
            debug!("Round at tier {} torn down", self.session.tier.index());
            self.events.push(SimEvent::RoundTornDown);
        }
        self.session.round_active = false;
    }

    /// Show a HUD message and return the seconds until it completes.
    /// Without a HUD the message is skipped and completes immediately.
    fn show_message(&mut self, message: MessageKey, incoming_count: Option<u32>) -> f32 {
        let duration = self.config.message_duration;
        match self.collaborators.presentation.as_mut() {
            Some(presentation) => presentation
                .show_transient_message(duration, message, None, incoming_count)
                .max(0.0),
            None => {
                warn!("No HUD available, skipping {} message", message);
                0.0
            }
        }
    }

    fn show_banner(&mut self, outcome: OutcomeKey) {
        match self.collaborators.presentation.as_mut() {
            Some(presentation) => presentation.show_round_end_banner(outcome),
            None => warn!("No HUD available, skipping {} banner", outcome),
        }
    }

    /// Create a pedestrian at `position`. None if its asset is missing.
    pub fn spawn_pedestrian(&mut self, kind: PedestrianKind, position: Position) -> Option<PedestrianId> {
        if !self.collaborators.assets.has_pedestrian(kind) {
            warn!("Missing asset for pedestrian {}, skipping spawn", kind);
            return None;
        }

        let id = PedestrianId(self.next_sim_id());
        let pedestrian = SimPedestrian::spawn(id, kind, position, &mut self.clock, &mut self.rng);
        self.pedestrians.insert(id, pedestrian);
        self.session.pedestrians_spawned += 1;

        debug!("Spawned {} {:?} at ({:.0}, {:.0})", kind, id.0, position.x, position.y);
        self.events.push(SimEvent::PedestrianSpawned { id, kind });
        Some(id)
    }

    /// Create a vehicle at `position` and start its engine loop. None if its asset is missing.
    pub fn spawn_vehicle(&mut self, kind: VehicleKind, position: Position) -> Option<VehicleId> {
        if !self.collaborators.assets.has_vehicle(kind) {
            warn!("Missing asset for vehicle {}, skipping spawn", kind);
            return None;
        }

        let id = VehicleId(self.next_sim_id());
        let vehicle = SimVehicle::new(id, kind, position);
        if let Some(handle) = self.collaborators.audio.play_looping_sfx(SfxCue::Engine(kind)) {
            self.collaborators.audio.set_pitch(handle, vehicle.engine_pitch());
            self.engine_sounds.insert(id, handle);
        }
        self.vehicles.insert(id, vehicle);
        self.session.vehicles_spawned += 1;

        debug!("Spawned {} {:?} at ({:.0}, {:.0})", kind, id.0, position.x, position.y);
        self.events.push(SimEvent::VehicleSpawned { id, kind });
        Some(id)
    }

    fn despawn_vehicle(&mut self, id: VehicleId) {
        if self.vehicles.remove(&id).is_none() {
            return;
        }
        if let Some(handle) = self.engine_sounds.remove(&id) {
            self.collaborators.audio.stop(handle);
        }
        self.events.push(SimEvent::VehicleDespawned { id });
    }

    fn despawn_pedestrian(&mut self, id: PedestrianId) {
        let Some(mut pedestrian) = self.pedestrians.remove(&id) else {
            return;
        };
        pedestrian.despawn(&mut self.clock);
        self.events.push(SimEvent::PedestrianDespawned { id });
    }

    /// Tap on a specific pedestrian at input time `at`
    pub fn tap_pedestrian(&mut self, id: PedestrianId, at: f32) -> TapOutcome {
        if self.session.input_blocked {
            return TapOutcome::Ignored;
        }
        let Some(pedestrian) = self.pedestrians.get_mut(&id) else {
            return TapOutcome::Ignored;
        };

        let outcome = pedestrian.handle_tap(at, &mut self.clock);
        if outcome == TapOutcome::Ignored {
            return outcome;
        }

        self.collaborators.audio.play_sfx(SfxCue::Tap);
        match outcome {
            TapOutcome::Stopped => self.events.push(SimEvent::PedestrianStopped { id }),
            TapOutcome::Sprinting => self.events.push(SimEvent::PedestrianSprinting { id }),
            TapOutcome::Recorded | TapOutcome::Ignored => {}
        }
        outcome
    }

    /// Tap at a point on the playfield. The front-most grounded pedestrian
    /// whose tap area holds the point receives it.
    pub fn tap_at(&mut self, point: Position, at: f32) -> Option<(PedestrianId, TapOutcome)> {
        let id = self
            .pedestrians
            .values()
            .filter(|pedestrian| pedestrian.is_grounded() && pedestrian.tap_area().contains(&point))
            .max_by(|a, b| a.position.y.total_cmp(&b.position.y))
            .map(|pedestrian| pedestrian.id)?;
        Some((id, self.tap_pedestrian(id, at)))
    }

    /// Apply a vehicle hit to a pedestrian. Returns false if it was already
    /// hit, is not grounded or either entity is gone.
    pub fn handle_collision(&mut self, pedestrian_id: PedestrianId, vehicle_id: VehicleId) -> bool {
        let Some(vehicle_speed) = self.vehicles.get(&vehicle_id).map(|vehicle| vehicle.speed) else {
            return false;
        };
        let Some(pedestrian) = self.pedestrians.get_mut(&pedestrian_id) else {
            return false;
        };
        if !pedestrian.handle_collision(vehicle_speed, &mut self.clock) {
            return false;
        }

        self.collaborators.audio.play_sfx(SfxCue::Hit);
        self.session.pedestrians_hit += 1;
        self.events.push(SimEvent::PedestrianHit {
            id: pedestrian_id,
            vehicle: vehicle_id,
        });

        if self.session.update_life(-1) {
            self.events.push(SimEvent::LifeChanged { life: self.session.life });
        }
        debug!(
            "{} {:?} hit by {:?} at {:.0} px/s, life {}",
            pedestrian.kind, pedestrian_id.0, vehicle_id.0, vehicle_speed, self.session.life
        );
        true
    }

    /// Main simulation tick
    pub fn tick(&mut self, delta_secs: f32) {
        self.session.update(delta_secs);
        self.clock.advance(delta_secs);
        let paused = self.clock.is_paused();

        self.process_timers();

        if !paused {
            self.update_vehicles(delta_secs);
        }
        self.update_pedestrians(delta_secs, paused);
        if !paused {
            self.detect_collisions();
        }
        self.update_engine_pitch();

        self.check_life();
        self.check_pedestrians_left();
    }

    fn process_timers(&mut self) {
        while let Some((_, event)) = self.clock.pop_due() {
            self.dispatch(event);
        }
    }

    fn dispatch(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::Pedestrian(id, timer) => self.on_pedestrian_timer(id, timer),
            TimerEvent::SpawnPedestrian => self.on_spawn_pedestrian(),
            TimerEvent::SpawnVehicle => self.on_spawn_vehicle(),
            TimerEvent::SignalPhaseElapsed => self.signal.on_phase_elapsed(&mut self.clock, &mut self.events),
            TimerEvent::SignalBlinkWarning => self.signal.on_blink_warning(&mut self.events),
            TimerEvent::GetReadyFinished => self.on_get_ready_finished(),
            TimerEvent::DifficultyUpFinished => self.on_difficulty_up_finished(),
            TimerEvent::NewRecordFinished => {
                let outcome = self.session.outcome.unwrap_or(OutcomeKey::GameOver);
                self.show_banner(outcome);
            }
        }
    }

    fn on_pedestrian_timer(&mut self, id: PedestrianId, timer: PedestrianTimer) {
        // Timers can outlive a pedestrian removed in the same tick
        let Some(pedestrian) = self.pedestrians.get_mut(&id) else {
            return;
        };

        match pedestrian.on_timer(timer, &mut self.clock, &mut self.rng) {
            Some(PedestrianChange::Resumed) => self.events.push(SimEvent::PedestrianResumed { id }),
            Some(PedestrianChange::Idling) => self.events.push(SimEvent::PedestrianIdling { id }),
            Some(PedestrianChange::Scream) => self.collaborators.audio.play_sfx(SfxCue::Scream),
            None => {}
        }
    }

    fn on_spawn_pedestrian(&mut self) {
        let Some(spawner) = self.spawner.as_mut() else {
            return;
        };
        let spawn = spawner.next_pedestrian(&mut self.session.pedestrians_to_spawn, &mut self.clock, &mut self.rng);
        if let Some(spawn) = spawn {
            self.spawn_pedestrian(spawn.kind, spawn.position);
        }
    }

    fn on_spawn_vehicle(&mut self) {
        let Some(spawner) = self.spawner.as_mut() else {
            return;
        };
        let vehicles = &self.vehicles;
        let attempt = spawner.next_vehicle(&mut self.clock, &mut self.rng, |slot| {
            is_slot_occupied(slot, vehicles.values().map(|vehicle| vehicle.position))
        });

        match attempt {
            VehicleSpawnAttempt::Spawn(spawn) => {
                self.spawn_vehicle(spawn.kind, spawn.position);
            }
            VehicleSpawnAttempt::SlotOccupied(slot) => {
                debug!("Vehicle slot ({:.0}, {:.0}) occupied, skipping", slot.x, slot.y);
                self.session.vehicle_spawns_skipped += 1;
                self.events.push(SimEvent::VehicleSpawnSkipped { slot });
            }
            VehicleSpawnAttempt::Stopped => {}
        }
    }

    fn on_get_ready_finished(&mut self) {
        if !self.session.round_active || self.session.game_over {
            return;
        }
        self.session.input_blocked = false;
        if let Some(spawner) = self.spawner.as_mut() {
            spawner.start(&mut self.clock, self.session.pedestrians_to_spawn);
        }
        self.events.push(SimEvent::InputUnblocked);
        self.events.push(SimEvent::PedestrianLight { green: false });
    }

    fn update_vehicles(&mut self, delta_secs: f32) {
        let stop_line_active = !self.signal.car_green();
        let bodies: Vec<(VehicleId, Rect)> = self
            .vehicles
            .values()
            .map(|vehicle| (vehicle.id, vehicle.body()))
            .collect();

        // Every sensor reads the same snapshot before anything moves
        let readings: Vec<(VehicleId, bool)> = self
            .vehicles
            .values()
            .map(|vehicle| {
                let others = bodies
                    .iter()
                    .filter(|(id, _)| *id != vehicle.id)
                    .map(|(_, body)| body);
                let stop_line = (stop_line_active && vehicle.obeys_signal()).then_some(&STOP_LINE);
                (vehicle.id, vehicle.senses_obstacle(others.chain(stop_line)))
            })
            .collect();

        let mut to_despawn = Vec::new();
        for (id, obstacle_ahead) in readings {
            if let Some(vehicle) = self.vehicles.get_mut(&id) {
                vehicle.update_speed(delta_secs, obstacle_ahead);
                if vehicle.advance(delta_secs) == VehicleUpdateResult::Despawn {
                    to_despawn.push(id);
                }
            }
        }

        for id in to_despawn {
            self.despawn_vehicle(id);
        }
    }

    fn update_pedestrians(&mut self, delta_secs: f32, paused: bool) {
        let mut finished = Vec::new();
        for pedestrian in self.pedestrians.values_mut() {
            let result = pedestrian.update(delta_secs, paused);
            if result != PedestrianUpdateResult::Continue {
                finished.push((pedestrian.id, pedestrian.kind, result));
            }
        }

        for (id, kind, result) in finished {
            if result == (PedestrianUpdateResult::ExitedPlayfield { unhit: true }) {
                let points = self.session.crossing_points(kind);
                if self.session.add_score(points) {
                    self.session.pedestrians_crossed += 1;
                    self.collaborators.audio.play_sfx(SfxCue::Score);
                    self.events.push(SimEvent::PedestrianScored { id, points });
                    debug!("{} {:?} crossed for {} points", kind, id.0, points);
                }
            }
            self.despawn_pedestrian(id);
        }
    }

    fn detect_collisions(&mut self) {
        let hits: Vec<(PedestrianId, VehicleId)> = self
            .pedestrians
            .values()
            .filter(|pedestrian| !pedestrian.hit && pedestrian.is_grounded())
            .filter_map(|pedestrian| {
                let body = pedestrian.body();
                self.vehicles
                    .values()
                    .find(|vehicle| vehicle.body().overlaps(&body))
                    .map(|vehicle| (pedestrian.id, vehicle.id))
            })
            .collect();

        for (pedestrian_id, vehicle_id) in hits {
            self.handle_collision(pedestrian_id, vehicle_id);
        }
    }

    fn update_engine_pitch(&mut self) {
        for (id, handle) in &self.engine_sounds {
            if let Some(vehicle) = self.vehicles.get(id) {
                self.collaborators.audio.set_pitch(*handle, vehicle.engine_pitch());
            }
        }
    }

    fn check_life(&mut self) {
        if self.session.round_active && !self.session.game_over && self.session.life <= 0 {
            self.game_over();
        }
    }

    fn check_pedestrians_left(&mut self) {
        if !self.session.round_active || self.session.escalating || self.session.game_over {
            return;
        }
        if self.session.pedestrians_to_spawn > 0 || !self.pedestrians.is_empty() {
            return;
        }

        self.session.escalating = true;
        if self.config.difficulty.is_max(self.session.tier) {
            info!("Top tier cleared");
            self.game_over();
        } else {
            self.difficulty_up();
        }
    }

    fn difficulty_up(&mut self) {
        let from = self.session.tier.index();
        let to = from + 1;
        info!("Difficulty up: tier {} -> {}", from, to);

        self.session.input_blocked = true;
        self.events.push(SimEvent::DifficultyUp { from, to });
        let wait = self.show_message(MessageKey::DifficultyUp, None);
        self.clock
            .schedule(TimerKind::PauseImmune, wait, TimerEvent::DifficultyUpFinished);
    }

    fn on_difficulty_up_finished(&mut self) {
        if !self.session.escalating || self.session.game_over {
            return;
        }
        let Some(next) = self.config.difficulty.next_tier(self.session.tier) else {
            self.game_over();
            return;
        };
        let spawner = match EntitySpawner::new(&self.config.difficulty, next) {
            Ok(spawner) => spawner,
            Err(err) => {
                error!("Cannot start tier {}: {}", next.index(), err);
                self.game_over();
                return;
            }
        };

        self.teardown_round();
        let bonus = self.config.difficulty.life_bonus(next);
        if self.config.carry_life_on_escalation {
            self.session.life += bonus;
        } else {
            self.session.life = bonus;
        }
        self.begin_round(next, spawner);
    }

    /// End the session once: stop spawning, save a new record, show the banner
    fn game_over(&mut self) {
        if self.session.game_over {
            return;
        }
        self.session.game_over = true;
        self.session.input_blocked = true;
        if let Some(spawner) = self.spawner.as_mut() {
            spawner.stop(&mut self.clock);
        }

        let outcome = if self.config.difficulty.is_max(self.session.tier) && self.session.life > 0 {
            OutcomeKey::WellDone
        } else {
            OutcomeKey::GameOver
        };
        self.session.outcome = Some(outcome);

        let score = self.session.score;
        let new_record = self.session.is_new_record();
        info!(
            "{} at tier {} with score {}{}",
            outcome,
            self.session.tier.index(),
            score,
            if new_record { " (new record)" } else { "" }
        );
        self.events.push(SimEvent::GameOver {
            score,
            new_record,
            outcome,
        });

        if new_record {
            self.session.high_score = score;
            self.collaborators.settings.save_settings(score);
            let wait = self.show_message(MessageKey::NewRecord, None);
            self.clock
                .schedule(TimerKind::PauseImmune, wait, TimerEvent::NewRecordFinished);
        } else {
            self.show_banner(outcome);
        }
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== Crossing Simulation Summary ===");
        println!("{}", self.session.summary());
        println!(
            "Signal: {:?}{} (cycles: {})",
            self.signal.phase(),
            if self.signal.is_blinking() { ", blinking" } else { "" },
            self.signal.completed_cycles()
        );
        println!(
            "Pedestrians: {}, Vehicles: {}{}",
            self.pedestrians.len(),
            self.vehicles.len(),
            if self.clock.is_paused() { " [PAUSED]" } else { "" }
        );
        println!();

        if !self.pedestrians.is_empty() {
            println!("--- Pedestrians ---");
            for pedestrian in self.pedestrians.values() {
                println!(
                    "  {} {:?}: {:?}, position=({:.1}, {:.1})",
                    pedestrian.kind, pedestrian.id.0 .0, pedestrian.state, pedestrian.position.x, pedestrian.position.y
                );
            }
        }

        if !self.vehicles.is_empty() {
            println!("--- Vehicles ---");
            for vehicle in self.vehicles.values() {
                println!(
                    "  {} {:?}: speed={:.1}/{:.0}, position=({:.1}, {:.1})",
                    vehicle.kind, vehicle.id.0 .0, vehicle.speed, vehicle.top_speed, vehicle.position.x, vehicle.position.y
                );
            }
        }
    }

    /// Draw the crossing area in the terminal
    pub fn draw_map(&self) {
        const MIN_X: f32 = -40.0;
        const MAX_X: f32 = 410.0;
        const MIN_Y: f32 = 300.0;
        const MAX_Y: f32 = 700.0;
        const CELL_W: f32 = 10.0;
        const CELL_H: f32 = 20.0;

        let cols = ((MAX_X - MIN_X) / CELL_W) as usize + 1;
        let rows = ((MAX_Y - MIN_Y) / CELL_H) as usize + 1;
        let mut grid = vec![vec![' '; cols]; rows];

        let to_grid = |x: f32, y: f32| -> Option<(usize, usize)> {
            if !(MIN_X..=MAX_X).contains(&x) || !(MIN_Y..=MAX_Y).contains(&y) {
                return None;
            }
            Some((((y - MIN_Y) / CELL_H) as usize, ((x - MIN_X) / CELL_W) as usize))
        };

        // Road edges
        for row in grid.iter_mut() {
            for x in [100.0, 260.0] {
                row[((x - MIN_X) / CELL_W) as usize] = '|';
            }
        }

        if !self.signal.car_green() {
            let y = (STOP_LINE.min.y + STOP_LINE.max.y) / 2.0;
            let mut x = STOP_LINE.min.x;
            while x <= STOP_LINE.max.x {
                if let Some((row, col)) = to_grid(x, y) {
                    grid[row][col] = '=';
                }
                x += CELL_W;
            }
        }

        for vehicle in self.vehicles.values() {
            let body = vehicle.body();
            let glyph = if vehicle.kind.is_bus() { 'B' } else { 'C' };
            let mut y = body.min.y;
            while y <= body.max.y {
                let mut x = body.min.x;
                while x <= body.max.x {
                    if let Some((row, col)) = to_grid(x, y) {
                        grid[row][col] = glyph;
                    }
                    x += CELL_W;
                }
                y += CELL_H;
            }
        }

        for pedestrian in self.pedestrians.values() {
            let glyph = match pedestrian.state {
                PedestrianState::Walking => 'p',
                PedestrianState::Sprinting => 'R',
                PedestrianState::Stopped | PedestrianState::RandomIdle => 's',
                PedestrianState::Flying => '*',
                PedestrianState::Despawned => continue,
            };
            if let Some((row, col)) = to_grid(pedestrian.position.x, pedestrian.position.y) {
                grid[row][col] = glyph;
            }
        }

        println!("\n=== Crossing Map ===");
        println!("Legend: p=Walking, R=Sprinting, s=Stopped, *=Flying, C=Car, B=Bus, ==Stop line, |=Road edge");
        println!();
        for row in &grid {
            let line: String = row.iter().collect();
            println!("{}", line);
        }
        println!();
    }
}

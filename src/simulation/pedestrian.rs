//! Pedestrian behaviour for the crossing simulation
//!
//! Each pedestrian walks along one horizontal line across the playfield.
//! Taps stop or sprint it, elderly kinds take random idle breaks, and a
//! vehicle collision sends it flying until it times out or leaves the field.

use rand::Rng;
use strum_macros::{Display, EnumCount, EnumIter};

use super::clock::{Clock, PedestrianTimer, TimerEvent, TimerId, TimerKind};
use super::types::{
    PedestrianId, Position, Rect, PEDESTRIAN_HALF_HEIGHT, PEDESTRIAN_HALF_WIDTH, PEDESTRIAN_MAX_X,
    PEDESTRIAN_MAX_Y, PEDESTRIAN_MIN_X, PEDESTRIAN_MIN_Y, PEDESTRIAN_RIGHT_SIDE_X,
    PEDESTRIAN_TAP_HALF_HEIGHT, PEDESTRIAN_TAP_HALF_WIDTH,
};

/// Max seconds between two taps for them to count as a double tap
pub const DOUBLE_TAP_WINDOW: f32 = 0.3;
/// Speed multiplier while sprinting
pub const SPRINT_MULTIPLIER: f32 = 3.0;
/// Seconds a double-tap sprint lasts
pub const SPRINT_DURATION: f32 = 2.0;
/// Seconds of flight before a hit pedestrian is removed
pub const MAX_FLIGHT_TIME: f32 = 5.0;
/// Upward speed while flying
pub const FLIGHT_LIFT: f32 = 250.0;
/// Horizontal flight drift is drawn from `-FLIGHT_DRIFT_RANGE..=FLIGHT_DRIFT_RANGE`
pub const FLIGHT_DRIFT_RANGE: f32 = 300.0;
/// Scale change per second during the flight pulse
pub const FLIGHT_SCALE_RATE: f32 = 0.5;
pub const FLIGHT_MAX_SCALE: f32 = 2.0;
/// Rotation speed is the colliding vehicle's speed times this
pub const COLLISION_ROTATION_FACTOR: f32 = 3.0;
/// Delay between the hit cue and the scream cue
pub const SCREAM_DELAY: f32 = 0.25;
/// Random idles never start outside this band
pub const IDLE_MIN_X: f32 = 30.0;
pub const IDLE_MAX_X: f32 = 390.0;
/// Whole seconds between random idle rolls
pub const IDLE_WAIT_SECS: std::ops::RangeInclusive<u32> = 3..=7;
/// Whole seconds a random idle lasts
pub const IDLE_DURATION_SECS: std::ops::RangeInclusive<u32> = 2..=4;

/// The closed set of pedestrian kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, Display)]
pub enum PedestrianKind {
    Woman,
    Girl,
    Boy,
    Man,
    Grandma,
    Grandpa,
}

/// Per-kind tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PedestrianProfile {
    pub base_speed: f32,
    pub score: u32,
    pub stop_duration: f32,
    pub stop_cooldown: f32,
    pub random_idle: bool,
}

impl PedestrianKind {
    pub fn profile(self) -> PedestrianProfile {
        match self {
            PedestrianKind::Woman => PedestrianProfile {
                base_speed: 40.0,
                score: 20,
                stop_duration: 3.0,
                stop_cooldown: 10.0,
                random_idle: false,
            },
            PedestrianKind::Girl => PedestrianProfile {
                base_speed: 50.0,
                score: 30,
                stop_duration: 3.0,
                stop_cooldown: 10.0,
                random_idle: false,
            },
            PedestrianKind::Boy => PedestrianProfile {
                base_speed: 40.0,
                score: 30,
                stop_duration: 3.0,
                stop_cooldown: 10.0,
                random_idle: false,
            },
            PedestrianKind::Man => PedestrianProfile {
                base_speed: 55.0,
                score: 20,
                stop_duration: 3.0,
                stop_cooldown: 10.0,
                random_idle: false,
            },
            PedestrianKind::Grandma => PedestrianProfile {
                base_speed: 30.0,
                score: 50,
                stop_duration: 3.0,
                stop_cooldown: 10.0,
                random_idle: true,
            },
            PedestrianKind::Grandpa => PedestrianProfile {
                base_speed: 20.0,
                score: 50,
                stop_duration: 5.0,
                stop_cooldown: 3.0,
                random_idle: true,
            },
        }
    }

    pub fn is_elderly(self) -> bool {
        matches!(self, PedestrianKind::Grandma | PedestrianKind::Grandpa)
    }
}

/// Lifecycle state of a pedestrian
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PedestrianState {
    Walking,
    Sprinting,
    Stopped,
    RandomIdle,
    Flying,
    Despawned,
}

/// Result of a tap on a pedestrian
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Flying or already removed; nothing happened
    Ignored,
    /// Tap remembered for double-tap detection, state unchanged
    Recorded,
    Stopped,
    Sprinting,
}

/// State change caused by a fired timer, for the world to publish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PedestrianChange {
    Resumed,
    Idling,
    Scream,
}

/// Result of a pedestrian update indicating what should happen to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PedestrianUpdateResult {
    Continue,
    /// Left the playfield; `unhit` crossings earn score
    ExitedPlayfield { unhit: bool },
    /// Flew for longer than the flight ceiling
    FlightExpired,
}

/// Cosmetic knock-back state, only meaningful while flying
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flight {
    pub time: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub scale: f32,
    scaling_up: bool,
}

impl Default for Flight {
    fn default() -> Self {
        Self {
            time: 0.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            scale: 1.0,
            scaling_up: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct PedestrianTimers {
    stop: Option<TimerId>,
    cooldown: Option<TimerId>,
    sprint: Option<TimerId>,
    idle: Option<TimerId>,
    scream: Option<TimerId>,
}

/// A pedestrian in the crossing simulation
#[derive(Debug, Clone)]
pub struct SimPedestrian {
    pub id: PedestrianId,
    pub kind: PedestrianKind,
    pub position: Position,
    /// +1.0 walks towards the right edge, -1.0 towards the left
    pub direction: f32,
    pub state: PedestrianState,
    /// Set by the first vehicle collision, never cleared
    pub hit: bool,
    /// Horizontal drift used while flying, picked at spawn
    pub flight_direction: f32,
    pub flight: Flight,
    can_be_stopped: bool,
    last_tap: Option<f32>,
    timers: PedestrianTimers,
}

impl SimPedestrian {
    pub fn new(id: PedestrianId, kind: PedestrianKind, position: Position, flight_direction: f32) -> Self {
        let direction = if position.x > PEDESTRIAN_RIGHT_SIDE_X { -1.0 } else { 1.0 };
        Self {
            id,
            kind,
            position,
            direction,
            state: PedestrianState::Walking,
            hit: false,
            flight_direction,
            flight: Flight::default(),
            can_be_stopped: true,
            last_tap: None,
            timers: PedestrianTimers::default(),
        }
    }

    /// Create a pedestrian with a random flight drift and start its own timers
    pub fn spawn<R: Rng + ?Sized>(
        id: PedestrianId,
        kind: PedestrianKind,
        position: Position,
        clock: &mut Clock,
        rng: &mut R,
    ) -> Self {
        let drift = rng.random_range(-FLIGHT_DRIFT_RANGE..=FLIGHT_DRIFT_RANGE);
        let mut pedestrian = Self::new(id, kind, position, drift);
        pedestrian.start(clock, rng);
        pedestrian
    }

    /// Arm the random idle loop for kinds that have one
    pub fn start<R: Rng + ?Sized>(&mut self, clock: &mut Clock, rng: &mut R) {
        if self.kind.profile().random_idle {
            self.schedule_idle_check(clock, rng);
        }
    }

    pub fn can_be_stopped(&self) -> bool {
        self.can_be_stopped
    }

    pub fn is_flying(&self) -> bool {
        self.state == PedestrianState::Flying
    }

    pub fn is_grounded(&self) -> bool {
        !matches!(self.state, PedestrianState::Flying | PedestrianState::Despawned)
    }

    /// Current walking speed, signed by direction; zero when not moving
    pub fn velocity_x(&self) -> f32 {
        let base = self.kind.profile().base_speed * self.direction;
        match self.state {
            PedestrianState::Walking => base,
            PedestrianState::Sprinting => base * SPRINT_MULTIPLIER,
            _ => 0.0,
        }
    }

    pub fn body(&self) -> Rect {
        Rect::centered(self.position, PEDESTRIAN_HALF_WIDTH, PEDESTRIAN_HALF_HEIGHT)
    }

    pub fn tap_area(&self) -> Rect {
        Rect::centered(self.position, PEDESTRIAN_TAP_HALF_WIDTH, PEDESTRIAN_TAP_HALF_HEIGHT)
    }

    /// Handle a tap at time `at` (seconds on the input clock)
    pub fn handle_tap(&mut self, at: f32, clock: &mut Clock) -> TapOutcome {
        if !self.is_grounded() {
            return TapOutcome::Ignored;
        }

        let is_double_tap = self
            .last_tap
            .is_some_and(|last| at >= last && at - last < DOUBLE_TAP_WINDOW);

        if is_double_tap {
            self.last_tap = None;
            self.start_sprint(clock);
            return TapOutcome::Sprinting;
        }

        self.last_tap = Some(at);
        if self.can_be_stopped && self.state == PedestrianState::Walking {
            self.stop(clock);
            TapOutcome::Stopped
        } else {
            TapOutcome::Recorded
        }
    }

    fn stop(&mut self, clock: &mut Clock) {
        self.state = PedestrianState::Stopped;
        self.can_be_stopped = false;
        let duration = self.kind.profile().stop_duration;
        self.timers.stop = Some(clock.schedule(
            TimerKind::Pausable,
            duration,
            TimerEvent::Pedestrian(self.id, PedestrianTimer::StopEnded),
        ));
    }

    /// Start (or restart) the speed boost, overriding any stop or idle
    fn start_sprint(&mut self, clock: &mut Clock) {
        clock.cancel_slot(&mut self.timers.stop);
        clock.cancel_slot(&mut self.timers.cooldown);
        clock.cancel_slot(&mut self.timers.sprint);

        self.state = PedestrianState::Sprinting;
        self.can_be_stopped = false;
        self.timers.sprint = Some(clock.schedule(
            TimerKind::Pausable,
            SPRINT_DURATION,
            TimerEvent::Pedestrian(self.id, PedestrianTimer::SprintEnded),
        ));
    }

    fn schedule_idle_check<R: Rng + ?Sized>(&mut self, clock: &mut Clock, rng: &mut R) {
        let wait = rng.random_range(IDLE_WAIT_SECS) as f32;
        self.timers.idle = Some(clock.schedule(
            TimerKind::Pausable,
            wait,
            TimerEvent::Pedestrian(self.id, PedestrianTimer::IdleCheck),
        ));
    }

    /// React to one of this pedestrian's timers firing
    pub fn on_timer<R: Rng + ?Sized>(
        &mut self,
        timer: PedestrianTimer,
        clock: &mut Clock,
        rng: &mut R,
    ) -> Option<PedestrianChange> {
        if self.state == PedestrianState::Despawned {
            return None;
        }

        match timer {
            PedestrianTimer::StopEnded => {
                self.timers.stop = None;
                if self.state != PedestrianState::Stopped {
                    return None;
                }
                self.state = PedestrianState::Walking;
                let cooldown = self.kind.profile().stop_cooldown;
                self.timers.cooldown = Some(clock.schedule(
                    TimerKind::Pausable,
                    cooldown,
                    TimerEvent::Pedestrian(self.id, PedestrianTimer::StopCooldownReady),
                ));
                Some(PedestrianChange::Resumed)
            }
            PedestrianTimer::StopCooldownReady => {
                self.timers.cooldown = None;
                if self.is_grounded() {
                    self.can_be_stopped = true;
                }
                None
            }
            PedestrianTimer::SprintEnded => {
                self.timers.sprint = None;
                if self.state != PedestrianState::Sprinting {
                    return None;
                }
                self.state = PedestrianState::Walking;
                self.can_be_stopped = true;
                Some(PedestrianChange::Resumed)
            }
            PedestrianTimer::IdleCheck => {
                self.timers.idle = None;
                if !self.is_grounded() {
                    return None;
                }

                let in_band = self.position.x >= IDLE_MIN_X && self.position.x <= IDLE_MAX_X;
                if clock.is_paused() || self.state != PedestrianState::Walking || self.hit || !in_band {
                    self.schedule_idle_check(clock, rng);
                    return None;
                }

                self.state = PedestrianState::RandomIdle;
                let duration = rng.random_range(IDLE_DURATION_SECS) as f32;
                self.timers.idle = Some(clock.schedule(
                    TimerKind::Pausable,
                    duration,
                    TimerEvent::Pedestrian(self.id, PedestrianTimer::IdleEnded),
                ));
                Some(PedestrianChange::Idling)
            }
            PedestrianTimer::IdleEnded => {
                self.timers.idle = None;
                if !self.is_grounded() {
                    return None;
                }

                // A sprint may have cut the idle short; the idle loop goes on either way
                let resumed = self.state == PedestrianState::RandomIdle;
                if resumed {
                    self.state = PedestrianState::Walking;
                    self.can_be_stopped = true;
                }
                self.schedule_idle_check(clock, rng);
                resumed.then_some(PedestrianChange::Resumed)
            }
            PedestrianTimer::ScreamCue => {
                self.timers.scream = None;
                Some(PedestrianChange::Scream)
            }
        }
    }

    /// Vehicle overlap. Applies only once per pedestrian; returns whether it did.
    pub fn handle_collision(&mut self, vehicle_speed: f32, clock: &mut Clock) -> bool {
        if self.hit || !self.is_grounded() {
            return false;
        }

        self.hit = true;
        self.cancel_behaviour_timers(clock);
        self.state = PedestrianState::Flying;
        self.can_be_stopped = false;
        self.flight = Flight {
            rotation_speed: vehicle_speed * COLLISION_ROTATION_FACTOR,
            ..Flight::default()
        };
        self.timers.scream = Some(clock.schedule(
            TimerKind::PauseImmune,
            SCREAM_DELAY,
            TimerEvent::Pedestrian(self.id, PedestrianTimer::ScreamCue),
        ));
        true
    }

    /// Advance movement. Grounded movement freezes while paused, flight does not.
    pub fn update(&mut self, delta_secs: f32, paused: bool) -> PedestrianUpdateResult {
        match self.state {
            PedestrianState::Despawned => PedestrianUpdateResult::Continue,
            PedestrianState::Flying => {
                self.fly(delta_secs);
                if self.flight.time > MAX_FLIGHT_TIME {
                    PedestrianUpdateResult::FlightExpired
                } else if self.is_out_of_bounds() {
                    PedestrianUpdateResult::ExitedPlayfield { unhit: false }
                } else {
                    PedestrianUpdateResult::Continue
                }
            }
            PedestrianState::Stopped | PedestrianState::RandomIdle => PedestrianUpdateResult::Continue,
            PedestrianState::Walking | PedestrianState::Sprinting => {
                if paused {
                    return PedestrianUpdateResult::Continue;
                }
                self.position.x += self.velocity_x() * delta_secs;
                if self.is_out_of_bounds() {
                    PedestrianUpdateResult::ExitedPlayfield { unhit: !self.hit }
                } else {
                    PedestrianUpdateResult::Continue
                }
            }
        }
    }

    fn fly(&mut self, delta_secs: f32) {
        let step = FLIGHT_SCALE_RATE * delta_secs;
        if self.flight.scaling_up {
            self.flight.scale += step;
            if self.flight.scale >= FLIGHT_MAX_SCALE {
                self.flight.scale = FLIGHT_MAX_SCALE;
                self.flight.scaling_up = false;
            }
        } else {
            self.flight.scale = (self.flight.scale - step).max(1.0);
        }

        self.flight.time += delta_secs;
        self.position.x += self.flight_direction * delta_secs;
        self.position.y -= FLIGHT_LIFT * delta_secs;
        self.flight.rotation += self.flight.rotation_speed * delta_secs;
    }

    pub fn is_out_of_bounds(&self) -> bool {
        let Position { x, y } = self.position;
        !(PEDESTRIAN_MIN_X..=PEDESTRIAN_MAX_X).contains(&x) || !(PEDESTRIAN_MIN_Y..=PEDESTRIAN_MAX_Y).contains(&y)
    }

    /// Move to the terminal state and drop every pending timer
    pub fn despawn(&mut self, clock: &mut Clock) {
        self.cancel_behaviour_timers(clock);
        clock.cancel_slot(&mut self.timers.scream);
        self.state = PedestrianState::Despawned;
    }

    fn cancel_behaviour_timers(&mut self, clock: &mut Clock) {
        clock.cancel_slot(&mut self.timers.stop);
        clock.cancel_slot(&mut self.timers.cooldown);
        clock.cancel_slot(&mut self.timers.sprint);
        clock.cancel_slot(&mut self.timers.idle);
    }
}

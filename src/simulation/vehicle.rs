//! Vehicle movement logic for the crossing simulation
//!
//! Vehicles drive straight down their lane. A row of forward probes decides
//! each tick whether to brake or accelerate back to top speed.

use strum_macros::{Display, EnumCount, EnumIter};

use super::types::{Position, Rect, VehicleId, SENSOR_RANGE, VEHICLE_DESPAWN_Y};

/// Number of forward sensor probes per vehicle
pub const PROBE_COUNT: usize = 5;

/// Lateral probe offsets as fractions of the body width
const PROBE_OFFSETS: [f32; PROBE_COUNT] = [-0.5, -0.25, 0.0, 0.25, 0.5];

/// The closed set of vehicle kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, Display)]
pub enum VehicleKind {
    Beetle,
    Beetle1,
    Beetle2,
    Beetle3,
    Sedan,
    Sedan1,
    Sedan2,
    Sedan3,
    Suv,
    Suv1,
    Suv2,
    Suv3,
    Bus,
    Bus1,
    Bus2,
    Sportscar,
}

/// Maps the speed ratio onto an engine sound pitch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchCurve {
    pub gain: f32,
    pub min: f32,
    pub max: f32,
}

impl PitchCurve {
    pub fn pitch(&self, speed: f32, top_speed: f32) -> f32 {
        if top_speed <= 0.0 {
            return self.min;
        }
        (speed / top_speed * self.gain).clamp(self.min, self.max)
    }
}

const COMPACT_PITCH: PitchCurve = PitchCurve {
    gain: 1.0,
    min: 0.4,
    max: 10.0,
};
const SUV_PITCH: PitchCurve = PitchCurve {
    gain: 1.0,
    min: 0.4,
    max: 0.8,
};
const BUS_PITCH: PitchCurve = PitchCurve {
    gain: 1.0,
    min: 0.5,
    max: 2.0,
};
const SPORTS_PITCH: PitchCurve = PitchCurve {
    gain: 3.0,
    min: 1.0,
    max: 5.0,
};

/// Per-kind tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleSpec {
    pub top_speed: f32,
    pub braking_force: f32,
    pub acceleration_force: f32,
    pub half_width: f32,
    pub half_length: f32,
    /// Whether the stop line is visible to this vehicle's sensors
    pub obeys_signal: bool,
    pub pitch: PitchCurve,
}

impl VehicleSpec {
    const fn car(top_speed: f32, braking_force: f32, acceleration_force: f32, pitch: PitchCurve) -> Self {
        Self {
            top_speed,
            braking_force,
            acceleration_force,
            half_width: 25.0,
            half_length: 50.0,
            obeys_signal: true,
            pitch,
        }
    }
}

impl VehicleKind {
    pub const BUSES: [VehicleKind; 3] = [VehicleKind::Bus, VehicleKind::Bus1, VehicleKind::Bus2];

    pub fn spec(self) -> VehicleSpec {
        match self {
            VehicleKind::Beetle => VehicleSpec::car(310.0, 950.0, 230.0, COMPACT_PITCH),
            VehicleKind::Beetle1 => VehicleSpec::car(315.0, 960.0, 235.0, COMPACT_PITCH),
            VehicleKind::Beetle2 => VehicleSpec::car(320.0, 970.0, 240.0, COMPACT_PITCH),
            VehicleKind::Beetle3 => VehicleSpec::car(330.0, 990.0, 250.0, COMPACT_PITCH),
            VehicleKind::Sedan => VehicleSpec::car(300.0, 1000.0, 200.0, COMPACT_PITCH),
            VehicleKind::Sedan1 => VehicleSpec::car(350.0, 1120.0, 260.0, COMPACT_PITCH),
            VehicleKind::Sedan2 => VehicleSpec::car(390.0, 1200.0, 270.0, COMPACT_PITCH),
            VehicleKind::Sedan3 => VehicleSpec::car(400.0, 1250.0, 290.0, COMPACT_PITCH),
            VehicleKind::Suv => VehicleSpec::car(330.0, 1000.0, 240.0, SUV_PITCH),
            VehicleKind::Suv1 => VehicleSpec::car(340.0, 1050.0, 250.0, SUV_PITCH),
            VehicleKind::Suv2 => VehicleSpec::car(360.0, 1080.0, 300.0, SUV_PITCH),
            VehicleKind::Suv3 => VehicleSpec::car(380.0, 1100.0, 350.0, SUV_PITCH),
            VehicleKind::Bus | VehicleKind::Bus1 | VehicleKind::Bus2 => VehicleSpec {
                half_width: 28.0,
                half_length: 80.0,
                ..VehicleSpec::car(300.0, 700.0, 150.0, BUS_PITCH)
            },
            VehicleKind::Sportscar => VehicleSpec {
                half_length: 45.0,
                obeys_signal: false,
                ..VehicleSpec::car(600.0, 2000.0, 500.0, SPORTS_PITCH)
            },
        }
    }

    pub fn is_bus(self) -> bool {
        VehicleKind::BUSES.contains(&self)
    }
}

/// A forward-looking probe, offset sideways from the vehicle's center line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorProbe {
    pub lateral_offset: f32,
    pub range: f32,
}

impl SensorProbe {
    /// True if the probe cast from `front` (front bumper center) touches `obstacle`
    pub fn detects(&self, front: Position, obstacle: &Rect) -> bool {
        let x = front.x + self.lateral_offset;
        obstacle.intersects_vertical_segment(x, front.y, front.y + self.range)
    }
}

/// Result of a vehicle update indicating what should happen to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleUpdateResult {
    Continue,
    Despawn,
}

/// A vehicle in the crossing simulation
#[derive(Debug, Clone)]
pub struct SimVehicle {
    pub id: VehicleId,
    pub kind: VehicleKind,
    /// Body center
    pub position: Position,
    pub speed: f32,
    pub top_speed: f32,
    pub braking_force: f32,
    pub acceleration_force: f32,
    pub probes: [SensorProbe; PROBE_COUNT],
    spec: VehicleSpec,
}

impl SimVehicle {
    pub fn new(id: VehicleId, kind: VehicleKind, position: Position) -> Self {
        let spec = kind.spec();
        let probe_width = spec.half_width * 2.0;
        let probes = PROBE_OFFSETS.map(|fraction| SensorProbe {
            lateral_offset: fraction * probe_width,
            range: SENSOR_RANGE,
        });

        Self {
            id,
            kind,
            position,
            speed: spec.top_speed,
            top_speed: spec.top_speed,
            braking_force: spec.braking_force,
            acceleration_force: spec.acceleration_force,
            probes,
            spec,
        }
    }

    pub fn obeys_signal(&self) -> bool {
        self.spec.obeys_signal
    }

    pub fn body(&self) -> Rect {
        Rect::centered(self.position, self.spec.half_width, self.spec.half_length)
    }

    /// Center of the front bumper
    pub fn front(&self) -> Position {
        Position::new(self.position.x, self.position.y + self.spec.half_length)
    }

    /// Whether any probe currently touches one of `obstacles`
    pub fn senses_obstacle<'a>(&self, obstacles: impl IntoIterator<Item = &'a Rect>) -> bool {
        let front = self.front();
        obstacles
            .into_iter()
            .any(|obstacle| self.probes.iter().any(|probe| probe.detects(front, obstacle)))
    }

    /// Brake or accelerate for one tick given this tick's sensor reading
    pub fn update_speed(&mut self, delta_secs: f32, obstacle_ahead: bool) {
        if obstacle_ahead {
            self.speed = (self.speed - self.braking_force * delta_secs).max(0.0);
        } else if self.speed < self.top_speed {
            self.speed = (self.speed + self.acceleration_force * delta_secs).clamp(0.0, self.top_speed);
        }
    }

    /// Move forward by the current speed and report whether the vehicle left the field
    pub fn advance(&mut self, delta_secs: f32) -> VehicleUpdateResult {
        self.position.y += self.speed * delta_secs;
        if self.position.y > VEHICLE_DESPAWN_Y {
            VehicleUpdateResult::Despawn
        } else {
            VehicleUpdateResult::Continue
        }
    }

    /// Sensor reading, speed update and movement in the required order
    pub fn update<'a>(
        &mut self,
        delta_secs: f32,
        obstacles: impl IntoIterator<Item = &'a Rect>,
    ) -> VehicleUpdateResult {
        let obstacle_ahead = self.senses_obstacle(obstacles);
        self.update_speed(delta_secs, obstacle_ahead);
        self.advance(delta_secs)
    }

    pub fn engine_pitch(&self) -> f32 {
        self.spec.pitch.pitch(self.speed, self.top_speed)
    }
}

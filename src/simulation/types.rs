//! Core types for the crossing simulation
//!
//! Identifiers, 2D geometry and the fixed playfield layout.

/// A unique identifier for simulation entities
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimId(pub usize);

/// A wrapper type for pedestrian IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PedestrianId(pub SimId);

/// A wrapper type for vehicle IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub SimId);

/// A 2D position on the playfield. `y` grows downwards, like screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned box used for bodies, hitboxes and tap areas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Position,
    pub max: Position,
}

impl Rect {
    pub fn new(min: Position, max: Position) -> Self {
        Self { min, max }
    }

    /// Box centered on `center` spanning `half_width`/`half_height` each way
    pub fn centered(center: Position, half_width: f32, half_height: f32) -> Self {
        Self {
            min: Position::new(center.x - half_width, center.y - half_height),
            max: Position::new(center.x + half_width, center.y + half_height),
        }
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    pub fn contains(&self, point: &Position) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// True if the vertical segment at `x` covering `y_from..=y_to` touches the box
    pub fn intersects_vertical_segment(&self, x: f32, y_from: f32, y_to: f32) -> bool {
        x >= self.min.x && x <= self.max.x && y_from <= self.max.y && y_to >= self.min.y
    }
}

/// Pedestrian spawn slots on the left edge (walk right)
pub const PEDESTRIAN_LEFT_SLOTS: [Position; 4] = [
    Position::new(-30.0, 497.0),
    Position::new(-30.0, 528.0),
    Position::new(-30.0, 560.0),
    Position::new(-30.0, 592.0),
];

/// Pedestrian spawn slots on the right edge (walk left)
pub const PEDESTRIAN_RIGHT_SLOTS: [Position; 3] = [
    Position::new(400.0, 512.0),
    Position::new(400.0, 544.0),
    Position::new(400.0, 576.0),
];

/// Spawn points with an x beyond this walk towards negative x
pub const PEDESTRIAN_RIGHT_SIDE_X: f32 = 399.0;

/// Vehicle lane spawn slots, both lanes drive towards +y
pub const VEHICLE_SLOTS: [Position; 2] = [Position::new(140.0, -400.0), Position::new(220.0, -400.0)];

/// Pedestrian playfield bounds; crossing any of them removes the pedestrian
pub const PEDESTRIAN_MIN_X: f32 = -40.0;
pub const PEDESTRIAN_MAX_X: f32 = 410.0;
pub const PEDESTRIAN_MIN_Y: f32 = -100.0;
pub const PEDESTRIAN_MAX_Y: f32 = 700.0;

/// Vehicles past this y are removed
pub const VEHICLE_DESPAWN_Y: f32 = 1500.0;

/// Minimum distance between a vehicle spawn slot and any live vehicle
pub const VEHICLE_SPAWN_SEPARATION: f32 = 50.0;

/// Stop line the vehicle sensors see while the car light is not green
pub const STOP_LINE: Rect = Rect {
    min: Position::new(100.0, 430.0),
    max: Position::new(260.0, 440.0),
};

/// How far ahead of the front bumper a sensor probe reaches
pub const SENSOR_RANGE: f32 = 80.0;

/// Half extents of a pedestrian body
pub const PEDESTRIAN_HALF_WIDTH: f32 = 8.0;
pub const PEDESTRIAN_HALF_HEIGHT: f32 = 16.0;

/// Half extents of the area that accepts taps on a pedestrian
pub const PEDESTRIAN_TAP_HALF_WIDTH: f32 = 20.0;
pub const PEDESTRIAN_TAP_HALF_HEIGHT: f32 = 28.0;

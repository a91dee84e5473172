//! Vehicle sensing and movement tests

use crosswalk::simulation::{
    is_slot_occupied, Position, Rect, SimId, SimVehicle, VehicleId, VehicleKind, VehicleUpdateResult,
    PROBE_COUNT, SENSOR_RANGE, STOP_LINE, VEHICLE_SLOTS,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strum::IntoEnumIterator;

fn vehicle(kind: VehicleKind, x: f32, y: f32) -> SimVehicle {
    SimVehicle::new(VehicleId(SimId(1)), kind, Position::new(x, y))
}

#[test]
fn test_vehicle_starts_at_top_speed() {
    for kind in VehicleKind::iter() {
        let car = vehicle(kind, 140.0, -400.0);
        assert_eq!(car.speed, car.top_speed, "{} should start at top speed", kind);
        assert!(car.braking_force > 0.0);
        assert!(car.acceleration_force > 0.0);
    }
}

#[test]
fn test_probes_span_the_body_width() {
    let car = vehicle(VehicleKind::Sedan, 140.0, 0.0);
    assert_eq!(car.probes.len(), PROBE_COUNT);

    let offsets: Vec<f32> = car.probes.iter().map(|probe| probe.lateral_offset).collect();
    assert_eq!(offsets, vec![-25.0, -12.5, 0.0, 12.5, 25.0]);
    assert!(car.probes.iter().all(|probe| probe.range == SENSOR_RANGE));
}

#[test]
fn test_senses_obstacle_within_range_only() {
    let car = vehicle(VehicleKind::Sedan, 140.0, 0.0);
    // Front bumper at y = 50, probes reach y = 130
    let near = Rect::centered(Position::new(140.0, 120.0), 25.0, 5.0);
    let far = Rect::centered(Position::new(140.0, 200.0), 25.0, 5.0);
    let behind = Rect::centered(Position::new(140.0, -100.0), 25.0, 5.0);
    let other_lane = Rect::centered(Position::new(220.0, 100.0), 25.0, 50.0);

    assert!(car.senses_obstacle([&near]));
    assert!(!car.senses_obstacle([&far]));
    assert!(!car.senses_obstacle([&behind]));
    assert!(!car.senses_obstacle([&other_lane]));
}

#[test]
fn test_edge_probe_catches_offset_obstacle() {
    let car = vehicle(VehicleKind::Sedan, 140.0, 0.0);
    // Only the right-most probe (x = 165) reaches this box
    let clipped = Rect::new(Position::new(160.0, 80.0), Position::new(200.0, 90.0));
    assert!(car.senses_obstacle([&clipped]));
}

#[test]
fn test_braking_clamps_at_zero() {
    let mut car = vehicle(VehicleKind::Sedan, 140.0, 0.0);
    car.update_speed(0.25, true);
    assert_eq!(car.speed, 300.0 - 1000.0 * 0.25);

    car.update_speed(1.0, true);
    assert_eq!(car.speed, 0.0);
}

#[test]
fn test_acceleration_clamps_at_top_speed() {
    let mut car = vehicle(VehicleKind::Sedan, 140.0, 0.0);
    car.speed = 0.0;
    car.update_speed(0.5, false);
    assert_eq!(car.speed, 100.0);

    car.update_speed(10.0, false);
    assert_eq!(car.speed, car.top_speed);
}

#[test]
fn test_speed_stays_in_range_for_any_sensor_readings() {
    let mut rng = StdRng::seed_from_u64(21);
    for kind in VehicleKind::iter() {
        let mut car = vehicle(kind, 140.0, -400.0);
        for step in 0..2000 {
            let delta = rng.random_range(0.0..0.5);
            let obstacle_ahead = rng.random_bool(0.5);
            car.update_speed(delta, obstacle_ahead);
            assert!(
                (0.0..=car.top_speed).contains(&car.speed),
                "{} speed {} out of range at step {}",
                kind,
                car.speed,
                step
            );
        }
    }
}

#[test]
fn test_update_reads_sensors_before_moving() {
    let mut car = vehicle(VehicleKind::Bus, 140.0, 0.0);
    let wall = Rect::centered(Position::new(140.0, 120.0), 30.0, 5.0);

    assert_eq!(car.update(0.25, [&wall]), VehicleUpdateResult::Continue);
    let braked = 300.0 - 700.0 * 0.25;
    assert_eq!(car.speed, braked);
    assert_eq!(car.position.y, braked * 0.25);
}

#[test]
fn test_vehicle_despawns_past_the_bottom() {
    let mut car = vehicle(VehicleKind::Sportscar, 220.0, 1400.0);
    assert_eq!(car.advance(0.1), VehicleUpdateResult::Continue);
    assert_eq!(car.advance(0.1), VehicleUpdateResult::Despawn);
}

#[test]
fn test_only_the_sportscar_runs_red_lights() {
    for kind in VehicleKind::iter() {
        let car = vehicle(kind, 140.0, 0.0);
        assert_eq!(car.obeys_signal(), kind != VehicleKind::Sportscar);
    }
}

#[test]
fn test_stopping_distance_fits_inside_sensor_range() {
    // Every signal-obeying vehicle must be able to stop before the line
    for kind in VehicleKind::iter().filter(|kind| kind.spec().obeys_signal) {
        let spec = kind.spec();
        let stopping = spec.top_speed * spec.top_speed / (2.0 * spec.braking_force);
        assert!(stopping < SENSOR_RANGE, "{} needs {} units to stop", kind, stopping);
    }
}

#[test]
fn test_vehicle_halts_before_stop_line() {
    let mut car = vehicle(VehicleKind::Sedan3, 140.0, 200.0);
    for _ in 0..256 {
        car.update(1.0 / 64.0, [&STOP_LINE]);
    }
    assert_eq!(car.speed, 0.0);
    assert!(car.front().y < STOP_LINE.min.y);
}

#[test]
fn test_engine_pitch_curves() {
    let mut sedan = vehicle(VehicleKind::Sedan, 140.0, 0.0);
    assert_eq!(sedan.engine_pitch(), 1.0);
    sedan.speed = 0.0;
    assert_eq!(sedan.engine_pitch(), 0.4);

    let suv = vehicle(VehicleKind::Suv, 140.0, 0.0);
    assert_eq!(suv.engine_pitch(), 0.8);

    let sports = vehicle(VehicleKind::Sportscar, 140.0, 0.0);
    assert_eq!(sports.engine_pitch(), 3.0);
}

#[test]
fn test_bus_rotation_kinds() {
    assert_eq!(VehicleKind::BUSES.len(), 3);
    assert!(VehicleKind::BUSES.iter().all(|kind| kind.is_bus()));
    assert!(!VehicleKind::Sedan.is_bus());
    assert!(VehicleKind::Bus.spec().half_length > VehicleKind::Sedan.spec().half_length);
}

#[test]
fn test_slot_occupancy_uses_spawn_separation() {
    let slot = VEHICLE_SLOTS[0];
    let close = Position::new(slot.x, slot.y + 49.0);
    let clear = Position::new(slot.x, slot.y + 51.0);
    let other_lane = VEHICLE_SLOTS[1];

    assert!(is_slot_occupied(slot, [close].into_iter()));
    assert!(!is_slot_occupied(slot, [clear, other_lane].into_iter()));
    assert!(!is_slot_occupied(slot, std::iter::empty()));
}

//! Entity spawner tests

use crosswalk::simulation::{
    pedestrian_pool, Clock, DifficultyTable, EntitySpawner, PedestrianKind, RosterEntry, TimerEvent,
    VehicleKind, VehicleRoster, VehicleSpawnAttempt, PEDESTRIAN_LEFT_SLOTS, PEDESTRIAN_RIGHT_SLOTS,
    VEHICLE_SLOTS,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn spawner(tier: usize) -> EntitySpawner {
    let table = DifficultyTable::default();
    EntitySpawner::new(&table, table.tier(tier).unwrap()).unwrap()
}

fn roster(tier: usize) -> VehicleRoster {
    let table = DifficultyTable::default();
    VehicleRoster::for_tier(&table, table.tier(tier).unwrap()).unwrap()
}

#[test]
fn test_elderly_unlock_at_tier_two() {
    let table = DifficultyTable::default();
    let early = pedestrian_pool(table.tier(1).unwrap());
    let late = pedestrian_pool(table.tier(2).unwrap());

    assert_eq!(early.len(), 4);
    assert!(!early.contains(&PedestrianKind::Grandma));
    assert_eq!(late.len(), 6);
    assert!(late.contains(&PedestrianKind::Grandpa));
}

#[test]
fn test_vehicle_roster_per_tier() {
    let early = roster(0);
    assert!(early.entries().contains(&(RosterEntry::BusRotation, 1)));
    assert!(!early
        .entries()
        .contains(&(RosterEntry::Fixed(VehicleKind::Sportscar), 1)));
    assert!(!early.entries().contains(&(RosterEntry::Fixed(VehicleKind::Bus), 1)));

    let unlocked = roster(2);
    assert!(unlocked
        .entries()
        .contains(&(RosterEntry::Fixed(VehicleKind::Sportscar), 1)));

    let top = roster(5);
    assert_eq!(top.entries(), &[(RosterEntry::Fixed(VehicleKind::Sportscar), 1)]);
}

#[test]
fn test_top_tier_only_spawns_sportscars() {
    let mut top = spawner(5);
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..50 {
        assert_eq!(top.choose_vehicle(&mut rng), VehicleKind::Sportscar);
    }
}

#[test]
fn test_empty_roster_is_rejected() {
    let table = DifficultyTable::default();
    assert!(VehicleRoster::from_entries(vec![], table.tier(0).unwrap()).is_err());
}

#[test]
fn test_buses_rotate_in_order() {
    let mut early = spawner(0);
    let buses: Vec<VehicleKind> = (0..4).map(|_| early.next_bus()).collect();
    assert_eq!(
        buses,
        vec![VehicleKind::Bus, VehicleKind::Bus1, VehicleKind::Bus2, VehicleKind::Bus]
    );
}

#[test]
fn test_start_schedules_both_loops() {
    let mut clock = Clock::new();
    let mut early = spawner(0);

    early.start(&mut clock, 10);
    assert!(early.is_running());
    assert_eq!(clock.pending_count(), 2);

    early.stop(&mut clock);
    assert!(!early.is_running());
    assert_eq!(clock.pending_count(), 0);
}

#[test]
fn test_start_without_quota_only_runs_vehicles() {
    let mut clock = Clock::new();
    let mut early = spawner(0);
    early.start(&mut clock, 0);

    let mut fired = Vec::new();
    while let Some((_, event)) = clock.pop_due() {
        fired.push(event);
    }
    assert_eq!(fired, vec![TimerEvent::SpawnVehicle]);
}

#[test]
fn test_pedestrian_loop_spends_quota() {
    let mut clock = Clock::new();
    let mut rng = StdRng::seed_from_u64(12);
    let mut early = spawner(0);
    let mut remaining = 2;
    early.start(&mut clock, remaining);

    let mut spawns = Vec::new();
    for _ in 0..20 {
        clock.advance(1.0);
        while let Some((_, event)) = clock.pop_due() {
            if event == TimerEvent::SpawnPedestrian {
                spawns.extend(early.next_pedestrian(&mut remaining, &mut clock, &mut rng));
            }
        }
    }

    assert_eq!(spawns.len(), 2);
    assert_eq!(remaining, 0);
    for spawn in &spawns {
        assert!(PEDESTRIAN_LEFT_SLOTS.contains(&spawn.position) || PEDESTRIAN_RIGHT_SLOTS.contains(&spawn.position));
        assert!(!spawn.kind.is_elderly());
    }

    // Quota spent: nothing left waiting
    assert_eq!(clock.pending_count(), 0);
    assert!(early.next_pedestrian(&mut remaining, &mut clock, &mut rng).is_none());
}

#[test]
fn test_pedestrian_interval_follows_tier() {
    let mut clock = Clock::new();
    let mut rng = StdRng::seed_from_u64(13);
    let mut early = spawner(0);
    let mut remaining = 5;
    early.start(&mut clock, remaining);
    early.stop(&mut clock);
    early.start(&mut clock, remaining);
    while clock.pop_due().is_some() {}

    early.next_pedestrian(&mut remaining, &mut clock, &mut rng);
    clock.advance(3.75);
    assert!(clock.pop_due().is_none());
    clock.advance(0.25);
    assert_eq!(clock.pop_due().map(|(_, event)| event), Some(TimerEvent::SpawnPedestrian));
}

#[test]
fn test_vehicle_loop_skips_occupied_slots() {
    let mut clock = Clock::new();
    let mut rng = StdRng::seed_from_u64(14);
    let mut early = spawner(0);
    early.start(&mut clock, 0);
    while clock.pop_due().is_some() {}

    let attempt = early.next_vehicle(&mut clock, &mut rng, |_| true);
    assert!(matches!(attempt, VehicleSpawnAttempt::SlotOccupied(slot) if VEHICLE_SLOTS.contains(&slot)));
    // The loop carries on regardless
    assert_eq!(clock.pending_count(), 1);

    match early.next_vehicle(&mut clock, &mut rng, |_| false) {
        VehicleSpawnAttempt::Spawn(spawn) => {
            assert!(VEHICLE_SLOTS.contains(&spawn.position));
            assert_ne!(spawn.kind, VehicleKind::Sportscar);
        }
        other => panic!("expected a spawn, got {:?}", other),
    }
}

#[test]
fn test_stopped_spawner_does_nothing() {
    let mut clock = Clock::new();
    let mut rng = StdRng::seed_from_u64(15);
    let mut early = spawner(0);
    let mut remaining = 3;

    assert!(early.next_pedestrian(&mut remaining, &mut clock, &mut rng).is_none());
    assert_eq!(remaining, 3);
    assert_eq!(
        early.next_vehicle(&mut clock, &mut rng, |_| false),
        VehicleSpawnAttempt::Stopped
    );
    assert_eq!(clock.pending_count(), 0);
}

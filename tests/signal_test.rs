//! Traffic signal cycle tests

use crosswalk::simulation::{
    Clock, DifficultyTable, SignalPhase, SimEvent, TimerEvent, TrafficSignal,
};

const DELTA: f32 = 0.25;

fn signal_for_tier(tier: usize) -> TrafficSignal {
    let table = DifficultyTable::default();
    TrafficSignal::new(table.signal_timings(table.tier(tier).unwrap()))
}

/// Advance for `secs`, dispatching signal timers, and collect the events
fn run(signal: &mut TrafficSignal, clock: &mut Clock, secs: f32) -> Vec<SimEvent> {
    let mut events = Vec::new();
    let steps = (secs / DELTA).round() as u32;
    for _ in 0..steps {
        clock.advance(DELTA);
        while let Some((_, event)) = clock.pop_due() {
            match event {
                TimerEvent::SignalPhaseElapsed => signal.on_phase_elapsed(clock, &mut events),
                TimerEvent::SignalBlinkWarning => signal.on_blink_warning(&mut events),
                _ => {}
            }
        }
    }
    events
}

#[test]
fn test_signal_starts_at_car_green() {
    let mut clock = Clock::new();
    let mut signal = signal_for_tier(0);
    signal.start(&mut clock);

    assert_eq!(signal.phase(), SignalPhase::CarGreen);
    assert!(signal.car_green());
    assert!(!signal.pedestrian_green());
    assert!(signal.is_running());
}

#[test]
fn test_full_cycle_at_tier_zero() {
    let mut clock = Clock::new();
    let mut signal = signal_for_tier(0);
    signal.start(&mut clock);

    // Car green lasts 3 seconds
    assert!(run(&mut signal, &mut clock, 2.75).is_empty());
    let events = run(&mut signal, &mut clock, 0.25);
    assert_eq!(
        events,
        vec![SimEvent::PhaseChanged {
            phase: SignalPhase::TransitioningToPedestrian
        }]
    );

    // Transition lasts 4 seconds
    let events = run(&mut signal, &mut clock, 4.0);
    assert_eq!(
        events,
        vec![
            SimEvent::PhaseChanged {
                phase: SignalPhase::PedestrianGreen
            },
            SimEvent::PedestrianLight { green: true },
        ]
    );

    // Blink warning 7 seconds into a 10 second pedestrian green
    assert!(run(&mut signal, &mut clock, 6.75).is_empty());
    assert!(!signal.is_blinking());
    assert_eq!(run(&mut signal, &mut clock, 0.25), vec![SimEvent::PedestrianLightBlink]);
    assert!(signal.is_blinking());

    let events = run(&mut signal, &mut clock, 3.0);
    assert_eq!(
        events,
        vec![
            SimEvent::PhaseChanged {
                phase: SignalPhase::TransitioningToCar
            },
            SimEvent::PedestrianLight { green: false },
        ]
    );
    assert!(!signal.is_blinking());

    let events = run(&mut signal, &mut clock, 4.0);
    assert_eq!(
        events,
        vec![SimEvent::PhaseChanged {
            phase: SignalPhase::CarGreen
        }]
    );
    assert_eq!(signal.completed_cycles(), 1);
}

#[test]
fn test_signal_keeps_cycling_while_paused() {
    let mut clock = Clock::new();
    let mut signal = signal_for_tier(0);
    signal.start(&mut clock);

    clock.set_paused(true);
    run(&mut signal, &mut clock, 3.0);
    assert_eq!(signal.phase(), SignalPhase::TransitioningToPedestrian);
}

#[test]
fn test_zero_length_phases_collapse_in_one_tick() {
    let mut clock = Clock::new();
    let mut signal = signal_for_tier(5);
    signal.start(&mut clock);

    run(&mut signal, &mut clock, 9.75);
    assert_eq!(signal.phase(), SignalPhase::CarGreen);

    let events = run(&mut signal, &mut clock, 0.25);
    assert_eq!(signal.phase(), SignalPhase::CarGreen);
    assert_eq!(signal.completed_cycles(), 1);
    assert!(events.contains(&SimEvent::PedestrianLight { green: true }));
    assert!(events.contains(&SimEvent::PedestrianLight { green: false }));
    assert_eq!(
        events.last(),
        Some(&SimEvent::PhaseChanged {
            phase: SignalPhase::CarGreen
        })
    );
}

#[test]
fn test_stop_cancels_pending_phase_timers() {
    let mut clock = Clock::new();
    let mut signal = signal_for_tier(0);
    signal.start(&mut clock);
    run(&mut signal, &mut clock, 8.0);
    assert_eq!(signal.phase(), SignalPhase::PedestrianGreen);

    signal.stop(&mut clock);
    assert!(!signal.is_running());
    assert_eq!(clock.pending_count(), 0);
    assert!(run(&mut signal, &mut clock, 30.0).is_empty());
}

#[test]
fn test_phase_sequence_wraps() {
    let mut phase = SignalPhase::CarGreen;
    let mut seen = Vec::new();
    for _ in 0..4 {
        phase = phase.next();
        seen.push(phase);
    }
    assert_eq!(
        seen,
        vec![
            SignalPhase::TransitioningToPedestrian,
            SignalPhase::PedestrianGreen,
            SignalPhase::TransitioningToCar,
            SignalPhase::CarGreen,
        ]
    );
}

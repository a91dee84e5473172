//! Traffic light cycle
//!
//! One perpetual four-phase cycle per round. Phase boundaries use
//! pause-immune timers so the lights keep changing behind a pause menu.

use super::clock::{Clock, TimerEvent, TimerId, TimerKind};
use super::difficulty::SignalTimings;
use super::events::SimEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalPhase {
    CarGreen,
    TransitioningToPedestrian,
    PedestrianGreen,
    TransitioningToCar,
}

impl SignalPhase {
    pub fn next(self) -> SignalPhase {
        match self {
            SignalPhase::CarGreen => SignalPhase::TransitioningToPedestrian,
            SignalPhase::TransitioningToPedestrian => SignalPhase::PedestrianGreen,
            SignalPhase::PedestrianGreen => SignalPhase::TransitioningToCar,
            SignalPhase::TransitioningToCar => SignalPhase::CarGreen,
        }
    }
}

/// The round's traffic light controller
#[derive(Debug, Clone)]
pub struct TrafficSignal {
    phase: SignalPhase,
    timings: SignalTimings,
    phase_timer: Option<TimerId>,
    blink_timer: Option<TimerId>,
    blinking: bool,
    completed_cycles: u32,
}

impl TrafficSignal {
    pub fn new(timings: SignalTimings) -> Self {
        Self {
            phase: SignalPhase::CarGreen,
            timings,
            phase_timer: None,
            blink_timer: None,
            blinking: false,
            completed_cycles: 0,
        }
    }

    pub fn phase(&self) -> SignalPhase {
        self.phase
    }

    pub fn timings(&self) -> SignalTimings {
        self.timings
    }

    pub fn car_green(&self) -> bool {
        self.phase == SignalPhase::CarGreen
    }

    pub fn pedestrian_green(&self) -> bool {
        self.phase == SignalPhase::PedestrianGreen
    }

    pub fn is_blinking(&self) -> bool {
        self.blinking
    }

    pub fn is_running(&self) -> bool {
        self.phase_timer.is_some()
    }

    pub fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    pub fn phase_duration(&self, phase: SignalPhase) -> f32 {
        match phase {
            SignalPhase::CarGreen => self.timings.car_green,
            SignalPhase::TransitioningToPedestrian | SignalPhase::TransitioningToCar => {
                self.timings.transition
            }
            SignalPhase::PedestrianGreen => self.timings.pedestrian_green,
        }
    }

    /// Begin the cycle at car green
    pub fn start(&mut self, clock: &mut Clock) {
        self.stop(clock);
        self.phase = SignalPhase::CarGreen;
        self.blinking = false;
        self.completed_cycles = 0;
        self.schedule_phase_end(clock);
    }

    pub fn stop(&mut self, clock: &mut Clock) {
        clock.cancel_slot(&mut self.phase_timer);
        clock.cancel_slot(&mut self.blink_timer);
    }

    /// The current phase ran out: move to the next one
    pub fn on_phase_elapsed(&mut self, clock: &mut Clock, out: &mut Vec<SimEvent>) {
        self.phase_timer = None;
        let leaving = self.phase;
        self.phase = leaving.next();
        out.push(SimEvent::PhaseChanged { phase: self.phase });

        match (leaving, self.phase) {
            (_, SignalPhase::PedestrianGreen) => {
                self.blinking = false;
                out.push(SimEvent::PedestrianLight { green: true });
                self.blink_timer = Some(clock.schedule(
                    TimerKind::PauseImmune,
                    self.timings.green_then_blink_split(),
                    TimerEvent::SignalBlinkWarning,
                ));
            }
            (SignalPhase::PedestrianGreen, _) => {
                clock.cancel_slot(&mut self.blink_timer);
                self.blinking = false;
                out.push(SimEvent::PedestrianLight { green: false });
            }
            (_, SignalPhase::CarGreen) => self.completed_cycles += 1,
            _ => {}
        }

        self.schedule_phase_end(clock);
    }

    pub fn on_blink_warning(&mut self, out: &mut Vec<SimEvent>) {
        self.blink_timer = None;
        if self.phase == SignalPhase::PedestrianGreen {
            self.blinking = true;
            out.push(SimEvent::PedestrianLightBlink);
        }
    }

    fn schedule_phase_end(&mut self, clock: &mut Clock) {
        let duration = self.phase_duration(self.phase);
        self.phase_timer = Some(clock.schedule(
            TimerKind::PauseImmune,
            duration,
            TimerEvent::SignalPhaseElapsed,
        ));
    }
}

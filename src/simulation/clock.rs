//! Frame clock and delayed-wake timers
//!
//! Every delayed continuation in the simulation (tap cooldowns, random
//! idles, spawn intervals, signal phases, HUD messages) is a timer here.
//! Timers live in one of two queues: pausable timers only count down while
//! the global pause flag is clear, pause-immune timers always count down.
//! The owning world pops due timers once per tick and dispatches them.

use ordered_float::OrderedFloat;
use std::collections::{BTreeMap, HashMap};

use super::types::PedestrianId;

/// Which queue a timer waits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Freezes while the simulation is paused
    Pausable,
    /// Keeps elapsing while the simulation is paused
    PauseImmune,
}

/// Handle for cancelling a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Per-pedestrian continuations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PedestrianTimer {
    /// A tap-stop ran its course
    StopEnded,
    /// The pedestrian may be stopped by a tap again
    StopCooldownReady,
    /// A double-tap speed boost ran out
    SprintEnded,
    /// Elderly pedestrians roll for a random idle
    IdleCheck,
    /// A random idle is over
    IdleEnded,
    /// Second half of the collision sound cue
    ScreamCue,
}

/// What happens when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Pedestrian(PedestrianId, PedestrianTimer),
    SpawnPedestrian,
    SpawnVehicle,
    SignalPhaseElapsed,
    SignalBlinkWarning,
    GetReadyFinished,
    DifficultyUpFinished,
    NewRecordFinished,
}

/// A single ordered queue of timers sharing one time base
#[derive(Debug, Default)]
struct TimerQueue {
    now: f32,
    entries: BTreeMap<(OrderedFloat<f32>, TimerId), TimerEvent>,
}

impl TimerQueue {
    fn pop_due(&mut self) -> Option<(TimerId, OrderedFloat<f32>, TimerEvent)> {
        let (&(wake, id), _) = self.entries.first_key_value()?;
        if wake.into_inner() > self.now {
            return None;
        }
        let event = self.entries.remove(&(wake, id))?;
        Some((id, wake, event))
    }
}

/// Process-wide frame clock owned by the simulation world
#[derive(Debug, Default)]
pub struct Clock {
    delta: f32,
    paused: bool,
    pausable: TimerQueue,
    immune: TimerQueue,
    /// Wake time and queue of every pending timer, for cancellation
    pending: HashMap<TimerId, (TimerKind, OrderedFloat<f32>)>,
    next_timer: u64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta of the last advance, zero while paused
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Real elapsed time, including time spent paused
    pub fn elapsed(&self) -> f32 {
        self.immune.now
    }

    /// Elapsed time excluding pauses
    pub fn game_time(&self) -> f32 {
        self.pausable.now
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Advance both time bases; the pausable one only when not paused
    pub fn advance(&mut self, delta_secs: f32) {
        let delta_secs = delta_secs.max(0.0);
        self.immune.now += delta_secs;
        if self.paused {
            self.delta = 0.0;
        } else {
            self.pausable.now += delta_secs;
            self.delta = delta_secs;
        }
    }

    /// Schedule `event` to fire `delay_secs` from now in the given queue
    pub fn schedule(&mut self, kind: TimerKind, delay_secs: f32, event: TimerEvent) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer += 1;

        let queue = self.queue_mut(kind);
        let wake = OrderedFloat(queue.now + delay_secs.max(0.0));
        queue.entries.insert((wake, id), event);
        self.pending.insert(id, (kind, wake));
        id
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let Some((kind, wake)) = self.pending.remove(&id) else {
            return false;
        };
        self.queue_mut(kind).entries.remove(&(wake, id)).is_some()
    }

    /// Cancel the timer in `slot` if there is one
    pub fn cancel_slot(&mut self, slot: &mut Option<TimerId>) {
        if let Some(id) = slot.take() {
            self.cancel(id);
        }
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.contains_key(&id)
    }

    /// Pop the next due timer. Pause-immune timers are drained first;
    /// pausable ones are held back entirely while paused.
    ///
    /// Handlers may schedule new timers while draining; a zero-delay timer
    /// scheduled this way is returned by a later call in the same tick.
    pub fn pop_due(&mut self) -> Option<(TimerId, TimerEvent)> {
        let (id, _, event) = match self.immune.pop_due() {
            Some(due) => due,
            None if self.paused => return None,
            None => self.pausable.pop_due()?,
        };
        self.pending.remove(&id);
        Some((id, event))
    }

    /// Number of timers still waiting
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.pausable.entries.clear();
        self.immune.entries.clear();
        self.pending.clear();
    }

    fn queue_mut(&mut self, kind: TimerKind) -> &mut TimerQueue {
        match kind {
            TimerKind::Pausable => &mut self.pausable,
            TimerKind::PauseImmune => &mut self.immune,
        }
    }
}

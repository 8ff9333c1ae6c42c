/// The game clock: one countdown tick per wall-clock second while a
/// run is live.
///
/// Cancellation is structural: the clock stops itself the moment the
/// world leaves the Playing phase, and a stopped clock never fires
/// again until it is re-armed for a new run. Pausing suspends the
/// cadence without accumulating catch-up ticks.
///
/// The wall-clock scheduling (`poll`) is separated from the countdown
/// transition itself (`tick`) so the state machine is testable without
/// sleeping.

use std::time::{Duration, Instant};

use super::event::GameEvent;
use super::world::{Outcome, Phase, WorldState};

/// Timer turns amber at this many remaining seconds.
pub const TIME_WARN: u32 = 30;
/// Timer goes critical (and the warning fires) at this many seconds.
pub const TIME_CRITICAL: u32 = 10;

pub struct GameClock {
    interval: Duration,
    last: Instant,
    stopped: bool,
}

impl GameClock {
    /// A clock with the standard 1-second cadence, initially stopped.
    pub fn new() -> Self {
        Self::with_interval(Duration::from_secs(1))
    }

    pub fn with_interval(interval: Duration) -> Self {
        GameClock {
            interval,
            last: Instant::now(),
            stopped: true,
        }
    }

    /// Start (or restart) the cadence for a fresh run.
    pub fn arm(&mut self) {
        self.last = Instant::now();
        self.stopped = false;
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    #[allow(dead_code)]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Service the clock from the frame loop. Fires `tick` for every
    /// full interval elapsed since the last poll.
    pub fn poll(&mut self, world: &mut WorldState) -> Vec<GameEvent> {
        if self.stopped {
            return vec![];
        }
        if world.phase != Phase::Playing {
            // The run ended through some other path (final delivery,
            // return to title): the recurring task must die with it.
            self.stop();
            return vec![];
        }
        if world.paused {
            self.last = Instant::now();
            return vec![];
        }

        let mut events: Vec<GameEvent> = Vec::new();
        while self.last.elapsed() >= self.interval {
            self.last += self.interval;
            events.extend(tick(world));
            if world.phase != Phase::Playing {
                self.stop();
                break;
            }
        }
        events
    }
}

/// Advance the countdown by one second. Phase-gated: a finished world
/// is never mutated, no matter who still holds a clock.
pub fn tick(world: &mut WorldState) -> Vec<GameEvent> {
    if world.phase != Phase::Playing {
        return vec![];
    }

    let mut events = vec![GameEvent::SecondElapsed];
    world.time_remaining = world.time_remaining.saturating_sub(1);

    if world.time_remaining == TIME_CRITICAL {
        events.push(GameEvent::TimeWarning { remaining: world.time_remaining });
    }
    if world.time_remaining == 0 {
        world.finish(Outcome::Defeat);
        events.push(GameEvent::TimeExpired);
    }
    events
}

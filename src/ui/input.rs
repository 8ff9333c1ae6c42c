/// Input tracker: the key → pressed/released map.
///
/// Terminal key events are drained once per frame into two views:
///   - held keys, for level-triggered input (movement)
///   - fresh presses, for edge-triggered input (grab/deliver, menus)
///
/// Terminals without the keyboard enhancement protocol never report
/// key release, so a held key also expires after a short timeout since
/// its last Press/Repeat event.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEventKind, KeyModifiers};

/// Without a Press/Repeat event for this long, the key counts as released.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

pub struct InputTracker {
    /// Timestamp of the last Press/Repeat event per key.
    held: HashMap<KeyCode, Instant>,
    /// Keys that went "not held" → "held" during the latest drain.
    fresh: Vec<KeyCode>,
    ctrl_c: bool,
}

impl InputTracker {
    pub fn new() -> Self {
        InputTracker {
            held: HashMap::with_capacity(16),
            fresh: Vec::with_capacity(8),
            ctrl_c: false,
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call once per frame, before the simulation step.
    pub fn drain_events(&mut self) {
        self.fresh.clear();
        self.ctrl_c = false;

        while poll(Duration::ZERO).unwrap_or(false) {
            let key = match event::read() {
                Ok(Event::Key(key)) => key,
                _ => continue,
            };

            if key.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
            {
                self.ctrl_c = true;
            }

            if key.kind == KeyEventKind::Release {
                self.held.remove(&key.code);
            } else {
                let was_held = self.held_now(key.code);
                self.held.insert(key.code, Instant::now());
                if !was_held {
                    self.fresh.push(key.code);
                }
            }
        }

        // Expire keys on terminals that never report Release
        let now = Instant::now();
        self.held.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    /// Is this key currently held? (continuous input)
    pub fn is_held(&self, code: KeyCode) -> bool {
        self.held_now(code)
    }

    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Did this key go down this frame? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh.contains(&code)
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// Ctrl-C seen this frame; always honored, in any phase.
    pub fn quit_requested(&self) -> bool {
        self.ctrl_c
    }

    fn held_now(&self, code: KeyCode) -> bool {
        self.held
            .get(&code)
            .map(|t| t.elapsed() < HOLD_TIMEOUT)
            .unwrap_or(false)
    }
}

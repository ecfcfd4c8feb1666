//! Time-windowed button debouncing
//!
//! Mechanical switches bounce; a bare level check would fire several
//! times per press. The debouncer tracks the last raw transition and
//! only commits a new stable level once the raw input has held still
//! for the full debounce window. Falling edges of the stable level are
//! reported as events (buttons idle HIGH behind pull-ups), at most one
//! per stable transition.

/// Debounced falling-edge detector for one input
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Debouncer {
    debounce_ms: u32,
    /// Raw level seen on the previous poll
    last_raw: bool,
    /// Timestamp of the last observed raw transition (ms)
    last_transition_ms: u64,
    /// Committed stable level
    stable: bool,
}

impl Debouncer {
    /// Create a debouncer with the given window and idle level
    pub fn new(debounce_ms: u32, initial_level: bool) -> Self {
        Self {
            debounce_ms,
            last_raw: initial_level,
            last_transition_ms: 0,
            stable: initial_level,
        }
    }

    /// Current committed stable level
    pub fn stable_level(&self) -> bool {
        self.stable
    }

    /// Feed one raw sample
    ///
    /// Returns the event timestamp when a stable HIGH→LOW transition
    /// commits: the first sample at which the raw level has been LOW
    /// and unchanged for the full debounce window. Bounces inside the
    /// window restart it; rising transitions commit silently.
    pub fn poll(&mut self, raw_level: bool, now_ms: u64) -> Option<u64> {
        if raw_level != self.last_raw {
            // Any raw transition restarts the stability window
            self.last_raw = raw_level;
            self.last_transition_ms = now_ms;
            return None;
        }

        if raw_level != self.stable
            && now_ms.saturating_sub(self.last_transition_ms) >= u64::from(self.debounce_ms)
        {
            let previous = self.stable;
            self.stable = raw_level;
            if previous && !raw_level {
                return Some(now_ms);
            }
        }

        None
    }
}

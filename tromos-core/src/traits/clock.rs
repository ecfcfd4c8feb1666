//! Monotonic clock trait
//!
//! Timestamps for readings, debouncing, and acquisition scheduling all
//! come from an injected clock so tests can simulate time without real
//! delays.

/// Trait for a monotonic millisecond clock
pub trait Clock {
    /// Milliseconds since some fixed origin (typically boot)
    ///
    /// Must be monotonically non-decreasing for the lifetime of the
    /// control loop.
    fn now_ms(&mut self) -> u64;
}

//! Display output trait

use crate::control::ControlState;
use crate::transform::Reading;

/// Trait for the display collaborator
///
/// Rendering is fire-and-forget: the core never consumes a return
/// value, and a broken display must not stall the control loop.
pub trait DisplaySink {
    /// Render the current state and most recent reading, if any
    fn render(&mut self, state: &ControlState, reading: Option<&Reading>);
}

/// No-op display for headless devices
impl DisplaySink for () {
    fn render(&mut self, _state: &ControlState, _reading: Option<&Reading>) {}
}

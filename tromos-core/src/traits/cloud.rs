//! Cloud variable binding trait
//!
//! Models the bidirectional variable sync of the hosting IoT stack:
//! the core publishes its state and latest reading once per tick, and
//! accepts external writes to setpoint / mode / manual output between
//! ticks. Connectivity details stay on the other side of this trait.

use crate::control::{ControlState, Mode};
use crate::transform::Reading;

/// An external write received from the cloud
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CloudCommand {
    /// New setpoint value
    SetSetpoint(f32),
    /// Switch between auto and manual
    SetMode(Mode),
    /// Drive the output directly (effective in manual mode only)
    SetOutput(bool),
}

/// Trait for the cloud sync collaborator
pub trait CloudLink {
    /// Publish the current state and reading (fire-and-forget)
    fn publish(&mut self, state: &ControlState, reading: Option<&Reading>);

    /// Pop the next pending external write, if any
    ///
    /// Called repeatedly at the start of each tick until it returns
    /// `None`, so queued writes apply before the next decision.
    fn poll(&mut self) -> Option<CloudCommand>;
}

/// No-op link for offline devices
impl CloudLink for () {
    fn publish(&mut self, _state: &ControlState, _reading: Option<&Reading>) {}

    fn poll(&mut self) -> Option<CloudCommand> {
        None
    }
}

//! Capability traits for hardware collaborators
//!
//! These traits define the interface between the control loop and the
//! hardware-specific implementations. Each one is deliberately narrow
//! so tests can substitute fakes, and a device that lacks a
//! collaborator can plug in the no-op `()` implementation.

pub mod actuator;
pub mod clock;
pub mod cloud;
pub mod display;
pub mod sensor;
pub mod storage;

pub use actuator::{ActuatorPin, Polarity};
pub use clock::Clock;
pub use cloud::{CloudCommand, CloudLink};
pub use display::DisplaySink;
pub use sensor::{SampleSource, SensorError};
pub use storage::{PreferenceStore, StorageError};

//! Sensor input drivers

pub mod motion;
pub mod thermistor;

pub use motion::{AccelReader, MotionProbe};
pub use thermistor::{AdcReader, ThermistorProbe};

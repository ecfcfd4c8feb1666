//! Actuator output drivers

pub mod relay;

pub use relay::{OutputPin, RelayPin};

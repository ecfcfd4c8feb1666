//! Board-agnostic core logic for the Tromos devices
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Capability traits for the hardware collaborators (sensor, relay,
//!   display, preference store, cloud link, clock)
//! - Fixed-window and burst-average sampling
//! - Signal transforms (band-limited spectral peak, thermistor Beta
//!   equation)
//! - Auto/manual actuation decision state
//! - Time-windowed button debouncing
//! - The polled control loop tying the above together

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod config;
pub mod control;
pub mod input;
pub mod pipeline;
pub mod sample;
pub mod traits;
pub mod transform;

//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the collaborator
//! traits defined in tromos-core for the hardware the two devices
//! actually carry:
//!
//! - Thermistor ADC channel (cooler temperature input)
//! - Accelerometer magnitude probe (tremor monitor input)
//! - Relay output pin
//!
//! Each driver is generic over a minimal platform trait (`AdcReader`,
//! `AccelReader`, `OutputPin`) so boards provide only the register
//! access, and hosts without hardware can substitute fakes.

#![no_std]
#![deny(unsafe_code)]

pub mod output;
pub mod sensor;

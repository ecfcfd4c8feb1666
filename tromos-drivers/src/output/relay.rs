//! Relay output pin
//!
//! Dumb level adapter over a GPIO pin. Whether LOW means energized is
//! board wiring, and the core's configured polarity owns that mapping;
//! this driver never inverts anything.

use tromos_core::traits::ActuatorPin;

/// Trait for GPIO pin abstraction
pub trait OutputPin {
    /// Set the pin high
    fn set_high(&mut self);

    /// Set the pin low
    fn set_low(&mut self);

    /// Check if the pin is set high
    fn is_set_high(&self) -> bool;
}

/// Relay control over a GPIO pin
pub struct RelayPin<P> {
    pin: P,
}

impl<P: OutputPin> RelayPin<P> {
    /// Wrap a GPIO pin
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Access the underlying pin
    pub fn pin_mut(&mut self) -> &mut P {
        &mut self.pin
    }
}

impl<P: OutputPin> ActuatorPin for RelayPin<P> {
    fn set_level(&mut self, high: bool) {
        if high {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }

    fn level(&self) -> bool {
        self.pin.is_set_high()
    }
}

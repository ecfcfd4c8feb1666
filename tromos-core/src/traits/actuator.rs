//! Actuator output trait
//!
//! The output collaborator is a dumb electrical level. Whether a relay
//! energizes on HIGH or LOW is a property of the board, so the core
//! owns the polarity mapping and the pin just drives what it is told.

/// Electrical polarity of the actuator output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Polarity {
    /// Output is ON when the pin is driven HIGH
    #[default]
    ActiveHigh,
    /// Output is ON when the pin is driven LOW (relay boards, SSRs)
    ActiveLow,
}

impl Polarity {
    /// Map a logical on/off command to the raw pin level
    pub fn level_for(self, on: bool) -> bool {
        match self {
            Polarity::ActiveHigh => on,
            Polarity::ActiveLow => !on,
        }
    }
}

/// Trait for the raw actuator output pin
pub trait ActuatorPin {
    /// Drive the pin to the given electrical level (true = HIGH)
    fn set_level(&mut self, high: bool);

    /// Current electrical level of the pin
    fn level(&self) -> bool;
}

/// No-op actuator for devices without an output (e.g. the tremor monitor)
impl ActuatorPin for () {
    fn set_level(&mut self, _high: bool) {}

    fn level(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_low_inverts_command() {
        assert!(!Polarity::ActiveLow.level_for(true));
        assert!(Polarity::ActiveLow.level_for(false));
        assert!(Polarity::ActiveHigh.level_for(true));
        assert!(!Polarity::ActiveHigh.level_for(false));
    }
}

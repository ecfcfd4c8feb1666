//! Actuation decision state
//!
//! All actuator and reporting behavior is a function of the current
//! `ControlState` and the latest reading. In auto mode the output is a
//! pure threshold of reading vs setpoint; in manual mode only explicit
//! toggles move it. Sensor readings are still recorded in manual mode
//! but never affect the command.
//!
//! The auto threshold deliberately has no hysteresis band, matching the
//! deployed units. Near the setpoint this can chatter the relay; left
//! as-is pending field data (see DESIGN.md).

use crate::config::ControlConfig;
use crate::traits::{PreferenceStore, StorageError};
use crate::transform::{Derived, Reading};

/// Preference key for the setpoint
pub const KEY_SETPOINT: &str = "setTemp";
/// Preference key for the mode (stored as bool, true = auto)
pub const KEY_MODE: &str = "Mode";
/// Preference key for the output command
pub const KEY_OUTPUT: &str = "Cooler";

/// Control mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Output follows the setpoint threshold
    #[default]
    Auto,
    /// Output follows explicit toggles only
    Manual,
}

impl Mode {
    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            Mode::Auto => Mode::Manual,
            Mode::Manual => Mode::Auto,
        }
    }
}

/// Band classification of a spectral reading
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TremorStatus {
    /// A dominant in-band frequency was found
    Detected { hz: f32, magnitude: f32 },
    /// Nothing in-band rose above the noise floor
    NotDetected,
}

/// Classify a derived value as tremor present/absent
///
/// Temperature readings have no band classification.
pub fn classify(derived: &Derived) -> Option<TremorStatus> {
    match *derived {
        Derived::DominantFrequency { hz, magnitude } => {
            Some(TremorStatus::Detected { hz, magnitude })
        }
        Derived::NoDominantFrequency => Some(TremorStatus::NotDetected),
        Derived::Temperature(_) => None,
    }
}

/// Mutable control record carried through the loop
///
/// Loaded from the preference store at startup, mutated by the decision
/// logic and manual overrides, persisted on change by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlState {
    /// Actuation threshold
    pub setpoint: f32,
    /// Auto or manual
    pub mode: Mode,
    /// Current output command (true = actuator on)
    pub output_on: bool,
    /// Timestamp of the last mutation (ms)
    pub last_change_ms: u64,
}

impl ControlState {
    /// Fresh state: auto mode, output off
    pub fn new(setpoint: f32) -> Self {
        Self {
            setpoint,
            mode: Mode::Auto,
            output_on: false,
            last_change_ms: 0,
        }
    }

    /// Restore persisted state, falling back to configured defaults
    pub fn load(store: &mut impl PreferenceStore, config: &ControlConfig) -> Self {
        let setpoint = store.get_f32(KEY_SETPOINT, config.default_setpoint);
        let auto = store.get_bool(KEY_MODE, true);
        let output_on = store.get_bool(KEY_OUTPUT, false);
        Self {
            setpoint,
            mode: if auto { Mode::Auto } else { Mode::Manual },
            output_on,
            last_change_ms: 0,
        }
    }

    /// Persist all fields
    pub fn save(&self, store: &mut impl PreferenceStore) -> Result<(), StorageError> {
        store.put_f32(KEY_SETPOINT, self.setpoint)?;
        store.put_bool(KEY_MODE, self.mode == Mode::Auto)?;
        store.put_bool(KEY_OUTPUT, self.output_on)
    }

    /// Apply a reading to the auto threshold
    ///
    /// ON iff reading > setpoint, strictly; equality turns the output
    /// off. No-op in manual mode or for non-temperature readings.
    /// Returns true if the command changed.
    pub fn apply_reading(&mut self, reading: &Reading) -> bool {
        if self.mode != Mode::Auto {
            return false;
        }
        let Derived::Temperature(value) = reading.derived else {
            return false;
        };
        let desired = value > self.setpoint;
        if desired != self.output_on {
            self.output_on = desired;
            self.last_change_ms = reading.timestamp_ms;
            true
        } else {
            false
        }
    }

    /// Switch between auto and manual
    ///
    /// The output command is preserved across the transition; in manual
    /// mode it then stays wherever it was until an explicit toggle.
    pub fn toggle_mode(&mut self, now_ms: u64) {
        self.mode = self.mode.toggled();
        self.last_change_ms = now_ms;
    }

    /// Set the mode directly (cloud write)
    pub fn set_mode(&mut self, mode: Mode, now_ms: u64) -> bool {
        if self.mode != mode {
            self.mode = mode;
            self.last_change_ms = now_ms;
            true
        } else {
            false
        }
    }

    /// Explicit manual output toggle; ignored in auto mode
    pub fn toggle_output(&mut self, now_ms: u64) -> bool {
        if self.mode != Mode::Manual {
            return false;
        }
        self.output_on = !self.output_on;
        self.last_change_ms = now_ms;
        true
    }

    /// Drive the output directly (cloud write); ignored in auto mode
    pub fn set_output(&mut self, on: bool, now_ms: u64) -> bool {
        if self.mode != Mode::Manual || self.output_on == on {
            return false;
        }
        self.output_on = on;
        self.last_change_ms = now_ms;
        true
    }

    /// Change the setpoint
    pub fn set_setpoint(&mut self, setpoint: f32, now_ms: u64) -> bool {
        if self.setpoint != setpoint {
            self.setpoint = setpoint;
            self.last_change_ms = now_ms;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temperature(value: f32, at_ms: u64) -> Reading {
        Reading {
            derived: Derived::Temperature(value),
            timestamp_ms: at_ms,
        }
    }

    #[test]
    fn auto_threshold_is_strict() {
        let mut state = ControlState::new(25.0);

        assert!(state.apply_reading(&temperature(25.1, 10)));
        assert!(state.output_on);
        assert_eq!(state.last_change_ms, 10);

        // Equality turns the output off, no hysteresis
        assert!(state.apply_reading(&temperature(25.0, 20)));
        assert!(!state.output_on);

        // Same decision again: no change reported
        assert!(!state.apply_reading(&temperature(24.0, 30)));
    }

    #[test]
    fn manual_mode_ignores_readings() {
        let mut state = ControlState::new(25.0);
        state.mode = Mode::Manual;
        state.output_on = true;

        assert!(!state.apply_reading(&temperature(10.0, 5)));
        assert!(state.output_on);
    }

    #[test]
    fn mode_toggle_preserves_output() {
        let mut state = ControlState::new(25.0);
        state.apply_reading(&temperature(30.0, 1));
        assert!(state.output_on);

        state.toggle_mode(2);
        assert_eq!(state.mode, Mode::Manual);
        assert!(state.output_on, "output must hold across the transition");

        assert!(state.toggle_output(3));
        assert!(!state.output_on);
    }

    #[test]
    fn output_toggle_requires_manual_mode() {
        let mut state = ControlState::new(25.0);
        assert!(!state.toggle_output(1));
        assert!(!state.set_output(true, 2));
        assert!(!state.output_on);
    }

    #[test]
    fn spectral_readings_classify_but_do_not_actuate() {
        let mut state = ControlState::new(25.0);
        let reading = Reading {
            derived: Derived::DominantFrequency {
                hz: 5.0,
                magnitude: 40.0,
            },
            timestamp_ms: 7,
        };
        assert!(!state.apply_reading(&reading));
        assert!(matches!(
            classify(&reading.derived),
            Some(TremorStatus::Detected { .. })
        ));
        assert_eq!(
            classify(&Derived::NoDominantFrequency),
            Some(TremorStatus::NotDetected)
        );
        assert_eq!(classify(&Derived::Temperature(20.0)), None);
    }

    #[test]
    fn load_falls_back_to_defaults() {
        let state = ControlState::load(&mut (), &ControlConfig::default());
        assert_eq!(state.setpoint, 25.0);
        assert_eq!(state.mode, Mode::Auto);
        assert!(!state.output_on);
    }
}

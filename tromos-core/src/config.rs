//! Configuration type definitions
//!
//! Configuration is validated once at construction; the control loop
//! itself never re-checks it. Defaults mirror the reference hardware:
//! a 10 kΩ / B=3950 thermistor divider on a 12-bit ADC, and a 256-point
//! FFT over a 100 Hz accelerometer stream.

use crate::traits::Polarity;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum samples per acquisition window
pub const MAX_SAMPLES: usize = 1024;

/// Errors detected during configuration validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// FFT window length must be a power of two
    WindowNotPowerOfTwo { samples: usize },
    /// Window length outside the supported FFT size set
    WindowUnsupported { samples: usize },
    /// Burst length must be 1..=MAX_SAMPLES
    BurstLengthInvalid { samples: usize },
    /// Sampling rate must be non-zero
    ZeroSampleRate,
    /// Frequency band must satisfy 0 <= low < high <= Fs/2 and span
    /// at least one FFT bin
    BandOutOfRange,
    /// Divider constants must be positive (supply, resistances, Beta)
    InvalidDivider,
    /// Transform window length does not match the sampler window
    WindowMismatch { expected: usize, got: usize },
}

/// How the sampler fills its buffer each acquisition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AcquisitionMode {
    /// Read `samples` readings paced at the sampling rate, blocking the
    /// tick for the whole window (FFT use case; power of two)
    Window { samples: usize },
    /// Read a small fixed count with a fixed inter-sample delay to
    /// denoise a single reading (thermistor use case)
    Burst { samples: usize, spacing_ms: u32 },
}

/// Sampler configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SamplerConfig {
    /// Sampling rate for window acquisition (Hz)
    pub sample_rate_hz: u32,
    /// Acquisition mode
    pub mode: AcquisitionMode,
}

impl SamplerConfig {
    /// 256 samples at 100 Hz, the tremor monitor window
    pub fn tremor_window() -> Self {
        Self {
            sample_rate_hz: 100,
            mode: AcquisitionMode::Window { samples: 256 },
        }
    }

    /// 10-sample burst at 5 ms spacing, the thermistor denoise burst
    pub fn thermistor_burst() -> Self {
        Self {
            sample_rate_hz: 100,
            mode: AcquisitionMode::Burst {
                samples: 10,
                spacing_ms: 5,
            },
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate_hz == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        match self.mode {
            AcquisitionMode::Window { samples } => {
                if samples == 0 || !samples.is_power_of_two() {
                    return Err(ConfigError::WindowNotPowerOfTwo { samples });
                }
                if samples > MAX_SAMPLES {
                    return Err(ConfigError::WindowUnsupported { samples });
                }
            }
            AcquisitionMode::Burst { samples, .. } => {
                if samples == 0 || samples > MAX_SAMPLES {
                    return Err(ConfigError::BurstLengthInvalid { samples });
                }
            }
        }
        Ok(())
    }

    /// Inter-sample period for window acquisition (µs)
    pub fn sample_period_us(&self) -> u32 {
        1_000_000 / self.sample_rate_hz
    }
}

/// Spectral transform configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpectralConfig {
    /// Sampling rate of the input window (Hz)
    pub sample_rate_hz: f32,
    /// FFT window length (power of two)
    pub samples: usize,
    /// Lower edge of the search band (Hz)
    pub band_low_hz: f32,
    /// Upper edge of the search band (Hz)
    pub band_high_hz: f32,
    /// Magnitudes at or below this are reported as no dominant frequency
    pub noise_floor: f32,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        // Parkinsonian tremor band
        Self {
            sample_rate_hz: 100.0,
            samples: 256,
            band_low_hz: 4.0,
            band_high_hz: 6.0,
            noise_floor: 10.0,
        }
    }
}

/// Thermistor divider configuration
///
/// Circuit: V_SUPPLY -- R_FIXED -- ADC_PIN -- NTC -- GND, with the ADC
/// measuring the voltage across the thermistor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ThermalConfig {
    /// Measured supply voltage (V); battery sag makes this < nominal
    pub supply_v: f32,
    /// Fixed divider resistor (Ω)
    pub r_fixed_ohms: f32,
    /// Thermistor Beta coefficient (K)
    pub beta: f32,
    /// Reference temperature (K)
    pub t0_kelvin: f32,
    /// Thermistor resistance at the reference temperature (Ω)
    pub r0_ohms: f32,
    /// Calibration offset subtracted from the computed temperature (°C)
    pub offset_c: f32,
    /// Full-scale ADC code (4095 for a 12-bit ADC)
    pub adc_max: u16,
}

impl Default for ThermalConfig {
    fn default() -> Self {
        Self {
            supply_v: 3.1,
            r_fixed_ohms: 10_000.0,
            beta: 3950.0,
            t0_kelvin: 298.15,
            r0_ohms: 10_000.0,
            offset_c: 4.2,
            adc_max: 4095,
        }
    }
}

impl ThermalConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = self.supply_v > 0.0
            && self.r_fixed_ohms > 0.0
            && self.beta > 0.0
            && self.t0_kelvin > 0.0
            && self.r0_ohms > 0.0
            && self.adc_max > 0;
        if positive {
            Ok(())
        } else {
            Err(ConfigError::InvalidDivider)
        }
    }
}

/// Control loop configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlConfig {
    /// Setpoint used when the preference store has no saved value
    pub default_setpoint: f32,
    /// Actuator output polarity
    pub polarity: Polarity,
    /// Button debounce window (ms)
    pub debounce_ms: u32,
    /// Minimum interval between acquisitions (ms); 0 = every tick
    pub read_interval_ms: u32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            default_setpoint: 25.0,
            polarity: Polarity::ActiveLow,
            debounce_ms: 50,
            read_interval_ms: 1000,
        }
    }
}

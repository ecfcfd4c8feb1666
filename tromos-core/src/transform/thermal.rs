//! Thermistor Beta-equation transform
//!
//! Converts a burst-averaged ADC code into °C: supply-compensated
//! divider voltage, thermistor resistance, then the simplified
//! Steinhart-Hart (Beta) equation, minus a fixed calibration offset.
//! Open- and short-circuit divider conditions are reported as sensor
//! faults instead of propagating infinities through the math.

use crate::config::{ConfigError, ThermalConfig};
use crate::sample::SampleBuffer;
use crate::traits::SensorError;
use crate::transform::{Derived, Reading, Transform, TransformError};

/// Kelvin offset for 0 °C
const KELVIN_AT_ZERO_C: f32 = 273.15;

/// Thermistor voltage-divider temperature converter
pub struct ThermalConverter {
    config: ThermalConfig,
}

impl ThermalConverter {
    /// Create a converter, validating the divider constants
    pub fn new(config: ThermalConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Convert one ADC code (possibly fractional, from averaging) to °C
    pub fn convert(&self, adc_code: f32) -> Result<f32, SensorError> {
        let c = &self.config;
        if adc_code < 0.0 || adc_code > c.adc_max as f32 {
            return Err(SensorError::OutOfRange);
        }

        let voltage = adc_code * c.supply_v / c.adc_max as f32;

        // Voltage at the supply rail means the thermistor leg is open:
        // the divider denominator would be zero.
        if voltage >= c.supply_v {
            return Err(SensorError::OpenCircuit);
        }
        // Zero voltage means the thermistor is shorted; ln(0) below.
        if voltage <= 0.0 {
            return Err(SensorError::ShortCircuit);
        }

        let resistance = voltage * c.r_fixed_ohms / (c.supply_v - voltage);
        let inv_kelvin = 1.0 / c.t0_kelvin + libm::logf(resistance / c.r0_ohms) / c.beta;
        if inv_kelvin <= 0.0 {
            return Err(SensorError::OutOfRange);
        }

        Ok(1.0 / inv_kelvin - KELVIN_AT_ZERO_C - c.offset_c)
    }
}

impl Transform for ThermalConverter {
    fn expected_len(&self) -> Option<usize> {
        None
    }

    fn apply(&self, samples: &SampleBuffer, timestamp_ms: u64) -> Result<Reading, TransformError> {
        if samples.is_empty() {
            return Err(TransformError::EmptyBuffer);
        }
        let mut sum = 0.0f32;
        for &v in samples.iter() {
            sum += v;
        }
        let averaged = sum / samples.len() as f32;
        let celsius = self.convert(averaged)?;
        Ok(Reading {
            derived: Derived::Temperature(celsius),
            timestamp_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_converter() -> ThermalConverter {
        ThermalConverter::new(ThermalConfig::default()).unwrap()
    }

    #[test]
    fn midscale_adc_matches_closed_form() {
        let converter = reference_converter();
        let celsius = converter.convert(2048.0).unwrap();

        // Same equation, computed independently
        let voltage = 2048.0 * 3.1 / 4095.0;
        let resistance = voltage * 10_000.0 / (3.1 - voltage);
        let kelvin = 1.0 / (1.0 / 298.15 + libm::logf(resistance / 10_000.0) / 3950.0);
        let expected = kelvin - 273.15 - 4.2;

        assert!(
            libm::fabsf(celsius - expected) < 1e-4,
            "{celsius} vs {expected}"
        );
        // Just above midscale on a 10k/10k divider: a hair over 25 °C
        // before the 4.2 °C calibration offset
        assert!(celsius > 20.0 && celsius < 22.0, "implausible: {celsius}");
    }

    #[test]
    fn full_scale_adc_is_open_circuit() {
        let converter = reference_converter();
        assert_eq!(
            converter.convert(4095.0).err(),
            Some(SensorError::OpenCircuit)
        );
    }

    #[test]
    fn zero_adc_is_short_circuit() {
        let converter = reference_converter();
        assert_eq!(converter.convert(0.0).err(), Some(SensorError::ShortCircuit));
    }

    #[test]
    fn out_of_range_code_rejected() {
        let converter = reference_converter();
        assert_eq!(
            converter.convert(5000.0).err(),
            Some(SensorError::OutOfRange)
        );
    }

    #[test]
    fn burst_average_feeds_conversion() {
        let converter = reference_converter();
        let mut buffer = SampleBuffer::new();
        for v in [2000.0f32, 2048.0, 2096.0] {
            buffer.push(v).unwrap();
        }
        let reading = converter.apply(&buffer, 42).unwrap();
        let expected = converter.convert(2048.0).unwrap();
        match reading.derived {
            Derived::Temperature(t) => {
                assert!(libm::fabsf(t - expected) < 0.05);
            }
            other => panic!("expected temperature, got {other:?}"),
        }
        assert_eq!(reading.timestamp_ms, 42);
    }

    #[test]
    fn empty_buffer_rejected() {
        let converter = reference_converter();
        let buffer = SampleBuffer::new();
        assert_eq!(
            converter.apply(&buffer, 0).err(),
            Some(TransformError::EmptyBuffer)
        );
    }
}

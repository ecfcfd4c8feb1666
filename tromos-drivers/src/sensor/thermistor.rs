//! Thermistor ADC channel
//!
//! Hands the raw ADC code to the core; the voltage-divider math and the
//! open/short guard rails live in the core's thermal transform, which
//! knows the divider constants.

use tromos_core::traits::{SampleSource, SensorError};

/// ADC reading trait for platform abstraction
pub trait AdcReader {
    /// Read ADC value (12-bit, 0-4095)
    #[allow(clippy::result_unit_err)]
    fn read(&mut self) -> Result<u16, ()>;
}

/// Thermistor divider ADC channel
pub struct ThermistorProbe<ADC> {
    adc: ADC,
}

impl<ADC: AdcReader> ThermistorProbe<ADC> {
    /// Create a probe over an ADC channel
    pub fn new(adc: ADC) -> Self {
        Self { adc }
    }

    /// Access the underlying ADC
    pub fn adc_mut(&mut self) -> &mut ADC {
        &mut self.adc
    }
}

impl<ADC: AdcReader> SampleSource for ThermistorProbe<ADC> {
    fn read_raw(&mut self) -> Result<f32, SensorError> {
        self.adc
            .read()
            .map(f32::from)
            .map_err(|()| SensorError::Unavailable)
    }
}

//! Raw sensor input trait

/// Errors that can occur when reading a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Sensor did not respond (bus error, not initialized)
    Unavailable,
    /// Sensor disconnected (open circuit)
    OpenCircuit,
    /// Sensor shorted to ground
    ShortCircuit,
    /// Reading outside the expected range
    OutOfRange,
    /// ADC conversion error
    ConversionError,
}

/// Trait for raw sensor input
///
/// Implementations wrap the actual transducer (thermistor ADC channel,
/// accelerometer, ...) and hand back one raw scalar per call. The core
/// never assumes a read succeeds; a failed read suppresses actuation
/// decisions for the tick.
pub trait SampleSource {
    /// Read one raw sample
    ///
    /// For an ADC-backed source this is the raw ADC code as `f32`; for
    /// an accelerometer it is the acceleration magnitude.
    ///
    /// Takes `&mut self` because sensor reads typically require mutable
    /// access to the bus.
    fn read_raw(&mut self) -> Result<f32, SensorError>;

    /// Check if the sensor currently produces valid readings
    fn is_healthy(&mut self) -> bool {
        self.read_raw().is_ok()
    }
}

//! Signal transforms
//!
//! A transform turns a raw sample buffer into one decision-relevant
//! value. Two variants exist: the band-limited spectral peak for the
//! tremor monitor, and the thermistor Beta-equation conversion for the
//! cooler.

pub mod spectral;
pub mod thermal;

pub use spectral::SpectralAnalyzer;
pub use thermal::ThermalConverter;

use crate::sample::SampleBuffer;
use crate::traits::SensorError;

/// Value derived from one acquisition
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Derived {
    /// Temperature in °C
    Temperature(f32),
    /// Strongest in-band spectral peak
    DominantFrequency { hz: f32, magnitude: f32 },
    /// No in-band magnitude rose above the noise floor
    ///
    /// A valid classification, deliberately distinct from a peak with
    /// zero magnitude.
    NoDominantFrequency,
}

/// One immutable derived reading with its acquisition timestamp
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reading {
    pub derived: Derived,
    pub timestamp_ms: u64,
}

/// Errors from applying a transform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransformError {
    /// Underlying sensor fault detected from the data itself
    Sensor(SensorError),
    /// Buffer length does not match the configured window
    WindowMismatch { expected: usize, got: usize },
    /// Transform was handed an empty buffer
    EmptyBuffer,
}

impl From<SensorError> for TransformError {
    fn from(e: SensorError) -> Self {
        TransformError::Sensor(e)
    }
}

/// Capability for converting raw samples into a derived reading
pub trait Transform {
    /// Exact buffer length this transform requires, if fixed
    fn expected_len(&self) -> Option<usize>;

    /// Convert one acquisition into a reading
    fn apply(&self, samples: &SampleBuffer, timestamp_ms: u64) -> Result<Reading, TransformError>;
}

//! Sample acquisition
//!
//! The sampler owns its buffer exclusively and overwrites it on every
//! acquisition. Window acquisition blocks the tick for the whole
//! window; burst acquisition blocks only for the small fixed burst.
//! A failed raw read aborts the acquisition with the sensor error -
//! the buffer is never silently zero-filled.

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use crate::config::{AcquisitionMode, ConfigError, SamplerConfig, MAX_SAMPLES};
use crate::traits::{SampleSource, SensorError};

/// Fixed-capacity buffer of raw readings, ordered oldest first
pub type SampleBuffer = Vec<f32, MAX_SAMPLES>;

/// Periodic sample acquisition over a raw sensor source
pub struct Sampler<S> {
    source: S,
    config: SamplerConfig,
    buffer: SampleBuffer,
}

impl<S: SampleSource> Sampler<S> {
    /// Create a sampler, validating the configuration
    pub fn new(source: S, config: SamplerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            source,
            config,
            buffer: Vec::new(),
        })
    }

    /// Acquisition configuration
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Access the underlying source
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Fill the buffer with one acquisition
    ///
    /// Returns a borrow of the freshly filled buffer. On error the
    /// buffer contents are unspecified and must not be consumed.
    pub fn acquire(&mut self, delay: &mut impl DelayNs) -> Result<&SampleBuffer, SensorError> {
        self.buffer.clear();
        match self.config.mode {
            AcquisitionMode::Window { samples } => {
                let period_us = self.config.sample_period_us();
                for i in 0..samples {
                    let value = self.source.read_raw()?;
                    // Capacity was checked at construction
                    let _ = self.buffer.push(value);
                    if i + 1 < samples {
                        delay.delay_us(period_us);
                    }
                }
            }
            AcquisitionMode::Burst {
                samples,
                spacing_ms,
            } => {
                for i in 0..samples {
                    let value = self.source.read_raw()?;
                    let _ = self.buffer.push(value);
                    if i + 1 < samples {
                        delay.delay_ms(spacing_ms);
                    }
                }
            }
        }
        Ok(&self.buffer)
    }
}

//! Accelerometer magnitude probe
//!
//! The tremor monitor samples total acceleration magnitude; axis
//! orientation on a wrist strap is arbitrary, so the magnitude keeps
//! the tremor energy regardless of how the band is worn. The constant
//! gravity component shows up as a DC offset and is removed by the
//! spectral transform before the FFT.

use tromos_core::traits::{SampleSource, SensorError};

/// 3-axis accelerometer reading trait for platform abstraction
pub trait AccelReader {
    /// Read one acceleration sample in m/s², all three axes
    #[allow(clippy::result_unit_err)]
    fn read(&mut self) -> Result<[f32; 3], ()>;
}

/// Acceleration magnitude source over a 3-axis accelerometer
pub struct MotionProbe<A> {
    accel: A,
}

impl<A: AccelReader> MotionProbe<A> {
    /// Create a probe over an accelerometer
    pub fn new(accel: A) -> Self {
        Self { accel }
    }

    /// Access the underlying accelerometer
    pub fn accel_mut(&mut self) -> &mut A {
        &mut self.accel
    }
}

impl<A: AccelReader> SampleSource for MotionProbe<A> {
    fn read_raw(&mut self) -> Result<f32, SensorError> {
        let [x, y, z] = self
            .accel
            .read()
            .map_err(|()| SensorError::Unavailable)?;
        Ok(libm::sqrtf(x * x + y * y + z * z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DummyAccel(Result<[f32; 3], ()>);

    impl AccelReader for DummyAccel {
        fn read(&mut self) -> Result<[f32; 3], ()> {
            self.0
        }
    }

    #[test]
    fn magnitude_of_axes() {
        let mut probe = MotionProbe::new(DummyAccel(Ok([3.0, 4.0, 0.0])));
        assert_eq!(probe.read_raw(), Ok(5.0));
    }

    #[test]
    fn bus_failure_is_unavailable() {
        let mut probe = MotionProbe::new(DummyAccel(Err(())));
        assert_eq!(probe.read_raw(), Err(SensorError::Unavailable));
    }
}

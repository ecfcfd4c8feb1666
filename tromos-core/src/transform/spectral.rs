//! Band-limited spectral peak transform
//!
//! Hann-windowed real FFT over one acquisition window, reporting the
//! strongest magnitude bin inside the configured frequency band. The
//! mean is removed before windowing so a constant offset (gravity on an
//! accelerometer axis) cannot leak into the low bins.

use heapless::Vec;
use microfft::real;

use crate::config::{ConfigError, SpectralConfig, MAX_SAMPLES};
use crate::sample::SampleBuffer;
use crate::transform::{Derived, Reading, Transform, TransformError};

/// Smallest supported FFT window
pub const MIN_WINDOW: usize = 16;

/// Spectral peak analyzer
///
/// Construction validates the window length (power of two, within the
/// supported FFT size set) and the search band (inside [0, Fs/2] and
/// spanning at least one bin).
pub struct SpectralAnalyzer {
    config: SpectralConfig,
    first_bin: usize,
    last_bin: usize,
}

impl SpectralAnalyzer {
    /// Create an analyzer, validating the configuration
    pub fn new(config: SpectralConfig) -> Result<Self, ConfigError> {
        let samples = config.samples;
        if samples == 0 || !samples.is_power_of_two() {
            return Err(ConfigError::WindowNotPowerOfTwo { samples });
        }
        if !(MIN_WINDOW..=MAX_SAMPLES).contains(&samples) {
            return Err(ConfigError::WindowUnsupported { samples });
        }
        if config.sample_rate_hz <= 0.0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        let nyquist = config.sample_rate_hz / 2.0;
        if config.band_low_hz < 0.0
            || config.band_high_hz <= config.band_low_hz
            || config.band_high_hz > nyquist
        {
            return Err(ConfigError::BandOutOfRange);
        }

        let bin_width = config.sample_rate_hz / samples as f32;
        let first_bin = libm::ceilf(config.band_low_hz / bin_width) as usize;
        let last_bin = libm::floorf(config.band_high_hz / bin_width) as usize;
        // The band must cover at least one bin of the real spectrum
        if first_bin > last_bin || first_bin >= samples / 2 {
            return Err(ConfigError::BandOutOfRange);
        }
        let last_bin = last_bin.min(samples / 2 - 1);

        Ok(Self {
            config,
            first_bin,
            last_bin,
        })
    }

    /// Frequency resolution of the configured window (Hz)
    pub fn bin_width_hz(&self) -> f32 {
        self.config.sample_rate_hz / self.config.samples as f32
    }

    /// Magnitude spectrum of the windowed input, DC bin first
    fn magnitudes(windowed: &[f32]) -> Vec<f32, { MAX_SAMPLES / 2 }> {
        let mut mags: Vec<f32, { MAX_SAMPLES / 2 }> = Vec::new();

        macro_rules! rfft_sizes {
            ($($len:literal => $func:path),+ $(,)?) => {
                match windowed.len() {
                    $($len => {
                        let mut buf = [0.0f32; $len];
                        buf.copy_from_slice(windowed);
                        let spectrum = $func(&mut buf);
                        // The real FFT packs the Nyquist bin into the
                        // imaginary part of bin 0; drop it so the DC
                        // magnitude stays honest.
                        spectrum[0].im = 0.0;
                        for c in spectrum.iter() {
                            let _ = mags.push(libm::sqrtf(c.re * c.re + c.im * c.im));
                        }
                    })+
                    // Unreachable: lengths are validated at construction
                    _ => {}
                }
            };
        }

        rfft_sizes! {
            16 => real::rfft_16,
            32 => real::rfft_32,
            64 => real::rfft_64,
            128 => real::rfft_128,
            256 => real::rfft_256,
            512 => real::rfft_512,
            1024 => real::rfft_1024,
        }

        mags
    }

    /// Strongest in-band peak, or `None` if everything in-band is at or
    /// below the noise floor
    fn band_peak(&self, samples: &[f32]) -> Option<(f32, f32)> {
        let n = samples.len();

        // Remove the mean, then apply a Hann window
        let mut sum = 0.0f32;
        for &v in samples {
            sum += v;
        }
        let mean = sum / n as f32;

        let mut windowed = [0.0f32; MAX_SAMPLES];
        let two_pi = 2.0 * core::f32::consts::PI;
        for (i, &v) in samples.iter().enumerate() {
            let w = 0.5 * (1.0 - libm::cosf(two_pi * i as f32 / (n - 1) as f32));
            windowed[i] = (v - mean) * w;
        }

        let mags = Self::magnitudes(&windowed[..n]);

        let bin_width = self.bin_width_hz();
        let mut peak: Option<(f32, f32)> = None;
        for bin in self.first_bin..=self.last_bin {
            let magnitude = mags[bin];
            if magnitude > self.config.noise_floor
                && peak.map_or(true, |(_, best)| magnitude > best)
            {
                peak = Some((bin as f32 * bin_width, magnitude));
            }
        }
        peak
    }
}

impl Transform for SpectralAnalyzer {
    fn expected_len(&self) -> Option<usize> {
        Some(self.config.samples)
    }

    fn apply(&self, samples: &SampleBuffer, timestamp_ms: u64) -> Result<Reading, TransformError> {
        if samples.len() != self.config.samples {
            return Err(TransformError::WindowMismatch {
                expected: self.config.samples,
                got: samples.len(),
            });
        }
        let derived = match self.band_peak(samples) {
            Some((hz, magnitude)) => Derived::DominantFrequency { hz, magnitude },
            None => Derived::NoDominantFrequency,
        };
        Ok(Reading {
            derived,
            timestamp_ms,
        })
    }
}

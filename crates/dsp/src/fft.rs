//! Real-signal transforms over `rustfft`.
//!
//! The transforms here work on full complex spectra of the same length as the input signal.  Callers that manipulate
//! magnitudes must preserve Hermitian symmetry themselves if they expect a real signal back; the operations in this
//! workspace do (symmetric magnitudes in, symmetric magnitudes out), so [RealFft::inverse] simply drops the residual
//! imaginary parts.
use std::ops::Range;
use std::sync::Arc;

use num::complex::Complex64;
use num::Zero;
use rustfft::{Fft, FftPlanner};

/// A matched forward/inverse FFT pair of a fixed length.
///
/// Plans are computed once at construction and reused for every call, so build one of these per filter length and keep
/// it around for the whole analysis pass.
pub struct RealFft {
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    len: usize,
}

impl RealFft {
    /// Plan a transform pair for signals of `len` samples.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero, as that is a programmer bug.
    pub fn new(len: usize) -> RealFft {
        assert!(len > 0, "cannot plan a zero-length FFT");

        let mut planner = FftPlanner::new();
        RealFft {
            forward: planner.plan_fft_forward(len),
            inverse: planner.plan_fft_inverse(len),
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Transform a real signal into its complex spectrum.
    ///
    /// Signals shorter than the planned length are zero padded; longer signals are a programmer bug and panic.
    pub fn forward(&self, signal: &[f64]) -> Vec<Complex64> {
        assert!(
            signal.len() <= self.len,
            "signal of {} samples does not fit a {}-point transform",
            signal.len(),
            self.len
        );

        let mut buffer: Vec<Complex64> = signal.iter().map(|s| Complex64::new(*s, 0.0)).collect();
        buffer.resize(self.len, Complex64::zero());
        self.forward.process(&mut buffer);
        buffer
    }

    /// Transform a complex spectrum back into a real signal.
    ///
    /// The forward transform is unnormalized, so this divides by the transform length; `inverse(forward(x))`
    /// reproduces `x` up to rounding.  Residual imaginary parts are dropped.
    pub fn inverse(&self, spectrum: &[Complex64]) -> Vec<f64> {
        assert_eq!(
            spectrum.len(),
            self.len,
            "spectrum length does not match the planned transform length"
        );

        let mut buffer = spectrum.to_vec();
        self.inverse.process(&mut buffer);

        let scale = 1.0 / self.len as f64;
        buffer.iter().map(|c| c.re * scale).collect()
    }
}

impl std::fmt::Debug for RealFft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealFft").field("len", &self.len).finish()
    }
}

/// Per-bin magnitudes of a spectrum.
pub fn magnitude_spectrum(spectrum: &[Complex64]) -> Vec<f64> {
    spectrum.iter().map(|c| c.norm()).collect()
}

/// Per-bin phases of a spectrum, in radians in `(-pi, pi]`.
pub fn phase_spectrum(spectrum: &[Complex64]) -> Vec<f64> {
    spectrum.iter().map(|c| c.arg()).collect()
}

/// Rebuild a complex spectrum from separate magnitudes and phases.
///
/// # Panics
///
/// Panics if the slices differ in length.
pub fn spectrum_from_polar(magnitudes: &[f64], phases: &[f64]) -> Vec<Complex64> {
    assert_eq!(magnitudes.len(), phases.len());
    magnitudes
        .iter()
        .zip(phases.iter())
        .map(|(m, p)| Complex64::from_polar(*m, *p))
        .collect()
}

/// The range of positive-frequency bins of an `n`-point transform at `sample_rate` whose center frequencies fall
/// inside `[low_hz, high_hz]`.
///
/// Only bins up to and including the Nyquist bin are considered; the mirrored negative-frequency half is the caller's
/// business.  The range may be empty if the band is narrower than one bin or lies above Nyquist.
pub fn band_bins(n: usize, sample_rate: u32, low_hz: f64, high_hz: f64) -> Range<usize> {
    let resolution = sample_rate as f64 / n as f64;
    let start = (low_hz / resolution).ceil() as usize;
    let stop = ((high_hz / resolution).floor() as usize + 1).min(n / 2 + 1);
    start..stop.max(start)
}

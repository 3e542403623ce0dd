//! Offline spectral utilities shared by the analysis crates.
//!
//! Everything in here is plain, deterministic math over `f64` slices: a real-signal FFT pair, direct convolution, and
//! dB conversions.  Nothing allocates behind the caller's back beyond the returned buffers, and nothing here touches
//! threads or I/O.
#![allow(clippy::len_without_is_empty)]

pub mod convolution;
pub mod fft;

mod db;

#[cfg(test)]
mod close_floats;

pub use convolution::convolve_full;
pub use db::DbExt;
pub use fft::{band_bins, magnitude_spectrum, phase_spectrum, spectrum_from_polar, RealFft};

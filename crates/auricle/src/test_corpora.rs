//! Synthetic corpora shared by the unit tests.
use crate::bank::{BinauralFilter, FilterBank, FilterEntry};
use crate::direction::Direction;

/// A two-channel geometric decay.  Different rates give clearly distinct magnitude spectra, and the spectrum of a
/// geometric decay has no zero bins, which keeps equalization away from its silence floor.
pub(crate) fn decaying_filter(rate: f64, taps: usize, sample_rate: u32) -> BinauralFilter {
    let left: Vec<f64> = (0..taps).map(|i| rate.powi(i as i32)).collect();
    let right: Vec<f64> = (0..taps).map(|i| 0.8 * (rate * 0.9).powi(i as i32)).collect();
    BinauralFilter::new(left, right, sample_rate)
}

/// Six directions along the axes, whole-sphere coverage, each with a distinct filter.
///
/// Index order: front, back, right, left, up, down.
pub(crate) fn octahedron_bank(taps: usize, sample_rate: u32) -> FilterBank {
    let directions = [
        (0.0, 0.0),
        (180.0, 0.0),
        (90.0, 0.0),
        (-90.0, 0.0),
        (0.0, 90.0),
        (0.0, -90.0),
    ];

    let entries = directions
        .iter()
        .enumerate()
        .map(|(i, (az, el))| {
            FilterEntry::new(
                Direction::from_polar(*az, *el, 1.4),
                decaying_filter(0.3 + 0.08 * i as f64, taps, sample_rate),
            )
        })
        .collect();

    FilterBank::new(entries).unwrap()
}

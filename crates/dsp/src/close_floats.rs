//! Threshold asserts for float tests.
//!
//! Spectral math accumulates rounding well past machine epsilon, so these take an explicit threshold instead of
//! reaching for an approximate-equality crate.

use num::Float;

#[track_caller]
pub(crate) fn close_floats<T: Float + std::fmt::Display>(a: T, b: T, threshold: T) {
    let diff = (a - b).abs();
    assert!(
        diff < threshold,
        "{} vs {}, difference {} is greater than threshold {}",
        a,
        b,
        diff,
        threshold
    );
}

/// Elementwise [close_floats] over two equal-length slices.
#[track_caller]
pub(crate) fn all_close(a: &[f64], b: &[f64], threshold: f64) {
    assert_eq!(a.len(), b.len(), "slice lengths differ");
    for (x, y) in a.iter().zip(b.iter()) {
        close_floats(*x, *y, threshold);
    }
}

//! Threshold asserts for float tests; thresholds are deliberately far above epsilon because spectral round trips
//! accumulate rounding.

#[track_caller]
pub(crate) fn close_floats(a: f64, b: f64, threshold: f64) {
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

/// Elementwise [close_floats] over equal-length slices.
#[track_caller]
pub(crate) fn close_slices(a: &[f64], b: &[f64], threshold: f64) {
    assert_eq!(a.len(), b.len(), "slice lengths differ");
    for (ind, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        assert!(
            diff < threshold,
            "index {}: {} vs {}, difference {} is greater than threshold {}",
            ind,
            x,
            y,
            diff,
            threshold
        );
    }
}

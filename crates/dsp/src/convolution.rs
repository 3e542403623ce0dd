//! Direct convolution for offline analysis.

/// Evaluate the full convolution of `input` with `impulse` by directly evaluating the sum.
///
/// The output holds `input.len() + impulse.len() - 1` samples, including the tail, since analysis callers want the
/// complete response rather than a streaming block.  Complexity is `theta(M*N)`; the filters this workspace deals in
/// are a few hundred taps, where direct evaluation beats setting up FFT convolution.
///
/// # Panics
///
/// Panics if either slice is empty, as these are (or should be) programmer bugs.
pub fn convolve_full(input: &[f64], impulse: &[f64]) -> Vec<f64> {
    assert!(!input.is_empty());
    assert!(!impulse.is_empty());

    let mut output = vec![0.0f64; input.len() + impulse.len() - 1];
    for (i, x) in input.iter().enumerate() {
        for (j, h) in impulse.iter().enumerate() {
            output[i + j] += x * h;
        }
    }

    output
}

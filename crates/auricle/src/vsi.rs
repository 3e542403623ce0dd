//! The vertical spatial information metric: how much the spectra of a set of directions differ from one another.
use auricle_dsp::{band_bins, magnitude_spectrum, RealFft};
use itertools::Itertools;

use crate::bank::FilterBank;
use crate::error::{Error, Result};

/// Variances under this are a flat spectrum; correlating against one is meaningless.
const FLAT_VARIANCE: f64 = 1e-18;

/// Knobs of [FilterBank::vsi].
///
/// The defaults equalize first and analyze 4 kHz to 16 kHz, the band where elevation-dependent pinna cues live.
#[derive(Copy, Clone, Debug)]
pub struct VsiOptions {
    /// Remove the diffuse-field component before comparing.  Pass `false` when the bank at hand is already
    /// equalized, so the metric does not pay for equalization twice.
    pub equalize: bool,
    pub low_hz: f64,
    pub high_hz: f64,
}

impl Default for VsiOptions {
    fn default() -> VsiOptions {
        VsiOptions {
            equalize: true,
            low_hz: 4000.0,
            high_hz: 16000.0,
        }
    }
}

/// In-band magnitude spectra of one direction, one vector per ear.
#[derive(Clone, Debug)]
pub struct TransferFunction {
    pub left: Vec<f64>,
    pub right: Vec<f64>,
}

impl FilterBank {
    /// The magnitude transfer functions of a subset of directions, restricted to the bins whose center frequencies
    /// fall inside `[low_hz, high_hz]`.
    ///
    /// One [TransferFunction] per requested index, in the order requested.
    pub fn transfer_functions(
        &self,
        subset: &[usize],
        low_hz: f64,
        high_hz: f64,
    ) -> Result<Vec<TransferFunction>> {
        self.check_subset(subset)?;
        let bins = band_bins(self.taps(), self.sample_rate(), low_hz, high_hz);
        if bins.is_empty() {
            return Err(Error::EmptyBand { low_hz, high_hz });
        }

        let fft = RealFft::new(self.taps());
        Ok(subset
            .iter()
            .map(|index| {
                let filter = &self.entries()[*index].filter;
                TransferFunction {
                    left: magnitude_spectrum(&fft.forward(filter.left()))[bins.clone()].to_vec(),
                    right: magnitude_spectrum(&fft.forward(filter.right()))[bins.clone()].to_vec(),
                }
            })
            .collect())
    }

    /// The vertical spatial information of a subset of directions: `1 - mean pairwise correlation` of their in-band
    /// magnitude spectra, both ears stacked.
    ///
    /// Identical filters score the minimum, 0; the more the spectra differ across the subset, the higher the score.
    /// The subset is explicit so a caller can point the metric at a cone or slice of an already equalized bank
    /// (`equalize: false`) without recomputing anything.
    ///
    /// # Errors
    ///
    /// [Error::EmptySubset] for zero indices and [Error::SubsetTooSmall] for one: a dissimilarity over fewer than
    /// two directions is undefined, and failing beats quietly returning a degenerate value.
    pub fn vsi(&self, subset: &[usize], options: &VsiOptions) -> Result<f64> {
        self.check_subset(subset)?;
        if subset.len() < 2 {
            return Err(Error::SubsetTooSmall(subset.len()));
        }

        let equalized;
        let bank = if options.equalize {
            equalized = self.diffuse_field_equalization();
            &equalized
        } else {
            self
        };

        let stacked: Vec<Vec<f64>> = bank
            .transfer_functions(subset, options.low_hz, options.high_hz)?
            .into_iter()
            .map(|tf| {
                let mut both = tf.left;
                both.extend_from_slice(&tf.right);
                both
            })
            .collect();

        let correlations: Vec<f64> = stacked
            .iter()
            .tuple_combinations()
            .map(|(a, b)| correlation(a, b))
            .collect();
        let mean = correlations.iter().sum::<f64>() / correlations.len() as f64;

        Ok(1.0 - mean)
    }
}

/// Pearson correlation coefficient.
///
/// Flat spectra carry no shape to correlate: two flats count as fully alike, a flat against anything else as fully
/// unalike.
fn correlation(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance_a = 0.0;
    let mut variance_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        let (dx, dy) = (x - mean_a, y - mean_b);
        covariance += dx * dy;
        variance_a += dx * dx;
        variance_b += dy * dy;
    }

    match (variance_a < FLAT_VARIANCE, variance_b < FLAT_VARIANCE) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.0,
        (false, false) => covariance / (variance_a * variance_b).sqrt(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::close_floats::close_floats;
    use crate::test_corpora::{decaying_filter, octahedron_bank};
    use crate::FilterEntry;

    #[test]
    fn test_identical_filters_score_zero() {
        let shared = decaying_filter(0.5, 128, 44100);
        let entries = octahedron_bank(128, 44100)
            .entries()
            .iter()
            .map(|e| FilterEntry::new(e.direction, shared.clone()))
            .collect();
        let bank = FilterBank::new(entries).unwrap();

        let vsi = bank.vsi(&[0, 1, 2, 3, 4, 5], &VsiOptions::default()).unwrap();
        close_floats(vsi, 0.0, 1e-9);
    }

    #[test]
    fn test_distinct_filters_score_above_zero() {
        let bank = octahedron_bank(128, 44100);
        let vsi = bank.vsi(&[0, 2, 4], &VsiOptions::default()).unwrap();
        assert!(vsi > 1e-4, "distinct spectra scored {vsi}");
    }

    #[test]
    fn test_subset_errors() {
        let bank = octahedron_bank(128, 44100);
        assert_eq!(
            bank.vsi(&[], &VsiOptions::default()).unwrap_err(),
            Error::EmptySubset
        );
        assert_eq!(
            bank.vsi(&[3], &VsiOptions::default()).unwrap_err(),
            Error::SubsetTooSmall(1)
        );
        assert_eq!(
            bank.vsi(&[0, 6], &VsiOptions::default()).unwrap_err(),
            Error::IndexOutOfRange { index: 6, len: 6 }
        );
    }

    #[test]
    fn test_band_must_hold_bins() {
        // 32 taps at 44.1 kHz is ~1.4 kHz per bin; a 100 Hz wide band catches none of them.
        let bank = octahedron_bank(32, 44100);
        let options = VsiOptions {
            low_hz: 100.0,
            high_hz: 200.0,
            ..VsiOptions::default()
        };
        assert_eq!(
            bank.vsi(&[0, 1], &options).unwrap_err(),
            Error::EmptyBand {
                low_hz: 100.0,
                high_hz: 200.0
            }
        );
    }

    #[test]
    fn test_pre_equalized_bank_skips_equalization() {
        let bank = octahedron_bank(128, 44100);
        let with_equalize = bank.vsi(&[0, 2, 4], &VsiOptions::default()).unwrap();

        let pre_equalized = bank.diffuse_field_equalization();
        let without = pre_equalized
            .vsi(
                &[0, 2, 4],
                &VsiOptions {
                    equalize: false,
                    ..VsiOptions::default()
                },
            )
            .unwrap();

        close_floats(with_equalize, without, 1e-9);
    }

    #[test]
    fn test_correlation_basics() {
        close_floats(correlation(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]), 1.0, 1e-12);
        close_floats(correlation(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]), -1.0, 1e-12);
        close_floats(correlation(&[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0]), 1.0, 1e-12);
        close_floats(correlation(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), 0.0, 1e-12);
    }

    #[test]
    fn test_transfer_function_order_matches_subset() {
        let bank = octahedron_bank(128, 44100);
        let forward = bank.transfer_functions(&[4, 0], 4000.0, 16000.0).unwrap();
        let reversed = bank.transfer_functions(&[0, 4], 4000.0, 16000.0).unwrap();
        assert_eq!(forward[0].left, reversed[1].left);
        assert_eq!(forward[1].right, reversed[0].right);

        // Same subset twice is bit-identical; nothing about the computation is stateful.
        let again = bank.transfer_functions(&[4, 0], 4000.0, 16000.0).unwrap();
        assert_eq!(forward[0].left, again[0].left);
    }

    #[test]
    fn test_vsi_composes_with_selection() {
        let bank = octahedron_bank(128, 44100);
        let cone = bank.cone_sources(0.0).unwrap();
        // The median plane of the octahedron: front, back, up, down.
        assert_eq!(cone, vec![0, 1, 4, 5]);
        assert!(bank.vsi(&cone, &VsiOptions::default()).unwrap() > 0.0);
    }
}

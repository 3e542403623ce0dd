//! Diffuse-field analysis: the direction-independent spectral component of a bank, and its removal.
use auricle_dsp::{magnitude_spectrum, RealFft};

use crate::bank::{FilterBank, FilterEntry};

/// Bins whose average magnitude sits under this floor are left untouched by equalization; a band the whole corpus is
/// silent in carries no directional cue to amplify.
const SILENCE_FLOOR: f64 = 1e-12;

/// The direction-averaged magnitude spectrum of a bank: per ear, per bin, the energy (RMS) average over every stored
/// direction.
///
/// Bins run over the full transform of the bank's filters, so the vector length equals [crate::FilterBank::taps].
#[derive(Clone, Debug)]
pub struct DiffuseFieldAverage {
    left: Vec<f64>,
    right: Vec<f64>,
    sample_rate: u32,
}

impl DiffuseFieldAverage {
    pub fn left(&self) -> &[f64] {
        &self.left
    }

    pub fn right(&self) -> &[f64] {
        &self.right
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl FilterBank {
    /// The diffuse-field component shared by every direction of the bank.
    ///
    /// The average is an energy mean: per bin, the square root of the mean squared magnitude across directions.
    pub fn diffuse_field_avg(&self) -> DiffuseFieldAverage {
        let fft = RealFft::new(self.taps());
        let mut power = [vec![0.0f64; self.taps()], vec![0.0f64; self.taps()]];

        for entry in self.entries() {
            for (ear, accumulator) in power.iter_mut().enumerate() {
                let magnitudes = magnitude_spectrum(&fft.forward(entry.filter.channel(ear)));
                for (bin, magnitude) in magnitudes.into_iter().enumerate() {
                    accumulator[bin] += magnitude * magnitude;
                }
            }
        }

        let count = self.len() as f64;
        let [left, right] = power.map(|accumulator| {
            accumulator
                .into_iter()
                .map(|p| (p / count).sqrt())
                .collect::<Vec<_>>()
        });

        DiffuseFieldAverage {
            left,
            right,
            sample_rate: self.sample_rate(),
        }
    }

    /// Remove the diffuse-field component from every filter, leaving only the direction-dependent spectral cues.
    ///
    /// Each filter's magnitude spectrum is divided, bin by bin, by the bank's [diffuse field
    /// average](FilterBank::diffuse_field_avg); phase is untouched, since the divisor is real and positive.  The
    /// bank itself is unchanged; a new bank over the same directions is returned.  Equalizing an already equalized
    /// bank is a near no-op, as its average is already unity outside silent bins.
    pub fn diffuse_field_equalization(&self) -> FilterBank {
        let average = self.diffuse_field_avg();
        let fft = RealFft::new(self.taps());

        let flatten = |signal: &[f64], gains: &[f64]| -> Vec<f64> {
            let mut spectrum = fft.forward(signal);
            for (bin, gain) in gains.iter().enumerate() {
                if *gain > SILENCE_FLOOR {
                    spectrum[bin] = spectrum[bin] / *gain;
                }
            }
            fft.inverse(&spectrum)
        };

        let entries = self
            .entries()
            .iter()
            .map(|entry| {
                FilterEntry::new(
                    entry.direction,
                    crate::BinauralFilter::new(
                        flatten(entry.filter.left(), average.left()),
                        flatten(entry.filter.right(), average.right()),
                        self.sample_rate(),
                    ),
                )
            })
            .collect();

        FilterBank::from_validated(entries, self.sample_rate(), self.taps())
    }
}

//! Rendering a signal through a bank filter.
//!
//! The original analysis surface accepted "an index or a direction" in one polymorphic entry point; here those are
//! two operations with distinct names and distinct failure modes.
use auricle_dsp::convolve_full;

use crate::bank::{BinauralFilter, FilterBank};
use crate::direction::Direction;
use crate::error::Result;

/// A rendered two-channel signal.
#[derive(Clone, Debug, PartialEq)]
pub struct StereoSignal {
    pub left: Vec<f64>,
    pub right: Vec<f64>,
}

impl FilterBank {
    /// Render a mono signal through the stored filter at `index`.
    ///
    /// The full convolution is returned, `input + taps - 1` samples per channel.
    ///
    /// # Panics
    ///
    /// Panics on an empty input signal.
    pub fn apply_index(&self, index: usize, input: &[f64]) -> Result<StereoSignal> {
        Ok(render(&self.entry(index)?.filter, input))
    }

    /// Render a mono signal from an arbitrary direction, interpolating a filter for it first.
    ///
    /// Fails exactly as [FilterBank::interpolate] does; a stored direction renders through the stored filter.
    ///
    /// # Panics
    ///
    /// Panics on an empty input signal.
    pub fn apply_direction(&self, direction: &Direction, input: &[f64]) -> Result<StereoSignal> {
        Ok(render(&self.interpolate(direction)?, input))
    }
}

fn render(filter: &BinauralFilter, input: &[f64]) -> StereoSignal {
    StereoSignal {
        left: convolve_full(input, filter.left()),
        right: convolve_full(input, filter.right()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_corpora::octahedron_bank;
    use crate::{BinauralFilter, Error, FilterBank, FilterEntry};

    fn passthrough_bank() -> FilterBank {
        // A unit impulse on the left and a half-gain impulse on the right, at enough directions to be a valid bank.
        let mut left = vec![0.0; 8];
        left[0] = 1.0;
        let mut right = vec![0.0; 8];
        right[0] = 0.5;

        let entries = octahedron_bank(8, 48000)
            .entries()
            .iter()
            .map(|e| {
                FilterEntry::new(
                    e.direction,
                    BinauralFilter::new(left.clone(), right.clone(), 48000),
                )
            })
            .collect();
        FilterBank::new(entries).unwrap()
    }

    #[test]
    fn test_impulse_filter_passes_through() {
        let bank = passthrough_bank();
        let input = [1.0, -2.0, 3.0];
        let rendered = bank.apply_index(0, &input).unwrap();

        assert_eq!(rendered.left.len(), input.len() + bank.taps() - 1);
        assert_eq!(&rendered.left[..3], &input);
        assert_eq!(&rendered.right[..3], &[0.5, -1.0, 1.5]);
        assert!(rendered.left[3..].iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_direction_matches_index_for_stored_directions() {
        let bank = octahedron_bank(16, 44100);
        let input = [0.2, 0.4, -0.6, 0.8];

        for (index, entry) in bank.entries().iter().enumerate() {
            assert_eq!(
                bank.apply_direction(&entry.direction, &input).unwrap(),
                bank.apply_index(index, &input).unwrap()
            );
        }
    }

    #[test]
    fn test_bad_index() {
        let bank = octahedron_bank(16, 44100);
        assert_eq!(
            bank.apply_index(17, &[1.0]).unwrap_err(),
            Error::IndexOutOfRange { index: 17, len: 6 }
        );
    }
}

//! Barycentric spectral interpolation of a filter for an unmeasured direction.
use auricle_dsp::{magnitude_spectrum, phase_spectrum, spectrum_from_polar, RealFft};

use crate::bank::{BinauralFilter, FilterBank};
use crate::direction::Direction;
use crate::error::{Error, Result};

impl FilterBank {
    /// Produce a filter approximating the response at `direction`.
    ///
    /// A direction coincident with a stored measurement (within
    /// [DIRECTION_TOLERANCE](crate::DIRECTION_TOLERANCE)) returns that filter unchanged rather than pushing it
    /// through numerically noisy interpolation.  Anywhere else, the three measurements whose spherical triangle the
    /// direction crosses are blended per ear in the spectral domain: the magnitudes combine barycentrically, and the
    /// phase spectrum is taken from the largest-weight vertex.  Magnitude-only interpolation accepts a phase
    /// discontinuity when the dominant vertex changes; elevation and front/back cues live in the magnitudes, which is
    /// what an analysis of them needs intact.
    ///
    /// The result is not renormalized against the inputs, so its overall level can differ from every measured
    /// filter's.  Callers that need loudness matching rescale afterwards.
    ///
    /// # Errors
    ///
    /// [Error::OutOfHull] when `direction` falls outside the hull of the measured directions (clamping to
    /// [FilterBank::nearest_source] is the usual recovery), and [Error::DegenerateGeometry] when the corpus cannot be
    /// triangulated at all.
    pub fn interpolate(&self, direction: &Direction) -> Result<BinauralFilter> {
        if let Some(index) = self.coincident_source(direction) {
            log::debug!(
                "direction (azimuth {}, elevation {}) coincides with source {index}; returning it unchanged",
                direction.azimuth(),
                direction.elevation()
            );
            return Ok(self.entries()[index].filter.clone());
        }

        let located = self
            .triangulation()?
            .locate(direction.unit_vector())
            .ok_or(Error::OutOfHull {
                azimuth: direction.azimuth(),
                elevation: direction.elevation(),
            })?;

        let fft = RealFft::new(self.taps());
        let dominant = located.dominant();

        let blend_ear = |ear: usize| -> Vec<f64> {
            let spectra = located
                .sources
                .iter()
                .map(|s| fft.forward(self.entries()[*s].filter.channel(ear)))
                .collect::<Vec<_>>();

            let mut magnitudes = vec![0.0f64; self.taps()];
            for (spectrum, weight) in spectra.iter().zip(located.weights) {
                for (bin, magnitude) in magnitude_spectrum(spectrum).into_iter().enumerate() {
                    magnitudes[bin] += weight * magnitude;
                }
            }

            let phases = phase_spectrum(&spectra[dominant]);
            fft.inverse(&spectrum_from_polar(&magnitudes, &phases))
        };

        Ok(BinauralFilter::new(
            blend_ear(0),
            blend_ear(1),
            self.sample_rate(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::close_floats::{close_floats, close_slices};
    use crate::test_corpora::{decaying_filter, octahedron_bank};
    use crate::FilterEntry;

    #[test]
    fn test_stored_direction_returns_stored_filter() {
        let bank = octahedron_bank(64, 44100);
        for entry in bank.entries() {
            let filter = bank.interpolate(&entry.direction).unwrap();
            assert_eq!(&filter, &entry.filter);
        }
    }

    #[test]
    fn test_coincident_beats_interpolation() {
        // A hair off a stored direction still short-circuits to it.
        let bank = octahedron_bank(64, 44100);
        let nearly_front = Direction::from_polar(0.03, -0.02, 1.0);
        assert_eq!(
            bank.interpolate(&nearly_front).unwrap(),
            bank.entries()[0].filter
        );
    }

    #[test]
    fn test_midpoint_blends_magnitudes() {
        let bank = octahedron_bank(64, 44100);
        // Halfway between front (index 0) and up (index 4): weights 0.5 each, nothing from the third vertex.
        let midpoint = Direction::from_polar(0.0, 45.0, 1.0);
        let filter = bank.interpolate(&midpoint).unwrap();

        let fft = RealFft::new(64);
        for (blended, (a, b)) in [
            (filter.left(), (bank.entries()[0].filter.left(), bank.entries()[4].filter.left())),
            (filter.right(), (bank.entries()[0].filter.right(), bank.entries()[4].filter.right())),
        ] {
            let got = magnitude_spectrum(&fft.forward(blended));
            let mag_a = magnitude_spectrum(&fft.forward(a));
            let mag_b = magnitude_spectrum(&fft.forward(b));
            let expected: Vec<f64> = mag_a
                .iter()
                .zip(mag_b.iter())
                .map(|(x, y)| 0.5 * (x + y))
                .collect();
            close_slices(&got, &expected, 1e-6);
        }
    }

    #[test]
    fn test_level_is_not_renormalized() {
        // Blending a loud and a quiet filter lands between the two levels instead of snapping to either.
        let quiet = decaying_filter(0.3, 64, 44100);
        let loud = {
            let left: Vec<f64> = quiet.left().iter().map(|s| s * 4.0).collect();
            let right: Vec<f64> = quiet.right().iter().map(|s| s * 4.0).collect();
            crate::BinauralFilter::new(left, right, 44100)
        };

        let bank = octahedron_bank(64, 44100);
        let mut entries: Vec<FilterEntry> = bank.entries().to_vec();
        entries[0].filter = quiet.clone();
        entries[4].filter = loud.clone();
        let bank = crate::FilterBank::new(entries).unwrap();

        let filter = bank.interpolate(&Direction::from_polar(0.0, 45.0, 1.0)).unwrap();
        let fft = RealFft::new(64);
        let dc = magnitude_spectrum(&fft.forward(filter.left()))[0];
        let quiet_dc = magnitude_spectrum(&fft.forward(quiet.left()))[0];
        close_floats(dc, 2.5 * quiet_dc, 1e-9);
    }

    #[test]
    fn test_out_of_hull() {
        // Upper hemisphere only: a pyramid of five measurements.
        let directions = [
            (0.0, 0.0),
            (90.0, 0.0),
            (180.0, 0.0),
            (-90.0, 0.0),
            (0.0, 90.0),
        ];
        let entries = directions
            .iter()
            .enumerate()
            .map(|(i, (az, el))| {
                FilterEntry::new(
                    Direction::from_polar(*az, *el, 1.0),
                    decaying_filter(0.3 + 0.1 * i as f64, 32, 44100),
                )
            })
            .collect();
        let bank = crate::FilterBank::new(entries).unwrap();

        let below = Direction::from_polar(20.0, -30.0, 1.0);
        assert_eq!(
            bank.interpolate(&below).unwrap_err(),
            Error::OutOfHull {
                azimuth: below.azimuth(),
                elevation: below.elevation()
            }
        );

        // The advertised recovery: clamp to the nearest measurement.
        let clamped = bank.nearest_source(&below);
        assert!(bank.interpolate(&bank.entries()[clamped].direction).is_ok());
    }

    #[test]
    fn test_two_sources_cannot_interpolate() {
        let entries = vec![
            FilterEntry::new(
                Direction::from_polar(0.0, 0.0, 1.0),
                decaying_filter(0.4, 32, 44100),
            ),
            FilterEntry::new(
                Direction::from_polar(90.0, 0.0, 1.0),
                decaying_filter(0.6, 32, 44100),
            ),
        ];
        let bank = crate::FilterBank::new(entries).unwrap();
        assert_eq!(
            bank.interpolate(&Direction::from_polar(45.0, 0.0, 1.0)).unwrap_err(),
            Error::DegenerateGeometry(2)
        );
    }
}

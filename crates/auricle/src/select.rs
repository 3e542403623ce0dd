//! Selection predicates over the stored directions.
//!
//! Both selections return indices in stored insertion order, which is also the order every other operation speaks
//! in; repeated calls on the same bank return the same list.
use crate::bank::FilterBank;
use crate::config::{CONE_TOLERANCE, ELEVATION_TOLERANCE};
use crate::error::{Error, Result};

impl FilterBank {
    /// Indices of the directions in the horizontal slice at `elevation` degrees, within
    /// [ELEVATION_TOLERANCE](crate::ELEVATION_TOLERANCE).
    ///
    /// Fails with [Error::EmptySubset] when nothing in the bank sits at that elevation.
    pub fn elevation_sources(&self, elevation: f64) -> Result<Vec<usize>> {
        self.select(|index| {
            (self.entries()[index].direction.elevation() - elevation).abs() <= ELEVATION_TOLERANCE
        })
    }

    /// Indices of the directions on the cone of confusion `cone_angle` degrees off the median plane, within
    /// [CONE_TOLERANCE](crate::CONE_TOLERANCE).
    ///
    /// A cone angle of zero selects the median plane itself, the vertical slice through the forward axis that
    /// vertical-localization experiments sweep.  Positive angles are to the right.
    ///
    /// Fails with [Error::EmptySubset] when nothing in the bank lies on that cone.
    pub fn cone_sources(&self, cone_angle: f64) -> Result<Vec<usize>> {
        self.select(|index| {
            (self.entries()[index].direction.lateral_angle() - cone_angle).abs() <= CONE_TOLERANCE
        })
    }

    fn select(&self, matches: impl Fn(usize) -> bool) -> Result<Vec<usize>> {
        let selected: Vec<usize> = (0..self.len()).filter(|index| matches(*index)).collect();
        if selected.is_empty() {
            return Err(Error::EmptySubset);
        }
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_corpora::decaying_filter;
    use crate::{Direction, FilterBank, FilterEntry};

    /// A two-ring grid: elevations 0 and 40 at four azimuths each, inserted ring by ring.
    fn grid_bank() -> FilterBank {
        let mut entries = Vec::new();
        for elevation in [0.0, 40.0] {
            for azimuth in [0.0, 90.0, 180.0, -90.0] {
                entries.push(FilterEntry::new(
                    Direction::from_polar(azimuth, elevation, 1.2),
                    decaying_filter(0.5, 32, 44100),
                ));
            }
        }
        FilterBank::new(entries).unwrap()
    }

    #[test]
    fn test_elevation_slice() {
        let bank = grid_bank();
        assert_eq!(bank.elevation_sources(0.0).unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(bank.elevation_sources(40.0).unwrap(), vec![4, 5, 6, 7]);

        // Within tolerance still matches; beyond it does not.
        assert_eq!(bank.elevation_sources(40.3).unwrap(), vec![4, 5, 6, 7]);
        assert_eq!(bank.elevation_sources(20.0).unwrap_err(), Error::EmptySubset);
    }

    #[test]
    fn test_elevation_slice_is_stable() {
        let bank = grid_bank();
        let first = bank.elevation_sources(0.0).unwrap();
        for _ in 0..3 {
            assert_eq!(bank.elevation_sources(0.0).unwrap(), first);
        }
    }

    #[test]
    fn test_cone_selects_median_plane() {
        let bank = grid_bank();
        // Front and back of both rings sit on the midline; left and right do not.
        assert_eq!(bank.cone_sources(0.0).unwrap(), vec![0, 2, 4, 6]);
    }

    #[test]
    fn test_cone_off_midline() {
        let bank = grid_bank();
        // Hard right on the horizontal ring.  The elevated ring's right-hand source sits at a smaller lateral
        // angle, so it stays out.
        assert_eq!(bank.cone_sources(90.0).unwrap(), vec![1]);
        assert_eq!(bank.cone_sources(45.0).unwrap_err(), Error::EmptySubset);
    }
}

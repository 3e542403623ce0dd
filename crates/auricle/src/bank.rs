//! The measured corpus: filters paired with the directions they were recorded at.
use once_cell::sync::OnceCell;

use crate::config::DIRECTION_TOLERANCE;
use crate::direction::Direction;
use crate::error::{Error, Result};
use crate::triangulation::Triangulation;

/// A two-channel (left/right ear) impulse response at one sample rate.
///
/// Both channels always hold the same number of taps.
#[derive(Clone, Debug, PartialEq)]
pub struct BinauralFilter {
    left: Vec<f64>,
    right: Vec<f64>,
    sample_rate: u32,
}

impl BinauralFilter {
    /// # Panics
    ///
    /// Panics if the channels are empty, differ in length, or the sample rate is zero.  These are programmer bugs,
    /// not data errors; data-level mismatches are reported by [FilterBank::new].
    pub fn new(left: Vec<f64>, right: Vec<f64>, sample_rate: u32) -> BinauralFilter {
        assert!(!left.is_empty(), "a filter needs at least one tap");
        assert_eq!(
            left.len(),
            right.len(),
            "left and right channels must hold the same number of taps"
        );
        assert!(sample_rate > 0);

        BinauralFilter {
            left,
            right,
            sample_rate,
        }
    }

    /// The left ear impulse response.
    pub fn left(&self) -> &[f64] {
        &self.left
    }

    /// The right ear impulse response.
    pub fn right(&self) -> &[f64] {
        &self.right
    }

    /// Channel by index: 0 left, 1 right.
    pub(crate) fn channel(&self, ear: usize) -> &[f64] {
        match ear {
            0 => &self.left,
            1 => &self.right,
            _ => panic!("a binaural filter has exactly two channels"),
        }
    }

    pub fn taps(&self) -> usize {
        self.left.len()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// One measurement: a direction and the filter recorded there.
#[derive(Clone, Debug)]
pub struct FilterEntry {
    pub direction: Direction,
    pub filter: BinauralFilter,
}

impl FilterEntry {
    pub fn new(direction: Direction, filter: BinauralFilter) -> FilterEntry {
        FilterEntry { direction, filter }
    }
}

/// An ordered, immutable corpus of directional filters.
///
/// Insertion order defines the stable indices every other operation speaks in: selection returns them, metrics accept
/// them, [FilterBank::apply_index] consumes them.  Construction is the only place the corpus is validated or
/// mutated; every derived bank (equalized, interpolated) is a fresh value.
///
/// The spherical triangulation used by interpolation is computed lazily on first use and memoized for the life of the
/// bank.  Since the corpus never changes after construction there is no invalidation story, and the cache is owned by
/// the bank rather than by anything process wide.
#[derive(Clone, Debug)]
pub struct FilterBank {
    entries: Vec<FilterEntry>,
    sample_rate: u32,
    taps: usize,
    triangulation: OnceCell<Triangulation>,
}

impl FilterBank {
    /// Build a bank from a fixed set of measurements.
    ///
    /// Fails with [Error::EmptyBank] on zero entries, [Error::SampleRateMismatch] or [Error::LengthMismatch] when an
    /// entry disagrees with the first one, and [Error::DuplicateDirection] when two entries sit within
    /// [DIRECTION_TOLERANCE] of each other.
    pub fn new(entries: Vec<FilterEntry>) -> Result<FilterBank> {
        let first = entries.first().ok_or(Error::EmptyBank)?;
        let sample_rate = first.filter.sample_rate();
        let taps = first.filter.taps();

        for (index, e) in entries.iter().enumerate() {
            if e.filter.sample_rate() != sample_rate {
                return Err(Error::SampleRateMismatch {
                    index,
                    expected: sample_rate,
                    got: e.filter.sample_rate(),
                });
            }
            if e.filter.taps() != taps {
                return Err(Error::LengthMismatch {
                    index,
                    expected: taps,
                    got: e.filter.taps(),
                });
            }
        }

        for first_ind in 0..entries.len() {
            for second_ind in (first_ind + 1)..entries.len() {
                let separation = entries[first_ind]
                    .direction
                    .angle_to(&entries[second_ind].direction);
                if separation < DIRECTION_TOLERANCE {
                    return Err(Error::DuplicateDirection {
                        first: first_ind,
                        second: second_ind,
                    });
                }
            }
        }

        log::debug!(
            "built filter bank: {} directions, {} taps at {} Hz",
            entries.len(),
            taps,
            sample_rate
        );

        Ok(FilterBank {
            entries,
            sample_rate,
            taps,
            triangulation: OnceCell::new(),
        })
    }

    /// Rebuild a bank whose entries are already known to satisfy the invariants, e.g. because they are a per-filter
    /// transformation of a validated bank with directions untouched.
    pub(crate) fn from_validated(entries: Vec<FilterEntry>, sample_rate: u32, taps: usize) -> FilterBank {
        FilterBank {
            entries,
            sample_rate,
            taps,
            triangulation: OnceCell::new(),
        }
    }

    /// Number of stored filters.  Never zero.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[FilterEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Result<&FilterEntry> {
        self.entries.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Taps per channel, uniform across the bank.
    pub fn taps(&self) -> usize {
        self.taps
    }

    /// The index of the stored direction closest to `direction` by great-circle separation.
    ///
    /// This is the clamp callers reach for when [FilterBank::interpolate] reports
    /// [Error::OutOfHull].
    pub fn nearest_source(&self, direction: &Direction) -> usize {
        let mut best = 0;
        let mut best_angle = f64::INFINITY;
        for (index, e) in self.entries.iter().enumerate() {
            let angle = e.direction.angle_to(direction);
            if angle < best_angle {
                best_angle = angle;
                best = index;
            }
        }
        best
    }

    /// The stored index coincident with `direction`, if any.
    pub(crate) fn coincident_source(&self, direction: &Direction) -> Option<usize> {
        let nearest = self.nearest_source(direction);
        (self.entries[nearest].direction.angle_to(direction) < DIRECTION_TOLERANCE).then_some(nearest)
    }

    pub(crate) fn triangulation(&self) -> Result<&Triangulation> {
        self.triangulation.get_or_try_init(|| {
            Triangulation::build(self.entries.iter().map(|e| e.direction.unit_vector()).collect())
        })
    }

    /// Check a caller-supplied subset of indices, preserving its order.
    pub(crate) fn check_subset(&self, subset: &[usize]) -> Result<()> {
        if subset.is_empty() {
            return Err(Error::EmptySubset);
        }
        for index in subset.iter().copied() {
            if index >= self.entries.len() {
                return Err(Error::IndexOutOfRange {
                    index,
                    len: self.entries.len(),
                });
            }
        }
        Ok(())
    }
}

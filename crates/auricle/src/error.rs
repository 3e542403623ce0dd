/// Errors of the filter bank operations.
///
/// Everything here is a pure, synchronous computation failure; nothing is retried and nothing is recoverable inside
/// the library.  In particular [Error::SampleRateMismatch] is fatal by contract: filters must be resampled upstream
/// before they ever reach a bank.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The requested direction falls outside the convex hull of the measured directions.  Callers that want a result
    /// anyway can clamp to [crate::FilterBank::nearest_source] and interpolate there.
    #[error("direction (azimuth {azimuth}, elevation {elevation}) is outside the hull of measured directions")]
    OutOfHull { azimuth: f64, elevation: f64 },

    /// A selection or metric was asked to operate over zero directions.
    #[error("the requested subset matches no directions")]
    EmptySubset,

    /// A dissimilarity metric over fewer than two directions is undefined.
    #[error("need at least two directions, got {0}")]
    SubsetTooSmall(usize),

    /// A subset referenced an index past the end of the bank.
    #[error("index {index} is out of range for a bank of {len} filters")]
    IndexOutOfRange { index: usize, len: usize },

    /// Entries recorded at differing sample rates cannot share a bank.
    #[error("filter {index} was recorded at {got} Hz, but the bank is at {expected} Hz")]
    SampleRateMismatch {
        index: usize,
        expected: u32,
        got: u32,
    },

    /// Entries of differing tap counts cannot share a bank.
    #[error("filter {index} has {got} taps, but the bank's filters have {expected}")]
    LengthMismatch {
        index: usize,
        expected: usize,
        got: usize,
    },

    /// Two entries share a direction, which would make indices ambiguous.
    #[error("filters {first} and {second} share a direction")]
    DuplicateDirection { first: usize, second: usize },

    /// A bank must hold at least one filter.
    #[error("a filter bank cannot be empty")]
    EmptyBank,

    /// The measured directions do not span a volume, so no triangulation exists.  Fewer than three directions can
    /// never be triangulated; four or more that are collinear or coplanar cannot either.
    #[error("the {0} measured directions do not admit a spherical triangulation")]
    DegenerateGeometry(usize),

    /// The analysis band holds no spectral bins at this filter length and sample rate.
    #[error("the band {low_hz} Hz to {high_hz} Hz holds no spectral bins")]
    EmptyBand { low_hz: f64, high_hz: f64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

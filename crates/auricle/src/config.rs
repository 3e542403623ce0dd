//! Tolerances of the directional comparisons.
//!
//! Measurement grids quote their angles in whole or half degrees, so these are far above floating error but well
//! below any real grid spacing.

/// Great-circle separation, in degrees, under which two directions count as the same measurement point.
///
/// Used both by duplicate detection at bank construction and by the exact-match shortcut of
/// [crate::FilterBank::interpolate].
pub const DIRECTION_TOLERANCE: f64 = 0.1;

/// How far, in degrees, a stored elevation may sit from the requested one and still be selected by
/// [crate::FilterBank::elevation_sources].
pub const ELEVATION_TOLERANCE: f64 = 0.5;

/// How far, in degrees of lateral angle, a stored direction may sit from the requested cone and still be selected by
/// [crate::FilterBank::cone_sources].
pub const CONE_TOLERANCE: f64 = 0.5;

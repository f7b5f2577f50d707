//! Core traits for sensitivity containers.

use std::fmt;

/// Additive, immutable sensitivity container.
///
/// Implemented by [`CurveSensitivityMap`](crate::CurveSensitivityMap),
/// [`MulticurveSensitivity`](crate::MulticurveSensitivity) and
/// [`InflationSensitivity`](crate::InflationSensitivity). `Default` must
/// return the empty container, which is the identity of [`plus`](Self::plus).
///
/// Every method returns a new value; receivers and arguments are left as
/// they were.
pub trait CurveSensitivity: Clone + Default + PartialEq + fmt::Debug + Send + Sync {
    /// Union of both containers, appending entries on shared curves.
    #[must_use]
    fn plus(&self, other: &Self) -> Self;

    /// Scales every value by `factor`.
    #[must_use]
    fn multiplied_by(&self, factor: f64) -> Self;

    /// Nets entries that share a coordinate.
    #[must_use]
    fn cleaned(&self) -> Self;

    /// Nets entries, then drops those whose absolute value is below
    /// `tolerance` along with any curve left empty.
    #[must_use]
    fn cleaned_with_tolerance(&self, tolerance: f64) -> Self;

    /// Compares netted content with an absolute tolerance on values.
    fn approx_eq(&self, other: &Self, tolerance: f64) -> bool;

    /// Returns true if the container holds no curve.
    fn is_empty(&self) -> bool;
}

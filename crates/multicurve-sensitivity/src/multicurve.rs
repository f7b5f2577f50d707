//! Point sensitivities to discounting and forward curves.

use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

use crate::curve_map::{ForwardSensitivityMap, PointSensitivityMap};
use crate::traits::CurveSensitivity;

/// Sensitivity of a value to the curves of a multi-curve market.
///
/// Holds two independent maps:
///
/// - **yield discounting**: sensitivities to zero rates of discounting curves,
///   as `(time, value)` points
/// - **forward**: sensitivities to forward rates of projection curves, as
///   [`ForwardSensitivity`](crate::ForwardSensitivity) entries
///
/// Every operation works on both maps independently.
///
/// # Example
///
/// ```rust
/// use multicurve_sensitivity::{MulticurveSensitivity, PointSensitivityMap};
///
/// let coupon = MulticurveSensitivity::of_yield_discounting(
///     PointSensitivityMap::of("USD-OIS", vec![(1.0, -95.0)]),
/// );
/// let redemption = MulticurveSensitivity::of_yield_discounting(
///     PointSensitivityMap::of("USD-OIS", vec![(1.0, -900.0)]),
/// );
/// let total = coupon.plus(&redemption).cleaned();
/// assert_eq!(total.yield_discounting().get("USD-OIS").unwrap()[0].value, -995.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Hash, Serialize, Deserialize)]
pub struct MulticurveSensitivity {
    yield_discounting: PointSensitivityMap,
    forward: ForwardSensitivityMap,
}

impl MulticurveSensitivity {
    /// Creates an empty sensitivity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sensitivity from both maps.
    #[must_use]
    pub fn of(yield_discounting: PointSensitivityMap, forward: ForwardSensitivityMap) -> Self {
        Self {
            yield_discounting,
            forward,
        }
    }

    /// Creates a sensitivity with only discounting-curve entries.
    #[must_use]
    pub fn of_yield_discounting(yield_discounting: impl Into<PointSensitivityMap>) -> Self {
        Self::of(yield_discounting.into(), ForwardSensitivityMap::new())
    }

    /// Creates a sensitivity with only forward-curve entries.
    #[must_use]
    pub fn of_forward(forward: impl Into<ForwardSensitivityMap>) -> Self {
        Self::of(PointSensitivityMap::new(), forward.into())
    }

    /// Sensitivities to discounting curves.
    pub fn yield_discounting(&self) -> &PointSensitivityMap {
        &self.yield_discounting
    }

    /// Sensitivities to forward curves.
    pub fn forward(&self) -> &ForwardSensitivityMap {
        &self.forward
    }

    /// Componentwise union; see [`CurveSensitivityMap::plus`](crate::CurveSensitivityMap::plus).
    #[must_use]
    pub fn plus(&self, other: &Self) -> Self {
        Self {
            yield_discounting: self.yield_discounting.plus(&other.yield_discounting),
            forward: self.forward.plus(&other.forward),
        }
    }

    /// Scales both maps.
    #[must_use]
    pub fn multiplied_by(&self, factor: f64) -> Self {
        Self {
            yield_discounting: self.yield_discounting.multiplied_by(factor),
            forward: self.forward.multiplied_by(factor),
        }
    }

    /// Cleans both maps independently.
    #[must_use]
    pub fn cleaned(&self) -> Self {
        Self {
            yield_discounting: self.yield_discounting.cleaned(),
            forward: self.forward.cleaned(),
        }
    }

    /// Cleans both maps with a tolerance, dropping negligible entries.
    #[must_use]
    pub fn cleaned_with_tolerance(&self, tolerance: f64) -> Self {
        Self {
            yield_discounting: self.yield_discounting.cleaned_with_tolerance(tolerance),
            forward: self.forward.cleaned_with_tolerance(tolerance),
        }
    }

    /// Compares netted content of both maps within `tolerance`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.yield_discounting
            .approx_eq(&other.yield_discounting, tolerance)
            && self.forward.approx_eq(&other.forward, tolerance)
    }

    /// Returns true if neither map holds a curve.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.yield_discounting.is_empty() && self.forward.is_empty()
    }
}

impl CurveSensitivity for MulticurveSensitivity {
    fn plus(&self, other: &Self) -> Self {
        MulticurveSensitivity::plus(self, other)
    }

    fn multiplied_by(&self, factor: f64) -> Self {
        MulticurveSensitivity::multiplied_by(self, factor)
    }

    fn cleaned(&self) -> Self {
        MulticurveSensitivity::cleaned(self)
    }

    fn cleaned_with_tolerance(&self, tolerance: f64) -> Self {
        MulticurveSensitivity::cleaned_with_tolerance(self, tolerance)
    }

    fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        MulticurveSensitivity::approx_eq(self, other, tolerance)
    }

    fn is_empty(&self) -> bool {
        MulticurveSensitivity::is_empty(self)
    }
}

impl Add for MulticurveSensitivity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.plus(&rhs)
    }
}

impl Mul<f64> for MulticurveSensitivity {
    type Output = Self;

    fn mul(self, factor: f64) -> Self {
        self.multiplied_by(factor)
    }
}

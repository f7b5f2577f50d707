//! Point sensitivities to discounting, forward and price-index curves.

use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

use crate::curve_map::{ForwardSensitivityMap, PointSensitivityMap};
use crate::multicurve::MulticurveSensitivity;
use crate::traits::CurveSensitivity;

/// Sensitivity of an inflation-linked value.
///
/// Extends [`MulticurveSensitivity`] with a third map of point sensitivities
/// to price-index curves. The three maps never interact: `plus`, `cleaned`
/// and `multiplied_by` apply to each one separately.
#[derive(Debug, Clone, Default, PartialEq, Hash, Serialize, Deserialize)]
pub struct InflationSensitivity {
    yield_discounting: PointSensitivityMap,
    forward: ForwardSensitivityMap,
    price_curve: PointSensitivityMap,
}

impl InflationSensitivity {
    /// Creates an empty sensitivity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sensitivity from all three maps.
    #[must_use]
    pub fn of(
        yield_discounting: PointSensitivityMap,
        forward: ForwardSensitivityMap,
        price_curve: PointSensitivityMap,
    ) -> Self {
        Self {
            yield_discounting,
            forward,
            price_curve,
        }
    }

    /// Creates a sensitivity with only discounting-curve entries.
    #[must_use]
    pub fn of_yield_discounting(yield_discounting: impl Into<PointSensitivityMap>) -> Self {
        Self::of(
            yield_discounting.into(),
            ForwardSensitivityMap::new(),
            PointSensitivityMap::new(),
        )
    }

    /// Creates a sensitivity with only forward-curve entries.
    #[must_use]
    pub fn of_forward(forward: impl Into<ForwardSensitivityMap>) -> Self {
        Self::of(
            PointSensitivityMap::new(),
            forward.into(),
            PointSensitivityMap::new(),
        )
    }

    /// Creates a sensitivity with only price-index entries.
    #[must_use]
    pub fn of_price_index(price_curve: impl Into<PointSensitivityMap>) -> Self {
        Self::of(
            PointSensitivityMap::new(),
            ForwardSensitivityMap::new(),
            price_curve.into(),
        )
    }

    /// Creates a sensitivity with discounting and price-index entries.
    #[must_use]
    pub fn of_yield_discounting_and_price_index(
        yield_discounting: impl Into<PointSensitivityMap>,
        price_curve: impl Into<PointSensitivityMap>,
    ) -> Self {
        Self::of(
            yield_discounting.into(),
            ForwardSensitivityMap::new(),
            price_curve.into(),
        )
    }

    /// Sensitivities to discounting curves.
    pub fn yield_discounting(&self) -> &PointSensitivityMap {
        &self.yield_discounting
    }

    /// Sensitivities to forward curves.
    pub fn forward(&self) -> &ForwardSensitivityMap {
        &self.forward
    }

    /// Sensitivities to price-index curves.
    pub fn price_curve(&self) -> &PointSensitivityMap {
        &self.price_curve
    }

    /// Componentwise union of the three maps.
    #[must_use]
    pub fn plus(&self, other: &Self) -> Self {
        Self {
            yield_discounting: self.yield_discounting.plus(&other.yield_discounting),
            forward: self.forward.plus(&other.forward),
            price_curve: self.price_curve.plus(&other.price_curve),
        }
    }

    /// Scales the three maps.
    #[must_use]
    pub fn multiplied_by(&self, factor: f64) -> Self {
        Self {
            yield_discounting: self.yield_discounting.multiplied_by(factor),
            forward: self.forward.multiplied_by(factor),
            price_curve: self.price_curve.multiplied_by(factor),
        }
    }

    /// Cleans the three maps independently.
    #[must_use]
    pub fn cleaned(&self) -> Self {
        Self {
            yield_discounting: self.yield_discounting.cleaned(),
            forward: self.forward.cleaned(),
            price_curve: self.price_curve.cleaned(),
        }
    }

    /// Cleans the three maps with a tolerance, dropping negligible entries.
    #[must_use]
    pub fn cleaned_with_tolerance(&self, tolerance: f64) -> Self {
        Self {
            yield_discounting: self.yield_discounting.cleaned_with_tolerance(tolerance),
            forward: self.forward.cleaned_with_tolerance(tolerance),
            price_curve: self.price_curve.cleaned_with_tolerance(tolerance),
        }
    }

    /// Compares the netted content of the three maps within `tolerance`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.yield_discounting
            .approx_eq(&other.yield_discounting, tolerance)
            && self.forward.approx_eq(&other.forward, tolerance)
            && self.price_curve.approx_eq(&other.price_curve, tolerance)
    }

    /// Returns true if no map holds a curve.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.yield_discounting.is_empty() && self.forward.is_empty() && self.price_curve.is_empty()
    }
}

impl From<MulticurveSensitivity> for InflationSensitivity {
    fn from(sensitivity: MulticurveSensitivity) -> Self {
        Self::of(
            sensitivity.yield_discounting().clone(),
            sensitivity.forward().clone(),
            PointSensitivityMap::new(),
        )
    }
}

impl CurveSensitivity for InflationSensitivity {
    fn plus(&self, other: &Self) -> Self {
        InflationSensitivity::plus(self, other)
    }

    fn multiplied_by(&self, factor: f64) -> Self {
        InflationSensitivity::multiplied_by(self, factor)
    }

    fn cleaned(&self) -> Self {
        InflationSensitivity::cleaned(self)
    }

    fn cleaned_with_tolerance(&self, tolerance: f64) -> Self {
        InflationSensitivity::cleaned_with_tolerance(self, tolerance)
    }

    fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        InflationSensitivity::approx_eq(self, other, tolerance)
    }

    fn is_empty(&self) -> bool {
        InflationSensitivity::is_empty(self)
    }
}

impl Add for InflationSensitivity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.plus(&rhs)
    }
}

impl Mul<f64> for InflationSensitivity {
    type Output = Self;

    fn mul(self, factor: f64) -> Self {
        self.multiplied_by(factor)
    }
}

//! Individual sensitivity entries stored against a curve.
//!
//! Two kinds of entry exist:
//!
//! - [`CurvePoint`]: sensitivity to a single curve node, located by its
//!   abscissa (usually a time to maturity)
//! - [`ForwardSensitivity`]: sensitivity to a forward rate observed over a
//!   period, with the accrual factor of that period
//!
//! Both implement [`SensitivityEntry`], which is what the curve maps need to
//! net entries together: a hashable coordinate, a value, and a way to
//! rebuild the entry with a different value.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{SensitivityError, SensitivityResult};

/// An entry that can be stored in a [`CurveSensitivityMap`](crate::CurveSensitivityMap).
pub trait SensitivityEntry: Clone + PartialEq + fmt::Debug + Send + Sync {
    /// Key under which entries are netted by `cleaned`.
    type Coordinate: Copy + Eq + Hash + fmt::Debug;

    /// Returns the netting key of this entry.
    fn coordinate(&self) -> Self::Coordinate;

    /// Returns the sensitivity value.
    fn value(&self) -> f64;

    /// Returns a copy of this entry carrying a different value.
    #[must_use]
    fn with_value(&self, value: f64) -> Self;
}

/// Bit pattern used to compare coordinates exactly, with `-0.0 == 0.0`.
pub(crate) fn coordinate_bits(x: f64) -> u64 {
    if x == 0.0 {
        0
    } else {
        x.to_bits()
    }
}

/// Sensitivity to one curve node: the (abscissa, value) pair.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Location of the node, typically a time in years.
    pub abscissa: f64,
    /// Sensitivity of the measured value to the node.
    pub value: f64,
}

impl CurvePoint {
    /// Creates a new point sensitivity.
    #[must_use]
    pub fn new(abscissa: f64, value: f64) -> Self {
        Self { abscissa, value }
    }
}

impl From<(f64, f64)> for CurvePoint {
    fn from((abscissa, value): (f64, f64)) -> Self {
        Self::new(abscissa, value)
    }
}

impl Hash for CurvePoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        coordinate_bits(self.abscissa).hash(state);
        coordinate_bits(self.value).hash(state);
    }
}

impl SensitivityEntry for CurvePoint {
    type Coordinate = u64;

    fn coordinate(&self) -> u64 {
        coordinate_bits(self.abscissa)
    }

    fn value(&self) -> f64 {
        self.value
    }

    fn with_value(&self, value: f64) -> Self {
        Self::new(self.abscissa, value)
    }
}

/// Sensitivity to a simply-compounded forward rate.
///
/// The forward rate covers `[start_time, end_time]` and accrues over
/// `accrual_factor`. Construction fails unless `end_time > start_time`;
/// accrual factor and value may take any sign.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "ForwardFields")]
pub struct SimplyCompoundedForward {
    start_time: f64,
    end_time: f64,
    accrual_factor: f64,
    value: f64,
}

impl SimplyCompoundedForward {
    /// Creates a new forward sensitivity.
    pub fn new(
        start_time: f64,
        end_time: f64,
        accrual_factor: f64,
        value: f64,
    ) -> SensitivityResult<Self> {
        // Written so that NaN times are rejected as well.
        if !(end_time > start_time) {
            return Err(SensitivityError::InvalidForwardPeriod {
                start_time,
                end_time,
            });
        }
        Ok(Self {
            start_time,
            end_time,
            accrual_factor,
            value,
        })
    }

    /// Start of the forward period.
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// End of the forward period.
    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    /// Accrual factor of the forward period.
    pub fn accrual_factor(&self) -> f64 {
        self.accrual_factor
    }

    /// Sensitivity value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Derivative of the simply-compounded forward rate with respect to the
    /// continuously-compounded zero rate over the period, given the forward.
    pub fn derivative_to_yield(&self, forward: f64) -> f64 {
        (self.end_time - self.start_time) * (1.0 + self.accrual_factor * forward)
            / self.accrual_factor
    }
}

#[derive(Deserialize)]
struct ForwardFields {
    start_time: f64,
    end_time: f64,
    accrual_factor: f64,
    value: f64,
}

impl TryFrom<ForwardFields> for SimplyCompoundedForward {
    type Error = SensitivityError;

    fn try_from(fields: ForwardFields) -> SensitivityResult<Self> {
        Self::new(
            fields.start_time,
            fields.end_time,
            fields.accrual_factor,
            fields.value,
        )
    }
}

/// Sensitivity to a forward rate, by compounding convention.
///
/// Netting groups entries on `(convention, start_time, end_time, accrual_factor)`,
/// so every convention added here must supply those coordinates.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum ForwardSensitivity {
    /// Simply-compounded (money-market) forward rate.
    SimplyCompounded(SimplyCompoundedForward),
}

impl ForwardSensitivity {
    /// Creates a simply-compounded forward sensitivity.
    ///
    /// # Errors
    ///
    /// Returns [`SensitivityError::InvalidForwardPeriod`] when
    /// `end_time <= start_time`.
    pub fn simply_compounded(
        start_time: f64,
        end_time: f64,
        accrual_factor: f64,
        value: f64,
    ) -> SensitivityResult<Self> {
        SimplyCompoundedForward::new(start_time, end_time, accrual_factor, value)
            .map(Self::SimplyCompounded)
    }

    /// Start of the forward period.
    pub fn start_time(&self) -> f64 {
        match self {
            Self::SimplyCompounded(forward) => forward.start_time,
        }
    }

    /// End of the forward period.
    pub fn end_time(&self) -> f64 {
        match self {
            Self::SimplyCompounded(forward) => forward.end_time,
        }
    }

    /// Accrual factor of the forward period.
    pub fn accrual_factor(&self) -> f64 {
        match self {
            Self::SimplyCompounded(forward) => forward.accrual_factor,
        }
    }

    /// Sensitivity value.
    pub fn value(&self) -> f64 {
        match self {
            Self::SimplyCompounded(forward) => forward.value,
        }
    }
}

impl Hash for ForwardSensitivity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coordinate().hash(state);
        coordinate_bits(self.value()).hash(state);
    }
}

/// Netting key of a [`ForwardSensitivity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ForwardCoordinate {
    convention: u8,
    start_time: u64,
    end_time: u64,
    accrual_factor: u64,
}

impl SensitivityEntry for ForwardSensitivity {
    type Coordinate = ForwardCoordinate;

    fn coordinate(&self) -> ForwardCoordinate {
        let convention = match self {
            Self::SimplyCompounded(_) => 0,
        };
        ForwardCoordinate {
            convention,
            start_time: coordinate_bits(self.start_time()),
            end_time: coordinate_bits(self.end_time()),
            accrual_factor: coordinate_bits(self.accrual_factor()),
        }
    }

    fn value(&self) -> f64 {
        ForwardSensitivity::value(self)
    }

    fn with_value(&self, value: f64) -> Self {
        match self {
            Self::SimplyCompounded(forward) => Self::SimplyCompounded(SimplyCompoundedForward {
                value,
                ..*forward
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_forward_construction() {
        let fwd = ForwardSensitivity::simply_compounded(0.5, 0.75, 0.25, 100.0).unwrap();
        assert_eq!(fwd.start_time(), 0.5);
        assert_eq!(fwd.end_time(), 0.75);
        assert_eq!(fwd.accrual_factor(), 0.25);
        assert_eq!(fwd.value(), 100.0);
    }

    #[test]
    fn test_forward_rejects_inverted_period() {
        let err = ForwardSensitivity::simply_compounded(1.0, 0.5, 0.5, 1.0).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(ForwardSensitivity::simply_compounded(1.0, 1.0, 0.5, 1.0).is_err());
        assert!(ForwardSensitivity::simply_compounded(f64::NAN, 1.0, 0.5, 1.0).is_err());
    }

    #[test]
    fn test_forward_accepts_negative_accrual_and_value() {
        let fwd = ForwardSensitivity::simply_compounded(0.0, 0.5, -0.5, -10.0).unwrap();
        assert_eq!(fwd.accrual_factor(), -0.5);
        assert_eq!(fwd.value(), -10.0);
    }

    #[test]
    fn test_forward_equality_is_exact() {
        let a = ForwardSensitivity::simply_compounded(0.5, 0.75, 0.25, 100.0).unwrap();
        let b = ForwardSensitivity::simply_compounded(0.5, 0.75, 0.25, 100.0).unwrap();
        let c = ForwardSensitivity::simply_compounded(0.5, 0.75, 0.25, 100.0 + 1e-12).unwrap();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, c);
    }

    #[test]
    fn test_forward_ordering() {
        let early = ForwardSensitivity::simply_compounded(0.25, 0.5, 0.25, 5.0).unwrap();
        let late = ForwardSensitivity::simply_compounded(0.5, 0.75, 0.25, 1.0).unwrap();
        assert!(early < late);
    }

    #[test]
    fn test_coordinate_ignores_value() {
        let a = ForwardSensitivity::simply_compounded(0.5, 0.75, 0.25, 100.0).unwrap();
        let b = a.with_value(-3.0);
        assert_eq!(a.coordinate(), b.coordinate());
        assert_eq!(b.value(), -3.0);

        let other_accrual = ForwardSensitivity::simply_compounded(0.5, 0.75, 0.26, 100.0).unwrap();
        assert_ne!(a.coordinate(), other_accrual.coordinate());
    }

    #[test]
    fn test_point_coordinate_signed_zero() {
        let a = CurvePoint::new(0.0, 1.0);
        let b = CurvePoint::new(-0.0, 2.0);
        assert_eq!(a.coordinate(), b.coordinate());
    }

    #[test]
    fn test_point_from_tuple() {
        let point: CurvePoint = (2.0, 20.0).into();
        assert_eq!(point, CurvePoint::new(2.0, 20.0));
        assert_eq!(point.with_value(5.0), CurvePoint::new(2.0, 5.0));
    }

    #[test]
    fn test_derivative_to_yield() {
        let fwd = SimplyCompoundedForward::new(1.0, 1.5, 0.5, 1.0).unwrap();
        // (t_e - t_s)(1 + delta * F) / delta
        assert!((fwd.derivative_to_yield(0.02) - 0.5 * 1.01 / 0.5).abs() < 1e-14);
    }

    #[test]
    fn test_forward_serde_validates() {
        let fwd = ForwardSensitivity::simply_compounded(0.5, 0.75, 0.25, 100.0).unwrap();
        let json = serde_json::to_string(&fwd).unwrap();
        let parsed: ForwardSensitivity = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, fwd);

        let bad = r#"{"SimplyCompounded":{"start_time":1.0,"end_time":0.5,"accrual_factor":0.5,"value":1.0}}"#;
        assert!(serde_json::from_str::<ForwardSensitivity>(bad).is_err());
    }
}

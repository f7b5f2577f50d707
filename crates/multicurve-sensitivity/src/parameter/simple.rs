//! Parameter sensitivities keyed by curve name.

use nalgebra::DVector;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{check_name, VectorMap};
use crate::error::{SensitivityError, SensitivityResult};

/// Parameter sensitivities keyed by curve name, in insertion order.
///
/// Equality ignores key order and compares vectors exactly; `Hash` agrees
/// with it. `Eq` is not implemented since vectors may hold NaN.
///
/// # Example
///
/// ```rust
/// use multicurve_sensitivity::SimpleParameterSensitivity;
/// use nalgebra::DVector;
///
/// let first = SimpleParameterSensitivity::of("USD-OIS", DVector::from_vec(vec![4.0, 2.0])).unwrap();
/// let total = first.plus_curve("USD-OIS", &DVector::from_vec(vec![4.0, 3.0])).unwrap();
/// assert_eq!(total.sensitivity("USD-OIS").unwrap().as_slice(), &[8.0, 5.0]);
///
/// // Vectors for one curve must keep their length
/// assert!(total.plus_curve("USD-OIS", &DVector::from_vec(vec![1.0])).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Hash)]
pub struct SimpleParameterSensitivity {
    sensitivities: VectorMap<String>,
}

impl SimpleParameterSensitivity {
    /// Creates an empty sensitivity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sensitivity holding one curve.
    pub fn of(name: impl Into<String>, sensitivity: DVector<f64>) -> SensitivityResult<Self> {
        Self::new().plus_curve(name, &sensitivity)
    }

    /// Adds a vector for a curve.
    ///
    /// A new curve is appended. For a known curve the vectors are summed
    /// element by element.
    ///
    /// # Errors
    ///
    /// [`SensitivityError::InvalidArgument`] for an empty name and
    /// [`SensitivityError::LengthMismatch`] when the stored vector has a
    /// different length.
    pub fn plus_curve(
        &self,
        name: impl Into<String>,
        sensitivity: &DVector<f64>,
    ) -> SensitivityResult<Self> {
        let name = name.into();
        check_name(&name)?;
        let mut sensitivities = self.sensitivities.clone();
        sensitivities.add(&name, sensitivity, || name.clone())?;
        Ok(Self { sensitivities })
    }

    /// Adds every curve of `other`, in `other`'s order.
    ///
    /// # Errors
    ///
    /// [`SensitivityError::LengthMismatch`] when a curve present on both
    /// sides has vectors of different lengths.
    pub fn plus(&self, other: &Self) -> SensitivityResult<Self> {
        let mut sensitivities = self.sensitivities.clone();
        sensitivities.merge(&other.sensitivities, String::clone)?;
        Ok(Self { sensitivities })
    }

    /// Scales every vector.
    #[must_use]
    pub fn multiplied_by(&self, factor: f64) -> Self {
        Self {
            sensitivities: self.sensitivities.scaled(factor),
        }
    }

    /// Returns the vector stored for `name`.
    ///
    /// # Errors
    ///
    /// [`SensitivityError::InvalidArgument`] for an empty name and
    /// [`SensitivityError::NotFound`] for an unknown curve.
    pub fn sensitivity(&self, name: &str) -> SensitivityResult<&DVector<f64>> {
        check_name(name)?;
        self.sensitivities
            .get(&name.to_string())
            .ok_or_else(|| SensitivityError::not_found(name))
    }

    /// Curve names in insertion order.
    pub fn all_names(&self) -> impl Iterator<Item = &str> {
        self.sensitivities.iter().map(|(name, _)| name.as_str())
    }

    /// Iterates over `(curve name, vector)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DVector<f64>)> {
        self.sensitivities
            .iter()
            .map(|(name, vector)| (name.as_str(), vector))
    }

    /// Sum of every element of every vector.
    #[must_use]
    pub fn total_sensitivity(&self) -> f64 {
        self.sensitivities.iter().map(|(_, vector)| vector.sum()).sum()
    }

    /// Same curves, same lengths, elements within `tolerance`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.sensitivities.approx_eq(&other.sensitivities, tolerance)
    }

    /// Number of curves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sensitivities.len()
    }

    /// Returns true if no curve is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sensitivities.is_empty()
    }
}

#[derive(Serialize)]
struct CurveRecordRef<'a> {
    curve: &'a str,
    sensitivity: &'a [f64],
}

#[derive(Deserialize)]
struct CurveRecord {
    curve: String,
    sensitivity: Vec<f64>,
}

impl Serialize for SimpleParameterSensitivity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|(curve, vector)| CurveRecordRef {
            curve,
            sensitivity: vector.as_slice(),
        }))
    }
}

impl<'de> Deserialize<'de> for SimpleParameterSensitivity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = Vec::<CurveRecord>::deserialize(deserializer)?;
        let mut sensitivities = VectorMap::default();
        for record in records {
            check_name(&record.curve).map_err(D::Error::custom)?;
            let vector = DVector::from_vec(record.sensitivity);
            sensitivities
                .add(&record.curve, &vector, || record.curve.clone())
                .map_err(D::Error::custom)?;
        }
        Ok(Self { sensitivities })
    }
}

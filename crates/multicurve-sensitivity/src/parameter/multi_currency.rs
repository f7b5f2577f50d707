//! Parameter sensitivities keyed by curve name and currency.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use multicurve_core::{Currency, FxRateProvider};
use nalgebra::DVector;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, trace};

use super::{check_name, SimpleParameterSensitivity, VectorMap};
use crate::error::{SensitivityError, SensitivityResult};

type Key = (String, Currency);

fn describe(key: &Key) -> String {
    format!("{} ({})", key.0, key.1)
}

/// Parameter sensitivities keyed by `(curve name, currency)`.
///
/// The same curve may carry vectors in several currencies, e.g. a curve used
/// by legs paying in different currencies. Keys keep insertion order;
/// equality and `Hash` ignore it.
#[derive(Debug, Clone, Default, PartialEq, Hash)]
pub struct MultipleCurrencyParameterSensitivity {
    sensitivities: VectorMap<Key>,
}

impl MultipleCurrencyParameterSensitivity {
    /// Creates an empty sensitivity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sensitivity holding one `(curve, currency)` entry.
    pub fn of(
        name: impl Into<String>,
        currency: Currency,
        sensitivity: DVector<f64>,
    ) -> SensitivityResult<Self> {
        Self::new().plus_entry(name, currency, &sensitivity)
    }

    /// Tags every curve of a [`SimpleParameterSensitivity`] with `currency`.
    #[must_use]
    pub fn from_simple(simple: &SimpleParameterSensitivity, currency: Currency) -> Self {
        let mut sensitivities = VectorMap::default();
        for (name, vector) in simple.iter() {
            sensitivities.push_unique((name.to_string(), currency), vector.clone());
        }
        Self { sensitivities }
    }

    /// Adds a vector for a `(curve, currency)` entry.
    ///
    /// # Errors
    ///
    /// [`SensitivityError::InvalidArgument`] for an empty name and
    /// [`SensitivityError::LengthMismatch`] when the stored vector has a
    /// different length.
    pub fn plus_entry(
        &self,
        name: impl Into<String>,
        currency: Currency,
        sensitivity: &DVector<f64>,
    ) -> SensitivityResult<Self> {
        let key = (name.into(), currency);
        check_name(&key.0)?;
        let mut sensitivities = self.sensitivities.clone();
        sensitivities.add(&key, sensitivity, || describe(&key))?;
        Ok(Self { sensitivities })
    }

    /// Adds every entry of `other`, in `other`'s order.
    ///
    /// # Errors
    ///
    /// [`SensitivityError::LengthMismatch`] when an entry present on both
    /// sides has vectors of different lengths.
    pub fn plus(&self, other: &Self) -> SensitivityResult<Self> {
        let mut sensitivities = self.sensitivities.clone();
        sensitivities.merge(&other.sensitivities, describe)?;
        Ok(Self { sensitivities })
    }

    /// Scales every vector.
    #[must_use]
    pub fn multiplied_by(&self, factor: f64) -> Self {
        Self {
            sensitivities: self.sensitivities.scaled(factor),
        }
    }

    /// Returns the vector stored for `(name, currency)`.
    ///
    /// # Errors
    ///
    /// [`SensitivityError::InvalidArgument`] for an empty name and
    /// [`SensitivityError::NotFound`] for an unknown entry.
    pub fn sensitivity(&self, name: &str, currency: Currency) -> SensitivityResult<&DVector<f64>> {
        check_name(name)?;
        let key = (name.to_string(), currency);
        self.sensitivities
            .get(&key)
            .ok_or_else(|| SensitivityError::not_found(describe(&key)))
    }

    /// Vectors of one curve, by currency.
    ///
    /// Empty if the curve is unknown.
    #[must_use]
    pub fn sensitivity_by_name(&self, name: &str) -> BTreeMap<Currency, DVector<f64>> {
        self.sensitivities
            .iter()
            .filter(|((curve, _), _)| curve == name)
            .map(|((_, currency), vector)| (*currency, vector.clone()))
            .collect()
    }

    /// Converts every entry into `target`.
    ///
    /// Each vector is scaled by the rate from its currency to `target` and
    /// re-keyed under `(name, target)`. Entries of the same curve that meet
    /// under the new key are summed.
    ///
    /// # Errors
    ///
    /// [`SensitivityError::Fx`] when a rate is missing and
    /// [`SensitivityError::LengthMismatch`] when two vectors of the same
    /// curve differ in length.
    pub fn converted<P>(&self, fx: &P, target: Currency) -> SensitivityResult<Self>
    where
        P: FxRateProvider + ?Sized,
    {
        debug!(
            entries = self.sensitivities.len(),
            target = %target,
            "converting parameter sensitivity"
        );
        let mut sensitivities = VectorMap::default();
        for ((name, currency), vector) in self.sensitivities.iter() {
            let rate = fx.fx_rate(*currency, target)?;
            trace!(curve = %name, from = %currency, to = %target, rate, "fx rate applied");
            let key = (name.clone(), target);
            sensitivities.add(&key, &(vector * rate), || describe(&key))?;
        }
        Ok(Self { sensitivities })
    }

    /// `(curve, currency)` keys in insertion order.
    pub fn all_names_currency(&self) -> impl Iterator<Item = (&str, Currency)> {
        self.sensitivities
            .iter()
            .map(|((name, currency), _)| (name.as_str(), *currency))
    }

    /// Distinct curve names, in order of first appearance.
    #[must_use]
    pub fn all_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.all_names_currency()
            .map(|(name, _)| name)
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Distinct currencies, sorted.
    #[must_use]
    pub fn currencies(&self) -> BTreeSet<Currency> {
        self.all_names_currency()
            .map(|(_, currency)| currency)
            .collect()
    }

    /// Sum of every element, each converted into `currency`.
    pub fn total_sensitivity<P>(&self, fx: &P, currency: Currency) -> SensitivityResult<f64>
    where
        P: FxRateProvider + ?Sized,
    {
        self.sensitivities
            .iter()
            .try_fold(0.0, |total, ((_, from), vector)| -> SensitivityResult<f64> {
                let rate = fx.fx_rate(*from, currency)?;
                Ok(total + vector.sum() * rate)
            })
    }

    /// Sum of every element, by currency and without conversion.
    #[must_use]
    pub fn total_by_currency(&self) -> BTreeMap<Currency, f64> {
        let mut totals = BTreeMap::new();
        for ((_, currency), vector) in self.sensitivities.iter() {
            *totals.entry(*currency).or_insert(0.0) += vector.sum();
        }
        totals
    }

    /// Same keys, same lengths, elements within `tolerance`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.sensitivities.approx_eq(&other.sensitivities, tolerance)
    }

    /// Iterates over `(curve, currency, vector)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Currency, &DVector<f64>)> {
        self.sensitivities
            .iter()
            .map(|((name, currency), vector)| (name.as_str(), *currency, vector))
    }

    /// Number of `(curve, currency)` entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sensitivities.len()
    }

    /// Returns true if no entry is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sensitivities.is_empty()
    }
}

#[derive(Serialize)]
struct EntryRecordRef<'a> {
    curve: &'a str,
    currency: Currency,
    sensitivity: &'a [f64],
}

#[derive(Deserialize)]
struct EntryRecord {
    curve: String,
    currency: Currency,
    sensitivity: Vec<f64>,
}

impl Serialize for MultipleCurrencyParameterSensitivity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|(curve, currency, vector)| EntryRecordRef {
            curve,
            currency,
            sensitivity: vector.as_slice(),
        }))
    }
}

impl<'de> Deserialize<'de> for MultipleCurrencyParameterSensitivity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = Vec::<EntryRecord>::deserialize(deserializer)?;
        let mut sensitivities = VectorMap::default();
        for record in records {
            check_name(&record.curve).map_err(D::Error::custom)?;
            let key = (record.curve, record.currency);
            let vector = DVector::from_vec(record.sensitivity);
            sensitivities
                .add(&key, &vector, || describe(&key))
                .map_err(D::Error::custom)?;
        }
        Ok(Self { sensitivities })
    }
}

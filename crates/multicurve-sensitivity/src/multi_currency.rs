//! Point sensitivities split by currency.

use std::collections::BTreeMap;
use std::ops::{Add, Mul};

use multicurve_core::{Currency, FxRateProvider};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::SensitivityResult;
use crate::inflation::InflationSensitivity;
use crate::multicurve::MulticurveSensitivity;
use crate::traits::CurveSensitivity;

/// Multicurve sensitivities keyed by currency.
pub type MultipleCurrencyMulticurveSensitivity = MultipleCurrencySensitivity<MulticurveSensitivity>;

/// Inflation sensitivities keyed by currency.
pub type MultipleCurrencyInflationSensitivity = MultipleCurrencySensitivity<InflationSensitivity>;

/// A sensitivity per currency.
///
/// Holds at most one sensitivity per currency. Adding to a currency that is
/// already present merges through the sensitivity's own `plus`. A currency
/// with nothing stored reads as an empty sensitivity, see
/// [`sensitivity`](Self::sensitivity).
#[derive(Debug, Clone, PartialEq, Hash, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize",
    deserialize = "S: Deserialize<'de>"
))]
pub struct MultipleCurrencySensitivity<S> {
    sensitivities: BTreeMap<Currency, S>,
}

impl<S> Default for MultipleCurrencySensitivity<S> {
    fn default() -> Self {
        Self {
            sensitivities: BTreeMap::new(),
        }
    }
}

impl<S: CurveSensitivity> MultipleCurrencySensitivity<S> {
    /// Creates an empty sensitivity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sensitivity holding a single currency.
    #[must_use]
    pub fn of(currency: Currency, sensitivity: S) -> Self {
        let mut sensitivities = BTreeMap::new();
        sensitivities.insert(currency, sensitivity);
        Self { sensitivities }
    }

    /// Returns the sensitivity in `currency`, or an empty one if absent.
    #[must_use]
    pub fn sensitivity(&self, currency: Currency) -> S {
        self.sensitivities
            .get(&currency)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the stored sensitivity in `currency`, if any.
    #[must_use]
    pub fn get(&self, currency: Currency) -> Option<&S> {
        self.sensitivities.get(&currency)
    }

    /// Adds a sensitivity in one currency.
    #[must_use]
    pub fn plus_currency(&self, currency: Currency, sensitivity: &S) -> Self {
        let mut sensitivities = self.sensitivities.clone();
        merge_into(&mut sensitivities, currency, sensitivity);
        Self { sensitivities }
    }

    /// Adds every currency of `other`.
    #[must_use]
    pub fn plus(&self, other: &Self) -> Self {
        let mut sensitivities = self.sensitivities.clone();
        for (currency, sensitivity) in &other.sensitivities {
            merge_into(&mut sensitivities, *currency, sensitivity);
        }
        Self { sensitivities }
    }

    /// Scales the sensitivity of every currency.
    #[must_use]
    pub fn multiplied_by(&self, factor: f64) -> Self {
        self.map_values(|sensitivity| sensitivity.multiplied_by(factor))
    }

    /// Cleans the sensitivity of every currency.
    #[must_use]
    pub fn cleaned(&self) -> Self {
        self.map_values(CurveSensitivity::cleaned)
    }

    /// Cleans every currency with a tolerance.
    ///
    /// Currencies whose sensitivity nets away entirely are removed.
    #[must_use]
    pub fn cleaned_with_tolerance(&self, tolerance: f64) -> Self {
        let sensitivities = self
            .sensitivities
            .iter()
            .map(|(currency, sensitivity)| {
                (*currency, sensitivity.cleaned_with_tolerance(tolerance))
            })
            .filter(|(_, sensitivity)| !sensitivity.is_empty())
            .collect();
        Self { sensitivities }
    }

    /// Converts everything into `target`.
    ///
    /// Each currency's sensitivity is scaled by the rate from that currency
    /// to `target` and the results are merged into a single entry.
    ///
    /// # Errors
    ///
    /// Returns [`SensitivityError::Fx`](crate::SensitivityError::Fx) when a
    /// rate is missing from `fx`. Nothing is returned partially converted.
    pub fn converted<P>(&self, target: Currency, fx: &P) -> SensitivityResult<Self>
    where
        P: FxRateProvider + ?Sized,
    {
        debug!(
            currencies = self.sensitivities.len(),
            target = %target,
            "converting multi-currency sensitivity"
        );
        if self.sensitivities.is_empty() {
            return Ok(Self::new());
        }
        let mut converted = S::default();
        for (currency, sensitivity) in &self.sensitivities {
            let rate = fx.fx_rate(*currency, target)?;
            trace!(from = %currency, to = %target, rate, "fx rate applied");
            converted = converted.plus(&sensitivity.multiplied_by(rate));
        }
        Ok(Self::of(target, converted))
    }

    /// Iterates over currencies in sorted order.
    pub fn currencies(&self) -> impl Iterator<Item = Currency> + '_ {
        self.sensitivities.keys().copied()
    }

    /// Compares currency by currency within `tolerance`.
    ///
    /// Both sides must hold the same currencies.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.sensitivities.len() == other.sensitivities.len()
            && self.sensitivities.iter().all(|(currency, sensitivity)| {
                other
                    .sensitivities
                    .get(currency)
                    .is_some_and(|theirs| sensitivity.approx_eq(theirs, tolerance))
            })
    }

    /// Iterates over `(currency, sensitivity)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Currency, &S)> {
        self.sensitivities
            .iter()
            .map(|(currency, sensitivity)| (*currency, sensitivity))
    }

    /// Number of currencies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sensitivities.len()
    }

    /// Returns true if no currency is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sensitivities.is_empty()
    }

    fn map_values(&self, f: impl Fn(&S) -> S) -> Self {
        let sensitivities = self
            .sensitivities
            .iter()
            .map(|(currency, sensitivity)| (*currency, f(sensitivity)))
            .collect();
        Self { sensitivities }
    }
}

fn merge_into<S: CurveSensitivity>(
    sensitivities: &mut BTreeMap<Currency, S>,
    currency: Currency,
    sensitivity: &S,
) {
    match sensitivities.get_mut(&currency) {
        Some(existing) => *existing = existing.plus(sensitivity),
        None => {
            sensitivities.insert(currency, sensitivity.clone());
        }
    }
}

impl<S: CurveSensitivity> FromIterator<(Currency, S)> for MultipleCurrencySensitivity<S> {
    fn from_iter<I: IntoIterator<Item = (Currency, S)>>(iter: I) -> Self {
        let mut sensitivities = BTreeMap::new();
        for (currency, sensitivity) in iter {
            merge_into(&mut sensitivities, currency, &sensitivity);
        }
        Self { sensitivities }
    }
}

impl<S: CurveSensitivity> Add for MultipleCurrencySensitivity<S> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.plus(&rhs)
    }
}

impl<S: CurveSensitivity> Mul<f64> for MultipleCurrencySensitivity<S> {
    type Output = Self;

    fn mul(self, factor: f64) -> Self {
        self.multiplied_by(factor)
    }
}

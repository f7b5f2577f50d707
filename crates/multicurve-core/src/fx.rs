//! FX rates used to convert sensitivities between currencies.
//!
//! The sensitivity model only ever asks one question of market data: how
//! many units of `to` does one unit of `from` buy. That question is the
//! [`FxRateProvider`] trait. [`FxMatrix`] is the in-memory implementation,
//! storing every currency's value against a single reference currency so
//! that all cross rates are triangulation-consistent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::Currency;

/// Source of spot FX rates.
pub trait FxRateProvider: Send + Sync {
    /// Returns the amount of `to` obtained for one unit of `from`.
    ///
    /// The rate of a currency to itself is 1.
    fn fx_rate(&self, from: Currency, to: Currency) -> CoreResult<f64>;

    /// Converts an amount from one currency to another.
    fn convert(&self, amount: f64, from: Currency, to: Currency) -> CoreResult<f64> {
        Ok(amount * self.fx_rate(from, to)?)
    }
}

impl<P: FxRateProvider + ?Sized> FxRateProvider for &P {
    fn fx_rate(&self, from: Currency, to: Currency) -> CoreResult<f64> {
        (**self).fx_rate(from, to)
    }
}

/// Matrix of spot FX rates expressed against a reference currency.
///
/// The first currency added becomes the reference. Every other currency is
/// stored as its value in reference units, and cross rates are obtained by
/// division.
///
/// # Example
///
/// ```rust
/// use multicurve_core::{Currency, FxMatrix, FxRateProvider};
///
/// let mut fx = FxMatrix::from_pair(Currency::EUR, Currency::USD, 1.30).unwrap();
/// fx.add_currency(Currency::GBP, Currency::EUR, 1.15).unwrap();
///
/// let gbpusd = fx.fx_rate(Currency::GBP, Currency::USD).unwrap();
/// assert!((gbpusd - 1.15 * 1.30).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FxMatrix {
    reference: Option<Currency>,
    /// Value of one unit of each currency in reference units.
    values: BTreeMap<Currency, f64>,
}

impl FxMatrix {
    /// Creates an empty matrix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a matrix containing a single currency.
    #[must_use]
    pub fn with_currency(currency: Currency) -> Self {
        let mut values = BTreeMap::new();
        values.insert(currency, 1.0);
        Self {
            reference: Some(currency),
            values,
        }
    }

    /// Creates a two-currency matrix where one `ccy1` buys `rate` units of `ccy2`.
    pub fn from_pair(ccy1: Currency, ccy2: Currency, rate: f64) -> CoreResult<Self> {
        validate_rate(ccy1, ccy2, rate)?;
        let mut matrix = Self::with_currency(ccy1);
        matrix.add_currency(ccy2, ccy1, 1.0 / rate)?;
        Ok(matrix)
    }

    /// Adds a currency to the matrix.
    ///
    /// `rate` is the amount of `reference_ccy` obtained for one unit of
    /// `ccy_to_add`. On an empty matrix both currencies are added and
    /// `reference_ccy` becomes the reference currency.
    pub fn add_currency(
        &mut self,
        ccy_to_add: Currency,
        reference_ccy: Currency,
        rate: f64,
    ) -> CoreResult<()> {
        validate_rate(ccy_to_add, reference_ccy, rate)?;
        if self.values.contains_key(&ccy_to_add) {
            return Err(CoreError::CurrencyAlreadyPresent {
                currency: ccy_to_add,
            });
        }

        if self.reference.is_none() {
            self.reference = Some(reference_ccy);
            self.values.insert(reference_ccy, 1.0);
        }

        let reference_value = *self
            .values
            .get(&reference_ccy)
            .ok_or_else(|| CoreError::fx_rate_not_found(ccy_to_add, reference_ccy))?;
        self.values.insert(ccy_to_add, rate * reference_value);

        tracing::trace!(
            currency = %ccy_to_add,
            against = %reference_ccy,
            rate,
            "added currency to FX matrix"
        );
        Ok(())
    }

    /// Returns the reference currency, if any currency has been added.
    #[must_use]
    pub fn reference_currency(&self) -> Option<Currency> {
        self.reference
    }

    /// Returns true if the currency is present.
    #[must_use]
    pub fn contains(&self, currency: Currency) -> bool {
        self.values.contains_key(&currency)
    }

    /// Returns the currencies in the matrix.
    pub fn currencies(&self) -> impl Iterator<Item = Currency> + '_ {
        self.values.keys().copied()
    }

    /// Returns the number of currencies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no currency has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FxRateProvider for FxMatrix {
    fn fx_rate(&self, from: Currency, to: Currency) -> CoreResult<f64> {
        if from == to {
            return Ok(1.0);
        }
        match (self.values.get(&from), self.values.get(&to)) {
            (Some(value_from), Some(value_to)) => Ok(value_from / value_to),
            _ => Err(CoreError::fx_rate_not_found(from, to)),
        }
    }
}

fn validate_rate(from: Currency, to: Currency, rate: f64) -> CoreResult<()> {
    if rate.is_finite() && rate > 0.0 {
        Ok(())
    } else {
        Err(CoreError::invalid_fx_rate(from, to, rate))
    }
}

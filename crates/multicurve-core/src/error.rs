//! Error types for the core crate.
//!
//! Currency parsing and FX-rate lookups are the only fallible operations at
//! this layer.

use thiserror::Error;

use crate::types::Currency;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by currency and FX-rate operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// The string is not a supported ISO 4217 code.
    #[error("Unknown currency code: '{code}'")]
    UnknownCurrency {
        /// The code that failed to parse.
        code: String,
    },

    /// No rate is available between the two currencies.
    #[error("No FX rate available from {from} to {to}")]
    FxRateNotFound {
        /// Currency converted from.
        from: Currency,
        /// Currency converted to.
        to: Currency,
    },

    /// A rate that is not a strictly positive finite number.
    #[error("Invalid FX rate {rate} for {from}/{to}")]
    InvalidFxRate {
        /// Currency the rate converts from.
        from: Currency,
        /// Currency the rate converts to.
        to: Currency,
        /// The rejected rate.
        rate: f64,
    },

    /// The currency is already part of the FX matrix.
    #[error("Currency {currency} is already present in the FX matrix")]
    CurrencyAlreadyPresent {
        /// The duplicated currency.
        currency: Currency,
    },
}

impl CoreError {
    /// Creates an unknown currency error.
    #[must_use]
    pub fn unknown_currency(code: impl Into<String>) -> Self {
        Self::UnknownCurrency { code: code.into() }
    }

    /// Creates a missing FX rate error.
    #[must_use]
    pub fn fx_rate_not_found(from: Currency, to: Currency) -> Self {
        Self::FxRateNotFound { from, to }
    }

    /// Creates an invalid FX rate error.
    #[must_use]
    pub fn invalid_fx_rate(from: Currency, to: Currency, rate: f64) -> Self {
        Self::InvalidFxRate { from, to, rate }
    }
}

//! Currency type with ISO 4217 codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// ISO 4217 currency codes.
///
/// Sensitivities are bucketed per currency, so the ordering derived here
/// (declaration order) fixes the iteration order of every per-currency
/// container in the library.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[non_exhaustive]
pub enum Currency {
    /// United States Dollar
    #[default]
    USD,
    /// Euro
    EUR,
    /// British Pound Sterling
    GBP,
    /// Japanese Yen
    JPY,
    /// Swiss Franc
    CHF,
    /// Canadian Dollar
    CAD,
    /// Australian Dollar
    AUD,
    /// New Zealand Dollar
    NZD,
    /// Swedish Krona
    SEK,
    /// Norwegian Krone
    NOK,
    /// Danish Krone
    DKK,
    /// Hong Kong Dollar
    HKD,
    /// Singapore Dollar
    SGD,
    /// Chinese Yuan Renminbi
    CNY,
    /// Indian Rupee
    INR,
    /// Brazilian Real
    BRL,
    /// Mexican Peso
    MXN,
    /// South African Rand
    ZAR,
}

impl Currency {
    /// Every supported currency, in declaration order.
    pub const ALL: [Currency; 18] = [
        Currency::USD,
        Currency::EUR,
        Currency::GBP,
        Currency::JPY,
        Currency::CHF,
        Currency::CAD,
        Currency::AUD,
        Currency::NZD,
        Currency::SEK,
        Currency::NOK,
        Currency::DKK,
        Currency::HKD,
        Currency::SGD,
        Currency::CNY,
        Currency::INR,
        Currency::BRL,
        Currency::MXN,
        Currency::ZAR,
    ];

    /// Returns the ISO 4217 3-letter code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CHF => "CHF",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::NZD => "NZD",
            Currency::SEK => "SEK",
            Currency::NOK => "NOK",
            Currency::DKK => "DKK",
            Currency::HKD => "HKD",
            Currency::SGD => "SGD",
            Currency::CNY => "CNY",
            Currency::INR => "INR",
            Currency::BRL => "BRL",
            Currency::MXN => "MXN",
            Currency::ZAR => "ZAR",
        }
    }

    /// Parses a currency from a string code, ignoring case.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let upper = code.to_uppercase();
        Self::ALL.into_iter().find(|ccy| ccy.code() == upper)
    }
}

impl FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| CoreError::unknown_currency(s))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_code() {
        assert_eq!(Currency::USD.code(), "USD");
        assert_eq!(Currency::AUD.code(), "AUD");
        assert_eq!(Currency::CAD.code(), "CAD");
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Currency::from_code("aud"), Some(Currency::AUD));
        assert_eq!(Currency::from_code("EUR"), Some(Currency::EUR));
        assert_eq!(Currency::from_code("XXX"), None);
        assert_eq!(Currency::from_code(""), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("cad".parse::<Currency>().unwrap(), Currency::CAD);
        match "XYZ".parse::<Currency>() {
            Err(CoreError::UnknownCurrency { code }) => assert_eq!(code, "XYZ"),
            other => panic!("expected UnknownCurrency, got {:?}", other),
        }
    }

    #[test]
    fn test_every_code_roundtrips() {
        for ccy in Currency::ALL {
            assert_eq!(Currency::from_code(ccy.code()), Some(ccy));
        }
    }

    #[test]
    fn test_ordering_follows_declaration() {
        assert!(Currency::USD < Currency::EUR);
        assert!(Currency::CAD < Currency::AUD);
        let mut sorted = vec![Currency::ZAR, Currency::AUD, Currency::USD];
        sorted.sort();
        assert_eq!(sorted, vec![Currency::USD, Currency::AUD, Currency::ZAR]);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Currency::EUR), "EUR");
        assert_eq!(Currency::JPY.to_string(), "JPY");
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&Currency::AUD).unwrap();
        assert_eq!(json, "\"AUD\"");
        let parsed: Currency = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Currency::AUD);
    }
}

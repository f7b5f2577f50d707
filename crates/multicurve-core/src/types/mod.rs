//! Domain types shared across the library.
//!
//! - [`Currency`]: ISO 4217 currency codes

mod currency;

pub use currency::Currency;

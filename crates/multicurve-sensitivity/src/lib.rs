//! # Multicurve Sensitivity
//!
//! Additive, immutable containers for the sensitivity of a value to the
//! curves of a multi-curve interest-rate market.
//!
//! Pricing code produces point sensitivities per instrument; this crate sums
//! them across legs and trades, splits them by currency, converts them with
//! FX rates, and carries the parameter-space vectors obtained once point
//! sensitivities are projected onto curve parameters.
//!
//! ## Containers
//!
//! - [`CurveSensitivityMap`]: curve name to a sequence of entries, either
//!   [`CurvePoint`]s or [`ForwardSensitivity`]s
//! - [`MulticurveSensitivity`]: discounting and forward maps
//! - [`InflationSensitivity`]: discounting, forward and price-index maps
//! - [`MultipleCurrencySensitivity`]: one of the above per [`Currency`]
//! - [`SimpleParameterSensitivity`] and [`MultipleCurrencyParameterSensitivity`]:
//!   dense vectors per curve (and currency)
//!
//! ## Netting
//!
//! `plus` and `add` only append entries. Entries on the same curve node are
//! netted by `cleaned`. Equality (`==`) is structural and so depends on the
//! append history; compare economic content with `cleaned` and `approx_eq`,
//! or with [`AggregationConfig::matches`].
//!
//! ## Example
//!
//! ```rust
//! use multicurve_sensitivity::prelude::*;
//!
//! let leg1 = MulticurveSensitivity::of_yield_discounting(PointSensitivityMap::of(
//!     "A",
//!     vec![(1.0, 10.0), (2.0, 20.0)],
//! ));
//! let leg2 = MulticurveSensitivity::of_yield_discounting(PointSensitivityMap::of(
//!     "A",
//!     vec![(1.0, 40.0), (2.0, 30.0)],
//! ));
//!
//! let swap = leg1.plus(&leg2);
//! assert_eq!(swap.yield_discounting().get("A").unwrap().len(), 4);
//!
//! let netted = swap.cleaned();
//! assert_eq!(
//!     netted.yield_discounting().get("A").unwrap(),
//!     &[CurvePoint::new(1.0, 50.0), CurvePoint::new(2.0, 50.0)]
//! );
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel`: portfolio aggregation in [`aggregate`] uses rayon above a
//!   configurable threshold

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::float_cmp)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::should_implement_trait)]

pub mod aggregate;
pub mod config;
pub mod curve_map;
pub mod entry;
pub mod error;
pub mod inflation;
pub mod multi_currency;
pub mod multicurve;
pub mod parameter;
pub mod traits;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::AggregationConfig;
    pub use crate::curve_map::{CurveSensitivityMap, ForwardSensitivityMap, PointSensitivityMap};
    pub use crate::entry::{CurvePoint, ForwardSensitivity, SensitivityEntry};
    pub use crate::error::{SensitivityError, SensitivityResult};
    pub use crate::inflation::InflationSensitivity;
    pub use crate::multi_currency::{
        MultipleCurrencyInflationSensitivity, MultipleCurrencyMulticurveSensitivity,
        MultipleCurrencySensitivity,
    };
    pub use crate::multicurve::MulticurveSensitivity;
    pub use crate::parameter::{MultipleCurrencyParameterSensitivity, SimpleParameterSensitivity};
    pub use crate::traits::CurveSensitivity;
    pub use multicurve_core::prelude::*;
}

// Re-export commonly used types at crate root
pub use config::AggregationConfig;
pub use curve_map::{CurveSensitivityMap, ForwardSensitivityMap, PointSensitivityMap};
pub use entry::{
    CurvePoint, ForwardCoordinate, ForwardSensitivity, SensitivityEntry, SimplyCompoundedForward,
};
pub use error::{SensitivityError, SensitivityResult};
pub use inflation::InflationSensitivity;
pub use multi_currency::{
    MultipleCurrencyInflationSensitivity, MultipleCurrencyMulticurveSensitivity,
    MultipleCurrencySensitivity,
};
pub use multicurve::MulticurveSensitivity;
pub use multicurve_core::{Currency, FxMatrix, FxRateProvider};
pub use parameter::{MultipleCurrencyParameterSensitivity, SimpleParameterSensitivity};
pub use traits::CurveSensitivity;

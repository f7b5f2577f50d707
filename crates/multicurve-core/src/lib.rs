//! # Multicurve Core
//!
//! Foundation types for the Multicurve sensitivity library.
//!
//! This crate provides the building blocks shared by every consumer of the
//! sensitivity model:
//!
//! - **Types**: [`Currency`] with ISO 4217 codes
//! - **FX rates**: the [`FxRateProvider`] collaborator trait and a concrete
//!   [`FxMatrix`] holding spot rates against a reference currency
//! - **Errors**: [`CoreError`] and the [`CoreResult`] alias
//!
//! ## Example
//!
//! ```rust
//! use multicurve_core::prelude::*;
//!
//! let fx = FxMatrix::from_pair(Currency::EUR, Currency::USD, 1.30).unwrap();
//! let rate = fx.fx_rate(Currency::USD, Currency::EUR).unwrap();
//! assert!((rate - 1.0 / 1.30).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::float_cmp)]
#![allow(clippy::doc_markdown)]

pub mod error;
pub mod fx;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::fx::{FxMatrix, FxRateProvider};
    pub use crate::types::Currency;
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use fx::{FxMatrix, FxRateProvider};
pub use types::Currency;

//! Portfolio-level aggregation of per-trade sensitivities.
//!
//! Sums many sensitivities with `plus`, switching to a rayon fold/reduce
//! when the `parallel` feature is enabled and the configuration allows it.
//! Rayon folds contiguous chunks and reduces them in order, and `plus` on
//! point sensitivities is associative concatenation, so the parallel result
//! is structurally identical to the sequential left fold.

use multicurve_core::Currency;
use tracing::debug;

use crate::config::AggregationConfig;
use crate::error::SensitivityResult;
use crate::multi_currency::MultipleCurrencySensitivity;
use crate::parameter::MultipleCurrencyParameterSensitivity;
use crate::traits::CurveSensitivity;

/// Folds over items with a reduce step, conditionally using parallel iteration.
///
/// Uses parallel iteration when:
/// - The `parallel` feature is enabled
/// - `config.parallel` is true
/// - The collection size reaches `config.parallel_threshold`
#[allow(unused_variables)]
fn maybe_parallel_fold<T, U, F, R>(
    items: &[T],
    config: &AggregationConfig,
    identity: U,
    fold: F,
    reduce: R,
) -> U
where
    T: Sync,
    U: Send + Sync + Clone,
    F: Fn(U, &T) -> U + Sync + Send,
    R: Fn(U, U) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if config.should_parallelize(items.len()) {
            return items
                .par_iter()
                .fold(|| identity.clone(), &fold)
                .reduce(|| identity.clone(), reduce);
        }
    }

    items.iter().fold(identity, fold)
}

fn log_start(kind: &'static str, count: usize, config: &AggregationConfig) {
    debug!(
        kind,
        items = count,
        parallel = config.should_parallelize(count),
        "aggregating sensitivities"
    );
}

/// Sums sensitivities of one kind.
///
/// Returns the empty sensitivity for an empty slice. The result is not
/// cleaned.
///
/// # Example
///
/// ```rust
/// use multicurve_sensitivity::aggregate;
/// use multicurve_sensitivity::{AggregationConfig, MulticurveSensitivity, PointSensitivityMap};
///
/// let trades: Vec<MulticurveSensitivity> = (1..=3)
///     .map(|i| {
///         MulticurveSensitivity::of_yield_discounting(PointSensitivityMap::of(
///             "USD-OIS",
///             vec![(1.0, f64::from(i))],
///         ))
///     })
///     .collect();
///
/// let total = aggregate::sum(&trades, &AggregationConfig::default()).cleaned();
/// assert_eq!(total.yield_discounting().get("USD-OIS").unwrap()[0].value, 6.0);
/// ```
pub fn sum<S: CurveSensitivity>(items: &[S], config: &AggregationConfig) -> S {
    log_start("point", items.len(), config);
    maybe_parallel_fold(
        items,
        config,
        S::default(),
        |acc, item| acc.plus(item),
        |lhs, rhs| lhs.plus(&rhs),
    )
}

/// Sums sensitivities tagged with their currency.
pub fn sum_by_currency<S: CurveSensitivity>(
    items: &[(Currency, S)],
    config: &AggregationConfig,
) -> MultipleCurrencySensitivity<S> {
    log_start("multi-currency", items.len(), config);
    maybe_parallel_fold(
        items,
        config,
        MultipleCurrencySensitivity::new(),
        |acc, (currency, item)| acc.plus_currency(*currency, item),
        |lhs, rhs| lhs.plus(&rhs),
    )
}

/// Sums parameter sensitivities.
///
/// Key order follows first appearance across `items`. In parallel mode the
/// vector sums may differ from the sequential ones by rounding.
///
/// # Errors
///
/// Fails on the first length mismatch between vectors of the same key.
pub fn sum_parameters(
    items: &[MultipleCurrencyParameterSensitivity],
    config: &AggregationConfig,
) -> SensitivityResult<MultipleCurrencyParameterSensitivity> {
    log_start("parameter", items.len(), config);
    maybe_parallel_fold(
        items,
        config,
        Ok(MultipleCurrencyParameterSensitivity::new()),
        |acc, item| acc.and_then(|acc| acc.plus(item)),
        |lhs, rhs| lhs.and_then(|lhs| rhs.and_then(|rhs| lhs.plus(&rhs))),
    )
}

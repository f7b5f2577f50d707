//! Property-based tests for the algebra of sensitivities.
//!
//! - `plus` is commutative and associative up to cleaning
//! - `cleaned` is idempotent
//! - scaling distributes over `plus`
//! - the empty sensitivity is the identity of `plus`
//! - FX conversion there and back again only applies the rate product
//! - a position plus its negation cleans away under a tolerance

use multicurve_sensitivity::prelude::*;
use nalgebra::DVector;
use proptest::prelude::*;

const TOLERANCE: f64 = 1.0e-9;
const CURVES: [&str; 3] = ["USD-OIS", "USD-LIBOR3M", "EUR-OIS"];

// =============================================================================
// STRATEGIES
// =============================================================================

/// Points on a small grid of abscissae so that entries collide often.
fn point_map_strategy() -> impl Strategy<Value = PointSensitivityMap> {
    prop::collection::vec((0..CURVES.len(), 0u8..8, -1.0e3..1.0e3f64), 0..12).prop_map(
        |points| {
            points
                .into_iter()
                .fold(PointSensitivityMap::new(), |map, (curve, node, value)| {
                    map.add(CURVES[curve], vec![(f64::from(node) * 0.5, value)])
                })
        },
    )
}

fn forward_map_strategy() -> impl Strategy<Value = ForwardSensitivityMap> {
    prop::collection::vec((0..CURVES.len(), 0u8..4, 1u8..3, -1.0e3..1.0e3f64), 0..8).prop_map(
        |forwards| {
            forwards
                .into_iter()
                .fold(ForwardSensitivityMap::new(), |map, (curve, start, len, value)| {
                    let start = f64::from(start) * 0.25;
                    let accrual = f64::from(len) * 0.25;
                    let forward =
                        ForwardSensitivity::simply_compounded(start, start + accrual, accrual, value)
                            .unwrap();
                    map.add(CURVES[curve], vec![forward])
                })
        },
    )
}

fn multicurve_strategy() -> impl Strategy<Value = MulticurveSensitivity> {
    (point_map_strategy(), forward_map_strategy())
        .prop_map(|(discounting, forward)| MulticurveSensitivity::of(discounting, forward))
}

fn inflation_strategy() -> impl Strategy<Value = InflationSensitivity> {
    (
        point_map_strategy(),
        forward_map_strategy(),
        point_map_strategy(),
    )
        .prop_map(|(discounting, forward, price)| {
            InflationSensitivity::of(discounting, forward, price)
        })
}

fn parameter_strategy() -> impl Strategy<Value = SimpleParameterSensitivity> {
    // Vector length is fixed per curve so any two samples can be added.
    prop::collection::vec((0..CURVES.len(), prop::collection::vec(-1.0e3..1.0e3f64, 4)), 0..6)
        .prop_map(|entries| {
            entries
                .into_iter()
                .fold(SimpleParameterSensitivity::new(), |acc, (curve, values)| {
                    acc.plus_curve(CURVES[curve], &DVector::from_vec(values))
                        .unwrap()
                })
        })
}

const CURRENCIES: [Currency; 3] = [Currency::USD, Currency::EUR, Currency::GBP];

fn multi_currency_strategy() -> impl Strategy<Value = MultipleCurrencyMulticurveSensitivity> {
    prop::collection::vec((0..CURRENCIES.len(), multicurve_strategy()), 0..4).prop_map(
        |entries| {
            entries
                .into_iter()
                .fold(MultipleCurrencyMulticurveSensitivity::new(), |acc, (ccy, sensi)| {
                    acc.plus_currency(CURRENCIES[ccy], &sensi)
                })
        },
    )
}

fn multi_currency_parameter_strategy() -> impl Strategy<Value = MultipleCurrencyParameterSensitivity>
{
    (parameter_strategy(), 0..CURRENCIES.len()).prop_map(|(simple, ccy)| {
        MultipleCurrencyParameterSensitivity::from_simple(&simple, CURRENCIES[ccy])
    })
}

fn fx_strategy() -> impl Strategy<Value = FxMatrix> {
    (0.1..10.0f64, 0.1..10.0f64).prop_map(|(eur, gbp)| {
        let mut fx = FxMatrix::from_pair(Currency::EUR, Currency::USD, eur).unwrap();
        fx.add_currency(Currency::GBP, Currency::USD, gbp).unwrap();
        fx
    })
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn property_plus_is_commutative(a in multicurve_strategy(), b in multicurve_strategy()) {
        let ab = a.plus(&b).cleaned();
        let ba = b.plus(&a).cleaned();
        prop_assert!(ab.approx_eq(&ba, TOLERANCE));
    }

    #[test]
    fn property_plus_is_associative(
        a in multicurve_strategy(),
        b in multicurve_strategy(),
        c in multicurve_strategy()
    ) {
        let left = a.plus(&b).plus(&c);
        let right = a.plus(&b.plus(&c));
        // Concatenation is associative even before cleaning
        prop_assert_eq!(&left, &right);
        prop_assert!(left.cleaned().approx_eq(&right.cleaned(), TOLERANCE));
    }

    #[test]
    fn property_cleaned_is_idempotent(a in inflation_strategy()) {
        let once = a.cleaned();
        prop_assert_eq!(once.cleaned(), once);
    }

    #[test]
    fn property_scaling_distributes(a in inflation_strategy()) {
        let doubled = a.plus(&a).cleaned();
        let scaled = a.multiplied_by(2.0).cleaned();
        prop_assert!(doubled.approx_eq(&scaled, TOLERANCE));
    }

    #[test]
    fn property_empty_is_identity(a in multicurve_strategy()) {
        prop_assert_eq!(a.plus(&MulticurveSensitivity::new()), a.clone());
        prop_assert_eq!(MulticurveSensitivity::new().plus(&a), a);
    }

    #[test]
    fn property_factory_equivalence(m in point_map_strategy()) {
        let multicurve = MulticurveSensitivity::of_yield_discounting(m.clone());
        prop_assert!(multicurve.approx_eq(
            &MulticurveSensitivity::of(m.clone(), ForwardSensitivityMap::new()),
            TOLERANCE
        ));
        let inflation = InflationSensitivity::of_yield_discounting(m.clone());
        prop_assert!(inflation.approx_eq(
            &InflationSensitivity::of(m, ForwardSensitivityMap::new(), PointSensitivityMap::new()),
            TOLERANCE
        ));
    }

    #[test]
    fn property_fx_round_trip(a in multicurve_strategy(), rate in 0.1..10.0f64) {
        let fx = FxMatrix::from_pair(Currency::EUR, Currency::USD, rate).unwrap();
        let eur = MultipleCurrencyMulticurveSensitivity::of(Currency::EUR, a);

        let back = eur
            .converted(Currency::USD, &fx)
            .unwrap()
            .converted(Currency::EUR, &fx)
            .unwrap();
        let factor = fx.fx_rate(Currency::EUR, Currency::USD).unwrap()
            * fx.fx_rate(Currency::USD, Currency::EUR).unwrap();

        prop_assert!(back.cleaned().approx_eq(&eur.multiplied_by(factor).cleaned(), TOLERANCE));
    }

    #[test]
    fn property_parameter_plus_is_commutative(
        a in parameter_strategy(),
        b in parameter_strategy()
    ) {
        let ab = a.plus(&b).unwrap();
        let ba = b.plus(&a).unwrap();
        prop_assert!(ab.approx_eq(&ba, TOLERANCE));
        let expected_total = a.total_sensitivity() + b.total_sensitivity();
        prop_assert!((ab.total_sensitivity() - expected_total).abs() < 1e-6);
    }

    #[test]
    fn property_parameter_scaling_distributes(a in parameter_strategy(), factor in -5.0..5.0f64) {
        let sum = a.plus(&a).unwrap().multiplied_by(factor);
        let split = a.multiplied_by(factor).plus(&a.multiplied_by(factor)).unwrap();
        prop_assert!(sum.approx_eq(&split, 1e-8));
    }

    #[test]
    fn property_inflation_plus_is_commutative_and_associative(
        a in inflation_strategy(),
        b in inflation_strategy(),
        c in inflation_strategy()
    ) {
        prop_assert!(a.plus(&b).cleaned().approx_eq(&b.plus(&a).cleaned(), TOLERANCE));
        prop_assert_eq!(a.plus(&b).plus(&c), a.plus(&b.plus(&c)));
    }

    #[test]
    fn property_inflation_fx_round_trip(a in inflation_strategy(), fx in fx_strategy()) {
        let gbp = MultipleCurrencyInflationSensitivity::of(Currency::GBP, a);
        let back = gbp
            .converted(Currency::EUR, &fx)
            .unwrap()
            .converted(Currency::GBP, &fx)
            .unwrap();
        let factor = fx.fx_rate(Currency::GBP, Currency::EUR).unwrap()
            * fx.fx_rate(Currency::EUR, Currency::GBP).unwrap();

        prop_assert!(back.cleaned().approx_eq(&gbp.multiplied_by(factor).cleaned(), TOLERANCE));
    }

    #[test]
    fn property_multi_currency_plus_is_commutative_and_associative(
        a in multi_currency_strategy(),
        b in multi_currency_strategy(),
        c in multi_currency_strategy()
    ) {
        prop_assert!(a.plus(&b).cleaned().approx_eq(&b.plus(&a).cleaned(), TOLERANCE));
        prop_assert_eq!(a.plus(&b).plus(&c), a.plus(&b.plus(&c)));
        prop_assert_eq!(a.plus(&MultipleCurrencyMulticurveSensitivity::new()), a.clone());
    }

    #[test]
    fn property_cleaned_with_tolerance_nets_opposite_positions(a in multi_currency_strategy()) {
        let flat = a.plus(&a.multiplied_by(-1.0)).cleaned_with_tolerance(TOLERANCE);
        prop_assert!(flat.is_empty());
    }

    #[test]
    fn property_parameter_fx_round_trip(
        a in multi_currency_parameter_strategy(),
        fx in fx_strategy()
    ) {
        let Some(currency) = a.currencies().into_iter().next() else {
            return Ok(());
        };
        let other = if currency == Currency::USD { Currency::EUR } else { Currency::USD };
        let factor = fx.fx_rate(currency, other).unwrap() * fx.fx_rate(other, currency).unwrap();

        let back = a
            .converted(&fx, other)
            .unwrap()
            .converted(&fx, currency)
            .unwrap();
        prop_assert!(back.approx_eq(&a.multiplied_by(factor), 1e-8));
        let total = a.total_sensitivity(&fx, Currency::USD).unwrap();
        let converted_total = a
            .converted(&fx, Currency::USD)
            .unwrap()
            .total_sensitivity(&fx, Currency::USD)
            .unwrap();
        prop_assert!((total - converted_total).abs() < 1e-6 * (1.0 + total.abs()));
    }
}

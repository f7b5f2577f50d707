//! Per-curve accumulation of sensitivity entries.
//!
//! A [`CurveSensitivityMap`] maps curve names to a sequence of entries.
//! Building and combining maps only ever appends; numeric netting of entries
//! that share a coordinate happens in [`CurveSensitivityMap::cleaned`].
//!
//! ```text
//!   add / plus         cleaned
//!   A: [(1,10),(2,20)]   ──►   A: [(1,50),(2,20)]
//!      [(1,40)]
//! ```
//!
//! Equality is structural: two maps with the same net content but different
//! append history are not equal. Use `cleaned` followed by
//! [`CurveSensitivityMap::approx_eq`] to compare economic content.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::entry::{CurvePoint, ForwardSensitivity, SensitivityEntry};
use crate::traits::CurveSensitivity;

/// Point sensitivities keyed by curve name.
pub type PointSensitivityMap = CurveSensitivityMap<CurvePoint>;

/// Forward-rate sensitivities keyed by curve name.
pub type ForwardSensitivityMap = CurveSensitivityMap<ForwardSensitivity>;

/// Immutable mapping from curve name to an ordered sequence of entries.
///
/// Curve names iterate in sorted order; entries within a curve keep their
/// insertion order.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct CurveSensitivityMap<V> {
    curves: BTreeMap<String, Vec<V>>,
}

impl<V> Default for CurveSensitivityMap<V> {
    fn default() -> Self {
        Self {
            curves: BTreeMap::new(),
        }
    }
}

impl<V: SensitivityEntry> CurveSensitivityMap<V> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a map holding a single curve.
    #[must_use]
    pub fn of<I>(curve_name: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<V>,
    {
        Self::new().add(curve_name, entries)
    }

    /// Appends entries to a curve, creating the curve if absent.
    ///
    /// Existing entries are never merged with the new ones.
    #[must_use]
    pub fn add<I>(&self, curve_name: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<V>,
    {
        let mut curves = self.curves.clone();
        curves
            .entry(curve_name.into())
            .or_default()
            .extend(entries.into_iter().map(Into::into));
        Self { curves }
    }

    /// Returns the union of both maps.
    ///
    /// For a curve present in both, the result holds this map's entries
    /// followed by `other`'s. No values are summed.
    #[must_use]
    pub fn plus(&self, other: &Self) -> Self {
        let mut curves = self.curves.clone();
        for (name, entries) in &other.curves {
            match curves.get_mut(name) {
                Some(existing) => existing.extend(entries.iter().cloned()),
                None => {
                    curves.insert(name.clone(), entries.clone());
                }
            }
        }
        Self { curves }
    }

    /// Nets entries sharing a coordinate into a single entry per coordinate.
    ///
    /// Within each curve the first-seen order of coordinates is preserved,
    /// so the output is deterministic for a given insertion history.
    #[must_use]
    pub fn cleaned(&self) -> Self {
        let curves = self
            .curves
            .iter()
            .map(|(name, entries)| (name.clone(), clean_entries(entries)))
            .collect();
        Self { curves }
    }

    /// Nets like [`cleaned`](Self::cleaned), then drops entries whose netted
    /// absolute value is below `tolerance`.
    ///
    /// A curve left without entries is removed, so a position that nets to
    /// zero compares equal to one where the node is absent.
    #[must_use]
    pub fn cleaned_with_tolerance(&self, tolerance: f64) -> Self {
        let curves = self
            .curves
            .iter()
            .filter_map(|(name, entries)| {
                let mut netted = clean_entries(entries);
                netted.retain(|entry| entry.value().abs() >= tolerance);
                (!netted.is_empty()).then(|| (name.clone(), netted))
            })
            .collect();
        Self { curves }
    }

    /// Scales every value by `factor`, leaving coordinates unchanged.
    #[must_use]
    pub fn multiplied_by(&self, factor: f64) -> Self {
        let curves = self
            .curves
            .iter()
            .map(|(name, entries)| {
                let scaled = entries
                    .iter()
                    .map(|entry| entry.with_value(entry.value() * factor))
                    .collect();
                (name.clone(), scaled)
            })
            .collect();
        Self { curves }
    }

    /// Compares the netted content of two maps.
    ///
    /// Both maps must cover the same curves. For each curve the cleaned
    /// entries must have identical coordinates on both sides and values
    /// within `tolerance` of each other.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        if self.curves.len() != other.curves.len() {
            return false;
        }
        self.curves.iter().all(|(name, entries)| {
            other
                .curves
                .get(name)
                .is_some_and(|theirs| entries_approx_eq(entries, theirs, tolerance))
        })
    }

    /// Returns the entries of a curve.
    #[must_use]
    pub fn get(&self, curve_name: &str) -> Option<&[V]> {
        self.curves.get(curve_name).map(Vec::as_slice)
    }

    /// Returns true if the curve has entries in this map.
    #[must_use]
    pub fn contains(&self, curve_name: &str) -> bool {
        self.curves.contains_key(curve_name)
    }

    /// Iterates over curve names in sorted order.
    pub fn curve_names(&self) -> impl Iterator<Item = &str> {
        self.curves.keys().map(String::as_str)
    }

    /// Iterates over `(curve name, entries)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[V])> {
        self.curves
            .iter()
            .map(|(name, entries)| (name.as_str(), entries.as_slice()))
    }

    /// Sum of every value across all curves.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.curves
            .values()
            .flat_map(|entries| entries.iter().map(SensitivityEntry::value))
            .sum()
    }

    /// Number of curves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Returns true if no curve is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

fn clean_entries<V: SensitivityEntry>(entries: &[V]) -> Vec<V> {
    let mut slots: HashMap<V::Coordinate, usize> = HashMap::with_capacity(entries.len());
    let mut netted: Vec<V> = Vec::with_capacity(entries.len());
    for entry in entries {
        match slots.entry(entry.coordinate()) {
            Entry::Occupied(slot) => {
                let merged = &mut netted[*slot.get()];
                *merged = merged.with_value(merged.value() + entry.value());
            }
            Entry::Vacant(slot) => {
                slot.insert(netted.len());
                netted.push(entry.clone());
            }
        }
    }
    netted
}

fn entries_approx_eq<V: SensitivityEntry>(lhs: &[V], rhs: &[V], tolerance: f64) -> bool {
    let lhs = clean_entries(lhs);
    let rhs = clean_entries(rhs);
    if lhs.len() != rhs.len() {
        return false;
    }
    let rhs_values: HashMap<V::Coordinate, f64> = rhs
        .iter()
        .map(|entry| (entry.coordinate(), entry.value()))
        .collect();
    lhs.iter().all(|entry| {
        rhs_values
            .get(&entry.coordinate())
            .is_some_and(|value| (entry.value() - value).abs() <= tolerance)
    })
}

impl<V: SensitivityEntry> CurveSensitivity for CurveSensitivityMap<V> {
    fn plus(&self, other: &Self) -> Self {
        CurveSensitivityMap::plus(self, other)
    }

    fn multiplied_by(&self, factor: f64) -> Self {
        CurveSensitivityMap::multiplied_by(self, factor)
    }

    fn cleaned(&self) -> Self {
        CurveSensitivityMap::cleaned(self)
    }

    fn cleaned_with_tolerance(&self, tolerance: f64) -> Self {
        CurveSensitivityMap::cleaned_with_tolerance(self, tolerance)
    }

    fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        CurveSensitivityMap::approx_eq(self, other, tolerance)
    }

    fn is_empty(&self) -> bool {
        CurveSensitivityMap::is_empty(self)
    }
}

impl<V, S> FromIterator<(S, Vec<V>)> for CurveSensitivityMap<V>
where
    V: SensitivityEntry,
    S: Into<String>,
{
    /// Builds a map, appending entries for curve names seen more than once.
    fn from_iter<I: IntoIterator<Item = (S, Vec<V>)>>(iter: I) -> Self {
        let mut curves: BTreeMap<String, Vec<V>> = BTreeMap::new();
        for (name, entries) in iter {
            curves.entry(name.into()).or_default().extend(entries);
        }
        Self { curves }
    }
}

impl<V: SensitivityEntry> From<HashMap<String, Vec<V>>> for CurveSensitivityMap<V> {
    fn from(map: HashMap<String, Vec<V>>) -> Self {
        map.into_iter().collect()
    }
}

impl<V: SensitivityEntry> From<BTreeMap<String, Vec<V>>> for CurveSensitivityMap<V> {
    fn from(curves: BTreeMap<String, Vec<V>>) -> Self {
        Self { curves }
    }
}

impl<V: Serialize> Serialize for CurveSensitivityMap<V> {
    /// Serialized as an ordered list of `(curve name, entries)` pairs.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.curves.iter())
    }
}

impl<'de, V> Deserialize<'de> for CurveSensitivityMap<V>
where
    V: SensitivityEntry + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pairs = Vec::<(String, Vec<V>)>::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(pairs: &[(f64, f64)]) -> Vec<CurvePoint> {
        pairs.iter().copied().map(CurvePoint::from).collect()
    }

    fn forward(start: f64, end: f64, accrual: f64, value: f64) -> ForwardSensitivity {
        ForwardSensitivity::simply_compounded(start, end, accrual, value).unwrap()
    }

    #[test]
    fn test_add_appends_without_merging() {
        let map = PointSensitivityMap::of("USD-OIS", points(&[(1.0, 10.0), (2.0, 20.0)]));
        let added = map.add("USD-OIS", points(&[(1.0, 5.0)]));

        assert_eq!(added.get("USD-OIS").unwrap().len(), 3);
        // Receiver is untouched
        assert_eq!(map.get("USD-OIS").unwrap().len(), 2);
    }

    #[test]
    fn test_add_accepts_tuples() {
        let map = PointSensitivityMap::new().add("EUR-OIS", vec![(0.5, 1.0), (1.0, 2.0)]);
        assert_eq!(
            map.get("EUR-OIS").unwrap(),
            &[CurvePoint::new(0.5, 1.0), CurvePoint::new(1.0, 2.0)]
        );
    }

    #[test]
    fn test_plus_concatenates_self_first() {
        let a = PointSensitivityMap::of("A", points(&[(1.0, 10.0)]))
            .add("B", points(&[(3.0, 1.0)]));
        let b = PointSensitivityMap::of("A", points(&[(2.0, 20.0)]))
            .add("C", points(&[(4.0, 2.0)]));

        let sum = a.plus(&b);
        assert_eq!(sum.get("A").unwrap(), points(&[(1.0, 10.0), (2.0, 20.0)]).as_slice());
        assert_eq!(sum.get("B").unwrap(), points(&[(3.0, 1.0)]).as_slice());
        assert_eq!(sum.get("C").unwrap(), points(&[(4.0, 2.0)]).as_slice());
        assert_eq!(sum.curve_names().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_plus_empty_is_identity() {
        let a = PointSensitivityMap::of("A", points(&[(1.0, 10.0), (1.0, 3.0)]));
        assert_eq!(a.plus(&PointSensitivityMap::new()), a);
        assert_eq!(PointSensitivityMap::new().plus(&a), a);
    }

    #[test]
    fn test_cleaned_nets_same_abscissa() {
        let map = PointSensitivityMap::of(
            "A",
            points(&[(1.0, 10.0), (2.0, 20.0), (1.0, 40.0), (3.0, 1.0), (2.0, -5.0)]),
        );
        let cleaned = map.cleaned();
        assert_eq!(
            cleaned.get("A").unwrap(),
            points(&[(1.0, 50.0), (2.0, 15.0), (3.0, 1.0)]).as_slice()
        );
    }

    #[test]
    fn test_cleaned_is_idempotent() {
        let map = PointSensitivityMap::of("A", points(&[(1.0, 0.1), (1.0, 0.2), (2.0, 0.3)]));
        let once = map.cleaned();
        assert_eq!(once.cleaned(), once);
    }

    #[test]
    fn test_cleaned_with_tolerance_drops_netted_nodes() {
        let a = PointSensitivityMap::of("A", points(&[(1.0, 10.0), (2.0, 5.0)]));
        let b = PointSensitivityMap::of("A", points(&[(1.0, -10.0)]));
        let target = PointSensitivityMap::of("A", points(&[(2.0, 5.0)]));

        let sum = a.plus(&b);
        assert!(!sum.cleaned().approx_eq(&target, 1e-6));

        let trimmed = sum.cleaned_with_tolerance(1e-6);
        assert_eq!(trimmed.get("A").unwrap(), points(&[(2.0, 5.0)]).as_slice());
        assert!(trimmed.approx_eq(&target, 1e-6));
    }

    #[test]
    fn test_cleaned_with_tolerance_removes_empty_curves() {
        let map = PointSensitivityMap::of("A", points(&[(1.0, 3.0), (1.0, -3.0)]))
            .add("B", points(&[(2.0, 1e-9), (3.0, 2.0)]));
        let trimmed = map.cleaned_with_tolerance(1e-6);

        assert!(!trimmed.contains("A"));
        assert_eq!(trimmed.get("B").unwrap(), points(&[(3.0, 2.0)]).as_slice());
        // Zero tolerance keeps exact zeros
        assert_eq!(map.cleaned_with_tolerance(0.0), map.cleaned());
    }

    #[test]
    fn test_cleaned_forward_groups_on_period_and_accrual() {
        let map = ForwardSensitivityMap::of(
            "USD-LIBOR3M",
            vec![
                forward(0.25, 0.5, 0.25, 100.0),
                forward(0.25, 0.5, 0.26, 10.0),
                forward(0.25, 0.5, 0.25, 50.0),
                forward(0.5, 0.75, 0.25, 7.0),
            ],
        );
        let cleaned = map.cleaned();
        assert_eq!(
            cleaned.get("USD-LIBOR3M").unwrap(),
            &[
                forward(0.25, 0.5, 0.25, 150.0),
                forward(0.25, 0.5, 0.26, 10.0),
                forward(0.5, 0.75, 0.25, 7.0),
            ]
        );
    }

    #[test]
    fn test_multiplied_by_scales_values_only() {
        let map = ForwardSensitivityMap::of("F", vec![forward(1.0, 1.5, 0.5, 4.0)]);
        let scaled = map.multiplied_by(-2.5);
        assert_eq!(scaled.get("F").unwrap(), &[forward(1.0, 1.5, 0.5, -10.0)]);

        let zero = PointSensitivityMap::of("A", points(&[(2.0, 3.0)])).multiplied_by(0.0);
        assert_eq!(zero.get("A").unwrap(), points(&[(2.0, 0.0)]).as_slice());
    }

    #[test]
    fn test_equality_is_history_sensitive() {
        let a = PointSensitivityMap::of("A", points(&[(1.0, 10.0), (1.0, 20.0)]));
        let b = PointSensitivityMap::of("A", points(&[(1.0, 30.0)]));
        assert_ne!(a, b);
        assert_eq!(a.cleaned(), b);
        assert!(a.approx_eq(&b, 1e-12));
    }

    #[test]
    fn test_approx_eq_ignores_order_of_coordinates() {
        let a = PointSensitivityMap::of("A", points(&[(1.0, 10.0), (2.0, 20.0)]));
        let b = PointSensitivityMap::of("A", points(&[(2.0, 20.0 + 1e-9), (1.0, 10.0)]));
        assert!(a.approx_eq(&b, 1e-8));
        assert!(!a.approx_eq(&b, 1e-10));
    }

    #[test]
    fn test_approx_eq_requires_same_keys_and_coordinates() {
        let a = PointSensitivityMap::of("A", points(&[(1.0, 10.0)]));
        let b = PointSensitivityMap::of("B", points(&[(1.0, 10.0)]));
        let c = PointSensitivityMap::of("A", points(&[(1.5, 10.0)]));
        assert!(!a.approx_eq(&b, 1.0));
        assert!(!a.approx_eq(&c, 1.0));
        assert!(!a.approx_eq(&a.add("B", points(&[(1.0, 0.0)])), 1.0));
    }

    #[test]
    fn test_from_hash_map_and_iterator() {
        let mut map = HashMap::new();
        map.insert("A".to_string(), points(&[(1.0, 1.0)]));
        map.insert("B".to_string(), points(&[(2.0, 2.0)]));
        let from_map = PointSensitivityMap::from(map);
        assert_eq!(from_map.len(), 2);

        let from_iter: PointSensitivityMap = vec![
            ("A", points(&[(1.0, 1.0)])),
            ("A", points(&[(1.0, 2.0)])),
        ]
        .into_iter()
        .collect();
        assert_eq!(from_iter.len(), 1);
        assert_eq!(from_iter.get("A").unwrap().len(), 2);
    }

    #[test]
    fn test_total() {
        let map = PointSensitivityMap::of("A", points(&[(1.0, 10.0), (2.0, 20.0)]))
            .add("B", points(&[(1.0, -5.0)]));
        assert!((map.total() - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_serde_shape_and_roundtrip() {
        let map = PointSensitivityMap::of("A", points(&[(1.0, 10.0)]));
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"[["A",[{"abscissa":1.0,"value":10.0}]]]"#);

        let parsed: PointSensitivityMap = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, map);
    }

    #[test]
    fn test_deserialize_merges_duplicate_names() {
        let json = r#"[["A",[{"abscissa":1.0,"value":1.0}]],["A",[{"abscissa":2.0,"value":2.0}]]]"#;
        let parsed: PointSensitivityMap = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.get("A").unwrap().len(), 2);
    }
}

//! Sensitivities projected onto curve parameters.
//!
//! Once point sensitivities have been mapped onto a curve's parameters, each
//! curve carries a dense vector with one element per parameter. Adding two
//! sensitivities sums the vectors element by element, which requires the
//! vectors for a key to always have the same length.
//!
//! Keys keep their insertion order; iteration and serialization follow it.

mod multi_currency;
mod simple;

pub use multi_currency::MultipleCurrencyParameterSensitivity;
pub use simple::SimpleParameterSensitivity;

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use nalgebra::DVector;
use tracing::debug;

use crate::entry::coordinate_bits;
use crate::error::{SensitivityError, SensitivityResult};

/// Insertion-ordered map from a key to a parameter vector.
///
/// Entries live in a `Vec` for ordering; `index` maps each key to its slot.
#[derive(Debug, Clone)]
pub(crate) struct VectorMap<K> {
    entries: Vec<(K, DVector<f64>)>,
    index: HashMap<K, usize>,
}

impl<K> Default for VectorMap<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq + Clone> VectorMap<K> {
    pub(crate) fn get(&self, key: &K) -> Option<&DVector<f64>> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    /// Adds `vector` under `key`, summing with any stored vector.
    ///
    /// On error the map is left as it was.
    pub(crate) fn add(
        &mut self,
        key: &K,
        vector: &DVector<f64>,
        label: impl FnOnce() -> String,
    ) -> SensitivityResult<()> {
        let Some(slot) = self.index.get(key).copied() else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key.clone(), vector.clone()));
            return Ok(());
        };
        let stored = &mut self.entries[slot].1;
        if stored.len() != vector.len() {
            let name = label();
            debug!(
                curve = %name,
                expected = stored.len(),
                got = vector.len(),
                "rejected parameter sensitivity with mismatched length"
            );
            return Err(SensitivityError::length_mismatch(
                name,
                stored.len(),
                vector.len(),
            ));
        }
        *stored += vector;
        Ok(())
    }

    /// Adds every entry of `other` in its order, labelling errors with `label`.
    ///
    /// All lengths are checked before anything is written, so on error the
    /// map is left as it was.
    pub(crate) fn merge(
        &mut self,
        other: &Self,
        label: impl Fn(&K) -> String,
    ) -> SensitivityResult<()> {
        for (key, vector) in other.iter() {
            if let Some(stored) = self.get(key) {
                if stored.len() != vector.len() {
                    let name = label(key);
                    debug!(
                        curve = %name,
                        expected = stored.len(),
                        got = vector.len(),
                        "rejected parameter sensitivity with mismatched length"
                    );
                    return Err(SensitivityError::length_mismatch(
                        name,
                        stored.len(),
                        vector.len(),
                    ));
                }
            }
        }
        for (key, vector) in other.iter() {
            self.add(key, vector, || label(key))?;
        }
        Ok(())
    }

    /// Appends an entry whose key is known to be absent.
    pub(crate) fn push_unique(&mut self, key: K, vector: DVector<f64>) {
        debug_assert!(self.get(&key).is_none());
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, vector));
    }

    pub(crate) fn scaled(&self, factor: f64) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|(key, vector)| (key.clone(), vector * factor))
            .collect();
        Self {
            entries,
            index: self.index.clone(),
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&K, &DVector<f64>)> {
        self.entries.iter().map(|(key, vector)| (key, vector))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Same keys, same lengths, elements within `tolerance`. Order is ignored.
    pub(crate) fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.len() == other.len()
            && self.entries.iter().all(|(key, vector)| {
                other.get(key).is_some_and(|theirs| {
                    theirs.len() == vector.len()
                        && vector
                            .iter()
                            .zip(theirs.iter())
                            .all(|(a, b)| (a - b).abs() <= tolerance)
                })
            })
    }
}

impl<K: Hash + Eq + Clone> PartialEq for VectorMap<K> {
    /// Exact equality of vectors, ignoring key order.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(key, vector)| other.get(key) == Some(vector))
    }
}

impl<K: Hash> Hash for VectorMap<K> {
    /// Order-insensitive: entry hashes are combined with a commutative sum.
    fn hash<H: Hasher>(&self, state: &mut H) {
        let combined = self
            .entries
            .iter()
            .map(|(key, vector)| {
                let mut hasher = DefaultHasher::new();
                key.hash(&mut hasher);
                vector.len().hash(&mut hasher);
                for element in vector.iter() {
                    coordinate_bits(*element).hash(&mut hasher);
                }
                hasher.finish()
            })
            .fold(0u64, u64::wrapping_add);
        self.entries.len().hash(state);
        combined.hash(state);
    }
}

fn check_name(name: &str) -> SensitivityResult<()> {
    if name.is_empty() {
        return Err(SensitivityError::invalid_argument("curve name must not be empty"));
    }
    Ok(())
}

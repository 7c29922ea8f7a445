// Deterministic top-K selection.
//
// Candidates are ranked by sorting (value, original index) pairs: value
// descending, then index ascending. Equal values therefore keep the order in
// which they appear in the source sequence, and repeated calls on the same
// input always agree.

use std::cmp::Ordering;

use serde::Serialize;

use crate::error::AggregateError;

/// The top entries of a ranking, plus how many were asked for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection<T> {
    /// Selected entries, highest value first
    pub items: Vec<T>,
    /// The K that was requested
    pub requested: usize,
}

impl<T> Selection<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `InsufficientData` when fewer than `requested` candidates existed.
    ///
    /// A shortfall is informational: the selection still holds every
    /// candidate there was.
    pub fn shortfall(&self) -> Option<AggregateError> {
        (self.items.len() < self.requested).then(|| AggregateError::InsufficientData {
            requested: self.requested,
            available: self.items.len(),
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

/// Indices of the `k` largest values, ties broken by lower index.
///
/// Returns `(index, value)` pairs. If `k` exceeds the number of values, all
/// of them are returned. Values compare numerically, so `-0.0` and `0.0`
/// tie. Callers reject NaN before ranking.
pub fn top_k(values: &[f64], k: usize) -> Vec<(usize, f64)> {
    let mut ranked: Vec<(usize, f64)> = values.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    ranked.truncate(k);
    ranked
}

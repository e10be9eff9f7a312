//! Conjunctive application of predicates over an entry collection.

use std::sync::Arc;

use quake_map_quake_models::QuakeEntry;

use crate::expr::parse_expression;
use crate::{FilterError, FilterPredicate, QuakeField};

/// Keeps the entries that pass every present predicate, in input order.
///
/// Absent (`None`) slots are skipped. With no predicates at all, or only
/// absent ones, the input comes back unchanged. Runs in
/// `O(entries × predicates)` and never sorts.
#[must_use]
pub fn apply(
    entries: &[Arc<QuakeEntry>],
    predicates: &[Option<&FilterPredicate>],
) -> Vec<Arc<QuakeEntry>> {
    let present: Vec<&FilterPredicate> = predicates.iter().copied().flatten().collect();
    if present.is_empty() {
        return entries.to_vec();
    }

    let kept: Vec<Arc<QuakeEntry>> = entries
        .iter()
        .filter(|entry| present.iter().all(|p| p.test(entry)))
        .cloned()
        .collect();

    log::debug!(
        "Filter kept {}/{} entries ({} predicates)",
        kept.len(),
        entries.len(),
        present.len()
    );

    kept
}

/// One user filter request: at most one magnitude predicate and one depth
/// predicate, either of which may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterRequest {
    pub magnitude: Option<FilterPredicate>,
    pub depth: Option<FilterPredicate>,
}

impl FilterRequest {
    /// Builds a request from optional filter expressions (see
    /// [`parse_expression`]).
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] if either expression is invalid.
    pub fn from_expressions(
        magnitude: Option<&str>,
        depth: Option<&str>,
    ) -> Result<Self, FilterError> {
        Ok(Self {
            magnitude: magnitude
                .map(|e| parse_expression(QuakeField::Magnitude, e))
                .transpose()?,
            depth: depth
                .map(|e| parse_expression(QuakeField::Depth, e))
                .transpose()?,
        })
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.magnitude.is_none() && self.depth.is_none()
    }

    /// Applies both slots to `entries`.
    #[must_use]
    pub fn apply(&self, entries: &[Arc<QuakeEntry>]) -> Vec<Arc<QuakeEntry>> {
        apply(entries, &[self.magnitude.as_ref(), self.depth.as_ref()])
    }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Magnitude and depth filtering for seismic entries.
//!
//! A [`FilterPredicate`] validates its parameters when it is built, so
//! applying one can never fail. The engine keeps an entry only if every
//! present predicate accepts it, and never reorders entries.

pub mod engine;
pub mod expr;
pub mod predicate;

use strum_macros::{AsRefStr, Display, EnumString};

pub use engine::{FilterRequest, apply};
pub use predicate::{Condition, FilterPredicate};

/// The entry field a predicate reads.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum QuakeField {
    /// Richter magnitude
    Magnitude,
    /// Depth below the surface, in kilometers
    Depth,
}

/// Errors raised while building a filter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// A limit is negative, non-numeric, or a range is empty.
    #[error("invalid {field} filter: {reason}")]
    InvalidFilterParameter {
        /// Field the filter was for.
        field: QuakeField,
        /// What was wrong with the input.
        reason: String,
    },
}

impl FilterError {
    pub(crate) fn invalid(field: QuakeField, reason: impl Into<String>) -> Self {
        Self::InvalidFilterParameter {
            field,
            reason: reason.into(),
        }
    }
}

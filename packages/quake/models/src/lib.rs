#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Seismic feed entry types, world-bank country records, and airports.
//!
//! A [`QuakeEntry`] is created once from a [`RawQuakeRecord`] by
//! [`parse_entry`] and never mutated afterwards. Datasets are replaced
//! wholesale on refresh rather than patched.

pub mod airport;
pub mod exact;
pub mod parse;
pub mod world;

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};

pub use airport::{AirportEntry, AirportRowError, Route};
pub use exact::{ExactNumber, InvalidDecimalError};
pub use parse::parse_entry;
pub use world::{InvalidYearError, WorldRecord, WorldRowError};

/// How long ago an event happened, as labelled by the feed's category term.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(ascii_case_insensitive)]
pub enum AgeCategory {
    /// Within the last hour
    #[strum(serialize = "Past Hour")]
    PastHour,
    /// Within the last day
    #[strum(serialize = "Past Day")]
    PastDay,
    /// Within the last week
    #[strum(serialize = "Past Week")]
    PastWeek,
    /// Within the last month
    #[strum(serialize = "Past Month")]
    PastMonth,
    /// Any term the feed uses that is not one of the above
    Other,
}

impl AgeCategory {
    /// Maps a feed category term onto an age category. Unknown terms map to
    /// [`AgeCategory::Other`].
    #[must_use]
    pub fn from_term(term: &str) -> Self {
        term.trim().parse().unwrap_or(Self::Other)
    }
}

/// Errors raised while turning a raw feed record into a [`QuakeEntry`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The title has no readable magnitude, or does not split into exactly
    /// a magnitude part and a location part.
    #[error("malformed magnitude in title {title:?}")]
    MalformedMagnitude {
        /// The full feed title.
        title: String,
    },

    /// The point is not exactly two numeric tokens.
    #[error("malformed coordinate {point:?}: expected \"<lat> <lon>\"")]
    MalformedCoordinate {
        /// The raw point text.
        point: String,
    },

    /// The elevation is not a decimal number of meters.
    #[error("malformed elevation {elevation:?}")]
    MalformedElevation {
        /// The raw elevation text.
        elevation: String,
    },
}

/// A seismic feed record as handed back by the feed tokenizer, before any
/// interpretation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQuakeRecord {
    /// Title such as `"M 4.6 - 36km ESE of Beatty, Nevada"`.
    pub title: String,
    /// `"<lat> <lon>"`.
    pub point: String,
    /// Signed elevation in meters (negative below the surface).
    pub elevation: String,
    /// Category term such as `"Past Week"`.
    pub category_term: String,
}

impl RawQuakeRecord {
    /// Parses this record into a [`QuakeEntry`].
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if any field is malformed.
    pub fn parse(&self) -> Result<QuakeEntry, ParseError> {
        parse_entry(
            &self.title,
            &self.point,
            &self.elevation,
            &self.category_term,
        )
    }
}

/// A single seismic event.
///
/// `exact_magnitude` and `exact_depth` are authoritative for equality-style
/// filters. `magnitude` and `depth` are their `f64` projections, used for
/// range comparisons and display.
///
/// Two entries are equal when their location titles match and their exact
/// magnitudes compare equal. Natural order is by exact magnitude,
/// descending, then by location title.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuakeEntry {
    location_title: String,
    full_title: String,
    latitude: f64,
    longitude: f64,
    magnitude: f64,
    exact_magnitude: ExactNumber,
    depth: f64,
    exact_depth: ExactNumber,
    age_category: AgeCategory,
}

impl QuakeEntry {
    /// Descriptive location, e.g. `"36km ESE of Beatty, Nevada"`.
    #[must_use]
    pub fn location_title(&self) -> &str {
        &self.location_title
    }

    /// The feed title as received, magnitude included.
    #[must_use]
    pub fn full_title(&self) -> &str {
        &self.full_title
    }

    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    #[must_use]
    pub const fn magnitude(&self) -> f64 {
        self.magnitude
    }

    #[must_use]
    pub const fn exact_magnitude(&self) -> &ExactNumber {
        &self.exact_magnitude
    }

    /// Depth below the surface in kilometers. Never negative.
    #[must_use]
    pub const fn depth(&self) -> f64 {
        self.depth
    }

    #[must_use]
    pub const fn exact_depth(&self) -> &ExactNumber {
        &self.exact_depth
    }

    #[must_use]
    pub const fn age_category(&self) -> AgeCategory {
        self.age_category
    }
}

impl PartialEq for QuakeEntry {
    fn eq(&self, other: &Self) -> bool {
        self.location_title == other.location_title
            && self.exact_magnitude == other.exact_magnitude
    }
}

impl Eq for QuakeEntry {}

impl Hash for QuakeEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.location_title.hash(state);
        self.exact_magnitude.hash(state);
    }
}

impl PartialOrd for QuakeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QuakeEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .exact_magnitude
            .cmp(&self.exact_magnitude)
            .then_with(|| self.location_title.cmp(&other.location_title))
    }
}

impl fmt::Display for QuakeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Title : {} , lat, lon : {}, {} , Magnitude: {}, Depth: {} , Age: {}",
            self.location_title,
            self.latitude,
            self.longitude,
            self.magnitude,
            self.depth,
            self.age_category
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str) -> QuakeEntry {
        parse_entry(title, "38.5 -117.2", "-8960", "Past Week").unwrap()
    }

    #[test]
    fn age_terms_are_case_insensitive() {
        assert_eq!(AgeCategory::from_term("Past Hour"), AgeCategory::PastHour);
        assert_eq!(AgeCategory::from_term("past day"), AgeCategory::PastDay);
        assert_eq!(AgeCategory::from_term(" PAST WEEK "), AgeCategory::PastWeek);
        assert_eq!(AgeCategory::from_term("Past Month"), AgeCategory::PastMonth);
    }

    #[test]
    fn unknown_age_terms_map_to_other() {
        assert_eq!(AgeCategory::from_term("Past Year"), AgeCategory::Other);
        assert_eq!(AgeCategory::from_term(""), AgeCategory::Other);
    }

    #[test]
    fn equality_uses_location_and_exact_magnitude() {
        let a = entry("M 4.6 - 36km ESE of Beatty, Nevada");
        let b = parse_entry(
            "M 4.60 - 36km ESE of Beatty, Nevada",
            "0 0",
            "0",
            "Past Hour",
        )
        .unwrap();
        let c = entry("M 4.7 - 36km ESE of Beatty, Nevada");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn natural_order_is_magnitude_descending() {
        let mut entries = vec![
            entry("M 1.2 - 17km S of Trona, CA"),
            entry("M 4.6 - 36km ESE of Beatty, Nevada"),
            entry("M 2.5 - 5km N of Anza, CA"),
        ];
        entries.sort();
        let magnitudes: Vec<f64> = entries.iter().map(QuakeEntry::magnitude).collect();
        assert_eq!(magnitudes, vec![4.6, 2.5, 1.2]);
    }

    #[test]
    fn raw_record_parses_through_entry_parser() {
        let raw = RawQuakeRecord {
            title: "M 2.5 - 5km N of Anza, CA".to_owned(),
            point: "33.6 -116.7".to_owned(),
            elevation: "-12000".to_owned(),
            category_term: "Past Day".to_owned(),
        };
        let parsed = raw.parse().unwrap();
        assert_eq!(parsed.location_title(), "5km N of Anza, CA");
        assert_eq!(parsed.age_category(), AgeCategory::PastDay);
    }
}

//! Single-field predicates.

use std::fmt;

use quake_map_quake_models::{ExactNumber, QuakeEntry};

use crate::{FilterError, QuakeField};

/// The test a predicate applies to its field.
///
/// `Exact` compares exact decimals. The other variants compare the `f64`
/// projection, with each bound's inclusivity chosen independently.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Exact(ExactNumber),
    LessThan {
        limit: f64,
        inclusive: bool,
    },
    MoreThan {
        limit: f64,
        inclusive: bool,
    },
    Range {
        lower: f64,
        lower_inclusive: bool,
        upper: f64,
        upper_inclusive: bool,
    },
}

/// A validated predicate over one field of a [`QuakeEntry`].
///
/// Construction fails with [`FilterError::InvalidFilterParameter`] on
/// negative or non-finite limits, and on ranges whose lower bound is not
/// strictly below the upper bound.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPredicate {
    field: QuakeField,
    condition: Condition,
}

impl FilterPredicate {
    /// Matches entries whose exact value equals `value`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] if `value` is negative.
    pub fn exact(field: QuakeField, value: ExactNumber) -> Result<Self, FilterError> {
        if value.is_negative() {
            return Err(FilterError::invalid(
                field,
                format!("value must not be negative, got {value}"),
            ));
        }
        Ok(Self {
            field,
            condition: Condition::Exact(value),
        })
    }

    /// Like [`exact`](Self::exact), parsing the value from decimal text.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] if `value` is not a non-negative decimal.
    pub fn exact_str(field: QuakeField, value: &str) -> Result<Self, FilterError> {
        let parsed = value
            .parse::<ExactNumber>()
            .map_err(|e| FilterError::invalid(field, e.to_string()))?;
        Self::exact(field, parsed)
    }

    /// Matches entries whose value is below `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] if `limit` is negative or not finite.
    pub fn less_than(field: QuakeField, limit: f64, inclusive: bool) -> Result<Self, FilterError> {
        check_limit(field, limit)?;
        Ok(Self {
            field,
            condition: Condition::LessThan { limit, inclusive },
        })
    }

    /// Matches entries whose value is above `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] if `limit` is negative or not finite.
    pub fn more_than(field: QuakeField, limit: f64, inclusive: bool) -> Result<Self, FilterError> {
        check_limit(field, limit)?;
        Ok(Self {
            field,
            condition: Condition::MoreThan { limit, inclusive },
        })
    }

    /// Matches entries whose value lies between `lower` and `upper`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] if either bound is negative or not finite,
    /// or if `lower >= upper`.
    pub fn range(
        field: QuakeField,
        lower: f64,
        lower_inclusive: bool,
        upper: f64,
        upper_inclusive: bool,
    ) -> Result<Self, FilterError> {
        check_limit(field, lower)?;
        check_limit(field, upper)?;
        if lower >= upper {
            return Err(FilterError::invalid(
                field,
                format!("lower bound {lower} must be below upper bound {upper}"),
            ));
        }
        Ok(Self {
            field,
            condition: Condition::Range {
                lower,
                lower_inclusive,
                upper,
                upper_inclusive,
            },
        })
    }

    #[must_use]
    pub const fn field(&self) -> QuakeField {
        self.field
    }

    #[must_use]
    pub const fn condition(&self) -> &Condition {
        &self.condition
    }

    /// Whether `entry` passes this predicate.
    #[must_use]
    pub fn test(&self, entry: &QuakeEntry) -> bool {
        match &self.condition {
            Condition::Exact(value) => self.exact_value(entry) == value,
            Condition::LessThan { limit, inclusive } => {
                let v = self.value(entry);
                if *inclusive { v <= *limit } else { v < *limit }
            }
            Condition::MoreThan { limit, inclusive } => {
                let v = self.value(entry);
                if *inclusive { v >= *limit } else { v > *limit }
            }
            Condition::Range {
                lower,
                lower_inclusive,
                upper,
                upper_inclusive,
            } => {
                let v = self.value(entry);
                let above = if *lower_inclusive { v >= *lower } else { v > *lower };
                let below = if *upper_inclusive { v <= *upper } else { v < *upper };
                above && below
            }
        }
    }

    const fn value(&self, entry: &QuakeEntry) -> f64 {
        match self.field {
            QuakeField::Magnitude => entry.magnitude(),
            QuakeField::Depth => entry.depth(),
        }
    }

    const fn exact_value<'a>(&self, entry: &'a QuakeEntry) -> &'a ExactNumber {
        match self.field {
            QuakeField::Magnitude => entry.exact_magnitude(),
            QuakeField::Depth => entry.exact_depth(),
        }
    }
}

fn check_limit(field: QuakeField, limit: f64) -> Result<(), FilterError> {
    if !limit.is_finite() {
        return Err(FilterError::invalid(field, format!("limit {limit} is not a number")));
    }
    if limit < 0.0 {
        return Err(FilterError::invalid(
            field,
            format!("limit must not be negative, got {limit}"),
        ));
    }
    Ok(())
}

impl fmt::Display for FilterPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.condition {
            Condition::Exact(value) => write!(f, "{} = {value}", self.field),
            Condition::LessThan { limit, inclusive } => {
                write!(f, "{} {} {limit}", self.field, if *inclusive { "<=" } else { "<" })
            }
            Condition::MoreThan { limit, inclusive } => {
                write!(f, "{} {} {limit}", self.field, if *inclusive { ">=" } else { ">" })
            }
            Condition::Range {
                lower,
                lower_inclusive,
                upper,
                upper_inclusive,
            } => write!(
                f,
                "{} in {}{lower}, {upper}{}",
                self.field,
                if *lower_inclusive { '[' } else { '(' },
                if *upper_inclusive { ']' } else { ')' },
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use quake_map_quake_models::parse_entry;

    use super::*;

    fn quake(magnitude: &str, elevation: &str) -> QuakeEntry {
        parse_entry(
            &format!("M {magnitude} - 10km N of Ridgecrest, CA"),
            "35.7 -117.6",
            elevation,
            "Past Day",
        )
        .unwrap()
    }

    #[test]
    fn exact_matches_own_value() {
        let entries = [quake("4.6", "-8960"), quake("0.1", "0"), quake("?", "-123456")];
        for entry in &entries {
            let by_magnitude =
                FilterPredicate::exact(QuakeField::Magnitude, entry.exact_magnitude().clone())
                    .unwrap();
            let by_depth =
                FilterPredicate::exact(QuakeField::Depth, entry.exact_depth().clone()).unwrap();
            assert!(by_magnitude.test(entry));
            assert!(by_depth.test(entry));
        }
    }

    #[test]
    fn exact_is_decimal_not_float() {
        let entry = quake("4.6", "-8960");
        assert!(FilterPredicate::exact_str(QuakeField::Magnitude, "4.60").unwrap().test(&entry));
        assert!(FilterPredicate::exact_str(QuakeField::Depth, "8.960").unwrap().test(&entry));
        assert!(!FilterPredicate::exact_str(QuakeField::Magnitude, "4.6000001").unwrap().test(&entry));
    }

    #[test]
    fn inclusive_range_accepts_both_bounds() {
        let range = FilterPredicate::range(QuakeField::Magnitude, 2.5, true, 4.6, true).unwrap();
        assert!(range.test(&quake("2.5", "0")));
        assert!(range.test(&quake("4.6", "0")));
        assert!(range.test(&quake("3.0", "0")));
        assert!(!range.test(&quake("4.7", "0")));
    }

    #[test]
    fn exclusive_range_rejects_both_bounds() {
        let range = FilterPredicate::range(QuakeField::Magnitude, 2.5, false, 4.6, false).unwrap();
        assert!(!range.test(&quake("2.5", "0")));
        assert!(!range.test(&quake("4.6", "0")));
        assert!(range.test(&quake("3.0", "0")));
    }

    #[test]
    fn half_open_ranges() {
        let range = FilterPredicate::range(QuakeField::Depth, 1.0, true, 2.0, false).unwrap();
        assert!(range.test(&quake("1", "-1000")));
        assert!(!range.test(&quake("1", "-2000")));

        let range = FilterPredicate::range(QuakeField::Depth, 1.0, false, 2.0, true).unwrap();
        assert!(!range.test(&quake("1", "-1000")));
        assert!(range.test(&quake("1", "-2000")));
    }

    #[test]
    fn thresholds_respect_inclusivity() {
        let entry = quake("3.0", "-70000");
        assert!(FilterPredicate::less_than(QuakeField::Magnitude, 3.0, true).unwrap().test(&entry));
        assert!(!FilterPredicate::less_than(QuakeField::Magnitude, 3.0, false).unwrap().test(&entry));
        assert!(FilterPredicate::more_than(QuakeField::Depth, 70.0, true).unwrap().test(&entry));
        assert!(!FilterPredicate::more_than(QuakeField::Depth, 70.0, false).unwrap().test(&entry));
    }

    #[test]
    fn rejects_bad_parameters_at_construction() {
        assert!(FilterPredicate::less_than(QuakeField::Magnitude, -0.1, true).is_err());
        assert!(FilterPredicate::more_than(QuakeField::Depth, f64::NAN, true).is_err());
        assert!(FilterPredicate::range(QuakeField::Depth, 5.0, true, 5.0, true).is_err());
        assert!(FilterPredicate::range(QuakeField::Depth, 6.0, true, 5.0, true).is_err());
        assert!(FilterPredicate::range(QuakeField::Depth, -1.0, true, 5.0, true).is_err());
        assert!(FilterPredicate::exact_str(QuakeField::Magnitude, "-1").is_err());

        let err = FilterPredicate::exact_str(QuakeField::Magnitude, "big").unwrap_err();
        assert!(matches!(
            err,
            FilterError::InvalidFilterParameter {
                field: QuakeField::Magnitude,
                ..
            }
        ));
    }

    #[test]
    fn zero_limits_are_allowed() {
        let entry = quake("0", "0");
        assert!(FilterPredicate::less_than(QuakeField::Depth, 0.0, true).unwrap().test(&entry));
        assert!(FilterPredicate::range(QuakeField::Depth, 0.0, true, 1.0, false).unwrap().test(&entry));
    }

    #[test]
    fn displays_readably() {
        let range = FilterPredicate::range(QuakeField::Magnitude, 2.5, true, 4.5, false).unwrap();
        assert_eq!(range.to_string(), "magnitude in [2.5, 4.5)");
        let less = FilterPredicate::less_than(QuakeField::Depth, 70.0, false).unwrap();
        assert_eq!(less.to_string(), "depth < 70");
    }
}

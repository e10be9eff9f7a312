//! Text filter expressions, as typed on the command line.
//!
//! | Expression | Meaning |
//! |---|---|
//! | `4.6`, `=4.6` | exact decimal match |
//! | `<x`, `<=x` | below `x` |
//! | `>x`, `>=x` | above `x` |
//! | `[a,b]`, `(a,b)`, `[a,b)`, `(a,b]` | range, bracket = inclusive |

use std::sync::LazyLock;

use regex::Regex;

use crate::{FilterError, FilterPredicate, QuakeField};

static RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([\[(])\s*([^,\s]+)\s*,\s*([^,\s\])]+)\s*([\])])$").expect("valid regex")
});

/// Parses a filter expression for `field`.
///
/// # Errors
///
/// Returns [`FilterError::InvalidFilterParameter`] if the expression is
/// malformed or its limits are out of domain.
pub fn parse_expression(field: QuakeField, expression: &str) -> Result<FilterPredicate, FilterError> {
    let expression = expression.trim();

    if let Some(caps) = RANGE.captures(expression) {
        let lower = parse_limit(field, &caps[2])?;
        let upper = parse_limit(field, &caps[3])?;
        return FilterPredicate::range(field, lower, &caps[1] == "[", upper, &caps[4] == "]");
    }

    if let Some(rest) = expression.strip_prefix("<=") {
        FilterPredicate::less_than(field, parse_limit(field, rest)?, true)
    } else if let Some(rest) = expression.strip_prefix('<') {
        FilterPredicate::less_than(field, parse_limit(field, rest)?, false)
    } else if let Some(rest) = expression.strip_prefix(">=") {
        FilterPredicate::more_than(field, parse_limit(field, rest)?, true)
    } else if let Some(rest) = expression.strip_prefix('>') {
        FilterPredicate::more_than(field, parse_limit(field, rest)?, false)
    } else {
        let value = expression.strip_prefix('=').unwrap_or(expression).trim();
        FilterPredicate::exact_str(field, value)
    }
}

fn parse_limit(field: QuakeField, text: &str) -> Result<f64, FilterError> {
    let text = text.trim();
    text.parse::<f64>()
        .map_err(|_| FilterError::invalid(field, format!("{text:?} is not a number")))
}

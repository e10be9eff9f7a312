//! Entry parser: raw feed text to [`QuakeEntry`].
//!
//! Titles look like `"M 4.6 - 36km ESE of Beatty, Nevada"`. Magnitudes can
//! be negative (`"M -0.3 - ..."`), so the title is split only on a hyphen
//! with whitespace on both sides.

use std::sync::LazyLock;

use regex::Regex;

use crate::{AgeCategory, ExactNumber, ParseError, QuakeEntry};

static TITLE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s-\s").expect("valid regex"));

/// Magnitude token the feed uses when the magnitude is not yet known.
const UNKNOWN_MAGNITUDE: &str = "?";

/// Parses one seismic feed record.
///
/// Depth is `|elevation| / 1000` kilometers, computed on exact decimals
/// (divided by 100, then by 10) before the `f64` projection is taken.
/// Unrecognized age terms map to [`AgeCategory::Other`].
///
/// # Errors
///
/// * [`ParseError::MalformedMagnitude`] if the title does not split into
///   exactly two parts or the magnitude token is not a finite number
///   (`"?"` is read as zero).
/// * [`ParseError::MalformedCoordinate`] if `point` is not exactly two
///   finite numbers.
/// * [`ParseError::MalformedElevation`] if `elevation` is not a decimal or
///   its depth does not fit an `f64`.
pub fn parse_entry(
    title: &str,
    point: &str,
    elevation: &str,
    age_term: &str,
) -> Result<QuakeEntry, ParseError> {
    let (exact_magnitude, magnitude, location_title) = parse_title(title)?;
    let (latitude, longitude) = parse_point(point)?;
    let exact_depth = parse_depth(elevation)?;
    let depth = exact_depth.to_f64();
    if !depth.is_finite() {
        return Err(ParseError::MalformedElevation {
            elevation: elevation.to_owned(),
        });
    }

    Ok(QuakeEntry {
        location_title,
        full_title: title.to_owned(),
        latitude,
        longitude,
        magnitude,
        exact_magnitude,
        depth,
        exact_depth,
        age_category: AgeCategory::from_term(age_term),
    })
}

fn parse_title(title: &str) -> Result<(ExactNumber, f64, String), ParseError> {
    let malformed = || ParseError::MalformedMagnitude {
        title: title.to_owned(),
    };

    let mut segments: Vec<&str> = TITLE_SEPARATOR.split(title).collect();
    // Trailing empty segments do not count as a location.
    while segments.last().is_some_and(|s| s.trim().is_empty()) {
        segments.pop();
    }
    let [head, location] = segments.as_slice() else {
        return Err(malformed());
    };

    let token = head.split_whitespace().nth(1).ok_or_else(malformed)?;
    let location_title = location.trim().to_owned();

    if token == UNKNOWN_MAGNITUDE {
        return Ok((ExactNumber::zero(), 0.0, location_title));
    }

    let exact = token.parse::<ExactNumber>().map_err(|_| malformed())?;
    let magnitude = token.parse::<f64>().map_err(|_| malformed())?;
    if !magnitude.is_finite() {
        return Err(malformed());
    }

    Ok((exact, magnitude, location_title))
}

fn parse_point(point: &str) -> Result<(f64, f64), ParseError> {
    let malformed = || ParseError::MalformedCoordinate {
        point: point.to_owned(),
    };

    let tokens: Vec<&str> = point.split_whitespace().collect();
    let [lat, lon] = tokens.as_slice() else {
        return Err(malformed());
    };

    let latitude = lat.parse::<f64>().map_err(|_| malformed())?;
    let longitude = lon.parse::<f64>().map_err(|_| malformed())?;
    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(malformed());
    }

    Ok((latitude, longitude))
}

fn parse_depth(elevation: &str) -> Result<ExactNumber, ParseError> {
    let meters = elevation
        .parse::<ExactNumber>()
        .map_err(|_| ParseError::MalformedElevation {
            elevation: elevation.to_owned(),
        })?;

    Ok(meters.abs().divided_by(100).divided_by(10))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_reference_record() {
        let entry = parse_entry(
            "M 4.6 - 36km ESE of Beatty, Nevada",
            "38.5 -117.2",
            "-8960",
            "Past Week",
        )
        .unwrap();

        assert!((entry.magnitude() - 4.6).abs() < f64::EPSILON);
        assert_eq!(entry.exact_magnitude(), &"4.6".parse().unwrap());
        assert_eq!(entry.location_title(), "36km ESE of Beatty, Nevada");
        assert_eq!(entry.full_title(), "M 4.6 - 36km ESE of Beatty, Nevada");
        assert!((entry.latitude() - 38.5).abs() < f64::EPSILON);
        assert!((entry.longitude() - -117.2).abs() < f64::EPSILON);
        assert!((entry.depth() - 8.96).abs() < f64::EPSILON);
        assert_eq!(entry.exact_depth(), &"8.96".parse().unwrap());
        assert_eq!(entry.age_category(), AgeCategory::PastWeek);
    }

    #[test]
    fn unknown_magnitude_is_exact_zero() {
        let entry = parse_entry("M ? - 10km N of X", "1 2", "-1000", "Past Hour").unwrap();
        assert_eq!(entry.exact_magnitude(), &ExactNumber::zero());
        assert!(entry.magnitude().abs() < f64::EPSILON);
        assert_eq!(entry.location_title(), "10km N of X");
    }

    #[test]
    fn negative_magnitude_title_splits_on_spaced_hyphen_only() {
        let entry = parse_entry(
            "M -0.3 - 50km ESE of Beatty, Nevada",
            "36.9 -116.2",
            "-2100",
            "Past Day",
        )
        .unwrap();
        assert!((entry.magnitude() - -0.3).abs() < f64::EPSILON);
        assert_eq!(entry.location_title(), "50km ESE of Beatty, Nevada");
    }

    #[test]
    fn depth_is_absolute_even_above_surface() {
        let entry = parse_entry("M 1.0 - somewhere", "0 0", "1500", "Past Day").unwrap();
        assert!((entry.depth() - 1.5).abs() < f64::EPSILON);

        let surface = parse_entry("M 1.0 - somewhere", "0 0", "0", "Past Day").unwrap();
        assert!(surface.depth().abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_non_numeric_magnitude() {
        let err = parse_entry("M abc - somewhere", "0 0", "0", "Past Day").unwrap_err();
        assert!(matches!(err, ParseError::MalformedMagnitude { .. }));
    }

    #[test]
    fn rejects_titles_without_two_segments() {
        for title in [
            "M 4.6 36km ESE of Beatty",
            "M 4.6 - A - B",
            "M 4.6 - ",
            "",
        ] {
            let err = parse_entry(title, "0 0", "0", "Past Day").unwrap_err();
            assert!(
                matches!(err, ParseError::MalformedMagnitude { .. }),
                "{title:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_bad_coordinates() {
        for point in ["38.5", "38.5 -117.2 3", "north west", "NaN 1", ""] {
            let err = parse_entry("M 1.0 - x", point, "0", "Past Day").unwrap_err();
            assert!(
                matches!(err, ParseError::MalformedCoordinate { .. }),
                "{point:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_magnitudes_beyond_f64_range() {
        for title in ["M 1e999999 - x", "M -1e400 - x", "M inf - x", "M NaN - x"] {
            let err = parse_entry(title, "0 0", "0", "Past Day").unwrap_err();
            assert!(
                matches!(err, ParseError::MalformedMagnitude { .. }),
                "{title:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_elevations_beyond_f64_range() {
        let err = parse_entry("M 1.0 - x", "0 0", "-1e400", "Past Day").unwrap_err();
        assert!(matches!(err, ParseError::MalformedElevation { .. }));
    }

    #[test]
    fn rejects_bad_elevation() {
        let err = parse_entry("M 1.0 - x", "0 0", "deep", "Past Day").unwrap_err();
        assert!(matches!(err, ParseError::MalformedElevation { .. }));
    }

    #[test]
    fn unrecognized_age_term_is_not_an_error() {
        let entry = parse_entry("M 1.0 - x", "0 0", "0", "Yesterday-ish").unwrap();
        assert_eq!(entry.age_category(), AgeCategory::Other);
    }
}

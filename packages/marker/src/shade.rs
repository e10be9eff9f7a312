//! Choropleth shading of countries by a per-country value.

use std::collections::BTreeMap;

use crate::classify::Rgba;

/// Darkest shade a value can map to.
pub const SHADE_MIN: u8 = 10;

/// Lightest shade a value can map to.
pub const SHADE_MAX: u8 = 255;

/// Grey level for countries with no value.
pub const NO_DATA_GREY: u8 = 150;

/// Default input range for life expectancy, in years.
pub const LIFE_EXPECTANCY_RANGE: (f64, f64) = (40.0, 90.0);

/// Maps `value` linearly from `[start, end]` onto
/// [`SHADE_MIN`]..=[`SHADE_MAX`], rounding to the nearest shade. Values
/// outside the input range are clamped.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn shade(value: f64, start: f64, end: f64) -> u8 {
    if !value.is_finite() || (end - start).abs() < f64::EPSILON {
        return SHADE_MIN;
    }
    let slope = f64::from(SHADE_MAX - SHADE_MIN) / (end - start);
    let output = f64::from(SHADE_MIN) + (slope * (value - start)).round();
    output.clamp(f64::from(SHADE_MIN), f64::from(SHADE_MAX)) as u8
}

/// Colour for a shade: high values lean blue, low values lean red.
#[must_use]
pub const fn shade_color(shade: u8) -> Rgba {
    Rgba::opaque(255 - shade, 100, shade)
}

/// Colour for `code`, or grey if `values` has no entry for it.
#[must_use]
pub fn country_color(values: &BTreeMap<String, f64>, code: &str, start: f64, end: f64) -> Rgba {
    values
        .get(code)
        .map_or(Rgba::grey(NO_DATA_GREY), |v| shade_color(shade(*v, start, end)))
}

/// The smallest and largest value, or `None` if there are none.
#[must_use]
pub fn value_range(values: &BTreeMap<String, f64>) -> Option<(f64, f64)> {
    values.values().fold(None, |range, &v| {
        Some(range.map_or((v, v), |(lo, hi): (f64, f64)| (lo.min(v), hi.max(v))))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_range_ends() {
        assert_eq!(shade(40.0, 40.0, 90.0), 10);
        assert_eq!(shade(90.0, 40.0, 90.0), 255);
    }

    #[test]
    fn rounds_to_nearest_shade() {
        // slope 4.9 per year: 65 years -> 10 + round(122.5) = 133
        assert_eq!(shade(65.0, 40.0, 90.0), 133);
        assert_eq!(shade(41.0, 40.0, 90.0), 15);
    }

    #[test]
    fn clamps_out_of_range_values() {
        assert_eq!(shade(10.0, 40.0, 90.0), 10);
        assert_eq!(shade(120.0, 40.0, 90.0), 255);
        assert_eq!(shade(f64::NAN, 40.0, 90.0), 10);
        assert_eq!(shade(5.0, 5.0, 5.0), 10);
    }

    #[test]
    fn colors_lean_blue_when_high() {
        assert_eq!(shade_color(255), Rgba::opaque(0, 100, 255));
        assert_eq!(shade_color(10), Rgba::opaque(245, 100, 10));
    }

    #[test]
    fn missing_countries_are_grey() {
        let mut values = BTreeMap::new();
        values.insert("ABW".to_owned(), 90.0);
        assert_eq!(
            country_color(&values, "ABW", 40.0, 90.0),
            Rgba::opaque(0, 100, 255)
        );
        assert_eq!(country_color(&values, "XXX", 40.0, 90.0), Rgba::grey(150));
    }

    #[test]
    fn computes_value_range() {
        let mut values = BTreeMap::new();
        assert_eq!(value_range(&values), None);
        values.insert("A".to_owned(), 50.0);
        values.insert("B".to_owned(), 81.5);
        values.insert("C".to_owned(), 62.0);
        assert_eq!(value_range(&values), Some((50.0, 81.5)));
    }
}

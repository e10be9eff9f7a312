//! World-bank style country records (one value per country per year).

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// First year covered by the reference dataset.
pub const FIRST_YEAR: i32 = 1960;

/// Last year covered by the reference dataset.
pub const LAST_YEAR: i32 = 2017;

/// Column index of year `y` is `y - YEAR_COLUMN_OFFSET`.
pub const YEAR_COLUMN_OFFSET: i32 = 1956;

/// Error returned when a year outside [`FIRST_YEAR`]..=[`LAST_YEAR`] is
/// requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid year {year}: expected 1960-2017")]
pub struct InvalidYearError {
    /// The rejected year.
    pub year: i32,
}

/// Errors raised while reading one tabular row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldRowError {
    /// The row is shorter than the layout requires.
    #[error("row has no column {column}")]
    MissingColumn {
        /// Zero-based column index.
        column: usize,
    },

    /// A year cell is neither empty nor a number.
    #[error("malformed value {value:?} for year {year}")]
    MalformedValue {
        /// Year whose cell was malformed.
        year: i32,
        /// The raw cell text.
        value: String,
    },
}

/// Checks that `year` lies within the supported range.
///
/// # Errors
///
/// Returns [`InvalidYearError`] if the year is out of range.
pub const fn validate_year(year: i32) -> Result<i32, InvalidYearError> {
    if year < FIRST_YEAR || year > LAST_YEAR {
        Err(InvalidYearError { year })
    } else {
        Ok(year)
    }
}

/// Values per year for a single country.
///
/// Equality is by country code, ignoring ASCII case. Natural order is by
/// country name, then country code ignoring ASCII case, so it is total even
/// when codes differ only in case.
#[derive(Debug, Clone)]
pub struct WorldRecord {
    country_name: String,
    country_code: String,
    year_values: BTreeMap<i32, f64>,
}

impl WorldRecord {
    #[must_use]
    pub fn new(
        country_name: impl Into<String>,
        country_code: impl Into<String>,
        year_values: BTreeMap<i32, f64>,
    ) -> Self {
        Self {
            country_name: country_name.into(),
            country_code: country_code.into(),
            year_values,
        }
    }

    /// Builds a record from a positional row, where the value for year `y`
    /// sits at column `y - 1956`. Empty cells read as `0.0`, which is a
    /// value, not an absence.
    ///
    /// # Errors
    ///
    /// Returns [`WorldRowError`] if a year column is missing or not numeric.
    pub fn from_columns(
        country_name: &str,
        country_code: &str,
        columns: &[&str],
    ) -> Result<Self, WorldRowError> {
        let mut year_values = BTreeMap::new();

        for year in FIRST_YEAR..=LAST_YEAR {
            #[allow(clippy::cast_sign_loss)]
            let column = (year - YEAR_COLUMN_OFFSET) as usize;
            let cell = columns
                .get(column)
                .ok_or(WorldRowError::MissingColumn { column })?
                .trim();

            let value = if cell.is_empty() {
                0.0
            } else {
                cell.parse::<f64>()
                    .map_err(|_| WorldRowError::MalformedValue {
                        year,
                        value: cell.to_owned(),
                    })?
            };
            year_values.insert(year, value);
        }

        Ok(Self::new(country_name, country_code, year_values))
    }

    #[must_use]
    pub fn country_name(&self) -> &str {
        &self.country_name
    }

    #[must_use]
    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// All year values, keyed by year.
    #[must_use]
    pub const fn year_values(&self) -> &BTreeMap<i32, f64> {
        &self.year_values
    }

    /// The value recorded for `year`. Years within range but absent from
    /// the map read as `0.0`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidYearError`] if `year` is outside 1960-2017.
    pub fn value_for_year(&self, year: i32) -> Result<f64, InvalidYearError> {
        validate_year(year)?;
        Ok(self.year_values.get(&year).copied().unwrap_or(0.0))
    }
}

impl PartialEq for WorldRecord {
    fn eq(&self, other: &Self) -> bool {
        self.country_code.eq_ignore_ascii_case(&other.country_code)
    }
}

impl Eq for WorldRecord {}

impl Hash for WorldRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.country_code.to_ascii_lowercase().hash(state);
    }
}

impl PartialOrd for WorldRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WorldRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.country_name.cmp(&other.country_name).then_with(|| {
            self.country_code
                .bytes()
                .map(|b| b.to_ascii_lowercase())
                .cmp(other.country_code.bytes().map(|b| b.to_ascii_lowercase()))
        })
    }
}

impl fmt::Display for WorldRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Country Name: {} , Country Code : {} , Years: {}",
            self.country_name,
            self.country_code,
            self.year_values.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, code: &str, fill: &str) -> Vec<String> {
        let mut cells = vec![
            name.to_owned(),
            code.to_owned(),
            "Life expectancy at birth, total (years)".to_owned(),
            "SP.DYN.LE00.IN".to_owned(),
        ];
        for _ in FIRST_YEAR..=LAST_YEAR {
            cells.push(fill.to_owned());
        }
        cells
    }

    fn record(name: &str, code: &str) -> WorldRecord {
        let cells = row(name, code, "70.5");
        let columns: Vec<&str> = cells.iter().map(String::as_str).collect();
        WorldRecord::from_columns(name, code, &columns).unwrap()
    }

    #[test]
    fn reads_year_columns_at_fixed_offset() {
        let mut cells = row("Aruba", "ABW", "");
        cells[4] = "65.66".to_owned();
        cells[61] = "76.01".to_owned();
        let columns: Vec<&str> = cells.iter().map(String::as_str).collect();

        let record = WorldRecord::from_columns("Aruba", "ABW", &columns).unwrap();
        assert!((record.value_for_year(1960).unwrap() - 65.66).abs() < f64::EPSILON);
        assert!((record.value_for_year(2017).unwrap() - 76.01).abs() < f64::EPSILON);
        assert_eq!(record.year_values().len(), 58);
    }

    #[test]
    fn empty_cells_read_as_zero() {
        let cells = row("Kosovo", "XKX", "");
        let columns: Vec<&str> = cells.iter().map(String::as_str).collect();
        let record = WorldRecord::from_columns("Kosovo", "XKX", &columns).unwrap();
        assert!(record.value_for_year(1990).unwrap().abs() < f64::EPSILON);
    }

    #[test]
    fn out_of_range_years_fail() {
        let record = record("Aruba", "ABW");
        assert_eq!(
            record.value_for_year(1959),
            Err(InvalidYearError { year: 1959 })
        );
        assert!(record.value_for_year(2018).is_err());
        assert!(record.value_for_year(1960).is_ok());
        assert!(record.value_for_year(2017).is_ok());
    }

    #[test]
    fn short_rows_are_rejected() {
        let err = WorldRecord::from_columns("A", "B", &["A", "B", "c", "d"]).unwrap_err();
        assert_eq!(err, WorldRowError::MissingColumn { column: 4 });
    }

    #[test]
    fn malformed_cells_are_rejected() {
        let mut cells = row("Aruba", "ABW", "1");
        cells[10] = "n/a".to_owned();
        let columns: Vec<&str> = cells.iter().map(String::as_str).collect();
        let err = WorldRecord::from_columns("Aruba", "ABW", &columns).unwrap_err();
        assert!(matches!(err, WorldRowError::MalformedValue { year: 1966, .. }));
    }

    #[test]
    fn equality_is_by_code_ignoring_case() {
        assert_eq!(record("Aruba", "ABW"), record("Aruba (NL)", "abw"));
        assert_ne!(record("Aruba", "ABW"), record("Aruba", "AFG"));
    }

    #[test]
    fn orders_by_name_then_code() {
        let mut records = vec![
            record("Chad", "TCD"),
            record("Angola", "AGO"),
            record("Angola", "AAA"),
        ];
        records.sort();
        let codes: Vec<&str> = records.iter().map(WorldRecord::country_code).collect();
        assert_eq!(codes, vec!["AAA", "AGO", "TCD"]);
    }

    #[test]
    fn order_is_transitive_across_code_case() {
        let a = record("B", "abc");
        let b = record("A", "ABC");
        let c = record("A", "ABD");

        assert_eq!(b.cmp(&c), Ordering::Less);
        assert_eq!(c.cmp(&a), Ordering::Less);
        assert_eq!(b.cmp(&a), Ordering::Less);
        assert_eq!(record("A", "abc").cmp(&b), Ordering::Equal);

        let mut records = vec![a, c, b];
        records.sort();
        let keys: Vec<(&str, &str)> = records
            .iter()
            .map(|r| (r.country_name(), r.country_code()))
            .collect();
        assert_eq!(keys, vec![("A", "ABC"), ("A", "ABD"), ("B", "abc")]);
    }
}

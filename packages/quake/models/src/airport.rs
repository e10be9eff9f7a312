//! Airport and route records in the openflights.org `airports.dat` /
//! `routes.dat` layouts.

use std::hash::{Hash, Hasher};

/// Marker the openflights files use for an empty field.
pub const NULL_FIELD: &str = "\\N";

const ID: usize = 0;
const NAME: usize = 1;
const COUNTRY: usize = 3;
const IATA: usize = 4;
const ICAO: usize = 5;
const LATITUDE: usize = 6;
const LONGITUDE: usize = 7;
const ALTITUDE: usize = 8;
const TIMEZONE: usize = 9;

const ROUTE_SOURCE_ID: usize = 3;
const ROUTE_DESTINATION_ID: usize = 5;

/// Errors raised while reading an airport or route row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AirportRowError {
    /// The row is too short.
    #[error("missing column {column}")]
    MissingColumn {
        /// Zero-based index of the first missing column.
        column: usize,
    },

    /// A numeric column does not hold a number.
    #[error("column {column} is not a number: {value:?}")]
    MalformedValue {
        /// Zero-based column index.
        column: usize,
        /// The raw cell text.
        value: String,
    },
}

fn cell<'a>(columns: &[&'a str], column: usize) -> Result<&'a str, AirportRowError> {
    columns
        .get(column)
        .map(|c| c.trim())
        .ok_or(AirportRowError::MissingColumn { column })
}

fn optional(value: &str) -> Option<String> {
    (!value.is_empty() && value != NULL_FIELD).then(|| value.to_owned())
}

fn number<T: std::str::FromStr>(columns: &[&str], column: usize) -> Result<T, AirportRowError> {
    let value = cell(columns, column)?;
    value.parse().map_err(|_| AirportRowError::MalformedValue {
        column,
        value: value.to_owned(),
    })
}

/// One airport. Equality and ordering are by id.
#[derive(Debug, Clone)]
pub struct AirportEntry {
    id: u32,
    name: String,
    country: String,
    iata: Option<String>,
    icao: Option<String>,
    latitude: f64,
    longitude: f64,
    altitude_ft: f64,
    timezone: String,
}

impl AirportEntry {
    /// Reads an `airports.dat` row.
    ///
    /// # Errors
    ///
    /// Returns [`AirportRowError`] if the row is short, or the id,
    /// coordinates or altitude are not numbers.
    pub fn from_columns(columns: &[&str]) -> Result<Self, AirportRowError> {
        let latitude: f64 = number(columns, LATITUDE)?;
        let longitude: f64 = number(columns, LONGITUDE)?;
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(AirportRowError::MalformedValue {
                column: LATITUDE,
                value: format!("{latitude} {longitude}"),
            });
        }

        Ok(Self {
            id: number(columns, ID)?,
            name: cell(columns, NAME)?.to_owned(),
            country: cell(columns, COUNTRY)?.to_owned(),
            iata: optional(cell(columns, IATA)?),
            icao: optional(cell(columns, ICAO)?),
            latitude,
            longitude,
            altitude_ft: number(columns, ALTITUDE)?,
            timezone: cell(columns, TIMEZONE)?.to_owned(),
        })
    }

    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Three-letter IATA code, if assigned.
    #[must_use]
    pub fn iata(&self) -> Option<&str> {
        self.iata.as_deref()
    }

    /// Four-letter ICAO code, if assigned.
    #[must_use]
    pub fn icao(&self) -> Option<&str> {
        self.icao.as_deref()
    }

    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Altitude in feet.
    #[must_use]
    pub const fn altitude_ft(&self) -> f64 {
        self.altitude_ft
    }

    #[must_use]
    pub fn timezone(&self) -> &str {
        &self.timezone
    }
}

impl PartialEq for AirportEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AirportEntry {}

impl Hash for AirportEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for AirportEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AirportEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

/// A flight route between two airports, by airport id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Route {
    pub source: u32,
    pub destination: u32,
}

impl Route {
    /// Reads a `routes.dat` row. Rows whose source or destination airport
    /// id is `\N` yield `None`.
    ///
    /// # Errors
    ///
    /// Returns [`AirportRowError`] if the row is short or an airport id is
    /// not a number.
    pub fn from_columns(columns: &[&str]) -> Result<Option<Self>, AirportRowError> {
        if cell(columns, ROUTE_SOURCE_ID)? == NULL_FIELD
            || cell(columns, ROUTE_DESTINATION_ID)? == NULL_FIELD
        {
            return Ok(None);
        }

        Ok(Some(Self {
            source: number(columns, ROUTE_SOURCE_ID)?,
            destination: number(columns, ROUTE_DESTINATION_ID)?,
        }))
    }
}

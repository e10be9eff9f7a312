//! openflights.org airport and route tables.
//!
//! Neither file has a header. Airport rows that do not parse are reported
//! in [`Ingested::rejected`]. Route rows naming an unknown (`\N`) airport id
//! are skipped without counting as rejections.

use std::io::Read;
use std::path::Path;

use quake_map_quake_models::{AirportEntry, Route};

use crate::{Ingested, SourceError};

fn headerless<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader)
}

/// Reads every row of an `airports.dat` table.
///
/// # Errors
///
/// Returns [`SourceError::Csv`] if the underlying reader fails.
pub fn read_airports_csv<R: Read>(reader: R) -> Result<Ingested<AirportEntry>, SourceError> {
    let mut ingested = Ingested::empty();

    for (index, row) in headerless(reader).records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                ingested.reject(index, "<unreadable row>", e);
                continue;
            }
        };

        let columns: Vec<&str> = row.iter().collect();
        match AirportEntry::from_columns(&columns) {
            Ok(airport) => ingested.entries.push(airport),
            Err(e) => ingested.reject(index, columns.get(1).copied().unwrap_or_default(), e),
        }
    }

    log::info!(
        "Read {} airports ({} rejected)",
        ingested.entries.len(),
        ingested.rejected.len()
    );

    Ok(ingested)
}

/// Reads an airport table from a file.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if the file cannot be read.
pub fn load_airports_csv(path: &Path) -> Result<Ingested<AirportEntry>, SourceError> {
    log::info!("Loading airports from {}", path.display());
    read_airports_csv(std::fs::File::open(path)?)
}

/// Reads every row of a `routes.dat` table.
///
/// # Errors
///
/// Returns [`SourceError::Csv`] if the underlying reader fails.
pub fn read_routes_csv<R: Read>(reader: R) -> Result<Ingested<Route>, SourceError> {
    let mut ingested = Ingested::empty();
    let mut unknown = 0_usize;

    for (index, row) in headerless(reader).records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                ingested.reject(index, "<unreadable row>", e);
                continue;
            }
        };

        let columns: Vec<&str> = row.iter().collect();
        match Route::from_columns(&columns) {
            Ok(Some(route)) => ingested.entries.push(route),
            Ok(None) => unknown += 1,
            Err(e) => ingested.reject(index, columns.first().copied().unwrap_or_default(), e),
        }
    }

    if unknown > 0 {
        log::debug!("Skipped {unknown} routes with an unknown airport id");
    }
    log::info!(
        "Read {} routes ({} rejected)",
        ingested.entries.len(),
        ingested.rejected.len()
    );

    Ok(ingested)
}

/// Reads a route table from a file.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if the file cannot be read.
pub fn load_routes_csv(path: &Path) -> Result<Ingested<Route>, SourceError> {
    log::info!("Loading routes from {}", path.display());
    read_routes_csv(std::fs::File::open(path)?)
}

//! World-bank style CSV tables.
//!
//! The first record is a header. Country name is column 0, the country code
//! sits under the `Country Code` header (column 1 if the header is absent),
//! and the value for year `y` is at column `y - 1956`.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use quake_map_quake_models::world::validate_year;
use quake_map_quake_models::{InvalidYearError, WorldRecord};
use regex::Regex;

use crate::{Ingested, SourceError, retry};

const COUNTRY_CODE_HEADER: &str = "Country Code";
const DEFAULT_CODE_COLUMN: usize = 1;
const NAME_COLUMN: usize = 0;

/// Live world tables must be served from a world-bank host.
static WORLD_BANK_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://([A-Za-z0-9-]+\.)*worldbank\.org(:\d+)?/\S*$").expect("valid regex")
});

/// Reads every data row of a world table. Rows that do not parse are
/// reported in [`Ingested::rejected`].
///
/// # Errors
///
/// Returns [`SourceError::Csv`] if the header cannot be read.
pub fn read_world_csv<R: Read>(reader: R) -> Result<Ingested<WorldRecord>, SourceError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let code_column = csv_reader
        .headers()?
        .iter()
        .position(|h| h.trim() == COUNTRY_CODE_HEADER)
        .unwrap_or(DEFAULT_CODE_COLUMN);

    let mut ingested = Ingested::empty();

    for (index, row) in csv_reader.records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                ingested.reject(index, "<unreadable row>", e);
                continue;
            }
        };

        let name = row.get(NAME_COLUMN).unwrap_or_default().trim();
        let Some(code) = row.get(code_column).map(str::trim) else {
            ingested.reject(index, name, "row has no country code");
            continue;
        };

        let columns: Vec<&str> = row.iter().collect();
        match WorldRecord::from_columns(name, code, &columns) {
            Ok(record) => ingested.entries.push(record),
            Err(e) => ingested.reject(index, name, e),
        }
    }

    log::info!(
        "Read {} world records ({} rejected)",
        ingested.entries.len(),
        ingested.rejected.len()
    );

    Ok(ingested)
}

/// Reads a world table from a file.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if the file cannot be opened, or
/// [`SourceError::Csv`] if its header cannot be read.
pub fn load_world_csv(path: &Path) -> Result<Ingested<WorldRecord>, SourceError> {
    let file = std::fs::File::open(path)?;
    read_world_csv(file)
}

/// Whether `url` points at a world-bank host.
#[must_use]
pub fn is_world_bank_url(url: &str) -> bool {
    WORLD_BANK_URL.is_match(url)
}

/// Downloads and reads a world table. The body must be plain CSV.
///
/// # Errors
///
/// Returns [`SourceError::UnsupportedUrl`] if `url` is not a world-bank
/// URL, [`SourceError::Http`] or [`SourceError::HttpStatus`] if the download
/// fails after retries, or [`SourceError::Csv`] if the header cannot be read.
pub async fn fetch_world_csv(url: &str) -> Result<Ingested<WorldRecord>, SourceError> {
    if !is_world_bank_url(url) {
        return Err(SourceError::UnsupportedUrl {
            url: url.to_owned(),
        });
    }

    log::info!("Fetching world table {url}");
    let client = reqwest::Client::new();
    let body = retry::send_text(|| client.get(url)).await?;
    log::debug!("Received {} bytes from {url}", body.len());

    read_world_csv(body.as_bytes())
}

/// Maps each country code to its value for `year`.
///
/// # Errors
///
/// Returns [`InvalidYearError`] if `year` is outside 1960-2017.
pub fn to_country_code_map(
    records: &[WorldRecord],
    year: i32,
) -> Result<BTreeMap<String, f64>, InvalidYearError> {
    validate_year(year)?;
    records
        .iter()
        .map(|r| Ok((r.country_code().to_owned(), r.value_for_year(year)?)))
        .collect()
}

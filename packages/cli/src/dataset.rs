//! Loads the data files named on the command line.

use std::path::Path;
use std::sync::Arc;

use quake_map_marker::shade::{LIFE_EXPECTANCY_RANGE, value_range};
use quake_map_marker::{MapView, MarkerLayers, RouteLine, route_lines};
use quake_map_quake_models::{AirportEntry, QuakeEntry, WorldRecord};
use quake_map_source::airports::{load_airports_csv, load_routes_csv};
use quake_map_source::ingest::{fetch_quakes, ingest_or_empty, load_feed_file};
use quake_map_source::registry::feed_for;
use quake_map_source::world_csv::{fetch_world_csv, load_world_csv, to_country_code_map};
use quake_map_source::{Ingested, SourceError};
use quake_map_spatial::{LandIndex, PlaceFeature, SpatialError, load_places};

use crate::{CliError, Inputs, report};

/// Everything a map view is built from.
pub struct Dataset {
    pub entries: Vec<Arc<QuakeEntry>>,
    /// Number of feed records that failed to parse.
    pub rejected: usize,
    pub places: Vec<PlaceFeature>,
    pub land: LandIndex,
}

impl Dataset {
    /// Fresh marker layers for this dataset, in the visible-idle state.
    pub fn layers(&self) -> MarkerLayers {
        MarkerLayers::build(&self.entries, &self.places, &self.land)
    }

    /// Builds the layers as one refresh of `view`.
    pub fn install(&self, view: &mut MapView) {
        let ticket = view.begin_refresh();
        view.complete_refresh(ticket, self.layers());
    }
}

/// Loads the feed, land polygons and cities.
pub async fn load(inputs: &Inputs) -> Result<Dataset, CliError> {
    let ingested = load_entries(inputs).await?;
    Ok(Dataset {
        rejected: ingested.rejected.len(),
        entries: ingested.entries,
        places: load_cities(inputs.cities.as_deref())?,
        land: load_land(inputs.countries.as_deref())?,
    })
}

async fn load_entries(inputs: &Inputs) -> Result<Ingested<Arc<QuakeEntry>>, CliError> {
    let result: Result<_, SourceError> = match (&inputs.feed, inputs.window) {
        (Some(path), _) => load_feed_file(path),
        (None, Some(window)) => {
            let feed = feed_for(window).ok_or(CliError::UnknownWindow(window))?;
            fetch_quakes(&feed).await
        }
        (None, None) => return Err(CliError::NoFeed),
    };

    if inputs.allow_empty {
        Ok(ingest_or_empty(result))
    } else {
        Ok(result?)
    }
}

/// The land index for `path`, or an empty one (all ocean) without a path.
pub fn load_land(path: Option<&Path>) -> Result<LandIndex, SpatialError> {
    path.map_or_else(|| Ok(LandIndex::empty()), LandIndex::load)
}

fn load_cities(path: Option<&Path>) -> Result<Vec<PlaceFeature>, SpatialError> {
    path.map_or_else(|| Ok(Vec::new()), load_places)
}

/// Reads the world table from `csv`, or downloads it from `url`.
pub async fn load_world_table(
    csv: Option<&Path>,
    url: Option<&str>,
) -> Result<Ingested<WorldRecord>, CliError> {
    match (csv, url) {
        (Some(path), _) => Ok(load_world_csv(path)?),
        (None, Some(url)) => Ok(fetch_world_csv(url).await?),
        (None, None) => Err(CliError::NoWorldTable),
    }
}

/// Report lines shading every country for `year`. Countries come from
/// `land` when it has any, otherwise from the table itself. Without a
/// `range`, the shading spans the year's lowest to highest value.
pub fn world_shading(
    table: &Ingested<WorldRecord>,
    year: i32,
    range: Option<(f64, f64)>,
    land: &LandIndex,
) -> Result<Vec<String>, CliError> {
    let values = to_country_code_map(&table.entries, year)?;
    let range = range
        .or_else(|| value_range(&values))
        .unwrap_or(LIFE_EXPECTANCY_RANGE);
    log::info!(
        "Shading {} countries for {year} over {:.2}-{:.2} ({} rows rejected)",
        values.len(),
        range.0,
        range.1,
        table.rejected.len()
    );

    if land.is_empty() {
        Ok(report::shading(
            &values,
            table
                .entries
                .iter()
                .map(|r| (r.country_code(), r.country_name())),
            range,
        ))
    } else {
        let mut countries: Vec<_> = land.countries().collect();
        countries.sort_by(|a, b| a.1.cmp(b.1));
        Ok(report::shading(&values, countries, range))
    }
}

/// Loads airports and routes and links them into route lines.
pub fn load_routes(
    airports: &Path,
    routes: &Path,
) -> Result<(Vec<AirportEntry>, Vec<RouteLine>), CliError> {
    let airports = load_airports_csv(airports)?;
    let routes = load_routes_csv(routes)?;
    let lines = route_lines(&routes.entries, &airports.entries);
    log::info!(
        "Linked {} of {} routes ({} airport rows and {} route rows rejected)",
        lines.len(),
        routes.entries.len(),
        airports.rejected.len(),
        routes.rejected.len()
    );
    Ok((airports.entries, lines))
}

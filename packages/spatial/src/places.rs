//! Place (city) features loaded from a `GeoJSON` point collection.

use std::path::Path;

use geojson::feature::Id;
use geojson::{GeoJson, Value};
use serde_json::{Map, Value as JsonValue};

use crate::SpatialError;

/// A named point on the map, e.g. a city.
///
/// Properties are carried opaquely; [`name`](Self::name),
/// [`country`](Self::country) and [`population`](Self::population) read the
/// conventional keys.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceFeature {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub properties: Map<String, JsonValue>,
}

impl PlaceFeature {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.properties.get("name")?.as_str()
    }

    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.properties.get("country")?.as_str()
    }

    /// Population, whether stored as a number or a numeric string.
    #[must_use]
    pub fn population(&self) -> Option<f64> {
        match self.properties.get("population")? {
            JsonValue::Number(n) => n.as_f64(),
            JsonValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Reads point features from a `GeoJSON` feature collection. Features
/// without point geometry are skipped.
///
/// # Errors
///
/// Returns [`SpatialError`] if the document is not a feature collection.
pub fn parse_places(geojson_str: &str) -> Result<Vec<PlaceFeature>, SpatialError> {
    let GeoJson::FeatureCollection(collection) = geojson_str.parse::<GeoJson>()? else {
        return Err(SpatialError::NotAFeatureCollection);
    };

    let mut places = Vec::with_capacity(collection.features.len());
    for (index, feature) in collection.features.into_iter().enumerate() {
        let position = match feature.geometry.as_ref().map(|g| &g.value) {
            Some(Value::Point(position)) if position.len() >= 2 => position.clone(),
            _ => {
                log::warn!("Skipping place {index}: not a point");
                continue;
            }
        };

        let id = match feature.id {
            Some(Id::String(s)) => s,
            Some(Id::Number(n)) => n.to_string(),
            None => index.to_string(),
        };

        places.push(PlaceFeature {
            id,
            latitude: position[1],
            longitude: position[0],
            properties: feature.properties.unwrap_or_default(),
        });
    }

    log::info!("Loaded {} places", places.len());

    Ok(places)
}

/// Reads place features from a file.
///
/// # Errors
///
/// Returns [`SpatialError`] if the file cannot be read or parsed.
pub fn load_places(path: &Path) -> Result<Vec<PlaceFeature>, SpatialError> {
    let text = std::fs::read_to_string(path)?;
    parse_places(&text)
}

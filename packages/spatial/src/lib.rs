#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! In-memory spatial index for land/ocean classification.
//!
//! Loads country polygons from a `GeoJSON` feature collection, builds an
//! R-tree over their bounding boxes, and answers point-in-polygon lookups.
//! The index is built once at startup and passed to whoever classifies
//! events; nothing here is cached globally.

pub mod distance;
pub mod places;

use std::path::Path;

use geo::{Contains, MultiPolygon};
use geojson::feature::Id;
use geojson::{Feature, GeoJson};
use rstar::{AABB, RTree, RTreeObject};

pub use distance::great_circle_km;
pub use places::{PlaceFeature, load_places, parse_places};

/// Errors raised while loading geometry datasets.
#[derive(Debug, thiserror::Error)]
pub enum SpatialError {
    /// The document is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The document is valid `GeoJSON` but not a feature collection.
    #[error("expected a GeoJSON FeatureCollection")]
    NotAFeatureCollection,

    /// The file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Answers whether a point lies on land.
pub trait PointInPolygon {
    /// Whether (`lon`, `lat`), in degrees, falls inside any polygon.
    fn contains(&self, lon: f64, lat: f64) -> bool;

    /// Name of the region containing (`lon`, `lat`), if the provider knows
    /// region names.
    fn country_at(&self, _lon: f64, _lat: f64) -> Option<&str> {
        None
    }
}

/// A country polygon stored in the R-tree with its id and name.
struct CountryEntry {
    id: String,
    name: String,
    envelope: AABB<[f64; 2]>,
    polygon: MultiPolygon<f64>,
}

impl RTreeObject for CountryEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Country polygons indexed for point lookups.
pub struct LandIndex {
    countries: RTree<CountryEntry>,
}

impl LandIndex {
    /// Builds an index from a `GeoJSON` feature collection of country
    /// polygons. Features without polygonal geometry are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError`] if the document is not a feature collection.
    pub fn from_geojson_str(geojson_str: &str) -> Result<Self, SpatialError> {
        let GeoJson::FeatureCollection(collection) = geojson_str.parse::<GeoJson>()? else {
            return Err(SpatialError::NotAFeatureCollection);
        };

        let mut entries = Vec::with_capacity(collection.features.len());
        for (index, feature) in collection.features.into_iter().enumerate() {
            let name = feature_name(&feature).unwrap_or_else(|| format!("country-{index}"));
            let id = match &feature.id {
                Some(Id::String(s)) => s.clone(),
                Some(Id::Number(n)) => n.to_string(),
                None => name.clone(),
            };

            let Some(polygon) = feature_to_multipolygon(feature) else {
                log::warn!("Skipping country {name}: no polygon geometry");
                continue;
            };

            entries.push(CountryEntry {
                id,
                name,
                envelope: compute_envelope(&polygon),
                polygon,
            });
        }

        let countries = RTree::bulk_load(entries);
        log::info!("Loaded {} countries into land index", countries.size());

        Ok(Self { countries })
    }

    /// Reads and indexes a country `GeoJSON` file.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, SpatialError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_geojson_str(&text)
    }

    /// An index with no land at all; every point is ocean.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            countries: RTree::new(),
        }
    }

    /// Number of indexed countries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.countries.size()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.countries.size() == 0
    }

    /// `(id, name)` of every indexed country, in no particular order.
    pub fn countries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.countries
            .iter()
            .map(|entry| (entry.id.as_str(), entry.name.as_str()))
    }

    fn locate(&self, lon: f64, lat: f64) -> Option<&CountryEntry> {
        let point = geo::Point::new(lon, lat);
        let query_env = AABB::from_point([lon, lat]);

        // Country polygons do not overlap, so the first match wins.
        self.countries
            .locate_in_envelope_intersecting(&query_env)
            .find(|entry| entry.polygon.contains(&point))
    }
}

impl PointInPolygon for LandIndex {
    fn contains(&self, lon: f64, lat: f64) -> bool {
        self.locate(lon, lat).is_some()
    }

    fn country_at(&self, lon: f64, lat: f64) -> Option<&str> {
        self.locate(lon, lat).map(|entry| entry.name.as_str())
    }
}

fn feature_name(feature: &Feature) -> Option<String> {
    ["name", "ADMIN", "NAME"]
        .iter()
        .find_map(|key| feature.property(key)?.as_str().map(str::to_owned))
}

/// Converts a feature's geometry into a [`MultiPolygon`].
/// Handles both `Polygon` and `MultiPolygon` geometry types.
fn feature_to_multipolygon(feature: Feature) -> Option<MultiPolygon<f64>> {
    let geo_geom: geo::Geometry<f64> = feature.geometry?.try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

/// Compute the bounding box envelope for a [`MultiPolygon`].
fn compute_envelope(mp: &MultiPolygon<f64>) -> AABB<[f64; 2]> {
    use geo::BoundingRect;

    mp.bounding_rect().map_or_else(
        || AABB::from_point([0.0, 0.0]),
        |rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
    )
}

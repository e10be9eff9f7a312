//! Marker arena types.
//!
//! Markers refer to each other through [`QuakeId`] / [`CityId`] handles
//! (indices into the owning [`MarkerLayers`]), never through references.
//! Handles are only meaningful for the layers that issued them.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use quake_map_quake_models::QuakeEntry;
use quake_map_spatial::{PlaceFeature, PointInPolygon};

use crate::classify::{DepthBand, MarkerShape, classify_all};

/// Index of an earthquake marker in its [`MarkerLayers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuakeId(pub usize);

/// Index of a city marker in its [`MarkerLayers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CityId(pub usize);

impl fmt::Display for QuakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "quake#{}", self.0)
    }
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "city#{}", self.0)
    }
}

/// The visual projection of one seismic event.
///
/// Classification fields are fixed at construction. Interaction state
/// (`hidden`, `selected`, `clicked`, `proximity`) is changed only by the
/// proximity engine.
#[derive(Debug, Clone)]
pub struct QuakeMarker {
    pub(crate) entry: Arc<QuakeEntry>,
    pub(crate) on_land: bool,
    pub(crate) country: Option<String>,
    pub(crate) radius: f64,
    pub(crate) threat_radius_km: f64,
    pub(crate) band: DepthBand,
    pub(crate) shape: MarkerShape,
    pub(crate) animated: bool,
    pub(crate) hidden: bool,
    pub(crate) selected: bool,
    pub(crate) clicked: bool,
    pub(crate) proximity: BTreeSet<CityId>,
}

impl QuakeMarker {
    #[must_use]
    pub const fn entry(&self) -> &Arc<QuakeEntry> {
        &self.entry
    }

    #[must_use]
    pub const fn on_land(&self) -> bool {
        self.on_land
    }

    /// Country containing the event, for land events whose geometry
    /// provider knows country names.
    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub const fn threat_radius_km(&self) -> f64 {
        self.threat_radius_km
    }

    #[must_use]
    pub const fn band(&self) -> DepthBand {
        self.band
    }

    #[must_use]
    pub const fn shape(&self) -> MarkerShape {
        self.shape
    }

    /// Whether the marker pulses (events from the past day).
    #[must_use]
    pub const fn animated(&self) -> bool {
        self.animated
    }

    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    #[must_use]
    pub const fn is_selected(&self) -> bool {
        self.selected
    }

    #[must_use]
    pub const fn is_clicked(&self) -> bool {
        self.clicked
    }

    /// Cities linked to this event after it was clicked.
    #[must_use]
    pub const fn proximity(&self) -> &BTreeSet<CityId> {
        &self.proximity
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.entry.latitude()
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.entry.longitude()
    }
}

/// The visual projection of one place.
#[derive(Debug, Clone)]
pub struct CityMarker {
    pub(crate) place: PlaceFeature,
    pub(crate) hidden: bool,
    pub(crate) selected: bool,
    pub(crate) proximity: BTreeSet<QuakeId>,
}

impl CityMarker {
    #[must_use]
    pub const fn new(place: PlaceFeature) -> Self {
        Self {
            place,
            hidden: false,
            selected: false,
            proximity: BTreeSet::new(),
        }
    }

    #[must_use]
    pub const fn place(&self) -> &PlaceFeature {
        &self.place
    }

    /// City name, or the feature id if the feature has no name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.place.name().unwrap_or(&self.place.id)
    }

    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    #[must_use]
    pub const fn is_selected(&self) -> bool {
        self.selected
    }

    /// Events in range of this city after it was clicked.
    #[must_use]
    pub const fn proximity(&self) -> &BTreeSet<QuakeId> {
        &self.proximity
    }

    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.place.latitude
    }

    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.place.longitude
    }
}

/// Both marker collections of one dataset. Replaced as a whole when the
/// dataset changes.
#[derive(Debug, Clone, Default)]
pub struct MarkerLayers {
    pub(crate) quakes: Vec<QuakeMarker>,
    pub(crate) cities: Vec<CityMarker>,
}

impl MarkerLayers {
    #[must_use]
    pub const fn new(quakes: Vec<QuakeMarker>, cities: Vec<CityMarker>) -> Self {
        Self { quakes, cities }
    }

    /// Classifies `entries` against `land` and wraps `places` as city
    /// markers.
    #[must_use]
    pub fn build<L: PointInPolygon + ?Sized>(
        entries: &[Arc<QuakeEntry>],
        places: &[PlaceFeature],
        land: &L,
    ) -> Self {
        let quakes = classify_all(entries, land);
        let cities = places.iter().cloned().map(CityMarker::new).collect();
        Self::new(quakes, cities)
    }

    #[must_use]
    pub fn quakes(&self) -> &[QuakeMarker] {
        &self.quakes
    }

    #[must_use]
    pub fn cities(&self) -> &[CityMarker] {
        &self.cities
    }

    #[must_use]
    pub fn quake(&self, id: QuakeId) -> Option<&QuakeMarker> {
        self.quakes.get(id.0)
    }

    #[must_use]
    pub fn city(&self, id: CityId) -> Option<&CityMarker> {
        self.cities.get(id.0)
    }

    /// Ids of earthquake markers that are currently shown.
    pub fn visible_quakes(&self) -> impl Iterator<Item = QuakeId> + '_ {
        self.quakes
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.hidden)
            .map(|(i, _)| QuakeId(i))
    }

    /// Ids of city markers that are currently shown.
    pub fn visible_cities(&self) -> impl Iterator<Item = CityId> + '_ {
        self.cities
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.hidden)
            .map(|(i, _)| CityId(i))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quakes.is_empty() && self.cities.is_empty()
    }
}

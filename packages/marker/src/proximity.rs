//! Pointer interaction: hover selection and click isolation.
//!
//! Each marker moves between three states:
//!
//! * visible and idle (initial),
//! * visible and hovered (`selected`), while the cursor is over it,
//! * isolated or hidden, after a release on some marker.
//!
//! A release over empty space returns every marker to visible and idle.
//! Every operation is synchronous and a no-op on empty collections.

use quake_map_spatial::great_circle_km;

use crate::marker::{CityId, CityMarker, MarkerLayers, QuakeId, QuakeMarker};

/// Hit radius of a city pin, in pixels.
pub const CITY_MARKER_RADIUS: f64 = 11.0;

/// Smallest hit radius of an earthquake marker, in pixels, so that
/// zero-magnitude events stay clickable.
pub const MIN_QUAKE_HIT_RADIUS: f64 = 3.0;

/// A position on the drawing surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Maps geographic coordinates onto the drawing surface.
pub trait ScreenProjection {
    fn project(&self, lat: f64, lon: f64) -> ScreenPoint;
}

/// Plate carrée projection of the whole globe onto a `width × height`
/// surface, with (-180, 90) at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equirectangular {
    pub width: f64,
    pub height: f64,
}

impl ScreenProjection for Equirectangular {
    fn project(&self, lat: f64, lon: f64) -> ScreenPoint {
        ScreenPoint::new(
            (lon + 180.0) / 360.0 * self.width,
            (90.0 - lat) / 180.0 * self.height,
        )
    }
}

/// A reference to a marker of either kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerRef {
    Quake(QuakeId),
    City(CityId),
}

/// The first visible marker whose footprint contains `cursor`. Earthquakes
/// are scanned before cities, each in collection order.
pub fn hit_test<P: ScreenProjection + ?Sized>(
    cursor: ScreenPoint,
    quakes: &[QuakeMarker],
    cities: &[CityMarker],
    projection: &P,
) -> Option<MarkerRef> {
    let quake = quakes.iter().position(|m| {
        !m.hidden
            && projection
                .project(m.latitude(), m.longitude())
                .distance_to(cursor)
                <= m.radius.max(MIN_QUAKE_HIT_RADIUS)
    });
    if let Some(index) = quake {
        return Some(MarkerRef::Quake(QuakeId(index)));
    }

    cities
        .iter()
        .position(|m| {
            !m.hidden
                && projection
                    .project(m.latitude(), m.longitude())
                    .distance_to(cursor)
                    <= CITY_MARKER_RADIUS
        })
        .map(|index| MarkerRef::City(CityId(index)))
}

/// Moves the hover flag to the first marker under `cursor`, if any.
pub fn on_hover_move<P: ScreenProjection + ?Sized>(
    cursor: ScreenPoint,
    quakes: &mut [QuakeMarker],
    cities: &mut [CityMarker],
    projection: &P,
) -> Option<MarkerRef> {
    for marker in quakes.iter_mut() {
        marker.selected = false;
    }
    for marker in cities.iter_mut() {
        marker.selected = false;
    }

    let hit = hit_test(cursor, quakes, cities, projection);
    match hit {
        Some(MarkerRef::Quake(QuakeId(i))) => quakes[i].selected = true,
        Some(MarkerRef::City(CityId(i))) => cities[i].selected = true,
        None => {}
    }
    hit
}

/// Release over empty space: shows every marker and drops every click and
/// proximity link.
pub fn on_release_empty(quakes: &mut [QuakeMarker], cities: &mut [CityMarker]) {
    for marker in quakes.iter_mut() {
        marker.hidden = false;
        marker.clicked = false;
        marker.proximity.clear();
    }
    for marker in cities.iter_mut() {
        marker.hidden = false;
        marker.proximity.clear();
    }
}

/// Release on an earthquake: hides every other earthquake, and every city
/// farther than the target's threat radius. Cities in range stay visible
/// and are linked to the target.
pub fn on_release_earthquake(
    target: QuakeId,
    quakes: &mut [QuakeMarker],
    cities: &mut [CityMarker],
) {
    let Some(clicked) = quakes.get(target.0) else {
        log::warn!("Ignoring release on unknown {target}");
        return;
    };
    let (lat, lon, threat_km) = (clicked.latitude(), clicked.longitude(), clicked.threat_radius_km);

    let mut linked = std::collections::BTreeSet::new();
    for (index, city) in cities.iter_mut().enumerate() {
        let distance = great_circle_km(lat, lon, city.latitude(), city.longitude());
        city.hidden = distance > threat_km;
        if !city.hidden {
            linked.insert(CityId(index));
        }
    }

    for (index, marker) in quakes.iter_mut().enumerate() {
        marker.hidden = index != target.0;
    }

    let clicked = &mut quakes[target.0];
    clicked.clicked = true;
    clicked.proximity = linked;

    log::debug!(
        "Isolated {target} ({:.1} km threat radius): {} cities in range",
        threat_km,
        clicked.proximity.len()
    );
}

/// Release on a city: hides every other city, and every earthquake whose
/// own threat radius does not reach the city. Earthquakes in range stay
/// visible and are linked to the target.
pub fn on_release_city(target: CityId, quakes: &mut [QuakeMarker], cities: &mut [CityMarker]) {
    let Some(clicked) = cities.get(target.0) else {
        log::warn!("Ignoring release on unknown {target}");
        return;
    };
    let (lat, lon) = (clicked.latitude(), clicked.longitude());

    let mut linked = std::collections::BTreeSet::new();
    for (index, quake) in quakes.iter_mut().enumerate() {
        let distance = great_circle_km(lat, lon, quake.latitude(), quake.longitude());
        quake.hidden = distance > quake.threat_radius_km;
        if !quake.hidden {
            linked.insert(QuakeId(index));
        }
    }

    for (index, city) in cities.iter_mut().enumerate() {
        city.hidden = index != target.0;
    }

    log::debug!("Isolated {target}: {} earthquakes in range", linked.len());
    cities[target.0].proximity = linked;
}

/// Release at `cursor`: resets any previous isolation, then isolates the
/// first visible marker under the cursor, if any.
pub fn on_release<P: ScreenProjection + ?Sized>(
    cursor: ScreenPoint,
    quakes: &mut [QuakeMarker],
    cities: &mut [CityMarker],
    projection: &P,
) -> Option<MarkerRef> {
    let hit = hit_test(cursor, quakes, cities, projection);
    on_release_empty(quakes, cities);
    match hit {
        Some(MarkerRef::Quake(id)) => on_release_earthquake(id, quakes, cities),
        Some(MarkerRef::City(id)) => on_release_city(id, quakes, cities),
        None => {}
    }
    hit
}

impl MarkerLayers {
    /// See [`on_hover_move`].
    pub fn hover<P: ScreenProjection + ?Sized>(
        &mut self,
        cursor: ScreenPoint,
        projection: &P,
    ) -> Option<MarkerRef> {
        on_hover_move(cursor, &mut self.quakes, &mut self.cities, projection)
    }

    /// See [`on_release`].
    pub fn release<P: ScreenProjection + ?Sized>(
        &mut self,
        cursor: ScreenPoint,
        projection: &P,
    ) -> Option<MarkerRef> {
        on_release(cursor, &mut self.quakes, &mut self.cities, projection)
    }

    /// See [`on_release_empty`].
    pub fn release_empty(&mut self) {
        on_release_empty(&mut self.quakes, &mut self.cities);
    }

    /// See [`on_release_earthquake`].
    pub fn release_earthquake(&mut self, target: QuakeId) {
        on_release_earthquake(target, &mut self.quakes, &mut self.cities);
    }

    /// See [`on_release_city`].
    pub fn release_city(&mut self, target: CityId) {
        on_release_city(target, &mut self.quakes, &mut self.cities);
    }
}

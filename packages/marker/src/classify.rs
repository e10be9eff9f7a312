//! Turns entries into markers: placement, size, depth band and threat
//! radius.

use std::sync::Arc;

use quake_map_quake_models::{AgeCategory, QuakeEntry};
use quake_map_spatial::PointInPolygon;
use strum_macros::{AsRefStr, Display, EnumString};

use crate::marker::QuakeMarker;

/// Upper bound (exclusive) of the light depth band, and lower bound of the
/// moderate one, in kilometers.
pub const MODERATE_DEPTH_KM: f64 = 70.0;

/// Lower bound of the intense depth band, in kilometers.
pub const INTENSE_DEPTH_KM: f64 = 300.0;

/// Magnitudes below this are light.
pub const LIGHT_MAGNITUDE: f64 = 4.0;

/// Magnitudes at or above this are intense.
pub const MODERATE_MAGNITUDE: f64 = 5.0;

/// An 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    #[must_use]
    pub const fn grey(level: u8) -> Self {
        Self::opaque(level, level, level)
    }

    /// Packed `0xAARRGGBB`, as a signed 32-bit integer.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn to_argb(self) -> i32 {
        (((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32)
            as i32
    }
}

/// Depth-derived stroke style.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum DepthBand {
    Light,
    Moderate,
    Intense,
}

impl DepthBand {
    /// Band for a depth in kilometers.
    ///
    /// `[70, 300)` is moderate and `(0, 70)` is light. Everything else is
    /// intense, including a depth of exactly zero.
    #[must_use]
    pub fn from_depth(depth_km: f64) -> Self {
        if (MODERATE_DEPTH_KM..INTENSE_DEPTH_KM).contains(&depth_km) {
            Self::Moderate
        } else if depth_km > 0.0 && depth_km < MODERATE_DEPTH_KM {
            Self::Light
        } else {
            Self::Intense
        }
    }

    #[must_use]
    pub const fn stroke_weight(self) -> u8 {
        match self {
            Self::Light => 7,
            Self::Moderate => 9,
            Self::Intense => 11,
        }
    }

    #[must_use]
    pub const fn stroke_color(self) -> Rgba {
        match self {
            Self::Light => Rgba::new(6, 175, 194, 100),
            Self::Moderate => Rgba::new(251, 255, 0, 190),
            Self::Intense => Rgba::new(191, 34, 40, 150),
        }
    }

    /// Fill colour used by the depth legend.
    #[must_use]
    pub const fn legend_color(self) -> Rgba {
        match self {
            Self::Light => Rgba::new(242, 255, 56, 130),
            Self::Moderate => Rgba::new(214, 71, 24, 100),
            Self::Intense => Rgba::new(148, 28, 32, 200),
        }
    }
}

/// Magnitude legend class.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum MagnitudeClass {
    /// Below 4.0
    Light,
    /// 4.0 up to 5.0
    Moderate,
    /// 5.0 and above
    Intense,
}

impl MagnitudeClass {
    #[must_use]
    pub fn from_magnitude(magnitude: f64) -> Self {
        if magnitude < LIGHT_MAGNITUDE {
            Self::Light
        } else if magnitude < MODERATE_MAGNITUDE {
            Self::Moderate
        } else {
            Self::Intense
        }
    }
}

/// How a marker is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum MarkerShape {
    /// Land events
    Circle,
    /// Ocean events
    RoundedSquare,
}

/// On-screen radius of an event marker.
#[must_use]
pub fn marker_radius(magnitude: f64) -> f64 {
    3.0 * magnitude
}

/// Radius in kilometers within which places count as threatened.
///
/// `20 × 1.8^(2m − 5) × 1.6`. An illustrative heuristic, strictly
/// increasing in magnitude and always positive.
#[must_use]
pub fn threat_radius_km(magnitude: f64) -> f64 {
    20.0 * 1.8_f64.powf(2.0f64.mul_add(magnitude, -5.0)) * 1.6
}

/// Builds the marker for one entry.
#[must_use]
pub fn classify<L: PointInPolygon + ?Sized>(entry: Arc<QuakeEntry>, land: &L) -> QuakeMarker {
    let country = land
        .country_at(entry.longitude(), entry.latitude())
        .map(str::to_owned);
    let on_land = country.is_some() || land.contains(entry.longitude(), entry.latitude());

    QuakeMarker {
        on_land,
        country,
        radius: marker_radius(entry.magnitude()),
        threat_radius_km: threat_radius_km(entry.magnitude()),
        band: DepthBand::from_depth(entry.depth()),
        shape: if on_land {
            MarkerShape::Circle
        } else {
            MarkerShape::RoundedSquare
        },
        animated: entry.age_category() == AgeCategory::PastDay,
        hidden: false,
        selected: false,
        clicked: false,
        proximity: std::collections::BTreeSet::new(),
        entry,
    }
}

/// Classifies every entry, in order.
#[must_use]
pub fn classify_all<L: PointInPolygon + ?Sized>(
    entries: &[Arc<QuakeEntry>],
    land: &L,
) -> Vec<QuakeMarker> {
    let markers: Vec<QuakeMarker> = entries
        .iter()
        .map(|entry| classify(Arc::clone(entry), land))
        .collect();

    log::info!(
        "Classified {} earthquakes ({} on land)",
        markers.len(),
        markers.iter().filter(|m| m.on_land).count()
    );

    markers
}

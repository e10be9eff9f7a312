#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Map markers for earthquakes and cities.
//!
//! [`classify`] turns entries into markers, [`proximity`] drives hover and
//! click isolation over them, [`view`] owns the layers on screen, and
//! [`shade`] colours countries for the choropleth. [`route`] links airports
//! into flight route lines.

pub mod classify;
pub mod marker;
pub mod proximity;
pub mod route;
pub mod shade;
pub mod view;

pub use classify::{DepthBand, MagnitudeClass, MarkerShape, Rgba, classify_all};
pub use marker::{CityId, CityMarker, MarkerLayers, QuakeId, QuakeMarker};
pub use proximity::{Equirectangular, MarkerRef, ScreenPoint, ScreenProjection};
pub use route::{RouteLine, route_lines};
pub use view::{MapView, RefreshTicket, ViewError};

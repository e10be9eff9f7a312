//! Flight route lines between airports.

use std::collections::BTreeMap;

use quake_map_quake_models::{AirportEntry, Route};
use quake_map_spatial::great_circle_km;

/// A route drawn as a straight segment between two airport locations,
/// as (latitude, longitude) in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteLine {
    pub source: u32,
    pub destination: u32,
    pub from: (f64, f64),
    pub to: (f64, f64),
}

impl RouteLine {
    /// Great-circle length of the route, in km.
    #[must_use]
    pub fn length_km(&self) -> f64 {
        great_circle_km(self.from.0, self.from.1, self.to.0, self.to.1)
    }
}

/// Builds a line for every route whose source and destination are both in
/// `airports`. Routes keep their input order.
#[must_use]
pub fn route_lines(routes: &[Route], airports: &[AirportEntry]) -> Vec<RouteLine> {
    let locations: BTreeMap<u32, (f64, f64)> = airports
        .iter()
        .map(|a| (a.id(), (a.latitude(), a.longitude())))
        .collect();

    let lines: Vec<RouteLine> = routes
        .iter()
        .filter_map(|route| {
            Some(RouteLine {
                source: route.source,
                destination: route.destination,
                from: *locations.get(&route.source)?,
                to: *locations.get(&route.destination)?,
            })
        })
        .collect();

    if lines.len() < routes.len() {
        log::debug!(
            "Dropped {} routes touching airports not in the table",
            routes.len() - lines.len()
        );
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airport(id: &str, lat: &str, lon: &str) -> AirportEntry {
        AirportEntry::from_columns(&[
            id, "Field", "Town", "Country", "AAA", "AAAA", lat, lon, "0", "0",
        ])
        .unwrap()
    }

    #[test]
    fn links_known_airports_only() {
        let airports = [airport("1", "0", "0"), airport("2", "0", "1")];
        let routes = [
            Route {
                source: 1,
                destination: 2,
            },
            Route {
                source: 1,
                destination: 99,
            },
            Route {
                source: 2,
                destination: 1,
            },
        ];

        let lines = route_lines(&routes, &airports);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].from, (0.0, 0.0));
        assert_eq!(lines[0].to, (0.0, 1.0));
        assert_eq!((lines[1].source, lines[1].destination), (2, 1));
    }

    #[test]
    fn length_is_great_circle() {
        let airports = [airport("1", "0", "0"), airport("2", "1", "0")];
        let lines = route_lines(
            &[Route {
                source: 1,
                destination: 2,
            }],
            &airports,
        );
        let expected = quake_map_spatial::distance::EARTH_RADIUS_KM * 1f64.to_radians();
        assert!((lines[0].length_km() - expected).abs() < 1e-9);
    }

    #[test]
    fn no_airports_means_no_lines() {
        let routes = [Route {
            source: 1,
            destination: 2,
        }];
        assert!(route_lines(&routes, &[]).is_empty());
    }
}

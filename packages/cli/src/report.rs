//! Plain-text report lines for the sub-commands.

use std::collections::BTreeMap;

use quake_map_marker::shade::country_color;
use quake_map_marker::{
    CityMarker, DepthBand, MagnitudeClass, MarkerLayers, MarkerRef, QuakeMarker, Rgba, RouteLine,
};
use quake_map_quake_models::{AirportEntry, QuakeEntry};

use crate::dataset::Dataset;

/// One line per entry: magnitude, depth, age and location.
pub fn entry_line(entry: &QuakeEntry) -> String {
    format!(
        "M {:<5} {:>7.1} km  {:<10}  {}",
        entry.exact_magnitude().to_string(),
        entry.depth(),
        entry.age_category().to_string(),
        entry.location_title()
    )
}

fn quake_line(marker: &QuakeMarker) -> String {
    let placement = match marker.country() {
        Some(country) => country,
        None if marker.on_land() => "land",
        None => "ocean",
    };
    format!(
        "{}  [{} depth, {}, threat radius {:.1} km]",
        entry_line(marker.entry()),
        marker.band(),
        placement,
        marker.threat_radius_km()
    )
}

fn city_line(marker: &CityMarker) -> String {
    let mut line = format!(
        "{} ({:.3}, {:.3})",
        marker.name(),
        marker.latitude(),
        marker.longitude()
    );
    if let Some(country) = marker.place().country() {
        line.push_str(&format!(", {country}"));
    }
    if let Some(population) = marker.place().population() {
        line.push_str(&format!(", pop. {population:.0}"));
    }
    line
}

/// The entries as a pretty-printed JSON array.
pub fn entries_json(entries: &[&QuakeEntry]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(entries)
}

/// Dataset counts, the magnitude and depth breakdowns, and the `top`
/// strongest events.
pub fn summary(dataset: &Dataset, layers: &MarkerLayers, top: usize) -> Vec<String> {
    let mut by_class = BTreeMap::<MagnitudeClass, usize>::new();
    let mut by_band = BTreeMap::<DepthBand, usize>::new();
    for marker in layers.quakes() {
        *by_class
            .entry(MagnitudeClass::from_magnitude(marker.entry().magnitude()))
            .or_default() += 1;
        *by_band.entry(marker.band()).or_default() += 1;
    }
    let on_land = layers.quakes().iter().filter(|m| m.on_land()).count();

    let mut lines = vec![
        format!(
            "{} earthquakes ({} rejected), {} on land, {} in the ocean",
            layers.quakes().len(),
            dataset.rejected,
            on_land,
            layers.quakes().len() - on_land
        ),
        format!("{} cities", layers.cities().len()),
        "Magnitude:".to_owned(),
    ];
    for (class, count) in &by_class {
        lines.push(format!("  {:<10} {count}", class.to_string()));
    }
    lines.push("Depth:".to_owned());
    for (band, count) in &by_band {
        lines.push(format!(
            "  {:<10} {count} (stroke {}, legend {})",
            band.to_string(),
            band.stroke_weight(),
            color_hex(band.legend_color())
        ));
    }

    let mut strongest = dataset.entries.clone();
    strongest.sort();
    strongest.truncate(top);
    if !strongest.is_empty() {
        lines.push(format!("Top {}:", strongest.len()));
        lines.extend(strongest.iter().map(|e| format!("  {}", entry_line(e))));
    }

    lines
}

/// What the pointer is over.
pub fn hover(layers: &MarkerLayers, hit: Option<MarkerRef>) -> String {
    match hit {
        Some(MarkerRef::Quake(id)) => layers
            .quake(id)
            .map_or_else(|| "Nothing under the pointer".to_owned(), quake_line),
        Some(MarkerRef::City(id)) => layers
            .city(id)
            .map_or_else(|| "Nothing under the pointer".to_owned(), city_line),
        None => "Nothing under the pointer".to_owned(),
    }
}

/// The isolated marker and the markers linked to it.
pub fn isolation(layers: &MarkerLayers, hit: Option<MarkerRef>) -> Vec<String> {
    match hit {
        Some(MarkerRef::Quake(id)) => {
            let Some(marker) = layers.quake(id) else {
                return Vec::new();
            };
            let mut lines = vec![
                format!("Isolated {}", quake_line(marker)),
                format!("{} cities in range:", marker.proximity().len()),
            ];
            lines.extend(
                marker
                    .proximity()
                    .iter()
                    .filter_map(|&city| layers.city(city))
                    .map(|city| format!("  {}", city_line(city))),
            );
            lines
        }
        Some(MarkerRef::City(id)) => {
            let Some(marker) = layers.city(id) else {
                return Vec::new();
            };
            let mut lines = vec![
                format!("Isolated {}", city_line(marker)),
                format!("{} earthquakes threaten it:", marker.proximity().len()),
            ];
            lines.extend(
                marker
                    .proximity()
                    .iter()
                    .filter_map(|&quake| layers.quake(quake))
                    .map(|quake| format!("  {}", quake_line(quake))),
            );
            lines
        }
        None => vec![format!(
            "Nothing under the pointer; showing all {} earthquakes and {} cities",
            layers.visible_quakes().count(),
            layers.visible_cities().count()
        )],
    }
}

fn color_hex(color: Rgba) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

/// One line per country: code, value (if any), colour, name. Countries are
/// listed in `countries` order.
pub fn shading<'a>(
    values: &BTreeMap<String, f64>,
    countries: impl IntoIterator<Item = (&'a str, &'a str)>,
    (start, end): (f64, f64),
) -> Vec<String> {
    countries
        .into_iter()
        .map(|(code, name)| {
            let value = values
                .get(code)
                .map_or_else(|| "n/a".to_owned(), |v| format!("{v:.2}"));
            format!(
                "{code:<4} {value:>8}  {}  {name}",
                color_hex(country_color(values, code, start, end))
            )
        })
        .collect()
}

fn airport_label(airports: &BTreeMap<u32, &AirportEntry>, id: u32) -> String {
    airports.get(&id).map_or_else(
        || id.to_string(),
        |a| a.iata().or_else(|| a.icao()).unwrap_or_else(|| a.name()).to_owned(),
    )
}

/// Route counts and the `top` longest routes.
pub fn routes(airports: &[AirportEntry], lines: &[RouteLine], top: usize) -> Vec<String> {
    let by_id: BTreeMap<u32, &AirportEntry> = airports.iter().map(|a| (a.id(), a)).collect();

    let mut longest: Vec<&RouteLine> = lines.iter().collect();
    longest.sort_by(|a, b| b.length_km().total_cmp(&a.length_km()));
    longest.truncate(top);

    let mut report = vec![format!("{} airports, {} routes", airports.len(), lines.len())];
    if !longest.is_empty() {
        report.push(format!("Longest {}:", longest.len()));
        report.extend(longest.iter().map(|line| {
            format!(
                "  {:<4} -> {:<4} {:>8.0} km",
                airport_label(&by_id, line.source),
                airport_label(&by_id, line.destination),
                line.length_km()
            )
        }));
    }
    report
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use quake_map_quake_models::parse_entry;
    use quake_map_spatial::{LandIndex, parse_places};

    use super::*;

    const CITIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": "beatty",
                "geometry": { "type": "Point", "coordinates": [-116.76, 36.91] },
                "properties": { "name": "Beatty", "country": "United States", "population": 1010 }
            }
        ]
    }"#;

    fn dataset() -> Dataset {
        let entries = vec![
            Arc::new(
                parse_entry(
                    "M 1.1 - 3km W of Cobb, CA",
                    "38.8 -122.8",
                    "-1500",
                    "Past Hour",
                )
                .unwrap(),
            ),
            Arc::new(
                parse_entry(
                    "M 4.6 - 36km ESE of Beatty, Nevada",
                    "36.8 -116.4",
                    "-8960",
                    "Past Week",
                )
                .unwrap(),
            ),
        ];
        Dataset {
            entries,
            rejected: 1,
            places: parse_places(CITIES).unwrap(),
            land: LandIndex::empty(),
        }
    }

    #[test]
    fn formats_entry_line() {
        let dataset = dataset();
        assert_eq!(
            entry_line(&dataset.entries[1]),
            "M 4.6       9.0 km  Past Week   36km ESE of Beatty, Nevada"
        );
    }

    #[test]
    fn summary_counts_and_orders_top_events() {
        let dataset = dataset();
        let layers = dataset.layers();
        let lines = summary(&dataset, &layers, 1);

        assert_eq!(
            lines[0],
            "2 earthquakes (1 rejected), 0 on land, 2 in the ocean"
        );
        assert_eq!(lines[1], "1 cities");
        assert!(lines.contains(&"  light      1 (stroke 7, legend #f2ff38)".to_owned()));
        assert!(lines.contains(&"  moderate   1 (stroke 9, legend #d64718)".to_owned()));
        assert!(lines.contains(&"Top 1:".to_owned()));
        assert!(lines.last().unwrap().ends_with("36km ESE of Beatty, Nevada"));
    }

    #[test]
    fn isolation_lists_cities_in_range() {
        let dataset = dataset();
        let mut layers = dataset.layers();
        layers.release_earthquake(quake_map_marker::QuakeId(1));

        let lines = isolation(&layers, Some(MarkerRef::Quake(quake_map_marker::QuakeId(1))));
        assert_eq!(lines[1], "1 cities in range:");
        assert!(lines[2].starts_with("  Beatty (36.910, -116.760), United States, pop. 1010"));
    }

    #[test]
    fn empty_release_reports_everything_visible() {
        let dataset = dataset();
        let layers = dataset.layers();
        assert_eq!(
            isolation(&layers, None),
            vec!["Nothing under the pointer; showing all 2 earthquakes and 1 cities".to_owned()]
        );
        assert_eq!(hover(&layers, None), "Nothing under the pointer");
    }

    #[test]
    fn serializes_entries_as_json() {
        let dataset = dataset();
        let json = entries_json(&[dataset.entries[1].as_ref()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let entry = &value[0];
        assert_eq!(entry["locationTitle"], "36km ESE of Beatty, Nevada");
        assert_eq!(entry["ageCategory"], "PAST_WEEK");
        assert!(entries_json(&[]).unwrap().starts_with('['));
    }

    #[test]
    fn lists_longest_routes_by_code() {
        let row = |id: &str, code: &str, lat: &str, lon: &str| {
            AirportEntry::from_columns(&[
                id, "Field", "Town", "Country", code, "\\N", lat, lon, "0", "0",
            ])
            .unwrap()
        };
        let airports = [
            row("1", "AAA", "0", "0"),
            row("2", "BBB", "0", "1"),
            row("3", "\\N", "0", "10"),
        ];
        let table = [
            quake_map_quake_models::Route {
                source: 1,
                destination: 2,
            },
            quake_map_quake_models::Route {
                source: 1,
                destination: 3,
            },
        ];
        let lines = quake_map_marker::route_lines(&table, &airports);

        let report = routes(&airports, &lines, 1);
        assert_eq!(report[0], "3 airports, 2 routes");
        assert_eq!(report[1], "Longest 1:");
        assert_eq!(report[2], "  AAA  -> Field     1112 km");
    }

    #[test]
    fn shades_countries_and_marks_missing_ones() {
        let mut values = BTreeMap::new();
        values.insert("ABW".to_owned(), 90.0);
        let lines = shading(
            &values,
            [("ABW", "Aruba"), ("ATA", "Antarctica")],
            (40.0, 90.0),
        );
        assert_eq!(lines[0], "ABW     90.00  #0064ff  Aruba");
        assert_eq!(lines[1], "ATA       n/a  #969696  Antarctica");
    }
}

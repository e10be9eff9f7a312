//! Feed registry: the live seismic feeds, loaded from an embedded TOML
//! config.
//!
//! `feeds.toml` is baked into the binary at compile time via
//! [`include_str!`]. Each rolling window has exactly one feed.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::SourceError;

const FEEDS_TOML: &str = include_str!("../feeds.toml");

/// Live feed URLs must match this pattern.
static LIVE_FEED_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://.*earthquake\.usgs\.gov/earthquakes/feed/v1\.0/summary/.*\.atom$")
        .expect("valid regex")
});

/// The rolling time window a live feed covers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FeedWindow {
    PastHour,
    PastDay,
    PastWeek,
    PastMonth,
}

/// A live feed, as configured in `feeds.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedDefinition {
    /// Unique identifier (e.g. `"all_week"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Window the feed covers.
    pub window: FeedWindow,
    /// Atom document URL.
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct FeedsFile {
    feed: Vec<FeedDefinition>,
}

/// Parses a feeds config.
///
/// # Errors
///
/// Returns [`SourceError::Config`] if the TOML is malformed, or
/// [`SourceError::UnsupportedUrl`] if a feed URL is not a live feed URL.
pub fn parse_feeds_toml(toml_str: &str) -> Result<Vec<FeedDefinition>, SourceError> {
    let file: FeedsFile = toml::de::from_str(toml_str)?;
    for feed in &file.feed {
        if !is_live_feed_url(&feed.url) {
            return Err(SourceError::UnsupportedUrl {
                url: feed.url.clone(),
            });
        }
    }
    Ok(file.feed)
}

/// Returns all configured feeds.
///
/// # Panics
///
/// Panics if the embedded `feeds.toml` is malformed.
#[must_use]
pub fn all_feeds() -> Vec<FeedDefinition> {
    parse_feeds_toml(FEEDS_TOML).unwrap_or_else(|e| panic!("Failed to parse feeds.toml: {e}"))
}

/// Returns the feed covering `window`.
#[must_use]
pub fn feed_for(window: FeedWindow) -> Option<FeedDefinition> {
    all_feeds().into_iter().find(|f| f.window == window)
}

/// Whether `url` points at a live seismic Atom feed.
#[must_use]
pub fn is_live_feed_url(url: &str) -> bool {
    LIVE_FEED_URL.is_match(url)
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_window_has_exactly_one_feed() {
        let feeds = all_feeds();
        assert_eq!(feeds.len(), 4);
        for window in FeedWindow::iter() {
            let count = feeds.iter().filter(|f| f.window == window).count();
            assert_eq!(count, 1, "{window} should have one feed");
        }
    }

    #[test]
    fn feed_ids_are_unique() {
        let feeds = all_feeds();
        let mut ids: Vec<&str> = feeds.iter().map(|f| f.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), feeds.len());
    }

    #[test]
    fn looks_up_by_window() {
        let feed = feed_for(FeedWindow::PastWeek).unwrap();
        assert_eq!(
            feed.url,
            "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.atom"
        );
    }

    #[test]
    fn window_names_parse_case_insensitively() {
        assert_eq!("past_day".parse::<FeedWindow>().unwrap(), FeedWindow::PastDay);
        assert_eq!("PAST_HOUR".parse::<FeedWindow>().unwrap(), FeedWindow::PastHour);
        assert_eq!(FeedWindow::PastMonth.to_string(), "past_month");
    }

    #[test]
    fn validates_live_feed_urls() {
        assert!(is_live_feed_url(
            "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/2.5_day.atom"
        ));
        assert!(!is_live_feed_url(
            "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_day.geojson"
        ));
        assert!(!is_live_feed_url("https://example.com/feed.atom"));
    }

    #[test]
    fn rejects_configs_with_foreign_urls() {
        let toml = r#"
            [[feed]]
            id = "x"
            name = "x"
            window = "past_day"
            url = "https://example.com/x.atom"
        "#;
        assert!(matches!(
            parse_feeds_toml(toml),
            Err(SourceError::UnsupportedUrl { .. })
        ));
    }

    #[test]
    fn rejects_unknown_windows() {
        let toml = r#"
            [[feed]]
            id = "x"
            name = "x"
            window = "past_year"
            url = "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/x.atom"
        "#;
        assert!(matches!(parse_feeds_toml(toml), Err(SourceError::Config(_))));
    }
}

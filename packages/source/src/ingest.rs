//! Seismic feed ingestion from a document, a file, or a live URL.

use std::path::Path;
use std::sync::Arc;

use quake_map_quake_models::QuakeEntry;

use crate::atom::read_atom_entries;
use crate::registry::{FeedDefinition, is_live_feed_url};
use crate::{Ingested, SourceError, retry};

/// Parses every entry of an Atom document, in document order. Entries with
/// missing or malformed fields are skipped and reported.
///
/// # Errors
///
/// Returns [`SourceError::Xml`] if the document is not well-formed.
pub fn ingest_atom(xml: &str) -> Result<Ingested<Arc<QuakeEntry>>, SourceError> {
    let mut ingested = Ingested::empty();

    for (index, atom_entry) in read_atom_entries(xml)?.into_iter().enumerate() {
        let label = atom_entry.label().to_owned();
        let parsed = atom_entry
            .into_raw()
            .map_err(|e| e.to_string())
            .and_then(|raw| raw.parse().map_err(|e| e.to_string()));

        match parsed {
            Ok(entry) => ingested.entries.push(Arc::new(entry)),
            Err(reason) => ingested.reject(index, &label, reason),
        }
    }

    log::info!(
        "Ingested {} earthquakes ({} rejected)",
        ingested.entries.len(),
        ingested.rejected.len()
    );

    Ok(ingested)
}

/// Reads and parses a feed document saved on disk.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if the file cannot be read, or
/// [`SourceError::Xml`] if it is not well-formed.
pub fn load_feed_file(path: &Path) -> Result<Ingested<Arc<QuakeEntry>>, SourceError> {
    log::info!("Loading feed from {}", path.display());
    let xml = std::fs::read_to_string(path)?;
    ingest_atom(&xml)
}

/// Downloads and parses a live feed.
///
/// # Errors
///
/// Returns [`SourceError::UnsupportedUrl`] if `url` is not a live feed URL,
/// [`SourceError::Http`]/[`SourceError::HttpStatus`] if the download fails,
/// or [`SourceError::Xml`] if the body is not well-formed.
pub async fn fetch_feed(url: &str) -> Result<Ingested<Arc<QuakeEntry>>, SourceError> {
    if !is_live_feed_url(url) {
        return Err(SourceError::UnsupportedUrl {
            url: url.to_owned(),
        });
    }

    log::info!("Fetching {url}");
    let client = reqwest::Client::new();
    let body = retry::send_text(|| client.get(url)).await?;
    log::debug!("Received {} bytes from {url}", body.len());

    ingest_atom(&body)
}

/// Downloads and parses a configured feed.
///
/// # Errors
///
/// See [`fetch_feed`].
pub async fn fetch_quakes(feed: &FeedDefinition) -> Result<Ingested<Arc<QuakeEntry>>, SourceError> {
    log::info!("Refreshing {} ({})", feed.name, feed.id);
    fetch_feed(&feed.url).await
}

/// Unwraps an ingestion result. A failed ingestion yields an empty batch
/// and the cause is logged.
#[must_use]
pub fn ingest_or_empty<T>(result: Result<Ingested<T>, SourceError>) -> Ingested<T> {
    match result {
        Ok(ingested) => ingested,
        Err(e) => {
            if e.is_unavailable() {
                log::error!("{e}; continuing with no data");
            } else {
                log::error!("Could not ingest source: {e}; continuing with no data");
            }
            Ingested::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use quake_map_quake_models::AgeCategory;

    use super::*;

    const FEED: &str = r#"<feed xmlns:georss="http://www.georss.org/georss">
  <entry>
    <title>M 4.6 - 36km ESE of Beatty, Nevada</title>
    <georss:point>38.5 -117.2</georss:point>
    <georss:elev>-8960</georss:elev>
    <category label="Age" term="Past Week"/>
  </entry>
  <entry>
    <title>M abc - nowhere</title>
    <georss:point>0 0</georss:point>
    <georss:elev>0</georss:elev>
    <category label="Age" term="Past Day"/>
  </entry>
  <entry>
    <title>M 2.0 - somewhere</title>
    <georss:point>north</georss:point>
    <georss:elev>0</georss:elev>
    <category label="Age" term="Past Day"/>
  </entry>
  <entry>
    <title>M 1.1 - 3km W of Cobb, CA</title>
    <georss:point>38.8 -122.8</georss:point>
    <georss:elev>-1500</georss:elev>
    <category label="Age" term="Past Hour"/>
  </entry>
</feed>"#;

    #[test]
    fn malformed_entries_do_not_abort_the_batch() {
        let ingested = ingest_atom(FEED).unwrap();
        assert_eq!(ingested.entries.len(), 2);
        assert_eq!(ingested.rejected.len(), 2);

        assert_eq!(ingested.entries[0].location_title(), "36km ESE of Beatty, Nevada");
        assert_eq!(ingested.entries[0].age_category(), AgeCategory::PastWeek);
        assert_eq!(ingested.entries[1].location_title(), "3km W of Cobb, CA");

        let indices: Vec<usize> = ingested.rejected.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2]);
        assert_eq!(ingested.rejected[0].label, "M abc - nowhere");
    }

    #[test]
    fn missing_file_yields_empty_dataset() {
        let ingested = ingest_or_empty(load_feed_file(Path::new("/nonexistent/feed.atom")));
        assert!(ingested.entries.is_empty());
        assert!(ingested.rejected.is_empty());
    }

    #[test]
    fn reads_feed_files() {
        let path = std::env::temp_dir().join(format!("quake_map_feed_{}.atom", std::process::id()));
        std::fs::write(&path, FEED).unwrap();
        let ingested = load_feed_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(ingested.entries.len(), 2);
    }

    #[test]
    fn fetch_rejects_foreign_urls_before_any_request() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let result = runtime.block_on(fetch_feed("https://example.com/quakes.atom"));
        assert!(matches!(result, Err(SourceError::UnsupportedUrl { .. })));
    }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Seismic feed, world-bank table, and airport table ingestion.
//!
//! Raw text (a local file or a live feed body) is tokenized into
//! [`RawQuakeRecord`](quake_map_quake_models::RawQuakeRecord)s and parsed
//! one record at a time. A malformed record is logged and reported in
//! [`Ingested::rejected`]; it never aborts the batch. Failing to read the
//! source at all is a [`SourceError`].

pub mod airports;
pub mod atom;
pub mod ingest;
pub mod registry;
pub mod retry;
pub mod world_csv;

/// Errors that abort a whole ingestion.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed. The source is unavailable.
    #[error("Source unavailable: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status. The source is
    /// unavailable.
    #[error("Source unavailable: HTTP {status}")]
    HttpStatus {
        /// Numeric status code.
        status: u16,
    },

    /// I/O error (file read). The source is unavailable.
    #[error("Source unavailable: {0}")]
    Io(#[from] std::io::Error),

    /// The feed document is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The table is not readable CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A feed registry config could not be parsed.
    #[error("Feed config error: {0}")]
    Config(#[from] toml::de::Error),

    /// The URL is not a recognized live feed or world-bank table.
    #[error("Unsupported source URL: {url}")]
    UnsupportedUrl {
        /// The rejected URL.
        url: String,
    },
}

impl SourceError {
    /// Whether the error means the source could not be reached or read, as
    /// opposed to being reachable but malformed.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::HttpStatus { .. } | Self::Io(_))
    }
}

/// A record that was excluded from a batch, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    /// Zero-based position of the record in the source.
    pub index: usize,
    /// Human-readable label (feed title, country name).
    pub label: String,
    /// Why the record was rejected.
    pub reason: String,
}

/// The outcome of a batch parse: the records that parsed, in source order,
/// plus the ones that did not.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingested<T> {
    /// Successfully parsed records, in source order.
    pub entries: Vec<T>,
    /// Records excluded from `entries`.
    pub rejected: Vec<RejectedRecord>,
}

impl<T> Ingested<T> {
    /// An empty batch.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            entries: Vec::new(),
            rejected: Vec::new(),
        }
    }

    /// Records a rejection and logs it.
    pub(crate) fn reject(&mut self, index: usize, label: &str, reason: impl ToString) {
        let reason = reason.to_string();
        log::warn!("Skipping record {index} ({label}): {reason}");
        self.rejected.push(RejectedRecord {
            index,
            label: label.to_owned(),
            reason,
        });
    }
}

impl<T> Default for Ingested<T> {
    fn default() -> Self {
        Self::empty()
    }
}

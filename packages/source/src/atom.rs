//! Atom feed tokenizer for seismic feeds.
//!
//! Each `<entry>` carries the four fields an entry needs:
//!
//! ```xml
//! <entry>
//!   <title>M 4.6 - 36km ESE of Beatty, Nevada</title>
//!   <georss:point>38.5 -117.2</georss:point>
//!   <georss:elev>-8960</georss:elev>
//!   <category label="Age" term="Past Week"/>
//! </entry>
//! ```
//!
//! Feed-level elements outside `<entry>` are ignored. Only the first
//! occurrence of each field inside an entry is kept.

use quake_map_quake_models::RawQuakeRecord;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::SourceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Point,
    Elevation,
}

/// One `<entry>` as found in the document. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AtomEntry {
    pub title: Option<String>,
    pub point: Option<String>,
    pub elevation: Option<String>,
    pub category_term: Option<String>,
}

/// Error returned when an entry lacks a required field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("entry has no {0}")]
pub struct MissingFieldError(pub &'static str);

impl AtomEntry {
    /// Label used when reporting this entry.
    #[must_use]
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or("<untitled>")
    }

    /// Converts to a raw record.
    ///
    /// # Errors
    ///
    /// Returns [`MissingFieldError`] naming the first absent field.
    pub fn into_raw(self) -> Result<RawQuakeRecord, MissingFieldError> {
        Ok(RawQuakeRecord {
            title: self.title.ok_or(MissingFieldError("title"))?,
            point: self.point.ok_or(MissingFieldError("georss:point"))?,
            elevation: self.elevation.ok_or(MissingFieldError("georss:elev"))?,
            category_term: self.category_term.ok_or(MissingFieldError("category term"))?,
        })
    }

    const fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Point => &mut self.point,
            Field::Elevation => &mut self.elevation,
        }
    }

    fn set_category(&mut self, element: &BytesStart<'_>) -> Result<(), SourceError> {
        if self.category_term.is_some() {
            return Ok(());
        }
        if let Some(attr) = element
            .try_get_attribute("term")
            .map_err(quick_xml::Error::from)?
        {
            self.category_term = Some(attr.unescape_value()?.into_owned());
        }
        Ok(())
    }
}

fn field_for(name: &[u8]) -> Option<Field> {
    match name {
        b"title" => Some(Field::Title),
        b"georss:point" => Some(Field::Point),
        b"georss:elev" => Some(Field::Elevation),
        _ => None,
    }
}

/// Reads every `<entry>` of an Atom document, in document order.
///
/// # Errors
///
/// Returns [`SourceError::Xml`] if the document is not well-formed.
pub fn read_atom_entries(xml: &str) -> Result<Vec<AtomEntry>, SourceError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut current: Option<AtomEntry> = None;
    let mut open_field: Option<Field> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.name();
                if name.as_ref() == b"entry" {
                    current = Some(AtomEntry::default());
                } else if let Some(entry) = current.as_mut() {
                    if name.as_ref() == b"category" {
                        entry.set_category(&e)?;
                    } else if let Some(field) = field_for(name.as_ref()) {
                        // Repeated fields keep their first value.
                        open_field = entry.slot(field).is_none().then_some(field);
                        if open_field.is_some() {
                            *entry.slot(field) = Some(String::new());
                        }
                    }
                }
            }
            Event::Empty(e) => {
                if let Some(entry) = current.as_mut()
                    && e.name().as_ref() == b"category"
                {
                    entry.set_category(&e)?;
                }
            }
            Event::Text(text) => {
                if let (Some(entry), Some(field)) = (current.as_mut(), open_field)
                    && let Some(slot) = entry.slot(field).as_mut()
                {
                    slot.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let (Some(entry), Some(field)) = (current.as_mut(), open_field)
                    && let Some(slot) = entry.slot(field).as_mut()
                {
                    slot.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(e) => {
                let name = e.name();
                if name.as_ref() == b"entry" {
                    open_field = None;
                    if let Some(entry) = current.take() {
                        entries.push(entry);
                    }
                } else if field_for(name.as_ref()).is_some() {
                    open_field = None;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    log::debug!("Read {} Atom entries", entries.len());

    Ok(entries)
}

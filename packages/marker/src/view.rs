//! The map view: owns the current [`MarkerLayers`] and swaps them as a
//! whole when a dataset refresh completes.

use crate::marker::MarkerLayers;
use crate::proximity::{MarkerRef, ScreenPoint, ScreenProjection};

/// Errors raised by [`MapView`] queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// No dataset has been installed yet.
    #[error("no dataset loaded")]
    EmptyDataset,
}

/// Handle for one in-flight dataset refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefreshTicket(u64);

/// Holds the layers currently on screen.
///
/// Refreshes are last-write-wins: [`begin_refresh`](Self::begin_refresh)
/// issues increasing tickets, and
/// [`complete_refresh`](Self::complete_refresh) only installs the result of
/// the newest one. Results of superseded refreshes are dropped.
#[derive(Debug, Default)]
pub struct MapView {
    layers: Option<MarkerLayers>,
    latest_ticket: u64,
}

impl MapView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a refresh, superseding any refresh still in flight.
    pub const fn begin_refresh(&mut self) -> RefreshTicket {
        self.latest_ticket += 1;
        RefreshTicket(self.latest_ticket)
    }

    /// Installs `layers` if `ticket` is the newest refresh. Returns whether
    /// they were installed.
    pub fn complete_refresh(&mut self, ticket: RefreshTicket, layers: MarkerLayers) -> bool {
        if ticket.0 != self.latest_ticket {
            log::info!(
                "Discarding stale refresh {} (latest is {})",
                ticket.0,
                self.latest_ticket
            );
            return false;
        }

        log::info!(
            "Installing dataset: {} earthquakes, {} cities",
            layers.quakes().len(),
            layers.cities().len()
        );
        self.layers = Some(layers);
        true
    }

    /// Installs `layers` immediately, superseding any refresh in flight.
    pub fn replace(&mut self, layers: MarkerLayers) {
        let ticket = self.begin_refresh();
        self.complete_refresh(ticket, layers);
    }

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.layers.is_some()
    }

    /// The layers on screen.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::EmptyDataset`] before the first install.
    pub fn layers(&self) -> Result<&MarkerLayers, ViewError> {
        self.layers.as_ref().ok_or(ViewError::EmptyDataset)
    }

    fn layers_mut(&mut self) -> Result<&mut MarkerLayers, ViewError> {
        self.layers.as_mut().ok_or(ViewError::EmptyDataset)
    }

    /// Pointer moved.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::EmptyDataset`] before the first install.
    pub fn pointer_moved<P: ScreenProjection + ?Sized>(
        &mut self,
        cursor: ScreenPoint,
        projection: &P,
    ) -> Result<Option<MarkerRef>, ViewError> {
        Ok(self.layers_mut()?.hover(cursor, projection))
    }

    /// Pointer released.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::EmptyDataset`] before the first install.
    pub fn pointer_released<P: ScreenProjection + ?Sized>(
        &mut self,
        cursor: ScreenPoint,
        projection: &P,
    ) -> Result<Option<MarkerRef>, ViewError> {
        Ok(self.layers_mut()?.release(cursor, projection))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use quake_map_quake_models::parse_entry;
    use quake_map_spatial::PointInPolygon;

    use crate::proximity::Equirectangular;

    use super::*;

    struct AllLand;

    impl PointInPolygon for AllLand {
        fn contains(&self, _lon: f64, _lat: f64) -> bool {
            true
        }
    }

    fn layers(titles: &[&str]) -> MarkerLayers {
        let entries: Vec<_> = titles
            .iter()
            .map(|t| Arc::new(parse_entry(t, "0 0", "-1000", "Past Hour").unwrap()))
            .collect();
        MarkerLayers::build(&entries, &[], &AllLand)
    }

    #[test]
    fn queries_before_install_fail() {
        let mut view = MapView::new();
        let screen = Equirectangular {
            width: 360.0,
            height: 180.0,
        };
        assert!(!view.is_loaded());
        assert_eq!(view.layers().unwrap_err(), ViewError::EmptyDataset);
        assert_eq!(
            view.pointer_moved(ScreenPoint::new(0.0, 0.0), &screen),
            Err(ViewError::EmptyDataset)
        );
        assert_eq!(
            view.pointer_released(ScreenPoint::new(0.0, 0.0), &screen),
            Err(ViewError::EmptyDataset)
        );
    }

    #[test]
    fn newest_refresh_wins() {
        let mut view = MapView::new();
        let slow = view.begin_refresh();
        let fast = view.begin_refresh();

        assert!(view.complete_refresh(fast, layers(&["M 1.0 - fast"])));
        assert!(!view.complete_refresh(slow, layers(&["M 2.0 - slow", "M 3.0 - slow"])));

        let installed = view.layers().unwrap();
        assert_eq!(installed.quakes().len(), 1);
        assert_eq!(installed.quakes()[0].entry().location_title(), "fast");
    }

    #[test]
    fn stale_completion_after_newer_install_is_dropped() {
        let mut view = MapView::new();
        let first = view.begin_refresh();
        view.replace(layers(&["M 1.0 - replaced"]));
        assert!(!view.complete_refresh(first, layers(&[])));
        assert_eq!(view.layers().unwrap().quakes().len(), 1);
    }

    #[test]
    fn swap_replaces_interaction_state() {
        let mut view = MapView::new();
        let screen = Equirectangular {
            width: 360.0,
            height: 180.0,
        };
        view.replace(layers(&["M 4.0 - a", "M 4.0 - b"]));
        let hit = view
            .pointer_released(screen.project(0.0, 0.0), &screen)
            .unwrap();
        assert!(hit.is_some());
        assert_eq!(view.layers().unwrap().visible_quakes().count(), 1);

        view.replace(layers(&["M 4.0 - a", "M 4.0 - b"]));
        assert_eq!(view.layers().unwrap().visible_quakes().count(), 2);
    }
}

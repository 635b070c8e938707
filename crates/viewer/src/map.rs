//! The map widget seam.
//!
//! The browser build implements `MapWidget` over the map library; tests use a
//! recording fake. Handles are cheap clones of library objects.

use foundation::{LatLng, Viewpoint};
use layers::{StyleRecord, TileSource};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct MapError(pub String);

pub trait MapWidget {
    type TileLayer;
    type Overlay;
    type Marker;

    fn set_view(&mut self, view: Viewpoint);
    fn pan_to(&mut self, center: LatLng);
    fn zoom(&self) -> f64;
    /// Positive deltas zoom in, negative zoom out.
    fn zoom_by(&mut self, delta: f64);

    fn add_tile_layer(&mut self, source: &TileSource) -> Self::TileLayer;
    fn remove_tile_layer(&mut self, layer: &Self::TileLayer);

    fn add_overlay(
        &mut self,
        geojson: &serde_json::Value,
        style: &StyleRecord,
    ) -> Result<Self::Overlay, MapError>;
    fn remove_overlay(&mut self, overlay: &Self::Overlay);
    fn set_overlay_style(&mut self, overlay: &Self::Overlay, style: &StyleRecord);

    fn place_marker(&mut self, at: LatLng, popup: &str) -> Self::Marker;
    fn move_marker(&mut self, marker: &Self::Marker, at: LatLng, popup: &str);
}

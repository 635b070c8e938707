//! In-process stand-ins for the map widget and the layer backend.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use api::{
    ApiError, BackendClient, DeviceLocation, LayerDetail, LayerRecord, MessageResponse,
    UpdateAttributesRequest, UpdateStylesRequest, UploadRequest,
};
use foundation::{LatLng, Viewpoint};
use layers::{LayerId, OverlayLayer, StyleRecord, TileSource};
use prefs::{InMemoryPreferenceStore, PrefKey, PreferenceStore};
use serde_json::json;

use crate::map::{MapError, MapWidget};

pub fn layer(id: &str, name: &str) -> OverlayLayer {
    OverlayLayer {
        layer_id: LayerId::new(id),
        layer_name: name.to_string(),
        geojson_data: json!({"type": "FeatureCollection", "features": []}),
        styles: StyleRecord::upload_default(),
    }
}

pub fn store_with<const N: usize>(values: [(PrefKey, &str); N]) -> InMemoryPreferenceStore {
    let mut store = InMemoryPreferenceStore::new();
    for (key, value) in values {
        store.set(key, value).unwrap();
    }
    store
}

/// Records what is attached, keyed by handle.
#[derive(Debug, Default)]
pub struct FakeMap {
    pub center: Option<LatLng>,
    pub zoom: f64,
    pub set_view_calls: usize,
    pub tiles: BTreeMap<u32, &'static str>,
    pub overlays: BTreeMap<u32, (serde_json::Value, StyleRecord)>,
    pub markers: BTreeMap<u32, (LatLng, String)>,
    next_handle: u32,
}

impl FakeMap {
    fn handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    pub fn view(&self) -> Option<Viewpoint> {
        self.center
            .map(|c| Viewpoint::new(c.lat, c.lng, self.zoom as i32))
    }
}

impl MapWidget for FakeMap {
    type TileLayer = u32;
    type Overlay = u32;
    type Marker = u32;

    fn set_view(&mut self, view: Viewpoint) {
        self.center = Some(view.center);
        self.zoom = view.zoom as f64;
        self.set_view_calls += 1;
    }

    fn pan_to(&mut self, center: LatLng) {
        self.center = Some(center);
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn zoom_by(&mut self, delta: f64) {
        self.zoom += delta;
    }

    fn add_tile_layer(&mut self, source: &TileSource) -> u32 {
        let h = self.handle();
        self.tiles.insert(h, source.url_template);
        h
    }

    fn remove_tile_layer(&mut self, layer: &u32) {
        self.tiles.remove(layer);
    }

    fn add_overlay(
        &mut self,
        geojson: &serde_json::Value,
        style: &StyleRecord,
    ) -> Result<u32, MapError> {
        if !geojson.is_object() {
            return Err(MapError("Invalid GeoJSON object.".to_string()));
        }
        let h = self.handle();
        self.overlays.insert(h, (geojson.clone(), style.clone()));
        Ok(h)
    }

    fn remove_overlay(&mut self, overlay: &u32) {
        self.overlays.remove(overlay);
    }

    fn set_overlay_style(&mut self, overlay: &u32, style: &StyleRecord) {
        if let Some(entry) = self.overlays.get_mut(overlay) {
            entry.1 = style.clone();
        }
    }

    fn place_marker(&mut self, at: LatLng, popup: &str) -> u32 {
        let h = self.handle();
        self.markers.insert(h, (at, popup.to_string()));
        h
    }

    fn move_marker(&mut self, marker: &u32, at: LatLng, popup: &str) {
        self.markers.insert(*marker, (at, popup.to_string()));
    }
}

/// Behaves like the layer service, in memory. Uploaded "files" are the
/// GeoJSON documents themselves.
#[derive(Debug, Default)]
pub struct FakeBackend {
    pub layers: RefCell<Vec<LayerRecord>>,
    pub location: RefCell<Option<DeviceLocation>>,
    pub offline: Cell<bool>,
    /// When set, `update_styles` answers with this message instead of the usual one.
    pub style_reply: RefCell<Option<String>>,
    pub requests: RefCell<Vec<String>>,
    next_id: Cell<u32>,
}

impl FakeBackend {
    pub fn with_layers(layers: Vec<LayerRecord>) -> Self {
        let b = Self::default();
        *b.layers.borrow_mut() = layers;
        b
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    fn record(&self, line: impl Into<String>) -> Result<(), ApiError> {
        self.requests.borrow_mut().push(line.into());
        if self.offline.get() {
            return Err(ApiError::Transport("connection refused".to_string()));
        }
        Ok(())
    }

    fn not_found() -> ApiError {
        ApiError::Status {
            status: 404,
            message: "Layer not found".to_string(),
        }
    }
}

impl BackendClient for FakeBackend {
    type File = serde_json::Value;

    async fn list_layers(&self) -> Result<Vec<LayerRecord>, ApiError> {
        self.record("GET /layers")?;
        Ok(self.layers.borrow().clone())
    }

    async fn get_layer(&self, id: &LayerId) -> Result<LayerDetail, ApiError> {
        self.record(format!("GET /layers/{id}"))?;
        self.layers
            .borrow()
            .iter()
            .find(|l| &l.layer_id == id)
            .map(|l| LayerDetail {
                layer_id: l.layer_id.clone(),
                layer_name: l.layer_name.clone(),
                geojson_data: l.geojson_data.clone(),
            })
            .ok_or_else(Self::not_found)
    }

    async fn upload_geojson(
        &self,
        request: UploadRequest<serde_json::Value>,
    ) -> Result<MessageResponse, ApiError> {
        self.record("POST /upload_geojson")?;
        let styles: StyleRecord = serde_json::from_str(&request.styles_json()?)?;
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        let layer_id = LayerId::new(format!("uploaded-{n}"));
        self.layers.borrow_mut().push(OverlayLayer {
            layer_id: layer_id.clone(),
            layer_name: request.layer_name,
            geojson_data: request.file,
            styles,
        });
        Ok(MessageResponse {
            message: Some("Layer uploaded successfully".to_string()),
            error: None,
            layer_id: Some(layer_id),
        })
    }

    async fn update_styles(
        &self,
        request: &UpdateStylesRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.record("PUT /update_styles")?;
        let mut layers = self.layers.borrow_mut();
        let layer = layers
            .iter_mut()
            .find(|l| l.layer_id == request.layer_id)
            .ok_or_else(Self::not_found)?;
        layer.styles = request.styles.clone();
        let message = self
            .style_reply
            .borrow()
            .clone()
            .unwrap_or_else(|| "Styles updated successfully".to_string());
        Ok(MessageResponse {
            message: Some(message),
            ..MessageResponse::default()
        })
    }

    async fn update_attributes(
        &self,
        id: &LayerId,
        request: &UpdateAttributesRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.record(format!("PUT /layers/{id}/update_attributes"))?;
        let mut layers = self.layers.borrow_mut();
        let layer = layers
            .iter_mut()
            .find(|l| &l.layer_id == id)
            .ok_or_else(Self::not_found)?;
        if let Some(features) = layer
            .geojson_data
            .get_mut("features")
            .and_then(|f| f.as_array_mut())
        {
            for feature in features {
                feature["properties"] = request.updated_attributes.clone();
            }
        }
        Ok(MessageResponse {
            message: Some("Layer attributes updated successfully".to_string()),
            ..MessageResponse::default()
        })
    }

    async fn latest_location(&self) -> Result<DeviceLocation, ApiError> {
        self.record("GET /api/location")?;
        self.location.borrow().clone().ok_or(ApiError::Status {
            status: 404,
            message: "No location data available".to_string(),
        })
    }
}

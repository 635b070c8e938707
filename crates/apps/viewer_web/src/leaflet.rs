//! Leaflet bindings and the `MapWidget` implementation over them.
//!
//! Only the handful of `L.*` calls the viewer needs are bound. Option and
//! style objects are plain JS objects.

use foundation::{LatLng, Viewpoint};
use js_sys::{Array, Function, Object, Reflect};
use layers::{StyleRecord, TileSource};
use serde::Serialize;
use tracing::warn;
use viewer::{MapError, MapWidget};
use wasm_bindgen::prelude::*;

use crate::js_error_text;

#[wasm_bindgen]
extern "C" {
    /// `L.Map`
    #[derive(Debug, Clone)]
    pub type Map;

    #[wasm_bindgen(catch, js_namespace = L, js_name = map)]
    fn create_map(element_id: &str, options: &JsValue) -> Result<Map, JsValue>;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &Map, center: &JsValue, zoom: f64);

    #[wasm_bindgen(method, js_name = panTo)]
    fn pan_to(this: &Map, center: &JsValue);

    #[wasm_bindgen(method, js_name = getZoom)]
    fn get_zoom(this: &Map) -> f64;

    #[wasm_bindgen(method, js_name = zoomIn)]
    fn zoom_in(this: &Map, delta: f64);

    #[wasm_bindgen(method, js_name = zoomOut)]
    fn zoom_out(this: &Map, delta: f64);

    #[wasm_bindgen(method, js_name = removeLayer)]
    fn remove_layer(this: &Map, layer: &Layer);

    #[wasm_bindgen(method)]
    fn on(this: &Map, event: &str, handler: &Function);

    /// Any `L.Layer`: tile layers, GeoJSON groups and markers.
    #[derive(Debug, Clone)]
    pub type Layer;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Layer, map: &Map);

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn tile_layer(url_template: &str, options: &JsValue) -> Layer;

    #[wasm_bindgen(catch, js_namespace = L, js_name = geoJSON)]
    fn geo_json(data: &JsValue, options: &JsValue) -> Result<Layer, JsValue>;

    #[wasm_bindgen(method, js_name = setStyle)]
    fn set_style(this: &Layer, style: &JsValue);

    #[wasm_bindgen(js_namespace = L)]
    fn marker(at: &JsValue) -> Layer;

    #[wasm_bindgen(method, js_name = bindPopup)]
    fn bind_popup(this: &Layer, content: &str);

    #[wasm_bindgen(method, js_name = setPopupContent)]
    fn set_popup_content(this: &Layer, content: &str);

    #[wasm_bindgen(method, js_name = setLatLng)]
    fn set_lat_lng(this: &Layer, at: &JsValue);
}

fn lat_lng(at: LatLng) -> JsValue {
    Array::of2(&JsValue::from_f64(at.lat), &JsValue::from_f64(at.lng)).into()
}

fn set(target: &Object, key: &str, value: &JsValue) {
    let _ = Reflect::set(target, &JsValue::from_str(key), value);
}

/// Converts through JSON text; GeoJSON documents and style records are
/// plain data.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, MapError> {
    let text = serde_json::to_string(value).map_err(|e| MapError(e.to_string()))?;
    js_sys::JSON::parse(&text).map_err(|e| MapError(js_error_text(&e)))
}

fn tile_options(source: &TileSource) -> Object {
    let o = Object::new();
    set(&o, "attribution", &JsValue::from_str(source.attribution));
    set(&o, "maxZoom", &JsValue::from_f64(f64::from(source.max_zoom)));
    if let Some(min) = source.min_zoom {
        set(&o, "minZoom", &JsValue::from_f64(f64::from(min)));
    }
    if !source.subdomains.is_empty() {
        let subdomains: Array = source
            .subdomains
            .iter()
            .map(|s| JsValue::from_str(s))
            .collect();
        set(&o, "subdomains", &subdomains);
    }
    if let Some(ext) = source.ext {
        set(&o, "ext", &JsValue::from_str(ext));
    }
    o
}

/// Reads `e.latlng` from a Leaflet mouse event.
pub fn event_lat_lng(event: &JsValue) -> Option<LatLng> {
    let at = Reflect::get(event, &JsValue::from_str("latlng")).ok()?;
    let lat = Reflect::get(&at, &JsValue::from_str("lat")).ok()?.as_f64()?;
    let lng = Reflect::get(&at, &JsValue::from_str("lng")).ok()?.as_f64()?;
    Some(LatLng::new(lat, lng))
}

#[derive(Debug, Clone)]
pub struct LeafletMap {
    map: Map,
}

impl LeafletMap {
    /// Creates the map in `element_id` with the built-in zoom control
    /// disabled; the page supplies its own buttons.
    pub fn mount(element_id: &str) -> Result<Self, JsValue> {
        let options = Object::new();
        set(&options, "zoomControl", &JsValue::FALSE);
        set(&options, "scrollWheelZoom", &JsValue::TRUE);
        set(&options, "dragging", &JsValue::TRUE);
        let map = create_map(element_id, &options)?;
        Ok(Self { map })
    }

    /// Subscribes `handler` to a map event such as `zoomend` or `mousemove`.
    pub fn on(&self, event: &str, handler: &Closure<dyn FnMut(JsValue)>) {
        self.map.on(event, handler.as_ref().unchecked_ref());
    }
}

impl MapWidget for LeafletMap {
    type TileLayer = Layer;
    type Overlay = Layer;
    type Marker = Layer;

    fn set_view(&mut self, view: Viewpoint) {
        self.map.set_view(&lat_lng(view.center), f64::from(view.zoom));
    }

    fn pan_to(&mut self, center: LatLng) {
        self.map.pan_to(&lat_lng(center));
    }

    fn zoom(&self) -> f64 {
        self.map.get_zoom()
    }

    fn zoom_by(&mut self, delta: f64) {
        if delta >= 0.0 {
            self.map.zoom_in(delta);
        } else {
            self.map.zoom_out(-delta);
        }
    }

    fn add_tile_layer(&mut self, source: &TileSource) -> Layer {
        let layer = tile_layer(source.url_template, &tile_options(source));
        layer.add_to(&self.map);
        layer
    }

    fn remove_tile_layer(&mut self, layer: &Layer) {
        self.map.remove_layer(layer);
    }

    fn add_overlay(
        &mut self,
        geojson: &serde_json::Value,
        style: &StyleRecord,
    ) -> Result<Layer, MapError> {
        let data = to_js(geojson)?;
        let options = Object::new();
        set(&options, "style", &to_js(style)?);
        let layer = geo_json(&data, &options).map_err(|e| MapError(js_error_text(&e)))?;
        layer.add_to(&self.map);
        Ok(layer)
    }

    fn remove_overlay(&mut self, overlay: &Layer) {
        self.map.remove_layer(overlay);
    }

    fn set_overlay_style(&mut self, overlay: &Layer, style: &StyleRecord) {
        match to_js(style) {
            Ok(style) => overlay.set_style(&style),
            Err(err) => warn!(%err, "style not applied"),
        }
    }

    fn place_marker(&mut self, at: LatLng, popup: &str) -> Layer {
        let m = marker(&lat_lng(at));
        m.bind_popup(popup);
        m.add_to(&self.map);
        m
    }

    fn move_marker(&mut self, marker: &Layer, at: LatLng, popup: &str) {
        marker.set_lat_lng(&lat_lng(at));
        marker.set_popup_content(popup);
    }
}

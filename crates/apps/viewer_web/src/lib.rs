//! Browser entry point: mounts Leaflet, binds the page and runs the viewer
//! flows on the event loop.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use console_error_panic_hook::set_once;
use js_sys::Reflect;
use layers::{BaseLayerKind, LayerId};
use prefs::BrowserPreferenceStore;
use tracing::{error, info};
use viewer::{Modal, Panel, Viewer, ViewerConfig, ViewerEvent, flows};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

pub mod dom;
mod http;
mod leaflet;
mod logging;

use dom::{Dom, ids};
use http::GlooBackendClient;
use leaflet::LeafletMap;

type MapViewer = Viewer<LeafletMap, BrowserPreferenceStore>;

struct App {
    viewer: RefCell<MapViewer>,
    client: GlooBackendClient,
    dom: Dom,
}

thread_local! {
    static APP: RefCell<Option<Rc<App>>> = const { RefCell::new(None) };
}

fn app() -> Option<Rc<App>> {
    APP.with(|slot| slot.borrow().clone())
}

fn not_started() -> JsValue {
    JsValue::from_str("viewer not started")
}

pub(crate) fn js_error_text(e: &JsValue) -> String {
    if let Some(s) = e.as_string() {
        return s;
    }
    Reflect::get(e, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{e:?}"))
}

/// Pushes pending viewer events to the page. The viewer is released before
/// any DOM work: alerts and Leaflet callbacks can re-enter.
fn flush(app: &App) {
    let (events, entries) = {
        let mut v = app.viewer.borrow_mut();
        let events = v.drain_events();
        let entries = if events.contains(&ViewerEvent::LayerListChanged) {
            v.overlays().list_entries()
        } else {
            Vec::new()
        };
        (events, entries)
    };
    for event in &events {
        if let Err(e) = app.dom.apply(event, &entries) {
            error!(error = %js_error_text(&e), ?event, "page update failed");
        }
    }
}

/// Runs a synchronous action against the viewer, then flushes.
fn with_viewer(action: impl FnOnce(&mut MapViewer) + 'static) {
    let Some(app) = app() else {
        return;
    };
    let Ok(mut viewer) = app.viewer.try_borrow_mut() else {
        // Leaflet fires zoomend from inside setView, while the viewer is busy.
        spawn_local(async move { with_viewer(action) });
        return;
    };
    action(&mut viewer);
    drop(viewer);
    flush(&app);
}

fn read_dom<T>(read: impl FnOnce(&Dom) -> T) -> Option<T> {
    app().map(|app| read(&app.dom))
}

/// Spawns an async flow and flushes once it settles. Failures were already
/// turned into notices by the viewer.
fn spawn_flow<F, Fut>(flow: F) -> Result<(), JsValue>
where
    F: FnOnce(Rc<App>) -> Fut,
    Fut: Future<Output = ()> + 'static,
{
    let app = app().ok_or_else(not_started)?;
    let work = flow(app.clone());
    spawn_local(async move {
        work.await;
        flush(&app);
    });
    Ok(())
}

fn log_dom_error(result: Result<(), JsValue>) {
    if let Err(e) = result {
        error!(error = %js_error_text(&e), "page update failed");
    }
}

fn bind(dom: &Dom, map: &LeafletMap) -> Result<(), JsValue> {
    for kind in BaseLayerKind::ALL {
        dom::on_click(&dom.element(dom::base_layer_button(kind))?, move |_| {
            with_viewer(move |v| v.switch_base_layer(kind));
        })?;
    }

    dom::on_click(&dom.element(ids::SET_VIEW_BUTTON)?, |_| {
        if let Some(input) = read_dom(Dom::view_input) {
            with_viewer(move |v| {
                let _ = v.set_view(&input);
            });
        }
    })?;
    dom::on_click(&dom.element(ids::ZOOM_IN)?, |_| with_viewer(|v| v.zoom_in()))?;
    dom::on_click(&dom.element(ids::ZOOM_OUT)?, |_| with_viewer(|v| v.zoom_out()))?;
    dom::on_click(&dom.element(ids::HOME)?, |_| {
        with_viewer(|v| {
            v.reset_to_default();
        });
    })?;

    dom::on_click(&dom.element(ids::LAYERS_LIST)?, |e| {
        if let Some(id) = dom::layer_id_from_event(&e) {
            with_viewer(move |v| {
                let _ = v.select_layer(&id);
            });
        }
    })?;

    dom::on_click(&dom.element(ids::UPLOAD_BUTTON)?, |_| {
        read_dom(Dom::open_file_picker);
    })?;
    dom::listen(&dom.element(ids::FILE_INPUT)?, "change", |_| {
        let Some(file) = read_dom(Dom::selected_file).flatten() else {
            return;
        };
        let name = file.name();
        log_dom_error(spawn_flow(move |app| async move {
            let _ = flows::upload_file(&app.viewer, &app.client, file, &name).await;
        }));
    })?;

    dom::on_click(&dom.element(ids::SAVE_STYLES_BUTTON)?, |_| {
        let Some(form) = read_dom(Dom::style_form) else {
            return;
        };
        log_dom_error(spawn_flow(move |app| async move {
            let _ = flows::save_styles(&app.viewer, &app.client, &form).await;
        }));
    })?;

    for panel in Panel::ALL {
        dom::on_click(&dom.element(panel.trigger_id())?, move |_| {
            if let Some(result) = read_dom(|d| d.toggle_panel(panel)) {
                log_dom_error(result);
            }
        })?;
    }
    for modal in Modal::ALL {
        let Some(trigger) = modal.trigger_id() else {
            continue;
        };
        dom::on_click(&dom.element(trigger)?, move |_| {
            if let Some(result) = read_dom(|d| d.show_modal(modal)) {
                log_dom_error(result);
            }
        })?;
    }

    if let Some(button) = dom.optional(ids::LOCATE_DEVICE) {
        dom::on_click(&button, |_| log_dom_error(locate_device()))?;
    }

    let zoom_end =
        Closure::<dyn FnMut(JsValue)>::new(|_: JsValue| with_viewer(|v| v.on_zoom_end()));
    map.on("zoomend", &zoom_end);
    zoom_end.forget();

    let mouse_move = Closure::<dyn FnMut(JsValue)>::new(|e: JsValue| {
        if let Some(at) = leaflet::event_lat_lng(&e) {
            with_viewer(move |v| v.on_pointer_move(at));
        }
    });
    map.on("mousemove", &mouse_move);
    mouse_move.forget();

    Ok(())
}

fn mount(config: ViewerConfig) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    dom::required(&document, &config.map_element_id)?;
    let dom = Dom::resolve(&document)?;

    let map = LeafletMap::mount(&config.map_element_id)?;
    bind(&dom, &map)?;

    let client = GlooBackendClient::new(config.endpoints());
    let load_on_start = config.load_layers_on_start;
    let backend = config.backend_base_url.clone();
    let viewer = Viewer::new(config, map, BrowserPreferenceStore::open());
    let persistent = viewer.preferences().store().is_persistent();
    let basemap = viewer.active_base_layer().storage_name();

    let app = Rc::new(App {
        viewer: RefCell::new(viewer),
        client,
        dom,
    });
    APP.with(|slot| *slot.borrow_mut() = Some(app.clone()));
    flush(&app);
    info!(backend = %backend, persistent, basemap, "viewer started");

    if load_on_start {
        spawn_flow(|app| async move {
            let _ = flows::load_layers(&app.viewer, &app.client).await;
        })?;
    }
    Ok(())
}

fn launch(config: ViewerConfig) -> Result<(), JsValue> {
    if app().is_some() {
        return Err(JsValue::from_str("viewer already started"));
    }
    logging::init(&config.log_filter);
    let started = mount(config);
    if let Err(e) = &started {
        error!(error = %js_error_text(e), "viewer failed to start");
    }
    started
}

/// Reads `window.__mapViewerConfig`, either an object or a JSON string.
fn page_config() -> Result<ViewerConfig, JsValue> {
    let Some(window) = web_sys::window() else {
        return Ok(ViewerConfig::default());
    };
    let raw = Reflect::get(&window, &JsValue::from_str("__mapViewerConfig"))
        .unwrap_or(JsValue::UNDEFINED);
    if raw.is_undefined() || raw.is_null() {
        return Ok(ViewerConfig::default());
    }
    let json = match raw.as_string() {
        Some(s) => s,
        None => String::from(js_sys::JSON::stringify(&raw)?),
    };
    parse_config(&json)
}

fn parse_config(json: &str) -> Result<ViewerConfig, JsValue> {
    ViewerConfig::from_json(json)
        .map_err(|e| JsValue::from_str(&format!("invalid viewer config: {e}")))
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Starts the viewer with the page's configuration, if any.
#[wasm_bindgen]
pub fn start_viewer() -> Result<(), JsValue> {
    launch(page_config()?)
}

#[wasm_bindgen]
pub fn start_viewer_with_config(config_json: &str) -> Result<(), JsValue> {
    launch(parse_config(config_json)?)
}

#[wasm_bindgen]
pub fn reload_layers() -> Result<(), JsValue> {
    spawn_flow(|app| async move {
        let _ = flows::load_layers(&app.viewer, &app.client).await;
    })
}

/// Shows the tracked device's last reported position.
#[wasm_bindgen]
pub fn locate_device() -> Result<(), JsValue> {
    spawn_flow(|app| async move {
        let _ = flows::locate_device(&app.viewer, &app.client).await;
    })
}

/// Replaces the feature properties of `layer_id` with the given JSON object
/// and redraws the layer.
#[wasm_bindgen]
pub fn update_layer_attributes(layer_id: &str, attributes_json: &str) -> Result<(), JsValue> {
    let attributes: serde_json::Value = serde_json::from_str(attributes_json)
        .map_err(|e| JsValue::from_str(&format!("invalid attributes: {e}")))?;
    let id = LayerId::new(layer_id);
    spawn_flow(move |app| async move {
        let _ = flows::update_attributes(&app.viewer, &app.client, &id, attributes).await;
    })
}

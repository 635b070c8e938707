//! Page elements the viewer binds to, and how viewer events land on them.

use foundation::zoom_readout;
use layers::{BaseLayerKind, LayerId, StyleRecord};
use viewer::overlays::LayerListEntry;
use viewer::panels::PANEL_HIDDEN_CLASS;
use viewer::{Modal, Notice, Panel, StyleForm, ViewInput, ViewerEvent};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, File, HtmlInputElement};

/// Every element id the viewer touches, besides the panel and modal ids
/// declared in `viewer::panels`.
pub mod ids {
    pub const SWITCH_TO_WATERCOLOR: &str = "switch-to-watercolor";
    pub const SWITCH_TO_SATELLITE: &str = "switch-to-google";
    pub const SWITCH_TO_TOPOGRAPHIC: &str = "switch-to-TopPlus";

    pub const LAT_INPUT: &str = "latInput";
    pub const LNG_INPUT: &str = "lngInput";
    pub const ZOOM_INPUT: &str = "zoomInput";
    pub const SET_VIEW_BUTTON: &str = "setViewBtn";

    pub const ZOOM_IN: &str = "zoom-in";
    pub const ZOOM_OUT: &str = "zoom-out";
    pub const HOME: &str = "home";
    pub const ZOOM_LEVEL: &str = "zoom-level";
    pub const MOUSE_POSITION: &str = "mouse-position";

    pub const LAYERS_LIST: &str = "layersList";
    pub const UPLOAD_BUTTON: &str = "uploadBtn";
    pub const FILE_INPUT: &str = "geojsonFile";

    pub const FILL_COLOR: &str = "fillColor";
    pub const STROKE_COLOR: &str = "strokeColor";
    pub const WEIGHT: &str = "weight";
    pub const SAVE_STYLES_BUTTON: &str = "saveStylesBtn";

    /// Optional.
    pub const LOCATE_DEVICE: &str = "locate-device";

    /// Attribute carrying the layer id on each list item.
    pub const LAYER_ID_ATTR: &str = "data-layer-id";

    pub const REQUIRED: [&str; 19] = [
        SWITCH_TO_WATERCOLOR,
        SWITCH_TO_SATELLITE,
        SWITCH_TO_TOPOGRAPHIC,
        LAT_INPUT,
        LNG_INPUT,
        ZOOM_INPUT,
        SET_VIEW_BUTTON,
        ZOOM_IN,
        ZOOM_OUT,
        HOME,
        ZOOM_LEVEL,
        MOUSE_POSITION,
        LAYERS_LIST,
        UPLOAD_BUTTON,
        FILE_INPUT,
        FILL_COLOR,
        STROKE_COLOR,
        WEIGHT,
        SAVE_STYLES_BUTTON,
    ];
}

/// Button id for each base layer.
pub fn base_layer_button(kind: BaseLayerKind) -> &'static str {
    match kind {
        BaseLayerKind::Watercolor => ids::SWITCH_TO_WATERCOLOR,
        BaseLayerKind::SatelliteHybrid => ids::SWITCH_TO_SATELLITE,
        BaseLayerKind::Topographic => ids::SWITCH_TO_TOPOGRAPHIC,
    }
}

/// All ids that must exist before the viewer starts.
pub fn required_ids() -> Vec<&'static str> {
    let mut out: Vec<&'static str> = ids::REQUIRED.to_vec();
    for panel in Panel::ALL {
        out.push(panel.trigger_id());
        out.push(panel.element_id());
    }
    for modal in Modal::ALL {
        if let Some(trigger) = modal.trigger_id() {
            out.push(trigger);
        }
        if !out.contains(&modal.element_id()) {
            out.push(modal.element_id());
        }
    }
    out
}

pub fn missing(id: &str) -> JsValue {
    JsValue::from_str(&format!("missing DOM element #{id}"))
}

pub fn required(document: &Document, id: &str) -> Result<Element, JsValue> {
    document.get_element_by_id(id).ok_or_else(|| missing(id))
}

fn input(document: &Document, id: &str) -> Result<HtmlInputElement, JsValue> {
    required(document, id)?
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| JsValue::from_str(&format!("#{id} is not an <input>")))
}

#[wasm_bindgen]
extern "C" {
    /// `bootstrap.Modal`
    type BootstrapModal;

    #[wasm_bindgen(catch, js_namespace = ["bootstrap", "Modal"], js_name = getOrCreateInstance)]
    fn modal_instance(element: &Element) -> Result<BootstrapModal, JsValue>;

    #[wasm_bindgen(method)]
    fn show(this: &BootstrapModal);

    #[wasm_bindgen(method)]
    fn hide(this: &BootstrapModal);
}

/// Adds a click listener that lives as long as the page.
pub fn on_click(element: &Element, handler: impl FnMut(Event) + 'static) -> Result<(), JsValue> {
    listen(element, "click", handler)
}

pub fn listen(
    element: &Element,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let cb = Closure::<dyn FnMut(Event)>::new(handler);
    element.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

/// Layer id of the list item an event bubbled up from.
pub fn layer_id_from_event(event: &Event) -> Option<LayerId> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let item = target
        .closest(&format!("[{}]", ids::LAYER_ID_ATTR))
        .ok()
        .flatten()?;
    item.get_attribute(ids::LAYER_ID_ATTR).map(LayerId::new)
}

/// Resolved handles of the elements read or written after startup.
#[derive(Debug, Clone)]
pub struct Dom {
    document: Document,
    lat: HtmlInputElement,
    lng: HtmlInputElement,
    zoom: HtmlInputElement,
    fill_color: HtmlInputElement,
    stroke_color: HtmlInputElement,
    weight: HtmlInputElement,
    file_input: HtmlInputElement,
    zoom_level: Element,
    mouse_position: Element,
    layers_list: Element,
}

impl Dom {
    /// Fails on the first required id missing from `document`.
    pub fn resolve(document: &Document) -> Result<Self, JsValue> {
        for id in required_ids() {
            required(document, id)?;
        }
        Ok(Self {
            document: document.clone(),
            lat: input(document, ids::LAT_INPUT)?,
            lng: input(document, ids::LNG_INPUT)?,
            zoom: input(document, ids::ZOOM_INPUT)?,
            fill_color: input(document, ids::FILL_COLOR)?,
            stroke_color: input(document, ids::STROKE_COLOR)?,
            weight: input(document, ids::WEIGHT)?,
            file_input: input(document, ids::FILE_INPUT)?,
            zoom_level: required(document, ids::ZOOM_LEVEL)?,
            mouse_position: required(document, ids::MOUSE_POSITION)?,
            layers_list: required(document, ids::LAYERS_LIST)?,
        })
    }

    pub fn element(&self, id: &str) -> Result<Element, JsValue> {
        required(&self.document, id)
    }

    pub fn optional(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    pub fn view_input(&self) -> ViewInput {
        ViewInput::new(self.lat.value(), self.lng.value(), self.zoom.value())
    }

    pub fn style_form(&self) -> StyleForm {
        StyleForm::new(
            self.fill_color.value(),
            self.stroke_color.value(),
            self.weight.value(),
        )
    }

    fn prefill_style(&self, style: &StyleRecord) {
        let form = StyleForm::from_style(style);
        self.fill_color.set_value(&form.fill_color);
        self.stroke_color.set_value(&form.stroke_color);
        self.weight.set_value(&form.weight);
    }

    pub fn open_file_picker(&self) {
        self.file_input.click();
    }

    /// The picked file, or `None` when the picker was cancelled.
    pub fn selected_file(&self) -> Option<File> {
        self.file_input.files()?.get(0)
    }

    pub fn toggle_panel(&self, panel: Panel) -> Result<(), JsValue> {
        self.element(panel.element_id())?
            .class_list()
            .toggle(PANEL_HIDDEN_CLASS)?;
        Ok(())
    }

    pub fn show_modal(&self, modal: Modal) -> Result<(), JsValue> {
        modal_instance(&self.element(modal.element_id())?)?.show();
        Ok(())
    }

    pub fn hide_modal(&self, modal: Modal) -> Result<(), JsValue> {
        modal_instance(&self.element(modal.element_id())?)?.hide();
        Ok(())
    }

    /// Rebuilds the side list: one `li` per overlay, in backend order.
    pub fn render_layer_list(&self, entries: &[LayerListEntry]) -> Result<(), JsValue> {
        self.layers_list.set_inner_html("");
        for entry in entries {
            let item = self.document.create_element("li")?;
            item.set_class_name("list-group-item");
            item.set_attribute(ids::LAYER_ID_ATTR, entry.layer_id.as_str())?;
            item.set_text_content(Some(&entry.label));
            self.layers_list.append_child(&item)?;
        }
        Ok(())
    }

    /// Applies one viewer event. `entries` is the current list, read once per
    /// batch.
    pub fn apply(&self, event: &ViewerEvent, entries: &[LayerListEntry]) -> Result<(), JsValue> {
        match event {
            ViewerEvent::Notice(notice) => alert(notice)?,
            ViewerEvent::ZoomChanged(zoom) => {
                self.zoom_level.set_text_content(Some(&zoom_readout(*zoom)));
            }
            ViewerEvent::CursorMoved(at) => {
                self.mouse_position.set_text_content(Some(&at.readout()));
            }
            ViewerEvent::BaseLayerChanged(_) => {}
            ViewerEvent::LayerListChanged => self.render_layer_list(entries)?,
            ViewerEvent::StyleFormPrefill(style) => self.prefill_style(style),
            ViewerEvent::ModalOpened(modal) => self.show_modal(*modal)?,
            ViewerEvent::ModalClosed(modal) => self.hide_modal(*modal)?,
        }
        Ok(())
    }
}

/// Notices block, the way the page always reported them.
fn alert(notice: &Notice) -> Result<(), JsValue> {
    match web_sys::window() {
        Some(window) => window.alert_with_message(&notice.message),
        None => Ok(()),
    }
}

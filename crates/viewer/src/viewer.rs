use api::{
    ApiError, DeviceLocation, LayerDetail, LayerRecord, MessageResponse, UpdateStylesRequest,
    UploadRequest,
};
use foundation::{LatLng, Viewpoint};
use layers::{BaseLayerKind, LayerId};
use prefs::PreferenceStore;
use tracing::{error, info, warn};

use crate::basemap::BaseLayerRegistry;
use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::events::{EventBus, Notice, ViewerEvent};
use crate::location::DeviceTracker;
use crate::map::MapWidget;
use crate::overlays::{OverlayManager, SyncReport};
use crate::preferences::ViewPreferences;
use crate::style_editor::{StyleEditor, StyleForm};
use crate::upload::UploadFlow;
use crate::viewport::{ViewInput, ViewportController};

/// All client state of one map page.
///
/// Each method handles one user action or one backend response. Failures are
/// reported as error notices on the event bus and also returned.
pub struct Viewer<M: MapWidget, S: PreferenceStore> {
    map: M,
    prefs: ViewPreferences<S>,
    viewport: ViewportController,
    basemaps: BaseLayerRegistry<M::TileLayer>,
    overlays: OverlayManager<M::Overlay>,
    styles: StyleEditor,
    upload: UploadFlow,
    device: DeviceTracker<M::Marker>,
    events: EventBus,
}

impl<M: MapWidget, S: PreferenceStore> Viewer<M, S> {
    /// Restores the saved view and base layer onto `map`.
    pub fn new(config: ViewerConfig, mut map: M, store: S) -> Self {
        let mut prefs = ViewPreferences::new(store);
        if let Err(err) = prefs.prune_invalid() {
            warn!(%err, "could not prune stored preferences");
        }
        let viewport = ViewportController::new(config.zoom_step);
        let view = viewport.reset_to_default(&mut map, &prefs);

        let mut basemaps = BaseLayerRegistry::new();
        basemaps.activate(&mut map, prefs.base_layer());
        info!(
            lat = view.lat(),
            lng = view.lng(),
            zoom = view.zoom,
            basemap = basemaps.active().storage_name(),
            "viewer initialized"
        );

        let mut events = EventBus::new();
        viewport.publish_zoom(&map, &mut events);

        Self {
            map,
            prefs,
            viewport,
            basemaps,
            overlays: OverlayManager::new(),
            styles: StyleEditor::new(),
            upload: UploadFlow::new(),
            device: DeviceTracker::new(),
            events,
        }
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn preferences(&self) -> &ViewPreferences<S> {
        &self.prefs
    }

    pub fn overlays(&self) -> &OverlayManager<M::Overlay> {
        &self.overlays
    }

    pub fn style_editor(&self) -> &StyleEditor {
        &self.styles
    }

    pub fn active_base_layer(&self) -> BaseLayerKind {
        self.basemaps.active()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<ViewerEvent> {
        self.events.drain()
    }

    pub fn set_view(&mut self, input: &ViewInput) -> Result<Viewpoint, ViewerError> {
        let result = self
            .viewport
            .set_view(&mut self.map, &mut self.prefs, &mut self.events, input);
        result.map_err(|e| self.report(e))
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in(&mut self.map);
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out(&mut self.map);
    }

    pub fn reset_to_default(&mut self) -> Viewpoint {
        self.viewport.reset_to_default(&mut self.map, &self.prefs)
    }

    /// The map finished a zoom animation.
    pub fn on_zoom_end(&mut self) {
        self.viewport.publish_zoom(&self.map, &mut self.events);
    }

    pub fn on_pointer_move(&mut self, at: LatLng) {
        self.viewport.publish_cursor(at, &mut self.events);
    }

    pub fn switch_base_layer(&mut self, kind: BaseLayerKind) {
        self.basemaps
            .switch_to(&mut self.map, &mut self.prefs, &mut self.events, kind);
    }

    pub fn select_layer(&mut self, id: &LayerId) -> Result<(), ViewerError> {
        let result = self.styles.select(&self.overlays, &mut self.events, id);
        result.map_err(|e| self.report(e))
    }

    /// Reconciles the overlay set with a `GET /layers` response.
    pub fn apply_layers(
        &mut self,
        response: Result<Vec<LayerRecord>, ApiError>,
    ) -> Result<SyncReport, ViewerError> {
        let records = response.map_err(|e| self.report(e.into()))?;
        let report = self.overlays.sync(&mut self.map, records);
        self.styles.forget_missing(&self.overlays);
        self.events.emit(ViewerEvent::LayerListChanged);
        info!(
            total = self.overlays.len(),
            added = report.added,
            removed = report.removed,
            changed = report.changed(),
            "layers loaded"
        );
        Ok(report)
    }

    /// Applies a `GET /layers/{id}` response to the rendered overlay.
    pub fn apply_layer_detail(
        &mut self,
        response: Result<LayerDetail, ApiError>,
    ) -> Result<(), ViewerError> {
        let detail = response.map_err(|e| self.report(e.into()))?;
        let result = self.overlays.replace_detail(&mut self.map, detail);
        result.map_err(|e| self.report(e.into()))?;
        self.events.emit(ViewerEvent::LayerListChanged);
        Ok(())
    }

    /// Validates the style form against the current selection.
    pub fn begin_style_save(
        &mut self,
        form: &StyleForm,
    ) -> Result<UpdateStylesRequest, ViewerError> {
        let result = self.styles.prepare(&self.overlays, form);
        result.map_err(|e| self.report(e))
    }

    /// Any successful response restyles the overlay with what was sent.
    pub fn finish_style_save(
        &mut self,
        request: &UpdateStylesRequest,
        response: Result<MessageResponse, ApiError>,
    ) -> Result<(), ViewerError> {
        let ack = response.map_err(|e| self.report(e.into()))?;
        info!(layer_id = %request.layer_id, message = ack.text(), "styles saved");
        let result = self
            .styles
            .apply(&mut self.map, &mut self.overlays, &mut self.events, request);
        result.map_err(|e| self.report(e))
    }

    pub fn upload_request<F>(&self, file: F, file_name: &str) -> UploadRequest<F> {
        self.upload.request(file, file_name)
    }

    pub fn finish_upload(
        &mut self,
        response: Result<MessageResponse, ApiError>,
    ) -> Result<MessageResponse, ViewerError> {
        let ack = response.map_err(|e| self.report(e.into()))?;
        info!(message = ack.text(), layer_id = ?ack.layer_id, "upload accepted");
        Ok(ack)
    }

    pub fn finish_attribute_update(
        &mut self,
        id: &LayerId,
        response: Result<MessageResponse, ApiError>,
    ) -> Result<MessageResponse, ViewerError> {
        let ack = response.map_err(|e| self.report(e.into()))?;
        info!(layer_id = %id, message = ack.text(), "attributes updated");
        Ok(ack)
    }

    pub fn show_device_location(
        &mut self,
        response: Result<DeviceLocation, ApiError>,
    ) -> Result<(), ViewerError> {
        match response {
            Ok(location) => {
                self.device.show(&mut self.map, &location);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                self.events.notify(Notice::info("No location data available"));
                Err(e.into())
            }
            Err(e) => Err(self.report(e.into())),
        }
    }

    fn report(&mut self, err: ViewerError) -> ViewerError {
        error!(%err, "viewer action failed");
        self.events.notify(err.notice());
        err
    }
}

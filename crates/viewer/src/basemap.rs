use layers::BaseLayerKind;
use prefs::PreferenceStore;
use tracing::{error, info};

use crate::events::{EventBus, ViewerEvent};
use crate::map::MapWidget;
use crate::preferences::ViewPreferences;

/// Owns the single base-layer slot of the map.
///
/// Overlays are tracked elsewhere; switching only swaps this slot.
#[derive(Debug)]
pub struct BaseLayerRegistry<T> {
    active: BaseLayerKind,
    attached: Option<T>,
}

impl<T> Default for BaseLayerRegistry<T> {
    fn default() -> Self {
        Self {
            active: BaseLayerKind::default(),
            attached: None,
        }
    }
}

impl<T> BaseLayerRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> BaseLayerKind {
        self.active
    }

    /// Attaches `kind`, replacing whatever base layer is attached.
    pub fn activate<M: MapWidget<TileLayer = T>>(&mut self, map: &mut M, kind: BaseLayerKind) {
        if let Some(previous) = self.attached.take() {
            map.remove_tile_layer(&previous);
        }
        self.attached = Some(map.add_tile_layer(kind.source()));
        self.active = kind;
    }

    /// User-driven switch: attach, remember the choice, announce it.
    pub fn switch_to<M: MapWidget<TileLayer = T>, S: PreferenceStore>(
        &mut self,
        map: &mut M,
        prefs: &mut ViewPreferences<S>,
        bus: &mut EventBus,
        kind: BaseLayerKind,
    ) {
        self.activate(map, kind);
        if let Err(err) = prefs.save_base_layer(kind) {
            error!(%err, "failed to persist base layer selection");
        }
        info!(basemap = kind.storage_name(), "base layer switched");
        bus.emit(ViewerEvent::BaseLayerChanged(kind));
    }
}

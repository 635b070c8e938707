use api::UpdateStylesRequest;
use foundation::parse::parse_truncated_u32;
use layers::{LayerId, StyleRecord};

use crate::error::ViewerError;
use crate::events::{EventBus, ViewerEvent};
use crate::map::MapWidget;
use crate::overlays::OverlayManager;
use crate::panels::Modal;

/// The layer currently open for editing.
///
/// Only the id is held; the rendered overlay is looked up when needed, so a
/// reload that re-creates the overlay never leaves a stale handle behind.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StyleSession {
    selected: Option<LayerId>,
}

impl StyleSession {
    pub fn select(&mut self, id: LayerId) {
        self.selected = Some(id);
    }

    pub fn selected(&self) -> Option<&LayerId> {
        self.selected.as_ref()
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }
}

/// Raw values of the style form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleForm {
    pub fill_color: String,
    pub stroke_color: String,
    pub weight: String,
}

impl StyleForm {
    pub fn new(
        fill_color: impl Into<String>,
        stroke_color: impl Into<String>,
        weight: impl Into<String>,
    ) -> Self {
        Self {
            fill_color: fill_color.into(),
            stroke_color: stroke_color.into(),
            weight: weight.into(),
        }
    }

    pub fn from_style(style: &StyleRecord) -> Self {
        Self::new(
            style.fill_color.clone(),
            style.stroke_color.clone(),
            style.weight.to_string(),
        )
    }

    pub fn parse(&self) -> Result<StyleRecord, ViewerError> {
        let weight = parse_truncated_u32(&self.weight)
            .ok_or_else(|| ViewerError::InvalidWeight(self.weight.clone()))?;
        Ok(StyleRecord::new(
            self.fill_color.trim(),
            self.stroke_color.trim(),
            weight,
        ))
    }
}

#[derive(Debug, Default)]
pub struct StyleEditor {
    session: StyleSession,
}

impl StyleEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &StyleSession {
        &self.session
    }

    /// Opens `id` for editing: pre-fills the form and shows the dialog.
    pub fn select<O>(
        &mut self,
        overlays: &OverlayManager<O>,
        bus: &mut EventBus,
        id: &LayerId,
    ) -> Result<(), ViewerError> {
        let entry = overlays
            .get(id)
            .ok_or_else(|| ViewerError::UnknownLayer(id.clone()))?;
        self.session.select(id.clone());
        bus.emit(ViewerEvent::StyleFormPrefill(entry.layer.styles.clone()));
        bus.emit(ViewerEvent::ModalOpened(Modal::Style));
        Ok(())
    }

    /// Builds the update request. Nothing is sent without a selected layer.
    pub fn prepare<O>(
        &self,
        overlays: &OverlayManager<O>,
        form: &StyleForm,
    ) -> Result<UpdateStylesRequest, ViewerError> {
        let id = self.session.selected().ok_or(ViewerError::NoLayerSelected)?;
        if !overlays.contains(id) {
            return Err(ViewerError::UnknownLayer(id.clone()));
        }
        Ok(UpdateStylesRequest {
            layer_id: id.clone(),
            styles: form.parse()?,
        })
    }

    /// Applies a saved style to the live overlay and closes the dialog.
    pub fn apply<M: MapWidget>(
        &self,
        map: &mut M,
        overlays: &mut OverlayManager<M::Overlay>,
        bus: &mut EventBus,
        request: &UpdateStylesRequest,
    ) -> Result<(), ViewerError> {
        if !overlays.restyle(map, &request.layer_id, &request.styles) {
            return Err(ViewerError::UnknownLayer(request.layer_id.clone()));
        }
        bus.emit(ViewerEvent::ModalClosed(Modal::Style));
        Ok(())
    }

    /// Drops the selection if its layer is gone from `overlays`.
    pub fn forget_missing<O>(&mut self, overlays: &OverlayManager<O>) {
        if self
            .session
            .selected()
            .is_some_and(|id| !overlays.contains(id))
        {
            self.session.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeMap, layer};

    #[test]
    fn form_parses_integer_weight() {
        let s = StyleForm::new("#00ff00", "#0000ff", "3").parse().unwrap();
        assert_eq!(s, StyleRecord::new("#00ff00", "#0000ff", 3));
    }

    #[test]
    fn form_rejects_non_numeric_weight() {
        let err = StyleForm::new("#00ff00", "#0000ff", "thick").parse().unwrap_err();
        assert_eq!(err, ViewerError::InvalidWeight("thick".to_string()));
    }

    #[test]
    fn prepare_without_selection_fails() {
        let editor = StyleEditor::new();
        let overlays: OverlayManager<u32> = OverlayManager::new();
        let err = editor
            .prepare(&overlays, &StyleForm::new("#fff", "#000", "1"))
            .unwrap_err();
        assert_eq!(err, ViewerError::NoLayerSelected);
    }

    #[test]
    fn select_prefills_and_opens_dialog() {
        let mut map = FakeMap::default();
        let mut overlays = OverlayManager::new();
        overlays.sync(&mut map, vec![layer("a", "roads")]);
        let mut editor = StyleEditor::new();
        let mut bus = EventBus::new();

        editor.select(&overlays, &mut bus, &LayerId::new("a")).unwrap();

        assert_eq!(editor.session().selected(), Some(&LayerId::new("a")));
        assert_eq!(
            bus.events(),
            &[
                ViewerEvent::StyleFormPrefill(StyleRecord::upload_default()),
                ViewerEvent::ModalOpened(Modal::Style),
            ]
        );
    }

    #[test]
    fn selecting_another_layer_overwrites_session() {
        let mut map = FakeMap::default();
        let mut overlays = OverlayManager::new();
        overlays.sync(&mut map, vec![layer("a", "roads"), layer("b", "parcels")]);
        let mut editor = StyleEditor::new();
        let mut bus = EventBus::new();

        editor.select(&overlays, &mut bus, &LayerId::new("a")).unwrap();
        editor.select(&overlays, &mut bus, &LayerId::new("b")).unwrap();
        assert_eq!(editor.session().selected(), Some(&LayerId::new("b")));
    }

    #[test]
    fn selection_is_forgotten_when_layer_disappears() {
        let mut map = FakeMap::default();
        let mut overlays = OverlayManager::new();
        overlays.sync(&mut map, vec![layer("a", "roads")]);
        let mut editor = StyleEditor::new();
        editor
            .select(&overlays, &mut EventBus::new(), &LayerId::new("a"))
            .unwrap();

        overlays.sync(&mut map, Vec::new());
        editor.forget_missing(&overlays);
        assert_eq!(editor.session().selected(), None);
    }
}

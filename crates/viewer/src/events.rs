use foundation::LatLng;
use layers::{BaseLayerKind, StyleRecord};

use crate::panels::Modal;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Message shown to the user as a blocking notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Everything the viewer asks the page to show.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    Notice(Notice),
    ZoomChanged(f64),
    CursorMoved(LatLng),
    BaseLayerChanged(BaseLayerKind),
    /// The overlay list must be re-rendered from `OverlayManager::list_entries`.
    LayerListChanged,
    /// Values to pre-fill into the style form.
    StyleFormPrefill(StyleRecord),
    ModalOpened(Modal),
    ModalClosed(Modal),
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<ViewerEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: ViewerEvent) {
        self.events.push(event);
    }

    pub fn notify(&mut self, notice: Notice) {
        self.emit(ViewerEvent::Notice(notice));
    }

    pub fn events(&self) -> &[ViewerEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<ViewerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Notices emitted so far, oldest first.
    pub fn notices(&self) -> impl Iterator<Item = &Notice> + '_ {
        self.events.iter().filter_map(|e| match e {
            ViewerEvent::Notice(n) => Some(n),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_events_in_order() {
        let mut bus = EventBus::new();
        bus.emit(ViewerEvent::ZoomChanged(4.0));
        bus.notify(Notice::info("saved"));
        assert_eq!(bus.events().len(), 2);
        assert_eq!(bus.events()[0], ViewerEvent::ZoomChanged(4.0));
        assert_eq!(bus.notices().count(), 1);
    }

    #[test]
    fn drain_clears_events() {
        let mut bus = EventBus::new();
        bus.emit(ViewerEvent::LayerListChanged);
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.events().is_empty());
    }
}

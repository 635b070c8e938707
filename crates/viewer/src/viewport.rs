use foundation::parse::{parse_finite, parse_truncated_i32};
use foundation::{LatLng, Viewpoint};
use prefs::PreferenceStore;
use tracing::{error, info};

use crate::error::ViewerError;
use crate::events::{EventBus, Notice, ViewerEvent};
use crate::map::MapWidget;
use crate::preferences::ViewPreferences;

/// Raw contents of the latitude, longitude and zoom inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewInput {
    pub lat: String,
    pub lng: String,
    pub zoom: String,
}

impl ViewInput {
    pub fn new(lat: impl Into<String>, lng: impl Into<String>, zoom: impl Into<String>) -> Self {
        Self {
            lat: lat.into(),
            lng: lng.into(),
            zoom: zoom.into(),
        }
    }

    pub fn parse(&self) -> Result<Viewpoint, ViewerError> {
        let lat = parse_finite(&self.lat);
        let lng = parse_finite(&self.lng);
        let zoom = parse_truncated_i32(&self.zoom);
        match (lat, lng, zoom) {
            (Some(lat), Some(lng), Some(zoom)) => Ok(Viewpoint::new(lat, lng, zoom)),
            _ => Err(ViewerError::InvalidViewpoint),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportController {
    zoom_step: f64,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl ViewportController {
    pub fn new(zoom_step: f64) -> Self {
        let zoom_step = if zoom_step.is_finite() && zoom_step > 0.0 {
            zoom_step
        } else {
            1.0
        };
        Self { zoom_step }
    }

    /// Validates the input, applies it and persists it as the default view.
    ///
    /// Invalid input leaves both the map and storage untouched.
    pub fn set_view<M: MapWidget, S: PreferenceStore>(
        &self,
        map: &mut M,
        prefs: &mut ViewPreferences<S>,
        bus: &mut EventBus,
        input: &ViewInput,
    ) -> Result<Viewpoint, ViewerError> {
        let view = input.parse()?;
        map.set_view(view);
        if let Err(err) = prefs.save_viewpoint(view) {
            error!(%err, "failed to persist default view");
        }
        info!(lat = view.lat(), lng = view.lng(), zoom = view.zoom, "default view saved");
        bus.notify(Notice::info("View settings saved!"));
        Ok(view)
    }

    pub fn zoom_in<M: MapWidget>(&self, map: &mut M) {
        map.zoom_by(self.zoom_step);
    }

    pub fn zoom_out<M: MapWidget>(&self, map: &mut M) {
        map.zoom_by(-self.zoom_step);
    }

    pub fn reset_to_default<M: MapWidget, S: PreferenceStore>(
        &self,
        map: &mut M,
        prefs: &ViewPreferences<S>,
    ) -> Viewpoint {
        let view = prefs.viewpoint();
        map.set_view(view);
        view
    }

    pub fn publish_zoom<M: MapWidget>(&self, map: &M, bus: &mut EventBus) {
        bus.emit(ViewerEvent::ZoomChanged(map.zoom()));
    }

    pub fn publish_cursor(&self, at: LatLng, bus: &mut EventBus) {
        if at.is_finite() {
            bus.emit(ViewerEvent::CursorMoved(at));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_padded_numbers_and_truncates_zoom() {
        let v = ViewInput::new(" 51.5 ", "-0.12", "9.8").parse().unwrap();
        assert_eq!(v, Viewpoint::new(51.5, -0.12, 9));
    }

    #[test]
    fn parse_rejects_any_non_numeric_field() {
        for input in [
            ViewInput::new("x", "1", "2"),
            ViewInput::new("1", "", "2"),
            ViewInput::new("1", "2", "four"),
        ] {
            assert_eq!(input.parse(), Err(ViewerError::InvalidViewpoint));
        }
    }

    #[test]
    fn non_positive_zoom_step_falls_back_to_one() {
        assert_eq!(ViewportController::new(0.0), ViewportController::new(1.0));
        assert_eq!(ViewportController::new(f64::NAN), ViewportController::default());
    }
}

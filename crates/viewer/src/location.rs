use api::DeviceLocation;
use foundation::LatLng;

use crate::map::MapWidget;

/// Single marker showing where the tracked device last reported from.
#[derive(Debug)]
pub struct DeviceTracker<K> {
    marker: Option<K>,
}

impl<K> Default for DeviceTracker<K> {
    fn default() -> Self {
        Self { marker: None }
    }
}

impl<K> DeviceTracker<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places (or moves) the marker and pans to it. The saved default view is
    /// not touched.
    pub fn show<M: MapWidget<Marker = K>>(&mut self, map: &mut M, location: &DeviceLocation) {
        let at = LatLng::new(location.latitude, location.longitude);
        let popup = popup_text(location);
        match &self.marker {
            Some(marker) => map.move_marker(marker, at, &popup),
            None => self.marker = Some(map.place_marker(at, &popup)),
        }
        map.pan_to(at);
    }
}

fn popup_text(location: &DeviceLocation) -> String {
    match &location.readable_time {
        Some(t) => format!("Device location at {t} UTC"),
        None => format!("Device location at {}", location.timestamp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeMap;

    fn loc(lat: f64, lng: f64) -> DeviceLocation {
        DeviceLocation {
            latitude: lat,
            longitude: lng,
            timestamp: 1_700_000_000.0,
            readable_time: Some("2023-11-14 22:13:20".to_string()),
        }
    }

    #[test]
    fn second_fix_moves_the_same_marker() {
        let mut map = FakeMap::default();
        let mut tracker = DeviceTracker::new();
        tracker.show(&mut map, &loc(6.5, 3.3));
        tracker.show(&mut map, &loc(7.0, 4.0));

        assert_eq!(map.markers.len(), 1);
        let (at, popup) = map.markers.values().next().unwrap();
        assert_eq!(*at, LatLng::new(7.0, 4.0));
        assert_eq!(popup, "Device location at 2023-11-14 22:13:20 UTC");
        assert_eq!(map.center, Some(LatLng::new(7.0, 4.0)));
    }
}

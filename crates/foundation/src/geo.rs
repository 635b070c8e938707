/// Geographic position in decimal degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Cursor readout text, five decimals per axis.
    pub fn readout(&self) -> String {
        format!("Lat: {:.5}, Lng: {:.5}", self.lat, self.lng)
    }
}

/// What part of the map is visible: a center and an integer zoom level.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewpoint {
    pub center: LatLng,
    pub zoom: i32,
}

impl Viewpoint {
    pub const DEFAULT_LAT: f64 = 6.0;
    pub const DEFAULT_LNG: f64 = 5.0;
    pub const DEFAULT_ZOOM: i32 = 4;

    pub const fn new(lat: f64, lng: f64, zoom: i32) -> Self {
        Self {
            center: LatLng::new(lat, lng),
            zoom,
        }
    }

    pub fn lat(&self) -> f64 {
        self.center.lat
    }

    pub fn lng(&self) -> f64 {
        self.center.lng
    }
}

impl Default for Viewpoint {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LAT, Self::DEFAULT_LNG, Self::DEFAULT_ZOOM)
    }
}

/// Zoom readout text shown next to the map.
pub fn zoom_readout(zoom: f64) -> String {
    format!("Zoom Level: {zoom}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_viewpoint_matches_startup_view() {
        let v = Viewpoint::default();
        assert_eq!(v.lat(), 6.0);
        assert_eq!(v.lng(), 5.0);
        assert_eq!(v.zoom, 4);
    }

    #[test]
    fn readout_rounds_to_five_decimals() {
        let p = LatLng::new(6.123456789, -5.5);
        assert_eq!(p.readout(), "Lat: 6.12346, Lng: -5.50000");
    }

    #[test]
    fn zoom_readout_prints_integers_without_fraction() {
        assert_eq!(zoom_readout(7.0), "Zoom Level: 7");
        assert_eq!(zoom_readout(7.5), "Zoom Level: 7.5");
    }

    #[test]
    fn nan_is_not_finite() {
        assert!(!LatLng::new(f64::NAN, 1.0).is_finite());
        assert!(LatLng::new(0.0, 1.0).is_finite());
    }
}

use serde::{Deserialize, Serialize};

use crate::layer::LayerId;
use crate::symbology::StyleRecord;

/// A user-supplied GeoJSON dataset as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayLayer {
    pub layer_id: LayerId,
    pub layer_name: String,
    /// Passed through to the renderer untouched.
    pub geojson_data: serde_json::Value,
    #[serde(default, deserialize_with = "crate::symbology::lenient_style")]
    pub styles: StyleRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_styles_use_defaults() {
        let layer: OverlayLayer = serde_json::from_value(serde_json::json!({
            "layer_id": "66f0",
            "layer_name": "roads.geojson",
            "geojson_data": {"type": "FeatureCollection", "features": []}
        }))
        .unwrap();
        assert_eq!(layer.layer_id.as_str(), "66f0");
        assert_eq!(layer.styles, StyleRecord::default());
    }

    #[test]
    fn null_or_malformed_styles_use_defaults() {
        for styles in [serde_json::json!(null), serde_json::json!("red")] {
            let layer: OverlayLayer = serde_json::from_value(serde_json::json!({
                "layer_id": "a",
                "layer_name": "a.geojson",
                "geojson_data": {},
                "styles": styles
            }))
            .unwrap();
            assert_eq!(layer.styles, StyleRecord::default());
        }
    }
}

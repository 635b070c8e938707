//! Wire types for the layer backend.
//!
//! Requests and responses are JSON, except the upload which is a multipart
//! form whose `styles` part is a JSON string.

use layers::{LayerId, OverlayLayer, StyleRecord};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Multipart field names of `POST /upload_geojson`.
pub const UPLOAD_FIELD_FILE: &str = "file";
pub const UPLOAD_FIELD_LAYER_NAME: &str = "layer_name";
pub const UPLOAD_FIELD_STYLES: &str = "styles";

/// Endpoint URLs relative to a backend base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        let base = base.trim().trim_end_matches('/').to_string();
        Self { base }
    }

    pub fn layers(&self) -> String {
        format!("{}/layers", self.base)
    }

    pub fn layer(&self, id: &LayerId) -> String {
        format!("{}/layers/{}", self.base, id)
    }

    pub fn upload_geojson(&self) -> String {
        format!("{}/upload_geojson", self.base)
    }

    pub fn update_styles(&self) -> String {
        format!("{}/update_styles", self.base)
    }

    pub fn update_attributes(&self, id: &LayerId) -> String {
        format!("{}/layers/{}/update_attributes", self.base, id)
    }

    pub fn location(&self) -> String {
        format!("{}/api/location", self.base)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// One entry of `GET /layers`.
pub type LayerRecord = OverlayLayer;

/// Decodes a `GET /layers` body record by record.
///
/// Only a body that is not a JSON array is an error. Records that fail to
/// decode are skipped so one bad document cannot hide every other layer.
pub fn decode_layer_list(body: &str) -> Result<Vec<LayerRecord>, ApiError> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(body)?;
    let total = raw.len();
    let mut layers = Vec::with_capacity(total);
    for (index, value) in raw.into_iter().enumerate() {
        let id = value.get("layer_id").map(|v| v.to_string());
        match serde_json::from_value::<LayerRecord>(value) {
            Ok(layer) => layers.push(layer),
            Err(e) => warn!(index, layer_id = ?id, error = %e, "skipping undecodable layer"),
        }
    }
    if layers.len() < total {
        warn!(skipped = total - layers.len(), total, "layer list partially decoded");
    }
    Ok(layers)
}

/// Body of `GET /layers/{id}`; the backend omits the style here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDetail {
    pub layer_id: LayerId,
    pub layer_name: String,
    pub geojson_data: serde_json::Value,
}

/// Multipart upload, generic over the platform's file handle.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest<F> {
    pub file: F,
    pub layer_name: String,
    pub styles: StyleRecord,
}

impl<F> UploadRequest<F> {
    /// The `styles` part as the backend expects it: a JSON string.
    pub fn styles_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.styles)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStylesRequest {
    pub layer_id: LayerId,
    pub styles: StyleRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateAttributesRequest {
    pub updated_attributes: serde_json::Value,
}

/// Generic acknowledgement. Failures carry `error` instead of `message`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_id: Option<LayerId>,
}

impl MessageResponse {
    pub fn text(&self) -> &str {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .unwrap_or("")
    }
}

/// Last position reported by the tracked device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Unix seconds.
    pub timestamp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readable_time: Option<String>,
}

use api::{DEFAULT_BASE_URL, Endpoints};
use serde::{Deserialize, Serialize};

/// Runtime settings of the viewer. Every field has a default, so a partial
/// JSON object is a valid override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub backend_base_url: String,
    /// Id of the element the map widget mounts into.
    pub map_element_id: String,
    pub zoom_step: f64,
    /// `tracing` filter directive, e.g. `info` or `viewer=debug,info`.
    pub log_filter: String,
    pub load_layers_on_start: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            backend_base_url: DEFAULT_BASE_URL.to_string(),
            map_element_id: "map".to_string(),
            zoom_step: 1.0,
            log_filter: "info".to_string(),
            load_layers_on_start: true,
        }
    }
}

impl ViewerConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(raw)
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(&self.backend_base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = ViewerConfig::from_json(r#"{"backend_base_url":"https://maps.example.org/"}"#)
            .unwrap();
        assert_eq!(cfg.endpoints().layers(), "https://maps.example.org/layers");
        assert_eq!(cfg.zoom_step, 1.0);
        assert!(cfg.load_layers_on_start);
    }

    #[test]
    fn blank_json_is_default() {
        assert_eq!(ViewerConfig::from_json("  ").unwrap(), ViewerConfig::default());
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(ViewerConfig::from_json("{").is_err());
    }
}

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Path defaults of the map library, used for fields a stored style omits.
pub const PATH_DEFAULT_COLOR: &str = "#3388ff";
pub const PATH_DEFAULT_WEIGHT: u32 = 3;

/// Visual style of an overlay: fill color, stroke color and stroke weight.
///
/// Serialized with the map library's option names (`fillColor`, `color`,
/// `weight`) so the same JSON goes to the backend and to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRecord {
    #[serde(
        rename = "fillColor",
        default = "path_default_color",
        deserialize_with = "lenient_color"
    )]
    pub fill_color: String,
    #[serde(
        rename = "color",
        default = "path_default_color",
        deserialize_with = "lenient_color"
    )]
    pub stroke_color: String,
    #[serde(default = "path_default_weight", deserialize_with = "lenient_weight")]
    pub weight: u32,
}

impl StyleRecord {
    pub fn new(
        fill_color: impl Into<String>,
        stroke_color: impl Into<String>,
        weight: u32,
    ) -> Self {
        Self {
            fill_color: fill_color.into(),
            stroke_color: stroke_color.into(),
            weight,
        }
    }

    /// Style attached to every freshly uploaded layer.
    pub fn upload_default() -> Self {
        Self::new("#ff7800", "#000000", 2)
    }
}

impl Default for StyleRecord {
    fn default() -> Self {
        Self::new(PATH_DEFAULT_COLOR, PATH_DEFAULT_COLOR, PATH_DEFAULT_WEIGHT)
    }
}

fn path_default_color() -> String {
    PATH_DEFAULT_COLOR.to_string()
}

fn path_default_weight() -> u32 {
    PATH_DEFAULT_WEIGHT
}

// The backend stores whatever style JSON a client sent: colors may be null
// and weights may be fractional, null or numeric strings.
fn lenient_color<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.trim().is_empty() => s,
        _ => path_default_color(),
    })
}

fn lenient_weight<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let w = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(match w {
        Some(w) if w.is_finite() && w >= 0.0 => w.trunc().min(u32::MAX as f64) as u32,
        _ => PATH_DEFAULT_WEIGHT,
    })
}

/// A `styles` value that is null or not an object renders with path defaults.
pub(crate) fn lenient_style<'de, D>(deserializer: D) -> Result<StyleRecord, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    Ok(match v {
        Value::Object(_) => StyleRecord::deserialize(v).unwrap_or_default(),
        _ => StyleRecord::default(),
    })
}

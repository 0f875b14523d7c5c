//! Display configuration document.
//!
//! The configuration is a single JSON object. Loads and updates are merged
//! onto the defaults below so keys added in later releases backfill
//! silently. Values are otherwise stored verbatim: unknown keys survive and
//! known keys are not type-checked.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

/// What the display shows when no files are uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyScreenMode {
    /// Setup instructions with the device's IP address.
    Setup,
    /// The clock screen widget grid.
    Clock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Clock,
    Date,
    Text,
    Image,
}

/// A positioned element on the clock screen's 12x12 grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    #[serde(rename = "i", alias = "id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    /// Type-specific settings (font size, colour, image source, ...).
    #[serde(default)]
    pub config: Value,
}

/// Typed form of the default configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayConfig {
    /// Milliseconds each slide stays on screen.
    pub slide_interval: u64,
    /// Milliseconds of the transition between slides.
    pub transition_duration: u64,
    pub transition_type: String,
    pub empty_screen_mode: EmptyScreenMode,
    pub time_font_size: u32,
    pub date_font_size: u32,
    pub logo_max_width: u32,
    pub logo_max_height: u32,
    pub clock_widgets: Vec<Widget>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            slide_interval: 5000,
            transition_duration: 1000,
            transition_type: "fade".into(),
            empty_screen_mode: EmptyScreenMode::Setup,
            time_font_size: 160,
            date_font_size: 42,
            logo_max_width: 400,
            logo_max_height: 200,
            clock_widgets: default_widgets(),
        }
    }
}

/// Logo, clock and date stacked in the centre of the grid.
fn default_widgets() -> Vec<Widget> {
    vec![
        Widget {
            id: "widget-logo".into(),
            kind: WidgetKind::Image,
            x: 4,
            y: 1,
            w: 4,
            h: 2,
            config: serde_json::json!({ "src": "logo", "objectFit": "contain" }),
        },
        Widget {
            id: "widget-clock".into(),
            kind: WidgetKind::Clock,
            x: 3,
            y: 4,
            w: 6,
            h: 1,
            config: serde_json::json!({ "fontSize": 160, "color": "#f0f0f5", "showSeconds": true }),
        },
        Widget {
            id: "widget-date".into(),
            kind: WidgetKind::Date,
            x: 3,
            y: 7,
            w: 6,
            h: 1,
            config: serde_json::json!({ "fontSize": 42, "color": "#a0a0b0", "format": "long" }),
        },
    ]
}

/// The defaults as a JSON object.
pub fn default_document() -> Map<String, Value> {
    match serde_json::to_value(DisplayConfig::default()) {
        Ok(Value::Object(map)) => map,
        // Struct serialization always yields an object.
        _ => Map::new(),
    }
}

/// Replace the top-level keys of `base` with those of `partial`.
pub fn shallow_merge(mut base: Map<String, Value>, partial: Map<String, Value>) -> Map<String, Value> {
    for (key, value) in partial {
        base.insert(key, value);
    }
    base
}

/// Shallow-merge `doc` over the defaults.
pub fn merge_onto_defaults(doc: Map<String, Value>) -> Map<String, Value> {
    shallow_merge(default_document(), doc)
}

/// A configuration update must be a JSON object.
pub fn require_object(value: Value) -> Result<Map<String, Value>, CoreError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(CoreError::Validation(format!(
            "Configuration update must be a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

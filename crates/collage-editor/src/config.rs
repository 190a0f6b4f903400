//! Editor configuration.

use collage_core::model::DEFAULT_FONT_SIZE;
use collage_core::sizing::{CONTAINER_PADDING, CanvasSize};
use serde::{Deserialize, Serialize};

/// Durable key holding the latest snapshot.
pub const DEFAULT_STORAGE_KEY: &str = "collageState";

/// Tunables for an [`Editor`](crate::editor::Editor).
///
/// Every field has a default, so hosts may pass a partial JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Subtracted from each container axis before fitting a ratio.
    pub container_padding: f32,
    /// Canvas size for a fresh scene and for the `custom` template.
    pub custom_default: CanvasSize,
    /// Maximum history entries. `None` keeps everything.
    pub history_limit: Option<usize>,
    /// Text used when the text input is empty.
    pub default_text: String,
    pub text_origin: (f32, f32),
    pub font_size: f32,
    /// Imported images are scaled to this fraction of the canvas width.
    pub import_width_fraction: f32,
    pub storage_key: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            container_padding: CONTAINER_PADDING,
            custom_default: CanvasSize::default(),
            history_limit: None,
            default_text: "Hello".to_string(),
            text_origin: (50.0, 50.0),
            font_size: DEFAULT_FONT_SIZE,
            import_width_fraction: 0.25,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON config; an empty string means defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            EditorConfig::from_json(r#"{"historyLimit": 20, "storageKey": "demo"}"#).unwrap();
        assert_eq!(config.history_limit, Some(20));
        assert_eq!(config.storage_key, "demo");
        assert_eq!(config.container_padding, 40.0);
        assert_eq!(config.default_text, "Hello");
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(EditorConfig::from_json("  ").unwrap(), EditorConfig::default());
    }
}

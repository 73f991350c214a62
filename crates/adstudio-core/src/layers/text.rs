//! Text layer.

use super::{CssColor, LayerBase};
use serde::{Deserialize, Serialize};

/// Font style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// Horizontal text alignment inside the layer box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Drop shadow shared by text and button layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    pub color: CssColor,
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// A block of styled text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayer {
    #[serde(flatten)]
    pub base: LayerBase,
    pub text: String,
    pub font_family: String,
    /// Font size in document units.
    pub font_size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    pub color: CssColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
}

impl TextLayer {
    /// Default font size for new text layers.
    pub const DEFAULT_FONT_SIZE: f64 = 40.0;

    /// Create a text layer with only the required styling set.
    pub fn new(base: LayerBase, text: impl Into<String>, font_family: impl Into<String>, color: CssColor) -> Self {
        Self {
            base,
            text: text.into(),
            font_family: font_family.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
            font_weight: None,
            font_style: None,
            color,
            align: None,
            line_height: None,
            letter_spacing: None,
            shadow: None,
        }
    }

    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Whether the weight renders as bold (700 and above).
    pub fn is_bold(&self) -> bool {
        self.font_weight.is_some_and(|w| w >= 700)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_optionals_stay_absent() {
        let json = r##"{
            "id": "t1", "name": "Headline", "x": 0, "y": 0, "width": 800, "height": 100,
            "rotation": 0, "opacity": 1, "visible": true, "locked": false, "zIndex": 3,
            "text": "SALE", "fontFamily": "Inter", "fontSize": 72, "color": "#fff"
        }"##;
        let text: TextLayer = serde_json::from_str(json).unwrap();
        assert_eq!(text.font_weight, None);
        assert_eq!(text.align, None);
        assert_eq!(text.shadow, None);
        assert!(!text.is_bold());

        let out = serde_json::to_value(&text).unwrap();
        assert!(out.get("fontWeight").is_none());
        assert!(out.get("lineHeight").is_none());
    }

    #[test]
    fn test_is_bold() {
        let mut text = TextLayer::new(LayerBase::new("t", 0.0, 0.0, 10.0, 10.0), "Hi", "Inter", "#000".into());
        text.font_weight = Some(900);
        assert!(text.is_bold());
        text.font_weight = Some(400);
        assert!(!text.is_bold());
    }
}

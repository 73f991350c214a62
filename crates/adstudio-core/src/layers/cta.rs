//! Call-to-action button layer.

use super::{CssColor, FontStyle, LayerBase, Shadow};
use serde::{Deserialize, Serialize};

/// One color stop of a linear gradient, `offset` in `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f64,
    pub color: CssColor,
}

/// Button background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CtaBackground {
    Solid { color: CssColor },
    /// Linear gradient, `angle` in degrees (0 = left to right).
    LinearGradient { angle: f64, stops: Vec<GradientStop> },
}

/// A button: text on a filled, optionally bordered, rounded box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaLayer {
    #[serde(flatten)]
    pub base: LayerBase,
    pub text: String,
    pub background: CtaBackground,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<CssColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    pub font_family: String,
    pub font_size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    /// Label color.
    pub color: CssColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
}

impl CtaLayer {
    /// Create a solid button.
    pub fn new(base: LayerBase, text: impl Into<String>, background: CssColor, color: CssColor) -> Self {
        Self {
            base,
            text: text.into(),
            background: CtaBackground::Solid { color: background },
            corner_radius: None,
            border_color: None,
            border_width: None,
            font_family: "Inter".to_string(),
            font_size: 24.0,
            font_weight: None,
            font_style: None,
            color,
            letter_spacing: None,
            shadow: None,
        }
    }

    /// Color to use where a single background color is needed
    /// (the first stop for gradients).
    pub fn primary_color(&self) -> Option<&CssColor> {
        match &self.background {
            CtaBackground::Solid { color } => Some(color),
            CtaBackground::LinearGradient { stops, .. } => stops.first().map(|s| &s.color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_background_serde() {
        let json = r##"{"kind": "linearGradient", "angle": 90, "stops": [
            {"offset": 0, "color": "#f59e0b"}, {"offset": 1, "color": "#dc2626"}
        ]}"##;
        let bg: CtaBackground = serde_json::from_str(json).unwrap();
        match &bg {
            CtaBackground::LinearGradient { angle, stops } => {
                assert!((angle - 90.0).abs() < f64::EPSILON);
                assert_eq!(stops.len(), 2);
            }
            other => panic!("Expected gradient, got {other:?}"),
        }
    }

    #[test]
    fn test_primary_color() {
        let mut cta = CtaLayer::new(
            LayerBase::new("Buy", 0.0, 0.0, 280.0, 70.0),
            "BUY NOW",
            "#000".into(),
            "#fff".into(),
        );
        assert_eq!(cta.primary_color().map(CssColor::as_str), Some("#000"));
        cta.background = CtaBackground::LinearGradient {
            angle: 0.0,
            stops: vec![GradientStop { offset: 0.0, color: "#111".into() }],
        };
        assert_eq!(cta.primary_color().map(CssColor::as_str), Some("#111"));
    }
}

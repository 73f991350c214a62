//! Vector shape layer.

use super::{CssColor, LayerBase};
use serde::{Deserialize, Serialize};

/// Outline geometry of a shape layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Ellipse,
}

/// Stroke color and width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: CssColor,
    pub width: f64,
}

/// A filled and/or stroked rectangle or ellipse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeLayer {
    #[serde(flatten)]
    pub base: LayerBase,
    #[serde(default)]
    pub shape: ShapeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<CssColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Stroke>,
    /// Only meaningful for rectangles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
}

impl ShapeLayer {
    /// An unfilled, unstroked rectangle.
    pub fn rectangle(base: LayerBase) -> Self {
        Self {
            base,
            shape: ShapeKind::Rectangle,
            fill: None,
            stroke: None,
            corner_radius: None,
        }
    }

    /// An unfilled, unstroked ellipse inscribed in the layer box.
    pub fn ellipse(base: LayerBase) -> Self {
        Self {
            shape: ShapeKind::Ellipse,
            ..Self::rectangle(base)
        }
    }

    pub fn with_fill(mut self, fill: CssColor) -> Self {
        self.fill = Some(fill);
        self
    }
}

//! Image layer (backgrounds, product shots, overlays, logos).

use super::{CssColor, LayerBase};
use serde::{Deserialize, Serialize};

/// What an image is used for in the composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageKind {
    Background,
    Product,
    Overlay,
    Logo,
    #[default]
    Image,
}

/// How the source is fitted into the layer box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FitMode {
    #[default]
    Cover,
    Contain,
    Fill,
}

/// Clip applied to the image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ClipShape {
    Circle,
    RoundedRect { radius: f64 },
}

/// Source crop in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A raster image referenced by URL or data URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLayer {
    #[serde(flatten)]
    pub base: LayerBase,
    #[serde(default)]
    pub image_kind: ImageKind,
    /// Source reference; loading it is the host's job.
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<FitMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip: Option<ClipShape>,
    /// Tint color blended over the image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tint: Option<CssColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<Crop>,
}

impl ImageLayer {
    pub fn new(base: LayerBase, image_kind: ImageKind, src: impl Into<String>) -> Self {
        Self {
            base,
            image_kind,
            src: src.into(),
            fit: None,
            clip: None,
            tint: None,
            crop: None,
        }
    }

    /// Detect a source format from a file extension or data URI,
    /// for hosts deciding how to decode `src`.
    pub fn mime_type(&self) -> Option<&'static str> {
        let src = self.src.to_ascii_lowercase();
        if let Some(rest) = src.strip_prefix("data:") {
            return ["image/png", "image/jpeg", "image/webp", "image/svg+xml"]
                .into_iter()
                .find(|mime| rest.starts_with(mime));
        }
        let path = src.split(['?', '#']).next().unwrap_or_default();
        match path.rsplit('.').next()? {
            "png" => Some("image/png"),
            "jpg" | "jpeg" => Some("image/jpeg"),
            "webp" => Some("image/webp"),
            "svg" => Some("image/svg+xml"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(src: &str) -> ImageLayer {
        ImageLayer::new(LayerBase::new("img", 0.0, 0.0, 10.0, 10.0), ImageKind::Product, src)
    }

    #[test]
    fn test_mime_type_from_extension() {
        assert_eq!(image("https://cdn.example.com/shoe.JPG?w=800").mime_type(), Some("image/jpeg"));
        assert_eq!(image("logo.svg").mime_type(), Some("image/svg+xml"));
        assert_eq!(image("https://cdn.example.com/asset").mime_type(), None);
    }

    #[test]
    fn test_mime_type_from_data_uri() {
        assert_eq!(image("data:image/png;base64,iVBORw0K").mime_type(), Some("image/png"));
    }

    #[test]
    fn test_image_kind_defaults_to_generic() {
        let json = r#"{"id": "i", "name": "Photo", "x": 0, "y": 0, "width": 10, "height": 10,
            "opacity": 1, "visible": true, "locked": false, "zIndex": 0, "src": "a.png"}"#;
        let layer: ImageLayer = serde_json::from_str(json).unwrap();
        assert_eq!(layer.image_kind, ImageKind::Image);
        assert_eq!(layer.base.rotation, 0.0);
    }
}

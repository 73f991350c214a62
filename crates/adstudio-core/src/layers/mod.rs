//! Layer definitions for ad documents.

mod color;
mod cta;
mod group;
mod image;
mod shape;
mod text;

pub use color::{CssColor, Rgba8};
pub use cta::{CtaBackground, CtaLayer, GradientStop};
pub use group::GroupLayer;
pub use image::{ClipShape, Crop, FitMode, ImageKind, ImageLayer};
pub use shape::{ShapeKind, ShapeLayer, Stroke};
pub use text::{FontStyle, Shadow, TextAlign, TextLayer};

use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for layers (unique across the whole document tree).
pub type LayerId = String;

/// Smallest width or height a layer may have after any transform.
pub const MIN_LAYER_SIZE: f64 = 5.0;

/// Generate a fresh layer ID.
pub fn new_layer_id() -> LayerId {
    format!("layer_{}", Uuid::new_v4().simple())
}

/// Semantic role of a layer within the ad composition.
///
/// When set, the role takes precedence over the layer variant wherever the
/// layout engine needs to classify a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerRole {
    Background,
    Overlay,
    Cta,
    Headline,
    Body,
    Product,
    Logo,
    Decoration,
}

/// Fields shared by every layer variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerBase {
    pub id: LayerId,
    pub name: String,
    /// Origin in the parent's coordinate space (document or group).
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees, clockwise around the origin.
    #[serde(default)]
    pub rotation: f64,
    pub opacity: f64,
    pub visible: bool,
    pub locked: bool,
    pub z_index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<LayerRole>,
}

impl LayerBase {
    /// Create a visible, unlocked, opaque base with a generated ID.
    pub fn new(name: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: new_layer_id(),
            name: name.into(),
            x,
            y,
            width,
            height,
            rotation: 0.0,
            opacity: 1.0,
            visible: true,
            locked: false,
            z_index: 0,
            role: None,
        }
    }

    /// Builder-style ID override.
    pub fn with_id(mut self, id: impl Into<LayerId>) -> Self {
        self.id = id.into();
        self
    }

    /// Builder-style role override.
    pub fn with_role(mut self, role: LayerRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Builder-style z-index override.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Local rectangle `(x, y, x + width, y + height)`, ignoring rotation.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Transform from layer-local space (origin at the top-left corner) to
    /// the parent's space.
    pub fn transform(&self) -> Affine {
        Affine::translate(Vec2::new(self.x, self.y)) * Affine::rotate(self.rotation.to_radians())
    }

    /// Axis-aligned bounding box of the rotated layer in the parent's space.
    pub fn client_rect(&self) -> Rect {
        self.transform()
            .transform_rect_bbox(Rect::new(0.0, 0.0, self.width, self.height))
    }

    /// Whether a point (parent space) lies on the rotated layer.
    pub fn contains(&self, point: Point) -> bool {
        let local = self.transform().inverse() * point;
        // Edges count as inside, unlike `Rect::contains`.
        local.x >= 0.0 && local.y >= 0.0 && local.x <= self.width && local.y <= self.height
    }
}

/// A positioned visual element of an ad document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Layer {
    Text(TextLayer),
    Cta(CtaLayer),
    Shape(ShapeLayer),
    Image(ImageLayer),
    Group(GroupLayer),
}

impl Layer {
    pub fn base(&self) -> &LayerBase {
        match self {
            Layer::Text(l) => &l.base,
            Layer::Cta(l) => &l.base,
            Layer::Shape(l) => &l.base,
            Layer::Image(l) => &l.base,
            Layer::Group(l) => &l.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut LayerBase {
        match self {
            Layer::Text(l) => &mut l.base,
            Layer::Cta(l) => &mut l.base,
            Layer::Shape(l) => &mut l.base,
            Layer::Image(l) => &mut l.base,
            Layer::Group(l) => &mut l.base,
        }
    }

    pub fn id(&self) -> &str {
        &self.base().id
    }

    pub fn z_index(&self) -> i32 {
        self.base().z_index
    }

    pub fn is_locked(&self) -> bool {
        self.base().locked
    }

    pub fn is_visible(&self) -> bool {
        self.base().visible
    }

    /// Short variant name, matching the serialized `type` tag.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Layer::Text(_) => "text",
            Layer::Cta(_) => "cta",
            Layer::Shape(_) => "shape",
            Layer::Image(_) => "image",
            Layer::Group(_) => "group",
        }
    }

    /// Font size, for the variants that have one.
    pub fn font_size(&self) -> Option<f64> {
        match self {
            Layer::Text(t) => Some(t.font_size),
            Layer::Cta(c) => Some(c.font_size),
            Layer::Shape(_) | Layer::Image(_) | Layer::Group(_) => None,
        }
    }

    /// Set the font size. Returns false for variants without text.
    pub fn set_font_size(&mut self, size: f64) -> bool {
        match self {
            Layer::Text(t) => {
                t.font_size = size;
                true
            }
            Layer::Cta(c) => {
                c.font_size = size;
                true
            }
            Layer::Shape(_) | Layer::Image(_) | Layer::Group(_) => false,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Layer::Group(_))
    }

    pub fn as_group(&self) -> Option<&GroupLayer> {
        match self {
            Layer::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut GroupLayer> {
        match self {
            Layer::Group(g) => Some(g),
            _ => None,
        }
    }

    /// Axis-aligned bounding box after rotation, in the parent's space.
    pub fn client_rect(&self) -> Rect {
        self.base().client_rect()
    }

    /// This layer's ID followed by every descendant ID (depth first).
    pub fn all_ids(&self) -> Vec<LayerId> {
        let mut ids = vec![self.base().id.clone()];
        if let Layer::Group(group) = self {
            for child in &group.children {
                ids.extend(child.all_ids());
            }
        }
        ids
    }

    /// Copy of this layer with geometry multiplied by `(sx, sy)`.
    ///
    /// Position, size and every descendant are scaled; font sizes are
    /// multiplied by `max(sx, sy)`. Sizes never drop under
    /// [`MIN_LAYER_SIZE`].
    pub fn scaled(&self, sx: f64, sy: f64) -> Layer {
        let mut layer = self.resized(sx, sy);
        let base = layer.base_mut();
        base.x *= sx;
        base.y *= sy;
        layer
    }

    /// Copy of this layer with its size (not its position) multiplied by
    /// `(sx, sy)`, descendants folded the same way as [`Layer::scaled`].
    pub fn resized(&self, sx: f64, sy: f64) -> Layer {
        let mut layer = match self {
            Layer::Group(group) => Layer::Group(GroupLayer {
                base: group.base.clone(),
                children: group.scaled_children(sx, sy),
            }),
            other => other.clone(),
        };
        let base = layer.base_mut();
        base.width = (base.width * sx).max(MIN_LAYER_SIZE);
        base.height = (base.height * sy).max(MIN_LAYER_SIZE);
        if let Some(size) = layer.font_size() {
            layer.set_font_size(size * sx.max(sy));
        }
        layer
    }

    /// Assign new IDs to this layer and all descendants.
    pub fn regenerate_ids(&mut self) {
        self.base_mut().id = new_layer_id();
        if let Layer::Group(group) = self {
            for child in &mut group.children {
                child.regenerate_ids();
            }
        }
    }
}

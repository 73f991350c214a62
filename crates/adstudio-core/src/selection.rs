//! Selection set, hit testing, marquee selection and transform handles.

use crate::document::{AdDocument, TransformPatch};
use crate::layers::{Layer, LayerBase, LayerId, MIN_LAYER_SIZE};
use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Default handle hit radius in document units (screen pixels at zoom 1).
pub const HANDLE_HIT_TOLERANCE: f64 = 10.0;
/// Distance from the selection box to the rotation handle (document units).
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;

/// Ordered set of selected layer IDs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(Vec<LayerId>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(id: impl Into<LayerId>) -> Self {
        Self(vec![id.into()])
    }

    pub fn ids(&self) -> &[LayerId] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|s| s == id)
    }

    /// Replace the selection with a single layer.
    pub fn select_only(&mut self, id: impl Into<LayerId>) {
        self.0.clear();
        self.0.push(id.into());
    }

    /// Add if absent, remove if present.
    pub fn toggle(&mut self, id: &str) {
        if let Some(pos) = self.0.iter().position(|s| s == id) {
            self.0.remove(pos);
        } else {
            self.0.push(id.to_string());
        }
    }

    /// Append IDs that are not already selected, keeping their order.
    pub fn extend<I: IntoIterator<Item = LayerId>>(&mut self, ids: I) {
        for id in ids {
            if !self.contains(&id) {
                self.0.push(id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Drop IDs no longer present in `doc`.
    pub fn retain_existing(&mut self, doc: &AdDocument) {
        self.0.retain(|id| doc.find_layer(id).is_some());
    }
}

impl From<Vec<LayerId>> for Selection {
    fn from(ids: Vec<LayerId>) -> Self {
        let mut selection = Self::new();
        selection.extend(ids);
        selection
    }
}

/// Topmost visible top-level layer under `point` (document space).
pub fn hit_test(doc: &AdDocument, point: Point) -> Option<&Layer> {
    doc.paint_order()
        .into_iter()
        .rev()
        .find(|layer| layer.is_visible() && layer.base().contains(point))
}

/// Inclusive box intersection: boxes that merely touch intersect.
pub fn rects_intersect(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// IDs of visible top-level layers whose rotated bounding box intersects
/// `marquee`, in paint order. Locked layers are included.
pub fn marquee_intersect(doc: &AdDocument, marquee: Rect) -> Vec<LayerId> {
    let marquee = marquee.abs();
    doc.paint_order()
        .into_iter()
        .filter(|layer| layer.is_visible() && rects_intersect(layer.client_rect(), marquee))
        .map(|layer| layer.id().to_string())
        .collect()
}

/// Selected layers that may be dragged or transformed (present and unlocked).
pub fn transformable_ids(doc: &AdDocument, selection: &Selection) -> Vec<LayerId> {
    selection
        .ids()
        .iter()
        .filter(|id| doc.find_layer(id).is_some_and(|l| !l.is_locked()))
        .cloned()
        .collect()
}

/// Union of the bounding boxes of the given layers.
pub fn bounds_of(doc: &AdDocument, ids: &[LayerId]) -> Option<Rect> {
    ids.iter()
        .filter_map(|id| doc.find_layer(id))
        .map(Layer::client_rect)
        .reduce(|a, b| a.union(b))
}

/// Type of transform handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Corner handle, scales both axes.
    Corner(Corner),
    /// Edge midpoint handle, scales one axis.
    Edge(Edge),
    /// Rotation handle (above the top edge).
    Rotate,
}

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// A transform handle with its position and type.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    /// Position in document coordinates.
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a point hits this handle.
    /// `tolerance` should be adjusted for camera zoom.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.position).hypot2() <= tolerance * tolerance
    }
}

/// Handles around a selection box: four corners, four edges, rotation.
pub fn handles(bounds: Rect) -> Vec<Handle> {
    let center = bounds.center();
    vec![
        Handle::new(Point::new(bounds.x0, bounds.y0), HandleKind::Corner(Corner::TopLeft)),
        Handle::new(Point::new(bounds.x1, bounds.y0), HandleKind::Corner(Corner::TopRight)),
        Handle::new(Point::new(bounds.x0, bounds.y1), HandleKind::Corner(Corner::BottomLeft)),
        Handle::new(Point::new(bounds.x1, bounds.y1), HandleKind::Corner(Corner::BottomRight)),
        Handle::new(Point::new(center.x, bounds.y0), HandleKind::Edge(Edge::Top)),
        Handle::new(Point::new(bounds.x1, center.y), HandleKind::Edge(Edge::Right)),
        Handle::new(Point::new(center.x, bounds.y1), HandleKind::Edge(Edge::Bottom)),
        Handle::new(Point::new(bounds.x0, center.y), HandleKind::Edge(Edge::Left)),
        Handle::new(Point::new(center.x, bounds.y0 - ROTATE_HANDLE_OFFSET), HandleKind::Rotate),
    ]
}

/// Find which handle (if any) is hit at the given point.
pub fn hit_test_handles(bounds: Rect, point: Point, tolerance: f64) -> Option<HandleKind> {
    handles(bounds)
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.kind)
}

/// New selection box after dragging a scale handle by `delta`.
///
/// The opposite corner or edge stays fixed and neither side shrinks below
/// `min_size`. With `keep_aspect_ratio`, corner drags scale uniformly.
pub fn resize_box(bounds: Rect, handle: HandleKind, delta: Vec2, keep_aspect_ratio: bool, min_size: f64) -> Rect {
    let (mut width, mut height) = (bounds.width(), bounds.height());
    let (from_left, from_top) = match handle {
        HandleKind::Corner(Corner::TopLeft) => {
            width -= delta.x;
            height -= delta.y;
            (true, true)
        }
        HandleKind::Corner(Corner::TopRight) => {
            width += delta.x;
            height -= delta.y;
            (false, true)
        }
        HandleKind::Corner(Corner::BottomLeft) => {
            width -= delta.x;
            height += delta.y;
            (true, false)
        }
        HandleKind::Corner(Corner::BottomRight) => {
            width += delta.x;
            height += delta.y;
            (false, false)
        }
        HandleKind::Edge(Edge::Top) => {
            height -= delta.y;
            (false, true)
        }
        HandleKind::Edge(Edge::Right) => {
            width += delta.x;
            (false, false)
        }
        HandleKind::Edge(Edge::Bottom) => {
            height += delta.y;
            (false, false)
        }
        HandleKind::Edge(Edge::Left) => {
            width -= delta.x;
            (true, false)
        }
        HandleKind::Rotate => return bounds,
    };

    let mut width = width.max(min_size);
    let mut height = height.max(min_size);
    if keep_aspect_ratio
        && matches!(handle, HandleKind::Corner(_))
        && bounds.width() > 0.0
        && bounds.height() > 0.0
    {
        let scale = (width / bounds.width())
            .max(height / bounds.height())
            .max(min_size / bounds.width())
            .max(min_size / bounds.height());
        width = bounds.width() * scale;
        height = bounds.height() * scale;
    }

    let x0 = if from_left { bounds.x1 - width } else { bounds.x0 };
    let y0 = if from_top { bounds.y1 - height } else { bounds.y0 };
    Rect::new(x0, y0, x0 + width, y0 + height)
}

/// Clockwise angle in degrees swept by the pointer around `center`.
pub fn rotation_delta(center: Point, start: Point, current: Point) -> f64 {
    let a = start - center;
    let b = current - center;
    (b.y.atan2(b.x) - a.y.atan2(a.x)).to_degrees()
}

/// Live geometry of a node during a gesture. Scale accumulates here and is
/// only baked into the document on commit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeState {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl NodeState {
    pub fn from_base(base: &LayerBase) -> Self {
        Self {
            x: base.x,
            y: base.y,
            width: base.width,
            height: base.height,
            rotation: base.rotation,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_rotated(&self) -> bool {
        self.rotation.rem_euclid(360.0) != 0.0
    }

    /// Node-local to parent space, like [`LayerBase::transform`].
    pub fn transform(&self) -> Affine {
        Affine::translate(Vec2::new(self.x, self.y)) * Affine::rotate(self.rotation.to_radians())
    }

    /// Local rect with the accumulated scale applied.
    fn local_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width * self.scale_x, self.height * self.scale_y)
    }

    /// Axis-aligned box of the live node in parent space.
    pub fn client_rect(&self) -> Rect {
        self.transform().transform_rect_bbox(self.local_rect())
    }

    /// Map the node from box `from` onto box `to`, accumulating the scale.
    pub fn scaled_within(&self, from: Rect, to: Rect) -> Self {
        let sx = if from.width() > 0.0 { to.width() / from.width() } else { 1.0 };
        let sy = if from.height() > 0.0 { to.height() / from.height() } else { 1.0 };
        Self {
            x: to.x0 + (self.x - from.x0) * sx,
            y: to.y0 + (self.y - from.y0) * sy,
            scale_x: self.scale_x * sx,
            scale_y: self.scale_y * sy,
            ..*self
        }
    }

    /// Move the node so its box center follows the mapping from `from` onto
    /// `to`. Size and rotation are unchanged.
    pub fn translated_within(&self, from: Rect, to: Rect) -> Self {
        let sx = if from.width() > 0.0 { to.width() / from.width() } else { 1.0 };
        let sy = if from.height() > 0.0 { to.height() / from.height() } else { 1.0 };
        let center = self.client_rect().center();
        let target = Point::new(to.x0 + (center.x - from.x0) * sx, to.y0 + (center.y - from.y0) * sy);
        let delta = target - center;
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            ..*self
        }
    }

    /// Resize the node by a handle of its axis-aligned box, working in the
    /// node's own frame so the opposite side stays where it is.
    pub fn resized_local(&self, handle: HandleKind, delta: Vec2, keep_aspect_ratio: bool, min_size: f64) -> Self {
        let local = self.local_rect();
        let unrotate = Affine::rotate(-self.rotation.to_radians());
        let target = resize_box(
            local,
            local_handle(handle, unrotate),
            (unrotate * delta.to_point()).to_vec2(),
            keep_aspect_ratio,
            min_size,
        );
        let origin = self.transform() * Point::new(target.x0, target.y0);
        let sx = if local.width() > 0.0 { target.width() / local.width() } else { 1.0 };
        let sy = if local.height() > 0.0 { target.height() / local.height() } else { 1.0 };
        Self {
            x: origin.x,
            y: origin.y,
            scale_x: self.scale_x * sx,
            scale_y: self.scale_y * sy,
            ..*self
        }
    }

    /// Rotate the node's origin around `center` and add to its rotation.
    pub fn rotated_about(&self, center: Point, degrees: f64) -> Self {
        let origin = Affine::rotate_about(degrees.to_radians(), center) * self.position();
        Self {
            x: origin.x,
            y: origin.y,
            rotation: self.rotation + degrees,
            ..*self
        }
    }
}

/// The node-frame handle facing the same way as `handle` on the
/// axis-aligned box.
fn local_handle(handle: HandleKind, unrotate: Affine) -> HandleKind {
    let outward = match handle {
        HandleKind::Corner(Corner::TopLeft) => Point::new(-1.0, -1.0),
        HandleKind::Corner(Corner::TopRight) => Point::new(1.0, -1.0),
        HandleKind::Corner(Corner::BottomLeft) => Point::new(-1.0, 1.0),
        HandleKind::Corner(Corner::BottomRight) => Point::new(1.0, 1.0),
        HandleKind::Edge(Edge::Top) => Point::new(0.0, -1.0),
        HandleKind::Edge(Edge::Right) => Point::new(1.0, 0.0),
        HandleKind::Edge(Edge::Bottom) => Point::new(0.0, 1.0),
        HandleKind::Edge(Edge::Left) => Point::new(-1.0, 0.0),
        HandleKind::Rotate => return HandleKind::Rotate,
    };
    let d = unrotate * outward;
    match handle {
        HandleKind::Corner(_) => HandleKind::Corner(match (d.x >= 0.0, d.y >= 0.0) {
            (false, false) => Corner::TopLeft,
            (true, false) => Corner::TopRight,
            (false, true) => Corner::BottomLeft,
            (true, true) => Corner::BottomRight,
        }),
        _ if d.x.abs() >= d.y.abs() => HandleKind::Edge(if d.x > 0.0 { Edge::Right } else { Edge::Left }),
        _ => HandleKind::Edge(if d.y > 0.0 { Edge::Bottom } else { Edge::Top }),
    }
}

/// Bake a node's accumulated scale into explicit geometry.
///
/// Width and height are multiplied by the scale and floored at
/// [`MIN_LAYER_SIZE`]. Groups also get their descendants rescaled, with
/// font sizes multiplied by the larger factor.
pub fn bake_transform(layer: &Layer, node: &NodeState) -> TransformPatch {
    let children = layer
        .as_group()
        .map(|group| group.scaled_children(node.scale_x, node.scale_y));
    TransformPatch {
        x: node.x,
        y: node.y,
        rotation: node.rotation,
        width: (node.width * node.scale_x).max(MIN_LAYER_SIZE),
        height: (node.height * node.scale_y).max(MIN_LAYER_SIZE),
        children,
    }
}

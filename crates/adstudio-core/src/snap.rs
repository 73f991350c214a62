//! Snap engine for aligning dragged layers to the canvas and to each other.

use crate::document::AdDocument;
use crate::layers::{Layer, LayerBase, LayerId};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Snap tolerance in document units (zoom independent).
pub const SNAP_THRESHOLD: f64 = 5.0;

/// Angle snap increment in degrees.
pub const ANGLE_SNAP_INCREMENT: f64 = 15.0;

/// Which references a drag may snap to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SnapMode {
    /// No snapping.
    None,
    /// Canvas edges and center only.
    Canvas,
    /// Other layers only.
    Layers,
    /// Canvas and other layers.
    #[default]
    All,
}

impl SnapMode {
    /// Cycle to the next snap mode.
    pub fn next(self) -> Self {
        match self {
            SnapMode::None => SnapMode::Canvas,
            SnapMode::Canvas => SnapMode::Layers,
            SnapMode::Layers => SnapMode::All,
            SnapMode::All => SnapMode::None,
        }
    }

    pub fn snaps_to_canvas(self) -> bool {
        matches!(self, SnapMode::Canvas | SnapMode::All)
    }

    pub fn snaps_to_layers(self) -> bool {
        matches!(self, SnapMode::Layers | SnapMode::All)
    }

    pub fn is_enabled(self) -> bool {
        self != SnapMode::None
    }
}

/// Snap settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    pub mode: SnapMode,
    pub threshold: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            mode: SnapMode::All,
            threshold: SNAP_THRESHOLD,
        }
    }
}

/// Axis a guide aligns along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Horizontal alignment; the guide is a vertical line at `x = position`.
    X,
    /// Vertical alignment; the guide is a horizontal line at `y = position`.
    Y,
}

/// Alignment line to draw while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    pub axis: Axis,
    pub position: f64,
}

/// Result of snapping a proposed position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapResult {
    pub x: f64,
    pub y: f64,
    /// At most one guide per axis.
    pub guides: Vec<Guide>,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            x: point.x,
            y: point.y,
            guides: Vec::new(),
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_snapped(&self) -> bool {
        !self.guides.is_empty()
    }

    pub fn guide(&self, axis: Axis) -> Option<&Guide> {
        self.guides.iter().find(|g| g.axis == axis)
    }
}

/// Near edge, center and far edge of a box along one axis.
fn features(rect: Rect, axis: Axis) -> [f64; 3] {
    match axis {
        Axis::X => [rect.x0, rect.center().x, rect.x1],
        Axis::Y => [rect.y0, rect.center().y, rect.y1],
    }
}

/// Closest reference feature within `threshold`, as `(delta, position)`.
///
/// References are visited in order and only a strictly smaller delta
/// replaces the current best, so ties go to the earliest reference.
fn resolve_axis(candidate: Rect, references: &[Rect], axis: Axis, threshold: f64) -> Option<(f64, f64)> {
    let own = features(candidate, axis);
    let mut best: Option<(f64, f64)> = None;
    for reference in references {
        for target in features(*reference, axis) {
            for feature in own {
                let delta = target - feature;
                if delta.abs() > threshold {
                    continue;
                }
                if best.is_none_or(|(d, _)| delta.abs() < d.abs()) {
                    best = Some((delta, target));
                }
            }
        }
    }
    best
}

/// Snap a candidate box against reference boxes.
///
/// `candidate` is the box at the proposed position; the returned `x`/`y`
/// are `proposed` shifted by the winning deltas. The canvas bounds, when
/// enabled, are tried before `references`.
pub fn snap_rect(
    proposed: Point,
    candidate: Rect,
    references: &[Rect],
    canvas: Size,
    config: &SnapConfig,
) -> SnapResult {
    if !config.mode.is_enabled() {
        return SnapResult::none(proposed);
    }

    let mut targets = Vec::with_capacity(references.len() + 1);
    if config.mode.snaps_to_canvas() {
        targets.push(canvas.to_rect());
    }
    if config.mode.snaps_to_layers() {
        targets.extend_from_slice(references);
    }

    let mut result = SnapResult::none(proposed);
    if let Some((delta, position)) = resolve_axis(candidate, &targets, Axis::X, config.threshold) {
        result.x += delta;
        result.guides.push(Guide { axis: Axis::X, position });
    }
    if let Some((delta, position)) = resolve_axis(candidate, &targets, Axis::Y, config.threshold) {
        result.y += delta;
        result.guides.push(Guide { axis: Axis::Y, position });
    }
    result
}

/// Bounding boxes of the visible top-level layers not in `exclude`,
/// in storage order. Locked layers are included.
pub fn reference_rects(doc: &AdDocument, exclude: &[LayerId]) -> Vec<Rect> {
    doc.layers
        .iter()
        .filter(|l| l.is_visible() && !exclude.iter().any(|id| id == l.id()))
        .map(Layer::client_rect)
        .collect()
}

/// Snap a layer dragged to `proposed` against the canvas and every other
/// visible layer.
pub fn snap_layer(base: &LayerBase, proposed: Point, doc: &AdDocument, config: &SnapConfig) -> SnapResult {
    snap_drag(base, proposed, doc, std::slice::from_ref(&base.id), config)
}

/// Like [`snap_layer`], excluding every layer in `moving` (a multi-layer
/// drag) from the references.
pub fn snap_drag(
    base: &LayerBase,
    proposed: Point,
    doc: &AdDocument,
    moving: &[LayerId],
    config: &SnapConfig,
) -> SnapResult {
    let mut moved = base.clone();
    moved.x = proposed.x;
    moved.y = proposed.y;
    let references = reference_rects(doc, moving);
    snap_rect(proposed, moved.client_rect(), &references, doc.size(), config)
}

/// Snap an angle to the nearest increment.
/// Returns the snapped angle in degrees (0-360).
pub fn snap_angle(angle_degrees: f64, increment: f64) -> f64 {
    if increment <= 0.0 {
        return angle_degrees.rem_euclid(360.0);
    }
    let snapped = (angle_degrees / increment).round() * increment;
    snapped.rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::ShapeLayer;

    fn rect_layer(id: &str, x: f64, y: f64, w: f64, h: f64) -> Layer {
        Layer::Shape(ShapeLayer::rectangle(LayerBase::new(id, x, y, w, h).with_id(id)))
    }

    fn doc(layers: Vec<Layer>) -> AdDocument {
        let mut doc = AdDocument::new("Snap", 1000.0, 1000.0);
        doc.layers = layers;
        doc
    }

    #[test]
    fn test_snap_mode_cycle() {
        assert_eq!(SnapMode::None.next(), SnapMode::Canvas);
        assert_eq!(SnapMode::All.next(), SnapMode::None);
        assert!(SnapMode::All.snaps_to_canvas());
        assert!(!SnapMode::Layers.snaps_to_canvas());
    }

    #[test]
    fn test_snap_exactness_left_edge() {
        let d = doc(vec![
            rect_layer("ref", 200.0, 300.0, 100.0, 100.0),
            rect_layer("drag", 0.0, 0.0, 50.0, 50.0),
        ]);
        let base = d.find_layer("drag").unwrap().base();
        let result = snap_layer(base, Point::new(203.0, 600.0), &d, &SnapConfig::default());
        assert_eq!(result.x, 200.0);
        assert_eq!(result.y, 600.0);
        assert_eq!(result.guides, vec![Guide { axis: Axis::X, position: 200.0 }]);
    }

    #[test]
    fn test_snap_both_axes_center() {
        let d = doc(vec![rect_layer("drag", 0.0, 0.0, 100.0, 100.0)]);
        let base = d.find_layer("drag").unwrap().base();
        // Box center lands at (498, 503), near the canvas center.
        let result = snap_layer(base, Point::new(448.0, 453.0), &d, &SnapConfig::default());
        assert_eq!(result.position(), Point::new(450.0, 450.0));
        assert_eq!(result.guide(Axis::X).map(|g| g.position), Some(500.0));
        assert_eq!(result.guide(Axis::Y).map(|g| g.position), Some(500.0));
    }

    #[test]
    fn test_no_false_snap() {
        let d = doc(vec![
            rect_layer("ref", 200.0, 200.0, 100.0, 100.0),
            rect_layer("drag", 0.0, 0.0, 40.0, 40.0),
        ]);
        let base = d.find_layer("drag").unwrap().base();
        let proposed = Point::new(120.0, 620.0);
        let result = snap_layer(base, proposed, &d, &SnapConfig::default());
        assert_eq!(result, SnapResult::none(proposed));
        assert!(!result.is_snapped());
    }

    #[test]
    fn test_snaps_to_locked_but_not_hidden_layers() {
        let mut locked = rect_layer("locked", 200.0, 200.0, 100.0, 100.0);
        locked.base_mut().locked = true;
        let mut hidden = rect_layer("hidden", 600.0, 600.0, 100.0, 100.0);
        hidden.base_mut().visible = false;
        let d = doc(vec![locked, hidden, rect_layer("drag", 0.0, 0.0, 40.0, 40.0)]);
        let base = d.find_layer("drag").unwrap().base();

        let result = snap_layer(base, Point::new(302.0, 120.0), &d, &SnapConfig::default());
        assert_eq!(result.x, 300.0);

        let result = snap_layer(base, Point::new(603.0, 120.0), &d, &SnapConfig::default());
        assert_eq!(result.x, 603.0);
    }

    #[test]
    fn test_tie_break_prefers_canvas_then_list_order() {
        let d = doc(vec![
            rect_layer("first", 0.0, 300.0, 103.0, 50.0),
            rect_layer("second", 0.0, 500.0, 97.0, 50.0),
            rect_layer("drag", 0.0, 0.0, 50.0, 50.0),
        ]);
        let base = d.find_layer("drag").unwrap().base();
        // Left edge at 100: "first" ends at 103 and "second" at 97, both 3 away.
        let result = snap_layer(base, Point::new(100.0, 700.0), &d, &SnapConfig::default());
        assert_eq!(result.x, 103.0);

        // Left edge at 3: canvas (0) and a layer edge at 6 are both 3 away.
        let d = doc(vec![
            rect_layer("near", 6.0, 300.0, 50.0, 50.0),
            rect_layer("drag", 0.0, 0.0, 20.0, 20.0),
        ]);
        let base = d.find_layer("drag").unwrap().base();
        let result = snap_layer(base, Point::new(3.0, 700.0), &d, &SnapConfig::default());
        assert_eq!(result.x, 0.0);
    }

    #[test]
    fn test_nearest_delta_wins_over_canvas() {
        let d = doc(vec![
            rect_layer("ref", 5.0, 300.0, 50.0, 50.0),
            rect_layer("drag", 0.0, 0.0, 20.0, 20.0),
        ]);
        let base = d.find_layer("drag").unwrap().base();
        let result = snap_layer(base, Point::new(4.0, 700.0), &d, &SnapConfig::default());
        assert_eq!(result.x, 5.0);
    }

    #[test]
    fn test_multi_drag_excludes_moving_layers() {
        let d = doc(vec![
            rect_layer("a", 100.0, 100.0, 50.0, 50.0),
            rect_layer("b", 300.0, 300.0, 50.0, 50.0),
        ]);
        let base = d.find_layer("a").unwrap().base();
        let moving = vec!["a".to_string(), "b".to_string()];
        let result = snap_drag(base, Point::new(302.0, 620.0), &d, &moving, &SnapConfig::default());
        assert_eq!(result.x, 302.0);
    }

    #[test]
    fn test_snap_mode_none() {
        let d = doc(vec![rect_layer("drag", 0.0, 0.0, 20.0, 20.0)]);
        let base = d.find_layer("drag").unwrap().base();
        let config = SnapConfig { mode: SnapMode::None, ..SnapConfig::default() };
        let result = snap_layer(base, Point::new(1.0, 1.0), &d, &config);
        assert!(!result.is_snapped());
    }

    #[test]
    fn test_snap_angle() {
        assert_eq!(snap_angle(0.0, 15.0), 0.0);
        assert_eq!(snap_angle(7.0, 15.0), 0.0);
        assert_eq!(snap_angle(8.0, 15.0), 15.0);
        assert_eq!(snap_angle(-10.0, 15.0), 345.0);
        assert_eq!(snap_angle(358.0, 15.0), 0.0);
    }
}

//! Pointer-driven selection, drag and transform state machine.
//!
//! The controller owns only transient gesture state. It reads the current
//! [`AdDocument`] on every event and reports what changed as a list of
//! [`Action`]s; the only document writes are the `Commit` actions emitted on
//! pointer-up, which carry a new document revision for the host's history.

use crate::document::{AdDocument, LayerPatch};
use crate::error::DocumentResult;
use crate::input::{Modifiers, MouseButton, PointerEvent};
use crate::layers::{LayerId, MIN_LAYER_SIZE};
use crate::selection::{
    bake_transform, bounds_of, hit_test, hit_test_handles, marquee_intersect, resize_box,
    rotation_delta, transformable_ids, HandleKind, NodeState, Selection, HANDLE_HIT_TOLERANCE,
};
use crate::snap::{snap_angle, snap_drag, Guide, SnapConfig, ANGLE_SNAP_INCREMENT};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Controller settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub snap: SnapConfig,
    /// Rotation step used while shift is held.
    pub rotation_snap_degrees: f64,
    pub min_layer_size: f64,
    /// Handle hit radius in document units. Hosts holding a screen-pixel
    /// radius convert it with [`Camera::screen_length`](crate::camera::Camera::screen_length).
    pub handle_tolerance: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            snap: SnapConfig::default(),
            rotation_snap_degrees: ANGLE_SNAP_INCREMENT,
            min_layer_size: MIN_LAYER_SIZE,
            handle_tolerance: HANDLE_HIT_TOLERANCE,
        }
    }
}

/// What the host should do in response to an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectionChanged(Vec<LayerId>),
    /// Marquee to draw, or `None` to hide it.
    MarqueeChanged(Option<Rect>),
    /// Snap guides to draw; empty hides them.
    GuidesChanged(Vec<Guide>),
    /// Live node geometry overriding the document while a gesture runs.
    NodesMoved(Vec<(LayerId, NodeState)>),
    /// New document revision.
    Commit(AdDocument),
}

#[derive(Debug, Clone, Default)]
enum Gesture {
    #[default]
    Idle,
    Marqueeing {
        start: Point,
        additive: bool,
    },
    Dragging {
        primary: LayerId,
        start: Point,
        moved: bool,
        originals: Vec<(LayerId, NodeState)>,
    },
    Transforming {
        handle: HandleKind,
        start: Point,
        bounds: Rect,
        originals: Vec<(LayerId, NodeState)>,
    },
}

/// Selection and transform controller.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    pub config: ControllerConfig,
    selection: Selection,
    gesture: Gesture,
    guides: Vec<Guide>,
    marquee: Option<Rect>,
    nodes: Vec<(LayerId, NodeState)>,
}

impl SelectionController {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Replace the selection (from the layer panel, say).
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }

    pub fn marquee(&self) -> Option<Rect> {
        self.marquee
    }

    /// Live node overrides for the gesture in progress.
    pub fn live_nodes(&self) -> &[(LayerId, NodeState)] {
        &self.nodes
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.gesture, Gesture::Idle)
    }

    /// Selected top-level layers that can be dragged or transformed.
    pub fn movable_ids(&self, doc: &AdDocument) -> Vec<LayerId> {
        transformable_ids(doc, &self.selection)
            .into_iter()
            .filter(|id| doc.is_top_level(id))
            .collect()
    }

    /// Box the transform handles are drawn around.
    pub fn transform_bounds(&self, doc: &AdDocument) -> Option<Rect> {
        bounds_of(doc, &self.movable_ids(doc))
    }

    pub fn handle_event(&mut self, doc: &AdDocument, event: PointerEvent) -> Vec<Action> {
        match event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
            } => self.pointer_down(doc, position, button, modifiers),
            PointerEvent::Move { position, modifiers } => self.pointer_move(doc, position, modifiers),
            PointerEvent::Up { position, modifiers } => self.pointer_up(doc, position, modifiers),
        }
    }

    /// Abandon the current gesture without committing.
    pub fn cancel(&mut self) -> Vec<Action> {
        self.reset_transient()
    }

    pub fn pointer_down(
        &mut self,
        doc: &AdDocument,
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    ) -> Vec<Action> {
        let mut actions = self.reset_transient();
        if button != MouseButton::Left {
            return actions;
        }
        self.selection.retain_existing(doc);

        if let Some(bounds) = self.transform_bounds(doc) {
            if let Some(handle) = hit_test_handles(bounds, position, self.config.handle_tolerance) {
                log::debug!("Transform started with {handle:?}");
                self.gesture = Gesture::Transforming {
                    handle,
                    start: position,
                    bounds,
                    originals: self.snapshot(doc),
                };
                return actions;
            }
        }

        if let Some(layer) = hit_test(doc, position) {
            let id = layer.id().to_string();
            if modifiers.toggles_selection() {
                self.selection.toggle(&id);
                actions.push(self.selection_changed());
                return actions;
            }
            if !self.selection.contains(&id) {
                self.selection.select_only(id.clone());
                actions.push(self.selection_changed());
            }
            if !layer.is_locked() {
                self.gesture = Gesture::Dragging {
                    primary: id,
                    start: position,
                    moved: false,
                    originals: self.snapshot(doc),
                };
            }
            return actions;
        }

        let additive = modifiers.toggles_selection();
        if !additive && !self.selection.is_empty() {
            self.selection.clear();
            actions.push(self.selection_changed());
        }
        self.gesture = Gesture::Marqueeing { start: position, additive };
        self.marquee = Some(Rect::from_points(position, position));
        actions.push(Action::MarqueeChanged(self.marquee));
        actions
    }

    pub fn pointer_move(&mut self, doc: &AdDocument, position: Point, modifiers: Modifiers) -> Vec<Action> {
        match self.gesture {
            Gesture::Idle => Vec::new(),
            Gesture::Marqueeing { start, .. } => {
                self.marquee = Some(Rect::from_points(start, position));
                vec![Action::MarqueeChanged(self.marquee)]
            }
            Gesture::Dragging { .. } => {
                if let Gesture::Dragging { moved, .. } = &mut self.gesture {
                    *moved = true;
                }
                let mut actions = Vec::new();
                let guides = self.drag_to(doc, position);
                if guides != self.guides {
                    self.guides = guides;
                    actions.push(Action::GuidesChanged(self.guides.clone()));
                }
                actions.push(Action::NodesMoved(self.nodes.clone()));
                actions
            }
            Gesture::Transforming { .. } => {
                self.transform_to(position, modifiers);
                vec![Action::NodesMoved(self.nodes.clone())]
            }
        }
    }

    pub fn pointer_up(&mut self, doc: &AdDocument, position: Point, modifiers: Modifiers) -> Vec<Action> {
        let gesture = std::mem::take(&mut self.gesture);
        let mut actions = Vec::new();
        match gesture {
            Gesture::Idle => {}
            Gesture::Marqueeing { start, additive } => {
                let hits = marquee_intersect(doc, Rect::from_points(start, position));
                if additive {
                    self.selection.extend(hits);
                } else {
                    self.selection = Selection::from(hits);
                }
                actions.push(self.selection_changed());
            }
            Gesture::Dragging {
                ref primary,
                start,
                moved,
                ref originals,
            } => {
                if moved || position != start {
                    self.gesture = gesture.clone();
                    self.drag_to(doc, position);
                    if self.nodes != *originals {
                        self.push_commit(&mut actions, commit_positions(doc, &self.nodes));
                    }
                } else if self.selection.ids() != std::slice::from_ref(primary) {
                    // A still click narrows a multi-selection to the clicked layer.
                    self.selection.select_only(primary.clone());
                    actions.push(self.selection_changed());
                }
            }
            Gesture::Transforming { ref originals, .. } => {
                self.gesture = gesture.clone();
                self.transform_to(position, modifiers);
                if self.nodes != *originals {
                    self.push_commit(&mut actions, commit_transforms(doc, &self.nodes));
                }
            }
        }
        actions.extend(self.reset_transient());
        actions
    }

    fn selection_changed(&self) -> Action {
        Action::SelectionChanged(self.selection.ids().to_vec())
    }

    fn snapshot(&self, doc: &AdDocument) -> Vec<(LayerId, NodeState)> {
        self.movable_ids(doc)
            .into_iter()
            .filter_map(|id| {
                let node = NodeState::from_base(doc.find_layer(&id)?.base());
                Some((id, node))
            })
            .collect()
    }

    /// Move the dragged nodes so the primary layer follows the pointer,
    /// snapped. Returns the guides for this position.
    fn drag_to(&mut self, doc: &AdDocument, position: Point) -> Vec<Guide> {
        let Gesture::Dragging {
            primary,
            start,
            originals,
            ..
        } = &self.gesture
        else {
            return Vec::new();
        };
        let Some((_, origin)) = originals.iter().find(|(id, _)| id == primary) else {
            return Vec::new();
        };
        let Some(layer) = doc.find_layer(primary) else {
            return Vec::new();
        };
        let moving: Vec<LayerId> = originals.iter().map(|(id, _)| id.clone()).collect();
        let proposed = origin.position() + (position - *start);
        let snapped = snap_drag(layer.base(), proposed, doc, &moving, &self.config.snap);
        let delta = snapped.position() - origin.position();
        self.nodes = originals
            .iter()
            .map(|(id, node)| {
                let moved = NodeState {
                    x: node.x + delta.x,
                    y: node.y + delta.y,
                    ..*node
                };
                (id.clone(), moved)
            })
            .collect();
        snapped.guides
    }

    fn transform_to(&mut self, position: Point, modifiers: Modifiers) {
        let Gesture::Transforming {
            handle,
            start,
            bounds,
            originals,
        } = &self.gesture
        else {
            return;
        };
        self.nodes = match handle {
            HandleKind::Rotate => {
                let center = bounds.center();
                let mut degrees = rotation_delta(center, *start, position);
                if modifiers.constrains() {
                    if let Some((_, first)) = originals.first() {
                        let target = snap_angle(first.rotation + degrees, self.config.rotation_snap_degrees);
                        degrees = target - first.rotation;
                    }
                }
                originals
                    .iter()
                    .map(|(id, node)| (id.clone(), node.rotated_about(center, degrees)))
                    .collect()
            }
            HandleKind::Corner(_) | HandleKind::Edge(_) => {
                let target = resize_box(
                    *bounds,
                    *handle,
                    position - *start,
                    modifiers.constrains(),
                    self.config.min_layer_size,
                );
                match originals.as_slice() {
                    [(id, node)] if node.is_rotated() => vec![(
                        id.clone(),
                        node.resized_local(*handle, position - *start, modifiers.constrains(), self.config.min_layer_size),
                    )],
                    // Rotated members of a larger selection follow the box without resizing.
                    _ => originals
                        .iter()
                        .map(|(id, node)| {
                            let next = if node.is_rotated() {
                                node.translated_within(*bounds, target)
                            } else {
                                node.scaled_within(*bounds, target)
                            };
                            (id.clone(), next)
                        })
                        .collect(),
                }
            }
        };
    }

    fn push_commit(&self, actions: &mut Vec<Action>, result: DocumentResult<AdDocument>) {
        match result {
            Ok(doc) => {
                log::debug!("Committed gesture on {} layers", self.nodes.len());
                actions.push(Action::Commit(doc));
            }
            Err(err) => log::warn!("Dropped gesture commit: {err}"),
        }
    }

    /// Clear guides, marquee, live nodes and the gesture.
    fn reset_transient(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if !self.guides.is_empty() {
            self.guides.clear();
            actions.push(Action::GuidesChanged(Vec::new()));
        }
        if self.marquee.take().is_some() {
            actions.push(Action::MarqueeChanged(None));
        }
        self.nodes.clear();
        self.gesture = Gesture::Idle;
        actions
    }
}

fn commit_positions(doc: &AdDocument, nodes: &[(LayerId, NodeState)]) -> DocumentResult<AdDocument> {
    let patches: Vec<(&str, LayerPatch)> = nodes
        .iter()
        .map(|(id, node)| (id.as_str(), LayerPatch::position(node.x, node.y)))
        .collect();
    doc.with_patches(patches.iter().map(|(id, patch)| (*id, patch)))
}

fn commit_transforms(doc: &AdDocument, nodes: &[(LayerId, NodeState)]) -> DocumentResult<AdDocument> {
    let mut next = doc.clone();
    for (id, node) in nodes {
        let Some(layer) = doc.find_layer(id) else {
            continue;
        };
        next = next.with_transform(id, &bake_transform(layer, node))?;
    }
    Ok(next)
}

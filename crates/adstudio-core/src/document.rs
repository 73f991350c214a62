//! Ad document and copy-on-write editing operations.
//!
//! An [`AdDocument`] is treated as immutable per revision: every edit
//! returns a new document and leaves the receiver untouched, so an external
//! history layer can keep old revisions by reference.

use crate::error::{DocumentError, DocumentResult};
use crate::layers::{
    new_layer_id, CssColor, GroupLayer, Layer, LayerBase, LayerId, MIN_LAYER_SIZE,
};
use kurbo::{Rect, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Offset applied to duplicated layers so the copy is visible.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Insets of the region guaranteed not to be covered by platform chrome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafeArea {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl SafeArea {
    /// 5% margins on top, left and right and 10% at the bottom, rounded to
    /// whole units.
    pub fn proportional(width: f64, height: f64) -> Self {
        Self {
            top: (height * 0.05).round(),
            right: (width * 0.05).round(),
            bottom: (height * 0.1).round(),
            left: (width * 0.05).round(),
        }
    }

    /// The safe region of a canvas of the given size.
    pub fn inner_rect(&self, size: Size) -> Rect {
        Rect::new(self.left, self.top, size.width - self.right, size.height - self.bottom)
    }
}

/// Field patch from the property panel or a drag commit.
///
/// `None` leaves the field unchanged. Text-only fields are ignored on
/// variants that have no text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerPatch {
    pub name: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub opacity: Option<f64>,
    pub visible: Option<bool>,
    pub locked: Option<bool>,
    pub z_index: Option<i32>,
    pub text: Option<String>,
    pub font_size: Option<f64>,
}

impl LayerPatch {
    /// A patch that only moves the layer.
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    fn apply(&self, layer: &mut Layer) {
        let base = layer.base_mut();
        if let Some(name) = &self.name {
            base.name = name.clone();
        }
        if let Some(x) = self.x {
            base.x = x;
        }
        if let Some(y) = self.y {
            base.y = y;
        }
        if let Some(width) = self.width {
            base.width = width.max(MIN_LAYER_SIZE);
        }
        if let Some(height) = self.height {
            base.height = height.max(MIN_LAYER_SIZE);
        }
        if let Some(rotation) = self.rotation {
            base.rotation = rotation;
        }
        if let Some(opacity) = self.opacity {
            base.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(visible) = self.visible {
            base.visible = visible;
        }
        if let Some(locked) = self.locked {
            base.locked = locked;
        }
        if let Some(z_index) = self.z_index {
            base.z_index = z_index;
        }
        if let Some(size) = self.font_size {
            layer.set_font_size(size);
        }
        if let Some(text) = &self.text {
            match layer {
                Layer::Text(t) => t.text = text.clone(),
                Layer::Cta(c) => c.text = text.clone(),
                Layer::Shape(_) | Layer::Image(_) | Layer::Group(_) => {}
            }
        }
    }
}

/// Result of baking a transform: explicit geometry with unit scale.
///
/// `children` is only present for groups, holding the rescaled subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformPatch {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Layer>>,
}

/// A canvas-sized composition of layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdDocument {
    pub id: String,
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub background_color: CssColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safe_area: Option<SafeArea>,
    /// Storage order; paint order comes from `z_index`.
    pub layers: Vec<Layer>,
}

impl AdDocument {
    /// Create an empty white document.
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            width,
            height,
            background_color: CssColor::new("#ffffff"),
            safe_area: None,
            layers: Vec::new(),
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The canvas bounds `(0, 0, width, height)`.
    pub fn canvas_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Find a layer by ID, searching group children recursively.
    pub fn find_layer(&self, id: &str) -> Option<&Layer> {
        for layer in &self.layers {
            if layer.id() == id {
                return Some(layer);
            }
            if let Layer::Group(group) = layer {
                if let Some(found) = group.find_layer(id) {
                    return Some(found);
                }
            }
        }
        None
    }

    fn find_layer_mut(&mut self, id: &str) -> Option<&mut Layer> {
        for layer in &mut self.layers {
            if layer.id() == id {
                return Some(layer);
            }
            if let Layer::Group(group) = layer {
                if let Some(found) = group.find_layer_mut(id) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Whether the layer sits directly on the canvas (not inside a group).
    pub fn is_top_level(&self, id: &str) -> bool {
        self.layers.iter().any(|l| l.id() == id)
    }

    /// Top-level layers bottom to top: ascending z-index, ties in storage
    /// order.
    pub fn paint_order(&self) -> Vec<&Layer> {
        let mut ordered: Vec<&Layer> = self.layers.iter().collect();
        ordered.sort_by_key(|l| l.z_index());
        ordered
    }

    /// Z-index a newly added top-level layer receives.
    pub fn next_z_index(&self) -> i32 {
        self.layers.iter().map(Layer::z_index).max().map_or(0, |z| z + 1)
    }

    /// Every ID in the tree, depth first.
    pub fn all_ids(&self) -> Vec<LayerId> {
        self.layers.iter().flat_map(Layer::all_ids).collect()
    }

    /// Check tree-wide ID uniqueness and minimum layer sizes.
    pub fn validate(&self) -> DocumentResult<()> {
        let mut seen = HashSet::new();
        for id in self.all_ids() {
            if !seen.insert(id.clone()) {
                return Err(DocumentError::DuplicateId(id));
            }
        }
        let mut stack: Vec<&Layer> = self.layers.iter().collect();
        while let Some(layer) = stack.pop() {
            let base = layer.base();
            if base.width < MIN_LAYER_SIZE || base.height < MIN_LAYER_SIZE {
                return Err(DocumentError::InvalidDimensions {
                    id: base.id.clone(),
                    width: base.width,
                    height: base.height,
                });
            }
            if let Layer::Group(group) = layer {
                stack.extend(group.children.iter());
            }
        }
        Ok(())
    }

    /// Add a top-level layer on top of the stack (`z_index = max + 1`).
    pub fn with_layer(&self, mut layer: Layer) -> DocumentResult<Self> {
        let existing: HashSet<LayerId> = self.all_ids().into_iter().collect();
        if let Some(dup) = layer.all_ids().into_iter().find(|id| existing.contains(id)) {
            log::warn!("Rejected layer with duplicate id {dup}");
            return Err(DocumentError::DuplicateId(dup));
        }
        let mut doc = self.clone();
        layer.base_mut().z_index = self.next_z_index();
        doc.layers.push(layer);
        Ok(doc)
    }

    /// Apply a field patch to one layer.
    pub fn with_patch(&self, id: &str, patch: &LayerPatch) -> DocumentResult<Self> {
        self.with_patches([(id, patch)])
    }

    /// Apply several field patches as one revision.
    pub fn with_patches<'a, I>(&self, patches: I) -> DocumentResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a LayerPatch)>,
    {
        let mut doc = self.clone();
        for (id, patch) in patches {
            let layer = doc
                .find_layer_mut(id)
                .ok_or_else(|| DocumentError::LayerNotFound(id.to_string()))?;
            patch.apply(layer);
        }
        Ok(doc)
    }

    /// Commit a baked transform.
    pub fn with_transform(&self, id: &str, patch: &TransformPatch) -> DocumentResult<Self> {
        let mut doc = self.clone();
        let layer = doc
            .find_layer_mut(id)
            .ok_or_else(|| DocumentError::LayerNotFound(id.to_string()))?;
        let base = layer.base_mut();
        base.x = patch.x;
        base.y = patch.y;
        base.rotation = patch.rotation;
        base.width = patch.width.max(MIN_LAYER_SIZE);
        base.height = patch.height.max(MIN_LAYER_SIZE);
        if let (Layer::Group(group), Some(children)) = (layer, &patch.children) {
            group.children = children.clone();
        }
        Ok(doc)
    }

    /// Remove a layer (and its subtree, for groups).
    pub fn without_layer(&self, id: &str) -> DocumentResult<Self> {
        let mut doc = self.clone();
        if let Some(pos) = doc.layers.iter().position(|l| l.id() == id) {
            doc.layers.remove(pos);
            return Ok(doc);
        }
        doc.layers
            .iter_mut()
            .filter_map(Layer::as_group_mut)
            .find_map(|group| group.remove_layer(id))
            .ok_or_else(|| DocumentError::LayerNotFound(id.to_string()))?;
        Ok(doc)
    }

    /// Duplicate a top-level layer. The copy gets fresh IDs for its whole
    /// subtree, a " (Copy)" suffix, a small offset and the top z-index.
    pub fn with_duplicate(&self, id: &str) -> DocumentResult<(Self, LayerId)> {
        let source = self.top_level(id)?;
        let mut copy = source.clone();
        copy.regenerate_ids();
        let base = copy.base_mut();
        base.name = format!("{} (Copy)", base.name);
        base.x += DUPLICATE_OFFSET;
        base.y += DUPLICATE_OFFSET;
        let new_id = base.id.clone();
        Ok((self.with_layer(copy)?, new_id))
    }

    /// Toggle a layer's visibility.
    pub fn with_visibility_toggled(&self, id: &str) -> DocumentResult<Self> {
        let visible = self.require(id)?.is_visible();
        self.with_patch(id, &LayerPatch { visible: Some(!visible), ..LayerPatch::default() })
    }

    /// Toggle a layer's lock.
    pub fn with_lock_toggled(&self, id: &str) -> DocumentResult<Self> {
        let locked = self.require(id)?.is_locked();
        self.with_patch(id, &LayerPatch { locked: Some(!locked), ..LayerPatch::default() })
    }

    /// Move a layer above all of its siblings.
    pub fn bring_to_front(&self, id: &str) -> DocumentResult<Self> {
        self.restack(id, |siblings| siblings.iter().map(Layer::z_index).max().map_or(0, |z| z + 1))
    }

    /// Move a layer below all of its siblings.
    pub fn send_to_back(&self, id: &str) -> DocumentResult<Self> {
        self.restack(id, |siblings| siblings.iter().map(Layer::z_index).min().map_or(0, |z| z - 1))
    }

    fn restack(&self, id: &str, z_for: impl Fn(&[Layer]) -> i32) -> DocumentResult<Self> {
        let mut doc = self.clone();
        let siblings = container_mut(&mut doc.layers, id)
            .ok_or_else(|| DocumentError::LayerNotFound(id.to_string()))?;
        let z = z_for(siblings);
        if let Some(layer) = siblings.iter_mut().find(|l| l.id() == id) {
            layer.base_mut().z_index = z;
        }
        Ok(doc)
    }

    /// Group top-level layers into a new group.
    ///
    /// The group's origin is the top-left of the members' combined bounding
    /// box and children are stored relative to it. Returns the new group ID.
    pub fn grouped(&self, ids: &[LayerId]) -> DocumentResult<(Self, LayerId)> {
        let unique: Vec<&LayerId> = {
            let mut seen = HashSet::new();
            ids.iter().filter(|id| seen.insert(id.as_str())).collect()
        };
        if unique.len() < 2 {
            return Err(DocumentError::GroupTooSmall(unique.len()));
        }
        for id in &unique {
            self.top_level(id)?;
        }

        let mut doc = self.clone();
        let insert_at = doc
            .layers
            .iter()
            .position(|l| unique.iter().any(|id| l.id() == id.as_str()))
            .unwrap_or(doc.layers.len());
        let (mut members, rest): (Vec<Layer>, Vec<Layer>) = doc
            .layers
            .into_iter()
            .partition(|l| unique.iter().any(|id| l.id() == id.as_str()));
        members.sort_by_key(Layer::z_index);

        let group = GroupLayer::enclose(LayerBase::new("Group", 0.0, 0.0, 0.0, 0.0), members);
        let group_id = group.base.id.clone();
        log::debug!("Grouped {} layers into {group_id}", group.children.len());
        doc.layers = rest;
        doc.layers.insert(insert_at.min(doc.layers.len()), Layer::Group(group));
        Ok((doc, group_id))
    }

    /// Dissolve a group into its parent, converting children back to the
    /// parent's coordinates.
    ///
    /// Children take consecutive z-indices starting at the group's, and
    /// siblings above the group are shifted up to make room.
    pub fn ungrouped(&self, id: &str) -> DocumentResult<(Self, Vec<LayerId>)> {
        if !self.require(id)?.is_group() {
            return Err(DocumentError::NotAGroup(id.to_string()));
        }
        let mut doc = self.clone();
        let siblings = container_mut(&mut doc.layers, id)
            .ok_or_else(|| DocumentError::LayerNotFound(id.to_string()))?;
        let pos = siblings
            .iter()
            .position(|l| l.id() == id)
            .ok_or_else(|| DocumentError::LayerNotFound(id.to_string()))?;
        let Layer::Group(group) = siblings.remove(pos) else {
            return Err(DocumentError::NotAGroup(id.to_string()));
        };

        let group_z = group.base.z_index;
        let mut children = group.release();
        children.sort_by_key(Layer::z_index);
        let shift = children.len().saturating_sub(1) as i32;
        for sibling in siblings.iter_mut() {
            if sibling.z_index() > group_z {
                sibling.base_mut().z_index += shift;
            }
        }
        let mut child_ids = Vec::with_capacity(children.len());
        for (i, mut child) in children.into_iter().enumerate() {
            child.base_mut().z_index = group_z + i as i32;
            child_ids.push(child.id().to_string());
            siblings.insert(pos + i, child);
        }
        log::debug!("Ungrouped {id} into {} layers", child_ids.len());
        Ok((doc, child_ids))
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> DocumentResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize and validate a document from JSON.
    pub fn from_json(json: &str) -> DocumentResult<Self> {
        let doc: Self = serde_json::from_str(json)?;
        doc.validate()?;
        Ok(doc)
    }

    fn require(&self, id: &str) -> DocumentResult<&Layer> {
        self.find_layer(id)
            .ok_or_else(|| DocumentError::LayerNotFound(id.to_string()))
    }

    fn top_level(&self, id: &str) -> DocumentResult<&Layer> {
        match self.layers.iter().find(|l| l.id() == id) {
            Some(layer) => Ok(layer),
            None if self.find_layer(id).is_some() => Err(DocumentError::NotTopLevel(id.to_string())),
            None => Err(DocumentError::LayerNotFound(id.to_string())),
        }
    }
}

/// The sibling list that directly contains `id`.
fn container_mut<'a>(layers: &'a mut Vec<Layer>, id: &str) -> Option<&'a mut Vec<Layer>> {
    if layers.iter().any(|l| l.id() == id) {
        return Some(layers);
    }
    layers
        .iter_mut()
        .filter_map(Layer::as_group_mut)
        .find_map(|group| container_mut(&mut group.children, id))
}

/// Generate a fresh ID that does not collide with `doc`.
pub fn unique_layer_id(doc: &AdDocument) -> LayerId {
    loop {
        let id = new_layer_id();
        if doc.find_layer(&id).is_none() {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{ShapeLayer, TextLayer};

    fn rect(id: &str, x: f64, y: f64, w: f64, h: f64, z: i32) -> Layer {
        Layer::Shape(ShapeLayer::rectangle(
            LayerBase::new(id, x, y, w, h).with_id(id).with_z_index(z),
        ))
    }

    fn doc_with(layers: Vec<Layer>) -> AdDocument {
        let mut doc = AdDocument::new("Test", 1080.0, 1080.0);
        doc.layers = layers;
        doc
    }

    #[test]
    fn test_document_creation() {
        let doc = AdDocument::new("Promo", 1080.0, 1350.0);
        assert!(doc.is_empty());
        assert_eq!(doc.size(), Size::new(1080.0, 1350.0));
    }

    #[test]
    fn test_with_layer_assigns_top_z_and_keeps_original() {
        let doc = doc_with(vec![rect("a", 0.0, 0.0, 10.0, 10.0, 4)]);
        let next = doc.with_layer(rect("b", 0.0, 0.0, 10.0, 10.0, 0)).unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(next.len(), 2);
        assert_eq!(next.find_layer("b").unwrap().z_index(), 5);
    }

    #[test]
    fn test_with_layer_rejects_duplicate_nested_id() {
        let group = Layer::Group(GroupLayer::new(
            LayerBase::new("g", 0.0, 0.0, 100.0, 100.0).with_id("g"),
            vec![rect("child", 0.0, 0.0, 10.0, 10.0, 0)],
        ));
        let doc = doc_with(vec![group]);
        let err = doc.with_layer(rect("child", 0.0, 0.0, 10.0, 10.0, 0)).unwrap_err();
        assert!(matches!(err, DocumentError::DuplicateId(id) if id == "child"));
    }

    #[test]
    fn test_find_layer_nested() {
        let inner = Layer::Group(GroupLayer::new(
            LayerBase::new("inner", 0.0, 0.0, 50.0, 50.0).with_id("inner"),
            vec![rect("deep", 1.0, 2.0, 10.0, 10.0, 0)],
        ));
        let outer = Layer::Group(GroupLayer::new(
            LayerBase::new("outer", 0.0, 0.0, 100.0, 100.0).with_id("outer"),
            vec![inner],
        ));
        let doc = doc_with(vec![outer]);
        assert_eq!(doc.find_layer("deep").map(|l| l.base().y), Some(2.0));
        assert!(doc.find_layer("nope").is_none());
        assert!(!doc.is_top_level("deep"));
    }

    #[test]
    fn test_paint_order_ties_keep_storage_order() {
        let doc = doc_with(vec![
            rect("top", 0.0, 0.0, 10.0, 10.0, 9),
            rect("tie1", 0.0, 0.0, 10.0, 10.0, 1),
            rect("tie2", 0.0, 0.0, 10.0, 10.0, 1),
            rect("bottom", 0.0, 0.0, 10.0, 10.0, -3),
        ]);
        let ids: Vec<&str> = doc.paint_order().iter().map(|l| l.id()).collect();
        assert_eq!(ids, ["bottom", "tie1", "tie2", "top"]);
    }

    #[test]
    fn test_patch_floors_size_and_ignores_inapplicable_font() {
        let doc = doc_with(vec![rect("a", 0.0, 0.0, 100.0, 100.0, 0)]);
        let patch = LayerPatch {
            width: Some(1.0),
            font_size: Some(30.0),
            ..LayerPatch::default()
        };
        let next = doc.with_patch("a", &patch).unwrap();
        let layer = next.find_layer("a").unwrap();
        assert!((layer.base().width - MIN_LAYER_SIZE).abs() < f64::EPSILON);
        assert_eq!(layer.font_size(), None);
    }

    #[test]
    fn test_patch_text_fields() {
        let text = Layer::Text(TextLayer::new(
            LayerBase::new("Headline", 0.0, 0.0, 500.0, 80.0).with_id("t"),
            "Old",
            "Inter",
            "#000".into(),
        ));
        let doc = doc_with(vec![text]);
        let patch = LayerPatch {
            text: Some("New".into()),
            font_size: Some(64.0),
            ..LayerPatch::default()
        };
        let next = doc.with_patch("t", &patch).unwrap();
        match next.find_layer("t") {
            Some(Layer::Text(t)) => {
                assert_eq!(t.text, "New");
                assert!((t.font_size - 64.0).abs() < f64::EPSILON);
            }
            other => panic!("Expected text layer, got {other:?}"),
        }
    }

    #[test]
    fn test_patch_unknown_layer() {
        let doc = doc_with(vec![]);
        let err = doc.with_patch("ghost", &LayerPatch::position(1.0, 1.0)).unwrap_err();
        assert!(matches!(err, DocumentError::LayerNotFound(_)));
    }

    #[test]
    fn test_without_layer_cascades() {
        let group = Layer::Group(GroupLayer::new(
            LayerBase::new("g", 0.0, 0.0, 100.0, 100.0).with_id("g"),
            vec![rect("child", 0.0, 0.0, 10.0, 10.0, 0)],
        ));
        let doc = doc_with(vec![group, rect("other", 0.0, 0.0, 10.0, 10.0, 1)]);

        let next = doc.without_layer("g").unwrap();
        assert!(next.find_layer("child").is_none());
        assert_eq!(next.len(), 1);

        let nested = doc.without_layer("child").unwrap();
        assert!(nested.find_layer("g").unwrap().as_group().unwrap().children.is_empty());

        assert!(doc.without_layer("ghost").is_err());
    }

    #[test]
    fn test_duplicate_offsets_and_renames() {
        let doc = doc_with(vec![rect("a", 10.0, 10.0, 50.0, 50.0, 2)]);
        let (next, copy_id) = doc.with_duplicate("a").unwrap();
        let copy = next.find_layer(&copy_id).unwrap();
        assert_ne!(copy_id, "a");
        assert_eq!(copy.base().name, "a (Copy)");
        assert_eq!((copy.base().x, copy.base().y), (30.0, 30.0));
        assert_eq!(copy.z_index(), 3);
    }

    #[test]
    fn test_toggles() {
        let doc = doc_with(vec![rect("a", 0.0, 0.0, 10.0, 10.0, 0)]);
        let hidden = doc.with_visibility_toggled("a").unwrap();
        assert!(!hidden.find_layer("a").unwrap().is_visible());
        let locked = doc.with_lock_toggled("a").unwrap();
        assert!(locked.find_layer("a").unwrap().is_locked());
    }

    #[test]
    fn test_z_order_moves() {
        let doc = doc_with(vec![
            rect("a", 0.0, 0.0, 10.0, 10.0, 0),
            rect("b", 0.0, 0.0, 10.0, 10.0, 1),
            rect("c", 0.0, 0.0, 10.0, 10.0, 2),
        ]);
        let front = doc.bring_to_front("a").unwrap();
        let ids: Vec<&str> = front.paint_order().iter().map(|l| l.id()).collect();
        assert_eq!(ids, ["b", "c", "a"]);

        let back = doc.send_to_back("c").unwrap();
        let ids: Vec<&str> = back.paint_order().iter().map(|l| l.id()).collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }

    #[test]
    fn test_group_and_ungroup() {
        let doc = doc_with(vec![
            rect("a", 100.0, 100.0, 100.0, 50.0, 0),
            rect("b", 300.0, 250.0, 50.0, 50.0, 1),
            rect("c", 0.0, 0.0, 10.0, 10.0, 2),
        ]);
        let (grouped, group_id) = doc.grouped(&["a".into(), "b".into()]).unwrap();
        assert_eq!(grouped.len(), 2);
        let group = grouped.find_layer(&group_id).unwrap();
        assert_eq!(group.base().rect(), Rect::new(100.0, 100.0, 350.0, 300.0));
        assert_eq!(group.z_index(), 1);
        assert_eq!(grouped.find_layer("b").unwrap().base().x, 200.0);

        let (ungrouped, children) = grouped.ungrouped(&group_id).unwrap();
        assert_eq!(children, ["a", "b"]);
        assert_eq!(ungrouped.find_layer("b").unwrap().base().rect(), Rect::new(300.0, 250.0, 350.0, 300.0));
        let ids: Vec<&str> = ungrouped.paint_order().iter().map(|l| l.id()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert!(ungrouped.validate().is_ok());
    }

    #[test]
    fn test_group_errors() {
        let group = Layer::Group(GroupLayer::new(
            LayerBase::new("g", 0.0, 0.0, 100.0, 100.0).with_id("g"),
            vec![rect("child", 0.0, 0.0, 10.0, 10.0, 0)],
        ));
        let doc = doc_with(vec![group, rect("a", 0.0, 0.0, 10.0, 10.0, 1)]);
        assert!(matches!(doc.grouped(&["a".into()]), Err(DocumentError::GroupTooSmall(1))));
        assert!(matches!(doc.grouped(&["a".into(), "a".into()]), Err(DocumentError::GroupTooSmall(1))));
        assert!(matches!(
            doc.grouped(&["a".into(), "child".into()]),
            Err(DocumentError::NotTopLevel(_))
        ));
        assert!(matches!(doc.ungrouped("a"), Err(DocumentError::NotAGroup(_))));
    }

    #[test]
    fn test_validate_rejects_small_layers() {
        let doc = doc_with(vec![rect("a", 0.0, 0.0, 2.0, 10.0, 0)]);
        assert!(matches!(doc.validate(), Err(DocumentError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_json_round_trip() {
        let mut doc = doc_with(vec![rect("a", 10.0, 20.0, 30.0, 40.0, 0)]);
        doc.safe_area = Some(SafeArea::proportional(1080.0, 1080.0));
        let json = doc.to_json().unwrap();
        assert!(json.contains("\"backgroundColor\""));
        let back = AdDocument::from_json(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_safe_area_proportional() {
        let area = SafeArea::proportional(1080.0, 1350.0);
        assert_eq!(area, SafeArea { top: 68.0, right: 54.0, bottom: 135.0, left: 54.0 });
        assert_eq!(area.inner_rect(Size::new(1080.0, 1350.0)), Rect::new(54.0, 68.0, 1026.0, 1215.0));
    }

    #[test]
    fn test_unique_layer_id() {
        let doc = doc_with(vec![rect("a", 0.0, 0.0, 10.0, 10.0, 0)]);
        let id = unique_layer_id(&doc);
        assert!(doc.find_layer(&id).is_none());
    }
}

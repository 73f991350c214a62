//! Group layer combining several layers into one unit.

use super::{Layer, LayerBase, MIN_LAYER_SIZE};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A group of layers manipulated as a single unit.
///
/// Child coordinates are local to the group's origin. Groups can contain
/// other groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupLayer {
    #[serde(flatten)]
    pub base: LayerBase,
    pub children: Vec<Layer>,
}

impl GroupLayer {
    pub fn new(base: LayerBase, children: Vec<Layer>) -> Self {
        Self { base, children }
    }

    /// Build a group around layers given in document coordinates.
    ///
    /// The group origin is the top-left corner of the union of the
    /// members' rotated bounding boxes; members are re-expressed relative to
    /// it. The group itself starts unrotated and takes the highest member
    /// z-index.
    pub fn enclose(mut base: LayerBase, members: Vec<Layer>) -> Self {
        let bounds = members
            .iter()
            .map(Layer::client_rect)
            .reduce(|a, b| a.union(b))
            .unwrap_or(Rect::ZERO);
        base.x = bounds.x0;
        base.y = bounds.y0;
        base.width = bounds.width().max(MIN_LAYER_SIZE);
        base.height = bounds.height().max(MIN_LAYER_SIZE);
        base.rotation = 0.0;
        base.z_index = members.iter().map(Layer::z_index).max().unwrap_or(base.z_index);
        let children = members
            .into_iter()
            .map(|mut child| {
                let b = child.base_mut();
                b.x -= bounds.x0;
                b.y -= bounds.y0;
                child
            })
            .collect();
        Self { base, children }
    }

    /// Dissolve the group, returning its children in the parent's
    /// coordinate space. The group's rotation is folded into each child.
    pub fn release(self) -> Vec<Layer> {
        let transform = self.base.transform();
        let rotation = self.base.rotation;
        self.children
            .into_iter()
            .map(|mut child| {
                let b = child.base_mut();
                let origin = transform * Point::new(b.x, b.y);
                b.x = origin.x;
                b.y = origin.y;
                b.rotation += rotation;
                child
            })
            .collect()
    }

    pub fn children(&self) -> &[Layer] {
        &self.children
    }

    /// Children with geometry multiplied by `(sx, sy)`, recursively.
    pub fn scaled_children(&self, sx: f64, sy: f64) -> Vec<Layer> {
        self.children.iter().map(|child| child.scaled(sx, sy)).collect()
    }

    /// Find a layer by ID among the descendants.
    pub fn find_layer(&self, id: &str) -> Option<&Layer> {
        for child in &self.children {
            if child.id() == id {
                return Some(child);
            }
            if let Layer::Group(group) = child {
                if let Some(found) = group.find_layer(id) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Find a mutable layer by ID among the descendants.
    pub fn find_layer_mut(&mut self, id: &str) -> Option<&mut Layer> {
        for child in &mut self.children {
            if child.id() == id {
                return Some(child);
            }
            if let Layer::Group(group) = child {
                if let Some(found) = group.find_layer_mut(id) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Remove a descendant by ID (cascading if it is a group).
    pub fn remove_layer(&mut self, id: &str) -> Option<Layer> {
        if let Some(pos) = self.children.iter().position(|c| c.id() == id) {
            return Some(self.children.remove(pos));
        }
        self.children
            .iter_mut()
            .filter_map(Layer::as_group_mut)
            .find_map(|group| group.remove_layer(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{ShapeLayer, TextLayer};

    fn rect(id: &str, x: f64, y: f64, w: f64, h: f64) -> Layer {
        Layer::Shape(ShapeLayer::rectangle(LayerBase::new(id, x, y, w, h).with_id(id)))
    }

    fn group_base() -> LayerBase {
        LayerBase::new("Group", 0.0, 0.0, 0.0, 0.0).with_id("g")
    }

    #[test]
    fn test_enclose_makes_children_local() {
        let group = GroupLayer::enclose(
            group_base(),
            vec![rect("a", 100.0, 50.0, 100.0, 50.0), rect("b", 300.0, 200.0, 50.0, 100.0)],
        );
        assert_eq!(group.base.rect(), Rect::new(100.0, 50.0, 350.0, 300.0));
        assert_eq!(group.children[0].base().rect(), Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(group.children[1].base().rect(), Rect::new(200.0, 150.0, 250.0, 250.0));
    }

    #[test]
    fn test_release_restores_absolute_positions() {
        let members = vec![rect("a", 100.0, 50.0, 100.0, 50.0), rect("b", 300.0, 200.0, 50.0, 100.0)];
        let group = GroupLayer::enclose(group_base(), members.clone());
        let released = group.release();
        for (before, after) in members.iter().zip(&released) {
            assert!((before.base().x - after.base().x).abs() < 1e-9);
            assert!((before.base().y - after.base().y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_release_folds_group_rotation() {
        let mut group = GroupLayer::enclose(group_base(), vec![rect("a", 0.0, 0.0, 10.0, 10.0), rect("b", 100.0, 0.0, 10.0, 10.0)]);
        group.base.rotation = 90.0;
        let released = group.release();
        let b = released[1].base();
        assert!(b.x.abs() < 1e-9);
        assert!((b.y - 100.0).abs() < 1e-9);
        assert!((b.rotation - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scaled_children_fold_fonts_and_nesting() {
        let text = Layer::Text(
            TextLayer::new(LayerBase::new("t", 10.0, 20.0, 100.0, 40.0).with_id("t"), "Hi", "Inter", "#000".into())
                .with_font_size(20.0),
        );
        let inner = Layer::Group(GroupLayer::new(
            LayerBase::new("inner", 50.0, 50.0, 40.0, 40.0).with_id("inner"),
            vec![rect("r", 10.0, 10.0, 20.0, 20.0)],
        ));
        let group = GroupLayer::new(group_base(), vec![text, inner]);

        let children = group.scaled_children(2.0, 1.5);
        let t = children[0].base();
        assert_eq!((t.x, t.y, t.width, t.height), (20.0, 30.0, 200.0, 60.0));
        assert_eq!(children[0].font_size(), Some(40.0));

        let inner = children[1].as_group().unwrap();
        assert_eq!(inner.base.rect(), Rect::new(100.0, 75.0, 180.0, 135.0));
        assert_eq!(inner.children[0].base().rect(), Rect::new(20.0, 15.0, 60.0, 45.0));
    }

    #[test]
    fn test_find_and_remove_nested() {
        let inner = Layer::Group(GroupLayer::new(
            LayerBase::new("inner", 0.0, 0.0, 40.0, 40.0).with_id("inner"),
            vec![rect("deep", 0.0, 0.0, 20.0, 20.0)],
        ));
        let mut group = GroupLayer::new(group_base(), vec![rect("a", 0.0, 0.0, 10.0, 10.0), inner]);

        assert!(group.find_layer("deep").is_some());
        assert!(group.remove_layer("deep").is_some());
        assert!(group.find_layer("deep").is_none());
        assert!(group.remove_layer("missing").is_none());
    }
}

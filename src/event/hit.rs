use crate::foundation::core::{Affine, Point, Rect, box_contains};
use crate::foundation::ids::ActorId;
use crate::scene::graph::SceneGraph;

impl SceneGraph {
    /// Deepest reactive actor under a stage point, testing front to back.
    ///
    /// Children are tested before their parent and later siblings before earlier ones, so
    /// the topmost painted actor wins. The point is mapped into each actor's local space, so
    /// scale and rotation are honored. Hidden subtrees are skipped and a subtree clipped to
    /// its allocation only matches inside it.
    pub fn pick(&self, point: Point) -> Option<ActorId> {
        self.pick_in(self.root, Affine::IDENTITY, point)
    }

    fn pick_in(&self, id: ActorId, parent_space: Affine, point: Point) -> Option<ActorId> {
        let node = self.node(id)?;
        if !node.visible {
            return None;
        }
        let to_stage = parent_space * Self::local_transform(node);
        if to_stage.determinant().abs() < 1e-12 {
            return None;
        }
        let local = to_stage.inverse() * point;
        let inside = box_contains(
            Rect::from_origin_size(Point::ORIGIN, node.allocation.size()),
            local,
        );
        if node.clip_to_allocation && !inside {
            return None;
        }

        let children_space = to_stage * Affine::translate((-node.scroll_x, -node.scroll_y));
        for &child in node.children.iter().rev() {
            if let Some(hit) = self.pick_in(child, children_space, point) {
                return Some(hit);
            }
        }
        (inside && node.reactive).then_some(id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/event/hit.rs"]
mod tests;

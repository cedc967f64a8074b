use std::any::Any;

use crate::foundation::core::{ActorBox, box_from_origin_size};
use crate::foundation::error::StageResult;
use crate::foundation::ids::ActorId;
use crate::layout::{LayoutManager, SizeRequest, unknown_property};
use crate::scene::graph::SceneGraph;

/// Places every child at its fixed position with its natural size.
///
/// This is the default layout of every actor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixedLayout;

impl LayoutManager for FixedLayout {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn preferred_width(
        &self,
        graph: &SceneGraph,
        container: ActorId,
        _for_height: Option<f64>,
    ) -> SizeRequest {
        let mut req = SizeRequest::default();
        for child in graph.visible_children(container) {
            let Some(n) = graph.node(child) else {
                continue;
            };
            let w = graph.child_width(child, None);
            req = req.max(SizeRequest {
                min: n.fixed_x + w.min,
                natural: n.fixed_x + w.natural,
            });
        }
        req
    }

    fn preferred_height(
        &self,
        graph: &SceneGraph,
        container: ActorId,
        _for_width: Option<f64>,
    ) -> SizeRequest {
        let mut req = SizeRequest::default();
        for child in graph.visible_children(container) {
            let Some(n) = graph.node(child) else {
                continue;
            };
            let h = graph.child_height(child, None);
            req = req.max(SizeRequest {
                min: n.fixed_y + h.min,
                natural: n.fixed_y + h.natural,
            });
        }
        req
    }

    fn allocate(
        &self,
        graph: &SceneGraph,
        container: ActorId,
        content: ActorBox,
    ) -> Vec<(ActorId, ActorBox)> {
        graph
            .visible_children(container)
            .into_iter()
            .filter_map(|child| {
                let n = graph.node(child)?;
                let w = graph.child_width(child, None).natural;
                let h = graph.child_height(child, Some(w)).natural;
                Some((
                    child,
                    box_from_origin_size(content.x0 + n.fixed_x, content.y0 + n.fixed_y, w, h),
                ))
            })
            .collect()
    }

    fn set_property(&mut self, name: &str, _value: &serde_json::Value) -> StageResult<()> {
        Err(unknown_property(self.name(), name))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/fixed.rs"]
mod tests;

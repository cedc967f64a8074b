use std::any::Any;

use crate::foundation::core::{ActorBox, Rect};
use crate::foundation::error::StageResult;
use crate::foundation::ids::ActorId;
use crate::layout::{LayoutManager, SizeRequest, align_in, expect_str, unknown_property};
use crate::scene::actor::LayoutAlign;
use crate::scene::graph::SceneGraph;

/// Stacks every child over the whole container, each aligned on its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinLayout {
    /// Horizontal alignment for children that do not set one.
    pub x_align: LayoutAlign,
    /// Vertical alignment for children that do not set one.
    pub y_align: LayoutAlign,
}

impl Default for BinLayout {
    fn default() -> Self {
        Self {
            x_align: LayoutAlign::Center,
            y_align: LayoutAlign::Center,
        }
    }
}

impl BinLayout {
    /// A bin layout with the given default alignment.
    pub fn new(x_align: LayoutAlign, y_align: LayoutAlign) -> Self {
        Self { x_align, y_align }
    }
}

impl LayoutManager for BinLayout {
    fn name(&self) -> &'static str {
        "bin"
    }

    fn preferred_width(
        &self,
        graph: &SceneGraph,
        container: ActorId,
        for_height: Option<f64>,
    ) -> SizeRequest {
        graph
            .visible_children(container)
            .into_iter()
            .fold(SizeRequest::default(), |acc, c| {
                acc.max(graph.child_width(c, for_height))
            })
    }

    fn preferred_height(
        &self,
        graph: &SceneGraph,
        container: ActorId,
        for_width: Option<f64>,
    ) -> SizeRequest {
        graph
            .visible_children(container)
            .into_iter()
            .fold(SizeRequest::default(), |acc, c| {
                acc.max(graph.child_height(c, for_width))
            })
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
            .map(|child| {
                let props = graph.node(child).map(|n| n.layout_props).unwrap_or_default();
                let nat_w = graph.child_width(child, None).natural;
                let (x0, w) = align_in(
                    content.x0,
                    content.width(),
                    nat_w,
                    props.x_align.unwrap_or(self.x_align),
                );
                let nat_h = graph.child_height(child, Some(w)).natural;
                let (y0, h) = align_in(
                    content.y0,
                    content.height(),
                    nat_h,
                    props.y_align.unwrap_or(self.y_align),
                );
                (child, Rect::new(x0, y0, x0 + w, y0 + h))
            })
            .collect()
    }

    fn set_property(&mut self, name: &str, value: &serde_json::Value) -> StageResult<()> {
        match name.replace('_', "-").as_str() {
            "x-align" => self.x_align = LayoutAlign::parse(expect_str(name, value)?)?,
            "y-align" => self.y_align = LayoutAlign::parse(expect_str(name, value)?)?,
            _ => return Err(unknown_property(self.name(), name)),
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/bin.rs"]
mod tests;

use crate::foundation::color::Color;
use crate::foundation::core::{Affine, Point, Rect, Size};
use crate::foundation::error::StageResult;
use crate::foundation::ids::{ActorId, ContentId};
use crate::scene::graph::SceneGraph;

/// Border stroked inside an actor's allocation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Border {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f64,
}

/// Content object shown by an actor, with the revision to paint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ContentRef {
    /// Content object.
    pub id: ContentId,
    /// Revision at paint time; bumped by every invalidation.
    pub revision: u64,
}

/// One actor to paint.
///
/// `transform` maps the actor's local space (origin at the allocation's top-left corner,
/// extent `size`) to stage space. `opacity` already includes every ancestor's opacity.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PaintNode {
    /// Painted actor.
    pub actor: ActorId,
    /// Local to stage transform.
    pub transform: Affine,
    /// Allocation size.
    pub size: Size,
    /// Effective opacity in `[0, 1]`.
    pub opacity: f32,
    /// Background fill.
    pub background: Option<Color>,
    /// Border stroke.
    pub border: Option<Border>,
    /// Attached content.
    pub content: Option<ContentRef>,
    /// Depth hint.
    pub depth: f64,
    /// Axis-aligned stage-space clip from this actor and its clipping ancestors.
    pub clip: Option<Rect>,
}

/// Back-to-front draw list for a single frame.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct PaintList {
    /// Stage dimensions.
    pub stage_size: Size,
    /// Clear color.
    pub background: Color,
    /// Nodes, back to front.
    pub nodes: Vec<PaintNode>,
}

impl PaintList {
    /// Walk the tree in paint order (parent first, then children in list order).
    ///
    /// Hidden actors and fully transparent actors are skipped with their subtrees.
    pub fn build(graph: &SceneGraph, background: Color) -> Self {
        let mut list = Self {
            stage_size: graph.stage_size(),
            background,
            nodes: Vec::new(),
        };
        list.walk(graph, graph.root(), Affine::IDENTITY, 1.0, None);
        list
    }

    fn walk(
        &mut self,
        graph: &SceneGraph,
        id: ActorId,
        parent_space: Affine,
        parent_opacity: f32,
        clip: Option<Rect>,
    ) {
        let Some(node) = graph.node(id) else {
            return;
        };
        if !node.visible {
            return;
        }
        let opacity = parent_opacity * f32::from(node.opacity) / 255.0;
        if opacity <= 0.0 {
            return;
        }

        let transform = parent_space * SceneGraph::local_transform(node);
        let size = node.allocation.size();
        let clip = if node.clip_to_allocation {
            let bounds = transform.transform_rect_bbox(Rect::from_origin_size(Point::ORIGIN, size));
            Some(clip.map_or(bounds, |c| c.intersect(bounds)))
        } else {
            clip
        };

        self.nodes.push(PaintNode {
            actor: id,
            transform,
            size,
            opacity,
            background: node.background,
            border: node
                .border_color
                .filter(|_| node.border_width > 0.0)
                .map(|color| Border {
                    color,
                    width: node.border_width,
                }),
            content: node.content.map(|c| ContentRef {
                id: c,
                revision: graph.content().revision(c).unwrap_or_default(),
            }),
            depth: node.depth,
            clip,
        });

        let children_space = transform * Affine::translate((-node.scroll_x, -node.scroll_y));
        for &child in &node.children {
            self.walk(graph, child, children_space, opacity, clip);
        }
    }

    /// Number of painted actors.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing is painted.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Paint node of `actor`, if it was painted.
    pub fn node(&self, actor: ActorId) -> Option<&PaintNode> {
        self.nodes.iter().find(|n| n.actor == actor)
    }
}

/// External collaborator that turns a paint list into pixels.
pub trait Renderer {
    /// Present one frame.
    fn render(&mut self, list: &PaintList) -> StageResult<()>;
}

#[cfg(test)]
#[path = "../../tests/unit/render/paint.rs"]
mod tests;

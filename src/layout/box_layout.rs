use std::any::Any;

use crate::foundation::core::{ActorBox, Rect};
use crate::foundation::error::StageResult;
use crate::foundation::ids::ActorId;
use crate::layout::{
    LayoutManager, Orientation, SizeRequest, align_in, expect_bool, expect_f64, parse_orientation,
    unknown_property,
};
use crate::scene::actor::LayoutAlign;
use crate::scene::graph::SceneGraph;

/// Packs children in a single row or column.
///
/// Children get their minimum size first, then grow towards their natural size (smallest
/// shortfall first). Whatever is left is split evenly between children flagged `expand`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoxLayout {
    /// Packing axis.
    pub orientation: Orientation,
    /// Gap between adjacent children.
    pub spacing: f64,
    /// Give every child the same extent along the packing axis.
    pub homogeneous: bool,
    /// Pack from the end towards the start (reverses visual order).
    pub pack_start: bool,
}

impl BoxLayout {
    /// A box layout along `orientation` with `spacing` between children.
    pub fn new(orientation: Orientation, spacing: f64) -> Self {
        Self {
            orientation,
            spacing: spacing.max(0.0),
            ..Self::default()
        }
    }

    fn main_request(
        &self,
        graph: &SceneGraph,
        child: ActorId,
        cross_hint: Option<f64>,
    ) -> SizeRequest {
        match self.orientation {
            Orientation::Horizontal => graph.child_width(child, cross_hint),
            Orientation::Vertical => graph.child_height(child, cross_hint),
        }
    }

    fn cross_request(&self, graph: &SceneGraph, child: ActorId, main: Option<f64>) -> SizeRequest {
        match self.orientation {
            Orientation::Horizontal => graph.child_height(child, main),
            Orientation::Vertical => graph.child_width(child, main),
        }
    }

    fn along_main(&self, graph: &SceneGraph, container: ActorId, cross: Option<f64>) -> SizeRequest {
        let children = graph.visible_children(container);
        if children.is_empty() {
            return SizeRequest::default();
        }
        let gaps = self.spacing * (children.len() - 1) as f64;
        let reqs: Vec<SizeRequest> = children
            .iter()
            .map(|&c| self.main_request(graph, c, cross))
            .collect();
        if self.homogeneous {
            let largest = reqs
                .iter()
                .fold(SizeRequest::default(), |acc, r| acc.max(*r));
            let n = reqs.len() as f64;
            return SizeRequest {
                min: largest.min * n + gaps,
                natural: largest.natural * n + gaps,
            };
        }
        reqs.iter()
            .fold(SizeRequest::default(), |acc, r| SizeRequest {
                min: acc.min + r.min,
                natural: acc.natural + r.natural,
            })
            .grow(gaps)
    }

    fn along_cross(&self, graph: &SceneGraph, container: ActorId, main: Option<f64>) -> SizeRequest {
        graph
            .visible_children(container)
            .into_iter()
            .fold(SizeRequest::default(), |acc, c| {
                acc.max(self.cross_request(graph, c, main))
            })
    }

    pub(crate) fn sizes(&self, reqs: &[SizeRequest], expand: &[bool], avail: f64) -> Vec<f64> {
        let n = reqs.len();
        if n == 0 {
            return Vec::new();
        }
        if self.homogeneous {
            return vec![avail.max(0.0) / n as f64; n];
        }

        let mut sizes: Vec<f64> = reqs.iter().map(|r| r.min).collect();
        let mut extra = (avail - sizes.iter().sum::<f64>()).max(0.0);

        let gap = |i: usize| (reqs[i].natural - reqs[i].min).max(0.0);
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| gap(a).total_cmp(&gap(b)));
        let mut remaining = n;
        for i in order {
            let share = extra / remaining as f64;
            let give = gap(i).min(share);
            sizes[i] += give;
            extra -= give;
            remaining -= 1;
        }

        let n_expand = expand.iter().filter(|e| **e).count();
        if n_expand > 0 && extra > 0.0 {
            let share = extra / n_expand as f64;
            for (size, _) in sizes.iter_mut().zip(expand).filter(|(_, e)| **e) {
                *size += share;
            }
        }
        sizes
    }
}

impl LayoutManager for BoxLayout {
    fn name(&self) -> &'static str {
        "box"
    }

    fn preferred_width(
        &self,
        graph: &SceneGraph,
        container: ActorId,
        for_height: Option<f64>,
    ) -> SizeRequest {
        match self.orientation {
            Orientation::Horizontal => self.along_main(graph, container, for_height),
            Orientation::Vertical => self.along_cross(graph, container, None),
        }
    }

    fn preferred_height(
        &self,
        graph: &SceneGraph,
        container: ActorId,
        for_width: Option<f64>,
    ) -> SizeRequest {
        match self.orientation {
            Orientation::Horizontal => self.along_cross(graph, container, None),
            Orientation::Vertical => self.along_main(graph, container, for_width),
        }
    }

    fn allocate(
        &self,
        graph: &SceneGraph,
        container: ActorId,
        content: ActorBox,
    ) -> Vec<(ActorId, ActorBox)> {
        let children = graph.visible_children(container);
        if children.is_empty() {
            return Vec::new();
        }

        let horizontal = self.orientation == Orientation::Horizontal;
        let (main_start, main_avail, cross_start, cross_avail) = if horizontal {
            (content.x0, content.width(), content.y0, content.height())
        } else {
            (content.y0, content.height(), content.x0, content.width())
        };

        let gaps = self.spacing * (children.len() - 1) as f64;
        let avail = (main_avail - gaps).max(0.0);
        let reqs: Vec<SizeRequest> = children
            .iter()
            .map(|&c| self.main_request(graph, c, Some(cross_avail)))
            .collect();
        let props: Vec<_> = children
            .iter()
            .map(|&c| graph.node(c).map(|n| n.layout_props).unwrap_or_default())
            .collect();
        let expand: Vec<bool> = props.iter().map(|p| p.expand).collect();
        let sizes = self.sizes(&reqs, &expand, avail);

        let mut order: Vec<usize> = (0..children.len()).collect();
        if self.pack_start {
            order.reverse();
        }

        let mut cursor = main_start;
        let mut out = Vec::with_capacity(children.len());
        for i in order {
            let child = children[i];
            let (main_align, cross_align) = if horizontal {
                (props[i].x_align, props[i].y_align)
            } else {
                (props[i].y_align, props[i].x_align)
            };
            let (m0, m_len) = align_in(
                cursor,
                sizes[i],
                reqs[i].natural,
                main_align.unwrap_or(LayoutAlign::Fill),
            );
            let cross_nat = self.cross_request(graph, child, Some(m_len)).natural;
            let (c0, c_len) = align_in(
                cross_start,
                cross_avail,
                cross_nat,
                cross_align.unwrap_or(LayoutAlign::Fill),
            );
            let b = if horizontal {
                Rect::new(m0, c0, m0 + m_len, c0 + c_len)
            } else {
                Rect::new(c0, m0, c0 + c_len, m0 + m_len)
            };
            out.push((child, b));
            cursor += sizes[i] + self.spacing;
        }
        out
    }

    fn set_property(&mut self, name: &str, value: &serde_json::Value) -> StageResult<()> {
        match name.replace('_', "-").as_str() {
            "orientation" => self.orientation = parse_orientation(name, value)?,
            "spacing" => self.spacing = expect_f64(name, value)?.max(0.0),
            "homogeneous" => self.homogeneous = expect_bool(name, value)?,
            "pack-start" => self.pack_start = expect_bool(name, value)?,
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
#[path = "../../tests/unit/layout/box_layout.rs"]
mod tests;

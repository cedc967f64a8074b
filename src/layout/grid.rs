use std::any::Any;
use std::f64::consts::PI;

use crate::foundation::core::{ActorBox, box_from_origin_size};
use crate::foundation::error::{StageError, StageResult};
use crate::foundation::ids::ActorId;
use crate::layout::{LayoutManager, SizeRequest, expect_f64, expect_str, unknown_property};
use crate::scene::graph::SceneGraph;

/// Arrangement used by [`MultiLayout`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiMode {
    /// Rows of uniform cells, wrapping at the container's width.
    #[default]
    Grid,
    /// Cells evenly spaced on a circle around the container's center.
    Circle,
}

/// Grid or circle arrangement of uniform cells.
///
/// The cell size is the largest natural size among the visible children, recomputed on
/// every call so a changed child set never leaves stale cells behind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultiLayout {
    /// Current arrangement.
    pub mode: MultiMode,
    /// Gap between cells (grid mode).
    pub spacing: f64,
}

/// Items per grid row: `floor((avail + spacing) / (cell + spacing))`, at least 1.
pub fn items_per_row(avail_width: f64, cell_width: f64, spacing: f64) -> usize {
    if avail_width < 0.0 || cell_width <= 0.0 {
        return 1;
    }
    let n = ((avail_width + spacing) / (cell_width + spacing)).floor();
    if n.is_finite() && n >= 1.0 { n as usize } else { 1 }
}

impl MultiLayout {
    /// A layout in `mode` with no spacing.
    pub fn new(mode: MultiMode) -> Self {
        Self { mode, spacing: 0.0 }
    }

    /// Switch between grid and circle.
    pub fn toggle(&mut self) {
        self.mode = match self.mode {
            MultiMode::Grid => MultiMode::Circle,
            MultiMode::Circle => MultiMode::Grid,
        };
    }

    fn cell(&self, graph: &SceneGraph, children: &[ActorId]) -> (f64, f64) {
        children.iter().fold((0.0_f64, 0.0_f64), |(w, h), &c| {
            (
                w.max(graph.child_width(c, None).natural),
                h.max(graph.child_height(c, None).natural),
            )
        })
    }

    fn request(&self, reqs: impl Iterator<Item = SizeRequest>) -> SizeRequest {
        let mut n = 0usize;
        let mut acc = SizeRequest::default();
        for r in reqs {
            n += 1;
            acc = match self.mode {
                MultiMode::Grid => SizeRequest {
                    min: acc.min + r.min,
                    natural: acc.natural + r.natural,
                },
                MultiMode::Circle => acc.max(r),
            };
        }
        if n > 1 {
            acc = acc.grow(self.spacing * (n - 1) as f64);
        }
        acc
    }
}

impl LayoutManager for MultiLayout {
    fn name(&self) -> &'static str {
        "multi"
    }

    fn preferred_width(
        &self,
        graph: &SceneGraph,
        container: ActorId,
        _for_height: Option<f64>,
    ) -> SizeRequest {
        let children = graph.visible_children(container);
        self.request(children.iter().map(|&c| graph.child_width(c, None)))
    }

    fn preferred_height(
        &self,
        graph: &SceneGraph,
        container: ActorId,
        _for_width: Option<f64>,
    ) -> SizeRequest {
        let children = graph.visible_children(container);
        self.request(children.iter().map(|&c| graph.child_height(c, None)))
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
        let (cell_w, cell_h) = self.cell(graph, &children);

        match self.mode {
            MultiMode::Grid => {
                let per_row = items_per_row(content.width(), cell_w, self.spacing);
                children
                    .iter()
                    .enumerate()
                    .map(|(i, &c)| {
                        let col = (i % per_row) as f64;
                        let row = (i / per_row) as f64;
                        let x = content.x0 + col * (cell_w + self.spacing);
                        let y = content.y0 + row * (cell_h + self.spacing);
                        (c, box_from_origin_size(x, y, cell_w, cell_h))
                    })
                    .collect()
            }
            MultiMode::Circle => {
                let n = children.len() as f64;
                let radius = ((content.width() - cell_w) / 2.0)
                    .min((content.height() - cell_h) / 2.0)
                    .max(0.0);
                let center = content.center();
                children
                    .iter()
                    .enumerate()
                    .map(|(i, &c)| {
                        let theta = 2.0 * PI * i as f64 / n;
                        let x = center.x + radius * theta.sin() - cell_w / 2.0;
                        let y = center.y + radius * theta.cos() - cell_h / 2.0;
                        (c, box_from_origin_size(x, y, cell_w, cell_h))
                    })
                    .collect()
            }
        }
    }

    fn set_property(&mut self, name: &str, value: &serde_json::Value) -> StageResult<()> {
        match name {
            "mode" | "state" => {
                self.mode = match expect_str(name, value)? {
                    "grid" => MultiMode::Grid,
                    "circle" => MultiMode::Circle,
                    other => {
                        return Err(StageError::config(format!("unknown multi mode \"{other}\"")));
                    }
                }
            }
            "spacing" => self.spacing = expect_f64(name, value)?.max(0.0),
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
#[path = "../../tests/unit/layout/grid.rs"]
mod tests;

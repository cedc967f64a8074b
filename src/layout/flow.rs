use std::any::Any;

use crate::foundation::core::{ActorBox, Rect};
use crate::foundation::error::StageResult;
use crate::foundation::ids::ActorId;
use crate::layout::{
    LayoutManager, Orientation, SizeRequest, expect_bool, expect_f64, parse_orientation,
    unknown_property,
};
use crate::scene::graph::SceneGraph;

/// Flows children into lines, wrapping when the next child would overflow.
///
/// A horizontal flow fills rows left to right; a vertical flow fills columns top to
/// bottom. In homogeneous mode every cell takes the size of the largest child.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowLayout {
    /// Flow axis.
    pub orientation: Orientation,
    /// Gap between columns.
    pub column_spacing: f64,
    /// Gap between rows.
    pub row_spacing: f64,
    /// Uniform cell size.
    pub homogeneous: bool,
    /// Lower bound for column widths.
    pub min_column_width: f64,
    /// Upper bound for column widths.
    pub max_column_width: Option<f64>,
    /// Lower bound for row heights.
    pub min_row_height: f64,
    /// Upper bound for row heights.
    pub max_row_height: Option<f64>,
}

impl Default for FlowLayout {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            column_spacing: 0.0,
            row_spacing: 0.0,
            homogeneous: false,
            min_column_width: 0.0,
            max_column_width: None,
            min_row_height: 0.0,
            max_row_height: None,
        }
    }
}

/// Child extents mapped onto (flow axis, line axis).
#[derive(Clone, Copy, Debug)]
struct Item {
    id: ActorId,
    main: f64,
    cross: f64,
}

impl FlowLayout {
    /// A flow layout along `orientation`.
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            ..Self::default()
        }
    }

    fn horizontal(&self) -> bool {
        self.orientation == Orientation::Horizontal
    }

    fn clamp_width(&self, w: f64) -> f64 {
        let w = w.max(self.min_column_width);
        self.max_column_width.map_or(w, |m| w.min(m.max(self.min_column_width)))
    }

    fn clamp_height(&self, h: f64) -> f64 {
        let h = h.max(self.min_row_height);
        self.max_row_height.map_or(h, |m| h.min(m.max(self.min_row_height)))
    }

    fn main_spacing(&self) -> f64 {
        if self.horizontal() {
            self.column_spacing
        } else {
            self.row_spacing
        }
    }

    fn cross_spacing(&self) -> f64 {
        if self.horizontal() {
            self.row_spacing
        } else {
            self.column_spacing
        }
    }

    fn items(&self, graph: &SceneGraph, container: ActorId) -> Vec<Item> {
        let mut items: Vec<Item> = graph
            .visible_children(container)
            .into_iter()
            .map(|id| {
                let w = self.clamp_width(graph.child_width(id, None).natural);
                let h = self.clamp_height(graph.child_height(id, Some(w)).natural);
                if self.horizontal() {
                    Item { id, main: w, cross: h }
                } else {
                    Item { id, main: h, cross: w }
                }
            })
            .collect();
        if self.homogeneous {
            let main = items.iter().fold(0.0_f64, |m, i| m.max(i.main));
            let cross = items.iter().fold(0.0_f64, |m, i| m.max(i.cross));
            for item in &mut items {
                item.main = main;
                item.cross = cross;
            }
        }
        items
    }

    /// Break items into lines for a flow-axis extent of `avail`.
    ///
    /// Returns `(item, main offset, line index)` plus each line's cross extent.
    fn lines(&self, items: &[Item], avail: Option<f64>) -> (Vec<(Item, f64, usize)>, Vec<f64>) {
        let spacing = self.main_spacing();
        let mut placed = Vec::with_capacity(items.len());
        let mut line_extents: Vec<f64> = Vec::new();
        let mut cursor = 0.0;
        let mut line = 0;
        for item in items {
            if line_extents.is_empty() {
                line_extents.push(0.0);
            } else if let Some(avail) = avail
                && cursor > 0.0
                && cursor + item.main > avail + 1e-9
            {
                line += 1;
                line_extents.push(0.0);
                cursor = 0.0;
            }
            placed.push((*item, cursor, line));
            line_extents[line] = line_extents[line].max(item.cross);
            cursor += item.main + spacing;
        }
        (placed, line_extents)
    }

    fn cross_extent(&self, line_extents: &[f64]) -> f64 {
        if line_extents.is_empty() {
            return 0.0;
        }
        line_extents.iter().sum::<f64>() + self.cross_spacing() * (line_extents.len() - 1) as f64
    }

    fn main_request(&self, items: &[Item]) -> SizeRequest {
        if items.is_empty() {
            return SizeRequest::default();
        }
        let widest = items.iter().fold(0.0_f64, |m, i| m.max(i.main));
        let total = items.iter().map(|i| i.main).sum::<f64>()
            + self.main_spacing() * (items.len() - 1) as f64;
        SizeRequest {
            min: widest,
            natural: total,
        }
    }

    fn cross_request(&self, items: &[Item], main_avail: Option<f64>) -> SizeRequest {
        let (_, extents) = self.lines(items, main_avail);
        let natural = self.cross_extent(&extents);
        let tallest = items.iter().fold(0.0_f64, |m, i| m.max(i.cross));
        SizeRequest {
            min: tallest.min(natural),
            natural,
        }
    }
}

impl LayoutManager for FlowLayout {
    fn name(&self) -> &'static str {
        "flow"
    }

    fn preferred_width(
        &self,
        graph: &SceneGraph,
        container: ActorId,
        for_height: Option<f64>,
    ) -> SizeRequest {
        let items = self.items(graph, container);
        if self.horizontal() {
            self.main_request(&items)
        } else {
            self.cross_request(&items, for_height)
        }
    }

    fn preferred_height(
        &self,
        graph: &SceneGraph,
        container: ActorId,
        for_width: Option<f64>,
    ) -> SizeRequest {
        let items = self.items(graph, container);
        if self.horizontal() {
            self.cross_request(&items, for_width)
        } else {
            self.main_request(&items)
        }
    }

    fn allocate(
        &self,
        graph: &SceneGraph,
        container: ActorId,
        content: ActorBox,
    ) -> Vec<(ActorId, ActorBox)> {
        let items = self.items(graph, container);
        let avail = if self.horizontal() {
            content.width()
        } else {
            content.height()
        };
        let (placed, extents) = self.lines(&items, Some(avail));

        let mut line_offsets = Vec::with_capacity(extents.len());
        let mut offset = 0.0;
        for extent in &extents {
            line_offsets.push(offset);
            offset += extent + self.cross_spacing();
        }

        placed
            .into_iter()
            .map(|(item, main, line)| {
                let cross = line_offsets[line];
                let b = if self.horizontal() {
                    Rect::new(
                        content.x0 + main,
                        content.y0 + cross,
                        content.x0 + main + item.main,
                        content.y0 + cross + item.cross,
                    )
                } else {
                    Rect::new(
                        content.x0 + cross,
                        content.y0 + main,
                        content.x0 + cross + item.cross,
                        content.y0 + main + item.main,
                    )
                };
                (item.id, b)
            })
            .collect()
    }

    fn set_property(&mut self, name: &str, value: &serde_json::Value) -> StageResult<()> {
        match name.replace('_', "-").as_str() {
            "orientation" => self.orientation = parse_orientation(name, value)?,
            "column-spacing" => self.column_spacing = expect_f64(name, value)?.max(0.0),
            "row-spacing" => self.row_spacing = expect_f64(name, value)?.max(0.0),
            "homogeneous" => self.homogeneous = expect_bool(name, value)?,
            "min-column-width" => self.min_column_width = expect_f64(name, value)?.max(0.0),
            "max-column-width" => self.max_column_width = optional_extent(name, value)?,
            "min-row-height" => self.min_row_height = expect_f64(name, value)?.max(0.0),
            "max-row-height" => self.max_row_height = optional_extent(name, value)?,
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

// Negative or null means "unbounded", matching the toolkit's -1 convention.
fn optional_extent(name: &str, value: &serde_json::Value) -> StageResult<Option<f64>> {
    if value.is_null() {
        return Ok(None);
    }
    let v = expect_f64(name, value)?;
    Ok((v >= 0.0).then_some(v))
}

#[cfg(test)]
#[path = "../../tests/unit/layout/flow.rs"]
mod tests;

//! Layout managers: strategies that turn a container's box into child boxes.

use std::any::Any;
use std::fmt;

use crate::foundation::core::ActorBox;
use crate::foundation::error::{StageError, StageResult};
use crate::foundation::ids::ActorId;
use crate::scene::actor::LayoutAlign;
use crate::scene::graph::SceneGraph;

pub(crate) mod bin;
pub(crate) mod box_layout;
pub(crate) mod fixed;
pub(crate) mod flow;
pub(crate) mod grid;

/// Minimum and natural extent along one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct SizeRequest {
    /// Smallest extent the actor can work with.
    pub min: f64,
    /// Extent the actor would like to have.
    pub natural: f64,
}

impl SizeRequest {
    /// Request with equal minimum and natural extents.
    pub fn fixed(v: f64) -> Self {
        Self { min: v, natural: v }
    }

    pub(crate) fn grow(self, by: f64) -> Self {
        Self {
            min: self.min + by,
            natural: self.natural + by,
        }
    }

    pub(crate) fn max(self, other: Self) -> Self {
        Self {
            min: self.min.max(other.min),
            natural: self.natural.max(other.natural),
        }
    }
}

/// Strategy attached to a container that sizes and places its children.
///
/// Layouts are stateless per call: every query reads the child set and child properties
/// from the graph, so nothing computed for one frame can leak into the next. Configuration
/// changes go through [`SceneGraph::with_layout_mut`] or
/// [`SceneGraph::set_layout_property`], which notify the container and invalidate its layout.
pub trait LayoutManager: fmt::Debug + Any {
    /// Short identifier used in logs and scene files.
    fn name(&self) -> &'static str;

    /// Preferred width of `container`'s content for a given height.
    fn preferred_width(
        &self,
        graph: &SceneGraph,
        container: ActorId,
        for_height: Option<f64>,
    ) -> SizeRequest;

    /// Preferred height of `container`'s content for a given width.
    fn preferred_height(
        &self,
        graph: &SceneGraph,
        container: ActorId,
        for_width: Option<f64>,
    ) -> SizeRequest;

    /// Distribute `content` (in the container's coordinate space) among the children.
    ///
    /// Returned boxes include each child's margins. Children that are not listed keep
    /// their previous allocation.
    fn allocate(
        &self,
        graph: &SceneGraph,
        container: ActorId,
        content: ActorBox,
    ) -> Vec<(ActorId, ActorBox)>;

    /// Set a configuration property by name.
    fn set_property(&mut self, name: &str, value: &serde_json::Value) -> StageResult<()>;

    /// Downcast support.
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcast support.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Layout axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Left to right.
    #[default]
    Horizontal,
    /// Top to bottom.
    Vertical,
}

/// Place an item of `natural` extent inside `[start, start + avail]`.
///
/// Returns the item's start and extent.
pub(crate) fn align_in(start: f64, avail: f64, natural: f64, align: LayoutAlign) -> (f64, f64) {
    let avail = avail.max(0.0);
    let size = natural.clamp(0.0, avail);
    match align {
        LayoutAlign::Fill => (start, avail),
        LayoutAlign::Start => (start, size),
        LayoutAlign::Center => (start + (avail - size) / 2.0, size),
        LayoutAlign::End => (start + avail - size, size),
    }
}

pub(crate) fn expect_f64(name: &str, value: &serde_json::Value) -> StageResult<f64> {
    value
        .as_f64()
        .ok_or_else(|| StageError::config(format!("layout property \"{name}\" expects a number")))
}

pub(crate) fn expect_bool(name: &str, value: &serde_json::Value) -> StageResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| StageError::config(format!("layout property \"{name}\" expects a bool")))
}

pub(crate) fn expect_str<'a>(name: &str, value: &'a serde_json::Value) -> StageResult<&'a str> {
    value
        .as_str()
        .ok_or_else(|| StageError::config(format!("layout property \"{name}\" expects a string")))
}

pub(crate) fn unknown_property(layout: &str, name: &str) -> StageError {
    StageError::config(format!("layout \"{layout}\" has no property \"{name}\""))
}

pub(crate) fn parse_orientation(name: &str, value: &serde_json::Value) -> StageResult<Orientation> {
    match expect_str(name, value)? {
        "horizontal" => Ok(Orientation::Horizontal),
        "vertical" => Ok(Orientation::Vertical),
        other => Err(StageError::config(format!("unknown orientation \"{other}\""))),
    }
}

/// Build a layout manager from its scene-file name and property map.
pub fn layout_from_name(
    name: &str,
    props: &serde_json::Map<String, serde_json::Value>,
) -> StageResult<Box<dyn LayoutManager>> {
    let mut layout: Box<dyn LayoutManager> = match name {
        "fixed" => Box::new(fixed::FixedLayout),
        "box" => Box::new(box_layout::BoxLayout::default()),
        "flow" => Box::new(flow::FlowLayout::default()),
        "bin" => Box::new(bin::BinLayout::default()),
        "multi" | "grid" | "circle" => Box::new(grid::MultiLayout::new(if name == "circle" {
            grid::MultiMode::Circle
        } else {
            grid::MultiMode::Grid
        })),
        other => return Err(StageError::config(format!("unknown layout \"{other}\""))),
    };
    for (key, value) in props {
        layout.set_property(key, value)?;
    }
    Ok(layout)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/mod.rs"]
mod tests;

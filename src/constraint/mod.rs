//! Geometric constraints resolved against another actor's allocation.

use crate::foundation::core::{ActorBox, Rect};
use crate::foundation::error::{StageError, StageResult};
use crate::foundation::ids::ActorId;
use crate::scene::graph::SceneGraph;

pub(crate) mod solver;

/// Axis an align constraint acts on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignAxis {
    /// Horizontal position.
    X,
    /// Vertical position.
    Y,
    /// Both positions.
    Both,
}

/// Coordinate a bind constraint copies from its source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindCoordinate {
    /// Horizontal position.
    X,
    /// Vertical position.
    Y,
    /// Width.
    Width,
    /// Height.
    Height,
    /// Both positions.
    Position,
    /// Both dimensions.
    Size,
    /// Position and size.
    All,
}

/// Edge of an actor box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapEdge {
    /// `x0`.
    Left,
    /// `x1`.
    Right,
    /// `y0`.
    Top,
    /// `y1`.
    Bottom,
}

impl SnapEdge {
    fn horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    fn of(self, b: ActorBox) -> f64 {
        match self {
            Self::Left => b.x0,
            Self::Right => b.x1,
            Self::Top => b.y0,
            Self::Bottom => b.y1,
        }
    }
}

/// What a constraint computes.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConstraintKind {
    /// `origin = source_origin + factor * (source_extent - own_extent)`.
    Align {
        /// Affected axis.
        axis: AlignAxis,
        /// Alignment factor in `[0, 1]`.
        factor: f64,
    },
    /// Copy a source coordinate plus `offset`.
    Bind {
        /// Copied coordinate.
        coordinate: BindCoordinate,
        /// Added to the copied value.
        #[serde(default)]
        offset: f64,
    },
    /// Put the owner's `from_edge` on the source's `to_edge` plus `offset`.
    Snap {
        /// Edge of the owner that moves.
        from_edge: SnapEdge,
        /// Edge of the source it snaps to.
        to_edge: SnapEdge,
        /// Added to the source edge.
        #[serde(default)]
        offset: f64,
    },
}

/// A rule recomputing part of an actor's allocation from a source actor.
///
/// The source is a non-owning handle; the stage itself is a valid source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constraint {
    /// Actor whose allocation drives the constraint.
    pub source: ActorId,
    /// What to compute.
    pub kind: ConstraintKind,
}

/// Which box edges a constraint writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct EdgeMask {
    pub(crate) x0: bool,
    pub(crate) x1: bool,
    pub(crate) y0: bool,
    pub(crate) y1: bool,
}

impl Constraint {
    /// Align constraint. The factor is clamped to `[0, 1]`.
    pub fn align(source: ActorId, axis: AlignAxis, factor: f64) -> Self {
        Self {
            source,
            kind: ConstraintKind::Align {
                axis,
                factor: factor.clamp(0.0, 1.0),
            },
        }
    }

    /// Bind constraint.
    pub fn bind(source: ActorId, coordinate: BindCoordinate, offset: f64) -> Self {
        Self {
            source,
            kind: ConstraintKind::Bind { coordinate, offset },
        }
    }

    /// Snap constraint; both edges must lie on the same axis.
    pub fn snap(
        source: ActorId,
        from_edge: SnapEdge,
        to_edge: SnapEdge,
        offset: f64,
    ) -> StageResult<Self> {
        let c = Self {
            source,
            kind: ConstraintKind::Snap {
                from_edge,
                to_edge,
                offset,
            },
        };
        c.validate()?;
        Ok(c)
    }

    /// Check the constraint parameters.
    pub fn validate(&self) -> StageResult<()> {
        match self.kind {
            ConstraintKind::Align { factor, .. } if !(0.0..=1.0).contains(&factor) => Err(
                StageError::config(format!("align factor must be within [0, 1], got {factor}")),
            ),
            ConstraintKind::Bind { offset, .. } | ConstraintKind::Snap { offset, .. }
                if !offset.is_finite() =>
            {
                Err(StageError::config("constraint offset must be finite"))
            }
            ConstraintKind::Snap {
                from_edge, to_edge, ..
            } if from_edge.horizontal() != to_edge.horizontal() => Err(StageError::config(
                format!("cannot snap {from_edge:?} edge to {to_edge:?} edge"),
            )),
            _ => Ok(()),
        }
    }

    pub(crate) fn touched(&self) -> EdgeMask {
        let x = EdgeMask {
            x0: true,
            x1: true,
            ..EdgeMask::default()
        };
        let y = EdgeMask {
            y0: true,
            y1: true,
            ..EdgeMask::default()
        };
        let both = EdgeMask {
            x0: true,
            x1: true,
            y0: true,
            y1: true,
        };
        match self.kind {
            ConstraintKind::Align { axis, .. } => match axis {
                AlignAxis::X => x,
                AlignAxis::Y => y,
                AlignAxis::Both => both,
            },
            ConstraintKind::Bind { coordinate, .. } => match coordinate {
                BindCoordinate::X => x,
                BindCoordinate::Y => y,
                BindCoordinate::Width => EdgeMask {
                    x1: true,
                    ..EdgeMask::default()
                },
                BindCoordinate::Height => EdgeMask {
                    y1: true,
                    ..EdgeMask::default()
                },
                BindCoordinate::Size => EdgeMask {
                    x1: true,
                    y1: true,
                    ..EdgeMask::default()
                },
                BindCoordinate::Position | BindCoordinate::All => both,
            },
            ConstraintKind::Snap { from_edge, .. } => match from_edge {
                SnapEdge::Left => EdgeMask {
                    x0: true,
                    ..EdgeMask::default()
                },
                SnapEdge::Right => EdgeMask {
                    x1: true,
                    ..EdgeMask::default()
                },
                SnapEdge::Top => EdgeMask {
                    y0: true,
                    ..EdgeMask::default()
                },
                SnapEdge::Bottom => EdgeMask {
                    y1: true,
                    ..EdgeMask::default()
                },
            },
        }
    }

    /// Apply to `own` given the source box expressed in the owner's parent space.
    pub(crate) fn apply(&self, own: ActorBox, src: ActorBox) -> ActorBox {
        let mut b = own;
        match self.kind {
            ConstraintKind::Align { axis, factor } => {
                if matches!(axis, AlignAxis::X | AlignAxis::Both) {
                    let w = b.width();
                    b.x0 = src.x0 + factor * (src.width() - w);
                    b.x1 = b.x0 + w;
                }
                if matches!(axis, AlignAxis::Y | AlignAxis::Both) {
                    let h = b.height();
                    b.y0 = src.y0 + factor * (src.height() - h);
                    b.y1 = b.y0 + h;
                }
            }
            ConstraintKind::Bind { coordinate, offset } => {
                let pos_x = matches!(
                    coordinate,
                    BindCoordinate::X | BindCoordinate::Position | BindCoordinate::All
                );
                let pos_y = matches!(
                    coordinate,
                    BindCoordinate::Y | BindCoordinate::Position | BindCoordinate::All
                );
                let size_w = matches!(
                    coordinate,
                    BindCoordinate::Width | BindCoordinate::Size | BindCoordinate::All
                );
                let size_h = matches!(
                    coordinate,
                    BindCoordinate::Height | BindCoordinate::Size | BindCoordinate::All
                );
                if pos_x {
                    let w = b.width();
                    b.x0 = src.x0 + offset;
                    b.x1 = b.x0 + w;
                }
                if pos_y {
                    let h = b.height();
                    b.y0 = src.y0 + offset;
                    b.y1 = b.y0 + h;
                }
                if size_w {
                    b.x1 = b.x0 + src.width() + offset;
                }
                if size_h {
                    b.y1 = b.y0 + src.height() + offset;
                }
            }
            ConstraintKind::Snap {
                from_edge,
                to_edge,
                offset,
            } => {
                let v = to_edge.of(src) + offset;
                match from_edge {
                    SnapEdge::Left => b.x0 = v,
                    SnapEdge::Right => b.x1 = v,
                    SnapEdge::Top => b.y0 = v,
                    SnapEdge::Bottom => b.y1 = v,
                }
            }
        }
        b
    }

    /// Keep the touched edges of `own` at their values in `previous`.
    pub(crate) fn hold(&self, own: ActorBox, previous: ActorBox) -> ActorBox {
        let m = self.touched();
        Rect::new(
            if m.x0 { previous.x0 } else { own.x0 },
            if m.y0 { previous.y0 } else { own.y0 },
            if m.x1 { previous.x1 } else { own.x1 },
            if m.y1 { previous.y1 } else { own.y1 },
        )
    }
}

/// A constraint attached to an actor under a unique name.
#[derive(Clone, Debug, PartialEq)]
pub struct AttachedConstraint {
    /// Name unique among the owner's constraints.
    pub name: String,
    /// The rule.
    pub constraint: Constraint,
    /// Disabled constraints are skipped during resolution.
    pub enabled: bool,
}

impl SceneGraph {
    /// Attach a constraint under a generated name; returns the name.
    pub fn add_constraint(&mut self, owner: ActorId, constraint: Constraint) -> StageResult<String> {
        let n = self.get(owner)?.constraints.len();
        let mut name = format!("constraint-{n}");
        let mut k = n;
        while self.get(owner)?.constraints.iter().any(|c| c.name == name) {
            k += 1;
            name = format!("constraint-{k}");
        }
        self.add_constraint_with_name(owner, &name, constraint)?;
        Ok(name)
    }

    /// Attach a named constraint. Later constraints override earlier ones on shared edges.
    ///
    /// Rejected with [`StageError::Config`] when the name is taken, the parameters are
    /// invalid, the owner is the stage, or the source (directly or through its own
    /// constraints and ancestors) depends on the owner.
    pub fn add_constraint_with_name(
        &mut self,
        owner: ActorId,
        name: &str,
        constraint: Constraint,
    ) -> StageResult<()> {
        constraint.validate()?;
        let node = self.get(owner)?;
        if owner == self.root {
            return Err(StageError::config("constraints cannot be attached to the stage"));
        }
        if node.constraints.iter().any(|c| c.name == name) {
            return Err(StageError::config(format!(
                "{owner:?} already has a constraint named \"{name}\""
            )));
        }
        if !self.contains(constraint.source) {
            return Err(StageError::StaleActor(constraint.source));
        }
        if self.depends_on(constraint.source, owner) {
            return Err(StageError::config(format!(
                "constraint \"{name}\" on {owner:?} with source {:?} creates a dependency cycle",
                constraint.source
            )));
        }
        self.get_mut(owner)?.constraints.push(AttachedConstraint {
            name: name.to_owned(),
            constraint,
            enabled: true,
        });
        self.queue_relayout();
        Ok(())
    }

    /// Detach a constraint by name and return it.
    pub fn remove_constraint(&mut self, owner: ActorId, name: &str) -> StageResult<Constraint> {
        let list = &mut self.get_mut(owner)?.constraints;
        let idx = list
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| StageError::config(format!("no constraint named \"{name}\"")))?;
        let removed = list.remove(idx);
        self.queue_relayout();
        Ok(removed.constraint)
    }

    /// Detach every constraint of `owner`.
    pub fn clear_constraints(&mut self, owner: ActorId) -> StageResult<()> {
        self.get_mut(owner)?.constraints.clear();
        self.queue_relayout();
        Ok(())
    }

    /// Constraints of `owner` in attachment order.
    pub fn constraints(&self, owner: ActorId) -> StageResult<&[AttachedConstraint]> {
        Ok(&self.get(owner)?.constraints)
    }

    /// Enable or disable a constraint without detaching it.
    pub fn set_constraint_enabled(
        &mut self,
        owner: ActorId,
        name: &str,
        enabled: bool,
    ) -> StageResult<()> {
        let c = self
            .get_mut(owner)?
            .constraints
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| StageError::config(format!("no constraint named \"{name}\"")))?;
        c.enabled = enabled;
        self.queue_relayout();
        Ok(())
    }

    /// Detach constraints owned by any of `actors` and constraints elsewhere sourced on
    /// them. Returns how many were detached.
    pub(crate) fn detach_constraints_for(&mut self, actors: &[ActorId]) -> usize {
        let mut detached = 0;
        for &a in actors {
            if let Some(node) = self.node_mut(a) {
                detached += node.constraints.len();
                node.constraints.clear();
            }
        }
        for slot in &mut self.slots {
            if let Some(node) = slot.node.as_mut() {
                let before = node.constraints.len();
                node.constraints
                    .retain(|c| !actors.contains(&c.constraint.source));
                detached += before - node.constraints.len();
            }
        }
        if detached > 0 {
            self.queue_relayout();
        }
        detached
    }

    /// Whether resolving `from` requires `target` to be resolved first.
    ///
    /// An actor depends on its parent and on the sources of its constraints.
    pub(crate) fn depends_on(&self, from: ActorId, target: ActorId) -> bool {
        let mut seen = vec![false; self.slots.len()];
        let mut stack = vec![from];
        while let Some(a) = stack.pop() {
            if a == target {
                return true;
            }
            let Some(node) = self.node(a) else {
                continue;
            };
            let slot = a.idx as usize;
            if seen[slot] {
                continue;
            }
            seen[slot] = true;
            if let Some(p) = node.parent {
                stack.push(p);
            }
            stack.extend(node.constraints.iter().map(|c| c.constraint.source));
        }
        false
    }
}

#[cfg(test)]
#[path = "../../tests/unit/constraint/mod.rs"]
mod tests;

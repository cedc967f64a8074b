use crate::foundation::core::{ActorBox, Point, Rect, Vec2};
use crate::foundation::diagnostic::{Diagnostic, DiagnosticKind};
use crate::foundation::ids::ActorId;
use crate::scene::graph::SceneGraph;
use crate::scene::notify::Notification;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Visit {
    Pending,
    Visiting,
    Done,
}

/// Marks the actor whose re-entry closed a dependency cycle.
#[derive(Clone, Copy, Debug)]
struct Cycle {
    root: ActorId,
}

struct Resolver {
    state: Vec<Visit>,
    diagnostics: Vec<Diagnostic>,
    retry: bool,
}

impl Resolver {
    fn visit(&self, id: ActorId) -> Visit {
        self.state
            .get(id.idx as usize)
            .copied()
            .unwrap_or(Visit::Pending)
    }

    fn set(&mut self, id: ActorId, v: Visit) {
        if let Some(s) = self.state.get_mut(id.idx as usize) {
            *s = v;
        }
    }
}

impl SceneGraph {
    /// Run layout and constraints for every actor on the stage.
    ///
    /// Actors are finalized on demand: an actor's parent and the sources of its constraints
    /// are finalized before the actor itself, and a container lays out its children as soon
    /// as its own box is final. Cycles are short-circuited: every actor on the cycle keeps
    /// its previous allocation. Constraints whose source is gone or detached hold their
    /// touched edges at the previous values and are retried next frame.
    #[tracing::instrument(skip(self), fields(frame = self.frame + 1))]
    pub(crate) fn resolve_allocations(&mut self) -> Vec<Diagnostic> {
        self.frame += 1;
        let order = self.subtree_preorder(self.root);
        for &id in &order {
            if let Some(n) = self.node_mut(id) {
                n.prev_allocation = n.allocation;
                n.layout_box = n.allocation;
            }
        }
        let stage = Rect::from_origin_size(Point::ORIGIN, self.stage_size);
        let root = self.root;
        if let Some(n) = self.node_mut(root) {
            n.layout_box = stage;
        }

        let mut r = Resolver {
            state: vec![Visit::Pending; self.slots.len()],
            diagnostics: Vec::new(),
            retry: false,
        };
        for id in order {
            // A cycle escaping to the top level has already been reported by its members.
            let _ = self.ensure_final(id, &mut r);
        }
        self.needs_relayout = r.retry;
        r.diagnostics
    }

    fn ensure_final(&mut self, id: ActorId, r: &mut Resolver) -> Result<(), Cycle> {
        match r.visit(id) {
            Visit::Done => return Ok(()),
            Visit::Visiting => return Err(Cycle { root: id }),
            Visit::Pending => {}
        }
        let Some(node) = self.node(id) else {
            return Ok(());
        };
        let parent = node.parent;
        let constraints: Vec<_> = node
            .constraints
            .iter()
            .filter(|c| c.enabled)
            .cloned()
            .collect();
        let prev = node.prev_allocation;
        let mut b = node.layout_box;
        r.set(id, Visit::Visiting);

        let mut cycle = None;
        if let Some(p) = parent {
            if let Err(c) = self.ensure_final(p, r) {
                cycle = Some(c);
            }
            // The parent may have laid us out just now.
            if let Some(n) = self.node(id) {
                b = n.layout_box;
            }
        }

        if cycle.is_none() {
            for attached in &constraints {
                let src = attached.constraint.source;
                if !self.is_on_stage(src) {
                    b = attached.constraint.hold(b, prev);
                    r.retry = true;
                    r.diagnostics.push(Diagnostic::new(
                        DiagnosticKind::UnresolvedSource,
                        Some(id),
                        format!(
                            "constraint \"{}\" source {src:?} has no allocation this frame",
                            attached.name
                        ),
                    ));
                    continue;
                }
                if let Err(c) = self.ensure_final(src, r) {
                    cycle = Some(c);
                    break;
                }
                let src_box = self.box_in_parent_space(src, parent);
                b = attached.constraint.apply(b, src_box);
            }
        }

        if cycle.is_some() {
            b = prev;
            r.diagnostics.push(Diagnostic::new(
                DiagnosticKind::ConstraintCycle,
                Some(id),
                "constraint dependency cycle; keeping the previous allocation",
            ));
        }

        if b.x1 < b.x0 {
            b.x1 = b.x0;
        }
        if b.y1 < b.y0 {
            b.y1 = b.y0;
        }

        let frame = self.frame;
        let mut changed = false;
        if let Some(n) = self.node_mut(id) {
            changed = !n.has_allocation || n.allocation != b;
            n.allocation = b;
            n.allocated_frame = frame;
            n.has_allocation = true;
        }
        if changed {
            self.notify(Notification::AllocationChanged { actor: id });
        }
        r.set(id, Visit::Done);
        self.layout_children(id);

        match cycle {
            Some(c) if c.root != id => Err(c),
            _ => Ok(()),
        }
    }

    fn layout_children(&mut self, id: ActorId) {
        let Some(node) = self.node(id) else {
            return;
        };
        if node.children.is_empty() {
            return;
        }
        let content = Rect::from_origin_size(Point::ORIGIN, node.allocation.size());
        let boxes = node.layout.allocate(self, id, content);
        for (child, b) in boxes {
            if let Some(n) = self.node_mut(child) {
                n.layout_box = n.margin.shrink(b);
            }
        }
    }

    /// Origin of `id`'s coordinate space (its children's space) in stage coordinates.
    fn content_origin(&self, id: Option<ActorId>) -> Vec2 {
        let mut origin = Vec2::ZERO;
        let mut cur = id;
        while let Some(a) = cur {
            let Some(n) = self.node(a) else {
                break;
            };
            origin += Vec2::new(n.allocation.x0 - n.scroll_x, n.allocation.y0 - n.scroll_y);
            cur = n.parent;
        }
        origin
    }

    /// `src`'s allocation expressed in the space of `space` (the owner's parent).
    fn box_in_parent_space(&self, src: ActorId, space: Option<ActorId>) -> ActorBox {
        let Some(n) = self.node(src) else {
            return Rect::ZERO;
        };
        let delta = self.content_origin(n.parent) - self.content_origin(space);
        n.allocation + delta
    }
}

#[cfg(test)]
#[path = "../../tests/unit/constraint/solver.rs"]
mod tests;

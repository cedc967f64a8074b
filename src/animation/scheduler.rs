use crate::animation::timeline::TimelineState;
use crate::animation::transition::Transition;
use crate::foundation::diagnostic::{Diagnostic, DiagnosticKind};
use crate::foundation::error::{StageError, StageResult};
use crate::foundation::ids::ActorId;
use crate::scene::graph::SceneGraph;
use crate::scene::notify::Notification;

#[derive(Debug)]
struct Entry {
    actor: ActorId,
    name: String,
    transition: Transition,
}

/// Named transitions attached to actors, advanced once per frame in attachment order.
#[derive(Debug, Default)]
pub(crate) struct TransitionScheduler {
    entries: Vec<Entry>,
}

impl TransitionScheduler {
    fn position(&self, actor: ActorId, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.actor == actor && e.name == name)
    }

    fn require(&self, actor: ActorId, name: &str) -> StageResult<usize> {
        self.position(actor, name).ok_or_else(|| {
            StageError::config(format!("{actor:?} has no transition named \"{name}\""))
        })
    }

    /// Attach and start a transition. The name must be unique per actor.
    pub(crate) fn add(
        &mut self,
        graph: &SceneGraph,
        actor: ActorId,
        name: &str,
        mut transition: Transition,
    ) -> StageResult<()> {
        graph.get(actor)?;
        if self.position(actor, name).is_some() {
            return Err(StageError::config(format!(
                "{actor:?} already has a transition named \"{name}\""
            )));
        }
        transition.begin(graph, actor)?;
        transition.timeline.start();
        tracing::debug!(?actor, name, "transition attached");
        self.entries.push(Entry {
            actor,
            name: name.to_owned(),
            transition,
        });
        Ok(())
    }

    /// Detach a transition. A transition still in flight reports an unfinished stop.
    pub(crate) fn remove(
        &mut self,
        graph: &mut SceneGraph,
        actor: ActorId,
        name: &str,
    ) -> Option<Transition> {
        let idx = self.position(actor, name)?;
        let entry = self.entries.remove(idx);
        report_interrupted(graph, &entry);
        Some(entry.transition)
    }

    pub(crate) fn get(&self, actor: ActorId, name: &str) -> Option<&Transition> {
        self.position(actor, name).map(|i| &self.entries[i].transition)
    }

    pub(crate) fn get_mut(&mut self, actor: ActorId, name: &str) -> Option<&mut Transition> {
        let idx = self.position(actor, name)?;
        Some(&mut self.entries[idx].transition)
    }

    pub(crate) fn names(&self, actor: ActorId) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.actor == actor)
            .map(|e| e.name.as_str())
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn running(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.transition.timeline.is_playing())
            .count()
    }

    /// Start or resume. A stopped or completed transition re-reads implicit start values.
    pub(crate) fn start(
        &mut self,
        graph: &SceneGraph,
        actor: ActorId,
        name: &str,
    ) -> StageResult<()> {
        let idx = self.require(actor, name)?;
        let t = &mut self.entries[idx].transition;
        if matches!(
            t.timeline.state(),
            TimelineState::Stopped | TimelineState::Completed
        ) {
            t.timeline.rewind();
            t.begin(graph, actor)?;
        }
        t.timeline.start();
        Ok(())
    }

    pub(crate) fn pause(&mut self, actor: ActorId, name: &str) -> StageResult<()> {
        let idx = self.require(actor, name)?;
        self.entries[idx].transition.timeline.pause();
        Ok(())
    }

    /// Stop and rewind. Properties keep the last written values.
    pub(crate) fn stop(
        &mut self,
        graph: &mut SceneGraph,
        actor: ActorId,
        name: &str,
    ) -> StageResult<()> {
        let idx = self.require(actor, name)?;
        report_interrupted(graph, &self.entries[idx]);
        self.entries[idx].transition.timeline.stop();
        Ok(())
    }

    pub(crate) fn set_remove_on_complete(
        &mut self,
        actor: ActorId,
        name: &str,
        remove: bool,
    ) -> StageResult<()> {
        let idx = self.require(actor, name)?;
        self.entries[idx].transition.remove_on_complete = remove;
        Ok(())
    }

    /// Detach every transition on any of `actors`; returns how many went away.
    pub(crate) fn detach_actors(&mut self, graph: &mut SceneGraph, actors: &[ActorId]) -> usize {
        let before = self.entries.len();
        let mut kept = Vec::with_capacity(before);
        for entry in std::mem::take(&mut self.entries) {
            if actors.contains(&entry.actor) {
                report_interrupted(graph, &entry);
            } else {
                kept.push(entry);
            }
        }
        self.entries = kept;
        before - self.entries.len()
    }

    /// Advance every transition by `dt_ms` and write the interpolated values.
    pub(crate) fn advance(&mut self, graph: &mut SceneGraph, dt_ms: f64) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut done = Vec::new();

        for (i, entry) in self.entries.iter_mut().enumerate() {
            if !graph.contains(entry.actor) {
                done.push(i);
                continue;
            }
            let tick = entry.transition.timeline.advance(dt_ms);
            if !tick.moved {
                continue;
            }
            if let Err(err) = entry.transition.write(graph, entry.actor) {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::TransitionFailed,
                    Some(entry.actor),
                    format!("transition \"{}\": {err}", entry.name),
                ));
                entry.transition.timeline.stop();
                done.push(i);
                continue;
            }
            for marker in tick.markers {
                graph.notify(Notification::MarkerReached {
                    actor: entry.actor,
                    name: entry.name.clone(),
                    marker,
                });
            }
            if tick.completed {
                tracing::debug!(actor = ?entry.actor, name = %entry.name, "transition completed");
                graph.notify(Notification::TransitionStopped {
                    actor: entry.actor,
                    name: entry.name.clone(),
                    finished: true,
                });
                if entry.transition.remove_on_complete {
                    done.push(i);
                }
            }
        }

        for i in done.into_iter().rev() {
            self.entries.remove(i);
        }
        diagnostics
    }
}

fn report_interrupted(graph: &mut SceneGraph, entry: &Entry) {
    if matches!(
        entry.transition.timeline.state(),
        TimelineState::Running | TimelineState::Paused
    ) {
        graph.notify(Notification::TransitionStopped {
            actor: entry.actor,
            name: entry.name.clone(),
            finished: false,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/scheduler.rs"]
mod tests;

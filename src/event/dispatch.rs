use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::event::input::{Event, EventFlow, EventKind, EventType, Phase};
use crate::foundation::diagnostic::{Diagnostic, DiagnosticKind};
use crate::foundation::error::{StageError, StageResult};
use crate::foundation::ids::{ActorId, HandlerId};
use crate::stage::engine::Stage;

/// Callback connected to an actor's events.
///
/// Returning [`EventFlow::Stop`] consumes the event. An error is reported as a diagnostic and
/// propagation continues as if the handler had returned [`EventFlow::Propagate`].
pub type EventHandler = Box<dyn FnMut(&mut Stage, &Event) -> StageResult<EventFlow>>;

type SharedHandler = Rc<RefCell<EventHandler>>;

struct Connection {
    id: HandlerId,
    actor: ActorId,
    event_type: EventType,
    phase: Phase,
    handler: SharedHandler,
}

/// Handler table, event queue and pointer/keyboard routing state of a stage.
#[derive(Default)]
pub(crate) struct InputState {
    connections: Vec<Connection>,
    unhandled: HashMap<EventType, SharedHandler>,
    queue: VecDeque<Event>,
    grab: Option<ActorId>,
    hover: Option<ActorId>,
    key_focus: Option<ActorId>,
    next_id: u64,
    diagnostics: Vec<Diagnostic>,
}

impl fmt::Debug for InputState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputState")
            .field("connections", &self.connections.len())
            .field("unhandled", &self.unhandled.keys().collect::<Vec<_>>())
            .field("queued", &self.queue.len())
            .field("grab", &self.grab)
            .field("hover", &self.hover)
            .field("key_focus", &self.key_focus)
            .finish()
    }
}

impl InputState {
    fn is_connected(&self, id: HandlerId) -> bool {
        self.connections.iter().any(|c| c.id == id)
    }

    /// Release grab, hover and focus held inside `actors`; drop their handlers as well when
    /// the actors are gone for good.
    pub(crate) fn forget(&mut self, actors: &[ActorId], destroyed: bool) {
        if destroyed {
            self.connections.retain(|c| !actors.contains(&c.actor));
        }
        if self.grab.is_some_and(|g| actors.contains(&g)) {
            tracing::debug!(actor = ?self.grab, "pointer grab released");
            self.grab = None;
        }
        if self.hover.is_some_and(|h| actors.contains(&h)) {
            self.hover = None;
        }
        if self.key_focus.is_some_and(|k| actors.contains(&k)) {
            self.key_focus = None;
        }
    }

    /// Disconnect everything and drop queued events; returns the number of handlers removed.
    pub(crate) fn clear(&mut self) -> usize {
        let n = self.connections.len() + self.unhandled.len();
        *self = Self {
            next_id: self.next_id,
            diagnostics: std::mem::take(&mut self.diagnostics),
            ..Self::default()
        };
        n
    }

    pub(crate) fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub(crate) fn handler_count(&self) -> usize {
        self.connections.len()
    }

    pub(crate) fn queued(&self) -> usize {
        self.queue.len()
    }
}

/// Where an event went and whether a handler consumed it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dispatch {
    /// Actor the event was delivered to first (hit-test result, grab, or key focus).
    pub target: ActorId,
    /// Whether a handler or the stage default action consumed it.
    pub consumed: bool,
}

impl Stage {
    /// Connect `handler` to `actor`'s events of `event_type` in `phase`.
    pub fn connect<F>(
        &mut self,
        actor: ActorId,
        event_type: EventType,
        phase: Phase,
        handler: F,
    ) -> StageResult<HandlerId>
    where
        F: FnMut(&mut Stage, &Event) -> StageResult<EventFlow> + 'static,
    {
        self.graph.get(actor)?;
        let id = HandlerId(self.input.next_id);
        self.input.next_id += 1;
        self.input.connections.push(Connection {
            id,
            actor,
            event_type,
            phase,
            handler: Rc::new(RefCell::new(Box::new(handler))),
        });
        Ok(id)
    }

    /// Connect a bubble-phase handler.
    pub fn on<F>(&mut self, actor: ActorId, event_type: EventType, handler: F) -> StageResult<HandlerId>
    where
        F: FnMut(&mut Stage, &Event) -> StageResult<EventFlow> + 'static,
    {
        self.connect(actor, event_type, Phase::Bubble, handler)
    }

    /// Disconnect a handler. A handler that is running right now finishes its call.
    pub fn disconnect(&mut self, id: HandlerId) -> bool {
        let before = self.input.connections.len();
        self.input.connections.retain(|c| c.id != id);
        before != self.input.connections.len()
    }

    /// Install the stage-level handler for events of `event_type` nobody consumed.
    pub fn set_unhandled_handler<F>(&mut self, event_type: EventType, handler: F)
    where
        F: FnMut(&mut Stage, &Event) -> StageResult<EventFlow> + 'static,
    {
        self.input
            .unhandled
            .insert(event_type, Rc::new(RefCell::new(Box::new(handler))));
    }

    /// Remove the stage-level handler for `event_type`.
    pub fn clear_unhandled_handler(&mut self, event_type: EventType) -> bool {
        self.input.unhandled.remove(&event_type).is_some()
    }

    /// Route every pointer event to `actor` until [`Stage::ungrab_pointer`].
    ///
    /// Fails with [`StageError::Grab`] while another actor holds the grab.
    pub fn grab_pointer(&mut self, actor: ActorId) -> StageResult<()> {
        self.graph.get(actor)?;
        if !self.graph.is_on_stage(actor) {
            return Err(StageError::grab(format!("{actor:?} is not on the stage")));
        }
        match self.pointer_grab() {
            Some(holder) if holder != actor => Err(StageError::grab(format!(
                "pointer already grabbed by {holder:?}"
            ))),
            _ => {
                tracing::debug!(?actor, "pointer grabbed");
                self.input.grab = Some(actor);
                Ok(())
            }
        }
    }

    /// Release the pointer grab, returning the former holder.
    pub fn ungrab_pointer(&mut self) -> Option<ActorId> {
        let holder = self.input.grab.take();
        if holder.is_some() {
            tracing::debug!(actor = ?holder, "pointer grab released");
        }
        holder
    }

    /// Actor holding the pointer grab.
    pub fn pointer_grab(&self) -> Option<ActorId> {
        self.input.grab.filter(|&a| self.graph.is_on_stage(a))
    }

    /// Actor currently under the pointer, as of the last pointer event.
    pub fn pointer_actor(&self) -> Option<ActorId> {
        self.input.hover.filter(|&a| self.graph.is_on_stage(a))
    }

    /// Give `actor` the key focus, or return it to the stage with `None`.
    pub fn set_key_focus(&mut self, actor: Option<ActorId>) -> StageResult<()> {
        if let Some(a) = actor {
            self.graph.get(a)?;
        }
        self.input.key_focus = actor;
        Ok(())
    }

    /// Actor receiving key events first; `None` means the stage.
    pub fn key_focus(&self) -> Option<ActorId> {
        self.input.key_focus.filter(|&a| self.graph.is_on_stage(a))
    }

    /// Queue an event for the next frame's input flush.
    pub fn queue_event(&mut self, event: Event) {
        self.input.queue.push_back(event);
    }

    /// Dispatch everything queued before this call. Events queued by handlers wait for the
    /// next flush.
    pub(crate) fn flush_events(&mut self) -> usize {
        let pending = std::mem::take(&mut self.input.queue);
        let n = pending.len();
        for event in pending {
            self.dispatch_event(event);
        }
        n
    }

    /// Deliver an event right away.
    ///
    /// Pointer events go to the grab holder, or else to the picked actor, firing leave/enter
    /// when the actor under the pointer changes. Key events go to the focused actor. Either
    /// way the event is captured from the stage down to the target, then bubbles back up;
    /// the stage-level handler and the quit key see whatever nobody consumed.
    #[tracing::instrument(level = "trace", skip(self, event), fields(event = ?event.event_type()))]
    pub fn dispatch_event(&mut self, mut event: Event) -> Dispatch {
        let root = self.graph.root();
        match event.kind {
            EventKind::KeyPress { .. } | EventKind::KeyRelease { .. } => {
                let target = self.key_focus().unwrap_or(root);
                event.source = Some(target);
                let mut consumed = self.propagate(target, &event) || self.run_unhandled(&event);
                if !consumed
                    && let EventKind::KeyPress { key } = event.kind
                    && self.config.quit_key == Some(key)
                {
                    tracing::debug!(%key, "quit key pressed");
                    self.quit_requested = true;
                    consumed = true;
                }
                Dispatch { target, consumed }
            }
            EventKind::Enter { position } => {
                if let Some(holder) = self.pointer_grab() {
                    return Dispatch {
                        target: holder,
                        consumed: false,
                    };
                }
                let hit = self.graph.pick(position).unwrap_or(root);
                let consumed = self.update_hover(Some(hit), &event);
                Dispatch {
                    target: hit,
                    consumed,
                }
            }
            EventKind::Leave { .. } => {
                let target = self.pointer_grab().or(self.pointer_actor()).unwrap_or(root);
                let consumed = self.pointer_grab().is_none() && self.update_hover(None, &event);
                Dispatch { target, consumed }
            }
            EventKind::ButtonPress { position, .. }
            | EventKind::ButtonRelease { position, .. }
            | EventKind::Motion { position }
            | EventKind::Scroll { position, .. } => {
                let target = match self.pointer_grab() {
                    Some(holder) => holder,
                    None => {
                        let hit = self.graph.pick(position).unwrap_or(root);
                        self.update_hover(Some(hit), &event);
                        hit
                    }
                };
                event.source = Some(target);
                let consumed = self.propagate(target, &event) || self.run_unhandled(&event);
                Dispatch { target, consumed }
            }
        }
    }

    /// Move the hover to `next`, sending leave to the old actor and enter to the new one.
    /// Returns whether the enter event was consumed.
    fn update_hover(&mut self, next: Option<ActorId>, cause: &Event) -> bool {
        let previous = self.pointer_actor();
        if previous == next {
            return false;
        }
        self.input.hover = next;
        let position = cause.position().unwrap_or_default();
        let crossing = |kind, source, related| Event {
            kind,
            time_ms: cause.time_ms,
            modifiers: cause.modifiers,
            source,
            related,
        };
        if let Some(old) = previous {
            let leave = crossing(EventKind::Leave { position }, Some(old), next);
            self.deliver_to(old, &leave);
        }
        match next {
            Some(new) => {
                let enter = crossing(EventKind::Enter { position }, Some(new), previous);
                self.deliver_to(new, &enter)
            }
            None => false,
        }
    }

    /// Run `actor`'s own handlers only, capture before bubble.
    fn deliver_to(&mut self, actor: ActorId, event: &Event) -> bool {
        self.run_handlers(actor, Phase::Capture, event) == EventFlow::Stop
            || self.run_handlers(actor, Phase::Bubble, event) == EventFlow::Stop
    }

    fn propagate(&mut self, target: ActorId, event: &Event) -> bool {
        let mut chain: SmallVec<[ActorId; 16]> = SmallVec::new();
        let mut cur = Some(target);
        while let Some(a) = cur {
            chain.push(a);
            cur = self.graph.node(a).and_then(|n| n.parent);
        }

        for &actor in chain.iter().rev() {
            if self.run_handlers(actor, Phase::Capture, event) == EventFlow::Stop {
                return true;
            }
        }
        for &actor in &chain {
            if self.run_handlers(actor, Phase::Bubble, event) == EventFlow::Stop {
                return true;
            }
        }
        false
    }

    fn run_handlers(&mut self, actor: ActorId, phase: Phase, event: &Event) -> EventFlow {
        if !self.graph.contains(actor) {
            return EventFlow::Propagate;
        }
        let event_type = event.event_type();
        let matching: SmallVec<[(HandlerId, SharedHandler); 4]> = self
            .input
            .connections
            .iter()
            .filter(|c| c.actor == actor && c.event_type == event_type && c.phase == phase)
            .map(|c| (c.id, Rc::clone(&c.handler)))
            .collect();

        for (id, handler) in matching {
            // An earlier handler may have disconnected this one.
            if !self.input.is_connected(id) {
                continue;
            }
            if self.invoke(&handler, Some(actor), event) == EventFlow::Stop {
                return EventFlow::Stop;
            }
        }
        EventFlow::Propagate
    }

    fn run_unhandled(&mut self, event: &Event) -> bool {
        let Some(handler) = self.input.unhandled.get(&event.event_type()).cloned() else {
            return false;
        };
        self.invoke(&handler, None, event) == EventFlow::Stop
    }

    fn invoke(&mut self, handler: &SharedHandler, actor: Option<ActorId>, event: &Event) -> EventFlow {
        let event_type = event.event_type();
        let Ok(mut callback) = handler.try_borrow_mut() else {
            self.input.diagnostics.push(Diagnostic::new(
                DiagnosticKind::HandlerReentered,
                actor,
                format!("{event_type:?} handler is already running; skipped"),
            ));
            return EventFlow::Propagate;
        };
        match (*callback)(self, event) {
            Ok(flow) => flow,
            Err(err) => {
                self.input.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::HandlerFailed,
                    actor,
                    format!("{event_type:?} handler failed: {err}"),
                ));
                EventFlow::Propagate
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/event/dispatch.rs"]
mod tests;

use crate::animation::scheduler::TransitionScheduler;
use crate::animation::transition::{PropertyTransition, Transition};
use crate::event::dispatch::InputState;
use crate::foundation::core::Point;
use crate::foundation::diagnostic::Diagnostic;
use crate::foundation::error::{StageError, StageResult};
use crate::foundation::ids::ActorId;
use crate::render::paint::{PaintList, Renderer};
use crate::scene::actor::{PropertyId, PropertyValue, ScrollMode};
use crate::scene::graph::SceneGraph;
use crate::scene::notify::Notification;
use crate::stage::clock::FrameClock;
use crate::stage::config::StageConfig;

/// Everything one frame produced.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FrameReport {
    /// 1-based frame number.
    pub frame: u64,
    /// Clamped delta the transitions advanced by.
    pub dt_ms: f64,
    /// Queued events flushed at the start of the frame.
    pub events_dispatched: usize,
    /// Transitions still playing after the frame.
    pub transitions_running: usize,
    /// Whether the quit key was pressed (now or earlier).
    pub quit_requested: bool,
    /// Recoverable problems: failing handlers, unresolved constraints, cycles.
    pub diagnostics: Vec<Diagnostic>,
    /// Changes observed since the previous frame.
    pub notifications: Vec<Notification>,
    /// Draw list for the renderer.
    pub paint: PaintList,
}

/// What [`Stage::shutdown`] tore down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ShutdownReport {
    /// Actors destroyed, not counting the stage actor.
    pub actors_destroyed: usize,
    /// Transitions cancelled.
    pub transitions_cancelled: usize,
    /// Handlers disconnected, including stage-level ones.
    pub handlers_disconnected: usize,
}

/// Engine context: the scene graph plus everything that runs against it each frame.
///
/// A stage owns its actors, transitions and event handlers; there is no global state, and
/// several stages can live side by side. Call [`Stage::frame`] (or [`Stage::tick`] with a
/// host timestamp) once per display refresh. Each frame runs, in order: the queued input,
/// layout and constraint resolution, transition advancement, and the paint traversal.
#[derive(Debug)]
pub struct Stage {
    pub(crate) config: StageConfig,
    pub(crate) graph: SceneGraph,
    pub(crate) transitions: TransitionScheduler,
    pub(crate) input: InputState,
    pub(crate) clock: FrameClock,
    pub(crate) quit_requested: bool,
}

impl Stage {
    /// Validate `config` and create a stage with only the root actor.
    pub fn new(config: StageConfig) -> StageResult<Self> {
        config.validate()?;
        let mut graph = SceneGraph::new(config.width, config.height);
        let root = graph.root();
        graph.set_background_color(root, Some(config.background))?;
        graph.take_notifications();
        Ok(Self {
            clock: FrameClock::new(config.fps, config.max_frame_delta_ms),
            graph,
            transitions: TransitionScheduler::default(),
            input: InputState::default(),
            quit_requested: false,
            config,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// The actor tree.
    pub fn scene(&self) -> &SceneGraph {
        &self.graph
    }

    /// Mutable access to the actor tree.
    ///
    /// Detaching and destroying actors go through [`Stage`] so transitions, grabs and
    /// handlers that point into the affected subtree are released as well.
    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// The stage actor.
    pub fn root(&self) -> ActorId {
        self.graph.root()
    }

    /// Frame clock.
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Resize the stage.
    pub fn set_size(&mut self, width: f64, height: f64) -> StageResult<()> {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(StageError::validation(format!(
                "stage size must be > 0, got {width}x{height}"
            )));
        }
        self.config.width = width;
        self.config.height = height;
        self.graph.set_stage_size(width, height);
        Ok(())
    }

    /// Whether the quit key was pressed.
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Ask the host to quit, as the quit key does.
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    // ---------------------------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------------------------

    /// Detach `child` from `parent` and hand it back to the caller.
    ///
    /// Transitions and constraints in the detached subtree are cancelled, as are constraints
    /// elsewhere that use it as a source. A grab, hover or key focus inside it is released.
    /// Handlers stay connected for when the actor is re-attached.
    pub fn remove_child(&mut self, parent: ActorId, child: ActorId) -> StageResult<ActorId> {
        let removed = self.graph.remove_child(parent, child)?;
        self.release_subtree(removed);
        Ok(removed)
    }

    /// Detach every child of `parent`, returning them in their former order.
    pub fn remove_all_children(&mut self, parent: ActorId) -> StageResult<Vec<ActorId>> {
        let removed = self.graph.remove_all_children(parent)?;
        for &child in &removed {
            self.release_subtree(child);
        }
        Ok(removed)
    }

    /// Put `new` in `old`'s place and hand `old` back.
    pub fn replace_child(&mut self, parent: ActorId, old: ActorId, new: ActorId) -> StageResult<ActorId> {
        let removed = self.graph.replace_child(parent, old, new)?;
        self.release_subtree(removed);
        Ok(removed)
    }

    /// Destroy `actor` and its subtree, returning the handles that went stale.
    ///
    /// On top of what [`Stage::remove_child`] releases, handlers on the destroyed actors
    /// are disconnected and constraints elsewhere that used them as a source are detached.
    pub fn destroy(&mut self, actor: ActorId) -> StageResult<Vec<ActorId>> {
        let doomed = self.graph.destroy(actor)?;
        self.transitions.detach_actors(&mut self.graph, &doomed);
        self.input.forget(&doomed, true);
        Ok(doomed)
    }

    fn release_subtree(&mut self, top: ActorId) {
        let subtree = self.graph.subtree_preorder(top);
        let cancelled = self.transitions.detach_actors(&mut self.graph, &subtree);
        if cancelled > 0 {
            tracing::debug!(actor = ?top, cancelled, "transitions cancelled by removal");
        }
        let detached = self.graph.detach_constraints_for(&subtree);
        if detached > 0 {
            tracing::debug!(actor = ?top, detached, "constraints detached by removal");
        }
        self.input.forget(&subtree, false);
    }

    /// Destroy every actor, cancel every transition and disconnect every handler.
    ///
    /// The stage itself stays usable and empty afterwards.
    pub fn shutdown(&mut self) -> ShutdownReport {
        let mut report = ShutdownReport {
            transitions_cancelled: self.transitions.len(),
            handlers_disconnected: self.input.clear(),
            ..ShutdownReport::default()
        };
        let root = self.root();
        let children = self.graph.children(root).map(<[_]>::to_vec).unwrap_or_default();
        for child in children {
            if let Ok(doomed) = self.destroy(child) {
                report.actors_destroyed += doomed.len();
            }
        }
        let root_subtree = [root];
        self.transitions.detach_actors(&mut self.graph, &root_subtree);
        self.graph.take_notifications();
        tracing::debug!(?report, "stage shut down");
        report
    }

    // ---------------------------------------------------------------------------------------
    // Transitions
    // ---------------------------------------------------------------------------------------

    /// Attach `transition` to `actor` under `name` and start it.
    ///
    /// Fails with [`StageError::Config`] when the name is taken on that actor.
    pub fn add_transition(&mut self, actor: ActorId, name: &str, transition: Transition) -> StageResult<()> {
        self.transitions.add(&self.graph, actor, name, transition)
    }

    /// Detach a transition. Properties keep their current values.
    pub fn remove_transition(&mut self, actor: ActorId, name: &str) -> Option<Transition> {
        self.transitions.remove(&mut self.graph, actor, name)
    }

    /// Detach every transition of `actor`; returns how many there were.
    pub fn remove_all_transitions(&mut self, actor: ActorId) -> usize {
        self.transitions.detach_actors(&mut self.graph, &[actor])
    }

    /// Transition attached to `actor` under `name`.
    pub fn transition(&self, actor: ActorId, name: &str) -> Option<&Transition> {
        self.transitions.get(actor, name)
    }

    /// Mutable access to an attached transition (markers, direction).
    pub fn transition_mut(&mut self, actor: ActorId, name: &str) -> Option<&mut Transition> {
        self.transitions.get_mut(actor, name)
    }

    /// Names of the transitions attached to `actor`, in attachment order.
    pub fn transition_names(&self, actor: ActorId) -> Vec<&str> {
        self.transitions.names(actor)
    }

    /// Start or resume a transition. A stopped one restarts from its current values.
    pub fn start_transition(&mut self, actor: ActorId, name: &str) -> StageResult<()> {
        self.transitions.start(&self.graph, actor, name)
    }

    /// Pause a transition in place.
    pub fn pause_transition(&mut self, actor: ActorId, name: &str) -> StageResult<()> {
        self.transitions.pause(actor, name)
    }

    /// Stop and rewind a transition, leaving properties at their last written values.
    pub fn stop_transition(&mut self, actor: ActorId, name: &str) -> StageResult<()> {
        self.transitions.stop(&mut self.graph, actor, name)
    }

    /// Keep (`false`) or detach (`true`) a transition once it completes.
    pub fn set_remove_on_complete(&mut self, actor: ActorId, name: &str, remove: bool) -> StageResult<()> {
        self.transitions.set_remove_on_complete(actor, name, remove)
    }

    /// Transitions currently playing.
    pub fn running_transitions(&self) -> usize {
        self.transitions.running()
    }

    /// Set a property through the actor's easing state.
    ///
    /// With a non-zero easing duration this replaces the implicit transition named after
    /// the property, starting from the current value; otherwise the value is written
    /// directly.
    pub fn animate_property(
        &mut self,
        actor: ActorId,
        property: PropertyId,
        value: impl Into<PropertyValue>,
    ) -> StageResult<()> {
        let value = value.into();
        let easing = self.graph.easing_state(actor)?;
        if value.kind() != property.kind() {
            return Err(StageError::config(format!(
                "property \"{property}\" expects {:?}, got {:?}",
                property.kind(),
                value.kind()
            )));
        }
        let name = property.name();
        self.transitions.remove(&mut self.graph, actor, name);
        if easing.duration_ms <= 0.0 && easing.delay_ms <= 0.0 {
            return self.graph.set_property(actor, property, value);
        }
        let transition = Transition::property(PropertyTransition::new(property, value), easing.duration_ms)?
            .with_easing(easing.mode)
            .with_delay(easing.delay_ms);
        self.transitions.add(&self.graph, actor, name, transition)
    }

    /// Push the configured default easing state on `actor`.
    pub fn save_easing_state(&mut self, actor: ActorId) -> StageResult<()> {
        self.graph.push_easing_state(actor, self.config.default_easing)
    }

    /// Pop the easing state pushed by [`Stage::save_easing_state`].
    pub fn restore_easing_state(&mut self, actor: ActorId) -> StageResult<()> {
        self.graph.restore_easing_state(actor)
    }

    /// Run `f` with a fresh easing state on `actor`, restoring the previous one afterwards
    /// even when `f` fails.
    pub fn with_easing_state<R>(
        &mut self,
        actor: ActorId,
        f: impl FnOnce(&mut Self) -> StageResult<R>,
    ) -> StageResult<R> {
        self.save_easing_state(actor)?;
        let out = f(self);
        self.restore_easing_state(actor)?;
        out
    }

    /// Scroll a container so `point` (in its content space) lands at its top-left corner.
    ///
    /// Only the axes enabled by the container's scroll mode move; the motion follows the
    /// container's easing state.
    pub fn scroll_to_point(&mut self, actor: ActorId, point: Point) -> StageResult<()> {
        let mode = self.graph.scroll_mode(actor)?;
        if matches!(mode, ScrollMode::Horizontal | ScrollMode::Both) {
            self.animate_property(actor, PropertyId::ScrollX, point.x)?;
        }
        if matches!(mode, ScrollMode::Vertical | ScrollMode::Both) {
            self.animate_property(actor, PropertyId::ScrollY, point.y)?;
        }
        Ok(())
    }

    // ---------------------------------------------------------------------------------------
    // Frame loop
    // ---------------------------------------------------------------------------------------

    /// Run one frame with the delta between `now_ms` and the previous tick.
    pub fn tick(&mut self, now_ms: f64) -> FrameReport {
        let dt = self.clock.tick(now_ms);
        self.frame(dt)
    }

    /// Run one frame advancing transitions by `dt_ms` (clamped to the configured maximum).
    #[tracing::instrument(skip(self), fields(frame = self.clock.frames() + 1))]
    pub fn frame(&mut self, dt_ms: f64) -> FrameReport {
        let dt_ms = self.clock.clamp(dt_ms);
        let frame = self.clock.count_frame();

        let events_dispatched = self.flush_events();
        let mut diagnostics = self.input.take_diagnostics();
        diagnostics.extend(self.graph.resolve_allocations());
        diagnostics.extend(self.transitions.advance(&mut self.graph, dt_ms));
        let paint = PaintList::build(&self.graph, self.config.background);

        let report = FrameReport {
            frame,
            dt_ms,
            events_dispatched,
            transitions_running: self.transitions.running(),
            quit_requested: self.quit_requested,
            diagnostics,
            notifications: self.graph.take_notifications(),
            paint,
        };
        tracing::trace!(
            nodes = report.paint.len(),
            diagnostics = report.diagnostics.len(),
            "frame done"
        );
        report
    }

    /// Run one frame and hand its paint list to `renderer`.
    pub fn frame_with<R: Renderer + ?Sized>(&mut self, dt_ms: f64, renderer: &mut R) -> StageResult<FrameReport> {
        let report = self.frame(dt_ms);
        renderer.render(&report.paint)?;
        Ok(report)
    }

    /// Number of connected actor handlers.
    pub fn handler_count(&self) -> usize {
        self.input.handler_count()
    }

    /// Events waiting for the next frame.
    pub fn queued_events(&self) -> usize {
        self.input.queued()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/engine.rs"]
mod tests;

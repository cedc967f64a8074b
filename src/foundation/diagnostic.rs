use crate::foundation::ids::ActorId;

/// Category of a non-fatal problem surfaced by a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A constraint source had no allocation this frame; the owner kept its previous value.
    UnresolvedSource,
    /// Constraint evaluation hit a dependency cycle and was short-circuited.
    ConstraintCycle,
    /// An event handler returned an error.
    HandlerFailed,
    /// A handler was invoked while it was already running.
    HandlerReentered,
    /// A transition targeted a property it could not write.
    TransitionFailed,
}

/// A persistent-but-recoverable failure reported instead of aborting the frame loop.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// Actor the problem is attached to, if any.
    pub actor: Option<ActorId>,
    /// Human-readable detail.
    pub message: String,
}

impl Diagnostic {
    pub(crate) fn new(kind: DiagnosticKind, actor: Option<ActorId>, message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::warn!(?kind, ?actor, %message, "diagnostic");
        Self {
            kind,
            actor,
            message,
        }
    }
}

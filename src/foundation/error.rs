use crate::foundation::ids::ActorId;

/// Convenience result type used across stagecraft.
pub type StageResult<T> = Result<T, StageError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Structural and configuration errors are returned synchronously and leave the scene
/// untouched. Resolution problems during a frame and failing event handlers are never
/// returned from the frame loop; they surface as [`crate::Diagnostic`]s instead.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    /// A scene graph mutation would break tree ownership (cycles, double parenting).
    #[error("structural error: {0}")]
    Structural(String),

    /// Invalid attachment of a constraint, transition or layout property.
    #[error("configuration error: {0}")]
    Config(String),

    /// The handle refers to an actor that has been destroyed.
    #[error("stale actor handle {0:?}")]
    StaleActor(ActorId),

    /// The pointer is already grabbed by another actor.
    #[error("pointer grab error: {0}")]
    Grab(String),

    /// A content object was written by an actor that does not own it.
    #[error("content error: {0}")]
    Content(String),

    /// Invalid user-provided configuration or scene data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from handlers, dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StageError {
    /// Build a [`StageError::Structural`] value.
    pub fn structural(msg: impl Into<String>) -> Self {
        Self::Structural(msg.into())
    }

    /// Build a [`StageError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`StageError::Grab`] value.
    pub fn grab(msg: impl Into<String>) -> Self {
        Self::Grab(msg.into())
    }

    /// Build a [`StageError::Content`] value.
    pub fn content(msg: impl Into<String>) -> Self {
        Self::Content(msg.into())
    }

    /// Build a [`StageError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StageError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

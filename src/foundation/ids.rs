use std::fmt;

/// A handle to an actor in a [`SceneGraph`](crate::SceneGraph).
///
/// Holds a slot index and a generation counter. Destroying an actor bumps the slot's
/// generation, so handles kept by constraints, grabs or user code go stale instead of
/// silently pointing at whatever actor reuses the slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct ActorId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl ActorId {
    /// Raw slot index (diagnostics only).
    pub fn index(self) -> u32 {
        self.idx
    }

    /// Generation counter of the slot when this handle was issued.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorId({}@gen{})", self.idx, self.generation)
    }
}

/// Handle to a paintable content object in the [`ContentStore`](crate::ContentStore).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct ContentId(pub(crate) u32);

/// Handle returned when connecting an event handler; used to disconnect it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(pub(crate) u64);

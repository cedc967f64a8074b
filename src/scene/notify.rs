use crate::foundation::ids::ActorId;
use crate::scene::actor::PropertyId;

/// In-process change notification, drained into each [`FrameReport`](crate::FrameReport).
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// An observable property changed value.
    PropertyChanged {
        /// Actor whose property changed.
        actor: ActorId,
        /// Property that changed.
        #[serde(serialize_with = "serialize_property")]
        property: PropertyId,
    },
    /// A container's layout manager or its configuration changed.
    LayoutChanged {
        /// Container owning the layout.
        container: ActorId,
    },
    /// The allocation pass assigned a different box.
    AllocationChanged {
        /// Actor whose allocation changed.
        actor: ActorId,
    },
    /// A child was attached.
    ChildAdded {
        /// New parent.
        parent: ActorId,
        /// Attached child.
        child: ActorId,
    },
    /// A child was detached.
    ChildRemoved {
        /// Former parent.
        parent: ActorId,
        /// Detached child.
        child: ActorId,
    },
    /// A transition stopped, either naturally (`finished`) or on request.
    TransitionStopped {
        /// Actor the transition is attached to.
        actor: ActorId,
        /// Transition name.
        name: String,
        /// Whether it ran to completion.
        finished: bool,
    },
    /// A timeline marker was crossed.
    MarkerReached {
        /// Actor the transition is attached to.
        actor: ActorId,
        /// Transition name.
        name: String,
        /// Marker name.
        marker: String,
    },
    /// An actor was destroyed.
    ActorDestroyed {
        /// The handle that just went stale.
        actor: ActorId,
    },
}

fn serialize_property<S>(property: &PropertyId, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(property.name())
}

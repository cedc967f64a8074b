//! Stagecraft is a retained-mode actor graph for 2D user interfaces.
//!
//! A [`Stage`] owns a tree of actors. Each frame it:
//!
//! - dispatches queued input through the tree (capture, then bubble)
//! - resolves layout managers and constraints into allocations
//! - advances property transitions
//! - flattens the visible tree into a [`PaintList`] for an external [`Renderer`]
//!
//! Scenes can be assembled in code through [`SceneGraph`] or loaded from JSON with
//! [`SceneDescription`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod constraint;
mod event;
mod foundation;
mod layout;
mod render;
mod scene;
mod stage;

pub use crate::foundation::color::{Color, StaticColor};
pub use crate::foundation::core::{
    ActorBox, Affine, Fps, Margin, Point, Rect, Size, Vec2, box_contains, box_from_origin_size,
    clamp_box_to_pixel, interpolate_box,
};
pub use crate::foundation::diagnostic::{Diagnostic, DiagnosticKind};
pub use crate::foundation::error::{StageError, StageResult};
pub use crate::foundation::ids::{ActorId, ContentId, HandlerId};

pub use crate::scene::actor::{
    ChildLayoutProps, EasingState, LayoutAlign, PropertyId, PropertyValue, ScrollMode, ValueKind,
};
pub use crate::scene::content::{ContentKind, ContentStore};
pub use crate::scene::description::{
    ActorSpec, BorderSpec, ConstraintSpec, LayoutSpec, LoadedScene, STAGE_NAME, SceneDescription,
    TransitionSpec,
};
pub use crate::scene::graph::SceneGraph;
pub use crate::scene::notify::Notification;

pub use crate::layout::bin::BinLayout;
pub use crate::layout::box_layout::BoxLayout;
pub use crate::layout::fixed::FixedLayout;
pub use crate::layout::flow::FlowLayout;
pub use crate::layout::grid::{MultiLayout, MultiMode, items_per_row};
pub use crate::layout::{LayoutManager, Orientation, SizeRequest, layout_from_name};

pub use crate::constraint::{
    AlignAxis, AttachedConstraint, BindCoordinate, Constraint, ConstraintKind, SnapEdge,
};

pub use crate::animation::ease::EasingMode;
pub use crate::animation::timeline::{Timeline, TimelineDirection, TimelineState, TimelineTick};
pub use crate::animation::transition::{
    GroupMember, Keyframe, PropertyTransition, Transition, TransitionKind,
};

pub use crate::event::dispatch::{Dispatch, EventHandler};
pub use crate::event::input::{
    Event, EventFlow, EventKind, EventType, Key, Modifiers, MouseButton, Phase,
};

pub use crate::render::paint::{Border, ContentRef, PaintList, PaintNode, Renderer};

pub use crate::stage::clock::FrameClock;
pub use crate::stage::config::StageConfig;
pub use crate::stage::engine::{FrameReport, ShutdownReport, Stage};

//! Input events: types, hit-testing and dispatch through the actor tree.

pub(crate) mod dispatch;
pub(crate) mod hit;
pub(crate) mod input;

//! Paint traversal: the flat draw list handed to an external renderer.

pub(crate) mod paint;

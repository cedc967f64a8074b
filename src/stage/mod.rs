//! Engine context: configuration, frame clock and the per-frame driver.

pub(crate) mod clock;
pub(crate) mod config;
pub(crate) mod engine;

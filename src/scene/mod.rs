pub(crate) mod actor;
pub(crate) mod content;
pub(crate) mod description;
pub(crate) mod graph;
pub(crate) mod notify;

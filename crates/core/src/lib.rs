//! Domain logic for the research workflow canvas.
//!
//! This crate has no internal dependencies and no I/O so it can be shared by
//! the API layer and any future tooling that needs to lay out workflow nodes.

pub mod error;
pub mod placement;
pub mod types;
pub mod workflow_canvas;

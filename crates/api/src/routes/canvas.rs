//! Route definitions for the workflow canvas.
//!
//! Provides a single router mounted at `/canvas` that handles node placement
//! for drag-and-drop and programmatic insertion, plus graph checks.

use axum::routing::post;
use axum::Router;

use crate::handlers::canvas;
use crate::state::AppState;

/// Workflow canvas routes mounted at `/canvas`.
///
/// ```text
/// POST /drop-position         -> drop_position
/// POST /structured-position   -> structured_position
/// POST /overlap               -> check_overlap
/// POST /validate              -> validate_canvas
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/drop-position", post(canvas::drop_position))
        .route("/structured-position", post(canvas::structured_position))
        .route("/overlap", post(canvas::check_overlap))
        .route("/validate", post(canvas::validate_canvas))
}

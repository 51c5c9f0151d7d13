pub mod canvas;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /canvas/drop-position                            smart drop placement (POST)
/// /canvas/structured-position                      parent-relative placement (POST)
/// /canvas/overlap                                  overlap check (POST)
/// /canvas/validate                                 graph validation (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Workflow canvas placement and validation.
        .nest("/canvas", canvas::router())
}

//! Handlers for workflow canvas placement.
//!
//! The canvas client sends its current nodes (and edges where relevant);
//! nothing is persisted here. Drag-and-drop uses `drop_position`,
//! programmatic insertion uses `structured_position`.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use focuslab_core::placement;
use focuslab_core::types::{CanvasEdge, CanvasNode, Position};
use focuslab_core::workflow_canvas::{
    self, validate_dimensions, validate_node, validate_node_count, validate_position,
    DEFAULT_NODE_HEIGHT, DEFAULT_NODE_WIDTH,
};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for drop placement and overlap checks.
#[derive(Debug, Deserialize)]
pub struct DropPositionRequest {
    /// Nodes already on the canvas.
    #[serde(default)]
    pub nodes: Vec<CanvasNode>,
    /// Where the user released the dragged node.
    pub position: Position,
    /// Size of the new node; defaults apply when absent.
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Request body for structured placement.
#[derive(Debug, Deserialize)]
pub struct StructuredPositionRequest {
    #[serde(default)]
    pub nodes: Vec<CanvasNode>,
    #[serde(default)]
    pub edges: Vec<CanvasEdge>,
    /// Node the new one is attached under, if any.
    pub parent_id: Option<String>,
}

/// Request body for graph validation.
#[derive(Debug, Deserialize)]
pub struct ValidateCanvasRequest {
    #[serde(default)]
    pub nodes: Vec<CanvasNode>,
    #[serde(default)]
    pub edges: Vec<CanvasEdge>,
}

#[derive(Debug, Serialize)]
pub struct OverlapResponse {
    pub overlaps: bool,
}

#[derive(Debug, Serialize)]
pub struct ValidateCanvasResponse {
    pub valid: bool,
    pub node_count: usize,
    pub edge_count: usize,
}

// ---------------------------------------------------------------------------
// Placement endpoints
// ---------------------------------------------------------------------------

/// POST /api/v1/canvas/drop-position
///
/// Resolve where a node dropped from the palette should land.
pub async fn drop_position(
    State(state): State<AppState>,
    Json(input): Json<DropPositionRequest>,
) -> AppResult<impl IntoResponse> {
    validate_drop_request(&input, state.config.max_canvas_nodes)?;

    let placement =
        placement::place_dropped_node(&input.nodes, input.position, input.width, input.height);

    tracing::info!(
        node_count = input.nodes.len(),
        outcome = placement.outcome.as_str(),
        x = placement.position.x,
        y = placement.position.y,
        "Drop position resolved",
    );

    Ok(Json(DataResponse { data: placement }))
}

/// POST /api/v1/canvas/structured-position
///
/// Place a programmatically inserted node relative to its parent.
pub async fn structured_position(
    State(state): State<AppState>,
    Json(input): Json<StructuredPositionRequest>,
) -> AppResult<impl IntoResponse> {
    validate_nodes(&input.nodes, state.config.max_canvas_nodes)?;

    let parent_id = input.parent_id.as_deref();
    if let Some(id) = parent_id {
        if !input.nodes.iter().any(|n| n.id == id) {
            tracing::debug!(parent_id = id, "Parent not on canvas, placing right of canvas");
        }
    }

    let placement = placement::place_structured_node(&input.nodes, &input.edges, parent_id);

    tracing::info!(
        node_count = input.nodes.len(),
        edge_count = input.edges.len(),
        anchor = placement.anchor.as_str(),
        x = placement.position.x,
        y = placement.position.y,
        "Structured position resolved",
    );

    Ok(Json(DataResponse { data: placement }))
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// POST /api/v1/canvas/overlap
///
/// Report whether a node at `position` would collide with existing nodes.
pub async fn check_overlap(
    State(state): State<AppState>,
    Json(input): Json<DropPositionRequest>,
) -> AppResult<impl IntoResponse> {
    validate_drop_request(&input, state.config.max_canvas_nodes)?;

    let overlaps = placement::overlaps(
        input.position,
        &input.nodes,
        input.width.unwrap_or(DEFAULT_NODE_WIDTH),
        input.height.unwrap_or(DEFAULT_NODE_HEIGHT),
    );

    Ok(Json(DataResponse {
        data: OverlapResponse { overlaps },
    }))
}

/// POST /api/v1/canvas/validate
///
/// Validate a node/edge graph before the client saves it.
pub async fn validate_canvas(
    State(state): State<AppState>,
    Json(input): Json<ValidateCanvasRequest>,
) -> AppResult<impl IntoResponse> {
    workflow_canvas::validate_graph(&input.nodes, &input.edges, state.config.max_canvas_nodes)?;

    Ok(Json(DataResponse {
        data: ValidateCanvasResponse {
            valid: true,
            node_count: input.nodes.len(),
            edge_count: input.edges.len(),
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Node limit plus per-node checks. Dangling edges are tolerated here;
/// placement skips them.
fn validate_nodes(nodes: &[CanvasNode], max_nodes: usize) -> AppResult<()> {
    validate_node_count(nodes.len(), max_nodes)?;
    for node in nodes {
        validate_node(node)?;
    }
    Ok(())
}

fn validate_drop_request(input: &DropPositionRequest, max_nodes: usize) -> AppResult<()> {
    validate_nodes(&input.nodes, max_nodes)?;
    validate_position(input.position)?;
    validate_dimensions(
        input.width.unwrap_or(DEFAULT_NODE_WIDTH),
        input.height.unwrap_or(DEFAULT_NODE_HEIGHT),
    )?;
    Ok(())
}

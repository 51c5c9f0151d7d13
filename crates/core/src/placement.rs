//! Placement heuristics for new workflow canvas nodes.
//!
//! Two independent strategies live here:
//!
//! - **Drop placement** ([`smart_drop_position`]) keeps a node dropped from the
//!   palette where the user released it unless it would collide with an
//!   existing node, in which case it probes outward in rings and finally
//!   falls back to the right of the canvas.
//! - **Structured placement** ([`structured_position`]) is used for
//!   programmatic insertion. It places a new node relative to a parent and
//!   that parent's existing children, and does not check for overlap.
//!
//! All functions are pure and deterministic. Inputs are assumed to have been
//! validated with [`crate::workflow_canvas::validate_graph`].

use serde::Serialize;

use crate::types::{CanvasEdge, CanvasNode, NodeId, Position};
use crate::workflow_canvas::{
    DEFAULT_NODE_HEIGHT, DEFAULT_NODE_WIDTH, MAX_SEARCH_ITERATIONS, NODE_SPACING, SEARCH_STEP,
    STRUCTURED_ORIGIN,
};

// ---------------------------------------------------------------------------
// Probe directions
// ---------------------------------------------------------------------------

/// Direction of a probe relative to the requested drop position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeDirection {
    Right,
    Down,
    Left,
    Up,
    DownRight,
    DownLeft,
    UpRight,
    UpLeft,
}

impl ProbeDirection {
    /// Probe order within one ring. Earlier entries win ties.
    pub const ORDER: [ProbeDirection; 8] = [
        ProbeDirection::Right,
        ProbeDirection::Down,
        ProbeDirection::Left,
        ProbeDirection::Up,
        ProbeDirection::DownRight,
        ProbeDirection::DownLeft,
        ProbeDirection::UpRight,
        ProbeDirection::UpLeft,
    ];

    /// Unit offset `(dx, dy)`; canvas `y` grows downwards.
    pub fn unit(self) -> (f64, f64) {
        match self {
            ProbeDirection::Right => (1.0, 0.0),
            ProbeDirection::Down => (0.0, 1.0),
            ProbeDirection::Left => (-1.0, 0.0),
            ProbeDirection::Up => (0.0, -1.0),
            ProbeDirection::DownRight => (1.0, 1.0),
            ProbeDirection::DownLeft => (-1.0, 1.0),
            ProbeDirection::UpRight => (1.0, -1.0),
            ProbeDirection::UpLeft => (-1.0, -1.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProbeDirection::Right => "right",
            ProbeDirection::Down => "down",
            ProbeDirection::Left => "left",
            ProbeDirection::Up => "up",
            ProbeDirection::DownRight => "down_right",
            ProbeDirection::DownLeft => "down_left",
            ProbeDirection::UpRight => "up_right",
            ProbeDirection::UpLeft => "up_left",
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Which branch of the drop heuristic produced a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DropOutcome {
    /// The requested position was free (or the canvas was empty).
    Requested,
    /// A probe in ring `iteration` cleared all existing nodes.
    Probed {
        iteration: u32,
        direction: ProbeDirection,
    },
    /// No probe cleared; placed to the right of the canvas without re-checking.
    Fallback,
}

impl DropOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropOutcome::Requested => "requested",
            DropOutcome::Probed { .. } => "probed",
            DropOutcome::Fallback => "fallback",
        }
    }
}

/// Result of [`place_dropped_node`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DropPlacement {
    pub position: Position,
    pub outcome: DropOutcome,
}

/// What a structured placement was anchored to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructuredAnchor {
    /// Canvas was empty.
    Origin,
    /// Same row as the parent's last existing child.
    BesideSibling { sibling_id: NodeId },
    /// Parent had no resolvable children yet.
    BelowParent { parent_id: NodeId },
    /// No usable parent; right of the rightmost node.
    RightOfCanvas,
}

impl StructuredAnchor {
    pub fn as_str(&self) -> &'static str {
        match self {
            StructuredAnchor::Origin => "origin",
            StructuredAnchor::BesideSibling { .. } => "beside_sibling",
            StructuredAnchor::BelowParent { .. } => "below_parent",
            StructuredAnchor::RightOfCanvas => "right_of_canvas",
        }
    }
}

/// Result of [`place_structured_node`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredPlacement {
    pub position: Position,
    pub anchor: StructuredAnchor,
}

// ---------------------------------------------------------------------------
// Overlap detection
// ---------------------------------------------------------------------------

/// Whether a `width x height` box at `candidate` comes within
/// [`NODE_SPACING`] of any existing node.
///
/// Boxes exactly one spacing apart do not overlap.
pub fn overlaps(candidate: Position, existing: &[CanvasNode], width: f64, height: f64) -> bool {
    existing.iter().any(|node| {
        let horizontal = candidate.x < node.right() + NODE_SPACING
            && candidate.x + width + NODE_SPACING > node.position.x;
        let vertical = candidate.y < node.bottom() + NODE_SPACING
            && candidate.y + height + NODE_SPACING > node.position.y;
        horizontal && vertical
    })
}

// ---------------------------------------------------------------------------
// Drop placement
// ---------------------------------------------------------------------------

/// Probe expanding rings around `start` and return the first free candidate
/// with the ring index and direction that produced it.
///
/// Returns `None` when all `MAX_SEARCH_ITERATIONS x 8` probes overlap.
pub fn probe_free(
    start: Position,
    existing: &[CanvasNode],
    width: f64,
    height: f64,
) -> Option<(Position, u32, ProbeDirection)> {
    (1..=MAX_SEARCH_ITERATIONS).find_map(|iteration| {
        let distance = f64::from(iteration) * SEARCH_STEP;
        ProbeDirection::ORDER.iter().find_map(|&direction| {
            let (dx, dy) = direction.unit();
            let candidate = start.offset(dx * distance, dy * distance);
            (!overlaps(candidate, existing, width, height))
                .then_some((candidate, iteration, direction))
        })
    })
}

/// Nearest free position around `start`, or the fallback if the search is
/// exhausted. Always returns a position.
pub fn find_nearest_free(
    start: Position,
    existing: &[CanvasNode],
    width: f64,
    height: f64,
) -> Position {
    match probe_free(start, existing, width, height) {
        Some((position, _, _)) => position,
        None => fallback_position(existing, width, height),
    }
}

/// One spacing unit right of the rightmost edge, at the mean `y` of all
/// existing nodes. The result is not re-checked for overlap.
///
/// The new node's own size does not affect the result. An empty canvas
/// yields [`STRUCTURED_ORIGIN`].
pub fn fallback_position(existing: &[CanvasNode], _width: f64, _height: f64) -> Position {
    right_of_canvas(existing, NODE_SPACING).unwrap_or(STRUCTURED_ORIGIN)
}

/// Position for a node dropped at `requested`, using default dimensions when
/// `width`/`height` are not given.
pub fn smart_drop_position(
    existing: &[CanvasNode],
    requested: Position,
    width: Option<f64>,
    height: Option<f64>,
) -> Position {
    place_dropped_node(existing, requested, width, height).position
}

/// Like [`smart_drop_position`] but also reports which branch fired.
pub fn place_dropped_node(
    existing: &[CanvasNode],
    requested: Position,
    width: Option<f64>,
    height: Option<f64>,
) -> DropPlacement {
    let width = width.unwrap_or(DEFAULT_NODE_WIDTH);
    let height = height.unwrap_or(DEFAULT_NODE_HEIGHT);

    if existing.is_empty() || !overlaps(requested, existing, width, height) {
        return DropPlacement {
            position: requested,
            outcome: DropOutcome::Requested,
        };
    }

    match probe_free(requested, existing, width, height) {
        Some((position, iteration, direction)) => DropPlacement {
            position,
            outcome: DropOutcome::Probed {
                iteration,
                direction,
            },
        },
        None => DropPlacement {
            position: fallback_position(existing, width, height),
            outcome: DropOutcome::Fallback,
        },
    }
}

// ---------------------------------------------------------------------------
// Structured placement
// ---------------------------------------------------------------------------

/// Position for a node inserted programmatically under `parent_id`.
pub fn structured_position(
    existing: &[CanvasNode],
    edges: &[CanvasEdge],
    parent_id: Option<&str>,
) -> Position {
    place_structured_node(existing, edges, parent_id).position
}

/// Like [`structured_position`] but also reports the anchor used.
///
/// - Empty canvas: [`STRUCTURED_ORIGIN`].
/// - Parent with children: right of the last child (in edge order) by that
///   child's width plus spacing, same row.
/// - Parent without children: below the parent by its height plus twice the
///   spacing, same column.
/// - Otherwise: two spacing units right of the rightmost node, at mean `y`.
pub fn place_structured_node(
    existing: &[CanvasNode],
    edges: &[CanvasEdge],
    parent_id: Option<&str>,
) -> StructuredPlacement {
    if existing.is_empty() {
        return StructuredPlacement {
            position: STRUCTURED_ORIGIN,
            anchor: StructuredAnchor::Origin,
        };
    }

    let parent = parent_id.and_then(|id| find_node(existing, id));

    if let Some(parent) = parent {
        let last_child = edges
            .iter()
            .filter(|edge| edge.source == parent.id)
            .filter_map(|edge| find_node(existing, &edge.target))
            .last();

        return match last_child {
            Some(child) => StructuredPlacement {
                position: Position::new(child.right() + NODE_SPACING, child.position.y),
                anchor: StructuredAnchor::BesideSibling {
                    sibling_id: child.id.clone(),
                },
            },
            None => StructuredPlacement {
                position: Position::new(
                    parent.position.x,
                    parent.bottom() + 2.0 * NODE_SPACING,
                ),
                anchor: StructuredAnchor::BelowParent {
                    parent_id: parent.id.clone(),
                },
            },
        };
    }

    StructuredPlacement {
        position: right_of_canvas(existing, 2.0 * NODE_SPACING).unwrap_or(STRUCTURED_ORIGIN),
        anchor: StructuredAnchor::RightOfCanvas,
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn find_node<'a>(nodes: &'a [CanvasNode], id: &str) -> Option<&'a CanvasNode> {
    nodes.iter().find(|node| node.id == id)
}

/// `gap` right of the rightmost edge at the mean `y`; `None` when empty.
fn right_of_canvas(nodes: &[CanvasNode], gap: f64) -> Option<Position> {
    if nodes.is_empty() {
        return None;
    }
    let rightmost = nodes
        .iter()
        .map(CanvasNode::right)
        .fold(f64::NEG_INFINITY, f64::max);
    let mean_y = nodes.iter().map(|node| node.position.y).sum::<f64>() / nodes.len() as f64;
    Some(Position::new(rightmost + gap, mean_y))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

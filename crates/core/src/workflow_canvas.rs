//! Workflow canvas constants and validation.
//!
//! Defines the research step node types, canvas geometry defaults shared with
//! the placement heuristics, and validation for graphs submitted by the
//! canvas client.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::types::{CanvasEdge, CanvasNode, Position};

// ---------------------------------------------------------------------------
// Node type constants
// ---------------------------------------------------------------------------

/// Research automation steps a workflow node can represent.
pub mod node_types {
    pub const CREATE_PROJECT: &str = "create_project";
    pub const GENERATE_PERSONAS: &str = "generate_personas";
    pub const RUN_FOCUS_GROUP: &str = "run_focus_group";
    pub const DISTRIBUTE_SURVEY: &str = "distribute_survey";
    pub const ANALYZE: &str = "analyze";
    pub const EXPORT: &str = "export";
    pub const CUSTOM: &str = "custom";

    /// All recognised node types.
    pub const ALL: &[&str] = &[
        CREATE_PROJECT,
        GENERATE_PERSONAS,
        RUN_FOCUS_GROUP,
        DISTRIBUTE_SURVEY,
        ANALYZE,
        EXPORT,
        CUSTOM,
    ];
}

// ---------------------------------------------------------------------------
// Canvas defaults
// ---------------------------------------------------------------------------

/// Width assumed for a node the client has not measured yet.
pub const DEFAULT_NODE_WIDTH: f64 = 200.0;

/// Height assumed for a node the client has not measured yet.
pub const DEFAULT_NODE_HEIGHT: f64 = 80.0;

/// Minimum gap kept between placed nodes.
pub const NODE_SPACING: f64 = 50.0;

/// Distance added per ring when probing for a free slot.
pub const SEARCH_STEP: f64 = NODE_SPACING;

/// Number of rings probed before giving up and using the fallback.
pub const MAX_SEARCH_ITERATIONS: u32 = 20;

/// Where the first node of an empty canvas goes on programmatic insertion.
pub const STRUCTURED_ORIGIN: Position = Position::new(100.0, 100.0);

/// Default maximum number of nodes allowed on a single canvas.
pub const MAX_NODES_PER_CANVAS: usize = 500;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check whether a node type string is recognised.
pub fn is_valid_node_type(node_type: &str) -> bool {
    node_types::ALL.contains(&node_type)
}

/// Validate that a node count does not exceed `max_nodes`.
pub fn validate_node_count(count: usize, max_nodes: usize) -> Result<(), CoreError> {
    if count > max_nodes {
        Err(CoreError::Validation(format!(
            "Canvas has {count} nodes, exceeding the maximum of {max_nodes}"
        )))
    } else {
        Ok(())
    }
}

/// Validate a node size: both values finite and non-negative.
pub fn validate_dimensions(width: f64, height: f64) -> Result<(), CoreError> {
    if !width.is_finite() || !height.is_finite() {
        return Err(CoreError::Validation(
            "Width and height must be finite numbers".to_string(),
        ));
    }
    if width < 0.0 || height < 0.0 {
        return Err(CoreError::Validation(format!(
            "Width and height must not be negative (got {width}x{height})"
        )));
    }
    Ok(())
}

/// Validate that both coordinates are finite.
pub fn validate_position(position: Position) -> Result<(), CoreError> {
    if position.x.is_finite() && position.y.is_finite() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Position ({}, {}) must have finite coordinates",
            position.x, position.y
        )))
    }
}

/// Validate a single node: non-empty id, known step type if given, geometry.
pub fn validate_node(node: &CanvasNode) -> Result<(), CoreError> {
    if node.id.trim().is_empty() {
        return Err(CoreError::Validation("Node id must not be empty".to_string()));
    }
    if let Some(node_type) = node.node_type.as_deref() {
        if !is_valid_node_type(node_type) {
            return Err(CoreError::Validation(format!(
                "Node '{}': unknown node type '{node_type}'. Valid types: {}",
                node.id,
                node_types::ALL.join(", ")
            )));
        }
    }
    validate_position(node.position)
        .map_err(|e| CoreError::Validation(format!("Node '{}': {}", node.id, strip(e))))?;
    validate_dimensions(node.effective_width(), node.effective_height())
        .map_err(|e| CoreError::Validation(format!("Node '{}': {}", node.id, strip(e))))
}

/// Validate a whole node/edge graph as submitted by the canvas client.
///
/// Checks the node limit, unique non-empty ids, node types and geometry, and
/// that every edge joins two distinct existing nodes.
pub fn validate_graph(
    nodes: &[CanvasNode],
    edges: &[CanvasEdge],
    max_nodes: usize,
) -> Result<(), CoreError> {
    validate_node_count(nodes.len(), max_nodes)?;

    let mut ids: HashSet<&str> = HashSet::with_capacity(nodes.len());
    for node in nodes {
        validate_node(node)?;
        if !ids.insert(node.id.as_str()) {
            return Err(CoreError::Validation(format!("Duplicate node id '{}'", node.id)));
        }
    }

    for edge in edges {
        if edge.source == edge.target {
            return Err(CoreError::Validation(format!(
                "Edge from '{}' to itself is not allowed",
                edge.source
            )));
        }
        for endpoint in [&edge.source, &edge.target] {
            if !ids.contains(endpoint.as_str()) {
                return Err(CoreError::Validation(format!(
                    "Edge {} -> {} references unknown node '{endpoint}'",
                    edge.source, edge.target
                )));
            }
        }
    }

    Ok(())
}

/// Unwrap the message of a validation error so it can be re-prefixed.
fn strip(err: CoreError) -> String {
    match err {
        CoreError::Validation(msg) => msg,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Node type validation -----------------------------------------------

    #[test]
    fn valid_node_type_accepted() {
        assert!(is_valid_node_type("create_project"));
        assert!(is_valid_node_type("run_focus_group"));
        assert!(is_valid_node_type("export"));
    }

    #[test]
    fn invalid_node_type_rejected() {
        assert!(!is_valid_node_type("sampler"));
        assert!(!is_valid_node_type(""));
    }

    #[test]
    fn node_with_known_type_accepted() {
        let node = CanvasNode::new("focus", 0.0, 0.0).with_type(node_types::RUN_FOCUS_GROUP);
        assert!(validate_node(&node).is_ok());
    }

    #[test]
    fn node_with_unknown_type_rejected() {
        let node = CanvasNode::new("focus", 0.0, 0.0).with_type("sampler");
        let msg = validate_node(&node).unwrap_err().to_string();
        assert!(msg.contains("unknown node type 'sampler'"));
        assert!(msg.contains("run_focus_group"));
    }

    #[test]
    fn untyped_node_accepted() {
        assert!(validate_node(&CanvasNode::new("plain", 0.0, 0.0)).is_ok());
    }

    // -- Node count validation ----------------------------------------------

    #[test]
    fn node_count_within_limit() {
        assert!(validate_node_count(0, MAX_NODES_PER_CANVAS).is_ok());
        assert!(validate_node_count(100, MAX_NODES_PER_CANVAS).is_ok());
        assert!(validate_node_count(MAX_NODES_PER_CANVAS, MAX_NODES_PER_CANVAS).is_ok());
    }

    #[test]
    fn node_count_exceeds_limit() {
        let err =
            validate_node_count(MAX_NODES_PER_CANVAS + 1, MAX_NODES_PER_CANVAS).unwrap_err();
        assert!(err.to_string().contains("exceeding the maximum"));
    }

    #[test]
    fn node_count_uses_given_limit() {
        assert!(validate_node_count(3, 3).is_ok());
        let msg = validate_node_count(4, 3).unwrap_err().to_string();
        assert!(msg.contains("maximum of 3"));
    }

    // -- Geometry validation ------------------------------------------------

    #[test]
    fn zero_dimensions_accepted() {
        assert!(validate_dimensions(0.0, 0.0).is_ok());
    }

    #[test]
    fn negative_dimensions_rejected() {
        let msg = validate_dimensions(-1.0, 80.0).unwrap_err().to_string();
        assert!(msg.contains("must not be negative"));
    }

    #[test]
    fn non_finite_position_rejected() {
        assert!(validate_position(Position::new(f64::INFINITY, 0.0)).is_err());
        assert!(validate_position(Position::new(0.0, f64::NAN)).is_err());
        assert!(validate_position(Position::new(-10.0, 10.0)).is_ok());
    }

    #[test]
    fn node_error_names_the_node() {
        let node = CanvasNode::new("persona-gen", 0.0, 0.0).with_size(-5.0, 80.0);
        let msg = validate_node(&node).unwrap_err().to_string();
        assert!(msg.contains("Node 'persona-gen'"));
        assert!(!msg.contains("Validation failed: Node 'persona-gen': Validation failed"));
    }

    // -- Graph validation ---------------------------------------------------

    #[test]
    fn well_formed_graph_accepted() {
        let nodes = vec![
            CanvasNode::new("project", 0.0, 0.0),
            CanvasNode::new("personas", 0.0, 180.0),
        ];
        let edges = vec![CanvasEdge::new("project", "personas")];
        assert!(validate_graph(&nodes, &edges, MAX_NODES_PER_CANVAS).is_ok());
    }

    #[test]
    fn duplicate_node_ids_rejected() {
        let nodes = vec![CanvasNode::new("a", 0.0, 0.0), CanvasNode::new("a", 300.0, 0.0)];
        let msg = validate_graph(&nodes, &[], MAX_NODES_PER_CANVAS)
            .unwrap_err()
            .to_string();
        assert!(msg.contains("Duplicate node id 'a'"));
    }

    #[test]
    fn empty_node_id_rejected() {
        let nodes = vec![CanvasNode::new("  ", 0.0, 0.0)];
        assert!(validate_graph(&nodes, &[], MAX_NODES_PER_CANVAS).is_err());
    }

    #[test]
    fn dangling_edge_rejected() {
        let nodes = vec![CanvasNode::new("a", 0.0, 0.0)];
        let edges = vec![CanvasEdge::new("a", "ghost")];
        let msg = validate_graph(&nodes, &edges, MAX_NODES_PER_CANVAS)
            .unwrap_err()
            .to_string();
        assert!(msg.contains("unknown node 'ghost'"));
    }

    #[test]
    fn self_loop_rejected() {
        let nodes = vec![CanvasNode::new("a", 0.0, 0.0)];
        let edges = vec![CanvasEdge::new("a", "a")];
        assert!(validate_graph(&nodes, &edges, MAX_NODES_PER_CANVAS).is_err());
    }
}

//! Geometry primitives shared by the canvas validation and placement code.

use serde::{Deserialize, Serialize};

use crate::workflow_canvas::{DEFAULT_NODE_HEIGHT, DEFAULT_NODE_WIDTH};

/// Canvas node identifiers are client-generated strings.
pub type NodeId = String;

/// Top-left corner of a node, in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Shift by `(dx, dy)`.
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A positioned rectangle on the workflow canvas.
///
/// Width and height are optional because the client only reports them once a
/// node has been measured; the defaults apply until then.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasNode {
    pub id: NodeId,
    /// Research step this node runs; see [`crate::workflow_canvas::node_types`].
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl CanvasNode {
    /// Node with default dimensions.
    pub fn new(id: impl Into<NodeId>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            node_type: None,
            position: Position::new(x, y),
            width: None,
            height: None,
        }
    }

    /// Builder-style override of both dimensions.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Builder-style override of the step type.
    pub fn with_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    pub fn effective_width(&self) -> f64 {
        self.width.unwrap_or(DEFAULT_NODE_WIDTH)
    }

    pub fn effective_height(&self) -> f64 {
        self.height.unwrap_or(DEFAULT_NODE_HEIGHT)
    }

    /// X coordinate of the right edge.
    pub fn right(&self) -> f64 {
        self.position.x + self.effective_width()
    }

    /// Y coordinate of the bottom edge.
    pub fn bottom(&self) -> f64 {
        self.position.y + self.effective_height()
    }
}

/// A directed `source -> target` link between two canvas nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasEdge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: NodeId,
    pub target: NodeId,
}

impl CanvasEdge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: None,
            source: source.into(),
            target: target.into(),
        }
    }
}

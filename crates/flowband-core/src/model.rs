use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Vertical placement of one label's stacked region on one side.
///
/// Invariant: `top == bottom + extent`; for consecutive labels,
/// `bottom[i] == top[i - 1] + 0.02 * side_total`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StackPosition {
    pub bottom: f64,
    pub top: f64,
    pub extent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLayout {
    pub label: String,
    pub position: StackPosition,
    pub color: String,
}

/// The filled region connecting one left label to one right label.
///
/// `x`, `y_lower` and `y_upper` are parallel arrays; the strip is the region
/// between the two curves. Coordinates are y-up with the diagram base at 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripLayout {
    pub left_label: String,
    pub right_label: String,
    pub left_weight: f64,
    pub right_weight: f64,
    pub color: String,
    pub x: Vec<f64>,
    pub y_lower: Vec<f64>,
    pub y_upper: Vec<f64>,
}

/// Pure coordinate output of the layout computation, independent of any
/// rendering backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyLayout {
    /// Horizontal extent of the strip area (`top_edge / aspect`); the left
    /// column sits at x <= 0 and the right column at x >= x_max.
    pub x_max: f64,
    /// Frame height. Follows the side laid out last (the right side); both
    /// per-side edges are exposed below.
    pub top_edge: f64,
    pub left_top_edge: f64,
    pub right_top_edge: f64,
    pub left_nodes: Vec<NodeLayout>,
    pub right_nodes: Vec<NodeLayout>,
    pub strips: Vec<StripLayout>,
    /// Resolved label -> color assignment, in palette order. An explicit
    /// caller mapping is passed through here unchanged.
    pub colors: IndexMap<String, String>,
}

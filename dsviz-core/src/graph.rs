//! Node/edge lists handed to whatever draws the maze.
//!
//! The renderer is a collaborator: it gets positions, payloads and edge
//! styles, and owns layout, pan and zoom itself.

use serde::Serialize;

use crate::error::{DsvizError, Result};
use crate::maze::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeStyle {
    #[default]
    Plain,
    /// The edge the walker took
    Best,
    /// The edge to the lightest option it had
    Worst,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodePayload {
    pub cell: Cell,
    /// `None` for hazards
    pub weight: Option<f64>,
    pub is_agent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: String,
    pub position: (i32, i32),
    pub data: NodePayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub style: EdgeStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| DsvizError::json("maze graph", e))
    }

    pub fn edge_between(&self, a: &str, b: &str) -> Option<&Edge> {
        self.edges.iter().find(|edge| {
            (edge.source == a && edge.target == b) || (edge.source == b && edge.target == a)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::maze::{Grid, Maze};
    use std::time::Duration;

    #[test]
    fn test_json_shape() {
        let maze = Maze::new(Grid::default(), Duration::from_millis(500));
        let json: serde_json::Value =
            serde_json::from_str(&maze.graph().to_json_pretty().unwrap()).unwrap();

        assert_eq!(json["nodes"].as_array().unwrap().len(), 16);
        assert_eq!(json["nodes"][4]["id"], "1-0");
        assert_eq!(json["nodes"][4]["data"]["cell"], "start");
        assert_eq!(json["nodes"][4]["data"]["is_agent"], true);
        assert_eq!(json["nodes"][4]["position"][1], 150);
        assert!(json["edges"]
            .as_array()
            .unwrap()
            .iter()
            .all(|edge| edge["style"] == "plain"));
    }

    #[test]
    fn test_no_edges_touch_hazards() {
        let graph = Maze::new(Grid::default(), Duration::from_millis(500)).graph();
        // (2,0) is a hazard
        assert!(graph.edges.iter().all(|e| e.source != "0-2" && e.target != "0-2"));
        assert!(graph.edge_between("1-0", "0-0").is_some());
    }
}

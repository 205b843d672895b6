use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Area of the business a strategy node belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub enum StrategyNodeCategory {
    /// Customers, channels, competitors
    Market,
    /// The offering and its features
    #[default]
    Product,
    /// Internal processes and logistics
    Operation,
    /// Revenue, costs, funding
    Finance,
    /// Regulations and dependencies
    Risk,
}

impl StrategyNodeCategory {
    pub const ALL: [Self; 5] = [
        Self::Market,
        Self::Product,
        Self::Operation,
        Self::Finance,
        Self::Risk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Market => "Market",
            Self::Product => "Product",
            Self::Operation => "Operation",
            Self::Finance => "Finance",
            Self::Risk => "Risk",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "market" => Some(Self::Market),
            "product" => Some(Self::Product),
            "operation" | "operations" => Some(Self::Operation),
            "finance" => Some(Self::Finance),
            "risk" => Some(Self::Risk),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct StrategyNode {
    pub id: String,
    pub label: String,
    pub category: StrategyNodeCategory,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct StrategyEdge {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Strategy graph with laid-out nodes.
///
/// Serializes to the same `{nodes, edges}` shape that is persisted for the
/// map editor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct StrategyMapData {
    #[serde(default)]
    pub nodes: Vec<StrategyNode>,
    #[serde(default)]
    pub edges: Vec<StrategyEdge>,
}

impl StrategyMapData {
    pub fn node(&self, id: &str) -> Option<&StrategyNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Checks node-id uniqueness and that every edge endpoint exists.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(CoreError::Validation(format!(
                    "Duplicate strategy node id: {}",
                    node.id
                )));
            }
        }

        for edge in &self.edges {
            if !seen.contains(edge.from.as_str()) || !seen.contains(edge.to.as_str()) {
                return Err(CoreError::DanglingEdge {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                });
            }
        }

        Ok(())
    }

    /// Adds a directed connection between two existing nodes.
    ///
    /// Returns `Ok(false)` when the edge already exists or would connect a
    /// node to itself.
    pub fn connect(&mut self, from: &str, to: &str, label: Option<String>) -> Result<bool> {
        for id in [from, to] {
            if !self.contains_node(id) {
                return Err(CoreError::NodeNotFound(id.to_string()));
            }
        }

        if from == to || self.edges.iter().any(|e| e.from == from && e.to == to) {
            return Ok(false);
        }

        self.edges.push(StrategyEdge {
            from: from.to_string(),
            to: to.to_string(),
            label,
        });
        Ok(true)
    }

    pub fn relabel_edge(&mut self, index: usize, label: impl Into<String>) -> Result<()> {
        let edge = self
            .edges
            .get_mut(index)
            .ok_or(CoreError::EdgeNotFound(index))?;
        edge.label = Some(label.into());
        Ok(())
    }

    pub fn move_node(&mut self, id: &str, x: f64, y: f64) -> Result<()> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| CoreError::NodeNotFound(id.to_string()))?;
        node.x = x;
        node.y = y;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, category: StrategyNodeCategory) -> StrategyNode {
        StrategyNode {
            id: id.to_string(),
            label: id.to_uppercase(),
            category,
            x: 400.0,
            y: 300.0,
        }
    }

    fn sample_map() -> StrategyMapData {
        StrategyMapData {
            nodes: vec![
                node("app", StrategyNodeCategory::Product),
                node("users", StrategyNodeCategory::Market),
            ],
            edges: vec![],
        }
    }

    #[test]
    fn test_connect_existing_nodes() {
        let mut map = sample_map();
        assert!(map.connect("app", "users", Some("Distribution".into())).unwrap());
        assert_eq!(map.edges.len(), 1);
        assert!(map.validate().is_ok());
    }

    #[test]
    fn test_connect_rejects_unknown_node() {
        let mut map = sample_map();
        let err = map.connect("app", "ghost", None).unwrap_err();
        assert_eq!(err, CoreError::NodeNotFound("ghost".to_string()));
        assert!(map.edges.is_empty());
    }

    #[test]
    fn test_connect_ignores_duplicates_and_self_loops() {
        let mut map = sample_map();
        assert!(map.connect("app", "users", None).unwrap());
        assert!(!map.connect("app", "users", None).unwrap());
        assert!(!map.connect("app", "app", None).unwrap());
        assert_eq!(map.edges.len(), 1);
    }

    #[test]
    fn test_validate_detects_dangling_edge() {
        let mut map = sample_map();
        map.edges.push(StrategyEdge {
            from: "app".to_string(),
            to: "missing".to_string(),
            label: None,
        });
        assert!(matches!(
            map.validate(),
            Err(CoreError::DanglingEdge { .. })
        ));
    }

    #[test]
    fn test_relabel_and_move() {
        let mut map = sample_map();
        map.connect("app", "users", None).unwrap();
        map.relabel_edge(0, "Flows To").unwrap();
        assert_eq!(map.edges[0].label.as_deref(), Some("Flows To"));
        assert_eq!(map.relabel_edge(5, "x"), Err(CoreError::EdgeNotFound(5)));

        map.move_node("users", 10.0, 20.0).unwrap();
        let moved = map.node("users").unwrap();
        assert_eq!((moved.x, moved.y), (10.0, 20.0));
    }

    #[test]
    fn test_edge_label_is_optional_in_json() {
        let edge: StrategyEdge = serde_json::from_str(r#"{"from":"a","to":"b"}"#).unwrap();
        assert!(edge.label.is_none());
        let json = serde_json::to_string(&edge).unwrap();
        assert!(!json.contains("label"));
    }
}

use std::collections::HashSet;

use gemini::{ModelGateway, StructuredRequest};
use lens_core::{RequestConfiguration, StrategyMapData, StrategyNode, StrategyNodeCategory};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::normalize::{decode, non_blank};
use crate::error::Result;
use crate::layout::{self, JitterSource};
use crate::{prompts, schemas};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMap {
    nodes: Option<Vec<RawNode>>,
    edges: Option<Vec<RawEdge>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawNode {
    id: Option<String>,
    label: Option<String>,
    category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawEdge {
    from: Option<String>,
    to: Option<String>,
    label: Option<String>,
}

/// Builds the laid-out graph from a raw reply.
///
/// Node ids are made unique, unknown categories become Product, and edges
/// that do not join two kept nodes are dropped, so the result always
/// passes [`StrategyMapData::validate`].
fn build_map(raw: RawMap, jitter: &mut dyn JitterSource) -> StrategyMapData {
    let mut map = StrategyMapData::default();
    let mut seen: HashSet<String> = HashSet::new();

    for (n, node) in raw.nodes.unwrap_or_default().into_iter().enumerate() {
        let id = match non_blank(node.id) {
            Some(id) => id,
            None => {
                let mut counter = n + 1;
                while seen.contains(&format!("node-{}", counter)) {
                    counter += 1;
                }
                format!("node-{}", counter)
            }
        };

        if !seen.insert(id.clone()) {
            debug!(id = %id, "Dropping duplicate strategy node");
            continue;
        }

        let category = match node.category.as_deref() {
            Some(raw_category) => StrategyNodeCategory::parse(raw_category).unwrap_or_else(|| {
                warn!(category = %raw_category, "Unknown node category, using Product");
                StrategyNodeCategory::Product
            }),
            None => StrategyNodeCategory::Product,
        };

        let (x, y) = layout::position(category, map.nodes.len(), jitter);
        map.nodes.push(StrategyNode {
            label: non_blank(node.label).unwrap_or_else(|| id.clone()),
            id,
            category,
            x,
            y,
        });
    }

    for edge in raw.edges.unwrap_or_default() {
        let (Some(from), Some(to)) = (non_blank(edge.from), non_blank(edge.to)) else {
            continue;
        };

        match map.connect(&from, &to, non_blank(edge.label)) {
            Ok(true) => {}
            Ok(false) => debug!(from = %from, to = %to, "Skipping duplicate or self edge"),
            Err(e) => debug!(error = %e, "Dropping edge with unknown endpoint"),
        }
    }

    map
}

pub async fn generate_strategy_map<G>(
    gateway: &G,
    config: &RequestConfiguration,
    jitter: &mut dyn JitterSource,
) -> Result<StrategyMapData>
where
    G: ModelGateway + ?Sized,
{
    config.validate()?;

    let request = StructuredRequest::new(
        prompts::strategy_map_prompt(config.topic(), config.stage),
        schemas::strategy_map_schema(),
    );
    let response = gateway.generate_structured(request).await?;
    let raw: RawMap = decode(response.value, "strategy map")?;

    let map = build_map(raw, jitter);
    info!(
        nodes = map.nodes.len(),
        edges = map.edges.len(),
        "Strategy map generated"
    );
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::NoJitter;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawMap {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_build_map_normalizes_nodes() {
        let map = build_map(
            raw(json!({
                "nodes": [
                    {"id": "app", "label": "App", "category": "Product"},
                    {"id": "app", "label": "Again", "category": "Market"},
                    {"label": "Nameless", "category": "Operations"},
                    {"id": "x", "category": "Vibes"}
                ]
            })),
            &mut NoJitter,
        );

        let ids: Vec<&str> = map.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["app", "node-3", "x"]);
        assert_eq!(map.nodes[1].category, StrategyNodeCategory::Operation);
        assert_eq!(map.nodes[2].category, StrategyNodeCategory::Product);
        assert_eq!(map.nodes[2].label, "x");
    }

    #[test]
    fn test_build_map_drops_dangling_edges() {
        let map = build_map(
            raw(json!({
                "nodes": [
                    {"id": "a", "label": "A", "category": "Product"},
                    {"id": "b", "label": "B", "category": "Market"}
                ],
                "edges": [
                    {"from": "a", "to": "b", "label": "Distribution"},
                    {"from": "a", "to": "ghost"},
                    {"from": "a", "to": "b"},
                    {"to": "b"}
                ]
            })),
            &mut NoJitter,
        );

        assert_eq!(map.edges.len(), 1);
        assert_eq!(map.edges[0].label.as_deref(), Some("Distribution"));
        assert!(map.validate().is_ok());
    }

    #[test]
    fn test_generated_id_skips_taken_names() {
        let map = build_map(
            raw(json!({
                "nodes": [
                    {"id": "node-2", "category": "Risk"},
                    {"id": " ", "category": "Risk"}
                ]
            })),
            &mut NoJitter,
        );
        assert_eq!(map.nodes[1].id, "node-3");
    }
}

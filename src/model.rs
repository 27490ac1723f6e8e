use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Property types supported by the schema document format. The short
/// tokens (`str`, `int`, ...) are the wire spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PropertyKind {
    #[default]
    #[serde(rename = "str")]
    Str,
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "date")]
    Date,
}

impl PropertyKind {
    /// Parse a wire token, accepting both the short and long spellings.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "str" | "string" => Some(PropertyKind::Str),
            "int" | "integer" => Some(PropertyKind::Int),
            "float" => Some(PropertyKind::Float),
            "bool" | "boolean" => Some(PropertyKind::Bool),
            "date" => Some(PropertyKind::Date),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKind::Str => "str",
            PropertyKind::Int => "int",
            PropertyKind::Float => "float",
            PropertyKind::Bool => "bool",
            PropertyKind::Date => "date",
        }
    }
}

/// A typed, flag-annotated description of one property. Flags stay
/// `Option` so that absent and explicitly-false survive a round trip
/// unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PropertyDefinition {
    #[serde(rename = "type", default)]
    pub kind: PropertyKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<bool>,
}

/// One typed entity in the graph. `caption` is the human-facing entity
/// name and the key used when exporting to a schema document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub position: Point,
    pub caption: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyDefinition>,
    #[serde(default)]
    pub style: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub rel_type: String,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyDefinition>,
    #[serde(default)]
    pub style: BTreeMap<String, Value>,
}

/// Canonical graph state. Entities live in maps keyed by id; the order
/// vectors remember insertion order so that exports and layouts are
/// deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: HashMap<String, Node>,
    #[serde(default)]
    pub node_order: Vec<String>,
    #[serde(default)]
    pub relationships: HashMap<String, Relationship>,
    #[serde(default)]
    pub rel_order: Vec<String>,
    #[serde(default)]
    pub style: BTreeMap<String, Value>,
}

impl Default for Graph {
    fn default() -> Self {
        let mut style = BTreeMap::new();
        style.insert("background".to_string(), Value::String("white".into()));
        Self {
            nodes: HashMap::new(),
            node_order: Vec::new(),
            relationships: HashMap::new(),
            rel_order: Vec::new(),
            style,
        }
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn relationship(&self, id: &str) -> Option<&Relationship> {
        self.relationships.get(id)
    }

    /// Nodes in insertion order.
    pub fn nodes_ordered(&self) -> impl Iterator<Item = &Node> {
        self.node_order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Relationships in insertion order.
    pub fn relationships_ordered(&self) -> impl Iterator<Item = &Relationship> {
        self.rel_order.iter().filter_map(|id| self.relationships.get(id))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn insert_node(&mut self, node: Node) {
        if !self.nodes.contains_key(&node.id) {
            self.node_order.push(node.id.clone());
        }
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn insert_relationship(&mut self, relationship: Relationship) {
        if !self.relationships.contains_key(&relationship.id) {
            self.rel_order.push(relationship.id.clone());
        }
        self.relationships
            .insert(relationship.id.clone(), relationship);
    }

    /// Insert a node at a remembered order position, clamped to the
    /// current length. Used when undoing a deletion.
    pub fn insert_node_at(&mut self, index: usize, node: Node) {
        if !self.nodes.contains_key(&node.id) {
            let index = index.min(self.node_order.len());
            self.node_order.insert(index, node.id.clone());
        }
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn insert_relationship_at(&mut self, index: usize, relationship: Relationship) {
        if !self.relationships.contains_key(&relationship.id) {
            let index = index.min(self.rel_order.len());
            self.rel_order.insert(index, relationship.id.clone());
        }
        self.relationships
            .insert(relationship.id.clone(), relationship);
    }

    /// Remove a node and every relationship touching it. The returned
    /// snapshot carries the order positions of everything removed so an
    /// undo can restore the graph exactly.
    pub fn remove_node(&mut self, node_id: &str) -> Option<RemovedNode> {
        let node = self.nodes.remove(node_id)?;
        let node_index = self
            .node_order
            .iter()
            .position(|id| id == node_id)
            .unwrap_or(self.node_order.len());
        self.node_order.retain(|id| id != node_id);

        let cascaded_ids: Vec<(String, usize)> = self
            .rel_order
            .iter()
            .enumerate()
            .filter(|(_, id)| {
                self.relationships
                    .get(*id)
                    .is_some_and(|rel| rel.from == node_id || rel.to == node_id)
            })
            .map(|(index, id)| (id.clone(), index))
            .collect();

        let mut cascaded = Vec::with_capacity(cascaded_ids.len());
        for (id, index) in &cascaded_ids {
            if let Some(rel) = self.relationships.remove(id) {
                cascaded.push((rel, *index));
            }
        }
        self.rel_order
            .retain(|id| !cascaded_ids.iter().any(|(removed, _)| removed == id));

        Some(RemovedNode {
            node,
            node_index,
            cascaded,
        })
    }

    pub fn remove_relationship(&mut self, rel_id: &str) -> Option<(Relationship, usize)> {
        let removed = self.relationships.remove(rel_id)?;
        let index = self
            .rel_order
            .iter()
            .position(|id| id == rel_id)
            .unwrap_or(self.rel_order.len());
        self.rel_order.retain(|id| id != rel_id);
        Some((removed, index))
    }
}

/// Result of a cascading node removal: the node, its order position,
/// and every incident relationship with its order position.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedNode {
    pub node: Node,
    pub node_index: usize,
    pub cascaded: Vec<(Relationship, usize)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, caption: &str) -> Node {
        Node {
            id: id.to_string(),
            position: Point::new(0.0, 0.0),
            caption: caption.to_string(),
            labels: vec![caption.to_string()],
            properties: BTreeMap::new(),
            style: BTreeMap::new(),
        }
    }

    fn rel(id: &str, from: &str, to: &str) -> Relationship {
        Relationship {
            id: id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            rel_type: "KNOWS".to_string(),
            properties: BTreeMap::new(),
            style: BTreeMap::new(),
        }
    }

    #[test]
    fn remove_node_cascades_incident_relationships() {
        let mut graph = Graph::new();
        graph.insert_node(node("a", "A"));
        graph.insert_node(node("b", "B"));
        graph.insert_node(node("c", "C"));
        graph.insert_relationship(rel("r1", "a", "b"));
        graph.insert_relationship(rel("r2", "b", "c"));
        graph.insert_relationship(rel("r3", "c", "a"));

        let removed = graph.remove_node("a").unwrap();
        assert_eq!(removed.node.caption, "A");
        assert_eq!(removed.node_index, 0);
        let mut ids: Vec<&str> = removed.cascaded.iter().map(|(r, _)| r.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["r1", "r3"]);

        assert!(
            graph
                .relationships
                .values()
                .all(|r| r.from != "a" && r.to != "a")
        );
        assert_eq!(graph.rel_order, vec!["r2"]);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut graph = Graph::new();
        for id in ["x", "y", "z"] {
            graph.insert_node(node(id, id));
        }
        let captions: Vec<&str> = graph.nodes_ordered().map(|n| n.caption.as_str()).collect();
        assert_eq!(captions, vec!["x", "y", "z"]);
    }

    #[test]
    fn removal_snapshot_restores_exact_order() {
        let mut graph = Graph::new();
        for id in ["x", "y", "z"] {
            graph.insert_node(node(id, id));
        }
        let removed = graph.remove_node("y").unwrap();
        graph.insert_node_at(removed.node_index, removed.node);
        assert_eq!(graph.node_order, vec!["x", "y", "z"]);
    }

    #[test]
    fn property_kind_accepts_both_spellings() {
        assert_eq!(PropertyKind::parse("str"), Some(PropertyKind::Str));
        assert_eq!(PropertyKind::parse("string"), Some(PropertyKind::Str));
        assert_eq!(PropertyKind::parse("integer"), Some(PropertyKind::Int));
        assert_eq!(PropertyKind::parse("datetime"), None);
    }
}

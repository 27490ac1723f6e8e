//! Canonical graph state and the full mutation surface. Every mutation
//! goes through here so that each one lands in the audit log and on the
//! undo stack before the next is observed.

use std::collections::{BTreeMap, HashSet};

use anyhow::Result;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::color::stamp_caption_colors;
use crate::history::{Command, History, Operation};
use crate::model::{Graph, Node, Point, PropertyDefinition, Relationship};
use crate::remote::RemoteStore;
use crate::selection::Selection;

/// Offset applied to duplicated nodes, in position units.
pub const DUPLICATE_OFFSET: f32 = 20.0;

const DEFAULT_ACTOR: &str = "local";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("no node with id '{0}'")]
    NodeNotFound(String),
    #[error("no relationship with id '{0}'")]
    RelationshipNotFound(String),
    #[error("relationship endpoint '{0}' does not reference an existing node")]
    DanglingEndpoint(String),
}

/// Partial node update. `properties` and `style` merge into the
/// existing maps; the other fields replace when present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeUpdate {
    pub position: Option<Point>,
    pub caption: Option<String>,
    pub labels: Option<Vec<String>>,
    pub properties: BTreeMap<String, PropertyDefinition>,
    pub style: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationshipUpdate {
    pub from: Option<String>,
    pub to: Option<String>,
    pub rel_type: Option<String>,
    pub properties: BTreeMap<String, PropertyDefinition>,
    pub style: BTreeMap<String, Value>,
}

/// One editing session over a graph. Constructed per document, never a
/// process-wide singleton, so independent graphs can coexist in tests
/// and in a multi-document UI.
#[derive(Debug)]
pub struct GraphStore {
    graph: Graph,
    selection: Selection,
    history: History,
    actor: String,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore {
    pub fn new() -> Self {
        Self::with_graph(Graph::new())
    }

    /// Wrap an existing graph, e.g. one produced by an ontology import.
    pub fn with_graph(graph: Graph) -> Self {
        Self {
            graph,
            selection: Selection::new(),
            history: History::new(),
            actor: DEFAULT_ACTOR.to_string(),
        }
    }

    pub fn with_actor(mut self, actor: &str) -> Self {
        self.actor = actor.to_string();
        self
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn audit_log(&self) -> &[Command] {
        self.history.log()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn add_node(
        &mut self,
        position: Point,
        caption: &str,
        labels: Vec<String>,
        properties: BTreeMap<String, PropertyDefinition>,
    ) -> String {
        let id = Uuid::new_v4().to_string();
        let mut style = BTreeMap::new();
        stamp_caption_colors(&mut style, caption);

        let node = Node {
            id: id.clone(),
            position,
            caption: caption.to_string(),
            labels,
            properties,
            style,
        };

        self.graph.insert_node(node.clone());
        self.history.record(Operation::CreateNode { node }, &self.actor);
        id
    }

    pub fn update_node(&mut self, id: &str, update: NodeUpdate) -> Result<(), StoreError> {
        let node = self
            .graph
            .nodes
            .get(id)
            .ok_or_else(|| StoreError::NodeNotFound(id.to_string()))?;
        let before = node.clone();

        let mut after = before.clone();
        if let Some(position) = update.position {
            after.position = position;
        }
        if let Some(labels) = update.labels {
            after.labels = labels;
        }
        after.properties.extend(update.properties);
        merge_style(&mut after.style, &update.style);
        if let Some(caption) = update.caption {
            if caption != after.caption {
                stamp_caption_colors(&mut after.style, &caption);
            }
            after.caption = caption;
        }

        self.graph.nodes.insert(id.to_string(), after.clone());
        self.history
            .record(Operation::UpdateNode { before, after }, &self.actor);
        Ok(())
    }

    pub fn delete_node(&mut self, id: &str) -> Result<(), StoreError> {
        let removed = self
            .graph
            .remove_node(id)
            .ok_or_else(|| StoreError::NodeNotFound(id.to_string()))?;

        self.selection.remove_node(id);
        for (rel, _) in &removed.cascaded {
            self.selection.remove_relationship(&rel.id);
        }

        self.history.record(
            Operation::DeleteNode {
                node: removed.node,
                node_index: removed.node_index,
                cascaded: removed.cascaded,
            },
            &self.actor,
        );
        Ok(())
    }

    pub fn add_relationship(
        &mut self,
        from: &str,
        to: &str,
        rel_type: &str,
        properties: BTreeMap<String, PropertyDefinition>,
    ) -> Result<String, StoreError> {
        self.require_node(from)?;
        self.require_node(to)?;

        let id = Uuid::new_v4().to_string();
        let relationship = Relationship {
            id: id.clone(),
            from: from.to_string(),
            to: to.to_string(),
            rel_type: rel_type.to_string(),
            properties,
            style: BTreeMap::new(),
        };

        self.graph.insert_relationship(relationship.clone());
        self.history
            .record(Operation::CreateRelationship { relationship }, &self.actor);
        Ok(id)
    }

    pub fn update_relationship(
        &mut self,
        id: &str,
        update: RelationshipUpdate,
    ) -> Result<(), StoreError> {
        let relationship = self
            .graph
            .relationships
            .get(id)
            .ok_or_else(|| StoreError::RelationshipNotFound(id.to_string()))?;
        let before = relationship.clone();

        if let Some(from) = &update.from {
            self.require_node(from)?;
        }
        if let Some(to) = &update.to {
            self.require_node(to)?;
        }

        let mut after = before.clone();
        if let Some(from) = update.from {
            after.from = from;
        }
        if let Some(to) = update.to {
            after.to = to;
        }
        if let Some(rel_type) = update.rel_type {
            after.rel_type = rel_type;
        }
        after.properties.extend(update.properties);
        merge_style(&mut after.style, &update.style);

        self.graph.relationships.insert(id.to_string(), after.clone());
        self.history
            .record(Operation::UpdateRelationship { before, after }, &self.actor);
        Ok(())
    }

    pub fn delete_relationship(&mut self, id: &str) -> Result<(), StoreError> {
        let (relationship, rel_index) = self
            .graph
            .remove_relationship(id)
            .ok_or_else(|| StoreError::RelationshipNotFound(id.to_string()))?;

        self.selection.remove_relationship(id);
        self.history.record(
            Operation::DeleteRelationship {
                relationship,
                rel_index,
            },
            &self.actor,
        );
        Ok(())
    }

    /// Clone every selected node (offset by a fixed vector) and every
    /// selected relationship whose endpoints were both selected, then
    /// move the selection onto the clones.
    pub fn duplicate_selection(&mut self) {
        let selected_nodes: Vec<String> = self
            .graph
            .node_order
            .iter()
            .filter(|id| self.selection.node_ids.contains(*id))
            .cloned()
            .collect();
        let selected_rels: Vec<String> = self
            .graph
            .rel_order
            .iter()
            .filter(|id| self.selection.relationship_ids.contains(*id))
            .cloned()
            .collect();

        let mut id_map: BTreeMap<String, String> = BTreeMap::new();
        let mut new_node_ids = HashSet::new();

        for old_id in &selected_nodes {
            let Some(original) = self.graph.nodes.get(old_id) else {
                continue;
            };
            let mut clone = original.clone();
            clone.id = Uuid::new_v4().to_string();
            clone.position = clone.position.offset(DUPLICATE_OFFSET, DUPLICATE_OFFSET);

            id_map.insert(old_id.clone(), clone.id.clone());
            new_node_ids.insert(clone.id.clone());

            self.graph.insert_node(clone.clone());
            self.history
                .record(Operation::CreateNode { node: clone }, &self.actor);
        }

        let mut new_rel_ids = HashSet::new();
        for old_id in &selected_rels {
            let Some(original) = self.graph.relationships.get(old_id) else {
                continue;
            };
            // Only duplicate when both endpoints were duplicated too.
            let (Some(new_from), Some(new_to)) =
                (id_map.get(&original.from), id_map.get(&original.to))
            else {
                continue;
            };

            let mut clone = original.clone();
            clone.id = Uuid::new_v4().to_string();
            clone.from = new_from.clone();
            clone.to = new_to.clone();

            new_rel_ids.insert(clone.id.clone());
            self.graph.insert_relationship(clone.clone());
            self.history
                .record(Operation::CreateRelationship { relationship: clone }, &self.actor);
        }

        self.selection.replace(new_node_ids, new_rel_ids);
    }

    /// Delete the selection, relationships first so that node cascades
    /// do not try to delete them a second time.
    pub fn delete_selection(&mut self) {
        let rel_ids: Vec<String> = self
            .selection
            .relationship_ids
            .iter()
            .filter(|id| self.graph.relationships.contains_key(*id))
            .cloned()
            .collect();
        for id in rel_ids {
            let deleted = self.delete_relationship(&id);
            debug_assert!(deleted.is_ok());
        }

        let node_ids: Vec<String> = self
            .selection
            .node_ids
            .iter()
            .filter(|id| self.graph.nodes.contains_key(*id))
            .cloned()
            .collect();
        for id in node_ids {
            let deleted = self.delete_node(&id);
            debug_assert!(deleted.is_ok());
        }
    }

    pub fn select_node(&mut self, id: &str, multi_select: bool) {
        self.selection.select_node(id, multi_select);
    }

    pub fn select_relationship(&mut self, id: &str, multi_select: bool) {
        self.selection.select_relationship(id, multi_select);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Revert the most recent mutation. Returns false when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(operation) = self.history.pop_undo() else {
            return false;
        };
        self.apply_inverse(&operation);
        self.history.push_redo(operation);
        true
    }

    /// Re-apply the most recently undone mutation.
    pub fn redo(&mut self) -> bool {
        let Some(operation) = self.history.pop_redo() else {
            return false;
        };
        self.apply_forward(&operation);
        self.history.push_undo(operation);
        true
    }

    fn apply_inverse(&mut self, operation: &Operation) {
        match operation {
            Operation::CreateNode { node } => {
                self.graph.remove_node(&node.id);
                self.selection.remove_node(&node.id);
            }
            Operation::UpdateNode { before, .. } => {
                self.graph.nodes.insert(before.id.clone(), before.clone());
            }
            Operation::DeleteNode {
                node,
                node_index,
                cascaded,
            } => {
                self.graph.insert_node_at(*node_index, node.clone());
                for (rel, index) in cascaded {
                    self.graph.insert_relationship_at(*index, rel.clone());
                }
            }
            Operation::CreateRelationship { relationship } => {
                self.graph.remove_relationship(&relationship.id);
                self.selection.remove_relationship(&relationship.id);
            }
            Operation::UpdateRelationship { before, .. } => {
                self.graph
                    .relationships
                    .insert(before.id.clone(), before.clone());
            }
            Operation::DeleteRelationship {
                relationship,
                rel_index,
            } => {
                self.graph
                    .insert_relationship_at(*rel_index, relationship.clone());
            }
        }
    }

    fn apply_forward(&mut self, operation: &Operation) {
        match operation {
            Operation::CreateNode { node } => {
                self.graph.insert_node(node.clone());
            }
            Operation::UpdateNode { after, .. } => {
                self.graph.nodes.insert(after.id.clone(), after.clone());
            }
            Operation::DeleteNode { node, cascaded, .. } => {
                self.graph.remove_node(&node.id);
                self.selection.remove_node(&node.id);
                for (rel, _) in cascaded {
                    self.selection.remove_relationship(&rel.id);
                }
            }
            Operation::CreateRelationship { relationship } => {
                self.graph.insert_relationship(relationship.clone());
            }
            Operation::UpdateRelationship { after, .. } => {
                self.graph
                    .relationships
                    .insert(after.id.clone(), after.clone());
            }
            Operation::DeleteRelationship { relationship, .. } => {
                self.graph.remove_relationship(&relationship.id);
                self.selection.remove_relationship(&relationship.id);
            }
        }
    }

    /// Serialize the current graph to the remote store. On success the
    /// authoritative response replaces local state and the edit session
    /// is committed; on failure everything local stays untouched.
    pub async fn save(&mut self, remote: &impl RemoteStore, graph_id: &str) -> Result<()> {
        let authoritative = remote.save(graph_id, &self.graph).await?;
        self.replace_graph(authoritative);
        Ok(())
    }

    /// Discard local edits and reload the canonical graph.
    pub async fn reset(&mut self, remote: &impl RemoteStore, graph_id: &str) -> Result<()> {
        let canonical = remote.fetch(graph_id).await?;
        self.replace_graph(canonical);
        Ok(())
    }

    /// Replace the graph with an empty default-styled one.
    pub fn reset_empty(&mut self) {
        self.replace_graph(Graph::new());
    }

    fn replace_graph(&mut self, graph: Graph) {
        self.graph = graph;
        self.selection.clear();
        self.history.clear();
    }

    fn require_node(&self, id: &str) -> Result<(), StoreError> {
        if self.graph.nodes.contains_key(id) {
            Ok(())
        } else {
            Err(StoreError::DanglingEndpoint(id.to_string()))
        }
    }
}

/// Merge style entries into the target map. An empty-string value is
/// stored as null, matching the property-editing flows that clear a
/// style by submitting an empty field.
fn merge_style(target: &mut BTreeMap<String, Value>, updates: &BTreeMap<String, Value>) {
    for (key, value) in updates {
        let stored = match value {
            Value::String(text) if text.is_empty() => Value::Null,
            other => other.clone(),
        };
        target.insert(key.clone(), stored);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::colors_for;
    use crate::model::PropertyKind;

    fn store_with_two_nodes() -> (GraphStore, String, String) {
        let mut store = GraphStore::new();
        let a = store.add_node(Point::new(0.0, 0.0), "Person", vec!["Person".into()], BTreeMap::new());
        let b = store.add_node(Point::new(100.0, 0.0), "Company", vec!["Company".into()], BTreeMap::new());
        (store, a, b)
    }

    fn prop(kind: PropertyKind) -> PropertyDefinition {
        PropertyDefinition {
            kind,
            ..Default::default()
        }
    }

    #[test]
    fn add_node_assigns_deterministic_colors() {
        let (store, a, _) = store_with_two_nodes();
        let node = store.graph().node(&a).unwrap();
        assert_eq!(
            node.style.get("fill"),
            Some(&Value::String(colors_for("Person").fill))
        );
        assert!(node.style.contains_key("border"));
    }

    #[test]
    fn update_node_merges_properties_instead_of_replacing() {
        let (mut store, a, _) = store_with_two_nodes();
        store
            .update_node(
                &a,
                NodeUpdate {
                    properties: BTreeMap::from([("name".to_string(), prop(PropertyKind::Str))]),
                    ..Default::default()
                },
            )
            .unwrap();
        store
            .update_node(
                &a,
                NodeUpdate {
                    properties: BTreeMap::from([("age".to_string(), prop(PropertyKind::Int))]),
                    ..Default::default()
                },
            )
            .unwrap();

        let node = store.graph().node(&a).unwrap();
        assert_eq!(node.properties.len(), 2);
        assert_eq!(node.properties["name"].kind, PropertyKind::Str);
        assert_eq!(node.properties["age"].kind, PropertyKind::Int);
    }

    #[test]
    fn caption_change_recomputes_colors() {
        let (mut store, a, _) = store_with_two_nodes();
        store
            .update_node(
                &a,
                NodeUpdate {
                    caption: Some("Employee".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        let node = store.graph().node(&a).unwrap();
        assert_eq!(
            node.style.get("fill"),
            Some(&Value::String(colors_for("Employee").fill))
        );
    }

    #[test]
    fn empty_string_style_value_stores_null() {
        let (mut store, a, _) = store_with_two_nodes();
        store
            .update_node(
                &a,
                NodeUpdate {
                    style: BTreeMap::from([("accent".to_string(), Value::String(String::new()))]),
                    ..Default::default()
                },
            )
            .unwrap();

        let node = store.graph().node(&a).unwrap();
        assert_eq!(node.style.get("accent"), Some(&Value::Null));
    }

    #[test]
    fn update_missing_node_is_a_typed_error() {
        let mut store = GraphStore::new();
        let err = store.update_node("ghost", NodeUpdate::default()).unwrap_err();
        assert_eq!(err, StoreError::NodeNotFound("ghost".to_string()));
        assert!(store.audit_log().is_empty());
        assert!(!store.can_undo());
    }

    #[test]
    fn add_relationship_rejects_dangling_endpoints() {
        let (mut store, a, _) = store_with_two_nodes();
        let err = store
            .add_relationship(&a, "ghost", "WORKS_FOR", BTreeMap::new())
            .unwrap_err();
        assert_eq!(err, StoreError::DanglingEndpoint("ghost".to_string()));
        assert_eq!(store.graph().relationship_count(), 0);
    }

    #[test]
    fn update_relationship_replaces_fields_and_merges_properties() {
        let (mut store, a, b) = store_with_two_nodes();
        let rel = store
            .add_relationship(&a, &b, "WORKS_FOR", BTreeMap::new())
            .unwrap();

        store
            .update_relationship(
                &rel,
                RelationshipUpdate {
                    rel_type: Some("EMPLOYED_BY".to_string()),
                    properties: BTreeMap::from([("since".to_string(), prop(PropertyKind::Date))]),
                    ..Default::default()
                },
            )
            .unwrap();

        let updated = store.graph().relationship(&rel).unwrap();
        assert_eq!(updated.rel_type, "EMPLOYED_BY");
        assert_eq!(updated.properties["since"].kind, PropertyKind::Date);

        store.undo();
        let reverted = store.graph().relationship(&rel).unwrap();
        assert_eq!(reverted.rel_type, "WORKS_FOR");
        assert!(reverted.properties.is_empty());
    }

    #[test]
    fn update_relationship_rejects_rewiring_to_missing_node() {
        let (mut store, a, b) = store_with_two_nodes();
        let rel = store
            .add_relationship(&a, &b, "WORKS_FOR", BTreeMap::new())
            .unwrap();

        let err = store
            .update_relationship(
                &rel,
                RelationshipUpdate {
                    to: Some("ghost".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();

        assert_eq!(err, StoreError::DanglingEndpoint("ghost".to_string()));
        assert_eq!(store.graph().relationship(&rel).unwrap().to, b);
    }

    #[test]
    fn delete_node_cascades_and_clears_selection() {
        let (mut store, a, b) = store_with_two_nodes();
        let rel = store
            .add_relationship(&a, &b, "WORKS_FOR", BTreeMap::new())
            .unwrap();
        store.select_node(&a, false);
        store.select_relationship(&rel, true);

        store.delete_node(&a).unwrap();

        assert_eq!(store.graph().relationship_count(), 0);
        assert!(store.selection().is_empty());
        assert!(
            store
                .graph()
                .relationships
                .values()
                .all(|r| r.from != a && r.to != a)
        );
    }

    #[test]
    fn undo_restores_state_before_single_mutation() {
        let (mut store, a, b) = store_with_two_nodes();
        store
            .add_relationship(&a, &b, "WORKS_FOR", BTreeMap::new())
            .unwrap();
        let snapshot = store.graph().clone();

        store.delete_node(&a).unwrap();
        assert!(store.undo());

        assert_eq!(store.graph(), &snapshot);
        assert!(store.can_redo());
    }

    #[test]
    fn undo_of_update_restores_prior_field_values() {
        let (mut store, a, _) = store_with_two_nodes();
        let snapshot = store.graph().clone();

        store
            .update_node(
                &a,
                NodeUpdate {
                    caption: Some("Human".to_string()),
                    position: Some(Point::new(5.0, 5.0)),
                    ..Default::default()
                },
            )
            .unwrap();
        store.undo();

        assert_eq!(store.graph(), &snapshot);
    }

    #[test]
    fn redo_reapplies_forward_effect() {
        let mut store = GraphStore::new();
        store.add_node(Point::new(0.0, 0.0), "Person", vec![], BTreeMap::new());
        let after_add = store.graph().clone();

        store.undo();
        assert_eq!(store.graph().node_count(), 0);
        store.redo();

        assert_eq!(store.graph(), &after_add);
        assert!(store.can_undo());
        assert!(!store.can_redo());
    }

    #[test]
    fn redo_of_node_deletion_clears_cascaded_selection() {
        let (mut store, a, b) = store_with_two_nodes();
        let rel = store
            .add_relationship(&a, &b, "WORKS_FOR", BTreeMap::new())
            .unwrap();

        store.delete_node(&a).unwrap();
        store.undo();
        // Select the restored relationship before replaying the delete.
        store.select_relationship(&rel, false);
        store.redo();

        assert_eq!(store.graph().relationship_count(), 0);
        assert!(store.selection().relationship_ids.is_empty());
        assert!(!store.selection().is_active);
    }

    #[test]
    fn new_mutation_clears_redo_stack() {
        let mut store = GraphStore::new();
        store.add_node(Point::new(0.0, 0.0), "A", vec![], BTreeMap::new());
        store.undo();
        assert!(store.can_redo());

        store.add_node(Point::new(0.0, 0.0), "B", vec![], BTreeMap::new());
        assert!(!store.can_redo());
    }

    #[test]
    fn audit_log_survives_undo_and_redo() {
        let mut store = GraphStore::new();
        store.add_node(Point::new(0.0, 0.0), "A", vec![], BTreeMap::new());
        store.undo();
        store.redo();
        assert_eq!(store.audit_log().len(), 1);
    }

    #[test]
    fn duplicate_selection_offsets_clones_and_remaps_relationships() {
        let (mut store, a, b) = store_with_two_nodes();
        let rel = store
            .add_relationship(&a, &b, "WORKS_FOR", BTreeMap::new())
            .unwrap();
        store.select_node(&a, true);
        store.select_node(&b, true);
        store.select_relationship(&rel, true);

        let before_ids: HashSet<String> = store.graph().nodes.keys().cloned().collect();
        store.duplicate_selection();

        assert_eq!(store.graph().node_count(), 4);
        assert_eq!(store.graph().relationship_count(), 2);

        let new_ids: Vec<String> = store
            .graph()
            .nodes
            .keys()
            .filter(|id| !before_ids.contains(*id))
            .cloned()
            .collect();
        assert_eq!(new_ids.len(), 2);
        assert_eq!(store.selection().node_ids.len(), 2);
        assert!(new_ids.iter().all(|id| store.selection().node_ids.contains(id)));

        let original = store.graph().node(&a).unwrap();
        let clone_of_a = store
            .graph()
            .nodes
            .values()
            .find(|n| !before_ids.contains(&n.id) && n.caption == "Person")
            .unwrap();
        assert!((clone_of_a.position.x - original.position.x - DUPLICATE_OFFSET).abs() < 1e-3);
        assert!((clone_of_a.position.y - original.position.y - DUPLICATE_OFFSET).abs() < 1e-3);

        let duplicated_rel = store
            .graph()
            .relationships
            .values()
            .find(|r| r.id != rel)
            .unwrap();
        assert!(store.selection().node_ids.contains(&duplicated_rel.from));
        assert!(store.selection().node_ids.contains(&duplicated_rel.to));
    }

    #[test]
    fn relationship_with_one_selected_endpoint_is_not_duplicated() {
        let (mut store, a, b) = store_with_two_nodes();
        let rel = store
            .add_relationship(&a, &b, "WORKS_FOR", BTreeMap::new())
            .unwrap();
        store.select_node(&a, true);
        store.select_relationship(&rel, true);

        store.duplicate_selection();

        assert_eq!(store.graph().node_count(), 3);
        assert_eq!(store.graph().relationship_count(), 1);
        assert!(store.selection().relationship_ids.is_empty());
    }

    #[test]
    fn delete_selection_removes_relationships_before_nodes() {
        let (mut store, a, b) = store_with_two_nodes();
        let rel = store
            .add_relationship(&a, &b, "WORKS_FOR", BTreeMap::new())
            .unwrap();
        store.select_node(&a, true);
        store.select_node(&b, true);
        store.select_relationship(&rel, true);

        store.delete_selection();

        assert_eq!(store.graph().node_count(), 0);
        assert_eq!(store.graph().relationship_count(), 0);
        // One delete per selected entity, no double-count from cascade.
        assert_eq!(store.audit_log().len(), 3 + 3);
    }

    #[test]
    fn reset_empty_clears_state_and_history() {
        let (mut store, a, _) = store_with_two_nodes();
        store.select_node(&a, false);
        store.reset_empty();

        assert_eq!(store.graph().node_count(), 0);
        assert!(store.selection().is_empty());
        assert!(!store.can_undo());
        assert!(store.audit_log().is_empty());
        assert_eq!(
            store.graph().style.get("background"),
            Some(&Value::String("white".to_string()))
        );
    }
}

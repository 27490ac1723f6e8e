//! Bidirectional conversion between the graph model and the nested
//! schema document (`entities` -> properties / relationships). Imports
//! are tolerant: malformed pieces are logged and skipped rather than
//! aborting the whole conversion. Position and style never round-trip;
//! they are layout data, not schema.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::warn;
use uuid::Uuid;

use crate::color::stamp_caption_colors;
use crate::layout::circle_position;
use crate::model::{Graph, Node, PropertyDefinition, PropertyKind, Relationship};

/// Text encodings of the schema document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
        {
            Some(ext) if ext == "yaml" || ext == "yml" => Some(DocumentFormat::Yaml),
            Some(ext) if ext == "json" => Some(DocumentFormat::Json),
            _ => None,
        }
    }
}

pub fn parse_document(text: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Yaml => {
            serde_yaml::from_str(text).context("failed to parse YAML schema document")
        }
        DocumentFormat::Json => {
            serde_json::from_str(text).context("failed to parse JSON schema document")
        }
    }
}

pub fn write_document(document: &Value, format: DocumentFormat) -> Result<String> {
    match format {
        DocumentFormat::Yaml => {
            serde_yaml::to_string(document).context("failed to serialize schema document as YAML")
        }
        DocumentFormat::Json => serde_json::to_string_pretty(document)
            .context("failed to serialize schema document as JSON"),
    }
}

/// Build a graph from a schema document. A document without a usable
/// `entities` mapping yields an empty graph; individual malformed
/// relationships are skipped with a warning.
pub fn from_ontology(document: &Value) -> Graph {
    let Some(entities) = document
        .get("entities")
        .and_then(Value::as_object)
        .filter(|entities| !entities.is_empty())
    else {
        warn!("schema document has no usable 'entities' mapping, producing empty graph");
        return Graph::new();
    };

    let mut graph = Graph::new();
    let mut ids_by_name: HashMap<&str, String> = HashMap::new();
    let count = entities.len();

    // Pass one: entities become nodes on a circle sized to the count.
    for (index, (name, spec)) in entities.iter().enumerate() {
        let id = Uuid::new_v4().to_string();
        let mut style = BTreeMap::new();
        stamp_caption_colors(&mut style, name);

        let properties = spec
            .get("properties")
            .and_then(Value::as_object)
            .map(parse_properties)
            .unwrap_or_default();

        graph.insert_node(Node {
            id: id.clone(),
            position: circle_position(index, count),
            caption: name.clone(),
            labels: vec![name.clone()],
            properties,
            style,
        });
        ids_by_name.insert(name.as_str(), id);
    }

    // Pass two: declared relationships, now that every target can be
    // resolved to a node id.
    for (name, spec) in entities {
        let Some(relationships) = spec.get("relationships").and_then(Value::as_object) else {
            continue;
        };
        let from_id = &ids_by_name[name.as_str()];

        for (rel_type, rel_spec) in relationships {
            let target = rel_spec.get("target").and_then(Value::as_str);
            let Some(to_id) = target.and_then(|target| ids_by_name.get(target)) else {
                warn!(
                    entity = name.as_str(),
                    relationship = rel_type.as_str(),
                    "relationship target cannot be resolved, skipping"
                );
                continue;
            };

            let properties = rel_spec
                .get("properties")
                .and_then(Value::as_object)
                .map(parse_properties)
                .unwrap_or_default();

            graph.insert_relationship(Relationship {
                id: Uuid::new_v4().to_string(),
                from: from_id.clone(),
                to: to_id.clone(),
                rel_type: rel_type.clone(),
                properties,
                style: BTreeMap::new(),
            });
        }
    }

    graph
}

/// Export a graph back to the schema document shape. Entities are keyed
/// by caption; relationships whose endpoints no longer resolve are
/// skipped with a warning.
pub fn to_ontology(graph: &Graph) -> Value {
    let mut entities = Map::new();

    for node in graph.nodes_ordered() {
        let mut entity = Map::new();
        if !node.properties.is_empty() {
            entity.insert(
                "properties".to_string(),
                properties_to_value(&node.properties),
            );
        }
        entities.insert(node.caption.clone(), Value::Object(entity));
    }

    for rel in graph.relationships_ordered() {
        let (Some(from_node), Some(to_node)) = (graph.node(&rel.from), graph.node(&rel.to)) else {
            warn!(
                relationship = rel.rel_type.as_str(),
                "relationship endpoint no longer resolves to an entity, skipping"
            );
            continue;
        };

        let Some(entity) = entities
            .get_mut(&from_node.caption)
            .and_then(Value::as_object_mut)
        else {
            continue;
        };

        let mut entry = Map::new();
        entry.insert("target".to_string(), Value::String(to_node.caption.clone()));
        if !rel.properties.is_empty() {
            entry.insert(
                "properties".to_string(),
                properties_to_value(&rel.properties),
            );
        }

        if let Some(rels) = entity
            .entry("relationships".to_string())
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
        {
            rels.insert(rel.rel_type.clone(), Value::Object(entry));
        }
    }

    let mut document = Map::new();
    document.insert("entities".to_string(), Value::Object(entities));
    Value::Object(document)
}

fn parse_properties(raw: &Map<String, Value>) -> BTreeMap<String, PropertyDefinition> {
    raw.iter()
        .map(|(name, spec)| (name.clone(), parse_property(name, spec)))
        .collect()
}

/// Copy a property definition field by field. A definition that is not
/// a mapping degrades to a string property described by its own name.
fn parse_property(name: &str, raw: &Value) -> PropertyDefinition {
    let Some(spec) = raw.as_object() else {
        warn!(property = name, "malformed property definition, defaulting to str");
        return PropertyDefinition {
            kind: PropertyKind::Str,
            description: Some(name.to_string()),
            ..Default::default()
        };
    };

    let kind = match spec.get("type") {
        None => PropertyKind::Str,
        Some(Value::String(token)) => PropertyKind::parse(token).unwrap_or_else(|| {
            warn!(property = name, token = token.as_str(), "unknown property type, defaulting to str");
            PropertyKind::Str
        }),
        Some(_) => {
            warn!(property = name, "non-string property type, defaulting to str");
            PropertyKind::Str
        }
    };

    PropertyDefinition {
        kind,
        description: spec
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        unique: spec.get("unique").and_then(Value::as_bool),
        required: spec.get("required").and_then(Value::as_bool),
        index: spec.get("index").and_then(Value::as_bool),
    }
}

fn properties_to_value(properties: &BTreeMap<String, PropertyDefinition>) -> Value {
    let mut out = Map::new();
    for (name, def) in properties {
        let mut spec = Map::new();
        spec.insert(
            "type".to_string(),
            Value::String(def.kind.as_str().to_string()),
        );
        if let Some(description) = &def.description {
            spec.insert("description".to_string(), Value::String(description.clone()));
        }
        if let Some(unique) = def.unique {
            spec.insert("unique".to_string(), Value::Bool(unique));
        }
        if let Some(required) = def.required {
            spec.insert("required".to_string(), Value::Bool(required));
        }
        if let Some(index) = def.index {
            spec.insert("index".to_string(), Value::Bool(index));
        }
        out.insert(name.clone(), Value::Object(spec));
    }
    Value::Object(out)
}

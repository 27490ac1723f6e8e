//! In-memory property-graph engine for schema and ontology design:
//! a mutable graph of typed entities and relationships with linear
//! undo/redo history and a lossless codec to the nested schema
//! document form.

pub mod color;
pub mod history;
pub mod layout;
pub mod model;
pub mod ontology;
pub mod remote;
pub mod selection;
pub mod store;

pub use color::{ColorPair, colors_for};
pub use history::{Command, History, Operation};
pub use model::{Graph, Node, Point, PropertyDefinition, PropertyKind, Relationship};
pub use ontology::{DocumentFormat, from_ontology, parse_document, to_ontology, write_document};
pub use remote::{RemoteStore, SqliteRemoteStore, SqliteStoreConfig};
pub use selection::Selection;
pub use store::{DUPLICATE_OFFSET, GraphStore, NodeUpdate, RelationshipUpdate, StoreError};

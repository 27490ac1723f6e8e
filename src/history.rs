//! Linear edit history: an append-only audit log plus undo/redo stacks
//! of operation descriptors. Every operation carries the snapshots it
//! needs to be inverted on its own, id-addressed, without consulting
//! surrounding stack positions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Node, Relationship};

/// One reversible mutation. Deletes carry the removed entity (and, for
/// nodes, the cascaded relationships); updates carry both the before
/// and after snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum Operation {
    CreateNode {
        node: Node,
    },
    UpdateNode {
        before: Node,
        after: Node,
    },
    DeleteNode {
        node: Node,
        node_index: usize,
        cascaded: Vec<(Relationship, usize)>,
    },
    CreateRelationship {
        relationship: Relationship,
    },
    UpdateRelationship {
        before: Relationship,
        after: Relationship,
    },
    DeleteRelationship {
        relationship: Relationship,
        rel_index: usize,
    },
}

impl Operation {
    /// Id of the primary entity this operation touches.
    pub fn entity_id(&self) -> &str {
        match self {
            Operation::CreateNode { node } | Operation::DeleteNode { node, .. } => &node.id,
            Operation::UpdateNode { after, .. } => &after.id,
            Operation::CreateRelationship { relationship }
            | Operation::DeleteRelationship { relationship, .. } => &relationship.id,
            Operation::UpdateRelationship { after, .. } => &after.id,
        }
    }
}

/// Audit log entry. Entries are never trimmed by undo or redo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub id: String,
    pub operation: Operation,
    pub timestamp: DateTime<Utc>,
    pub actor: String,
}

#[derive(Debug, Clone, Default)]
pub struct History {
    log: Vec<Command>,
    undo_stack: Vec<Operation>,
    redo_stack: Vec<Operation>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly applied mutation. Branching edits discard the
    /// forward history, so the redo stack is cleared here.
    pub fn record(&mut self, operation: Operation, actor: &str) {
        self.log.push(Command {
            id: Uuid::new_v4().to_string(),
            operation: operation.clone(),
            timestamp: Utc::now(),
            actor: actor.to_string(),
        });
        self.undo_stack.push(operation);
        self.redo_stack.clear();
    }

    pub fn pop_undo(&mut self) -> Option<Operation> {
        self.undo_stack.pop()
    }

    pub fn pop_redo(&mut self) -> Option<Operation> {
        self.redo_stack.pop()
    }

    pub fn push_undo(&mut self, operation: Operation) {
        self.undo_stack.push(operation);
    }

    pub fn push_redo(&mut self, operation: Operation) {
        self.redo_stack.push(operation);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn log(&self) -> &[Command] {
        &self.log
    }

    /// Drop everything, e.g. after a successful save commits the edit
    /// session.
    pub fn clear(&mut self) {
        self.log.clear();
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

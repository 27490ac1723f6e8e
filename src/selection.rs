//! Ephemeral selection state. Never persisted; rebuilt from scratch by
//! every pick interaction.

use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub node_ids: HashSet<String>,
    pub relationship_ids: HashSet<String>,
    pub is_active: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-select replaces the whole selection; multi-select toggles
    /// membership and leaves the relationship selection alone.
    pub fn select_node(&mut self, id: &str, multi_select: bool) {
        if multi_select {
            if !self.node_ids.remove(id) {
                self.node_ids.insert(id.to_string());
            }
        } else {
            self.node_ids.clear();
            self.relationship_ids.clear();
            self.node_ids.insert(id.to_string());
        }
        self.refresh_active();
    }

    pub fn select_relationship(&mut self, id: &str, multi_select: bool) {
        if multi_select {
            if !self.relationship_ids.remove(id) {
                self.relationship_ids.insert(id.to_string());
            }
        } else {
            self.node_ids.clear();
            self.relationship_ids.clear();
            self.relationship_ids.insert(id.to_string());
        }
        self.refresh_active();
    }

    pub fn remove_node(&mut self, id: &str) {
        self.node_ids.remove(id);
        self.refresh_active();
    }

    pub fn remove_relationship(&mut self, id: &str) {
        self.relationship_ids.remove(id);
        self.refresh_active();
    }

    pub fn clear(&mut self) {
        self.node_ids.clear();
        self.relationship_ids.clear();
        self.is_active = false;
    }

    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty() && self.relationship_ids.is_empty()
    }

    /// Replace the selection wholesale, e.g. after duplication.
    pub fn replace(&mut self, node_ids: HashSet<String>, relationship_ids: HashSet<String>) {
        self.node_ids = node_ids;
        self.relationship_ids = relationship_ids;
        self.refresh_active();
    }

    fn refresh_active(&mut self) {
        self.is_active = !self.is_empty();
    }
}

//! Opt-in strict validation of a record collection.
//!
//! The traversals trust their input. Callers holding untrusted data run
//! [`TreeBuilder::validate`] first to catch what would otherwise show up as
//! missing rows, repeated subtrees or unbounded recursion.

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use tracing::{debug, instrument};

use crate::domain::builder::{NestedTree, TreeBuilder};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::record::RecordId;

impl TreeBuilder {
    /// Check the source records, returning the first problem found in
    /// input order.
    #[instrument(level = "debug", skip(self))]
    pub fn validate(&self) -> DomainResult<()> {
        let fields = self.fields();
        if fields.parent.is_empty() {
            return Err(DomainError::EmptyFieldName("parent"));
        }
        if fields.name.is_empty() {
            return Err(DomainError::EmptyFieldName("name"));
        }
        if let Some(key) = self.duplicate_keys().first() {
            return Err(DomainError::DuplicateId(key.clone()));
        }

        // canonical id -> first key carrying it
        let mut index: HashMap<RecordId, &String> = HashMap::new();
        for key in self.records().keys() {
            if let Some(first) = index.insert(RecordId::new(key), key) {
                return Err(DomainError::AmbiguousId {
                    id: key.clone(),
                    other: first.clone(),
                });
            }
        }

        let mut edges: HashMap<RecordId, RecordId> = HashMap::new();
        for (key, record) in self.records() {
            let parent = record
                .get(&fields.parent)
                .and_then(RecordId::from_value)
                .ok_or_else(|| DomainError::MissingParent {
                    id: key.clone(),
                    field: fields.parent.clone(),
                })?;
            if &parent != self.root() && !index.contains_key(&parent) {
                return Err(DomainError::UnknownParent {
                    id: key.clone(),
                    parent,
                });
            }
            if record.get(&fields.name).map_or(true, Value::is_null) {
                return Err(DomainError::MissingName {
                    id: key.clone(),
                    field: fields.name.clone(),
                });
            }
            edges.insert(RecordId::new(key), parent);
        }

        for key in self.records().keys() {
            check_ancestry(&RecordId::new(key), &edges, &index)?;
        }
        debug!(count = self.records().len(), "records validated");
        Ok(())
    }

    /// Validate, then build the nested tree below `parent`.
    pub fn build_nested_tree_checked(&self, parent: &RecordId) -> DomainResult<NestedTree> {
        self.validate()?;
        Ok(self.build_nested_tree(parent))
    }
}

/// Follow parent edges from `start` until a record without an edge.
///
/// A record whose id equals the root sentinel has an edge like any other,
/// so it is caught when its own chain leads back to the top level.
fn check_ancestry(
    start: &RecordId,
    edges: &HashMap<RecordId, RecordId>,
    index: &HashMap<RecordId, &String>,
) -> DomainResult<()> {
    let mut visited = HashSet::new();
    let mut current = start;
    while let Some(parent) = edges.get(current) {
        if !visited.insert(current) {
            let key = index.get(current).map_or_else(|| current.to_string(), |k| (*k).clone());
            return Err(DomainError::CycleDetected(key));
        }
        current = parent;
    }
    Ok(())
}

//! Plain-text rendering of the hierarchy with `termtree`.

use termtree::Tree;
use tracing::instrument;

use crate::domain::builder::TreeBuilder;
use crate::domain::record::{value_text, Record, RecordId};

impl TreeBuilder {
    /// Render everything below `parent` as a text tree rooted at `parent`.
    ///
    /// Nodes are labeled with their name, or their id when the name is
    /// missing. Unlike the flattened list, nameless records stay visible.
    #[instrument(level = "debug", skip(self))]
    pub fn to_term_tree(&self, parent: &RecordId) -> Tree<String> {
        let leaves: Vec<_> = self
            .children_of(parent)
            .into_iter()
            .map(|(id, record)| self.subtree(id, record))
            .collect();
        Tree::new(parent.to_string()).with_leaves(leaves)
    }

    fn subtree(&self, id: &str, record: &Record) -> Tree<String> {
        let label = record
            .get(&self.fields().name)
            .filter(|v| !v.is_null())
            .map(value_text)
            .unwrap_or_else(|| id.to_string());

        let leaves: Vec<_> = self
            .children_of(&RecordId::new(id))
            .into_iter()
            .map(|(child_id, child)| self.subtree(child_id, child))
            .collect();
        Tree::new(label).with_leaves(leaves)
    }
}

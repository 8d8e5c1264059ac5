//! Tree builder: turns flat parent-referencing records into a nested tree
//! or a flattened, glyph-decorated list.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, instrument, trace};

use crate::domain::options::{FieldNames, Markers, TreeOptions};
use crate::domain::record::{load_records, value_text, Record, RecordId, Records};

/// Nested output: child key to the child record, which carries its own
/// subtree under the configured child field.
pub type NestedTree = IndexMap<String, Record>;

/// Builds hierarchies from a flat record collection.
///
/// Configuration setters return `&mut Self` so calls chain:
///
/// ```
/// use treelist::domain::{Markers, RecordId, TreeBuilder};
/// use serde_json::json;
///
/// let source = json!({
///     "1": {"parentid": 0, "name": "A"},
///     "2": {"parentid": 1, "name": "B"},
/// });
/// let mut builder = TreeBuilder::new();
/// builder
///     .set_source_value(&source)
///     .set_markers(Markers::default())
///     .set_indent_token(" ")
///     .build_flat_list(&RecordId::root(), "");
/// let names = builder.result_column("spacer_name", None);
/// assert_eq!(names["1"], json!(" └B"));
/// ```
///
/// The flattened traversal writes into a result buffer owned by the
/// instance. One builder must not be shared between threads while building;
/// use one instance per caller.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    records: Records,
    fields: FieldNames,
    markers: Markers,
    indent: String,
    root: RecordId,
    duplicates: Vec<String>,
    result: Vec<Record>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::with_options(TreeOptions::default())
    }

    pub fn with_options(options: TreeOptions) -> Self {
        Self {
            records: Records::new(),
            fields: options.fields,
            markers: options.markers,
            indent: options.indent,
            root: options.root,
            duplicates: Vec::new(),
            result: Vec::new(),
        }
    }

    // ------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------

    /// Replace the source records and clear the result buffer.
    pub fn set_source_data(&mut self, records: Records) -> &mut Self {
        debug!(count = records.len(), "source data replaced");
        self.records = records;
        self.duplicates.clear();
        self.result.clear();
        self
    }

    /// Replace the source records from any JSON value.
    ///
    /// Values that are not collections become an empty source. Keys that
    /// occurred more than once are remembered for [`TreeBuilder::validate`].
    pub fn set_source_value(&mut self, value: &Value) -> &mut Self {
        let loaded = load_records(value, &self.fields.id);
        self.set_source_data(loaded.records);
        self.duplicates = loaded.duplicates;
        self
    }

    pub fn set_markers(&mut self, markers: impl Into<Markers>) -> &mut Self {
        self.markers = markers.into();
        self
    }

    pub fn set_indent_token(&mut self, token: impl Into<String>) -> &mut Self {
        self.indent = token.into();
        self
    }

    pub fn set_parent_field(&mut self, name: impl Into<String>) -> &mut Self {
        self.fields.parent = name.into();
        self
    }

    pub fn set_child_field(&mut self, name: impl Into<String>) -> &mut Self {
        self.fields.child = name.into();
        self
    }

    pub fn set_name_field(&mut self, name: impl Into<String>) -> &mut Self {
        self.fields.name = name.into();
        self
    }

    pub fn set_spacer_field(&mut self, name: impl Into<String>) -> &mut Self {
        self.fields.spacer = name.into();
        self
    }

    /// Field used as record id for array sources; applies to later
    /// `set_source_value` calls.
    pub fn set_id_field(&mut self, name: impl Into<String>) -> &mut Self {
        self.fields.id = name.into();
        self
    }

    /// Parent value that marks a top-level record.
    pub fn set_root(&mut self, root: impl Into<RecordId>) -> &mut Self {
        self.root = root.into();
        self
    }

    pub fn records(&self) -> &Records {
        &self.records
    }

    /// Keys repeated in the last `set_source_value` input.
    pub fn duplicate_keys(&self) -> &[String] {
        &self.duplicates
    }

    pub fn fields(&self) -> &FieldNames {
        &self.fields
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn indent_token(&self) -> &str {
        &self.indent
    }

    pub fn root(&self) -> &RecordId {
        &self.root
    }

    // ------------------------------------------------------------
    // Child lookup
    // ------------------------------------------------------------

    /// Direct children of `parent`, in source order.
    ///
    /// Records without a usable parent value never match. An empty parent
    /// field name matches nothing.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn children_of(&self, parent: &RecordId) -> Vec<(&String, &Record)> {
        if self.fields.parent.is_empty() {
            return Vec::new();
        }
        self.records
            .iter()
            .filter(|(_, record)| {
                record
                    .get(&self.fields.parent)
                    .and_then(RecordId::from_value)
                    .is_some_and(|p| &p == parent)
            })
            .collect()
    }

    fn label_of<'a>(&self, record: &'a Record) -> Option<&'a Value> {
        record.get(&self.fields.name).filter(|v| !v.is_null())
    }

    // ------------------------------------------------------------
    // Flattened traversal
    // ------------------------------------------------------------

    /// Depth-first walk below `parent`, storing decorated rows in the
    /// result buffer. The buffer is cleared first.
    #[instrument(level = "debug", skip(self))]
    pub fn build_flat_list(&mut self, parent: &RecordId, prefix: &str) -> &mut Self {
        self.result.clear();
        let mut rows = Vec::new();
        self.flatten_into(parent, prefix, &mut rows);
        debug!(rows = rows.len(), "flat list built");
        self.result = rows;
        self
    }

    /// `build_flat_list` from the configured root with an empty prefix.
    pub fn build_flat_list_from_root(&mut self) -> &mut Self {
        let root = self.root.clone();
        self.build_flat_list(&root, "")
    }

    /// Decorated rows below `parent` without touching the result buffer.
    #[instrument(level = "debug", skip(self))]
    pub fn flatten(&self, parent: &RecordId) -> Vec<Record> {
        let mut rows = Vec::new();
        self.flatten_into(parent, "", &mut rows);
        rows
    }

    fn flatten_into(&self, parent: &RecordId, prefix: &str, out: &mut Vec<Record>) {
        // Nameless records emit nothing, hide their subtree and do not
        // take part in the last-sibling decision.
        let named: Vec<_> = self
            .children_of(parent)
            .into_iter()
            .filter_map(|(id, record)| match self.label_of(record) {
                Some(label) => Some((id, record, value_text(label))),
                None => {
                    trace!(%id, field = %self.fields.name, "skipping record without name");
                    None
                }
            })
            .collect();

        let total = named.len();
        for (position, (id, record, label)) in named.into_iter().enumerate() {
            let is_last = position + 1 == total;
            let (glyph, continuation) = if is_last {
                (&self.markers.last_branch, "")
            } else if prefix.is_empty() {
                (&self.markers.branch, "")
            } else {
                (&self.markers.branch, self.markers.vertical.as_str())
            };

            let spacer = if prefix.is_empty() {
                String::new()
            } else {
                format!("{prefix}{glyph}")
            };

            let mut row = record.clone();
            row.insert(self.fields.spacer.clone(), Value::String(spacer + &label));
            out.push(row);

            let next_prefix = format!("{prefix}{continuation}{}", self.indent);
            self.flatten_into(&RecordId::new(id), &next_prefix, out);
        }
    }

    // ------------------------------------------------------------
    // Nested traversal
    // ------------------------------------------------------------

    /// Fresh nested tree of everything below `parent`.
    ///
    /// Every child is included whether or not it has a name. The result
    /// buffer is not touched.
    #[instrument(level = "trace", skip(self))]
    pub fn build_nested_tree(&self, parent: &RecordId) -> NestedTree {
        self.children_of(parent)
            .into_iter()
            .map(|(id, record)| {
                let mut node = record.clone();
                let subtree = self.build_nested_tree(&RecordId::new(id));
                node.insert(self.fields.child.clone(), Value::Object(into_object(subtree)));
                (id.clone(), node)
            })
            .collect()
    }

    /// `build_nested_tree` from the configured root.
    pub fn build_nested_tree_from_root(&self) -> NestedTree {
        self.build_nested_tree(&self.root)
    }

    /// Nested tree below `parent` as a JSON object.
    pub fn nested_tree_value(&self, parent: &RecordId) -> Value {
        Value::Object(into_object(self.build_nested_tree(parent)))
    }

    // ------------------------------------------------------------
    // Result accessors
    // ------------------------------------------------------------

    pub fn result(&self) -> &[Record] {
        &self.result
    }

    /// Move the rows out, leaving the buffer empty.
    pub fn take_result(&mut self) -> Vec<Record> {
        std::mem::take(&mut self.result)
    }

    /// Project one field out of the result buffer.
    ///
    /// Keys are the row position, or the text of `key_field` when the row
    /// carries a non-null value for it. Rows lacking `field` map to `null`.
    pub fn result_column(&self, field: &str, key_field: Option<&str>) -> IndexMap<String, Value> {
        let key_field = key_field.filter(|k| !k.is_empty());
        let mut column = IndexMap::with_capacity(self.result.len());
        for (position, row) in self.result.iter().enumerate() {
            let key = key_field
                .and_then(|k| row.get(k))
                .filter(|v| !v.is_null())
                .map(value_text)
                .unwrap_or_else(|| position.to_string());
            let value = row.get(field).cloned().unwrap_or(Value::Null);
            column.insert(key, value);
        }
        column
    }

    pub fn reset_result(&mut self) -> &mut Self {
        self.result.clear();
        self
    }
}

fn into_object(tree: NestedTree) -> Map<String, Value> {
    tree.into_iter()
        .map(|(id, node)| (id, Value::Object(node)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn builder_for(source: Value) -> TreeBuilder {
        let mut builder = TreeBuilder::new();
        builder.set_source_value(&source);
        builder
    }

    #[test]
    fn given_loose_parent_values_when_looking_up_children_then_all_match() {
        let builder = builder_for(json!({
            "1": {"parentid": 0},
            "2": {"parentid": "0"},
            "3": {"parentid": 0.0},
            "4": {"parentid": "00"},
            "5": {"parentid": 1},
        }));
        let ids: Vec<_> = builder
            .children_of(&RecordId::root())
            .into_iter()
            .map(|(id, _)| id.clone())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn given_equivalent_keys_when_looking_up_children_then_each_parent_sees_both() {
        let builder = builder_for(json!({
            "1": {"parentid": 0, "name": "A"},
            "01": {"parentid": 0, "name": "B"},
            "3": {"parentid": 1, "name": "C"},
        }));
        assert_eq!(builder.children_of(&RecordId::root()).len(), 2);
        assert_eq!(builder.children_of(&RecordId::new("01")).len(), 1);
    }

    #[test]
    fn given_null_or_missing_parent_when_looking_up_children_then_never_matches() {
        let builder = builder_for(json!({
            "1": {"parentid": null},
            "2": {"name": "orphan"},
        }));
        assert!(builder.children_of(&RecordId::root()).is_empty());
    }

    #[test]
    fn given_empty_parent_field_when_looking_up_children_then_empty() {
        let mut builder = builder_for(json!({"1": {"": 0, "parentid": 0}}));
        builder.set_parent_field("");
        assert!(builder.children_of(&RecordId::root()).is_empty());
    }

    #[test]
    fn given_null_name_when_labeling_then_treated_as_missing() {
        let builder = TreeBuilder::new();
        let record = json!({"name": null}).as_object().cloned().unwrap();
        assert!(builder.label_of(&record).is_none());
    }
}

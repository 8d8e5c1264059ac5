//! Render service
//!
//! Loads a JSON record source and renders it as a flat decorated list, a
//! nested JSON tree or a text tree.

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::{ApplicationResult, IoResultExt, JsonResultExt};
use crate::domain::{value_text, Record, RecordId, TreeBuilder, TreeOptions};
use crate::infrastructure::traits::FileSystem;

/// Input path that means "read standard input".
pub const STDIN_INPUT: &str = "-";

/// Service turning record sources into rendered hierarchies.
pub struct RenderService {
    fs: Arc<dyn FileSystem>,
    options: TreeOptions,
}

impl RenderService {
    /// Create a new render service.
    pub fn new(fs: Arc<dyn FileSystem>, options: TreeOptions) -> Self {
        Self { fs, options }
    }

    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    /// Read and parse a JSON source; `-` reads standard input.
    #[instrument(level = "debug", skip(self))]
    pub fn load_source(&self, input: &Path) -> ApplicationResult<Value> {
        let content = if input == Path::new(STDIN_INPUT) {
            self.fs.read_stdin().with_input_context(input)?
        } else {
            self.fs.read_to_string(input).with_input_context(input)?
        };
        debug!("load_source: read {} bytes", content.len());
        Self::parse_source(&content, &input.display().to_string())
    }

    /// Parse JSON text into a source value.
    pub fn parse_source(content: &str, origin: &str) -> ApplicationResult<Value> {
        serde_json::from_str(content).with_origin(origin)
    }

    /// Builder configured from the service options and loaded with `source`.
    pub fn builder(&self, source: &Value) -> TreeBuilder {
        let mut builder = TreeBuilder::with_options(self.options.clone());
        builder.set_source_value(source);
        builder
    }

    fn start(&self, parent: Option<&RecordId>) -> RecordId {
        parent.cloned().unwrap_or_else(|| self.options.root.clone())
    }

    /// Decorated rows below `parent` (default: configured root).
    #[instrument(level = "debug", skip(self, source))]
    pub fn flat_rows(&self, source: &Value, parent: Option<&RecordId>) -> Vec<Record> {
        let mut builder = self.builder(source);
        builder.build_flat_list(&self.start(parent), "");
        builder.take_result()
    }

    /// Decorated labels below `parent`, one per row.
    pub fn flat_names(&self, source: &Value, parent: Option<&RecordId>) -> Vec<String> {
        let spacer = &self.options.fields.spacer;
        self.flat_rows(source, parent)
            .iter()
            .map(|row| row.get(spacer).map(value_text).unwrap_or_default())
            .collect()
    }

    /// One field of every decorated row, keyed by position or `key`.
    pub fn column(
        &self,
        source: &Value,
        parent: Option<&RecordId>,
        field: &str,
        key: Option<&str>,
    ) -> IndexMap<String, Value> {
        let mut builder = self.builder(source);
        builder.build_flat_list(&self.start(parent), "");
        builder.result_column(field, key)
    }

    /// Nested tree below `parent` serialized as JSON.
    #[instrument(level = "debug", skip(self, source))]
    pub fn nested_json(
        &self,
        source: &Value,
        parent: Option<&RecordId>,
        pretty: bool,
    ) -> ApplicationResult<String> {
        let tree = self.builder(source).build_nested_tree(&self.start(parent));
        let json = if pretty {
            serde_json::to_string_pretty(&tree)
        } else {
            serde_json::to_string(&tree)
        };
        json.with_operation("serialize nested tree")
    }

    /// Text tree below `parent`.
    pub fn text_tree(&self, source: &Value, parent: Option<&RecordId>) -> String {
        self.builder(source)
            .to_term_tree(&self.start(parent))
            .to_string()
    }

    /// Strict validation; returns the number of records checked.
    #[instrument(level = "debug", skip(self, source))]
    pub fn check(&self, source: &Value) -> ApplicationResult<usize> {
        let builder = self.builder(source);
        builder.validate()?;
        Ok(builder.records().len())
    }
}

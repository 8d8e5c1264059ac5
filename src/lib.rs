//! treelist: flat parent-referencing records to hierarchies.
//!
//! Records are JSON objects keyed by id, each naming its parent in a
//! configurable field. [`TreeBuilder`] turns them into
//!
//! - a nested tree, every record carrying its children under a child field,
//! - a depth-first list whose labels are prefixed with tree glyphs
//!   (`├`, `└`, `│`) for indented select boxes and menus.
//!
//! ```
//! use serde_json::json;
//! use treelist::{RecordId, TreeBuilder};
//!
//! let mut builder = TreeBuilder::new();
//! builder
//!     .set_source_value(&json!({
//!         "1": {"parentid": 0, "name": "A"},
//!         "2": {"parentid": 0, "name": "B"},
//!         "3": {"parentid": 1, "name": "C"},
//!     }))
//!     .build_flat_list(&RecordId::root(), "");
//!
//! let labels: Vec<_> = builder
//!     .result_column("spacer_name", None)
//!     .into_values()
//!     .collect();
//! assert_eq!(labels, vec![json!("A"), json!("&nbsp;└C"), json!("B")]);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{
    DomainError, FieldNames, Markers, NestedTree, Record, RecordId, Records, TreeBuilder,
    TreeOptions,
};

//! Domain layer: records and tree building
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod display;
pub mod error;
pub mod options;
pub mod record;
pub mod validate;

pub use builder::{NestedTree, TreeBuilder};
pub use error::{DomainError, DomainResult};
pub use options::{FieldNames, Markers, TreeOptions, DEFAULT_INDENT};
pub use record::{
    load_records, records_from_value, value_text, LoadedRecords, Record, RecordId, Records,
};

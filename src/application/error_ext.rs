//! Error conversion helpers for common I/O and JSON operations
//!
//! Provides extension traits for cleaner error handling with context.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Attach the input path to a read failure.
    ///
    /// # Example
    /// ```ignore
    /// fs.read_to_string(&input).with_input_context(&input)?;
    /// ```
    fn with_input_context(self, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_input_context(self, path: &Path) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::Input {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Extension trait for converting `serde_json::Result` with context.
pub trait JsonResultExt<T> {
    /// Name where the JSON came from on parse failure.
    fn with_origin(self, origin: &str) -> ApplicationResult<T>;

    /// Describe what was being serialized on failure.
    fn with_operation(self, context: &str) -> ApplicationResult<T>;
}

impl<T> JsonResultExt<T> for serde_json::Result<T> {
    fn with_origin(self, origin: &str) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::Parse {
            origin: origin.to_string(),
            source,
        })
    }

    fn with_operation(self, context: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: context.to_string(),
            source: Box::new(e),
        })
    }
}

//! In-memory record for models without a database, and for tests.

use crate::storage::{ChangeTracking, FieldError, StorageCell, ValidationReporter};
use ordinal_bitset::{ColumnKind, Scalar};
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// A record held entirely in memory.
///
/// Columns that were never declared report [`ColumnKind::Unknown`].
#[derive(Debug, Clone, Default)]
pub struct MemoryRecord {
    cells: BTreeMap<String, Scalar>,
    kinds: BTreeMap<String, ColumnKind>,
    changed: BTreeSet<String>,
    errors: Vec<FieldError>,
}

impl MemoryRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a column's storage kind, builder style.
    pub fn with_column(mut self, column: impl Into<String>, kind: ColumnKind) -> Self {
        self.declare_column(column, kind);
        self
    }

    pub fn declare_column(&mut self, column: impl Into<String>, kind: ColumnKind) {
        self.kinds.insert(column.into(), kind);
    }

    /// Current cell content.
    pub fn get(&self, column: &str) -> Option<&Scalar> {
        self.cells.get(column)
    }

    /// Write a cell directly, bypassing any attribute binding.
    pub fn set(&mut self, column: &str, value: impl Into<Scalar>) {
        self.cells.insert(column.to_string(), value.into());
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Messages reported for `column`.
    pub fn errors_on(&self, column: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|error| error.column == column)
            .map(|error| error.message.as_str())
            .collect()
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl StorageCell for MemoryRecord {
    fn read(&self, column: &str) -> Option<Scalar> {
        self.cells.get(column).cloned()
    }

    fn write(&mut self, column: &str, value: Option<Scalar>) {
        match value {
            Some(value) => {
                self.cells.insert(column.to_string(), value);
            }
            None => {
                self.cells.remove(column);
            }
        }
    }

    fn column_kind(&self, column: &str) -> ColumnKind {
        self.kinds.get(column).copied().unwrap_or_default()
    }
}

impl ValidationReporter for MemoryRecord {
    fn report_field_error(&mut self, column: &str, message: String) {
        self.errors.push(FieldError {
            column: column.to_string(),
            message,
        });
    }
}

impl ChangeTracking for MemoryRecord {
    fn mark_changed(&mut self, attribute: &str) {
        if self.changed.insert(attribute.to_string()) {
            trace!(attribute, "attribute marked changed");
        }
    }

    fn reset_changed(&mut self, attribute: &str) {
        if self.changed.remove(attribute) {
            trace!(attribute, "attribute change flag reset");
        }
    }

    fn has_changed(&self, attribute: &str) -> bool {
        self.changed.contains(attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_and_kinds() {
        let mut record = MemoryRecord::new().with_column("product_type", ColumnKind::Integer);
        assert_eq!(record.column_kind("product_type"), ColumnKind::Integer);
        assert_eq!(record.column_kind("other"), ColumnKind::Unknown);

        record.set("product_type", 2);
        assert_eq!(record.read("product_type"), Some(Scalar::Integer(2)));
        record.write("product_type", None);
        assert_eq!(record.get("product_type"), None);
    }

    #[test]
    fn change_flags() {
        let mut record = MemoryRecord::new();
        assert!(!record.has_changed("product"));
        record.mark_changed("product");
        record.mark_changed("product");
        assert!(record.has_changed("product"));
        record.reset_changed("product");
        assert!(!record.has_changed("product"));
    }

    #[test]
    fn errors_are_collected_per_column() {
        let mut record = MemoryRecord::new();
        record.report_field_error("a", "first".to_string());
        record.report_field_error("b", "second".to_string());
        assert_eq!(record.errors_on("a"), vec!["first"]);
        assert!(!record.is_valid());
        record.clear_errors();
        assert!(record.is_valid());
    }
}

//! Contracts with the record that owns the columns.

use ordinal_bitset::{ColumnKind, Scalar};
use serde::Serialize;

/// Column-level access to one record.
pub trait StorageCell {
    fn read(&self, column: &str) -> Option<Scalar>;

    /// `None` clears the cell.
    fn write(&mut self, column: &str, value: Option<Scalar>);

    fn column_kind(&self, column: &str) -> ColumnKind;
}

/// Collects field-level validation failures. Reporting never fails.
pub trait ValidationReporter {
    fn report_field_error(&mut self, column: &str, message: String);
}

/// Per-attribute dirty flags.
pub trait ChangeTracking {
    fn mark_changed(&mut self, attribute: &str);
    fn reset_changed(&mut self, attribute: &str);
    fn has_changed(&self, attribute: &str) -> bool;
}

/// One reported validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub column: String,
    pub message: String,
}

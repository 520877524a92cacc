use std::fmt;

use serde::{Deserialize, Serialize};

/// Position of a table inside one snapshot of a [`crate::SchemaSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TablePath {
    pub schema_index: usize,
    pub table_index: usize,
}

impl TablePath {
    pub fn new(schema_index: usize, table_index: usize) -> Self {
        Self {
            schema_index,
            table_index,
        }
    }
}

impl fmt::Display for TablePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.schema_index, self.table_index)
    }
}

/// Position of a column inside one snapshot of a [`crate::SchemaSet`].
///
/// Indices are only meaningful against the snapshot they were captured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnPath {
    pub schema_index: usize,
    pub table_index: usize,
    pub column_index: usize,
}

impl ColumnPath {
    pub fn new(schema_index: usize, table_index: usize, column_index: usize) -> Self {
        Self {
            schema_index,
            table_index,
            column_index,
        }
    }

    pub fn table(self) -> TablePath {
        TablePath::new(self.schema_index, self.table_index)
    }

    pub fn key(self) -> ColumnKey {
        ColumnKey(self)
    }
}

impl fmt::Display for ColumnPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.schema_index, self.table_index, self.column_index
        )
    }
}

/// Key for per-column bookkeeping such as pending enrichment flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnKey(ColumnPath);

impl ColumnKey {
    pub fn path(self) -> ColumnPath {
        self.0
    }
}

impl From<ColumnPath> for ColumnKey {
    fn from(path: ColumnPath) -> Self {
        path.key()
    }
}

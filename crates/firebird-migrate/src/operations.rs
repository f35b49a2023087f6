//! DDL operations the migrator emits.
//!
//! Operations carry physical names only; resolving logical names against the
//! model happens before an operation is built.

use serde::{Deserialize, Serialize};

use crate::schema::{FieldSchema, SqlType};

/// A single schema change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MigrationOperation {
    /// Add a column to a table.
    AddColumn {
        /// Table name.
        table: String,
        /// Column definition.
        field: FieldSchema,
    },

    /// Change a column's data type.
    AlterColumnType {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
        /// New data type.
        sql_type: SqlType,
    },

    /// Set or drop NOT NULL on a column.
    AlterColumnNullability {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
        /// Whether the column should accept NULL.
        nullable: bool,
    },

    /// Rename a column.
    RenameColumn {
        /// Table name.
        table: String,
        /// Old column name.
        old_name: String,
        /// New column name.
        new_name: String,
    },

    /// Create an index.
    CreateIndex {
        /// Index name.
        name: String,
        /// Table name.
        table: String,
        /// Columns to index.
        columns: Vec<String>,
        /// Whether this is a unique index.
        unique: bool,
        /// Whether the index is descending.
        descending: bool,
    },

    /// Drop an index.
    DropIndex {
        /// Index name.
        name: String,
    },

    /// Drop a table.
    DropTable {
        /// Table name.
        name: String,
    },

    /// Drop a named constraint (check or foreign key).
    DropConstraint {
        /// Table holding the constraint.
        table: String,
        /// Constraint name.
        name: String,
    },

    /// Run a raw statement.
    RunSql {
        /// The statement.
        sql: String,
    },
}

impl MigrationOperation {
    /// Short operation name, for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AddColumn { .. } => "add_column",
            Self::AlterColumnType { .. } => "alter_column_type",
            Self::AlterColumnNullability { .. } => "alter_column_nullability",
            Self::RenameColumn { .. } => "rename_column",
            Self::CreateIndex { .. } => "create_index",
            Self::DropIndex { .. } => "drop_index",
            Self::DropTable { .. } => "drop_table",
            Self::DropConstraint { .. } => "drop_constraint",
            Self::RunSql { .. } => "run_sql",
        }
    }
}

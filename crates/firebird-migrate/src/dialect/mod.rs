//! Database dialect implementations.
//!
//! A dialect knows how to render migration operations as SQL for one
//! database system.

mod firebird;

pub use firebird::FirebirdDialect;

use crate::operations::MigrationOperation;
use crate::schema::{FieldSchema, SqlType};

/// Trait for database-specific SQL generation.
pub trait MigrationDialect: Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Generates SQL for a migration operation.
    fn generate_sql(&self, operation: &MigrationOperation) -> String;

    /// Returns the SQL type name for the given type.
    fn type_name(&self, sql_type: &SqlType) -> String;

    /// Returns the identity-column clause.
    fn auto_increment_keyword(&self) -> &'static str;

    /// Generates column definition SQL.
    fn column_definition(&self, field: &FieldSchema) -> String {
        let mut parts = vec![
            self.quote_identifier(&field.db_name),
            self.type_name(&field.sql_type),
        ];

        if field.auto_increment {
            parts.push(self.auto_increment_keyword().to_string());
        }

        if let Some(default_sql) = field.default.to_sql() {
            parts.push(format!("DEFAULT {}", default_sql));
        }

        if !field.nullable || field.primary_key {
            parts.push("NOT NULL".to_string());
        }

        if field.primary_key {
            parts.push("PRIMARY KEY".to_string());
        } else if field.unique {
            parts.push("UNIQUE".to_string());
        }

        parts.join(" ")
    }

    /// Quote an identifier (table name, column name, etc.).
    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

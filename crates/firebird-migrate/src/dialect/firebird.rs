//! Firebird dialect for migrations.
//!
//! Quoted identifiers are case-sensitive in Firebird while the catalog is
//! queried with upper-cased names, so every identifier is upper-cased before
//! it is quoted.

use crate::operations::MigrationOperation;
use crate::schema::SqlType;

use super::MigrationDialect;

/// Firebird migration dialect.
#[derive(Debug, Clone, Default)]
pub struct FirebirdDialect;

impl FirebirdDialect {
    /// Creates a new Firebird dialect.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn alter_column_sql(&self, table: &str, column: &str, action: &str) -> String {
        format!(
            "ALTER TABLE {} ALTER COLUMN {} {}",
            self.quote_identifier(table),
            self.quote_identifier(column),
            action
        )
    }

    /// Generates SQL for creating an index.
    fn create_index_sql(
        &self,
        name: &str,
        table: &str,
        columns: &[String],
        unique: bool,
        descending: bool,
    ) -> String {
        let mut sql = String::from("CREATE ");
        if unique {
            sql.push_str("UNIQUE ");
        }
        if descending {
            sql.push_str("DESCENDING ");
        }
        sql.push_str("INDEX ");
        sql.push_str(&self.quote_identifier(name));
        sql.push_str(" ON ");
        sql.push_str(&self.quote_identifier(table));
        sql.push_str(" (");

        let quoted: Vec<String> = columns.iter().map(|c| self.quote_identifier(c)).collect();
        sql.push_str(&quoted.join(", "));
        sql.push(')');
        sql
    }
}

impl MigrationDialect for FirebirdDialect {
    fn name(&self) -> &'static str {
        "firebird"
    }

    fn generate_sql(&self, operation: &MigrationOperation) -> String {
        match operation {
            MigrationOperation::AddColumn { table, field } => format!(
                "ALTER TABLE {} ADD {}",
                self.quote_identifier(table),
                self.column_definition(field)
            ),

            MigrationOperation::AlterColumnType {
                table,
                column,
                sql_type,
            } => self.alter_column_sql(
                table,
                column,
                &format!("TYPE {}", self.type_name(sql_type)),
            ),

            MigrationOperation::AlterColumnNullability {
                table,
                column,
                nullable,
            } => self.alter_column_sql(
                table,
                column,
                if *nullable {
                    "DROP NOT NULL"
                } else {
                    "SET NOT NULL"
                },
            ),

            MigrationOperation::RenameColumn {
                table,
                old_name,
                new_name,
            } => self.alter_column_sql(
                table,
                old_name,
                &format!("TO {}", self.quote_identifier(new_name)),
            ),

            MigrationOperation::CreateIndex {
                name,
                table,
                columns,
                unique,
                descending,
            } => self.create_index_sql(name, table, columns, *unique, *descending),

            MigrationOperation::DropIndex { name } => {
                format!("DROP INDEX {}", self.quote_identifier(name))
            }

            MigrationOperation::DropTable { name } => {
                format!("DROP TABLE {}", self.quote_identifier(name))
            }

            MigrationOperation::DropConstraint { table, name } => format!(
                "ALTER TABLE {} DROP CONSTRAINT {}",
                self.quote_identifier(table),
                self.quote_identifier(name)
            ),

            MigrationOperation::RunSql { sql } => sql.clone(),
        }
    }

    fn type_name(&self, sql_type: &SqlType) -> String {
        sql_type.firebird_name()
    }

    fn auto_increment_keyword(&self) -> &'static str {
        "GENERATED BY DEFAULT AS IDENTITY"
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.to_uppercase().replace('"', "\"\""))
    }
}

//! The Firebird migrator.
//!
//! Every operation takes the model it works on, resolves logical names through
//! it, and runs its statements one at a time on the host's executor.

use tracing::{debug, info, warn};

use crate::autodetector::diff_column;
use crate::catalog::{
    decode_count, CatalogColumn, COLUMN_TYPES_SQL, HAS_COLUMN_SQL, HAS_CONSTRAINT_SQL,
    HAS_INDEX_SQL, HAS_TABLE_SQL,
};
use crate::column::{ColumnDescriptor, ColumnInfo};
use crate::dialect::{FirebirdDialect, MigrationDialect};
use crate::error::{MigrateError, Result};
use crate::executor::{Executor, ScopedCursor, Value};
use crate::operations::MigrationOperation;
use crate::options::{ExistencePolicy, MigratorOptions, UnmappedTypePolicy};
use crate::ordering::dependency_order;
use crate::schema::{ConstraintKind, ModelDescriptor};

/// Introspects and migrates Firebird tables on behalf of a migration engine.
pub struct FirebirdMigrator<E: Executor> {
    executor: E,
    dialect: FirebirdDialect,
    options: MigratorOptions,
}

impl<E: Executor> FirebirdMigrator<E> {
    /// Creates a migrator with default options.
    pub fn new(executor: E) -> Self {
        Self::with_options(executor, MigratorOptions::default())
    }

    /// Creates a migrator with the given options.
    pub fn with_options(executor: E, options: MigratorOptions) -> Self {
        Self {
            executor,
            dialect: FirebirdDialect::new(),
            options,
        }
    }

    /// Returns the executor.
    #[must_use]
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Returns the dialect.
    #[must_use]
    pub fn dialect(&self) -> &FirebirdDialect {
        &self.dialect
    }

    /// Returns the options.
    #[must_use]
    pub fn options(&self) -> &MigratorOptions {
        &self.options
    }

    /// Reads the live columns of the model's table, in declared order.
    ///
    /// A table that does not exist yields an empty list. Any query or decode
    /// failure aborts the scan and no columns are returned.
    pub async fn column_types<M: ModelDescriptor + ?Sized>(
        &self,
        model: &M,
    ) -> Result<Vec<ColumnDescriptor>> {
        let table = model.table_name().to_uppercase();
        let params = [Value::Text(table.clone())];

        let cursor = self
            .executor
            .query(COLUMN_TYPES_SQL, &params)
            .await
            .map_err(|e| MigrateError::query(COLUMN_TYPES_SQL, e))?;
        let mut cursor = ScopedCursor::new(cursor);

        let mut columns = Vec::new();
        while let Some(row) = cursor
            .next_row()
            .await
            .map_err(|e| MigrateError::query(COLUMN_TYPES_SQL, e))?
        {
            let column = ColumnDescriptor::from_catalog(&CatalogColumn::decode(&row)?);
            if column.canonical_type().is_none() {
                match self.options.unmapped_types {
                    UnmappedTypePolicy::Reject => {
                        return Err(MigrateError::UnrecognizedType {
                            table,
                            column: column.name().to_string(),
                            engine_type: column.database_type_name().to_string(),
                        });
                    }
                    UnmappedTypePolicy::Surface => warn!(
                        table = %table,
                        column = %column.name(),
                        engine_type = %column.database_type_name(),
                        "Column type has no canonical name"
                    ),
                }
            }
            columns.push(column);
        }
        cursor.close();

        debug!(table = %table, columns = columns.len(), "Read column metadata");
        Ok(columns)
    }

    /// Returns whether the model's table exists.
    pub async fn has_table<M: ModelDescriptor + ?Sized>(&self, model: &M) -> Result<bool> {
        self.exists(HAS_TABLE_SQL, &[upper(model.table_name())])
            .await
    }

    /// Returns whether an index exists on the model's table.
    ///
    /// `name` may be a declared index name or a field the index covers.
    pub async fn has_index<M: ModelDescriptor + ?Sized>(
        &self,
        model: &M,
        name: &str,
    ) -> Result<bool> {
        let index = model.look_up_index(name).map_or(name, |idx| idx.name.as_str());
        self.exists(HAS_INDEX_SQL, &[upper(model.table_name()), upper(index)])
            .await
    }

    /// Returns whether a constraint exists.
    ///
    /// Foreign keys are looked up on the table that holds them.
    pub async fn has_constraint<M: ModelDescriptor + ?Sized>(
        &self,
        model: &M,
        name: &str,
    ) -> Result<bool> {
        let (table, constraint) = match model.classify_constraint(name) {
            ConstraintKind::Check { name } => (model.table_name().to_string(), name),
            ConstraintKind::ForeignKey { name, table } => (table, name),
            ConstraintKind::Unknown => (model.table_name().to_string(), name.to_string()),
        };
        self.exists(HAS_CONSTRAINT_SQL, &[upper(&table), upper(&constraint)])
            .await
    }

    /// Returns whether a column exists on the model's table.
    pub async fn has_column<M: ModelDescriptor + ?Sized>(
        &self,
        model: &M,
        field: &str,
    ) -> Result<bool> {
        let column = model
            .look_up_field(field)
            .map_or(field, |f| f.db_name.as_str());
        self.exists(HAS_COLUMN_SQL, &[upper(model.table_name()), upper(column)])
            .await
    }

    /// Changes a column's type to the field's declared type.
    pub async fn alter_column<M: ModelDescriptor + ?Sized>(
        &self,
        model: &M,
        field: &str,
    ) -> Result<()> {
        let field = model
            .look_up_field(field)
            .ok_or_else(|| MigrateError::FieldNotFound(field.to_string()))?;

        self.run(&MigrationOperation::AlterColumnType {
            table: model.table_name().to_string(),
            column: field.db_name.clone(),
            sql_type: field.sql_type.clone(),
        })
        .await
    }

    /// Renames a column. At least one of the names must be a declared field.
    pub async fn rename_column<M: ModelDescriptor + ?Sized>(
        &self,
        model: &M,
        old_name: &str,
        new_name: &str,
    ) -> Result<()> {
        let old = model.look_up_field(old_name);
        let new = model.look_up_field(new_name);
        if old.is_none() && new.is_none() {
            return Err(MigrateError::FieldNotFound(new_name.to_string()));
        }

        self.run(&MigrationOperation::RenameColumn {
            table: model.table_name().to_string(),
            old_name: old.map_or_else(|| old_name.to_string(), |f| f.db_name.clone()),
            new_name: new.map_or_else(|| new_name.to_string(), |f| f.db_name.clone()),
        })
        .await
    }

    /// Creates a declared index.
    pub async fn create_index<M: ModelDescriptor + ?Sized>(
        &self,
        model: &M,
        name: &str,
    ) -> Result<()> {
        let index = model
            .look_up_index(name)
            .ok_or_else(|| MigrateError::IndexNotFound(name.to_string()))?;
        self.create_index_as(model, index.name.as_str(), name).await
    }

    /// Creates the index declared as `declared` under the name `index_name`.
    async fn create_index_as<M: ModelDescriptor + ?Sized>(
        &self,
        model: &M,
        index_name: &str,
        declared: &str,
    ) -> Result<()> {
        let index = model
            .look_up_index(declared)
            .ok_or_else(|| MigrateError::IndexNotFound(declared.to_string()))?;
        let columns = index
            .fields
            .iter()
            .map(|name| {
                model
                    .look_up_field(name)
                    .map_or_else(|| name.clone(), |f| f.db_name.clone())
            })
            .collect();

        self.run(&MigrationOperation::CreateIndex {
            name: index_name.to_string(),
            table: model.table_name().to_string(),
            columns,
            unique: index.unique,
            descending: index.descending,
        })
        .await
    }

    /// Drops an index by declared or physical name.
    pub async fn drop_index<M: ModelDescriptor + ?Sized>(
        &self,
        model: &M,
        name: &str,
    ) -> Result<()> {
        let index = model.look_up_index(name).map_or(name, |idx| idx.name.as_str());
        self.run(&MigrationOperation::DropIndex {
            name: index.to_string(),
        })
        .await
    }

    /// Renames an index by dropping it and creating it again.
    ///
    /// When the model still declares the old index and not the new one, the
    /// old definition is recreated under the new name. Otherwise the index
    /// declared as `new_name` is created.
    pub async fn rename_index<M: ModelDescriptor + ?Sized>(
        &self,
        model: &M,
        old_name: &str,
        new_name: &str,
    ) -> Result<()> {
        self.drop_index(model, old_name).await?;

        if model.look_up_index(new_name).is_none() && model.look_up_index(old_name).is_some() {
            return self.create_index_as(model, new_name, old_name).await;
        }

        self.create_index(model, new_name).await
    }

    /// Adds a declared field as a new column.
    pub async fn add_column<M: ModelDescriptor + ?Sized>(
        &self,
        model: &M,
        field: &str,
    ) -> Result<()> {
        let field = model
            .look_up_field(field)
            .ok_or_else(|| MigrateError::FieldNotFound(field.to_string()))?;

        self.run(&MigrationOperation::AddColumn {
            table: model.table_name().to_string(),
            field: field.clone(),
        })
        .await
    }

    /// Drops the tables of several models, children before parents.
    ///
    /// Tables that do not exist are skipped. The first failed drop stops the
    /// sequence; the foreign-key toggle is switched back on regardless.
    pub async fn drop_tables<M: ModelDescriptor>(&self, models: &[M]) -> Result<()> {
        let order = dependency_order(models);
        let toggle = self.options.foreign_key_toggle.as_ref();

        if let Some(toggle) = toggle {
            self.run_tolerated(&toggle.disable).await;
        }

        let mut result = Ok(());
        for &index in order.iter().rev() {
            result = self.drop_table(&models[index]).await;
            if result.is_err() {
                break;
            }
        }

        if let Some(toggle) = toggle {
            self.run_tolerated(&toggle.enable).await;
        }
        result
    }

    async fn drop_table<M: ModelDescriptor + ?Sized>(&self, model: &M) -> Result<()> {
        if !self.has_table(model).await? {
            debug!(table = %model.table_name(), "Table does not exist, skipping drop");
            return Ok(());
        }
        self.run(&MigrationOperation::DropTable {
            name: model.table_name().to_string(),
        })
        .await
    }

    /// Drops a declared check or foreign-key constraint.
    pub async fn drop_constraint<M: ModelDescriptor + ?Sized>(
        &self,
        model: &M,
        name: &str,
    ) -> Result<()> {
        let (table, name) = match model.classify_constraint(name) {
            ConstraintKind::Check { name } => (model.table_name().to_string(), name),
            ConstraintKind::ForeignKey { name, table } => (table, name),
            ConstraintKind::Unknown => {
                return Err(MigrateError::ConstraintNotFound(name.to_string()));
            }
        };

        self.run(&MigrationOperation::DropConstraint { table, name })
            .await
    }

    /// Brings the live columns of the model's table in line with its fields.
    ///
    /// Missing columns are added and drifted ones altered. Columns the model
    /// does not declare are left alone. Returns the operations that ran.
    pub async fn migrate_columns<M: ModelDescriptor + ?Sized>(
        &self,
        model: &M,
    ) -> Result<Vec<MigrationOperation>> {
        let live = self.column_types(model).await?;
        let table = model.table_name().to_string();

        let mut operations = Vec::new();
        for field in model.fields() {
            let Some(column) = live
                .iter()
                .find(|c| c.name().eq_ignore_ascii_case(&field.db_name))
            else {
                operations.push(MigrationOperation::AddColumn {
                    table: table.clone(),
                    field: field.clone(),
                });
                continue;
            };

            let changes = diff_column(field, column);
            if let Some(sql_type) = changes.sql_type {
                operations.push(MigrationOperation::AlterColumnType {
                    table: table.clone(),
                    column: field.db_name.clone(),
                    sql_type,
                });
            }
            if let Some(nullable) = changes.nullable {
                operations.push(MigrationOperation::AlterColumnNullability {
                    table: table.clone(),
                    column: field.db_name.clone(),
                    nullable,
                });
            }
        }

        for operation in &operations {
            self.run(operation).await?;
        }
        Ok(operations)
    }

    async fn count(&self, sql: &str, params: &[Value]) -> Result<i64> {
        let cursor = self
            .executor
            .query(sql, params)
            .await
            .map_err(|e| MigrateError::query(sql, e))?;
        let mut cursor = ScopedCursor::new(cursor);
        let row = cursor
            .next_row()
            .await
            .map_err(|e| MigrateError::query(sql, e))?;
        let count = decode_count(row.as_deref())?;
        cursor.close();
        Ok(count)
    }

    async fn exists(&self, sql: &str, params: &[Value]) -> Result<bool> {
        match self.count(sql, params).await {
            Ok(count) => Ok(count > 0),
            Err(err) => match self.options.existence_errors {
                ExistencePolicy::Propagate => Err(err),
                ExistencePolicy::FailOpen => {
                    warn!(error = %err, "Existence check failed, reporting absent");
                    Ok(false)
                }
            },
        }
    }

    async fn run(&self, operation: &MigrationOperation) -> Result<()> {
        let sql = self.dialect.generate_sql(operation);
        info!(operation = operation.kind(), "Applying operation");
        debug!(sql = %sql, "Executing SQL");

        self.executor
            .execute(&sql, &[])
            .await
            .map_err(|e| MigrateError::query(sql.as_str(), e))?;
        Ok(())
    }

    async fn run_tolerated(&self, sql: &str) {
        let operation = MigrationOperation::RunSql {
            sql: sql.to_string(),
        };
        if let Err(err) = self.run(&operation).await {
            warn!(error = %err, "Ignoring failed session statement");
        }
    }
}

fn upper(name: &str) -> Value {
    Value::Text(name.to_uppercase())
}

//! Firebird dialect for ORM schema introspection and migrations.
//!
//! `firebird-migrate` lets a schema-migration engine work against Firebird:
//! - Live column metadata is read from the `RDB$` system catalog and exposed
//!   through the [`ColumnInfo`](column::ColumnInfo) trait
//! - Tables, indexes, constraints and columns can be probed for existence
//! - Schema changes are emitted as Firebird DDL
//!
//! # Architecture
//!
//! - **Executor** - The host's connection, abstracted as [`Executor`](executor::Executor)
//! - **Catalog** - The system-catalog queries and their row decoding
//! - **Column** - Interpretation of catalog rows into canonical types
//! - **Schema** - The declared model the migrator resolves names against
//! - **Dialect** - Firebird DDL generation
//! - **Migrator** - The operations a migration engine calls
//!
//! # Example
//!
//! ```rust,ignore
//! use firebird_migrate::prelude::*;
//!
//! let users = TableSchema::new("USERS")
//!     .field(FieldSchema::new("id", SqlType::Integer).primary_key())
//!     .field(FieldSchema::new("name", SqlType::Varchar(50)));
//!
//! let migrator = FirebirdMigrator::new(connection);
//! for column in migrator.column_types(&users).await? {
//!     println!("{} {:?} {:?}", column.name(), column.data_type(), column.length());
//! }
//!
//! if !migrator.has_column(&users, "name").await? {
//!     migrator.add_column(&users, "name").await?;
//! }
//! ```

pub mod autodetector;
pub mod catalog;
pub mod column;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod migrator;
pub mod naming;
pub mod operations;
pub mod options;
pub mod ordering;
pub mod schema;

#[cfg(test)]
mod testing;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::autodetector::{diff_column, ColumnChanges};
    pub use crate::column::{CanonicalType, ColumnDescriptor, ColumnInfo};
    pub use crate::dialect::{FirebirdDialect, MigrationDialect};
    pub use crate::error::{MigrateError, Result};
    pub use crate::executor::{DriverError, Executor, RowCursor, Value};
    pub use crate::migrator::FirebirdMigrator;
    pub use crate::naming::NamingStrategy;
    pub use crate::operations::MigrationOperation;
    pub use crate::options::{
        ExistencePolicy, ForeignKeyToggle, MigratorOptions, UnmappedTypePolicy,
    };
    pub use crate::schema::{
        ConstraintKind, DefaultValue, FieldSchema, ForeignKeySchema, IndexSchema,
        ModelDescriptor, SqlType, TableSchema,
    };
}

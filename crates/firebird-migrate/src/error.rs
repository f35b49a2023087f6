//! Error types for the Firebird migrator.

use crate::executor::DriverError;

/// Errors that can occur during introspection or migration operations.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// The executor failed to run a statement.
    #[error("Query failed: {source} (sql: {sql})")]
    Query {
        /// The statement that failed.
        sql: String,
        /// The underlying driver error.
        #[source]
        source: DriverError,
    },

    /// A catalog row had a different number of values than expected.
    #[error("Catalog row has {found} values, expected {expected}")]
    RowShape {
        /// Number of values the decoder expects.
        expected: usize,
        /// Number of values the row carried.
        found: usize,
    },

    /// A catalog value had the wrong type.
    #[error("Catalog column '{column}' expected {expected}, found {found}")]
    UnexpectedValue {
        /// Catalog column name.
        column: &'static str,
        /// Expected value kind.
        expected: &'static str,
        /// What the row actually held.
        found: String,
    },

    /// A field is not declared on the model.
    #[error("Failed to look up field with name: {0}")]
    FieldNotFound(String),

    /// An index is not declared on the model.
    #[error("Failed to look up index with name: {0}")]
    IndexNotFound(String),

    /// A constraint is neither a declared check nor a declared foreign key.
    #[error("Failed to look up constraint with name: {0}")]
    ConstraintNotFound(String),

    /// The catalog reported a field type with no canonical SQL name.
    #[error("Column '{table}.{column}' has unrecognized Firebird type '{engine_type}'")]
    UnrecognizedType {
        /// Table being introspected.
        table: String,
        /// Column carrying the type.
        column: String,
        /// Raw `RDB$TYPE_NAME` value.
        engine_type: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MigrateError {
    /// Wraps a driver error together with the statement that produced it.
    pub fn query(sql: impl Into<String>, source: DriverError) -> Self {
        Self::Query {
            sql: sql.into(),
            source,
        }
    }
}

/// Result type for migrator operations.
pub type Result<T> = std::result::Result<T, MigrateError>;

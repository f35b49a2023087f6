//! Physical naming for Firebird.
//!
//! Firebird folds unquoted identifiers to upper case and the catalog stores
//! them that way, so every generated name is upper-cased. Names longer than
//! the identifier limit are shortened with a hash suffix so they stay unique.

use inflector::Inflector;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

/// Maximum identifier length (Firebird 4+).
pub const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Hex digits of the SHA-1 appended to shortened identifiers.
const HASH_SUFFIX_LEN: usize = 8;

/// Derives physical table, column, constraint and index names from logical ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingStrategy {
    /// Prefix prepended to every table name.
    pub table_prefix: String,
    /// Use singular table names (`USER` instead of `USERS`).
    pub singular_table: bool,
}

impl NamingStrategy {
    /// Creates the default strategy: plural table names, no prefix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the table prefix.
    #[must_use]
    pub fn table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    /// Uses singular table names.
    #[must_use]
    pub fn singular_table(mut self) -> Self {
        self.singular_table = true;
        self
    }

    /// `OrderItem` -> `ORDER_ITEMS`.
    #[must_use]
    pub fn table_name(&self, model: &str) -> String {
        let snake = model.to_snake_case();
        let name = if self.singular_table {
            snake
        } else {
            snake.to_plural()
        };
        upper(&format!("{}{}", self.table_prefix, name))
    }

    /// `createdAt` -> `CREATED_AT`.
    #[must_use]
    pub fn column_name(&self, _table: &str, field: &str) -> String {
        upper(&field.to_snake_case())
    }

    /// Join tables keep an explicit underscore name as-is and pluralize a
    /// single word.
    #[must_use]
    pub fn join_table_name(&self, name: &str) -> String {
        let snake = name.to_snake_case();
        let name = if !self.singular_table && !name.contains('_') {
            snake.to_plural()
        } else {
            snake
        };
        upper(&format!("{}{}", self.table_prefix, name))
    }

    /// `FK_<TABLE>_<RELATIONSHIP>`.
    #[must_use]
    pub fn relationship_fk_name(&self, table: &str, relationship: &str) -> String {
        upper(&format!("fk_{}_{}", table, relationship.to_snake_case()))
    }

    /// `CHK_<TABLE>_<COLUMN>`.
    #[must_use]
    pub fn checker_name(&self, table: &str, column: &str) -> String {
        upper(&format!("chk_{table}_{column}"))
    }

    /// `IDX_<TABLE>_<COLUMN>`; dots in qualified names become underscores.
    #[must_use]
    pub fn index_name(&self, table: &str, column: &str) -> String {
        upper(&format!("idx_{table}_{column}").replace('.', "_"))
    }
}

/// Upper-cases and shortens an identifier.
fn upper(name: &str) -> String {
    shorten(&name.to_uppercase())
}

/// Shortens `name` to [`MAX_IDENTIFIER_LENGTH`] characters, replacing the
/// tail with a hash of the full name.
#[must_use]
pub fn shorten(name: &str) -> String {
    if name.chars().count() <= MAX_IDENTIFIER_LENGTH {
        return name.to_string();
    }
    let digest = Sha1::digest(name.as_bytes());
    let hash: String = digest.iter().map(|b| format!("{b:02X}")).collect();
    let head: String = name
        .chars()
        .take(MAX_IDENTIFIER_LENGTH - HASH_SUFFIX_LEN)
        .collect();
    format!("{head}{}", &hash[..HASH_SUFFIX_LEN])
}

//! Firebird system-catalog queries and typed row decoding.
//!
//! Every catalog identifier is stored upper-cased and blank-padded to the
//! width of a `CHAR` column, so callers upper-case names before binding them
//! and trim what comes back.

use crate::error::{MigrateError, Result};
use crate::executor::Value;

/// Reads the columns of one user table, in declared field order.
///
/// Binds one parameter: the upper-cased relation name.
pub const COLUMN_TYPES_SQL: &str = "\
SELECT B.RDB$FIELD_NAME, B.RDB$NULL_FLAG, D.RDB$TYPE_NAME, C.RDB$FIELD_LENGTH, \
C.RDB$FIELD_PRECISION, C.RDB$FIELD_SCALE, B.RDB$DEFAULT_SOURCE, B.RDB$DESCRIPTION, \
B.RDB$IDENTITY_TYPE, \
(SELECT COUNT(*) FROM RDB$RELATION_CONSTRAINTS RC \
INNER JOIN RDB$INDEX_SEGMENTS S ON RC.RDB$INDEX_NAME = S.RDB$INDEX_NAME \
WHERE RC.RDB$RELATION_NAME = A.RDB$RELATION_NAME AND S.RDB$FIELD_NAME = B.RDB$FIELD_NAME \
AND RC.RDB$CONSTRAINT_TYPE = 'PRIMARY KEY'), \
(SELECT COUNT(*) FROM RDB$RELATION_CONSTRAINTS RC \
INNER JOIN RDB$INDEX_SEGMENTS S ON RC.RDB$INDEX_NAME = S.RDB$INDEX_NAME \
WHERE RC.RDB$RELATION_NAME = A.RDB$RELATION_NAME AND S.RDB$FIELD_NAME = B.RDB$FIELD_NAME \
AND RC.RDB$CONSTRAINT_TYPE = 'UNIQUE' \
AND (SELECT COUNT(*) FROM RDB$INDEX_SEGMENTS S2 WHERE S2.RDB$INDEX_NAME = RC.RDB$INDEX_NAME) = 1) \
FROM RDB$RELATIONS A \
INNER JOIN RDB$RELATION_FIELDS B ON A.RDB$RELATION_NAME = B.RDB$RELATION_NAME \
INNER JOIN RDB$FIELDS C ON B.RDB$FIELD_SOURCE = C.RDB$FIELD_NAME \
INNER JOIN RDB$TYPES D ON C.RDB$FIELD_TYPE = D.RDB$TYPE \
WHERE COALESCE(A.RDB$SYSTEM_FLAG, 0) = 0 \
AND D.RDB$FIELD_NAME = 'RDB$FIELD_TYPE' \
AND A.RDB$RELATION_NAME = ? \
ORDER BY B.RDB$FIELD_POSITION";

/// Values selected by [`COLUMN_TYPES_SQL`], in order.
pub const COLUMN_FIELDS: [&str; 11] = [
    "RDB$FIELD_NAME",
    "RDB$NULL_FLAG",
    "RDB$TYPE_NAME",
    "RDB$FIELD_LENGTH",
    "RDB$FIELD_PRECISION",
    "RDB$FIELD_SCALE",
    "RDB$DEFAULT_SOURCE",
    "RDB$DESCRIPTION",
    "RDB$IDENTITY_TYPE",
    "PRIMARY_KEY_SEGMENTS",
    "UNIQUE_SEGMENTS",
];

/// Counts user tables with the given name.
pub const HAS_TABLE_SQL: &str = "SELECT COUNT(*) FROM RDB$RELATIONS \
WHERE COALESCE(RDB$SYSTEM_FLAG, 0) = 0 AND RDB$RELATION_NAME = ?";

/// Counts indexes with the given relation and index name.
pub const HAS_INDEX_SQL: &str =
    "SELECT COUNT(*) FROM RDB$INDICES WHERE RDB$RELATION_NAME = ? AND RDB$INDEX_NAME = ?";

/// Counts constraints with the given relation and constraint name.
pub const HAS_CONSTRAINT_SQL: &str = "SELECT COUNT(*) FROM RDB$RELATION_CONSTRAINTS \
WHERE RDB$RELATION_NAME = ? AND RDB$CONSTRAINT_NAME = ?";

/// Counts fields with the given relation and field name.
pub const HAS_COLUMN_SQL: &str =
    "SELECT COUNT(*) FROM RDB$RELATION_FIELDS WHERE RDB$RELATION_NAME = ? AND RDB$FIELD_NAME = ?";

/// One row of [`COLUMN_TYPES_SQL`], before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogColumn {
    /// `RDB$FIELD_NAME`, still padded.
    pub field_name: String,
    /// `RDB$NULL_FLAG`: set when the column is declared NOT NULL.
    pub null_flag: Option<i64>,
    /// `RDB$TYPE_NAME` of the field's type code, still padded.
    pub type_name: String,
    /// `RDB$FIELD_LENGTH`, in storage bytes.
    pub field_length: Option<i64>,
    pub precision: Option<i64>,
    /// `RDB$FIELD_SCALE`; Firebird stores it negated.
    pub scale: Option<i64>,
    pub default_source: Option<String>,
    pub description: Option<String>,
    /// `RDB$IDENTITY_TYPE`, set for identity columns.
    pub identity_type: Option<i64>,
    pub primary_key_segments: i64,
    pub unique_segments: i64,
}

impl CatalogColumn {
    /// Decodes a row, failing on any arity or type mismatch.
    pub fn decode(row: &[Value]) -> Result<Self> {
        if row.len() != COLUMN_FIELDS.len() {
            return Err(MigrateError::RowShape {
                expected: COLUMN_FIELDS.len(),
                found: row.len(),
            });
        }

        Ok(Self {
            field_name: text(row, 0)?,
            null_flag: opt_integer(row, 1)?,
            type_name: text(row, 2)?,
            field_length: opt_integer(row, 3)?,
            precision: opt_integer(row, 4)?,
            scale: opt_integer(row, 5)?,
            default_source: opt_text(row, 6)?,
            description: opt_text(row, 7)?,
            identity_type: opt_integer(row, 8)?,
            primary_key_segments: opt_integer(row, 9)?.unwrap_or(0),
            unique_segments: opt_integer(row, 10)?.unwrap_or(0),
        })
    }
}

/// Decodes the single value of a `COUNT(*)` result.
///
/// A missing row counts as zero.
pub fn decode_count(row: Option<&[Value]>) -> Result<i64> {
    let Some(row) = row else {
        return Ok(0);
    };
    if row.len() != 1 {
        return Err(MigrateError::RowShape {
            expected: 1,
            found: row.len(),
        });
    }
    match &row[0] {
        Value::Integer(count) => Ok(*count),
        other => Err(unexpected("COUNT(*)", "integer", other)),
    }
}

fn unexpected(column: &'static str, expected: &'static str, found: &Value) -> MigrateError {
    MigrateError::UnexpectedValue {
        column,
        expected,
        found: format!("{found:?}"),
    }
}

fn text(row: &[Value], index: usize) -> Result<String> {
    match &row[index] {
        Value::Text(value) => Ok(value.clone()),
        other => Err(unexpected(COLUMN_FIELDS[index], "text", other)),
    }
}

fn opt_text(row: &[Value], index: usize) -> Result<Option<String>> {
    match &row[index] {
        Value::Null => Ok(None),
        Value::Text(value) => Ok(Some(value.clone())),
        other => Err(unexpected(COLUMN_FIELDS[index], "text or NULL", other)),
    }
}

fn opt_integer(row: &[Value], index: usize) -> Result<Option<i64>> {
    match &row[index] {
        Value::Null => Ok(None),
        Value::Integer(value) => Ok(Some(*value)),
        other => Err(unexpected(COLUMN_FIELDS[index], "integer or NULL", other)),
    }
}

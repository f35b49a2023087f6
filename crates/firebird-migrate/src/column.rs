//! Column metadata as seen by the host migration engine.
//!
//! [`ColumnInfo`] is the uniform accessor contract the engine queries when it
//! compares the declared schema with the live one. [`ColumnDescriptor`] is the
//! Firebird implementation, built from one [`CatalogColumn`] row.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogColumn;

/// Bytes per character of the UTF8 storage the catalog lengths are measured in.
pub const BYTES_PER_CHAR: i64 = 4;

/// Canonical SQL type names produced from Firebird type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalType {
    Char,
    BigInt,
    Integer,
    Numeric,
    SmallInt,
    Double,
    Varchar,
    Float,
    Blob,
    Timestamp,
}

impl CanonicalType {
    /// Maps a Firebird `RDB$TYPE_NAME` (plus the field scale) to a canonical type.
    ///
    /// Returns `None` for type names outside the mapped set; no default is
    /// substituted.
    #[must_use]
    pub fn from_engine(type_name: &str, scale: Option<i64>) -> Option<Self> {
        match type_name.trim() {
            "TEXT" => Some(Self::Char),
            "INT64" => Some(Self::BigInt),
            "LONG" => Some(if scale.unwrap_or(0) == 0 {
                Self::Integer
            } else {
                Self::Numeric
            }),
            "SHORT" => Some(Self::SmallInt),
            "DOUBLE" => Some(Self::Double),
            "VARYING" => Some(Self::Varchar),
            "FLOAT" => Some(Self::Float),
            "BLOB" => Some(Self::Blob),
            "TIMESTAMP" => Some(Self::Timestamp),
            _ => None,
        }
    }

    /// Returns the uppercase SQL name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Char => "CHAR",
            Self::BigInt => "BIGINT",
            Self::Integer => "INTEGER",
            Self::Numeric => "NUMERIC",
            Self::SmallInt => "SMALLINT",
            Self::Double => "DOUBLE",
            Self::Varchar => "VARCHAR",
            Self::Float => "FLOAT",
            Self::Blob => "BLOB",
            Self::Timestamp => "TIMESTAMP",
        }
    }

    /// Returns true for types that carry a character length.
    #[must_use]
    pub fn is_character(&self) -> bool {
        matches!(self, Self::Char | Self::Varchar)
    }
}

impl fmt::Display for CanonicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column metadata accessors consumed by the migration engine.
///
/// Each accessor returns `None` when the value is unknown or does not apply.
pub trait ColumnInfo {
    /// Column name, without catalog padding.
    fn name(&self) -> &str;

    /// The database's own name for the column type.
    fn database_type_name(&self) -> &str;

    /// Canonical SQL type name.
    fn data_type(&self) -> Option<&str>;

    /// Maximum length in characters, for character types.
    fn length(&self) -> Option<i64>;

    fn nullable(&self) -> Option<bool>;

    /// Precision and scale, reported only together.
    fn decimal_size(&self) -> Option<(i64, i64)>;

    fn primary_key(&self) -> Option<bool> {
        None
    }

    fn unique(&self) -> Option<bool> {
        None
    }

    fn auto_increment(&self) -> Option<bool> {
        None
    }

    fn default_value(&self) -> Option<&str> {
        None
    }

    fn comment(&self) -> Option<&str> {
        None
    }
}

/// A live column of a Firebird table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    name: String,
    engine_type: String,
    canonical: Option<CanonicalType>,
    max_length: Option<i64>,
    nullable: Option<bool>,
    precision: Option<i64>,
    scale: Option<i64>,
    primary_key: bool,
    unique: bool,
    auto_increment: bool,
    default_value: Option<String>,
    comment: Option<String>,
}

impl ColumnDescriptor {
    /// Interprets one catalog row.
    #[must_use]
    pub fn from_catalog(column: &CatalogColumn) -> Self {
        let engine_type = column.type_name.trim().to_string();
        let canonical = CanonicalType::from_engine(&engine_type, column.scale);
        let is_character = canonical.is_some_and(|t| t.is_character());

        let max_length = if is_character {
            column.field_length.map(|raw| {
                if engine_type == "VARYING" {
                    raw / BYTES_PER_CHAR
                } else {
                    raw * BYTES_PER_CHAR
                }
            })
        } else {
            None
        };

        let (precision, scale) = match column.precision {
            Some(precision) if precision > 0 && !is_character => {
                (Some(precision), Some(column.scale.unwrap_or(0).abs()))
            }
            _ => (None, None),
        };

        Self {
            name: column.field_name.trim().to_string(),
            engine_type,
            canonical,
            max_length,
            nullable: Some(column.null_flag.unwrap_or(0) == 0),
            precision,
            scale,
            primary_key: column.primary_key_segments > 0,
            unique: column.unique_segments > 0,
            auto_increment: column.identity_type.is_some(),
            default_value: column.default_source.as_deref().and_then(default_expression),
            comment: column.description.clone(),
        }
    }

    /// The canonical type, if the engine type is mapped.
    #[must_use]
    pub fn canonical_type(&self) -> Option<CanonicalType> {
        self.canonical
    }
}

/// Strips the leading `DEFAULT` keyword Firebird keeps in `RDB$DEFAULT_SOURCE`.
fn default_expression(source: &str) -> Option<String> {
    let source = source.trim();
    let expression = match source.get(..7) {
        Some(keyword) if keyword.eq_ignore_ascii_case("DEFAULT") => source[7..].trim_start(),
        _ => source,
    };
    if expression.is_empty() {
        None
    } else {
        Some(expression.to_string())
    }
}

impl ColumnInfo for ColumnDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn database_type_name(&self) -> &str {
        &self.engine_type
    }

    fn data_type(&self) -> Option<&str> {
        self.canonical.map(|t| t.as_str())
    }

    fn length(&self) -> Option<i64> {
        self.max_length
    }

    fn nullable(&self) -> Option<bool> {
        self.nullable
    }

    fn decimal_size(&self) -> Option<(i64, i64)> {
        self.precision.zip(self.scale)
    }

    fn primary_key(&self) -> Option<bool> {
        Some(self.primary_key)
    }

    fn unique(&self) -> Option<bool> {
        Some(self.unique)
    }

    fn auto_increment(&self) -> Option<bool> {
        Some(self.auto_increment)
    }

    fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(name: &str, type_name: &str) -> CatalogColumn {
        CatalogColumn {
            field_name: name.to_string(),
            null_flag: None,
            type_name: type_name.to_string(),
            field_length: None,
            precision: None,
            scale: Some(0),
            default_source: None,
            description: None,
            identity_type: None,
            primary_key_segments: 0,
            unique_segments: 0,
        }
    }

    #[test]
    fn test_type_mapping() {
        let cases = [
            ("TEXT", 0, "CHAR"),
            ("INT64", 0, "BIGINT"),
            ("INT64", -2, "BIGINT"),
            ("LONG", 0, "INTEGER"),
            ("LONG", -2, "NUMERIC"),
            ("SHORT", 0, "SMALLINT"),
            ("DOUBLE", 0, "DOUBLE"),
            ("VARYING", 0, "VARCHAR"),
            ("FLOAT", 0, "FLOAT"),
            ("BLOB", 0, "BLOB"),
            ("TIMESTAMP", 0, "TIMESTAMP"),
        ];
        for (engine, scale, expected) in cases {
            let mapped = CanonicalType::from_engine(engine, Some(scale)).unwrap();
            assert_eq!(mapped.as_str(), expected, "{engine} scale {scale}");
        }
    }

    #[test]
    fn test_unmapped_types() {
        for engine in ["CSTRING", "DATE", "TIME", "BOOLEAN", "QUAD", ""] {
            assert_eq!(CanonicalType::from_engine(engine, Some(0)), None);
        }
    }

    #[test]
    fn test_type_name_padding_ignored() {
        assert_eq!(
            CanonicalType::from_engine("VARYING                    ", None),
            Some(CanonicalType::Varchar)
        );
    }

    #[test]
    fn test_integer_column_scenario() {
        let mut row = catalog(" ID ", "LONG");
        row.null_flag = Some(1);
        row.precision = Some(0);
        row.primary_key_segments = 1;

        let column = ColumnDescriptor::from_catalog(&row);
        assert_eq!(column.name(), "ID");
        assert_eq!(column.data_type(), Some("INTEGER"));
        assert_eq!(column.nullable(), Some(false));
        assert_eq!(column.length(), None);
        assert_eq!(column.decimal_size(), None);
        assert_eq!(column.primary_key(), Some(true));
    }

    #[test]
    fn test_varchar_column_scenario() {
        let mut row = catalog("NAME", "VARYING");
        row.field_length = Some(200);

        let column = ColumnDescriptor::from_catalog(&row);
        assert_eq!(column.name(), "NAME");
        assert_eq!(column.data_type(), Some("VARCHAR"));
        assert_eq!(column.length(), Some(50));
        assert_eq!(column.nullable(), Some(true));
        assert_eq!(column.decimal_size(), None);
    }

    #[test]
    fn test_varchar_length_truncates() {
        let mut row = catalog("CODE", "VARYING");
        row.field_length = Some(10);
        assert_eq!(ColumnDescriptor::from_catalog(&row).length(), Some(2));
    }

    #[test]
    fn test_char_length_is_multiplied() {
        let mut row = catalog("FLAG", "TEXT");
        row.field_length = Some(3);
        let column = ColumnDescriptor::from_catalog(&row);
        assert_eq!(column.data_type(), Some("CHAR"));
        assert_eq!(column.length(), Some(12));
    }

    #[test]
    fn test_length_only_for_character_types() {
        let mut row = catalog("COUNTER", "INT64");
        row.field_length = Some(8);
        row.precision = Some(18);
        let column = ColumnDescriptor::from_catalog(&row);
        assert_eq!(column.length(), None);
        assert_eq!(column.decimal_size(), Some((18, 0)));
    }

    #[test]
    fn test_numeric_decimal_size() {
        let mut row = catalog("PRICE", "LONG");
        row.precision = Some(9);
        row.scale = Some(-2);
        let column = ColumnDescriptor::from_catalog(&row);
        assert_eq!(column.data_type(), Some("NUMERIC"));
        assert_eq!(column.decimal_size(), Some((9, 2)));
    }

    #[test]
    fn test_scale_without_precision_not_reported() {
        let mut row = catalog("RATIO", "DOUBLE");
        row.scale = Some(-3);
        assert_eq!(ColumnDescriptor::from_catalog(&row).decimal_size(), None);
    }

    #[test]
    fn test_unmapped_type_keeps_engine_name() {
        let mut row = catalog("LABEL", "CSTRING   ");
        row.field_length = Some(32);
        let column = ColumnDescriptor::from_catalog(&row);
        assert_eq!(column.data_type(), None);
        assert_eq!(column.canonical_type(), None);
        assert_eq!(column.database_type_name(), "CSTRING");
        assert_eq!(column.length(), None);
    }

    #[test]
    fn test_default_and_comment() {
        let mut row = catalog("STATUS", "SHORT");
        row.default_source = Some("DEFAULT 0".to_string());
        row.description = Some("order status".to_string());
        row.identity_type = Some(1);
        let column = ColumnDescriptor::from_catalog(&row);
        assert_eq!(column.default_value(), Some("0"));
        assert_eq!(column.comment(), Some("order status"));
        assert_eq!(column.auto_increment(), Some(true));
        assert_eq!(column.unique(), Some(false));
    }

    #[test]
    fn test_default_expression() {
        assert_eq!(default_expression("default 'x'"), Some("'x'".to_string()));
        assert_eq!(
            default_expression("CURRENT_TIMESTAMP"),
            Some("CURRENT_TIMESTAMP".to_string())
        );
        assert_eq!(default_expression("DEFAULT  "), None);
    }
}

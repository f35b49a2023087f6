//! Drift detection between declared fields and live columns.
//!
//! The comparison only uses what [`ColumnInfo`] exposes, so it works with any
//! implementation of the trait, not just catalog descriptors.

use crate::column::ColumnInfo;
use crate::schema::{FieldSchema, SqlType};

/// Changes needed to bring a live column in line with its declaration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnChanges {
    /// New data type (if changing).
    pub sql_type: Option<SqlType>,
    /// New nullability (if changing).
    pub nullable: Option<bool>,
}

impl ColumnChanges {
    /// Returns true if no changes are needed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sql_type.is_none() && self.nullable.is_none()
    }
}

/// Compares a declared field with the column the database reports.
///
/// Types are compared by canonical name; when either side has no canonical
/// name the type is left alone. Lengths are compared for `VARCHAR` only, as
/// the catalog reports `CHAR` lengths in its inverse storage convention.
#[must_use]
pub fn diff_column(field: &FieldSchema, actual: &dyn ColumnInfo) -> ColumnChanges {
    let mut changes = ColumnChanges::default();

    if type_differs(&field.sql_type, actual) {
        changes.sql_type = Some(field.sql_type.clone());
    }

    let expected_nullable = field.nullable && !field.primary_key;
    if actual
        .nullable()
        .is_some_and(|nullable| nullable != expected_nullable)
    {
        changes.nullable = Some(expected_nullable);
    }

    changes
}

fn type_differs(declared: &SqlType, actual: &dyn ColumnInfo) -> bool {
    let (Some(expected), Some(live)) = (declared.canonical(), actual.data_type()) else {
        return false;
    };
    if expected.as_str() != live {
        return true;
    }

    match declared {
        SqlType::Varchar(len) => actual
            .length()
            .is_some_and(|live_len| i64::try_from(*len).map_or(true, |len| len != live_len)),
        SqlType::Numeric(p, s) | SqlType::Decimal(p, s) => actual
            .decimal_size()
            .is_some_and(|size| size != (i64::from(*p), i64::from(*s))),
        _ => false,
    }
}

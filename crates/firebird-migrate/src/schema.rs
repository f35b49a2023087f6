//! Declared (logical) schema of a model.
//!
//! The migration engine describes what the application expects through
//! [`ModelDescriptor`]. [`TableSchema`] is the bundled implementation; hosts
//! with their own model registry can implement the trait directly.

use serde::{Deserialize, Serialize};

use crate::column::CanonicalType;
use crate::naming::NamingStrategy;

/// SQL data types a field can declare.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    /// Small integer (16-bit).
    SmallInt,
    /// Integer (32-bit).
    Integer,
    /// Big integer (64-bit).
    BigInt,
    /// Fixed point with precision and scale.
    Numeric(u8, u8),
    /// Fixed point with precision and scale (at least the declared precision).
    Decimal(u8, u8),
    /// Floating point (single precision).
    Float,
    /// Floating point (double precision).
    Double,
    /// Fixed-length character string.
    Char(usize),
    /// Variable-length character string.
    Varchar(usize),
    /// Unbounded text, stored as a text BLOB.
    Text,
    /// Binary large object.
    Blob,
    /// Boolean (Firebird 3+).
    Boolean,
    /// Date only.
    Date,
    /// Time only.
    Time,
    /// Date and time.
    Timestamp,
}

impl SqlType {
    /// Returns the Firebird type used in DDL.
    #[must_use]
    pub fn firebird_name(&self) -> String {
        match self {
            Self::SmallInt => "SMALLINT".to_string(),
            Self::Integer => "INTEGER".to_string(),
            Self::BigInt => "BIGINT".to_string(),
            Self::Numeric(p, s) => format!("NUMERIC({}, {})", p, s),
            Self::Decimal(p, s) => format!("DECIMAL({}, {})", p, s),
            Self::Float => "FLOAT".to_string(),
            Self::Double => "DOUBLE PRECISION".to_string(),
            Self::Char(len) => format!("CHAR({})", len),
            Self::Varchar(len) => format!("VARCHAR({})", len),
            Self::Text => "BLOB SUB_TYPE TEXT".to_string(),
            Self::Blob => "BLOB".to_string(),
            Self::Boolean => "BOOLEAN".to_string(),
            Self::Date => "DATE".to_string(),
            Self::Time => "TIME".to_string(),
            Self::Timestamp => "TIMESTAMP".to_string(),
        }
    }

    /// Returns the canonical type the catalog reports for a column of this type.
    ///
    /// Fixed-point types are stored in the smallest integer that holds their
    /// precision, except that `DECIMAL` is never narrower than `LONG`. `None`
    /// for types whose catalog type name is not mapped.
    #[must_use]
    pub fn canonical(&self) -> Option<CanonicalType> {
        match self {
            Self::SmallInt => Some(CanonicalType::SmallInt),
            Self::Integer => Some(CanonicalType::Integer),
            Self::BigInt => Some(CanonicalType::BigInt),
            Self::Numeric(p, s) => Some(match (*p, *s) {
                (0..=4, _) => CanonicalType::SmallInt,
                (5..=9, 0) => CanonicalType::Integer,
                (5..=9, _) => CanonicalType::Numeric,
                _ => CanonicalType::BigInt,
            }),
            Self::Decimal(p, s) => Some(match (*p, *s) {
                (0..=9, 0) => CanonicalType::Integer,
                (0..=9, _) => CanonicalType::Numeric,
                _ => CanonicalType::BigInt,
            }),
            Self::Float => Some(CanonicalType::Float),
            Self::Double => Some(CanonicalType::Double),
            Self::Char(_) => Some(CanonicalType::Char),
            Self::Varchar(_) => Some(CanonicalType::Varchar),
            Self::Text | Self::Blob => Some(CanonicalType::Blob),
            Self::Timestamp => Some(CanonicalType::Timestamp),
            Self::Boolean | Self::Date | Self::Time => None,
        }
    }
}

/// Default value for a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DefaultValue {
    /// No default value.
    None,
    /// NULL default.
    Null,
    /// Boolean default.
    Bool(bool),
    /// Integer default.
    Integer(i64),
    /// String default.
    String(String),
    /// SQL expression (e.g., "CURRENT_TIMESTAMP").
    Expression(String),
}

impl DefaultValue {
    /// Returns the SQL representation of this default value.
    #[must_use]
    pub fn to_sql(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Null => Some("NULL".to_string()),
            Self::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
            Self::Integer(i) => Some(i.to_string()),
            Self::String(s) => Some(format!("'{}'", s.replace('\'', "''"))),
            Self::Expression(expr) => Some(expr.clone()),
        }
    }
}

/// A declared field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Logical name used by the application.
    pub name: String,
    /// Physical column name.
    pub db_name: String,
    /// SQL data type.
    pub sql_type: SqlType,
    /// Whether the column allows NULL values.
    pub nullable: bool,
    /// Default value.
    pub default: DefaultValue,
    /// Whether this column is part of the primary key.
    pub primary_key: bool,
    /// Whether this column is an identity column.
    pub auto_increment: bool,
    /// Whether this column has a UNIQUE constraint.
    pub unique: bool,
}

impl FieldSchema {
    /// Creates a field whose physical name follows the default naming strategy.
    #[must_use]
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        let name = name.into();
        let db_name = NamingStrategy::default().column_name("", &name);
        Self {
            name,
            db_name,
            sql_type,
            nullable: true,
            default: DefaultValue::None,
            primary_key: false,
            auto_increment: false,
            unique: false,
        }
    }

    /// Overrides the physical column name.
    #[must_use]
    pub fn db_name(mut self, db_name: impl Into<String>) -> Self {
        self.db_name = db_name.into();
        self
    }

    /// Sets the column as NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, value: DefaultValue) -> Self {
        self.default = value;
        self
    }

    /// Sets the column as the primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false; // Primary keys are always NOT NULL
        self
    }

    /// Sets the column as an identity column.
    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Sets the column as unique.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    fn matches(&self, name: &str) -> bool {
        self.name == name || self.db_name.eq_ignore_ascii_case(name)
    }
}

/// A declared index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexSchema {
    /// Physical index name.
    pub name: String,
    /// Indexed fields (logical or physical names).
    pub fields: Vec<String>,
    /// Whether this is a unique index.
    pub unique: bool,
    /// Whether the index is built in descending order.
    pub descending: bool,
}

impl IndexSchema {
    /// Creates a non-unique ascending index.
    #[must_use]
    pub fn new(name: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            name: name.into(),
            fields,
            unique: false,
            descending: false,
        }
    }

    /// Makes the index unique.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Builds the index in descending order.
    #[must_use]
    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }
}

/// A declared check constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckSchema {
    /// Constraint name.
    pub name: String,
    /// Field the check was declared on, if any.
    pub field: Option<String>,
}

/// A declared foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKeySchema {
    /// Constraint name.
    pub name: String,
    /// Table that holds the constraint, when the model declares a key that
    /// lives on another table (the referenced side of a relationship).
    pub table: Option<String>,
    /// Column(s) in the referencing table.
    pub fields: Vec<String>,
    /// Referenced table name.
    pub references_table: String,
    /// Referenced column(s).
    pub references_fields: Vec<String>,
}

impl ForeignKeySchema {
    /// Creates a foreign key owned by the declaring table.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        fields: Vec<String>,
        references_table: impl Into<String>,
        references_fields: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            table: None,
            fields,
            references_table: references_table.into(),
            references_fields,
        }
    }

    /// Marks the key as living on another table.
    #[must_use]
    pub fn owned_by(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }
}

/// How a constraint name resolves against a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintKind {
    /// A check constraint on the model's table.
    Check {
        /// Physical constraint name.
        name: String,
    },
    /// A foreign key, and the table that holds it.
    ForeignKey {
        /// Physical constraint name.
        name: String,
        /// Table the constraint is declared on.
        table: String,
    },
    /// Not declared on the model.
    Unknown,
}

/// What the migrator needs to know about a model.
pub trait ModelDescriptor {
    /// Physical table name.
    fn table_name(&self) -> &str;

    /// Declared fields, in declaration order.
    fn fields(&self) -> &[FieldSchema];

    /// Resolves a logical or physical field name.
    fn look_up_field(&self, name: &str) -> Option<&FieldSchema>;

    /// Resolves an index by its name, or by the name of a field it covers.
    fn look_up_index(&self, name: &str) -> Option<&IndexSchema>;

    /// Classifies a constraint name as a check or a foreign key.
    fn classify_constraint(&self, name: &str) -> ConstraintKind;

    /// Tables this model's own foreign keys point at.
    fn referenced_tables(&self) -> Vec<String>;
}

/// Complete declared schema for a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Physical table name.
    pub name: String,
    /// Field definitions.
    pub fields: Vec<FieldSchema>,
    /// Index definitions.
    pub indexes: Vec<IndexSchema>,
    /// Check constraint definitions.
    pub checks: Vec<CheckSchema>,
    /// Foreign key definitions.
    pub foreign_keys: Vec<ForeignKeySchema>,
}

impl TableSchema {
    /// Creates a table schema with an explicit physical name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            indexes: Vec::new(),
            checks: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Creates a table schema named after a model through `naming`.
    #[must_use]
    pub fn for_model(model: &str, naming: &NamingStrategy) -> Self {
        Self::new(naming.table_name(model))
    }

    /// Adds a field to the table.
    #[must_use]
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds an index.
    #[must_use]
    pub fn index(mut self, index: IndexSchema) -> Self {
        self.indexes.push(index);
        self
    }

    /// Adds a check constraint.
    #[must_use]
    pub fn check(mut self, name: impl Into<String>, field: Option<&str>) -> Self {
        self.checks.push(CheckSchema {
            name: name.into(),
            field: field.map(str::to_string),
        });
        self
    }

    /// Adds a foreign key.
    #[must_use]
    pub fn foreign_key(mut self, fk: ForeignKeySchema) -> Self {
        self.foreign_keys.push(fk);
        self
    }
}

impl ModelDescriptor for TableSchema {
    fn table_name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    fn look_up_field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.matches(name))
    }

    fn look_up_index(&self, name: &str) -> Option<&IndexSchema> {
        self.indexes
            .iter()
            .find(|idx| idx.name.eq_ignore_ascii_case(name))
            .or_else(|| {
                self.indexes
                    .iter()
                    .find(|idx| idx.fields.iter().any(|field| field == name))
            })
    }

    fn classify_constraint(&self, name: &str) -> ConstraintKind {
        let field = self.look_up_field(name);
        let names_field = |candidate: &str| field.is_some_and(|f| f.matches(candidate));

        if let Some(check) = self.checks.iter().find(|c| {
            c.name.eq_ignore_ascii_case(name) || c.field.as_deref().is_some_and(&names_field)
        }) {
            return ConstraintKind::Check {
                name: check.name.clone(),
            };
        }

        if let Some(fk) = self.foreign_keys.iter().find(|fk| {
            fk.name.eq_ignore_ascii_case(name)
                || (fk.fields.len() == 1 && names_field(fk.fields[0].as_str()))
        }) {
            return ConstraintKind::ForeignKey {
                name: fk.name.clone(),
                table: fk.table.clone().unwrap_or_else(|| self.name.clone()),
            };
        }

        ConstraintKind::Unknown
    }

    fn referenced_tables(&self) -> Vec<String> {
        let mut tables: Vec<String> = Vec::new();
        for fk in &self.foreign_keys {
            let owned_here = fk
                .table
                .as_deref()
                .is_none_or(|t| t.eq_ignore_ascii_case(&self.name));
            if owned_here && !tables.contains(&fk.references_table) {
                tables.push(fk.references_table.clone());
            }
        }
        tables
    }
}

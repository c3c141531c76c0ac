//! Column model for inferred tables

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::table::Row;

/// Storage class inferred for a column
///
/// Closed set matching the SQLite storage classes. Classification of a JSON
/// value is total: structured values (objects and arrays) fall back to
/// [`ColumnType::Text`] and are serialized as JSON text when stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnType {
    Text,
    Integer,
    Real,
    Blob,
    /// Only null observations so far
    Null,
}

impl ColumnType {
    /// Classify a single JSON value
    pub fn of_value(value: &Value) -> Self {
        match value {
            Value::Null => ColumnType::Null,
            Value::Bool(_) => ColumnType::Integer,
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    ColumnType::Integer
                } else {
                    ColumnType::Real
                }
            }
            Value::String(_) => ColumnType::Text,
            Value::Array(_) | Value::Object(_) => ColumnType::Text,
        }
    }

    /// Unify two observations of the same column
    ///
    /// `Null` is the identity and `Text` absorbs everything, so the
    /// operation is commutative and associative.
    pub fn unify(self, other: ColumnType) -> ColumnType {
        match (self, other) {
            (a, b) if a == b => a,
            (ColumnType::Null, other) | (other, ColumnType::Null) => other,
            _ => ColumnType::Text,
        }
    }

    /// SQLite type name used in table definitions
    ///
    /// A column that only ever held nulls is declared `TEXT`.
    pub fn sql_name(&self) -> &'static str {
        match self {
            ColumnType::Text | ColumnType::Null => "TEXT",
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Blob => "BLOB",
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::Text => write!(f, "text"),
            ColumnType::Integer => write!(f, "integer"),
            ColumnType::Real => write!(f, "real"),
            ColumnType::Blob => write!(f, "blob"),
            ColumnType::Null => write!(f, "null"),
        }
    }
}

/// Foreign key reference to another table's column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Target table name
    pub table: String,
    /// Column name in the target table
    pub column: String,
}

/// Column model representing a field of an inferred table
///
/// # Example
///
/// ```rust
/// use clone_seed::models::{Column, ColumnType};
///
/// let column = Column::new("name", ColumnType::Text);
/// assert!(!column.nullable);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Column name, as the field key appeared in the response body
    pub name: String,
    /// Inferred storage class
    pub inferred_type: ColumnType,
    /// Whether the column allows NULL values
    #[serde(default)]
    pub nullable: bool,
    /// Whether this column is the table's primary key
    #[serde(default)]
    pub is_primary_key: bool,
    /// Whether the primary key is an autoincrement integer key
    #[serde(default)]
    pub is_auto_increment: bool,
    /// Foreign key reference if this column references another table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<ForeignKey>,
}

impl Column {
    /// Create a new non-nullable, non-key column
    pub fn new(name: impl Into<String>, inferred_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            inferred_type,
            nullable: false,
            is_primary_key: false,
            is_auto_increment: false,
            foreign_key: None,
        }
    }

    /// Mark this column as nullable
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Attach a foreign key reference
    pub fn with_foreign_key(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.foreign_key = Some(ForeignKey {
            table: table.into(),
            column: column.into(),
        });
        self
    }

    /// Set or clear the primary-key designation
    ///
    /// Autoincrement follows from the key designation and the type, so it is
    /// never set independently.
    pub fn set_primary_key(&mut self, primary: bool) {
        self.is_primary_key = primary;
        self.is_auto_increment = primary && self.inferred_type == ColumnType::Integer;
    }

    /// This column's value in a row
    ///
    /// An exact key wins; otherwise the first key equal up to ASCII case.
    pub fn value_in<'r>(&self, row: &'r Row) -> Option<&'r Value> {
        row.get(&self.name).or_else(|| {
            row.iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(&self.name))
                .map(|(_, value)| value)
        })
    }

    /// Fold another observation of the same column into this one
    pub fn absorb(&mut self, other: &Column) {
        self.inferred_type = self.inferred_type.unify(other.inferred_type);
        self.nullable = self.nullable || other.nullable;
        if self.foreign_key.is_none() {
            self.foreign_key = other.foreign_key.clone();
        }
    }
}

//! Scalar column types and their PostgreSQL mappings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Built-in scalar column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    Uuid,
    Text,
    Varchar,
    Char,
    SmallInt,
    Integer,
    BigInt,
    Serial,
    BigSerial,
    Decimal,
    Real,
    DoublePrecision,
    Boolean,
    Timestamp,
    Timestamptz,
    Date,
    Time,
    Json,
    Jsonb,
    Bytea,
}

impl ScalarType {
    /// Parse a type name as written in a schema file. Matching is
    /// case-insensitive so `uuid`, `UUID` and `Uuid` all resolve.
    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.to_ascii_lowercase();
        let scalar = match lowered.as_str() {
            "uuid" => Self::Uuid,
            "text" | "string" => Self::Text,
            "varchar" => Self::Varchar,
            "char" => Self::Char,
            "smallint" => Self::SmallInt,
            "int" | "integer" => Self::Integer,
            "bigint" => Self::BigInt,
            "serial" => Self::Serial,
            "bigserial" => Self::BigSerial,
            "decimal" | "numeric" => Self::Decimal,
            "real" | "float" => Self::Real,
            "double" | "doubleprecision" => Self::DoublePrecision,
            "bool" | "boolean" => Self::Boolean,
            "timestamp" | "datetime" => Self::Timestamp,
            "timestamptz" => Self::Timestamptz,
            "date" => Self::Date,
            "time" => Self::Time,
            "json" => Self::Json,
            "jsonb" => Self::Jsonb,
            "bytea" | "bytes" => Self::Bytea,
            _ => return None,
        };
        Some(scalar)
    }

    /// The PostgreSQL type name, without length or precision modifiers.
    pub fn postgres_name(&self) -> &'static str {
        match self {
            Self::Uuid => "UUID",
            Self::Text => "TEXT",
            Self::Varchar => "VARCHAR",
            Self::Char => "CHAR",
            Self::SmallInt => "SMALLINT",
            Self::Integer => "INTEGER",
            Self::BigInt => "BIGINT",
            Self::Serial => "SERIAL",
            Self::BigSerial => "BIGSERIAL",
            Self::Decimal => "DECIMAL",
            Self::Real => "REAL",
            Self::DoublePrecision => "DOUBLE PRECISION",
            Self::Boolean => "BOOLEAN",
            Self::Timestamp => "TIMESTAMP",
            Self::Timestamptz => "TIMESTAMPTZ",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Json => "JSON",
            Self::Jsonb => "JSONB",
            Self::Bytea => "BYTEA",
        }
    }

    /// Whether the type accepts a single length parameter, e.g. `Varchar(255)`.
    pub fn takes_length(&self) -> bool {
        matches!(self, Self::Varchar | Self::Char)
    }

    /// Whether the type accepts precision and scale, e.g. `Decimal(10, 2)`.
    pub fn takes_precision(&self) -> bool {
        matches!(self, Self::Decimal)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.postgres_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_case_insensitive() {
        assert_eq!(ScalarType::from_name("uuid"), Some(ScalarType::Uuid));
        assert_eq!(ScalarType::from_name("UUID"), Some(ScalarType::Uuid));
        assert_eq!(ScalarType::from_name("Uuid"), Some(ScalarType::Uuid));
    }

    #[test]
    fn test_from_name_aliases() {
        assert_eq!(ScalarType::from_name("String"), Some(ScalarType::Text));
        assert_eq!(ScalarType::from_name("Int"), Some(ScalarType::Integer));
        assert_eq!(ScalarType::from_name("numeric"), Some(ScalarType::Decimal));
        assert_eq!(ScalarType::from_name("DateTime"), Some(ScalarType::Timestamp));
    }

    #[test]
    fn test_from_name_unknown() {
        assert_eq!(ScalarType::from_name("UserRole"), None);
        assert_eq!(ScalarType::from_name(""), None);
    }

    #[test]
    fn test_postgres_name() {
        assert_eq!(ScalarType::DoublePrecision.postgres_name(), "DOUBLE PRECISION");
        assert_eq!(ScalarType::Timestamptz.postgres_name(), "TIMESTAMPTZ");
    }

    #[test]
    fn test_modifiers() {
        assert!(ScalarType::Varchar.takes_length());
        assert!(!ScalarType::Text.takes_length());
        assert!(ScalarType::Decimal.takes_precision());
        assert!(!ScalarType::Integer.takes_precision());
    }
}

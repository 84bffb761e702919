//! Model fields and their attributes.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

use super::types::ScalarType;

/// The resolved type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    /// A built-in scalar type.
    Scalar(ScalarType),
    /// A reference to an enum declared in the same schema.
    Enum(SmolStr),
    /// A type name the schema does not declare. Emitted verbatim.
    Custom(SmolStr),
}

impl FieldType {
    /// The rendered PostgreSQL type for this field, qualifying enum
    /// types with the target schema.
    pub fn render(&self, schema_name: &str) -> String {
        match self {
            Self::Scalar(scalar) => scalar.postgres_name().to_string(),
            Self::Enum(name) => format!("\"{schema_name}\".\"{name}\""),
            Self::Custom(name) => name.to_string(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(scalar) => write!(f, "{scalar}"),
            Self::Enum(name) | Self::Custom(name) => f.write_str(name),
        }
    }
}

/// Marker attributes that can be attached to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldAttribute {
    /// `@id` — the field is the primary key.
    Id,
    /// `@unique` — the column carries a UNIQUE constraint.
    Unique,
    /// `@default(...)` — the column has a default expression.
    Default,
    /// `@updatedAt` — maintained by an update trigger.
    UpdatedAt,
}

/// A column declaration inside a model block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: SmolStr,
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<FieldAttribute>,
    /// Raw default expression, emitted verbatim into DDL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    /// Declared with a trailing `?`.
    #[serde(default)]
    pub nullable: bool,
}

impl Field {
    /// Create a scalar field with no attributes.
    pub fn new(name: impl Into<SmolStr>, scalar: ScalarType) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Scalar(scalar),
            attributes: Vec::new(),
            default_value: None,
            length: None,
            precision: None,
            scale: None,
            nullable: false,
        }
    }

    pub fn has_attribute(&self, attr: FieldAttribute) -> bool {
        self.attributes.contains(&attr)
    }

    /// Whether the field is the primary key.
    pub fn is_id(&self) -> bool {
        self.has_attribute(FieldAttribute::Id)
    }

    pub fn is_unique(&self) -> bool {
        self.has_attribute(FieldAttribute::Unique)
    }

    /// The full PostgreSQL type with any length or precision modifiers.
    pub fn render_type(&self, schema_name: &str) -> String {
        let base = self.field_type.render(schema_name);
        match (self.length, self.precision, self.scale) {
            (Some(len), _, _) => format!("{base}({len})"),
            (None, Some(precision), Some(scale)) => format!("{base}({precision}, {scale})"),
            (None, Some(precision), None) => format!("{base}({precision})"),
            _ => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_scalar() {
        let field = Field::new("email", ScalarType::Text);
        assert_eq!(field.render_type("public"), "TEXT");
    }

    #[test]
    fn test_render_varchar_length() {
        let mut field = Field::new("code", ScalarType::Varchar);
        field.length = Some(12);
        assert_eq!(field.render_type("public"), "VARCHAR(12)");
    }

    #[test]
    fn test_render_decimal_precision() {
        let mut field = Field::new("price", ScalarType::Decimal);
        field.precision = Some(10);
        field.scale = Some(2);
        assert_eq!(field.render_type("public"), "DECIMAL(10, 2)");
    }

    #[test]
    fn test_render_enum_schema_qualified() {
        let field = Field {
            field_type: FieldType::Enum("UserRole".into()),
            ..Field::new("role", ScalarType::Text)
        };
        assert_eq!(field.render_type("public"), "\"public\".\"UserRole\"");
    }

    #[test]
    fn test_attributes() {
        let mut field = Field::new("id", ScalarType::Uuid);
        field.attributes.push(FieldAttribute::Id);
        assert!(field.is_id());
        assert!(!field.is_unique());
    }
}

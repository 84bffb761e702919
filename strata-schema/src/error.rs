//! Error types for schema parsing.

use miette::Diagnostic;
use thiserror::Error;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while parsing a schema.
#[derive(Error, Debug, Diagnostic)]
pub enum SchemaError {
    /// Error reading a file.
    #[error("failed to read file: {path}")]
    #[diagnostic(code(strata::schema::io_error))]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Syntax error in the schema text.
    #[error("syntax error in schema")]
    #[diagnostic(code(strata::schema::syntax_error))]
    SyntaxError {
        #[source_code]
        src: String,
        #[label("error here")]
        span: miette::SourceSpan,
        message: String,
    },

    /// Invalid role definition.
    #[error("Invalid role definition `{name}`: {message}")]
    #[diagnostic(code(strata::schema::invalid_role))]
    InvalidRole { name: String, message: String },

    /// Invalid field type.
    #[error("Invalid field type `{type_name}` in `{model}.{field}`")]
    #[diagnostic(code(strata::schema::invalid_field_type))]
    InvalidFieldType {
        model: String,
        field: String,
        type_name: String,
    },

    /// Invalid relation definition.
    #[error("Invalid relation `{model}.{field}`: {message}")]
    #[diagnostic(code(strata::schema::invalid_relation))]
    InvalidRelation {
        model: String,
        field: String,
        message: String,
    },

    /// Invalid policy definition.
    #[error("Invalid policy `{name}` on `{model}`: {message}")]
    #[diagnostic(code(strata::schema::invalid_policy))]
    InvalidPolicy {
        model: String,
        name: String,
        message: String,
    },

    /// Invalid index definition.
    #[error("Invalid index on `{model}`: {message}")]
    #[diagnostic(code(strata::schema::invalid_index))]
    InvalidIndex { model: String, message: String },

    /// Invalid trigger definition.
    #[error("Invalid trigger on `{model}`: {message}")]
    #[diagnostic(code(strata::schema::invalid_trigger))]
    InvalidTrigger { model: String, message: String },

    /// Invalid attribute.
    #[error("Invalid attribute `@{attribute}`: {message}")]
    #[diagnostic(code(strata::schema::invalid_attribute))]
    InvalidAttribute { attribute: String, message: String },

    /// Duplicate definition.
    #[error("duplicate {kind} `{name}`")]
    #[diagnostic(code(strata::schema::duplicate))]
    Duplicate { kind: String, name: String },
}

impl SchemaError {
    /// Create a syntax error with source location.
    pub fn syntax(
        src: impl Into<String>,
        offset: usize,
        len: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::SyntaxError {
            src: src.into(),
            span: (offset, len).into(),
            message: message.into(),
        }
    }

    /// Create an invalid role definition error.
    pub fn invalid_role(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRole {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an invalid field type error.
    pub fn invalid_field_type(
        model: impl Into<String>,
        field: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self::InvalidFieldType {
            model: model.into(),
            field: field.into(),
            type_name: type_name.into(),
        }
    }

    /// Create an invalid relation error.
    pub fn invalid_relation(
        model: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidRelation {
            model: model.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid policy error.
    pub fn invalid_policy(
        model: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidPolicy {
            model: model.into(),
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an invalid index error.
    pub fn invalid_index(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidIndex {
            model: model.into(),
            message: message.into(),
        }
    }

    /// Create an invalid trigger error.
    pub fn invalid_trigger(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTrigger {
            model: model.into(),
            message: message.into(),
        }
    }

    /// Create an invalid attribute error.
    pub fn invalid_attribute(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidAttribute {
            attribute: attribute.into(),
            message: message.into(),
        }
    }

    /// Create a duplicate definition error.
    pub fn duplicate(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Duplicate {
            kind: kind.into(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_role_display() {
        let err = SchemaError::invalid_role("app_user", "no privileges clause");
        let display = err.to_string();
        assert!(display.contains("Invalid role definition"));
        assert!(display.contains("app_user"));
    }

    #[test]
    fn test_invalid_field_type_display() {
        let err = SchemaError::invalid_field_type("User", "tags", "TEXT[]");
        let display = err.to_string();
        assert!(display.contains("Invalid field type"));
        assert!(display.contains("User.tags"));
        assert!(display.contains("TEXT[]"));
    }

    #[test]
    fn test_invalid_relation_display() {
        let err = SchemaError::invalid_relation("Post", "author", "missing references");
        assert!(err.to_string().contains("Post.author"));
    }

    #[test]
    fn test_duplicate_display() {
        let err = SchemaError::duplicate("model", "User");
        let display = err.to_string();
        assert!(display.contains("duplicate"));
        assert!(display.contains("model"));
        assert!(display.contains("User"));
    }

    #[test]
    fn test_syntax_error_span() {
        let err = SchemaError::syntax("model User {", 6, 4, "unexpected token");
        match err {
            SchemaError::SyntaxError { span, message, .. } => {
                assert_eq!(span.offset(), 6);
                assert_eq!(span.len(), 4);
                assert_eq!(message, "unexpected token");
            }
            _ => panic!("expected SyntaxError"),
        }
    }
}

//! Schema definition language for PostgreSQL.
//!
//! Parses a block-structured schema format (`extension`, `enum`, `role`
//! and `model` blocks) into a typed [`Schema`] snapshot that the
//! migration engine can diff and turn into DDL.
//!
//! ```
//! use strata_schema::parse_schema;
//!
//! let schema = parse_schema(r#"
//!     model User {
//!         id UUID @id @default(gen_random_uuid())
//!         email TEXT @unique
//!     }
//! "#).unwrap();
//!
//! assert!(schema.model("User").is_some());
//! ```

pub mod ast;
pub mod error;
pub mod parser;

pub use ast::{
    Enum, Extension, Field, FieldAttribute, FieldType, Index, IndexType, Model, Policy,
    PolicyCommand, Privilege, PrivilegeGrant, ReferentialAction, Relation, RelationKind, Role,
    RowLevelSecurity, ScalarType, Schema, SchemaStats, Trigger, TriggerEvent, TriggerLevel,
};
pub use error::{SchemaError, SchemaResult};
pub use parser::parse_schema;

/// Read and parse a schema file.
pub fn parse_schema_file(path: impl AsRef<std::path::Path>) -> SchemaResult<Schema> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| SchemaError::IoError {
        path: path.display().to_string(),
        source,
    })?;
    parse_schema(&text)
}

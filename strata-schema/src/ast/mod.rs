//! Typed representation of a parsed schema.

pub mod field;
pub mod index;
pub mod model;
pub mod policy;
pub mod relation;
pub mod role;
pub mod schema;
pub mod trigger;
pub mod types;

pub use field::{Field, FieldAttribute, FieldType};
pub use index::{Index, IndexType};
pub use model::Model;
pub use policy::{Policy, PolicyCommand, RowLevelSecurity};
pub use relation::{ReferentialAction, Relation, RelationKind};
pub use role::{Privilege, PrivilegeGrant, Role};
pub use schema::{Enum, Extension, Schema, SchemaStats};
pub use trigger::{Trigger, TriggerEvent, TriggerLevel};
pub use types::ScalarType;

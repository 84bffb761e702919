//! The top-level schema snapshot.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

use super::model::Model;

/// A PostgreSQL extension requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    pub name: SmolStr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<SmolStr>,
}

/// An enum type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enum {
    pub name: SmolStr,
    pub values: Vec<SmolStr>,
}

/// A parsed schema: the complete set of declared objects, in
/// declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub models: IndexMap<SmolStr, Model>,
    pub enums: IndexMap<SmolStr, Enum>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<super::role::Role>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_model(&mut self, model: Model) {
        self.models.insert(model.name.clone(), model);
    }

    pub fn add_enum(&mut self, enum_def: Enum) {
        self.enums.insert(enum_def.name.clone(), enum_def);
    }

    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }

    pub fn enum_def(&self, name: &str) -> Option<&Enum> {
        self.enums.get(name)
    }

    pub fn role(&self, name: &str) -> Option<&super::role::Role> {
        self.roles.iter().find(|r| r.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
            && self.enums.is_empty()
            && self.extensions.is_empty()
            && self.roles.is_empty()
    }

    /// Summary counts, used by logging.
    pub fn stats(&self) -> SchemaStats {
        SchemaStats {
            models: self.models.len(),
            enums: self.enums.len(),
            extensions: self.extensions.len(),
            roles: self.roles.len(),
        }
    }
}

/// Object counts for a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaStats {
    pub models: usize,
    pub enums: usize,
    pub extensions: usize,
    pub roles: usize,
}

impl fmt::Display for SchemaStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} models, {} enums, {} extensions, {} roles",
            self.models, self.enums, self.extensions, self.roles
        )
    }
}

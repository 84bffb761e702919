//! Model blocks: fields, relations, indexes, security and triggers.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::field::Field;
use super::index::Index;
use super::policy::{Policy, RowLevelSecurity};
use super::relation::Relation;
use super::trigger::Trigger;

/// A model block, mapping to a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub name: SmolStr,
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<Relation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_level_security: Option<RowLevelSecurity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policies: Vec<Policy>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<Trigger>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<Index>,
}

impl Model {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            relations: Vec::new(),
            row_level_security: None,
            policies: Vec::new(),
            triggers: Vec::new(),
            indexes: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.iter().find(|r| r.name == name)
    }

    /// The primary key field, if one is marked `@id`.
    pub fn id_field(&self) -> Option<&Field> {
        self.fields.iter().find(|f| f.is_id())
    }

    /// Relations on this model that own a foreign key constraint.
    pub fn foreign_keys(&self) -> impl Iterator<Item = &Relation> {
        self.relations.iter().filter(|r| r.is_foreign_key())
    }

    /// Names of models this model's foreign keys reference.
    pub fn dependencies(&self) -> Vec<SmolStr> {
        self.foreign_keys().map(|r| r.model.clone()).collect()
    }
}

//! Secondary indexes declared with `@@index` / `@@unique`.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// PostgreSQL index access method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexType {
    BTree,
    Hash,
    Gin,
    Gist,
    Brin,
}

impl IndexType {
    pub fn from_name(name: &str) -> Option<Self> {
        let index_type = match name.to_ascii_lowercase().as_str() {
            "btree" => Self::BTree,
            "hash" => Self::Hash,
            "gin" => Self::Gin,
            "gist" => Self::Gist,
            "brin" => Self::Brin,
            _ => return None,
        };
        Some(index_type)
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::BTree => "btree",
            Self::Hash => "hash",
            Self::Gin => "gin",
            Self::Gist => "gist",
            Self::Brin => "brin",
        }
    }
}

/// An index declaration on a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    /// Explicit name, if one was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<SmolStr>,
    pub fields: Vec<SmolStr>,
    /// Access method. None means the database default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_type: Option<IndexType>,
    #[serde(default)]
    pub unique: bool,
    /// Raw partial-index predicate, emitted verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<String>,
}

impl Index {
    /// The effective index name: the explicit name if present, otherwise
    /// `idx_<Model>_<field1>_<field2>...` from the field list in order.
    pub fn resolved_name(&self, model: &str) -> String {
        match &self.name {
            Some(name) => name.to_string(),
            None => {
                let mut out = format!("idx_{model}");
                for field in &self.fields {
                    out.push('_');
                    out.push_str(field);
                }
                out
            }
        }
    }
}

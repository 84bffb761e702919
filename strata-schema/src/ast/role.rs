//! Database roles and privilege grants.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A table privilege that can be granted to a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Privilege {
    Select,
    Insert,
    Update,
    Delete,
}

impl Privilege {
    pub fn from_name(name: &str) -> Option<Self> {
        let privilege = match name.to_ascii_lowercase().as_str() {
            "select" => Self::Select,
            "insert" => Self::Insert,
            "update" => Self::Update,
            "delete" => Self::Delete,
            _ => return None,
        };
        Some(privilege)
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }

    /// All four table privileges, the expansion of `"all"`.
    pub fn all() -> Vec<Self> {
        vec![Self::Select, Self::Insert, Self::Update, Self::Delete]
    }
}

/// One `privileges: [...] on Table` clause of a role block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivilegeGrant {
    pub privileges: Vec<Privilege>,
    /// Target model name.
    pub on: SmolStr,
}

impl PrivilegeGrant {
    /// The privilege list as SQL, e.g. `SELECT, INSERT`.
    pub fn privileges_sql(&self) -> String {
        self.privileges
            .iter()
            .map(Privilege::as_sql)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A database role declared at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub name: SmolStr,
    pub grants: Vec<PrivilegeGrant>,
}

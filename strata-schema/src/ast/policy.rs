//! Row-level security settings and policies.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Row-level security flags from `@@rls(...)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RowLevelSecurity {
    pub enabled: bool,
    pub force: bool,
}

/// SQL command a policy applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyCommand {
    Select,
    Insert,
    Update,
    Delete,
    All,
}

impl PolicyCommand {
    pub fn from_name(name: &str) -> Option<Self> {
        let command = match name.to_ascii_lowercase().as_str() {
            "select" => Self::Select,
            "insert" => Self::Insert,
            "update" => Self::Update,
            "delete" => Self::Delete,
            "all" => Self::All,
            _ => return None,
        };
        Some(command)
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::All => "ALL",
        }
    }
}

/// A row-level security policy from `@@policy(...)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub name: SmolStr,
    pub commands: Vec<PolicyCommand>,
    /// Role the policy applies to.
    pub role: SmolStr,
    /// Raw USING expression, carried verbatim.
    pub using_expr: String,
    /// Raw WITH CHECK expression, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_expr: Option<String>,
}

impl Policy {
    /// Deterministic policy object name: `policy_<Model>_<name>`.
    pub fn object_name(&self, model: &str) -> String {
        format!("policy_{model}_{}", self.name)
    }

    /// The FOR clause: `ALL` when commands is exactly `[All]`, otherwise
    /// the commands joined with `, `.
    pub fn commands_sql(&self) -> String {
        self.commands
            .iter()
            .map(PolicyCommand::as_sql)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

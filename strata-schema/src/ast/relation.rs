//! Relations between models.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// The cardinality of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationKind {
    OneToOne,
    OneToMany,
    ManyToMany,
}

/// Referential action for `ON DELETE` / `ON UPDATE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferentialAction {
    Cascade,
    Restrict,
    SetNull,
    SetDefault,
    NoAction,
}

impl ReferentialAction {
    pub fn from_name(name: &str) -> Option<Self> {
        let action = match name {
            "Cascade" => Self::Cascade,
            "Restrict" => Self::Restrict,
            "SetNull" => Self::SetNull,
            "SetDefault" => Self::SetDefault,
            "NoAction" => Self::NoAction,
            _ => return None,
        };
        Some(action)
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::Restrict => "RESTRICT",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
            Self::NoAction => "NO ACTION",
        }
    }
}

impl fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A relation field resolved from a `@relation` attribute or a bare
/// model-typed field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    /// Name of the field the relation was declared on.
    pub name: SmolStr,
    /// The target model.
    pub model: SmolStr,
    pub kind: RelationKind,
    /// Local columns holding the foreign key.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<SmolStr>,
    /// Referenced columns on the target model.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<SmolStr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<ReferentialAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_update: Option<ReferentialAction>,
}

impl Relation {
    /// Whether this side of the relation owns a foreign key constraint.
    /// The list side of a one-to-many and the bare inverse side of a
    /// one-to-one carry no columns, so they emit no constraint.
    pub fn is_foreign_key(&self) -> bool {
        !self.fields.is_empty() && !self.references.is_empty()
    }

    /// Deterministic constraint name: `fk_<Model>_<relationName>`.
    pub fn constraint_name(&self, model: &str) -> String {
        format!("fk_{model}_{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relation() -> Relation {
        Relation {
            name: "author".into(),
            model: "User".into(),
            kind: RelationKind::OneToOne,
            fields: vec!["authorId".into()],
            references: vec!["id".into()],
            on_delete: Some(ReferentialAction::Cascade),
            on_update: None,
        }
    }

    #[test]
    fn test_is_foreign_key() {
        assert!(relation().is_foreign_key());

        let inverse = Relation {
            fields: vec![],
            references: vec![],
            kind: RelationKind::OneToMany,
            ..relation()
        };
        assert!(!inverse.is_foreign_key());
    }

    #[test]
    fn test_constraint_name() {
        assert_eq!(relation().constraint_name("Post"), "fk_Post_author");
    }

    #[test]
    fn test_referential_action_from_name() {
        assert_eq!(
            ReferentialAction::from_name("SetNull"),
            Some(ReferentialAction::SetNull)
        );
        assert_eq!(ReferentialAction::from_name("setnull"), None);
    }

    #[test]
    fn test_referential_action_sql() {
        assert_eq!(ReferentialAction::SetDefault.as_sql(), "SET DEFAULT");
        assert_eq!(ReferentialAction::NoAction.as_sql(), "NO ACTION");
    }
}

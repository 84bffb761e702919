//! Triggers declared with `@@trigger(...)`.

use serde::{Deserialize, Serialize};

/// When the trigger fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerEvent {
    BeforeInsert,
    BeforeUpdate,
    BeforeDelete,
    AfterInsert,
    AfterUpdate,
    AfterDelete,
}

impl TriggerEvent {
    /// Accepts both the SQL spelling (`BEFORE UPDATE`) and the CamelCase
    /// alias (`BeforeUpdate`).
    pub fn from_name(name: &str) -> Option<Self> {
        let event = match name {
            "BEFORE INSERT" | "BeforeInsert" => Self::BeforeInsert,
            "BEFORE UPDATE" | "BeforeUpdate" => Self::BeforeUpdate,
            "BEFORE DELETE" | "BeforeDelete" => Self::BeforeDelete,
            "AFTER INSERT" | "AfterInsert" => Self::AfterInsert,
            "AFTER UPDATE" | "AfterUpdate" => Self::AfterUpdate,
            "AFTER DELETE" | "AfterDelete" => Self::AfterDelete,
            _ => return None,
        };
        Some(event)
    }

    /// The event clause in SQL, e.g. `BEFORE INSERT`.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::BeforeInsert => "BEFORE INSERT",
            Self::BeforeUpdate => "BEFORE UPDATE",
            Self::BeforeDelete => "BEFORE DELETE",
            Self::AfterInsert => "AFTER INSERT",
            Self::AfterUpdate => "AFTER UPDATE",
            Self::AfterDelete => "AFTER DELETE",
        }
    }

    /// Snake-case form used in generated object names.
    pub fn snake_name(&self) -> &'static str {
        match self {
            Self::BeforeInsert => "before_insert",
            Self::BeforeUpdate => "before_update",
            Self::BeforeDelete => "before_delete",
            Self::AfterInsert => "after_insert",
            Self::AfterUpdate => "after_update",
            Self::AfterDelete => "after_delete",
        }
    }
}

/// Whether the trigger runs per row or per statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerLevel {
    Row,
    Statement,
}

impl TriggerLevel {
    /// Accepts both the SQL spelling (`FOR EACH ROW`) and the short
    /// alias (`Row`).
    pub fn from_name(name: &str) -> Option<Self> {
        let level = match name {
            "FOR EACH ROW" | "Row" => Self::Row,
            "FOR EACH STATEMENT" | "Statement" => Self::Statement,
            _ => return None,
        };
        Some(level)
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Row => "FOR EACH ROW",
            Self::Statement => "FOR EACH STATEMENT",
        }
    }

    pub fn snake_name(&self) -> &'static str {
        match self {
            Self::Row => "for_each_row",
            Self::Statement => "for_each_statement",
        }
    }
}

/// A trigger attached to a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub event: TriggerEvent,
    pub level: TriggerLevel,
    /// The plpgsql function body, carried verbatim.
    pub execute: String,
}

impl Trigger {
    /// Deterministic trigger name: `<Model>_<event>_<level>_trigger`.
    pub fn trigger_name(&self, model: &str) -> String {
        format!(
            "{model}_{}_{}_trigger",
            self.event.snake_name(),
            self.level.snake_name()
        )
    }

    /// Name of the generated trigger function.
    pub fn function_name(&self, model: &str) -> String {
        format!("{}_fn", self.trigger_name(model))
    }
}

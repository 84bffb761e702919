//! Row-level security diffing.
//!
//! The enabled and force flags generate independent steps so either can
//! change without touching the other. A model that drops its
//! `@@rowLevelSecurity` line entirely stops being managed: no steps are
//! emitted for it.

use strata_schema::{RowLevelSecurity, Schema};

use super::ModelObject;
use crate::diff::{Diff, diff_by_key};
use crate::migration::{MigrationStep, ObjectKind, StepKind};
use crate::sql::PostgresSqlGenerator;

fn managed(schema: &Schema) -> Vec<ModelObject<RowLevelSecurity>> {
    schema
        .models
        .values()
        .filter_map(|model| {
            model
                .row_level_security
                .map(|rls| ModelObject::new(model.name.clone(), rls))
        })
        .collect()
}

pub fn compare(from: &Schema, to: &Schema) -> Diff<ModelObject<RowLevelSecurity>> {
    diff_by_key(
        &managed(from),
        &managed(to),
        |r| r.model.clone(),
        |a, b| a == b,
    )
}

pub fn generate_steps(
    diff: &Diff<ModelObject<RowLevelSecurity>>,
    schema_name: &str,
) -> Vec<MigrationStep> {
    let mut steps = Vec::new();

    // Newly managed tables get both flags established explicitly.
    for added in &diff.added {
        steps.push(enabled_step(schema_name, &added.model, added.item.enabled));
        steps.push(force_step(schema_name, &added.model, added.item.force));
    }

    for updated in &diff.updated {
        if updated.from.item.enabled != updated.to.item.enabled {
            steps.push(enabled_step(schema_name, &updated.to.model, updated.to.item.enabled));
        }
        if updated.from.item.force != updated.to.item.force {
            steps.push(force_step(schema_name, &updated.to.model, updated.to.item.force));
        }
    }

    steps
}

/// Steps for a single table during full-schema generation.
pub fn create_steps(schema_name: &str, model: &str, rls: RowLevelSecurity) -> Vec<MigrationStep> {
    if !rls.enabled {
        return Vec::new();
    }
    vec![
        enabled_step(schema_name, model, true),
        force_step(schema_name, model, rls.force),
    ]
}

fn enabled_step(schema_name: &str, model: &str, enabled: bool) -> MigrationStep {
    let (sql, rollback) = if enabled {
        (
            PostgresSqlGenerator::enable_rls(schema_name, model),
            PostgresSqlGenerator::disable_rls(schema_name, model),
        )
    } else {
        (
            PostgresSqlGenerator::disable_rls(schema_name, model),
            PostgresSqlGenerator::enable_rls(schema_name, model),
        )
    };
    MigrationStep::new(StepKind::Alter, ObjectKind::Rls, model, sql, rollback)
}

fn force_step(schema_name: &str, model: &str, force: bool) -> MigrationStep {
    let (sql, rollback) = if force {
        (
            PostgresSqlGenerator::force_rls(schema_name, model),
            PostgresSqlGenerator::no_force_rls(schema_name, model),
        )
    } else {
        (
            PostgresSqlGenerator::no_force_rls(schema_name, model),
            PostgresSqlGenerator::force_rls(schema_name, model),
        )
    };
    MigrationStep::new(
        StepKind::Alter,
        ObjectKind::Rls,
        format!("{model}_force"),
        sql,
        rollback,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_schema::parse_schema;

    #[test]
    fn test_newly_managed_table() {
        let from = parse_schema("model Orders { id UUID @id }").unwrap();
        let to = parse_schema(
            "model Orders { id UUID @id\n@@rowLevelSecurity(enabled: true) }",
        )
        .unwrap();

        let steps = generate_steps(&compare(&from, &to), "public");
        assert_eq!(steps.len(), 2);
        assert!(steps[0].sql.ends_with("ENABLE ROW LEVEL SECURITY;"));
        assert!(steps[1].sql.ends_with("NO FORCE ROW LEVEL SECURITY;"));
    }

    #[test]
    fn test_disable_rolls_back_to_enable() {
        let from = parse_schema(
            "model Orders { id UUID @id\n@@rowLevelSecurity(enabled: true) }",
        )
        .unwrap();
        let to = parse_schema(
            "model Orders { id UUID @id\n@@rowLevelSecurity(enabled: false) }",
        )
        .unwrap();

        let steps = generate_steps(&compare(&from, &to), "public");
        assert_eq!(steps.len(), 1);
        assert!(steps[0].sql.ends_with("DISABLE ROW LEVEL SECURITY;"));
        assert!(steps[0].rollback_sql.ends_with("ENABLE ROW LEVEL SECURITY;"));
    }

    #[test]
    fn test_force_change_is_independent() {
        let from = parse_schema(
            "model Orders { id UUID @id\n@@rowLevelSecurity(enabled: true, force: false) }",
        )
        .unwrap();
        let to = parse_schema(
            "model Orders { id UUID @id\n@@rowLevelSecurity(enabled: true, force: true) }",
        )
        .unwrap();

        let steps = generate_steps(&compare(&from, &to), "public");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].name, "Orders_force");
        assert!(steps[0].sql.ends_with("\"Orders\" FORCE ROW LEVEL SECURITY;"));
        assert!(steps[0].rollback_sql.contains("NO FORCE"));
    }

    #[test]
    fn test_unmanaging_emits_nothing() {
        let from = parse_schema(
            "model Orders { id UUID @id\n@@rowLevelSecurity(enabled: true) }",
        )
        .unwrap();
        let to = parse_schema("model Orders { id UUID @id }").unwrap();

        let steps = generate_steps(&compare(&from, &to), "public");
        assert!(steps.is_empty());
    }

    #[test]
    fn test_full_generation_steps() {
        let rls = RowLevelSecurity { enabled: true, force: false };
        let steps = create_steps("public", "Orders", rls);
        assert_eq!(steps.len(), 2);
        assert!(steps[0].sql.ends_with("ENABLE ROW LEVEL SECURITY;"));
        assert!(steps[1].sql.ends_with("NO FORCE ROW LEVEL SECURITY;"));

        let disabled = RowLevelSecurity { enabled: false, force: false };
        assert!(create_steps("public", "Orders", disabled).is_empty());
    }
}

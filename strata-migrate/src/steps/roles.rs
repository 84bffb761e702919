//! Role and grant diffing.

use strata_schema::{Role, Schema};

use crate::diff::{Diff, diff_by_key};
use crate::migration::{MigrationStep, ObjectKind, StepKind};
use crate::sql::PostgresSqlGenerator;

pub fn compare(from: &Schema, to: &Schema) -> Diff<Role> {
    diff_by_key(&from.roles, &to.roles, |r| r.name.clone(), |a, b| a == b)
}

pub fn generate_steps(diff: &Diff<Role>, schema_name: &str) -> Vec<MigrationStep> {
    let mut steps = Vec::new();

    for role in &diff.added {
        steps.extend(create_steps(schema_name, role));
    }

    for updated in &diff.updated {
        steps.extend(update_steps(schema_name, &updated.from, &updated.to));
    }

    for role in &diff.removed {
        steps.extend(drop_steps(schema_name, role));
    }

    steps
}

/// One step for the role itself plus one per privilege grant, so a
/// partial failure leaves a diagnosable trail.
pub fn create_steps(schema_name: &str, role: &Role) -> Vec<MigrationStep> {
    let mut steps = vec![MigrationStep::new(
        StepKind::Create,
        ObjectKind::Role,
        format!("{}_create", role.name),
        PostgresSqlGenerator::create_role(role),
        PostgresSqlGenerator::drop_role(&role.name),
    )];
    for (i, grant) in role.grants.iter().enumerate() {
        steps.push(MigrationStep::new(
            StepKind::Create,
            ObjectKind::Role,
            format!("{}_grant_{i}", role.name),
            PostgresSqlGenerator::grant(schema_name, grant, &role.name),
            PostgresSqlGenerator::revoke(schema_name, grant, &role.name),
        ));
    }
    steps
}

fn drop_steps(schema_name: &str, role: &Role) -> Vec<MigrationStep> {
    let mut steps = Vec::new();
    for (i, grant) in role.grants.iter().enumerate() {
        steps.push(MigrationStep::new(
            StepKind::Drop,
            ObjectKind::Role,
            format!("{}_revoke_{i}", role.name),
            PostgresSqlGenerator::revoke(schema_name, grant, &role.name),
            PostgresSqlGenerator::grant(schema_name, grant, &role.name),
        ));
    }
    steps.push(MigrationStep::new(
        StepKind::Drop,
        ObjectKind::Role,
        format!("{}_drop", role.name),
        PostgresSqlGenerator::drop_role(&role.name),
        PostgresSqlGenerator::create_role(role),
    ));
    steps
}

/// A privilege change rebuilds the role in four ordered steps: revoke
/// the full old set, drop, recreate, grant the full new set. The role's
/// grants are never left half-revoked between steps.
fn update_steps(schema_name: &str, from: &Role, to: &Role) -> Vec<MigrationStep> {
    let revoke_old = all_revokes(schema_name, from);
    let grant_old = all_grants(schema_name, from);
    let revoke_new = all_revokes(schema_name, to);
    let grant_new = all_grants(schema_name, to);

    vec![
        MigrationStep::new(
            StepKind::Alter,
            ObjectKind::Role,
            format!("{}_revoke", from.name),
            revoke_old,
            grant_old.clone(),
        ),
        MigrationStep::new(
            StepKind::Alter,
            ObjectKind::Role,
            format!("{}_drop", from.name),
            PostgresSqlGenerator::drop_role(&from.name),
            PostgresSqlGenerator::create_role(from),
        ),
        MigrationStep::new(
            StepKind::Alter,
            ObjectKind::Role,
            format!("{}_create", to.name),
            PostgresSqlGenerator::create_role(to),
            PostgresSqlGenerator::drop_role(&to.name),
        ),
        MigrationStep::new(
            StepKind::Alter,
            ObjectKind::Role,
            format!("{}_grant", to.name),
            grant_new,
            revoke_new,
        ),
    ]
}

/// Every grant of a role as one multi-statement string.
pub fn all_grants(schema_name: &str, role: &Role) -> String {
    role.grants
        .iter()
        .map(|grant| PostgresSqlGenerator::grant(schema_name, grant, &role.name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every revoke of a role as one multi-statement string.
pub fn all_revokes(schema_name: &str, role: &Role) -> String {
    role.grants
        .iter()
        .map(|grant| PostgresSqlGenerator::revoke(schema_name, grant, &role.name))
        .collect::<Vec<_>>()
        .join("\n")
}

//! Foreign key constraint diffing.

use strata_schema::{Relation, Schema};

use super::ModelObject;
use crate::diff::{Diff, diff_by_key};
use crate::migration::{MigrationStep, ObjectKind, StepKind};
use crate::sql::PostgresSqlGenerator;

/// Only relations that own columns produce constraints; back-references
/// are skipped here entirely.
fn foreign_keys(schema: &Schema) -> Vec<ModelObject<Relation>> {
    schema
        .models
        .values()
        .flat_map(|model| {
            model
                .foreign_keys()
                .map(|relation| ModelObject::new(model.name.clone(), relation.clone()))
        })
        .collect()
}

pub fn compare(from: &Schema, to: &Schema) -> Diff<ModelObject<Relation>> {
    diff_by_key(
        &foreign_keys(from),
        &foreign_keys(to),
        |r| (r.model.clone(), r.item.name.clone()),
        |a, b| a == b,
    )
}

pub fn generate_steps(diff: &Diff<ModelObject<Relation>>, schema_name: &str) -> Vec<MigrationStep> {
    let mut steps = Vec::new();

    for relation in &diff.added {
        steps.push(create_step(schema_name, &relation.model, &relation.item));
    }

    for updated in &diff.updated {
        steps.push(drop_step(schema_name, &updated.from.model, &updated.from.item));
        steps.push(create_step(schema_name, &updated.to.model, &updated.to.item));
    }

    for relation in &diff.removed {
        steps.push(drop_step(schema_name, &relation.model, &relation.item));
    }

    steps
}

pub fn create_step(schema_name: &str, model: &str, relation: &Relation) -> MigrationStep {
    let constraint = relation.constraint_name(model);
    MigrationStep::new(
        StepKind::Create,
        ObjectKind::Constraint,
        constraint.clone(),
        PostgresSqlGenerator::add_foreign_key(schema_name, model, relation),
        PostgresSqlGenerator::drop_constraint(schema_name, model, &constraint),
    )
}

fn drop_step(schema_name: &str, model: &str, relation: &Relation) -> MigrationStep {
    let constraint = relation.constraint_name(model);
    MigrationStep::new(
        StepKind::Drop,
        ObjectKind::Constraint,
        constraint.clone(),
        PostgresSqlGenerator::drop_constraint(schema_name, model, &constraint),
        PostgresSqlGenerator::add_foreign_key(schema_name, model, relation),
    )
}

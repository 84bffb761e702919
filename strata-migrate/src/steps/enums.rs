//! Enum type diffing.

use strata_schema::{Enum, Schema};

use crate::diff::{Diff, diff_by_key};
use crate::migration::{MigrationStep, ObjectKind, StepKind};
use crate::sql::PostgresSqlGenerator;

pub fn compare(from: &Schema, to: &Schema) -> Diff<Enum> {
    let from_enums: Vec<Enum> = from.enums.values().cloned().collect();
    let to_enums: Vec<Enum> = to.enums.values().cloned().collect();
    diff_by_key(&from_enums, &to_enums, |e| e.name.clone(), |a, b| a == b)
}

pub fn generate_steps(diff: &Diff<Enum>, schema_name: &str) -> Vec<MigrationStep> {
    let mut steps = Vec::new();

    for enum_def in &diff.added {
        steps.push(create_step(schema_name, enum_def, enum_def.name.as_str()));
    }

    // ALTER TYPE cannot remove or reorder values, so any change is a
    // full drop and recreate.
    for updated in &diff.updated {
        steps.push(MigrationStep::new(
            StepKind::Drop,
            ObjectKind::Enum,
            format!("{}_drop", updated.from.name),
            PostgresSqlGenerator::drop_enum(schema_name, &updated.from.name),
            PostgresSqlGenerator::create_enum(schema_name, &updated.from),
        ));
        steps.push(create_step(schema_name, &updated.to, updated.to.name.as_str()));
    }

    for enum_def in &diff.removed {
        steps.push(MigrationStep::new(
            StepKind::Drop,
            ObjectKind::Enum,
            enum_def.name.to_string(),
            PostgresSqlGenerator::drop_enum(schema_name, &enum_def.name),
            PostgresSqlGenerator::create_enum(schema_name, enum_def),
        ));
    }

    steps
}

pub fn create_step(schema_name: &str, enum_def: &Enum, name: &str) -> MigrationStep {
    MigrationStep::new(
        StepKind::Create,
        ObjectKind::Enum,
        name,
        PostgresSqlGenerator::create_enum(schema_name, enum_def),
        PostgresSqlGenerator::drop_enum(schema_name, &enum_def.name),
    )
}

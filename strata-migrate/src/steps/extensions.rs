//! Extension diffing.

use strata_schema::{Extension, Schema};

use crate::diff::{Diff, diff_by_key};
use crate::migration::{MigrationStep, ObjectKind, StepKind};
use crate::sql::PostgresSqlGenerator;

pub fn compare(from: &Schema, to: &Schema) -> Diff<Extension> {
    diff_by_key(
        &from.extensions,
        &to.extensions,
        |e| e.name.clone(),
        |a, b| a == b,
    )
}

pub fn generate_steps(diff: &Diff<Extension>, _schema_name: &str) -> Vec<MigrationStep> {
    let mut steps = Vec::new();

    for extension in &diff.added {
        steps.push(create_step(extension, &extension.name));
    }

    // A version change cannot be altered in place: drop the old
    // extension, then install the new one.
    for updated in &diff.updated {
        steps.push(MigrationStep::new(
            StepKind::Drop,
            ObjectKind::Extension,
            format!("{}_old", updated.from.name),
            PostgresSqlGenerator::drop_extension(&updated.from.name),
            PostgresSqlGenerator::create_extension(&updated.from),
        ));
        steps.push(create_step(&updated.to, &updated.to.name));
    }

    for extension in &diff.removed {
        steps.push(MigrationStep::new(
            StepKind::Drop,
            ObjectKind::Extension,
            extension.name.to_string(),
            PostgresSqlGenerator::drop_extension(&extension.name),
            PostgresSqlGenerator::create_extension(extension),
        ));
    }

    steps
}

pub fn create_step(extension: &Extension, name: &str) -> MigrationStep {
    MigrationStep::new(
        StepKind::Create,
        ObjectKind::Extension,
        name,
        PostgresSqlGenerator::create_extension(extension),
        PostgresSqlGenerator::drop_extension(&extension.name),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_schema::parse_schema;

    #[test]
    fn test_added_extension() {
        let from = Schema::new();
        let to = parse_schema("extension pgcrypto").unwrap();

        let steps = generate_steps(&compare(&from, &to), "public");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].kind, StepKind::Create);
        assert_eq!(steps[0].object, ObjectKind::Extension);
        assert_eq!(steps[0].name, "pgcrypto");
        assert_eq!(steps[0].sql, "CREATE EXTENSION IF NOT EXISTS \"pgcrypto\";");
        assert_eq!(steps[0].rollback_sql, "DROP EXTENSION IF EXISTS \"pgcrypto\";");
    }

    #[test]
    fn test_version_change_is_drop_then_create() {
        let from = parse_schema("extension pgcrypto").unwrap();
        let to = parse_schema("extension pgcrypto (version='1.3')").unwrap();

        let steps = generate_steps(&compare(&from, &to), "public");
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].name, "pgcrypto_old");
        assert_eq!(steps[0].kind, StepKind::Drop);
        assert_eq!(steps[1].name, "pgcrypto");
        assert!(steps[1].sql.contains("VERSION '1.3'"));
    }

    #[test]
    fn test_identical_schemas_yield_no_steps() {
        let schema = parse_schema("extension pgcrypto").unwrap();
        assert!(compare(&schema, &schema).is_empty());
    }
}

//! Table and column diffing.

use strata_schema::{Field, Model, Schema};

use crate::diff::{Diff, Updated, diff_by_key};
use crate::migration::{MigrationStep, ObjectKind, StepKind};
use crate::sql::PostgresSqlGenerator;

/// Models are matched by name; two models compare equal when their
/// field lists are identical. Relations, indexes, policies and triggers
/// are diffed by their own orchestrators.
pub fn compare(from: &Schema, to: &Schema) -> Diff<Model> {
    let from_models: Vec<Model> = from.models.values().cloned().collect();
    let to_models: Vec<Model> = to.models.values().cloned().collect();
    diff_by_key(
        &from_models,
        &to_models,
        |m| m.name.clone(),
        |a, b| a.fields == b.fields,
    )
}

pub fn generate_steps(diff: &Diff<Model>, schema_name: &str) -> Vec<MigrationStep> {
    let mut steps = Vec::new();

    for model in &diff.added {
        steps.push(create_step(schema_name, model));
    }

    for updated in &diff.updated {
        steps.extend(field_steps(schema_name, updated));
    }

    for model in &diff.removed {
        steps.push(MigrationStep::new(
            StepKind::Drop,
            ObjectKind::Table,
            model.name.to_string(),
            PostgresSqlGenerator::drop_table(schema_name, &model.name),
            PostgresSqlGenerator::create_table(schema_name, model),
        ));
    }

    steps
}

pub fn create_step(schema_name: &str, model: &Model) -> MigrationStep {
    MigrationStep::new(
        StepKind::Create,
        ObjectKind::Table,
        model.name.to_string(),
        PostgresSqlGenerator::create_table(schema_name, model),
        PostgresSqlGenerator::drop_table(schema_name, &model.name),
    )
}

/// Column-level alter steps for a model whose field list changed. Each
/// change renders as its own step so rollback is precise.
fn field_steps(schema_name: &str, updated: &Updated<Model>) -> Vec<MigrationStep> {
    let model = updated.to.name.as_str();
    let field_diff = diff_by_key(
        &updated.from.fields,
        &updated.to.fields,
        |f| f.name.clone(),
        |a, b| a == b,
    );

    let mut steps = Vec::new();

    for field in &field_diff.added {
        steps.push(MigrationStep::new(
            StepKind::Alter,
            ObjectKind::Table,
            format!("{model}.{}", field.name),
            PostgresSqlGenerator::add_column(schema_name, model, field),
            PostgresSqlGenerator::drop_column(schema_name, model, &field.name),
        ));
    }

    for change in &field_diff.updated {
        steps.extend(column_alter_steps(schema_name, model, &change.from, &change.to));
    }

    for field in &field_diff.removed {
        steps.push(MigrationStep::new(
            StepKind::Alter,
            ObjectKind::Table,
            format!("{model}.{}", field.name),
            PostgresSqlGenerator::drop_column(schema_name, model, &field.name),
            PostgresSqlGenerator::add_column(schema_name, model, field),
        ));
    }

    steps
}

/// The minimal ALTER COLUMN statements for one changed column.
fn column_alter_steps(
    schema_name: &str,
    model: &str,
    from: &Field,
    to: &Field,
) -> Vec<MigrationStep> {
    let mut steps = Vec::new();
    let name = format!("{model}.{}", to.name);

    let type_changed = from.field_type != to.field_type
        || from.length != to.length
        || from.precision != to.precision
        || from.scale != to.scale;
    if type_changed {
        steps.push(MigrationStep::new(
            StepKind::Alter,
            ObjectKind::Table,
            name.clone(),
            PostgresSqlGenerator::alter_column_type(schema_name, model, to),
            PostgresSqlGenerator::alter_column_type(schema_name, model, from),
        ));
    }

    if from.default_value != to.default_value {
        let forward = match &to.default_value {
            Some(expr) => {
                PostgresSqlGenerator::set_column_default(schema_name, model, &to.name, expr)
            }
            None => PostgresSqlGenerator::drop_column_default(schema_name, model, &to.name),
        };
        let rollback = match &from.default_value {
            Some(expr) => {
                PostgresSqlGenerator::set_column_default(schema_name, model, &from.name, expr)
            }
            None => PostgresSqlGenerator::drop_column_default(schema_name, model, &from.name),
        };
        steps.push(MigrationStep::new(
            StepKind::Alter,
            ObjectKind::Table,
            name.clone(),
            forward,
            rollback,
        ));
    }

    if from.nullable != to.nullable {
        let (forward, rollback) = if to.nullable {
            (
                PostgresSqlGenerator::drop_column_not_null(schema_name, model, &to.name),
                PostgresSqlGenerator::set_column_not_null(schema_name, model, &to.name),
            )
        } else {
            (
                PostgresSqlGenerator::set_column_not_null(schema_name, model, &to.name),
                PostgresSqlGenerator::drop_column_not_null(schema_name, model, &to.name),
            )
        };
        steps.push(MigrationStep::new(
            StepKind::Alter,
            ObjectKind::Table,
            name,
            forward,
            rollback,
        ));
    }

    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use strata_schema::parse_schema;

    #[test]
    fn test_added_model() {
        let from = Schema::new();
        let to = parse_schema("model User { id UUID @id }").unwrap();

        let steps = generate_steps(&compare(&from, &to), "public");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].kind, StepKind::Create);
        assert!(steps[0].sql.contains("CREATE TABLE \"public\".\"User\""));
        assert_eq!(steps[0].rollback_sql, "DROP TABLE IF EXISTS \"public\".\"User\";");
    }

    #[test]
    fn test_added_column() {
        let from = parse_schema("model User { id UUID @id }").unwrap();
        let to = parse_schema("model User { id UUID @id\nemail TEXT @unique }").unwrap();

        let steps = generate_steps(&compare(&from, &to), "public");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].kind, StepKind::Alter);
        assert_eq!(steps[0].name, "User.email");
        assert_eq!(
            steps[0].sql,
            "ALTER TABLE \"public\".\"User\" ADD COLUMN \"email\" TEXT NOT NULL UNIQUE;"
        );
        assert_eq!(
            steps[0].rollback_sql,
            "ALTER TABLE \"public\".\"User\" DROP COLUMN IF EXISTS \"email\";"
        );
    }

    #[test]
    fn test_type_change() {
        let from = parse_schema("model User { id UUID @id\nname VARCHAR(100) }").unwrap();
        let to = parse_schema("model User { id UUID @id\nname VARCHAR(255) }").unwrap();

        let steps = generate_steps(&compare(&from, &to), "public");
        assert_eq!(steps.len(), 1);
        assert_eq!(
            steps[0].sql,
            "ALTER TABLE \"public\".\"User\" ALTER COLUMN \"name\" TYPE VARCHAR(255);"
        );
        assert_eq!(
            steps[0].rollback_sql,
            "ALTER TABLE \"public\".\"User\" ALTER COLUMN \"name\" TYPE VARCHAR(100);"
        );
    }

    #[test]
    fn test_nullable_change() {
        let from = parse_schema("model User { id UUID @id\nbio TEXT }").unwrap();
        let to = parse_schema("model User { id UUID @id\nbio? TEXT }").unwrap();

        let steps = generate_steps(&compare(&from, &to), "public");
        assert_eq!(steps.len(), 1);
        assert!(steps[0].sql.ends_with("DROP NOT NULL;"));
        assert!(steps[0].rollback_sql.ends_with("SET NOT NULL;"));
    }

    #[test]
    fn test_default_added_and_removed() {
        let from = parse_schema("model User { id UUID @id\nrole TEXT }").unwrap();
        let to = parse_schema("model User { id UUID @id\nrole TEXT @default('USER') }").unwrap();

        let steps = generate_steps(&compare(&from, &to), "public");
        assert_eq!(steps.len(), 1);
        assert!(steps[0].sql.ends_with("SET DEFAULT 'USER';"));
        assert!(steps[0].rollback_sql.ends_with("DROP DEFAULT;"));

        let reverse = generate_steps(&compare(&to, &from), "public");
        assert!(reverse[0].sql.ends_with("DROP DEFAULT;"));
        assert!(reverse[0].rollback_sql.ends_with("SET DEFAULT 'USER';"));
    }

    #[test]
    fn test_dropped_model_rollback_recreates_it() {
        let from = parse_schema("model User { id UUID @id\nemail TEXT @unique }").unwrap();
        let to = Schema::new();

        let steps = generate_steps(&compare(&from, &to), "public");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].kind, StepKind::Drop);
        assert!(steps[0].rollback_sql.contains("\"email\" TEXT NOT NULL UNIQUE"));
    }

    #[test]
    fn test_identical_models_yield_no_steps() {
        let schema = parse_schema("model User { id UUID @id\nemail TEXT }").unwrap();
        assert!(compare(&schema, &schema).is_empty());
    }
}

//! Trigger diffing.

use strata_schema::{Schema, Trigger};

use super::ModelObject;
use crate::diff::{Diff, diff_by_key};
use crate::migration::{MigrationStep, ObjectKind, StepKind};
use crate::sql::PostgresSqlGenerator;

fn triggers(schema: &Schema) -> Vec<ModelObject<Trigger>> {
    schema
        .models
        .values()
        .flat_map(|model| {
            model
                .triggers
                .iter()
                .map(|trigger| ModelObject::new(model.name.clone(), trigger.clone()))
        })
        .collect()
}

/// Triggers are identified by their generated name, which encodes the
/// model, event and level. An execute-body change on the same trigger is
/// an update.
pub fn compare(from: &Schema, to: &Schema) -> Diff<ModelObject<Trigger>> {
    diff_by_key(
        &triggers(from),
        &triggers(to),
        |t| t.item.trigger_name(&t.model),
        |a, b| a == b,
    )
}

pub fn generate_steps(diff: &Diff<ModelObject<Trigger>>, schema_name: &str) -> Vec<MigrationStep> {
    let mut steps = Vec::new();

    for trigger in &diff.added {
        steps.push(create_step(schema_name, &trigger.model, &trigger.item));
    }

    for updated in &diff.updated {
        steps.push(drop_step(schema_name, &updated.from.model, &updated.from.item));
        steps.push(create_step(schema_name, &updated.to.model, &updated.to.item));
    }

    for trigger in &diff.removed {
        steps.push(drop_step(schema_name, &trigger.model, &trigger.item));
    }

    steps
}

/// The function and the trigger travel in one step: the trigger is
/// useless without its function and vice versa.
pub fn create_step(schema_name: &str, model: &str, trigger: &Trigger) -> MigrationStep {
    let sql = format!(
        "{}\n{}",
        PostgresSqlGenerator::create_trigger_function(schema_name, model, trigger),
        PostgresSqlGenerator::create_trigger(schema_name, model, trigger)
    );
    MigrationStep::new(
        StepKind::Create,
        ObjectKind::Trigger,
        trigger.trigger_name(model),
        sql,
        drop_sql(schema_name, model, trigger),
    )
}

fn drop_step(schema_name: &str, model: &str, trigger: &Trigger) -> MigrationStep {
    let create_sql = format!(
        "{}\n{}",
        PostgresSqlGenerator::create_trigger_function(schema_name, model, trigger),
        PostgresSqlGenerator::create_trigger(schema_name, model, trigger)
    );
    MigrationStep::new(
        StepKind::Drop,
        ObjectKind::Trigger,
        trigger.trigger_name(model),
        drop_sql(schema_name, model, trigger),
        create_sql,
    )
}

/// Drop the trigger first, then the function it depends on.
fn drop_sql(schema_name: &str, model: &str, trigger: &Trigger) -> String {
    format!(
        "{}\n{}",
        PostgresSqlGenerator::drop_trigger(schema_name, model, trigger),
        PostgresSqlGenerator::drop_trigger_function(schema_name, model, trigger)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_schema::parse_schema;

    const WITH_TRIGGER: &str = r#"
        model User {
            id UUID @id
            updatedAt TIMESTAMPTZ @updatedAt
            @@trigger("BeforeUpdate", {
                level: "Row",
                execute: """
                    NEW."updatedAt" = now();
                    RETURN NEW;
                """
            })
        }
    "#;

    #[test]
    fn test_added_trigger_creates_function_then_trigger() {
        let from = parse_schema("model User { id UUID @id\nupdatedAt TIMESTAMPTZ @updatedAt }")
            .unwrap();
        let to = parse_schema(WITH_TRIGGER).unwrap();

        let steps = generate_steps(&compare(&from, &to), "public");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].name, "User_before_update_for_each_row_trigger");

        let function_pos = steps[0].sql.find("CREATE OR REPLACE FUNCTION").unwrap();
        let trigger_pos = steps[0].sql.find("CREATE TRIGGER").unwrap();
        assert!(function_pos < trigger_pos);

        // Rollback drops the trigger before the function.
        let drop_trigger_pos = steps[0].rollback_sql.find("DROP TRIGGER").unwrap();
        let drop_function_pos = steps[0].rollback_sql.find("DROP FUNCTION").unwrap();
        assert!(drop_trigger_pos < drop_function_pos);
    }

    #[test]
    fn test_body_change_replaces_trigger() {
        let from = parse_schema(WITH_TRIGGER).unwrap();
        let to = parse_schema(
            r#"
            model User {
                id UUID @id
                updatedAt TIMESTAMPTZ @updatedAt
                @@trigger("BeforeUpdate", {
                    level: "Row",
                    execute: """
                        RAISE EXCEPTION 'updates are frozen';
                    """
                })
            }
            "#,
        )
        .unwrap();

        let steps = generate_steps(&compare(&from, &to), "public");
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].kind, StepKind::Drop);
        assert!(steps[1].sql.contains("RAISE EXCEPTION 'updates are frozen';"));
        assert!(steps[0].rollback_sql.contains("NEW.\"updatedAt\" = now();"));
    }
}

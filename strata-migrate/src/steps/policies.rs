//! Policy diffing.

use strata_schema::{Policy, Schema};

use super::ModelObject;
use crate::diff::{Diff, diff_by_key};
use crate::migration::{MigrationStep, ObjectKind, StepKind};
use crate::sql::PostgresSqlGenerator;

fn policies(schema: &Schema) -> Vec<ModelObject<Policy>> {
    schema
        .models
        .values()
        .flat_map(|model| {
            model
                .policies
                .iter()
                .map(|policy| ModelObject::new(model.name.clone(), policy.clone()))
        })
        .collect()
}

pub fn compare(from: &Schema, to: &Schema) -> Diff<ModelObject<Policy>> {
    diff_by_key(
        &policies(from),
        &policies(to),
        |p| (p.model.clone(), p.item.name.clone()),
        |a, b| a == b,
    )
}

pub fn generate_steps(diff: &Diff<ModelObject<Policy>>, schema_name: &str) -> Vec<MigrationStep> {
    let mut steps = Vec::new();

    for policy in &diff.added {
        steps.push(create_step(schema_name, &policy.model, &policy.item));
    }

    // CREATE POLICY has no ALTER counterpart for command or expression
    // changes, so updates replace the policy.
    for updated in &diff.updated {
        steps.push(drop_step(schema_name, &updated.from.model, &updated.from.item));
        steps.push(create_step(schema_name, &updated.to.model, &updated.to.item));
    }

    for policy in &diff.removed {
        steps.push(drop_step(schema_name, &policy.model, &policy.item));
    }

    steps
}

pub fn create_step(schema_name: &str, model: &str, policy: &Policy) -> MigrationStep {
    MigrationStep::new(
        StepKind::Create,
        ObjectKind::Policy,
        policy.object_name(model),
        PostgresSqlGenerator::create_policy(schema_name, model, policy),
        PostgresSqlGenerator::drop_policy(schema_name, model, policy),
    )
}

fn drop_step(schema_name: &str, model: &str, policy: &Policy) -> MigrationStep {
    MigrationStep::new(
        StepKind::Drop,
        ObjectKind::Policy,
        policy.object_name(model),
        PostgresSqlGenerator::drop_policy(schema_name, model, policy),
        PostgresSqlGenerator::create_policy(schema_name, model, policy),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_schema::parse_schema;

    const WITH_POLICY: &str = r#"
        model Orders {
            id UUID @id
            userId UUID
            @@policy("owner_only", {
                for: [select, update],
                to: "app_user",
                using: "userId = current_setting('app.user_id')::uuid"
            })
        }
    "#;

    #[test]
    fn test_added_policy() {
        let from = parse_schema("model Orders { id UUID @id\nuserId UUID }").unwrap();
        let to = parse_schema(WITH_POLICY).unwrap();

        let steps = generate_steps(&compare(&from, &to), "public");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].name, "policy_Orders_owner_only");
        assert!(steps[0].sql.contains("CREATE POLICY \"policy_Orders_owner_only\""));
        assert!(steps[0].sql.contains("FOR SELECT, UPDATE TO app_user"));
        assert_eq!(
            steps[0].rollback_sql,
            "DROP POLICY IF EXISTS \"policy_Orders_owner_only\" ON \"public\".\"Orders\";"
        );
    }

    #[test]
    fn test_expression_change_replaces_policy() {
        let from = parse_schema(WITH_POLICY).unwrap();
        let to = parse_schema(
            r#"
            model Orders {
                id UUID @id
                userId UUID
                @@policy("owner_only", { for: "all", to: "app_user", using: "true" })
            }
            "#,
        )
        .unwrap();

        let steps = generate_steps(&compare(&from, &to), "public");
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].kind, StepKind::Drop);
        assert!(steps[1].sql.contains("FOR ALL"));
        assert!(steps[0].rollback_sql.contains("FOR SELECT, UPDATE"));
    }
}

//! Index diffing.

use strata_schema::{Index, Schema};

use super::ModelObject;
use crate::diff::{Diff, diff_by_key};
use crate::migration::{MigrationStep, ObjectKind, StepKind};
use crate::sql::PostgresSqlGenerator;

fn indexes(schema: &Schema) -> Vec<ModelObject<Index>> {
    schema
        .models
        .values()
        .flat_map(|model| {
            model
                .indexes
                .iter()
                .map(|index| ModelObject::new(model.name.clone(), index.clone()))
        })
        .collect()
}

/// Indexes are matched by model plus field-list signature, so a
/// definition change (unique, type, predicate, name) on the same columns
/// is an update rather than an unrelated add/remove pair.
pub fn compare(from: &Schema, to: &Schema) -> Diff<ModelObject<Index>> {
    diff_by_key(
        &indexes(from),
        &indexes(to),
        |i| (i.model.clone(), i.item.fields.join(",")),
        |a, b| a == b,
    )
}

pub fn generate_steps(diff: &Diff<ModelObject<Index>>, schema_name: &str) -> Vec<MigrationStep> {
    let mut steps = Vec::new();

    // Drops first: a renamed or recolumned index diffs as remove+add, and
    // the old definition may still hold the name the new one wants.
    for index in &diff.removed {
        steps.push(drop_step(schema_name, &index.model, &index.item));
    }

    // Indexes are replaced, never altered in place.
    for updated in &diff.updated {
        steps.push(drop_step(schema_name, &updated.from.model, &updated.from.item));
        steps.push(create_step(schema_name, &updated.to.model, &updated.to.item));
    }

    for index in &diff.added {
        steps.push(create_step(schema_name, &index.model, &index.item));
    }

    steps
}

pub fn create_step(schema_name: &str, model: &str, index: &Index) -> MigrationStep {
    MigrationStep::new(
        StepKind::Create,
        ObjectKind::Index,
        index.resolved_name(model),
        PostgresSqlGenerator::create_index(schema_name, model, index),
        PostgresSqlGenerator::drop_index(schema_name, &index.resolved_name(model)),
    )
}

fn drop_step(schema_name: &str, model: &str, index: &Index) -> MigrationStep {
    MigrationStep::new(
        StepKind::Drop,
        ObjectKind::Index,
        index.resolved_name(model),
        PostgresSqlGenerator::drop_index(schema_name, &index.resolved_name(model)),
        PostgresSqlGenerator::create_index(schema_name, model, index),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_schema::parse_schema;

    #[test]
    fn test_added_composite_unique_index() {
        let from = parse_schema("model Inventory { id UUID @id\nsku TEXT\nwarehouseId UUID }")
            .unwrap();
        let to = parse_schema(
            r#"
            model Inventory {
                id UUID @id
                sku TEXT
                warehouseId UUID
                @@index([sku, warehouseId], { unique: true })
            }
            "#,
        )
        .unwrap();

        let steps = generate_steps(&compare(&from, &to), "public");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].name, "idx_Inventory_sku_warehouseId");
        assert!(steps[0].sql.contains("CREATE UNIQUE INDEX"));
        assert!(steps[0].sql.contains("(\"sku\", \"warehouseId\")"));
    }

    #[test]
    fn test_uniqueness_change_is_drop_then_create() {
        let from = parse_schema(
            "model User { id UUID @id\nemail TEXT\n@@index([email]) }",
        )
        .unwrap();
        let to = parse_schema(
            "model User { id UUID @id\nemail TEXT\n@@index([email], { unique: true }) }",
        )
        .unwrap();

        let steps = generate_steps(&compare(&from, &to), "public");
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].kind, StepKind::Drop);
        assert!(steps[1].sql.contains("CREATE UNIQUE INDEX"));
    }

    #[test]
    fn test_recolumned_named_index_drops_before_create() {
        let from = parse_schema(
            "model User { id UUID @id\nemail TEXT\nhandle TEXT\n@@index([email], { name: \"idx_lookup\" }) }",
        )
        .unwrap();
        let to = parse_schema(
            "model User { id UUID @id\nemail TEXT\nhandle TEXT\n@@index([handle], { name: \"idx_lookup\" }) }",
        )
        .unwrap();

        let steps = generate_steps(&compare(&from, &to), "public");
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].kind, StepKind::Drop);
        assert_eq!(steps[0].name, "idx_lookup");
        assert_eq!(steps[1].kind, StepKind::Create);
        assert!(steps[1].sql.contains("(\"handle\")"));
    }

    #[test]
    fn test_removed_index_rolls_back_to_create() {
        let from = parse_schema(
            "model User { id UUID @id\nemail TEXT\n@@index([email]) }",
        )
        .unwrap();
        let to = parse_schema("model User { id UUID @id\nemail TEXT }").unwrap();

        let steps = generate_steps(&compare(&from, &to), "public");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].sql, "DROP INDEX IF EXISTS \"public\".\"idx_User_email\";");
        assert!(steps[0].rollback_sql.contains("CREATE INDEX \"idx_User_email\""));
    }
}

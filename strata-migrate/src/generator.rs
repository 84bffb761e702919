//! Full-schema and diff-based migration generation.

use tracing::debug;

use strata_schema::Schema;

use crate::error::MigrateResult;
use crate::migration::{Migration, MigrationStep, ObjectKind, StepKind};
use crate::resolve::creation_order;
use crate::steps;

/// Options controlling which object kinds a migration includes.
#[derive(Debug, Clone)]
pub struct MigrationOptions {
    pub schema_name: String,
    pub description: String,
    pub include_extensions: bool,
    pub include_enums: bool,
    pub include_tables: bool,
    pub include_constraints: bool,
    pub include_indexes: bool,
    pub include_rls: bool,
    pub include_policies: bool,
    pub include_roles: bool,
    pub include_relations: bool,
    pub include_triggers: bool,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            schema_name: "public".to_string(),
            description: "migration".to_string(),
            include_extensions: true,
            include_enums: true,
            include_tables: true,
            include_constraints: true,
            include_indexes: true,
            include_rls: true,
            include_policies: true,
            include_roles: true,
            include_relations: true,
            include_triggers: true,
        }
    }
}

impl MigrationOptions {
    pub fn named(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_schema_name(mut self, schema_name: impl Into<String>) -> Self {
        self.schema_name = schema_name.into();
        self
    }
}

/// Generate a migration that creates every object in the schema from
/// scratch: extensions, enums, dependency-ordered tables with their
/// constraints, indexes, RLS, policies and triggers, then roles.
pub fn generate_migration(schema: &Schema, options: &MigrationOptions) -> MigrateResult<Migration> {
    let schema_name = options.schema_name.as_str();
    let mut migration_steps = Vec::new();

    if options.include_extensions {
        for extension in &schema.extensions {
            migration_steps.push(steps::extensions::create_step(extension, &extension.name));
        }
    }

    if options.include_enums {
        for enum_def in schema.enums.values() {
            migration_steps.push(steps::enums::create_step(
                schema_name,
                enum_def,
                enum_def.name.as_str(),
            ));
        }
    }

    for model in creation_order(schema)? {
        if options.include_tables {
            migration_steps.push(steps::tables::create_step(schema_name, model));
        }
        if options.include_constraints && options.include_relations {
            for relation in model.foreign_keys() {
                migration_steps.push(steps::relations::create_step(
                    schema_name,
                    &model.name,
                    relation,
                ));
            }
        }
        if options.include_indexes {
            for index in &model.indexes {
                migration_steps.push(steps::indexes::create_step(schema_name, &model.name, index));
            }
        }
        if options.include_rls {
            if let Some(rls) = model.row_level_security {
                migration_steps.extend(steps::rls::create_steps(schema_name, &model.name, rls));
            }
        }
        if options.include_policies {
            for policy in &model.policies {
                migration_steps.push(steps::policies::create_step(
                    schema_name,
                    &model.name,
                    policy,
                ));
            }
        }
        if options.include_triggers {
            for trigger in &model.triggers {
                migration_steps.push(steps::triggers::create_step(
                    schema_name,
                    &model.name,
                    trigger,
                ));
            }
        }
    }

    if options.include_roles {
        for role in &schema.roles {
            migration_steps.extend(steps::roles::create_steps(schema_name, role));
        }
    }

    debug!(steps = migration_steps.len(), "generated full migration");
    Ok(Migration::new(options.description.clone(), migration_steps))
}

/// Generate a migration from the differences between two snapshots.
///
/// The per-kind orchestrators run independently and their steps
/// concatenate in fixed order: extensions, enums, tables, relations,
/// indexes, RLS, policies, roles, triggers. Later kinds may reference
/// objects the earlier kinds create.
pub fn generate_migration_from_diff(
    from: &Schema,
    to: &Schema,
    options: &MigrationOptions,
) -> MigrateResult<Migration> {
    let schema_name = options.schema_name.as_str();
    let mut migration_steps = Vec::new();

    if options.include_extensions {
        let diff = steps::extensions::compare(from, to);
        migration_steps.extend(steps::extensions::generate_steps(&diff, schema_name));
    }
    if options.include_enums {
        let diff = steps::enums::compare(from, to);
        migration_steps.extend(steps::enums::generate_steps(&diff, schema_name));
    }
    if options.include_tables {
        let diff = steps::tables::compare(from, to);
        migration_steps.extend(steps::tables::generate_steps(&diff, schema_name));
    }
    if options.include_relations && options.include_constraints {
        let diff = steps::relations::compare(from, to);
        migration_steps.extend(steps::relations::generate_steps(&diff, schema_name));
    }
    if options.include_indexes {
        let diff = steps::indexes::compare(from, to);
        migration_steps.extend(steps::indexes::generate_steps(&diff, schema_name));
    }
    if options.include_rls {
        let diff = steps::rls::compare(from, to);
        migration_steps.extend(steps::rls::generate_steps(&diff, schema_name));
    }
    if options.include_policies {
        let diff = steps::policies::compare(from, to);
        migration_steps.extend(steps::policies::generate_steps(&diff, schema_name));
    }
    if options.include_roles {
        let diff = steps::roles::compare(from, to);
        migration_steps.extend(steps::roles::generate_steps(&diff, schema_name));
    }
    if options.include_triggers {
        let diff = steps::triggers::compare(from, to);
        migration_steps.extend(steps::triggers::generate_steps(&diff, schema_name));
    }

    debug!(steps = migration_steps.len(), "generated diff migration");
    Ok(Migration::new(options.description.clone(), migration_steps))
}

/// Generate the migration that tears the whole schema down: the full
/// forward migration reversed, with `sql` and `rollback_sql` swapped.
///
/// Role-create steps are not naively swapped: a role's true inverse is a
/// comprehensive revoke-everything-then-drop, regenerated from the
/// schema, so the drop cannot fail on grants the naive swap missed.
pub fn generate_rollback_migration(
    schema: &Schema,
    options: &MigrationOptions,
) -> MigrateResult<Migration> {
    let forward = generate_migration(schema, options)?;
    let schema_name = options.schema_name.as_str();

    let steps = forward
        .steps
        .iter()
        .rev()
        .map(|step| {
            if step.object == ObjectKind::Role && step.kind == StepKind::Create {
                if let Some(role_name) = step.name.strip_suffix("_create") {
                    if let Some(role) = schema.role(role_name) {
                        let mut sql = steps::roles::all_revokes(schema_name, role);
                        if !sql.is_empty() {
                            sql.push('\n');
                        }
                        sql.push_str(&crate::sql::PostgresSqlGenerator::drop_role(&role.name));
                        return MigrationStep::new(
                            StepKind::Drop,
                            ObjectKind::Role,
                            step.name.clone(),
                            sql,
                            step.sql.clone(),
                        );
                    }
                }
            }
            step.inverted()
        })
        .collect();

    Ok(Migration::at(
        forward.timestamp,
        format!("rollback {}", options.description),
        steps,
    ))
}

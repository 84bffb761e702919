//! PostgreSQL DDL rendering.
//!
//! Stateless string construction only. Every method has a forward and a
//! rollback counterpart; the step modules pair them up.

use strata_schema::{
    Enum, Extension, Field, Index, Model, Policy, PrivilegeGrant, Relation, Role, Trigger,
};

/// Renders schema objects to PostgreSQL DDL.
pub struct PostgresSqlGenerator;

impl PostgresSqlGenerator {
    // --- extensions ----------------------------------------------------

    pub fn create_extension(extension: &Extension) -> String {
        match &extension.version {
            Some(version) => format!(
                "CREATE EXTENSION IF NOT EXISTS \"{}\" VERSION '{version}';",
                extension.name
            ),
            None => format!("CREATE EXTENSION IF NOT EXISTS \"{}\";", extension.name),
        }
    }

    pub fn drop_extension(name: &str) -> String {
        format!("DROP EXTENSION IF EXISTS \"{name}\";")
    }

    // --- enums ---------------------------------------------------------

    pub fn create_enum(schema_name: &str, enum_def: &Enum) -> String {
        let values = enum_def
            .values
            .iter()
            .map(|v| format!("'{v}'"))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "CREATE TYPE \"{schema_name}\".\"{}\" AS ENUM ({values});",
            enum_def.name
        )
    }

    pub fn drop_enum(schema_name: &str, name: &str) -> String {
        format!("DROP TYPE IF EXISTS \"{schema_name}\".\"{name}\";")
    }

    // --- tables --------------------------------------------------------

    pub fn create_table(schema_name: &str, model: &Model) -> String {
        let columns = model
            .fields
            .iter()
            .map(|field| format!("  {}", Self::column_definition(schema_name, field)))
            .collect::<Vec<_>>()
            .join(",\n");
        format!(
            "CREATE TABLE \"{schema_name}\".\"{}\" (\n{columns}\n);",
            model.name
        )
    }

    pub fn drop_table(schema_name: &str, name: &str) -> String {
        format!("DROP TABLE IF EXISTS \"{schema_name}\".\"{name}\";")
    }

    /// One column clause. The primary key renders `NOT NULL PRIMARY KEY`
    /// even when the field was declared nullable.
    pub fn column_definition(schema_name: &str, field: &Field) -> String {
        let mut clause = format!("\"{}\" {}", field.name, field.render_type(schema_name));
        if field.is_id() {
            clause.push_str(" NOT NULL PRIMARY KEY");
        } else if !field.nullable {
            clause.push_str(" NOT NULL");
        }
        if field.is_unique() {
            clause.push_str(" UNIQUE");
        }
        if let Some(default) = &field.default_value {
            clause.push_str(" DEFAULT ");
            clause.push_str(default);
        }
        clause
    }

    pub fn add_column(schema_name: &str, model: &str, field: &Field) -> String {
        format!(
            "ALTER TABLE \"{schema_name}\".\"{model}\" ADD COLUMN {};",
            Self::column_definition(schema_name, field)
        )
    }

    pub fn drop_column(schema_name: &str, model: &str, column: &str) -> String {
        format!("ALTER TABLE \"{schema_name}\".\"{model}\" DROP COLUMN IF EXISTS \"{column}\";")
    }

    pub fn alter_column_type(schema_name: &str, model: &str, field: &Field) -> String {
        format!(
            "ALTER TABLE \"{schema_name}\".\"{model}\" ALTER COLUMN \"{}\" TYPE {};",
            field.name,
            field.render_type(schema_name)
        )
    }

    pub fn set_column_default(schema_name: &str, model: &str, column: &str, expr: &str) -> String {
        format!(
            "ALTER TABLE \"{schema_name}\".\"{model}\" ALTER COLUMN \"{column}\" SET DEFAULT {expr};"
        )
    }

    pub fn drop_column_default(schema_name: &str, model: &str, column: &str) -> String {
        format!(
            "ALTER TABLE \"{schema_name}\".\"{model}\" ALTER COLUMN \"{column}\" DROP DEFAULT;"
        )
    }

    pub fn set_column_not_null(schema_name: &str, model: &str, column: &str) -> String {
        format!(
            "ALTER TABLE \"{schema_name}\".\"{model}\" ALTER COLUMN \"{column}\" SET NOT NULL;"
        )
    }

    pub fn drop_column_not_null(schema_name: &str, model: &str, column: &str) -> String {
        format!(
            "ALTER TABLE \"{schema_name}\".\"{model}\" ALTER COLUMN \"{column}\" DROP NOT NULL;"
        )
    }

    // --- foreign keys --------------------------------------------------

    pub fn add_foreign_key(schema_name: &str, model: &str, relation: &Relation) -> String {
        let local = quote_list(&relation.fields);
        let referenced = quote_list(&relation.references);
        let mut sql = format!(
            "ALTER TABLE \"{schema_name}\".\"{model}\" ADD CONSTRAINT {} \
             FOREIGN KEY ({local}) REFERENCES \"{schema_name}\".\"{}\" ({referenced})",
            relation.constraint_name(model),
            relation.model
        );
        if let Some(action) = relation.on_delete {
            sql.push_str(" ON DELETE ");
            sql.push_str(action.as_sql());
        }
        if let Some(action) = relation.on_update {
            sql.push_str(" ON UPDATE ");
            sql.push_str(action.as_sql());
        }
        sql.push(';');
        sql
    }

    pub fn drop_constraint(schema_name: &str, model: &str, constraint: &str) -> String {
        format!(
            "ALTER TABLE \"{schema_name}\".\"{model}\" DROP CONSTRAINT IF EXISTS {constraint};"
        )
    }

    // --- indexes -------------------------------------------------------

    pub fn create_index(schema_name: &str, model: &str, index: &Index) -> String {
        let unique = if index.unique { "UNIQUE " } else { "" };
        let using = match index.index_type {
            Some(index_type) => format!("USING {} ", index_type.as_sql()),
            None => String::new(),
        };
        let mut sql = format!(
            "CREATE {unique}INDEX \"{}\" ON \"{schema_name}\".\"{model}\" {using}({})",
            index.resolved_name(model),
            quote_list(&index.fields)
        );
        if let Some(predicate) = &index.where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(predicate);
        }
        sql.push(';');
        sql
    }

    pub fn drop_index(schema_name: &str, name: &str) -> String {
        format!("DROP INDEX IF EXISTS \"{schema_name}\".\"{name}\";")
    }

    // --- row-level security --------------------------------------------

    pub fn enable_rls(schema_name: &str, model: &str) -> String {
        format!("ALTER TABLE \"{schema_name}\".\"{model}\" ENABLE ROW LEVEL SECURITY;")
    }

    pub fn disable_rls(schema_name: &str, model: &str) -> String {
        format!("ALTER TABLE \"{schema_name}\".\"{model}\" DISABLE ROW LEVEL SECURITY;")
    }

    pub fn force_rls(schema_name: &str, model: &str) -> String {
        format!("ALTER TABLE \"{schema_name}\".\"{model}\" FORCE ROW LEVEL SECURITY;")
    }

    pub fn no_force_rls(schema_name: &str, model: &str) -> String {
        format!("ALTER TABLE \"{schema_name}\".\"{model}\" NO FORCE ROW LEVEL SECURITY;")
    }

    // --- policies ------------------------------------------------------

    pub fn create_policy(schema_name: &str, model: &str, policy: &Policy) -> String {
        let mut sql = format!(
            "CREATE POLICY \"{}\" ON \"{schema_name}\".\"{model}\" FOR {} TO {} USING (({}))",
            policy.object_name(model),
            policy.commands_sql(),
            policy.role,
            policy.using_expr
        );
        if let Some(check) = &policy.check_expr {
            sql.push_str(&format!(" WITH CHECK (({check}))"));
        }
        sql.push(';');
        sql
    }

    pub fn drop_policy(schema_name: &str, model: &str, policy: &Policy) -> String {
        format!(
            "DROP POLICY IF EXISTS \"{}\" ON \"{schema_name}\".\"{model}\";",
            policy.object_name(model)
        )
    }

    // --- roles ---------------------------------------------------------

    pub fn create_role(role: &Role) -> String {
        format!("CREATE ROLE \"{}\";", role.name)
    }

    pub fn drop_role(name: &str) -> String {
        format!("DROP ROLE IF EXISTS \"{name}\";")
    }

    pub fn grant(schema_name: &str, grant: &PrivilegeGrant, role: &str) -> String {
        format!(
            "GRANT {} ON \"{schema_name}\".\"{}\" TO \"{role}\";",
            grant.privileges_sql(),
            grant.on
        )
    }

    pub fn revoke(schema_name: &str, grant: &PrivilegeGrant, role: &str) -> String {
        format!(
            "REVOKE {} ON \"{schema_name}\".\"{}\" FROM \"{role}\";",
            grant.privileges_sql(),
            grant.on
        )
    }

    // --- triggers ------------------------------------------------------

    /// Bodies consisting of bare statements are wrapped in `BEGIN ... END;`;
    /// a body that already opens with its own `DECLARE` or `BEGIN` block is
    /// copied into the function verbatim.
    pub fn create_trigger_function(schema_name: &str, model: &str, trigger: &Trigger) -> String {
        let body = trigger.execute.trim_start();
        let body = if body.starts_with("DECLARE") || body.starts_with("BEGIN") {
            trigger.execute.clone()
        } else {
            format!("BEGIN {} END;", trigger.execute)
        };
        format!(
            "CREATE OR REPLACE FUNCTION \"{schema_name}\".\"{}\"() RETURNS TRIGGER AS $$ \
             {body} $$ LANGUAGE plpgsql;",
            trigger.function_name(model)
        )
    }

    pub fn create_trigger(schema_name: &str, model: &str, trigger: &Trigger) -> String {
        format!(
            "CREATE TRIGGER {} {} {} ON \"{schema_name}\".\"{model}\" \
             EXECUTE FUNCTION \"{schema_name}\".\"{}\"();",
            trigger.trigger_name(model),
            trigger.event.as_sql(),
            trigger.level.as_sql(),
            trigger.function_name(model)
        )
    }

    pub fn drop_trigger(schema_name: &str, model: &str, trigger: &Trigger) -> String {
        format!(
            "DROP TRIGGER IF EXISTS {} ON \"{schema_name}\".\"{model}\";",
            trigger.trigger_name(model)
        )
    }

    pub fn drop_trigger_function(schema_name: &str, model: &str, trigger: &Trigger) -> String {
        format!(
            "DROP FUNCTION IF EXISTS \"{schema_name}\".\"{}\"();",
            trigger.function_name(model)
        )
    }
}

fn quote_list(names: &[smol_str::SmolStr]) -> String {
    names
        .iter()
        .map(|n| format!("\"{n}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

//! Schema text parsing.
//!
//! [`parse_schema`] is a pure function of its input: every call builds a
//! fresh [`Schema`] and no state is shared between calls.

pub mod grammar;

use std::collections::HashSet;

use pest::Parser;
use pest::iterators::Pair;
use smol_str::SmolStr;
use tracing::debug;

use crate::ast::{
    Enum, Extension, Field, FieldAttribute, FieldType, Index, IndexType, Model, Policy,
    PolicyCommand, Privilege, PrivilegeGrant, ReferentialAction, Relation, RelationKind, Role,
    RowLevelSecurity, ScalarType, Schema, Trigger, TriggerEvent, TriggerLevel,
};
use crate::error::{SchemaError, SchemaResult};
use grammar::{Rule, StrataParser};

/// Parse schema text into a [`Schema`].
pub fn parse_schema(input: &str) -> SchemaResult<Schema> {
    let mut pairs = StrataParser::parse(Rule::schema, input)
        .map_err(|err| syntax_error(input, err))?;

    let mut extensions = Vec::new();
    let mut enums = Vec::new();
    let mut roles = Vec::new();
    let mut pending_models = Vec::new();

    let schema_pair = pairs.next().ok_or_else(|| {
        SchemaError::syntax(input, 0, input.len().max(1), "empty parse result")
    })?;

    for pair in schema_pair.into_inner() {
        match pair.as_rule() {
            Rule::extension_def => extensions.push(parse_extension(pair)),
            Rule::enum_def => enums.push(parse_enum(pair)),
            Rule::role_def => roles.push(parse_role(pair)?),
            Rule::model_def => pending_models.push(parse_model(pair)?),
            Rule::EOI => {}
            _ => unreachable!("unexpected top-level rule"),
        }
    }

    let mut schema = Schema::new();

    for extension in extensions {
        if schema.extensions.iter().any(|e| e.name == extension.name) {
            return Err(SchemaError::duplicate("extension", extension.name));
        }
        schema.extensions.push(extension);
    }
    for enum_def in enums {
        if schema.enums.contains_key(&enum_def.name) {
            return Err(SchemaError::duplicate("enum", enum_def.name));
        }
        schema.add_enum(enum_def);
    }
    for role in roles {
        if schema.roles.iter().any(|r| r.name == role.name) {
            return Err(SchemaError::duplicate("role", role.name));
        }
        schema.roles.push(role);
    }

    let model_names: Vec<SmolStr> = pending_models.iter().map(|m| m.name.clone()).collect();
    for pending in pending_models {
        if schema.models.contains_key(&pending.name) {
            return Err(SchemaError::duplicate("model", pending.name));
        }
        let model = resolve_model(pending, &model_names, &schema)?;
        schema.add_model(model);
    }

    debug!(stats = %schema.stats(), "parsed schema");
    Ok(schema)
}

fn syntax_error(input: &str, err: pest::error::Error<Rule>) -> SchemaError {
    let (offset, len) = match err.location {
        pest::error::InputLocation::Pos(pos) => (pos, 1),
        pest::error::InputLocation::Span((start, end)) => {
            (start, end.saturating_sub(start).max(1))
        }
    };
    SchemaError::syntax(input, offset, len, err.variant.message().to_string())
}

// --- literal helpers ---------------------------------------------------

/// Strip the surrounding quotes of a `string_literal` and resolve
/// `\"` and `\\` escapes.
fn unquote(text: &str) -> String {
    let inner = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(escaped) => out.push(escaped),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn unquote_single(text: &str) -> &str {
    text.trim_start_matches('\'').trim_end_matches('\'')
}

fn unquote_triple(text: &str) -> &str {
    text.strip_prefix("\"\"\"")
        .and_then(|t| t.strip_suffix("\"\"\""))
        .unwrap_or(text)
        .trim()
}

/// The string payload of a `value`, whichever quoting form it used.
fn value_text(pair: &Pair<'_, Rule>) -> String {
    match pair.as_rule() {
        Rule::triple_string => unquote_triple(pair.as_str()).to_string(),
        Rule::string_literal => unquote(pair.as_str()),
        Rule::single_quoted => unquote_single(pair.as_str()).to_string(),
        _ => pair.as_str().to_string(),
    }
}

// --- top-level blocks --------------------------------------------------

fn parse_extension(pair: Pair<'_, Rule>) -> Extension {
    let mut inner = pair.into_inner();
    let name = SmolStr::new(inner.next().map(|p| p.as_str()).unwrap_or_default());
    let version = inner.next().and_then(|spec| {
        spec.into_inner()
            .next()
            .map(|v| SmolStr::new(unquote_single(v.as_str())))
    });
    Extension { name, version }
}

fn parse_enum(pair: Pair<'_, Rule>) -> Enum {
    let mut inner = pair.into_inner();
    let name = SmolStr::new(inner.next().map(|p| p.as_str()).unwrap_or_default());
    let values = inner.map(|p| SmolStr::new(p.as_str())).collect();
    Enum { name, values }
}

fn parse_role(pair: Pair<'_, Rule>) -> SchemaResult<Role> {
    let mut inner = pair.into_inner();
    let name = SmolStr::new(inner.next().map(|p| p.as_str()).unwrap_or_default());

    let mut grants = Vec::new();
    for clause in inner {
        let mut parts = clause.into_inner();
        let privileges_pair = parts.next().ok_or_else(|| {
            SchemaError::invalid_role(name.clone(), "missing privileges list")
        })?;
        let on = parts.next().map(|p| SmolStr::new(p.as_str())).ok_or_else(|| {
            SchemaError::invalid_role(name.clone(), "missing target table")
        })?;

        let privileges = match privileges_pair.as_rule() {
            Rule::string_literal => {
                let text = unquote(privileges_pair.as_str());
                if text.eq_ignore_ascii_case("all") {
                    Privilege::all()
                } else {
                    match Privilege::from_name(&text) {
                        Some(privilege) => vec![privilege],
                        None => {
                            return Err(SchemaError::invalid_role(
                                name,
                                format!("unknown privilege `{text}`"),
                            ));
                        }
                    }
                }
            }
            Rule::privilege_list => {
                let mut list = Vec::new();
                for ident in privileges_pair.into_inner() {
                    let text = ident.as_str();
                    if text.eq_ignore_ascii_case("all") {
                        list.extend(Privilege::all());
                    } else if let Some(privilege) = Privilege::from_name(text) {
                        list.push(privilege);
                    } else {
                        return Err(SchemaError::invalid_role(
                            name,
                            format!("unknown privilege `{text}`"),
                        ));
                    }
                }
                list
            }
            _ => {
                return Err(SchemaError::invalid_role(name, "malformed privileges clause"));
            }
        };

        grants.push(PrivilegeGrant { privileges, on });
    }

    if grants.is_empty() {
        return Err(SchemaError::invalid_role(name, "no privileges clause"));
    }
    Ok(Role { name, grants })
}

// --- model blocks ------------------------------------------------------

struct PendingModel {
    name: SmolStr,
    fields: Vec<PendingField>,
    row_level_security: Option<RowLevelSecurity>,
    policies: Vec<Policy>,
    triggers: Vec<Trigger>,
    indexes: Vec<Index>,
}

struct PendingField {
    name: SmolStr,
    nullable: bool,
    type_name: SmolStr,
    params: Vec<u32>,
    is_list: bool,
    attributes: Vec<FieldAttribute>,
    default_value: Option<String>,
    relation: Option<PendingRelation>,
}

#[derive(Default)]
struct PendingRelation {
    fields: Vec<SmolStr>,
    references: Vec<SmolStr>,
    on_delete: Option<ReferentialAction>,
    on_update: Option<ReferentialAction>,
}

fn parse_model(pair: Pair<'_, Rule>) -> SchemaResult<PendingModel> {
    let mut inner = pair.into_inner();
    let name = SmolStr::new(inner.next().map(|p| p.as_str()).unwrap_or_default());

    let mut model = PendingModel {
        name: name.clone(),
        fields: Vec::new(),
        row_level_security: None,
        policies: Vec::new(),
        triggers: Vec::new(),
        indexes: Vec::new(),
    };

    for item in inner {
        match item.as_rule() {
            Rule::rls_attr => model.row_level_security = Some(parse_rls(item)),
            Rule::policy_attr => model.policies.push(parse_policy(&name, item)?),
            Rule::index_attr => model.indexes.push(parse_index(&name, item)?),
            Rule::trigger_attr => model.triggers.push(parse_trigger(&name, item)?),
            Rule::field_def => model.fields.push(parse_field(&name, item)?),
            _ => unreachable!("unexpected model item"),
        }
    }
    Ok(model)
}

fn parse_rls(pair: Pair<'_, Rule>) -> RowLevelSecurity {
    let mut rls = RowLevelSecurity::default();
    for arg in pair.into_inner() {
        let mut parts = arg.into_inner();
        let key = parts.next().map(|p| p.as_str().to_string()).unwrap_or_default();
        let enabled = parts.next().map(|v| v.as_str() == "true").unwrap_or(false);
        match key.as_str() {
            "enabled" => rls.enabled = enabled,
            "force" => rls.force = enabled,
            _ => {}
        }
    }
    rls
}

fn parse_policy(model: &str, pair: Pair<'_, Rule>) -> SchemaResult<Policy> {
    let mut inner = pair.into_inner();
    let name = SmolStr::new(unquote(inner.next().map(|p| p.as_str()).unwrap_or_default()));

    let mut commands: Option<Vec<PolicyCommand>> = None;
    let mut role: Option<SmolStr> = None;
    let mut using_expr: Option<String> = None;
    let mut check_expr: Option<String> = None;

    if let Some(object) = inner.next() {
        for arg in object.into_inner() {
            let mut parts = arg.into_inner();
            let key = parts.next().map(|p| p.as_str().to_string()).unwrap_or_default();
            let Some(value) = parts.next() else { continue };
            match key.as_str() {
                "for" => {
                    let parsed = parse_policy_commands(model, &name, value)?;
                    commands = Some(parsed);
                }
                "to" => role = Some(SmolStr::new(value_text(&value))),
                "using" => using_expr = Some(value_text(&value)),
                "check" => check_expr = Some(value_text(&value)),
                _ => {}
            }
        }
    }

    let commands = commands.ok_or_else(|| {
        SchemaError::invalid_policy(model, name.clone(), "missing `for` commands")
    })?;
    let role = role.ok_or_else(|| {
        SchemaError::invalid_policy(model, name.clone(), "missing `to` role")
    })?;
    let using_expr = using_expr.ok_or_else(|| {
        SchemaError::invalid_policy(model, name.clone(), "missing `using` expression")
    })?;

    Ok(Policy {
        name,
        commands,
        role,
        using_expr,
        check_expr,
    })
}

fn parse_policy_commands(
    model: &str,
    policy: &str,
    value: Pair<'_, Rule>,
) -> SchemaResult<Vec<PolicyCommand>> {
    let mut names = Vec::new();
    match value.as_rule() {
        Rule::value_array => {
            for entry in value.into_inner() {
                names.push(value_text(&entry));
            }
        }
        _ => names.push(value_text(&value)),
    }

    let mut commands = Vec::new();
    for name in names {
        match PolicyCommand::from_name(&name) {
            Some(command) => commands.push(command),
            None => {
                return Err(SchemaError::invalid_policy(
                    model,
                    policy,
                    format!("unknown command `{name}`"),
                ));
            }
        }
    }
    if commands.is_empty() {
        return Err(SchemaError::invalid_policy(model, policy, "empty `for` commands"));
    }
    Ok(commands)
}

fn parse_index(model: &str, pair: Pair<'_, Rule>) -> SchemaResult<Index> {
    let mut inner = pair.into_inner();
    let fields_pair = inner
        .next()
        .ok_or_else(|| SchemaError::invalid_index(model, "missing field list"))?;
    let fields: Vec<SmolStr> = fields_pair
        .into_inner()
        .map(|p| SmolStr::new(p.as_str()))
        .collect();
    if fields.is_empty() {
        return Err(SchemaError::invalid_index(model, "empty field list"));
    }

    let mut index = Index {
        name: None,
        fields,
        index_type: None,
        unique: false,
        where_clause: None,
    };

    if let Some(object) = inner.next() {
        for arg in object.into_inner() {
            let mut parts = arg.into_inner();
            let key = parts.next().map(|p| p.as_str().to_string()).unwrap_or_default();
            let Some(value) = parts.next() else { continue };
            match key.as_str() {
                "name" => index.name = Some(SmolStr::new(value_text(&value))),
                "type" => {
                    let text = value_text(&value);
                    index.index_type = Some(IndexType::from_name(&text).ok_or_else(|| {
                        SchemaError::invalid_index(model, format!("unknown index type `{text}`"))
                    })?);
                }
                "unique" => index.unique = value.as_str() == "true",
                "where" => index.where_clause = Some(value_text(&value)),
                _ => {}
            }
        }
    }
    Ok(index)
}

fn parse_trigger(model: &str, pair: Pair<'_, Rule>) -> SchemaResult<Trigger> {
    let mut inner = pair.into_inner();
    let event_text = unquote(inner.next().map(|p| p.as_str()).unwrap_or_default());
    let event = TriggerEvent::from_name(&event_text).ok_or_else(|| {
        SchemaError::invalid_trigger(model, format!("unknown trigger event `{event_text}`"))
    })?;

    let mut level = TriggerLevel::Row;
    let mut execute: Option<String> = None;

    if let Some(object) = inner.next() {
        for arg in object.into_inner() {
            let mut parts = arg.into_inner();
            let key = parts.next().map(|p| p.as_str().to_string()).unwrap_or_default();
            let Some(value) = parts.next() else { continue };
            match key.as_str() {
                "level" => {
                    let text = value_text(&value);
                    level = TriggerLevel::from_name(&text).ok_or_else(|| {
                        SchemaError::invalid_trigger(
                            model,
                            format!("unknown trigger level `{text}`"),
                        )
                    })?;
                }
                "execute" => execute = Some(value_text(&value)),
                _ => {}
            }
        }
    }

    let execute = execute.ok_or_else(|| {
        SchemaError::invalid_trigger(model, "missing `execute` body")
    })?;
    Ok(Trigger { event, level, execute })
}

fn parse_field(model: &str, pair: Pair<'_, Rule>) -> SchemaResult<PendingField> {
    let mut inner = pair.into_inner();

    let raw_name = inner.next().map(|p| p.as_str()).unwrap_or_default();
    let (name, nullable) = match raw_name.strip_suffix('?') {
        Some(stripped) => (SmolStr::new(stripped), true),
        None => (SmolStr::new(raw_name), false),
    };

    let type_pair = inner.next().ok_or_else(|| {
        SchemaError::invalid_field_type(model, name.clone(), "")
    })?;
    let mut type_name = SmolStr::default();
    let mut params = Vec::new();
    let mut is_list = false;
    for part in type_pair.into_inner() {
        match part.as_rule() {
            Rule::identifier => type_name = SmolStr::new(part.as_str()),
            Rule::type_params => {
                for number in part.into_inner() {
                    params.push(number.as_str().parse::<u32>().map_err(|_| {
                        SchemaError::invalid_field_type(model, name.clone(), number.as_str())
                    })?);
                }
            }
            Rule::list_marker => is_list = true,
            _ => {}
        }
    }

    let mut field = PendingField {
        name: name.clone(),
        nullable,
        type_name,
        params,
        is_list,
        attributes: Vec::new(),
        default_value: None,
        relation: None,
    };

    for attr in inner {
        match attr.as_rule() {
            Rule::simple_attr => {
                let attr_name = attr
                    .into_inner()
                    .next()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                let parsed = match attr_name.as_str() {
                    "id" => FieldAttribute::Id,
                    "unique" => FieldAttribute::Unique,
                    "updatedAt" => FieldAttribute::UpdatedAt,
                    other => {
                        return Err(SchemaError::invalid_attribute(
                            other,
                            format!("unknown attribute on `{model}.{name}`"),
                        ));
                    }
                };
                field.attributes.push(parsed);
            }
            Rule::default_attr => {
                let expr = attr
                    .into_inner()
                    .next()
                    .map(|p| p.as_str().trim().to_string())
                    .unwrap_or_default();
                field.default_value = Some(expr);
                field.attributes.push(FieldAttribute::Default);
            }
            Rule::relation_attr => {
                field.relation = Some(parse_relation_args(model, &name, attr)?);
            }
            _ => {}
        }
    }
    Ok(field)
}

fn parse_relation_args(
    model: &str,
    field: &str,
    pair: Pair<'_, Rule>,
) -> SchemaResult<PendingRelation> {
    let mut relation = PendingRelation::default();
    for arg in pair.into_inner() {
        let mut parts = arg.into_inner();
        let key = parts.next().map(|p| p.as_str().to_string()).unwrap_or_default();
        let Some(value) = parts.next() else { continue };
        match key.as_str() {
            "fields" => {
                relation.fields = value
                    .into_inner()
                    .map(|p| SmolStr::new(p.as_str()))
                    .collect();
            }
            "references" => {
                relation.references = value
                    .into_inner()
                    .map(|p| SmolStr::new(p.as_str()))
                    .collect();
            }
            "onDelete" => {
                let text = value_text(&value);
                relation.on_delete =
                    Some(ReferentialAction::from_name(&text).ok_or_else(|| {
                        SchemaError::invalid_relation(
                            model,
                            field,
                            format!("unknown referential action `{text}`"),
                        )
                    })?);
            }
            "onUpdate" => {
                let text = value_text(&value);
                relation.on_update =
                    Some(ReferentialAction::from_name(&text).ok_or_else(|| {
                        SchemaError::invalid_relation(
                            model,
                            field,
                            format!("unknown referential action `{text}`"),
                        )
                    })?);
            }
            _ => {}
        }
    }
    Ok(relation)
}

// --- field resolution --------------------------------------------------

/// Classify each pending field as a column or a relation now that every
/// model and enum name is known.
fn resolve_model(
    pending: PendingModel,
    model_names: &[SmolStr],
    schema: &Schema,
) -> SchemaResult<Model> {
    let mut model = Model::new(pending.name.clone());
    model.row_level_security = pending.row_level_security;
    model.policies = pending.policies;
    model.triggers = pending.triggers;
    model.indexes = pending.indexes;

    // Two declarations with the same identity would shadow each other
    // during diffing, so reject them here.
    let mut seen = HashSet::new();
    for policy in &model.policies {
        if !seen.insert(policy.name.clone()) {
            return Err(SchemaError::duplicate("policy", policy.object_name(&pending.name)));
        }
    }
    let mut seen = HashSet::new();
    for index in &model.indexes {
        if !seen.insert(index.fields.join(",")) {
            return Err(SchemaError::duplicate("index", index.resolved_name(&pending.name)));
        }
    }
    let mut seen = HashSet::new();
    for trigger in &model.triggers {
        if !seen.insert(trigger.trigger_name(&pending.name)) {
            return Err(SchemaError::duplicate("trigger", trigger.trigger_name(&pending.name)));
        }
    }

    for field in pending.fields {
        let targets_model = model_names.contains(&field.type_name);

        if let Some(args) = field.relation {
            if !targets_model {
                return Err(SchemaError::invalid_relation(
                    pending.name,
                    field.name,
                    format!("unknown model `{}`", field.type_name),
                ));
            }
            if args.fields.is_empty() || args.references.is_empty() {
                return Err(SchemaError::invalid_relation(
                    pending.name,
                    field.name,
                    "both `fields` and `references` are required",
                ));
            }
            let kind = if field.is_list {
                RelationKind::OneToMany
            } else {
                RelationKind::OneToOne
            };
            model.relations.push(Relation {
                name: field.name,
                model: field.type_name,
                kind,
                fields: args.fields,
                references: args.references,
                on_delete: args.on_delete,
                on_update: args.on_update,
            });
            continue;
        }

        if targets_model {
            // Back-reference with no columns of its own.
            let kind = if field.is_list {
                RelationKind::OneToMany
            } else {
                RelationKind::OneToOne
            };
            model.relations.push(Relation {
                name: field.name,
                model: field.type_name,
                kind,
                fields: Vec::new(),
                references: Vec::new(),
                on_delete: None,
                on_update: None,
            });
            continue;
        }

        if field.is_list {
            return Err(SchemaError::invalid_field_type(
                pending.name,
                field.name,
                format!("{}[]", field.type_name),
            ));
        }

        let field_type = if let Some(scalar) = ScalarType::from_name(&field.type_name) {
            FieldType::Scalar(scalar)
        } else if schema.enums.contains_key(&field.type_name) {
            FieldType::Enum(field.type_name.clone())
        } else {
            FieldType::Custom(field.type_name.clone())
        };

        let (length, precision, scale) = match &field_type {
            FieldType::Scalar(scalar) if scalar.takes_length() => {
                (field.params.first().copied(), None, None)
            }
            FieldType::Scalar(scalar) if scalar.takes_precision() => (
                None,
                field.params.first().copied(),
                field.params.get(1).copied(),
            ),
            _ => (None, None, None),
        };

        model.fields.push(Field {
            name: field.name,
            field_type,
            attributes: field.attributes,
            default_value: field.default_value,
            length,
            precision,
            scale,
            nullable: field.nullable,
        });
    }

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BLOG: &str = r#"
        // A small blog schema.
        extension pgcrypto

        enum UserRole {
            ADMIN
            USER
        }

        model User {
            id UUID @id @default(gen_random_uuid())
            email TEXT @unique
            role UserRole @default('USER')
            bio? TEXT
            posts Post[]
        }

        model Post {
            id UUID @id @default(gen_random_uuid())
            title VARCHAR(255)
            authorId UUID
            author User @relation(fields: [authorId], references: [id], onDelete: "Cascade")
        }
    "#;

    #[test]
    fn test_parse_blog_schema() {
        let schema = parse_schema(BLOG).unwrap();
        assert_eq!(schema.extensions.len(), 1);
        assert_eq!(schema.extensions[0].name, "pgcrypto");
        assert_eq!(schema.extensions[0].version, None);
        assert_eq!(schema.enums.len(), 1);
        assert_eq!(schema.models.len(), 2);
    }

    #[test]
    fn test_parse_fields() {
        let schema = parse_schema(BLOG).unwrap();
        let user = schema.model("User").unwrap();

        let id = user.field("id").unwrap();
        assert!(id.is_id());
        assert_eq!(id.default_value.as_deref(), Some("gen_random_uuid()"));
        assert!(!id.nullable);

        let bio = user.field("bio").unwrap();
        assert!(bio.nullable);

        let role = user.field("role").unwrap();
        assert_eq!(role.field_type, FieldType::Enum("UserRole".into()));
        assert_eq!(role.default_value.as_deref(), Some("'USER'"));
    }

    #[test]
    fn test_parse_varchar_length() {
        let schema = parse_schema(BLOG).unwrap();
        let title = schema.model("Post").unwrap().field("title").unwrap();
        assert_eq!(title.length, Some(255));
        assert_eq!(title.field_type, FieldType::Scalar(ScalarType::Varchar));
    }

    #[test]
    fn test_parse_relations() {
        let schema = parse_schema(BLOG).unwrap();

        let author = schema.model("Post").unwrap().relation("author").unwrap();
        assert_eq!(author.kind, RelationKind::OneToOne);
        assert_eq!(author.fields, vec![SmolStr::new("authorId")]);
        assert_eq!(author.references, vec![SmolStr::new("id")]);
        assert_eq!(author.on_delete, Some(ReferentialAction::Cascade));
        assert!(author.is_foreign_key());

        let posts = schema.model("User").unwrap().relation("posts").unwrap();
        assert_eq!(posts.kind, RelationKind::OneToMany);
        assert!(!posts.is_foreign_key());
    }

    #[test]
    fn test_parse_extension_version() {
        let schema = parse_schema("extension pgcrypto (version='1.3')").unwrap();
        assert_eq!(schema.extensions[0].version.as_deref(), Some("1.3"));
    }

    #[test]
    fn test_parse_role() {
        let schema = parse_schema(
            r#"
            model Orders {
                id UUID @id
            }
            role app_user {
                privileges: [select, insert] on Orders
                privileges: "all" on Orders
            }
            "#,
        )
        .unwrap();

        let role = schema.role("app_user").unwrap();
        assert_eq!(role.grants.len(), 2);
        assert_eq!(role.grants[0].privileges, vec![Privilege::Select, Privilege::Insert]);
        assert_eq!(role.grants[1].privileges.len(), 4);
    }

    #[test]
    fn test_role_without_privileges_is_invalid() {
        let err = parse_schema("role empty { }").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidRole { .. }));
        assert!(err.to_string().contains("Invalid role definition"));
    }

    #[test]
    fn test_parse_rls_and_policy() {
        let schema = parse_schema(
            r#"
            model Orders {
                id UUID @id
                userId UUID
                @@rowLevelSecurity(enabled: true, force: false)
                @@policy("owner_only", {
                    for: [select, update],
                    to: "app_user",
                    using: "userId = current_setting('app.user_id')::uuid"
                })
            }
            "#,
        )
        .unwrap();

        let orders = schema.model("Orders").unwrap();
        let rls = orders.row_level_security.unwrap();
        assert!(rls.enabled);
        assert!(!rls.force);

        let policy = &orders.policies[0];
        assert_eq!(policy.name, "owner_only");
        assert_eq!(policy.commands, vec![PolicyCommand::Select, PolicyCommand::Update]);
        assert_eq!(policy.role, "app_user");
        assert!(policy.using_expr.contains("current_setting"));
        assert_eq!(policy.check_expr, None);
    }

    #[test]
    fn test_parse_policy_for_all() {
        let schema = parse_schema(
            r#"
            model Orders {
                id UUID @id
                @@policy("everything", { for: "all", to: "admin", using: "true" })
            }
            "#,
        )
        .unwrap();
        let policy = &schema.model("Orders").unwrap().policies[0];
        assert_eq!(policy.commands, vec![PolicyCommand::All]);
    }

    #[test]
    fn test_policy_missing_using_is_invalid() {
        let err = parse_schema(
            r#"
            model Orders {
                id UUID @id
                @@policy("broken", { for: "all", to: "admin" })
            }
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidPolicy { .. }));
    }

    #[test]
    fn test_parse_index() {
        let schema = parse_schema(
            r#"
            model Inventory {
                id UUID @id
                sku TEXT
                warehouseId UUID
                @@index([sku, warehouseId], { unique: true })
                @@index([sku], { name: "inv_sku_gin", type: gin, where: "sku IS NOT NULL" })
            }
            "#,
        )
        .unwrap();

        let inventory = schema.model("Inventory").unwrap();
        let composite = &inventory.indexes[0];
        assert!(composite.unique);
        assert_eq!(composite.resolved_name("Inventory"), "idx_Inventory_sku_warehouseId");

        let partial = &inventory.indexes[1];
        assert_eq!(partial.name.as_deref(), Some("inv_sku_gin"));
        assert_eq!(partial.index_type, Some(IndexType::Gin));
        assert_eq!(partial.where_clause.as_deref(), Some("sku IS NOT NULL"));
    }

    #[test]
    fn test_parse_trigger() {
        let schema = parse_schema(
            r#"
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
            "#,
        )
        .unwrap();

        let trigger = &schema.model("User").unwrap().triggers[0];
        assert_eq!(trigger.event, TriggerEvent::BeforeUpdate);
        assert_eq!(trigger.level, TriggerLevel::Row);
        assert!(trigger.execute.contains("NEW.\"updatedAt\" = now();"));
        assert!(trigger.execute.contains("RETURN NEW;"));
    }

    #[test]
    fn test_parse_trigger_with_sql_spellings() {
        let schema = parse_schema(
            r#"
            model User {
                id UUID @id
                @@trigger("BEFORE UPDATE", {
                    level: "FOR EACH ROW",
                    execute: """
                        RETURN NEW;
                    """
                })
            }
            "#,
        )
        .unwrap();

        let trigger = &schema.model("User").unwrap().triggers[0];
        assert_eq!(trigger.event, TriggerEvent::BeforeUpdate);
        assert_eq!(trigger.level, TriggerLevel::Row);
    }

    #[test]
    fn test_relation_missing_references_is_invalid() {
        let err = parse_schema(
            r#"
            model User {
                id UUID @id
            }
            model Post {
                id UUID @id
                authorId UUID
                author User @relation(fields: [authorId])
            }
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidRelation { .. }));
    }

    #[test]
    fn test_list_of_scalar_is_invalid() {
        let err = parse_schema(
            r#"
            model User {
                id UUID @id
                tags TEXT[]
            }
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidFieldType { .. }));
    }

    #[test]
    fn test_duplicate_model_is_rejected() {
        let err = parse_schema("model User { id UUID @id }\nmodel User { id UUID @id }")
            .unwrap_err();
        assert!(matches!(err, SchemaError::Duplicate { .. }));
    }

    #[test]
    fn test_duplicate_index_signature_is_rejected() {
        let err = parse_schema(
            r#"
            model User {
                id UUID @id
                email TEXT
                @@index([email])
                @@index([email], { unique: true })
            }
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::Duplicate { .. }));
        assert!(err.to_string().contains("idx_User_email"));
    }

    #[test]
    fn test_duplicate_policy_name_is_rejected() {
        let err = parse_schema(
            r#"
            model Orders {
                id UUID @id
                @@policy("mine", { for: "all", to: "a", using: "true" })
                @@policy("mine", { for: "select", to: "b", using: "false" })
            }
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::Duplicate { .. }));
    }

    #[test]
    fn test_syntax_error_reported() {
        let err = parse_schema("model { }").unwrap_err();
        assert!(matches!(err, SchemaError::SyntaxError { .. }));
    }

    #[test]
    fn test_nullable_id_is_representable() {
        // `id? UUID @id` keeps nullable = true in the model even though
        // generation renders the primary key NOT NULL regardless.
        let schema = parse_schema("model User { id? UUID @id }").unwrap();
        let id = schema.model("User").unwrap().field("id").unwrap();
        assert!(id.is_id());
        assert!(id.nullable);
    }

    #[test]
    fn test_escaped_quotes_in_policy_expression() {
        let schema = parse_schema(
            r#"
            model Orders {
                id UUID @id
                @@policy("mine", {
                    for: "all",
                    to: "app_user",
                    using: "\"userId\" = current_setting('app.user_id')::uuid"
                })
            }
            "#,
        )
        .unwrap();
        let policy = &schema.model("Orders").unwrap().policies[0];
        assert_eq!(
            policy.using_expr,
            "\"userId\" = current_setting('app.user_id')::uuid"
        );
    }

    #[test]
    fn test_parse_is_pure() {
        let first = parse_schema(BLOG).unwrap();
        let second = parse_schema(BLOG).unwrap();
        assert_eq!(first, second);
    }
}

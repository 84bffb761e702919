//! Pest grammar parser for strata schema files.

use pest_derive::Parser;

/// The strata schema parser.
#[derive(Parser)]
#[grammar = "parser/strata.pest"]
pub struct StrataParser;

#[cfg(test)]
mod tests {
    use super::*;
    use pest::Parser;

    #[test]
    fn test_parse_identifier() {
        let result = StrataParser::parse(Rule::identifier, "User");
        assert!(result.is_ok());
    }

    #[test]
    fn test_parse_field_name_with_marker() {
        let result = StrataParser::parse(Rule::field_name, "bio?");
        assert!(result.is_ok());
    }

    #[test]
    fn test_parse_field_type() {
        assert!(StrataParser::parse(Rule::field_type, "VARCHAR(255)").is_ok());
        assert!(StrataParser::parse(Rule::field_type, "DECIMAL(10, 2)").is_ok());
        assert!(StrataParser::parse(Rule::field_type, "Post[]").is_ok());
    }

    #[test]
    fn test_parse_default_attr() {
        assert!(StrataParser::parse(Rule::default_attr, "@default(gen_random_uuid())").is_ok());
        assert!(StrataParser::parse(Rule::default_attr, "@default('USER')").is_ok());
        assert!(StrataParser::parse(Rule::default_attr, "@default(0)").is_ok());
    }

    #[test]
    fn test_parse_relation_attr() {
        let result = StrataParser::parse(
            Rule::relation_attr,
            "@relation(fields: [authorId], references: [id], onDelete: \"CASCADE\")",
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_parse_extension() {
        assert!(StrataParser::parse(Rule::extension_def, "extension pgcrypto").is_ok());
        assert!(
            StrataParser::parse(Rule::extension_def, "extension pgcrypto (version='1.3')").is_ok()
        );
    }

    #[test]
    fn test_parse_enum() {
        let input = "enum Role { ADMIN USER }";
        assert!(StrataParser::parse(Rule::enum_def, input).is_ok());
    }

    #[test]
    fn test_parse_role() {
        let input = r#"role app_user {
            privileges: [select, insert] on User
            privileges: "all" on Post
        }"#;
        assert!(StrataParser::parse(Rule::role_def, input).is_ok());
    }

    #[test]
    fn test_parse_model() {
        let input = r#"model User {
            id UUID @id @default(gen_random_uuid())
            email VARCHAR(255) @unique
            name? TEXT
        }"#;
        let result = StrataParser::parse(Rule::model_def, input);
        assert!(result.is_ok(), "failed to parse model: {:?}", result.err());
    }

    #[test]
    fn test_parse_trigger_attr() {
        let input = r#"@@trigger("BEFORE INSERT", { level: "FOR EACH ROW", execute: """
            NEW.updated_at := NOW();
            RETURN NEW;
        """ })"#;
        let result = StrataParser::parse(Rule::trigger_attr, input);
        assert!(result.is_ok(), "failed to parse trigger: {:?}", result.err());
    }
}

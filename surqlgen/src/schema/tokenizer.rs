use super::types::{FieldDefinition, Scope};

/// How a single word of a declaration statement is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// A clause keyword; following words accumulate into this scope.
    Scope(Scope),
    /// A keyword that carries no text and leaves the scope unchanged.
    Neutral,
    /// Plain text.
    Word,
}

/// Scanner state while walking the words of one statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Neutral,
    Accumulating(Scope),
}

/// Classify one word. Keyword matching is case-insensitive.
pub fn classify(word: &str) -> Classification {
    match word.to_uppercase().as_str() {
        "DEFINE" | "ON" => Classification::Neutral,
        "FIELD" => Classification::Scope(Scope::Name),
        "TABLE" => Classification::Scope(Scope::Table),
        "TYPE" => Classification::Scope(Scope::FieldType),
        "VALUE" => Classification::Scope(Scope::Value),
        "DEFAULT" => Classification::Scope(Scope::DefaultValue),
        "ASSERT" => Classification::Scope(Scope::Assert),
        "INSIDE" => Classification::Scope(Scope::Inside),
        _ => Classification::Word,
    }
}

/// Turn one `DEFINE FIELD` statement into a [`FieldDefinition`].
///
/// The line is trimmed and a single trailing `;` dropped, then split on
/// single spaces. Text seen before the first clause keyword is discarded.
pub fn tokenize(statement: &str) -> FieldDefinition {
    let trimmed = statement.trim();
    let clean = trimmed.strip_suffix(';').unwrap_or(trimmed);

    let mut result = FieldDefinition::default();
    let mut state = ScanState::Neutral;

    for word in clean.split(' ') {
        match (classify(word), state) {
            (Classification::Scope(scope), _) => state = ScanState::Accumulating(scope),
            (Classification::Neutral, _) => {}
            (Classification::Word, ScanState::Accumulating(scope)) => {
                result.accumulate(scope, word);
            }
            (Classification::Word, ScanState::Neutral) => {
                log::debug!("Dropping '{word}' before any clause keyword in: {clean}");
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn field(name: &str, table: &str) -> FieldDefinition {
        FieldDefinition {
            name: name.into(),
            table: table.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_classify_keywords() {
        assert_eq!(classify("DEFINE"), Classification::Neutral);
        assert_eq!(classify("on"), Classification::Neutral);
        assert_eq!(classify("Field"), Classification::Scope(Scope::Name));
        assert_eq!(classify("table"), Classification::Scope(Scope::Table));
        assert_eq!(classify("TYPE"), Classification::Scope(Scope::FieldType));
        assert_eq!(classify("value"), Classification::Scope(Scope::Value));
        assert_eq!(classify("DEFAULT"), Classification::Scope(Scope::DefaultValue));
        assert_eq!(classify("assert"), Classification::Scope(Scope::Assert));
        assert_eq!(classify("INSIDE"), Classification::Scope(Scope::Inside));
    }

    #[test]
    fn test_classify_plain_words() {
        assert_eq!(classify("email"), Classification::Word);
        assert_eq!(classify("$value"), Classification::Word);
        assert_eq!(classify(""), Classification::Word);
        assert_eq!(classify("SCHEMAFULL"), Classification::Word);
    }

    #[test]
    fn test_tokenize_minimal() {
        assert_eq!(
            tokenize("DEFINE FIELD email ON TABLE user"),
            field("email", "user")
        );
        assert_eq!(
            tokenize("DEFINE FIELD address.street ON TABLE person"),
            field("address.street", "person")
        );
    }

    #[test]
    fn test_tokenize_type_and_assert() {
        let def = tokenize(
            "DEFINE FIELD email ON TABLE user TYPE string ASSERT string::is::email($value)",
        );
        assert_eq!(
            def,
            FieldDefinition {
                name: "email".into(),
                table: "user".into(),
                field_type: Some("string".into()),
                assert: Some("string::is::email($value)".into()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_tokenize_is_case_insensitive() {
        assert_eq!(
            tokenize("define field X on table Y"),
            tokenize("DEFINE FIELD X ON TABLE Y")
        );
    }

    #[test]
    fn test_tokenize_keeps_value_casing() {
        let def = tokenize("define field createdAt on table Post type datetime");
        assert_eq!(def.name, "createdAt");
        assert_eq!(def.table, "Post");
        assert_eq!(def.field_type.as_deref(), Some("datetime"));
    }

    #[test]
    fn test_tokenize_strips_terminator_and_whitespace() {
        let def = tokenize("  DEFINE FIELD age ON TABLE user TYPE int DEFAULT 18;  ");
        assert_eq!(def.default_value.as_deref(), Some("18"));
        assert_eq!(def.field_type.as_deref(), Some("int"));
    }

    #[test]
    fn test_tokenize_collapses_repeated_spaces() {
        let def = tokenize("DEFINE FIELD  tags   ON TABLE post TYPE   array<string>   ASSERT  $value   != NONE");
        assert_eq!(def.name, "tags");
        assert_eq!(def.field_type.as_deref(), Some("array<string>"));
        assert_eq!(def.assert.as_deref(), Some("$value != NONE"));
    }

    #[test]
    fn test_tokenize_multi_word_clauses_any_order() {
        let def = tokenize(
            "DEFINE FIELD role ON TABLE user DEFAULT 'member' ASSERT $value INSIDE ['admin', 'member'] TYPE string",
        );
        assert_eq!(def.default_value.as_deref(), Some("'member'"));
        assert_eq!(def.assert.as_deref(), Some("$value"));
        assert_eq!(def.inside.as_deref(), Some("['admin', 'member']"));
        assert_eq!(def.field_type.as_deref(), Some("string"));
    }

    #[test]
    fn test_tokenize_value_clause() {
        let def = tokenize("DEFINE FIELD updated ON TABLE post TYPE datetime VALUE time::now()");
        assert_eq!(def.value.as_deref(), Some("time::now()"));
    }

    #[test]
    fn test_tokenize_drops_words_before_first_scope() {
        let def = tokenize("DEFINE OVERWRITE FIELD name ON TABLE user");
        assert_eq!(def, field("name", "user"));
    }

    #[test]
    fn test_tokenize_repeated_keyword_keeps_accumulating() {
        let def = tokenize("DEFINE FIELD n ON TABLE t TYPE string TYPE int");
        assert_eq!(def.field_type.as_deref(), Some("string int"));
    }

    #[test]
    fn test_tokenize_is_idempotent_on_rendered_output() {
        let lines = [
            "DEFINE FIELD email ON TABLE user TYPE string ASSERT string::is::email($value)",
            "define field  age on table user  type int default 18",
            "DEFINE FIELD tags.* ON TABLE post TYPE string INSIDE ['a', 'b']",
            "DEFINE FIELD updated ON TABLE post VALUE time::now() TYPE datetime",
        ];
        for line in lines {
            let once = tokenize(line);
            let twice = tokenize(&once.to_statement());
            assert_eq!(once, twice, "not idempotent for: {line}");
        }
    }

    #[test]
    fn test_tokenize_empty_line() {
        assert_eq!(tokenize(""), FieldDefinition::default());
        assert_eq!(tokenize(";"), FieldDefinition::default());
    }
}

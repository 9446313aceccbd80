use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single `DEFINE FIELD` statement broken into its clauses.
///
/// `name` and `table` are always present (empty when the statement never
/// named them); every other clause is `None` unless its keyword appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub name: String,
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assert: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inside: Option<String>,
}

impl FieldDefinition {
    /// Append one raw word to the slot addressed by `scope`.
    ///
    /// Words are joined with a single space and the result trimmed, so runs
    /// of blanks in the source collapse and a repeated keyword keeps adding
    /// to the same slot.
    pub fn accumulate(&mut self, scope: Scope, word: &str) {
        let slot = match scope {
            Scope::Name => &mut self.name,
            Scope::Table => &mut self.table,
            Scope::FieldType => self.field_type.get_or_insert_with(String::new),
            Scope::Value => self.value.get_or_insert_with(String::new),
            Scope::DefaultValue => self.default_value.get_or_insert_with(String::new),
            Scope::Assert => self.assert.get_or_insert_with(String::new),
            Scope::Inside => self.inside.get_or_insert_with(String::new),
        };
        let joined = format!("{slot} {word}");
        *slot = joined.trim().to_string();
    }

    /// Read the text accumulated for `scope`, if any.
    pub fn get(&self, scope: Scope) -> Option<&str> {
        match scope {
            Scope::Name => Some(self.name.as_str()),
            Scope::Table => Some(self.table.as_str()),
            Scope::FieldType => self.field_type.as_deref(),
            Scope::Value => self.value.as_deref(),
            Scope::DefaultValue => self.default_value.as_deref(),
            Scope::Assert => self.assert.as_deref(),
            Scope::Inside => self.inside.as_deref(),
        }
    }

    /// Render back to a single-spaced `DEFINE FIELD` statement.
    pub fn to_statement(&self) -> String {
        let mut out = format!("DEFINE FIELD {} ON TABLE {}", self.name, self.table);
        for scope in Scope::CLAUSES {
            if let Some(text) = self.get(scope) {
                out.push(' ');
                out.push_str(scope.keyword());
                if !text.is_empty() {
                    out.push(' ');
                    out.push_str(text);
                }
            }
        }
        out
    }
}

/// Named slot that non-keyword words accumulate into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Name,
    Table,
    FieldType,
    Value,
    DefaultValue,
    Assert,
    Inside,
}

impl Scope {
    /// Optional clauses, in the order they are rendered.
    pub const CLAUSES: [Scope; 5] = [
        Scope::FieldType,
        Scope::Value,
        Scope::DefaultValue,
        Scope::Assert,
        Scope::Inside,
    ];

    /// The SurrealQL keyword that opens this scope.
    pub fn keyword(self) -> &'static str {
        match self {
            Scope::Name => "FIELD",
            Scope::Table => "TABLE",
            Scope::FieldType => "TYPE",
            Scope::Value => "VALUE",
            Scope::DefaultValue => "DEFAULT",
            Scope::Assert => "ASSERT",
            Scope::Inside => "INSIDE",
        }
    }

    /// The record key this scope fills (`fieldType`, `defaultValue`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Name => "name",
            Scope::Table => "table",
            Scope::FieldType => "fieldType",
            Scope::Value => "value",
            Scope::DefaultValue => "defaultValue",
            Scope::Assert => "assert",
            Scope::Inside => "inside",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = crate::SurqlGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Scope::Name),
            "table" => Ok(Scope::Table),
            "fieldType" => Ok(Scope::FieldType),
            "value" => Ok(Scope::Value),
            "defaultValue" => Ok(Scope::DefaultValue),
            "assert" => Ok(Scope::Assert),
            "inside" => Ok(Scope::Inside),
            other => Err(crate::SurqlGenError::Schema(format!(
                "Unknown field definition key '{other}'"
            ))),
        }
    }
}

/// Raw `DEFINE TABLE` text for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub name: String,
    #[serde(default)]
    pub definition: String,
}

impl TableDefinition {
    pub fn new(name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition: definition.into(),
        }
    }

    /// A table is strict when its definition declares `SCHEMAFULL`.
    pub fn is_strict(&self) -> bool {
        self.definition.to_uppercase().contains("SCHEMAFULL")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_accumulate_joins_with_single_space() {
        let mut def = FieldDefinition::default();
        def.accumulate(Scope::Assert, "$value");
        def.accumulate(Scope::Assert, "");
        def.accumulate(Scope::Assert, "!=");
        def.accumulate(Scope::Assert, "NONE");
        assert_eq!(def.assert.as_deref(), Some("$value != NONE"));
    }

    #[test]
    fn test_accumulate_into_name_and_table() {
        let mut def = FieldDefinition::default();
        def.accumulate(Scope::Name, "email");
        def.accumulate(Scope::Table, "user");
        assert_eq!(def.name, "email");
        assert_eq!(def.table, "user");
        assert!(def.field_type.is_none());
    }

    #[test]
    fn test_to_statement() {
        let def = FieldDefinition {
            name: "age".into(),
            table: "user".into(),
            field_type: Some("int".into()),
            default_value: Some("18".into()),
            ..Default::default()
        };
        assert_eq!(
            def.to_statement(),
            "DEFINE FIELD age ON TABLE user TYPE int DEFAULT 18"
        );
    }

    #[test]
    fn test_scope_from_str() {
        assert_eq!("fieldType".parse::<Scope>().unwrap(), Scope::FieldType);
        assert_eq!("defaultValue".parse::<Scope>().unwrap(), Scope::DefaultValue);
        assert!("permissions".parse::<Scope>().is_err());
    }

    #[test]
    fn test_field_definition_serializes_camel_case() {
        let def = FieldDefinition {
            name: "email".into(),
            table: "user".into(),
            field_type: Some("string".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "name": "email", "table": "user", "fieldType": "string" })
        );
    }

    #[test]
    fn test_table_strictness() {
        assert!(TableDefinition::new("user", "DEFINE TABLE user SCHEMAFULL").is_strict());
        assert!(TableDefinition::new("user", "define table user schemafull").is_strict());
        assert!(!TableDefinition::new("user", "DEFINE TABLE user SCHEMALESS").is_strict());
        assert!(!TableDefinition::new("user", "").is_strict());
    }
}

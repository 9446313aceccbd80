//! Reading table and field declarations out of SurrealQL text.

use crate::error::Result;
use crate::schema::{classify, tokenize, Classification, TableDefinition};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Raw declarations for one table, as handed to the generator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableInfo {
    pub name: String,
    /// Raw `DEFINE TABLE` statement; empty when the table was never defined.
    pub definition: String,
    /// Raw `DEFINE FIELD` statements in declaration order.
    pub fields: Vec<String>,
}

impl TableInfo {
    pub fn table_definition(&self) -> TableDefinition {
        TableDefinition::new(self.name.clone(), self.definition.clone())
    }

    pub fn is_strict(&self) -> bool {
        self.table_definition().is_strict()
    }
}

/// Anything that can list the tables of a database together with their raw
/// field declarations.
pub trait MetadataSource {
    fn tables(&self) -> Result<Vec<TableInfo>>;
}

/// A [`MetadataSource`] over the text of a `.surql` schema file.
#[derive(Debug, Clone)]
pub struct SurqlSource {
    content: String,
}

impl SurqlSource {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        log::debug!("Read {} bytes from {}", content.len(), path.display());
        Ok(Self::new(content))
    }
}

impl MetadataSource for SurqlSource {
    fn tables(&self) -> Result<Vec<TableInfo>> {
        let mut tables: Vec<TableInfo> = Vec::new();

        for statement in split_statements(&self.content) {
            if let Some(caps) = table_re().captures(&statement) {
                let name = caps[1].to_string();
                entry(&mut tables, &name).definition = statement.clone();
            } else if field_re().is_match(&statement) {
                let statement = normalize_field_statement(&statement);
                let table = tokenize(&statement).table;
                if table.is_empty() {
                    log::warn!("Ignoring field statement without a table: {statement}");
                    continue;
                }
                entry(&mut tables, &table).fields.push(statement);
            } else {
                log::debug!("Skipping statement: {statement}");
            }
        }

        Ok(tables)
    }
}

fn entry<'a>(tables: &'a mut Vec<TableInfo>, name: &str) -> &'a mut TableInfo {
    let index = match tables.iter().position(|t| t.name == name) {
        Some(index) => index,
        None => {
            tables.push(TableInfo {
                name: name.to_string(),
                ..Default::default()
            });
            tables.len() - 1
        }
    };
    &mut tables[index]
}

fn table_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^DEFINE TABLE (?:IF NOT EXISTS |OVERWRITE )?([^\s;]+)")
            .expect("valid table regex")
    })
}

fn field_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^DEFINE FIELD ").expect("valid field regex"))
}

fn comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*(--|//|#).*$").expect("valid comment regex"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

/// Split SurrealQL text into single-line statements.
///
/// Line comments are dropped, statements are split on `;`, and every run of
/// whitespace (newlines included) becomes one space. A `;` inside a string
/// literal also ends a statement.
pub fn split_statements(content: &str) -> Vec<String> {
    let without_comments = comment_re().replace_all(content, "");
    without_comments
        .split(';')
        .map(|s| whitespace_re().replace_all(s.trim(), " ").into_owned())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Field clauses the tokenizer has no slot for. Flags stand alone; the
/// others swallow words up to the next clause keyword.
const IGNORED_FLAGS: [&str; 2] = ["FLEXIBLE", "READONLY"];
const IGNORED_CLAUSES: [&str; 2] = ["PERMISSIONS", "COMMENT"];

/// Rewrite field statements into the `DEFINE FIELD <path> ON TABLE <t>` form
/// the tokenizer expects: drops `IF NOT EXISTS`/`OVERWRITE`, expands the
/// `ON <t>` shorthand and removes `FLEXIBLE`, `READONLY`, `PERMISSIONS ...`
/// and `COMMENT ...` clauses.
pub fn normalize_field_statement(statement: &str) -> String {
    let words: Vec<&str> = statement.split(' ').collect();
    let mut out: Vec<&str> = Vec::with_capacity(words.len() + 1);
    let mut index = 0;
    let mut seen_on = false;
    let mut in_clauses = false;
    let mut skipping_clause = false;

    while index < words.len() {
        let word = words[index];
        let upper = word.to_uppercase();
        if in_clauses {
            if IGNORED_FLAGS.contains(&upper.as_str()) {
                index += 1;
                continue;
            }
            if IGNORED_CLAUSES.contains(&upper.as_str()) {
                skipping_clause = true;
                index += 1;
                continue;
            }
            if skipping_clause {
                if matches!(classify(word), Classification::Scope(_)) {
                    skipping_clause = false;
                } else {
                    index += 1;
                    continue;
                }
            }
        }
        if index == 2 && upper == "OVERWRITE" {
            index += 1;
            continue;
        }
        if index == 2
            && upper == "IF"
            && words.get(3).map(|w| w.to_uppercase()).as_deref() == Some("NOT")
            && words.get(4).map(|w| w.to_uppercase()).as_deref() == Some("EXISTS")
        {
            index += 3;
            continue;
        }
        out.push(word);
        if seen_on && upper != "ON" && upper != "TABLE" {
            // Everything after the table name is a clause.
            in_clauses = true;
        }
        if !seen_on && upper == "ON" {
            seen_on = true;
            let next = words.get(index + 1).map(|w| w.to_uppercase());
            if next.as_deref() != Some("TABLE") {
                out.push("TABLE");
            }
        }
        index += 1;
    }

    out.join(" ")
}

//! surqlgen code generation - turns SurrealQL `DEFINE` statements into zod
//! schemas and TypeScript client helpers.
//!
//! The main entry point is [`generate`], which reads the schema file named in
//! a [`Config`] and writes the complete output folder. [`generate_from_schema_str`]
//! does the same work in memory.

pub mod client_gen;
pub mod file_gen;
pub mod schema_gen;
pub mod type_utils;

use serde::Serialize;
use std::path::Path;
use surqlgen::{Config, MetadataSource, Result, SurqlSource};

pub use schema_gen::{generate_table_schema, SchemaKind, TableSchema};

/// Folder (under the output folder) holding files rewritten on every run.
pub const GENERATED_FOLDER: &str = "_generated";
/// Folder (under the output folder) holding generated client wrappers.
pub const CLIENT_FOLDER: &str = "client";

/// Outcome of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub generated: Vec<String>,
    pub failed: Vec<TableFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableFailure {
    pub table: String,
    pub error: String,
}

impl GenerationReport {
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }

    fn fail(&mut self, table: &str, error: impl ToString) {
        let error = error.to_string();
        log::error!("[{table}]: {error}");
        self.failed.push(TableFailure {
            table: table.to_string(),
            error,
        });
    }
}

/// Generate the full output folder for the schema file named in `config`.
pub fn generate(config: &Config) -> Result<GenerationReport> {
    let source = SurqlSource::from_file(&config.schema_file)?;
    generate_from_source(&source, config)
}

/// Generate the full output folder from any [`MetadataSource`].
///
/// A table that fails is reported and skipped; the remaining tables are
/// still written.
pub fn generate_from_source(
    source: &dyn MetadataSource,
    config: &Config,
) -> Result<GenerationReport> {
    let out = &config.output_folder;
    let generated_dir = out.join(GENERATED_FOLDER);
    log::info!("Generating schema in {}", generated_dir.display());

    std::fs::create_dir_all(&generated_dir)?;
    std::fs::write(
        generated_dir.join("recordSchema.ts"),
        file_gen::record_schema_file(&config.lib),
    )?;

    let mut report = GenerationReport::default();
    for info in source.tables()? {
        let schema = match generate_table_schema(&info) {
            Ok(schema) => schema,
            Err(e) => {
                report.fail(&info.name, e);
                continue;
            }
        };
        match write_table(out, &schema, config) {
            Ok(()) => report.generated.push(info.name.clone()),
            Err(e) => report.fail(&info.name, e),
        }
    }

    Ok(report)
}

/// Generate the schema declarations for every table in a SurrealQL string,
/// without touching the filesystem.
pub fn generate_from_schema_str(surql: &str) -> Result<Vec<Result<TableSchema>>> {
    let source = SurqlSource::new(surql);
    Ok(source
        .tables()?
        .iter()
        .map(generate_table_schema)
        .collect())
}

fn write_table(out: &Path, schema: &TableSchema, config: &Config) -> Result<()> {
    let name = type_utils::table_camel_name(&schema.table);

    let table_dir = out.join(GENERATED_FOLDER).join(&name);
    log::info!("[{name}]: {}", table_dir.display());
    if table_dir.exists() {
        std::fs::remove_dir_all(&table_dir)?;
    }
    std::fs::create_dir_all(&table_dir)?;
    std::fs::write(
        table_dir.join(format!("{name}SchemaGen.ts")),
        file_gen::schema_gen_file(schema),
    )?;
    log::info!("[{name}]: {name}SchemaGen.ts");

    let schema_dir = out.join(client_gen::SCHEMA_FOLDER).join(&name);
    std::fs::create_dir_all(&schema_dir)?;
    write_once(
        &schema_dir.join(format!("{name}Schema.ts")),
        &file_gen::custom_schema_file(&schema.table),
    )?;
    write_once(
        &schema_dir.join(format!("{name}Types.ts")),
        &file_gen::custom_types_file(&config.lib, &schema.table),
    )?;

    if config.generate_client {
        let client_dir = out.join(CLIENT_FOLDER).join(&name);
        std::fs::create_dir_all(&client_dir)?;
        for file in client_gen::generate_client_files(&config.lib, &schema.table) {
            std::fs::write(client_dir.join(&file.file_name), file.content)?;
        }
        log::info!("[{name}]: client written to {}", client_dir.display());
    }

    Ok(())
}

/// Write `content` unless the file already exists (user customizations win).
fn write_once(path: &Path, content: &str) -> Result<bool> {
    if path.exists() {
        log::info!("{} already exists, keeping it", path.display());
        return Ok(false);
    }
    std::fs::write(path, content)?;
    log::info!("{} written", path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use surqlgen::TableInfo;

    const TEST_SCHEMA: &str = r#"
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD name ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string ASSERT string::is::email($value);
DEFINE FIELD age ON TABLE user TYPE number DEFAULT 18;
DEFINE FIELD address ON TABLE user TYPE object;
DEFINE FIELD address.street ON TABLE user TYPE string;
DEFINE FIELD address.zip ON TABLE user TYPE string;

DEFINE TABLE post SCHEMALESS;
DEFINE FIELD title ON TABLE post TYPE string;
DEFINE FIELD author ON TABLE post TYPE record<user>;
DEFINE FIELD tags ON TABLE post TYPE array;
DEFINE FIELD tags.* ON TABLE post TYPE string;
DEFINE FIELD updated ON TABLE post TYPE datetime VALUE time::now();
"#;

    struct FixedSource(Vec<TableInfo>);

    impl MetadataSource for FixedSource {
        fn tables(&self) -> Result<Vec<TableInfo>> {
            Ok(self.0.clone())
        }
    }

    fn config_for(dir: &Path) -> Config {
        Config {
            output_folder: dir.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_from_schema_str() {
        let results = generate_from_schema_str(TEST_SCHEMA).unwrap();
        assert_eq!(results.len(), 2);

        let user = results[0].as_ref().unwrap();
        assert_eq!(user.table, "user");
        assert!(user.strict);
        assert_eq!(
            user.output,
            [
                "const userOutputSchemaGen = z.object({",
                "  address: z.object({",
                "    street: z.string(),",
                "    zip: z.string(),",
                "  }),",
                "  age: z.number().default(18),",
                "  email: z.string().email(),",
                "  name: z.string(),",
                "})",
            ]
            .join("\n")
        );

        let post = results[1].as_ref().unwrap();
        assert!(!post.strict);
        assert!(post.output.ends_with(".passthrough()"));
        assert!(post.output.contains("author: recordId(\"user\"),"));
        assert!(post.output.contains("tags: z.array(z.string()),"));
        assert!(post.output.contains("updated: z.string().datetime(),"));
        assert!(!post.input.contains("updated"));
    }

    #[test]
    fn test_unsupported_clauses_keep_table_and_type() {
        let results = generate_from_schema_str(
            "DEFINE TABLE user SCHEMAFULL;
             DEFINE FIELD meta ON TABLE user FLEXIBLE TYPE object;
             DEFINE FIELD name ON TABLE user TYPE string PERMISSIONS FULL;",
        )
        .unwrap();
        assert_eq!(results.len(), 1);
        let user = results[0].as_ref().unwrap();
        assert_eq!(user.table, "user");
        assert!(user.output.contains("name: z.string(),"));
        assert!(user.output.contains("meta: z.object({}).passthrough(),"));
    }

    #[test]
    fn test_generate_writes_output_tree() {
        let dir = tempfile::TempDir::new().unwrap();
        let schema_path = dir.path().join("schema.surql");
        std::fs::write(&schema_path, TEST_SCHEMA).unwrap();
        let out = dir.path().join("out");
        let config = Config {
            schema_file: schema_path,
            output_folder: out.clone(),
            ..Default::default()
        };

        let report = generate(&config).unwrap();
        assert!(report.is_ok());
        assert_eq!(report.generated, vec!["user", "post"]);

        assert!(out.join("_generated/recordSchema.ts").exists());
        let user_gen = std::fs::read_to_string(out.join("_generated/user/userSchemaGen.ts")).unwrap();
        assert!(user_gen.contains("export const userInputSchemaGen = z.object({"));
        assert!(!user_gen.contains("recordSchema"));
        let post_gen = std::fs::read_to_string(out.join("_generated/post/postSchemaGen.ts")).unwrap();
        assert!(post_gen.contains(r#"import { recordId } from "../recordSchema.js""#));

        assert!(out.join("schema/user/userSchema.ts").exists());
        assert!(out.join("schema/user/userTypes.ts").exists());
        assert!(out.join("client/post/getPostById.ts").exists());
        assert!(out.join("client/post/deletePost.ts").exists());
    }

    #[test]
    fn test_generate_keeps_customizations() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = config_for(dir.path());
        let source = SurqlSource::new(TEST_SCHEMA);

        generate_from_source(&source, &config).unwrap();
        let custom = dir.path().join("schema/user/userSchema.ts");
        std::fs::write(&custom, "// mine").unwrap();
        let stale = dir.path().join("_generated/user/stale.ts");
        std::fs::write(&stale, "old").unwrap();

        generate_from_source(&source, &config).unwrap();
        assert_eq!(std::fs::read_to_string(&custom).unwrap(), "// mine");
        assert!(!stale.exists());
    }

    #[test]
    fn test_generate_without_client() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config {
            generate_client: false,
            ..config_for(dir.path())
        };
        generate_from_source(&SurqlSource::new(TEST_SCHEMA), &config).unwrap();
        assert!(!dir.path().join(CLIENT_FOLDER).exists());
    }

    #[test]
    fn test_failed_table_does_not_stop_others() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = FixedSource(vec![
            TableInfo {
                name: "broken".to_string(),
                definition: "DEFINE TABLE broken SCHEMAFULL".to_string(),
                fields: vec!["DEFINE FIELD a..b ON TABLE broken TYPE string".to_string()],
            },
            TableInfo {
                name: "user".to_string(),
                definition: "DEFINE TABLE user SCHEMAFULL".to_string(),
                fields: vec!["DEFINE FIELD name ON TABLE user TYPE string".to_string()],
            },
        ]);

        let report = generate_from_source(&source, &config_for(dir.path())).unwrap();
        assert!(!report.is_ok());
        assert_eq!(report.generated, vec!["user"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].table, "broken");
        assert!(report.failed[0].error.contains("a..b"));
        assert!(dir.path().join("_generated/user/userSchemaGen.ts").exists());
    }

    #[test]
    fn test_generate_missing_schema_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config {
            schema_file: dir.path().join("nope.surql"),
            ..config_for(dir.path())
        };
        assert!(generate(&config).is_err());
    }
}

use crate::type_utils::{table_camel_name, table_type_name};

/// Folder (under the output folder) holding the customizable schema files
/// the client imports from.
pub const SCHEMA_FOLDER: &str = "schema";

/// One generated client source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientFile {
    pub file_name: String,
    pub content: String,
}

/// Generate all CRUD wrapper files for a table.
pub fn generate_client_files(lib: &str, table: &str) -> Vec<ClientFile> {
    let entity = table_camel_name(table);
    let type_name = table_type_name(table);
    vec![
        ClientFile {
            file_name: format!("create{type_name}.ts"),
            content: create_content(lib, &entity),
        },
        ClientFile {
            file_name: format!("get{type_name}ById.ts"),
            content: get_by_id_content(lib, &entity),
        },
        ClientFile {
            file_name: format!("getAll{type_name}s.ts"),
            content: get_all_content(lib, &entity, table),
        },
        ClientFile {
            file_name: format!("update{type_name}.ts"),
            content: update_content(lib, &entity),
        },
        ClientFile {
            file_name: format!("delete{type_name}.ts"),
            content: delete_content(lib, &entity),
        },
    ]
}

fn create_content(lib: &str, entity: &str) -> String {
    let type_name = table_type_name(entity);
    format!(
        r#"
import {{ type Surreal }} from "{lib}";

import {{ {entity}CreateSchema }} from "../../{SCHEMA_FOLDER}/{entity}/{entity}Schema.js";
import type {{ {type_name}, {type_name}Create }} from "../../{SCHEMA_FOLDER}/{entity}/{entity}Types.js";

export const create{type_name} = async function (db: Surreal, tableName: string, data: {type_name}Create) {{
  const payload = {entity}CreateSchema.parse(data);

  const result = await db.create<{type_name}Create>(tableName, payload);

  return result[0] as unknown as {type_name};
}};
"#
    )
}

fn get_by_id_content(lib: &str, entity: &str) -> String {
    let type_name = table_type_name(entity);
    format!(
        r#"
import {{ RecordId, type Surreal }} from "{lib}";

import {{ {entity}Schema }} from "../../{SCHEMA_FOLDER}/{entity}/{entity}Schema.js";
import type {{ {type_name} }} from "../../{SCHEMA_FOLDER}/{entity}/{entity}Types.js";

export const get{type_name}ById = async function (db: Surreal, id: RecordId<string>) {{
  const key = {entity}Schema.pick({{ id: true }}).parse({{ id }});

  const result = await db.query<[{type_name}|undefined]>("SELECT * FROM ONLY $id", {{ id }});

  return result[0];
}};
"#
    )
}

fn get_all_content(lib: &str, entity: &str, table: &str) -> String {
    let type_name = table_type_name(entity);
    format!(
        r#"
import {{ type Surreal }} from "{lib}";

import type {{ {type_name} }} from "../../{SCHEMA_FOLDER}/{entity}/{entity}Types.js";

export const getAll{type_name}s = async function (db: Surreal) {{
  return db.select<{type_name}>("{table}");
}};
"#
    )
}

fn update_content(lib: &str, entity: &str) -> String {
    let type_name = table_type_name(entity);
    format!(
        r#"
import {{ RecordId, type Surreal }} from "{lib}";

import {{ {entity}CreateSchema }} from "../../{SCHEMA_FOLDER}/{entity}/{entity}Schema.js";
import type {{ {type_name}, {type_name}Create }} from "../../{SCHEMA_FOLDER}/{entity}/{entity}Types.js";

export const update{type_name} = async function (db: Surreal, id: RecordId<string>, data: Partial<{type_name}Create>) {{
  const payload = {entity}CreateSchema.partial().parse(data);

  return db.merge<{type_name}>(id, payload);
}};
"#
    )
}

fn delete_content(lib: &str, entity: &str) -> String {
    let type_name = table_type_name(entity);
    format!(
        r#"
import {{ type Surreal, RecordId }} from "{lib}";

import type {{ {type_name} }} from "../../{SCHEMA_FOLDER}/{entity}/{entity}Types.js";

export const delete{type_name} = async function (db: Surreal, id: RecordId) {{
  return db.delete<{type_name}>(id)
}};
"#
    )
}

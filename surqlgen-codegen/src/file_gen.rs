use crate::schema_gen::TableSchema;
use crate::type_utils::{input_schema_name, output_schema_name, table_camel_name, table_type_name};

/// `_generated/<table>/<table>SchemaGen.ts`, rewritten on every run.
pub fn schema_gen_file(schema: &TableSchema) -> String {
    let record_import = if schema.uses_record_id() {
        r#"import { recordId } from "../recordSchema.js""#
    } else {
        ""
    };
    format!(
        r#"// ====================
// DO NOT EDIT THIS FILE!
// This file is autogenerated and will be overwritten during generation!
// ====================

import {{ z }} from "zod";
{record_import}

// the create schema for table {table}
export {input};

// the select schema for table {table}
export {output};

"#,
        table = schema.table,
        input = schema.input,
        output = schema.output,
    )
}

/// `_generated/recordSchema.ts`, the shared record reference validator.
pub fn record_schema_file(lib: &str) -> String {
    format!(
        r#"// ====================
// DO NOT EDIT THIS FILE!
// This file is autogenerated and will be overwritten during generation!
// ====================

import {{ z }} from "zod";
import {{ RecordId }} from "{lib}";

export const recordId = <Table extends string = string>(tableName?: Table | Table[]) =>
  z.custom<RecordId<Table>>((value) => {{
    if (!(value instanceof RecordId)) return false;
    if (tableName === undefined) return true;
    const tables: string[] = Array.isArray(tableName) ? tableName : [tableName];
    return tables.includes(value.tb);
  }}, {{ message: `expected a record id${{tableName ? ` of ${{tableName}}` : ""}}` }});
"#
    )
}

/// `schema/<table>/<table>Schema.ts`, written once and then left to the user.
pub fn custom_schema_file(table: &str) -> String {
    let name = table_camel_name(table);
    let input = input_schema_name(table);
    let output = output_schema_name(table);
    format!(
        r#"/* Place your custom changes here */

import {{ z }} from "zod";

import {{ {input}, {output} }} from "../../_generated/{name}/{name}SchemaGen.js";

// payload schema for creating a new {table} entity
export const {name}CreateSchema = {input}.merge(z.object({{
  // add your custom fields here, which are not part of SurrealDB table schema
  // they are not overwritten by the next run
}}))

// payload schema for fetching a {table} entity
export const {name}Schema = {output}.merge(z.object({{
  id: z.object({{ tb: z.string(), id: z.string() }}),
  // add your custom fields here, which are not part of SurrealDB table schema
  // they are not overwritten by the next run
}}))
"#
    )
}

/// `schema/<table>/<table>Types.ts`, written once and then left to the user.
pub fn custom_types_file(lib: &str, table: &str) -> String {
    let name = table_camel_name(table);
    let type_name = table_type_name(table);
    format!(
        r#"/* Place your custom changes here */

import {{ z }} from "zod";
import {{ type RecordId }} from "{lib}";

import {{ {name}CreateSchema, {name}Schema }} from "./{name}Schema.js";

// the create type for table {table}
export type {type_name}Create = z.input<typeof {name}CreateSchema>

// the select type for table {table}
export type {type_name} = z.output<typeof {name}Schema> & {{id: RecordId<string>}}
"#
    )
}

use surqlgen::schema::{consolidate, tokenize, NodeId, NodeKind, SchemaTree};
use surqlgen::{FieldDefinition, Result, TableInfo};

use crate::type_utils::{
    constrain, input_schema_name, is_array_type, leaf_fragment, map_type, output_schema_name,
    property_key, Fragment,
};

/// Which of the two per-table schemas is being emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    /// Validates creation payloads; server-computed fields are left out.
    Input,
    /// Validates read results; every field is present.
    Output,
}

/// The two emitted declarations for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table: String,
    pub strict: bool,
    /// `const <table>InputSchemaGen = z.object({...})`
    pub input: String,
    /// `const <table>OutputSchemaGen = z.object({...})`
    pub output: String,
}

impl TableSchema {
    /// Whether either declaration references the shared `recordId` helper.
    pub fn uses_record_id(&self) -> bool {
        self.input.contains("recordId(") || self.output.contains("recordId(")
    }
}

/// Tokenize, consolidate and emit the schemas for one table.
pub fn generate_table_schema(info: &TableInfo) -> Result<TableSchema> {
    let fields: Vec<FieldDefinition> = info.fields.iter().map(|line| tokenize(line)).collect();
    let tree = consolidate(&info.name, &fields)?;
    let strict = info.is_strict();
    Ok(TableSchema {
        table: info.name.clone(),
        strict,
        input: emit_declaration(&tree, SchemaKind::Input, strict),
        output: emit_declaration(&tree, SchemaKind::Output, strict),
    })
}

/// Emit one named declaration for a consolidated tree.
pub fn emit_declaration(tree: &SchemaTree, kind: SchemaKind, strict: bool) -> String {
    let name = match kind {
        SchemaKind::Input => input_schema_name(tree.table()),
        SchemaKind::Output => output_schema_name(tree.table()),
    };
    let mut body = object_expr(tree, SchemaTree::ROOT, kind, 0);
    if !strict {
        body.push_str(".passthrough()");
    }
    format!("const {name} = {body}")
}

fn object_expr(tree: &SchemaTree, id: NodeId, kind: SchemaKind, depth: usize) -> String {
    let properties: Vec<String> = tree
        .children(id)
        .into_iter()
        .filter_map(|(name, child)| {
            node_fragment(tree, child, kind, depth + 1).map(|fragment| {
                format!(
                    "{}{}: {},",
                    indent(depth + 1),
                    property_key(name),
                    fragment.expr
                )
            })
        })
        .collect();

    if properties.is_empty() {
        "z.object({})".to_string()
    } else {
        format!(
            "z.object({{\n{}\n{}}})",
            properties.join("\n"),
            indent(depth)
        )
    }
}

/// Expression for one node, or `None` when the node is left out of `kind`.
fn node_fragment(tree: &SchemaTree, id: NodeId, kind: SchemaKind, depth: usize) -> Option<Fragment> {
    let node = tree.node(id);
    if kind == SchemaKind::Input && node.definition().is_some_and(|d| d.value.is_some()) {
        return None;
    }

    let fragment = match &node.kind {
        NodeKind::Leaf(def) => leaf_fragment(def),
        NodeKind::Branch { definition, .. } => {
            let object = object_expr(tree, id, kind, depth);
            match definition {
                Some(def) => constrain(&object, def, declared_optional(def)),
                None => Fragment {
                    expr: object,
                    optional: false,
                },
            }
        }
        NodeKind::List {
            definition,
            element,
        } => {
            let element_expr = element
                .and_then(|e| node_fragment(tree, e, kind, depth))
                .map(|f| f.expr);
            match (definition, element_expr) {
                (Some(def), Some(element_expr)) => constrain(
                    &format!("z.array({element_expr})"),
                    def,
                    declared_optional(def),
                ),
                (Some(def), None) if def.field_type.as_deref().is_some_and(is_array_type) => {
                    leaf_fragment(def)
                }
                (Some(def), None) => {
                    constrain("z.array(z.any())", def, declared_optional(def))
                }
                (None, element_expr) => Fragment {
                    expr: format!(
                        "z.array({})",
                        element_expr.unwrap_or_else(|| "z.any()".to_string())
                    ),
                    optional: false,
                },
            }
        }
    };
    Some(fragment)
}

fn declared_optional(def: &FieldDefinition) -> bool {
    def.field_type
        .as_deref()
        .is_some_and(|t| map_type(t).optional)
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

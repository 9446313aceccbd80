use heck::{ToLowerCamelCase, ToUpperCamelCase};
use surqlgen::FieldDefinition;

/// Convert a table name to the camelCase stem used for files and schemas.
/// e.g. "user_profile" -> "userProfile"
pub fn table_camel_name(table: &str) -> String {
    table.to_lower_camel_case()
}

/// Convert a table name to its TypeScript type name.
/// e.g. "user_profile" -> "UserProfile"
pub fn table_type_name(table: &str) -> String {
    table.to_upper_camel_case()
}

/// e.g. "user" -> "userInputSchemaGen"
pub fn input_schema_name(table: &str) -> String {
    format!("{}InputSchemaGen", table_camel_name(table))
}

/// e.g. "user" -> "userOutputSchemaGen"
pub fn output_schema_name(table: &str) -> String {
    format!("{}OutputSchemaGen", table_camel_name(table))
}

/// Render a string as a double-quoted JS literal.
pub fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Object key as written in a `z.object({...})` literal.
pub fn property_key(name: &str) -> String {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    };
    if valid {
        name.to_string()
    } else {
        js_string(name)
    }
}

/// A mapped validator expression and whether the field may be omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub expr: String,
    pub optional: bool,
}

impl Fragment {
    fn required(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            optional: false,
        }
    }
}

/// Map a SurrealQL type expression to a zod expression.
///
/// `option<T>` yields T's expression with `optional` set; the caller decides
/// where `.optional()` goes. Unknown types map to `z.any()`.
pub fn map_type(ql_type: &str) -> Fragment {
    let ql_type = ql_type.trim();

    let variants = split_top_level(ql_type, '|');
    if variants.len() > 1 {
        let mut optional = false;
        let mut exprs = Vec::new();
        for variant in variants {
            if matches!(variant.to_lowercase().as_str(), "none") {
                optional = true;
                continue;
            }
            let mapped = map_type(variant);
            optional |= mapped.optional;
            exprs.push(mapped.expr);
        }
        let expr = match exprs.len() {
            0 => "z.any()".to_string(),
            1 => exprs.remove(0),
            _ => format!("z.union([{}])", exprs.join(", ")),
        };
        return Fragment { expr, optional };
    }

    let (name, args) = split_generic(ql_type);
    match name.to_lowercase().as_str() {
        "option" => {
            let inner = args
                .first()
                .map(|a| map_type(a))
                .unwrap_or_else(|| Fragment::required("z.any()"));
            Fragment {
                expr: inner.expr,
                optional: true,
            }
        }
        "array" | "set" => {
            let element = args
                .first()
                .map(|a| render(&map_type(a)))
                .unwrap_or_else(|| "z.any()".to_string());
            Fragment::required(format!("z.array({element})"))
        }
        "record" => Fragment::required(record_expr(args.first().copied())),
        "string" => Fragment::required("z.string()"),
        "int" | "float" | "decimal" | "number" => Fragment::required("z.number()"),
        "bool" => Fragment::required("z.boolean()"),
        "datetime" => Fragment::required("z.string().datetime()"),
        "duration" => Fragment::required("z.string()"),
        "uuid" => Fragment::required("z.string().uuid()"),
        "object" => Fragment::required("z.object({}).passthrough()"),
        "null" => Fragment::required("z.null()"),
        "bytes" => Fragment::required("z.instanceof(ArrayBuffer)"),
        "any" | "geometry" => Fragment::required("z.any()"),
        _ => {
            log::warn!("Unknown SurrealQL type '{ql_type}', falling back to z.any()");
            Fragment::required("z.any()")
        }
    }
}

/// Whether a SurrealQL type expression maps to an array.
pub fn is_array_type(ql_type: &str) -> bool {
    let (name, _) = split_generic(ql_type.trim());
    matches!(name.to_lowercase().as_str(), "array" | "set")
}

fn record_expr(tables: Option<&str>) -> String {
    let tables: Vec<&str> = tables
        .map(|t| split_top_level(t, '|'))
        .unwrap_or_default()
        .into_iter()
        .filter(|t| !t.is_empty())
        .collect();
    match tables.as_slice() {
        [] => "recordId()".to_string(),
        [one] => format!("recordId({})", js_string(one)),
        many => format!(
            "recordId([{}])",
            many.iter().map(|t| js_string(t)).collect::<Vec<_>>().join(", ")
        ),
    }
}

/// Apply a field's clauses to an already mapped base expression.
///
/// `INSIDE` is handled by the caller; this covers `ASSERT`, `DEFAULT` and
/// optionality.
pub fn constrain(base: &str, def: &FieldDefinition, optional_from_type: bool) -> Fragment {
    let mut expr = base.to_string();
    let mut notes = Vec::new();

    if let Some(assert) = def.assert.as_deref().filter(|a| !a.is_empty()) {
        match assert_refinement(assert) {
            Some(refinement) if expr.starts_with("z.string()") => expr.push_str(refinement),
            Some(_) => notes.push(format!("assert: {assert}")),
            None if assert == "$value" => {}
            None => notes.push(format!("assert: {assert}")),
        }
    }

    if let Some(inside) = def.inside.as_deref() {
        if enum_values(inside).is_none() {
            notes.push(format!("inside: {inside}"));
        }
    }

    if !notes.is_empty() {
        expr.push_str(&format!(".describe({})", js_string(&notes.join("; "))));
    }

    let mut optional = optional_from_type;
    match def.default_value.as_deref().map(default_literal) {
        Some(Some(literal)) => {
            expr.push_str(&format!(".default({literal})"));
            optional = true;
        }
        Some(None) => {
            expr.push_str(".optional()");
            optional = true;
        }
        None if optional => expr.push_str(".optional()"),
        None => {}
    }

    Fragment { expr, optional }
}

/// Map a declared leaf to its final expression.
pub fn leaf_fragment(def: &FieldDefinition) -> Fragment {
    let ql_type = def.field_type.as_deref().unwrap_or("any");
    let mapped = map_type(ql_type);

    let base = match def.inside.as_deref().and_then(enum_values) {
        Some(values) => {
            let items: Vec<String> = values.iter().map(|v| js_string(v)).collect();
            let enum_expr = format!("z.enum([{}])", items.join(", "));
            if is_array_type(ql_type) {
                format!("z.array({enum_expr})")
            } else {
                enum_expr
            }
        }
        None => mapped.expr,
    };

    constrain(&base, def, mapped.optional)
}

/// Render a bare mapped type, adding `.optional()` when needed.
pub fn render(fragment: &Fragment) -> String {
    if fragment.optional {
        format!("{}.optional()", fragment.expr)
    } else {
        fragment.expr.clone()
    }
}

fn assert_refinement(assert: &str) -> Option<&'static str> {
    let compact: String = assert.chars().filter(|c| !c.is_whitespace()).collect();
    match compact.to_lowercase().as_str() {
        "string::is::email($value)" => Some(".email()"),
        "string::is::url($value)" => Some(".url()"),
        "string::is::uuid($value)" => Some(".uuid()"),
        _ => None,
    }
}

/// A `DEFAULT` expression as a JS literal, or `None` for expressions that
/// only the database can evaluate (e.g. `time::now()`).
pub fn default_literal(expr: &str) -> Option<String> {
    let expr = expr.trim();
    if let Some(inner) = expr
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        return Some(js_string(inner));
    }
    serde_json::from_str::<serde_json::Value>(expr)
        .ok()
        .map(|value| value.to_string())
}

/// The string literals of an `INSIDE [...]` list, when it is nothing else.
pub fn enum_values(inside: &str) -> Option<Vec<String>> {
    let inner = inside.trim().strip_prefix('[')?.strip_suffix(']')?;
    let mut values = Vec::new();
    for item in split_top_level(inner, ',') {
        if item.is_empty() {
            continue;
        }
        let unquoted = item
            .strip_prefix('\'')
            .and_then(|s| s.strip_suffix('\''))
            .or_else(|| item.strip_prefix('"').and_then(|s| s.strip_suffix('"')))?;
        values.push(unquoted.to_string());
    }
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

/// Split `name<a, b>` into `("name", ["a", "b"])`.
fn split_generic(ql_type: &str) -> (&str, Vec<&str>) {
    match (ql_type.find('<'), ql_type.rfind('>')) {
        (Some(open), Some(close)) if open < close => {
            let name = ql_type[..open].trim();
            let args = split_top_level(&ql_type[open + 1..close], ',');
            (name, args)
        }
        _ => (ql_type, Vec::new()),
    }
}

/// Split on `sep` outside of `<>`, `()`, `[]` and `{}`.
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '<' | '(' | '[' | '{' => depth += 1,
            '>' | ')' | ']' | '}' => depth -= 1,
            c if c == sep && depth == 0 => {
                parts.push(text[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    parts
}

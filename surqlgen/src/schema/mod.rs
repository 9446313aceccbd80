mod tokenizer;
mod tree;
mod types;

pub use tokenizer::{classify, tokenize, Classification};
pub use tree::{consolidate, NodeId, NodeKind, SchemaNode, SchemaTree};
pub use types::{FieldDefinition, Scope, TableDefinition};

pub mod schema;
pub mod source;
pub mod config;
pub mod error;

pub use config::{Config, ConfigOverrides};
pub use error::{Result, SurqlGenError};
pub use schema::{FieldDefinition, SchemaTree, TableDefinition};
pub use source::{MetadataSource, SurqlSource, TableInfo};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SurqlGenError {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Empty field path in table '{table}': '{path}'")]
    EmptyFieldPath { table: String, path: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SurqlGenError>;

use crate::error::{Result, SurqlGenError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "surql-gen.json";

/// Generator settings, as read from `surql-gen.json` (or a YAML equivalent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// SurrealQL file holding the `DEFINE` statements.
    pub schema_file: PathBuf,
    /// Folder that receives `_generated/`, `schema/` and `client/`.
    pub output_folder: PathBuf,
    /// Also emit client wrapper functions.
    pub generate_client: bool,
    /// Package the generated client imports from.
    pub lib: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_file: PathBuf::from("myschema.surql"),
            output_folder: PathBuf::from("client_generated"),
            generate_client: true,
            lib: "surrealdb.js".to_string(),
        }
    }
}

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub schema_file: Option<PathBuf>,
    pub output_folder: Option<PathBuf>,
    pub generate_client: Option<bool>,
    pub lib: Option<String>,
}

impl Config {
    /// Load a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config file found at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        Self::parse(&content, path)
    }

    /// Parse config text; the format is picked from the file extension.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let parsed: std::result::Result<Self, String> = if is_yaml {
            serde_yaml::from_str(content).map_err(|e| e.to_string())
        } else {
            serde_json::from_str(content).map_err(|e| e.to_string())
        };
        parsed.map_err(|e| {
            SurqlGenError::Config(format!("Invalid config file '{}': {e}", path.display()))
        })
    }

    /// Apply command-line values on top of this config.
    pub fn merge(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(schema_file) = overrides.schema_file {
            self.schema_file = schema_file;
        }
        if let Some(output_folder) = overrides.output_folder {
            self.output_folder = output_folder;
        }
        if let Some(generate_client) = overrides.generate_client {
            self.generate_client = generate_client;
        }
        if let Some(lib) = overrides.lib {
            self.lib = lib;
        }
        self
    }

    /// Resolve relative paths against `base`.
    pub fn resolve(mut self, base: &Path) -> Self {
        if self.schema_file.is_relative() {
            self.schema_file = base.join(&self.schema_file);
        }
        if self.output_folder.is_relative() {
            self.output_folder = base.join(&self.output_folder);
        }
        self
    }
}

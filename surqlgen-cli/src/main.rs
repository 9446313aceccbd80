use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process;
use surqlgen::config::DEFAULT_CONFIG_FILE;
use surqlgen::{Config, ConfigOverrides};

/// Generate zod schemas and a TypeScript client from SurrealQL definitions
#[derive(Parser)]
#[command(name = "surqlgen", version, about)]
struct Cli {
    /// A SurrealQL file containing the definitions
    #[arg(short = 'f', long = "file")]
    schema_file: Option<PathBuf>,

    /// Config file (JSON, or YAML by extension)
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_FILE)]
    config_file: PathBuf,

    /// Output folder
    #[arg(short = 'o', long = "output-folder")]
    output_folder: Option<PathBuf>,

    /// Generate client wrapper functions
    #[arg(short = 'g', long = "generate-client")]
    generate_client: Option<bool>,

    /// Package the generated client imports from
    #[arg(long)]
    lib: Option<String>,

    /// Print the schemas to stdout instead of writing files
    #[arg(long)]
    dry_run: bool,

    /// Summary format
    #[arg(long, default_value = "yaml")]
    format: OutputFormat,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("ERROR:{e}");
            process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when some tables failed but the run itself completed.
fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let config = Config::load(&cwd.join(&cli.config_file))?
        .merge(ConfigOverrides {
            schema_file: cli.schema_file,
            output_folder: cli.output_folder,
            generate_client: cli.generate_client,
            lib: cli.lib,
        })
        .resolve(&cwd);
    log::debug!("Effective config: {config:?}");

    if cli.dry_run {
        let content = std::fs::read_to_string(&config.schema_file).map_err(|e| {
            format!(
                "Unable to read schema file '{}': {e}",
                config.schema_file.display()
            )
        })?;
        let mut ok = true;
        for result in surqlgen_codegen::generate_from_schema_str(&content)? {
            match result {
                Ok(schema) => println!("{}", surqlgen_codegen::file_gen::schema_gen_file(&schema)),
                Err(e) => {
                    log::error!("{e}");
                    ok = false;
                }
            }
        }
        return Ok(ok);
    }

    let report = surqlgen_codegen::generate(&config)?;
    let value = serde_json::to_value(&report)?;
    print_output(&value, &cli.format)?;
    Ok(report.is_ok())
}

fn print_output(
    value: &serde_json::Value,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "surqlgen",
            "-f",
            "db.surql",
            "-o",
            "gen",
            "-g",
            "false",
            "--format",
            "json",
        ]);
        assert_eq!(cli.schema_file, Some(PathBuf::from("db.surql")));
        assert_eq!(cli.output_folder, Some(PathBuf::from("gen")));
        assert_eq!(cli.generate_client, Some(false));
        assert_eq!(cli.config_file, PathBuf::from(DEFAULT_CONFIG_FILE));
        assert!(matches!(cli.format, OutputFormat::Json));
    }
}

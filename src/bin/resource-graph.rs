//! Resource Graph CLI
//!
//! Command-line interface for translating relationship documents into a typed
//! object-graph model and checking resource schemas.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use resource_graph::{
    apply_overrides, check, classify_path, load_document_auto, load_relationships,
    load_schema_dir, translate_all, AllRelationships, ResourceStatus, Severity, TranslatorConfig,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "resource-graph")]
#[command(about = "Derive typed object-graph models from resource schemas and relationship maps")]
#[command(version)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a relationship document into the output model
    Translate {
        /// Relationship document: file path or URL (http:// or https://)
        #[arg(long)]
        relationships: String,

        /// Directory of resource schema files
        #[arg(long)]
        schemas: PathBuf,

        /// TOML config with filter and overrides
        #[arg(long)]
        config: Option<PathBuf>,

        /// Only translate these resource types (repeatable)
        #[arg(long)]
        filter: Vec<String>,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Report whether a property path in a schema is an array
    Classify {
        /// Resource schema: file path or URL
        #[arg(long)]
        schema: String,

        /// Slash-separated property path (e.g., Tags/Value)
        path: String,
    },

    /// Check resource schemas against a relationship document
    Check {
        /// Relationship document: file path or URL (http:// or https://)
        #[arg(long)]
        relationships: String,

        /// Directory of resource schema files
        #[arg(long)]
        schemas: PathBuf,

        /// TOML config with filter and overrides
        #[arg(long)]
        config: Option<PathBuf>,

        /// Only check these resource types (repeatable)
        #[arg(long)]
        filter: Vec<String>,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Only show resources with problems
        #[arg(long, short)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins when no -v is given.
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = if cli.verbose == 0 {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Translate {
            relationships,
            schemas,
            config,
            filter,
            output,
            pretty,
        } => run_translate(TranslateArgs {
            relationships,
            schemas,
            config,
            filter,
            output,
            pretty,
        }),

        Commands::Classify { schema, path } => run_classify(&schema, &path),

        Commands::Check {
            relationships,
            schemas,
            config,
            filter,
            format,
            strict,
            quiet,
        } => run_check(CheckArgs {
            relationships,
            schemas,
            config,
            filter,
            format,
            strict,
            quiet,
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

struct TranslateArgs {
    relationships: String,
    schemas: PathBuf,
    config: Option<PathBuf>,
    filter: Vec<String>,
    output: Option<PathBuf>,
    pretty: bool,
}

struct CheckArgs {
    relationships: String,
    schemas: PathBuf,
    config: Option<PathBuf>,
    filter: Vec<String>,
    format: String,
    strict: bool,
    quiet: bool,
}

fn load_config(path: Option<&Path>, filter: Vec<String>) -> Result<TranslatorConfig, u8> {
    let config = match path {
        Some(path) => TranslatorConfig::load(path).map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?,
        None => TranslatorConfig::default(),
    };
    Ok(config.with_filter(filter))
}

/// Load the relationship document with overrides applied.
fn load_overridden_relationships(
    source: &str,
    config: &TranslatorConfig,
) -> Result<AllRelationships, u8> {
    let relationships = load_relationships(source).map_err(|e| {
        eprintln!("Error loading relationships: {}", e);
        if let resource_graph::LoadError::InvalidDocument { issues } = &e {
            for issue in issues {
                eprintln!("  {}", issue);
            }
        }
        e.exit_code() as u8
    })?;
    Ok(apply_overrides(&relationships, &config.overrides))
}

fn run_translate(args: TranslateArgs) -> Result<(), u8> {
    let config = load_config(args.config.as_deref(), args.filter)?;
    let filter = config.filter();
    let relationships = load_overridden_relationships(&args.relationships, &config)?;

    let schemas = load_schema_dir(&args.schemas, &filter).map_err(|e| {
        eprintln!("Error loading schemas: {}", e);
        e.exit_code() as u8
    })?;

    let translation = translate_all(&relationships, &schemas, &filter);

    let json_output = if args.pretty {
        serde_json::to_string_pretty(&translation.resources)
    } else {
        serde_json::to_string(&translation.resources)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    write_output(args.output.as_deref(), &json_output)?;

    if translation.is_clean() {
        Ok(())
    } else {
        eprintln!("{} relationship error(s):", translation.errors.len());
        for error in &translation.errors {
            eprintln!("  {}", error);
        }
        Err(1)
    }
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), u8> {
    match output {
        Some(path) => std::fs::write(path, content).map_err(|e| {
            eprintln!("Error writing to {}: {}", path.display(), e);
            3u8
        }),
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}

fn run_classify(schema_source: &str, path: &str) -> Result<(), u8> {
    let schema = load_document_auto(schema_source).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    // Every schema error is invalid input.
    let class = classify_path(path, &schema).map_err(|e| {
        eprintln!("Error: {}", e);
        2u8
    })?;

    let kind = if class.is_array { "array" } else { "scalar" };
    let signatures: Vec<String> = class.signatures.iter().map(ToString::to_string).collect();
    println!("{} ({})", kind, signatures.join(", "));
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), u8> {
    let CheckArgs {
        relationships,
        schemas: schemas_dir,
        config,
        filter,
        format,
        strict,
        quiet,
    } = args;

    let config = load_config(config.as_deref(), filter)?;
    let filter = config.filter();
    let relationships = load_overridden_relationships(&relationships, &config)?;

    let schemas = load_schema_dir(&schemas_dir, &filter).map_err(|e| {
        eprintln!("Error loading schemas: {}", e);
        e.exit_code() as u8
    })?;

    let result = check(&relationships, &schemas, &filter, strict);

    if format == "json" {
        let json_output = serde_json::to_string_pretty(&result).map_err(|e| {
            eprintln!("Error serializing output: {}", e);
            2u8
        })?;
        println!("{}", json_output);
    } else {
        if !quiet {
            println!("Checking {} ...\n", schemas_dir.display());
        }

        for report in &result.results {
            let status_icon = match report.status {
                ResourceStatus::Ok => "\x1b[32m✓\x1b[0m",
                ResourceStatus::Warning => "\x1b[33m⚠\x1b[0m",
                ResourceStatus::Error => "\x1b[31m✗\x1b[0m",
            };

            if !quiet || report.status != ResourceStatus::Ok {
                println!("  {} {}", status_icon, report.resource);
            }

            for diag in &report.diagnostics {
                let (color, label) = match diag.severity {
                    Severity::Error => ("\x1b[31m", "error"),
                    Severity::Warning => ("\x1b[33m", "warning"),
                };
                if !quiet || diag.severity == Severity::Error {
                    println!(
                        "    {}{}[{}]\x1b[0m: {} - {}",
                        color, label, diag.code, diag.path, diag.message
                    );
                }
            }
        }

        println!();
        if result.is_ok() && (!strict || result.warnings == 0) {
            println!(
                "\x1b[32m✓ {} resources checked, all passed\x1b[0m",
                result.resources_checked
            );
        } else {
            println!(
                "\x1b[31m✗ {} resources checked: {} passed, {} failed ({} errors, {} warnings)\x1b[0m",
                result.resources_checked, result.passed, result.failed, result.errors, result.warnings
            );
        }
    }

    if result.is_ok() && (!strict || result.warnings == 0) {
        Ok(())
    } else {
        Err(1)
    }
}

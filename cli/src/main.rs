use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use graphql_loader::apollo_compiler::Schema;
use graphql_loader::apollo_compiler::ast::{Document, OperationType};
use graphql_loader::apollo_compiler::schema::ExtendedType;
use graphql_loader::{LoaderConfig, SchemaLoader};
use serde::Serialize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "gql-load")]
#[command(about = "Load GraphQL schema files matched by a glob pattern")]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// YAML loader configuration (matcher options, cwd).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Resolve relative patterns against this directory.
    #[arg(long, global = true)]
    cwd: Option<PathBuf>,
    /// Read files on the calling thread instead of concurrently.
    #[arg(long, global = true)]
    sync: bool,
    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the merged SDL of every matching file.
    Print(PrintArgs),
    /// Compile the matching files and print a schema summary.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct PrintArgs {
    /// Glob pattern selecting schema files (e.g. 'schema/**/*.graphql').
    pattern: String,
    /// Write the merged SDL to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Glob pattern selecting schema files (e.g. 'schema/**/*.graphql').
    pattern: String,
    /// Output format.
    #[arg(long, default_value = "text")]
    format: CliOutputFormat,
}

/// Summary printed by `gql-load check`.
#[derive(Debug, Serialize)]
struct SchemaSummary {
    pattern: String,
    query: Option<String>,
    mutation: Option<String>,
    subscription: Option<String>,
    object_types: usize,
    types: Vec<String>,
}

impl SchemaSummary {
    fn new(pattern: &str, schema: &Schema) -> Self {
        let root = |operation: OperationType| {
            schema
                .root_operation(operation)
                .map(|name| name.to_string())
        };
        let user_types: Vec<(&str, &ExtendedType)> = schema
            .types
            .iter()
            .filter(|(_, ty)| !ty.is_built_in())
            .map(|(name, ty)| (name.as_str(), ty))
            .collect();

        Self {
            pattern: pattern.to_string(),
            query: root(OperationType::Query),
            mutation: root(OperationType::Mutation),
            subscription: root(OperationType::Subscription),
            object_types: user_types
                .iter()
                .filter(|(_, ty)| matches!(ty, ExtendedType::Object(_)))
                .count(),
            types: user_types.iter().map(|(name, _)| name.to_string()).collect(),
        }
    }

    fn render_text(&self) -> String {
        let mut lines = vec![format!(
            "Schema from '{}' is valid: {} type(s), {} object type(s).",
            self.pattern,
            self.types.len(),
            self.object_types
        )];
        for (label, root) in [
            ("query", &self.query),
            ("mutation", &self.mutation),
            ("subscription", &self.subscription),
        ] {
            if let Some(name) = root {
                lines.push(format!("  {label}: {name}"));
            }
        }
        lines.join("\n")
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = build_loader(&cli).and_then(|loader| match &cli.command {
        Command::Print(args) => run_print(&loader, cli.sync, args),
        Command::Check(args) => run_check(&loader, cli.sync, args),
    });

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn build_loader(cli: &Cli) -> Result<SchemaLoader, String> {
    let mut config = match &cli.config {
        Some(path) => LoaderConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => LoaderConfig::default(),
    };
    if let Some(cwd) = &cli.cwd {
        config.cwd = Some(cwd.clone());
    }
    Ok(SchemaLoader::with_config(config))
}

fn run_print(loader: &SchemaLoader, sync: bool, args: &PrintArgs) -> Result<(), String> {
    let document = load_document(loader, sync, &args.pattern)?;
    let sdl = document.to_string();

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|err| {
                        format!(
                            "Failed to create output directory '{}': {err}",
                            parent.display()
                        )
                    })?;
                }
            }
            fs::write(path, sdl)
                .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
            println!(
                "Wrote {} definition(s) to '{}'.",
                document.definitions.len(),
                path.display()
            );
        }
        None => println!("{sdl}"),
    }
    Ok(())
}

fn run_check(loader: &SchemaLoader, sync: bool, args: &CheckArgs) -> Result<(), String> {
    let result = if sync {
        loader.load_schema_sync(&args.pattern)
    } else {
        block_on(loader.load_schema(&args.pattern))?
    };
    let schema = result.map_err(|e| e.to_string())?;

    let summary = SchemaSummary::new(&args.pattern, &schema);
    match args.format {
        CliOutputFormat::Text => println!("{}", summary.render_text()),
        CliOutputFormat::Json => {
            let raw = serde_json::to_string_pretty(&summary)
                .map_err(|err| format!("Failed to serialize summary: {err}"))?;
            println!("{raw}");
        }
    }
    Ok(())
}

fn load_document(loader: &SchemaLoader, sync: bool, pattern: &str) -> Result<Document, String> {
    let result = if sync {
        loader.load_document_sync(pattern)
    } else {
        block_on(loader.load_document(pattern))?
    };
    result.map_err(|e| e.to_string())
}

fn block_on<F: std::future::Future>(future: F) -> Result<F::Output, String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to start runtime: {err}"))?;
    Ok(runtime.block_on(future))
}

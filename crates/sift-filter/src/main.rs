//! Sift Filter Compiler CLI
//!
//! Compiles a filter expression file into the predicate wire format of the
//! matching engine.
//!
//! Usage:
//!   sift-compile <filter.json|filter.yaml> --catalog <catalog.yaml> [OPTIONS]

use anyhow::Context;
use clap::{Parser, ValueEnum};
use sift_filter::{CompilerConfig, Expr, Filter, StaticCatalog};
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Xml,
    Json,
}

/// Sift Filter Compiler
#[derive(Parser, Debug)]
#[command(name = "sift-compile")]
#[command(
    author,
    version,
    about = "Compile a subscription filter into an OR-of-AND predicate"
)]
struct Args {
    /// Filter expression file (JSON, or YAML with a .yaml/.yml extension)
    #[arg(required = true)]
    filter: PathBuf,

    /// Attribute, schema and endpoint catalog (YAML)
    #[arg(short, long, env = "SIFT_CATALOG")]
    catalog: PathBuf,

    /// Compiler configuration (YAML)
    #[arg(long, env = "SIFT_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "xml")]
    output: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(&args) {
        error!("{e:#}");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => CompilerConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => CompilerConfig::default(),
    };
    let catalog = StaticCatalog::from_file(&args.catalog)
        .with_context(|| format!("failed to load catalog {}", args.catalog.display()))?;
    let expr = load_expression(&args.filter)
        .with_context(|| format!("failed to load filter {}", args.filter.display()))?;
    let filter = match expr {
        Some(expr) => {
            debug!(filter = %expr, "loaded filter");
            Filter::new(expr)
        }
        None => Filter::empty(),
    };
    match args.output {
        OutputFormat::Xml => match filter.to_xml(&catalog, &config)? {
            Some(xml) => println!("{xml}"),
            None => eprintln!("<empty>"),
        },
        OutputFormat::Json => {
            let predicate = filter.compile(&catalog, &config)?;
            println!("{}", serde_json::to_string_pretty(&predicate)?);
        }
    }
    Ok(())
}

/// A file holding `null` is the empty filter.
fn load_expression(path: &Path) -> anyhow::Result<Option<Expr>> {
    let contents = std::fs::read_to_string(path)?;
    let is_yaml = path
        .extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml");
    let expr = if is_yaml {
        serde_yaml::from_str(&contents)?
    } else {
        serde_json::from_str(&contents)?
    };
    Ok(expr)
}

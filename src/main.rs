//! Bindforge - Interface-Definition-Driven Binding Generator
//!
//! Main CLI entry point for validating interface models and generating
//! C, dynamic-loading and C++ bindings from them.

use anyhow::{Context, Result};
use bindforge::codegen::{generate_all, write_artifacts, Target};
use bindforge::config::BindforgeConfig;
use bindforge::ffi::WrapperTable;
use bindforge::marshal::naming;
use bindforge::model::{validate::validate_component, ComponentDefinition};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bindforge")]
#[command(version)]
#[command(about = "Generate C, dynamic-loading and C++ bindings from an interface model", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a model and write binding files
    Generate {
        /// Interface model (.json or .toml)
        model: PathBuf,

        /// Output directory (overrides bindforge.toml)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Target to generate: c, dynamic, cpp or all (repeatable)
        #[arg(short, long = "target", value_name = "TARGET")]
        targets: Vec<String>,

        /// Configuration file (default: nearest bindforge.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Load and validate a model without generating anything
    Check {
        /// Interface model (.json or .toml)
        model: PathBuf,
    },

    /// Print every flat export name in table order
    Symbols {
        /// Interface model (.json or .toml)
        model: PathBuf,

        /// Shared library to resolve the exports against
        #[arg(short, long)]
        library: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate {
            model,
            output,
            targets,
            config,
        } => cmd_generate(&model, output, &targets, config.as_deref()),
        Commands::Check { model } => cmd_check(&model),
        Commands::Symbols { model, library } => cmd_symbols(&model, library.as_deref()),
    }
}

/// `RUST_LOG` wins when set; otherwise `-v` picks between info and debug
fn init_logging(verbose: u8) {
    let level = if verbose == 0 { Level::INFO } else { Level::DEBUG };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_model(path: &Path) -> Result<ComponentDefinition> {
    let component = ComponentDefinition::load(path)
        .with_context(|| format!("Failed to load model {}", path.display()))?;
    debug!(
        namespace = %component.name_space,
        classes = component.classes.len(),
        "model loaded"
    );
    Ok(component)
}

/// Resolve `--target` values; `all` expands to every target and an empty
/// list defers to the configuration
fn parse_targets(values: &[String], config: &BindforgeConfig) -> Result<Vec<Target>> {
    if values.is_empty() {
        return Ok(config.targets());
    }
    let mut targets = Vec::new();
    for value in values {
        if value.eq_ignore_ascii_case("all") {
            targets.extend(Target::ALL);
        } else {
            targets.push(value.parse::<Target>()?);
        }
    }
    Ok(targets)
}

fn cmd_generate(
    model: &Path,
    output: Option<PathBuf>,
    targets: &[String],
    config_path: Option<&Path>,
) -> Result<()> {
    let config = match config_path {
        Some(path) => BindforgeConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => BindforgeConfig::load_from_cwd().context("Failed to load bindforge.toml")?,
    };

    let component = load_model(model)?;
    let targets = parse_targets(targets, &config)?;
    let output_dir = output.unwrap_or_else(|| config.output.dir.clone());

    let artifacts = generate_all(&component, &targets, &config.to_options())
        .context("Binding generation failed")?;
    let written = write_artifacts(&output_dir, &artifacts)
        .with_context(|| format!("Failed to write to {}", output_dir.display()))?;

    for path in &written {
        println!("{}", path.display());
    }
    println!(
        "Generated {} files for {} in {}",
        written.len(),
        component.library_name,
        output_dir.display()
    );

    Ok(())
}

fn cmd_check(model: &Path) -> Result<()> {
    let component = load_model(model)?;
    validate_component(&component).context("Model validation failed")?;

    let class_methods: usize = component.classes.iter().map(|c| c.methods.len()).sum();
    println!(
        "{} ({}) is valid: {} classes, {} class methods, {} global methods",
        component.library_name,
        component.name_space,
        component.classes.len(),
        class_methods,
        component.global.methods.len()
    );

    Ok(())
}

fn cmd_symbols(model: &Path, library: Option<&Path>) -> Result<()> {
    let component = load_model(model)?;
    validate_component(&component).context("Model validation failed")?;

    let ns = component.name_space.as_str();
    for (scope, method) in component.methods_in_table_order() {
        println!("{}", naming::export_name(ns, scope, method));
    }

    if let Some(path) = library {
        let mut table = WrapperTable::new(&component);
        WrapperTable::init(Some(&mut table))?;
        if let Err(err) = WrapperTable::load(Some(&mut table), Some(path)) {
            let code = table.result_code(&err);
            return Err(err).with_context(|| format!("Load failed with result code {}", code));
        }
        println!(
            "Resolved {} exports from {}",
            table.slots().len(),
            path.display()
        );
        WrapperTable::release(Some(&mut table))?;
    }

    Ok(())
}

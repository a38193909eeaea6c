//! Minard CLI entry point.
//!
//! Replays recorded store actions and converts server responses into them.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use minard::api::{Document, convert_document};
use minard::config::{self, MinardConfig, OutputFormat};
use minard::report::StoreSummary;
use minard::store::{Action, Store};

#[derive(Parser, Debug)]
#[command(name = "minard")]
#[command(version)]
#[command(about = "Normalized state store for Minard deployment data", long_about = None)]
struct Args {
    /// Config file (defaults to MINARD_CONFIG_PATH or the data dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format, overrides the config
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Dispatch newline-delimited JSON actions and print the resulting state
    Replay {
        /// Action file, or - for stdin
        file: PathBuf,

        /// Number of activities to show, overrides the config
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Turn a JSON:API response into store actions, one per line
    Convert {
        /// Response file, or - for stdin
        file: PathBuf,
    },

    /// Write the current settings to the config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    }
    .context("Failed to load config")?;

    env_logger::Builder::from_env(Env::default().default_filter_or(config.log_filter.as_str()))
        .init();

    let output = args.output.unwrap_or(config.output);
    match args.command {
        Commands::Replay { file, limit } => replay(&file, limit, output, &config),
        Commands::Convert { file } => convert(&file),
        Commands::InitConfig { force } => {
            let path = args.config.unwrap_or_else(config::config_path);
            init_config(&path, force, &config)
        }
    }
}

fn init_config(path: &Path, force: bool, config: &MinardConfig) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists, use --force to overwrite", path.display());
    }
    config::save_config_to(config, path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn open(path: &Path) -> Result<Box<dyn Read>> {
    if path == Path::new("-") {
        return Ok(Box::new(std::io::stdin()));
    }
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(Box::new(file))
}

fn replay(
    path: &Path,
    limit: Option<usize>,
    output: OutputFormat,
    config: &MinardConfig,
) -> Result<()> {
    let mut store = Store::new();
    let reader = BufReader::new(open(path)?);

    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let action: Action = serde_json::from_str(line)
            .with_context(|| format!("Invalid action on line {}", index + 1))?;
        store.dispatch(action);
    }
    log::info!("Replayed {} actions", store.dispatched());

    let summary = StoreSummary::new(&store, limit.unwrap_or(config.activity_feed_limit));
    match output {
        OutputFormat::Text => print!("{summary}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }
    Ok(())
}

fn convert(path: &Path) -> Result<()> {
    let mut json = String::new();
    open(path)?
        .read_to_string(&mut json)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let document = Document::parse(&json)?;
    let converted = convert_document(&document).context("Failed to convert response")?;
    if !converted.skipped.is_empty() {
        log::warn!("Skipped resources: {}", converted.skipped.join(", "));
    }

    let mut stdout = std::io::stdout().lock();
    for action in converted.into_actions() {
        writeln!(stdout, "{}", serde_json::to_string(&action)?)?;
    }
    Ok(())
}

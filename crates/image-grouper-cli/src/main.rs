use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use image_grouper_core::{Config, HashAlgorithm, ImageGrouper, LogLevel, SourceItem};
use log::info;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

mod discovery;
mod progress;

use discovery::expand_paths;
use progress::ProgressReporter;

#[derive(Parser)]
#[command(name = "image-grouper")]
#[command(about = "Group images by exact and perceptual similarity")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find byte-identical images
    Duplicates {
        /// Image files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Hash algorithm (md5, sha1, sha256, blake3)
        #[arg(long)]
        algorithm: Option<HashAlgorithm>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Group visually similar images
    Similar {
        /// Image files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        perceptual: PerceptualArgs,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Rank images by similarity to a reference image
    Compare {
        /// Reference image
        reference: PathBuf,

        /// Candidate image files or directories
        #[arg(required = true)]
        candidates: Vec<PathBuf>,

        #[command(flatten)]
        perceptual: PerceptualArgs,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Generate default configuration file
    GenerateConfig {
        /// Path to save configuration file
        #[arg(default_value = "image-grouper.json")]
        path: PathBuf,
    },
}

#[derive(Args)]
struct PerceptualArgs {
    /// Maximum Hamming distance to consider images similar
    #[arg(long)]
    threshold: Option<u32>,

    /// Side of the perceptual hash grid (4-16)
    #[arg(long)]
    hash_size: Option<u32>,
}

#[derive(Args)]
struct CommonArgs {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of fingerprinting threads (0 = one per CPU)
    #[arg(long)]
    threads: Option<usize>,

    /// Maximum directory depth when scanning directories
    #[arg(long)]
    max_depth: Option<usize>,

    /// Write logs to rotating files in this directory instead of stderr
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Print JSON on a single line
    #[arg(long)]
    compact: bool,
}

impl CommonArgs {
    /// Load the configuration, apply overrides and start logging
    fn prepare(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(config_path) => Config::from_file(config_path)?,
            None => Config::default(),
        };

        if let Some(threads) = self.threads {
            config.threads = threads;
        }

        // Set log level based on verbosity
        config.log_level = match self.verbose {
            0 => config.log_level,
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        };

        init_logging(self.log_dir.as_deref(), config.log_level)?;
        Ok(config)
    }
}

impl PerceptualArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(hash_size) = self.hash_size {
            config.hash_size = hash_size;
        }
    }
}

fn init_logging(log_dir: Option<&Path>, level: LogLevel) -> Result<()> {
    match log_dir {
        Some(dir) => image_grouper_core::logging::init_logger(dir, level.into())
            .context("Failed to initialize file logging")?,
        None => env_logger::Builder::new()
            .filter_level(level.into())
            .parse_default_env()
            .init(),
    }
    Ok(())
}

fn resolve_items(paths: &[PathBuf], max_depth: Option<usize>) -> Result<Vec<SourceItem<PathBuf>>> {
    let files = expand_paths(paths, max_depth)?;
    info!("Found {} images", files.len());
    Ok(files.into_iter().map(SourceItem::from_path).collect())
}

/// Build the grouper and run `op` with a progress bar over `total` items
fn run_with_progress<T>(
    config: Config,
    total: usize,
    op: impl FnOnce(&ImageGrouper) -> T,
) -> Result<T> {
    let counter = Arc::new(AtomicUsize::new(0));
    let grouper = ImageGrouper::new(config)?.with_progress(Arc::clone(&counter));

    let reporter = ProgressReporter::start(total, counter);
    let result = op(&grouper);
    reporter.finish();

    Ok(result)
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", json);
    Ok(())
}

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Duplicates {
            paths,
            algorithm,
            common,
        } => {
            let mut config = common.prepare()?;
            if let Some(algorithm) = algorithm {
                config.hash_algorithm = algorithm;
            }

            let items = resolve_items(&paths, common.max_depth)?;
            let report = run_with_progress(config, items.len(), |grouper| {
                grouper.find_exact_duplicates(&items)
            })?;

            info!(
                "{} duplicate groups, {} unique",
                report.duplicate_group_count, report.unique
            );
            print_json(&report, common.compact)
        }

        Commands::Similar {
            paths,
            perceptual,
            common,
        } => {
            let mut config = common.prepare()?;
            perceptual.apply(&mut config);

            let items = resolve_items(&paths, common.max_depth)?;
            let report = run_with_progress(config, items.len(), |grouper| {
                grouper.find_similar_groups(&items)
            })??;

            info!("{} similar groups", report.similar_group_count);
            print_json(&report, common.compact)
        }

        Commands::Compare {
            reference,
            candidates,
            perceptual,
            common,
        } => {
            let mut config = common.prepare()?;
            perceptual.apply(&mut config);

            if !reference.is_file() {
                anyhow::bail!("Reference image does not exist: {}", reference.display());
            }
            let reference = SourceItem::from_path(reference);
            let items = resolve_items(&candidates, common.max_depth)?;
            let report = run_with_progress(config, items.len(), |grouper| {
                grouper.compare_to_reference(&reference, &items)
            })??;

            info!("{} similar candidates", report.similar_count);
            print_json(&report, common.compact)
        }

        Commands::GenerateConfig { path } => {
            let config = Config::default();
            config.save_to_file(&path)?;
            println!("Configuration file generated at: {}", path.display());
            Ok(())
        }
    }
}

use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use claimscan_claims::{ClaimBatch, Origin};
use claimscan_merge::{load_batch, render_report, ClaimMerger, Inventory};
use claimscan_prose::ProseClaimExtractor;
use claimscan_source::SourceClaimExtractor;
use config::FileConfig;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

mod config;
mod summary;

const PROSE_ARTIFACT: &str = "prose_claims.json";
const SOURCE_ARTIFACT: &str = "source_claims.json";
const INVENTORY_ARTIFACT: &str = "claim_inventory.json";
const QUEUE_ARTIFACT: &str = "research_queue.json";

#[derive(Parser)]
#[command(name = "claimscan")]
#[command(about = "Extract and triage claims from papers and code", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// TOML settings with [prose], [source] and [merge] tables
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Wall-clock budget per extractor in seconds; files not started in time are skipped
    #[arg(long, global = true)]
    budget_secs: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract claims from markdown documents
    Prose(ProseArgs),

    /// Extract provenance claims from Python docstrings
    Source(SourceArgs),

    /// Deduplicate and prioritise two claim artifacts
    Merge(MergeArgs),

    /// Run both extractors concurrently, then merge
    Run(RunArgs),
}

#[derive(Args)]
struct ProseArgs {
    /// Directory (or single file) of markdown documents
    root: PathBuf,

    /// Output claim artifact
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args)]
struct SourceArgs {
    /// Directory (or single file) of Python sources
    root: PathBuf,

    /// Output claim artifact
    #[arg(long)]
    out: PathBuf,

    /// Parse cache directory (overrides the config file)
    #[arg(long)]
    cache_dir: Option<PathBuf>,
}

#[derive(Args)]
struct MergeArgs {
    /// Prose claim artifact
    #[arg(long)]
    prose: PathBuf,

    /// Source claim artifact
    #[arg(long)]
    source: PathBuf,

    /// Output inventory
    #[arg(long)]
    out: PathBuf,

    /// Also write the research queue on its own
    #[arg(long)]
    queue_out: Option<PathBuf>,

    /// Also write a markdown report
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args)]
struct RunArgs {
    /// Markdown documents root
    #[arg(long)]
    docs: PathBuf,

    /// Python sources root
    #[arg(long)]
    src: PathBuf,

    /// Directory for all four artifacts
    #[arg(long)]
    out_dir: PathBuf,

    /// Parse cache directory (overrides the config file)
    #[arg(long)]
    cache_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = FileConfig::load(cli.config.as_deref())?;
    let deadline = cli
        .budget_secs
        .map(|secs| Instant::now() + Duration::from_secs(secs));

    match cli.command {
        Commands::Prose(args) => run_prose(args, config, deadline).await,
        Commands::Source(args) => run_source(args, config, deadline).await,
        Commands::Merge(args) => run_merge(args, config),
        Commands::Run(args) => run_pipeline(args, config, deadline).await,
    }
}

async fn run_prose(args: ProseArgs, config: FileConfig, deadline: Option<Instant>) -> Result<()> {
    let extractor = ProseClaimExtractor::new(config.prose)?;
    let batch = extractor
        .extract_root(&args.root, deadline)
        .await
        .with_context(|| format!("Prose extraction failed for {}", args.root.display()))?;
    write_batch(&batch, &args.out)?;
    summary::print_batch(&batch);
    Ok(())
}

async fn run_source(
    args: SourceArgs,
    mut config: FileConfig,
    deadline: Option<Instant>,
) -> Result<()> {
    if args.cache_dir.is_some() {
        config.source.cache_dir = args.cache_dir;
    }
    let extractor = SourceClaimExtractor::new(config.source)?;
    let batch = extractor
        .extract_root(&args.root, deadline)
        .await
        .with_context(|| format!("Source extraction failed for {}", args.root.display()))?;
    write_batch(&batch, &args.out)?;
    summary::print_batch(&batch);
    Ok(())
}

fn run_merge(args: MergeArgs, config: FileConfig) -> Result<()> {
    let merger = ClaimMerger::new(config.merge)?;
    let prose = load_batch(&args.prose, Origin::Prose)?;
    let source = load_batch(&args.source, Origin::Source)?;
    let inventory = merger.merge_batches(prose, source);

    write_inventory(&inventory, &args.out, args.queue_out.as_deref())?;
    if let Some(report) = &args.report {
        std::fs::write(report, render_report(&inventory))
            .with_context(|| format!("Failed to write report {}", report.display()))?;
    }
    summary::print_inventory(&inventory);
    Ok(())
}

async fn run_pipeline(
    args: RunArgs,
    mut config: FileConfig,
    deadline: Option<Instant>,
) -> Result<()> {
    if args.cache_dir.is_some() {
        config.source.cache_dir = args.cache_dir;
    }
    let prose = ProseClaimExtractor::new(config.prose)?;
    let source = SourceClaimExtractor::new(config.source)?;
    let merger = ClaimMerger::new(config.merge)?;

    let (prose_batch, source_batch) = tokio::join!(
        prose.extract_root(&args.docs, deadline),
        source.extract_root(&args.src, deadline)
    );
    // A failed side must not hide the other side's summary
    if let Ok(batch) = &prose_batch {
        summary::print_batch(batch);
    }
    if let Ok(batch) = &source_batch {
        summary::print_batch(batch);
    }
    let prose_batch = prose_batch
        .with_context(|| format!("Prose extraction failed for {}", args.docs.display()))?;
    let source_batch = source_batch
        .with_context(|| format!("Source extraction failed for {}", args.src.display()))?;

    write_batch(&prose_batch, &args.out_dir.join(PROSE_ARTIFACT))?;
    write_batch(&source_batch, &args.out_dir.join(SOURCE_ARTIFACT))?;

    let inventory = merger.merge_batches(prose_batch, source_batch);
    write_inventory(
        &inventory,
        &args.out_dir.join(INVENTORY_ARTIFACT),
        Some(args.out_dir.join(QUEUE_ARTIFACT).as_path()),
    )?;
    summary::print_inventory(&inventory);
    Ok(())
}

fn write_batch(batch: &ClaimBatch, path: &Path) -> Result<()> {
    batch
        .write_to(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn write_inventory(inventory: &Inventory, out: &Path, queue_out: Option<&Path>) -> Result<()> {
    inventory
        .write_to(out)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    if let Some(queue_out) = queue_out {
        inventory
            .research_queue
            .write_to(queue_out)
            .with_context(|| format!("Failed to write {}", queue_out.display()))?;
    }
    log::info!("Inventory written to {}", out.display());
    Ok(())
}

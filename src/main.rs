use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dnafrags::genomics::{io, repair_proper_pairs, BinSink, ConsoleSink, CsvSink};
use dnafrags::{summarize_with, AggregationConfig, RunStats};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dnafrags", about = "Fragment length and density summaries for paired-end alignments")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Bin fragments by midpoint and report read counts and median lengths.
    Summarize(SummarizeArgs),
    /// Set the proper-pair flag on pairs whose mate orientation is consistent.
    FixPairs {
        /// Input alignment file (SAM/BAM/CRAM).
        input: PathBuf,
        /// Output BAM file.
        output: PathBuf,
        /// Pairs with a longer template are not marked as proper.
        #[arg(short = 'm', long, value_name = "LENGTH")]
        max_tlen: Option<u64>,
        /// Show progress through the file (requires an index).
        #[arg(short, long)]
        progress: bool,
    },
}

#[derive(Args, Debug)]
struct SummarizeArgs {
    /// Input alignment file (SAM/BAM/CRAM).
    input: PathBuf,
    /// Include reads that fail the vendor quality check or are duplicates.
    #[arg(short, long)]
    include_all: bool,
    /// Show detailed messages.
    #[arg(short, long)]
    verbose: bool,
    /// Bin reads into bins of SIZE bases; 0 disables binning.
    #[arg(short, long, value_name = "SIZE", default_value_t = 50)]
    bin_size: u64,
    /// Discard reads with a MAPQ below QUALITY.
    #[arg(short, long, value_name = "QUALITY", default_value_t = 50)]
    mapq_min: u8,
    /// Discard reads with a template length below LENGTH.
    #[arg(short = 'l', long, value_name = "LENGTH")]
    length_min: Option<u64>,
    /// Discard reads with a template length above LENGTH.
    #[arg(short = 'L', long, value_name = "LENGTH")]
    length_max: Option<u64>,
    /// Write CSV to FILE instead of printing sentences.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Discard bins with fewer than READS reads.
    #[arg(short = 'R', long, value_name = "READS", default_value_t = 0)]
    reads_min: u64,
    /// Fill the spots between data points with zero rows (CSV only).
    #[arg(short, long)]
    fill_in: bool,
    /// Include reads whose mate maps to another reference.
    #[arg(short, long)]
    rnext_ineq: bool,
    /// Show progress through the file (requires an index).
    #[arg(short, long)]
    progress: bool,
    /// Print neither the results banner nor the run summary.
    #[arg(short, long)]
    silent: bool,
}

impl SummarizeArgs {
    fn config(&self) -> AggregationConfig {
        AggregationConfig::default()
            .with_include_all(self.include_all)
            .with_bin_size(self.bin_size)
            .with_mapq_min(self.mapq_min)
            .with_length_range(self.length_min, self.length_max)
            .with_reads_min(self.reads_min)
            .with_fill_in(self.fill_in)
            .with_mate_mismatch_allowed(self.rnext_ineq)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbose = matches!(&cli.command, Commands::Summarize(args) if args.verbose);
    init_tracing(verbose);

    match cli.command {
        Commands::Summarize(args) => run_summarize(args)?,
        Commands::FixPairs {
            input,
            output,
            max_tlen,
            progress,
        } => run_fix_pairs(input, output, max_tlen, progress)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_summarize(args: SummarizeArgs) -> Result<()> {
    let start = Instant::now();
    let config = args.config();
    info!(?config, "summarizing {}", args.input.display());

    if let Some(path) = &args.output {
        io::ensure_output_available(path)?;
    }

    let output = args.output.clone();
    let silent = args.silent;
    let outcome = summarize_with(&args.input, &config, args.progress, move || {
        let sink: Box<dyn BinSink> = match &output {
            Some(path) => Box::new(CsvSink::new(io::create_csv_output(path)?)),
            None => Box::new(ConsoleSink::stdout(!silent)),
        };
        Ok(sink)
    })
    .with_context(|| format!("failed to summarize {}", args.input.display()))?;

    if !args.silent {
        print_summary(&outcome.stats, start.elapsed().as_secs_f64());
    }
    if let Some(path) = &args.output {
        println!("Output results to {}.", path.display());
    }
    Ok(())
}

fn print_summary(stats: &RunStats, seconds: f64) {
    println!(
        "Skipped {} read(s) because of vendor quality check failure.",
        stats.skipped_quality
    );
    println!(
        "Skipped {} read(s) because below quality threshold.",
        stats.skipped_mapq
    );
    println!(
        "Skipped {} read(s) because outside length threshold.",
        stats.skipped_length
    );
    println!(
        "Skipped {} read(s) because of missing POS/TLEN field.",
        stats.skipped_missing_position
    );
    println!(
        "Skipped {} read(s) because of invalid RNEXT field.",
        stats.skipped_mate_mismatch
    );
    println!(
        "Total {} read(s) (processed {}, took {:.6} seconds).",
        stats.total, stats.processed, seconds
    );
}

fn run_fix_pairs(
    input: PathBuf,
    output: PathBuf,
    max_tlen: Option<u64>,
    progress: bool,
) -> Result<()> {
    let start = Instant::now();
    let stats = repair_proper_pairs(&input, &output, max_tlen, progress)
        .with_context(|| format!("failed to repair proper-pair flags in {}", input.display()))?;

    println!("{} reads were changed.", stats.edited);
    println!("Finished in {:.6} seconds.", start.elapsed().as_secs_f64());
    Ok(())
}

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use virotator::align::{self, Aligner, BlastnAligner, BlastnOpt, FmAlignOpt, FmAligner};
use virotator::io::{self, SeqFormat};
use virotator::pipeline::locate::{self, PolicyKind};
use virotator::pipeline::report::ProcessingLog;
use virotator::pipeline::summary::{RunSummary, SummaryRow, SUMMARY_FILE};
use virotator::pipeline::{self, rotate, strand, triple, RunConfig};
use virotator::reference::ReferenceSet;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "virotator", author, version, about = "Orient and rotate circular viral genome sequences", arg_required_else_help = true)]
struct Cli {
    /// Log verbosity: -v info, -vv debug, -vvv trace (RUST_LOG overrides)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum AlignerKind {
    /// External NCBI blastn
    Blastn,
    /// Built-in FM index seeding
    Fm,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the whole pipeline over every file of a directory
    Run {
        /// Directory with the input sequence files
        #[arg(short = 'i', long = "input-dir")]
        input_dir: PathBuf,
        /// Directory receiving rotated files, logs and the summary
        #[arg(short = 'o', long = "output-dir")]
        output_dir: PathBuf,
        /// Record format of the input files
        #[arg(short = 't', long = "file-type", value_enum)]
        format: SeqFormat,
        /// Reference dataset name (a directory under --reference-root)
        #[arg(short = 'd', long = "dataset")]
        dataset: String,
        #[arg(long = "reference-root", default_value = "references")]
        reference_root: PathBuf,
        #[arg(long = "aligner", value_enum, default_value_t = AlignerKind::Blastn)]
        aligner: AlignerKind,
        /// blastn executable
        #[arg(long = "blastn", default_value = "blastn")]
        blastn: String,
        /// How to choose one gene start when several hits exist
        #[arg(long = "policy", value_enum, default_value_t = PolicyKind::MiddleThird)]
        policy: PolicyKind,
        #[arg(long = "min-seed-len", default_value_t = 15)]
        min_seed_len: usize,
        #[arg(long = "max-gap", default_value_t = 50)]
        max_gap: usize,
        #[arg(long = "min-chain-score", default_value_t = 30)]
        min_chain_score: u32,
        #[arg(long = "threads", default_value_t = 1)]
        threads: usize,
    },
    /// Reverse complement minus-strand sequences given a `qseqid sstrand` table
    Revcomp {
        #[arg(short = 'f', long = "input-file")]
        input: PathBuf,
        #[arg(short = 't', long = "file-type", value_enum)]
        format: SeqFormat,
        #[arg(short = 'b', long = "blast-file")]
        table: PathBuf,
        #[arg(short = 'o', long = "output-file")]
        output: PathBuf,
        #[arg(short = 'l', long = "output-log")]
        log: PathBuf,
    },
    /// Concatenate every sequence with itself three times
    Triple {
        #[arg(short = 'f', long = "input-file")]
        input: PathBuf,
        #[arg(short = 't', long = "file-type", value_enum)]
        format: SeqFormat,
        #[arg(short = 'o', long = "output-file")]
        output: PathBuf,
    },
    /// Rotate tripled sequences given a `qseqid qstart [qend]` table
    Rotate {
        #[arg(short = 'f', long = "input-file")]
        input: PathBuf,
        #[arg(short = 't', long = "file-type", value_enum)]
        format: SeqFormat,
        #[arg(short = 'b', long = "blast-file")]
        table: PathBuf,
        #[arg(short = 'o', long = "output-file")]
        output: PathBuf,
        #[arg(short = 'l', long = "output-log")]
        log: PathBuf,
        #[arg(long = "policy", value_enum, default_value_t = PolicyKind::MiddleThird)]
        policy: PolicyKind,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();

    match cli.command {
        Commands::Run {
            input_dir,
            output_dir,
            format,
            dataset,
            reference_root,
            aligner,
            blastn,
            policy,
            min_seed_len,
            max_gap,
            min_chain_score,
            threads,
        } => {
            let refs = ReferenceSet::discover(&reference_root, &dataset)?;
            let aligner: Box<dyn Aligner> = match aligner {
                AlignerKind::Blastn => Box::new(BlastnAligner::new(
                    refs.genome_path.clone(),
                    refs.gene_path.clone(),
                    BlastnOpt { executable: blastn },
                )),
                AlignerKind::Fm => {
                    let opt = FmAlignOpt { min_seed_len, max_gap, min_chain_score, threads, ..FmAlignOpt::default() };
                    Box::new(FmAligner::new(&refs.genome, &refs.gene, opt)?)
                }
            };
            let cfg = RunConfig { input_dir, output_dir, format };
            run(&cfg, aligner.as_ref(), policy)
        }
        Commands::Revcomp { input, format, table, output, log } => run_revcomp(&input, format, &table, &output, &log),
        Commands::Triple { input, format, output } => run_triple(&input, format, &output),
        Commands::Rotate { input, format, table, output, log, policy } => {
            run_rotate(&input, format, &table, &output, &log, policy)
        }
    }
}

fn run(cfg: &RunConfig, aligner: &dyn Aligner, policy: PolicyKind) -> Result<()> {
    let policy = policy.policy();
    let report = pipeline::run_batch(cfg, aligner, policy.as_ref())?;
    for f in &report.files {
        println!(
            "{}\t{} sequences\t{} rotated\t{} without gene\t{} partial gene",
            f.sample, f.counters.records, f.counters.rotated, f.counters.without_gene, f.counters.less_gene
        );
    }
    println!("summary: {}", report.summary_path.display());
    Ok(())
}

fn read_table(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("cannot read alignment table '{}'", path.display()))
}

fn run_revcomp(input: &Path, format: SeqFormat, table: &Path, output: &Path, log_path: &Path) -> Result<()> {
    let records = io::read_records(input, format)?;
    let hits = align::parse_strand_table(&read_table(table)?)?;
    let calls = strand::classify(&records, &hits);
    let oriented = strand::orient(records, &calls);
    io::write_records_to_path(output, format, &oriented.records)?;

    let log = ProcessingLog {
        reverse_complemented: oriented.reverse_complemented,
        unresolved: oriented.unresolved,
        ..ProcessingLog::default()
    };
    log.write_to_path(log_path, &pipeline::sample_name(input))
}

fn run_triple(input: &Path, format: SeqFormat, output: &Path) -> Result<()> {
    let records = io::read_records(input, format)?;
    io::write_records_to_path(output, format, &triple::triple(&records))
}

fn run_rotate(
    input: &Path,
    format: SeqFormat,
    table: &Path,
    output: &Path,
    log_path: &Path,
    policy: PolicyKind,
) -> Result<()> {
    let tripled = io::read_records(input, format)?;
    let hits = align::parse_gene_table(&read_table(table)?)?;
    let placements = locate::locate(&tripled, &hits, policy.policy().as_ref());
    let rotation = rotate::rotate(&tripled, &placements)?;
    io::write_records_to_path(output, format, &rotation.records)?;

    let sample = pipeline::sample_name(log_path);
    let log = ProcessingLog {
        without_gene: rotation.without_gene,
        less_gene: rotation.less_gene,
        ..ProcessingLog::default()
    };
    log.write_to_path(log_path, &sample)?;

    // the rejection count lands next to the log, one row per invocation
    let dir = log_path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let mut summary = RunSummary::new();
    summary.push(SummaryRow { sample, without_gene: log.without_gene.len(), less_gene: log.less_gene.len() });
    summary.write_to(&dir.join(SUMMARY_FILE))
}

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use keyset_bench::{demo, report, BenchConfig, DatasetKind, HasherKind, Structure};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "keyset-bench")]
#[command(about = "Compare BST, AVL and hash table engines on generated key sets")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every (dataset, structure) pair and print a summary
    Run(RunArgs),
    /// Print the walkthrough scenarios for each engine
    Demo,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Keys inserted per dataset (N)
    #[arg(short = 'n', long, default_value_t = 50_000)]
    keys: usize,

    /// Search operations (M); defaults to N
    #[arg(long)]
    searches: Option<usize>,

    /// Delete operations (K); defaults to N / 10
    #[arg(long)]
    deletes: Option<usize>,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Share of positions shuffled in the nearly-sorted dataset
    #[arg(long, default_value_t = 0.10)]
    disorder: f64,

    /// Fixed table size for the hash tables
    #[arg(long, conflicts_with = "target_load")]
    table_size: Option<usize>,

    /// Load factor the derived table size aims for
    #[arg(long, default_value_t = 0.5)]
    target_load: f64,

    /// Data structures to test (comma-separated or multiple flags)
    #[arg(short, long, value_enum, value_delimiter = ',', default_values_t = Structure::ALL.to_vec())]
    structures: Vec<Structure>,

    /// Datasets to generate (comma-separated or multiple flags)
    #[arg(short, long, value_enum, value_delimiter = ',', default_values_t = DatasetKind::ALL.to_vec())]
    datasets: Vec<DatasetKind>,

    #[arg(long, value_enum, default_value_t = HasherKind::Identity)]
    hasher: HasherKind,

    /// Write records as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write records as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

impl RunArgs {
    fn config(&self) -> BenchConfig {
        BenchConfig {
            keys: self.keys,
            searches: self.searches.unwrap_or(self.keys),
            deletes: self.deletes.unwrap_or(self.keys / 10),
            seed: self.seed,
            disorder: self.disorder,
            table_size: self.table_size,
            target_load: self.target_load,
            hasher: self.hasher,
            structures: self.structures.clone(),
            datasets: self.datasets.clone(),
            ..BenchConfig::default()
        }
    }
}

fn run(args: &RunArgs) -> keyset_bench::Result<()> {
    let config = args.config();
    let records = keyset_bench::run(&config)?;
    report::print_summary(&mut io::stdout().lock(), &records)?;

    if let Some(path) = &args.csv {
        report::save_csv(path, &records)?;
        info!(path = %path.display(), "wrote CSV");
    }
    if let Some(path) = &args.json {
        report::save_json(path, &records)?;
        info!(path = %path.display(), "wrote JSON");
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Command::Run(args) => run(args),
        Command::Demo => demo::run_demo(&mut io::stdout().lock()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

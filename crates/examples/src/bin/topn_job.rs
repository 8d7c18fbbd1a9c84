use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::thread;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use tracing::info;

use topn_runtime::metrics::{JobTimer, MetricsRegistry};
use topn_runtime::{init_tracing, run_over_file, JobConfig};

/// Compute the N largest numeric lines of a file.
#[derive(Parser)]
struct Args {
    /// Input file of base-10 signed integer lines.
    input: PathBuf,
    /// Output destination; `-` writes to stdout.
    output: PathBuf,
    /// How many of the largest values to keep.
    #[arg(short = 'n', long)]
    top_n: usize,
    /// Partition count; defaults to the available parallelism.
    #[arg(long)]
    workers: Option<usize>,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    ensure!(args.top_n > 0, "--top-n must be a positive integer");
    let workers = args.workers.unwrap_or_else(|| {
        thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
    });

    let timer = JobTimer::start();
    let metrics = MetricsRegistry::default();
    let cfg = JobConfig { top_n: args.top_n };
    let results = run_over_file(&cfg, workers, &args.input, &metrics)?;

    let mut sink: Box<dyn Write> = if args.output.as_os_str() == "-" {
        Box::new(io::stdout().lock())
    } else {
        let file = File::create(&args.output)
            .with_context(|| format!("create {}", args.output.display()))?;
        Box::new(BufWriter::new(file))
    };
    for record in &results {
        writeln!(sink, "{}", record.line)?;
    }
    sink.flush()?;

    info!(
        "{}",
        metrics
            .snapshot()
            .to_json_line("topn_job", Some(timer.elapsed()))
    );
    Ok(())
}

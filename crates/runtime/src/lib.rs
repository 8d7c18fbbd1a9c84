//! Batch-execution substrate for the two-phase top-N pipeline: input
//! splitting, thread fan-out/fan-in, and runtime bootstrap.

use anyhow::Result;
use tracing::{info, Level};

pub mod job;
pub mod metrics;
pub mod split;

pub use job::{run_over_file, run_over_lines, JobConfig};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_max_level(Level::INFO)
        .try_init();
}

/// Start a single-process timely runtime and execute the provided closure once per worker.
///
/// The selection stages are runtime-agnostic; this bootstrap hosts them in a
/// dataflow instead of the thread driver in [`job`].
pub fn start_runtime<F>(workers: usize, f: F) -> Result<()>
where
    F: Fn(usize, &mut timely::worker::Worker<timely::communication::allocator::Generic>) + Clone + Send + Sync + 'static,
{
    info!(%workers, "starting timely runtime");
    timely::execute_from_args(std::env::args(), move |worker| {
        let index = worker.index();
        f(index, worker);
    })
    .map_err(anyhow::Error::msg)?;
    Ok(())
}

//! Block Cache - hit-ratio runner
//!
//! Replays a skewed read workload against each eviction policy and prints
//! one JSON report per run on stdout.

use std::env;
use std::fs;

use anyhow::{ensure, Context};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use block_cache::cache::{FileStore, LARGE_BLOCK_BYTES};
use block_cache::workload::{generate_backing_file, run_hit_ratio};
use block_cache::Config;

/// Entry point for the hit-ratio runner.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open or generate the backing file
/// 4. Run every configured policy and read count, printing reports
fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var.
    // Logs go to stderr so stdout only carries reports.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "block_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting block cache hit-ratio run");

    let config = Config::from_env();
    config.validate()?;
    info!(
        "Configuration loaded: workload max_size={}, policies={:?}, reads={:?}, rounds={}, seed={}",
        config.max_size, config.policies, config.reads, config.rounds, config.seed
    );

    let (path, file_size) = match &config.backing_file {
        Some(path) => {
            let len = fs::metadata(path)
                .with_context(|| format!("cannot stat backing file {}", path.display()))?
                .len();
            (path.clone(), len)
        }
        None => {
            let path = env::temp_dir().join(format!("block_cache_{}.bin", config.seed));
            generate_backing_file(&path, config.file_size, config.seed)?;
            (path, config.file_size as u64)
        }
    };
    ensure!(
        file_size >= LARGE_BLOCK_BYTES as u64,
        "backing file {} is smaller than one large block",
        path.display()
    );
    let store = FileStore::new(&path);

    for &kind in &config.policies {
        for &reads in &config.reads {
            let report = run_hit_ratio(&store, file_size, kind, reads, &config)?;
            println!("{}", serde_json::to_string(&report)?);
        }
    }

    info!("Hit-ratio run complete");
    Ok(())
}

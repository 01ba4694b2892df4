use crate::config::pipeline::LogConfig;
use crate::utils::error::Result;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

fn build_filter(level: &str, verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { level };
        EnvFilter::new(format!("recon_etl={},warn", level))
    })
}

/// Console output only. Used before the pipeline settings are known, and by
/// `--dry-run`.
pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(build_filter("info", verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// Console (stderr) plus an append-only log file under `LOG_DIR`. Stdout is
/// left to the dry-run listing and the `--json` report.
pub fn init_run_logger(config: &LogConfig, verbose: bool) -> Result<()> {
    std::fs::create_dir_all(&config.log_dir)?;
    let log_path = config.log_dir.join(&config.log_filename);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let console = if config.json {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .json()
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .compact()
            .boxed()
    };

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(build_filter(&config.level, verbose))
        .with(console)
        .with(file_layer)
        .init();

    tracing::debug!("Logging to {}", log_path.display());
    Ok(())
}

/// Identifier attached to every log line of one run.
pub fn new_run_id(pipeline: &str) -> String {
    let now = chrono::Utc::now();
    format!(
        "{}_{}_{:05}",
        pipeline,
        now.format("%Y%m%d%H%M%S"),
        std::process::id() % 100_000
    )
}

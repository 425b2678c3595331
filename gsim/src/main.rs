// gsim/src/main.rs
use std::process;

use clap::Parser;
use colored::Colorize;
use gsim_common::config::Config;
use tokio_util::sync::CancellationToken;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, warn};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::CliArgs;

#[tokio::main]
async fn main() {
    let cli_args = CliArgs::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            process::exit(1);
        }
    };

    let level_filter = match cli_args.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let max_log_level = level_filter.into_level().unwrap_or(tracing::Level::INFO);

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("GSIM_LOG")
        .from_env_lossy();

    let log_dir = config.cache_root().join("logs");
    if cli_args.verbose > 0 && std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::daily(&log_dir, "gsim.log");
        let (non_blocking_appender, guard) = tracing_appender::non_blocking(file_appender);

        // In verbose mode, mirror everything to a daily log file as well.
        let stderr_writer = std::io::stderr.with_max_level(max_log_level);
        let file_writer = non_blocking_appender.with_max_level(max_log_level);

        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(stderr_writer.and(file_writer))
            .with_ansi(true)
            .without_time()
            .try_init();

        Box::leak(Box::new(guard)); // Keep guard alive

        debug!(
            "Verbose logging enabled. Writing logs to: {}/gsim.log",
            log_dir.display()
        );
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .without_time()
            .try_init();
    }

    // A single run-scoped cancellation signal: Ctrl-C stops whatever the
    // session is doing, including any already-started device process.
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, shutting down...");
            signal_token.cancel();
        }
    });

    if let Err(e) = cli_args.command.run(&config, cancel).await {
        error!("Command failed: {:#}", e);
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        process::exit(1);
    }
    debug!("Command completed successfully.");
}

//! cmamap - live map of CMA buffer usage.
//!
//! Reads the kernel's DMA-API debug dump once per interval and draws where
//! the VC4 GPU buffers sit inside the CMA pool. Press `q`, Esc or Ctrl-C to
//! leave.

mod commands;
mod output;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cmamap_core::MonitorConfig;
use cmamap_core::config::{DEFAULT_DUMP_PATH, DEFAULT_POOL_SIZE};
use tracing::Level;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

const MIB: u64 = 1024 * 1024;

/// Live terminal map of CMA buffer placement.
///
/// Needs read access to the kernel debugfs (usually root).
#[derive(Parser)]
#[command(name = "cmamap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// DMA-API debug dump to read
    #[arg(long, default_value = DEFAULT_DUMP_PATH)]
    dump: PathBuf,

    /// Refresh interval in milliseconds
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,

    /// CMA pool size in MiB
    #[arg(long, default_value_t = DEFAULT_POOL_SIZE / MIB)]
    pool_mib: u64,

    /// Print a single snapshot to stdout and exit
    #[arg(long)]
    once: bool,

    /// Snapshot format (with --once)
    #[arg(long, default_value = "map")]
    format: OutputFormat,

    /// Enable verbose debug logging (needs --log-file in the live view)
    #[arg(long, short)]
    verbose: bool,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Output format options.
#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// The same layout the live screen shows
    #[default]
    Map,
    /// Machine-readable JSON format
    Json,
}

impl Cli {
    fn config(&self) -> Result<MonitorConfig> {
        let pool_size = self
            .pool_mib
            .checked_mul(MIB)
            .context("pool size does not fit in 64 bits")?;

        Ok(MonitorConfig::default()
            .with_dump_path(&self.dump)
            .with_pool_size(pool_size)
            .with_interval(Duration::from_millis(self.interval_ms)))
    }

    /// Most detailed level that gets logged.
    ///
    /// In the live view stderr shares the terminal with the map, so debug
    /// output is only enabled there when it goes to a log file.
    fn log_level(&self) -> Level {
        if self.verbose && (self.once || self.log_file.is_some()) {
            Level::DEBUG
        } else {
            Level::WARN
        }
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let writer = match &cli.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(writer)
        .with_ansi(cli.log_file.is_none())
        .init();

    if cli.verbose && cli.log_level() != Level::DEBUG {
        tracing::warn!("debug logging in the live view needs --log-file");
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let result = init_logging(&cli).and_then(|()| cli.config()).and_then(|config| {
        if cli.once {
            commands::snapshot::run(config, cli.format)
        } else {
            commands::watch::run(config)
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["cmamap"]);
        let config = cli.config().unwrap();

        assert_eq!(config.dump_path, PathBuf::from("/sys/kernel/debug/dma-api/dump"));
        assert_eq!(config.pool_size, 316 * MIB);
        assert_eq!(config.interval, Duration::from_secs(1));
        assert!(!cli.once);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "cmamap",
            "--dump",
            "/tmp/dump",
            "--interval-ms",
            "250",
            "--pool-mib",
            "64",
            "--once",
            "--format",
            "json",
        ]);
        let config = cli.config().unwrap();

        assert_eq!(config.dump_path, PathBuf::from("/tmp/dump"));
        assert_eq!(config.pool_size, 64 * MIB);
        assert_eq!(config.interval, Duration::from_millis(250));
        assert!(cli.once);
        assert!(matches!(cli.format, OutputFormat::Json));
    }

    #[test]
    fn test_debug_logging_stays_off_the_live_map() {
        let live = Cli::parse_from(["cmamap", "-v"]);
        assert_eq!(live.log_level(), Level::WARN);

        let live_to_file = Cli::parse_from(["cmamap", "-v", "--log-file", "/tmp/cmamap.log"]);
        assert_eq!(live_to_file.log_level(), Level::DEBUG);
        assert_eq!(live_to_file.log_file, Some(PathBuf::from("/tmp/cmamap.log")));

        let once = Cli::parse_from(["cmamap", "-v", "--once"]);
        assert_eq!(once.log_level(), Level::DEBUG);

        let quiet = Cli::parse_from(["cmamap", "--once"]);
        assert_eq!(quiet.log_level(), Level::WARN);
    }

    #[test]
    fn test_pool_overflow() {
        let cli = Cli::parse_from(["cmamap", "--pool-mib", "18446744073709551615"]);
        assert!(cli.config().is_err());
    }
}

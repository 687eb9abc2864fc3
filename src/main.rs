#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::cargo)]
#![warn(clippy::perf)]
#![warn(clippy::complexity)]
#![warn(clippy::style)]
#![allow(clippy::multiple_crate_versions)]

use std::{path::PathBuf, time::Instant};

use anyhow::{Context, Result, ensure};
use chrono::{DateTime, Local};
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use iptv_checker::{
    Checker, CheckerConfig, M3uFiles, PlaylistSource, RunStats, config::DEFAULT_TIMEOUT_MS,
    ffprobe,
};
use tracing::{Level, info};

/// Utility to check .m3u playlist entries.
/// If no file path or url is provided, this program will attempt to read stdin
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Playlist file path or URL
    file_or_url: Option<String>,

    /// Path to output directory [default: iptv-checker-<date>]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of milliseconds allowed for each stream check
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout: u64,

    /// Allow insecure connections when using SSL
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Log every checked stream instead of showing a progress bar
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    const fn config(&self) -> CheckerConfig {
        CheckerConfig {
            timeout_ms: self.timeout,
            insecure: self.insecure,
            debug: self.debug,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.debug { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    ensure!(args.timeout > 0, "Timeout must be a positive number of milliseconds");
    ensure!(ffprobe::is_installed().await, "ffprobe is not installed!");

    let config = args.config();
    let started = Instant::now();

    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_dir(Local::now()));
    let files = M3uFiles::create(&output_dir)
        .await
        .with_context(|| format!("Creating output directory {output_dir:?}"))?;

    let entries = PlaylistSource::from_arg(args.file_or_url.as_deref())
        .load(&config)
        .await
        .context("Loading playlist")?;
    info!("Found {} playlist entries", entries.len());

    let mut checker = Checker::new(ffprobe::Ffprobe::new(&config), files);
    if !config.debug {
        checker = checker.with_progress(progress_bar());
    }

    let report = checker.run(entries).await?;

    if config.debug {
        info!("Execution time: {:?}", started.elapsed());
    }
    info!("Results written to {output_dir:?}");
    println!("\n{}", summary(&report.stats));

    Ok(())
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    if let Ok(style) =
        ProgressStyle::with_template("[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})")
    {
        pb.set_style(style);
    }
    pb
}

/// `iptv-checker-<d-m-yyyy-hh-MM-ss>` with a 12-hour clock
fn default_output_dir(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!("iptv-checker-{}", now.format("%-d-%-m-%Y-%I-%M-%S")))
}

fn summary(stats: &RunStats) -> String {
    indoc::formatdoc! {"
        Total: {}
        {}
        {}
        {}",
        stats.total,
        style(format!("Online: {}", stats.online)).green(),
        style(format!("Offline: {}", stats.offline)).red(),
        style(format!("Duplicates: {}", stats.duplicates)).yellow(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn output_dir_uses_twelve_hour_clock() {
        let now = Local.with_ymd_and_hms(2024, 3, 7, 15, 4, 9).unwrap();
        assert_eq!(
            default_output_dir(now),
            PathBuf::from("iptv-checker-7-3-2024-03-04-09")
        );
    }

    #[test]
    fn summary_colors_counts() {
        console::set_colors_enabled(true);
        let stats = RunStats {
            total: 4,
            online: 1,
            offline: 1,
            duplicates: 1,
            skipped: 1,
        };

        let summary = summary(&stats);
        assert!(summary.starts_with("Total: 4\n"));
        assert!(summary.contains("\u{1b}[32mOnline: 1"));
        assert!(summary.contains("\u{1b}[31mOffline: 1"));
        assert!(summary.contains("\u{1b}[33mDuplicates: 1"));
    }
}

mod calc;
mod cmd;
mod data;
mod ui;

use crate::calc::scale::Rgb;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "calheat.log";

#[derive(Parser)]
#[command(name = "calheat", about = "calendar heatmap of daily tracked time")]
struct Cli {
    /// Path to the data directory containing config and data files (default: ./config)
    #[arg(long, default_value = "./config")]
    data_dir: PathBuf,

    /// Read activity from this JSON file instead of <data-dir>/data.json
    #[arg(long)]
    data: Option<PathBuf>,

    /// Accent color for the busiest days, e.g. '#ff4500'
    #[arg(long)]
    color: Option<Rgb>,

    /// Date whose year is shown (default: today)
    #[arg(long)]
    date: Option<NaiveDate>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config and one year of sample activity
    Init,
    /// Print tracked time for one day, or per-category totals for the year
    Summary {
        /// Day to summarize (YYYY-MM-DD)
        day: Option<NaiveDate>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = if cli.data_dir.is_absolute() {
        cli.data_dir.clone()
    } else {
        std::env::current_dir()?.join(&cli.data_dir)
    };
    data::persistence::set_data_dir(data_dir.clone());

    let today = Local::now().date_naive();

    // Auto-init when the data directory is missing or empty, unless the user
    // passed an explicit data file or is running `init` already.
    let is_init_command = matches!(cli.command, Some(Commands::Init));
    if !is_init_command && cli.data.is_none() && dir_needs_init(&data_dir) {
        eprintln!(
            "Data directory '{}' is missing or empty, running init...",
            data_dir.display()
        );
        cmd::init::run(today)?;
    }

    init_logging(&data_dir)?;

    let mut settings = data::AppSettings::load()?;
    if let Some(color) = cli.color {
        settings.color = color;
    }
    let anchor = cli.date.unwrap_or(today);

    match cli.command {
        None => cmd::root::run(cli.data.as_deref(), settings, anchor),
        Some(Commands::Init) => cmd::init::run(today),
        Some(Commands::Summary { day }) => cmd::summary::run(cli.data.as_deref(), day, anchor),
    }
}

/// Returns true when `dir` does not exist or exists but contains no files.
fn dir_needs_init(dir: &Path) -> bool {
    if !dir.exists() {
        return true;
    }
    dir.read_dir()
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}

/// Sends tracing output to a log file in `dir`; stdout belongs to the TUI.
fn init_logging(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create dir {}", dir.display()))?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_dir_needs_init_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("does_not_exist");
        assert!(dir_needs_init(&missing));
    }

    #[test]
    fn test_dir_needs_init_empty_dir() {
        let tmp = TempDir::new().unwrap();
        assert!(dir_needs_init(tmp.path()));
    }

    #[test]
    fn test_dir_needs_init_nonempty_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("file.txt"), "data").unwrap();
        assert!(!dir_needs_init(tmp.path()));
    }

    #[test]
    fn test_init_logging_creates_log_file() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("logs");
        init_logging(&dir).unwrap();
        assert!(dir.join(LOG_FILE).exists());
    }

    #[test]
    fn test_cli_parses_color_and_date() {
        let cli = Cli::try_parse_from(["calheat", "--color", "#00ff00", "--date", "2024-05-01"]).unwrap();
        assert_eq!(cli.color, Some(Rgb::new(0, 255, 0)));
        assert_eq!(cli.date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_rejects_bad_color() {
        assert!(Cli::try_parse_from(["calheat", "--color", "orange"]).is_err());
    }

    #[test]
    fn test_cli_summary_day() {
        let cli = Cli::try_parse_from(["calheat", "summary", "2025-01-03"]).unwrap();
        match cli.command {
            Some(Commands::Summary { day }) => {
                assert_eq!(day, NaiveDate::from_ymd_opt(2025, 1, 3));
            }
            _ => panic!("expected summary command"),
        }
    }
}

use anyhow::anyhow;
use clap::Parser;
use movdate::{collect_movie_files, patch_file, Exiftool, PatchOptions};
use std::path::PathBuf;
use std::process::ExitCode;

/// Make embedded movie timestamps agree with the file's reference date
#[derive(Debug, Parser, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Config {
    /// Files or directories to process
    #[clap(required = true)]
    pub paths: Vec<PathBuf>,

    /// Rewrite packed records into this UTC offset, in hours (e.g. -9.5)
    #[clap(long, allow_hyphen_values = true)]
    pub timezone: Option<f64>,

    /// Set the daylight-saving flag on packed records
    #[clap(long, conflicts_with = "no_dst")]
    pub dst: bool,

    /// Clear the daylight-saving flag on packed records
    #[clap(long)]
    pub no_dst: bool,

    /// Keep a copy of each changed file as <name>_original
    #[clap(long)]
    pub backup: bool,

    /// Report what would change without writing
    #[clap(short = 'n', long)]
    pub dry_run: bool,

    /// Descend into subdirectories
    #[clap(short, long)]
    pub recursive: bool,

    /// Maximum passes over a run of packed records
    #[clap(long)]
    pub max_passes: Option<usize>,

    /// Path to the exiftool program
    #[clap(long, env = "EXIFTOOL", default_value = "exiftool")]
    pub exiftool: PathBuf,

    /// More output (repeat for trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors
    #[clap(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Config {
    fn patch_options(&self) -> PatchOptions {
        let mut options = PatchOptions::default();
        if let Some(hours) = self.timezone {
            options = options.timezone(hours);
        }
        if self.dst {
            options = options.daylight_saving(true);
        } else if self.no_dst {
            options = options.daylight_saving(false);
        }
        if let Some(max) = self.max_passes {
            options = options.max_passes(max);
        }
        if self.backup {
            options = options.keep_backup();
        }
        if self.dry_run {
            options = options.dry_run();
        }
        if self.recursive {
            options = options.recursive();
        }
        options
    }

    fn log_level(&self) -> tracing::Level {
        match (self.quiet, self.verbose) {
            (true, _) => tracing::Level::ERROR,
            (false, 0) => tracing::Level::INFO,
            (false, 1) => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

fn setup_logging(level: tracing::Level) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_level(true)
        .with_target(false)
        .without_time()
        .compact()
        .init();
}

#[derive(Debug, Default)]
struct Summary {
    changed: usize,
    unchanged: usize,
    failed: usize,
}

fn run(config: &Config) -> Result<Summary, anyhow::Error> {
    let options = config.patch_options();
    let files = collect_movie_files(&config.paths, options.recursive)?;
    if files.is_empty() {
        return Err(anyhow!("no movie files found"));
    }

    let exiftool = Exiftool::new(&config.exiftool);
    let mut summary = Summary::default();
    for path in &files {
        match patch_file(path, &exiftool, &options) {
            Ok(report) if report.total() > 0 => summary.changed += 1,
            Ok(_) => summary.unchanged += 1,
            Err(e) if e.is_skip() => {
                tracing::info!("{}: skipped: {}", path.display(), e);
                summary.unchanged += 1;
            }
            Err(e) => {
                tracing::error!("{}: {}", path.display(), e);
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}

fn main() -> ExitCode {
    let config = Config::parse();
    setup_logging(config.log_level());

    match run(&config) {
        Ok(summary) => {
            let verb = if config.dry_run { "would change" } else { "changed" };
            println!(
                "{} file(s) {}, {} unchanged, {} failed",
                summary.changed, verb, summary.unchanged, summary.failed
            );
            if summary.failed > 0 {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

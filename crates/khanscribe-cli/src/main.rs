use std::{
    io::{self, Write},
    path::PathBuf,
    time::Duration,
};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tracing_subscriber::{EnvFilter, fmt::MakeWriter};

use khanscribe_core::{
    ApiClient, CollectObserver, Collector, HarvestConfig, SamplingStrategy,
    config::{DEFAULT_BASE_URL, DEFAULT_MAX_EMPTY_DRAWS, DEFAULT_SAMPLE_SIZE},
};

/// CLI wrapper for SamplingStrategy (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliStrategy {
    /// Enumerate every video of a subject, never reuse a video across subjects
    #[default]
    Bulk,
    /// Random topic/section walks, no cross-subject deduplication
    Lazy,
}

impl From<CliStrategy> for SamplingStrategy {
    fn from(cli: CliStrategy) -> Self {
        match cli {
            CliStrategy::Bulk => SamplingStrategy::Bulk,
            CliStrategy::Lazy => SamplingStrategy::Lazy,
        }
    }
}

#[derive(Parser)]
#[command(name = "khanscribe")]
#[command(about = "Sample Khan Academy videos per subject and save their transcripts")]
struct Cli {
    /// Subject slug to sample (repeatable). Defaults to the eight built-in subjects.
    #[arg(long = "subject")]
    subjects: Vec<String>,

    /// Videos collected per subject
    #[arg(short = 'n', long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    sample_size: usize,

    /// Directory receiving transcripts/ and data.csv
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Video sampling strategy
    #[arg(short, long, default_value = "bulk")]
    strategy: CliStrategy,

    /// Seed for reproducible sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Unproductive random draws tolerated before a lazy subject is enumerated
    #[arg(long, default_value_t = DEFAULT_MAX_EMPTY_DRAWS)]
    max_empty_draws: usize,

    /// API base URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self) -> HarvestConfig {
        let mut config = HarvestConfig::with_data_dir(&self.data_dir);
        if !self.subjects.is_empty() {
            config.subjects = self.subjects;
        }
        config.base_url = self.base_url;
        config.sample_size = self.sample_size;
        config.strategy = self.strategy.into();
        config.seed = self.seed;
        config.max_empty_draws = self.max_empty_draws;
        config
    }
}

fn default_log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Writes log lines while the live progress bars are hidden, so they don't tear.
struct SuspendedWriter<W> {
    progress: MultiProgress,
    inner: W,
}

impl<W: Write> Write for SuspendedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let inner = &mut self.inner;
        self.progress.suspend(|| inner.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        let inner = &mut self.inner;
        self.progress.suspend(|| inner.flush())
    }
}

#[derive(Clone)]
struct ProgressAwareStderr {
    progress: MultiProgress,
}

impl<'a> MakeWriter<'a> for ProgressAwareStderr {
    type Writer = SuspendedWriter<io::Stderr>;

    fn make_writer(&'a self) -> Self::Writer {
        SuspendedWriter {
            progress: self.progress.clone(),
            inner: io::stderr(),
        }
    }
}

fn init_tracing(verbose: u8, progress: MultiProgress) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(ProgressAwareStderr { progress })
        .with_target(false)
        .init();
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn create_bar(len: u64, subject: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {msg} [{bar:30.cyan/blue}] {pos}/{len}")
            .unwrap()
            .progress_chars("=> "),
    );
    pb.set_message(subject.to_string());
    pb
}

/// Renders run progress: a spinner while videos are chosen, a bar while transcripts download.
struct TerminalProgress {
    multi: MultiProgress,
    current: Option<ProgressBar>,
}

impl TerminalProgress {
    fn new(multi: MultiProgress) -> Self {
        Self {
            multi,
            current: None,
        }
    }

    fn show(&mut self, pb: ProgressBar) {
        self.current = Some(self.multi.add(pb));
    }
}

impl CollectObserver for TerminalProgress {
    fn subject_started(&mut self, subject: &str, position: usize, total: usize) {
        self.show(create_spinner(&format!(
            "[{}/{}] Loading videos for {}...",
            position + 1,
            total,
            style(subject).yellow()
        )));
    }

    fn videos_selected(&mut self, subject: &str, count: usize) {
        if let Some(spinner) = self.current.take() {
            spinner.finish_and_clear();
            self.multi.remove(&spinner);
        }
        self.show(create_bar(count as u64, subject));
    }

    fn video_saved(&mut self, _subject: &str, _filename: &str) {
        if let Some(bar) = &self.current {
            bar.inc(1);
        }
    }

    fn subject_finished(&mut self, subject: &str, collected: usize) {
        if let Some(bar) = self.current.take() {
            bar.finish_and_clear();
            self.multi.remove(&bar);
        }
        println!(
            "{} {}: {} transcripts downloaded",
            style("✓").green().bold(),
            subject,
            collected
        );
    }
}

impl Drop for TerminalProgress {
    fn drop(&mut self) {
        if let Some(pb) = self.current.take() {
            pb.abandon();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let multi = MultiProgress::new();
    init_tracing(cli.verbose, multi.clone());
    let config = cli.into_config();

    // Validate configuration early
    if let Err(e) = config.validate() {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    println!(
        "\n{}  {}\n",
        style("khanscribe").cyan().bold(),
        style(format!(
            "{} subjects × {} videos, {} sampling",
            config.subjects.len(),
            config.sample_size,
            config.strategy.name()
        ))
        .dim()
    );

    let client = ApiClient::new(&config.base_url)?;
    let collector = Collector::new(client, config)?;

    let mut progress = TerminalProgress::new(multi);
    let outcome = collector.run(&mut progress).await;
    let report = match outcome {
        Ok(report) => report,
        Err(e) => {
            drop(progress);
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    println!(
        "\n{} {} transcripts in {}",
        style("Saved:").dim(),
        report.total_collected(),
        style(report.output_dir.display()).cyan()
    );
    println!(
        "{} {} ({} rows)",
        style("Labels:").dim(),
        style(report.summary_path.display()).cyan(),
        report.labels.len()
    );
    for subject in &report.subjects {
        let relabelled = subject.collected.saturating_sub(subject.labelled);
        if relabelled > 0 {
            println!(
                "  {} {}: {} of {} transcripts relabelled to a later subject",
                style("!").yellow().bold(),
                subject.subject,
                relabelled,
                subject.collected
            );
        }
    }

    Ok(())
}

//! `train-herald` command line.
//!
//! Drives the observer with a synthetic training loop so a mail setup (or an
//! outbox directory) can be checked end to end before wiring it into a real
//! trainer:
//!
//!   train-herald simulate --iterations 40 --name demo --outbox outbox/
//!   train-herald simulate --iterations 40 --name demo --mail-config mail.json

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::Rng;
use tracing_subscriber::EnvFilter;

use train_herald::{
    ChartRenderer, IterationMetrics, Notifier, ObserverOptions, OutboxNotifier, PngChartRenderer,
    SvgChartRenderer, TrainingObserver,
};

#[derive(Parser, Debug)]
#[command(name = "train-herald", version, about = "Progress reports for long training runs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs a synthetic training loop and reports on it.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Number of iterations in the simulated run.
    #[arg(long, default_value_t = 40)]
    iterations: usize,
    /// Run name used in report subjects.
    #[arg(long, default_value = "simulated-run")]
    name: String,
    /// JSON mail configuration; reports are sent over SMTP.
    #[arg(long, conflicts_with = "outbox")]
    mail_config: Option<PathBuf>,
    /// Directory to write reports into instead of mailing them.
    #[arg(long)]
    outbox: Option<PathBuf>,
    /// Also keep the latest charts in this directory.
    #[arg(long)]
    chart_dir: Option<PathBuf>,
    /// Simulated duration of each iteration.
    #[arg(long, default_value_t = 50)]
    iteration_ms: u64,
    /// Render SVG charts instead of PNG.
    #[arg(long)]
    svg: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Simulate(args) => simulate(args),
    }
}

fn simulate(args: SimulateArgs) -> Result<()> {
    let notifier = build_notifier(&args)?;
    let renderer: Box<dyn ChartRenderer> = if args.svg {
        Box::new(SvgChartRenderer::default())
    } else {
        Box::new(PngChartRenderer::default())
    };
    if let Some(dir) = &args.chart_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating chart directory {}", dir.display()))?;
    }
    let options = ObserverOptions { chart_dir: args.chart_dir.clone() };

    let mut observer = TrainingObserver::with_options(renderer, notifier, options);
    observer
        .on_start(args.iterations, &args.name)
        .context("sending start report")?;

    let mut rng = rand::thread_rng();
    for i in 0..args.iterations {
        observer.on_iteration_begin(i)?;
        thread::sleep(Duration::from_millis(args.iteration_ms));
        let metrics = synthetic_metrics(&mut rng, i, args.iterations);
        observer
            .on_iteration_end(i, &metrics)
            .with_context(|| format!("recording iteration {i}"))?;
    }

    observer.on_end().context("sending final report")?;
    Ok(())
}

fn build_notifier(args: &SimulateArgs) -> Result<Box<dyn Notifier>> {
    if let Some(dir) = &args.outbox {
        return Ok(Box::new(OutboxNotifier::new(dir.clone())?));
    }
    match &args.mail_config {
        Some(path) => smtp_notifier(path),
        None => bail!("either --outbox or --mail-config is required"),
    }
}

#[cfg(feature = "smtp")]
fn smtp_notifier(path: &std::path::Path) -> Result<Box<dyn Notifier>> {
    let config = train_herald::MailConfig::load_json(path)
        .with_context(|| format!("loading mail config {}", path.display()))?;
    Ok(Box::new(train_herald::SmtpNotifier::new(config)?))
}

#[cfg(not(feature = "smtp"))]
fn smtp_notifier(_path: &std::path::Path) -> Result<Box<dyn Notifier>> {
    bail!("this build has no SMTP support; rebuild with `--features smtp` or use --outbox")
}

/// Exponentially decaying loss with multiplicative noise; accuracy mirrors it.
fn synthetic_metrics<R: Rng>(rng: &mut R, i: usize, total: usize) -> IterationMetrics {
    let progress = i as f64 / total.max(1) as f64;
    let noise = |rng: &mut R| 1.0 + rng.gen_range(-0.05..0.05);
    let loss = 2.0 * (-3.0 * progress).exp() * noise(rng);
    let val_loss = 2.2 * (-2.6 * progress).exp() * noise(rng);
    let accuracy = (1.0 - loss / 2.5).clamp(0.0, 1.0);
    let val_accuracy = (1.0 - val_loss / 2.5).clamp(0.0, 1.0);
    IterationMetrics::new(loss, accuracy, val_loss, val_accuracy)
}

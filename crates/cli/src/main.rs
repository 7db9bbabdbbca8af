use anyhow::{Context, Result, anyhow};
use catalog::{CatalogIndex, load_catalog};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use store::{JsonStore, ModelKind, ResultStore, RunRows};
use tracing::{error, info};
use trainers::{RunSummary, SuiteOutcome, run_all};

/// ReelTrends - Movie popularity model trainer
#[derive(Parser)]
#[command(name = "reel-trends")]
#[command(about = "Train popularity, trending and horror models over a movie catalog", long_about = None)]
struct Cli {
    /// Path to the catalog directory (movies.jsonl + optional snapshots.jsonl)
    #[arg(short, long, default_value = "data/catalog")]
    data_dir: PathBuf,

    /// Directory holding the persisted model results
    #[arg(short, long, default_value = "data/results")]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every trainer once and persist the results
    Train,

    /// Show the latest persisted run for one model
    Report {
        /// Model name: general_regression, horror_regression,
        /// horror_classification or horror_clustering
        #[arg(long)]
        model: String,

        /// Number of rows to display
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Keep retraining on a fixed interval until interrupted
    Schedule {
        /// Minutes between training runs
        #[arg(long, default_value = "60")]
        every_minutes: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train => handle_train(&cli.data_dir, &cli.state_dir)?,
        Commands::Report { model, limit } => handle_report(&cli.state_dir, &model, limit)?,
        Commands::Schedule { every_minutes } => {
            handle_schedule(cli.data_dir, cli.state_dir, every_minutes).await?
        }
    }

    Ok(())
}

fn load_catalog_now(data_dir: &Path) -> Result<Arc<CatalogIndex>> {
    println!("Loading catalog from {}...", data_dir.display());
    let start = Instant::now();
    let catalog = load_catalog(data_dir, Utc::now())
        .with_context(|| format!("Failed to load catalog from {}", data_dir.display()))?;
    let (movies, snapshots) = catalog.counts();
    println!(
        "{} Loaded {} movies and {} snapshots in {:?}",
        "✓".green(),
        movies,
        snapshots,
        start.elapsed()
    );
    Ok(Arc::new(catalog))
}

/// Handle the 'train' command
fn handle_train(data_dir: &Path, state_dir: &Path) -> Result<()> {
    let catalog = load_catalog_now(data_dir)?;
    let store: Arc<dyn ResultStore> = Arc::new(JsonStore::open(state_dir)?);

    let summary = run_all(catalog, store, Utc::now())?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("{}", "Training results:".bold().blue());
    for report in [&summary.general, &summary.trending] {
        println!(
            "  {} {}: {}",
            status_mark(report.outcome.trained()),
            report.model,
            report.outcome.to_json()
        );
    }
    for entry in &summary.horror.entries {
        match &entry.outcome {
            SuiteOutcome::Completed(outcome) => println!(
                "  {} {}: {}",
                status_mark(outcome.trained()),
                entry.model,
                outcome.to_json()
            ),
            SuiteOutcome::Failed { error } => {
                println!("  {} {}: {}", "✗".red(), entry.model, error)
            }
        }
    }
}

fn status_mark(trained: bool) -> colored::ColoredString {
    if trained {
        "✓".green()
    } else {
        "-".yellow()
    }
}

fn parse_model_kind(name: &str) -> Result<ModelKind> {
    ModelKind::ALL
        .into_iter()
        .find(|kind| kind.as_str() == name)
        .ok_or_else(|| {
            anyhow!(
                "Unknown model '{}'. Expected one of: {}",
                name,
                ModelKind::ALL.map(|k| k.as_str()).join(", ")
            )
        })
}

/// Handle the 'report' command
fn handle_report(state_dir: &Path, model: &str, limit: usize) -> Result<()> {
    let kind = parse_model_kind(model)?;
    let store = JsonStore::open(state_dir)?;
    let Some(batch) = store.latest_run(kind)? else {
        println!("No persisted run for {model} yet; run `reel-trends train` first");
        return Ok(());
    };

    println!(
        "{}",
        format!("Latest {model} run ({})", batch.run_ts).bold().blue()
    );
    match batch.rows {
        RunRows::GeneralRegression(mut rows) => {
            // Ordered by the score column the dashboard sorts on
            rows.sort_by(|a, b| {
                b.predicted_popularity
                    .partial_cmp(&a.predicted_popularity)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            println!(
                "MAE popularity: {:.3}, MAE vote average: {:.3}",
                rows.first().map(|r| r.mae_popularity).unwrap_or_default(),
                rows.first().map(|r| r.mae_vote_average).unwrap_or_default()
            );
            for row in rows.iter().take(limit) {
                println!(
                    "  movie {:>8}: predicted popularity {:>8.2} (actual {:>8.2}), predicted rating {:.2} (actual {:.2})",
                    row.movie_id,
                    row.predicted_popularity,
                    row.actual_popularity,
                    row.predicted_vote_average,
                    row.actual_vote_average
                );
            }
        }
        RunRows::HorrorRegression {
            mut predictions,
            mut importances,
        } => {
            predictions.sort_by(|a, b| {
                b.predicted_popularity
                    .partial_cmp(&a.predicted_popularity)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            println!(
                "MAE: {:.3}, R²: {:.3}",
                predictions.first().map(|r| r.mae).unwrap_or_default(),
                predictions.first().map(|r| r.r2).unwrap_or_default()
            );
            for row in predictions.iter().take(limit) {
                println!(
                    "  movie {:>8}: predicted popularity {:>8.2} (actual {:>8.2})",
                    row.movie_id, row.predicted_popularity, row.actual_popularity
                );
            }
            importances.sort_by(|a, b| {
                b.importance
                    .partial_cmp(&a.importance)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            println!("Feature importances:");
            for row in &importances {
                println!("  {:<16} {:.4}", row.feature, row.importance);
            }
        }
        RunRows::HorrorClassification(row) => {
            println!("AUC: {:.3}, accuracy: {:.3}", row.auc, row.accuracy);
            println!("Confusion matrix [[tn, fp], [fn, tp]]: {}", row.confusion_matrix);
        }
        RunRows::HorrorClustering {
            assignments,
            profiles,
        } => {
            for profile in &profiles {
                println!(
                    "  cluster {}: {} movies, mean popularity {:.2}, mean rating {:.2}, mean runtime {:.0} min",
                    profile.cluster,
                    profile.members,
                    profile.mean_popularity,
                    profile.mean_vote_average,
                    profile.mean_runtime
                );
            }
            println!("({} assigned movies)", assignments.len());
        }
    }
    Ok(())
}

/// Handle the 'schedule' command
///
/// The external-scheduler collaborator: invokes the trainers on a fixed
/// cadence and runs each tick to completion. A failed tick is logged and
/// retried on the next one; no retry logic lives in the trainers.
async fn handle_schedule(data_dir: PathBuf, state_dir: PathBuf, every_minutes: u64) -> Result<()> {
    let store: Arc<dyn ResultStore> = Arc::new(JsonStore::open(&state_dir)?);
    let period = std::time::Duration::from_secs(every_minutes.max(1) * 60);
    let mut interval = tokio::time::interval(period);

    info!(every_minutes, "training scheduler started");
    loop {
        interval.tick().await;
        let run_ts = Utc::now();

        // Reload so the tick sees records ingested since the last one
        let catalog = match load_catalog(&data_dir, run_ts) {
            Ok(catalog) => Arc::new(catalog),
            Err(err) => {
                error!(error = %err, "catalog reload failed, retrying next tick");
                continue;
            }
        };

        match run_all(catalog, store.clone(), run_ts) {
            Ok(summary) => {
                print_summary(&summary);
                info!(%run_ts, "scheduled training run finished");
            }
            Err(err) => {
                error!(%run_ts, error = %err, "training run failed, retrying next tick")
            }
        }
    }
}

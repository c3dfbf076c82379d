//! Batch processing command for a directory or glob of form documents.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use formsheet_core::error::DocumentError;
use formsheet_core::models::config::FormsheetConfig;
use formsheet_core::models::record::NormalizedRecord;
use formsheet_core::pipeline::{BatchCollector, BatchOutcome, Pipeline};
use formsheet_core::report::{CompletenessReport, DatasetInsights, compute_completeness, compute_insights};
use formsheet_core::source::{SourceReader, discover_sources, sort_sources, source_name};

use super::load_config;
use super::output::{self, BatchReport};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input directory or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output file for the dataset
    #[arg(short, long, default_value = "formsheet_output.csv")]
    output: PathBuf,

    /// Dataset format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: DatasetFormat,

    /// Also write the completeness summary CSV to this path
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Number of parallel workers (default: from config)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum DatasetFormat {
    /// One row per document
    Csv,
    /// Dataset, completeness and skipped documents
    Json,
}

type DocumentResult = Result<NormalizedRecord, DocumentError>;

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let registry = Arc::new(config.build_registry()?);
    let pipeline = Pipeline::new(registry, config.normalize_options());
    let reader = Arc::new(SourceReader::new(config.extraction.page_marker.clone()));

    let (files, unreadable) = resolve_inputs(&args.input, &config)?;
    if files.is_empty() && unreadable.is_empty() {
        anyhow::bail!("No matching files found for: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let jobs = args.jobs.unwrap_or(config.batch.jobs).max(1);
    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let results = process_parallel(&files, &pipeline, &reader, jobs, &pb).await;
    pb.finish_and_clear();

    // Single writer: results are appended in input order.
    let mut collector = BatchCollector::new(pipeline.registry());
    for err in unreadable {
        collector.push(Err(err))?;
    }
    for result in results {
        collector.push(result)?;
    }
    let outcome = collector.finish();
    let report = compute_completeness(&outcome.dataset);
    let insights = compute_insights(&outcome.dataset);

    write_dataset(&args, &config, &outcome, &report, &insights)?;
    println!(
        "{} Dataset written to {}",
        style("✓").green(),
        args.output.display()
    );

    if let Some(summary_path) = &args.summary {
        create_parent(summary_path)?;
        output::write_summary_csv(BufWriter::new(File::create(summary_path)?), &report)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    print_summary(&outcome, &report, &insights);
    debug!("Batch finished in {:?}", start.elapsed());

    Ok(())
}

/// A directory is listed by extension; anything else is a glob pattern.
///
/// Glob matches that cannot be read are returned as document errors so the
/// batch can report them as skipped.
fn resolve_inputs(
    input: &str,
    config: &FormsheetConfig,
) -> anyhow::Result<(Vec<PathBuf>, Vec<DocumentError>)> {
    let path = Path::new(input);
    if path.is_dir() {
        return Ok((discover_sources(path, &config.batch.extensions)?, Vec::new()));
    }

    let entries = glob(input)?.map(|entry| {
        entry.map_err(|e| {
            let reason = e.error().to_string();
            (e.path().to_path_buf(), reason)
        })
    });
    Ok(partition_matches(entries, &config.batch.extensions))
}

/// Split glob matches into readable sources with an accepted extension and
/// unreadable paths.
fn partition_matches<I, S>(entries: I, extensions: &[S]) -> (Vec<PathBuf>, Vec<DocumentError>)
where
    I: IntoIterator<Item = Result<PathBuf, (PathBuf, String)>>,
    S: AsRef<str>,
{
    let mut files = Vec::new();
    let mut unreadable = Vec::new();

    for entry in entries {
        match entry {
            Ok(path) => {
                let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
                let accepted = extensions.iter().any(|x| x.as_ref().eq_ignore_ascii_case(ext));
                if accepted && path.is_file() {
                    files.push(path);
                }
            }
            Err((path, reason)) => {
                warn!("Cannot read {}: {}", path.display(), reason);
                unreadable.push(DocumentError::Unreadable {
                    source_name: source_name(&path),
                    reason,
                });
            }
        }
    }

    sort_sources(&mut files);
    (files, unreadable)
}

/// Run documents on blocking workers, at most `jobs` at a time.
///
/// Results come back in the order of `files`.
async fn process_parallel(
    files: &[PathBuf],
    pipeline: &Pipeline,
    reader: &Arc<SourceReader>,
    jobs: usize,
    pb: &ProgressBar,
) -> Vec<DocumentResult> {
    let semaphore = Arc::new(Semaphore::new(jobs));
    let mut tasks = JoinSet::new();

    for (index, path) in files.iter().cloned().enumerate() {
        let semaphore = Arc::clone(&semaphore);
        let pipeline = pipeline.clone();
        let reader = Arc::clone(reader);

        tasks.spawn(async move {
            let name = source_name(&path);
            let result = match semaphore.acquire_owned().await {
                Ok(_permit) => {
                    tokio::task::spawn_blocking(move || pipeline.process_file(&reader, &path)).await
                }
                Err(e) => {
                    return (index, Err(worker_failure(name, e.to_string())));
                }
            };
            let result = result.unwrap_or_else(|e| Err(worker_failure(name, e.to_string())));
            (index, result)
        });
    }

    let mut slots: Vec<Option<DocumentResult>> = files.iter().map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => {
                pb.inc(1);
                slots[index] = Some(result);
            }
            Err(e) => error!("Worker task failed: {}", e),
        }
    }

    slots
        .into_iter()
        .zip(files)
        .map(|(slot, path)| {
            slot.unwrap_or_else(|| Err(worker_failure(source_name(path), "worker did not finish")))
        })
        .collect()
}

fn worker_failure(source_name: String, reason: impl Into<String>) -> DocumentError {
    DocumentError::Unreadable {
        source_name,
        reason: reason.into(),
    }
}

fn create_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn write_dataset(
    args: &BatchArgs,
    config: &FormsheetConfig,
    outcome: &BatchOutcome,
    report: &CompletenessReport,
    insights: &DatasetInsights,
) -> anyhow::Result<()> {
    create_parent(&args.output)?;
    let writer = BufWriter::new(File::create(&args.output)?);

    match args.format {
        DatasetFormat::Csv => output::write_dataset_csv(writer, &outcome.dataset, &config.output),
        DatasetFormat::Json => output::write_batch_json(
            writer,
            &BatchReport {
                dataset: &outcome.dataset,
                completeness: report,
                insights,
                skipped: &outcome.skipped,
            },
        ),
    }
}

fn print_summary(outcome: &BatchOutcome, report: &CompletenessReport, insights: &DatasetInsights) {
    println!();
    println!(
        "{} Processed {} files",
        style("✓").green(),
        outcome.total()
    );
    println!(
        "   {} records, {} skipped",
        style(outcome.dataset.len()).green(),
        style(outcome.skipped.len()).red()
    );

    println!(
        "   Overall extraction rate: {}",
        output::format_rate(report.overall_rate())
    );
    if let (Some(best), Some(worst)) = (report.best_field(), report.worst_field()) {
        println!(
            "   Best field: {} ({}), most challenging: {} ({})",
            best.field,
            output::format_rate(best.fraction()),
            worst.field,
            output::format_rate(worst.fraction())
        );
    }

    if !insights.is_empty() {
        println!();
        println!("{}", style("Insights:").bold());
        for line in insight_lines(insights) {
            println!("  - {}", line);
        }
    }

    if !outcome.skipped.is_empty() {
        println!();
        println!("{}", style("Skipped files:").red());
        for skipped in &outcome.skipped {
            println!("  - {}", skipped.reason);
        }
    }
}

fn insight_lines(insights: &DatasetInsights) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(position) = &insights.most_common_position {
        lines.push(format!(
            "Most common position applied for: {} ({} applications)",
            position.value, position.count
        ));
    }
    if let Some(years) = insights.average_experience {
        lines.push(format!("Average years of experience: {:.1} years", years));
    }
    if let Some(domain) = &insights.most_common_email_domain {
        lines.push(format!(
            "Most common email domain: {} ({} users)",
            domain.value, domain.count
        ));
    }
    if let Some(rating) = insights.average_rating {
        lines.push(format!("Average satisfaction rating: {:.1}/5", rating));
    }
    lines
}

//! Process command - extract fields from a single form document.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use formsheet_core::aggregate::Aggregator;
use formsheet_core::models::config::FormsheetConfig;
use formsheet_core::models::record::NormalizedRecord;
use formsheet_core::pipeline::Pipeline;
use formsheet_core::source::SourceReader;

use super::{load_config, output};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// List the fields no rule matched
    #[arg(long)]
    show_missing: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let registry = Arc::new(config.build_registry()?);
    let pipeline = Pipeline::new(registry, config.normalize_options());
    let reader = SourceReader::new(config.extraction.page_marker.clone());

    let record = pipeline.process_file(&reader, &args.input)?;

    let content = format_record(&record, &pipeline, &config, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &content)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", content);
    }

    if args.show_missing {
        let missing = record.missing_fields();
        println!();
        if missing.is_empty() {
            println!("{} All fields extracted", style("✓").green());
        } else {
            println!(
                "{} {} of {} fields not found: {}",
                style("ℹ").blue(),
                missing.len(),
                record.values.len(),
                missing.join(", ")
            );
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());
    Ok(())
}

fn format_record(
    record: &NormalizedRecord,
    pipeline: &Pipeline,
    config: &FormsheetConfig,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => {
            let mut aggregator = Aggregator::new(pipeline.registry());
            aggregator.append(record.clone())?;
            let dataset = aggregator.finalize();

            let mut buf = Vec::new();
            output::write_dataset_csv(&mut buf, &dataset, &config.output)?;
            Ok(String::from_utf8(buf)?)
        }
        OutputFormat::Text => Ok(format_record_text(record, &config.output.missing_marker)),
    }
}

fn format_record_text(record: &NormalizedRecord, missing: &str) -> String {
    let width = record.values.keys().map(|k| k.len()).max().unwrap_or(0);
    let mut output = format!("Source: {}\n\n", record.source);

    for (field, value) in &record.values {
        let cell = if value.is_present() {
            value.to_string()
        } else if missing.is_empty() {
            "-".to_string()
        } else {
            missing.to_string()
        };
        let flag = if value.is_flagged() { " (unrecognized)" } else { "" };
        output.push_str(&format!("  {:<width$}  {}{}\n", field, cell, flag, width = width));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use formsheet_core::FieldValue;

    #[test]
    fn test_text_format_marks_missing_and_flagged() {
        let values = [
            ("name".to_string(), FieldValue::Text("Jane".into())),
            ("availability".to_string(), FieldValue::Unparsed("ASAP".into())),
            ("email".to_string(), FieldValue::Absent),
        ]
        .into_iter()
        .collect();
        let record = NormalizedRecord::new("a.txt", values);

        let text = format_record_text(&record, "");
        assert!(text.starts_with("Source: a.txt\n"));
        assert!(text.contains("  name          Jane\n"));
        assert!(text.contains("ASAP (unrecognized)"));
        assert!(text.contains("  email         -\n"));
    }
}

//! CSV and JSON writers for datasets and completeness reports.

use std::io::Write;

use serde::Serialize;

use formsheet_core::models::config::OutputConfig;
use formsheet_core::pipeline::SkippedDocument;
use formsheet_core::report::{CompletenessReport, DatasetInsights};
use formsheet_core::Dataset;

pub const SOURCE_COLUMN: &str = "source_file";
pub const PROCESSED_COLUMN: &str = "processed_date";
const PROCESSED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Header of the data sheet: source file, priority fields, remaining fields,
/// then the processed date when enabled.
pub fn header<'a>(dataset: &'a Dataset, output: &'a OutputConfig) -> Vec<&'a str> {
    let mut header = vec![SOURCE_COLUMN];
    header.extend(dataset.ordered_columns(&output.priority_columns));
    if output.include_processed_date {
        header.push(PROCESSED_COLUMN);
    }
    header
}

/// Write the data sheet, one row per record.
pub fn write_dataset_csv<W: Write>(
    writer: W,
    dataset: &Dataset,
    output: &OutputConfig,
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(header(dataset, output))?;

    let columns = dataset.ordered_columns(&output.priority_columns);
    for (record, cells) in dataset
        .records()
        .iter()
        .zip(dataset.rows(&columns, &output.missing_marker))
    {
        let mut row = Vec::with_capacity(cells.len() + 2);
        row.push(record.source.clone());
        row.extend(cells);
        if output.include_processed_date {
            row.push(record.processed_at.format(PROCESSED_FORMAT).to_string());
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Format a fraction as a percentage, or "no data".
pub fn format_rate(fraction: Option<f64>) -> String {
    match fraction {
        Some(f) => format!("{:.1}%", f * 100.0),
        None => "no data".to_string(),
    }
}

/// Write the per-field completeness sheet.
pub fn write_summary_csv<W: Write>(writer: W, report: &CompletenessReport) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["field", "extracted", "total", "rate", "flagged", "quality"])?;

    for field in &report.fields {
        wtr.write_record([
            field.field.clone(),
            field.present.to_string(),
            field.total.to_string(),
            format_rate(field.fraction()),
            field.flagged.to_string(),
            field.band().map(|b| b.to_string()).unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Everything a batch run writes as JSON.
#[derive(Serialize)]
pub struct BatchReport<'a> {
    pub dataset: &'a Dataset,
    pub completeness: &'a CompletenessReport,
    pub insights: &'a DatasetInsights,
    pub skipped: &'a [SkippedDocument],
}

pub fn write_batch_json<W: Write>(writer: W, report: &BatchReport<'_>) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use formsheet_core::report::compute_completeness;
    use formsheet_core::{Aggregator, FieldValue, NormalizedRecord};
    use pretty_assertions::assert_eq;

    fn dataset() -> Dataset {
        let columns = vec!["email".to_string(), "name".to_string()];
        let mut aggregator = Aggregator::with_columns(columns);
        let values = [
            ("email".to_string(), FieldValue::Absent),
            ("name".to_string(), FieldValue::Text("Jane Doe".into())),
        ]
        .into_iter()
        .collect();
        aggregator
            .append(NormalizedRecord::new("a.txt", values))
            .unwrap();
        aggregator.finalize()
    }

    fn output() -> OutputConfig {
        OutputConfig {
            priority_columns: vec!["name".to_string()],
            include_processed_date: false,
            missing_marker: "Not Found".to_string(),
        }
    }

    #[test]
    fn test_dataset_csv() {
        let mut buf = Vec::new();
        write_dataset_csv(&mut buf, &dataset(), &output()).unwrap();

        let csv = String::from_utf8(buf).unwrap();
        assert_eq!(csv, "source_file,name,email\na.txt,Jane Doe,Not Found\n");
    }

    #[test]
    fn test_processed_date_is_last() {
        let mut config = output();
        config.include_processed_date = true;
        let dataset = dataset();
        assert_eq!(
            header(&dataset, &config),
            vec!["source_file", "name", "email", "processed_date"]
        );
    }

    #[test]
    fn test_summary_csv() {
        let report = compute_completeness(&dataset());
        let mut buf = Vec::new();
        write_summary_csv(&mut buf, &report).unwrap();

        let csv = String::from_utf8(buf).unwrap();
        assert_eq!(
            csv,
            "field,extracted,total,rate,flagged,quality\n\
             email,0,1,0.0%,0,poor\n\
             name,1,1,100.0%,0,excellent\n"
        );
    }

    #[test]
    fn test_rate_without_data() {
        assert_eq!(format_rate(None), "no data");
        assert_eq!(format_rate(Some(0.75)), "75.0%");
    }
}

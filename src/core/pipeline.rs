use crate::core::analysis::analyze_columns;
use crate::core::export::{export_csv_on, render_printable_table_at};
use crate::core::{ConfigProvider, Dataset, Pipeline, Record, ReportOutput, Storage};
use crate::domain::model::{ColumnDescriptor, Value};
use crate::utils::error::{ReportError, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Csv,
}

impl InputFormat {
    pub fn from_path(path: &str) -> Result<Self> {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            _ => Err(ReportError::UnsupportedInputError {
                path: path.to_string(),
                reason: "expected a .json or .csv file".to_string(),
            }),
        }
    }
}

pub struct ReportPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    run_at: DateTime<Utc>,
}

impl<S: Storage, C: ConfigProvider> ReportPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            run_at: Utc::now(),
        }
    }

    /// Pins the timestamp used for export filenames and the print header.
    pub fn with_run_at(mut self, run_at: DateTime<Utc>) -> Self {
        self.run_at = run_at;
        self
    }

    fn wants(&self, format: &str) -> bool {
        self.config
            .output_formats()
            .iter()
            .any(|f| f.eq_ignore_ascii_case(format))
    }

    fn output_file(&self, filename: &str) -> String {
        Path::new(self.config.output_path())
            .join(filename)
            .to_string_lossy()
            .into_owned()
    }
}

pub fn parse_json_dataset(bytes: &[u8]) -> Result<Dataset> {
    let json: serde_json::Value = serde_json::from_slice(bytes)?;
    let items = match json {
        serde_json::Value::Array(items) => items,
        other => vec![other],
    };

    let mut keys = BTreeSet::new();
    let records: Vec<Record> = items
        .into_iter()
        .map(|item| {
            let record = Record::from_json(item);
            keys.extend(record.data.keys().cloned());
            record
        })
        .collect();

    Ok(Dataset {
        columns: keys
            .into_iter()
            .map(|key| ColumnDescriptor::new(key.clone(), key))
            .collect(),
        records,
    })
}

pub fn parse_csv_dataset(bytes: &[u8]) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(header, cell)| (header.to_string(), Value::from_cell(cell)))
            .collect();
        records.push(record);
    }

    Ok(Dataset {
        columns: headers
            .iter()
            .map(|header| ColumnDescriptor::new(header, header))
            .collect(),
        records,
    })
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ReportPipeline<S, C> {
    async fn extract(&self) -> Result<Dataset> {
        let input_path = self.config.input_path();
        let format = InputFormat::from_path(input_path)?;

        tracing::debug!("Reading {:?} input from: {}", format, input_path);
        let bytes = self.storage.read_file(input_path).await?;

        let mut dataset = match format {
            InputFormat::Json => parse_json_dataset(&bytes)?,
            InputFormat::Csv => parse_csv_dataset(&bytes)?,
        };

        if !self.config.columns().is_empty() {
            dataset.columns = self.config.columns().to_vec();
        }

        tracing::debug!(
            "Extracted {} records, {} columns selected",
            dataset.records.len(),
            dataset.columns.len()
        );
        Ok(dataset)
    }

    async fn transform(&self, dataset: Dataset) -> Result<ReportOutput> {
        let Dataset { columns, records } = dataset;
        if records.is_empty() {
            tracing::warn!("Input contains no records, nothing to report");
            return Err(ReportError::no_data("export"));
        }

        let analyses = analyze_columns(&records, &columns);
        tracing::debug!(
            "Analyzed {} of {} columns",
            analyses.len(),
            columns.len()
        );

        let csv = if self.wants("csv") {
            Some(export_csv_on(
                &records,
                &columns,
                self.config.base_filename(),
                self.run_at.date_naive(),
            )?)
        } else {
            None
        };

        let html = if self.wants("html") {
            Some(render_printable_table_at(
                self.config.table_id(),
                self.config.title(),
                &columns,
                &records,
                None,
                self.run_at,
            )?)
        } else {
            None
        };

        let analysis_json = if self.wants("json") {
            Some(serde_json::to_string_pretty(&analyses)?)
        } else {
            None
        };

        Ok(ReportOutput {
            record_count: records.len(),
            analyses,
            csv,
            html,
            analysis_json,
        })
    }

    async fn load(&self, output: ReportOutput) -> Result<Vec<String>> {
        let base = self.config.base_filename();
        let mut artifacts: Vec<(String, String)> = Vec::new();

        if let Some(csv) = output.csv {
            artifacts.push((csv.filename, csv.content));
        }
        if let Some(html) = output.html {
            artifacts.push((format!("{}.html", base), html));
        }
        if let Some(json) = output.analysis_json {
            artifacts.push((format!("{}_analysis.json", base), json));
        }

        let mut written = Vec::with_capacity(artifacts.len());
        for (filename, content) in artifacts {
            let path = self.output_file(&filename);
            tracing::debug!("Writing {} ({} bytes)", path, content.len());
            self.storage.write_file(&path, content.as_bytes()).await?;
            written.push(path);
        }

        Ok(written)
    }
}

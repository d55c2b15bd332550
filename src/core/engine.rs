use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct ReportEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ReportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Runs extract, transform and load in order and returns the written paths.
    pub async fn run(&self) -> Result<Vec<String>> {
        tracing::info!("Starting report run");

        let dataset = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} records with {} columns",
            dataset.records.len(),
            dataset.columns.len()
        );

        let output = self.pipeline.transform(dataset).await?;
        tracing::info!(
            "Analyzed {} columns over {} records",
            output.analyses.len(),
            output.record_count
        );
        for analysis in &output.analyses {
            tracing::debug!(
                "Column '{}' ({}) inferred as {}",
                analysis.label,
                analysis.key,
                analysis.column_type()
            );
        }

        let written = self.pipeline.load(output).await?;
        for path in &written {
            tracing::info!("Output saved to: {}", path);
        }

        Ok(written)
    }
}

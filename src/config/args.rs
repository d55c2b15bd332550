use crate::config::DEFAULT_TABLE_ID;
use crate::core::ConfigProvider;
use crate::domain::model::ColumnDescriptor;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "tabular-report")]
#[command(about = "Column statistics and CSV/print exports for tabular records")]
pub struct CliConfig {
    #[arg(long, help = "Input file (.json array of objects or .csv with a header row)")]
    pub input: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', help = "Columns as key or key:Label, in export order")]
    pub columns: Vec<ColumnDescriptor>,

    #[arg(long, default_value = "Report")]
    pub title: String,

    #[arg(long, default_value = "export")]
    pub base_filename: String,

    #[arg(long, default_value = DEFAULT_TABLE_ID)]
    pub table_id: String,

    #[arg(long, value_delimiter = ',', default_values = ["csv", "html", "json"])]
    pub formats: Vec<String>,

    #[arg(long, help = "Load settings from a TOML file instead of flags")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        self.input.as_deref().unwrap_or_default()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn base_filename(&self) -> &str {
        &self.base_filename
    }

    fn table_id(&self) -> &str {
        &self.table_id
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        let input = validation::validate_required_field("input", &self.input)?;
        validation::validate_path("input", input)?;
        validation::validate_file_extension("input", input, &validation::SUPPORTED_INPUTS)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_non_empty_string("base_filename", &self.base_filename)?;
        validation::validate_output_formats("formats", &self.formats)?;
        validation::validate_unique_columns("columns", &self.columns)?;
        Ok(())
    }
}

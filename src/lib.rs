pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use crate::core::analysis::{analyze_column, analyze_columns, infer_column_type};
pub use crate::core::export::{export_csv, render_printable_table};
pub use crate::core::{engine::ReportEngine, pipeline::ReportPipeline};
pub use domain::model::{
    ColumnAnalysis, ColumnDescriptor, ColumnStats, ColumnType, CsvExport, Record, Value,
};
pub use utils::error::{ReportError, Result};

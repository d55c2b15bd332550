use crate::config::DEFAULT_TABLE_ID;
use crate::core::ConfigProvider;
use crate::domain::model::ColumnDescriptor;
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub report: ReportSection,
    pub input: InputSection,
    pub output: OutputSection,
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    pub title: String,
    pub base_filename: String,
    #[serde(default = "default_table_id")]
    pub table_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSection {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    pub path: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
}

fn default_table_id() -> String {
    DEFAULT_TABLE_ID.to_string()
}

fn default_formats() -> Vec<String> {
    validation::SUPPORTED_FORMATS
        .iter()
        .map(|f| f.to_string())
        .collect()
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ReportError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ReportError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures<'_>| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    fn title(&self) -> &str {
        &self.report.title
    }

    fn base_filename(&self) -> &str {
        &self.report.base_filename
    }

    fn table_id(&self) -> &str {
        &self.report.table_id
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input.path", &self.input.path)?;
        validation::validate_file_extension("input.path", &self.input.path, &validation::SUPPORTED_INPUTS)?;
        validation::validate_path("output.path", &self.output.path)?;
        validation::validate_non_empty_string("report.base_filename", &self.report.base_filename)?;
        validation::validate_output_formats("output.formats", &self.output.formats)?;
        validation::validate_unique_columns("columns", &self.columns)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[report]
title = "Cattle Register"
base_filename = "cattle"

[input]
path = "data/cattle.json"

[output]
path = "./reports"
formats = ["csv", "html"]

[[columns]]
key = "tag"
label = "Tag No"

[[columns]]
key = "weight"
label = "Weight (kg)"
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.title(), "Cattle Register");
        assert_eq!(config.input_path(), "data/cattle.json");
        assert_eq!(config.table_id(), DEFAULT_TABLE_ID);
        assert_eq!(config.output_formats(), ["csv".to_string(), "html".to_string()]);
        assert_eq!(config.columns()[1], ColumnDescriptor::new("weight", "Weight (kg)"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_formats_default_to_all() {
        let config = TomlConfig::from_toml_str(
            r#"
[report]
title = "Eggs"
base_filename = "eggs"
table_id = "eggs-table"

[input]
path = "eggs.csv"

[output]
path = "out"
"#,
        )
        .unwrap();
        assert_eq!(config.output_formats().len(), 3);
        assert_eq!(config.table_id(), "eggs-table");
        assert!(config.columns().is_empty());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TABULAR_REPORT_TEST_INPUT", "feed/inventory.csv");

        let content = BASIC.replace("data/cattle.json", "${TABULAR_REPORT_TEST_INPUT}");
        let config = TomlConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.input.path, "feed/inventory.csv");

        std::env::remove_var("TABULAR_REPORT_TEST_INPUT");
    }

    #[test]
    fn test_unknown_env_var_is_left_untouched() {
        let content = BASIC.replace("./reports", "${TABULAR_REPORT_UNSET_VAR}");
        let config = TomlConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.output.path, "${TABULAR_REPORT_UNSET_VAR}");
    }

    #[test]
    fn test_config_validation() {
        let content = BASIC.replace("data/cattle.json", "data/cattle.xlsx");
        let config = TomlConfig::from_toml_str(&content).unwrap();
        assert!(config.validate().is_err());

        let content = BASIC.replace("key = \"weight\"", "key = \"tag\"");
        let config = TomlConfig::from_toml_str(&content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[report\ntitle = 1").unwrap_err();
        assert!(matches!(err, ReportError::ConfigError { .. }));
        assert!(err.to_string().starts_with("Configuration error: TOML parsing error"));
        assert_eq!(err.severity(), crate::utils::error::ErrorSeverity::Medium);
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.report.base_filename, "cattle");
    }
}

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::utils::error::ReportError;

/// A single cell of a schemaless record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Date(DateTime<Utc>),
    List(Vec<Value>),
    Object(serde_json::Map<String, serde_json::Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Parses a raw CSV cell: empty is null, `true`/`false` are booleans and
    /// numerics written in canonical form are numbers. Everything else,
    /// including `00123`, `1.50` or `+7`, stays text so it exports unchanged.
    pub fn from_cell(raw: &str) -> Self {
        if raw.is_empty() {
            return Value::Null;
        }
        match raw {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            _ => {}
        }
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() && format_number(n) == trimmed => Value::Number(n),
            _ => Value::Text(raw.to_string()),
        }
    }

    /// String form used for categorical grouping and list joining.
    pub fn display_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Text(s) => s.clone(),
            Value::Date(d) => d.to_rfc3339_opts(SecondsFormat::Millis, true),
            Value::List(items) => items
                .iter()
                .map(Value::display_string)
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(map) => serde_json::Value::Object(map.clone()).to_string(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let name = if n > 0.0 { "Infinity" } else { "-Infinity" };
        name.to_string()
    } else if n == 0.0 {
        // collapses -0
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        exponent_form(n)
    } else {
        n.to_string()
    }
}

/// `1e+21`, `-2.5e-7`: the exponent always carries its sign.
fn exponent_form(n: f64) -> String {
    let formatted = format!("{:e}", n);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(map),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub data: HashMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }

    /// Builds a record from a JSON object. Any other JSON value becomes a
    /// single-field record under `value`.
    pub fn from_json(json: serde_json::Value) -> Self {
        let data = match json {
            serde_json::Value::Object(map) => {
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()
            }
            other => HashMap::from([("value".to_string(), Value::from(other))]),
        };
        Self { data }
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub key: String,
    pub label: String,
}

impl ColumnDescriptor {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Accepts `key` or `key:Label`.
impl FromStr for ColumnDescriptor {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, label) = match s.split_once(':') {
            Some((key, label)) => (key.trim(), label.trim()),
            None => (s.trim(), s.trim()),
        };
        if key.is_empty() {
            return Err(ReportError::InvalidConfigValueError {
                field: "columns".to_string(),
                value: s.to_string(),
                reason: "Column key cannot be empty".to_string(),
            });
        }
        let label = if label.is_empty() { key } else { label };
        Ok(Self::new(key, label))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Number,
    Date,
    Boolean,
    Categorical,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Number => "number",
            ColumnType::Date => "date",
            ColumnType::Boolean => "boolean",
            ColumnType::Categorical => "string",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateBucket {
    pub bucket_date: String,
    pub occurrence_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ColumnStats {
    Numeric {
        total: f64,
        average: f64,
        min: f64,
        max: f64,
        median: f64,
        count: usize,
    },
    Date {
        earliest: DateTime<Utc>,
        latest: DateTime<Utc>,
        count: usize,
        chart_data: Vec<DateBucket>,
    },
    Boolean {
        true_count: usize,
        false_count: usize,
        total: usize,
    },
    Categorical {
        unique_count: usize,
        total: usize,
        most_common: Option<CategoryCount>,
        chart_data: Vec<CategoryCount>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnAnalysis {
    pub key: String,
    pub label: String,
    pub stats: ColumnStats,
}

impl ColumnAnalysis {
    pub fn column_type(&self) -> ColumnType {
        match self.stats {
            ColumnStats::Numeric { .. } => ColumnType::Number,
            ColumnStats::Date { .. } => ColumnType::Date,
            ColumnStats::Boolean { .. } => ColumnType::Boolean,
            ColumnStats::Categorical { .. } => ColumnType::Categorical,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub columns: Vec<ColumnDescriptor>,
    pub records: Vec<Record>,
}

#[derive(Debug, Clone)]
pub struct ReportOutput {
    pub record_count: usize,
    pub analyses: Vec<ColumnAnalysis>,
    pub csv: Option<CsvExport>,
    pub html: Option<String>,
    pub analysis_json: Option<String>,
}

//! Column type inference and per-type summary statistics.
//!
//! A column's type is decided by its first non-null value. Values that do not
//! fit the inferred type are dropped by the per-type pass instead of failing,
//! and a column with nothing left to summarise yields no analysis at all.

use crate::domain::model::{
    CategoryCount, ColumnAnalysis, ColumnDescriptor, ColumnStats, ColumnType, DateBucket, Record,
    Value,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

/// Most recent distinct days kept in a date column's chart.
pub const MAX_DATE_BUCKETS: usize = 30;
/// Largest categories kept in a categorical column's chart.
pub const MAX_CATEGORIES: usize = 15;
/// Category labels are cut to this many characters before grouping.
pub const CATEGORY_LABEL_CHARS: usize = 30;

static ISO_DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}").expect("valid date prefix pattern"));

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M%#z", "%Y-%m-%d %H:%M%#z"];

/// Analyzes one column. Returns `None` when the column has no value that
/// survives the filtering for its inferred type.
pub fn analyze_column(
    records: &[Record],
    column_key: &str,
    column_label: &str,
) -> Option<ColumnAnalysis> {
    let values = column_values(records, column_key);
    let column_type = classify(values.first()?);

    tracing::debug!(
        "Analyzing column '{}' as {} ({} non-null values)",
        column_key,
        column_type,
        values.len()
    );

    let stats = match column_type {
        ColumnType::Number => numeric_stats(&values),
        ColumnType::Date => date_stats(&values),
        ColumnType::Boolean => Some(boolean_stats(&values)),
        ColumnType::Categorical => Some(categorical_stats(&values)),
    };

    if stats.is_none() {
        tracing::debug!("Column '{}' produced no analysis", column_key);
    }

    stats.map(|stats| ColumnAnalysis {
        key: column_key.to_string(),
        label: column_label.to_string(),
        stats,
    })
}

/// Analyzes every column independently, keeping descriptor order and
/// omitting columns without an analysis.
pub fn analyze_columns(records: &[Record], columns: &[ColumnDescriptor]) -> Vec<ColumnAnalysis> {
    columns
        .iter()
        .filter_map(|column| analyze_column(records, &column.key, &column.label))
        .collect()
}

pub fn infer_column_type(records: &[Record], column_key: &str) -> Option<ColumnType> {
    column_values(records, column_key).first().map(|v| classify(v))
}

fn column_values<'a>(records: &'a [Record], column_key: &str) -> Vec<&'a Value> {
    records
        .iter()
        .filter_map(|record| record.get(column_key))
        .filter(|value| !value.is_null())
        .collect()
}

fn classify(value: &Value) -> ColumnType {
    match value {
        Value::Number(_) => ColumnType::Number,
        Value::Bool(_) => ColumnType::Boolean,
        Value::Date(_) => ColumnType::Date,
        Value::Text(s) if ISO_DATE_PREFIX.is_match(s) => ColumnType::Date,
        _ => ColumnType::Categorical,
    }
}

fn numeric_stats(values: &[&Value]) -> Option<ColumnStats> {
    let mut numbers: Vec<f64> = values
        .iter()
        .filter_map(|value| match value {
            Value::Number(n) => Some(*n),
            _ => None,
        })
        .collect();
    if numbers.is_empty() {
        return None;
    }

    // summed in input order, before sorting
    let total: f64 = numbers.iter().sum();
    let count = numbers.len();

    numbers.sort_by(f64::total_cmp);
    let (&min, &max) = (numbers.first()?, numbers.last()?);
    let mid = count / 2;
    let median = if count % 2 == 0 {
        (numbers[mid - 1] + numbers[mid]) / 2.0
    } else {
        numbers[mid]
    };

    // rounding in the sum can push the mean just past the extremes
    let average = (total / count as f64).max(min).min(max);

    Some(ColumnStats::Numeric {
        total,
        average,
        min,
        max,
        median,
        count,
    })
}

fn date_stats(values: &[&Value]) -> Option<ColumnStats> {
    let dates: Vec<DateTime<Utc>> = values.iter().filter_map(|v| to_date(v)).collect();
    let earliest = dates.iter().min().copied()?;
    let latest = dates.iter().max().copied()?;

    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for date in &dates {
        *per_day.entry(date.date_naive()).or_insert(0) += 1;
    }

    let skip = per_day.len().saturating_sub(MAX_DATE_BUCKETS);
    let chart_data = per_day
        .into_iter()
        .skip(skip)
        .map(|(day, occurrence_count)| DateBucket {
            bucket_date: day.format("%Y-%m-%d").to_string(),
            occurrence_count,
        })
        .collect();

    Some(ColumnStats::Date {
        earliest,
        latest,
        count: dates.len(),
        chart_data,
    })
}

/// Converts a cell to an instant. Unparseable cells are `None`, never an error.
pub fn to_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Date(date) => Some(*date),
        Value::Text(raw) => parse_date_str(raw),
        Value::Number(millis) if millis.is_finite() => {
            DateTime::from_timestamp_millis(*millis as i64)
        }
        _ => None,
    }
}

fn parse_date_str(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(s) {
        return Some(date.with_timezone(&Utc));
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(date) = DateTime::parse_from_str(s, format) {
            return Some(date.with_timezone(&Utc));
        }
    }
    // a trailing `Z` on an otherwise naive form is UTC
    let naive_part = s.strip_suffix(['Z', 'z']).unwrap_or(s);
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(naive_part, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(day) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return day.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    DateTime::parse_from_rfc2822(s)
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Text(s) => s == "true" || s == "True",
        Value::Number(n) => *n == 1.0,
        _ => false,
    }
}

fn boolean_stats(values: &[&Value]) -> ColumnStats {
    let total = values.len();
    let true_count = values.iter().filter(|v| is_truthy(v)).count();
    ColumnStats::Boolean {
        true_count,
        false_count: total - true_count,
        total,
    }
}

fn categorical_stats(values: &[&Value]) -> ColumnStats {
    let strings: Vec<String> = values.iter().map(|v| v.display_string()).collect();
    let unique_count = strings.iter().collect::<HashSet<_>>().len();

    // Grouped on the truncated label, so long values sharing a prefix merge
    // in the chart while still counting separately in `unique_count`.
    let mut chart_data: Vec<CategoryCount> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for s in &strings {
        let label: String = s.chars().take(CATEGORY_LABEL_CHARS).collect();
        match positions.get(&label) {
            Some(&pos) => chart_data[pos].count += 1,
            None => {
                positions.insert(label.clone(), chart_data.len());
                chart_data.push(CategoryCount {
                    value: label,
                    count: 1,
                });
            }
        }
    }

    // stable: ties keep first-appearance order
    chart_data.sort_by(|a, b| b.count.cmp(&a.count));
    chart_data.truncate(MAX_CATEGORIES);

    ColumnStats::Categorical {
        unique_count,
        total: strings.len(),
        most_common: chart_data.first().cloned(),
        chart_data,
    }
}

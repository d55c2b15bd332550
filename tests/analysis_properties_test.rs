use serde_json::json;
use tabular_report::{analyze_column, analyze_columns, ColumnDescriptor, ColumnStats, Record};

fn records(rows: serde_json::Value) -> Vec<Record> {
    rows.as_array()
        .unwrap()
        .iter()
        .cloned()
        .map(Record::from_json)
        .collect()
}

/// Deterministic pseudo-random weights so the properties see uneven data.
fn weights(n: usize) -> Vec<f64> {
    let mut state: u64 = 0x2545_f491;
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            ((state >> 33) % 10_000) as f64 / 10.0
        })
        .collect()
}

#[test]
fn test_numeric_bounds_hold() {
    for n in [1, 2, 3, 10, 51, 200] {
        let data: Vec<Record> = weights(n)
            .into_iter()
            .map(|w| Record::from_json(json!({"weight": w})))
            .collect();

        match analyze_column(&data, "weight", "Weight").unwrap().stats {
            ColumnStats::Numeric {
                min,
                max,
                median,
                average,
                count,
                ..
            } => {
                assert_eq!(count, n);
                assert!(min <= median && median <= max, "median out of range for n={}", n);
                assert!(min <= average && average <= max, "average out of range for n={}", n);
            }
            other => panic!("unexpected stats: {:?}", other),
        }
    }

    for repeated in [0.1, 0.7, 1.0 / 3.0] {
        let data: Vec<Record> = (0..3)
            .map(|_| Record::from_json(json!({"weight": repeated})))
            .collect();
        match analyze_column(&data, "weight", "Weight").unwrap().stats {
            ColumnStats::Numeric { min, max, average, .. } => {
                assert!(min <= average && average <= max, "average out of range for {}", repeated);
            }
            other => panic!("unexpected stats: {:?}", other),
        }
    }
}

#[test]
fn test_median_ignores_record_order() {
    let mut data: Vec<Record> = weights(40)
        .into_iter()
        .map(|w| Record::from_json(json!({"weight": w})))
        .collect();

    let median_of = |rows: &[Record]| match analyze_column(rows, "weight", "Weight").unwrap().stats {
        ColumnStats::Numeric { median, .. } => median,
        other => panic!("unexpected stats: {:?}", other),
    };

    let forward = median_of(&data);
    data.reverse();
    assert_eq!(forward, median_of(&data));
}

#[test]
fn test_boolean_counts_add_up() {
    let data = records(json!([
        {"vaccinated": true},
        {"vaccinated": "True"},
        {"vaccinated": "no"},
        {"vaccinated": 1},
        {"vaccinated": 2},
        {"vaccinated": null},
        {"vaccinated": false}
    ]));

    match analyze_column(&data, "vaccinated", "Vaccinated").unwrap().stats {
        ColumnStats::Boolean {
            true_count,
            false_count,
            total,
        } => {
            assert_eq!(true_count + false_count, total);
            assert_eq!(true_count, 3);
            assert_eq!(total, 6);
        }
        other => panic!("unexpected stats: {:?}", other),
    }
}

#[test]
fn test_categorical_chart_is_bounded_and_sorted() {
    let data: Vec<Record> = (0..300)
        .map(|i| Record::from_json(json!({"supplier": format!("supplier-{}", (i * 7) % 23)})))
        .collect();

    match analyze_column(&data, "supplier", "Supplier").unwrap().stats {
        ColumnStats::Categorical {
            chart_data,
            most_common,
            unique_count,
            total,
        } => {
            assert_eq!(total, 300);
            assert_eq!(unique_count, 23);
            assert!(chart_data.len() <= 15);
            assert!(chart_data.windows(2).all(|p| p[0].count >= p[1].count));
            assert_eq!(most_common.as_ref(), chart_data.first());
        }
        other => panic!("unexpected stats: {:?}", other),
    }
}

#[test]
fn test_date_chart_is_bounded_and_ascending() {
    let data: Vec<Record> = (0..90)
        .rev()
        .map(|day| {
            let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                + chrono::Duration::days(day);
            Record::from_json(json!({"laid_on": format!("{}T06:00:00Z", date)}))
        })
        .collect();

    match analyze_column(&data, "laid_on", "Laid on").unwrap().stats {
        ColumnStats::Date { chart_data, .. } => {
            assert_eq!(chart_data.len(), 30);
            assert!(chart_data
                .windows(2)
                .all(|p| p[0].bucket_date < p[1].bucket_date));
            assert_eq!(chart_data.last().unwrap().bucket_date, "2024-03-30");
        }
        other => panic!("unexpected stats: {:?}", other),
    }
}

#[test]
fn test_mixed_columns_degrade_instead_of_failing() {
    let data = records(json!([
        {"amount": 12.5, "paid_on": "2024-02-01", "status": "open", "flag": true},
        {"amount": "twelve", "paid_on": "someday", "status": {"nested": true}, "flag": "maybe"},
        {"amount": null, "paid_on": 0, "status": ["a", "b"], "flag": 0}
    ]));
    let columns = vec![
        ColumnDescriptor::new("amount", "Amount"),
        ColumnDescriptor::new("paid_on", "Paid on"),
        ColumnDescriptor::new("status", "Status"),
        ColumnDescriptor::new("flag", "Flag"),
        ColumnDescriptor::new("ghost", "Ghost"),
    ];

    let analyses = analyze_columns(&data, &columns);
    let keys: Vec<&str> = analyses.iter().map(|a| a.key.as_str()).collect();
    assert_eq!(keys, vec!["amount", "paid_on", "status", "flag"]);

    match &analyses[1].stats {
        // epoch-millisecond 0 counts as a date, "someday" is dropped
        ColumnStats::Date { count, .. } => assert_eq!(*count, 2),
        other => panic!("unexpected stats: {:?}", other),
    }
}

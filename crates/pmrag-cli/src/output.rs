//! Table rendering for terminal output

use comfy_table::{presets::UTF8_FULL, Table};
use pmrag_core::{Match, Record};
use pmrag_eval::{BucketMetrics, EvalMetrics};

pub fn matches_table(matches: &[Match]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["#", "Id", "Label", "Score"]);
    for (rank, m) in matches.iter().enumerate() {
        table.add_row(vec![
            (rank + 1).to_string(),
            m.id.clone(),
            m.label.clone().unwrap_or_default(),
            format!("{:.4}", m.score),
        ]);
    }
    table
}

/// Rows as a table; columns come from the first row
pub fn records_table(records: &[Record]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    let Some(first) = records.first() else {
        return table;
    };
    let columns: Vec<String> = first.columns().map(str::to_string).collect();
    table.set_header(columns.clone());
    for record in records {
        table.add_row(
            columns
                .iter()
                .map(|c| record.get(c).map(|v| v.to_string()).unwrap_or_default())
                .collect::<Vec<_>>(),
        );
    }
    table
}

pub fn metrics_table(metrics: &EvalMetrics) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Bucket", "Queries", "Correct", "Accuracy"]);
    for (name, bucket) in [
        ("overall", &metrics.overall),
        ("easy", &metrics.easy),
        ("hard", &metrics.hard),
    ] {
        table.add_row(bucket_row(name, bucket));
    }
    table
}

fn bucket_row(name: &str, bucket: &BucketMetrics) -> Vec<String> {
    vec![
        name.to_string(),
        bucket.num_queries.to_string(),
        bucket.num_correct.to_string(),
        bucket
            .accuracy
            .map(|a| format!("{:.1}%", a * 100.0))
            .unwrap_or_else(|| "n/a".to_string()),
    ]
}

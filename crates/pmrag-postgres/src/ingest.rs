//! Table preparation and embedding backfill for the Postgres table

use pmrag_core::EmbeddingProvider;
use serde::Serialize;
use sqlx::Row;
use tracing::{info, warn};

use crate::error::{PostgresError, PostgresResult};
use crate::schema::validate_identifier;
use crate::store::PostgresStore;

const FILTERED_SUFFIX: &str = "_filtered";

/// Outcome of [`filter_table`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterReport {
    /// Qualified source table
    pub source: String,
    /// Qualified table that was created
    pub table: String,
    /// Columns copied
    pub columns: usize,
    /// Rows copied
    pub rows: i64,
}

/// Outcome of a backfill run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Rows whose embedding was written
    pub embedded: usize,
    /// Rows whose update failed
    pub failed: usize,
}

/// Name of the table [`filter_table`] creates from `source`
pub fn filtered_table_name(source: &str) -> String {
    format!("{source}{FILTERED_SUFFIX}")
}

/// Parse a required-columns file: one column per line; blank lines and `#` comments skipped
pub fn parse_required_columns(text: &str) -> PostgresResult<Vec<String>> {
    let mut columns: Vec<String> = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let column = validate_identifier(line)?.to_string();
        if !columns.contains(&column) {
            columns.push(column);
        }
    }
    if columns.is_empty() {
        return Err(PostgresError::InvalidInput(
            "required-columns list is empty".to_string(),
        ));
    }
    Ok(columns)
}

/// Copy `columns` of `source` into `<source>_filtered` and key it on the id column.
///
/// With `overwrite` an existing target is dropped first; without it an existing target is
/// a query error. Runs in one transaction.
pub async fn filter_table(
    store: &PostgresStore,
    source: &str,
    columns: &[String],
    overwrite: bool,
) -> PostgresResult<FilterReport> {
    let layout = store.layout();
    let source = validate_identifier(source)?;
    for column in columns {
        validate_identifier(column)?;
    }
    if columns.is_empty() {
        return Err(PostgresError::InvalidInput("no columns to copy".to_string()));
    }
    if !columns.contains(&layout.id_column) {
        return Err(PostgresError::InvalidInput(format!(
            "required columns must include the id column {}",
            layout.id_column
        )));
    }

    let source_table = format!("{}.{}", layout.schema, source);
    let target = format!("{}.{}", layout.schema, filtered_table_name(source));

    let mut tx = store.pool().begin().await?;
    if overwrite {
        sqlx::query(&format!("DROP TABLE IF EXISTS {target}"))
            .execute(&mut *tx)
            .await?;
    }
    sqlx::query(&format!(
        "CREATE TABLE {target} AS SELECT {} FROM {source_table} WITH DATA",
        columns.join(", ")
    ))
    .execute(&mut *tx)
    .await
    .map_err(|e| PostgresError::Query(e.to_string()))?;
    sqlx::query(&format!(
        "ALTER TABLE {target} ADD PRIMARY KEY ({})",
        layout.id_column
    ))
    .execute(&mut *tx)
    .await
    .map_err(|e| PostgresError::Query(e.to_string()))?;
    let rows: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {target}"))
        .fetch_one(&mut *tx)
        .await?;
    tx.commit().await?;

    info!(source = %source_table, table = %target, columns = columns.len(), rows, "filtered table created");
    Ok(FilterReport {
        source: source_table,
        table: target,
        columns: columns.len(),
        rows,
    })
}

/// Join the non-empty text columns of a row with single spaces
pub fn embedding_text(values: &[Option<String>]) -> String {
    values
        .iter()
        .flatten()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Embed the configured text columns of every row and store the vectors.
///
/// Adds the embedding column when missing. Embedding failures abort the run; a failed
/// row update is logged and counted.
pub async fn embed_table(
    store: &PostgresStore,
    embedder: &dyn EmbeddingProvider,
    batch_size: usize,
) -> PostgresResult<IngestReport> {
    let layout = store.layout();
    let table = layout.qualified_table();

    sqlx::query(&format!(
        "ALTER TABLE {} ADD COLUMN IF NOT EXISTS {} DOUBLE PRECISION[]",
        table, layout.embedding_column
    ))
    .execute(store.pool())
    .await?;

    let text_select: Vec<String> = layout
        .text_columns
        .iter()
        .map(|c| format!("{}::text", c))
        .collect();
    let rows = sqlx::query(&format!(
        "SELECT {}::text AS pyid, {} FROM {}",
        layout.id_column,
        text_select.join(", "),
        table
    ))
    .fetch_all(store.pool())
    .await?;

    let mut ids = Vec::with_capacity(rows.len());
    let mut texts = Vec::with_capacity(rows.len());
    for row in &rows {
        let id: Option<String> = row.try_get(0)?;
        let Some(id) = id else { continue };
        let values = (1..=layout.text_columns.len())
            .map(|i| row.try_get::<Option<String>, _>(i))
            .collect::<Result<Vec<_>, _>>()?;
        ids.push(id);
        texts.push(embedding_text(&values));
    }
    info!(rows = ids.len(), table = %table, "embedding table rows");

    let vectors = pmrag_llm::embed_in_batches(embedder, texts, batch_size).await?;

    let update = format!(
        "UPDATE {} SET {} = $1 WHERE {}::text = $2",
        table, layout.embedding_column, layout.id_column
    );
    let mut report = IngestReport::default();
    for (id, vector) in ids.iter().zip(vectors) {
        let vector: Vec<f64> = vector.into_iter().map(f64::from).collect();
        match sqlx::query(&update)
            .bind(vector)
            .bind(id)
            .execute(store.pool())
            .await
        {
            Ok(_) => report.embedded += 1,
            Err(e) => {
                warn!(id = %id, error = %e, "failed to store embedding");
                report.failed += 1;
            }
        }
    }

    info!(
        embedded = report.embedded,
        failed = report.failed,
        column = %layout.embedding_column,
        "embedding column populated"
    );
    Ok(report)
}

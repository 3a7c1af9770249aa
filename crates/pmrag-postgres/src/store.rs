//! `RecordStore` over a Postgres table

use async_trait::async_trait;
use pmrag_config::PostgresConfig;
use pmrag_core::{Candidate, QueryDialect, Record, RecordStore, StoreResult};
use sqlx::{PgPool, Row};
use tracing::{debug, info};

use crate::connection;
use crate::error::{PostgresError, PostgresResult};
use crate::row::decode_rows;
use crate::schema::{self, validate_identifier, TableLayout};

/// Postgres-backed store for one embedded table
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
    layout: TableLayout,
    sample_rows: usize,
}

impl PostgresStore {
    /// Wrap an existing pool
    pub fn new(pool: PgPool, layout: TableLayout, sample_rows: usize) -> Self {
        Self {
            pool,
            layout,
            sample_rows,
        }
    }

    /// Resolve connection settings, validate the layout and open a pool
    pub async fn connect(config: &PostgresConfig) -> PostgresResult<Self> {
        let layout = TableLayout::from_config(config)?;
        let connection = config
            .connection()
            .map_err(|e| PostgresError::Connection(e.to_string()))?;
        let pool = connection::connect(&connection, config.max_connections).await?;
        info!(table = %layout.qualified_table(), "Postgres store ready");
        Ok(Self::new(pool, layout, config.sample_rows))
    }

    /// Underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Validated table layout
    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    /// Run one statement and decode its rows
    pub async fn query(&self, sql: &str) -> PostgresResult<Vec<Record>> {
        debug!(sql, "executing SQL");
        let rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PostgresError::Query(e.to_string()))?;
        let records = decode_rows(&rows)?;
        debug!(rows = records.len(), "SQL returned");
        Ok(records)
    }

    /// Schema text for the model
    pub async fn describe(&self) -> PostgresResult<String> {
        schema::describe_table(&self.pool, &self.layout, self.sample_rows).await
    }

    /// Column names of the table
    pub async fn column_names(&self) -> PostgresResult<Vec<String>> {
        Ok(schema::table_columns(&self.pool, &self.layout)
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect())
    }

    /// Rows that have an embedding, as ranking candidates
    pub async fn candidates(&self) -> PostgresResult<Vec<Candidate>> {
        let sql = format!(
            "SELECT {id}::text AS pyid, {label}::text AS pylabel, {emb}::float8[] AS embeddings \
             FROM {table} WHERE {emb} IS NOT NULL",
            id = self.layout.id_column,
            label = self.layout.label_column,
            emb = self.layout.embedding_column,
            table = self.layout.qualified_table(),
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        let mut candidates = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: Option<String> = row.try_get("pyid")?;
            let Some(id) = id else { continue };
            let label: Option<String> = row.try_get("pylabel")?;
            let embedding: Vec<f64> = row.try_get("embeddings")?;
            candidates.push(Candidate::new(
                id,
                label,
                embedding.into_iter().map(|f| f as f32).collect(),
            ));
        }
        debug!(candidates = candidates.len(), "loaded embedded rows");
        Ok(candidates)
    }

    /// Every row of the table without the embedding column (graph build input)
    pub async fn table_records(&self) -> PostgresResult<Vec<Record>> {
        let columns: Vec<String> = self
            .column_names()
            .await?
            .into_iter()
            .filter(|c| *c != self.layout.embedding_column)
            .filter(|c| validate_identifier(c).is_ok())
            .collect();
        if columns.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {} FROM {}",
            columns.join(", "),
            self.layout.qualified_table()
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        decode_rows(&rows)
    }
}

#[async_trait]
impl RecordStore for PostgresStore {
    fn dialect(&self) -> QueryDialect {
        QueryDialect::Sql
    }

    fn embedding_field(&self) -> &str {
        &self.layout.embedding_column
    }

    async fn schema(&self) -> StoreResult<String> {
        Ok(self.describe().await?)
    }

    async fn execute(&self, query: &str) -> StoreResult<Vec<Record>> {
        Ok(self.query(query).await?)
    }

    async fn embedded_candidates(&self) -> StoreResult<Vec<Candidate>> {
        Ok(self.candidates().await?)
    }
}

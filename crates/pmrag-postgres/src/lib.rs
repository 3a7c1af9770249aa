//! Postgres store for pmrag
//!
//! Implements [`pmrag_core::RecordStore`] over one table holding project-management
//! records (user stories, epics, goals, projects, backlogs) plus a stored embedding per
//! row.
//!
//! ## Features
//!
//! - **Typed rows**: `PgRow`s are decoded column by column into [`pmrag_core::Value`]
//! - **Schema text**: `CREATE TABLE` plus a few sample rows for query generation
//! - **Candidates**: every row with an embedding, for threshold similarity search
//! - **Table filter**: [`ingest::filter_table`] copies the required columns into `<table>_filtered`
//! - **Backfill**: [`ingest::embed_table`] adds and fills the embedding column
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pmrag_postgres::PostgresStore;
//! use pmrag_core::RecordStore;
//!
//! let store = PostgresStore::connect(&config.postgres).await?;
//! let rows = store.execute("SELECT COUNT(*) FROM public.data_filtered").await?;
//! ```

pub mod connection;
pub mod error;
pub mod ingest;
pub mod row;
pub mod schema;
pub mod store;

// Re-exports
pub use error::{PostgresError, PostgresResult};
pub use ingest::{
    embed_table, filter_table, filtered_table_name, parse_required_columns, FilterReport,
    IngestReport,
};
pub use schema::{validate_identifier, TableLayout};
pub use store::PostgresStore;

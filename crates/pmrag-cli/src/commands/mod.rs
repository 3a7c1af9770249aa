pub mod ask;
pub mod eval;
pub mod ingest;
pub mod schema;
pub mod search;

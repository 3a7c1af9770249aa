use clap::{Parser, Subcommand, ValueEnum};
use pmrag_core::QueryDialect;
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages (default)
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Which store a command works against
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// Postgres table, queried with SQL
    Sql,
    /// Neo4j graph, queried with Cypher
    Graph,
}

impl StoreKind {
    pub fn dialect(self) -> QueryDialect {
        match self {
            StoreKind::Sql => QueryDialect::Sql,
            StoreKind::Graph => QueryDialect::Cypher,
        }
    }
}

#[derive(Parser)]
#[command(name = "pmrag")]
#[command(about = "pmrag - question answering over project-management data in Postgres and Neo4j")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    /// If not specified, uses the config file value or defaults to 'info'
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ./pmrag.toml when present)
    #[arg(short = 'C', long, global = true, env = "PMRAG_CONFIG")]
    pub config: Option<PathBuf>,

    /// .env file with connection settings (defaults to ./.env when present)
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Answer a question
    Ask {
        /// Store to answer from
        #[arg(short, long, value_enum, default_value = "sql")]
        store: StoreKind,

        /// Print the full response as JSON
        #[arg(long)]
        json: bool,

        /// The question
        question: String,
    },

    /// Print the schema text given to the model
    Schema {
        #[arg(short, long, value_enum, default_value = "sql")]
        store: StoreKind,
    },

    /// Rank stored records by similarity to a text
    Search {
        #[arg(short, long, value_enum, default_value = "sql")]
        store: StoreKind,

        /// Override the configured threshold
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Print matches as JSON
        #[arg(long)]
        json: bool,

        /// Text to search for
        text: String,
    },

    /// Run the sample queries and report accuracy
    Eval {
        #[arg(short, long, value_enum, default_value = "sql")]
        store: StoreKind,

        /// Queries CSV (id;query;difficulty)
        #[arg(long)]
        queries: Option<PathBuf>,

        /// Answer key CSV (id;answer)
        #[arg(long)]
        answers: Option<PathBuf>,

        /// Output directory
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Score an already graded CSV (id;difficulty;correct) instead of running queries
        #[arg(long, conflicts_with_all = ["queries", "answers"])]
        graded: Option<PathBuf>,
    },

    /// Prepare the stores
    #[command(subcommand)]
    Ingest(IngestCommands),
}

#[derive(Subcommand)]
pub enum IngestCommands {
    /// Copy the required columns of a raw table into `<source>_filtered`
    FilterTable {
        /// Raw table to copy from
        #[arg(long, default_value = "data")]
        source: String,

        /// File listing the required columns, one per line
        #[arg(long)]
        columns: PathBuf,

        /// Drop the filtered table first if it exists
        #[arg(long)]
        overwrite: bool,
    },

    /// Embed the text columns of the Postgres table
    EmbedSql,

    /// Build the Neo4j graph from the Postgres table
    BuildGraph {
        /// Keep existing nodes instead of clearing the graph first
        #[arg(long)]
        no_reset: bool,
    },

    /// Embed graph nodes that have no embedding yet
    EmbedGraph,
}

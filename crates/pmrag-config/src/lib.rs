//! # pmrag configuration
//!
//! One explicit [`Config`] value is built at startup and passed by reference to every
//! adapter. Nothing reads the process environment after that.
//!
//! ## Sources
//!
//! 1. Defaults (see each section's `Default`)
//! 2. Optional TOML file (`--config`, or `pmrag.toml` in the working directory)
//! 3. Environment variables for connection settings and secrets, optionally seeded
//!    from a `.env` file
//!
//! Connection settings are only required by the commands that use them:
//! [`PostgresConfig::connection`], [`Neo4jConfig::connection`] and
//! [`ApiConfig::credentials`] fail with [`ConfigError::MissingEnv`] naming the variable.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pmrag_config::{Config, ProcessEnv};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     pmrag_config::load_dotenv(None);
//!     let config = Config::load(None, &ProcessEnv)?;
//!     let postgres = config.postgres.connection()?;
//!     println!("connecting to {}:{}", postgres.host, postgres.port);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod components;
mod config;
mod env;
mod error;
mod loader;

pub use components::*;
pub use config::{Config, LoggingConfig};
pub use env::{EnvLookup, ProcessEnv};
pub use error::{ConfigError, ConfigResult};
pub use loader::{load_dotenv, DEFAULT_CONFIG_FILE};

//! Tracing subscriber setup

use anyhow::Result;
use std::str::FromStr;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

const CRATES: [&str; 8] = [
    "pmrag",
    "pmrag_core",
    "pmrag_config",
    "pmrag_llm",
    "pmrag_postgres",
    "pmrag_neo4j",
    "pmrag_agent",
    "pmrag_eval",
];

/// Pick the level: `--verbose`, then `--log-level`, then the config file, then info
pub fn resolve_level(
    cli_level: Option<LogLevel>,
    verbose: bool,
    config_level: Option<&str>,
) -> LevelFilter {
    if verbose {
        return LevelFilter::DEBUG;
    }
    if let Some(level) = cli_level {
        return level.into();
    }
    config_level
        .and_then(|level| LevelFilter::from_str(level).ok())
        .unwrap_or(LevelFilter::INFO)
}

/// Directives: dependencies at warn, our crates at `level`
pub fn directives(level: LevelFilter) -> String {
    if level == LevelFilter::OFF {
        return "off".to_string();
    }
    let ours: Vec<String> = CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect();
    format!("warn,pmrag_cli={level},{}", ours.join(","))
}

/// Install the fmt subscriber on stderr; `RUST_LOG` wins when set
pub fn init(level: LevelFilter) -> Result<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(spec) if !spec.is_empty() => EnvFilter::try_new(spec)?,
        _ => EnvFilter::try_new(directives(level))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_level_precedence() {
        assert_eq!(
            resolve_level(Some(LogLevel::Error), true, Some("trace")),
            LevelFilter::DEBUG
        );
        assert_eq!(
            resolve_level(Some(LogLevel::Error), false, Some("trace")),
            LevelFilter::ERROR
        );
        assert_eq!(resolve_level(None, false, Some("trace")), LevelFilter::TRACE);
        assert_eq!(resolve_level(None, false, Some("loud")), LevelFilter::INFO);
        assert_eq!(resolve_level(None, false, None), LevelFilter::INFO);
    }

    #[test]
    fn test_directives() {
        let d = directives(LevelFilter::DEBUG);
        assert!(d.starts_with("warn,"));
        assert!(d.contains("pmrag_agent=debug"));
        assert_eq!(directives(LevelFilter::OFF), "off");
        assert!(EnvFilter::try_new(d).is_ok());
    }
}

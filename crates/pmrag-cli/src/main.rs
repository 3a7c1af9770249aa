use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::debug;

use pmrag_cli::{
    cli::{Cli, Commands},
    commands, logging,
};
use pmrag_config::{load_dotenv, Config, ProcessEnv};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Environment first: the config reads connection settings from it
    match cli.env_file.as_deref() {
        Some(path) => {
            if load_dotenv(Some(path)).is_none() {
                bail!("could not read env file {}", path.display());
            }
        }
        None => {
            load_dotenv(None);
        }
    }

    let config =
        Config::load(cli.config.as_deref(), &ProcessEnv).context("failed to load configuration")?;

    let level = logging::resolve_level(cli.log_level, cli.verbose, config.logging.level.as_deref());
    logging::init(level)?;
    debug!(%level, "logging initialized");

    match cli.command {
        Commands::Ask {
            store,
            json,
            question,
        } => commands::ask::execute(&config, store, question, json).await?,

        Commands::Schema { store } => commands::schema::execute(&config, store).await?,

        Commands::Search {
            store,
            threshold,
            json,
            text,
        } => commands::search::execute(&config, store, text, threshold, json).await?,

        Commands::Eval {
            store,
            queries,
            answers,
            out_dir,
            graded,
        } => {
            commands::eval::execute(
                &config,
                commands::eval::EvalArgs {
                    store,
                    queries,
                    answers,
                    out_dir,
                    graded,
                },
            )
            .await?
        }

        Commands::Ingest(cmd) => commands::ingest::execute(&config, cmd).await?,
    }

    Ok(())
}

use anyhow::Result;
use pmrag_agent::Outcome;
use pmrag_config::Config;

use crate::cli::StoreKind;
use crate::{factories, output};

pub async fn execute(config: &Config, store: StoreKind, question: String, json: bool) -> Result<()> {
    let agent = factories::query_agent(config, store).await?;
    let response = agent.run(&question).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("{}", response.answer);
    match &response.outcome {
        Outcome::Structured { query, rows } => {
            eprintln!("\nAnswered from {} rows of:\n{}", rows.len(), query);
        }
        Outcome::Similarity { matches } => {
            eprintln!("\nAnswered from similar records:");
            eprintln!("{}", output::matches_table(matches));
        }
        Outcome::GaveUp => {}
    }
    Ok(())
}

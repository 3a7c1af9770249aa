use anyhow::{Context, Result};
use pmrag_config::Config;
use pmrag_core::RecordStore;

use crate::cli::StoreKind;
use crate::factories;

pub async fn execute(config: &Config, store: StoreKind) -> Result<()> {
    let store = factories::record_store(config, store).await?;
    let schema = store.schema().await.context("failed to read the schema")?;
    println!("{schema}");
    Ok(())
}

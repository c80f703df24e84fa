use anyhow::{Context, Result};
use reset_core::config::ResetConfig;
use reset_core::db::{wait_for_database, MySqlSeedDatabase, SeedDatabase};

use crate::output::print_status;

pub fn run(config: ResetConfig, json: bool) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(check(config, json))
}

async fn check(config: ResetConfig, json: bool) -> Result<()> {
    let db = MySqlSeedDatabase::new(&config.database);
    wait_for_database(&db, config.startup)
        .await
        .context("database check failed")?;

    if json {
        print_status("ready", serde_json::json!({ "target": db.describe() }))
    } else {
        println!("database ready at {}", db.describe());
        Ok(())
    }
}

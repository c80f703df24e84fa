use std::cell::Cell;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reset_core::config::ResetConfig;
use reset_core::db::MySqlSeedDatabase;
use reset_core::executor::{ResetExecutor, ResetReport};
use reset_core::ResetError;
use serde_json::json;

use crate::output::print_status;

pub fn run(config: ResetConfig, repeat: bool, json: bool) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(reset(config, repeat, json))
}

async fn reset(config: ResetConfig, repeat: bool, json: bool) -> Result<()> {
    let db = Arc::new(MySqlSeedDatabase::new(&config.database));
    let executor = ResetExecutor::new(db, config.seed_path.clone());

    if !repeat {
        let outcome = executor.reset().await;
        // In text mode main reports the error on stderr.
        if json || outcome.is_ok() {
            print_outcome(&outcome, json)?;
        }
        return outcome.map(|_| ()).map_err(anyhow::Error::from);
    }

    let cycles = Cell::new(0u64);
    tokio::select! {
        res = reset_forever(&executor, config.reset_interval(), json, &cycles) => res,
        _ = tokio::signal::ctrl_c() => {
            if !json {
                println!("stopped after {} reset(s)", cycles.get());
            }
            Ok(())
        }
    }
}

/// Reset, report, sleep. A failed reset is reported and retried next cycle.
async fn reset_forever(
    executor: &ResetExecutor,
    interval: Duration,
    json: bool,
    cycles: &Cell<u64>,
) -> Result<()> {
    loop {
        cycles.set(cycles.get() + 1);
        if !json {
            println!("scheduled reset #{}", cycles.get());
        }
        let outcome = executor.reset().await;
        print_outcome(&outcome, json)?;
        if !json {
            println!("next reset in {} seconds", interval.as_secs());
        }
        tokio::time::sleep(interval).await;
    }
}

fn print_outcome(outcome: &Result<ResetReport, ResetError>, json: bool) -> Result<()> {
    match (outcome, json) {
        (Ok(report), true) => print_status(
            "success",
            json!({
                "message": report.message(),
                "report": report,
            }),
        ),
        (Err(e), true) => print_status("error", json!({ "message": e.to_string() })),
        (Ok(report), false) => {
            println!(
                "Executed {} of {} statements successfully ({} warnings)",
                report.executed, report.statements, report.skipped
            );
            println!("{}", report.message());
            Ok(())
        }
        (Err(e), false) => {
            println!("Reset failed: {e}");
            Ok(())
        }
    }
}

use crate::output::print_json;
use anyhow::Result;
use bridge_core::{BatchOutcome, BridgeConfig, Reconciler};

/// Run a single reconciliation pass and print its result line.
pub fn run(json: bool) -> Result<()> {
    let config = BridgeConfig::from_env()?;
    let reconciler = Reconciler::from_config(&config)?;

    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(reconciler.process_batch())?;

    if json {
        return print_json(&serde_json::json!({ "result": outcome.message() }));
    }

    println!("{}", outcome.message());
    if let BatchOutcome::Processed(report) = &outcome {
        for filed in &report.filed {
            println!(
                "  row {:>4}  {:<12}  #{}  {}",
                filed.sheet_row,
                filed.ticket_id.as_deref().unwrap_or("-"),
                filed.number,
                filed.status
            );
        }
    }
    Ok(())
}

use anyhow::Result;
use axiom_client::Client;
use serde_json::json;

fn main() -> Result<()> {
    // Example program that calls the library API.
    // Configure credentials via AXIOM_TOKEN (and optionally AXIOM_ORG_ID).
    let client = Client::from_env()?;

    let status = client.datasets().ingest_events(
        "demo-logs",
        &[
            json!({ "service": "checkout", "level": "error", "message": "payment declined" }),
            json!({ "service": "checkout", "level": "info", "message": "retry scheduled" }),
        ],
    )?;

    println!(
        "ingested {} event(s), {} failed",
        status.ingested, status.failed
    );
    Ok(())
}

//! `manxid status`: query the status of a running node.

use clap::Args;
use serde::Deserialize;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// API endpoint of the node.
    #[arg(short, long, default_value = "http://127.0.0.1:9001")]
    pub endpoint: String,
}

#[derive(Deserialize)]
struct StatusResponse {
    version: String,
    issuer: String,
    uptime_secs: u64,
}

pub async fn run(args: &StatusArgs) -> anyhow::Result<()> {
    let url = format!("{}/api/v1/status", args.endpoint);

    let client = reqwest::Client::new();
    let resp = client.get(&url).send().await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let data: StatusResponse = r.json().await?;
            println!("Manx ID node");
            println!("  Version: {}", data.version);
            println!("  Issuer:  {}", data.issuer);
            println!("  Uptime:  {}s", data.uptime_secs);
        }
        Ok(r) => {
            anyhow::bail!("status request failed (HTTP {})", r.status());
        }
        Err(e) => {
            println!("Could not reach node at {}", args.endpoint);
            println!("  Error: {}", e);
        }
    }

    Ok(())
}

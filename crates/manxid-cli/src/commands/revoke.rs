//! `manxid revoke`: revoke an issued credential.

use clap::Args;
use serde::Deserialize;

#[derive(Args, Debug)]
pub struct RevokeArgs {
    /// Validation code of the credential to revoke.
    #[arg(short, long)]
    pub code: String,

    /// Session bearer token of the credential's subject.
    #[arg(short, long)]
    pub token: String,

    /// API endpoint of the node.
    #[arg(short, long, default_value = "http://127.0.0.1:9001")]
    pub endpoint: String,
}

#[derive(Deserialize)]
struct RevokeResponse {
    status: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run(args: &RevokeArgs) -> anyhow::Result<()> {
    let url = format!("{}/api/v1/credentials/{}/revoke", args.endpoint, args.code);

    let client = reqwest::Client::new();
    let resp = client.post(&url).bearer_auth(&args.token).send().await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let data: RevokeResponse = r.json().await?;
            println!("Credential {}", data.status);
        }
        Ok(r) => {
            let status = r.status();
            if let Ok(err) = r.json::<ErrorResponse>().await {
                anyhow::bail!("revocation failed (HTTP {}): {}", status, err.error);
            } else {
                anyhow::bail!("revocation failed (HTTP {})", status);
            }
        }
        Err(e) => {
            println!("Could not reach node at {}", args.endpoint);
            println!("  Error: {}", e);
        }
    }

    Ok(())
}

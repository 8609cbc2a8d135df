//! `manxid verify`: verify a validation code.

use clap::Args;
use serde::Deserialize;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// The 32-character validation code to check.
    #[arg(short, long)]
    pub code: String,

    /// API endpoint of the node.
    #[arg(short, long, default_value = "http://127.0.0.1:9001")]
    pub endpoint: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyResponse {
    is_valid: bool,
    is_over_18: bool,
    is_over_21: bool,
    issuer: String,
    expires_at: String,
    verified_at: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run(args: &VerifyArgs) -> anyhow::Result<()> {
    let url = format!("{}/verify/{}", args.endpoint, args.code);

    let client = reqwest::Client::new();
    let resp = client.get(&url).send().await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let data: VerifyResponse = r.json().await?;
            if data.is_valid {
                println!("Credential is VALID");
            } else {
                println!("Credential has EXPIRED");
            }
            println!();
            println!("  Issuer:      {}", data.issuer);
            println!("  18+:         {}", if data.is_over_18 { "verified" } else { "not verified" });
            println!("  21+:         {}", if data.is_over_21 { "verified" } else { "not verified" });
            println!("  Expires:     {}", data.expires_at);
            println!("  Verified at: {}", data.verified_at);
        }
        Ok(r) if r.status() == reqwest::StatusCode::NOT_FOUND => {
            println!("Credential is INVALID");
            println!("  This validation code is not recognized.");
        }
        Ok(r) => {
            let status = r.status();
            if let Ok(err) = r.json::<ErrorResponse>().await {
                anyhow::bail!("verification failed (HTTP {}): {}", status, err.error);
            } else {
                anyhow::bail!("verification failed (HTTP {})", status);
            }
        }
        Err(e) => {
            println!("Could not reach node at {}", args.endpoint);
            println!("  Error: {}", e);
        }
    }

    Ok(())
}

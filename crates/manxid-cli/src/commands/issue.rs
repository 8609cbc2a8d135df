//! `manxid issue`: request a proof-of-age credential.

use clap::Args;
use serde::{Deserialize, Serialize};

#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Subject to issue the credential for.
    #[arg(short, long)]
    pub subject: String,

    /// The subject's age in whole years.
    #[arg(short, long)]
    pub age: i64,

    /// Session bearer token.
    #[arg(short, long)]
    pub token: String,

    /// Also fetch and print the QR payload for the new credential.
    #[arg(long)]
    pub qr: bool,

    /// API endpoint of the node.
    #[arg(short, long, default_value = "http://127.0.0.1:9001")]
    pub endpoint: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IssueRequest {
    subject_id: String,
    credential_type: String,
    age: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialResponse {
    id: String,
    subject_id: String,
    issued_at: String,
    expires_at: String,
    is_over_18: bool,
    is_over_21: bool,
    validation_code: String,
    issuer: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run(args: &IssueArgs) -> anyhow::Result<()> {
    let url = format!("{}/api/v1/credentials/issue", args.endpoint);
    let body = IssueRequest {
        subject_id: args.subject.clone(),
        credential_type: "proof-of-age".into(),
        age: args.age,
    };

    let client = reqwest::Client::new();
    let resp = client
        .post(&url)
        .bearer_auth(&args.token)
        .json(&body)
        .send()
        .await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let data: CredentialResponse = r.json().await?;
            println!("Credential issued!");
            println!("  ID:              {}", data.id);
            println!("  Subject:         {}", data.subject_id);
            println!("  Issuer:          {}", data.issuer);
            println!("  Issued:          {}", data.issued_at);
            println!("  Expires:         {}", data.expires_at);
            println!("  18+:             {}", data.is_over_18);
            println!("  21+:             {}", data.is_over_21);
            println!("  Validation code: {}", data.validation_code);

            if args.qr {
                print_qr_payload(&client, args, &data.validation_code).await?;
            }
        }
        Ok(r) => {
            let status = r.status();
            if let Ok(err) = r.json::<ErrorResponse>().await {
                anyhow::bail!("issuance failed (HTTP {}): {}", status, err.error);
            } else {
                anyhow::bail!("issuance failed (HTTP {})", status);
            }
        }
        Err(e) => {
            println!("Could not reach node at {}", args.endpoint);
            println!("  Error: {}", e);
        }
    }

    Ok(())
}

async fn print_qr_payload(
    client: &reqwest::Client,
    args: &IssueArgs,
    code: &str,
) -> anyhow::Result<()> {
    let url = format!("{}/api/v1/credentials/{}/qr", args.endpoint, code);
    let resp = client.get(&url).bearer_auth(&args.token).send().await?;
    if resp.status().is_success() {
        let payload: serde_json::Value = resp.json().await?;
        println!();
        println!("QR payload:");
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("Could not fetch QR payload (HTTP {})", resp.status());
    }
    Ok(())
}

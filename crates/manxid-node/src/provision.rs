//! Issuer secret provisioning.

use anyhow::Result;
use std::path::Path;

use manxid_crypto::IssuerSecret;

/// Load the issuer secret from disk, or generate and save a new one.
///
/// The secret only ever lives at the configured path; there is no
/// fallback value.
pub fn load_or_generate_secret(path: &Path) -> Result<IssuerSecret> {
    if path.exists() {
        let contents = std::fs::read_to_string(path)?;
        let secret = IssuerSecret::from_hex(&contents)
            .map_err(|e| anyhow::anyhow!("failed to decode issuer secret: {}", e))?;
        tracing::info!(path = %path.display(), "loaded issuer secret from disk");
        Ok(secret)
    } else {
        let secret = IssuerSecret::generate();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, secret.to_hex())?;
        tracing::info!(path = %path.display(), "generated and saved new issuer secret");
        Ok(secret)
    }
}

//! Shared state accessible from HTTP handlers.

use std::sync::Arc;
use std::time::Instant;

use manxid_credentials::{CredentialIssuer, CredentialStore, CredentialVerifier};

use crate::sessions::SessionTable;

/// Everything the HTTP handlers need, behind one `Arc`.
pub struct AppState {
    /// Credential issuer.
    pub issuer: CredentialIssuer,
    /// Credential verifier.
    pub verifier: CredentialVerifier,
    /// Shared credential store, for QR and revocation lookups.
    pub store: Arc<dyn CredentialStore>,
    /// Bearer-token session table.
    pub sessions: SessionTable,
    /// Public origin for verify links.
    pub public_base_url: String,
    /// When the node started, for uptime reporting.
    pub start_time: Instant,
}

impl AppState {
    /// Assemble the state for a running node.
    pub fn new(
        issuer: CredentialIssuer,
        verifier: CredentialVerifier,
        store: Arc<dyn CredentialStore>,
        sessions: SessionTable,
        public_base_url: String,
    ) -> Self {
        Self {
            issuer,
            verifier,
            store,
            sessions,
            public_base_url,
            start_time: Instant::now(),
        }
    }
}

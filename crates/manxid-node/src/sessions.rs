//! Bearer-token session table.
//!
//! Stands in for the external identity provider: the node resolves the
//! Authorization header to an [`AuthenticatedIdentity`] here, and the
//! credential core only ever sees the resolved identity.

use std::collections::HashMap;

use manxid_core::AuthenticatedIdentity;

use crate::config::SessionEntry;

/// Maps bearer tokens to authenticated subjects.
pub struct SessionTable {
    tokens: HashMap<String, String>,
}

impl SessionTable {
    /// Build the table from configured session entries.
    pub fn from_entries(entries: &[SessionEntry]) -> Self {
        let tokens = entries
            .iter()
            .map(|e| (e.token.clone(), e.subject_id.clone()))
            .collect();
        Self { tokens }
    }

    /// Resolve a bearer token to an identity.
    pub fn authenticate(&self, token: &str) -> Option<AuthenticatedIdentity> {
        self.tokens
            .get(token)
            .map(|subject| AuthenticatedIdentity::new(subject.clone()))
    }

    /// Whether any sessions are configured.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

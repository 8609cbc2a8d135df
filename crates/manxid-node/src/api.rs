//! HTTP API server for the Manx ID node.
//!
//! Provides the authenticated issuance endpoints and the public
//! verification endpoint scanned from QR codes.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;

use manxid_core::{AuthenticatedIdentity, Credential, ValidationCode};
use manxid_credentials::{
    CredentialError, IssueRequest, QrPayload, VerificationOutcome, VerifiedClaims,
};

use crate::sessions::bearer_token;
use crate::state::AppState;

// --- Response types ---

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub version: String,
    pub issuer: String,
    pub uptime_secs: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub is_valid: bool,
    #[serde(flatten)]
    pub claims: VerifiedClaims,
}

#[derive(Serialize)]
pub struct RevokeResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

// --- Handlers ---

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}

async fn handle_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        issuer: state.issuer.issuer_name().to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

async fn handle_issue(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<IssueRequest>,
) -> Result<Json<Credential>, ApiError> {
    let identity = authenticate(&state, &headers)?;

    match state.issuer.issue(&identity, &req) {
        Ok(credential) => Ok(Json(credential)),
        Err(CredentialError::Unauthorized) => {
            Err(api_error(StatusCode::UNAUTHORIZED, "unauthorized"))
        }
        Err(e @ CredentialError::UnsupportedCredentialType(_))
        | Err(e @ CredentialError::InvalidInput(_)) => {
            Err(api_error(StatusCode::BAD_REQUEST, e.to_string()))
        }
        Err(e) => {
            tracing::error!(error = %e, "credential issuance failed");
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to generate credential",
            ))
        }
    }
}

async fn handle_verify(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let outcome = state.verifier.verify(&code).map_err(|e| {
        tracing::error!(error = %e, "verification failed");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "verification failed")
    })?;

    match outcome {
        VerificationOutcome::NotFound => Err(not_found()),
        VerificationOutcome::Valid(claims) => Ok(Json(VerifyResponse {
            is_valid: true,
            claims,
        })),
        VerificationOutcome::Expired(claims) => Ok(Json(VerifyResponse {
            is_valid: false,
            claims,
        })),
    }
}

async fn handle_qr(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> Result<Json<QrPayload>, ApiError> {
    let identity = authenticate(&state, &headers)?;
    let record = owned_record(&state, &identity, &code)?;
    Ok(Json(QrPayload::for_credential(
        &record.credential,
        &state.public_base_url,
    )))
}

async fn handle_revoke(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> Result<Json<RevokeResponse>, ApiError> {
    let identity = authenticate(&state, &headers)?;
    let record = owned_record(&state, &identity, &code)?;

    state
        .store
        .revoke(&record.credential.validation_code)
        .map_err(|e| {
            tracing::error!(error = %e, "revocation failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "revocation failed")
        })?;

    tracing::info!(
        credential_id = %record.credential.id,
        subject = %identity.subject_id,
        "credential revoked"
    );

    Ok(Json(RevokeResponse {
        status: "revoked".into(),
    }))
}

/// Resolve the caller's identity from the Authorization header.
fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthenticatedIdentity, ApiError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .and_then(|token| state.sessions.authenticate(token))
        .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "unauthorized"))
}

fn not_found() -> ApiError {
    api_error(StatusCode::NOT_FOUND, "validation code not recognized")
}

/// Look up a record the caller owns.
///
/// Unknown codes and codes owned by someone else both come back as 404,
/// so non-owners learn nothing about which codes exist.
fn owned_record(
    state: &AppState,
    identity: &AuthenticatedIdentity,
    code: &str,
) -> Result<manxid_credentials::IssuanceRecord, ApiError> {
    let code = ValidationCode::parse(code).map_err(|_| not_found())?;
    let record = state
        .store
        .get(&code)
        .map_err(|e| {
            tracing::error!(error = %e, "store lookup failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "store lookup failed")
        })?
        .ok_or_else(not_found)?;

    if record.credential.subject_id != identity.subject_id {
        return Err(not_found());
    }
    Ok(record)
}

// --- Server ---

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(handle_health))
        .route("/api/v1/status", get(handle_status))
        .route("/api/v1/credentials/issue", post(handle_issue))
        .route("/api/v1/credentials/{code}/qr", get(handle_qr))
        .route("/api/v1/credentials/{code}/revoke", post(handle_revoke))
        .route("/verify/{code}", get(handle_verify))
        .with_state(state)
}

pub async fn start_api_server(
    listen_addr: SocketAddr,
    state: Arc<AppState>,
) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(%listen_addr, "HTTP API server started");
    axum::serve(listener, app).await?;
    Ok(())
}

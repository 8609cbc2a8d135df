//! Integration test: full credential lifecycle across crates.
//!
//! Exercises the issuer, the store, and the verifier together, the way
//! the node wires them at runtime.

use std::sync::Arc;

use manxid_core::AuthenticatedIdentity;
use manxid_credentials::{
    CredentialIssuer, CredentialStore, CredentialVerifier, IssueRequest, MemoryStore, QrPayload,
    VerificationOutcome,
};
use manxid_crypto::IssuerSecret;

/// Helper: issuer and verifier sharing one secret and one store.
fn create_pair() -> (CredentialIssuer, CredentialVerifier, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let secret = IssuerSecret::generate();
    let issuer = CredentialIssuer::new(
        "Isle of Man Government".into(),
        secret.clone(),
        store.clone(),
    );
    let verifier = CredentialVerifier::new(secret, store.clone());
    (issuer, verifier, store)
}

fn proof_of_age(subject: &str, age: i64) -> IssueRequest {
    IssueRequest {
        subject_id: subject.into(),
        credential_type: "proof-of-age".into(),
        age,
    }
}

// =========================================================================
// Issue and verify
// =========================================================================

#[test]
fn test_issue_then_verify_end_to_end() {
    let (issuer, verifier, _store) = create_pair();

    // Subject u1, age 20: over 18, not over 21
    let vc = issuer
        .issue(&AuthenticatedIdentity::new("u1"), &proof_of_age("u1", 20))
        .expect("issuance should succeed");

    assert!(vc.is_over_18);
    assert!(!vc.is_over_21);
    assert_eq!(vc.issuer, "Isle of Man Government");

    let outcome = verifier
        .verify(vc.validation_code.as_str())
        .expect("verification should not error");

    match outcome {
        VerificationOutcome::Valid(claims) => {
            assert!(claims.is_over_18);
            assert!(!claims.is_over_21);
            assert_eq!(claims.issuer, vc.issuer);
            assert_eq!(claims.expires_at, vc.expires_at);
        }
        other => panic!("expected Valid, got {:?}", other),
    }
}

#[test]
fn test_multiple_subjects_independent_credentials() {
    let (issuer, verifier, store) = create_pair();

    let a = issuer
        .issue(&AuthenticatedIdentity::new("u1"), &proof_of_age("u1", 19))
        .unwrap();
    let b = issuer
        .issue(&AuthenticatedIdentity::new("u2"), &proof_of_age("u2", 42))
        .unwrap();

    assert_ne!(a.validation_code, b.validation_code);
    assert_eq!(store.len(), 2);

    let VerificationOutcome::Valid(claims_a) = verifier.verify(a.validation_code.as_str()).unwrap()
    else {
        panic!("expected Valid for u1");
    };
    let VerificationOutcome::Valid(claims_b) = verifier.verify(b.validation_code.as_str()).unwrap()
    else {
        panic!("expected Valid for u2");
    };

    assert!(!claims_a.is_over_21);
    assert!(claims_b.is_over_21);
}

#[test]
fn test_reissue_after_expiry_style_refresh() {
    // A holder refreshing their QR simply requests a new credential; the
    // old one remains independently verifiable until it expires.
    let (issuer, verifier, _store) = create_pair();
    let identity = AuthenticatedIdentity::new("u1");

    let first = issuer.issue(&identity, &proof_of_age("u1", 30)).unwrap();
    let second = issuer.issue(&identity, &proof_of_age("u1", 30)).unwrap();

    assert_ne!(first.validation_code, second.validation_code);
    assert!(verifier.verify(first.validation_code.as_str()).unwrap().is_valid());
    assert!(verifier.verify(second.validation_code.as_str()).unwrap().is_valid());
}

// =========================================================================
// Issuance failure taxonomy
// =========================================================================

#[test]
fn test_issuance_rejections_leave_no_record() {
    let (issuer, _verifier, store) = create_pair();
    let identity = AuthenticatedIdentity::new("u1");

    // Subject mismatch
    assert!(issuer.issue(&identity, &proof_of_age("u2", 20)).is_err());

    // Unsupported type
    let mut req = proof_of_age("u1", 20);
    req.credential_type = "proof-of-residency".into();
    assert!(issuer.issue(&identity, &req).is_err());

    // Negative age
    assert!(issuer.issue(&identity, &proof_of_age("u1", -5)).is_err());

    assert!(store.is_empty(), "no partial credential may be stored");
}

// =========================================================================
// Revocation
// =========================================================================

#[test]
fn test_revoked_credential_stops_verifying() {
    let (issuer, verifier, store) = create_pair();
    let vc = issuer
        .issue(&AuthenticatedIdentity::new("u1"), &proof_of_age("u1", 28))
        .unwrap();

    assert!(verifier.verify(vc.validation_code.as_str()).unwrap().is_valid());

    assert!(store.revoke(&vc.validation_code).unwrap());

    assert!(matches!(
        verifier.verify(vc.validation_code.as_str()).unwrap(),
        VerificationOutcome::NotFound
    ));
}

// =========================================================================
// Wire formats
// =========================================================================

#[test]
fn test_credential_wire_roundtrip_still_verifies() {
    let (issuer, verifier, _store) = create_pair();
    let vc = issuer
        .issue(&AuthenticatedIdentity::new("u1"), &proof_of_age("u1", 21))
        .unwrap();

    // The holder receives the credential as JSON and carries it around;
    // the code inside it must keep verifying against the store.
    let json = serde_json::to_string(&vc).unwrap();
    let carried: manxid_core::Credential = serde_json::from_str(&json).unwrap();

    assert_eq!(carried.signature, vc.signature);
    assert!(verifier
        .verify(carried.validation_code.as_str())
        .unwrap()
        .is_valid());
}

#[test]
fn test_qr_payload_matches_issued_credential() {
    let (issuer, _verifier, _store) = create_pair();
    let vc = issuer
        .issue(&AuthenticatedIdentity::new("u1"), &proof_of_age("u1", 21))
        .unwrap();

    let payload = QrPayload::for_credential(&vc, "https://id.gov.im");
    let json: serde_json::Value =
        serde_json::from_str(&payload.to_json().unwrap()).unwrap();

    assert_eq!(json["id"], vc.id.as_str());
    assert_eq!(json["type"], "proof-of-age");
    assert_eq!(json["validationCode"], vc.validation_code.as_str());
    assert_eq!(json["isOver18"], true);
    assert_eq!(json["isOver21"], true);
    assert_eq!(json["issuer"], "Isle of Man Government");
    assert_eq!(
        json["verifyUrl"],
        format!("https://id.gov.im/verify/{}", vc.validation_code)
    );
}

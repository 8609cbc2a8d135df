//! Integration test: verification contract properties.
//!
//! Pins down the behaviors a verifier must have: signatures bind every
//! signed field, expiry is a sharp boundary, and malformed codes are
//! rejected before the store is ever consulted.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{Duration, Utc};
use manxid_core::{AuthenticatedIdentity, ValidationCode};
use manxid_credentials::{
    CredentialIssuer, CredentialStore, CredentialVerifier, IssuanceRecord, IssueRequest,
    MemoryStore, StoreError, VerificationOutcome,
};
use manxid_crypto::IssuerSecret;

fn fixed_secret() -> IssuerSecret {
    IssuerSecret::from_bytes(vec![0x6D; 32]).unwrap()
}

fn create_pair() -> (CredentialIssuer, CredentialVerifier, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let issuer = CredentialIssuer::new(
        "Isle of Man Government".into(),
        fixed_secret(),
        store.clone(),
    );
    let verifier = CredentialVerifier::new(fixed_secret(), store.clone());
    (issuer, verifier, store)
}

fn proof_of_age(subject: &str, age: i64) -> IssueRequest {
    IssueRequest {
        subject_id: subject.into(),
        credential_type: "proof-of-age".into(),
        age,
    }
}

/// Store wrapper that counts lookups, to prove malformed codes never
/// reach the store.
struct CountingStore {
    inner: MemoryStore,
    gets: AtomicUsize,
}

impl CountingStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            gets: AtomicUsize::new(0),
        }
    }

    fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

impl CredentialStore for CountingStore {
    fn insert(&self, record: IssuanceRecord) -> Result<(), StoreError> {
        self.inner.insert(record)
    }

    fn get(&self, code: &ValidationCode) -> Result<Option<IssuanceRecord>, StoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(code)
    }

    fn revoke(&self, code: &ValidationCode) -> Result<bool, StoreError> {
        self.inner.revoke(code)
    }
}

// =========================================================================
// Signature binding
// =========================================================================

#[test]
fn test_signature_binds_every_signed_field() {
    let (issuer, _verifier, store) = create_pair();
    let vc = issuer
        .issue(&AuthenticatedIdentity::new("u1"), &proof_of_age("u1", 20))
        .unwrap();
    let original = store.get(&vc.validation_code).unwrap().unwrap();

    // Each tampering is applied to a fresh copy of the stored record,
    // then verified through a store containing only the tampered copy.
    let tamperings: Vec<(&str, Box<dyn Fn(&mut IssuanceRecord)>)> = vec![
        ("age", Box::new(|r| r.age += 1)),
        ("subject", Box::new(|r| r.credential.subject_id = "u2".into())),
        (
            "issued_at",
            Box::new(|r| r.credential.issued_at = r.credential.issued_at + Duration::seconds(1)),
        ),
    ];

    for (field, tamper) in tamperings {
        let mut record = original.clone();
        tamper(&mut record);

        let tampered_store = Arc::new(MemoryStore::new());
        tampered_store.insert(record).unwrap();
        let verifier = CredentialVerifier::new(fixed_secret(), tampered_store);

        let outcome = verifier.verify(vc.validation_code.as_str()).unwrap();
        assert!(
            matches!(outcome, VerificationOutcome::NotFound),
            "tampered {} must verify as NotFound",
            field
        );
    }
}

#[test]
fn test_forged_signature_is_not_found() {
    let (issuer, _verifier, store) = create_pair();
    let vc = issuer
        .issue(&AuthenticatedIdentity::new("u1"), &proof_of_age("u1", 20))
        .unwrap();

    let mut record = store.get(&vc.validation_code).unwrap().unwrap();
    // Flip one hex digit of the signature
    let mut sig = record.credential.signature.clone();
    let replacement = if sig.starts_with('0') { "1" } else { "0" };
    sig.replace_range(0..1, replacement);
    record.credential.signature = sig;

    let forged_store = Arc::new(MemoryStore::new());
    forged_store.insert(record).unwrap();
    let verifier = CredentialVerifier::new(fixed_secret(), forged_store);

    assert!(matches!(
        verifier.verify(vc.validation_code.as_str()).unwrap(),
        VerificationOutcome::NotFound
    ));
}

// =========================================================================
// Expiry boundary
// =========================================================================

#[test]
fn test_expiry_boundary_three_fifty_nine_vs_four_oh_one() {
    let (issuer, verifier, _store) = create_pair();
    let issued_at = Utc::now();
    let vc = issuer
        .issue_at(
            &AuthenticatedIdentity::new("u1"),
            &proof_of_age("u1", 20),
            issued_at,
        )
        .unwrap();

    let before = issued_at + Duration::hours(3) + Duration::minutes(59);
    let after = issued_at + Duration::hours(4) + Duration::minutes(1);

    let valid = verifier.verify_at(vc.validation_code.as_str(), before).unwrap();
    let expired = verifier.verify_at(vc.validation_code.as_str(), after).unwrap();

    let VerificationOutcome::Valid(valid_claims) = valid else {
        panic!("expected Valid at issued_at + 3h59m");
    };
    let VerificationOutcome::Expired(expired_claims) = expired else {
        panic!("expected Expired at issued_at + 4h01m");
    };

    // Identical claim fields apart from validity
    assert_eq!(valid_claims.is_over_18, expired_claims.is_over_18);
    assert_eq!(valid_claims.is_over_21, expired_claims.is_over_21);
    assert_eq!(valid_claims.issuer, expired_claims.issuer);
    assert_eq!(valid_claims.expires_at, expired_claims.expires_at);
}

// =========================================================================
// Malformed codes
// =========================================================================

#[test]
fn test_malformed_codes_never_reach_the_store() {
    let store = Arc::new(CountingStore::new());
    let verifier = CredentialVerifier::new(fixed_secret(), store.clone());

    for code in [
        "not-32-hex-chars",
        "G123456789ABCDEF0123456789ABCDEF",
        "0123456789ABCDEF",
        "",
    ] {
        let outcome = verifier.verify(code).unwrap();
        assert!(matches!(outcome, VerificationOutcome::NotFound), "{:?}", code);
    }
    assert_eq!(store.get_count(), 0, "no store lookup for malformed codes");

    // A well-formed code does reach the store
    verifier.verify("0123456789ABCDEF0123456789ABCDEF").unwrap();
    assert_eq!(store.get_count(), 1);
}

// =========================================================================
// Collision handling
// =========================================================================

/// Store wrapper that rejects the first N inserts as code collisions, to
/// exercise the issuer's regeneration path.
struct CollidingStore {
    inner: MemoryStore,
    remaining_rejections: AtomicUsize,
}

impl CollidingStore {
    fn new(rejections: usize) -> Self {
        Self {
            inner: MemoryStore::new(),
            remaining_rejections: AtomicUsize::new(rejections),
        }
    }
}

impl CredentialStore for CollidingStore {
    fn insert(&self, record: IssuanceRecord) -> Result<(), StoreError> {
        if self.remaining_rejections.load(Ordering::SeqCst) > 0 {
            self.remaining_rejections.fetch_sub(1, Ordering::SeqCst);
            return Err(StoreError::CodeCollision);
        }
        self.inner.insert(record)
    }

    fn get(&self, code: &ValidationCode) -> Result<Option<IssuanceRecord>, StoreError> {
        self.inner.get(code)
    }

    fn revoke(&self, code: &ValidationCode) -> Result<bool, StoreError> {
        self.inner.revoke(code)
    }
}

#[test]
fn test_code_collision_triggers_regeneration() {
    let store = Arc::new(CollidingStore::new(2));
    let issuer = CredentialIssuer::new(
        "Isle of Man Government".into(),
        fixed_secret(),
        store.clone(),
    );

    let vc = issuer
        .issue(&AuthenticatedIdentity::new("u1"), &proof_of_age("u1", 20))
        .expect("issuance should survive transient collisions");

    // Two attempts collided, the third landed; the stored record is the
    // one the holder received.
    assert_eq!(store.inner.len(), 1);
    let verifier = CredentialVerifier::new(fixed_secret(), store);
    assert!(verifier.verify(vc.validation_code.as_str()).unwrap().is_valid());
}

#[test]
fn test_persistent_collision_eventually_fails() {
    let store = Arc::new(CollidingStore::new(usize::MAX));
    let issuer = CredentialIssuer::new(
        "Isle of Man Government".into(),
        fixed_secret(),
        store.clone(),
    );

    let result = issuer.issue(&AuthenticatedIdentity::new("u1"), &proof_of_age("u1", 20));
    assert!(result.is_err());
    assert!(store.inner.is_empty());
}

// =========================================================================
// Code distinctness
// =========================================================================

#[test]
fn test_issued_codes_are_pairwise_distinct() {
    let (issuer, _verifier, store) = create_pair();
    let identity = AuthenticatedIdentity::new("u1");

    for _ in 0..250 {
        issuer.issue(&identity, &proof_of_age("u1", 20)).unwrap();
    }
    // The store keys by code, so every insert succeeding means every
    // code was distinct.
    assert_eq!(store.len(), 250);
}

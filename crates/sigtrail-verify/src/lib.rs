//! # sigtrail-verify
//!
//! Integrity verification for SIGTRAIL audit chains.
//!
//! ## Overview
//!
//! `verify_chain` replays a snapshot of chained entries, recomputing every
//! link through the same canonicalization and hashing the log used at
//! append time, and reports the first entry whose stored hash diverges.
//! `IntegrityVerifier` wraps that replay around an `AuditTrail` and a
//! `RequestDirectory` for store-backed checks.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sigtrail_verify::IntegrityVerifier;
//!
//! let verifier = IntegrityVerifier::new(trail, directory);
//! let report = verifier.check_integrity(&request_id)?;
//! assert!(report.is_valid());
//! ```

pub mod engine;

pub use engine::{verify_chain, Divergence, IntegrityReport, IntegrityVerifier};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sha2::{Digest, Sha256};

    use sigtrail_audit::{InMemoryAuditLog, InMemoryDirectory};
    use sigtrail_contracts::{
        AccessToken, AuditAction, AuditEvent, AuditLogEntry, RequestItemId, RequestState,
        SignRequestId, SignerValue, TrailError,
    };
    use sigtrail_core::{canonical_string, chain::contribution_fields, AuditTrail};

    use super::{verify_chain, IntegrityVerifier};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn setup(document: &[u8]) -> (Arc<InMemoryDirectory>, Arc<InMemoryAuditLog>, SignRequestId) {
        let directory = Arc::new(InMemoryDirectory::new());
        let request = SignRequestId::new();
        directory
            .register_document(&request, document.to_vec())
            .unwrap();
        let log = Arc::new(InMemoryAuditLog::new(directory.clone()));
        (directory, log, request)
    }

    fn verifier_for(
        directory: &Arc<InMemoryDirectory>,
        log: &Arc<InMemoryAuditLog>,
    ) -> IntegrityVerifier {
        IntegrityVerifier::new(log.clone(), directory.clone())
    }

    fn create_event(request: &SignRequestId) -> AuditEvent {
        AuditEvent {
            sign_request_id: request.clone(),
            sign_request_item_id: None,
            action: AuditAction::Create,
            actor: Some("partner-7".to_string()),
            geolocation: None,
            ip: Some("198.51.100.1".to_string()),
            request_state: RequestState::Sent,
            token: None,
        }
    }

    fn open_event(request: &SignRequestId, token: &str) -> AuditEvent {
        AuditEvent {
            sign_request_id: request.clone(),
            sign_request_item_id: None,
            action: AuditAction::Open,
            actor: None,
            geolocation: None,
            ip: None,
            request_state: RequestState::Sent,
            token: Some(AccessToken::new(token)),
        }
    }

    fn sign_event(request: &SignRequestId, token: &str) -> AuditEvent {
        AuditEvent {
            sign_request_id: request.clone(),
            sign_request_item_id: Some(RequestItemId::new()),
            action: AuditAction::Sign,
            actor: None,
            geolocation: None,
            ip: Some("203.0.113.9".to_string()),
            request_state: RequestState::Sent,
            token: Some(AccessToken::new(token)),
        }
    }

    /// Flip the last character of a stored hex hash.
    fn corrupt(hash: &str) -> String {
        let mut out: Vec<char> = hash.chars().collect();
        let last = out.len() - 1;
        out[last] = if out[last] == '0' { '1' } else { '0' };
        out.into_iter().collect()
    }

    /// Replay a snapshot against the directory, as `check_integrity` would.
    fn replay(
        directory: &Arc<InMemoryDirectory>,
        request: &SignRequestId,
        entries: &[AuditLogEntry],
    ) -> super::IntegrityReport {
        use sigtrail_core::RequestDirectory;
        verify_chain(
            request,
            entries,
            directory.original_document(request).as_deref(),
            |token| directory.signer_values(request, token),
        )
        .unwrap()
    }

    // ── Valid chains ──────────────────────────────────────────────────────────

    /// A fresh request with create + two signs verifies end to end.
    #[test]
    fn untampered_chain_is_valid() {
        let (directory, log, request) = setup(b"PDF-V1");
        directory.add_signer_value(
            &request,
            &AccessToken::new("T1"),
            SignerValue::new("name", "Alice"),
        );

        log.append(create_event(&request)).unwrap();
        log.append(sign_event(&request, "T1")).unwrap();
        log.append(sign_event(&request, "T2")).unwrap();

        let report = verifier_for(&directory, &log)
            .check_integrity(&request)
            .unwrap();

        assert!(report.is_valid(), "fresh chain must verify: {:?}", report.first_divergence);
        assert_eq!(report.checked, 3);
    }

    /// A request with no entries at all is trivially valid.
    #[test]
    fn empty_chain_is_valid() {
        let (directory, log, request) = setup(b"PDF-V1");

        let report = verifier_for(&directory, &log)
            .check_integrity(&request)
            .unwrap();

        assert!(report.is_valid());
        assert_eq!(report.checked, 0);
    }

    /// Unchained open entries in a full snapshot are skipped by the replay.
    #[test]
    fn open_entries_are_skipped() {
        let (directory, log, request) = setup(b"PDF-V1");

        log.append(create_event(&request)).unwrap();
        log.append(open_event(&request, "T1")).unwrap();
        log.append(sign_event(&request, "T1")).unwrap();

        // Full snapshot, not just the chained entries.
        let report = replay(&directory, &request, &log.entries(&request));
        assert!(report.is_valid());
        assert_eq!(report.checked, 2);
    }

    // ── Tamper detection ──────────────────────────────────────────────────────

    /// Overwriting entry k's stored hash flags k as the first divergence
    /// while the prefix 1..k-1 still verifies.
    #[test]
    fn overwritten_hash_is_first_divergence() {
        let (directory, log, request) = setup(b"PDF-V1");

        log.append(create_event(&request)).unwrap();
        log.append(sign_event(&request, "T1")).unwrap();
        log.append(sign_event(&request, "T2")).unwrap();

        let mut entries = log.chained_entries(&request);
        let stored = entries[1].log_hash.clone().unwrap();
        entries[1].log_hash = Some(corrupt(&stored));

        let report = replay(&directory, &request, &entries);
        assert!(!report.is_valid());
        let divergence = report.first_divergence.unwrap();
        assert_eq!(divergence.sequence, entries[1].sequence);
        assert_eq!(divergence.stored.as_deref(), entries[1].log_hash.as_deref());
        assert_eq!(report.checked, 2, "replay stops at the first divergence");

        // The untouched prefix remains provably valid.
        let prefix = replay(&directory, &request, &entries[..1]);
        assert!(prefix.is_valid());
    }

    /// Changing a hashed field (here: one ip octet) breaks that entry's
    /// recomputation.
    #[test]
    fn field_tampering_is_detected() {
        let (directory, log, request) = setup(b"PDF-V1");

        log.append(create_event(&request)).unwrap();
        log.append(sign_event(&request, "T1")).unwrap();

        let mut entries = log.chained_entries(&request);
        entries[1].ip = Some("203.0.113.8".to_string());

        let report = replay(&directory, &request, &entries);
        assert!(!report.is_valid());
        assert_eq!(report.first_divergence.unwrap().sequence, entries[1].sequence);
    }

    /// Patching an intermediate entry cannot make its successor verify:
    /// the successor is recomputed from the *recomputed* predecessor.
    #[test]
    fn patched_predecessor_does_not_revalidate_successor() {
        let (directory, log, request) = setup(b"PDF-V1");

        log.append(create_event(&request)).unwrap();
        log.append(sign_event(&request, "T1")).unwrap();
        log.append(sign_event(&request, "T2")).unwrap();

        let mut entries = log.chained_entries(&request);
        // Tamper entry 1's data AND patch its stored hash to the value
        // matching the tampered data, leaving entry 2 untouched.
        entries[1].ip = Some("203.0.113.8".to_string());
        let patched = sigtrail_core::compute_link(
            sigtrail_core::ChainSeed::Link(entries[0].log_hash.as_deref().unwrap()),
            contribution_fields(&entries[1], &[]),
        );
        entries[1].log_hash = Some(patched);

        let report = replay(&directory, &request, &entries);
        assert!(!report.is_valid(), "the successor must now diverge");
        assert_eq!(report.first_divergence.unwrap().sequence, entries[2].sequence);
    }

    /// A chained entry whose hash is missing entirely is a divergence, not
    /// a pass.
    #[test]
    fn missing_hash_on_chained_entry_diverges() {
        let (directory, log, request) = setup(b"PDF-V1");

        log.append(create_event(&request)).unwrap();

        let mut entries = log.chained_entries(&request);
        entries[0].log_hash = None;

        let report = replay(&directory, &request, &entries);
        assert!(!report.is_valid());
        let divergence = report.first_divergence.unwrap();
        assert!(divergence.stored.is_none());
    }

    /// Replaying a chain whose genesis document vanished is an error, not
    /// a silent pass or fail.
    #[test]
    fn missing_genesis_document_is_an_error() {
        let (_, log, request) = setup(b"PDF-V1");
        log.append(create_event(&request)).unwrap();

        let entries = log.chained_entries(&request);
        let err = verify_chain(&request, &entries, None, |_| Vec::new()).unwrap_err();
        assert!(matches!(err, TrailError::MissingGenesisDocument { .. }));
    }

    // ── The concrete scenario ─────────────────────────────────────────────────

    /// Document `b"PDF-V1"`; entry 1 = create with no per-signer values,
    /// entry 2 = sign by token "T1" holding {name: "Alice"}. Both hashes
    /// are recomputed here with nothing but sha2 and the canonical
    /// encoding, then the chain is verified; flipping one character of
    /// entry 2's stored ip must fail verification at entry 2.
    #[test]
    fn concrete_two_entry_scenario() {
        let (directory, log, request) = setup(b"PDF-V1");
        let token = AccessToken::new("T1");
        directory.add_signer_value(&request, &token, SignerValue::new("name", "Alice"));

        log.append(create_event(&request)).unwrap();
        log.append(sign_event(&request, "T1")).unwrap();

        let entries = log.chained_entries(&request);

        // hash1 = SHA256("PDF-V1" ++ serialize(entry1_fields))
        let mut hasher = Sha256::new();
        hasher.update(b"PDF-V1");
        hasher.update(canonical_string(contribution_fields(&entries[0], &[])).as_bytes());
        let hash1 = hex::encode(hasher.finalize());
        assert_eq!(entries[0].log_hash.as_deref(), Some(hash1.as_str()));

        // hash2 = SHA256(hash1 ++ serialize(entry2_fields ∪ {"Alice"}))
        let mut hasher = Sha256::new();
        hasher.update(hash1.as_bytes());
        hasher.update(
            canonical_string(contribution_fields(
                &entries[1],
                &[SignerValue::new("name", "Alice")],
            ))
            .as_bytes(),
        );
        let hash2 = hex::encode(hasher.finalize());
        assert_eq!(entries[1].log_hash.as_deref(), Some(hash2.as_str()));

        // Both links verify through the replay.
        let report = replay(&directory, &request, &entries);
        assert!(report.is_valid());
        assert_eq!(report.checked, 2);

        // Flipping one character of entry 2's stored ip fails at entry 2.
        let mut tampered = entries.clone();
        tampered[1].ip = Some("203.0.113.1".to_string());
        let report = replay(&directory, &request, &tampered);
        assert!(!report.is_valid());
        assert_eq!(report.first_divergence.unwrap().sequence, tampered[1].sequence);
    }
}

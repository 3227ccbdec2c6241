//! Chain replay and divergence reporting.
//!
//! Verification recomputes every chained entry's hash from the
//! *already-verified* predecessor's recomputed hash — never from the stored
//! predecessor value — so patching one entry cannot make an incorrect value
//! silently "verify" the next. The walk stops at the first divergence;
//! everything before it is known good, everything after it is unprovable.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use sigtrail_contracts::{
    AccessToken, AuditLogEntry, EntryId, SignRequestId, SignerValue, TrailError, TrailResult,
};
use sigtrail_core::{
    chain::{compute_link, contribution_fields, ChainSeed},
    AuditTrail, RequestDirectory,
};

// ── Report types ──────────────────────────────────────────────────────────────

/// The first entry at which a chain's stored hash stopped matching its
/// recomputation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Divergence {
    /// Sequence number of the diverging entry.
    pub sequence: u64,
    /// Identity of the diverging entry.
    pub entry_id: EntryId,
    /// The hash the replay expected.
    pub expected: String,
    /// The hash actually stored. `None` for a chained entry that lost its
    /// hash entirely.
    pub stored: Option<String>,
}

/// Outcome of replaying one request's chain.
///
/// Divergence is reported, never auto-corrected, and never raised as an
/// error — verification must not block ordinary reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrityReport {
    /// The request whose chain was replayed.
    pub sign_request_id: SignRequestId,
    /// How many chained entries were recomputed (up to and including the
    /// diverging one).
    pub checked: usize,
    /// The first diverging entry, or `None` when the whole chain matched.
    pub first_divergence: Option<Divergence>,
}

impl IntegrityReport {
    /// True iff every recomputed hash matched its stored value.
    pub fn is_valid(&self) -> bool {
        self.first_divergence.is_none()
    }
}

// ── Pure replay ───────────────────────────────────────────────────────────────

/// Replay a snapshot of chained entries and report the first divergence.
///
/// `entries` must be the request's chained (create/sign) entries in
/// sequence order — unchained entries are skipped if present. `document`
/// is the request's pinned original bytes, required only when the snapshot
/// contains a genesis entry; `values_for` resolves the per-signer values
/// for a token, exactly as the log resolved them at append time.
///
/// An empty chain is valid. Read-only: nothing is ever corrected.
pub fn verify_chain<F>(
    sign_request_id: &SignRequestId,
    entries: &[AuditLogEntry],
    document: Option<&[u8]>,
    values_for: F,
) -> TrailResult<IntegrityReport>
where
    F: Fn(&AccessToken) -> Vec<SignerValue>,
{
    let mut verified_prev: Option<String> = None;
    let mut checked = 0usize;

    for entry in entries.iter().filter(|e| e.action.is_chained()) {
        let values = match &entry.token {
            Some(token) => values_for(token),
            None => Vec::new(),
        };
        let fields = contribution_fields(entry, &values);

        // Seed from the recomputed predecessor, not the stored one.
        let expected = match &verified_prev {
            Some(previous) => compute_link(ChainSeed::Link(previous), fields),
            None => {
                let document = document.ok_or_else(|| TrailError::MissingGenesisDocument {
                    sign_request_id: sign_request_id.to_string(),
                })?;
                compute_link(ChainSeed::Genesis(document), fields)
            }
        };
        checked += 1;

        match entry.log_hash.as_deref() {
            Some(stored) if stored == expected => {
                debug!(
                    sign_request_id = %sign_request_id,
                    sequence = entry.sequence,
                    "chain link verified"
                );
                verified_prev = Some(expected);
            }
            stored => {
                warn!(
                    sign_request_id = %sign_request_id,
                    sequence = entry.sequence,
                    entry_id = %entry.entry_id,
                    expected = %expected,
                    stored = stored.unwrap_or("<missing>"),
                    "audit chain divergence detected"
                );
                return Ok(IntegrityReport {
                    sign_request_id: sign_request_id.clone(),
                    checked,
                    first_divergence: Some(Divergence {
                        sequence: entry.sequence,
                        entry_id: entry.entry_id.clone(),
                        expected,
                        stored: stored.map(str::to_string),
                    }),
                });
            }
        }
    }

    Ok(IntegrityReport {
        sign_request_id: sign_request_id.clone(),
        checked,
        first_divergence: None,
    })
}

// ── Store-backed verifier ─────────────────────────────────────────────────────

/// Replays stored chains against the same `RequestDirectory` the log
/// appended through.
///
/// Read-only and side-effect free: it takes a committed snapshot from the
/// trail and may run concurrently with appends to the same request.
pub struct IntegrityVerifier {
    trail: Arc<dyn AuditTrail>,
    directory: Arc<dyn RequestDirectory>,
}

impl IntegrityVerifier {
    pub fn new(trail: Arc<dyn AuditTrail>, directory: Arc<dyn RequestDirectory>) -> Self {
        Self { trail, directory }
    }

    /// Replay the chain for `request`.
    ///
    /// Returns `Ok(report)` whenever the chain could be replayed — a
    /// divergence lives in the report, not in the error channel. The only
    /// error is a missing genesis document while chained entries exist.
    pub fn check_integrity(&self, request: &SignRequestId) -> TrailResult<IntegrityReport> {
        let entries = self.trail.chained_entries(request);
        let document = self.directory.original_document(request);

        verify_chain(request, &entries, document.as_deref(), |token| {
            self.directory.signer_values(request, token)
        })
    }
}

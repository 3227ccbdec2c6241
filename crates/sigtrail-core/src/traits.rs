//! Collaborator traits at the trust boundary.
//!
//! - `RequestDirectory` — read-only view of the signature-request engine:
//!   where genesis document bytes and per-signer values come from.
//! - `AuditTrail`       — the append-only log: sole writer of `log_hash`.
//!
//! The verifier replays a chain through the same `RequestDirectory` the
//! log appended through, so both sides hash identical material.

use sigtrail_contracts::{
    AccessToken, AuditEvent, AuditLogEntry, EntryId, SignRequestId, SignerValue, TrailError,
    TrailResult,
};

/// Read-only view of the signature-request engine.
///
/// Implementations are trusted. Lookups must be consistent between append
/// time and verify time: the document bytes are pinned at request creation
/// and never change, and `signer_values` returns every value captured for
/// the given (request, token) pair so far.
pub trait RequestDirectory: Send + Sync {
    /// The raw bytes of the request's original document, fixed at request
    /// creation before any signer edits.
    ///
    /// `None` means no document was ever pinned — fatal for that request's
    /// chain. Retrieval may be slow (external storage); it is never retried
    /// by the chain itself.
    fn original_document(&self, request: &SignRequestId) -> Option<Vec<u8>>;

    /// All per-signer field values captured for the signer slot whose
    /// access token is `token`, restricted to `request`.
    ///
    /// Values for other tokens or other requests must never leak into the
    /// result — token scoping is what keeps one signer's values out of
    /// another signer's hash.
    fn signer_values(&self, request: &SignRequestId, token: &AccessToken) -> Vec<SignerValue>;
}

/// The append-only audit log for signature requests.
///
/// Implementations must serialize appends per request (read-latest then
/// write-new as one atomic unit) while letting appends for different
/// requests proceed in parallel. `update` and `delete` are rejected for
/// every implementation — the default bodies are the contract.
pub trait AuditTrail: Send + Sync {
    /// Append one event, assigning `log_date`, `sequence` and (for chained
    /// actions) `log_hash`. Atomic: either a correctly hashed entry is
    /// stored or nothing is.
    fn append(&self, event: AuditEvent) -> TrailResult<AuditLogEntry>;

    /// Committed entries for `request`, in sequence order. A snapshot —
    /// never a live view of the store.
    fn entries(&self, request: &SignRequestId) -> Vec<AuditLogEntry>;

    /// Committed chained entries (create/sign) for `request`, in chain
    /// order.
    fn chained_entries(&self, request: &SignRequestId) -> Vec<AuditLogEntry> {
        self.entries(request)
            .into_iter()
            .filter(|entry| entry.action.is_chained())
            .collect()
    }

    /// Always rejected: stored entries are immutable.
    fn update(&self, entry_id: &EntryId) -> TrailResult<AuditLogEntry> {
        Err(TrailError::ImmutabilityViolation {
            operation: "update".to_string(),
            entry_id: entry_id.to_string(),
        })
    }

    /// Always rejected: stored entries are immutable.
    fn delete(&self, entry_id: &EntryId) -> TrailResult<AuditLogEntry> {
        Err(TrailError::ImmutabilityViolation {
            operation: "delete".to_string(),
            entry_id: entry_id.to_string(),
        })
    }
}

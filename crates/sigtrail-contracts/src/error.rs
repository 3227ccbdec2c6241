//! Error taxonomy for the SIGTRAIL audit chain.
//!
//! All fallible operations in the workspace return `TrailResult<T>`. A
//! chain divergence found at verification time is deliberately *not* an
//! error — it is reported through `IntegrityReport` so that verification
//! never blocks ordinary reads.

use thiserror::Error;

/// The unified error type for the audit chain.
#[derive(Debug, Error)]
pub enum TrailError {
    /// An update or delete was attempted on a stored entry.
    ///
    /// Entries are immutable after creation; the store rejects both
    /// operations explicitly rather than silently ignoring them.
    #[error("audit entries are immutable: {operation} of entry {entry_id} rejected")]
    ImmutabilityViolation { operation: String, entry_id: String },

    /// The genesis link could not be computed because the request has no
    /// original document bytes.
    ///
    /// Fatal for that chain — a request must always have a fixed document
    /// pinned at creation. Nothing is stored when this occurs.
    #[error("no original document pinned for request {sign_request_id}; cannot seed its chain")]
    MissingGenesisDocument { sign_request_id: String },

    /// The submitted event failed append-time validation.
    #[error("malformed audit event: {reason}")]
    MalformedEvent { reason: String },

    /// The store could not persist an entry.
    ///
    /// Treated as fatal by producers — a sign action is not complete until
    /// its entry is durably appended.
    #[error("audit append failed: {reason}")]
    AppendFailed { reason: String },

    /// A second document registration was attempted for a request.
    ///
    /// Genesis bytes are pinned exactly once, at request creation.
    #[error("original document already pinned for request {sign_request_id}")]
    DocumentAlreadyPinned { sign_request_id: String },
}

/// Convenience alias used throughout the SIGTRAIL crates.
pub type TrailResult<T> = Result<T, TrailError>;

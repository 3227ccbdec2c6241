//! Audit events and the stored entry type.
//!
//! `AuditEvent` is what event producers submit when something happens to a
//! request. `AuditLogEntry` is what the audit log stores — one per event,
//! immutable, with the hash-chain link for chained actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::request::{AccessToken, Geolocation, RequestItemId, RequestState, SignRequestId};

/// Unique identifier of one stored audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub uuid::Uuid);

impl EntryId {
    /// Create a new, unique entry ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// What happened to the request.
///
/// Only `Create` and `Sign` participate in the hash chain; `Open` (a signer
/// viewing the document) is logged with a sequence number but carries no
/// chain link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// The request was created. Always the genesis entry of its chain.
    Create,
    /// A signer viewed the document. Logged but unchained.
    Open,
    /// A signer completed their signature.
    Sign,
}

impl AuditAction {
    /// Whether entries for this action carry a `log_hash`.
    pub fn is_chained(&self) -> bool {
        matches!(self, AuditAction::Create | AuditAction::Sign)
    }

    /// Stable string form used in the canonical hash contribution.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Open => "open",
            AuditAction::Sign => "sign",
        }
    }
}

/// An event raised by the signature-request engine, submitted to
/// `AuditTrail::append`.
///
/// The log assigns `log_date`, `sequence` and `log_hash` itself — producers
/// never supply them. Validation at append time requires `ip` for chained
/// actions, and both `token` and `sign_request_item_id` for `Sign`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// The request this event belongs to.
    pub sign_request_id: SignRequestId,
    /// The signer slot, for signer-specific actions.
    pub sign_request_item_id: Option<RequestItemId>,
    /// What happened.
    pub action: AuditAction,
    /// User or partner id of the actor. `None` for anonymous signers.
    pub actor: Option<String>,
    /// Client-reported position, best-effort and unauthenticated.
    pub geolocation: Option<Geolocation>,
    /// Client IP address. Required for create/sign.
    pub ip: Option<String>,
    /// Lifecycle state of the request at the time of the event.
    pub request_state: RequestState,
    /// The per-signer access token in effect for this action.
    pub token: Option<AccessToken>,
}

/// One immutable record in a request's audit trail.
///
/// Modifying any hashed field after the fact invalidates `log_hash` and
/// every subsequent link, which the integrity verifier detects. Entries are
/// never updated or deleted — the store rejects both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Unique id of this entry.
    pub entry_id: EntryId,

    /// Explicit per-request position, assigned atomically at append time.
    ///
    /// Strictly increasing with no gaps across *all* entries of a request,
    /// open events included — a removed entry leaves a visible numbering
    /// hole even when it carried no chain link.
    pub sequence: u64,

    /// Server-assigned creation timestamp. Never client-supplied.
    pub log_date: DateTime<Utc>,

    /// The request this entry belongs to.
    pub sign_request_id: SignRequestId,

    /// The signer slot, for signer-specific actions.
    pub sign_request_item_id: Option<RequestItemId>,

    /// What happened.
    pub action: AuditAction,

    /// User or partner id of the actor, if known.
    pub actor: Option<String>,

    /// Client-reported position at log time.
    pub geolocation: Option<Geolocation>,

    /// Client IP address. Present for all chained entries.
    pub ip: Option<String>,

    /// Request lifecycle state snapshotted at log time.
    pub request_state: RequestState,

    /// The per-signer access token in effect for this action.
    pub token: Option<AccessToken>,

    /// The chain link: lowercase hex SHA-256 binding this entry to its
    /// predecessor (or to the original document bytes for the genesis
    /// entry). `Some` iff `action.is_chained()`. Computed once, never
    /// modified.
    pub log_hash: Option<String>,
}

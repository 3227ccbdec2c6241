//! Identifiers and value types shared with the signature-request engine.
//!
//! The request engine itself (roles, templates, rendering, mail delivery) is
//! an external collaborator — these types are the slice of its model the
//! audit chain needs to see.

use serde::{Deserialize, Serialize};

/// Unique identifier of a signature request.
///
/// Every audit entry belongs to exactly one request, and every hash chain
/// is scoped to one request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignRequestId(pub uuid::Uuid);

impl SignRequestId {
    /// Create a new, unique request ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SignRequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SignRequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier of one signer's slot on a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestItemId(pub uuid::Uuid);

impl RequestItemId {
    /// Create a new, unique item ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for RequestItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque per-signer access token.
///
/// Issued by the request engine when a signer slot is created; every
/// signer-specific audit entry carries the token in effect for that action,
/// and per-signer field values are scoped to exactly one (request, token)
/// pair through it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessToken(pub String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Lifecycle state of a signature request, snapshotted into each entry at
/// log time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    /// Shared by link, not yet sent to named signers.
    Shared,
    /// Sent to signers, awaiting signatures.
    Sent,
    /// All signers have signed.
    Signed,
    /// Canceled before completion.
    Canceled,
}

impl RequestState {
    /// Stable string form used in the canonical hash contribution.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestState::Shared => "shared",
            RequestState::Sent => "sent",
            RequestState::Signed => "signed",
            RequestState::Canceled => "canceled",
        }
    }
}

/// Best-effort, unauthenticated position reported by the signer's client.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geolocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// One field value captured while signing, scoped to a single signer slot.
///
/// An explicit (field_id, value) pair: callers stringify dates, numbers and
/// ids before handing values over, so the hash contribution is total and
/// needs no runtime introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerValue {
    /// Identifier of the field on the signing form.
    pub field_id: String,
    /// The captured value, already stringified by the caller.
    pub value: String,
}

impl SignerValue {
    pub fn new(field_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            value: value.into(),
        }
    }
}

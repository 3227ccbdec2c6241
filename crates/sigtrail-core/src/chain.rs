//! Chain-link computation: hashing one entry against its seed.
//!
//! Every field that contributes to an entry's hash is listed explicitly so
//! nothing is accidentally omitted.
//!
//! Hash input layout (bytes, in order):
//!   1. the seed — raw original document bytes for the genesis entry,
//!      otherwise the previous link as 64 ASCII hex chars
//!   2. the canonical encoding (see `canon`) of the entry's contribution:
//!      `log_date` (RFC 3339, microseconds, UTC `Z`), `action`, `state`,
//!      then `actor`, `ip`, `latitude`/`longitude` when present, then one
//!      `item_value:<field_id>` pair per signer value scoped to the
//!      entry's token
//!
//! Absent optional fields are omitted entirely, never encoded as empty
//! strings. The `item_value:` prefix keeps signer-supplied field ids from
//! colliding with the fixed field names.

use chrono::SecondsFormat;
use sha2::{Digest, Sha256};

use sigtrail_contracts::{AuditLogEntry, SignerValue};

use crate::canon::canonical_string;

/// The seed material an entry's hash is computed against.
#[derive(Debug, Clone, Copy)]
pub enum ChainSeed<'a> {
    /// No prior chained entry exists: seed with the raw bytes of the
    /// request's original document, pinned at request creation.
    Genesis(&'a [u8]),
    /// Seed with the most recent chained entry's `log_hash`.
    Link(&'a str),
}

/// Assemble the (key, value) pairs an entry contributes to its own hash.
///
/// `signer_values` must already be scoped to the entry's request and token;
/// the audit log and the verifier both obtain them from the
/// `RequestDirectory` so append and replay hash identical material.
pub fn contribution_fields(
    entry: &AuditLogEntry,
    signer_values: &[SignerValue],
) -> Vec<(String, String)> {
    let mut fields = vec![
        (
            "log_date".to_string(),
            entry.log_date.to_rfc3339_opts(SecondsFormat::Micros, true),
        ),
        ("action".to_string(), entry.action.as_str().to_string()),
        ("state".to_string(), entry.request_state.as_str().to_string()),
    ];

    if let Some(actor) = &entry.actor {
        fields.push(("actor".to_string(), actor.clone()));
    }
    if let Some(ip) = &entry.ip {
        fields.push(("ip".to_string(), ip.clone()));
    }
    if let Some(geo) = &entry.geolocation {
        // f64 Display renders the shortest round-trip decimal, which is
        // stable across platforms.
        fields.push(("latitude".to_string(), geo.latitude.to_string()));
        fields.push(("longitude".to_string(), geo.longitude.to_string()));
    }

    for value in signer_values {
        fields.push((format!("item_value:{}", value.field_id), value.value.clone()));
    }

    fields
}

/// Compute the chain link for one entry.
///
/// Returns `hex(SHA256(seed ++ canonical_string(fields)))` — lowercase,
/// 64 hex chars. Deterministic: identical seed and fields always produce
/// the same link; any single-bit change to either changes it.
pub fn compute_link(seed: ChainSeed<'_>, fields: Vec<(String, String)>) -> String {
    let contribution = canonical_string(fields);

    let mut hasher = Sha256::new();
    match seed {
        ChainSeed::Genesis(document) => hasher.update(document),
        ChainSeed::Link(previous) => hasher.update(previous.as_bytes()),
    }
    hasher.update(contribution.as_bytes());

    hex::encode(hasher.finalize())
}

//! In-memory implementation of `AuditTrail`.
//!
//! `InMemoryAuditLog` keeps one chain per signature request, each behind
//! its own `Mutex`: appends to the same request serialize (read the latest
//! link, compute, write — one atomic unit) while appends to different
//! requests proceed fully in parallel. The outer `RwLock` only guards the
//! map from request id to chain handle.
//!
//! Reads return cloned snapshots taken under the per-request lock, so a
//! verifier can never observe a half-finished append.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::Utc;
use tracing::info;

use sigtrail_contracts::{
    AuditAction, AuditEvent, AuditLogEntry, EntryId, SignRequestId, TrailError, TrailResult,
};
use sigtrail_core::{
    chain::{compute_link, contribution_fields, ChainSeed},
    AuditTrail, RequestDirectory,
};

// ── Per-request chain state ───────────────────────────────────────────────────

/// The mutable state of one request's trail.
struct RequestChain {
    /// All entries for the request, in append order.
    entries: Vec<AuditLogEntry>,

    /// The next sequence number to assign (starts at 0, open events
    /// included).
    next_sequence: u64,

    /// The `log_hash` of the most recent chained entry, or `None` before
    /// the genesis entry exists.
    last_hash: Option<String>,
}

impl RequestChain {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_sequence: 0,
            last_hash: None,
        }
    }
}

// ── Public store ──────────────────────────────────────────────────────────────

/// An in-memory, append-only audit log backed by per-request SHA-256 hash
/// chains.
///
/// The sole writer of `log_hash`: producers submit events, the log assigns
/// `log_date` and `sequence`, computes the link for chained actions and
/// stores the entry. Updates and deletes are rejected via the `AuditTrail`
/// defaults.
pub struct InMemoryAuditLog {
    directory: Arc<dyn RequestDirectory>,
    chains: RwLock<HashMap<SignRequestId, Arc<Mutex<RequestChain>>>>,
}

impl InMemoryAuditLog {
    /// Create a log reading genesis documents and signer values from
    /// `directory`.
    pub fn new(directory: Arc<dyn RequestDirectory>) -> Self {
        Self {
            directory,
            chains: RwLock::new(HashMap::new()),
        }
    }

    /// The chain handle for `request`, created on first use.
    ///
    /// Takes the outer map lock only long enough to fetch or insert the
    /// handle; the append itself runs under the per-request mutex.
    fn chain_handle(&self, request: &SignRequestId) -> Arc<Mutex<RequestChain>> {
        if let Some(chain) = self
            .chains
            .read()
            .expect("chain map lock poisoned")
            .get(request)
        {
            return Arc::clone(chain);
        }

        let mut chains = self.chains.write().expect("chain map lock poisoned");
        Arc::clone(
            chains
                .entry(request.clone())
                .or_insert_with(|| Arc::new(Mutex::new(RequestChain::new()))),
        )
    }

    /// Append-time validation. Rejections here store nothing.
    fn validate(event: &AuditEvent) -> TrailResult<()> {
        if event.action.is_chained() && event.ip.is_none() {
            return Err(TrailError::MalformedEvent {
                reason: format!("ip is required for {} events", event.action.as_str()),
            });
        }
        if event.action == AuditAction::Sign {
            if event.token.is_none() {
                return Err(TrailError::MalformedEvent {
                    reason: "sign events must carry the signer's access token".to_string(),
                });
            }
            if event.sign_request_item_id.is_none() {
                return Err(TrailError::MalformedEvent {
                    reason: "sign events must reference a request item".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl AuditTrail for InMemoryAuditLog {
    /// Append one event to its request's chain.
    ///
    /// Assigns `log_date` (server clock) and the next `sequence` under the
    /// per-request lock, computes the link for chained actions — genesis
    /// seed from the directory's pinned document, otherwise the last
    /// chained hash — then stores the entry and returns a clone.
    ///
    /// Every failure path runs before the entry vector is touched: either
    /// a correctly hashed entry is stored or nothing is.
    fn append(&self, event: AuditEvent) -> TrailResult<AuditLogEntry> {
        Self::validate(&event)?;

        let chain = self.chain_handle(&event.sign_request_id);
        let mut chain = chain.lock().map_err(|e| TrailError::AppendFailed {
            reason: format!("chain lock poisoned: {}", e),
        })?;

        let mut entry = AuditLogEntry {
            entry_id: EntryId::new(),
            sequence: chain.next_sequence,
            log_date: Utc::now(),
            sign_request_id: event.sign_request_id,
            sign_request_item_id: event.sign_request_item_id,
            action: event.action,
            actor: event.actor,
            geolocation: event.geolocation,
            ip: event.ip,
            request_state: event.request_state,
            token: event.token,
            log_hash: None,
        };

        if entry.action.is_chained() {
            let values = match &entry.token {
                Some(token) => self.directory.signer_values(&entry.sign_request_id, token),
                None => Vec::new(),
            };
            let fields = contribution_fields(&entry, &values);

            let hash = match &chain.last_hash {
                Some(previous) => compute_link(ChainSeed::Link(previous), fields),
                None => {
                    let document = self
                        .directory
                        .original_document(&entry.sign_request_id)
                        .ok_or_else(|| TrailError::MissingGenesisDocument {
                            sign_request_id: entry.sign_request_id.to_string(),
                        })?;
                    compute_link(ChainSeed::Genesis(&document), fields)
                }
            };
            entry.log_hash = Some(hash);
        }

        info!(
            sign_request_id = %entry.sign_request_id,
            sequence = entry.sequence,
            action = entry.action.as_str(),
            chained = entry.action.is_chained(),
            "audit entry appended"
        );

        chain.entries.push(entry.clone());
        chain.next_sequence += 1;
        if let Some(hash) = &entry.log_hash {
            chain.last_hash = Some(hash.clone());
        }

        Ok(entry)
    }

    /// A committed snapshot of all entries for `request`, in sequence
    /// order. Unknown requests yield an empty vector.
    fn entries(&self, request: &SignRequestId) -> Vec<AuditLogEntry> {
        let chain = {
            let chains = self.chains.read().expect("chain map lock poisoned");
            match chains.get(request) {
                Some(chain) => Arc::clone(chain),
                None => return Vec::new(),
            }
        };

        let chain = chain.lock().expect("chain lock poisoned");
        chain.entries.clone()
    }
}

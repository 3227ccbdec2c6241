//! In-memory implementation of `RequestDirectory`.
//!
//! The reference directory used by tests and the demo. Documents are pinned
//! exactly once, at request creation; per-signer values accumulate under
//! their (request, token) pair as the signer fills the form.

use std::collections::HashMap;
use std::sync::RwLock;

use sigtrail_contracts::{
    AccessToken, SignRequestId, SignerValue, TrailError, TrailResult,
};
use sigtrail_core::RequestDirectory;

struct DirectoryState {
    /// Original document bytes per request, fixed at registration.
    documents: HashMap<SignRequestId, Vec<u8>>,

    /// Captured field values, keyed by (request, token), in capture order.
    values: HashMap<(SignRequestId, AccessToken), Vec<SignerValue>>,
}

/// An in-memory `RequestDirectory`.
///
/// Thread safe: reads and writes go through an internal `RwLock`. Lookups
/// return clones, never references into the store.
pub struct InMemoryDirectory {
    state: RwLock<DirectoryState>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(DirectoryState {
                documents: HashMap::new(),
                values: HashMap::new(),
            }),
        }
    }

    /// Pin the original document bytes for `request`.
    ///
    /// Allowed exactly once per request — the genesis seed must never be
    /// ambiguous. A second registration returns `DocumentAlreadyPinned`.
    pub fn register_document(
        &self,
        request: &SignRequestId,
        bytes: impl Into<Vec<u8>>,
    ) -> TrailResult<()> {
        let mut state = self.state.write().expect("directory lock poisoned");
        if state.documents.contains_key(request) {
            return Err(TrailError::DocumentAlreadyPinned {
                sign_request_id: request.to_string(),
            });
        }
        state.documents.insert(request.clone(), bytes.into());
        Ok(())
    }

    /// Record one captured field value for the signer slot identified by
    /// `token` on `request`.
    pub fn add_signer_value(
        &self,
        request: &SignRequestId,
        token: &AccessToken,
        value: SignerValue,
    ) {
        let mut state = self.state.write().expect("directory lock poisoned");
        state
            .values
            .entry((request.clone(), token.clone()))
            .or_default()
            .push(value);
    }
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestDirectory for InMemoryDirectory {
    fn original_document(&self, request: &SignRequestId) -> Option<Vec<u8>> {
        let state = self.state.read().expect("directory lock poisoned");
        state.documents.get(request).cloned()
    }

    fn signer_values(&self, request: &SignRequestId, token: &AccessToken) -> Vec<SignerValue> {
        let state = self.state.read().expect("directory lock poisoned");
        state
            .values
            .get(&(request.clone(), token.clone()))
            .cloned()
            .unwrap_or_default()
    }
}

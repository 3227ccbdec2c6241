//! # sigtrail-core
//!
//! The trusted primitives of the SIGTRAIL audit chain:
//!
//! - `canon`  — deterministic, order-independent, ASCII-safe encoding of a
//!   field map, the string form every hash commits to
//! - `chain`  — `compute_link`: SHA-256 over (seed ++ contribution), where
//!   the seed is the previous link or, for the genesis entry, the raw
//!   original document bytes
//! - `traits` — the collaborator seams: `RequestDirectory` (the
//!   signature-request engine's read side) and `AuditTrail` (the
//!   append-only log)
//!
//! Nothing here stores anything; the store lives in `sigtrail-audit` and
//! the replay logic in `sigtrail-verify`, both built on these primitives.

pub mod canon;
pub mod chain;
pub mod traits;

pub use canon::canonical_string;
pub use chain::{compute_link, contribution_fields, ChainSeed};
pub use traits::{AuditTrail, RequestDirectory};

// ── Tests ─────────────────────────────────────────────────────────────────────

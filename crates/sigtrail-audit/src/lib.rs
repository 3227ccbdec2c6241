//! # sigtrail-audit
//!
//! Immutable, append-only, SHA-256 hash-chained audit log for
//! electronic-signature requests.
//!
//! ## Overview
//!
//! Every action taken against a signature request (creation, viewing,
//! signing) is appended as an `AuditLogEntry`. Create and sign entries link
//! to their predecessor via a SHA-256 chain seeded, for the genesis entry,
//! with the request's original document bytes. Tampering with any chained
//! entry — even a single byte — breaks every subsequent link and is
//! detected by `sigtrail-verify`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sigtrail_audit::{InMemoryAuditLog, InMemoryDirectory};
//! use sigtrail_core::AuditTrail;
//!
//! let directory = Arc::new(InMemoryDirectory::new());
//! directory.register_document(&request_id, b"%PDF-1.7 ...".to_vec())?;
//!
//! let log = InMemoryAuditLog::new(directory.clone());
//! let entry = log.append(create_event)?;
//! assert!(entry.log_hash.is_some());
//! ```

pub mod directory;
pub mod memory;

pub use directory::InMemoryDirectory;
pub use memory::InMemoryAuditLog;

// ── Tests ─────────────────────────────────────────────────────────────────────

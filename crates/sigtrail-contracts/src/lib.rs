//! # sigtrail-contracts
//!
//! Shared types and the error taxonomy for the SIGTRAIL audit chain.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions and error types.

pub mod entry;
pub mod error;
pub mod request;

pub use entry::{AuditAction, AuditEvent, AuditLogEntry, EntryId};
pub use error::{TrailError, TrailResult};
pub use request::{
    AccessToken, Geolocation, RequestItemId, RequestState, SignRequestId, SignerValue,
};

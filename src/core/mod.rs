//! Core ledger logic.
//!
//! This module contains:
//! - Ledger: Append-only in-memory evidence store
//! - Codec: JSONL serialize/deserialize with a parse policy
//! - Verifier: Digest matching against local and external ledgers

pub mod codec;
pub mod error;
pub mod ledger;
pub mod verifier;

// Re-export commonly used types
pub use codec::{
    decode_lossy, deserialize, deserialize_bytes, deserialize_with, serialize, ExternalRecord, LineError,
    ParseMode, Parsed,
};
pub use error::LedgerError;
pub use ledger::Ledger;
pub use verifier::{verify, Match, Verification, Verifier};

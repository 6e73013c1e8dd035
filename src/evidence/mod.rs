//! Evidence creation: digests and record building
//!
//! This module turns document bytes into auditable evidence records.
//!
//! # Design Principles
//!
//! - **Bytes only**: digests depend on the exact input bytes, never on the
//!   filename or notes.
//! - **Immutable output**: a built record is never edited; re-registering a
//!   document produces a new record.
//! - **Total**: building evidence cannot fail, for any input including empty.
//!
//! # Example
//!
//! ```
//! use trust_ledger::evidence::{build_evidence, digest256};
//!
//! let record = build_evidence(b"contract", "contract.txt", "signed copy");
//! assert_eq!(record.sha256(), digest256(b"contract"));
//! assert_eq!(record.size_bytes(), 8);
//! ```

pub mod builder;
pub mod digest;

pub use builder::{build_evidence, build_evidence_at};
pub use digest::{digest256, digest512, DigestAlgorithm};

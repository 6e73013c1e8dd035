//! trust-ledger - Evidence ledger for teaching digital trust
//!
//! Contrasts what a legal trusted third party (notary, registry, audit)
//! guarantees with what cryptography alone can prove: that a document
//! existed in an exact form at a point in time.
//!
//! # Architecture
//!
//! The core is a small evidence ledger:
//! - Documents are fingerprinted with SHA-256 and SHA-512
//! - Each fingerprint plus metadata becomes an immutable evidence record
//! - Records are appended to a session-owned ledger, exportable as JSONL
//! - A document is verified by recomputing its digest and searching the
//!   ledger (and optionally an imported ledger) for a matching record
//!
//! # Modules
//!
//! - `evidence`: Digest engine and evidence builder
//! - `domain`: Data structures (EvidenceRecord)
//! - `core`: Ledger store, JSONL codec, verifier
//! - `config`: Configuration loading
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Register a document
//! trust-ledger evidence contract.pdf --notes "v1.3 signed"
//!
//! # Verify it later, optionally against an exported ledger
//! trust-ledger verify contract.pdf --external ledger_ud1.jsonl
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod evidence;

// Re-export main types at crate root for convenience
pub use crate::core::{verify, Ledger, LedgerError, Match, ParseMode, Verification, Verifier};
pub use domain::{DigestBearing, EvidenceRecord};
pub use evidence::{build_evidence, digest256, digest512};

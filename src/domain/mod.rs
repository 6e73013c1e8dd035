//! Domain types for the evidence ledger.
//!
//! This module contains:
//! - EvidenceRecord: immutable digest + metadata bundle
//! - DigestBearing: the read interface the verifier matches on

pub mod record;

pub use record::{DigestBearing, EvidenceRecord, EVIDENCE_SCHEMA};

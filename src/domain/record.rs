//! Evidence record: the unit stored in the ledger.
//!
//! A record asserts "this document existed, in this exact form, at this
//! time". Records are immutable once built; fields are only readable through
//! accessors.

use serde::{Deserialize, Serialize};

use crate::core::LedgerError;

/// Schema identifier written into every record
pub const EVIDENCE_SCHEMA: &str = "edu.unie.ud1.evidence.v1";

/// Anything that may carry a `sha256` digest field.
///
/// The verifier only needs this one field, so ledgers loaded from untrusted
/// text don't have to pass full schema validation to take part in matching.
pub trait DigestBearing {
    /// The recorded SHA-256 hex digest, if present
    fn sha256(&self) -> Option<&str>;
}

/// A proof-of-existence/integrity claim for one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    schema: String,
    filename: String,
    size_bytes: u64,
    sha256: String,
    sha512: String,
    computed_at_utc: String,
    notes: String,
}

impl EvidenceRecord {
    /// Assemble a record from already computed parts.
    ///
    /// Only the builder calls this; it guarantees the digests and size were
    /// derived from the same bytes.
    pub(crate) fn from_parts(
        filename: String,
        size_bytes: u64,
        sha256: String,
        sha512: String,
        computed_at_utc: String,
        notes: String,
    ) -> Self {
        Self {
            schema: EVIDENCE_SCHEMA.to_string(),
            filename,
            size_bytes,
            sha256,
            sha512,
            computed_at_utc,
            notes,
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Original name supplied by the uploader (not validated)
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Byte length of the hashed document
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Lowercase SHA-256 hex digest
    pub fn sha256(&self) -> &str {
        &self.sha256
    }

    /// Lowercase SHA-512 hex digest
    pub fn sha512(&self) -> &str {
        &self.sha512
    }

    /// RFC 3339 UTC timestamp of record creation
    pub fn computed_at_utc(&self) -> &str {
        &self.computed_at_utc
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Render as a standalone pretty-printed JSON document (2-space indent)
    pub fn to_pretty_json(&self) -> Result<String, LedgerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// File name for a single-evidence export: `evidence_<filename>.json`
    pub fn export_file_name(&self) -> String {
        format!("evidence_{}.json", self.filename)
    }
}

impl DigestBearing for EvidenceRecord {
    fn sha256(&self) -> Option<&str> {
        Some(&self.sha256)
    }
}

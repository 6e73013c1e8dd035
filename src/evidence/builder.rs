//! Evidence builder
//!
//! Turns a document's bytes plus uploader-supplied annotations into an
//! immutable [`EvidenceRecord`]. Filename and notes are opaque text: they
//! are stored as given and never parsed back.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

use super::digest::{digest256, digest512};
use crate::domain::EvidenceRecord;

/// Build evidence for `bytes`, timestamped with the current UTC time
pub fn build_evidence(bytes: &[u8], filename: &str, notes: &str) -> EvidenceRecord {
    build_evidence_at(bytes, filename, notes, Utc::now())
}

/// Build evidence for `bytes` with an explicit timestamp
pub fn build_evidence_at(
    bytes: &[u8],
    filename: &str,
    notes: &str,
    at: DateTime<Utc>,
) -> EvidenceRecord {
    let record = EvidenceRecord::from_parts(
        filename.to_string(),
        bytes.len() as u64,
        digest256(bytes),
        digest512(bytes),
        format_timestamp(at),
        notes.to_string(),
    );

    debug!(
        filename = %record.filename(),
        size_bytes = record.size_bytes(),
        sha256 = %record.sha256(),
        "Built evidence record"
    );

    record
}

/// ISO-8601 with microseconds and an explicit `+00:00` offset
fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::domain::EVIDENCE_SCHEMA;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 4, 9, 15, 0).unwrap()
    }

    #[test]
    fn test_populates_every_field() {
        let bytes = b"Contrato de licencia de software";
        let record = build_evidence_at(bytes, "contrato.txt", "v1.3", fixed_time());

        assert_eq!(record.schema(), EVIDENCE_SCHEMA);
        assert_eq!(record.filename(), "contrato.txt");
        assert_eq!(record.size_bytes(), bytes.len() as u64);
        assert_eq!(record.sha256(), digest256(bytes));
        assert_eq!(record.sha512(), digest512(bytes));
        assert_eq!(record.computed_at_utc(), "2025-03-04T09:15:00.000000+00:00");
        assert_eq!(record.notes(), "v1.3");
    }

    #[test]
    fn test_empty_document() {
        let record = build_evidence(b"", "empty.bin", "");
        assert_eq!(record.size_bytes(), 0);
        assert_eq!(record.sha256(), digest256(b""));
        assert_eq!(record.notes(), "");
    }

    #[test]
    fn test_digests_ignore_annotations() {
        let a = build_evidence(b"same bytes", "a.pdf", "first");
        let b = build_evidence(b"same bytes", "b.docx", "second");
        assert_eq!(a.sha256(), b.sha256());
        assert_eq!(a.sha512(), b.sha512());
    }

    #[test]
    fn test_timestamp_is_utc_and_parseable() {
        let record = build_evidence(b"x", "x.txt", "");
        let ts = record.computed_at_utc();
        assert!(ts.ends_with("+00:00"));
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());
    }
}

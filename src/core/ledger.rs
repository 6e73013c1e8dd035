//! Append-only, in-memory evidence ledger.
//!
//! A ledger is owned by one session and passed by reference to whatever
//! needs it. Records are only ever appended; there is no removal or in-place
//! edit. Export/import goes through the JSONL codec.

use tracing::debug;

use super::codec::{self, ParseMode, Parsed};
use super::error::LedgerError;
use crate::domain::EvidenceRecord;

/// Ordered, append-only sequence of evidence records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    records: Vec<EvidenceRecord>,
}

impl Ledger {
    /// Default file name for a ledger export
    pub const EXPORT_FILE_NAME: &'static str = "ledger_ud1.jsonl";

    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to the end of the ledger.
    ///
    /// Duplicate digests are allowed: registering the same document twice
    /// yields two records.
    pub fn append(&mut self, record: EvidenceRecord) {
        debug!(
            sha256 = %record.sha256(),
            position = self.records.len(),
            "Appending evidence to ledger"
        );
        self.records.push(record);
    }

    /// All records in insertion order
    pub fn records(&self) -> &[EvidenceRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EvidenceRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recently appended record
    pub fn last(&self) -> Option<&EvidenceRecord> {
        self.records.last()
    }

    /// Export as JSONL
    pub fn to_jsonl(&self) -> Result<String, LedgerError> {
        codec::serialize(&self.records)
    }

    /// Reconstruct a fresh ledger from JSONL text.
    ///
    /// Only lines with the complete record shape are kept; in strict mode
    /// any unparseable line fails the whole import.
    pub fn from_jsonl(text: &str, mode: ParseMode) -> Result<Self, LedgerError> {
        let mut ledger = Self::new();
        ledger.extend_from_jsonl(text, mode)?;
        Ok(ledger)
    }

    /// Append every complete record found in `text`, in order.
    ///
    /// Returns the number of records appended.
    pub fn extend_from_jsonl(&mut self, text: &str, mode: ParseMode) -> Result<usize, LedgerError> {
        let parsed: Parsed = codec::deserialize_with(text, mode);
        let before = self.records.len();

        for external in parsed.with_mode(mode)? {
            match external.to_evidence() {
                Some(record) => self.append(record),
                None => debug!("Skipping ledger line without full record shape"),
            }
        }

        Ok(self.records.len() - before)
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a EvidenceRecord;
    type IntoIter = std::slice::Iter<'a, EvidenceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::build_evidence;

    #[test]
    fn test_new_ledger_is_empty() {
        let ledger = Ledger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.len(), 0);
        assert!(ledger.last().is_none());
    }

    #[test]
    fn test_append_preserves_order_and_duplicates() {
        let mut ledger = Ledger::new();
        let first = build_evidence(b"doc", "v1.txt", "first");
        let other = build_evidence(b"other", "o.txt", "");
        let again = build_evidence(b"doc", "v1.txt", "again");

        ledger.append(first.clone());
        ledger.append(other.clone());
        ledger.append(again.clone());

        assert_eq!(ledger.records(), &[first, other, again.clone()]);
        assert_eq!(ledger.last(), Some(&again));
    }

    #[test]
    fn test_jsonl_round_trip() {
        let mut ledger = Ledger::new();
        ledger.append(build_evidence(b"a", "a.txt", "uno"));
        ledger.append(build_evidence(b"b", "b.txt", "dos · ñ"));

        let text = ledger.to_jsonl().unwrap();
        let restored = Ledger::from_jsonl(&text, ParseMode::Strict).unwrap();
        assert_eq!(restored, ledger);
    }

    #[test]
    fn test_from_jsonl_skips_partial_records() {
        let record = build_evidence(b"a", "a.txt", "");
        let mut text = codec::serialize([&record]).unwrap();
        text.push_str("{\"sha256\": \"only a digest\"}\n");
        text.push_str("garbage\n");

        let ledger = Ledger::from_jsonl(&text, ParseMode::Permissive).unwrap();
        assert_eq!(ledger.records(), &[record]);
    }

    #[test]
    fn test_from_jsonl_strict_rejects_garbage() {
        let result = Ledger::from_jsonl("garbage\n", ParseMode::Strict);
        assert!(matches!(
            result,
            Err(LedgerError::MalformedLines { count: 1, first_line: 1 })
        ));
    }

    #[test]
    fn test_extend_appends_after_existing() {
        let mut session = Ledger::new();
        let local = build_evidence(b"local", "l.txt", "");
        session.append(local.clone());

        let imported = build_evidence(b"imported", "i.txt", "");
        let text = codec::serialize([&imported]).unwrap();

        let added = session.extend_from_jsonl(&text, ParseMode::Permissive).unwrap();
        assert_eq!(added, 1);
        assert_eq!(session.records(), &[local, imported]);
    }
}

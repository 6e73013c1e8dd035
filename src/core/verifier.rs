//! Document verification against ledgers.
//!
//! Verification recomputes the candidate's SHA-256 and looks for records
//! with an identical `sha256` field, first in the local ledger and then in
//! any externally supplied ledger text.
//!
//! An empty result is a normal outcome. It means the document was either
//! never registered or has changed since registration; the two cases are
//! not distinguished because no record of registration intent exists.

use serde_json::Value;
use tracing::info;

use super::codec::{self, ExternalRecord, LineError, ParseMode};
use super::error::LedgerError;
use super::ledger::Ledger;
use crate::domain::{DigestBearing, EvidenceRecord};
use crate::evidence::digest256;

/// A record that matched the candidate document
#[derive(Debug, Clone, PartialEq)]
pub enum Match {
    /// From the session's own ledger
    Local(EvidenceRecord),
    /// From the session's ledger as read back from its exported text
    Imported(ExternalRecord),
    /// From externally supplied ledger text
    External(ExternalRecord),
}

impl Match {
    pub fn origin(&self) -> &'static str {
        match self {
            Match::Local(_) | Match::Imported(_) => "local",
            Match::External(_) => "external",
        }
    }

    /// The matched record as a JSON value (for display)
    pub fn to_json(&self) -> Result<Value, LedgerError> {
        match self {
            Match::Local(record) => Ok(serde_json::to_value(record)?),
            Match::Imported(record) | Match::External(record) => Ok(record.to_json()),
        }
    }
}

impl DigestBearing for Match {
    fn sha256(&self) -> Option<&str> {
        match self {
            Match::Local(record) => DigestBearing::sha256(record),
            Match::Imported(record) | Match::External(record) => record.sha256(),
        }
    }
}

/// Outcome of verifying one document
#[derive(Debug, Clone)]
pub struct Verification {
    /// SHA-256 of the candidate bytes
    pub digest: String,
    /// Matching records, local first, in ledger order
    pub matches: Vec<Match>,
    /// Lines of the local ledger text that were dropped
    pub dropped_local_lines: Vec<LineError>,
    /// Lines of the external ledger that were dropped
    pub dropped_lines: Vec<LineError>,
}

impl Verification {
    pub fn is_verified(&self) -> bool {
        !self.matches.is_empty()
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn first(&self) -> Option<&Match> {
        self.matches.first()
    }
}

/// Verifier with a configurable policy for ledger text
#[derive(Debug, Clone, Copy, Default)]
pub struct Verifier {
    mode: ParseMode,
}

impl Verifier {
    pub fn new(mode: ParseMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    /// Verify `candidate` against `local` and, optionally, external JSONL text.
    ///
    /// Permissive mode never fails. Strict mode fails if the external text
    /// contains any malformed line.
    pub fn verify(
        &self,
        candidate: &[u8],
        local: &Ledger,
        external: Option<&str>,
    ) -> Result<Verification, LedgerError> {
        let digest = digest256(candidate);

        let local_matches: Vec<Match> = local
            .iter()
            .filter(|record| record.sha256() == digest)
            .cloned()
            .map(Match::Local)
            .collect();

        self.finish(digest, local_matches, Vec::new(), external)
    }

    /// Verify `candidate` against a local ledger given as exported JSONL text.
    ///
    /// The local text is read as leniently as external text: any line with
    /// a `sha256` field takes part in matching, full record shape or not.
    pub fn verify_imported(
        &self,
        candidate: &[u8],
        local_text: &str,
        external: Option<&str>,
    ) -> Result<Verification, LedgerError> {
        let digest = digest256(candidate);

        let parsed = codec::deserialize_with(local_text, self.mode);
        let dropped_local_lines = parsed.errors.clone();
        let local_matches: Vec<Match> = parsed
            .with_mode(self.mode)?
            .into_iter()
            .filter(|record| record.sha256() == Some(digest.as_str()))
            .map(Match::Imported)
            .collect();

        self.finish(digest, local_matches, dropped_local_lines, external)
    }

    fn finish(
        &self,
        digest: String,
        mut matches: Vec<Match>,
        dropped_local_lines: Vec<LineError>,
        external: Option<&str>,
    ) -> Result<Verification, LedgerError> {
        let parsed = external
            .map(|text| codec::deserialize_with(text, self.mode))
            .unwrap_or_default();
        let dropped_lines = parsed.errors.clone();

        matches.extend(
            parsed
                .with_mode(self.mode)?
                .into_iter()
                .filter(|record| record.sha256() == Some(digest.as_str()))
                .map(Match::External),
        );

        info!(
            sha256 = %digest,
            matches = matches.len(),
            dropped = dropped_local_lines.len() + dropped_lines.len(),
            "Verified document"
        );

        Ok(Verification {
            digest,
            matches,
            dropped_local_lines,
            dropped_lines,
        })
    }
}

/// Verify `candidate` permissively, returning every matching record.
///
/// Never fails: malformed external lines are dropped, an empty ledger or
/// empty candidate simply yields no matches.
pub fn verify(candidate: &[u8], local: &Ledger, external: Option<&str>) -> Vec<Match> {
    let digest = digest256(candidate);

    let universe = local
        .iter()
        .cloned()
        .map(Match::Local)
        .chain(
            external
                .map(codec::deserialize)
                .unwrap_or_default()
                .into_iter()
                .map(Match::External),
        );

    universe
        .filter(|candidate_match| candidate_match.sha256() == Some(digest.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::build_evidence;

    #[test]
    fn test_positive_match() {
        let mut ledger = Ledger::new();
        ledger.append(build_evidence(b"X", "x.txt", ""));

        let matches = verify(b"X", &ledger, None);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].sha256(), Some(digest256(b"X").as_str()));
        assert_eq!(matches[0].origin(), "local");
    }

    #[test]
    fn test_negative_match() {
        let mut ledger = Ledger::new();
        ledger.append(build_evidence(b"X", "x.txt", ""));
        assert!(verify(b"Y", &ledger, None).is_empty());
    }

    #[test]
    fn test_external_ledger_participates() {
        let record = build_evidence(b"X", "x.txt", "");
        let text = codec::serialize([&record]).unwrap();

        let matches = verify(b"X", &Ledger::new(), Some(text.as_str()));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].origin(), "external");
    }

    #[test]
    fn test_local_matches_come_first() {
        let external_record = build_evidence(b"X", "external.txt", "");
        let text = codec::serialize([&external_record]).unwrap();

        let mut ledger = Ledger::new();
        ledger.append(build_evidence(b"X", "local.txt", ""));

        let matches = verify(b"X", &ledger, Some(text.as_str()));
        let origins: Vec<&str> = matches.iter().map(Match::origin).collect();
        assert_eq!(origins, vec!["local", "external"]);
    }

    #[test]
    fn test_records_without_digest_never_match() {
        let text = "{\"filename\": \"x.txt\"}\n{\"sha256\": null}\nnot json\n";
        assert!(verify(b"", &Ledger::new(), Some(text)).is_empty());
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let upper = digest256(b"X").to_uppercase();
        let text = format!("{{\"sha256\": \"{}\"}}\n", upper);
        assert!(verify(b"X", &Ledger::new(), Some(text.as_str())).is_empty());
    }

    #[test]
    fn test_verifier_report() {
        let mut ledger = Ledger::new();
        ledger.append(build_evidence(b"X", "x.txt", "n"));
        let text = "garbage\n";

        let report = Verifier::default().verify(b"X", &ledger, Some(text)).unwrap();
        assert!(report.is_verified());
        assert_eq!(report.match_count(), 1);
        assert_eq!(report.digest, digest256(b"X"));
        assert_eq!(report.dropped_lines.len(), 1);
        assert_eq!(report.first().map(Match::origin), Some("local"));
    }

    #[test]
    fn test_strict_verifier_rejects_malformed_external() {
        let verifier = Verifier::new(ParseMode::Strict);
        let result = verifier.verify(b"X", &Ledger::new(), Some("{\"sha256\": \"a\"}\n{oops\n"));
        assert!(matches!(
            result,
            Err(LedgerError::MalformedLines { count: 1, first_line: 2 })
        ));
    }

    #[test]
    fn test_match_to_json_has_record_fields() {
        let record = build_evidence(b"X", "x.txt", "nota");
        let json = Match::Local(record.clone()).to_json().unwrap();
        assert_eq!(json["filename"], "x.txt");
        assert_eq!(json["sha256"], record.sha256());
    }

    #[test]
    fn test_imported_local_text_matches_partial_records() {
        let digest = digest256(b"X");
        let text = format!("{{\"sha256\": \"{}\", \"filename\": \"hand.txt\"}}\n", digest);
        let verifier = Verifier::default();

        let as_local = verifier.verify_imported(b"X", &text, None).unwrap();
        let as_external = verifier.verify(b"X", &Ledger::new(), Some(text.as_str())).unwrap();

        assert_eq!(as_local.match_count(), 1);
        assert_eq!(as_external.match_count(), 1);
        assert_eq!(as_local.first().map(Match::origin), Some("local"));
    }

    #[test]
    fn test_imported_local_text_comes_before_external() {
        let local = codec::serialize([&build_evidence(b"X", "local.txt", "")]).unwrap();
        let external = codec::serialize([&build_evidence(b"X", "external.txt", "")]).unwrap();

        let report = Verifier::default()
            .verify_imported(b"X", &local, Some(external.as_str()))
            .unwrap();
        let origins: Vec<&str> = report.matches.iter().map(Match::origin).collect();
        assert_eq!(origins, vec!["local", "external"]);
    }

    #[test]
    fn test_imported_local_text_dropped_lines() {
        let report = Verifier::default()
            .verify_imported(b"X", "garbage\n", None)
            .unwrap();
        assert!(!report.is_verified());
        assert_eq!(report.dropped_local_lines.len(), 1);
        assert!(report.dropped_lines.is_empty());

        let strict = Verifier::new(ParseMode::Strict).verify_imported(b"X", "garbage\n", None);
        assert!(strict.is_err());
    }
}

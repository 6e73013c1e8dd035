//! JSONL codec for ledger interchange.
//!
//! A ledger file is UTF-8 text with one compact JSON object per line and no
//! surrounding array. Non-ASCII characters are written verbatim.
//!
//! Parsing is permissive by default: ledgers are user-editable files, so a
//! line that does not parse as a JSON object is dropped and the rest of the
//! file is still used. Strict mode reports the same survivors but lets the
//! caller refuse the import.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::error::LedgerError;
use crate::domain::{DigestBearing, EvidenceRecord};

/// How to treat lines that fail to parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    /// Drop malformed lines and continue
    #[default]
    Permissive,
    /// Report malformed lines as an error (see [`Parsed::into_strict`])
    Strict,
}

impl std::str::FromStr for ParseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(ParseMode::Permissive),
            "strict" => Ok(ParseMode::Strict),
            other => Err(format!("Unknown parse mode: {}", other)),
        }
    }
}

/// A ledger line as parsed from external text.
///
/// This is a generic field mapping, not a validated [`EvidenceRecord`].
/// The only field anything relies on is `sha256`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalRecord {
    fields: Map<String, Value>,
}

impl ExternalRecord {
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Look up an arbitrary field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// View this mapping as a typed record, if it has the full record shape
    pub fn to_evidence(&self) -> Option<EvidenceRecord> {
        serde_json::from_value(Value::Object(self.fields.clone())).ok()
    }

    /// The mapping as a JSON value (for display)
    pub fn to_json(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

impl DigestBearing for ExternalRecord {
    fn sha256(&self) -> Option<&str> {
        self.fields.get("sha256").and_then(Value::as_str)
    }
}

/// A line that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    /// 1-based line number in the input text
    pub line: usize,
    pub message: String,
}

/// Result of parsing ledger text: surviving records plus dropped lines
#[derive(Debug, Clone, Default)]
pub struct Parsed {
    pub records: Vec<ExternalRecord>,
    pub errors: Vec<LineError>,
}

impl Parsed {
    /// Fail if any line was dropped, otherwise return the records
    pub fn into_strict(self) -> Result<Vec<ExternalRecord>, LedgerError> {
        match self.errors.first() {
            None => Ok(self.records),
            Some(first) => Err(LedgerError::MalformedLines {
                count: self.errors.len(),
                first_line: first.line,
            }),
        }
    }

    /// Apply a parse mode: permissive keeps survivors, strict rejects on any error
    pub fn with_mode(self, mode: ParseMode) -> Result<Vec<ExternalRecord>, LedgerError> {
        match mode {
            ParseMode::Permissive => Ok(self.records),
            ParseMode::Strict => self.into_strict(),
        }
    }
}

/// Render records as JSONL: one compact object per line, each ending in `\n`
pub fn serialize<'a, I>(records: I) -> Result<String, LedgerError>
where
    I: IntoIterator<Item = &'a EvidenceRecord>,
{
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}

/// Parse JSONL text permissively, dropping malformed lines
pub fn deserialize(text: &str) -> Vec<ExternalRecord> {
    deserialize_with(text, ParseMode::Permissive).records
}

/// Parse JSONL text, collecting both survivors and per-line errors.
///
/// In permissive mode every dropped line is also logged at warn level.
pub fn deserialize_with(text: &str, mode: ParseMode) -> Parsed {
    let mut parsed = Parsed::default();

    for (idx, raw) in split_lines(text).enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        match parse_line(line) {
            Ok(record) => parsed.records.push(record),
            Err(message) => {
                if mode == ParseMode::Permissive {
                    warn!(line = idx + 1, %message, "Dropping malformed ledger line");
                }
                parsed.errors.push(LineError {
                    line: idx + 1,
                    message,
                });
            }
        }
    }

    debug!(
        records = parsed.records.len(),
        dropped = parsed.errors.len(),
        "Parsed ledger text"
    );

    parsed
}

/// Parse raw ledger bytes, silently discarding invalid UTF-8 sequences
pub fn deserialize_bytes(bytes: &[u8], mode: ParseMode) -> Parsed {
    deserialize_with(&decode_lossy(bytes), mode)
}

/// Split on `\n`, `\r\n` and lone `\r` line endings
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
}

/// Decode ledger bytes as UTF-8, dropping invalid sequences
pub fn decode_lossy(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => String::from_utf8_lossy(bytes)
            .chars()
            .filter(|c| *c != char::REPLACEMENT_CHARACTER)
            .collect(),
    }
}

fn parse_line(line: &str) -> Result<ExternalRecord, String> {
    match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(fields)) => Ok(ExternalRecord { fields }),
        Ok(_) => Err("not a JSON object".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

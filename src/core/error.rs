//! Errors surfaced by the ledger core.

use thiserror::Error;

/// Errors that can occur while handling ledgers
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Ledger has {count} malformed line(s), first at line {first_line}")]
    MalformedLines { count: usize, first_line: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

//! Evidence CLI subcommands.
//!
//! Provides commands to:
//! - `hash`: Print document fingerprints
//! - `evidence`: Build evidence, export it as JSON and register it in the ledger
//! - `verify`: Check a document against the local and an external ledger
//! - `ledger`: List ledger entries

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use tracing::{info, warn};

use crate::config;
use crate::core::{self, Match, ParseMode, Verification, Verifier};
use crate::domain::{DigestBearing, EvidenceRecord};
use crate::evidence::{build_evidence, DigestAlgorithm};

/// Read a document fully into memory, returning its bytes and display name
async fn read_document(path: &Path) -> Result<(Vec<u8>, String)> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read document: {}", path.display()))?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok((bytes, name))
}

/// Read a ledger file as text; a missing file is an empty ledger.
///
/// Invalid UTF-8 sequences are dropped rather than replaced.
pub async fn read_ledger_text(path: &Path) -> Result<String> {
    if !path.exists() {
        return Ok(String::new());
    }

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read ledger: {}", path.display()))?;

    Ok(core::decode_lossy(&bytes))
}

/// Append a record to a ledger file with file locking.
///
/// The record is written as one JSONL line; existing lines are left untouched.
pub fn register(ledger_path: &Path, record: &EvidenceRecord) -> Result<()> {
    if let Some(parent) = ledger_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create ledger directory: {}", parent.display()))?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(ledger_path)
        .with_context(|| format!("Failed to open ledger file: {}", ledger_path.display()))?;

    // Acquire exclusive lock
    file.lock_exclusive()
        .context("Failed to acquire file lock on ledger")?;

    let line = core::serialize([record]).context("Failed to serialize evidence")?;

    if !ends_with_newline(&mut file)? {
        file.write_all(b"\n").context("Failed to write ledger")?;
    }
    file.write_all(line.as_bytes())
        .context("Failed to write ledger")?;
    file.flush().context("Failed to flush ledger")?;

    // Lock is released when file is dropped
    Ok(())
}

/// True if the file is empty or its last byte is a newline
fn ends_with_newline(file: &mut File) -> Result<bool> {
    let len = file.metadata().context("Failed to stat ledger")?.len();
    if len == 0 {
        return Ok(true);
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))
        .context("Failed to seek ledger")?;
    file.read_exact(&mut last).context("Failed to read ledger")?;
    Ok(last[0] == b'\n')
}

/// Write a single evidence record as pretty JSON into `dir`
pub async fn write_evidence_file(dir: &Path, record: &EvidenceRecord) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;

    let path = dir.join(record.export_file_name());
    let json = record
        .to_pretty_json()
        .context("Failed to serialize evidence")?;

    tokio::fs::write(&path, json)
        .await
        .with_context(|| format!("Failed to write evidence: {}", path.display()))?;

    Ok(path)
}

fn parse_mode(strict: bool) -> Result<ParseMode> {
    if strict {
        Ok(ParseMode::Strict)
    } else {
        Ok(config::config()?.ledger.parse_mode)
    }
}

/// Execute the `hash` command
pub async fn execute_hash(path: &Path) -> Result<()> {
    let (bytes, _) = read_document(path).await?;

    for algo in [DigestAlgorithm::Sha256, DigestAlgorithm::Sha512] {
        println!("{}: {}", algo.as_str(), algo.digest(&bytes));
    }

    Ok(())
}

/// Execute the `evidence` command
pub async fn execute_build(
    path: &Path,
    notes: &str,
    out: Option<PathBuf>,
    ledger: Option<PathBuf>,
) -> Result<()> {
    let (bytes, name) = read_document(path).await?;
    let record = build_evidence(&bytes, &name, notes);

    let out_dir = match out {
        Some(dir) => dir,
        None => config::exports_dir()?,
    };
    let evidence_path = write_evidence_file(&out_dir, &record).await?;

    println!("Evidence generated");
    println!("  SHA-256: {}", record.sha256());
    println!("  SHA-512: {}", record.sha512());
    println!("  Size:    {} bytes", record.size_bytes());
    println!("  Time:    {}", record.computed_at_utc());
    println!("  File:    {}", evidence_path.display());

    if let Some(ledger_path) = ledger {
        register(&ledger_path, &record)?;
        info!(ledger = %ledger_path.display(), "Evidence registered");
        println!("  Ledger:  {}", ledger_path.display());
    }

    Ok(())
}

/// Verify a document against a local ledger file and an optional external one
pub async fn verify_files(
    path: &Path,
    ledger_path: &Path,
    external: Option<&Path>,
    mode: ParseMode,
) -> Result<Verification> {
    let (bytes, _) = read_document(path).await?;

    let local_text = read_ledger_text(ledger_path).await?;
    let external_text = match external {
        Some(ext) => Some(
            read_ledger_text(ext)
                .await
                .with_context(|| format!("Failed to read external ledger: {}", ext.display()))?,
        ),
        None => None,
    };

    Verifier::new(mode)
        .verify_imported(&bytes, &local_text, external_text.as_deref())
        .context("Ledger rejected")
}

/// Execute the `verify` command
pub async fn execute_verify(
    path: &Path,
    ledger_path: &Path,
    external: Option<PathBuf>,
    strict: bool,
) -> Result<()> {
    let mode = parse_mode(strict)?;
    let report = verify_files(path, ledger_path, external.as_deref(), mode).await?;

    for dropped in &report.dropped_local_lines {
        warn!(line = dropped.line, "Skipped malformed local ledger line");
    }
    for dropped in &report.dropped_lines {
        warn!(line = dropped.line, "Skipped malformed external ledger line");
    }

    println!("Document SHA-256: {}", report.digest);
    println!();

    match report.first() {
        Some(first) => {
            println!("Match found: {} evidence record(s).", report.match_count());
            println!();
            print_match(first)?;
        }
        None => {
            println!("No matching evidence. (Either it was never registered, or the file changed.)");
        }
    }

    Ok(())
}

fn print_match(m: &Match) -> Result<()> {
    println!("First match ({} ledger):", m.origin());
    let value = m.to_json().context("Failed to render match")?;
    let json = serde_json::to_string_pretty(&value).context("Failed to render match")?;
    println!("{}", json);
    Ok(())
}

/// Execute the `ledger` command
pub async fn execute_list(ledger_path: &Path) -> Result<()> {
    if !ledger_path.exists() {
        println!("No ledger entries yet ({}).", ledger_path.display());
        return Ok(());
    }

    let text = read_ledger_text(ledger_path).await?;
    let parsed = core::deserialize_with(&text, ParseMode::Permissive);

    println!("Ledger: {}", ledger_path.display());
    println!();
    println!("{:<4} {:<16} {:>10}  {:<32} {}", "#", "SHA-256", "BYTES", "COMPUTED AT", "FILENAME");
    println!("{}", "-".repeat(90));

    for (idx, record) in parsed.records.iter().enumerate() {
        let sha = record.sha256().unwrap_or("-");
        let field = |key: &str| {
            record
                .get(key)
                .map(|v| match v.as_str() {
                    Some(s) => s.to_string(),
                    None => v.to_string(),
                })
                .unwrap_or_else(|| "-".to_string())
        };

        println!(
            "{:<4} {:<16} {:>10}  {:<32} {}",
            idx + 1,
            short_digest(sha),
            field("size_bytes"),
            field("computed_at_utc"),
            field("filename")
        );
    }

    println!();
    println!("Total: {} record(s)", parsed.records.len());
    if !parsed.errors.is_empty() {
        println!("Skipped {} malformed line(s):", parsed.errors.len());
        for err in &parsed.errors {
            println!("  line {}: {}", err.line, err.message);
        }
    }

    Ok(())
}

/// First 16 characters of a digest, for table display
fn short_digest(sha: &str) -> String {
    sha.chars().take(16).collect()
}

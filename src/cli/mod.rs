//! Command-line interface for trust-ledger.
//!
//! Provides commands for hashing documents, generating evidence,
//! registering it in a JSONL ledger and verifying documents later.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config;

pub mod evidence;

/// trust-ledger - Evidence ledger for hashing, registering and verifying documents
#[derive(Parser, Debug)]
#[command(name = "trust-ledger")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the SHA-256 and SHA-512 fingerprints of a document
    Hash {
        /// Document to hash
        file: PathBuf,
    },

    /// Generate evidence for a document and register it in the ledger
    Evidence {
        /// Document to generate evidence for
        file: PathBuf,

        /// Free-text notes stored with the evidence
        #[arg(short, long, default_value = "")]
        notes: String,

        /// Directory for the evidence .json export (defaults to configured exports dir)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Ledger file to register the evidence in (defaults to configured ledger)
        #[arg(short, long, env = "TRUST_LEDGER_FILE")]
        ledger: Option<PathBuf>,

        /// Only write the evidence file, do not register it
        #[arg(long)]
        no_register: bool,
    },

    /// Verify a document against the ledger and an optional external ledger
    Verify {
        /// Document to verify
        file: PathBuf,

        /// Previously exported ledger (.jsonl) to search as well
        #[arg(short, long)]
        external: Option<PathBuf>,

        /// Local ledger file (defaults to configured ledger)
        #[arg(short, long, env = "TRUST_LEDGER_FILE")]
        ledger: Option<PathBuf>,

        /// Fail if any ledger line is malformed instead of skipping it
        #[arg(long)]
        strict: bool,
    },

    /// List the records of a ledger file
    Ledger {
        /// Ledger file (defaults to configured ledger)
        file: Option<PathBuf>,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Hash { file } => evidence::execute_hash(&file).await,
            Commands::Evidence {
                file,
                notes,
                out,
                ledger,
                no_register,
            } => {
                let ledger = if no_register {
                    None
                } else {
                    Some(resolve_ledger(ledger)?)
                };
                evidence::execute_build(&file, &notes, out, ledger).await
            }
            Commands::Verify {
                file,
                external,
                ledger,
                strict,
            } => {
                let ledger = resolve_ledger(ledger)?;
                evidence::execute_verify(&file, &ledger, external, strict).await
            }
            Commands::Ledger { file } => {
                let ledger = resolve_ledger(file)?;
                evidence::execute_list(&ledger).await
            }
            Commands::Config => show_config(),
        }
    }
}

/// Use the given ledger path or fall back to the configured one
fn resolve_ledger(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => config::ledger_path(),
    }
}

/// Print resolved configuration
fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("trust-ledger Configuration");
    println!("==========================");
    println!();
    match &cfg.config_file {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (none, using defaults)"),
    }
    println!("Home:        {}", cfg.home.display());
    println!("Exports:     {}", cfg.exports.display());
    println!("Ledger:      {}", cfg.ledger_path().display());
    println!("Parse mode:  {:?}", cfg.ledger.parse_mode);

    Ok(())
}

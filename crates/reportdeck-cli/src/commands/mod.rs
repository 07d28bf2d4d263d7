//! Command implementations.

pub mod export;
pub mod serve;
pub mod show;

use std::path::PathBuf;

use colored::Colorize;
use reportdeck::{Deck, IngestReport};

use crate::cli::DeckArgs;

/// Build a deck from the flags and ingest `files` as one batch.
pub fn load_deck(
    files: &[PathBuf],
    args: &DeckArgs,
) -> Result<(Deck, IngestReport), Box<dyn std::error::Error>> {
    let mut deck = Deck::with_config(args.to_config()?);
    let report = deck.ingest_files(files)?;

    for failure in &report.failures {
        eprintln!("{} {}", "Skipped:".yellow(), failure);
    }

    Ok((deck, report))
}

//! Serve command - expose loaded reports over a local JSON API.

use std::path::PathBuf;

use colored::Colorize;

use super::load_deck;
use crate::cli::DeckArgs;
use crate::server::{app, state::AppState};

pub fn run(
    files: Vec<PathBuf>,
    port: u16,
    deck_args: DeckArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let (deck, report) = load_deck(&files, &deck_args)?;

    let url = format!("http://localhost:{}", port);
    println!();
    println!(
        "{} {}",
        "Serving reports at".cyan().bold(),
        url.white().bold()
    );
    println!();
    for id in &report.ingested {
        println!("  {}", id);
    }
    println!();
    println!("  Try: curl {}/api/groups?mode=tags", url);
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());

    let state = AppState::new(deck);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(app::run_server(state, port))?;

    println!("{}", "Shutting down...".yellow());
    Ok(())
}

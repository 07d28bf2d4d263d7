//! reportdeck CLI - grouped, filtered views over tabular reports.

mod cli;
mod commands;
mod server;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Show {
            files,
            group_by,
            tags,
            inactive,
            view,
            deck,
        } => commands::show::run(files, group_by, tags, inactive, view, deck, cli.verbose),

        Commands::Export {
            file,
            output,
            format,
            view,
            deck,
        } => commands::export::run(file, output, format, view, deck, cli.verbose),

        Commands::Serve { files, port, deck } => commands::serve::run(files, port, deck),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr. `RUST_LOG` wins; otherwise warnings only, or debug with
/// `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

//! Export command - write the computed page of one report.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use colored::Colorize;
use reportdeck::view::write_view;
use reportdeck::ExportFormat;

use super::load_deck;
use crate::cli::{DeckArgs, ViewArgs};

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    format: ExportFormat,
    view_args: ViewArgs,
    deck_args: DeckArgs,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut deck, report) = load_deck(std::slice::from_ref(&file), &deck_args)?;
    let id = report
        .ingested
        .first()
        .ok_or_else(|| format!("Could not load {}", file.display()))?;

    if !view_args.apply(&mut deck, id) {
        return Err(format!("Page {} is out of range for {}", view_args.page, id).into());
    }

    let view = deck
        .view(id)
        .ok_or_else(|| format!("No view for {}", id))?;

    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(&path)?);
            write_view(&view, format, &mut writer)?;
            writer.flush()?;

            println!(
                "{} {} rows to {}",
                "Exported".green().bold(),
                view.rows.len(),
                path.display()
            );
            if verbose {
                println!(
                    "  Page {} of {} ({} rows after filters)",
                    view.current_page, view.total_pages, view.range.total
                );
            }
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_view(&view, format, &mut writer)?;
            writer.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn deck_args() -> DeckArgs {
        DeckArgs {
            delimiter: ',',
            strict: false,
            partial: false,
            date_format: None,
            chronological: false,
        }
    }

    #[test]
    fn test_export_filtered_page_to_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("orders.csv");
        let mut file = File::create(&input).unwrap();
        file.write_all(b"region,owner\neast,kim\nwest,lee\neast,ann\n")
            .unwrap();

        let output = dir.path().join("out.tsv");
        let view_args = ViewArgs {
            filters: vec![("region".to_string(), "east".to_string())],
            sort: Some("owner".to_string()),
            page: 1,
            ..ViewArgs::default()
        };

        run(
            input,
            Some(output.clone()),
            ExportFormat::Tsv,
            view_args,
            deck_args(),
            false,
        )
        .unwrap();

        let written = std::fs::read_to_string(output).unwrap();
        assert_eq!(written, "region\towner\neast\tann\neast\tkim\n");
    }

    #[test]
    fn test_export_out_of_range_page_fails() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("orders.csv");
        std::fs::write(&input, "a\n1\n").unwrap();

        let view_args = ViewArgs {
            page: 5,
            ..ViewArgs::default()
        };
        let result = run(
            input,
            Some(dir.path().join("out.csv")),
            ExportFormat::Csv,
            view_args,
            deck_args(),
            false,
        );

        assert!(result.is_err());
    }
}

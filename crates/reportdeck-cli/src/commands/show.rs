//! Show command - print grouped, filtered and paged reports.

use std::path::PathBuf;

use colored::Colorize;
use reportdeck::{Dataset, GroupMode, SortDirection, View};

use super::load_deck;
use crate::cli::{DeckArgs, ViewArgs};

/// Cells wider than this are cut with an ellipsis.
const MAX_CELL_WIDTH: usize = 40;

pub fn run(
    files: Vec<PathBuf>,
    group_by: GroupMode,
    tags: Vec<(String, String)>,
    inactive: Vec<String>,
    view_args: ViewArgs,
    deck_args: DeckArgs,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut deck, report) = load_deck(&files, &deck_args)?;

    if verbose {
        println!(
            "Loaded {} of {} files",
            report.ingested.len().to_string().white().bold(),
            files.len()
        );
    }

    for (id, tag) in &tags {
        if deck.dataset(id).is_none() {
            eprintln!("{} no report named {}", "Warning:".yellow(), id);
        }
        deck.add_tag(id, tag);
    }

    for id in &inactive {
        if !deck.set_active(id, false) {
            eprintln!("{} no report named {}", "Warning:".yellow(), id);
        }
    }

    for id in &report.ingested {
        if !view_args.apply(&mut deck, id) {
            eprintln!(
                "{} page {} is out of range for {}, showing page 1",
                "Warning:".yellow(),
                view_args.page,
                id
            );
        }
    }

    for group in deck.groups(group_by) {
        println!();
        println!(
            "{} {}",
            group.title.cyan().bold(),
            format!("({})", group.count).dimmed()
        );

        if group.datasets.is_empty() {
            println!("  {}", "No reports".dimmed());
        }

        for dataset in &group.datasets {
            if let Some(view) = deck.view(&dataset.id) {
                print_dataset(dataset, &view);
            }
        }
    }

    if let Some(group) = deck.inactive_group() {
        println!();
        println!(
            "{} {}",
            group.title.yellow().bold(),
            format!("({})", group.count).dimmed()
        );
        for dataset in &group.datasets {
            println!("  {} {}", dataset.id.white(), tag_list(dataset).dimmed());
        }
    }

    Ok(())
}

fn tag_list(dataset: &Dataset) -> String {
    let tags: Vec<&str> = dataset.tags().collect();
    if tags.is_empty() {
        String::new()
    } else {
        format!("[{}]", tags.join(", "))
    }
}

fn print_dataset(dataset: &Dataset, view: &View<'_>) {
    println!();
    println!(
        "  {} {} {}",
        dataset.id.white().bold(),
        tag_list(dataset).magenta(),
        dataset
            .ingested_at
            .format("%Y-%m-%d %H:%M UTC")
            .to_string()
            .dimmed()
    );

    if !view.filters.is_empty() {
        let filters: Vec<String> = view
            .filters
            .iter()
            .map(|(header, value)| format!("{}={}", header, value))
            .collect();
        println!("  {} {}", "Filters:".yellow(), filters.join(", "));
    }

    print_table(view);

    let range = view.range;
    println!(
        "  {}",
        format!(
            "Showing {} to {} of {} results · Page {} of {}",
            range.from, range.to, range.total, view.current_page, view.total_pages
        )
        .dimmed()
    );
}

fn print_table(view: &View<'_>) {
    let labels: Vec<String> = view
        .headers
        .iter()
        .map(|h| match view.sort.indicator(h) {
            Some(SortDirection::Asc) => format!("{} ▲", h),
            Some(SortDirection::Desc) => format!("{} ▼", h),
            None => h.clone(),
        })
        .collect();

    let mut widths: Vec<usize> = labels.iter().map(|l| l.chars().count()).collect();
    for row in &view.rows {
        for (width, value) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(value.chars().count().min(MAX_CELL_WIDTH));
        }
    }

    let header_line: Vec<String> = labels
        .iter()
        .zip(&widths)
        .map(|(label, &width)| format!("{:<width$}", label))
        .collect();
    println!("  {}", header_line.join("  ").bold());

    let rule: Vec<String> = widths.iter().map(|&w| "─".repeat(w)).collect();
    println!("  {}", rule.join("  ").dimmed());

    if view.rows.is_empty() {
        println!("  {}", "No matching rows".dimmed());
        return;
    }

    for row in &view.rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(value, &width)| format!("{:<width$}", truncate(value)))
            .collect();
        println!("  {}", cells.join("  "));
    }
}

fn truncate(value: &str) -> String {
    if value.chars().count() <= MAX_CELL_WIDTH {
        value.to_string()
    } else {
        let cut: String = value.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{}…", cut)
    }
}

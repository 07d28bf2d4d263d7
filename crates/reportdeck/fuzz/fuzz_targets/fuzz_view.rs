//! Fuzz target for view state changes.
//!
//! Drives a deck with an arbitrary sequence of filter, sort and paging
//! operations and checks the page it reports is always in range.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use reportdeck::{Deck, PageSize};

#[derive(Debug, Arbitrary)]
enum Op {
    Filter { column: u8, value: String },
    ClearFilters,
    Sort { column: u8 },
    Page(u16),
    PageSize(u8),
}

#[derive(Debug, Arbitrary)]
struct Input {
    text: String,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let mut deck = Deck::new();
    let Ok(dataset) = deck.ingest_str("fuzz.csv", &input.text) else {
        return;
    };
    let headers = dataset.table().headers.clone();
    let header = |i: u8| headers[usize::from(i) % headers.len()].clone();

    for op in input.ops.iter().take(64) {
        match op {
            Op::Filter { column, value } => {
                deck.set_filter("fuzz.csv", &header(*column), Some(value.as_str()));
            }
            Op::ClearFilters => {
                deck.clear_filters("fuzz.csv");
            }
            Op::Sort { column } => {
                deck.set_sort("fuzz.csv", &header(*column));
            }
            Op::Page(page) => {
                deck.set_page("fuzz.csv", usize::from(*page));
            }
            Op::PageSize(size) => {
                let size = PageSize::rows(usize::from(*size)).unwrap_or(PageSize::All);
                deck.set_page_size("fuzz.csv", size);
            }
        }

        if let Some(view) = deck.view("fuzz.csv") {
            assert!(view.current_page >= 1 && view.current_page <= view.total_pages);
        }
    }
});

//! Fuzz target for the report parser.
//!
//! Checks that file parsing never panics on arbitrary bytes, including
//! invalid UTF-8, and that accepted tables are rectangular.

#![no_main]

use libfuzzer_sys::fuzz_target;
use reportdeck::Parser;
use std::io::Write;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    if let Ok(mut temp_file) = tempfile::NamedTempFile::new() {
        if temp_file.write_all(data).is_ok() {
            if let Ok((table, _)) = Parser::new().parse_file(temp_file.path()) {
                assert!(table.rows.iter().all(|r| r.len() == table.column_count()));
            }
        }
    }
});

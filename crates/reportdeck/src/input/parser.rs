//! Naive line/comma splitter for report files.
//!
//! Rows are split on `\n` and cells on the delimiter. There is no quoting or
//! escaping: a delimiter or newline inside a field shifts the columns of that
//! row. This matches what report exports produce in practice and is left
//! as-is on purpose.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use super::source::{DataTable, SourceInfo};
use crate::error::{DeckError, Result};

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Cell delimiter.
    pub delimiter: char,
    /// Reject rows whose cell count differs from the header count instead of
    /// padding or truncating them.
    pub strict: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            strict: false,
        }
    }
}

impl ParserConfig {
    /// Use a different cell delimiter.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Reject ragged rows.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }
}

/// Parses report files into tables.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Read and parse a file. The file name becomes the table's source name.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceInfo)> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut file = File::open(path).map_err(|e| DeckError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(|e| DeckError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let text = String::from_utf8(contents)
            .map_err(|e| DeckError::parse(&name, format!("not valid UTF-8: {}", e)))?;

        self.parse_str(&name, &text)
    }

    /// Parse in-memory text.
    pub fn parse_str(&self, name: &str, text: &str) -> Result<(DataTable, SourceInfo)> {
        let table = self.split(name, text)?;

        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        let hash = format!("sha256:{:x}", hasher.finalize());

        let source = SourceInfo {
            file: name.to_string(),
            hash,
            size_bytes: text.len() as u64,
            row_count: table.row_count(),
            column_count: table.column_count(),
        };

        debug!(
            file = name,
            rows = source.row_count,
            columns = source.column_count,
            "parsed table"
        );

        Ok((table, source))
    }

    fn split(&self, name: &str, text: &str) -> Result<DataTable> {
        let mut lines = text.split('\n');

        let header_line = lines.next().unwrap_or("");
        if header_line.trim().is_empty() {
            return Err(DeckError::parse(name, "no header row"));
        }

        let headers: Vec<String> = header_line
            .split(self.config.delimiter)
            .map(|h| h.trim().to_string())
            .collect();

        let expected_cols = headers.len();
        let mut rows = Vec::new();

        // Line numbers are 1-based and count the header line.
        for (line_no, line) in lines.enumerate().map(|(i, l)| (i + 2, l)) {
            if line.trim().is_empty() {
                continue;
            }

            let mut row: Vec<String> = line
                .split(self.config.delimiter)
                .map(|c| c.trim().to_string())
                .collect();

            if row.len() != expected_cols {
                if self.config.strict {
                    return Err(DeckError::parse(
                        name,
                        format!(
                            "line {} has {} cells, expected {}",
                            line_no,
                            row.len(),
                            expected_cols
                        ),
                    ));
                }
                row.resize(expected_cols, String::new());
            }

            rows.push(row);
        }

        let table = DataTable::new(headers, rows);
        table.validate(name)?;
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_skips_blank_lines() {
        let parser = Parser::new();
        let (table, source) = parser
            .parse_str("r.csv", " name , age \nAlice, 30\n\n  \nBob,25\n")
            .unwrap();

        assert_eq!(table.headers, vec!["name", "age"]);
        assert_eq!(table.rows, vec![vec!["Alice", "30"], vec!["Bob", "25"]]);
        assert_eq!(source.file, "r.csv");
        assert_eq!(source.row_count, 2);
        assert_eq!(source.column_count, 2);
        assert!(source.hash.starts_with("sha256:"));
    }

    #[test]
    fn test_parse_empty_content_fails() {
        let parser = Parser::new();
        let err = parser.parse_str("empty.csv", "").unwrap_err();

        assert_eq!(err.to_string(), "Error parsing empty.csv: no header row");
    }

    #[test]
    fn test_quoted_commas_are_not_special() {
        let parser = Parser::new();
        let (table, _) = parser
            .parse_str("q.csv", "a,b\n\"x,y\",z\n")
            .unwrap();

        // The quoted comma splits the cell; the extra cell is dropped.
        assert_eq!(table.rows[0], vec!["\"x", "y\""]);
    }

    #[test]
    fn test_ragged_rows_padded() {
        let parser = Parser::new();
        let (table, _) = parser.parse_str("r.csv", "a,b,c\n1\n").unwrap();

        assert_eq!(table.rows[0], vec!["1", "", ""]);
    }

    #[test]
    fn test_strict_rejects_ragged_rows() {
        let parser = Parser::with_config(ParserConfig::default().strict());
        let err = parser.parse_str("r.csv", "a,b\n1,2\n3\n").unwrap_err();

        assert_eq!(
            err.to_string(),
            "Error parsing r.csv: line 3 has 1 cells, expected 2"
        );
    }

    #[test]
    fn test_duplicate_headers_rejected() {
        let parser = Parser::new();
        assert!(parser.parse_str("d.csv", "a,a\n1,2\n").is_err());
    }

    #[test]
    fn test_custom_delimiter() {
        let parser = Parser::with_config(ParserConfig::default().with_delimiter('\t'));
        let (table, _) = parser.parse_str("t.tsv", "a\tb\n1\t2").unwrap();

        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.rows, vec![vec!["1", "2"]]);
    }

    #[test]
    fn test_parse_file_uses_file_name() {
        use std::io::Write;

        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"x,y\n1,2\n").unwrap();

        let (table, source) = Parser::new().parse_file(file.path()).unwrap();
        let expected = file.path().file_name().unwrap().to_string_lossy().into_owned();

        assert_eq!(source.file, expected);
        assert_eq!(source.size_bytes, 8);
        assert_eq!(table.row_count(), 1);
    }
}

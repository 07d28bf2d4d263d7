//! Writing a computed view out as CSV, TSV or JSON.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use indexmap::IndexMap;

use super::View;
use crate::error::{DeckError, Result};

/// Output format for exported views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl ExportFormat {
    /// Conventional file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!("Unknown format: {}. Use csv, tsv, or json.", s)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Write the rows of `view` (headers first for delimited formats).
///
/// Delimited output is quoted properly, so cells that contain the delimiter
/// survive the round trip even though the input parser does not quote.
pub fn write_view<W: Write>(view: &View<'_>, format: ExportFormat, writer: W) -> Result<()> {
    match format {
        ExportFormat::Csv => write_delimited(view, b',', writer),
        ExportFormat::Tsv => write_delimited(view, b'\t', writer),
        ExportFormat::Json => {
            let records: Vec<IndexMap<&str, &str>> = view
                .rows
                .iter()
                .map(|row| {
                    view.headers
                        .iter()
                        .map(|h| h.as_str())
                        .zip(row.iter().map(|c| c.as_str()))
                        .collect()
                })
                .collect();
            serde_json::to_writer_pretty(writer, &records)?;
            Ok(())
        }
    }
}

fn write_delimited<W: Write>(view: &View<'_>, delimiter: u8, writer: W) -> Result<()> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    out.write_record(view.headers)?;
    for row in &view.rows {
        out.write_record(*row)?;
    }
    out.flush().map_err(|e| DeckError::Csv(e.into()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{Filters, PageSize, RowRange, SortSpec};

    fn with_view<F: FnOnce(&View<'_>)>(f: F) {
        let headers = vec!["name".to_string(), "note".to_string()];
        let rows = [
            vec!["a".to_string(), "x,y".to_string()],
            vec!["b".to_string(), "z".to_string()],
        ];
        let sort = SortSpec::default();
        let filters = Filters::new();
        let view = View {
            dataset: "r.csv",
            headers: &headers,
            rows: rows.iter().map(|r| r.as_slice()).collect(),
            total_pages: 1,
            current_page: 1,
            page_size: PageSize::All,
            sort: &sort,
            filters: &filters,
            range: RowRange::new(2, PageSize::All, 1),
        };
        f(&view);
    }

    #[test]
    fn test_write_csv_quotes_delimiters() {
        with_view(|view| {
            let mut buf = Vec::new();
            write_view(view, ExportFormat::Csv, &mut buf).unwrap();
            assert_eq!(String::from_utf8(buf).unwrap(), "name,note\na,\"x,y\"\nb,z\n");
        });
    }

    #[test]
    fn test_write_tsv() {
        with_view(|view| {
            let mut buf = Vec::new();
            write_view(view, ExportFormat::Tsv, &mut buf).unwrap();
            assert_eq!(String::from_utf8(buf).unwrap(), "name\tnote\na\tx,y\nb\tz\n");
        });
    }

    #[test]
    fn test_write_json_keeps_column_order() {
        with_view(|view| {
            let mut buf = Vec::new();
            write_view(view, ExportFormat::Json, &mut buf).unwrap();
            let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
            assert_eq!(value[0]["note"], "x,y");
            assert_eq!(value[1]["name"], "b");
        });
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("TSV".parse::<ExportFormat>().unwrap(), ExportFormat::Tsv);
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }
}

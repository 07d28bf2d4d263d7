//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use reportdeck::{
    Deck, DeckConfig, ExportFormat, GroupMode, GroupingConfig, IngestPolicy, PageSize,
    ParserConfig,
};

/// reportdeck: filter, sort, page and group tabular reports
#[derive(Parser)]
#[command(name = "reportdeck")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load report files and print their grouped, filtered views
    Show {
        /// Report files (CSV by default)
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// How to group active reports
        #[arg(short, long, default_value = "none")]
        group_by: GroupMode,

        /// Tag a report before grouping (repeatable)
        #[arg(long = "tag", value_name = "FILE=TAG", value_parser = parse_assignment)]
        tags: Vec<(String, String)>,

        /// Mark a report inactive (repeatable)
        #[arg(long = "inactive", value_name = "FILE")]
        inactive: Vec<String>,

        #[command(flatten)]
        view: ViewArgs,

        #[command(flatten)]
        deck: DeckArgs,
    },

    /// Write the computed page of one report to a file or stdout
    Export {
        /// Report file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,

        #[command(flatten)]
        view: ViewArgs,

        #[command(flatten)]
        deck: DeckArgs,
    },

    /// Serve the loaded reports over a local JSON API
    Serve {
        /// Report files
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Port for web server
        #[arg(short, long, default_value = "7878")]
        port: u16,

        #[command(flatten)]
        deck: DeckArgs,
    },
}

/// View settings applied to every loaded report.
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Keep rows whose COL equals VALUE (repeatable, combined with AND)
    #[arg(long = "filter", value_name = "COL=VALUE", value_parser = parse_assignment)]
    pub filters: Vec<(String, String)>,

    /// Sort by column
    #[arg(short, long, value_name = "COL")]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Rows per page: a positive number or "All"
    #[arg(long, value_name = "N|All")]
    pub page_size: Option<PageSize>,

    /// Page to show
    #[arg(long, default_value_t = 1)]
    pub page: usize,
}

impl ViewArgs {
    /// Apply these settings to one dataset in the order a user would click
    /// through them. Returns false if the requested page was out of range.
    pub fn apply(&self, deck: &mut Deck, id: &str) -> bool {
        if let Some(page_size) = self.page_size {
            deck.set_page_size(id, page_size);
        }
        for (header, value) in &self.filters {
            deck.set_filter(id, header, Some(value.as_str()));
        }
        if let Some(sort) = &self.sort {
            deck.set_sort(id, sort);
            if self.desc {
                deck.set_sort(id, sort);
            }
        }
        self.page == 1 || deck.set_page(id, self.page)
    }
}

/// Parsing and grouping options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct DeckArgs {
    /// Cell delimiter
    #[arg(long, default_value = ",")]
    pub delimiter: char,

    /// Reject rows whose cell count differs from the header count
    #[arg(long)]
    pub strict: bool,

    /// Keep the files that parsed when others in the batch fail
    #[arg(long)]
    pub partial: bool,

    /// Title format for date groups (chrono strftime)
    #[arg(long, value_name = "FORMAT")]
    pub date_format: Option<String>,

    /// Order date groups by day instead of by first appearance
    #[arg(long)]
    pub chronological: bool,
}

impl DeckArgs {
    /// Build the deck configuration these flags describe.
    pub fn to_config(&self) -> reportdeck::Result<DeckConfig> {
        let mut parser = ParserConfig::default().with_delimiter(self.delimiter);
        if self.strict {
            parser = parser.strict();
        }

        let mut grouping = GroupingConfig::default().with_chronological_dates(self.chronological);
        if let Some(format) = &self.date_format {
            grouping = grouping.with_date_format(format.as_str())?;
        }

        let policy = if self.partial {
            IngestPolicy::Partial
        } else {
            IngestPolicy::AllOrNothing
        };

        Ok(DeckConfig::default()
            .with_parser(parser)
            .with_grouping(grouping)
            .with_ingest_policy(policy))
    }
}

/// Parse `KEY=VALUE`. Only the first `=` separates; the value may be empty.
fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    if key.trim().is_empty() {
        return Err(format!("missing name before '=' in '{}'", s));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("region=east").unwrap(),
            ("region".to_string(), "east".to_string())
        );
        assert_eq!(
            parse_assignment("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert!(parse_assignment("region").is_err());
        assert!(parse_assignment("=east").is_err());
    }

    #[test]
    fn test_show_flags() {
        let cli = Cli::parse_from([
            "reportdeck",
            "show",
            "a.csv",
            "b.csv",
            "--group-by",
            "tags",
            "--filter",
            "region=east",
            "--sort",
            "owner",
            "--desc",
            "--page-size",
            "All",
            "--tag",
            "a.csv=Q1",
        ]);

        match cli.command {
            Commands::Show {
                files,
                group_by,
                tags,
                view,
                ..
            } => {
                assert_eq!(files.len(), 2);
                assert_eq!(group_by, GroupMode::Tags);
                assert_eq!(tags, vec![("a.csv".to_string(), "Q1".to_string())]);
                assert_eq!(view.page_size, Some(PageSize::All));
                assert!(view.desc);
            }
            _ => panic!("expected show"),
        }
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let result = Cli::try_parse_from(["reportdeck", "show", "a.csv", "--page-size", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_view_args_apply() {
        let mut deck = Deck::new();
        deck.ingest_str("r.csv", "a,b\n1,z\n2,y\n1,y\n").unwrap();

        let args = ViewArgs {
            filters: vec![("a".to_string(), "1".to_string())],
            sort: Some("b".to_string()),
            desc: true,
            page_size: Some(PageSize::rows(1).unwrap()),
            page: 2,
        };
        assert!(args.apply(&mut deck, "r.csv"));

        let view = deck.view("r.csv").unwrap();
        assert_eq!(view.current_page, 2);
        assert_eq!(view.rows[0][1], "y");

        let args = ViewArgs {
            page: 9,
            ..ViewArgs::default()
        };
        assert!(!args.apply(&mut deck, "r.csv"));
    }

    #[test]
    fn test_deck_args_to_config() {
        let args = DeckArgs {
            delimiter: '\t',
            strict: true,
            partial: true,
            date_format: Some("%Y-%m-%d".to_string()),
            chronological: false,
        };
        let config = args.to_config().unwrap();

        assert_eq!(config.parser.delimiter, '\t');
        assert!(config.parser.strict);
        assert_eq!(config.ingest_policy, IngestPolicy::Partial);
        assert_eq!(config.grouping.date_format, "%Y-%m-%d");
    }
}

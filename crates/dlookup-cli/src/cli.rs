//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use dlookup_common::models::FilterKind;

#[derive(Debug, Parser)]
#[command(name = "dlookup", version, about = "Search the Dartmouth directory")]
pub struct Cli {
    /// Config file; defaults to ./dlookup.toml when present
    #[arg(long, global = true, env = "DLOOKUP_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one lookup and print the filtered results
    Search(SearchArgs),
    /// Line-oriented session: type to search, `:help` for commands
    Interactive,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Name or email fragment; multiple words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    #[arg(long, value_enum, default_value_t = FilterArg::All)]
    pub filter: FilterArg,

    /// Two-digit class year; implies `--filter year`
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..100))]
    pub year: Option<u8>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl SearchArgs {
    pub fn query_text(&self) -> String {
        self.query.join(" ")
    }

    pub fn filter_kind(&self) -> FilterKind {
        match (self.filter, self.year) {
            (FilterArg::All, Some(_)) => FilterKind::ByYear,
            (filter, _) => filter.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    All,
    Students,
    Staff,
    Year,
}

impl From<FilterArg> for FilterKind {
    fn from(f: FilterArg) -> Self {
        match f {
            FilterArg::All => FilterKind::All,
            FilterArg::Students => FilterKind::StudentsOnly,
            FilterArg::Staff => FilterKind::StaffOnly,
            FilterArg::Year => FilterKind::ByYear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Vcard,
}

//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::fragment::Category;
use crate::index::loader::SourceFormat;
use crate::search::{ResultOrder, SearchMode};

/// Check command arguments.
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Search command arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// The search query
    pub query: String,

    /// Matching mode (defaults to search.mode)
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Only return pages or only sections
    #[arg(long, value_enum)]
    pub category: Option<CategoryArg>,

    /// Only return records of this page
    #[arg(short, long)]
    pub page: Option<String>,

    /// Maximum number of results, 0 for all (defaults to search.limit)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Result order (defaults to search.order)
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Exact location of the record, e.g. "man/guide/#Usage-1"
    pub location: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Pages command arguments.
#[derive(Debug, Args)]
pub struct PagesCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Convert command arguments.
#[derive(Debug, Args)]
pub struct ConvertCommand {
    /// Target format
    #[arg(short, long, value_enum)]
    pub to: FormatArg,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Matching mode argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// All query terms must appear as tokens
    Token,
    /// Query must appear verbatim
    Substring,
    /// Query is a regular expression
    Regex,
}

impl From<ModeArg> for SearchMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Token => Self::Token,
            ModeArg::Substring => Self::Substring,
            ModeArg::Regex => Self::Regex,
        }
    }
}

/// Category argument for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    /// Whole pages
    Page,
    /// Sections within pages
    Section,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Page => Self::Page,
            CategoryArg::Section => Self::Section,
        }
    }
}

/// Result order argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    /// Best matches first
    Relevance,
    /// Index order
    Sequence,
}

impl From<OrderArg> for ResultOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Relevance => Self::Relevance,
            OrderArg::Sequence => Self::Sequence,
        }
    }
}

/// Serialization format argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// `{"docs": [...]}`
    Json,
    /// `var documenterSearchIndex = {...}`
    Js,
}

impl From<FormatArg> for SourceFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => Self::Json,
            FormatArg::Js => Self::DocumenterJs,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

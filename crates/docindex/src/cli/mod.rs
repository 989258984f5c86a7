//! Command-line interface for docindex.
//!
//! This module provides the CLI structure and command handlers for the
//! `docidx` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    CategoryArg, CheckCommand, ConfigCommand, ConvertCommand, FormatArg, ModeArg, OrderArg,
    OutputFormat, PagesCommand, SearchCommand, ShowCommand, StatsCommand,
};

use crate::index::loader::LoadPolicy;

/// docidx - Inspect and query documentation search indexes
///
/// Reads the `search_index.js` a documentation build produces (or plain
/// JSON with the same shape), checks it, and searches it from the terminal.
#[derive(Debug, Parser)]
#[command(name = "docidx")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Index file or build directory (overrides index.path)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub index: Option<PathBuf>,

    /// Skip malformed records instead of rejecting the file
    #[arg(long, global = true)]
    pub skip_invalid: bool,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load and validate an index
    Check(CheckCommand),

    /// Search an index
    Search(SearchCommand),

    /// Show the record at a location
    Show(ShowCommand),

    /// List pages and their section counts
    Pages(PagesCommand),

    /// Show index statistics
    Stats(StatsCommand),

    /// Re-serialize an index as JSON or script
    Convert(ConvertCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }

    /// The load policy implied by the flags, if they override the config.
    #[must_use]
    pub fn policy_override(&self) -> Option<LoadPolicy> {
        self.skip_invalid.then_some(LoadPolicy::Skip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "docidx");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_levels() {
        use crate::logging::Verbosity;

        assert_eq!(parse(&["docidx", "-q", "stats"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["docidx", "stats"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["docidx", "-v", "stats"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["docidx", "-vv", "stats"]).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_check() {
        let cli = parse(&["docidx", "check", "--json"]);
        assert!(matches!(cli.command, Command::Check(CheckCommand { json: true })));
    }

    #[test]
    fn test_parse_search() {
        let cli = parse(&["docidx", "search", "send recv"]);
        let Command::Search(cmd) = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(cmd.query, "send recv");
        assert!(cmd.mode.is_none());
        assert!(cmd.limit.is_none());
        assert_eq!(cmd.format, OutputFormat::Plain);
    }

    #[test]
    fn test_parse_search_with_filters() {
        let cli = parse(&[
            "docidx",
            "search",
            "socket",
            "-m",
            "substring",
            "--category",
            "section",
            "--page",
            "Guide",
            "-l",
            "5",
            "--order",
            "sequence",
            "-f",
            "json",
        ]);
        let Command::Search(cmd) = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(cmd.mode, Some(ModeArg::Substring));
        assert_eq!(cmd.category, Some(CategoryArg::Section));
        assert_eq!(cmd.page.as_deref(), Some("Guide"));
        assert_eq!(cmd.limit, Some(5));
        assert_eq!(cmd.order, Some(OrderArg::Sequence));
        assert_eq!(cmd.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_show() {
        let cli = parse(&["docidx", "show", "man/guide/#Usage-1"]);
        let Command::Show(cmd) = cli.command else {
            panic!("expected show command");
        };
        assert_eq!(cmd.location, "man/guide/#Usage-1");
    }

    #[test]
    fn test_parse_convert() {
        let cli = parse(&["docidx", "convert", "--to", "json", "--pretty", "-o", "out.json"]);
        let Command::Convert(cmd) = cli.command else {
            panic!("expected convert command");
        };
        assert_eq!(cmd.to, FormatArg::Json);
        assert!(cmd.pretty);
        assert_eq!(cmd.output, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_parse_global_index_and_policy() {
        let cli = parse(&["docidx", "stats", "-i", "docs/build", "--skip-invalid"]);
        assert_eq!(cli.index, Some(PathBuf::from("docs/build")));
        assert_eq!(cli.policy_override(), Some(LoadPolicy::Skip));

        let cli = parse(&["docidx", "stats"]);
        assert_eq!(cli.policy_override(), None);
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["docidx", "-c", "/custom/config.toml", "pages"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_config_subcommand() {
        let cli = parse(&["docidx", "config", "show", "--json"]);
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Show { json: true })
        ));
    }
}

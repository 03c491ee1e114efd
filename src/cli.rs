//! CLI argument parsing module for appmeta

use crate::config::Config;
use crate::domain::{parse_release_date, ReleaseKind};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Parse a release type: stable, development or snapshot
fn parse_release_kind(s: &str) -> Result<ReleaseKind, String> {
    ReleaseKind::from_attr(s.trim())
        .ok_or_else(|| format!("invalid release type '{}' (stable, development, snapshot)", s))
}

/// Parse a release date, keeping it as written
fn parse_date(s: &str) -> Result<String, String> {
    let s = s.trim();
    parse_release_date(s)
        .map(|_| s.to_string())
        .ok_or_else(|| format!("invalid date '{}', expected YYYY-MM-DD", s))
}

/// AppStream metainfo validator and editor
#[derive(Parser, Debug, Clone)]
#[command(
    name = "appmeta",
    version,
    about = "Validate, query and edit AppStream metainfo files"
)]
pub struct CliArgs {
    /// Enable verbose output
    #[arg(long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (default: ./appmeta.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check metainfo files against the AppStream rules
    Validate(ValidateArgs),

    /// Print the application record
    Show {
        /// Metainfo file
        file: PathBuf,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print the latest release
    Latest {
        /// Metainfo file
        file: PathBuf,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print one release by version
    Release {
        /// Metainfo file
        file: PathBuf,
        /// Release version, e.g. 3.11.4
        version: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// List releases in file order
    Releases {
        /// Metainfo file
        file: PathBuf,
        /// Show at most this many releases
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Rewrite a file in canonical form
    Format {
        /// Metainfo file
        file: PathBuf,
        /// Only check; exit with status 3 when the file is not canonical
        #[arg(long, conflicts_with = "dry_run")]
        check: bool,
        /// Print the result instead of writing it
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Insert a new release entry
    #[command(disable_version_flag = true)]
    AddRelease(AddReleaseArgs),
}

/// Options for `validate`
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Files or directories (default: current directory)
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,

    /// Check that every URL responds
    #[arg(long)]
    pub check_urls: bool,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Options for `add-release`
#[derive(Args, Debug, Clone)]
pub struct AddReleaseArgs {
    /// Metainfo file
    pub file: PathBuf,

    /// Version of the new release
    #[arg(long = "version", value_name = "VERSION")]
    pub release_version: String,

    /// Release date (default: today)
    #[arg(long, value_parser = parse_date)]
    pub date: Option<String>,

    /// Release type
    #[arg(long = "type", value_name = "TYPE", value_parser = parse_release_kind)]
    pub kind: Option<ReleaseKind>,

    /// Bullet point for the release notes (can be specified multiple times)
    #[arg(long = "item", value_name = "TEXT", action = ArgAction::Append)]
    pub items: Vec<String>,

    /// Paragraph for the release notes
    #[arg(long, value_name = "TEXT")]
    pub note: Option<String>,

    /// Show what would change without writing
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Show changes in diff format
    #[arg(long)]
    pub diff: bool,
}

impl CliArgs {
    /// Apply command-line overrides on top of a loaded configuration
    pub fn apply_to(&self, config: &mut Config) {
        if let Command::Validate(ref args) = self.command {
            if args.strict {
                config.strict = true;
            }
            if args.check_urls {
                config.network.check_urls = true;
            }
        }
    }

    /// Whether the selected command wants JSON output
    pub fn json(&self) -> bool {
        match self.command {
            Command::Validate(ref args) => args.json,
            Command::Show { json, .. }
            | Command::Latest { json, .. }
            | Command::Release { json, .. }
            | Command::Releases { json, .. } => json,
            Command::Format { .. } | Command::AddRelease(_) => false,
        }
    }
}

//! appmeta - AppStream metainfo validator and editor CLI tool
//!
//! Validates metainfo files, prints records and releases, rewrites files
//! in canonical form and inserts new release entries.

use appmeta::cli::{AddReleaseArgs, CliArgs, Command};
use appmeta::config::Config;
use appmeta::domain::{Block, Description, Release};
use appmeta::error::MetainfoError;
use appmeta::logging;
use appmeta::metainfo::{read_metainfo, MetainfoWriter};
use appmeta::orchestrator::Orchestrator;
use appmeta::output::{create_formatter, DiffFormatter, OutputConfig};
use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::process::ExitCode;
use tracing::debug;

/// Exit status when validation fails or a file is not canonical
const EXIT_INVALID: u8 = 3;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    logging::init(args.verbose, args.quiet);

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    debug!("appmeta v{}", env!("CARGO_PKG_VERSION"));

    let color = io::stdout().is_terminal();
    let output_config =
        OutputConfig::from_cli(args.json(), args.verbose, args.quiet).with_color(color);
    let formatter = create_formatter(output_config);
    let mut stdout = io::stdout().lock();

    let exit_code = match args.command {
        Command::Validate(ref validate) => {
            let cwd = std::env::current_dir()?;
            let mut config = Config::resolve(args.config.as_ref(), &cwd)?;
            args.apply_to(&mut config);

            let orchestrator = Orchestrator::new(config)?;
            let show_progress = !args.quiet && !validate.json && io::stderr().is_terminal();
            let result = orchestrator.run(&validate.paths, show_progress).await;

            formatter.format_validation(&result, &mut stdout)?;
            if !validate.json {
                for error in &result.errors {
                    eprintln!("Error: {}", error);
                }
            }

            if result.has_read_failures() {
                ExitCode::FAILURE
            } else if !result.summary.all_passed() {
                ExitCode::from(EXIT_INVALID)
            } else {
                ExitCode::SUCCESS
            }
        }
        Command::Show { ref file, .. } => {
            let component = read_metainfo(file)?;
            formatter.format_component(&component, &mut stdout)?;
            ExitCode::SUCCESS
        }
        Command::Latest { ref file, .. } => {
            let component = read_metainfo(file)?;
            let Some(latest) = component.latest_release() else {
                anyhow::bail!("{}: no releases", file.display());
            };
            formatter.format_release(latest, &mut stdout)?;
            ExitCode::SUCCESS
        }
        Command::Release {
            ref file,
            ref version,
            ..
        } => {
            let component = read_metainfo(file)?;
            let release =
                component
                    .release(version)
                    .ok_or_else(|| MetainfoError::ReleaseNotFound {
                        version: version.clone(),
                    })?;
            formatter.format_release(release, &mut stdout)?;
            ExitCode::SUCCESS
        }
        Command::Releases {
            ref file, limit, ..
        } => {
            let component = read_metainfo(file)?;
            let count = limit
                .unwrap_or(component.releases.len())
                .min(component.releases.len());
            formatter.format_releases(&component.releases[..count], &mut stdout)?;
            ExitCode::SUCCESS
        }
        Command::Format {
            ref file,
            check,
            dry_run,
        } => format_file(file, check, dry_run, args.quiet, &mut stdout)?,
        Command::AddRelease(ref add) => add_release(add, args.quiet, color, &mut stdout)?,
    };

    stdout.flush()?;
    Ok(exit_code)
}

/// Rewrite a file canonically, or only check it
fn format_file(
    file: &Path,
    check: bool,
    dry_run: bool,
    quiet: bool,
    out: &mut dyn Write,
) -> anyhow::Result<ExitCode> {
    let writer = MetainfoWriter::new(check || dry_run);
    let result = writer.format_file(file)?;

    if check {
        if result.has_changes() {
            if !quiet {
                writeln!(out, "{} is not in canonical form", file.display())?;
            }
            return Ok(ExitCode::from(EXIT_INVALID));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let message = if dry_run {
        result.after.clone()
    } else if result.file_modified {
        format!("Formatted {}\n", file.display())
    } else {
        format!("{} is already in canonical form\n", file.display())
    };
    if dry_run || !quiet {
        write!(out, "{}", message)?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Build the release entry described by the command line
fn release_from_args(args: &AddReleaseArgs) -> Release {
    let date = args
        .date
        .clone()
        .unwrap_or_else(|| chrono::Local::now().date_naive().format("%Y-%m-%d").to_string());
    let mut release = Release::new(args.release_version.trim()).with_date(date);
    if let Some(kind) = args.kind {
        release = release.with_kind(kind);
    }

    let mut blocks = Vec::new();
    if let Some(ref note) = args.note {
        blocks.push(Block::paragraph(note.trim()));
    }
    if !args.items.is_empty() {
        blocks.push(Block::unordered_list(args.items.iter().map(|i| i.trim())));
    }
    if !blocks.is_empty() {
        release = release.with_description(Description::new(blocks));
    }
    release
}

/// Insert a release into a file
fn add_release(
    args: &AddReleaseArgs,
    quiet: bool,
    color: bool,
    out: &mut dyn Write,
) -> anyhow::Result<ExitCode> {
    let release = release_from_args(args);
    let writer = MetainfoWriter::new(args.dry_run);
    let result = writer.add_release(&args.file, &release)?;
    if args.diff {
        DiffFormatter::new(args.dry_run, color).format(&result, out)?;
    } else if args.dry_run {
        write!(out, "{}", result.after)?;
    } else if !quiet {
        writeln!(
            out,
            "Added release {} to {}",
            release.version,
            args.file.display()
        )?;
    }
    Ok(ExitCode::SUCCESS)
}

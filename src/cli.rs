//! Command-line interface module for datetidy.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Interactive folder selection when paths are not given
//! - Organization and preview orchestration
//! - Result rendering and exit codes

use crate::file_category::LabelSet;
use crate::file_organizer::{
    FileOrganizer, FolderRole, Layout, OrganizeError, OrganizeOptions, OrganizeResult,
    OutcomeReport, RunStatus,
};
use crate::output::{ConsoleReporter, OutputFormatter};
use crate::prompt::{AutoConfirm, ConsolePrompt, Prompt, Reporter, SilentReporter};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Move the files of a folder into category and modification-date subfolders.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Folder whose files will be moved (asked interactively if omitted)
    pub source: Option<PathBuf>,

    /// Folder that receives the organized tree (asked interactively if omitted)
    pub destination: Option<PathBuf>,

    /// Move without asking for confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Show where files would go without moving anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Language of the category folder names
    #[arg(long, value_enum, default_value_t = LabelsArg::English)]
    pub labels: LabelsArg,

    /// Directory layout under the destination
    #[arg(long, value_enum, default_value_t = LayoutArg::CategoryDate)]
    pub layout: LayoutArg,

    /// Print the outcome as JSON instead of styled text
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelsArg {
    English,
    Spanish,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutArg {
    /// DESTINATION/CATEGORY/dd-mm-yyyy/
    CategoryDate,
    /// DESTINATION/dd-mm-yyyy/
    DateOnly,
}

impl From<LabelsArg> for LabelSet {
    fn from(arg: LabelsArg) -> Self {
        match arg {
            LabelsArg::English => LabelSet::English,
            LabelsArg::Spanish => LabelSet::Spanish,
        }
    }
}

impl From<LayoutArg> for Layout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::CategoryDate => Layout::CategoryDate,
            LayoutArg::DateOnly => Layout::DateOnly,
        }
    }
}

impl Args {
    /// The organizer options these arguments select.
    pub fn options(&self) -> OrganizeOptions {
        OrganizeOptions {
            layout: self.layout.into(),
            labels: self.labels.into(),
            dry_run: self.dry_run,
            ..OrganizeOptions::default()
        }
    }
}

/// Runs the CLI application on the terminal and returns the process exit code.
///
/// Exit code is 0 when the run completed (even with per-file failures), had
/// nothing to do, was cancelled, or was a preview. Any fatal error, including
/// a missing folder selection, exits with 1.
pub fn run_cli(args: Args) -> ExitCode {
    let console = ConsolePrompt::new();
    let mut prompt: Box<dyn Prompt> = if args.yes {
        Box::new(AutoConfirm::new(console))
    } else {
        Box::new(console)
    };
    let mut reporter: Box<dyn Reporter> = if args.json {
        Box::new(SilentReporter)
    } else {
        Box::new(ConsoleReporter::new())
    };

    let result = run_cli_with(&args, prompt.as_mut(), reporter.as_mut());
    render(&args, &result);
    exit_code(&result)
}

/// Runs the application with caller-supplied prompt and reporter.
///
/// Folders missing from `args` are asked for through `prompt`; an empty
/// answer ends the run with a selection error before anything is touched.
pub fn run_cli_with(
    args: &Args,
    prompt: &mut dyn Prompt,
    reporter: &mut dyn Reporter,
) -> OrganizeResult<OutcomeReport> {
    let source = select_folder(args.source.as_deref(), FolderRole::Source, prompt)?;
    let destination = select_folder(args.destination.as_deref(), FolderRole::Destination, prompt)?;

    log::info!(
        "Organizing {} into {}",
        source.display(),
        destination.display()
    );

    FileOrganizer::new(args.options()).organize(&source, &destination, prompt, reporter)
}

fn select_folder(
    given: Option<&Path>,
    role: FolderRole,
    prompt: &mut dyn Prompt,
) -> OrganizeResult<PathBuf> {
    if let Some(path) = given {
        return Ok(path.to_path_buf());
    }
    prompt
        .choose_folder(role)?
        .filter(|path| !path.as_os_str().is_empty())
        .ok_or(OrganizeError::Selection { which: role })
}

/// Maps a run result to the process exit code.
pub fn exit_code(result: &OrganizeResult<OutcomeReport>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

fn render(args: &Args, result: &OrganizeResult<OutcomeReport>) {
    let report = match result {
        Ok(report) => report,
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            return;
        }
    };

    if args.json {
        match OutputFormatter::report_json(report) {
            Ok(json) => OutputFormatter::plain(&json),
            Err(e) => OutputFormatter::error(&format!("Error: could not encode report: {}", e)),
        }
        return;
    }

    match report.status {
        RunStatus::NothingToDo => OutputFormatter::info("No files found to organize."),
        RunStatus::Cancelled => OutputFormatter::plain("Operation cancelled."),
        RunStatus::Previewed => {
            OutputFormatter::preview(report);
            OutputFormatter::report_summary(report, args.labels.into());
            OutputFormatter::dry_run_notice("No files were moved.");
        }
        RunStatus::Completed => {
            OutputFormatter::report_summary(report, args.labels.into());
            if report.is_complete_success() {
                OutputFormatter::success("Organization complete!");
            } else {
                OutputFormatter::warning(
                    "Some files could not be organized. Please review errors above.",
                );
            }
        }
    }
}

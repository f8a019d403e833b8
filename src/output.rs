//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output, including colored output,
//! progress tracking, and formatted tables. This module abstracts away output details,
//! making it easy to change formatting globally.

use crate::file_category::LabelSet;
use crate::file_organizer::{FileFailure, MoveRecord, OutcomeReport};
use crate::prompt::Reporter;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Progress bars for operations
/// - Summary tables with statistics
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use datetidy::output::OutputFormatter;
    /// OutputFormatter::success("Organization complete!");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// The line printed for each moved file: `<source> -> <destination>`.
    pub fn move_line(source: &std::path::Path, destination: &std::path::Path) -> String {
        format!("{} -> {}", source.display(), destination.display())
    }

    /// Prints a titled list of paths to stderr, one per line.
    ///
    /// Goes to stderr alongside the interactive prompt so stdout stays clean
    /// for `--json`.
    pub fn file_list(title: &str, files: &[PathBuf]) {
        eprintln!("\n{}", title.bold());
        for file in files {
            eprintln!("  {}", file.display());
        }
        eprintln!();
    }

    /// Creates and returns a progress bar for file operations.
    ///
    /// The bar draws to stderr and stays hidden when stderr is not a terminal.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("█▓░"));
        }
        pb
    }

    /// Prints a summary table with file statistics by category.
    ///
    /// # Arguments
    ///
    /// * `category_counts` - Map of category directory names to file counts
    /// * `total_files` - Total number of files organized
    pub fn summary_table(category_counts: &BTreeMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let max_category_len = category_counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(8); // At least "Category" width

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 10));

        for (category, count) in category_counts {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                Self::file_word(*count),
                width = max_category_len
            );
        }

        println!("{}", "-".repeat(max_category_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            Self::file_word(total_files),
            width = max_category_len
        );
    }

    /// Prints the closing summary of a run: table, failures, skipped entries.
    pub fn report_summary(report: &OutcomeReport, labels: LabelSet) {
        let counts: BTreeMap<String, usize> = report
            .category_counts()
            .into_iter()
            .map(|(category, count)| (category.dir_name(labels).to_string(), count))
            .collect();
        let counted: usize = counts.values().sum();
        Self::summary_table(&counts, counted);

        if !report.failed.is_empty() {
            Self::header("FAILED");
            for failure in &report.failed {
                Self::error(&format!("{}: {}", failure.path.display(), failure.reason));
            }
        }

        if !report.skipped.is_empty() {
            Self::header("SKIPPED");
            for skipped in &report.skipped {
                Self::warning(&format!("{}: {}", skipped.path.display(), skipped.reason));
            }
        }
    }

    /// Prints the planned moves of a preview.
    pub fn preview(report: &OutcomeReport) {
        Self::header("Files would be moved as follows:");
        for record in &report.planned {
            println!(
                "  {}",
                Self::move_line(&record.source, &record.destination)
            );
        }
    }

    /// Renders the report as pretty-printed JSON.
    pub fn report_json(report: &OutcomeReport) -> serde_json::Result<String> {
        serde_json::to_string_pretty(report)
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    fn file_word(count: usize) -> &'static str {
        if count == 1 { "file" } else { "files" }
    }
}

/// Prints one line per file as it is moved, under a progress bar.
#[derive(Default)]
pub struct ConsoleReporter {
    bar: Option<ProgressBar>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn print(&self, line: impl FnOnce()) {
        match &self.bar {
            Some(bar) => bar.suspend(line),
            None => line(),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn run_started(&mut self, total: usize) {
        self.bar = Some(OutputFormatter::create_progress_bar(total as u64));
    }

    fn file_moved(&mut self, record: &MoveRecord) {
        self.print(|| {
            OutputFormatter::plain(&OutputFormatter::move_line(
                &record.source,
                &record.destination,
            ))
        });
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn file_failed(&mut self, failure: &FileFailure) {
        self.print(|| {
            OutputFormatter::error(&format!("{}: {}", failure.path.display(), failure.reason))
        });
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn run_finished(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
